//! Named, string-valued scene configuration.

use rustc_hash::FxHashMap;
use serde::Serialize;
use smallvec::SmallVec;

use crate::error::OptionError;

/// A `(name, value)` setting attached to a benchmark.
///
/// Duplicates are allowed; they are applied in order, so the last one wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionPair {
    pub name: String,
    pub value: String,
}

impl OptionPair {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// The shape of value an option takes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OptionKind {
    #[default]
    Text,
    /// A finite, non-negative decimal number.
    Number,
    /// A non-negative integer.
    Count,
}

impl OptionKind {
    fn accepts(self, value: &str) -> bool {
        match self {
            Self::Text => true,
            Self::Number => value
                .trim()
                .parse::<f64>()
                .is_ok_and(|v| v.is_finite() && v >= 0.0),
            Self::Count => value.trim().parse::<u64>().is_ok(),
        }
    }

    fn expected(self) -> &'static str {
        match self {
            Self::Text => "any value",
            Self::Number => "a finite non-negative number",
            Self::Count => "a non-negative integer",
        }
    }
}

/// An option declared by a scene.
#[derive(Debug, Clone)]
pub struct SceneOption {
    pub name: &'static str,
    pub description: &'static str,
    pub default_value: String,
    pub value: String,
    pub kind: OptionKind,
    /// Empty when any value is accepted.
    pub acceptable_values: SmallVec<[&'static str; 4]>,
}

impl SceneOption {
    pub fn is_default(&self) -> bool {
        self.value == self.default_value
    }
}

/// The full set of options a scene declares.
#[derive(Debug, Clone, Default)]
pub struct SceneOptions {
    options: FxHashMap<&'static str, SceneOption>,
}

impl SceneOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare an option accepting any value.
    pub fn declare(&mut self, name: &'static str, default_value: &str, description: &'static str) {
        self.insert(name, default_value, description, OptionKind::Text, &[]);
    }

    /// Declare an option holding a finite, non-negative number.
    pub fn declare_number(&mut self, name: &'static str, default_value: &str, description: &'static str) {
        self.insert(name, default_value, description, OptionKind::Number, &[]);
    }

    /// Declare an option holding a non-negative integer.
    pub fn declare_count(&mut self, name: &'static str, default_value: &str, description: &'static str) {
        self.insert(name, default_value, description, OptionKind::Count, &[]);
    }

    /// Declare an option restricted to `acceptable_values`.
    pub fn declare_enum(
        &mut self,
        name: &'static str,
        default_value: &str,
        description: &'static str,
        acceptable_values: &[&'static str],
    ) {
        self.insert(name, default_value, description, OptionKind::Text, acceptable_values);
    }

    fn insert(
        &mut self,
        name: &'static str,
        default_value: &str,
        description: &'static str,
        kind: OptionKind,
        acceptable_values: &[&'static str],
    ) {
        self.options.insert(
            name,
            SceneOption {
                name,
                description,
                default_value: default_value.to_string(),
                value: default_value.to_string(),
                kind,
                acceptable_values: acceptable_values.iter().copied().collect(),
            },
        );
    }

    pub fn set(&mut self, name: &str, value: &str) -> Result<(), OptionError> {
        let option = self.options.get_mut(name).ok_or_else(|| OptionError::Unknown {
            option: name.to_string(),
        })?;

        if !option.acceptable_values.is_empty() && !option.acceptable_values.contains(&value) {
            return Err(OptionError::Invalid {
                option: name.to_string(),
                value: value.to_string(),
                expected: option.acceptable_values.join("|"),
            });
        }
        if !option.kind.accepts(value) {
            return Err(OptionError::Invalid {
                option: name.to_string(),
                value: value.to_string(),
                expected: option.kind.expected().to_string(),
            });
        }

        option.value = value.to_string();
        Ok(())
    }

    /// Restore every option to its declared default.
    pub fn reset(&mut self) {
        for option in self.options.values_mut() {
            option.value.clone_from(&option.default_value);
        }
    }

    pub fn get(&self, name: &str) -> Option<&SceneOption> {
        self.options.get(name)
    }

    /// Current value of `name`, or `""` for an undeclared option.
    pub fn value(&self, name: &str) -> &str {
        self.options.get(name).map_or("", |o| o.value.as_str())
    }

    pub fn value_bool(&self, name: &str) -> bool {
        matches!(self.value(name), "true" | "1" | "yes")
    }

    /// Parsed value, falling back to the parsed default when the current value
    /// does not parse.
    pub fn value_f64(&self, name: &str) -> f64 {
        self.parsed(name).unwrap_or(0.0)
    }

    pub fn value_u64(&self, name: &str) -> u64 {
        self.parsed(name).unwrap_or(0)
    }

    fn parsed<T: std::str::FromStr>(&self, name: &str) -> Option<T> {
        let option = self.options.get(name)?;
        option
            .value
            .trim()
            .parse()
            .ok()
            .or_else(|| option.default_value.trim().parse().ok())
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Options ordered by name.
    pub fn sorted(&self) -> Vec<&SceneOption> {
        let mut options: Vec<_> = self.options.values().collect();
        options.sort_unstable_by_key(|o| o.name);
        options
    }
}
