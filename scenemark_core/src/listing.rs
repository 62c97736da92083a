//! Read-only report of every registered scene and the options it accepts.

use std::io::Write;

use serde::Serialize;

use crate::error::Result;
use crate::registry::SceneRegistry;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionInfo {
    pub name: String,
    pub description: String,
    pub default_value: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub acceptable_values: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SceneInfo {
    pub name: String,
    pub options: Vec<OptionInfo>,
}

/// All scenes ordered by name, each with its options ordered by name.
pub fn scene_listing(registry: &SceneRegistry) -> Vec<SceneInfo> {
    registry
        .all_scenes()
        .into_iter()
        .map(|(name, scene)| SceneInfo {
            name: name.to_string(),
            options: scene
                .options()
                .sorted()
                .into_iter()
                .map(|opt| OptionInfo {
                    name: opt.name.to_string(),
                    description: opt.description.to_string(),
                    default_value: opt.default_value.clone(),
                    acceptable_values: opt.acceptable_values.iter().map(|v| v.to_string()).collect(),
                })
                .collect(),
        })
        .collect()
}

pub fn write_scene_listing(registry: &SceneRegistry, out: &mut dyn Write) -> Result<()> {
    for scene in scene_listing(registry) {
        writeln!(out, "[Scene] {}", scene.name)?;
        for opt in &scene.options {
            writeln!(out, "  [Option] {}", opt.name)?;
            writeln!(out, "    Description  : {}", opt.description)?;
            writeln!(out, "    Default Value: {}", opt.default_value)?;
        }
    }
    out.flush()?;
    Ok(())
}
