pub mod benchmark;
pub mod clock;
pub mod display;
pub mod error;
pub mod listing;
pub mod options;
pub mod registry;
pub mod result;
pub mod runner;
pub mod scene;
pub mod scenes;
pub mod screenshot;
pub mod surface;

pub use benchmark::{Benchmark, BoundScene, OptionPolicy, default_benchmarks};
pub use clock::{Clock, ManualClock, SystemClock, unix_timestamp_ms};
pub use display::{Display, DisplayInfo, Event, EventSource, Key, SoftwareDisplay};
pub use error::{BenchError, OptionError, Result};
pub use listing::{OptionInfo, SceneInfo, scene_listing, write_scene_listing};
pub use options::{OptionKind, OptionPair, SceneOption, SceneOptions};
pub use registry::SceneRegistry;
pub use result::{BenchmarkResult, RunSummary, fps_score};
pub use runner::{BenchRunner, CancelToken};
pub use scene::{Scene, SceneCore};
pub use scenes::{BUILTIN_SCENES, builtin_registry};
