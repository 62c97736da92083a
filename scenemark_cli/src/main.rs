use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result};
use clap::Parser;
use scenemark_core::display::{Event, EventSource, InterruptEvents, ScriptedEvents};
use scenemark_core::screenshot::render_screenshot;
use scenemark_core::{
    BenchRunner, Benchmark, Clock, Display, DisplayInfo, OptionPolicy, RunSummary, SceneRegistry,
    SoftwareDisplay, SystemClock, builtin_registry, default_benchmarks, scene_listing,
    write_scene_listing,
};
use serde::Serialize;

const LOG_ENV: &str = "SCENEMARK_LOG";
const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Debug, Parser)]
#[command(
    name = "scenemark",
    version,
    about = "Scene-based rendering benchmark",
    after_help = "Benchmarks are written as scene[:option=value]*, e.g. texture:texture-filter=linear"
)]
struct Cli {
    /// Benchmark to run. Repeatable; the stock list runs when none is given.
    #[arg(short = 'b', long = "benchmark", value_name = "DESC")]
    benchmarks: Vec<String>,

    /// Print every scene and its options instead of running anything.
    #[arg(long)]
    list_scenes: bool,

    /// Also write the run summary (or the scene listing) as JSON.
    #[arg(long, value_name = "PATH")]
    json: Option<PathBuf>,

    /// Surface size.
    #[arg(long, value_name = "WxH", default_value = "800x600", value_parser = parse_size)]
    size: (u16, u16),

    /// Fail when a scene rejects an option instead of ignoring it.
    #[arg(long)]
    strict_options: bool,

    /// Quit after this many frames, as if the user had pressed Escape.
    #[arg(long, value_name = "FRAMES")]
    cancel_after: Option<u64>,

    /// Render the first frame of each benchmark to a PNG in DIR instead of running.
    #[arg(long, value_name = "DIR")]
    screenshot: Option<PathBuf>,

    /// Log filter, e.g. `info` or `scenemark_core=debug`. Overrides SCENEMARK_LOG.
    #[arg(long, value_name = "FILTER")]
    log_level: Option<String>,
}

fn parse_size(s: &str) -> Result<(u16, u16), String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{s}'"))?;
    let parse = |v: &str| v.trim().parse::<u16>().map_err(|e| format!("'{v}': {e}"));
    Ok((parse(w)?, parse(h)?))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref());

    let clock: Rc<dyn Clock> = Rc::new(SystemClock::new());
    let mut registry = builtin_registry(clock);

    if cli.list_scenes {
        return list_scenes(&registry, cli.json.as_deref());
    }

    let benchmarks = if cli.benchmarks.is_empty() {
        default_benchmarks()
    } else {
        cli.benchmarks
            .iter()
            .map(|desc| Benchmark::from_description(desc))
            .collect::<Result<Vec<_>, _>>()?
    };
    let policy = if cli.strict_options {
        OptionPolicy::Strict
    } else {
        OptionPolicy::Lenient
    };

    if let Some(dir) = &cli.screenshot {
        return take_screenshots(&mut registry, &benchmarks, dir, cli.size, policy);
    }

    let events = CliEvents::new(cli.cancel_after)?;
    let (width, height) = cli.size;
    let mut display = SoftwareDisplay::new(width, height, Box::new(events))
        .context("could not initialize the display")?;

    let runner = BenchRunner::new().with_policy(policy);
    let summary = runner
        .run(&benchmarks, &mut registry, &mut display, &mut io::stdout().lock())
        .context("benchmark run failed")?;

    if let Some(path) = &cli.json {
        let report = RunReport {
            version: env!("CARGO_PKG_VERSION"),
            display: display.info(),
            summary: &summary,
        };
        write_json(path, &report)?;
    }

    Ok(())
}

fn init_tracing(filter: Option<&str>) {
    use tracing_subscriber::EnvFilter;

    let expr = filter
        .map(str::to_owned)
        .or_else(|| std::env::var(LOG_ENV).ok())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_owned());
    let filter = EnvFilter::try_new(&expr).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn list_scenes(registry: &SceneRegistry, json: Option<&Path>) -> Result<()> {
    write_scene_listing(registry, &mut io::stdout().lock())?;
    if let Some(path) = json {
        write_json(path, &scene_listing(registry))?;
    }
    Ok(())
}

fn take_screenshots(
    registry: &mut SceneRegistry,
    benchmarks: &[Benchmark],
    dir: &Path,
    (width, height): (u16, u16),
    policy: OptionPolicy,
) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("create screenshot dir {}", dir.display()))?;

    let mut stdout = io::stdout().lock();
    for (i, bench) in benchmarks.iter().enumerate() {
        let file_name: String = bench
            .description()
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
            .collect();
        let path = dir.join(format!("{i:02}-{file_name}.png"));

        let shot = render_screenshot(registry, bench, width, height, policy)
            .with_context(|| format!("render {}", bench.description()))?;
        shot.save_png(&path)
            .with_context(|| format!("write {}", path.display()))?;
        writeln!(stdout, "{}", path.display())?;
    }
    Ok(())
}

#[derive(Serialize)]
struct RunReport<'a> {
    version: &'static str,
    display: DisplayInfo,
    summary: &'a RunSummary,
}

fn write_json(path: &Path, value: &impl Serialize) -> Result<()> {
    let contents = serde_json::to_string_pretty(value).context("serialize json")?;
    fs::write(path, contents).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

/// Ctrl-C plus the optional `--cancel-after` script.
struct CliEvents {
    interrupt: InterruptEvents,
    script: Option<ScriptedEvents>,
}

impl CliEvents {
    fn new(cancel_after: Option<u64>) -> Result<Self> {
        let interrupt = InterruptEvents::new();
        spawn_interrupt_listener(interrupt.flag())?;
        Ok(Self {
            interrupt,
            script: cancel_after.map(ScriptedEvents::quit_after),
        })
    }
}

impl EventSource for CliEvents {
    fn poll(&mut self, events: &mut Vec<Event>) {
        self.interrupt.poll(events);
        if let Some(script) = &mut self.script {
            script.poll(events);
        }
    }
}

/// Raise `flag` on the first Ctrl-C so the run stops at the next frame
/// boundary; a second Ctrl-C exits immediately.
fn spawn_interrupt_listener(flag: Arc<AtomicBool>) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("start signal runtime")?;

    std::thread::Builder::new()
        .name("scenemark-interrupt".into())
        .spawn(move || {
            runtime.block_on(async {
                if tokio::signal::ctrl_c().await.is_err() {
                    tracing::warn!("could not listen for Ctrl-C");
                    return;
                }
                tracing::info!("interrupt received, stopping after the current frame");
                flag.store(true, Ordering::Relaxed);

                if tokio::signal::ctrl_c().await.is_ok() {
                    std::process::exit(130);
                }
            });
        })
        .context("spawn interrupt listener")?;
    Ok(())
}
