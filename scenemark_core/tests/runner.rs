mod common;

use std::io::{self, Write};
use std::rc::Rc;

use common::{StubScene, count, new_log, quiet_display, registry_with, scripted_display};
use scenemark_core::display::{Event, Key, ScriptedEvents};
use scenemark_core::{
    BenchError, BenchRunner, Benchmark, CancelToken, OptionPair, OptionPolicy, SystemClock,
    builtin_registry, default_benchmarks,
};

fn run(
    runner: &BenchRunner,
    benchmarks: &[Benchmark],
    registry: &mut scenemark_core::SceneRegistry,
    display: &mut scenemark_core::SoftwareDisplay,
) -> (scenemark_core::Result<scenemark_core::RunSummary>, String) {
    let mut out = Vec::new();
    let summary = runner.run(benchmarks, registry, display, &mut out);
    (summary, String::from_utf8(out).unwrap())
}

#[test]
fn runs_exactly_n_frames_and_reports_stub_fps() {
    let log = new_log();
    let mut registry = registry_with(vec![StubScene::new("alpha", 5, 42.5, &log)]);
    let mut display = quiet_display();

    let (summary, out) = run(
        &BenchRunner::new(),
        &[Benchmark::new("alpha", [])],
        &mut registry,
        &mut display,
    );
    let summary = summary.unwrap();

    assert_eq!(count(&log, "alpha draw"), 5);
    assert_eq!(count(&log, "alpha update"), 5);
    assert_eq!(display.presented(), 5);
    assert_eq!(summary.results[0].frames, 5);
    assert_eq!(summary.results[0].average_fps, 42.5);
    assert!(summary.results[0].completed);
    assert_eq!(summary.score, 42);
    assert!(out.contains("[alpha] <default> FPS: 42.50\n"));
}

#[test]
fn draw_precedes_update_every_frame() {
    let log = new_log();
    let mut registry = registry_with(vec![StubScene::new("alpha", 3, 1.0, &log)]);
    let mut display = quiet_display();

    run(&BenchRunner::new(), &[Benchmark::new("alpha", [])], &mut registry, &mut display)
        .0
        .unwrap();

    let log = log.borrow();
    let expected = [
        "alpha start",
        "alpha draw",
        "alpha update",
        "alpha draw",
        "alpha update",
        "alpha draw",
        "alpha update",
        "alpha teardown",
    ];
    assert_eq!(*log, expected);
}

#[test]
fn score_sums_truncated_fps() {
    let log = new_log();
    let mut registry = registry_with(vec![
        StubScene::new("alpha", 2, 59.7, &log),
        StubScene::new("beta", 2, 60.2, &log),
        StubScene::new("gamma", 2, 30.9, &log),
    ]);
    let benchmarks: Vec<_> = ["alpha", "beta", "gamma"]
        .into_iter()
        .map(|name| Benchmark::new(name, []))
        .collect();
    let mut display = quiet_display();

    let (summary, out) = run(&BenchRunner::new(), &benchmarks, &mut registry, &mut display);
    let summary = summary.unwrap();

    assert_eq!(summary.score, 149);
    assert!(!summary.cancelled);
    assert!(out.contains("scenemark Score: 149"));
}

#[test]
fn quit_mid_benchmark_tears_down_and_stops_the_run() {
    let log = new_log();
    let mut registry = registry_with(vec![
        StubScene::new("alpha", 10, 30.0, &log),
        StubScene::new("beta", 10, 30.0, &log),
    ]);
    let benchmarks = [Benchmark::new("alpha", []), Benchmark::new("beta", [])];
    let mut display = scripted_display(ScriptedEvents::quit_after(3));

    let (summary, out) = run(&BenchRunner::new(), &benchmarks, &mut registry, &mut display);
    let summary = summary.unwrap();

    assert_eq!(count(&log, "alpha draw"), 3);
    assert_eq!(count(&log, "alpha update"), 3);
    assert_eq!(count(&log, "alpha teardown"), 1);
    assert_eq!(count(&log, "beta start"), 0);
    assert_eq!(display.presented(), 3);

    assert!(summary.cancelled);
    assert_eq!(summary.results.len(), 1);
    assert!(!summary.results[0].completed);
    assert_eq!(summary.score, 30);
    assert!(out.contains("scenemark Score: 30"));
}

#[test]
fn escape_cancels_but_other_keys_do_not() {
    let log = new_log();
    let mut registry = registry_with(vec![StubScene::new("alpha", 6, 10.0, &log)]);
    let mut display = scripted_display(ScriptedEvents::new(vec![
        (1, Event::KeyDown(Key::Char('q'))),
        (4, Event::KeyDown(Key::Escape)),
    ]));
    let cancel = CancelToken::new();
    let runner = BenchRunner::new().with_cancel_token(cancel.clone());

    let summary = run(&runner, &[Benchmark::new("alpha", [])], &mut registry, &mut display)
        .0
        .unwrap();

    assert_eq!(count(&log, "alpha draw"), 4);
    assert!(summary.cancelled);
    assert!(cancel.is_cancelled());
}

#[test]
fn pre_cancelled_token_starts_nothing() {
    let log = new_log();
    let mut registry = registry_with(vec![StubScene::new("alpha", 3, 10.0, &log)]);
    let mut display = quiet_display();
    let cancel = CancelToken::new();
    cancel.cancel();

    let summary = run(
        &BenchRunner::new().with_cancel_token(cancel),
        &[Benchmark::new("alpha", [])],
        &mut registry,
        &mut display,
    )
    .0
    .unwrap();

    assert!(log.borrow().is_empty());
    assert!(summary.results.is_empty());
    assert!(summary.cancelled);
    assert_eq!(summary.score, 0);
}

#[test]
fn unknown_scene_aborts_the_run() {
    let log = new_log();
    let mut registry = registry_with(vec![
        StubScene::new("alpha", 1, 10.0, &log),
        StubScene::new("beta", 1, 10.0, &log),
    ]);
    let benchmarks = [
        Benchmark::new("alpha", []),
        Benchmark::new("missing", []),
        Benchmark::new("beta", []),
    ];
    let mut display = quiet_display();

    let (summary, _) = run(&BenchRunner::new(), &benchmarks, &mut registry, &mut display);

    assert!(matches!(summary, Err(BenchError::UnknownScene(name)) if name == "missing"));
    assert_eq!(count(&log, "alpha teardown"), 1);
    assert_eq!(count(&log, "beta start"), 0);
}

#[test]
fn strict_policy_refuses_rejected_options() {
    let log = new_log();
    let mut registry = registry_with(vec![StubScene::new("alpha", 1, 10.0, &log)]);
    let benchmarks = [Benchmark::new("alpha", [OptionPair::new("anisotropy", "16")])];

    let lenient = run(&BenchRunner::new(), &benchmarks, &mut registry, &mut quiet_display()).0;
    assert_eq!(lenient.unwrap().results.len(), 1);

    let strict = BenchRunner::new().with_policy(OptionPolicy::Strict);
    assert_eq!(strict.policy(), OptionPolicy::Strict);
    let result = run(&strict, &benchmarks, &mut registry, &mut quiet_display()).0;
    assert!(matches!(
        result,
        Err(BenchError::OptionRejected { ref option, .. }) if option == "anisotropy"
    ));
    assert_eq!(count(&log, "alpha start"), 1);
}

#[test]
fn builtin_scenes_run_to_completion_on_a_frame_budget() {
    let mut registry = builtin_registry(Rc::new(SystemClock::new()));
    let benchmarks: Vec<_> = default_benchmarks()
        .into_iter()
        .map(|b| b.with_option("frames", "2"))
        .collect();
    let mut display = scenemark_core::SoftwareDisplay::new(
        64,
        48,
        Box::new(scenemark_core::display::NoEvents),
    )
    .unwrap();

    let (summary, out) = run(&BenchRunner::new(), &benchmarks, &mut registry, &mut display);
    let summary = summary.unwrap();

    assert_eq!(summary.results.len(), 7);
    assert!(summary.results.iter().all(|r| r.frames == 2 && r.completed));
    assert_eq!(display.presented(), 14);
    assert_eq!(
        summary.score,
        summary.results.iter().map(|r| r.score).sum::<u32>()
    );
    assert!(out.contains("[texture] frames=2:texture-filter=mipmap FPS: "));
    for (_, scene) in registry.all_scenes() {
        assert!(!scene.is_running());
    }
}

/// Accepts output until it sees `marker`, then fails every write.
struct FailingWriter {
    marker: &'static str,
    tripped: bool,
}

impl Write for FailingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.tripped || String::from_utf8_lossy(buf).contains(self.marker) {
            self.tripped = true;
            return Err(io::Error::other("report sink closed"));
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn report_write_failure_is_an_io_error_and_releases_the_scene() {
    let log = new_log();
    let mut registry = registry_with(vec![
        StubScene::new("alpha", 3, 30.0, &log),
        StubScene::new("beta", 3, 30.0, &log),
    ]);
    let benchmarks = [Benchmark::new("alpha", []), Benchmark::new("beta", [])];
    let mut out = FailingWriter {
        marker: "FPS",
        tripped: false,
    };

    let result = BenchRunner::new().run(&benchmarks, &mut registry, &mut quiet_display(), &mut out);

    assert!(matches!(result, Err(BenchError::Io(_))));
    assert_eq!(count(&log, "alpha draw"), 3);
    assert_eq!(count(&log, "alpha teardown"), 1);
    assert_eq!(count(&log, "beta start"), 0);
    assert!(!registry.lookup("alpha").unwrap().is_running());
}
