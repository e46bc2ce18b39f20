#![forbid(unsafe_code)]

//! Widgets driven through a manually ticked presenter.

use std::sync::Arc;

use liveterm_core::testing::{MarkerCodes, RecordingStreams};
use liveterm_runtime::{Document, Presenter, PresenterOptions, Row, TerminalArbiter};
use liveterm_widgets::{
    BarOptions, BarStyle, ManualClock, ProgressBar, Spinner, SpinnerStatus, Stopwatch, render_bar,
};
use proptest::prelude::*;

const SECOND: u64 = 1_000;
const MINUTE: u64 = 60 * SECOND;
const HOUR: u64 = 60 * MINUTE;
const DAY: u64 = 24 * HOUR;

fn presenter() -> (Arc<RecordingStreams>, Presenter) {
    let streams = Arc::new(RecordingStreams::new());
    let presenter = Presenter::builder()
        .with_options(
            PresenterOptions::manual()
                .with_frames_per_second(5)
                .with_restore_on_panic(false),
        )
        .with_codes(Arc::new(MarkerCodes::new(80)))
        .with_streams(streams.clone())
        .with_arbiter(Arc::new(TerminalArbiter::new()))
        .build()
        .unwrap();
    presenter.present().unwrap();
    streams.take();
    (streams, presenter)
}

/// Stdout writes of one tick, without styling.
fn tick(streams: &RecordingStreams, presenter: &Presenter) -> Vec<String> {
    presenter.tick();
    streams
        .take_stdout()
        .iter()
        .map(|w| strip_ansi_escapes::strip_str(w))
        .collect()
}

/// The single rewritten line of a one-line frame, trimmed.
fn drawn(writes: &[String]) -> Option<String> {
    match writes {
        [erase, text, reposition] if erase == "eraseLine" => {
            assert_eq!(reposition, "cursorMove(-999,0)");
            Some(text.trim_end().to_string())
        }
        [reposition] => {
            assert_eq!(reposition, "cursorMove(-999,0)");
            None
        }
        other => panic!("unexpected frame: {other:?}"),
    }
}

#[test]
fn spinner_animates_then_settles() {
    let (streams, presenter) = presenter();
    let spinner = Arc::new(Spinner::new());
    presenter.append_document("spinner", Document::single(spinner.block()));

    assert_eq!(drawn(&tick(&streams, &presenter)).as_deref(), Some("⣷"));
    assert_eq!(drawn(&tick(&streams, &presenter)).as_deref(), Some("⣟"));
    assert_eq!(drawn(&tick(&streams, &presenter)).as_deref(), Some("⡿"));

    spinner.set_status(SpinnerStatus::Complete);
    assert_eq!(drawn(&tick(&streams, &presenter)).as_deref(), Some("✔"));
    // Final statuses stop the animation.
    assert_eq!(drawn(&tick(&streams, &presenter)), None);

    spinner.set_status(SpinnerStatus::Warning);
    assert_eq!(drawn(&tick(&streams, &presenter)).as_deref(), Some("⚠"));
    spinner.set_status(SpinnerStatus::Error);
    assert_eq!(drawn(&tick(&streams, &presenter)).as_deref(), Some("✖"));
    assert_eq!(spinner.status(), SpinnerStatus::Error);

    spinner.set_status(SpinnerStatus::Loading);
    let resumed = drawn(&tick(&streams, &presenter)).unwrap();
    assert!(liveterm_widgets::spinner::SQUARE.contains(&resumed.as_str()));
}

#[test]
fn spinner_padding_separates_neighbours() {
    let (streams, presenter) = presenter();
    let spinner = Arc::new(Spinner::new());
    presenter.append_document(
        "job",
        Document::new(vec![Row::new(vec![
            spinner.block(),
            liveterm_runtime::Block::text("building"),
        ])]),
    );
    assert_eq!(
        drawn(&tick(&streams, &presenter)).as_deref(),
        Some("⣷ building")
    );
}

#[test]
fn progress_bar_follows_progress() {
    let (streams, presenter) = presenter();
    let bar = Arc::new(ProgressBar::new());
    presenter.append_document("bar", Document::single(bar.block()));

    let first = drawn(&tick(&streams, &presenter)).unwrap();
    assert_eq!(first, format!("|{}| 0.00 %", "-".repeat(71)));

    bar.set_progress(50.0);
    assert_eq!(
        drawn(&tick(&streams, &presenter)).unwrap(),
        format!("|{}▏{}| 50.00 %", "█".repeat(35), "-".repeat(34))
    );

    // Same value, nothing to rewrite.
    bar.set_progress(50.0);
    assert_eq!(drawn(&tick(&streams, &presenter)), None);

    bar.set_progress(88.5);
    assert_eq!(
        drawn(&tick(&streams, &presenter)).unwrap(),
        format!("|{}▏{}| 88.50 %", "█".repeat(62), "-".repeat(7))
    );

    bar.set_progress(250.0);
    assert!((bar.progress() - 100.0).abs() < f64::EPSILON);
    assert_eq!(
        drawn(&tick(&streams, &presenter)).unwrap(),
        format!("|{}| 100.00 %", "█".repeat(69))
    );
}

#[test]
fn stopwatch_counts_forward() {
    let (streams, presenter) = presenter();
    let clock = Arc::new(ManualClock::new(0));
    let watch = Arc::new(Stopwatch::with_clock(clock.clone()).with_initial_time(0));
    presenter.append_document("watch", Document::single(watch.block()));

    let mut seen = Vec::new();
    for now in [
        0,
        SECOND,
        MINUTE + 5 * SECOND,
        HOUR + 8 * MINUTE + 5 * SECOND,
        DAY + HOUR + 8 * MINUTE + 5 * SECOND,
    ] {
        clock.set(now);
        seen.push(drawn(&tick(&streams, &presenter)).unwrap());
    }
    assert_eq!(
        seen,
        ["00s", "01s", "01m 05s", "01h 08m 05s", "01d 01h 08m 05s"]
    );
}

#[test]
fn stopwatch_counts_down() {
    let (streams, presenter) = presenter();
    let target = DAY + HOUR + 8 * MINUTE + 5 * SECOND;
    let clock = Arc::new(ManualClock::new(0));
    let watch = Arc::new(Stopwatch::with_clock(clock.clone()).with_target_time(target));
    presenter.append_document("watch", Document::single(watch.block()));

    let mut seen = Vec::new();
    for now in [
        0,
        SECOND,
        MINUTE + 5 * SECOND,
        HOUR + 8 * MINUTE,
        DAY + HOUR + 8 * MINUTE,
        target,
        target + 45_645_489_745,
    ] {
        clock.set(now);
        seen.push(drawn(&tick(&streams, &presenter)));
    }
    assert_eq!(
        seen,
        [
            Some("01d 01h 08m 05s".to_string()),
            Some("01d 01h 08m 04s".into()),
            Some("01d 01h 07m".into()),
            Some("01d 05s".into()),
            Some("05s".into()),
            Some("00s".into()),
            None,
        ]
    );
}

proptest! {
    #[test]
    fn filled_cells_track_progress(
        width in 3u16..120,
        a in 0.0f64..=100.0,
        b in 0.0f64..=100.0,
    ) {
        let options = BarOptions {
            show_caption: false,
            style: BarStyle::Sharp,
            ..BarOptions::default()
        };
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        let filled = |p: f64| render_bar(&options, p, width).chars().filter(|c| *c == '#').count();

        prop_assert!(filled(low) <= filled(high));

        let usable = f64::from(width - 2);
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let expected = (high / 100.0 * usable).round() as usize;
        prop_assert_eq!(filled(high), expected);
        prop_assert_eq!(render_bar(&options, high, width).chars().count(), usize::from(width));
    }
}
