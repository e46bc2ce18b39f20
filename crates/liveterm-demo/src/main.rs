#![forbid(unsafe_code)]

//! liveterm demo.
//!
//! A bordered greeting with a running stopwatch, a spinner and progress bar
//! for a pretend job, and a background thread that keeps logging through the
//! console while the region stays pinned at the bottom.
//!
//! Runs for `LIVETERM_DEMO_SECONDS` (default 10) seconds; Ctrl-C restores the
//! terminal early.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use liveterm::prelude::*;
use liveterm::{CaptureLayer, Presenter};
use tracing_subscriber::layer::SubscriberExt;

const AQUAMARINE: Color = Color::Rgb {
    r: 127,
    g: 255,
    b: 212,
};

fn run_for() -> Duration {
    let seconds = std::env::var("LIVETERM_DEMO_SECONDS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(10);
    Duration::from_secs(seconds)
}

fn main() -> liveterm::Result<()> {
    let presenter = Presenter::new(PresenterOptions::default())?;

    let subscriber = tracing_subscriber::registry().with(CaptureLayer::for_presenter(&presenter));
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("tracing subscriber already installed; demo events go elsewhere");
    }

    presenter.capture_output();

    // Only one presenter may drive the terminal; this one warns and idles.
    let shadow = Presenter::new(PresenterOptions::default())?;
    debug_assert!(!shadow.is_live());

    let stopwatch = Arc::new(Stopwatch::new());
    presenter.append_document(
        "greeting",
        Document::new(vec![
            Row::new(vec![Block::text("Hello world!"), stopwatch.block()])
                .with_border(true)
                .with_border_color(AQUAMARINE),
        ]),
    );

    let spinner = Arc::new(Spinner::new());
    let bar = Arc::new(ProgressBar::new().with_color(AQUAMARINE));
    presenter.append_document(
        "job",
        Document::new(vec![Row::new(vec![
            spinner.block(),
            Block::Static(
                BlockDescriptor::new("crunching")
                    .with_width(BlockWidth::Fixed(12))
                    .with_style(TextStyle::DIM),
            ),
            bar.block(),
        ])]),
    );

    presenter.present()?;
    tracing::info!(target: "demo", "presenting");

    let running = Arc::new(AtomicBool::new(true));
    let logger = {
        let running = Arc::clone(&running);
        thread::Builder::new()
            .name("demo-logger".into())
            .spawn(move || {
                while running.load(Ordering::Relaxed) {
                    thread::sleep(Duration::from_millis(fastrand::u64(200..1200)));
                    console_warn!("{{ random: {} }}", fastrand::f64());
                    console_error!("Random error");
                    tracing::info!(target: "demo", random = fastrand::f64(), "table");
                }
            })?
    };

    let total = run_for();
    let started = Instant::now();
    while started.elapsed() < total {
        let done = started.elapsed().as_secs_f64() / total.as_secs_f64() * 100.0;
        bar.set_progress(done);
        thread::sleep(Duration::from_millis(100));
    }
    bar.set_progress(100.0);
    spinner.set_status(SpinnerStatus::Complete);

    console_info!("Stopping...");
    running.store(false, Ordering::Relaxed);
    presenter.restore().wait();
    if logger.join().is_err() {
        eprintln!("logger thread panicked");
    }
    Ok(())
}
