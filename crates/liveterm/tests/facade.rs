#![forbid(unsafe_code)]

//! The prelude is enough to build, present, and restore a document.

use std::sync::Arc;

use liveterm::core::testing::{MarkerCodes, RecordingStreams};
use liveterm::prelude::*;
use liveterm::{PresenterError, TerminalArbiter};

fn presenter(streams: &Arc<RecordingStreams>) -> Presenter {
    Presenter::builder()
        .with_options(PresenterOptions::manual().with_restore_on_panic(false))
        .with_codes(Arc::new(MarkerCodes::new(20)))
        .with_streams(streams.clone())
        .with_arbiter(Arc::new(TerminalArbiter::new()))
        .build()
        .unwrap()
}

#[test]
fn prelude_drives_a_presenter() {
    let streams = Arc::new(RecordingStreams::new());
    let presenter = presenter(&streams);
    let spinner = Arc::new(Spinner::new());

    presenter.append_document(
        "job",
        Document::new(vec![Row::new(vec![spinner.block(), Block::text("job")])]),
    );
    presenter.present().unwrap();
    presenter.tick();
    spinner.set_status(SpinnerStatus::Complete);
    presenter.tick();
    let handle = presenter.restore();
    presenter.tick();
    assert!(handle.is_complete());
    assert_eq!(streams.take_stdout().last().map(String::as_str), Some("cursorShow"));
}

#[test]
fn errors_convert_into_the_facade_error() {
    fn busy() -> Result<()> {
        Err::<(), _>(PresenterError::Busy)?;
        Ok(())
    }
    let err = busy().unwrap_err();
    assert!(matches!(err, Error::Presenter(PresenterError::Busy)));
    assert!(std::error::Error::source(&err).is_some());

    let io: Error = std::io::Error::other("closed").into();
    assert_eq!(io.to_string(), "closed");
}
