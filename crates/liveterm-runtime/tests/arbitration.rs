#![forbid(unsafe_code)]

//! Single-instance arbitration on the process-wide arbiter.
//!
//! Lives in its own test binary: the global claim is never released.

use std::sync::Arc;

use liveterm_core::StreamKind;
use liveterm_core::testing::{MarkerCodes, RecordingStreams};
use liveterm_runtime::{
    Block, DUPLICATE_WARNING, Document, Presenter, PresenterOptions, PresenterState,
    TerminalArbiter, global,
};

fn build(streams: &Arc<RecordingStreams>) -> Presenter {
    Presenter::builder()
        .with_options(PresenterOptions::manual().with_restore_on_panic(false))
        .with_codes(Arc::new(MarkerCodes::default()))
        .with_streams(streams.clone())
        .build()
        .unwrap()
}

#[test]
fn only_the_first_presenter_is_live() {
    let first_streams = Arc::new(RecordingStreams::new());
    let first = build(&first_streams);
    assert!(first.is_live());
    assert!(TerminalArbiter::global().is_claimed());
    assert!(first_streams.writes().is_empty());

    let second_streams = Arc::new(RecordingStreams::new());
    let second = build(&second_streams);
    assert!(!second.is_live());
    assert_eq!(
        second_streams.writes_to(StreamKind::Stderr),
        [format!("{DUPLICATE_WARNING}\n")]
    );

    // Everything on the shadow instance is inert.
    second_streams.take();
    second.present().unwrap();
    assert!(!second.append_document("x", Document::single(Block::text("x"))));
    assert!(second.restore().is_complete());
    assert!(!second.tick());
    assert!(!second.capture_output());
    second.print("ignored").unwrap();
    assert_eq!(second.state(), PresenterState::Idle);
    assert!(second_streams.writes().is_empty());

    // The warning is printed once per arbiter.
    let third_streams = Arc::new(RecordingStreams::new());
    let third = build(&third_streams);
    assert!(!third.is_live());
    assert!(third_streams.writes().is_empty());

    // The module-level presenter loses too.
    assert!(!global::presenter().is_live());
    assert!(!global::append_document("y", Document::default()));

    // The live one is unaffected.
    first.present().unwrap();
    assert_eq!(first_streams.take_stdout(), ["cursorHide"]);
    first.restore();
    first.tick();
    assert_eq!(first.state(), PresenterState::Idle);
}
