#![forbid(unsafe_code)]

//! Ready-made animated blocks.
//!
//! Each widget is a [`BlockController`](liveterm_runtime::BlockController):
//! wrap it in an `Arc`, keep a handle to drive it, and put
//! [`block()`](Spinner::block) into a document row.
//!
//! | Widget | Shows |
//! |--------|-------|
//! | [`Spinner`] | An animated glyph, then a final status mark |
//! | [`ProgressBar`] | A bar spanning its block with a caption |
//! | [`Stopwatch`] | Elapsed time, or a countdown to a target |

pub mod clock;
pub mod progress;
pub mod spinner;
pub mod stopwatch;

pub use clock::{Clock, ManualClock, SystemClock};
pub use progress::{BarOptions, BarStyle, Caption, CaptionSide, ProgressBar, render_bar};
pub use spinner::{Side, Spinner, SpinnerStatus, SpinnerStyle, frame_index};
pub use stopwatch::{Stopwatch, format_span};
