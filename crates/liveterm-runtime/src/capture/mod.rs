#![forbid(unsafe_code)]

//! Console capture: interception, attribution, queueing, and printing.
//!
//! # Data flow
//!
//! ```text
//! console_log!(..) ──► Console ──► InterceptingWriter ──► OriginResolver
//!                                        │                     │
//!                              unattributed/binary        attributed
//!                                        ▼                     ▼
//!                                   RawStreams ◄── EntryPrinter ◄── CaptureQueue
//! ```
//!
//! The queue holds entries while a presenter is live and the render loop
//! prints them between frames; otherwise entries print immediately.

mod console;
mod decorate;
mod entry;
mod queue;
mod resolver;

pub use console::{Console, ConsoleStream, ConsoleWriter, DirectWriter, InterceptingWriter};
pub use decorate::{Decoration, EntryPrinter};
pub use entry::{CaptureEntry, Origin};
pub use queue::{CaptureQueue, print_all};
pub use resolver::{CallSite, CallSiteResolver, CallSiteScope, NoopResolver, OriginResolver};

#[doc(hidden)]
#[macro_export]
macro_rules! __console_call {
    ($printer:literal, $stream:ident, $($arg:tt)*) => {
        $crate::capture::Console::global().print_call(
            $crate::call_site!($printer),
            $crate::__private::StreamKind::$stream,
            format_args!($($arg)*),
        )
    };
}

/// `console.log`: a line on stdout through the process console.
///
/// While a presenter is live the line is queued and printed between frames,
/// decorated with its origin.
#[macro_export]
macro_rules! console_log {
    ($($arg:tt)*) => { $crate::__console_call!("log", Stdout, $($arg)*) };
}

/// `console.info`: a line on stdout through the process console.
#[macro_export]
macro_rules! console_info {
    ($($arg:tt)*) => { $crate::__console_call!("info", Stdout, $($arg)*) };
}

/// `console.debug`: a line on stdout through the process console.
#[macro_export]
macro_rules! console_debug {
    ($($arg:tt)*) => { $crate::__console_call!("debug", Stdout, $($arg)*) };
}

/// `console.warn`: a line on stderr through the process console.
#[macro_export]
macro_rules! console_warn {
    ($($arg:tt)*) => { $crate::__console_call!("warn", Stderr, $($arg)*) };
}

/// `console.error`: a line on stderr through the process console.
#[macro_export]
macro_rules! console_error {
    ($($arg:tt)*) => { $crate::__console_call!("error", Stderr, $($arg)*) };
}
