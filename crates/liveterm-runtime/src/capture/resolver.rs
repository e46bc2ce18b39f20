#![forbid(unsafe_code)]

//! Origin attribution for intercepted writes.
//!
//! Console-style calls ([`console_log!`](crate::console_log) and friends, and
//! the tracing capture layer) announce themselves by entering a
//! [`CallSite`] scope on the current thread before they write. A write that
//! arrives inside such a scope is a console call and can be attributed; one
//! that arrives outside is an ordinary write and passes through untouched.
//!
//! Attribution is best effort. [`NoopResolver`] never attributes anything,
//! which turns every intercepted write into a passthrough.

use std::cell::Cell;

use super::entry::Origin;

/// Static description of a console call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallSite {
    pub printer: &'static str,
    pub caller: &'static str,
    pub file: &'static str,
    pub line: u32,
}

thread_local! {
    static CURRENT: Cell<Option<CallSite>> = const { Cell::new(None) };
}

impl CallSite {
    /// Mark the current thread as inside this call until the guard drops.
    #[must_use = "the call site is only active while the scope guard lives"]
    pub fn enter(self) -> CallSiteScope {
        let previous = CURRENT.with(|cell| cell.replace(Some(self)));
        CallSiteScope { previous }
    }

    /// The innermost call site active on this thread.
    #[must_use]
    pub fn current() -> Option<Self> {
        CURRENT.with(Cell::get)
    }

    /// The origin this call site attributes writes to.
    #[must_use]
    pub fn origin(&self) -> Origin {
        let location = if self.file.is_empty() {
            String::new()
        } else {
            format!("{}:{}", self.file, self.line)
        };
        Origin::new(self.printer, self.caller, location)
    }
}

/// Restores the previous call site on drop.
#[derive(Debug)]
pub struct CallSiteScope {
    previous: Option<CallSite>,
}

impl Drop for CallSiteScope {
    fn drop(&mut self) {
        CURRENT.with(|cell| cell.set(self.previous));
    }
}

/// Decides whether a write is a console call, and where it came from.
pub trait OriginResolver: Send + Sync {
    /// `None` means "not a console call": the write passes through.
    fn resolve(&self) -> Option<Origin>;
}

/// Attributes writes made inside a [`CallSite`] scope.
#[derive(Debug, Clone, Copy, Default)]
pub struct CallSiteResolver;

impl OriginResolver for CallSiteResolver {
    fn resolve(&self) -> Option<Origin> {
        CallSite::current().map(|site| site.origin())
    }
}

/// Never attributes; every write passes through.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopResolver;

impl OriginResolver for NoopResolver {
    fn resolve(&self) -> Option<Origin> {
        None
    }
}

/// Build a [`CallSite`] for the invoking location.
#[macro_export]
macro_rules! call_site {
    ($printer:expr) => {
        $crate::capture::CallSite {
            printer: $printer,
            caller: module_path!(),
            file: file!(),
            line: line!(),
        }
    };
}
