#![forbid(unsafe_code)]

//! Fatal-path terminal restoration.
//!
//! A live region hides the cursor and owns the bottom of the screen. If the
//! process dies in the middle of that (a panic, SIGINT, SIGTERM) the shell
//! would be left without a cursor. This module keeps a process-wide list of
//! restore actions and runs them from:
//!
//! - a panic hook installed once per process, chained in front of whatever
//!   hook was present before, for panics that end the process;
//! - a signal thread that, on SIGINT/SIGTERM, restores and then exits with
//!   `128 + signal`.
//!
//! Resize notifications (SIGWINCH) are exposed separately through
//! [`ResizeWatch`], a flag the render loop polls once per frame.
//!
//! # Contract
//!
//! Restore actions must not take locks that the panicking or signalled code
//! could be holding. They should write directly to the raw streams and return.

use std::io;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

#[cfg(unix)]
use signal_hook::consts::signal::{SIGINT, SIGTERM, SIGWINCH};
#[cfg(unix)]
use signal_hook::iterator::Signals;

/// Name given to the render ticker thread.
///
/// A panic on a thread with this name exits the process after restoring,
/// since nothing is left to drive the frame loop.
pub const TICKER_THREAD_NAME: &str = "liveterm-ticker";

/// A cleanup callback run on the fatal path.
pub type RestoreAction = Arc<dyn Fn() + Send + Sync>;

static ACTIONS: Mutex<Vec<(u64, RestoreAction)>> = Mutex::new(Vec::new());
static NEXT_ACTION_ID: AtomicU64 = AtomicU64::new(1);

/// Registration handle for a restore action. Dropping it unregisters.
#[derive(Debug)]
#[must_use = "dropping the guard unregisters the restore action"]
pub struct RestoreGuard {
    id: u64,
}

/// Register an action to run if the process panics or is signalled.
pub fn register_restore(action: RestoreAction) -> RestoreGuard {
    let id = NEXT_ACTION_ID.fetch_add(1, Ordering::Relaxed);
    ACTIONS
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .push((id, action));
    RestoreGuard { id }
}

impl Drop for RestoreGuard {
    fn drop(&mut self) {
        ACTIONS
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|(id, _)| *id != self.id);
    }
}

/// Run every registered restore action, at most once each.
///
/// Actions are removed before they run so a second fatal event (a panic
/// inside an action, a signal arriving during a panic) does not repeat them.
pub fn run_restore_actions() {
    let actions = std::mem::take(&mut *ACTIONS.lock().unwrap_or_else(PoisonError::into_inner));
    for (_, action) in actions {
        action();
    }
}

/// Number of currently registered actions.
#[must_use]
pub fn registered_restore_actions() -> usize {
    ACTIONS.lock().unwrap_or_else(PoisonError::into_inner).len()
}

/// Whether a panic on the thread named `thread` ends the process.
///
/// Only the main thread and the ticker take the process down; any other
/// thread's panic can be caught by a `join`, and the region has to stay
/// intact for it. Under `panic = "abort"` every panic is fatal.
#[must_use]
pub fn panic_is_fatal(thread: Option<&str>) -> bool {
    cfg!(panic = "abort") || matches!(thread, Some("main" | TICKER_THREAD_NAME))
}

/// Install the restoring panic hook. Idempotent.
///
/// Restore actions run only for panics that end the process; see
/// [`panic_is_fatal`].
pub fn install_panic_hook() {
    static HOOK: OnceLock<()> = OnceLock::new();
    HOOK.get_or_init(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            let current = std::thread::current();
            if panic_is_fatal(current.name()) {
                run_restore_actions();
            }
            previous(info);
            if current.name() == Some(TICKER_THREAD_NAME) {
                std::process::exit(1);
            }
        }));
    });
}

// ============================================================================
// Termination signals
// ============================================================================

/// Restores and exits on SIGINT/SIGTERM while alive.
#[cfg(unix)]
#[derive(Debug)]
pub struct SignalGuard {
    handle: signal_hook::iterator::Handle,
    thread: Option<std::thread::JoinHandle<()>>,
}

#[cfg(unix)]
impl SignalGuard {
    /// Start listening for termination signals.
    pub fn new() -> io::Result<Self> {
        let mut signals = Signals::new([SIGINT, SIGTERM]).map_err(io::Error::other)?;
        let handle = signals.handle();
        let thread = std::thread::Builder::new()
            .name("liveterm-signals".into())
            .spawn(move || {
                if let Some(signal) = signals.forever().next() {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(signal, "termination signal received, restoring terminal");
                    run_restore_actions();
                    std::process::exit(128 + signal);
                }
            })?;
        Ok(Self {
            handle,
            thread: Some(thread),
        })
    }
}

#[cfg(unix)]
impl Drop for SignalGuard {
    fn drop(&mut self) {
        self.handle.close();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

/// Termination signals are not intercepted on this platform.
#[cfg(not(unix))]
#[derive(Debug)]
pub struct SignalGuard;

#[cfg(not(unix))]
impl SignalGuard {
    /// No-op on this platform.
    pub fn new() -> io::Result<Self> {
        Ok(Self)
    }
}

// ============================================================================
// Resize notifications
// ============================================================================

/// Level-triggered terminal resize flag.
#[derive(Debug)]
pub struct ResizeWatch {
    flag: Arc<AtomicBool>,
    #[cfg(unix)]
    id: Option<signal_hook::SigId>,
}

impl ResizeWatch {
    /// Watch SIGWINCH (unix). Elsewhere the flag only changes via [`trigger`].
    ///
    /// [`trigger`]: Self::trigger
    pub fn new() -> io::Result<Self> {
        let flag = Arc::new(AtomicBool::new(false));
        #[cfg(unix)]
        {
            let id = signal_hook::flag::register(SIGWINCH, Arc::clone(&flag))
                .map_err(io::Error::other)?;
            Ok(Self { flag, id: Some(id) })
        }
        #[cfg(not(unix))]
        {
            Ok(Self { flag })
        }
    }

    /// A watch that is never raised by the OS.
    #[must_use]
    pub fn manual() -> Self {
        Self {
            flag: Arc::new(AtomicBool::new(false)),
            #[cfg(unix)]
            id: None,
        }
    }

    /// Raise the flag as if the terminal had been resized.
    pub fn trigger(&self) {
        self.flag.store(true, Ordering::Release);
    }

    /// Whether a resize happened since the last call. Clears the flag.
    pub fn take(&self) -> bool {
        self.flag.swap(false, Ordering::AcqRel)
    }
}

#[cfg(unix)]
impl Drop for ResizeWatch {
    fn drop(&mut self) {
        if let Some(id) = self.id.take() {
            signal_hook::low_level::unregister(id);
        }
    }
}
