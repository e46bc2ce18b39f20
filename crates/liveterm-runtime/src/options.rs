#![forbid(unsafe_code)]

//! Presenter configuration.

use std::time::Duration;

use liveterm_core::terminal;

use crate::error::{PresenterError, Result};

/// Environment variable that disables live rendering when set (any value).
pub const DISABLE_ENV: &str = "LIVETERM_DISABLE";

/// Who drives the render loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scheduler {
    /// A dedicated ticker thread at the configured frame rate.
    #[default]
    Thread,
    /// The host calls [`Presenter::tick`](crate::Presenter::tick) itself.
    ///
    /// Used by tests and by hosts that already own a frame clock.
    Manual,
}

/// Options for one presenter run.
///
/// Options are fixed while the presenter is running; they can only be
/// replaced while it is idle.
///
/// # Example
///
/// ```
/// use liveterm_runtime::PresenterOptions;
///
/// let options = PresenterOptions::default()
///     .with_frames_per_second(60)
///     .with_clear_on_start(true);
/// assert_eq!(options.frame_duration().as_millis(), 16);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresenterOptions {
    /// Clear the screen and scrollback once when presenting starts.
    pub clear_on_start: bool,

    /// Render at all. Defaults to `true` only when stdout is a terminal and
    /// [`DISABLE_ENV`] is unset; when `false`, `present` is a no-op and
    /// output is never captured.
    pub enabled: bool,

    /// Prefix captured console output with a `console.<printer> at <caller>
    /// <path>` header.
    pub decorate_console: bool,

    /// Ticks per second. Must be at least 1.
    pub frames_per_second: u32,

    /// Show header paths relative to the working directory.
    pub relative_decoration_path: bool,

    /// Colour header printer names by level instead of by stream.
    pub level_colors: bool,

    /// Captured entries printed per tick. `None` drains everything.
    pub logs_per_tick: Option<usize>,

    /// Restore the terminal from the panic hook.
    pub restore_on_panic: bool,

    /// Restore the terminal and exit on SIGINT/SIGTERM.
    pub restore_on_signal: bool,

    /// Re-lay out every document when the terminal is resized.
    pub follow_resize: bool,

    pub scheduler: Scheduler,
}

impl Default for PresenterOptions {
    fn default() -> Self {
        Self {
            clear_on_start: false,
            enabled: terminal::stdout_is_tty() && std::env::var_os(DISABLE_ENV).is_none(),
            decorate_console: true,
            frames_per_second: 30,
            relative_decoration_path: true,
            level_colors: false,
            logs_per_tick: None,
            restore_on_panic: true,
            restore_on_signal: true,
            follow_resize: true,
            scheduler: Scheduler::Thread,
        }
    }
}

impl PresenterOptions {
    /// Options for tests and embedding: enabled, manually ticked, and with
    /// no process-level hooks (signals, resize).
    #[must_use]
    pub fn manual() -> Self {
        Self {
            enabled: true,
            restore_on_signal: false,
            follow_resize: false,
            scheduler: Scheduler::Manual,
            ..Self::default()
        }
    }

    /// Interval between ticks: `1000 / frames_per_second` milliseconds.
    #[must_use]
    pub fn frame_duration(&self) -> Duration {
        Duration::from_millis(1000 / u64::from(self.frames_per_second.max(1)))
    }

    /// Reject configurations that cannot run.
    pub fn validate(&self) -> Result<()> {
        if self.frames_per_second == 0 {
            return Err(PresenterError::InvalidFrameRate(self.frames_per_second));
        }
        Ok(())
    }

    #[must_use]
    pub fn with_clear_on_start(mut self, clear: bool) -> Self {
        self.clear_on_start = clear;
        self
    }

    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    #[must_use]
    pub fn with_decorate_console(mut self, decorate: bool) -> Self {
        self.decorate_console = decorate;
        self
    }

    #[must_use]
    pub fn with_frames_per_second(mut self, fps: u32) -> Self {
        self.frames_per_second = fps;
        self
    }

    #[must_use]
    pub fn with_relative_decoration_path(mut self, relative: bool) -> Self {
        self.relative_decoration_path = relative;
        self
    }

    #[must_use]
    pub fn with_level_colors(mut self, level_colors: bool) -> Self {
        self.level_colors = level_colors;
        self
    }

    /// Pace captured output to `limit` entries per tick (`None` = all).
    #[must_use]
    pub fn with_logs_per_tick(mut self, limit: Option<usize>) -> Self {
        self.logs_per_tick = limit;
        self
    }

    #[must_use]
    pub fn with_restore_on_panic(mut self, restore: bool) -> Self {
        self.restore_on_panic = restore;
        self
    }

    #[must_use]
    pub fn with_restore_on_signal(mut self, restore: bool) -> Self {
        self.restore_on_signal = restore;
        self
    }

    #[must_use]
    pub fn with_follow_resize(mut self, follow: bool) -> Self {
        self.follow_resize = follow;
        self
    }

    #[must_use]
    pub fn with_scheduler(mut self, scheduler: Scheduler) -> Self {
        self.scheduler = scheduler;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let options = PresenterOptions::default();
        assert!(!options.clear_on_start);
        assert!(options.decorate_console);
        assert_eq!(options.frames_per_second, 30);
        assert!(options.relative_decoration_path);
        assert_eq!(options.logs_per_tick, None);
        assert_eq!(options.scheduler, Scheduler::Thread);
    }

    #[test]
    fn frame_duration_follows_rate() {
        let options = PresenterOptions::default();
        assert_eq!(options.frame_duration(), Duration::from_millis(33));
        let options = options.with_frames_per_second(10);
        assert_eq!(options.frame_duration(), Duration::from_millis(100));
    }

    #[test]
    fn zero_rate_is_rejected() {
        let options = PresenterOptions::manual().with_frames_per_second(0);
        assert!(matches!(
            options.validate(),
            Err(PresenterError::InvalidFrameRate(0))
        ));
        assert!(PresenterOptions::manual().validate().is_ok());
    }

    #[test]
    fn manual_options_skip_process_hooks() {
        let options = PresenterOptions::manual();
        assert!(options.enabled);
        assert!(!options.restore_on_signal);
        assert!(!options.follow_resize);
        assert_eq!(options.scheduler, Scheduler::Manual);
    }
}
