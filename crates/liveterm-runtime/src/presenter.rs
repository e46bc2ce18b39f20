#![forbid(unsafe_code)]

//! Presenter lifecycle.
//!
//! A [`Presenter`] owns the live region: it captures console output, ticks
//! the registered documents at a fixed rate, and restores the terminal when
//! asked to stop or when the process dies.
//!
//! # Lifecycle
//!
//! ```text
//!            present()             restore()             next tick
//!   Idle ───────────────► Presenting ───────► Stopping ───────────► Idle
//!    ▲                                                                │
//!    └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Teardown happens on the tick after `restore`, so a restore requested from
//! any thread is serialized with rendering. The [`RestoreHandle`] returned by
//! `restore` completes once the terminal has been handed back.
//!
//! # Single instance
//!
//! Only the first presenter built against a [`TerminalArbiter`] is live.
//! Later ones print one warning and then ignore every call, so two render
//! loops never fight over the same terminal.
//!
//! # Locking
//!
//! Presenter methods must not be called from inside
//! [`BlockController::request_update`](crate::BlockController::request_update):
//! the tick holds the presenter lock while controllers run.

use std::future::Future;
use std::io;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, LazyLock, Mutex, MutexGuard, PoisonError, Weak};
use std::task::{Context, Poll, Waker};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use liveterm_core::session::{
    self, RestoreAction, RestoreGuard, ResizeWatch, SignalGuard, TICKER_THREAD_NAME,
};
use liveterm_core::{AnsiCodes, ControlCodes, RawStreams, StreamKind};

use crate::capture::{
    CallSiteResolver, CaptureQueue, Console, Decoration, EntryPrinter, OriginResolver, print_all,
};
use crate::controller::FrameTick;
use crate::document::Document;
use crate::error::Result;
use crate::options::{PresenterOptions, Scheduler};
use crate::registry::{DocumentRegistry, RendererFactory, text_document_factory};
use crate::render::RenderLoop;

/// Printed on stderr, once per arbiter, when a second presenter is built.
pub const DUPLICATE_WARNING: &str = "liveterm presenter has already been instantiated somewhere \
     else. To avoid conflicts, new instances will not do anything.";

/// Where a presenter is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PresenterState {
    #[default]
    Idle,
    Presenting,
    /// Restore requested; teardown runs on the next tick.
    Stopping,
}

// ============================================================================
// Arbitration
// ============================================================================

/// Decides which presenter owns the terminal.
///
/// The process-wide arbiter ([`TerminalArbiter::global`]) is what presenters
/// use unless built with another one. Claims are never released.
#[derive(Debug, Default)]
pub struct TerminalArbiter {
    claimed: AtomicBool,
    warned: AtomicBool,
}

static GLOBAL_ARBITER: LazyLock<Arc<TerminalArbiter>> =
    LazyLock::new(|| Arc::new(TerminalArbiter::new()));

impl TerminalArbiter {
    /// A fresh arbiter with no owner.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide arbiter.
    #[must_use]
    pub fn global() -> Arc<Self> {
        Arc::clone(&GLOBAL_ARBITER)
    }

    #[must_use]
    pub fn is_claimed(&self) -> bool {
        self.claimed.load(Ordering::Acquire)
    }

    fn claim(&self) -> bool {
        self.claimed
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    fn first_warning(&self) -> bool {
        !self.warned.swap(true, Ordering::AcqRel)
    }
}

// ============================================================================
// Restore completion
// ============================================================================

#[derive(Debug, Default)]
struct CompletionState {
    done: bool,
    wakers: Vec<Waker>,
}

#[derive(Debug, Default)]
struct Completion {
    state: Mutex<CompletionState>,
    cond: Condvar,
}

/// Completes once the terminal has been restored.
///
/// Block on it with [`wait`](Self::wait) or `.await` it; clones observe the
/// same completion.
#[derive(Debug, Clone, Default)]
pub struct RestoreHandle {
    inner: Arc<Completion>,
}

impl RestoreHandle {
    fn pending() -> Self {
        Self::default()
    }

    fn completed() -> Self {
        let handle = Self::default();
        handle.complete();
        handle
    }

    fn lock(&self) -> MutexGuard<'_, CompletionState> {
        self.inner.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn complete(&self) {
        let wakers = {
            let mut state = self.lock();
            state.done = true;
            std::mem::take(&mut state.wakers)
        };
        self.inner.cond.notify_all();
        for waker in wakers {
            waker.wake();
        }
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.lock().done
    }

    /// Block until restored.
    pub fn wait(&self) {
        let mut state = self.lock();
        while !state.done {
            state = self
                .inner
                .cond
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Block until restored or `timeout` elapses. Returns whether restored.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut state = self.lock();
        while !state.done {
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            state = self
                .inner
                .cond
                .wait_timeout(state, deadline - now)
                .unwrap_or_else(PoisonError::into_inner)
                .0;
        }
        true
    }
}

impl Future for RestoreHandle {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        let mut state = self.lock();
        if state.done {
            return Poll::Ready(());
        }
        if !state.wakers.iter().any(|w| w.will_wake(cx.waker())) {
            state.wakers.push(cx.waker().clone());
        }
        Poll::Pending
    }
}

// ============================================================================
// Presenter
// ============================================================================

struct Engine {
    options: PresenterOptions,
    state: PresenterState,
    registry: DocumentRegistry,
    render: RenderLoop,
    frame: u64,
    screen_cleared: bool,
    session: u64,
    pending: Option<RestoreHandle>,
    restore_guard: Option<RestoreGuard>,
    signal_guard: Option<SignalGuard>,
    resize: Option<ResizeWatch>,
}

struct Shared {
    engine: Mutex<Engine>,
    queue: Arc<CaptureQueue>,
    console: Arc<Console>,
    codes: Arc<dyn ControlCodes>,
    streams: Arc<dyn RawStreams>,
    resolver: Arc<dyn OriginResolver>,
    factory: RendererFactory,
}

/// Owner of the live region.
///
/// # Example
///
/// ```no_run
/// use liveterm_runtime::{Block, Document, Presenter, PresenterOptions};
///
/// let presenter = Presenter::new(PresenterOptions::default())?;
/// presenter.append_document("status", Document::single(Block::text("working")));
/// presenter.present()?;
/// // ...
/// presenter.restore().wait();
/// # Ok::<(), liveterm_runtime::PresenterError>(())
/// ```
pub struct Presenter {
    live: bool,
    shared: Arc<Shared>,
    ticker: Mutex<Option<JoinHandle<()>>>,
}

impl std::fmt::Debug for Presenter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Presenter")
            .field("live", &self.live)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

fn decoration_for(options: &PresenterOptions) -> Decoration {
    Decoration {
        enabled: options.decorate_console,
        relative_paths: options.relative_decoration_path,
        level_colors: options.level_colors,
    }
}

impl Presenter {
    /// A presenter on the real terminal, arbitrated process-wide.
    pub fn new(options: PresenterOptions) -> Result<Self> {
        Self::builder().with_options(options).build()
    }

    #[must_use]
    pub fn builder() -> PresenterBuilder {
        PresenterBuilder::default()
    }

    /// Whether this instance won arbitration. A non-live presenter ignores
    /// every call.
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.live
    }

    #[must_use]
    pub fn state(&self) -> PresenterState {
        self.shared.lock().state
    }

    #[must_use]
    pub fn options(&self) -> PresenterOptions {
        self.shared.lock().options.clone()
    }

    /// The queue captured output waits in while presenting.
    #[must_use]
    pub fn queue(&self) -> &Arc<CaptureQueue> {
        &self.shared.queue
    }

    #[must_use]
    pub fn console(&self) -> &Arc<Console> {
        &self.shared.console
    }

    /// Frames rendered in the current session.
    #[must_use]
    pub fn frame(&self) -> u64 {
        self.shared.lock().frame
    }

    /// Replace the options. Only allowed while idle.
    pub fn configure(&self, options: PresenterOptions) -> Result<()> {
        options.validate()?;
        if !self.live {
            return Ok(());
        }
        let mut engine = self.shared.lock();
        if engine.state != PresenterState::Idle {
            return Err(crate::PresenterError::Busy);
        }
        self.shared.queue.printer().set_decoration(decoration_for(&options));
        engine.options = options;
        Ok(())
    }

    /// Take over the terminal and start rendering.
    ///
    /// No-op if disabled, already presenting, or not live.
    pub fn present(&self) -> Result<()> {
        if !self.live {
            return Ok(());
        }
        let shared = &self.shared;
        let mut guard = shared.lock();
        let engine = &mut *guard;
        if !engine.options.enabled || engine.state != PresenterState::Idle {
            return Ok(());
        }
        engine.options.validate()?;
        let options = engine.options.clone();

        engine.state = PresenterState::Presenting;
        engine.session += 1;
        engine.frame = 0;
        engine.render.reset();
        shared.queue.hold();
        shared
            .console
            .capture(Arc::clone(&shared.queue), Arc::clone(&shared.resolver));

        if options.restore_on_panic || options.restore_on_signal {
            engine.restore_guard = Some(session::register_restore(shared.restore_action()));
        }
        if options.restore_on_panic {
            session::install_panic_hook();
        }
        if options.restore_on_signal {
            match SignalGuard::new() {
                Ok(guard) => engine.signal_guard = Some(guard),
                Err(err) => tracing::warn!(error = %err, "termination signals not intercepted"),
            }
        }
        if options.follow_resize {
            match ResizeWatch::new() {
                Ok(watch) => engine.resize = Some(watch),
                Err(err) => tracing::warn!(error = %err, "terminal resizes not followed"),
            }
        }

        let written = shared.begin(engine, options.clear_on_start);
        tracing::info!(
            fps = options.frames_per_second,
            documents = engine.registry.len(),
            "presenting"
        );

        let spawned = match options.scheduler {
            Scheduler::Manual => Ok(()),
            Scheduler::Thread => self.spawn_ticker(engine.session, options.frame_duration()),
        };
        if let Err(err) = written.and(spawned) {
            if let Err(teardown) = shared.teardown(engine) {
                tracing::debug!(error = %teardown, "teardown after failed start");
            }
            return Err(err.into());
        }
        Ok(())
    }

    fn spawn_ticker(&self, session: u64, period: Duration) -> io::Result<()> {
        let shared = Arc::downgrade(&self.shared);
        let handle = std::thread::Builder::new()
            .name(TICKER_THREAD_NAME.into())
            .spawn(move || run_ticker(&shared, session, period))?;
        // A previous session's ticker exits on its own once it sees the
        // session change.
        *self.ticker.lock().unwrap_or_else(PoisonError::into_inner) = Some(handle);
        Ok(())
    }

    /// Ask the presenter to hand the terminal back.
    ///
    /// Teardown runs on the next tick; with [`Scheduler::Manual`] that is the
    /// next call to [`tick`](Self::tick). Calling `restore` again while
    /// stopping returns the same handle; when idle, a completed one.
    pub fn restore(&self) -> RestoreHandle {
        if !self.live {
            return RestoreHandle::completed();
        }
        let mut engine = self.shared.lock();
        match engine.state {
            PresenterState::Idle => RestoreHandle::completed(),
            PresenterState::Stopping => engine
                .pending
                .clone()
                .unwrap_or_else(RestoreHandle::completed),
            PresenterState::Presenting => {
                engine.state = PresenterState::Stopping;
                let handle = RestoreHandle::pending();
                engine.pending = Some(handle.clone());
                tracing::debug!("restore requested");
                handle
            }
        }
    }

    /// Run one tick on the caller's thread. Returns whether the presenter is
    /// still presenting afterwards.
    pub fn tick(&self) -> bool {
        self.live && self.shared.tick(None)
    }

    /// Add a document below the existing ones. Returns `false` if the id is
    /// taken.
    pub fn append_document(&self, id: impl Into<String>, document: Document) -> bool {
        self.live && self.shared.lock().registry.append(id, document)
    }

    /// Add a document above the existing ones. Returns `false` if the id is
    /// taken.
    pub fn prepend_document(&self, id: impl Into<String>, document: Document) -> bool {
        self.live && self.shared.lock().registry.prepend(id, document)
    }

    /// Replace a document, keeping its position. Returns `false` if the id is
    /// unknown.
    pub fn update_document(&self, id: &str, document: Document) -> bool {
        self.live && self.shared.lock().registry.update(id, document)
    }

    pub fn remove_document(&self, id: &str) -> bool {
        self.live && self.shared.lock().registry.remove(id)
    }

    pub fn clear_documents(&self) {
        if self.live {
            self.shared.lock().registry.clear();
        }
    }

    #[must_use]
    pub fn document_ids(&self) -> Vec<String> {
        if !self.live {
            return Vec::new();
        }
        self.shared.lock().registry.ids().to_vec()
    }

    /// Print text above the live region, undecorated. Printed immediately
    /// while idle.
    pub fn print(&self, text: impl Into<String>) -> Result<()> {
        if !self.live {
            return Ok(());
        }
        self.shared.queue.push_direct(text)?;
        Ok(())
    }

    /// Render `document` once at the terminal width and [`print`](Self::print)
    /// it. Controllers in it contribute their initial appearance only.
    pub fn print_document(&self, document: Document) -> Result<()> {
        if !self.live {
            return Ok(());
        }
        let (mut layout, _) = document.into_parts();
        layout.width = Some(self.shared.codes.columns());
        let mut renderer = (self.shared.factory)();
        renderer.describe(layout);
        let text = renderer.result();
        if text.is_empty() {
            return Ok(());
        }
        self.print(text.to_string())
    }

    /// Start capturing console output outside a presenting session.
    /// Captured entries print immediately, decorated. Returns `false` if
    /// already capturing or disabled.
    pub fn capture_output(&self) -> bool {
        if !self.live || !self.shared.lock().options.enabled {
            return false;
        }
        self.shared
            .console
            .capture(Arc::clone(&self.shared.queue), Arc::clone(&self.shared.resolver))
    }

    /// Stop capturing console output. Returns `false` if not capturing.
    pub fn release_output(&self) -> bool {
        self.live && self.shared.console.release()
    }

    /// Clear the screen and scrollback now.
    pub fn clear_screen(&self) -> Result<()> {
        if !self.live {
            return Ok(());
        }
        let mut engine = self.shared.lock();
        self.shared.out(&self.shared.codes.clear_screen())?;
        self.shared.streams.flush()?;
        engine.screen_cleared = true;
        engine.render.invalidate();
        Ok(())
    }

    /// Re-lay out every document at the current terminal width. Called
    /// automatically on SIGWINCH when `follow_resize` is set.
    pub fn handle_resize(&self) {
        if self.live {
            let mut engine = self.shared.lock();
            self.shared.reflow(&mut engine);
        }
    }
}

impl Drop for Presenter {
    fn drop(&mut self) {
        if self.live {
            let mut engine = self.shared.lock();
            if engine.state != PresenterState::Idle {
                if let Err(err) = self.shared.teardown(&mut engine) {
                    tracing::debug!(error = %err, "teardown on drop failed");
                }
            }
        }
        let handle = self
            .ticker
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = handle {
            if handle.thread().id() != std::thread::current().id() {
                let _ = handle.join();
            }
        }
    }
}

fn run_ticker(shared: &Weak<Shared>, session: u64, period: Duration) {
    let mut next = Instant::now();
    loop {
        let Some(strong) = shared.upgrade() else {
            return;
        };
        if !strong.tick(Some(session)) {
            return;
        }
        drop(strong);

        next += period;
        let now = Instant::now();
        if next > now {
            std::thread::sleep(next - now);
        } else {
            // Fell behind; do not try to catch up with a burst of frames.
            next = now;
        }
    }
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Engine> {
        self.engine.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn out(&self, text: &str) -> io::Result<()> {
        self.streams.write_str(StreamKind::Stdout, text)
    }

    fn begin(&self, engine: &mut Engine, clear: bool) -> io::Result<()> {
        if clear && !engine.screen_cleared {
            self.out(&self.codes.clear_screen())?;
            engine.screen_cleared = true;
        }
        self.out(&self.codes.hide_cursor())?;
        self.streams.flush()
    }

    /// One tick. `session` pins a ticker thread to the session it was
    /// spawned for. Returns whether to keep ticking.
    fn tick(&self, session: Option<u64>) -> bool {
        let mut guard = self.lock();
        let engine = &mut *guard;
        if session.is_some_and(|s| s != engine.session) {
            return false;
        }
        match engine.state {
            PresenterState::Idle => false,
            PresenterState::Stopping => {
                if let Err(err) = self.teardown(engine) {
                    tracing::warn!(error = %err, "terminal restore failed");
                }
                false
            }
            PresenterState::Presenting => {
                if let Err(err) = self.render(engine) {
                    tracing::warn!(error = %err, frame = engine.frame, "render pass failed");
                }
                true
            }
        }
    }

    fn render(&self, engine: &mut Engine) -> io::Result<()> {
        let _span = tracing::trace_span!("tick", frame = engine.frame).entered();
        if engine.resize.as_ref().is_some_and(ResizeWatch::take) {
            self.reflow(engine);
        }
        let tick = FrameTick {
            frame: engine.frame,
            frames_per_second: engine.options.frames_per_second,
            frame_duration: engine.options.frame_duration(),
        };
        engine
            .registry
            .for_each_controller(|controller| controller.request_update(&tick));
        let lines = engine.registry.lines();
        let stats = engine
            .render
            .pass(&self.queue, engine.options.logs_per_tick, lines)?;
        if stats.logs > 0 {
            tracing::trace!(logs = stats.logs, frame = engine.frame, "flushed captured output");
        }
        engine.frame += 1;
        Ok(())
    }

    fn reflow(&self, engine: &mut Engine) {
        let width = self.codes.columns();
        engine.registry.redescribe_all(width);
        if engine.state == PresenterState::Presenting {
            engine.render.invalidate();
        }
        tracing::debug!(width, "documents reflowed");
    }

    /// Hand the terminal back: flush held output, erase the region, show the
    /// cursor, and release capture and process hooks.
    fn teardown(&self, engine: &mut Engine) -> io::Result<()> {
        engine.state = PresenterState::Idle;
        engine.registry.clear();

        let erase = self.codes.erase_down();
        let result = self
            .queue
            .release_hold_with(|printer, entries| {
                self.out(&erase)?;
                print_all(printer, entries)
            })
            .and_then(|_| self.out(&erase))
            .and_then(|()| self.out(&self.codes.show_cursor()))
            .and_then(|()| self.streams.flush());

        self.console.release();
        engine.restore_guard = None;
        engine.signal_guard = None;
        engine.resize = None;
        engine.render.reset();
        engine.frame = 0;
        engine.screen_cleared = false;
        if let Some(pending) = engine.pending.take() {
            pending.complete();
        }
        tracing::info!("terminal restored");
        result
    }

    /// The fatal-path restore. Must not lock the engine: the panicking thread
    /// may hold it.
    fn restore_action(&self) -> RestoreAction {
        let console = Arc::clone(&self.console);
        let queue = Arc::clone(&self.queue);
        let codes = Arc::clone(&self.codes);
        let streams = Arc::clone(&self.streams);
        Arc::new(move || {
            console.release();
            let erase = codes.erase_down();
            let _ = queue.try_release_hold_with(|printer, entries| {
                streams.write_str(StreamKind::Stdout, &erase)?;
                print_all(printer, entries)
            });
            let _ = streams.write_str(StreamKind::Stdout, &erase);
            let _ = streams.write_str(StreamKind::Stdout, &codes.show_cursor());
            let _ = streams.flush();
        })
    }
}

// ============================================================================
// Builder
// ============================================================================

fn ansi_codes() -> Arc<dyn ControlCodes> {
    Arc::new(AnsiCodes::new())
}

fn call_site_resolver() -> Arc<dyn OriginResolver> {
    Arc::new(CallSiteResolver)
}

/// Assembles a [`Presenter`] with injectable terminal plumbing.
///
/// Defaults: ANSI control codes, the process console over the real streams,
/// the global arbiter, [`TextDocument`](liveterm_document::TextDocument)
/// renderers, and call-site attribution.
#[derive(Default)]
pub struct PresenterBuilder {
    options: Option<PresenterOptions>,
    codes: Option<Arc<dyn ControlCodes>>,
    streams: Option<Arc<dyn RawStreams>>,
    console: Option<Arc<Console>>,
    arbiter: Option<Arc<TerminalArbiter>>,
    factory: Option<RendererFactory>,
    resolver: Option<Arc<dyn OriginResolver>>,
    cwd: Option<PathBuf>,
}

impl std::fmt::Debug for PresenterBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PresenterBuilder")
            .field("options", &self.options)
            .field("cwd", &self.cwd)
            .finish_non_exhaustive()
    }
}

impl PresenterBuilder {
    #[must_use]
    pub fn with_options(mut self, options: PresenterOptions) -> Self {
        self.options = Some(options);
        self
    }

    #[must_use]
    pub fn with_codes(mut self, codes: Arc<dyn ControlCodes>) -> Self {
        self.codes = Some(codes);
        self
    }

    /// Raw output streams. Without an explicit console, an isolated one is
    /// created over them.
    #[must_use]
    pub fn with_streams(mut self, streams: Arc<dyn RawStreams>) -> Self {
        self.streams = Some(streams);
        self
    }

    #[must_use]
    pub fn with_console(mut self, console: Arc<Console>) -> Self {
        self.console = Some(console);
        self
    }

    #[must_use]
    pub fn with_arbiter(mut self, arbiter: Arc<TerminalArbiter>) -> Self {
        self.arbiter = Some(arbiter);
        self
    }

    #[must_use]
    pub fn with_renderer_factory(mut self, factory: RendererFactory) -> Self {
        self.factory = Some(factory);
        self
    }

    #[must_use]
    pub fn with_resolver(mut self, resolver: Arc<dyn OriginResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Directory decoration paths are made relative to.
    #[must_use]
    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    /// Validate the options and build.
    pub fn build(self) -> Result<Presenter> {
        if let Some(options) = &self.options {
            options.validate()?;
        }
        Ok(self.assemble())
    }

    pub(crate) fn assemble(self) -> Presenter {
        let options = self.options.unwrap_or_default();
        let (console, streams) = match (self.console, self.streams) {
            (Some(console), Some(streams)) => (console, streams),
            (Some(console), None) => {
                let streams = Arc::clone(console.streams());
                (console, streams)
            }
            (None, Some(streams)) => (Arc::new(Console::new(Arc::clone(&streams))), streams),
            (None, None) => {
                let console = Console::global();
                let streams = Arc::clone(console.streams());
                (console, streams)
            }
        };
        let codes = self.codes.unwrap_or_else(ansi_codes);
        let arbiter = self.arbiter.unwrap_or_else(TerminalArbiter::global);
        let factory = self.factory.unwrap_or_else(text_document_factory);
        let resolver = self.resolver.unwrap_or_else(call_site_resolver);

        let mut printer = EntryPrinter::new(Arc::clone(&streams), decoration_for(&options));
        if let Some(cwd) = self.cwd {
            printer = printer.with_cwd(cwd);
        }

        let live = arbiter.claim();
        if !live && arbiter.first_warning() {
            tracing::warn!("{DUPLICATE_WARNING}");
            let _ = streams.write_str(StreamKind::Stderr, &format!("{DUPLICATE_WARNING}\n"));
        }

        let engine = Engine {
            registry: DocumentRegistry::new(Arc::clone(&factory), Arc::clone(&codes)),
            render: RenderLoop::new(Arc::clone(&codes), Arc::clone(&streams)),
            options,
            state: PresenterState::Idle,
            frame: 0,
            screen_cleared: false,
            session: 0,
            pending: None,
            restore_guard: None,
            signal_guard: None,
            resize: None,
        };
        Presenter {
            live,
            shared: Arc::new(Shared {
                engine: Mutex::new(engine),
                queue: Arc::new(CaptureQueue::new(printer)),
                console,
                codes,
                streams,
                resolver,
                factory,
            }),
            ticker: Mutex::new(None),
        }
    }
}
