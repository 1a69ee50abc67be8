//! The per-frame app loop and its construction surface.
//!
//! [`App::run`] drives the whole cycle once per iteration: drain pending
//! input non-blocking up to a batch cap, route each event, rebuild the
//! widget tree when anything left it dirty (reconcile → measure → arrange
//! → focus rebuild → render → diff → emit), notify workload filters the
//! frame completed, then block until the next event, a pending chord's
//! deadline, or the cancellation signal. A panic surfacing from the
//! application's own code (the builder closure, a binding action, a
//! bindings-configurator) is caught at its phase boundary and replaces the
//! root with an [`crate::nodes::error_panel::ErrorPanelNode`] until its
//! Retry or Abort button is activated.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::ansi::{self, SgrState};
use crate::diff;
use crate::error::Result;
use crate::geometry::{Constraints, Rect, Size};
use crate::input::{self, InputEvent, RouteOutcome, RouterState};
use crate::layout;
use crate::focus::FocusRing;
use crate::node::{NodeId, Tree};
use crate::nodes::error_panel::Phase;
use crate::pipeline::{Pipeline, PresentationAdapter, PresentationFilter, Snapshot, WorkloadAdapter, WorkloadFilter};
use crate::reconcile;
use crate::render;
use crate::surface::Surface;
use crate::theme::{Theme, ThemeStack};
use crate::widget::Widget;

const BATCH_CAP: usize = 64;
const POLL_INTERVAL: Duration = Duration::from_millis(16);

/// A shared flag an embedder can flip to request a graceful shutdown
/// e.g. from a `SIGTERM` handler.
pub type CancellationFlag = Arc<AtomicBool>;

/// Read-only context passed to the application's widget-tree builder each
/// frame.
#[derive(Clone, Copy, Debug)]
pub struct AppContext {
    /// The current terminal size.
    pub size: Size,
}

/// Construction-time options for [`App::new`]. The workload adapter itself
/// is the generic parameter `W` rather than a field here, since it must be
/// known at the type level.
pub struct AppOptions {
    /// Terminal size to assume before a presentation adapter (if any)
    /// reports the real size; also the only size headless sessions ever
    /// get.
    pub initial_size: Size,
    /// The base theme layer; overlays are pushed by
    /// `ThemingPanel` widgets during render.
    pub theme: Theme,
    /// Whether an unhandled Ctrl+C exits the app loop by default.
    pub enable_default_ctrl_c_exit: bool,
    /// The TTY-facing adapter; `None` runs headless.
    pub presentation: Option<Box<dyn PresentationAdapter>>,
    /// Observe-only filters on both the output and input paths.
    pub workload_filters: Vec<Box<dyn WorkloadFilter>>,
    /// Filters that may rewrite the output token stream before it reaches
    /// the presentation adapter.
    pub presentation_filters: Vec<Box<dyn PresentationFilter>>,
    /// An optional cooperative cancellation flag, checked once per loop
    /// iteration.
    pub cancellation: Option<CancellationFlag>,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            initial_size: Size::new(80, 24),
            theme: Theme::default_theme(),
            enable_default_ctrl_c_exit: true,
            presentation: None,
            workload_filters: Vec::new(),
            presentation_filters: Vec::new(),
            cancellation: None,
        }
    }
}

/// State held while the root is replaced by a crash/error display.
/// The `retry`/`abort` flags are flipped by the panel's own button
/// widgets, which close over clones of these cells the same way any other
/// `on_click` handler closes over application state.
struct RescueState {
    phase: Phase,
    message: String,
    details: Vec<String>,
    retry: Rc<RefCell<bool>>,
    abort: Rc<RefCell<bool>>,
}

fn rescue_widget(rescue: &RescueState) -> Widget {
    let retry = rescue.retry.clone();
    let abort = rescue.abort.clone();
    Widget::error_panel(rescue.phase, rescue.message.clone(), rescue.details.clone()).with_children(vec![
        Widget::button("Retry").on_click(move || *retry.borrow_mut() = true),
        Widget::button("Abort").on_click(move || *abort.borrow_mut() = true),
    ])
}

fn panic_message(payload: &Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panicked with a non-string payload".to_string()
    }
}

/// Drives one application's per-frame cycle over a [`Pipeline`] generic
/// over its workload adapter `W` (see [`crate::pipeline`] for why the
/// presentation side, not this one, is the one that gets boxed).
pub struct App<W: WorkloadAdapter> {
    tree: Tree,
    focus: FocusRing,
    router_state: RouterState,
    pending: VecDeque<InputEvent>,
    front: Surface,
    back: Surface,
    sgr_state: SgrState,
    theme: Theme,
    pipeline: Pipeline<W>,
    builder: Box<dyn FnMut(&AppContext) -> Widget>,
    enable_default_ctrl_c_exit: bool,
    terminal_size: Size,
    cancellation: Option<CancellationFlag>,
    exit: bool,
    rescue: Option<RescueState>,
}

impl<W: WorkloadAdapter> App<W> {
    /// Construct an app over `workload`, driven by `builder` every frame
    /// its tree is dirty.
    pub fn new(workload: W, options: AppOptions, builder: impl FnMut(&AppContext) -> Widget + 'static) -> Self {
        let mut pipeline = Pipeline::new(workload, options.initial_size);
        if let Some(presentation) = options.presentation {
            pipeline = pipeline.with_presentation(presentation);
        }
        for filter in options.workload_filters {
            pipeline.add_workload_filter(filter);
        }
        for filter in options.presentation_filters {
            pipeline.add_presentation_filter(filter);
        }

        Self {
            tree: Tree::new(),
            focus: FocusRing::new(),
            router_state: RouterState::new(),
            pending: VecDeque::new(),
            front: Surface::new(options.initial_size),
            back: Surface::new(options.initial_size),
            sgr_state: SgrState::new(),
            theme: options.theme,
            pipeline,
            builder: Box::new(builder),
            enable_default_ctrl_c_exit: options.enable_default_ctrl_c_exit,
            terminal_size: options.initial_size,
            cancellation: options.cancellation,
            exit: false,
            rescue: None,
        }
    }

    /// An immutable snapshot of the terminal buffer's current contents, for
    /// headless inspection while the loop isn't running (tests only reach
    /// this between constructing and calling [`Self::run`]; [`Self::run`]
    /// itself consumes `self`).
    pub fn snapshot(&self) -> Snapshot {
        self.pipeline.snapshot()
    }

    /// Render exactly one frame synchronously (build → reconcile → layout
    /// → render → diff → emit), without entering [`Self::run`]'s blocking
    /// wait step, and return the resulting snapshot. For headless
    /// single-shot rendering and for embedders driving frames on their own
    /// schedule instead of via the app loop.
    pub fn step(&mut self) -> Result<Snapshot> {
        self.render_frame()?;
        Ok(self.snapshot())
    }

    /// Run the app loop to completion. Returns once an exit
    /// condition is met: explicit exit (a rescue panel's Abort button, or
    /// the default Ctrl+C binding), the input channel closing, or the
    /// cancellation flag being set.
    pub async fn run(mut self) -> Result<()> {
        self.terminal_size = self.pipeline.start_session()?;
        self.front = Surface::new(self.terminal_size);
        self.back = Surface::new(self.terminal_size);

        let result = self.run_loop().await;
        self.pipeline.end_session()?;
        result
    }

    async fn run_loop(&mut self) -> Result<()> {
        let mut first_frame = true;
        let mut resize_pending = false;

        loop {
            if self.check_cancelled() {
                self.exit = true;
            }
            if self.exit {
                return Ok(());
            }

            let mut dirty = false;
            for _ in 0..BATCH_CAP {
                let Some(event) = self.pending.pop_front() else { break };
                if let InputEvent::Resize(r) = event {
                    self.terminal_size = Size::new(r.w, r.h);
                    resize_pending = true;
                    continue;
                }
                match self.route_event(&event) {
                    RouteOutcome::Handled => dirty = true,
                    RouteOutcome::Exit => {
                        self.exit = true;
                        break;
                    }
                    RouteOutcome::NotHandled => {}
                }
            }

            if let Some(rescue) = &self.rescue {
                if *rescue.abort.borrow() {
                    self.exit = true;
                } else if *rescue.retry.borrow() {
                    self.rescue = None;
                    dirty = true;
                }
            }

            if self.exit {
                return Ok(());
            }

            if dirty || first_frame || resize_pending {
                if resize_pending {
                    self.front = Surface::new(self.terminal_size);
                    self.back = Surface::new(self.terminal_size);
                }
                self.render_frame()?;
                first_frame = false;
                resize_pending = false;
            }

            self.pipeline.frame_complete();

            if self.exit {
                return Ok(());
            }

            self.wait_for_next().await;
        }
    }

    fn check_cancelled(&self) -> bool {
        self.cancellation.as_ref().is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    fn route_event(&mut self, event: &InputEvent) -> RouteOutcome {
        let Some(root) = self.tree.root() else { return RouteOutcome::NotHandled };
        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            input::route(&mut self.tree, root, event, &mut self.focus, &mut self.router_state, self.enable_default_ctrl_c_exit)
        }));
        match outcome {
            Ok(outcome) => outcome,
            Err(payload) => {
                self.enter_rescue(Phase::Input, panic_message(&payload));
                RouteOutcome::Handled
            }
        }
    }

    fn enter_rescue(&mut self, phase: Phase, message: String) {
        if self.rescue.is_some() {
            // A rescue panel is already up; a second failure while it's
            // showing doesn't overwrite the first.
            return;
        }
        self.rescue = Some(RescueState {
            phase,
            message,
            details: Vec::new(),
            retry: Rc::new(RefCell::new(false)),
            abort: Rc::new(RefCell::new(false)),
        });
    }

    fn build_root_widget(&mut self) -> Widget {
        if let Some(rescue) = &self.rescue {
            return rescue_widget(rescue);
        }
        let ctx = AppContext { size: self.terminal_size };
        let builder = &mut self.builder;
        match std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| builder(&ctx))) {
            Ok(widget) => widget,
            Err(payload) => {
                let message = panic_message(&payload);
                self.enter_rescue(Phase::Build, message);
                let Some(rescue) = &self.rescue else {
                    unreachable!("enter_rescue always populates self.rescue")
                };
                rescue_widget(rescue)
            }
        }
    }

    fn sync_focus(&mut self, root: NodeId) {
        let mut ids = Vec::new();
        self.tree.walk_pre_order(root, &mut |id, _| ids.push(id));
        let current = self.focus.current();
        for id in ids {
            if let Some(node) = self.tree.get_mut(id) {
                node.is_focused = Some(id) == current;
            }
        }
    }

    fn render_frame(&mut self) -> Result<()> {
        let widget = self.build_root_widget();
        let existing_root = self.tree.root();
        let width = self.terminal_size.w;

        let reconciled = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            reconcile::reconcile(&mut self.tree, widget, existing_root, width)
        }));
        let new_root = match reconciled {
            Ok(id) => id,
            Err(payload) => {
                self.enter_rescue(Phase::Reconcile, panic_message(&payload));
                let rescue_widget = self.build_root_widget();
                reconcile::reconcile(&mut self.tree, rescue_widget, None, width)
            }
        };
        self.tree.set_root(new_root);

        let constraints = Constraints::tight(self.terminal_size);
        layout::measure(&self.tree, new_root, constraints);
        layout::arrange(&mut self.tree, new_root, Rect::from_size(self.terminal_size));

        self.focus.rebuild(&self.tree, new_root);
        self.focus.ensure_focus();
        self.sync_focus(new_root);

        let mut themes = ThemeStack::new(self.theme.clone());
        self.back.clear();
        let rendered = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            render::render(&self.tree, new_root, &mut self.back, &mut themes);
        }));
        if let Err(payload) = rendered {
            self.enter_rescue(Phase::Render, panic_message(&payload));
        }

        let changes = diff::diff(&self.front, &self.back);
        let tokens = ansi::emit(&changes, &mut self.sgr_state);
        self.pipeline.output(tokens)?;
        std::mem::swap(&mut self.front, &mut self.back);
        Ok(())
    }

    async fn wait_for_next(&mut self) {
        loop {
            if !self.pending.is_empty() || self.check_cancelled() {
                return;
            }

            let events = self.pipeline.poll_input();
            if !events.is_empty() {
                self.pending.extend(events);
                return;
            }

            let now = Instant::now();
            let wait = match self.router_state.next_deadline() {
                Some(deadline) => deadline.saturating_duration_since(now).min(POLL_INTERVAL),
                None => POLL_INTERVAL,
            };

            tokio::select! {
                event = self.pipeline.recv() => {
                    match event {
                        Some(e) => {
                            self.pending.push_back(e);
                            return;
                        }
                        None => {
                            self.exit = true;
                            return;
                        }
                    }
                }
                _ = tokio::time::sleep(wait) => {
                    self.router_state.expire(Instant::now());
                }
            }
        }
    }
}
