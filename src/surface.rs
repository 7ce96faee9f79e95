//! The drawing surface controller.
//!
//! `DrawOver` owns the render target, the pen, the palette and the history.
//! It is the only code that mutates the render target: model objects just
//! publish notifications and the surface subscribes to them.
//!
//! ```text
//! pointer events ──► DrawOver ──► RenderTarget (segment drawn immediately)
//!                       │
//!                       └─ on release: capture ──► HistoryStack::push ──► changed
//!
//! undo/redo ──► HistoryStack::back/forward ──► moved ──► DrawOver restores
//! ```

use std::cell::{Cell, Ref, RefCell};
use std::ops::RangeInclusive;
use std::rc::Rc;

use egui::Pos2;
use futures::executor::LocalPool;

use crate::color::HexColor;
use crate::config::DrawOverConfig;
use crate::error::{DrawOverError, DrawOverResult};
use crate::event::{DecodeFailure, EventBus, HistoryMove};
use crate::history::HistoryStack;
use crate::input::{HostElement, InputEvent};
use crate::palette::Palette;
use crate::pen::Pen;
use crate::renderer::{Canvas, CompositeMode, RenderTarget, StrokeStyle};
use crate::restore::Restorer;
use crate::snapshot::{PngDecoder, SnapshotDecoder};
use crate::state::SurfaceState;

pub struct DrawOver<T: RenderTarget = Canvas> {
    host: HostElement,
    mounted: bool,
    target: Rc<RefCell<T>>,
    /// Physical pixels per point, shared with the pen subscriptions
    pixel_scale: Rc<Cell<f32>>,
    pen: Pen,
    palette: Palette,
    history: HistoryStack,
    state: SurfaceState,
    restorer: Restorer<T>,
    pool: LocalPool,
    decode_failed: Rc<EventBus<DecodeFailure>>,
    width_range: RangeInclusive<f32>,
}

impl<T: RenderTarget> std::fmt::Debug for DrawOver<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DrawOver")
            .field("host", &self.host)
            .field("mounted", &self.mounted)
            .field("pen", &self.pen)
            .field("history", &self.history)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl DrawOver<Canvas> {
    /// Creates a surface with a software canvas sized to `host`
    pub fn new(host: HostElement, config: DrawOverConfig) -> DrawOverResult<Self> {
        check_host(&host)?;
        let canvas = Canvas::new(host.target_size())?;
        Self::with_target(host, config, canvas, PngDecoder)
    }
}

fn check_host(host: &HostElement) -> DrawOverResult<()> {
    if host.is_usable() {
        Ok(())
    } else {
        Err(DrawOverError::Configuration(format!(
            "host element {:?} at {} pixels per point has no drawable area",
            host.rect, host.pixels_per_point
        )))
    }
}

impl<T: RenderTarget + 'static> DrawOver<T> {
    /// Creates a surface drawing into `target`, which is cleared first.
    pub fn with_target(
        host: HostElement,
        config: DrawOverConfig,
        mut target: T,
        decoder: impl SnapshotDecoder + 'static,
    ) -> DrawOverResult<Self> {
        config.validate()?;
        check_host(&host)?;

        let [width, height] = target.size();
        if width == 0 || height == 0 {
            return Err(DrawOverError::Configuration(
                "render target has no pixels".to_owned(),
            ));
        }

        let palette = Palette::new(config.default_colors.clone()).ok_or_else(|| {
            DrawOverError::Configuration("palette needs at least one color".to_owned())
        })?;
        let pen = Pen::new(palette.defaults()[0], config.pen_width)?;

        target.set_style(StrokeStyle::from_pen(&pen.settings(), host.pixels_per_point));
        target.clear();
        let history = HistoryStack::new(target.capture()?).with_limit(config.history_limit);

        let target = Rc::new(RefCell::new(target));
        let pool = LocalPool::new();
        let decode_failed = Rc::new(EventBus::new());
        let restorer = Restorer::new(
            Rc::clone(&target),
            Rc::new(decoder),
            pool.spawner(),
            Rc::clone(&decode_failed),
        );

        let surface = Self {
            host,
            mounted: false,
            target,
            pixel_scale: Rc::new(Cell::new(host.pixels_per_point)),
            pen,
            palette,
            history,
            state: SurfaceState::Idle,
            restorer,
            pool,
            decode_failed,
            width_range: config.width_range(),
        };
        surface.connect();

        log::info!("Drawing surface created at {width}x{height}");
        Ok(surface)
    }

    /// Subscribes the render target to the models.
    ///
    /// History moves only restore pixels. The pen keeps its mode, so an
    /// undo while erasing leaves the eraser on.
    fn connect(&self) {
        let target = Rc::clone(&self.target);
        self.pen.color_changed().subscribe(move |color: &HexColor| {
            let mut target = target.borrow_mut();
            let style = StrokeStyle {
                color: *color,
                ..target.style()
            };
            target.set_style(style);
        });

        let target = Rc::clone(&self.target);
        let scale = Rc::clone(&self.pixel_scale);
        self.pen.width_changed().subscribe(move |width: &f32| {
            let mut target = target.borrow_mut();
            let style = StrokeStyle {
                width: *width * scale.get(),
                ..target.style()
            };
            target.set_style(style);
        });

        let target = Rc::clone(&self.target);
        self.pen.mode_changed().subscribe(move |erasing: &bool| {
            let mut target = target.borrow_mut();
            let composite = if *erasing {
                CompositeMode::DestinationOut
            } else {
                CompositeMode::SourceOver
            };
            let style = StrokeStyle {
                composite,
                ..target.style()
            };
            target.set_style(style);
        });

        let restorer = self.restorer.clone();
        self.history.moved().subscribe(move |event: &HistoryMove| {
            restorer.request(event.cursor, event.snapshot.clone());
        });
    }

    pub fn pen(&self) -> &Pen {
        &self.pen
    }

    pub fn pen_mut(&mut self) -> &mut Pen {
        &mut self.pen
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn palette_mut(&mut self) -> &mut Palette {
        &mut self.palette
    }

    pub fn history(&self) -> &HistoryStack {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut HistoryStack {
        &mut self.history
    }

    /// Read access to the render target. Do not hold across surface calls.
    pub fn target(&self) -> Ref<'_, T> {
        self.target.borrow()
    }

    pub fn host(&self) -> HostElement {
        self.host
    }

    pub fn state(&self) -> SurfaceState {
        self.state
    }

    pub fn width_range(&self) -> RangeInclusive<f32> {
        self.width_range.clone()
    }

    /// Fired when a snapshot could not be restored
    pub fn decode_failed(&self) -> &EventBus<DecodeFailure> {
        &self.decode_failed
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Attaches the surface to `host`. Input is ignored while unmounted.
    ///
    /// Only the host's position is taken over; call [`Self::resize`] to
    /// follow a size change.
    pub fn mount(&mut self, host: HostElement) {
        if host.target_size() != self.host.target_size() {
            log::debug!(
                "Host size changed from {:?} to {:?}; surface keeps its size until resized",
                self.host.target_size(),
                host.target_size()
            );
        }
        self.host.rect = self.host.rect.translate(host.rect.min - self.host.rect.min);
        if !self.mounted {
            log::info!("Drawing surface mounted at {:?}", self.host.rect);
        }
        self.mounted = true;
    }

    /// Detaches the surface. A stroke in progress is finished first.
    pub fn unmount(&mut self) -> DrawOverResult<()> {
        self.pointer_up()?;
        if self.mounted {
            log::info!("Drawing surface unmounted");
        }
        self.mounted = false;
        Ok(())
    }

    pub fn toggle(&mut self, host: HostElement) -> DrawOverResult<()> {
        if self.mounted {
            self.unmount()
        } else {
            self.mount(host);
            Ok(())
        }
    }

    /// Feeds one pointer event in screen coordinates
    pub fn handle_input(&mut self, event: InputEvent) -> DrawOverResult<()> {
        if !self.mounted {
            return Ok(());
        }

        match event {
            InputEvent::PointerDown { position, source } => {
                if self.pointer_down(self.host.to_local(position)) {
                    log::trace!("{source:?} stroke started at {position:?}");
                }
                Ok(())
            }
            InputEvent::PointerMove { position, .. } => {
                self.pointer_move(self.host.to_local(position));
                Ok(())
            }
            InputEvent::PointerCancel { source } => {
                log::debug!("{source:?} gesture cancelled, keeping the stroke so far");
                self.pointer_up()
            }
            InputEvent::PointerUp { .. } | InputEvent::PointerLeave => self.pointer_up(),
        }
    }

    /// Starts a stroke at a surface-local point.
    ///
    /// Returns false, and starts nothing, while the step the history moved
    /// to is still being restored: drawing now would land on content that
    /// is about to be replaced.
    pub fn pointer_down(&mut self, point: Pos2) -> bool {
        self.pool.run_until_stalled();
        if self.restorer.is_restoring() {
            log::debug!("Press ignored while history step {} is restored", self.history.cursor_index());
            return false;
        }

        self.state.begin_stroke(point);
        true
    }

    pub fn pointer_move(&mut self, point: Pos2) {
        if let Some((from, to)) = self.state.extend_stroke(point) {
            self.target.borrow_mut().draw_segment(from, to);
        }
    }

    /// Ends the stroke, recording it if anything was drawn
    pub fn pointer_up(&mut self) -> DrawOverResult<()> {
        match self.state.end_stroke() {
            Some(session) if session.dirty => self.record(),
            _ => Ok(()),
        }
    }

    /// Blanks the surface and records that as a step, even if already blank
    pub fn clear(&mut self) -> DrawOverResult<()> {
        self.restorer.supersede();
        self.state = SurfaceState::Idle;
        self.target.borrow_mut().clear();
        self.record()
    }

    /// Blanks the surface, empties the custom colors and restarts history
    pub fn reset(&mut self) -> DrawOverResult<()> {
        self.restorer.supersede();
        self.state = SurfaceState::Idle;

        let blank = {
            let mut target = self.target.borrow_mut();
            target.clear();
            target.capture()?
        };
        self.palette.reset();
        // Also fires a move, which redraws the blank seed once more.
        self.history.reset(blank);
        Ok(())
    }

    /// Re-derives the surface size from `host`.
    ///
    /// Content and history are dropped, as with a freshly created surface.
    /// Capture a snapshot first to keep the drawing.
    pub fn resize(&mut self, host: HostElement) -> DrawOverResult<()> {
        check_host(&host)?;
        self.restorer.supersede();
        self.state = SurfaceState::Idle;
        self.host = host;
        self.pixel_scale.set(host.pixels_per_point);

        let blank = {
            let mut target = self.target.borrow_mut();
            target.resize(host.target_size());
            target.set_style(StrokeStyle::from_pen(&self.pen.settings(), host.pixels_per_point));
            target.clear();
            target.capture()?
        };
        self.history.reset(blank);

        let [width, height] = host.target_size();
        log::info!("Drawing surface resized to {width}x{height}");
        Ok(())
    }

    pub fn undo(&mut self) {
        self.history.back();
    }

    pub fn redo(&mut self) {
        self.history.forward();
    }

    /// Sets the pen color and remembers it among the custom colors
    pub fn pick_color(&mut self, color: HexColor) {
        self.pen.set_color(color);
        self.palette.add_color(color);
    }

    /// Drives snapshot restores that are ready. Returns true while restores
    /// are still waiting on their decoder.
    pub fn run_pending_restores(&mut self) -> bool {
        self.pool.run_until_stalled();
        self.restorer.pending() > 0
    }

    fn record(&mut self) -> DrawOverResult<()> {
        let snapshot = self.target.borrow().capture()?;
        self.history.push(snapshot);
        Ok(())
    }
}
