//! Pointer drag tracking with single-slot callbacks.

use crate::geometry::Point;
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down(Point),
    Move(Point),
    Up,
    /// Abandons the session without notifying anyone (context menu, secondary button).
    Cancel,
}

/// Net displacement of the pointer from where it went down.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DragDelta {
    pub dx: f64,
    pub dy: f64,
    pub distance: f64,
}

impl DragDelta {
    fn between(origin: Point, current: Point) -> Self {
        let (dx, dy) = (current.x - origin.x, current.y - origin.y);
        Self {
            dx,
            dy,
            distance: dx.hypot(dy),
        }
    }
}

/// Something that produces pointer events for one interactive surface.
pub trait PointerSource {
    fn subscribe(&self, handler: Box<dyn FnMut(PointerEvent)>);
}

type StartHook = Box<dyn FnMut(Point)>;
type DragHook = Box<dyn FnMut(DragDelta)>;

#[derive(Default)]
struct Hooks {
    start: Option<StartHook>,
    drag: Option<DragHook>,
    end: Option<DragHook>,
}

/// Turns raw pointer events into drag start / move / end notifications.
///
/// Each hook holds one callback; registering again replaces it. A release
/// only counts as a drag end if the pointer ended up away from its origin.
#[derive(Default)]
pub struct GestureTracker {
    pressed: bool,
    origin: Point,
    delta: DragDelta,
    hooks: Hooks,
}

impl std::fmt::Debug for GestureTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GestureTracker")
            .field("pressed", &self.pressed)
            .field("origin", &self.origin)
            .field("delta", &self.delta)
            .finish_non_exhaustive()
    }
}

impl GestureTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a tracker fed by `source`.
    ///
    /// Hooks run while the tracker is borrowed, so they must not call back
    /// into it.
    pub fn attach<P: PointerSource>(source: &P) -> Rc<RefCell<Self>> {
        let tracker = Rc::new(RefCell::new(Self::new()));
        let weak = Rc::downgrade(&tracker);
        source.subscribe(Box::new(move |event| {
            if let Some(tracker) = weak.upgrade() {
                tracker.borrow_mut().handle(event);
            }
        }));
        tracker
    }

    pub fn on_drag_start(&mut self, hook: impl FnMut(Point) + 'static) {
        self.hooks.start = Some(Box::new(hook));
    }

    pub fn on_drag(&mut self, hook: impl FnMut(DragDelta) + 'static) {
        self.hooks.drag = Some(Box::new(hook));
    }

    pub fn on_drag_end(&mut self, hook: impl FnMut(DragDelta) + 'static) {
        self.hooks.end = Some(Box::new(hook));
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn delta(&self) -> DragDelta {
        self.delta
    }

    pub fn handle(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Down(at) => self.press(at),
            PointerEvent::Move(at) => self.motion(at),
            PointerEvent::Up => self.release(),
            PointerEvent::Cancel => {
                self.pressed = false;
                self.reset();
            }
        }
    }

    fn press(&mut self, at: Point) {
        self.pressed = true;
        self.origin = at;
        self.delta = DragDelta::default();

        if let Some(hook) = self.hooks.start.as_mut() {
            hook(at);
        }
    }

    fn motion(&mut self, at: Point) {
        if !self.pressed {
            return;
        }
        self.delta = DragDelta::between(self.origin, at);

        if let Some(hook) = self.hooks.drag.as_mut() {
            hook(self.delta);
        }
    }

    fn release(&mut self) {
        self.pressed = false;

        if self.delta.distance > 0.0
            && let Some(hook) = self.hooks.end.as_mut()
        {
            hook(self.delta);
        }
        self.reset();
    }

    fn reset(&mut self) {
        self.origin = Point::default();
        self.delta = DragDelta::default();
    }
}
