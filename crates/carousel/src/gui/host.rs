//! GTK implementations of the carousel's host collaborators.

use crate::gui::app::{AppModel, AppMsg};
use crate::gui::stage::Stage;
use gtk::gdk;
use gtk::prelude::*;
use gtk4 as gtk;
use orbit::{FrameScheduler, FrameToken, Placement, Point, PointerEvent, PointerSource};
use orbit::{RenderSink, Timer};
use relm4::ComponentSender;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Writes placements into the shared stage and schedules a redraw.
pub struct StageSink {
    stage: Rc<RefCell<Stage>>,
    area: gtk::DrawingArea,
}

impl StageSink {
    pub fn new(stage: Rc<RefCell<Stage>>, area: gtk::DrawingArea) -> Self {
        Self { stage, area }
    }
}

impl RenderSink for StageSink {
    type Element = usize;

    fn place(&mut self, element: &usize, placement: &Placement) {
        if let Some(card) = self.stage.borrow_mut().cards.get_mut(*element) {
            card.visual.placement = *placement;
        }
        self.area.queue_draw();
    }

    fn set_stacking_order(&mut self, element: &usize, order: i32) {
        if let Some(card) = self.stage.borrow_mut().cards.get_mut(*element) {
            card.visual.stacking_order = order;
        }
    }
}

// Tokens stay unique across carousel rebuilds, so a frame message still in
// flight for a replaced carousel can never match a fresh request.
static NEXT_FRAME: AtomicU64 = AtomicU64::new(1);

/// One frame-clock tick callback per requested frame, reported back to the
/// component as [`AppMsg::Frame`].
pub struct TickScheduler {
    area: gtk::DrawingArea,
    sender: ComponentSender<AppModel>,
    pending: Rc<RefCell<HashMap<FrameToken, gtk::TickCallbackId>>>,
}

impl TickScheduler {
    pub fn new(area: gtk::DrawingArea, sender: ComponentSender<AppModel>) -> Self {
        Self {
            area,
            sender,
            pending: Rc::new(RefCell::new(HashMap::new())),
        }
    }
}

impl FrameScheduler for TickScheduler {
    fn request_frame(&mut self) -> FrameToken {
        let token = FrameToken::new(NEXT_FRAME.fetch_add(1, Ordering::Relaxed));
        let sender = self.sender.clone();
        let pending = Rc::clone(&self.pending);

        let id = self.area.add_tick_callback(move |_, clock| {
            pending.borrow_mut().remove(&token);
            let time = Duration::from_micros(clock.frame_time().max(0) as u64);
            sender.input(AppMsg::Frame(token, time));
            glib::ControlFlow::Break
        });
        self.pending.borrow_mut().insert(token, id);
        token
    }

    fn cancel_frame(&mut self, token: FrameToken) {
        let id = self.pending.borrow_mut().remove(&token);
        if let Some(id) = id {
            id.remove();
        }
    }
}

/// Main-loop timeouts.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlibTimer;

impl Timer for GlibTimer {
    type Handle = glib::SourceId;

    fn start(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> glib::SourceId {
        glib::timeout_add_local_once(delay, callback)
    }

    fn cancel(&self, handle: glib::SourceId) {
        handle.remove();
    }
}

type PointerHandlers = Rc<RefCell<Vec<Box<dyn FnMut(PointerEvent)>>>>;

/// Pointer events from a drag gesture on one widget. The secondary button
/// acts as the cancel trigger.
pub struct StagePointer {
    handlers: PointerHandlers,
}

impl StagePointer {
    pub fn new(area: &gtk::DrawingArea) -> Self {
        let handlers: PointerHandlers = Rc::default();
        let drag = gtk::GestureDrag::new();
        drag.set_button(0);

        {
            let handlers = handlers.clone();
            drag.connect_drag_begin(move |gesture, x, y| {
                let event = if gesture.current_button() == gdk::BUTTON_SECONDARY {
                    PointerEvent::Cancel
                } else {
                    PointerEvent::Down(Point::new(x, y))
                };
                emit(&handlers, event);
            });
        }
        {
            let handlers = handlers.clone();
            drag.connect_drag_update(move |gesture, dx, dy| {
                if gesture.current_button() == gdk::BUTTON_SECONDARY {
                    return;
                }
                if let Some((x, y)) = gesture.start_point() {
                    emit(&handlers, PointerEvent::Move(Point::new(x + dx, y + dy)));
                }
            });
        }
        {
            let handlers = handlers.clone();
            drag.connect_drag_end(move |gesture, _, _| {
                if gesture.current_button() != gdk::BUTTON_SECONDARY {
                    emit(&handlers, PointerEvent::Up);
                }
            });
        }

        area.add_controller(drag);
        Self { handlers }
    }
}

fn emit(handlers: &PointerHandlers, event: PointerEvent) {
    for handler in handlers.borrow_mut().iter_mut() {
        handler(event);
    }
}

impl PointerSource for StagePointer {
    fn subscribe(&self, handler: Box<dyn FnMut(PointerEvent)>) {
        self.handlers.borrow_mut().push(handler);
    }
}
