//! Circular layout engine.
//!
//! Items sit at evenly spaced base angles. Rotation is tracked as an offset
//! on top of each item's committed angle: previews (drag, animation frames)
//! render `angle + offset` without touching the item, and the final frame of
//! an animation folds the offset into the items and resets it to zero.

use crate::easing::Easing;
use crate::error::OrbitError;
use crate::geometry::{self, Point, Projection};
use crate::gesture::DragDelta;
use crate::transition::{FrameScheduler, FrameToken, Transition, Transitioner};
use std::f64::consts::{FRAC_PI_2, TAU};
use std::time::Duration;
use strum::{Display as StrumDisplay, EnumString};

/// Used until a viewport-derived radius first yields a usable value.
pub const FALLBACK_RADIUS: f64 = 1.0;

/// Where the host should draw an item, relative to the circle's center.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Placement {
    pub offset: Point,
    pub scale: f64,
    pub opacity: f64,
}

impl From<&Projection> for Placement {
    fn from(p: &Projection) -> Self {
        Self {
            offset: Point::new(p.x, p.y),
            scale: p.scale,
            opacity: p.opacity,
        }
    }
}

/// Receives render instructions. The engine never reads them back.
pub trait RenderSink {
    type Element;

    fn place(&mut self, element: &Self::Element, placement: &Placement);
    fn set_stacking_order(&mut self, element: &Self::Element, order: i32);
}

pub enum Radius {
    Fixed(f64),
    /// Re-evaluated on every resize, e.g. a fraction of the viewport width.
    Viewport(Box<dyn Fn() -> f64>),
}

impl Radius {
    pub fn viewport(source: impl Fn() -> f64 + 'static) -> Self {
        Self::Viewport(Box::new(source))
    }
}

impl std::fmt::Debug for Radius {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fixed(r) => f.debug_tuple("Fixed").field(r).finish(),
            Self::Viewport(_) => f.write_str("Viewport(..)"),
        }
    }
}

fn usable_radius(r: f64) -> Option<f64> {
    (r.is_finite() && r > 0.0).then_some(r)
}

/// Rounds halves towards positive infinity.
fn round_half_up(v: f64) -> f64 {
    (v + 0.5).floor()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, StrumDisplay)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    fn sign(self) -> f64 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Motion {
    pub duration: Duration,
    pub easing: Easing,
}

impl Default for Motion {
    fn default() -> Self {
        Self {
            duration: Duration::from_millis(300),
            easing: Easing::EaseInOutQuad,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Item<E> {
    index: usize,
    element: E,
    base_angle: f64,
    angle: f64,
    projection: Projection,
    written_order: Option<i32>,
}

impl<E> Item<E> {
    fn new(index: usize, element: E, spacing: f64) -> Self {
        let base_angle = geometry::base_angle(index, spacing);
        Self {
            index,
            element,
            base_angle,
            angle: base_angle,
            projection: Projection::default(),
            written_order: None,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn element(&self) -> &E {
        &self.element
    }

    pub fn base_angle(&self) -> f64 {
        self.base_angle
    }

    /// Angle including every committed rotation, excluding any preview.
    pub fn angle(&self) -> f64 {
        self.angle
    }

    /// Last projection that was rendered, preview included.
    pub fn projection(&self) -> &Projection {
        &self.projection
    }
}

/// Rotation offsets applied on top of the items' committed angles.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RotationState {
    /// Where the current or next animation settles.
    pub target: f64,
    /// What is on screen right now.
    pub in_flight: f64,
}

impl RotationState {
    pub fn is_settled(&self) -> bool {
        self.target == self.in_flight
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Dragging,
    Animating,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DragMode {
    Released,
    /// Pointer is down but has not moved the carousel yet.
    Armed,
    Active,
}

pub struct Carousel<R: RenderSink, S: FrameScheduler> {
    items: Vec<Item<R::Element>>,
    spacing: f64,
    radius_source: Radius,
    radius: f64,
    rotation: RotationState,
    motion: Motion,
    transitioner: Transitioner,
    drag: DragMode,
    /// Rotation left over from an animation the current drag took over.
    drag_offset: f64,
    renderer: R,
    scheduler: S,
}

impl<R: RenderSink, S: FrameScheduler> Carousel<R, S> {
    /// Lays out `elements` in order around the circle and renders them once.
    /// The first element is the main item, placed at the front.
    pub fn new(
        elements: impl IntoIterator<Item = R::Element>,
        radius: Radius,
        motion: Motion,
        renderer: R,
        scheduler: S,
    ) -> Result<Self, OrbitError> {
        let elements: Vec<_> = elements.into_iter().collect();
        if elements.is_empty() {
            return Err(OrbitError::EmptyLayout);
        }

        let initial_radius = match &radius {
            Radius::Fixed(r) => usable_radius(*r).ok_or(OrbitError::InvalidRadius(*r))?,
            Radius::Viewport(source) => usable_radius(source()).unwrap_or(FALLBACK_RADIUS),
        };

        let spacing = TAU / elements.len() as f64;
        let items = elements
            .into_iter()
            .enumerate()
            .map(|(index, element)| Item::new(index, element, spacing))
            .collect();

        let mut carousel = Self {
            items,
            spacing,
            radius_source: radius,
            radius: initial_radius,
            rotation: RotationState::default(),
            motion,
            transitioner: Transitioner::new(),
            drag: DragMode::Released,
            drag_offset: 0.0,
            renderer,
            scheduler,
        };
        carousel.render_all();
        Ok(carousel)
    }

    pub fn items(&self) -> &[Item<R::Element>] {
        &self.items
    }

    pub fn main_item(&self) -> &Item<R::Element> {
        &self.items[0]
    }

    /// Angle between neighbouring items.
    pub fn spacing(&self) -> f64 {
        self.spacing
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn rotation(&self) -> RotationState {
        self.rotation
    }

    pub fn motion(&self) -> Motion {
        self.motion
    }

    pub fn phase(&self) -> Phase {
        if self.drag == DragMode::Active {
            Phase::Dragging
        } else if self.transitioner.is_active() {
            Phase::Animating
        } else {
            Phase::Idle
        }
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn project_item(&self, item: &Item<R::Element>, angle_override: Option<f64>) -> Projection {
        Projection::at(angle_override.unwrap_or(item.angle), self.radius)
    }

    pub fn render_all(&mut self) {
        for index in 0..self.items.len() {
            self.draw_item(index, None, true);
        }
    }

    /// Renders every item rotated by `delta`.
    ///
    /// With `commit` the rotation becomes part of the items' angles and the
    /// rotation offsets reset to zero; without it the items are only drawn
    /// at the rotated position.
    pub fn update_items(&mut self, delta: f64, commit: bool) {
        for index in 0..self.items.len() {
            let item = &mut self.items[index];
            item.angle = geometry::wrap_angle(item.angle);

            if commit {
                item.angle = geometry::wrap_angle(item.angle + delta);
                self.draw_item(index, None, false);
            } else {
                let preview = item.angle + delta;
                self.draw_item(index, Some(preview), false);
            }
        }

        if commit {
            self.rotation = RotationState::default();
        }
    }

    fn draw_item(&mut self, index: usize, angle_override: Option<f64>, always_write_order: bool) {
        let radius = self.radius;
        let item = &mut self.items[index];
        let projection = Projection::at(angle_override.unwrap_or(item.angle), radius);
        item.projection = projection;

        self.renderer
            .place(&item.element, &Placement::from(&projection));

        let order = projection.stacking_order;
        if always_write_order || item.written_order != Some(order) {
            self.renderer.set_stacking_order(&item.element, order);
            item.written_order = Some(order);
        }
    }

    pub fn rotate_left(&mut self) {
        self.rotate_by_spacing(Direction::Left);
    }

    pub fn rotate_right(&mut self) {
        self.rotate_by_spacing(Direction::Right);
    }

    /// Moves the target one slot over and animates towards it. Repeated calls
    /// before the animation settles accumulate on the pending target.
    pub fn rotate_by_spacing(&mut self, direction: Direction) {
        if self.drag != DragMode::Released {
            log::debug!("step {direction} ends the drag session");
            self.drag = DragMode::Released;
            self.drag_offset = 0.0;
        }
        self.rotation.target += direction.sign() * self.spacing;
        self.animate_rotation();
    }

    fn animate_rotation(&mut self) {
        let transition = Transition::new(
            self.rotation.in_flight,
            self.rotation.target,
            self.motion.duration,
            self.motion.easing,
        );
        log::debug!(
            "animating rotation {:.4} -> {:.4}",
            transition.from,
            transition.to
        );
        self.transitioner.from_to(transition, &mut self.scheduler);
    }

    /// Hands a display frame requested through the scheduler back to the engine.
    pub fn on_frame(&mut self, token: FrameToken, timestamp: Duration) {
        let Some(step) = self
            .transitioner
            .on_frame(token, timestamp, &mut self.scheduler)
        else {
            return;
        };

        log::trace!("frame {token}: rotation {:.4}", step.value);
        self.rotation.in_flight = step.value;
        self.update_items(step.value, step.is_final);

        if step.is_final {
            log::debug!("rotation settled");
        }
    }

    /// Shows the carousel rotated by `angle` without committing it. The
    /// target snaps to the nearest slot so a following animation lands on it.
    pub fn rotate_continuous(&mut self, angle: f64) {
        self.rotation.target = round_half_up(angle / self.spacing) * self.spacing;
        self.rotation.in_flight = angle;
        self.update_items(angle, false);
    }

    pub fn begin_drag(&mut self) {
        self.drag = DragMode::Armed;
    }

    /// Follows the pointer. The first move of a session takes over from any
    /// running animation: its slot is committed and the part of the way it
    /// had not covered yet stays on screen as an offset under the pointer.
    pub fn drag_to(&mut self, delta: DragDelta) {
        match self.drag {
            DragMode::Released => return,
            DragMode::Armed => {
                self.drag_offset = 0.0;
                if self.transitioner.is_active() {
                    self.transitioner.cancel(&mut self.scheduler);
                    let RotationState { target, in_flight } = self.rotation;
                    self.update_items(target, true);
                    self.drag_offset = in_flight - target;
                }
                log::debug!("drag started");
                self.drag = DragMode::Active;
            }
            DragMode::Active => {}
        }

        let angle = self.drag_offset - delta.dx / (self.radius * FRAC_PI_2);
        self.rotate_continuous(angle);
    }

    /// Releases a drag that moved the carousel; animates to the snap target.
    pub fn end_drag(&mut self) {
        let was_active = self.drag == DragMode::Active;
        self.drag = DragMode::Released;
        if was_active {
            log::debug!("drag ended");
            self.animate_rotation();
        }
    }

    /// Abandons the drag session and drops its preview. A drag that took over
    /// an animation falls back onto that animation's slot.
    pub fn cancel_drag(&mut self) {
        let was_active = self.drag == DragMode::Active;
        self.drag = DragMode::Released;
        self.drag_offset = 0.0;
        if was_active {
            log::debug!("drag cancelled");
            self.rotation = RotationState::default();
            self.update_items(0.0, false);
        }
    }

    /// Stops any animation and drag, committing the slot they were heading to.
    pub fn halt(&mut self) {
        self.transitioner.cancel(&mut self.scheduler);
        self.drag = DragMode::Released;
        self.drag_offset = 0.0;
        if self.rotation != RotationState::default() {
            let target = self.rotation.target;
            self.update_items(target, true);
        }
    }

    /// Re-reads a viewport-derived radius. Returns whether it changed; the
    /// caller decides when to re-render.
    pub fn resize(&mut self) -> bool {
        let Radius::Viewport(source) = &self.radius_source else {
            return false;
        };

        match usable_radius(source()) {
            Some(r) if r != self.radius => {
                log::debug!("radius {:.1} -> {:.1}", self.radius, r);
                self.radius = r;
                true
            }
            _ => false,
        }
    }
}
