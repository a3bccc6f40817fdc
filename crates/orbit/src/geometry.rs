use crate::easing::Easing;
use std::f64::consts::{PI, TAU};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Opacity added on top of the eased depth, so items at the back stay visible.
pub const OPACITY_FLOOR: f64 = 0.2;

/// Brings an angle back inside (-2π, 2π) with a single ±2π correction.
///
/// This is a soft bound, not a modulo: angles beyond ±4π come back still
/// out of range and need another call.
pub fn wrap_angle(angle: f64) -> f64 {
    if angle >= TAU {
        angle - TAU
    } else if angle <= -TAU {
        angle + TAU
    } else {
        angle
    }
}

/// Base angle of the item at `index` for the given angular spacing.
/// Index 0 sits at π/2, straight in front of the viewer.
pub fn base_angle(index: usize, spacing: f64) -> f64 {
    -(spacing * index as f64 - PI / 2.0)
}

/// 2D projection of a point on the circle plus its depth-derived styling.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Projection {
    pub x: f64,
    pub y: f64,
    /// Front-to-back depth. Floored at 0, never clamped above.
    pub depth: f64,
    pub scale: f64,
    /// Capped at 1, never floored.
    pub opacity: f64,
    pub stacking_order: i32,
}

impl Projection {
    pub fn at(angle: f64, radius: f64) -> Self {
        let x = radius * angle.cos();
        let y = radius * angle.sin();
        let depth = ((y + radius) / (2.0 * radius)).max(0.0);
        let opacity = (Easing::EaseInOutQuad.apply(depth) + OPACITY_FLOOR).min(1.0);

        Self {
            x,
            y,
            depth,
            scale: depth,
            opacity,
            stacking_order: (depth * 10.0).round() as i32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_projection_on_the_side() {
        let p = Projection::at(0.0, 100.0);
        assert!((p.x - 100.0).abs() < EPS);
        assert!(p.y.abs() < EPS);
        assert!((p.depth - 0.5).abs() < EPS);
        assert!((p.scale - 0.5).abs() < EPS);
        assert!((p.opacity - 0.7).abs() < EPS);
        assert_eq!(p.stacking_order, 5);
    }

    #[test]
    fn test_projection_front_and_back() {
        let front = Projection::at(PI / 2.0, 50.0);
        assert!((front.depth - 1.0).abs() < EPS);
        assert_eq!(front.opacity, 1.0);
        assert_eq!(front.stacking_order, 10);

        let back = Projection::at(-PI / 2.0, 50.0);
        assert!(back.depth.abs() < EPS);
        assert!(back.depth >= 0.0);
        assert!((back.opacity - OPACITY_FLOOR).abs() < EPS);
        assert_eq!(back.stacking_order, 0);
    }

    #[test]
    fn test_base_angle() {
        let spacing = TAU / 6.0;
        assert!((spacing - PI / 3.0).abs() < EPS);
        assert!((base_angle(2, spacing) + PI / 6.0).abs() < EPS);
        assert!((base_angle(0, spacing) - PI / 2.0).abs() < EPS);
    }

    #[test]
    fn test_wrap_angle() {
        assert!((wrap_angle(TAU + 0.5) - 0.5).abs() < EPS);
        assert!((wrap_angle(-TAU - 0.5) + 0.5).abs() < EPS);
        assert!((wrap_angle(3.0 * PI) - PI).abs() < EPS);

        for angle in [-6.0, -1.0, 0.0, 2.5, 6.2] {
            assert_eq!(wrap_angle(angle), angle);
            assert_eq!(wrap_angle(wrap_angle(angle)), angle);
        }
    }

    #[test]
    fn test_wrap_angle_below_four_pi_needs_one_step() {
        for i in -39..40 {
            let angle = i as f64 * 0.3;
            let wrapped = wrap_angle(angle);
            assert!(wrapped > -TAU && wrapped < TAU, "{angle} -> {wrapped}");
        }
    }
}
