//! Circle collision tests
//!
//! Every entity is a circle, so collision is a center-distance check.

use glam::Vec2;

/// Anything with a circular footprint
pub trait Body {
    fn center(&self) -> Vec2;
    fn radius(&self) -> f32;
}

/// Overlap test between `a` and `b`
///
/// Computed as `distance - b.radius < a.radius`. Callers keep a fixed
/// argument order: player or projectile first, enemy second.
#[inline]
pub fn collides(a: &impl Body, b: &impl Body) -> bool {
    let dist = a.center().distance(b.center());
    dist - b.radius() < a.radius()
}

/// True once the body's bounding circle is entirely past any edge of a
/// `bounds`-sized viewport anchored at the origin
#[inline]
pub fn is_off_screen(body: &impl Body, bounds: Vec2) -> bool {
    let pos = body.center();
    let r = body.radius();
    pos.x + r < 0.0 || pos.y + r < 0.0 || pos.x - r > bounds.x || pos.y - r > bounds.y
}
