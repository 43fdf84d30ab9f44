//! Hop curve: a quadratic Bezier arc with a sinusoidal bounce on top.

use std::f32::consts::PI;

use glam::Vec2;

/// Control point of the hop arc between `start` and `end`.
///
/// The midpoint displaced perpendicular to the travel direction (to the
/// left of it) by half the travel distance. Degenerate hops use the
/// midpoint.
#[must_use]
pub fn control_point(start: Vec2, end: Vec2) -> Vec2 {
    let mid = (start + end) * 0.5;
    let travel = end - start;
    let distance = travel.length();
    if distance <= f32::EPSILON {
        return mid;
    }
    mid + travel.perp() / distance * (distance * 0.5)
}

/// Point on the quadratic Bezier curve `p0 -> p1 -> p2` at `t`.
#[must_use]
pub fn quadratic_bezier(p0: Vec2, p1: Vec2, p2: Vec2, t: f32) -> Vec2 {
    let u = 1.0 - t;
    p0 * (u * u) + p1 * (2.0 * u * t) + p2 * (t * t)
}

/// Token position `t` of the way through a hop.
///
/// `t` is clamped into `[0, 1]`; at `t >= 1` the result is exactly `end`.
#[must_use]
pub fn hop_position(start: Vec2, end: Vec2, t: f32, amplitude: f32, bounce_speed: f32) -> Vec2 {
    if t >= 1.0 {
        return end;
    }
    let t = t.max(0.0);
    let arc = quadratic_bezier(start, control_point(start, end), end, t);
    arc + Vec2::Y * (amplitude * (t * bounce_speed * PI).sin())
}
