//! Movement Integrator
//!
//! Runs after both state machines have set their intents. Applies the roam
//! mode's vertical policy, the post-wake-up hop, and keeps every actor on
//! screen.
//!
//! | Mode     | Vertical                                   | Horizontal   |
//! |----------|--------------------------------------------|--------------|
//! | `Full`   | free, clamped to `[0, H - size]`           | clamped      |
//! | `Bottom` | eased toward the floor, snapped within 5px | clamped      |
//! | `Hidden` | untouched                                  | untouched    |
//!
//! A pet being dragged is left alone entirely; the pointer owns it.

use serde::{Deserialize, Serialize};

use crate::actor::{Actor, ActorState, Point};
use crate::roam::RoamMode;

/// Downward acceleration applied to a startled pet (pixels/tick²)
pub const SURPRISE_GRAVITY: f32 = 0.2;

/// Fraction of the remaining distance covered per tick while settling
pub const FLOOR_EASING: f32 = 0.1;

/// Distance from the floor at which easing snaps to it
pub const FLOOR_SNAP_DISTANCE: f32 = 5.0;

/// Drawable area in pixels
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Viewport {
    /// Width in pixels
    pub width: f32,
    /// Height in pixels
    pub height: f32,
}

impl Viewport {
    /// Create a viewport
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Whether there is anything to draw on
    #[must_use]
    pub fn is_empty(self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    /// Largest x that keeps an actor of `size` fully on screen
    #[must_use]
    pub fn max_x(self, size: f32) -> f32 {
        (self.width - size).max(0.0)
    }

    /// Largest y that keeps an actor of `size` fully on screen
    #[must_use]
    pub fn max_y(self, size: f32) -> f32 {
        (self.height - size).max(0.0)
    }

    /// Floor line for an actor whose floor sits `offset` above the bottom edge
    #[must_use]
    pub fn floor_y(self, offset: f32) -> f32 {
        (self.height - offset).max(0.0)
    }
}

/// Step toward the actor's target at a fixed speed
///
/// Sets velocity, moves the actor, and returns the distance to the target
/// measured before the step. With `lock_vertical` only the horizontal
/// component is applied. Facing is left to the caller.
pub(crate) fn step_toward(actor: &mut Actor, speed: f32, lock_vertical: bool) -> f32 {
    let dx = actor.target.x - actor.position.x;
    let dy = actor.target.y - actor.position.y;
    let dist = dx.hypot(dy);
    if dist <= f32::EPSILON {
        actor.velocity = Point::default();
        return dist;
    }

    actor.velocity = Point::new(dx / dist * speed, dy / dist * speed);
    actor.position.x += actor.velocity.x;
    if !lock_vertical {
        actor.position.y += actor.velocity.y;
    }
    dist
}

/// Put an actor straight onto its floor (used when entering bottom mode)
pub(crate) fn relocate_to_floor(actor: &mut Actor, viewport: Viewport, floor_offset: f32) {
    let floor = viewport.floor_y(floor_offset);
    actor.position.y = floor;
    actor.target.y = floor;
}

/// Apply the roam-mode policy and screen clamping for one tick
pub fn integrate(
    actor: &mut Actor,
    mode: RoamMode,
    viewport: Viewport,
    floor_offset: f32,
    size: f32,
) {
    if actor.state == ActorState::Dragged {
        return;
    }

    match mode {
        RoamMode::Hidden => return,
        RoamMode::Full => {
            if actor.state == ActorState::Surprise {
                actor.velocity.y += SURPRISE_GRAVITY;
                actor.position.y += actor.velocity.y;
            }
            actor.position.y = actor.position.y.max(0.0).min(viewport.max_y(size));
        }
        RoamMode::Bottom => {
            let floor = viewport.floor_y(floor_offset);
            if (actor.position.y - floor).abs() > FLOOR_SNAP_DISTANCE {
                actor.position.y += (floor - actor.position.y) * FLOOR_EASING;
            } else {
                actor.position.y = floor;
            }
        }
    }

    actor.position.x = actor.position.x.max(0.0).min(viewport.max_x(size));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::ActorKind;

    const VIEW: Viewport = Viewport::new(800.0, 600.0);

    fn actor_at(x: f32, y: f32) -> Actor {
        Actor::new(ActorKind::Pet, Point::new(x, y), 1.5)
    }

    #[test]
    fn test_full_mode_clamps_both_axes() {
        let mut actor = actor_at(-30.0, 900.0);
        integrate(&mut actor, RoamMode::Full, VIEW, 50.0, 50.0);
        assert_eq!(actor.position, Point::new(0.0, 550.0));

        let mut actor = actor_at(900.0, -5.0);
        integrate(&mut actor, RoamMode::Full, VIEW, 50.0, 50.0);
        assert_eq!(actor.position, Point::new(750.0, 0.0));
    }

    #[test]
    fn test_bottom_mode_eases_then_snaps() {
        let mut actor = actor_at(100.0, 100.0);
        let floor = VIEW.floor_y(50.0);

        integrate(&mut actor, RoamMode::Bottom, VIEW, 50.0, 50.0);
        assert!((actor.position.y - 145.0).abs() < 1e-3);

        let mut ticks = 1;
        while actor.position.y != floor {
            integrate(&mut actor, RoamMode::Bottom, VIEW, 50.0, 50.0);
            ticks += 1;
            assert!(ticks < 200, "never settled");
        }

        // Once settled it stays exactly on the floor
        for _ in 0..50 {
            integrate(&mut actor, RoamMode::Bottom, VIEW, 50.0, 50.0);
            assert_eq!(actor.position.y, floor);
        }
    }

    #[test]
    fn test_surprise_hop_falls_back_down() {
        let mut actor = actor_at(100.0, 300.0);
        actor.state = ActorState::Surprise;
        actor.velocity.y = -3.0;

        integrate(&mut actor, RoamMode::Full, VIEW, 50.0, 50.0);
        assert!((actor.position.y - 297.2).abs() < 1e-3);
        assert!((actor.velocity.y + 2.8).abs() < 1e-5);
    }

    #[test]
    fn test_dragged_actor_is_not_clamped() {
        let mut actor = actor_at(-40.0, 2000.0);
        actor.state = ActorState::Dragged;
        integrate(&mut actor, RoamMode::Full, VIEW, 50.0, 50.0);
        assert_eq!(actor.position, Point::new(-40.0, 2000.0));
    }

    #[test]
    fn test_hidden_mode_leaves_position() {
        let mut actor = actor_at(-40.0, 2000.0);
        integrate(&mut actor, RoamMode::Hidden, VIEW, 50.0, 50.0);
        assert_eq!(actor.position, Point::new(-40.0, 2000.0));
    }

    #[test]
    fn test_tiny_viewport_pins_to_origin() {
        let mut actor = actor_at(10.0, 10.0);
        integrate(&mut actor, RoamMode::Full, Viewport::new(30.0, 30.0), 50.0, 50.0);
        assert_eq!(actor.position, Point::new(0.0, 0.0));
    }

    #[test]
    fn test_step_toward_moves_along_bearing() {
        let mut actor = actor_at(0.0, 0.0);
        actor.target = Point::new(30.0, 40.0);
        let dist = step_toward(&mut actor, 2.0, false);
        assert!((dist - 50.0).abs() < 1e-4);
        assert!((actor.position.x - 1.2).abs() < 1e-5);
        assert!((actor.position.y - 1.6).abs() < 1e-5);

        actor.target = Point::new(-100.0, 500.0);
        step_toward(&mut actor, 2.0, true);
        assert!((actor.position.y - 1.6).abs() < 1e-5);
        assert!(actor.velocity.x < 0.0);
    }
}
