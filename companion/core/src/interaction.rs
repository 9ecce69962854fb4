//! Interaction Controller
//!
//! Pointer handling that happens between ticks: dragging the pet around,
//! hover-driven pass-through requests, and hit testing for clicks.
//!
//! ```text
//!   pointer_down ── within radius of pet center ──► DRAGGED, offset captured
//!   pointer_move ── dragging ──► position = pointer - offset
//!   pointer_up   ── dragging ──► IDLE, vy = 5
//! ```
//!
//! Anything that arrives without a drag in progress, or outside an actor,
//! is ignored.

use crate::actor::{Actor, ActorState, Pet, Point};
use crate::atlas::CELL_SIZE;

/// Vertical velocity seeded when a drag ends (informational only)
pub const DROP_VELOCITY: f32 = 5.0;

/// Side of an actor's drawn square in pixels
#[must_use]
pub fn footprint(actor: &Actor) -> f32 {
    f32::from(CELL_SIZE) * actor.scale
}

/// Center of an actor's drawn square
#[must_use]
pub fn center(actor: &Actor) -> Point {
    let half = footprint(actor) / 2.0;
    actor.position.offset(half, half)
}

/// Whether a point falls on an actor's drawn square
#[must_use]
pub fn hits(actor: &Actor, at: Point) -> bool {
    let size = footprint(actor);
    at.x >= actor.position.x
        && at.x < actor.position.x + size
        && at.y >= actor.position.y
        && at.y < actor.position.y + size
}

/// Pointer-driven state kept between ticks
#[derive(Clone, Debug)]
pub struct InteractionController {
    drag_offset: Option<Point>,
    last_drag_cue_ms: f64,
    over_actor: bool,
    over_control: bool,
    pass_through: bool,
}

impl Default for InteractionController {
    fn default() -> Self {
        Self {
            drag_offset: None,
            last_drag_cue_ms: f64::NEG_INFINITY,
            over_actor: false,
            over_control: false,
            pass_through: true,
        }
    }
}

impl InteractionController {
    /// Create a controller with pass-through on and nothing hovered
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a drag is in progress
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.drag_offset.is_some()
    }

    /// Pass-through state last requested from the host
    #[must_use]
    pub fn pass_through(&self) -> bool {
        self.pass_through
    }

    /// Try to pick the pet up
    ///
    /// Returns `true` when a drag started.
    pub fn pointer_down(&mut self, pet: &mut Pet, at: Point, capture_radius: f32) -> bool {
        if self.is_dragging() || center(&pet.actor).distance_to(at) >= capture_radius {
            return false;
        }

        self.drag_offset = Some(Point::new(
            at.x - pet.actor.position.x,
            at.y - pet.actor.position.y,
        ));
        pet.actor.velocity = Point::default();
        pet.idle_time = 0.0;
        pet.actor.enter(ActorState::Dragged);
        tracing::debug!(x = at.x, y = at.y, "Drag started");
        true
    }

    /// Follow the pointer while dragging
    ///
    /// Returns `false` when no drag is in progress.
    pub fn pointer_move(&mut self, pet: &mut Pet, at: Point) -> bool {
        let Some(offset) = self.drag_offset else {
            return false;
        };
        pet.actor.position = Point::new(at.x - offset.x, at.y - offset.y);
        true
    }

    /// Drop the pet
    ///
    /// Returns `false` when no drag is in progress.
    pub fn pointer_up(&mut self, pet: &mut Pet) -> bool {
        if self.drag_offset.take().is_none() {
            return false;
        }
        pet.actor.enter(ActorState::Idle);
        pet.actor.velocity = Point::new(0.0, DROP_VELOCITY);
        tracing::debug!(x = pet.actor.position.x, y = pet.actor.position.y, "Drag ended");
        true
    }

    /// Whether a drag feedback cue may play at `now_ms`; records it if so
    pub fn take_drag_cue(&mut self, now_ms: f64, interval_ms: u64) -> bool {
        if now_ms - self.last_drag_cue_ms >= interval_ms as f64 {
            self.last_drag_cue_ms = now_ms;
            true
        } else {
            false
        }
    }

    /// Record whether the pointer is over an actor
    ///
    /// Returns the pass-through request to send, if it changed.
    pub fn hover_actor(&mut self, over: bool) -> Option<bool> {
        self.over_actor = over;
        self.resolve_pass_through()
    }

    /// Record whether the pointer is over a host control (mode button)
    ///
    /// Returns the pass-through request to send, if it changed.
    pub fn hover_control(&mut self, over: bool) -> Option<bool> {
        self.over_control = over;
        self.resolve_pass_through()
    }

    /// Re-evaluate pass-through after a drag ends
    pub fn after_drag(&mut self) -> Option<bool> {
        self.resolve_pass_through()
    }

    fn resolve_pass_through(&mut self) -> Option<bool> {
        let interactive = self.over_actor || self.over_control;
        let wanted = if interactive {
            false
        } else if self.is_dragging() {
            // Keep capturing until the pet is dropped
            self.pass_through
        } else {
            true
        };
        if wanted == self.pass_through {
            return None;
        }
        self.pass_through = wanted;
        Some(wanted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pet_at(x: f32, y: f32) -> Pet {
        Pet::new(Point::new(x, y), 1.5)
    }

    #[test]
    fn test_drag_tracks_pointer_exactly() {
        let mut ctl = InteractionController::new();
        let mut pet = pet_at(100.0, 100.0);

        assert!(ctl.pointer_down(&mut pet, Point::new(110.0, 110.0), 60.0));
        assert_eq!(pet.actor.state(), ActorState::Dragged);

        assert!(ctl.pointer_move(&mut pet, Point::new(200.0, 150.0)));
        assert_eq!(pet.actor.position, Point::new(190.0, 140.0));

        assert!(ctl.pointer_up(&mut pet));
        assert_eq!(pet.actor.state(), ActorState::Idle);
        assert!((pet.actor.velocity.y - DROP_VELOCITY).abs() < f32::EPSILON);
        assert!(!ctl.is_dragging());
    }

    #[test]
    fn test_pointer_far_from_pet_is_ignored() {
        let mut ctl = InteractionController::new();
        let mut pet = pet_at(100.0, 100.0);

        assert!(!ctl.pointer_down(&mut pet, Point::new(300.0, 300.0), 60.0));
        assert_eq!(pet.actor.state(), ActorState::Idle);
        assert!(!ctl.pointer_move(&mut pet, Point::new(200.0, 150.0)));
        assert!(!ctl.pointer_up(&mut pet));
        assert_eq!(pet.actor.position, Point::new(100.0, 100.0));
    }

    #[test]
    fn test_drag_cue_is_rate_limited() {
        let mut ctl = InteractionController::new();
        assert!(ctl.take_drag_cue(0.0, 600));
        assert!(!ctl.take_drag_cue(599.0, 600));
        assert!(ctl.take_drag_cue(600.0, 600));
        assert!(!ctl.take_drag_cue(1000.0, 600));
    }

    #[test]
    fn test_hover_requests_only_on_transitions() {
        let mut ctl = InteractionController::new();
        assert_eq!(ctl.hover_actor(true), Some(false));
        assert_eq!(ctl.hover_actor(true), None);
        assert_eq!(ctl.hover_control(true), None);
        assert_eq!(ctl.hover_actor(false), None);
        assert_eq!(ctl.hover_control(false), Some(true));
    }

    #[test]
    fn test_leaving_during_drag_keeps_capture() {
        let mut ctl = InteractionController::new();
        let mut pet = pet_at(100.0, 100.0);

        assert_eq!(ctl.hover_actor(true), Some(false));
        ctl.pointer_down(&mut pet, Point::new(120.0, 120.0), 60.0);
        assert_eq!(ctl.hover_actor(false), None);
        assert!(!ctl.pass_through());

        ctl.pointer_up(&mut pet);
        assert_eq!(ctl.after_drag(), Some(true));
    }

    #[test]
    fn test_hit_testing_uses_scaled_cell() {
        let pet = pet_at(100.0, 100.0);
        assert!((footprint(&pet.actor) - 48.0).abs() < f32::EPSILON);
        assert_eq!(center(&pet.actor), Point::new(124.0, 124.0));
        assert!(hits(&pet.actor, Point::new(147.0, 100.0)));
        assert!(!hits(&pet.actor, Point::new(148.0, 100.0)));
    }
}
