//! Animator
//!
//! Picks the atlas row for an actor's state and steps through the four
//! frames of that row at a per-state cadence. Facing is not handled here;
//! hosts mirror the frame when `facing_right` is false.

use crate::actor::{Actor, ActorKind, ActorState};

/// Atlas row drawn for a state
///
/// The owner has no dragged row, so anything past its last row falls back
/// to idle at sampling time (see [`Atlas::frame_pixel`](crate::Atlas::frame_pixel)).
#[must_use]
pub fn row_for(state: ActorState) -> u8 {
    match state {
        ActorState::Idle => 0,
        ActorState::Walk | ActorState::Run | ActorState::Chase => 1,
        ActorState::Sleep | ActorState::Talk => 2,
        ActorState::Surprise => 3,
        ActorState::Dragged => 4,
    }
}

/// Milliseconds each frame is held for
#[must_use]
pub fn cadence_ms(kind: ActorKind, state: ActorState) -> f32 {
    match (kind, state) {
        (ActorKind::Pet, ActorState::Sleep) => 500.0,
        (ActorKind::Pet, ActorState::Run) => 30.0,
        (ActorKind::Pet, ActorState::Walk) => 80.0,
        (ActorKind::Pet, _) => 200.0,
        (ActorKind::Owner, ActorState::Chase) => 60.0,
        (ActorKind::Owner, _) => 150.0,
    }
}

/// Accumulate `dt_ms` and advance at most one frame
///
/// Returns `true` when the frame changed.
pub fn advance(actor: &mut Actor, dt_ms: f32) -> bool {
    actor.frame_timer += dt_ms.max(0.0);
    if actor.frame_timer > cadence_ms(actor.kind, actor.state) {
        actor.frame_timer = 0.0;
        actor.next_frame();
        true
    } else {
        false
    }
}
