//! Actor Model
//!
//! Plain data records for the two companions. Nothing in here decides
//! anything: the behavior, movement and animation modules read and write
//! these fields once per tick, and the interaction controller writes them
//! between ticks.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of frames in every atlas row
pub const FRAME_COUNT: u8 = 4;

/// Which of the two companions an actor is
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActorKind {
    /// The cat
    Pet,
    /// The human following the cat around
    Owner,
}

impl ActorKind {
    /// Short name used in logs
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Pet => "pet",
            Self::Owner => "owner",
        }
    }
}

/// Behavior states shared by both actors
///
/// `Chase` and `Talk` only apply to the owner; `Run`, `Sleep`, `Surprise`
/// and `Dragged` only apply to the pet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActorState {
    /// Standing still
    #[default]
    Idle,
    /// Walking toward a target
    Walk,
    /// Zoomies
    Run,
    /// Curled up asleep
    Sleep,
    /// Just woke up with a jolt
    Surprise,
    /// Held by the pointer
    Dragged,
    /// Owner running after a zooming pet
    Chase,
    /// Owner speaking
    Talk,
}

impl ActorState {
    /// Whether this state is meaningful for the given actor kind
    #[must_use]
    pub fn is_valid_for(self, kind: ActorKind) -> bool {
        match kind {
            ActorKind::Pet => !matches!(self, Self::Chase | Self::Talk),
            ActorKind::Owner => matches!(self, Self::Idle | Self::Walk | Self::Chase | Self::Talk),
        }
    }
}

/// A point (or vector) in viewport pixels
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate
    pub x: f32,
    /// Vertical coordinate (grows downward)
    pub y: f32,
}

impl Point {
    /// Create a point
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    #[must_use]
    pub fn distance_to(self, other: Point) -> f32 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Component-wise offset
    #[must_use]
    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Errors raised when an actor is mutated from outside the engine
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ActorError {
    /// The requested state does not exist for this kind of actor
    #[error("state {state:?} is not valid for the {} actor", kind.label())]
    InvalidState {
        /// Actor that rejected the state
        kind: ActorKind,
        /// The rejected state
        state: ActorState,
    },
}

/// Fields shared by both companions
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    /// Which companion this is
    pub kind: ActorKind,
    /// Top-left corner in viewport pixels
    pub position: Point,
    /// Last computed velocity (pixels per tick)
    pub velocity: Point,
    /// Destination for walk/run
    pub target: Point,
    /// Current behavior state
    pub(crate) state: ActorState,
    /// Current animation frame, always `< FRAME_COUNT`
    pub(crate) frame: u8,
    /// Milliseconds accumulated since the last frame advance
    pub frame_timer: f32,
    /// Horizontal facing; drawn by mirroring
    pub facing_right: bool,
    /// Fixed render scale
    pub scale: f32,
}

impl Actor {
    /// Create an idle actor at a position
    #[must_use]
    pub fn new(kind: ActorKind, position: Point, scale: f32) -> Self {
        Self {
            kind,
            position,
            velocity: Point::default(),
            target: position,
            state: ActorState::Idle,
            frame: 0,
            frame_timer: 0.0,
            facing_right: true,
            scale,
        }
    }

    /// Current state
    #[must_use]
    pub fn state(&self) -> ActorState {
        self.state
    }

    /// Current animation frame
    #[must_use]
    pub fn frame(&self) -> u8 {
        self.frame
    }

    /// Set the state from outside the engine
    ///
    /// # Errors
    ///
    /// Returns `ActorError::InvalidState` if the state does not apply to
    /// this actor's kind; the actor is left untouched.
    pub fn set_state(&mut self, state: ActorState) -> Result<(), ActorError> {
        if !state.is_valid_for(self.kind) {
            return Err(ActorError::InvalidState {
                kind: self.kind,
                state,
            });
        }
        self.enter(state);
        Ok(())
    }

    /// Transition used by the engine's own logic, which only ever picks
    /// states valid for the actor
    pub(crate) fn enter(&mut self, state: ActorState) {
        debug_assert!(state.is_valid_for(self.kind));
        if self.state != state {
            tracing::trace!(
                actor = self.kind.label(),
                from = ?self.state,
                to = ?state,
                "state change"
            );
            self.state = state;
        }
    }

    /// Advance to the next animation frame, wrapping at `FRAME_COUNT`
    pub(crate) fn next_frame(&mut self) {
        self.frame = (self.frame + 1) % FRAME_COUNT;
    }
}

/// The cat
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pet {
    /// Shared actor fields
    pub actor: Actor,
    /// Milliseconds spent idle
    pub idle_time: f32,
    /// Milliseconds spent in the current nap
    pub sleep_time: f32,
    /// Length of the current nap
    pub sleep_duration: f32,
}

impl Pet {
    /// Create an idle pet
    #[must_use]
    pub fn new(position: Point, scale: f32) -> Self {
        Self {
            actor: Actor::new(ActorKind::Pet, position, scale),
            idle_time: 0.0,
            sleep_time: 0.0,
            sleep_duration: 10_000.0,
        }
    }
}

/// The human
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Owner {
    /// Shared actor fields
    pub actor: Actor,
    /// Whether an utterance is currently playing
    pub is_talking: bool,
    /// Engine clock (ms) of the last facing flip; `None` until the first
    pub last_face_change_ms: Option<f64>,
}

impl Owner {
    /// Create an idle owner
    #[must_use]
    pub fn new(position: Point, scale: f32) -> Self {
        Self {
            actor: Actor::new(ActorKind::Owner, position, scale),
            is_talking: false,
            last_face_change_ms: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_validity_per_kind() {
        assert!(ActorState::Sleep.is_valid_for(ActorKind::Pet));
        assert!(ActorState::Dragged.is_valid_for(ActorKind::Pet));
        assert!(!ActorState::Chase.is_valid_for(ActorKind::Pet));
        assert!(!ActorState::Talk.is_valid_for(ActorKind::Pet));

        assert!(ActorState::Chase.is_valid_for(ActorKind::Owner));
        assert!(ActorState::Talk.is_valid_for(ActorKind::Owner));
        assert!(!ActorState::Sleep.is_valid_for(ActorKind::Owner));
        assert!(!ActorState::Dragged.is_valid_for(ActorKind::Owner));
    }

    #[test]
    fn test_set_state_rejects_invalid() {
        let mut owner = Owner::new(Point::new(10.0, 10.0), 2.5);
        let err = owner.actor.set_state(ActorState::Sleep).unwrap_err();
        assert_eq!(
            err,
            ActorError::InvalidState {
                kind: ActorKind::Owner,
                state: ActorState::Sleep
            }
        );
        assert_eq!(owner.actor.state(), ActorState::Idle);

        owner.actor.set_state(ActorState::Talk).unwrap();
        assert_eq!(owner.actor.state(), ActorState::Talk);
    }

    #[test]
    fn test_frame_wraps() {
        let mut pet = Pet::new(Point::default(), 1.5);
        for _ in 0..FRAME_COUNT {
            pet.actor.next_frame();
        }
        assert_eq!(pet.actor.frame(), 0);
    }

    #[test]
    fn test_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert!((a.distance_to(b) - 5.0).abs() < f32::EPSILON);
    }
}
