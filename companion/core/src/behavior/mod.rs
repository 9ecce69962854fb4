//! Behavior State Machines
//!
//! One "brain" per actor decides, once per tick, what the actor wants to do
//! next. Brains only touch their own actor and read the other one; every
//! side effect that leaves the actor model (bubbles, sounds, deferred
//! transitions) is pushed as an [`Effect`] and applied by the engine after
//! both brains have run.
//!
//! ```text
//!   World + dt ─► PetBrain::update ─┐
//!                                   ├─► Vec<Effect> ─► Engine applies
//!   World + dt ─► OwnerBrain::update┘
//! ```
//!
//! All randomness is drawn from the [`RandomSource`] passed in, in a fixed
//! order per branch, so a scripted source replays a scenario exactly.

pub mod owner;
pub mod pet;

pub use owner::OwnerBrain;
pub use pet::PetBrain;

use crate::actor::{ActorKind, Point};
use crate::host::{AudioCue, BubbleStyle};
use crate::movement::Viewport;
use crate::rng::RandomSource;
use crate::roam::RoamMode;
use crate::scheduler::Deferred;

/// Lowest coordinate a random target may land on
pub const TARGET_MARGIN: f32 = 20.0;

/// Everything a brain needs to know about the current tick
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct World {
    /// Viewport size this tick
    pub viewport: Viewport,
    /// Active roam mode
    pub roam_mode: RoamMode,
    /// Engine clock in milliseconds
    pub now_ms: f64,
    /// Time since the previous tick in milliseconds
    pub dt_ms: f32,
}

/// Side effects requested by a brain
#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    /// Float a cue above an actor
    Emote {
        /// Actor the cue follows
        actor: ActorKind,
        /// Cue text (usually a single emoji)
        text: &'static str,
        /// Look of the cue
        style: BubbleStyle,
    },
    /// Show a line in the owner's speech bubble
    Say(&'static str),
    /// Play a sound
    PlayCue(AudioCue),
    /// Queue a deferred effect
    Schedule {
        /// Actor whose generation guards the effect
        channel: ActorKind,
        /// Delay from now
        delay_ms: u64,
        /// What to do
        effect: Deferred,
    },
}

/// Accumulating timer that fires once its randomized window is exceeded
///
/// After firing, the next window is drawn uniformly from `[min_ms, max_ms)`.
#[derive(Clone, Debug, PartialEq)]
pub struct IntervalTimer {
    elapsed_ms: f32,
    window_ms: f32,
    min_ms: f32,
    max_ms: f32,
}

impl IntervalTimer {
    /// Create a timer whose first window is `first_ms`
    #[must_use]
    pub fn new(first_ms: f32, min_ms: f32, max_ms: f32) -> Self {
        Self {
            elapsed_ms: 0.0,
            window_ms: first_ms,
            min_ms,
            max_ms,
        }
    }

    /// Accumulate `dt_ms`; returns `true` when the window was exceeded
    pub fn tick(&mut self, dt_ms: f32, rng: &mut dyn RandomSource) -> bool {
        self.elapsed_ms += dt_ms;
        if self.elapsed_ms > self.window_ms {
            self.elapsed_ms = 0.0;
            self.window_ms = rng.range(self.min_ms, self.max_ms);
            true
        } else {
            false
        }
    }

    /// Length of the current window
    #[must_use]
    pub fn window_ms(&self) -> f32 {
        self.window_ms
    }
}

/// Random on-screen destination for the pet
///
/// `x` is uniform across the viewport; `y` is uniform too, except in bottom
/// mode where it is the pet's floor and no draw is made. Drawn coordinates
/// are kept `TARGET_MARGIN` away from the top-left and inside the actor
/// footprint.
pub(crate) fn random_target(
    rng: &mut dyn RandomSource,
    world: &World,
    floor_offset: f32,
    size: f32,
) -> Point {
    let viewport = world.viewport;
    let x = (rng.next_unit() * viewport.width)
        .max(TARGET_MARGIN)
        .min(viewport.max_x(size));
    // Floor targets are exempt from the max_y clamp
    let y = if world.roam_mode.is_floor_locked() {
        viewport.floor_y(floor_offset)
    } else {
        (rng.next_unit() * viewport.height)
            .max(TARGET_MARGIN)
            .min(viewport.max_y(size))
    };
    Point::new(x, y)
}
