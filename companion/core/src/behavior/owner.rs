//! Owner behavior
//!
//! The owner only ever reacts to the pet:
//!
//! | Situation                     | State          | Movement            |
//! |-------------------------------|----------------|---------------------|
//! | pet has the zoomies           | `Chase`        | 5 px/tick at pet    |
//! | pet further than 200 px       | `Walk`         | 2 px/tick at pet    |
//! | close by, 5% roll             | `Walk`         | wander nearby       |
//! | close by                      | `Talk`/`Idle`  | none                |
//!
//! Facing flips are rate limited so a pet zig-zagging past the owner does
//! not make the sprite flicker.

use crate::actor::{Actor, ActorState, Owner, Point};
use crate::config::EngineConfig;
use crate::movement::step_toward;
use crate::rng::{pick, RandomSource};

use super::{Effect, World};

/// Chasing speed in pixels per tick
pub const CHASE_SPEED: f32 = 5.0;

/// Following/wandering speed in pixels per tick
pub const FOLLOW_SPEED: f32 = 2.0;

/// Distance beyond which the owner walks after the pet
pub const FOLLOW_DISTANCE: f32 = 200.0;

/// Below this distance a chasing owner never turns around
pub const CHASE_TURN_MIN_DISTANCE: f32 = 60.0;

/// How strongly left/right the bearing must be before turning
pub const TURN_COSINE: f32 = 0.6;

/// Per-tick chance of wandering off when close to the pet
pub const WANDER_PROBABILITY: f32 = 0.05;

/// Per-tick chance of thinking out loud while idle
pub const MUSING_PROBABILITY: f32 = 0.005;

/// Time between shouts while chasing
pub const SHOUT_INTERVAL_MS: f32 = 3000.0;

/// Things the owner yells at a zooming cat
pub const SHOUTS: &[&str] = &["Stop!", "Wait!", "Food!", "Hey!!", "Zoomies!"];

/// Idle musings
pub const MUSINGS: &[&str] = &["Hmm...", "Where is Kitty?", "Kitty?", "Work time."];

/// Owner-side behavior timers
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OwnerBrain {
    shout_timer_ms: f32,
}

impl OwnerBrain {
    /// Create a brain with a fresh shout timer
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Run one tick of owner behavior against the pet's current position
    pub fn update(
        &mut self,
        owner: &mut Owner,
        pet: &Actor,
        world: &World,
        config: &EngineConfig,
        rng: &mut dyn RandomSource,
        effects: &mut Vec<Effect>,
    ) {
        let lock_vertical = world.roam_mode.is_floor_locked();
        let dist = owner.actor.position.distance_to(pet.position);

        if pet.state == ActorState::Run {
            owner.actor.enter(ActorState::Chase);
            owner.actor.target = pet.position;
            step_toward(&mut owner.actor, CHASE_SPEED, lock_vertical);
            if dist > CHASE_TURN_MIN_DISTANCE {
                Self::face_bearing(owner, pet.position, world, config);
            }

            self.shout_timer_ms += world.dt_ms;
            if self.shout_timer_ms > SHOUT_INTERVAL_MS {
                self.shout_timer_ms = 0.0;
                effects.push(Effect::Say(pick(rng, SHOUTS)));
            }
        } else if dist > FOLLOW_DISTANCE {
            owner.actor.enter(ActorState::Walk);
            owner.actor.target = pet.position;
            step_toward(&mut owner.actor, FOLLOW_SPEED, lock_vertical);
            Self::face_bearing(owner, pet.position, world, config);
        } else if rng.chance(WANDER_PROBABILITY) {
            let here = owner.actor.position;
            let x = here.x + rng.range(-100.0, 100.0);
            let y = if lock_vertical {
                world.viewport.floor_y(config.owner_floor_offset)
            } else {
                here.y + rng.range(-50.0, 50.0)
            };
            let target = Point::new(x, y);
            owner.actor.enter(ActorState::Walk);
            owner.actor.target = target;
            step_toward(&mut owner.actor, FOLLOW_SPEED, lock_vertical);
            Self::face_bearing(owner, target, world, config);
        } else {
            owner.actor.velocity = Point::default();
            if owner.is_talking {
                owner.actor.enter(ActorState::Talk);
            } else {
                owner.actor.enter(ActorState::Idle);
                if rng.chance(MUSING_PROBABILITY) {
                    effects.push(Effect::Say(pick(rng, MUSINGS)));
                }
            }
        }
    }

    /// Turn toward `toward` if the bearing is decisive and the last turn
    /// was long enough ago
    fn face_bearing(owner: &mut Owner, toward: Point, world: &World, config: &EngineConfig) {
        let rested = match owner.last_face_change_ms {
            Some(last) => world.now_ms - last > config.face_change_hysteresis_ms as f64,
            None => true,
        };
        if !rested {
            return;
        }

        let from = owner.actor.position;
        let dist = from.distance_to(toward);
        if dist <= f32::EPSILON {
            return;
        }
        let cos = (toward.x - from.x) / dist;

        let turn = if cos > TURN_COSINE && !owner.actor.facing_right {
            Some(true)
        } else if cos < -TURN_COSINE && owner.actor.facing_right {
            Some(false)
        } else {
            None
        };

        if let Some(facing_right) = turn {
            owner.actor.facing_right = facing_right;
            owner.last_face_change_ms = Some(world.now_ms);
            tracing::trace!(facing_right, "owner turned");
        }
    }
}
