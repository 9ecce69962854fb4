//! Pet behavior
//!
//! ```text
//!            r < p_sleep              sleep_time > duration
//!   IDLE ───────────────► SLEEP ─────────────────────────► SURPRISE
//!    │ r < p_sleep+p_zoom                                     │ +1000ms (deferred)
//!    ├──────────────────► RUN ──┐                             ▼
//!    │ otherwise                ├── within 20px ──► IDLE     WALK
//!    └──────────────────► WALK ─┘
//! ```
//!
//! DRAGGED is entered and left by the interaction controller only.

use crate::actor::{ActorKind, ActorState, Pet};
use crate::config::EngineConfig;
use crate::host::{AudioCue, BubbleStyle};
use crate::movement::step_toward;
use crate::rng::{pick, RandomSource};
use crate::scheduler::Deferred;

use super::{random_target, Effect, IntervalTimer, World};

/// Distance at which a walk or run counts as arrived
pub const ARRIVAL_RADIUS: f32 = 20.0;

/// Walking speed in pixels per tick
pub const WALK_SPEED: f32 = 3.0;

/// Zoomies speed in pixels per tick
pub const RUN_SPEED: f32 = 8.0;

/// Per-tick chance that a running pet changes its mind about where to go
pub const RUN_RETARGET_PROBABILITY: f32 = 0.05;

/// Per-tick chance of a snore cue while asleep
pub const SNORE_PROBABILITY: f32 = 0.02;

/// Upward kick when waking with a jolt (outside bottom mode)
pub const SURPRISE_IMPULSE: f32 = -3.0;

/// Decorative thoughts floated above the pet
pub const THOUGHTS: &[&str] = &["🐟", "🧶", "🥛", "🐭", "❤️", "🐾", "✨", "🦋"];

/// Snore cue text
pub const SNORE: &str = "zzz";

/// Timers that belong to the pet's behavior rather than its actor record
#[derive(Clone, Debug, PartialEq)]
pub struct PetBrain {
    meow: IntervalTimer,
    thought: IntervalTimer,
}

impl Default for PetBrain {
    fn default() -> Self {
        Self {
            meow: IntervalTimer::new(5000.0, 8000.0, 18_000.0),
            thought: IntervalTimer::new(2000.0, 4000.0, 8000.0),
        }
    }
}

impl PetBrain {
    /// Create a brain with the initial timer windows
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Run one tick of pet behavior
    pub fn update(
        &mut self,
        pet: &mut Pet,
        world: &World,
        config: &EngineConfig,
        rng: &mut dyn RandomSource,
        effects: &mut Vec<Effect>,
    ) {
        let dt = world.dt_ms;

        match pet.actor.state {
            ActorState::Idle => {
                pet.idle_time += dt;
                let r = rng.next_unit();
                if r < config.idle_sleep_probability {
                    pet.sleep_time = 0.0;
                    pet.sleep_duration = rng.range(5000.0, 10_000.0);
                    pet.actor.enter(ActorState::Sleep);
                } else {
                    let state = if r < config.idle_sleep_probability + config.zoomies_probability {
                        ActorState::Run
                    } else {
                        ActorState::Walk
                    };
                    pet.actor.target =
                        random_target(rng, world, config.bottom_floor_offset, config.actor_size);
                    pet.actor.enter(state);
                }

                if self.meow.tick(dt, rng) {
                    effects.push(Effect::PlayCue(AudioCue::Meow));
                }
            }
            ActorState::Sleep => {
                pet.sleep_time += dt;
                if rng.chance(SNORE_PROBABILITY) {
                    effects.push(Effect::Emote {
                        actor: ActorKind::Pet,
                        text: SNORE,
                        style: BubbleStyle::SNORE,
                    });
                }
                if pet.sleep_time > pet.sleep_duration {
                    pet.actor.enter(ActorState::Surprise);
                    if !world.roam_mode.is_floor_locked() {
                        pet.actor.velocity.y = SURPRISE_IMPULSE;
                    }
                    effects.push(Effect::PlayCue(AudioCue::Meow));
                    effects.push(Effect::Schedule {
                        channel: ActorKind::Pet,
                        delay_ms: config.surprise_recovery_ms,
                        effect: Deferred::RecoverFromSurprise,
                    });
                }
            }
            ActorState::Walk | ActorState::Run => {
                pet.idle_time = 0.0;
                if pet.actor.position.distance_to(pet.actor.target) < ARRIVAL_RADIUS {
                    pet.actor.velocity = Default::default();
                    pet.actor.enter(ActorState::Idle);
                } else {
                    let running = pet.actor.state == ActorState::Run;
                    let speed = if running { RUN_SPEED } else { WALK_SPEED };
                    step_toward(&mut pet.actor, speed, false);
                    pet.actor.facing_right = pet.actor.velocity.x > 0.0;
                    if running && rng.chance(RUN_RETARGET_PROBABILITY) {
                        pet.actor.target = random_target(
                            rng,
                            world,
                            config.bottom_floor_offset,
                            config.actor_size,
                        );
                    }
                }
            }
            ActorState::Dragged => pet.idle_time = 0.0,
            // Gravity is the integrator's job; the deferred recovery ends it
            ActorState::Surprise | ActorState::Chase | ActorState::Talk => {}
        }

        if pet.actor.state != ActorState::Sleep && self.thought.tick(dt, rng) {
            effects.push(Effect::Emote {
                actor: ActorKind::Pet,
                text: pick(rng, THOUGHTS),
                style: BubbleStyle::CUE,
            });
        }
    }
}
