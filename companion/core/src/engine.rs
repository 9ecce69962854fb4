//! Engine - The Simulation Context
//!
//! The engine owns everything that changes over time: both actors, the
//! roam mode, the behavior timers, the deferred queue, the bubbles and the
//! random source. There is no global state; a host creates one engine and
//! drives it.
//!
//! # Tick
//!
//! ```text
//!   tick(dt)
//!     │
//!     ├─ 1. clock += dt, viewport = host.viewport_size()
//!     ├─ 2. due deferred effects (generation-checked)
//!     ├─ 3. pet brain, owner brain          (skipped while hidden)
//!     ├─ 4. movement integrator            (skipped while hidden)
//!     ├─ 5. animator                       (skipped while hidden)
//!     ├─ 6. effects → bubbles / sounds / deferred queue
//!     └─ 7. overlay update (always, so bubbles decay while hidden)
//! ```
//!
//! Pointer handlers (`pointer_down`, `pointer_move`, ...) run between
//! ticks and leave the actors in a state the next tick can consume.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::actor::{ActorError, ActorKind, ActorState, Owner, Pet, Point};
use crate::animator;
use crate::atlas::Atlas;
use crate::behavior::{random_target, Effect, OwnerBrain, PetBrain, World};
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::host::{play_cue_with_fallback, AudioCue, BubbleStyle, Host};
use crate::interaction::{self, InteractionController};
use crate::movement::{self, Viewport};
use crate::overlay::{BubbleKind, OverlayManager};
use crate::rng::{RandomSource, SeededRandom};
use crate::roam::RoamMode;
use crate::scheduler::{Deferred, Scheduler};

/// What the owner says when clicked
pub const GREETING: &str = "Hi there! Here's my playful kitty!";

/// Offset of the roam-mode caption from the owner
const CAPTION_OFFSET: Point = Point::new(-70.0, -85.0);

/// Drawable state of one actor
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActorSnapshot {
    /// Which actor
    pub kind: ActorKind,
    /// Top-left corner
    pub position: Point,
    /// Behavior state
    pub state: ActorState,
    /// Atlas row to draw
    pub row: u8,
    /// Atlas frame to draw
    pub frame: u8,
    /// Mirror the frame when false
    pub facing_right: bool,
    /// Render scale
    pub scale: f32,
    /// Whether the actor is drawn at all
    pub visible: bool,
}

/// Drawable state of one bubble
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BubbleSnapshot {
    /// Text shown
    pub text: String,
    /// Cue or speech
    pub kind: BubbleKind,
    /// Screen position
    pub position: Point,
    /// Current opacity
    pub opacity: f32,
    /// Milliseconds left
    pub remaining_life_ms: f32,
    /// Actor followed, if any
    pub attached: Option<ActorKind>,
}

/// Everything a host needs to draw one frame
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    /// Ticks run so far
    pub tick: u64,
    /// Engine clock in milliseconds
    pub clock_ms: f64,
    /// Active roam mode
    pub roam_mode: RoamMode,
    /// Viewport used by the last tick
    pub viewport: Viewport,
    /// The cat
    pub pet: ActorSnapshot,
    /// The human
    pub owner: ActorSnapshot,
    /// Live bubbles, oldest first
    pub bubbles: Vec<BubbleSnapshot>,
    /// Line currently being spoken
    pub utterance: Option<String>,
}

/// The dual-actor simulation
pub struct Engine {
    config: EngineConfig,
    rng: Box<dyn RandomSource>,
    pet: Pet,
    owner: Owner,
    pet_brain: PetBrain,
    owner_brain: OwnerBrain,
    roam_mode: RoamMode,
    viewport: Viewport,
    clock_ms: f64,
    ticks: u64,
    scheduler: Scheduler,
    overlay: OverlayManager,
    interaction: InteractionController,
    pet_atlas: Atlas,
    owner_atlas: Atlas,
    utterance: Option<String>,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("roam_mode", &self.roam_mode)
            .field("clock_ms", &self.clock_ms)
            .field("ticks", &self.ticks)
            .field("pet", &self.pet.actor.state)
            .field("owner", &self.owner.actor.state)
            .field("bubbles", &self.overlay.len())
            .finish_non_exhaustive()
    }
}

impl Engine {
    /// Start the engine against a host
    ///
    /// Validates the config, generates both atlases and places the actors
    /// either side of the viewport center.
    ///
    /// # Errors
    ///
    /// - `EngineError::Config` if the config is invalid
    /// - `EngineError::MissingSurface` if the host has no drawable area
    /// - `EngineError::Atlas` if an atlas can't be drawn
    pub fn new<H: Host>(
        config: EngineConfig,
        rng: Box<dyn RandomSource>,
        host: &mut H,
    ) -> Result<Self, EngineError> {
        config.validate()?;

        let (width, height) = host.viewport_size();
        let viewport = Viewport::new(width, height);
        if viewport.is_empty() {
            return Err(EngineError::MissingSurface { width, height });
        }

        let pet_atlas = Atlas::generate(ActorKind::Pet)?;
        let owner_atlas = Atlas::generate(ActorKind::Owner)?;

        let mut pet = Pet::new(Point::new(width / 2.0 + 50.0, height / 2.0), config.pet_scale);
        let mut owner = Owner::new(Point::new(width / 2.0 - 50.0, height / 2.0), config.owner_scale);
        let roam_mode = config.roam_mode;
        if roam_mode.is_floor_locked() {
            movement::relocate_to_floor(&mut pet.actor, viewport, config.bottom_floor_offset);
            movement::relocate_to_floor(&mut owner.actor, viewport, config.owner_floor_offset);
        }

        host.request_pointer_pass_through(true);
        tracing::info!(width, height, roam_mode = %roam_mode, "Duo loaded");

        Ok(Self {
            overlay: OverlayManager::new(config.bubble_life_ms),
            config,
            rng,
            pet,
            owner,
            pet_brain: PetBrain::new(),
            owner_brain: OwnerBrain::new(),
            roam_mode,
            viewport,
            clock_ms: 0.0,
            ticks: 0,
            scheduler: Scheduler::new(),
            interaction: InteractionController::new(),
            pet_atlas,
            owner_atlas,
            utterance: None,
        })
    }

    /// Start the engine with a seeded [`SeededRandom`]
    ///
    /// # Errors
    ///
    /// See [`Engine::new`].
    pub fn with_seed<H: Host>(
        config: EngineConfig,
        seed: u64,
        host: &mut H,
    ) -> Result<Self, EngineError> {
        Self::new(config, Box::new(SeededRandom::from_seed(seed)), host)
    }

    // ========================================================================
    // Tick
    // ========================================================================

    /// Advance the simulation by `dt`
    pub fn tick<H: Host>(&mut self, dt: Duration, host: &mut H) {
        let dt_ms = (dt.as_secs_f64() * 1000.0) as f32;
        self.clock_ms += f64::from(dt_ms);
        self.ticks += 1;

        let (width, height) = host.viewport_size();
        self.viewport = Viewport::new(width, height);

        for (channel, effect) in self.scheduler.drain_due(self.clock_ms) {
            self.apply_deferred(channel, effect);
        }

        let mut effects = Vec::new();
        if self.roam_mode.actors_visible() && !self.viewport.is_empty() {
            let world = self.world(dt_ms);
            self.pet_brain.update(
                &mut self.pet,
                &world,
                &self.config,
                self.rng.as_mut(),
                &mut effects,
            );
            self.owner_brain.update(
                &mut self.owner,
                &self.pet.actor,
                &world,
                &self.config,
                self.rng.as_mut(),
                &mut effects,
            );

            movement::integrate(
                &mut self.pet.actor,
                self.roam_mode,
                self.viewport,
                self.config.bottom_floor_offset,
                self.config.actor_size,
            );
            movement::integrate(
                &mut self.owner.actor,
                self.roam_mode,
                self.viewport,
                self.config.owner_floor_offset,
                self.config.actor_size,
            );

            animator::advance(&mut self.pet.actor, dt_ms);
            animator::advance(&mut self.owner.actor, dt_ms);
        }

        for effect in effects {
            self.apply_effect(effect, host);
        }

        let pet_at = self.pet.actor.position;
        let owner_at = self.owner.actor.position;
        self.overlay.update(host, dt_ms, |kind| match kind {
            ActorKind::Pet => pet_at,
            ActorKind::Owner => owner_at,
        });
    }

    fn world(&self, dt_ms: f32) -> World {
        World {
            viewport: self.viewport,
            roam_mode: self.roam_mode,
            now_ms: self.clock_ms,
            dt_ms,
        }
    }

    fn apply_deferred(&mut self, channel: ActorKind, effect: Deferred) {
        match effect {
            Deferred::RecoverFromSurprise => {
                if !self.roam_mode.actors_visible() {
                    // Can't walk anywhere while hidden; try again later
                    self.scheduler.schedule(
                        channel,
                        self.clock_ms,
                        self.config.surprise_recovery_ms,
                        effect,
                    );
                    return;
                }
                if self.pet.actor.state != ActorState::Surprise {
                    return;
                }
                let world = self.world(0.0);
                self.pet.actor.target = random_target(
                    self.rng.as_mut(),
                    &world,
                    self.config.bottom_floor_offset,
                    self.config.actor_size,
                );
                self.pet.actor.enter(ActorState::Walk);
            }
            Deferred::StopTalking => {
                self.owner.is_talking = false;
                self.utterance = None;
            }
        }
    }

    fn apply_effect<H: Host>(&mut self, effect: Effect, host: &mut H) {
        match effect {
            Effect::Emote { actor, text, style } => {
                let origin = self.actor_position(actor);
                self.overlay
                    .spawn(host, text, origin, style, BubbleKind::Cue, Some(actor));
            }
            Effect::Say(text) => {
                let origin = self.owner.actor.position;
                self.overlay.spawn(
                    host,
                    text,
                    origin,
                    BubbleStyle::SPEECH,
                    BubbleKind::Speech,
                    Some(ActorKind::Owner),
                );
            }
            Effect::PlayCue(cue) => play_cue_with_fallback(host, cue),
            Effect::Schedule {
                channel,
                delay_ms,
                effect,
            } => self
                .scheduler
                .schedule(channel, self.clock_ms, delay_ms, effect),
        }
    }

    fn actor_position(&self, kind: ActorKind) -> Point {
        match kind {
            ActorKind::Pet => self.pet.actor.position,
            ActorKind::Owner => self.owner.actor.position,
        }
    }

    // ========================================================================
    // Pointer Input
    // ========================================================================

    /// Pointer pressed; picks the pet up if close enough
    ///
    /// A press on the owner never picks the pet up, since the owner is
    /// drawn on top. Returns `true` when a drag started.
    pub fn pointer_down<H: Host>(&mut self, at: Point, host: &mut H) -> bool {
        if !self.roam_mode.actors_visible() || self.actor_at(at) == Some(ActorKind::Owner) {
            return false;
        }
        if !self
            .interaction
            .pointer_down(&mut self.pet, at, self.config.drag_capture_radius)
        {
            return false;
        }
        self.scheduler.invalidate(ActorKind::Pet);
        if self
            .interaction
            .take_drag_cue(self.clock_ms, self.config.drag_cue_interval_ms)
        {
            play_cue_with_fallback(host, AudioCue::DragMeow);
        }
        true
    }

    /// Pointer moved; drags the pet and updates hover
    pub fn pointer_move<H: Host>(&mut self, at: Point, host: &mut H) {
        if self.interaction.pointer_move(&mut self.pet, at)
            && self
                .interaction
                .take_drag_cue(self.clock_ms, self.config.drag_cue_interval_ms)
        {
            play_cue_with_fallback(host, AudioCue::DragMeow);
        }
        self.pointer_hover(at, host);
    }

    /// Pointer released; drops the pet if it was being dragged
    pub fn pointer_up<H: Host>(&mut self, host: &mut H) {
        if self.interaction.pointer_up(&mut self.pet) {
            if let Some(ignore) = self.interaction.after_drag() {
                host.request_pointer_pass_through(ignore);
            }
        }
    }

    /// Pointer position for hover tracking, without a drag
    pub fn pointer_hover<H: Host>(&mut self, at: Point, host: &mut H) {
        let over = self.actor_at(at).is_some();
        if let Some(ignore) = self.interaction.hover_actor(over) {
            host.request_pointer_pass_through(ignore);
        }
    }

    /// The host's own control (mode button) gained or lost the pointer
    pub fn set_control_hover<H: Host>(&mut self, over: bool, host: &mut H) {
        if let Some(ignore) = self.interaction.hover_control(over) {
            host.request_pointer_pass_through(ignore);
        }
    }

    /// Primary click; the owner greets when clicked
    ///
    /// Returns `true` if the click landed on the owner.
    pub fn click<H: Host>(&mut self, at: Point, host: &mut H) -> bool {
        if self.actor_at(at) != Some(ActorKind::Owner) {
            return false;
        }
        self.greet(host);
        true
    }

    /// Secondary click; cycles the roam mode when it lands on an actor
    ///
    /// Returns `true` if the mode changed.
    pub fn secondary_click<H: Host>(&mut self, at: Point, host: &mut H) -> bool {
        if self.actor_at(at).is_none() {
            return false;
        }
        self.cycle_roam_mode(host);
        true
    }

    /// Topmost visible actor under a point (the owner is drawn over the pet)
    #[must_use]
    pub fn actor_at(&self, at: Point) -> Option<ActorKind> {
        if !self.roam_mode.actors_visible() {
            return None;
        }
        if interaction::hits(&self.owner.actor, at) {
            Some(ActorKind::Owner)
        } else if interaction::hits(&self.pet.actor, at) {
            Some(ActorKind::Pet)
        } else {
            None
        }
    }

    // ========================================================================
    // Commands
    // ========================================================================

    /// Advance `Full → Bottom → Hidden → Full` and apply the side effects
    pub fn cycle_roam_mode<H: Host>(&mut self, host: &mut H) -> RoamMode {
        let mode = self.roam_mode.next();
        self.roam_mode = mode;

        if !mode.actors_visible() && self.interaction.pointer_up(&mut self.pet) {
            if let Some(ignore) = self.interaction.after_drag() {
                host.request_pointer_pass_through(ignore);
            }
        }
        if mode.is_floor_locked() {
            movement::relocate_to_floor(
                &mut self.pet.actor,
                self.viewport,
                self.config.bottom_floor_offset,
            );
            movement::relocate_to_floor(
                &mut self.owner.actor,
                self.viewport,
                self.config.owner_floor_offset,
            );
        }

        let at = self.owner.actor.position.offset(CAPTION_OFFSET.x, CAPTION_OFFSET.y);
        let at = Point::new(at.x.max(0.0), at.y.max(0.0));
        self.overlay
            .spawn(host, mode.caption(), at, BubbleStyle::CUE, BubbleKind::Cue, None);

        tracing::info!(mode = %mode, "Roam mode changed");
        host.log_diagnostic(mode.caption());
        mode
    }

    /// Owner says a line: speech bubble plus fire-and-forget playback
    pub fn speak<H: Host>(&mut self, text: &str, host: &mut H) {
        self.utterance = Some(text.to_string());
        let origin = self.owner.actor.position;
        self.overlay.spawn(
            host,
            text,
            origin,
            BubbleStyle::SPEECH,
            BubbleKind::Speech,
            Some(ActorKind::Owner),
        );
        if let Err(err) = host.play_utterance(text) {
            tracing::warn!(error = %err, "Utterance playback unavailable");
            host.log_diagnostic(&format!("speech unavailable: {err}"));
        }
    }

    /// The click greeting: speak and talk for `talk_duration_ms`
    pub fn greet<H: Host>(&mut self, host: &mut H) {
        self.speak(GREETING, host);
        self.owner.is_talking = true;
        self.scheduler.invalidate(ActorKind::Owner);
        self.scheduler.schedule(
            ActorKind::Owner,
            self.clock_ms,
            self.config.talk_duration_ms,
            Deferred::StopTalking,
        );
    }

    /// Host-reported playback start/end
    ///
    /// Runs alongside the greeting's timed talk: whichever ends first
    /// stops the owner talking, so a playback that never reports its end
    /// still stops after `talk_duration_ms`.
    pub fn set_talking(&mut self, talking: bool) {
        self.owner.is_talking = talking;
        if !talking {
            self.utterance = None;
        }
    }

    /// Line currently being spoken, if any
    #[must_use]
    pub fn current_utterance(&self) -> Option<&str> {
        self.utterance.as_deref()
    }

    /// Force the pet into a state from outside the engine
    ///
    /// Pending pet effects are discarded.
    ///
    /// # Errors
    ///
    /// Returns `ActorError::InvalidState` for owner-only states.
    pub fn set_pet_state(&mut self, state: ActorState) -> Result<(), ActorError> {
        self.pet.actor.set_state(state)?;
        self.scheduler.invalidate(ActorKind::Pet);
        Ok(())
    }

    /// Force the owner into a state from outside the engine
    ///
    /// # Errors
    ///
    /// Returns `ActorError::InvalidState` for pet-only states.
    pub fn set_owner_state(&mut self, state: ActorState) -> Result<(), ActorError> {
        self.owner.actor.set_state(state)
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Drawable snapshot of the current state
    #[must_use]
    pub fn snapshot(&self) -> EngineSnapshot {
        let visible = self.roam_mode.actors_visible();
        let actor = |kind: ActorKind| {
            let a = match kind {
                ActorKind::Pet => &self.pet.actor,
                ActorKind::Owner => &self.owner.actor,
            };
            ActorSnapshot {
                kind,
                position: a.position,
                state: a.state,
                row: animator::row_for(a.state),
                frame: a.frame,
                facing_right: a.facing_right,
                scale: a.scale,
                visible,
            }
        };
        let bubbles = self
            .overlay
            .bubbles()
            .iter()
            .map(|b| BubbleSnapshot {
                text: b.text.clone(),
                kind: b.kind,
                position: b.screen_position(b.attached.map(|k| self.actor_position(k))),
                opacity: b.opacity(),
                remaining_life_ms: b.remaining_life_ms,
                attached: b.attached,
            })
            .collect();

        EngineSnapshot {
            tick: self.ticks,
            clock_ms: self.clock_ms,
            roam_mode: self.roam_mode,
            viewport: self.viewport,
            pet: actor(ActorKind::Pet),
            owner: actor(ActorKind::Owner),
            bubbles,
            utterance: self.utterance.clone(),
        }
    }

    /// Atlas for an actor kind
    #[must_use]
    pub fn atlas(&self, kind: ActorKind) -> &Atlas {
        match kind {
            ActorKind::Pet => &self.pet_atlas,
            ActorKind::Owner => &self.owner_atlas,
        }
    }

    /// The cat
    #[must_use]
    pub fn pet(&self) -> &Pet {
        &self.pet
    }

    /// The cat, for hosts and tests that need to place it
    pub fn pet_mut(&mut self) -> &mut Pet {
        &mut self.pet
    }

    /// The human
    #[must_use]
    pub fn owner(&self) -> &Owner {
        &self.owner
    }

    /// The human, for hosts and tests that need to place it
    pub fn owner_mut(&mut self) -> &mut Owner {
        &mut self.owner
    }

    /// Active roam mode
    #[must_use]
    pub fn roam_mode(&self) -> RoamMode {
        self.roam_mode
    }

    /// Engine clock in milliseconds
    #[must_use]
    pub fn clock_ms(&self) -> f64 {
        self.clock_ms
    }

    /// Viewport seen by the last tick
    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Active configuration
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Live bubbles
    #[must_use]
    pub fn overlay(&self) -> &OverlayManager {
        &self.overlay
    }

    /// Whether the pet is being dragged
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.interaction.is_dragging()
    }

    /// Number of queued deferred effects
    #[must_use]
    pub fn pending_deferred(&self) -> usize {
        self.scheduler.pending()
    }

    /// Tear down every bubble (host shutdown)
    pub fn shutdown<H: Host>(&mut self, host: &mut H) {
        self.overlay.clear(host);
        tracing::debug!(ticks = self.ticks, "Engine shut down");
    }
}
