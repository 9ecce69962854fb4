//! Companion Core - Headless Dual-Actor Animation Engine
//!
//! This crate drives the two screen companions (a pet and its owner)
//! completely independent of any rendering surface. A host (terminal,
//! transparent desktop window, headless test harness) feeds it ticks and
//! pointer events, and draws whatever the engine's snapshot says.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                            Hosts                                 │
//! │  ┌──────────┐  ┌──────────────┐  ┌─────────────────────────────┐ │
//! │  │   TUI    │  │   Desktop    │  │     Headless / Tests        │ │
//! │  └────┬─────┘  └──────┬───────┘  └──────────────┬──────────────┘ │
//! │       └───────────────┴─────────────────────────┘                │
//! │              tick(dt) / pointer events (down)                    │
//! │          Host boundary calls + snapshots (up)                    │
//! └───────────────────────────┬──────────────────────────────────────┘
//!                             │
//! ┌───────────────────────────┼──────────────────────────────────────┐
//! │                     COMPANION CORE                               │
//! │  ┌────────────────────────┴───────────────────────────────────┐  │
//! │  │                         Engine                             │  │
//! │  │  ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌───────────────┐  │  │
//! │  │  │ Behavior │ │ Movement │ │ Animator │ │    Overlay    │  │  │
//! │  │  │ (pet/own)│ │Integrator│ │          │ │    Manager    │  │  │
//! │  │  └──────────┘ └──────────┘ └──────────┘ └───────────────┘  │  │
//! │  │  ┌──────────┐ ┌──────────┐ ┌──────────────────────────────┐│  │
//! │  │  │Interactn │ │Scheduler │ │ Atlas (procedural sprites)   ││  │
//! │  │  └──────────┘ └──────────┘ └──────────────────────────────┘│  │
//! │  └────────────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Tick Order
//!
//! Every tick runs, in order: deferred effects, pet behavior, owner
//! behavior, movement integration, animation, overlay update. Pointer
//! events are applied between ticks and are read by the next one.
//!
//! # Module Overview
//!
//! - [`actor`]: Plain actor records (pet and owner)
//! - [`atlas`]: Procedurally drawn pixel atlases
//! - [`behavior`]: Per-actor state machines
//! - [`movement`]: Roam-mode policy, gravity and clamping
//! - [`animator`]: Atlas row selection and frame cadence
//! - [`interaction`]: Drag, hover and click handling
//! - [`overlay`]: Floating speech/emoji bubbles
//! - [`scheduler`]: Generation-keyed deferred effects
//! - [`engine`]: The simulation context tying it all together
//! - [`host`]: Boundary traits hosts implement
//! - [`config`]: Typed configuration (TOML + environment)
//!
//! # No Surface Dependencies
//!
//! Nothing here knows about terminals, windows or async runtimes. Time only
//! enters through the `dt` handed to [`Engine::tick`], and randomness only
//! through a [`RandomSource`], so every behavior is reproducible in tests.

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_sign_loss)]

pub mod actor;
pub mod animator;
pub mod atlas;
pub mod behavior;
pub mod config;
pub mod engine;
pub mod error;
pub mod host;
pub mod interaction;
pub mod movement;
pub mod overlay;
pub mod rng;
pub mod roam;
pub mod scheduler;

// Re-exports for convenience
pub use actor::{Actor, ActorError, ActorKind, ActorState, Owner, Pet, Point};
pub use atlas::{Atlas, AtlasError, Color, Raster, CELL_SIZE};
pub use config::{
    default_config_path, load_config, load_config_from_path, ConfigError, ConfigSource,
    EngineConfig,
};
pub use engine::{ActorSnapshot, BubbleSnapshot, Engine, EngineSnapshot};
pub use error::EngineError;
pub use host::{AudioCue, BubbleStyle, Host, HostError, OverlaySurface, VisualId};
pub use overlay::{Bubble, BubbleKind, OverlayManager};
pub use rng::{RandomSource, ScriptedRandom, SeededRandom};
pub use roam::RoamMode;
pub use scheduler::{Deferred, Scheduler};
