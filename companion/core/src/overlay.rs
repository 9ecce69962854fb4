//! Floating Overlay Manager
//!
//! Short-lived text and emoji bubbles. Each bubble owns exactly one visual
//! handle on the host's [`OverlaySurface`] and destroys it when it retires.
//!
//! ```text
//!   spawn ──► life = bubble_life_ms
//!   tick  ──► life -= dt ── life <= 0 ──► destroy
//!              │
//!              ├─ attached: pos = actor + anchor - (0, rising), rising += dt * 0.06
//!              ├─ free:     y -= 1 per tick
//!              └─ opacity = 1.0, or life / 1000 in the final second
//! ```
//!
//! Attached bubbles refer to their actor by kind and look its position up
//! every tick; they never hold on to the actor itself.

use serde::{Deserialize, Serialize};

use crate::actor::{ActorKind, Point};
use crate::host::{BubbleStyle, OverlaySurface, VisualId};

/// Rise speed of attached bubbles in pixels per millisecond
pub const ATTACHED_RISE_PER_MS: f32 = 0.06;

/// Rise of free bubbles in pixels per tick
pub const FREE_RISE_PER_TICK: f32 = 1.0;

/// Remaining life below which a bubble fades
pub const FADE_WINDOW_MS: f32 = 1000.0;

/// Where an attached bubble sits relative to its actor
pub const ATTACHED_ANCHOR: Point = Point::new(20.0, -50.0);

/// What a bubble is for
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BubbleKind {
    /// Decorative cue (emoji, snore, caption)
    Cue,
    /// The owner's speech; at most one exists
    Speech,
}

/// One floating bubble
#[derive(Clone, Debug, PartialEq)]
pub struct Bubble {
    /// Text shown
    pub text: String,
    /// Cue or speech
    pub kind: BubbleKind,
    /// Milliseconds left before the bubble retires
    pub remaining_life_ms: f32,
    /// Upward drift accumulated so far
    pub rising_offset: f32,
    /// Actor the bubble follows, if any
    pub attached: Option<ActorKind>,
    /// Offset from the actor (attached) or absolute position (free)
    pub anchor: Point,
    /// Look of the text
    pub style: BubbleStyle,
    visual: VisualId,
}

impl Bubble {
    /// Current opacity
    #[must_use]
    pub fn opacity(&self) -> f32 {
        if self.remaining_life_ms < FADE_WINDOW_MS {
            (self.remaining_life_ms / FADE_WINDOW_MS).max(0.0)
        } else {
            1.0
        }
    }

    /// Handle of the visual element this bubble owns
    #[must_use]
    pub fn visual(&self) -> VisualId {
        self.visual
    }

    /// Screen position given the position of the attached actor
    #[must_use]
    pub fn screen_position(&self, actor: Option<Point>) -> Point {
        match (self.attached, actor) {
            (Some(_), Some(at)) => at.offset(self.anchor.x, self.anchor.y - self.rising_offset),
            _ => self.anchor,
        }
    }
}

/// Owns every live bubble
#[derive(Debug)]
pub struct OverlayManager {
    bubbles: Vec<Bubble>,
    life_ms: f32,
}

impl OverlayManager {
    /// Create a manager whose bubbles live `life_ms`
    #[must_use]
    pub fn new(life_ms: u64) -> Self {
        Self {
            bubbles: Vec::new(),
            life_ms: life_ms as f32,
        }
    }

    /// Spawn a bubble
    ///
    /// Attached bubbles are anchored at [`ATTACHED_ANCHOR`] from `origin`;
    /// free bubbles start at `origin`. Spawning speech first destroys the
    /// current speech bubble.
    pub fn spawn(
        &mut self,
        surface: &mut dyn OverlaySurface,
        text: &str,
        origin: Point,
        style: BubbleStyle,
        kind: BubbleKind,
        attached: Option<ActorKind>,
    ) -> VisualId {
        if kind == BubbleKind::Speech {
            self.evict_speech(surface);
        }

        let anchor = if attached.is_some() { ATTACHED_ANCHOR } else { origin };
        let visual = surface.create(text, &style);
        let bubble = Bubble {
            text: text.to_string(),
            kind,
            remaining_life_ms: self.life_ms,
            rising_offset: 0.0,
            attached,
            anchor,
            style,
            visual,
        };
        let at = bubble.screen_position(attached.map(|_| origin));
        surface.position(visual, at.x, at.y);
        surface.set_opacity(visual, 1.0);

        tracing::trace!(text, ?kind, "Bubble spawned");
        self.bubbles.push(bubble);
        visual
    }

    /// Age, move and fade every bubble; retire the ones that ran out
    pub fn update(
        &mut self,
        surface: &mut dyn OverlaySurface,
        dt_ms: f32,
        actor_position: impl Fn(ActorKind) -> Point,
    ) {
        self.bubbles.retain_mut(|bubble| {
            bubble.remaining_life_ms -= dt_ms;
            if bubble.remaining_life_ms <= 0.0 {
                surface.destroy(bubble.visual);
                return false;
            }

            let at = match bubble.attached {
                Some(kind) => {
                    bubble.rising_offset += dt_ms * ATTACHED_RISE_PER_MS;
                    bubble.screen_position(Some(actor_position(kind)))
                }
                None => {
                    bubble.rising_offset += FREE_RISE_PER_TICK;
                    bubble.anchor.y -= FREE_RISE_PER_TICK;
                    bubble.anchor
                }
            };
            surface.position(bubble.visual, at.x, at.y);
            surface.set_opacity(bubble.visual, bubble.opacity());
            true
        });
    }

    /// Destroy the active speech bubble, if any
    fn evict_speech(&mut self, surface: &mut dyn OverlaySurface) {
        self.bubbles.retain(|bubble| {
            if bubble.kind == BubbleKind::Speech {
                surface.destroy(bubble.visual);
                false
            } else {
                true
            }
        });
    }

    /// Destroy everything
    pub fn clear(&mut self, surface: &mut dyn OverlaySurface) {
        for bubble in self.bubbles.drain(..) {
            surface.destroy(bubble.visual);
        }
    }

    /// Live bubbles, oldest first
    #[must_use]
    pub fn bubbles(&self) -> &[Bubble] {
        &self.bubbles
    }

    /// The active speech bubble
    #[must_use]
    pub fn speech(&self) -> Option<&Bubble> {
        self.bubbles.iter().find(|b| b.kind == BubbleKind::Speech)
    }

    /// Number of live bubbles
    #[must_use]
    pub fn len(&self) -> usize {
        self.bubbles.len()
    }

    /// Whether no bubbles are live
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bubbles.is_empty()
    }
}
