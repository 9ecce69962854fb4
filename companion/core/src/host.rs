//! Host Boundary
//!
//! Everything the engine needs from the outside world goes through these
//! two traits. A host (terminal, desktop window, test harness) implements
//! them; the engine never knows which one it is talking to.
//!
//! ```text
//!   Engine ──► OverlaySurface  create / position / set_opacity / destroy
//!          ──► Host            viewport, pass-through, audio, utterances
//! ```
//!
//! Audio and speech are fire-and-forget. A host that can't play something
//! returns a [`HostError`]; the engine degrades and keeps ticking.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::atlas::Color;

/// Opaque handle to a visual element owned by the host
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VisualId(pub u64);

/// How a bubble should look
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BubbleStyle {
    /// Nominal font size in pixels
    pub font_px: u16,
    /// Text color
    pub color: Color,
}

impl BubbleStyle {
    /// White 24px cue (thoughts, captions)
    pub const CUE: Self = Self {
        font_px: 24,
        color: Color::rgb(0xff, 0xff, 0xff),
    };

    /// Blue 20px snore cue
    pub const SNORE: Self = Self {
        font_px: 20,
        color: Color::rgb(0x34, 0x98, 0xdb),
    };

    /// 16px speech text
    pub const SPEECH: Self = Self {
        font_px: 16,
        color: Color::rgb(0xff, 0xff, 0xff),
    };
}

/// Non-speech sounds the engine asks for
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AudioCue {
    /// The pet's meow
    Meow,
    /// Feedback while the pet is being dragged
    DragMeow,
    /// Synthesized substitute when a recorded cue can't play
    Synth {
        /// Length of the tone
        duration_ms: u32,
    },
}

impl AudioCue {
    /// Synthesized stand-in for this cue
    #[must_use]
    pub fn fallback(self) -> Option<Self> {
        match self {
            Self::Meow => Some(Self::Synth { duration_ms: 150 }),
            Self::DragMeow => Some(Self::Synth { duration_ms: 100 }),
            Self::Synth { .. } => None,
        }
    }
}

/// Failures reported by host boundary calls
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum HostError {
    /// Audio output is unavailable or rejected the cue
    #[error("audio playback failed: {0}")]
    Audio(String),

    /// Speech playback is unavailable
    #[error("speech unavailable: {0}")]
    Speech(String),
}

/// Visual-handle surface used by the overlay manager
pub trait OverlaySurface {
    /// Create a text element and return its handle
    fn create(&mut self, text: &str, style: &BubbleStyle) -> VisualId;

    /// Move an element to viewport coordinates
    fn position(&mut self, id: VisualId, x: f32, y: f32);

    /// Set an element's opacity (0.0 to 1.0)
    fn set_opacity(&mut self, id: VisualId, opacity: f32);

    /// Remove an element
    fn destroy(&mut self, id: VisualId);
}

/// Everything else the engine asks of its host
pub trait Host: OverlaySurface {
    /// Current drawable area `(width, height)` in pixels
    fn viewport_size(&self) -> (f32, f32);

    /// Ask the host to forward (`true`) or capture (`false`) pointer input
    fn request_pointer_pass_through(&mut self, ignore: bool);

    /// Start a sound without waiting for it
    ///
    /// # Errors
    ///
    /// Returns `HostError::Audio` if the cue could not be started.
    fn play_audio_cue(&mut self, cue: AudioCue) -> Result<(), HostError>;

    /// Start speaking a line without waiting for it
    ///
    /// Hosts report playback start/end back through
    /// [`Engine::set_talking`](crate::Engine::set_talking).
    ///
    /// # Errors
    ///
    /// Returns `HostError::Speech` if speech could not be started.
    fn play_utterance(&mut self, text: &str) -> Result<(), HostError>;

    /// Best-effort diagnostic sink
    fn log_diagnostic(&mut self, message: &str) {
        tracing::debug!(target: "companion_core::host", "{message}");
    }
}

/// Play a cue, substituting the synthesized fallback on failure
///
/// A second failure is logged and swallowed.
pub(crate) fn play_cue_with_fallback(host: &mut dyn Host, cue: AudioCue) {
    let Err(err) = host.play_audio_cue(cue) else {
        return;
    };
    tracing::warn!(cue = ?cue, error = %err, "Audio cue failed, trying synth fallback");
    if let Some(fallback) = cue.fallback() {
        if let Err(err) = host.play_audio_cue(fallback) {
            host.log_diagnostic(&format!("synth fallback failed: {err}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct FlakyHost {
        failures_left: usize,
        played: Vec<AudioCue>,
        diagnostics: Vec<String>,
    }

    impl OverlaySurface for FlakyHost {
        fn create(&mut self, _text: &str, _style: &BubbleStyle) -> VisualId {
            VisualId(0)
        }
        fn position(&mut self, _id: VisualId, _x: f32, _y: f32) {}
        fn set_opacity(&mut self, _id: VisualId, _opacity: f32) {}
        fn destroy(&mut self, _id: VisualId) {}
    }

    impl Host for FlakyHost {
        fn viewport_size(&self) -> (f32, f32) {
            (800.0, 600.0)
        }
        fn request_pointer_pass_through(&mut self, _ignore: bool) {}
        fn play_audio_cue(&mut self, cue: AudioCue) -> Result<(), HostError> {
            if self.failures_left > 0 {
                self.failures_left -= 1;
                return Err(HostError::Audio("muted".into()));
            }
            self.played.push(cue);
            Ok(())
        }
        fn play_utterance(&mut self, _text: &str) -> Result<(), HostError> {
            Ok(())
        }
        fn log_diagnostic(&mut self, message: &str) {
            self.diagnostics.push(message.to_string());
        }
    }

    #[test]
    fn test_cue_plays_directly() {
        let mut host = FlakyHost::default();
        play_cue_with_fallback(&mut host, AudioCue::Meow);
        assert_eq!(host.played, vec![AudioCue::Meow]);
    }

    #[test]
    fn test_failed_cue_falls_back_to_synth() {
        let mut host = FlakyHost {
            failures_left: 1,
            ..Default::default()
        };
        play_cue_with_fallback(&mut host, AudioCue::DragMeow);
        assert_eq!(host.played, vec![AudioCue::Synth { duration_ms: 100 }]);
        assert!(host.diagnostics.is_empty());
    }

    #[test]
    fn test_double_failure_is_silent() {
        let mut host = FlakyHost {
            failures_left: 2,
            ..Default::default()
        };
        play_cue_with_fallback(&mut host, AudioCue::Meow);
        assert!(host.played.is_empty());
        assert_eq!(host.diagnostics.len(), 1);
    }
}
