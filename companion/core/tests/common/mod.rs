//! Shared test host

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::time::Duration;

use companion_core::{
    AudioCue, BubbleStyle, Engine, EngineConfig, Host, HostError, OverlaySurface, Point,
    RandomSource, ScriptedRandom, VisualId,
};

/// A live visual element as the host last saw it
#[derive(Clone, Debug, PartialEq)]
pub struct Element {
    pub text: String,
    pub style: BubbleStyle,
    pub position: Point,
    pub opacity: f32,
}

/// Host that records every boundary call
#[derive(Debug)]
pub struct RecordingHost {
    pub viewport: (f32, f32),
    pub next_id: u64,
    pub elements: BTreeMap<VisualId, Element>,
    pub destroyed: Vec<VisualId>,
    pub pass_through: Vec<bool>,
    pub cues: Vec<AudioCue>,
    pub utterances: Vec<String>,
    pub diagnostics: Vec<String>,
    /// Fail this many audio calls before succeeding
    pub audio_failures: usize,
    pub speech_fails: bool,
}

impl RecordingHost {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            viewport: (width, height),
            next_id: 0,
            elements: BTreeMap::new(),
            destroyed: Vec::new(),
            pass_through: Vec::new(),
            cues: Vec::new(),
            utterances: Vec::new(),
            diagnostics: Vec::new(),
            audio_failures: 0,
            speech_fails: false,
        }
    }

    /// Texts of all live elements, in creation order
    pub fn texts(&self) -> Vec<&str> {
        self.elements.values().map(|e| e.text.as_str()).collect()
    }
}

impl OverlaySurface for RecordingHost {
    fn create(&mut self, text: &str, style: &BubbleStyle) -> VisualId {
        self.next_id += 1;
        let id = VisualId(self.next_id);
        self.elements.insert(
            id,
            Element {
                text: text.to_string(),
                style: *style,
                position: Point::default(),
                opacity: 1.0,
            },
        );
        id
    }

    fn position(&mut self, id: VisualId, x: f32, y: f32) {
        if let Some(element) = self.elements.get_mut(&id) {
            element.position = Point::new(x, y);
        }
    }

    fn set_opacity(&mut self, id: VisualId, opacity: f32) {
        if let Some(element) = self.elements.get_mut(&id) {
            element.opacity = opacity;
        }
    }

    fn destroy(&mut self, id: VisualId) {
        self.elements.remove(&id);
        self.destroyed.push(id);
    }
}

impl Host for RecordingHost {
    fn viewport_size(&self) -> (f32, f32) {
        self.viewport
    }

    fn request_pointer_pass_through(&mut self, ignore: bool) {
        self.pass_through.push(ignore);
    }

    fn play_audio_cue(&mut self, cue: AudioCue) -> Result<(), HostError> {
        if self.audio_failures > 0 {
            self.audio_failures -= 1;
            return Err(HostError::Audio("device busy".into()));
        }
        self.cues.push(cue);
        Ok(())
    }

    fn play_utterance(&mut self, text: &str) -> Result<(), HostError> {
        if self.speech_fails {
            return Err(HostError::Speech("no voice".into()));
        }
        self.utterances.push(text.to_string());
        Ok(())
    }

    fn log_diagnostic(&mut self, message: &str) {
        self.diagnostics.push(message.to_string());
    }
}

/// 800x600 engine with a scripted random source
pub fn scripted_engine(
    config: EngineConfig,
    draws: impl IntoIterator<Item = f32>,
) -> (Engine, RecordingHost) {
    let mut host = RecordingHost::new(800.0, 600.0);
    let rng: Box<dyn RandomSource> = Box::new(ScriptedRandom::new(draws));
    let engine = Engine::new(config, rng, &mut host).unwrap();
    (engine, host)
}

/// Run `n` ticks of `ms` each
pub fn run_ticks(engine: &mut Engine, host: &mut RecordingHost, n: usize, ms: u64) {
    for _ in 0..n {
        engine.tick(Duration::from_millis(ms), host);
    }
}
