//! Terminal Host
//!
//! Implements the engine's boundary traits on top of a character grid.
//!
//! # Coordinates
//!
//! The engine thinks in pixels. A terminal cell counts as 4px wide and 8px
//! tall (cells are roughly twice as tall as wide), and every cell holds two
//! sprite pixels stacked with half-block glyphs. The bottom row is reserved
//! for the status bar and is not part of the viewport.
//!
//! # Sound and Speech
//!
//! A terminal can't play samples, so the meow cues fail and the engine
//! falls back to a synthesized blip, rendered as the terminal bell.
//! Utterances have no voice either; playback is timed from the text length
//! on the tokio runtime and reported back as [`PlaybackEvent`]s so the
//! owner talks exactly as long as the line "plays".

use std::collections::BTreeMap;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use companion_core::{AudioCue, BubbleStyle, Host, HostError, OverlaySurface, Point, VisualId};

/// Rows taken by the status bar
pub const STATUS_ROWS: u16 = 1;

/// Pixel size of one terminal cell
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellMetrics {
    /// Pixels per column
    pub px_per_col: f32,
    /// Pixels per row (two sprite pixels per row)
    pub px_per_row: f32,
}

impl Default for CellMetrics {
    fn default() -> Self {
        Self {
            px_per_col: 4.0,
            px_per_row: 8.0,
        }
    }
}

impl CellMetrics {
    /// Cell containing a pixel position (may be negative or off screen)
    pub fn to_cell(self, at: Point) -> (i32, i32) {
        (
            (at.x / self.px_per_col).floor() as i32,
            (at.y / self.px_per_row).floor() as i32,
        )
    }

    /// Pixel position at the center of a cell
    pub fn to_px(self, col: u16, row: u16) -> Point {
        Point::new(
            (f32::from(col) + 0.5) * self.px_per_col,
            (f32::from(row) + 0.5) * self.px_per_row,
        )
    }

    /// Cells needed to cover a square of `px` pixels
    pub fn cells_for(self, px: f32) -> (u16, u16) {
        (
            (px / self.px_per_col).ceil().max(1.0) as u16,
            (px / self.px_per_row).ceil().max(1.0) as u16,
        )
    }
}

/// Speech playback progress
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackEvent {
    /// An utterance began
    Started,
    /// The current utterance ended
    Finished,
}

/// A live overlay element as the terminal will draw it
#[derive(Clone, Debug, PartialEq)]
pub struct Label {
    /// Text to draw
    pub text: String,
    /// Size and color hint
    pub style: BubbleStyle,
    /// Pixel position of the top-left corner
    pub at: Point,
    /// 0.0 to 1.0
    pub opacity: f32,
}

/// How long an utterance "plays": about 180 words a minute plus a pause
pub fn utterance_duration(text: &str) -> Duration {
    let words = text.split_whitespace().count().max(1) as u64;
    Duration::from_millis(400 + words * 333)
}

/// The terminal side of the engine boundary
pub struct TerminalHost {
    cols: u16,
    rows: u16,
    metrics: CellMetrics,
    labels: BTreeMap<VisualId, Label>,
    next_visual: u64,
    pass_through: bool,
    muted: bool,
    bell_pending: bool,
    last_diagnostic: Option<String>,
    playback_tx: mpsc::UnboundedSender<PlaybackEvent>,
    playback: Option<JoinHandle<()>>,
}

impl TerminalHost {
    /// Create a host for a terminal of `cols` x `rows`
    pub fn new(
        cols: u16,
        rows: u16,
        muted: bool,
        playback_tx: mpsc::UnboundedSender<PlaybackEvent>,
    ) -> Self {
        Self {
            cols,
            rows,
            metrics: CellMetrics::default(),
            labels: BTreeMap::new(),
            next_visual: 0,
            pass_through: true,
            muted,
            bell_pending: false,
            last_diagnostic: None,
            playback_tx,
            playback: None,
        }
    }

    /// Terminal was resized
    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.cols = cols;
        self.rows = rows;
    }

    /// Pixel size of a cell
    pub fn metrics(&self) -> CellMetrics {
        self.metrics
    }

    /// Rows available to the actors
    pub fn play_rows(&self) -> u16 {
        self.rows.saturating_sub(STATUS_ROWS)
    }

    /// Live overlay elements, oldest first
    pub fn labels(&self) -> impl Iterator<Item = (VisualId, &Label)> {
        self.labels.iter().map(|(id, label)| (*id, label))
    }

    /// Whether the engine last asked for clicks to pass through
    pub fn pass_through(&self) -> bool {
        self.pass_through
    }

    /// Most recent diagnostic line
    pub fn last_diagnostic(&self) -> Option<&str> {
        self.last_diagnostic.as_deref()
    }

    /// Whether a bell should ring; clears the request
    pub fn take_bell(&mut self) -> bool {
        std::mem::take(&mut self.bell_pending)
    }

    /// Stop any utterance still "playing"
    pub fn stop_playback(&mut self) {
        if let Some(handle) = self.playback.take() {
            handle.abort();
        }
    }
}

impl OverlaySurface for TerminalHost {
    fn create(&mut self, text: &str, style: &BubbleStyle) -> VisualId {
        self.next_visual += 1;
        let id = VisualId(self.next_visual);
        self.labels.insert(
            id,
            Label {
                text: text.to_string(),
                style: *style,
                at: Point::default(),
                opacity: 1.0,
            },
        );
        id
    }

    fn position(&mut self, id: VisualId, x: f32, y: f32) {
        if let Some(label) = self.labels.get_mut(&id) {
            label.at = Point::new(x, y);
        }
    }

    fn set_opacity(&mut self, id: VisualId, opacity: f32) {
        if let Some(label) = self.labels.get_mut(&id) {
            label.opacity = opacity;
        }
    }

    fn destroy(&mut self, id: VisualId) {
        self.labels.remove(&id);
    }
}

impl Host for TerminalHost {
    fn viewport_size(&self) -> (f32, f32) {
        (
            f32::from(self.cols) * self.metrics.px_per_col,
            f32::from(self.play_rows()) * self.metrics.px_per_row,
        )
    }

    fn request_pointer_pass_through(&mut self, ignore: bool) {
        tracing::trace!(ignore, "Pointer pass-through requested");
        self.pass_through = ignore;
    }

    fn play_audio_cue(&mut self, cue: AudioCue) -> Result<(), HostError> {
        match cue {
            AudioCue::Meow | AudioCue::DragMeow => Err(HostError::Audio(
                "terminal can't play samples".to_string(),
            )),
            AudioCue::Synth { .. } => {
                if !self.muted {
                    self.bell_pending = true;
                }
                Ok(())
            }
        }
    }

    fn play_utterance(&mut self, text: &str) -> Result<(), HostError> {
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|_| HostError::Speech("no async runtime for playback".to_string()))?;

        self.stop_playback();
        let tx = self.playback_tx.clone();
        let duration = utterance_duration(text);
        self.playback = Some(runtime.spawn(async move {
            // Receiver gone means the app is shutting down
            let _ = tx.send(PlaybackEvent::Started);
            tokio::time::sleep(duration).await;
            let _ = tx.send(PlaybackEvent::Finished);
        }));
        Ok(())
    }

    fn log_diagnostic(&mut self, message: &str) {
        tracing::info!(message, "Diagnostic");
        self.last_diagnostic = Some(message.to_string());
    }
}
