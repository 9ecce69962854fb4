//! Main Application
//!
//! The App drives one engine against the terminal:
//! - Event loop (keyboard, mouse, resize, speech playback)
//! - Frame ticks at a fixed rate, with the real elapsed time as `dt`
//! - Rendering the engine snapshot and the host's labels through the
//!   compositor
//!
//! # Controls
//!
//! | Input                      | Action                         |
//! |----------------------------|--------------------------------|
//! | left drag on the cat       | carry it around                |
//! | left click on the owner    | greeting                       |
//! | right click on either      | next roam mode                 |
//! | click on `[mode]` button   | next roam mode                 |
//! | `m`                        | next roam mode                 |
//! | `s`                        | greeting                       |
//! | `q`, `Esc`, `Ctrl-C`       | quit                           |

use std::collections::HashMap;
use std::io;
use std::time::Duration;

use crossterm::event::{
    Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use crossterm::style::Print;
use futures::StreamExt;
use ratatui::backend::CrosstermBackend;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::Terminal;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

use companion_core::{ActorKind, ActorSnapshot, Engine, EngineConfig, RandomSource, VisualId};

use crate::bubble;
use crate::compositor::{Compositor, LayerId};
use crate::host::{PlaybackEvent, TerminalHost, STATUS_ROWS};
use crate::sprite;
use crate::theme;

const PET_Z: i32 = 10;
const OWNER_Z: i32 = 20;
const STATUS_Z: i32 = 60;
const BUBBLE_Z: i32 = 100;

/// Runtime options that aren't engine tuning
#[derive(Clone, Copy, Debug)]
pub struct AppOptions {
    /// Frames (and engine ticks) per second
    pub fps: u32,
    /// Never ring the bell
    pub muted: bool,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            fps: 60,
            muted: false,
        }
    }
}

/// Layer IDs for the fixed parts of the screen
struct AppLayers {
    pet: LayerId,
    owner: LayerId,
    status: LayerId,
}

/// Main application state
pub struct App {
    running: bool,
    engine: Engine,
    host: TerminalHost,
    playback_rx: mpsc::UnboundedReceiver<PlaybackEvent>,
    compositor: Compositor,
    layers: AppLayers,
    bubble_layers: HashMap<VisualId, LayerId>,
    /// Status bar columns of the mode button
    mode_button: (u16, u16),
    control_hovered: bool,
    frame_duration: Duration,
    size: (u16, u16),
}

impl App {
    /// Create the app for a terminal of `size` (columns, rows)
    ///
    /// # Errors
    ///
    /// Fails if the engine can't start (bad config or a terminal too small
    /// to hold any actor).
    pub fn new(
        config: EngineConfig,
        rng: Box<dyn RandomSource>,
        size: (u16, u16),
        options: AppOptions,
    ) -> anyhow::Result<Self> {
        let (tx, playback_rx) = mpsc::unbounded_channel();
        let mut host = TerminalHost::new(size.0, size.1, options.muted, tx);
        let engine = Engine::new(config, rng, &mut host)?;

        let area = Rect::new(0, 0, size.0, size.1);
        let mut compositor = Compositor::new(area);
        let layers = AppLayers {
            pet: compositor.create_layer(0, 0, 1, 1, PET_Z),
            owner: compositor.create_layer(0, 0, 1, 1, OWNER_Z),
            status: compositor.create_layer(
                0,
                i32::from(size.1.saturating_sub(STATUS_ROWS)),
                size.0,
                STATUS_ROWS,
                STATUS_Z,
            ),
        };

        Ok(Self {
            running: true,
            engine,
            host,
            playback_rx,
            compositor,
            layers,
            bubble_layers: HashMap::new(),
            mode_button: (0, 0),
            control_hovered: false,
            frame_duration: Duration::from_secs_f64(1.0 / f64::from(options.fps.max(1))),
            size,
        })
    }

    /// Main event loop
    pub async fn run(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        let mut event_stream = EventStream::new();
        let mut frames = tokio::time::interval(self.frame_duration);
        frames.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut last_frame = tokio::time::Instant::now();

        self.render(terminal)?;

        while self.running {
            tokio::select! {
                biased;

                maybe_event = event_stream.next() => match maybe_event {
                    Some(Ok(event)) => self.handle_event(event),
                    Some(Err(e)) => tracing::warn!(error = %e, "Terminal event error"),
                    None => self.running = false,
                },

                Some(playback) = self.playback_rx.recv() => self.handle_playback(playback),

                now = frames.tick() => {
                    let dt = now.saturating_duration_since(last_frame);
                    last_frame = now;
                    self.engine.tick(dt, &mut self.host);
                    self.render(terminal)?;
                }
            }
        }

        self.shutdown();
        Ok(())
    }

    /// Tear down bubbles and any playback still running
    pub fn shutdown(&mut self) {
        self.host.stop_playback();
        self.engine.shutdown(&mut self.host);
    }

    /// Whether the loop should keep going
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// The engine (for tests and headless runs)
    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// The terminal host
    pub fn host(&self) -> &TerminalHost {
        &self.host
    }

    // ========================================================================
    // Input
    // ========================================================================

    /// Dispatch one terminal event
    pub fn handle_event(&mut self, event: Event) {
        match event {
            // Only handle Press events (not Release or Repeat)
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Resize(w, h) => self.handle_resize(w, h),
            _ => {}
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => self.running = false,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.running = false;
            }
            KeyCode::Char('m') => {
                self.engine.cycle_roam_mode(&mut self.host);
            }
            KeyCode::Char('s') => self.engine.greet(&mut self.host),
            _ => {}
        }
    }

    fn on_mode_button(&self, col: u16, row: u16) -> bool {
        row >= self.host.play_rows() && col >= self.mode_button.0 && col < self.mode_button.1
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        let (col, row) = (mouse.column, mouse.row);
        let on_button = self.on_mode_button(col, row);
        let at = self.host.metrics().to_px(col, row);

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if on_button {
                    self.engine.cycle_roam_mode(&mut self.host);
                } else if !self.engine.pointer_down(at, &mut self.host) {
                    self.engine.click(at, &mut self.host);
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                self.engine.pointer_move(at, &mut self.host);
            }
            MouseEventKind::Up(MouseButton::Left) => self.engine.pointer_up(&mut self.host),
            MouseEventKind::Down(MouseButton::Right) => {
                self.engine.secondary_click(at, &mut self.host);
            }
            MouseEventKind::Moved => {
                if on_button != self.control_hovered {
                    self.control_hovered = on_button;
                    self.engine.set_control_hover(on_button, &mut self.host);
                }
                if !on_button {
                    self.engine.pointer_hover(at, &mut self.host);
                }
            }
            _ => {}
        }
    }

    fn handle_resize(&mut self, width: u16, height: u16) {
        tracing::debug!(width, height, "Terminal resized");
        self.size = (width, height);
        self.host.resize(width, height);
        self.compositor.resize(Rect::new(0, 0, width, height));
        self.compositor
            .resize_layer(self.layers.status, width, STATUS_ROWS);
        self.compositor.move_layer(
            self.layers.status,
            0,
            i32::from(height.saturating_sub(STATUS_ROWS)),
        );
    }

    /// Speech playback started or finished
    pub fn handle_playback(&mut self, event: PlaybackEvent) {
        tracing::debug!(?event, "Playback");
        self.engine
            .set_talking(matches!(event, PlaybackEvent::Started));
    }

    // ========================================================================
    // Rendering
    // ========================================================================

    fn render(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> anyhow::Result<()> {
        let output = self.compose();
        terminal.draw(|frame| {
            let area = frame.area();
            let buf = frame.buffer_mut();
            for y in 0..area.height.min(output.area.height) {
                for x in 0..area.width.min(output.area.width) {
                    buf[(x, y)] = output[(x, y)].clone();
                }
            }
        })?;

        if self.host.take_bell() {
            crossterm::execute!(terminal.backend_mut(), Print('\x07'))?;
        }
        Ok(())
    }

    /// Lay out every layer from the current engine state and composite
    pub fn compose(&mut self) -> Buffer {
        let snapshot = self.engine.snapshot();
        self.draw_actor(self.layers.pet, &snapshot.pet);
        self.draw_actor(self.layers.owner, &snapshot.owner);
        self.sync_bubbles();
        self.draw_status();
        self.compositor.composite().clone()
    }

    fn draw_actor(&mut self, layer: LayerId, actor: &ActorSnapshot) {
        self.compositor.set_visible(layer, actor.visible);
        if !actor.visible {
            return;
        }
        let metrics = self.host.metrics();
        let (w, h) = sprite::footprint(actor.scale, metrics);
        let (x, y) = metrics.to_cell(actor.position);
        self.compositor.resize_layer(layer, w, h);
        self.compositor.move_layer(layer, x, y);

        let atlas = self.engine.atlas(actor.kind);
        if let Some(buf) = self.compositor.layer_buffer_mut(layer) {
            sprite::draw_actor(buf, atlas, actor, metrics);
        }
    }

    /// Mirror the host's labels into bubble layers
    fn sync_bubbles(&mut self) {
        let metrics = self.host.metrics();
        let live: Vec<VisualId> = self.host.labels().map(|(id, _)| id).collect();

        let stale: Vec<VisualId> = self
            .bubble_layers
            .keys()
            .filter(|id| !live.contains(id))
            .copied()
            .collect();
        for id in stale {
            if let Some(layer) = self.bubble_layers.remove(&id) {
                self.compositor.remove_layer(layer);
            }
        }

        for (id, label) in self.host.labels() {
            let lines = bubble::lines(label);
            let (w, h) = bubble::size(&lines);
            let (x, y) = metrics.to_cell(label.at);
            let compositor = &mut self.compositor;
            let layer = *self
                .bubble_layers
                .entry(id)
                .or_insert_with(|| compositor.create_layer(x, y, w, h, BUBBLE_Z));

            self.compositor.resize_layer(layer, w, h);
            self.compositor.move_layer(layer, x, y);
            self.compositor.set_opacity(layer, label.opacity);
            if let Some(buf) = self.compositor.layer_buffer_mut(layer) {
                bubble::draw(buf, label, &lines);
            }
        }
    }

    fn draw_status(&mut self) {
        let mode = self.engine.roam_mode();
        let button = format!("[{}]", mode.label());
        let capture = if self.host.pass_through() {
            "click-through"
        } else {
            "captured"
        };
        let pet = self.engine.pet().actor.state();
        let owner = self.engine.owner().actor.state();
        let hint = format!(
            " cat: {pet:?}  owner: {owner:?}  {capture}  m:mode s:greet q:quit "
        );
        let diagnostic = self.host.last_diagnostic().unwrap_or_default().to_string();

        let button_style = Style::default()
            .fg(if self.control_hovered {
                theme::MODE_BUTTON_HOVER
            } else {
                theme::MODE_BUTTON
            })
            .bg(theme::STATUS_BG)
            .add_modifier(Modifier::BOLD);
        let text_style = Style::default().fg(theme::STATUS_TEXT).bg(theme::STATUS_BG);
        let diag_style = Style::default().fg(theme::DIAGNOSTIC).bg(theme::STATUS_BG);

        let width = self.size.0;
        let Some(buf) = self.compositor.layer_buffer_mut(self.layers.status) else {
            return;
        };
        buf.reset();
        buf.set_style(buf.area, text_style);
        let (x, _) = buf.set_stringn(0, 0, &button, usize::MAX, button_style);
        let (x, _) = buf.set_stringn(x, 0, &hint, usize::from(width.saturating_sub(x)), text_style);
        buf.set_stringn(x, 0, &diagnostic, usize::from(width.saturating_sub(x)), diag_style);

        self.mode_button = (0, button.len() as u16);
    }

    /// Which actor a screen cell shows, by what's actually drawn there
    pub fn actor_at_cell(&self, col: u16, row: u16) -> Option<ActorKind> {
        match self.compositor.layer_at(col, row) {
            Some(id) if id == self.layers.owner => Some(ActorKind::Owner),
            Some(id) if id == self.layers.pet => Some(ActorKind::Pet),
            _ => None,
        }
    }
}
