//! Sprite Sampling
//!
//! Samples one atlas frame into a block of half-block glyphs. Each cell
//! shows two pixels: the upper one as the foreground of `▀` and the lower
//! one as its background.
//!
//! ```text
//!   atlas frame (32x32 px)          terminal cells
//!   ┌────────────────┐              ┌──────┐
//!   │   scaled by    │   sample     │▀▀▄▄▀ │  top pixel    → fg
//!   │ actor.scale    │  ───────►    │▀▀▀▀▀ │  bottom pixel → bg
//!   └────────────────┘              └──────┘
//! ```
//!
//! Transparent pixels stay blank so the compositor shows whatever is
//! behind them.

use ratatui::buffer::Buffer;
use ratatui::style::Color;

use companion_core::{ActorSnapshot, Atlas, CELL_SIZE};

use crate::host::CellMetrics;
use crate::theme;

/// Cells covered by an actor drawn at `scale`
pub fn footprint(scale: f32, metrics: CellMetrics) -> (u16, u16) {
    metrics.cells_for(f32::from(CELL_SIZE) * scale)
}

/// Atlas pixel under a sample point, or `None` if transparent
fn sample(atlas: &Atlas, actor: &ActorSnapshot, px: f32, py: f32) -> Option<Color> {
    let x = (px / actor.scale).floor();
    let y = (py / actor.scale).floor();
    if x < 0.0 || y < 0.0 {
        return None;
    }
    theme::to_terminal(atlas.frame_pixel(actor.row, actor.frame, x as u16, y as u16))
}

/// Draw an actor's current frame into `buf`, starting at its origin
///
/// The buffer is expected to be sized with [`footprint`]. Actors facing
/// left are mirrored column by column.
pub fn draw_actor(buf: &mut Buffer, atlas: &Atlas, actor: &ActorSnapshot, metrics: CellMetrics) {
    buf.reset();
    let area = buf.area;
    let half_row = metrics.px_per_row / 2.0;

    for row in 0..area.height {
        for col in 0..area.width {
            let src_col = if actor.facing_right {
                col
            } else {
                area.width - 1 - col
            };
            let px = (f32::from(src_col) + 0.5) * metrics.px_per_col;
            let top_y = (f32::from(row) * 2.0 + 0.5) * half_row;
            let top = sample(atlas, actor, px, top_y);
            let bottom = sample(atlas, actor, px, top_y + half_row);

            let cell = &mut buf[(area.x + col, area.y + row)];
            match (top, bottom) {
                (None, None) => {}
                (Some(fg), Some(bg)) => {
                    cell.set_symbol("▀").set_fg(fg).set_bg(bg);
                }
                (Some(fg), None) => {
                    cell.set_symbol("▀").set_fg(fg);
                }
                (None, Some(fg)) => {
                    cell.set_symbol("▄").set_fg(fg);
                }
            }
        }
    }
}
