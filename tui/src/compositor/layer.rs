//! Layer - A single compositable layer

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Color;

use super::LayerId;

/// A single layer in the compositor
///
/// The origin may lie off screen (a sprite dragged past an edge); only the
/// part that overlaps the output is drawn.
pub struct Layer {
    /// Unique identifier
    pub id: LayerId,
    /// Z-order (higher = in front)
    pub z_index: i32,
    /// Screen column of the left edge
    pub x: i32,
    /// Screen row of the top edge
    pub y: i32,
    /// Whether the layer is drawn at all
    pub visible: bool,
    /// 0.0 = invisible, 1.0 = solid; applied by fading colors at blit time
    pub opacity: f32,
    /// The layer's render buffer, in origin coordinates
    pub buffer: Buffer,
}

impl Layer {
    /// Create a layer with an empty buffer of `width` x `height`
    pub fn new(id: LayerId, x: i32, y: i32, width: u16, height: u16, z_index: i32) -> Self {
        Self {
            id,
            z_index,
            x,
            y,
            visible: true,
            opacity: 1.0,
            buffer: Buffer::empty(Rect::new(0, 0, width, height)),
        }
    }

    /// Width in cells
    pub fn width(&self) -> u16 {
        self.buffer.area.width
    }

    /// Height in cells
    pub fn height(&self) -> u16 {
        self.buffer.area.height
    }

    /// Whether a screen cell falls inside the layer and draws something
    ///
    /// Blank unpainted cells are see-through, so they don't count as hits.
    pub fn hit(&self, x: u16, y: u16) -> bool {
        let lx = i32::from(x) - self.x;
        let ly = i32::from(y) - self.y;
        if lx < 0 || ly < 0 || lx >= i32::from(self.width()) || ly >= i32::from(self.height()) {
            return false;
        }
        let cell = &self.buffer[(lx as u16, ly as u16)];
        cell.symbol() != " " || cell.bg != Color::Reset
    }
}
