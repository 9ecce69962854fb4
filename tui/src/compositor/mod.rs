//! Layered Compositor
//!
//! Every sprite and bubble gets its own z-ordered layer. Layers are drawn
//! back to front into one output buffer; blank cells are holes, so a
//! bubble over the cat only hides the cells it actually writes.
//!
//! ```text
//!   z 100  bubbles (speech, cues, captions)
//!   z  60  status bar
//!   z  20  owner
//!   z  10  pet
//! ```

mod layer;

use std::collections::HashMap;

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Color;

use crate::theme;

pub use layer::Layer;

/// Unique identifier for a layer
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayerId(u32);

/// The compositor manages all layers and composites them together
pub struct Compositor {
    layers: HashMap<LayerId, Layer>,
    /// Back to front; ties keep creation order
    render_order: Vec<LayerId>,
    next_id: u32,
    output: Buffer,
    area: Rect,
}

impl Compositor {
    /// Create a compositor for the given area
    pub fn new(area: Rect) -> Self {
        Self {
            layers: HashMap::new(),
            render_order: Vec::new(),
            next_id: 0,
            output: Buffer::empty(area),
            area,
        }
    }

    /// Create a layer and return its ID
    pub fn create_layer(&mut self, x: i32, y: i32, width: u16, height: u16, z_index: i32) -> LayerId {
        let id = LayerId(self.next_id);
        self.next_id += 1;
        self.layers
            .insert(id, Layer::new(id, x, y, width, height, z_index));
        self.update_render_order();
        id
    }

    /// Drop a layer; unknown IDs are ignored
    pub fn remove_layer(&mut self, id: LayerId) {
        if self.layers.remove(&id).is_some() {
            self.render_order.retain(|l| *l != id);
        }
    }

    /// Borrow a layer
    pub fn layer(&self, id: LayerId) -> Option<&Layer> {
        self.layers.get(&id)
    }

    /// Mutable access to a layer's buffer for rendering
    pub fn layer_buffer_mut(&mut self, id: LayerId) -> Option<&mut Buffer> {
        self.layers.get_mut(&id).map(|l| &mut l.buffer)
    }

    /// Move a layer's origin
    pub fn move_layer(&mut self, id: LayerId, x: i32, y: i32) {
        if let Some(layer) = self.layers.get_mut(&id) {
            layer.x = x;
            layer.y = y;
        }
    }

    /// Resize a layer, clearing its buffer when the size changes
    pub fn resize_layer(&mut self, id: LayerId, width: u16, height: u16) {
        if let Some(layer) = self.layers.get_mut(&id) {
            if layer.width() != width || layer.height() != height {
                layer.buffer = Buffer::empty(Rect::new(0, 0, width, height));
            }
        }
    }

    /// Show or hide a layer
    pub fn set_visible(&mut self, id: LayerId, visible: bool) {
        if let Some(layer) = self.layers.get_mut(&id) {
            layer.visible = visible;
        }
    }

    /// Set how strongly a layer's colors show through
    pub fn set_opacity(&mut self, id: LayerId, opacity: f32) {
        if let Some(layer) = self.layers.get_mut(&id) {
            layer.opacity = opacity.clamp(0.0, 1.0);
        }
    }

    /// Resize the output
    pub fn resize(&mut self, area: Rect) {
        self.area = area;
        self.output = Buffer::empty(area);
    }

    /// Output area
    pub fn area(&self) -> Rect {
        self.area
    }

    /// Number of layers
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Whether there are no layers
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Composite all visible layers into the output buffer
    pub fn composite(&mut self) -> &Buffer {
        self.output.reset();
        for id in &self.render_order {
            if let Some(layer) = self.layers.get(id) {
                if layer.visible && layer.opacity > 0.0 {
                    Self::blit_layer(&mut self.output, self.area, layer);
                }
            }
        }
        &self.output
    }

    /// Blit one layer, clipped to the output, skipping blank cells
    fn blit_layer(output: &mut Buffer, area: Rect, layer: &Layer) {
        for ly in 0..layer.height() {
            let dst_y = layer.y + i32::from(ly);
            if dst_y < 0 || dst_y >= i32::from(area.height) {
                continue;
            }
            for lx in 0..layer.width() {
                let dst_x = layer.x + i32::from(lx);
                if dst_x < 0 || dst_x >= i32::from(area.width) {
                    continue;
                }

                let src = &layer.buffer[(lx, ly)];
                if src.symbol() == " " && src.bg == Color::Reset {
                    continue;
                }

                let mut cell = src.clone();
                if layer.opacity < 1.0 {
                    cell.fg = theme::fade(cell.fg, layer.opacity);
                    cell.bg = theme::fade(cell.bg, layer.opacity);
                }
                output[(dst_x as u16, dst_y as u16)] = cell;
            }
        }
    }

    /// Topmost visible layer holding a glyph at a screen cell
    pub fn layer_at(&self, x: u16, y: u16) -> Option<LayerId> {
        self.render_order.iter().rev().copied().find(|id| {
            self.layers
                .get(id)
                .is_some_and(|l| l.visible && l.hit(x, y))
        })
    }

    fn update_render_order(&mut self) {
        let mut order: Vec<LayerId> = self.layers.keys().copied().collect();
        order.sort_by_key(|id| (self.layers.get(id).map_or(0, |l| l.z_index), *id));
        self.render_order = order;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use ratatui::style::Style;

    fn paint(compositor: &mut Compositor, id: LayerId, text: &str, color: Color) {
        if let Some(buf) = compositor.layer_buffer_mut(id) {
            buf.set_string(0, 0, text, Style::default().fg(color));
        }
    }

    #[test]
    fn test_front_layer_wins_only_where_it_draws() {
        let mut c = Compositor::new(Rect::new(0, 0, 10, 2));
        let back = c.create_layer(0, 0, 4, 1, 0);
        let front = c.create_layer(1, 0, 4, 1, 5);
        paint(&mut c, back, "abcd", Color::White);
        paint(&mut c, front, "X X", Color::White);

        let out = c.composite();
        assert_eq!(out[(0, 0)].symbol(), "a");
        assert_eq!(out[(1, 0)].symbol(), "X");
        assert_eq!(out[(2, 0)].symbol(), "c");
        assert_eq!(out[(3, 0)].symbol(), "X");
        assert_eq!(c.layer_at(2, 0), Some(back));
        assert_eq!(c.layer_at(3, 0), Some(front));
    }

    #[test]
    fn test_offscreen_origin_is_clipped() {
        let mut c = Compositor::new(Rect::new(0, 0, 4, 1));
        let id = c.create_layer(-2, 0, 4, 1, 0);
        paint(&mut c, id, "wxyz", Color::White);

        let out = c.composite();
        assert_eq!(out[(0, 0)].symbol(), "y");
        assert_eq!(out[(1, 0)].symbol(), "z");
        assert_eq!(out[(2, 0)].symbol(), " ");
    }

    #[test]
    fn test_opacity_fades_colors() {
        let mut c = Compositor::new(Rect::new(0, 0, 2, 1));
        let id = c.create_layer(0, 0, 1, 1, 0);
        paint(&mut c, id, "z", Color::Rgb(200, 100, 0));
        c.set_opacity(id, 0.5);

        assert_eq!(c.composite()[(0, 0)].fg, Color::Rgb(100, 50, 0));

        c.set_opacity(id, 0.0);
        assert_eq!(c.composite()[(0, 0)].symbol(), " ");
    }

    #[test]
    fn test_removed_layer_disappears() {
        let mut c = Compositor::new(Rect::new(0, 0, 2, 1));
        let id = c.create_layer(0, 0, 1, 1, 0);
        paint(&mut c, id, "q", Color::White);
        c.remove_layer(id);

        assert!(c.is_empty());
        assert_eq!(c.composite()[(0, 0)].symbol(), " ");
        assert_eq!(c.layer_at(0, 0), None);
    }
}
