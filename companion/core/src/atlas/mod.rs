//! Sprite Atlas Generator
//!
//! Each actor kind gets a small atlas drawn procedurally at startup: a grid
//! of 32x32 cells, four frames wide, one row per behavior. Hosts sample it
//! as their draw source (a terminal samples it into half-block glyphs, a
//! window would blit it as an image).
//!
//! ```text
//!          frame 0   frame 1   frame 2   frame 3
//! row 0    idle      idle      idle      idle (blink)
//! row 1    walk      walk      walk      walk
//! row 2    sleep/talk ...
//! row 3    surprise (pet only)
//! row 4    dragged  (pet only)
//! ```
//!
//! Facing is not baked in: every frame faces right and hosts mirror it.

mod owner;
mod pet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::actor::{ActorKind, FRAME_COUNT};

/// Width and height of one atlas cell in pixels
pub const CELL_SIZE: u16 = 32;

/// Surface-agnostic RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    /// Red component (0-255)
    pub r: u8,
    /// Green component (0-255)
    pub g: u8,
    /// Blue component (0-255)
    pub b: u8,
    /// Alpha component (0=transparent, 255=opaque)
    pub a: u8,
}

impl Color {
    /// Create a fully opaque color from RGB components
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Create a fully transparent color
    ///
    /// This is the "nothing here" color used for empty sprite space.
    #[must_use]
    pub const fn transparent() -> Self {
        Self {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        }
    }

    /// Check if this color is fully transparent
    #[must_use]
    pub const fn is_transparent(&self) -> bool {
        self.a == 0
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::transparent()
    }
}

/// Atlas generation errors
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum AtlasError {
    /// A raster needs a non-empty area
    #[error("raster dimensions {width}x{height} are empty")]
    EmptyRaster {
        /// Requested width
        width: u16,
        /// Requested height
        height: u16,
    },
}

/// Offscreen RGBA pixel buffer
#[derive(Clone, Debug, PartialEq)]
pub struct Raster {
    width: u16,
    height: u16,
    pixels: Vec<Color>,
}

impl Raster {
    /// Allocate a fully transparent raster
    ///
    /// # Errors
    ///
    /// Returns `AtlasError::EmptyRaster` if either dimension is zero.
    pub fn new(width: u16, height: u16) -> Result<Self, AtlasError> {
        if width == 0 || height == 0 {
            return Err(AtlasError::EmptyRaster { width, height });
        }
        Ok(Self {
            width,
            height,
            pixels: vec![Color::transparent(); usize::from(width) * usize::from(height)],
        })
    }

    /// Width in pixels
    #[must_use]
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Height in pixels
    #[must_use]
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Fill a rectangle, clipped to the raster
    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Color) {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + w).min(i32::from(self.width));
        let y1 = (y + h).min(i32::from(self.height));
        for py in y0..y1 {
            for px in x0..x1 {
                let idx = py as usize * usize::from(self.width) + px as usize;
                self.pixels[idx] = color;
            }
        }
    }

    /// Pixel at a position (transparent when out of bounds)
    #[must_use]
    pub fn pixel(&self, x: u16, y: u16) -> Color {
        if x >= self.width || y >= self.height {
            return Color::transparent();
        }
        self.pixels[usize::from(y) * usize::from(self.width) + usize::from(x)]
    }

    /// Number of non-transparent pixels in a rectangle
    #[must_use]
    pub fn opaque_pixels_in(&self, x: u16, y: u16, w: u16, h: u16) -> usize {
        let mut count = 0;
        for py in y..y.saturating_add(h) {
            for px in x..x.saturating_add(w) {
                if !self.pixel(px, py).is_transparent() {
                    count += 1;
                }
            }
        }
        count
    }
}

/// A generated atlas for one actor kind
#[derive(Clone, Debug)]
pub struct Atlas {
    kind: ActorKind,
    rows: u8,
    raster: Raster,
}

impl Atlas {
    /// Draw the atlas for an actor kind
    ///
    /// # Errors
    ///
    /// Returns `AtlasError` if the offscreen raster can't be allocated.
    pub fn generate(kind: ActorKind) -> Result<Self, AtlasError> {
        let rows = Self::rows_for(kind);
        let mut raster = Raster::new(
            CELL_SIZE * u16::from(FRAME_COUNT),
            CELL_SIZE * u16::from(rows),
        )?;
        match kind {
            ActorKind::Pet => pet::draw(&mut raster),
            ActorKind::Owner => owner::draw(&mut raster),
        }
        tracing::debug!(
            actor = kind.label(),
            width = raster.width(),
            height = raster.height(),
            "Atlas generated"
        );
        Ok(Self { kind, rows, raster })
    }

    /// Number of behavior rows for a kind
    #[must_use]
    pub fn rows_for(kind: ActorKind) -> u8 {
        match kind {
            ActorKind::Pet => 5,
            ActorKind::Owner => 3,
        }
    }

    /// Actor kind this atlas draws
    #[must_use]
    pub fn kind(&self) -> ActorKind {
        self.kind
    }

    /// Number of rows
    #[must_use]
    pub fn rows(&self) -> u8 {
        self.rows
    }

    /// The underlying raster
    #[must_use]
    pub fn raster(&self) -> &Raster {
        &self.raster
    }

    /// Pixel `(x, y)` inside cell `(row, frame)`
    ///
    /// Rows past the end fall back to row 0, coordinates outside the cell
    /// are transparent.
    #[must_use]
    pub fn frame_pixel(&self, row: u8, frame: u8, x: u16, y: u16) -> Color {
        if x >= CELL_SIZE || y >= CELL_SIZE {
            return Color::transparent();
        }
        let row = if row < self.rows { row } else { 0 };
        let frame = frame % FRAME_COUNT;
        self.raster.pixel(
            u16::from(frame) * CELL_SIZE + x,
            u16::from(row) * CELL_SIZE + y,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_raster_fails() {
        assert_eq!(
            Raster::new(0, 32),
            Err(AtlasError::EmptyRaster {
                width: 0,
                height: 32
            })
        );
    }

    #[test]
    fn test_fill_rect_clips() {
        let mut raster = Raster::new(4, 4).unwrap();
        raster.fill_rect(-2, -2, 4, 4, Color::rgb(1, 2, 3));
        assert_eq!(raster.pixel(0, 0), Color::rgb(1, 2, 3));
        assert_eq!(raster.pixel(1, 1), Color::rgb(1, 2, 3));
        assert!(raster.pixel(2, 2).is_transparent());
        assert_eq!(raster.opaque_pixels_in(0, 0, 4, 4), 4);
        assert!(raster.pixel(10, 10).is_transparent());
    }

    #[test]
    fn test_pet_atlas_has_every_cell_drawn() {
        let atlas = Atlas::generate(ActorKind::Pet).unwrap();
        assert_eq!(atlas.rows(), 5);
        assert_eq!(atlas.raster().width(), 128);
        assert_eq!(atlas.raster().height(), 160);
        for row in 0..atlas.rows() {
            for frame in 0..FRAME_COUNT {
                let opaque = atlas.raster().opaque_pixels_in(
                    u16::from(frame) * CELL_SIZE,
                    u16::from(row) * CELL_SIZE,
                    CELL_SIZE,
                    CELL_SIZE,
                );
                assert!(opaque > 0, "pet cell row {row} frame {frame} is empty");
            }
        }
    }

    #[test]
    fn test_owner_atlas_has_three_rows() {
        let atlas = Atlas::generate(ActorKind::Owner).unwrap();
        assert_eq!(atlas.rows(), 3);
        assert_eq!(atlas.raster().height(), 96);
        for frame in 0..FRAME_COUNT {
            assert!(atlas.raster().opaque_pixels_in(u16::from(frame) * CELL_SIZE, 64, 32, 32) > 0);
        }
    }

    #[test]
    fn test_frames_differ_within_walk_row() {
        let atlas = Atlas::generate(ActorKind::Pet).unwrap();
        let cell = |frame: u8| -> Vec<Color> {
            (0..CELL_SIZE)
                .flat_map(|y| (0..CELL_SIZE).map(move |x| (x, y)))
                .map(|(x, y)| atlas.frame_pixel(1, frame, x, y))
                .collect()
        };
        assert_ne!(cell(0), cell(1));
    }

    #[test]
    fn test_missing_row_falls_back_to_idle() {
        let atlas = Atlas::generate(ActorKind::Owner).unwrap();
        for y in 0..CELL_SIZE {
            for x in 0..CELL_SIZE {
                assert_eq!(atlas.frame_pixel(4, 0, x, y), atlas.frame_pixel(0, 0, x, y));
            }
        }
    }
}
