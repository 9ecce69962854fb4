//! Cat atlas: idle, walk, sleep, surprise, dragged

use super::{Color, Raster, CELL_SIZE};

const FUR: Color = Color::rgb(0xec, 0xf0, 0xf1);
const FUR_SHADE: Color = Color::rgb(0xbd, 0xc3, 0xc7);
const TAIL: Color = Color::rgb(0x95, 0xa5, 0xa6);
const EYES: Color = Color::rgb(0x2c, 0x3e, 0x50);
const SNORE: Color = Color::rgb(0x34, 0x98, 0xdb);

/// Tiny "z" glyph, 4x4
const Z_GLYPH: [&str; 4] = ["####", "  # ", " #  ", "####"];

pub(super) fn draw(raster: &mut Raster) {
    let cell = i32::from(CELL_SIZE);
    for f in 0..4 {
        let ox = f * cell;
        idle(raster, ox, 0, f);
        walk(raster, ox, cell, f);
        sleep(raster, ox, 2 * cell, f);
        surprise(raster, ox, 3 * cell);
        dragged(raster, ox, 4 * cell, f);
    }
}

fn idle(r: &mut Raster, ox: i32, oy: i32, f: i32) {
    r.fill_rect(ox + 10, oy + 14, 12, 12, FUR);
    r.fill_rect(ox + 9, oy + 8, 14, 10, FUR);
    r.fill_rect(ox + 9, oy + 5, 3, 3, FUR_SHADE);
    r.fill_rect(ox + 19, oy + 5, 3, 3, FUR_SHADE);
    if f == 3 {
        // blink
        r.fill_rect(ox + 11, oy + 12, 2, 1, EYES);
        r.fill_rect(ox + 18, oy + 12, 2, 1, EYES);
    } else {
        r.fill_rect(ox + 11, oy + 11, 2, 2, EYES);
        r.fill_rect(ox + 18, oy + 11, 2, 2, EYES);
    }
    let tail = (f % 2) * 2;
    r.fill_rect(ox + 22, oy + 20, 2 + tail, 3, TAIL);
}

fn walk(r: &mut Raster, ox: i32, oy: i32, f: i32) {
    let bob = if f % 2 == 0 { -1 } else { 0 };
    r.fill_rect(ox + 8, oy + 16 + bob, 16, 9, FUR);
    r.fill_rect(ox + 20, oy + 10 + bob, 10, 8, FUR);
    r.fill_rect(ox + 21, oy + 7 + bob, 2, 3, FUR_SHADE);
    r.fill_rect(ox + 27, oy + 7 + bob, 2, 3, FUR_SHADE);
    let stride = if f == 0 || f == 3 { 3 } else { 0 };
    r.fill_rect(ox + 10 + stride, oy + 25 + bob, 3, 4, FUR_SHADE);
    r.fill_rect(ox + 18 - stride, oy + 25 + bob, 3, 4, FUR_SHADE);
}

fn sleep(r: &mut Raster, ox: i32, oy: i32, f: i32) {
    r.fill_rect(ox + 8, oy + 18, 16, 10, FUR);
    r.fill_rect(ox + 10, oy + 16, 12, 4, FUR_SHADE);
    if f % 2 == 0 {
        for (dy, line) in (0..).zip(Z_GLYPH) {
            for (dx, ch) in (0..).zip(line.chars()) {
                if ch == '#' {
                    r.fill_rect(ox + 24 + dx, oy + 4 + dy, 1, 1, SNORE);
                }
            }
        }
    }
}

fn surprise(r: &mut Raster, ox: i32, oy: i32) {
    r.fill_rect(ox + 10, oy + 10, 12, 18, FUR);
    r.fill_rect(ox + 11, oy + 12, 3, 3, EYES);
    r.fill_rect(ox + 17, oy + 12, 3, 3, EYES);
    r.fill_rect(ox + 14, oy + 6, 2, 4, FUR_SHADE);
}

fn dragged(r: &mut Raster, ox: i32, oy: i32, f: i32) {
    r.fill_rect(ox + 10, oy + 10, 12, 16, FUR);
    r.fill_rect(ox + 9, oy + 4, 14, 10, FUR);
    r.fill_rect(ox + 11, oy + 7, 2, 2, EYES);
    r.fill_rect(ox + 18, oy + 7, 2, 2, EYES);
    r.fill_rect(ox + 6, oy + 12, 4, 8, FUR_SHADE);
    r.fill_rect(ox + 22, oy + 12, 4, 8, FUR_SHADE);
    // dangling legs kick alternately
    let kick = if f % 2 == 0 { -2 } else { 2 };
    r.fill_rect(ox + 10, oy + 26 + kick, 3, 5, FUR_SHADE);
    r.fill_rect(ox + 19, oy + 26 - kick, 3, 5, FUR_SHADE);
}
