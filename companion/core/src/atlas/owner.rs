//! Owner atlas: idle, walk (side view), talk

use super::{Color, Raster, CELL_SIZE};

const SKIN: Color = Color::rgb(0xff, 0xcc, 0xaa);
const HAIR: Color = Color::rgb(0x6d, 0x4c, 0x41);
const SHIRT: Color = Color::rgb(0x34, 0x98, 0xdb);
const PANTS: Color = Color::rgb(0x2c, 0x3e, 0x50);
const EYES: Color = Color::rgb(0, 0, 0);
const MOUTH_CLOSED: Color = Color::rgb(0xd3, 0x54, 0x00);
const MOUTH_OPEN: Color = Color::rgb(0xa0, 0x40, 0x00);

pub(super) fn draw(raster: &mut Raster) {
    let cell = i32::from(CELL_SIZE);
    for f in 0..4 {
        let ox = f * cell;
        idle(raster, ox, 0, f);
        walk(raster, ox, cell, f);
        talk(raster, ox, 2 * cell, f);
    }
}

fn head(r: &mut Raster, ox: i32, oy: i32) {
    r.fill_rect(ox + 12, oy + 6, 8, 8, SKIN);
    r.fill_rect(ox + 12, oy + 4, 8, 3, HAIR);
}

fn idle(r: &mut Raster, ox: i32, oy: i32, f: i32) {
    head(r, ox, oy);
    if f != 3 {
        r.fill_rect(ox + 14, oy + 9, 1, 1, EYES);
        r.fill_rect(ox + 17, oy + 9, 1, 1, EYES);
    }
    r.fill_rect(ox + 11, oy + 14, 10, 10, SHIRT);
    r.fill_rect(ox + 9, oy + 14, 2, 8, SKIN);
    r.fill_rect(ox + 21, oy + 14, 2, 8, SKIN);
    r.fill_rect(ox + 11, oy + 24, 4, 8, PANTS);
    r.fill_rect(ox + 17, oy + 24, 4, 8, PANTS);
}

fn walk(r: &mut Raster, ox: i32, oy: i32, f: i32) {
    let bob = if f % 2 == 1 { -2 } else { 0 };
    head(r, ox, oy + bob);
    r.fill_rect(ox + 18, oy + 8 + bob, 2, 2, EYES);
    r.fill_rect(ox + 13, oy + 14 + bob, 6, 10, SHIRT);

    // arm swing
    match f {
        1 => r.fill_rect(ox + 16, oy + 16 + bob, 4, 3, SKIN),
        3 => r.fill_rect(ox + 10, oy + 16 + bob, 4, 3, SKIN),
        _ => r.fill_rect(ox + 15, oy + 14 + bob, 2, 8, SKIN),
    }

    // legs
    match f {
        1 => {
            r.fill_rect(ox + 10, oy + 24 + bob, 3, 6, PANTS);
            r.fill_rect(ox + 19, oy + 24 + bob, 3, 6, PANTS);
        }
        3 => {
            r.fill_rect(ox + 12, oy + 24 + bob, 3, 6, PANTS);
            r.fill_rect(ox + 17, oy + 24 + bob, 3, 6, PANTS);
        }
        _ => r.fill_rect(ox + 14, oy + 24 + bob, 4, 8, PANTS),
    }
}

fn talk(r: &mut Raster, ox: i32, oy: i32, f: i32) {
    head(r, ox, oy);
    r.fill_rect(ox + 11, oy + 14, 10, 10, SHIRT);
    r.fill_rect(ox + 11, oy + 24, 4, 8, PANTS);
    r.fill_rect(ox + 17, oy + 24, 4, 8, PANTS);
    if f % 2 == 0 {
        r.fill_rect(ox + 15, oy + 12, 2, 1, MOUTH_CLOSED);
    } else {
        r.fill_rect(ox + 15, oy + 11, 2, 3, MOUTH_OPEN);
    }
    if f == 1 || f == 2 {
        // gesturing hand
        r.fill_rect(ox + 21, oy + 10, 4, 4, SKIN);
    }
}
