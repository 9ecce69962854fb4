//! Theme and Colors
//!
//! Converts engine colors to terminal colors and holds the few colors the
//! terminal chrome (status bar, bubbles) needs.
//!
//! Terminals have no alpha channel, so bubble opacity is approximated by
//! blending toward the background.

use ratatui::style::Color;

use companion_core::Color as RgbaColor;

// ============================================================================
// Chrome
// ============================================================================

/// Assumed terminal background, the target of every fade
pub const BACKGROUND: Color = Color::Rgb(0, 0, 0);

/// Status bar text
pub const STATUS_TEXT: Color = Color::Rgb(170, 170, 170);

/// Status bar background
pub const STATUS_BG: Color = Color::Rgb(30, 30, 40);

/// The roam-mode button
pub const MODE_BUTTON: Color = Color::Rgb(255, 223, 128);

/// Mode button while hovered
pub const MODE_BUTTON_HOVER: Color = Color::Rgb(255, 150, 120);

/// Diagnostics shown in the status bar
pub const DIAGNOSTIC: Color = Color::Rgb(150, 180, 255);

/// Speech bubble background
pub const SPEECH_BG: Color = Color::Rgb(60, 60, 80);

// ============================================================================
// Conversion
// ============================================================================

/// Engine color to terminal color; `None` for transparent pixels
#[must_use]
pub fn to_terminal(color: RgbaColor) -> Option<Color> {
    if color.is_transparent() {
        None
    } else {
        Some(Color::Rgb(color.r, color.g, color.b))
    }
}

/// Blend an RGB color toward [`BACKGROUND`]
///
/// Named and indexed colors can't be blended and are returned as they are.
#[must_use]
pub fn fade(color: Color, opacity: f32) -> Color {
    let Color::Rgb(r, g, b) = color else {
        return color;
    };
    let Color::Rgb(br, bg, bb) = BACKGROUND else {
        return color;
    };
    let t = opacity.clamp(0.0, 1.0);
    let mix = |c: u8, back: u8| -> u8 {
        (f32::from(back) + (f32::from(c) - f32::from(back)) * t).round() as u8
    };
    Color::Rgb(mix(r, br), mix(g, bg), mix(b, bb))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_transparent_has_no_terminal_color() {
        assert_eq!(to_terminal(RgbaColor::transparent()), None);
        assert_eq!(
            to_terminal(RgbaColor::rgb(52, 152, 219)),
            Some(Color::Rgb(52, 152, 219))
        );
    }

    #[test]
    fn test_fade_blends_toward_background() {
        let white = Color::Rgb(255, 255, 255);
        assert_eq!(fade(white, 1.0), white);
        assert_eq!(fade(white, 0.0), BACKGROUND);
        assert_eq!(fade(white, 0.5), Color::Rgb(128, 128, 128));
        assert_eq!(fade(Color::Magenta, 0.1), Color::Magenta);
    }
}
