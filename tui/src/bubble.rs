//! Bubble Glyphs
//!
//! Lays out overlay labels as text blocks. Speech (the style with the
//! smallest font) wraps and gets a padded background; cues and captions
//! are drawn as a single bare line.

use ratatui::buffer::Buffer;
use ratatui::style::{Modifier, Style};
use unicode_width::UnicodeWidthStr;

use companion_core::BubbleStyle;

use crate::host::Label;
use crate::theme;

/// Column width speech wraps at
pub const SPEECH_WRAP: usize = 28;

fn is_speech(style: &BubbleStyle) -> bool {
    *style == BubbleStyle::SPEECH
}

/// Lines a label occupies
pub fn lines(label: &Label) -> Vec<String> {
    if is_speech(&label.style) {
        textwrap::wrap(&label.text, SPEECH_WRAP)
            .into_iter()
            .map(|line| format!(" {line} "))
            .collect()
    } else {
        vec![label.text.clone()]
    }
}

/// Cells a label occupies
pub fn size(lines: &[String]) -> (u16, u16) {
    let width = lines.iter().map(|l| l.width()).max().unwrap_or(0);
    (width.max(1) as u16, lines.len().max(1) as u16)
}

/// Draw a laid-out label into a buffer sized with [`size`]
pub fn draw(buf: &mut Buffer, label: &Label, lines: &[String]) {
    buf.reset();
    let fg = theme::to_terminal(label.style.color).unwrap_or(theme::STATUS_TEXT);
    let mut style = Style::default().fg(fg);
    if is_speech(&label.style) {
        style = style.bg(theme::SPEECH_BG);
    }
    if label.style.font_px >= BubbleStyle::CUE.font_px {
        style = style.add_modifier(Modifier::BOLD);
    }

    let width = buf.area.width as usize;
    for (row, line) in lines.iter().enumerate() {
        let padded = if is_speech(&label.style) {
            format!("{line}{}", " ".repeat(width.saturating_sub(line.width())))
        } else {
            line.clone()
        };
        buf.set_string(0, row as u16, padded, style);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use companion_core::Point;
    use pretty_assertions::assert_eq;
    use ratatui::layout::Rect;
    use ratatui::style::Color;

    fn label(text: &str, style: BubbleStyle) -> Label {
        Label {
            text: text.to_string(),
            style,
            at: Point::default(),
            opacity: 1.0,
        }
    }

    #[test]
    fn test_speech_wraps_and_pads() {
        let l = label("Hi there! Here's my playful kitty!", BubbleStyle::SPEECH);
        let lines = lines(&l);
        assert_eq!(lines, vec![" Hi there! Here's my playful ", " kitty! "]);
        assert_eq!(size(&lines), (29, 2));

        let mut buf = Buffer::empty(Rect::new(0, 0, 29, 2));
        draw(&mut buf, &l, &lines);
        // Padding keeps the background solid to the right edge
        assert_eq!(buf[(28, 1)].bg, theme::SPEECH_BG);
    }

    #[test]
    fn test_cue_is_one_line_in_its_color() {
        let l = label("zzz", BubbleStyle::SNORE);
        let lines = lines(&l);
        assert_eq!(size(&lines), (3, 1));

        let mut buf = Buffer::empty(Rect::new(0, 0, 3, 1));
        draw(&mut buf, &l, &lines);
        assert_eq!(buf[(0, 0)].fg, Color::Rgb(52, 152, 219));
        assert_eq!(buf[(0, 0)].bg, Color::Reset);
    }

    #[test]
    fn test_emoji_width_counts_two_cells() {
        let lines = lines(&label("🐟", BubbleStyle::CUE));
        assert_eq!(size(&lines), (2, 1));
    }
}
