//! 3x5 bitmap font for the HUD and menus.

use crate::render::{Canvas, Rgb};

/// Each row is three bits, most significant bit on the left.
type Glyph = [u8; 5];

#[rustfmt::skip]
fn glyph(ch: char) -> Option<Glyph> {
    let g = match ch.to_ascii_uppercase() {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b011, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b010, 0b010, 0b010],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'A' => [0b010, 0b101, 0b111, 0b101, 0b101],
        'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'C' => [0b011, 0b100, 0b100, 0b100, 0b011],
        'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'E' => [0b111, 0b100, 0b110, 0b100, 0b111],
        'F' => [0b111, 0b100, 0b110, 0b100, 0b100],
        'G' => [0b011, 0b100, 0b101, 0b101, 0b011],
        'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'J' => [0b001, 0b001, 0b001, 0b101, 0b010],
        'K' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'M' => [0b101, 0b111, 0b111, 0b101, 0b101],
        'N' => [0b110, 0b101, 0b101, 0b101, 0b101],
        'O' => [0b010, 0b101, 0b101, 0b101, 0b010],
        'P' => [0b110, 0b101, 0b110, 0b100, 0b100],
        'Q' => [0b010, 0b101, 0b101, 0b110, 0b011],
        'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        'S' => [0b011, 0b100, 0b010, 0b001, 0b110],
        'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'V' => [0b101, 0b101, 0b101, 0b101, 0b010],
        'W' => [0b101, 0b101, 0b111, 0b111, 0b101],
        'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'Y' => [0b101, 0b101, 0b010, 0b010, 0b010],
        'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '!' => [0b010, 0b010, 0b010, 0b000, 0b010],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '>' => [0b100, 0b010, 0b001, 0b010, 0b100],
        _ => return None,
    };
    Some(g)
}

#[derive(Debug, Clone, Copy)]
pub struct TextStyle {
    pub color: Rgb,
    /// Pixels per font pixel.
    pub scale: i32,
    pub shadow: Option<Rgb>,
    /// Draw upside-down.
    pub flipped: bool,
}

impl TextStyle {
    pub const fn plain(color: Rgb) -> Self {
        TextStyle {
            color,
            scale: 1,
            shadow: None,
            flipped: false,
        }
    }

    pub const fn scaled(self, scale: i32) -> Self {
        TextStyle { scale, ..self }
    }

    pub const fn with_shadow(self, shadow: Rgb) -> Self {
        TextStyle {
            shadow: Some(shadow),
            ..self
        }
    }

    pub const fn flipped(self, flipped: bool) -> Self {
        TextStyle { flipped, ..self }
    }
}

/// Width in pixels of `text`: 3px per glyph plus 1px spacing.
pub fn text_width(text: &str, scale: i32) -> i32 {
    let n = text.chars().count() as i32;
    if n == 0 { 0 } else { (n * 4 - 1) * scale }
}

pub fn draw_text(canvas: &mut impl Canvas, x: i32, y: i32, text: &str, style: TextStyle) {
    let s = style.scale.max(1);
    for (i, ch) in text.chars().enumerate() {
        let Some(rows) = glyph(ch) else { continue };
        let gx = x + i as i32 * 4 * s;
        for (r, bits) in rows.iter().enumerate() {
            let row = (if style.flipped { 4 - r } else { r }) as i32;
            for col in 0..3 {
                if bits & (0b100 >> col) == 0 {
                    continue;
                }
                let px = gx + col * s;
                let py = y + row * s;
                if let Some(shadow) = style.shadow {
                    canvas.fill_rect(px + s, py + s, s, s, shadow);
                }
                canvas.fill_rect(px, py, s, s, style.color);
            }
        }
    }
}

/// Draw `text` horizontally centered on `cx`.
pub fn draw_text_centered(canvas: &mut impl Canvas, cx: i32, y: i32, text: &str, style: TextStyle) {
    let w = text_width(text, style.scale.max(1));
    draw_text(canvas, cx - w / 2, y, text, style);
}

pub fn draw_number(canvas: &mut impl Canvas, cx: i32, y: i32, n: u32, style: TextStyle) {
    draw_text_centered(canvas, cx, y, &n.to_string(), style);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::PixelBuf;

    const INK: Rgb = Rgb(255, 255, 255);
    const BG: Rgb = Rgb(0, 0, 0);

    fn lit(buf: &PixelBuf) -> Vec<(usize, usize)> {
        let mut out = Vec::new();
        for y in 0..buf.height() {
            for x in 0..buf.width() {
                if buf.get(x, y) == INK {
                    out.push((x, y));
                }
            }
        }
        out
    }

    #[test]
    fn every_letter_and_digit_has_a_glyph() {
        for ch in ('A'..='Z').chain('0'..='9') {
            assert!(glyph(ch).is_some(), "missing {ch}");
        }
        assert_eq!(glyph('a'), glyph('A'));
        assert!(glyph(' ').is_none());
    }

    #[test]
    fn widths_include_spacing() {
        assert_eq!(text_width("", 1), 0);
        assert_eq!(text_width("7", 1), 3);
        assert_eq!(text_width("42", 1), 7);
        assert_eq!(text_width("42", 2), 14);
    }

    #[test]
    fn one_is_drawn_where_expected() {
        let mut buf = PixelBuf::new(5, 7, BG);
        draw_text(&mut buf, 1, 1, "1", TextStyle::plain(INK));
        assert_eq!(
            lit(&buf),
            vec![(2, 1), (1, 2), (2, 2), (2, 3), (2, 4), (1, 5), (2, 5), (3, 5)]
        );
    }

    #[test]
    fn flipped_text_is_mirrored_vertically() {
        let mut up = PixelBuf::new(4, 6, BG);
        let mut down = PixelBuf::new(4, 6, BG);
        draw_text(&mut up, 0, 0, "L", TextStyle::plain(INK));
        draw_text(&mut down, 0, 0, "L", TextStyle::plain(INK).flipped(true));
        for y in 0..5 {
            for x in 0..3 {
                assert_eq!(up.get(x, y), down.get(x, 4 - y));
            }
        }
    }

    #[test]
    fn numbers_are_centered() {
        let mut buf = PixelBuf::new(21, 5, BG);
        draw_number(&mut buf, 10, 0, 88, TextStyle::plain(INK));
        let xs: Vec<usize> = lit(&buf).iter().map(|&(x, _)| x).collect();
        assert_eq!(xs.iter().min(), Some(&7));
        assert_eq!(xs.iter().max(), Some(&13));
    }
}
