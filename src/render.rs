use crossterm::{
    cursor, queue,
    style::{self, Color as CColor},
};
use std::io::{self, Write};

use crate::background::{Layer, Parallax};
use crate::font::{self, TextStyle};
use crate::game::{Game, GameOverItem, MenuItem, Screen};
use crate::obstacles::{Obstacle, Side};
use crate::physics::Player;

// ── Colors ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const fn lerp(a: Rgb, b: Rgb, t_256: u16) -> Rgb {
        let t = t_256 as i32;
        Rgb(
            (a.0 as i32 + (b.0 as i32 - a.0 as i32) * t / 256) as u8,
            (a.1 as i32 + (b.1 as i32 - a.1 as i32) * t / 256) as u8,
            (a.2 as i32 + (b.2 as i32 - a.2 as i32) * t / 256) as u8,
        )
    }

    pub const fn dim(self) -> Rgb {
        Rgb(self.0 / 2, self.1 / 2, self.2 / 2)
    }
}

pub const SKY_TOP: Rgb = Rgb(36, 44, 92);
pub const SKY_BOT: Rgb = Rgb(236, 150, 110);
const CLOUD_FAR: Rgb = Rgb(150, 140, 180);
const CLOUD_NEAR: Rgb = Rgb(225, 205, 215);
const HILL: Rgb = Rgb(70, 60, 105);
const TRUNK_L: Rgb = Rgb(70, 45, 25);
const TRUNK_M: Rgb = Rgb(110, 72, 38);
const TRUNK_HI: Rgb = Rgb(150, 100, 55);
const TRUNK_R: Rgb = Rgb(95, 62, 32);
pub const LEAVES: Rgb = Rgb(48, 130, 60);
const LEAVES_DARK: Rgb = Rgb(30, 90, 40);
pub const NINJA: Rgb = Rgb(24, 24, 36);
pub const HEADBAND: Rgb = Rgb(210, 40, 40);
const EYES: Rgb = Rgb(255, 255, 255);
pub const WHITE: Rgb = Rgb(255, 255, 255);
pub const GOLD: Rgb = Rgb(245, 200, 66);
const RED: Rgb = Rgb(230, 60, 50);
const SHADOW: Rgb = Rgb(30, 30, 30);
const PANEL: Rgb = Rgb(40, 36, 60);
const PANEL_EDGE: Rgb = Rgb(120, 110, 160);

// ── Canvas ──────────────────────────────────────────────────────────────────

/// Something the scene can be drawn onto.
pub trait Canvas {
    fn width(&self) -> usize;
    fn height(&self) -> usize;
    /// Out-of-bounds writes are ignored.
    fn set(&mut self, x: i32, y: i32, c: Rgb);
    fn get(&self, x: usize, y: usize) -> Rgb;

    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, c: Rgb) {
        for dy in 0..h {
            for dx in 0..w {
                self.set(x + dx, y + dy, c);
            }
        }
    }

    fn clear(&mut self, c: Rgb) {
        self.fill_rect(0, 0, self.width() as i32, self.height() as i32, c);
    }
}

/// Pixel buffer shown on the terminal two pixels per cell, using the
/// upper-half block with separate foreground and background colors.
pub struct PixelBuf {
    w: usize,
    h: usize,
    px: Vec<Rgb>,
}

impl PixelBuf {
    pub fn new(w: usize, h: usize, fill: Rgb) -> Self {
        Self {
            w,
            h,
            px: vec![fill; w * h],
        }
    }

    pub fn resize(&mut self, w: usize, h: usize) {
        self.w = w;
        self.h = h;
        self.px.resize(w * h, SKY_TOP);
    }

    pub fn present(&self, out: &mut impl Write) -> io::Result<()> {
        queue!(out, cursor::MoveTo(0, 0))?;
        let rows = self.h / 2;
        let mut prev_fg = Rgb(0, 0, 0);
        let mut prev_bg = Rgb(0, 0, 0);
        let mut need_fg = true;
        let mut need_bg = true;

        for row in 0..rows {
            for col in 0..self.w {
                let top = self.get(col, row * 2);
                let bot = self.get(col, row * 2 + 1);

                if top == bot {
                    if need_bg || prev_bg != top {
                        queue!(out, style::SetBackgroundColor(term_color(top)))?;
                        prev_bg = top;
                        need_bg = false;
                    }
                    queue!(out, style::Print(' '))?;
                } else {
                    if need_fg || prev_fg != top {
                        queue!(out, style::SetForegroundColor(term_color(top)))?;
                        prev_fg = top;
                        need_fg = false;
                    }
                    if need_bg || prev_bg != bot {
                        queue!(out, style::SetBackgroundColor(term_color(bot)))?;
                        prev_bg = bot;
                        need_bg = false;
                    }
                    queue!(out, style::Print('\u{2580}'))?; // ▀
                }
            }
            if row + 1 < rows {
                queue!(out, style::ResetColor, style::Print("\r\n"))?;
                need_fg = true;
                need_bg = true;
            }
        }
        queue!(out, style::ResetColor)?;
        out.flush()
    }
}

impl Canvas for PixelBuf {
    fn width(&self) -> usize {
        self.w
    }

    fn height(&self) -> usize {
        self.h
    }

    fn set(&mut self, x: i32, y: i32, c: Rgb) {
        if x >= 0 && y >= 0 && (x as usize) < self.w && (y as usize) < self.h {
            self.px[y as usize * self.w + x as usize] = c;
        }
    }

    fn get(&self, x: usize, y: usize) -> Rgb {
        self.px[y * self.w + x]
    }
}

fn term_color(c: Rgb) -> CColor {
    CColor::Rgb {
        r: c.0,
        g: c.1,
        b: c.2,
    }
}

// ── Scene ───────────────────────────────────────────────────────────────────

/// Draw the whole frame for the game's current screen.
pub fn draw(canvas: &mut impl Canvas, game: &Game, parallax: &Parallax) {
    draw_sky(canvas);
    draw_backdrop(canvas, parallax);

    match game.screen() {
        Screen::Menu { selected } => draw_menu(canvas, game, selected),
        Screen::Tutorial { prompt } => {
            draw_world(canvas, game);
            if prompt {
                draw_prompt(canvas);
            }
        }
        Screen::Playing => {
            draw_world(canvas, game);
            draw_score(canvas, game.score());
        }
        Screen::GameOver { selected, new_best } => {
            draw_world(canvas, game);
            draw_game_over(canvas, game, selected, new_best);
        }
    }
}

fn draw_sky(canvas: &mut impl Canvas) {
    let (w, h) = (canvas.width(), canvas.height());
    for y in 0..h {
        let t = (y * 256 / h.max(1)) as u16;
        let c = Rgb::lerp(SKY_TOP, SKY_BOT, t);
        for x in 0..w {
            canvas.set(x as i32, y as i32, c);
        }
    }
}

fn draw_backdrop(canvas: &mut impl Canvas, parallax: &Parallax) {
    let w = canvas.width() as i32;
    let h = canvas.height() as f64;
    let scale = h / 48.0;

    // Hills along the bottom edge
    let base = canvas.height() as i32;
    let hill_shift = parallax.offset(Layer::Hills);
    for x in 0..w {
        let fx = (x as f64 + hill_shift) * 0.05;
        let hh = (fx.sin() * 3.0 + (fx * 1.9).sin() * 2.0 + 6.0) * scale;
        for y in (base - hh as i32)..base {
            canvas.set(x, y, HILL);
        }
    }

    // Clouds, far then near
    let layers = [
        (Layer::FarClouds, CLOUD_FAR, 0.18, 3.0),
        (Layer::NearClouds, CLOUD_NEAR, 0.08, 5.0),
    ];
    for (layer, color, height_frac, size) in layers {
        let shift = parallax.offset(layer) as i32;
        let cy = (h * height_frac) as i32;
        let r = (size * scale).max(1.0) as i32;
        let spacing = (w / 3).max(1);
        for i in 0..4 {
            let cx = (i * spacing - shift).rem_euclid(w + spacing) - spacing / 2;
            canvas.fill_rect(cx - r * 2, cy, r * 4, r, color);
            canvas.fill_rect(cx - r, cy - r / 2, r * 2, r / 2 + 1, color);
        }
    }
}

fn draw_world(canvas: &mut impl Canvas, game: &Game) {
    for ob in game.obstacles().obstacles() {
        draw_obstacle(canvas, ob);
    }
    draw_player(canvas, game.player(), game.frame());
}

fn draw_obstacle(canvas: &mut impl Canvas, ob: &Obstacle) {
    let x = ob.x.round() as i32;
    let w = ob.width.round().max(1.0) as i32;
    let y0 = ob.y.round() as i32;
    let y1 = (ob.y + ob.height).round() as i32;

    for dx in 0..w {
        let c = trunk_shade(dx, w);
        for y in y0..y1 {
            canvas.set(x + dx, y, c);
        }
    }

    // Foliage crown on the end facing the gap
    let crown_h = ((ob.height * 0.15).round() as i32).clamp(1, 6).min(y1 - y0);
    let extra = (w / 4).max(1);
    let crown_y = match ob.side {
        Side::Top => y1 - crown_h,
        Side::Bottom => y0,
    };
    canvas.fill_rect(x - extra, crown_y, w + extra * 2, crown_h, LEAVES);
    let edge_y = match ob.side {
        Side::Top => y1 - 1,
        Side::Bottom => y0,
    };
    canvas.fill_rect(x - extra, edge_y, w + extra * 2, 1, LEAVES_DARK);
}

pub(crate) fn trunk_shade(x: i32, total_w: i32) -> Rgb {
    if total_w <= 1 {
        return TRUNK_M;
    }
    let t = (x as f64 / (total_w - 1) as f64 * 256.0) as u16;
    if t < 64 {
        Rgb::lerp(TRUNK_L, TRUNK_M, (t * 4).min(256))
    } else if t < 100 {
        Rgb::lerp(TRUNK_M, TRUNK_HI, ((t - 64) * 7).min(256))
    } else if t < 160 {
        Rgb::lerp(TRUNK_HI, TRUNK_R, ((t - 100) * 4).min(256))
    } else {
        Rgb::lerp(TRUNK_R, TRUNK_L, ((t - 160) * 3).min(256))
    }
}

fn draw_player(canvas: &mut impl Canvas, player: &Player, frame: u64) {
    let x = player.x.round() as i32;
    let y = player.y.round() as i32;
    let w = player.width.round().max(3.0) as i32;
    let h = player.height.round().max(4.0) as i32;

    // Rows are laid out head-down when gravity is flipped.
    let row = |dy: i32| if player.gravity_flipped { y + h - 1 - dy } else { y + dy };

    let legs = (h / 4).max(1);
    let body = h - legs;
    for dy in 0..body {
        canvas.fill_rect(x, row(dy), w, 1, NINJA);
    }

    let band = (body / 4).max(1);
    for dy in band..band * 2 {
        canvas.fill_rect(x, row(dy), w, 1, HEADBAND);
    }
    // Tail of the headband flutters behind
    let flutter = if frame % 8 < 4 { 0 } else { 1 };
    canvas.set(x - 1, row(band + flutter), HEADBAND);
    canvas.set(x - 2, row(band + 1 - flutter), HEADBAND);

    let eyes_y = row(band * 2);
    canvas.fill_rect(x + w / 2, eyes_y, (w - w / 2).max(1), 1, EYES);

    // Running legs
    let stride = (frame / 3) % 2 == 0;
    for dy in body..h {
        let r = row(dy);
        if stride {
            canvas.set(x, r, NINJA);
            canvas.set(x + w - 2, r, NINJA);
        } else {
            canvas.set(x + 1, r, NINJA);
            canvas.set(x + w - 1, r, NINJA);
        }
    }
}

fn draw_score(canvas: &mut impl Canvas, score: u32) {
    let cx = canvas.width() as i32 / 2;
    let style = TextStyle::plain(WHITE).scaled(text_scale(canvas.height())).with_shadow(SHADOW);
    font::draw_number(canvas, cx, 2, score, style);
}

fn text_scale(height: usize) -> i32 {
    if height >= 90 { 2 } else { 1 }
}

fn draw_menu(canvas: &mut impl Canvas, game: &Game, selected: MenuItem) {
    let cx = canvas.width() as i32 / 2;
    let h = canvas.height() as i32;
    let s = text_scale(canvas.height());
    let title = TextStyle::plain(WHITE).scaled(s * 2).with_shadow(SHADOW);

    // "FLIP" turns over every couple of seconds
    let flipped = (game.frame() / 120) % 2 == 1;
    let ty = h / 6;
    font::draw_text_centered(canvas, cx, ty, "FLIP", title.flipped(flipped));
    font::draw_text_centered(
        canvas,
        cx,
        ty + 7 * s * 2,
        "NINJA",
        title.scaled(s).with_shadow(SHADOW),
    );

    let items = [(MenuItem::Start, "START"), (MenuItem::Quit, "QUIT")];
    let mut y = h / 2;
    for (item, label) in items {
        draw_item(canvas, cx, y, label, item == selected, s);
        y += 8 * s;
    }

    if game.best() > 0 {
        let style = TextStyle::plain(GOLD).scaled(s).with_shadow(SHADOW);
        font::draw_text_centered(canvas, cx, y + 2 * s, &format!("BEST {}", game.best()), style);
    }
}

fn draw_item(canvas: &mut impl Canvas, cx: i32, y: i32, label: &str, active: bool, s: i32) {
    let color = if active { GOLD } else { WHITE };
    let style = TextStyle::plain(color).scaled(s).with_shadow(SHADOW);
    font::draw_text_centered(canvas, cx, y, label, style);
    if active {
        let x = cx - font::text_width(label, s) / 2 - 6 * s;
        font::draw_text(canvas, x, y, ">", style);
    }
}

fn draw_prompt(canvas: &mut impl Canvas) {
    let cx = canvas.width() as i32 / 2;
    let cy = canvas.height() as i32 / 2;
    let s = text_scale(canvas.height());
    let w = font::text_width("PRESS SPACE", s) + 8 * s;
    let h = 17 * s;
    canvas.fill_rect(cx - w / 2 - 1, cy - h / 2 - 1, w + 2, h + 2, PANEL_EDGE);
    canvas.fill_rect(cx - w / 2, cy - h / 2, w, h, PANEL);
    let style = TextStyle::plain(WHITE).scaled(s);
    font::draw_text_centered(canvas, cx, cy - h / 2 + 3 * s, "PRESS SPACE", style);
    font::draw_text_centered(canvas, cx, cy - h / 2 + 10 * s, "TO FLIP", style);
}

fn draw_game_over(canvas: &mut impl Canvas, game: &Game, selected: GameOverItem, new_best: bool) {
    let (w, h) = (canvas.width(), canvas.height());
    for y in 0..h {
        for x in 0..w {
            let c = canvas.get(x, y);
            canvas.set(x as i32, y as i32, c.dim());
        }
    }

    let s = text_scale(canvas.height());
    let cx = w as i32 / 2;
    let cy = h as i32 / 2;
    let panel_w = (font::text_width("NEW BEST!", s) + 12 * s).max(w as i32 / 3);
    let panel_h = 44 * s;
    let px = cx - panel_w / 2;
    let py = cy - panel_h / 2;
    canvas.fill_rect(px - 1, py - 1, panel_w + 2, panel_h + 2, PANEL_EDGE);
    canvas.fill_rect(px, py, panel_w, panel_h, PANEL);

    let (headline, color) = if new_best {
        ("NEW BEST!", GOLD)
    } else {
        ("YOU DIED", RED)
    };
    let mut y = py + 3 * s;
    font::draw_text_centered(canvas, cx, y, headline, TextStyle::plain(color).scaled(s));
    y += 8 * s;
    font::draw_number(canvas, cx, y, game.score(), TextStyle::plain(WHITE).scaled(s));
    y += 7 * s;
    let best = format!("BEST {}", game.best());
    font::draw_text_centered(canvas, cx, y, &best, TextStyle::plain(GOLD).scaled(s));
    y += 9 * s;

    let items = [(GameOverItem::Retry, "RETRY"), (GameOverItem::Home, "HOME")];
    for (item, label) in items {
        draw_item(canvas, cx, y, label, item == selected, s);
        y += 8 * s;
    }
}
