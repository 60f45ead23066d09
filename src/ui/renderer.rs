//! Presentation layer: double-buffered, diff-based terminal renderer.
//!
//! How it works:
//!   1. Build the next frame into `front` buffer (array of Cell)
//!   2. Compare each cell with `back` buffer (previous frame)
//!   3. Only emit terminal commands for cells that changed
//!   4. All commands are batched with `queue!`, flushed once at the end
//!   5. Swap front/back
//!
//! Composition only reads the `Showcase`; nothing here mutates scene state.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::card::Tone;
use crate::domain::countdown::Counter;
use crate::domain::story::{
    NAV_ITEMS, PROBLEMS, SOLUTIONS, STEPS, SUPERVISOR_CAPTION, SUPERVISOR_TITLE, WITHOUT_TAGLINE,
    WITH_TAGLINE,
};
use crate::domain::Millis;
use crate::sim::alert_card::AlertCard;
use crate::sim::showcase::Showcase;
use crate::sim::switcher::Scene;

// ── Palette ──

const BASE_BG: Color = Color::Rgb { r: 14, g: 17, b: 28 };
const ACCENT: Color = Color::Rgb { r: 90, g: 170, b: 255 };
const DANGER: Color = Color::Rgb { r: 255, g: 80, b: 80 };
const SAFE: Color = Color::Rgb { r: 80, g: 220, b: 120 };
const DIM: Color = Color::DarkGrey;
const TEXT: Color = Color::White;

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    const BLANK: Cell = Cell { ch: ' ', fg: TEXT, bg: BASE_BG };

    /// Sentinel cell used to invalidate the back buffer.
    /// Different from any real cell, so every position will be diff'd.
    const INVALID: Cell = Cell { ch: '?', fg: Color::Magenta, bg: Color::Magenta };

    fn new(ch: char, fg: Color, bg: Color) -> Self {
        let bg = match bg {
            Color::Reset => BASE_BG,
            other => other,
        };
        Cell { ch, fg, bg }
    }
}

// ── FrameBuffer: a 2D grid of Cells ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer { width: w, height: h, cells: vec![Cell::BLANK; w * h] }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Cell::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn invalidate(&mut self) {
        self.cells.fill(Cell::INVALID);
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }

    /// Write a string at (x, y), clipped to `max` columns and the buffer edge.
    fn put_clipped(&mut self, x: usize, y: usize, s: &str, max: usize, fg: Color, bg: Color) {
        for (i, ch) in s.chars().take(max).enumerate() {
            if x + i >= self.width {
                break;
            }
            self.set(x + i, y, Cell::new(ch, fg, bg));
        }
    }

    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color) {
        self.put_clipped(x, y, s, usize::MAX, fg, bg);
    }

    fn fill_row(&mut self, y: usize, bg: Color) {
        for x in 0..self.width {
            self.set(x, y, Cell::new(' ', TEXT, bg));
        }
    }

    fn draw_box(&mut self, x: usize, y: usize, w: usize, h: usize, fg: Color) {
        if w < 2 || h < 2 {
            return;
        }
        let (r, b) = (x + w - 1, y + h - 1);
        for cx in x + 1..r {
            self.set(cx, y, Cell::new('─', fg, BASE_BG));
            self.set(cx, b, Cell::new('─', fg, BASE_BG));
        }
        for cy in y + 1..b {
            self.set(x, cy, Cell::new('│', fg, BASE_BG));
            self.set(r, cy, Cell::new('│', fg, BASE_BG));
        }
        self.set(x, y, Cell::new('┌', fg, BASE_BG));
        self.set(r, y, Cell::new('┐', fg, BASE_BG));
        self.set(x, b, Cell::new('└', fg, BASE_BG));
        self.set(r, b, Cell::new('┘', fg, BASE_BG));
    }

    #[cfg(test)]
    fn row_text(&self, y: usize) -> String {
        (0..self.width).map(|x| self.get(x, y).ch).collect()
    }
}

/// Greedy word wrap. Words longer than `width` are hard-split.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    if width == 0 {
        return lines;
    }
    let mut line = String::new();
    for word in text.split_whitespace() {
        let needed = if line.is_empty() { word.chars().count() } else { line.chars().count() + 1 + word.chars().count() };
        if needed > width && !line.is_empty() {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
        while line.chars().count() > width {
            let head: String = line.chars().take(width).collect();
            line = line.chars().skip(width).collect();
            lines.push(head);
        }
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

fn tone_color(tone: Tone) -> Color {
    match tone {
        Tone::Blue => ACCENT,
        Tone::Red => DANGER,
    }
}

// ── Renderer ──

const HEADER_ROW: usize = 0;
const TITLE_ROW: usize = 2;
const BODY_ROW: usize = 5;
const CARD_H: usize = 11;
const ICON_FLASH_MS: Millis = 400;

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    last_scene: Option<Scene>,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            last_scene: None,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(BASE_BG),
            Clear(ClearType::All)
        )?;

        let (tw, th) = terminal::size()?;
        self.term_w = tw as usize;
        self.term_h = th as usize;
        self.front.resize(self.term_w, self.term_h);
        self.back.resize(self.term_w, self.term_h);
        // Force full repaint on first frame.
        self.back.invalidate();
        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(self.writer, ResetColor, cursor::Show, terminal::LeaveAlternateScreen)?;
        terminal::disable_raw_mode()
    }

    /// Repaint every cell on the next frame.
    pub fn invalidate(&mut self) {
        self.back.invalidate();
    }

    pub fn render(&mut self, showcase: &Showcase) -> io::Result<()> {
        let (tw, th) = terminal::size()?;
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.term_w = tw as usize;
            self.term_h = th as usize;
            self.front.resize(self.term_w, self.term_h);
            self.back.resize(self.term_w, self.term_h);
            self.back.invalidate();
            queue!(self.writer, SetBackgroundColor(BASE_BG), Clear(ClearType::All))?;
        }

        // Scene change → clear for clean transition
        if self.last_scene != Some(showcase.scene()) {
            self.back.invalidate();
            queue!(self.writer, SetBackgroundColor(BASE_BG), Clear(ClearType::All))?;
            self.last_scene = Some(showcase.scene());
        }

        self.compose(showcase);
        self.flush_diff()?;
        std::mem::swap(&mut self.front, &mut self.back);
        Ok(())
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = TEXT;
        let mut last_bg = BASE_BG;
        let mut need_move = true;
        let mut last_x: usize = 0;
        let mut last_y: usize = 0;

        // Explicit base colors; ResetColor would fall back to the terminal default.
        queue!(self.writer, SetForegroundColor(TEXT), SetBackgroundColor(BASE_BG))?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let cell = self.front.get(x, y);
                if cell == self.back.get(x, y) {
                    need_move = true;
                    continue;
                }

                if need_move || x != last_x + 1 || y != last_y {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                    need_move = false;
                }
                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = cell.bg;
                }
                queue!(self.writer, Print(cell.ch))?;
                last_x = x;
                last_y = y;
            }
        }

        self.writer.flush()
    }

    // ── Compose: build front buffer content ──

    fn compose(&mut self, sc: &Showcase) {
        self.front.clear();
        let now = sc.now();

        self.compose_header(sc);
        match sc.scene() {
            Scene::Without => self.compose_without(sc, now),
            Scene::With => self.compose_with(sc),
        }
        self.compose_footer(sc, now);
    }

    fn compose_header(&mut self, sc: &Showcase) {
        let bar = Color::Rgb { r: 24, g: 30, b: 48 };
        self.front.fill_row(HEADER_ROW, bar);
        self.front.put_str(1, HEADER_ROW, "◆ simbian", ACCENT, bar);

        let nav = NAV_ITEMS.join("   ");
        let nav_x = self.front.width.saturating_sub(nav.chars().count() + 2);
        self.front.put_str(nav_x, HEADER_ROW, &nav, DIM, bar);

        let mut x = 2;
        for (key, scene) in [("1", Scene::Without), ("2", Scene::With)] {
            let label = format!(" {key} {} ", scene.label());
            let (fg, bg) = if sc.scene() == scene { (Color::Black, ACCENT) } else { (DIM, BASE_BG) };
            self.front.put_str(x, TITLE_ROW - 1, &label, fg, bg);
            x += label.chars().count() + 2;
        }

        let (headline, tagline, color) = match sc.scene() {
            Scene::Without => (Scene::Without.label(), WITHOUT_TAGLINE, DANGER),
            Scene::With => (Scene::With.label(), WITH_TAGLINE, SAFE),
        };
        self.front.put_str(2, TITLE_ROW + 1, headline, color, Color::Reset);
        self.front.put_str(2, TITLE_ROW + 2, tagline, DIM, Color::Reset);
    }

    fn compose_without(&mut self, sc: &Showcase, now: Millis) {
        let scene = sc.without();
        let width = self.front.width.saturating_sub(4);
        let mut row = BODY_ROW;

        for (i, beat) in PROBLEMS.iter().enumerate() {
            let current = i == scene.problem_index();
            let (marker, fg) = if current { ('▶', TEXT) } else { (' ', DIM) };
            self.front.put_clipped(2, row, &format!("{marker} {}", beat.title), width, fg, Color::Reset);
            row += 1;
        }
        let desc = PROBLEMS[scene.problem_index() % PROBLEMS.len()].description;
        for line in wrap(desc, width.saturating_sub(2)) {
            self.front.put_str(4, row, &line, ACCENT, Color::Reset);
            row += 1;
        }
        row += 1;
        self.front.put_clipped(2, row, &format!("{SUPERVISOR_TITLE}: {SUPERVISOR_CAPTION}"), width, DIM, Color::Reset);
        row += 2;

        let count = scene.cards().len().max(1);
        let card_w = (width / count).max(16);
        for (i, card) in scene.cards().iter().enumerate() {
            self.compose_card(card, 2 + i * card_w, row, card_w.saturating_sub(1), now);
        }
    }

    fn compose_card(&mut self, card: &AlertCard, x: usize, y: usize, w: usize, now: Millis) {
        let kind = card.kind();
        let tone = tone_color(kind.tone());
        // Shake jitters the card one column every 80 ms.
        let x = if card.is_shaking() && (now / 80) % 2 == 1 { x + 1 } else { x };
        let border = if card.is_glowing() { tone } else { DIM };
        self.front.draw_box(x, y, w, CARD_H, border);

        let inner = w.saturating_sub(4);
        self.front.put_clipped(x + 2, y + 1, kind.title(), inner, tone, Color::Reset);
        let count_fg = if card.is_settled(now) { TEXT } else { tone };
        self.front.put_clipped(x + 2, y + 2, &card.displayed(now).to_string(), inner, count_fg, Color::Reset);

        if card.icons().is_empty() {
            self.front.put_clipped(x + 2, y + 4, "no signals yet", inner, DIM, Color::Reset);
        }
        // Icons keep the color of the card that sent them; fresh arrivals flash white.
        for (i, token) in card.icons().iter().enumerate() {
            let cx = x + 2 + i * 2;
            if cx >= x + 2 + inner {
                break;
            }
            let fresh = now.saturating_sub(token.at) < ICON_FLASH_MS && token.at > 0;
            let fg = if fresh { TEXT } else { tone_color(token.source.tone()) };
            self.front.set(cx, y + 4, Cell::new(token.glyph.symbol(), fg, BASE_BG));
        }

        // Only the threats card shows alert text; the others change nothing but their count.
        if !kind.is_threats() {
            return;
        }

        let mut row = y + 6;
        for alert in card.alerts() {
            self.front.put_clipped(x + 2, row, &format!("! {}", alert.message), inner, DANGER, Color::Reset);
            row += 1;
        }
        if let Some(falling) = card.falling() {
            // The newest alert drops down the card over its first second.
            let drop = (now.saturating_sub(falling.at) / 250).min(3) as usize;
            let fy = (y + 6 + drop).min(y + CARD_H - 2);
            if drop > 0 {
                self.front.put_clipped(x + 2, fy, &format!("↓ {}", falling.message), inner, TEXT, Color::Reset);
            }
        }
    }

    fn compose_with(&mut self, sc: &Showcase) {
        let scene = sc.with();
        let width = self.front.width.saturating_sub(4);
        let mut row = BODY_ROW;

        let mut x = 2;
        for counter in Counter::ALL {
            let n = scene.count(counter);
            let color = if scene.counters().reached_zero(counter) { SAFE } else { DANGER };
            let text = format!("{}: {n:>3}", counter.label());
            self.front.put_str(x, row, &text, color, Color::Reset);
            x += text.chars().count() + 4;
        }
        row += 2;

        let bar_w = width.min(50);
        let filled = (scene.progress_ratio() * bar_w as f64).round() as usize;
        for i in 0..bar_w {
            let (ch, fg) = if i < filled { ('█', SAFE) } else { ('░', DIM) };
            self.front.set(2 + i, row, Cell::new(ch, fg, BASE_BG));
        }
        row += 2;

        let step = scene.current_step();
        for (i, beat) in STEPS.iter().enumerate() {
            let i = i as i8;
            let (marker, fg) = match i.cmp(&step) {
                std::cmp::Ordering::Less => ('✓', SAFE),
                std::cmp::Ordering::Equal => ('▶', TEXT),
                std::cmp::Ordering::Greater => ('·', DIM),
            };
            self.front.put_clipped(2, row, &format!("{marker} {}", beat.title), width, fg, Color::Reset);
            row += 1;
            if i == step {
                for line in wrap(beat.description, width.saturating_sub(4)) {
                    self.front.put_str(6, row, &line, ACCENT, Color::Reset);
                    row += 1;
                }
            }
        }

        if scene.solutions_visible() {
            row += 1;
            for beat in SOLUTIONS {
                self.front.put_clipped(2, row, &format!("◆ {}", beat.title), width, SAFE, Color::Reset);
                row += 1;
                for line in wrap(beat.description, width.saturating_sub(4)) {
                    self.front.put_str(4, row, &line, DIM, Color::Reset);
                    row += 1;
                }
            }
        }
    }

    fn compose_footer(&mut self, sc: &Showcase, now: Millis) {
        let Some(row) = self.front.height.checked_sub(1) else {
            return;
        };
        let help = "Tab/Space switch   1/2 scene   a animate   q quit";
        self.front.put_str(1, row, help, DIM, Color::Reset);

        let mut status = format!("{:>4}.{}s", now / 1000, (now % 1000) / 100);
        if let Some(left) = sc.auto_advance_in() {
            status.insert_str(0, &format!("next scene in {}s  ", left.div_ceil(1000)));
        }
        if !sc.is_animating() {
            status.insert_str(0, "paused  ");
        }
        if sc.is_locked() {
            status.insert_str(0, "switching…  ");
        }
        let sx = self.front.width.saturating_sub(status.chars().count() + 1);
        self.front.put_str(sx, row, &status, if sc.is_locked() { ACCENT } else { DIM }, Color::Reset);
    }
}
