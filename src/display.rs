/// Rendering layer: screens draw into a `Canvas`, the front-end flushes it.
///
/// The canvas is a character grid sized to the terminal.  Field coordinates
/// are scaled onto it; HUD text is placed by cell.  Nothing here reads or
/// writes simulation state, and a failed flush leaves the game untouched.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};

use crate::entities::{Field, Rect};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_HUD_NAME: Color = Color::White;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HP_PLAYER: Color = Color::Green;
const C_HP_BOSS: Color = Color::DarkYellow;
const C_BOSS_NAME: Color = Color::Yellow;
const C_BUFF: Color = Color::Yellow;
const C_BAR_EMPTY: Color = Color::DarkGrey;

// ── Canvas ────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cell {
    pub ch: char,
    pub fg: Color,
}

impl Cell {
    const BLANK: Cell = Cell { ch: ' ', fg: Color::Reset };
}

pub struct Canvas {
    cols: u16,
    rows: u16,
    field: Field,
    cells: Vec<Cell>,
}

impl Canvas {
    pub fn new(cols: u16, rows: u16, field: Field) -> Self {
        Canvas {
            cols,
            rows,
            field,
            cells: vec![Cell::BLANK; cols as usize * rows as usize],
        }
    }

    pub fn cols(&self) -> u16 {
        self.cols
    }

    pub fn rows(&self) -> u16 {
        self.rows
    }

    /// Match a new terminal size.  Contents are discarded.
    pub fn resize(&mut self, cols: u16, rows: u16) {
        if cols != self.cols || rows != self.rows {
            *self = Canvas::new(cols, rows, self.field);
        }
    }

    pub fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    /// Terminal cell containing the field point `(x, y)`.
    pub fn to_cell(&self, x: f32, y: f32) -> (i32, i32) {
        (
            (x / self.field.width * self.cols as f32).floor() as i32,
            (y / self.field.height * self.rows as f32).floor() as i32,
        )
    }

    pub fn cell(&self, col: u16, row: u16) -> Option<Cell> {
        if col >= self.cols || row >= self.rows {
            return None;
        }
        Some(self.cells[row as usize * self.cols as usize + col as usize])
    }

    /// Write one cell; anything off the grid is dropped.
    pub fn set(&mut self, col: i32, row: i32, ch: char, fg: Color) {
        if col < 0 || row < 0 || col >= self.cols as i32 || row >= self.rows as i32 {
            return;
        }
        self.cells[row as usize * self.cols as usize + col as usize] = Cell { ch, fg };
    }

    pub fn put_str(&mut self, col: i32, row: i32, text: &str, fg: Color) {
        for (i, ch) in text.chars().enumerate() {
            self.set(col + i as i32, row, ch, fg);
        }
    }

    pub fn put_centered(&mut self, row: i32, text: &str, fg: Color) {
        let col = (self.cols as i32 - text.chars().count() as i32) / 2;
        self.put_str(col.max(0), row, text, fg);
    }

    /// Fill every cell the field rectangle touches (at least one cell).
    pub fn fill_rect(&mut self, rect: Rect, ch: char, fg: Color) {
        let (c0, r0) = self.to_cell(rect.x, rect.y);
        let sx = self.cols as f32 / self.field.width;
        let sy = self.rows as f32 / self.field.height;
        let c1 = ((rect.right() * sx).ceil() as i32 - 1).max(c0);
        let r1 = ((rect.bottom() * sy).ceil() as i32 - 1).max(r0);
        for row in r0..=r1 {
            for col in c0..=c1 {
                self.set(col, row, ch, fg);
            }
        }
    }

    /// A `width`-cell bar, `ratio` of it filled.
    pub fn health_bar(&mut self, col: i32, row: i32, width: u16, ratio: f32, fg: Color) {
        let filled = (ratio.clamp(0.0, 1.0) * width as f32).round() as i32;
        for i in 0..width as i32 {
            if i < filled {
                self.set(col + i, row, '█', fg);
            } else {
                self.set(col + i, row, '░', C_BAR_EMPTY);
            }
        }
    }

    /// The characters of one row, trailing blanks included.
    pub fn row_text(&self, row: u16) -> String {
        if row >= self.rows {
            return String::new();
        }
        let start = row as usize * self.cols as usize;
        self.cells[start..start + self.cols as usize]
            .iter()
            .map(|c| c.ch)
            .collect()
    }

    /// Whether `text` appears anywhere on the canvas.
    pub fn contains(&self, text: &str) -> bool {
        (0..self.rows).any(|row| self.row_text(row).contains(text))
    }

    /// Push the whole frame to a terminal.
    pub fn flush<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        out.queue(terminal::Clear(terminal::ClearType::All))?;

        for row in 0..self.rows {
            out.queue(cursor::MoveTo(0, row))?;
            let mut current = Color::Reset;
            out.queue(style::SetForegroundColor(current))?;
            let start = row as usize * self.cols as usize;
            for cell in &self.cells[start..start + self.cols as usize] {
                if cell.fg != current {
                    current = cell.fg;
                    out.queue(style::SetForegroundColor(current))?;
                }
                out.queue(Print(cell.ch))?;
            }
        }

        // Park cursor in a harmless spot and flush
        out.queue(style::ResetColor)?;
        out.queue(cursor::MoveTo(0, self.rows.saturating_sub(1)))?;
        out.flush()?;
        Ok(())
    }
}

// ── Shared overlays ───────────────────────────────────────────────────────────

/// Colour for text faded to `alpha` (0–255), or `None` while invisible.
pub fn fade_color(alpha: f32) -> Option<Color> {
    match alpha {
        a if a <= 0.0 => None,
        a if a < 85.0 => Some(Color::DarkGrey),
        a if a < 170.0 => Some(Color::Grey),
        _ => Some(Color::White),
    }
}

/// Player name, score and health bar in the top-left corner.
pub fn draw_hud(canvas: &mut Canvas, nickname: &str, score: u32, health: f32, max_health: f32) {
    canvas.put_str(1, 0, &format!("Player: {}", nickname), C_HUD_NAME);
    canvas.put_str(1, 1, &format!("Score: {}", score), C_HUD_SCORE);
    let ratio = if max_health > 0.0 { health / max_health } else { 0.0 };
    canvas.health_bar(1, 2, 20, ratio, C_HP_PLAYER);
}

/// Boss name and health bar centred along the top.
pub fn draw_boss_bar(canvas: &mut Canvas, name: &str, ratio: f32) {
    let width: u16 = 30;
    let col = (canvas.cols() as i32 - width as i32) / 2;
    canvas.put_centered(0, &name.to_uppercase(), C_BOSS_NAME);
    canvas.health_bar(col.max(0), 1, width, ratio, C_HP_BOSS);
}

/// Remaining buff time under the HUD.
pub fn draw_buff_panel(canvas: &mut Canvas, remaining: f32, fraction: f32) {
    canvas.put_str(1, 4, &format!("CARRULIM ACTIVE {:.1}s", remaining.max(0.0)), C_BUFF);
    canvas.health_bar(1, 5, 18, fraction, C_BUFF);
}

/// Centred story text, each line fading in `step` alpha behind the last.
pub fn draw_story(canvas: &mut Canvas, lines: &[String], alpha: f32, step: f32) {
    let mut row = canvas.rows() as i32 / 2 - lines.len() as i32;
    for (i, line) in lines.iter().enumerate() {
        let line_alpha = (alpha - i as f32 * step).clamp(0.0, 255.0);
        if let Some(color) = fade_color(line_alpha) {
            canvas.put_centered(row, line, color);
        }
        row += 2;
    }
}
