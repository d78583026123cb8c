//! Draw-list rasteriser for the terminal
//!
//! The square play area is letterboxed into the terminal, assuming cells
//! about twice as tall as they are wide. Translucent fills blend into both
//! the background and the glyph colour of what is underneath.

use std::io::{self, BufWriter, Stdout, Write};

use crossterm::event::{
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor};
use crossterm::{cursor, execute, queue, terminal};
use glam::Vec2;

use crate::error::RenderError;
use crate::render::{DrawCommand, DrawList, Projection, Renderer, Rgba};

/// One character cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glyph {
    pub ch: char,
    pub fg: Rgba,
    pub bg: Rgba,
}

impl Default for Glyph {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: [1.0, 1.0, 1.0, 1.0],
            bg: [0.0, 0.0, 0.0, 1.0],
        }
    }
}

/// A rasterised frame
#[derive(Debug, Clone, PartialEq)]
pub struct CellGrid {
    cols: u16,
    rows: u16,
    cells: Vec<Glyph>,
    // === Play area in cell units ===
    view_x: f32,
    view_w: f32,
}

impl CellGrid {
    pub fn new(cols: u16, rows: u16) -> Self {
        let view_w = (f32::from(rows) * 2.0).min(f32::from(cols));
        Self {
            cols,
            rows,
            cells: vec![Glyph::default(); usize::from(cols) * usize::from(rows)],
            view_x: (f32::from(cols) - view_w) * 0.5,
            view_w,
        }
    }

    /// Replay a draw list onto a fresh grid
    pub fn rasterize(frame: &DrawList, cols: u16, rows: u16) -> Self {
        let mut grid = Self::new(cols, rows);
        let mut active = Projection::ScreenSpace;
        let mut stack = Vec::new();

        for command in frame.commands() {
            match command {
                DrawCommand::Clear(color) => grid.clear(*color),
                DrawCommand::SetProjection(p) => active = *p,
                DrawCommand::PushProjection(p) => {
                    stack.push(active);
                    active = *p;
                }
                DrawCommand::PopProjection => {
                    if let Some(p) = stack.pop() {
                        active = p;
                    }
                }
                DrawCommand::FillRect {
                    center,
                    half,
                    color,
                } => grid.fill_rect(active, *center, *half, *color),
                DrawCommand::Disc {
                    center,
                    radius,
                    color,
                } => grid.disc(active, *center, *radius, *color),
                DrawCommand::Text {
                    pos, text, color, ..
                } => grid.text(active, *pos, text, *color),
            }
        }
        grid
    }

    pub fn cols(&self) -> u16 {
        self.cols
    }

    pub fn rows(&self) -> u16 {
        self.rows
    }

    pub fn get(&self, col: u16, row: u16) -> Option<&Glyph> {
        if col >= self.cols || row >= self.rows {
            return None;
        }
        self.cells
            .get(usize::from(row) * usize::from(self.cols) + usize::from(col))
    }

    /// Text of one row, for inspection
    pub fn row_text(&self, row: u16) -> String {
        (0..self.cols)
            .filter_map(|col| self.get(col, row).map(|g| g.ch))
            .collect()
    }

    fn get_mut(&mut self, col: i32, row: i32) -> Option<&mut Glyph> {
        if col < 0 || row < 0 || col >= i32::from(self.cols) || row >= i32::from(self.rows) {
            return None;
        }
        let index = row as usize * usize::from(self.cols) + col as usize;
        self.cells.get_mut(index)
    }

    /// Projection coordinates to continuous cell coordinates
    fn to_cells(&self, projection: Projection, p: Vec2) -> Vec2 {
        let v = projection.to_viewport(p);
        Vec2::new(self.view_x + v.x * self.view_w, v.y * f32::from(self.rows))
    }

    fn cell_scale(&self, projection: Projection) -> Vec2 {
        projection.unit_scale() * Vec2::new(self.view_w, f32::from(self.rows))
    }

    fn clear(&mut self, color: Rgba) {
        for glyph in &mut self.cells {
            *glyph = Glyph {
                ch: ' ',
                fg: color,
                bg: color,
            };
        }
    }

    fn paint(&mut self, col: i32, row: i32, color: Rgba) {
        let Some(glyph) = self.get_mut(col, row) else {
            return;
        };
        if color[3] >= 1.0 {
            *glyph = Glyph {
                ch: ' ',
                fg: color,
                bg: color,
            };
        } else {
            glyph.bg = blend(glyph.bg, color);
            glyph.fg = blend(glyph.fg, color);
        }
    }

    fn fill_rect(&mut self, projection: Projection, center: Vec2, half: Vec2, color: Rgba) {
        let a = self.to_cells(projection, center - half);
        let b = self.to_cells(projection, center + half);
        let (min, max) = (a.min(b), a.max(b));

        // Cells whose centres fall inside the rectangle
        let c0 = (min.x - 0.5).ceil() as i32;
        let c1 = (max.x - 0.5).floor() as i32;
        let r0 = (min.y - 0.5).ceil() as i32;
        let r1 = (max.y - 0.5).floor() as i32;

        if c0 > c1 || r0 > r1 {
            // Smaller than a cell: paint the one under its centre
            let c = self.to_cells(projection, center);
            self.paint(c.x.floor() as i32, c.y.floor() as i32, color);
            return;
        }
        for row in r0..=r1 {
            for col in c0..=c1 {
                self.paint(col, row, color);
            }
        }
    }

    fn disc(&mut self, projection: Projection, center: Vec2, radius: f32, color: Rgba) {
        let c = self.to_cells(projection, center);
        let r = self.cell_scale(projection) * radius;

        let mut covered = false;
        if r.x > 0.0 && r.y > 0.0 {
            for row in (c.y - r.y).floor() as i32..=(c.y + r.y).ceil() as i32 {
                for col in (c.x - r.x).floor() as i32..=(c.x + r.x).ceil() as i32 {
                    let d = (Vec2::new(col as f32 + 0.5, row as f32 + 0.5) - c) / r;
                    if d.length_squared() <= 1.0 {
                        self.paint(col, row, color);
                        covered = true;
                    }
                }
            }
        }

        if covered {
            return;
        }
        if let Some(glyph) = self.get_mut(c.x.floor() as i32, c.y.floor() as i32) {
            glyph.ch = '•';
            glyph.fg = color;
        }
    }

    fn text(&mut self, projection: Projection, pos: Vec2, text: &str, color: Rgba) {
        let start = self.to_cells(projection, pos);
        let row = start.y.floor() as i32;
        for (i, ch) in text.chars().enumerate() {
            if let Some(glyph) = self.get_mut(start.x.floor() as i32 + i as i32, row) {
                glyph.ch = ch;
                glyph.fg = color;
            }
        }
    }
}

/// Source-over blend of `src` onto an opaque `dst`
fn blend(dst: Rgba, src: Rgba) -> Rgba {
    let a = src[3].clamp(0.0, 1.0);
    [
        dst[0] * (1.0 - a) + src[0] * a,
        dst[1] * (1.0 - a) + src[1] * a,
        dst[2] * (1.0 - a) + src[2] * a,
        1.0,
    ]
}

fn to_color(c: Rgba) -> Color {
    let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color::Rgb {
        r: channel(c[0]),
        g: channel(c[1]),
        b: channel(c[2]),
    }
}

/// Renders draw lists as coloured cells.
///
/// A renderer created with `init` owns the terminal: raw mode and the
/// alternate screen are restored when it is dropped.
pub struct TerminalRenderer<W: Write = BufWriter<Stdout>> {
    out: W,
    /// Fixed size, or None to query the terminal each frame
    size: Option<(u16, u16)>,
    owns_terminal: bool,
    keyboard_enhanced: bool,
}

impl TerminalRenderer<BufWriter<Stdout>> {
    /// Take over the terminal: raw mode, alternate screen, hidden cursor and
    /// key release reporting where supported
    pub fn init() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let mut out = BufWriter::new(io::stdout());
        if let Err(e) = execute!(out, terminal::EnterAlternateScreen, cursor::Hide) {
            let _ = terminal::disable_raw_mode();
            return Err(e);
        }

        let keyboard_enhanced = matches!(terminal::supports_keyboard_enhancement(), Ok(true))
            && execute!(
                out,
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )
            .is_ok();
        log::info!(
            "Terminal ready (key release events: {})",
            if keyboard_enhanced { "yes" } else { "no" }
        );

        Ok(Self {
            out,
            size: None,
            owns_terminal: true,
            keyboard_enhanced,
        })
    }
}

impl<W: Write> TerminalRenderer<W> {
    /// Render into any writer at a fixed size, leaving the terminal alone
    pub fn with_writer(out: W, cols: u16, rows: u16) -> Self {
        Self {
            out,
            size: Some((cols, rows)),
            owns_terminal: false,
            keyboard_enhanced: false,
        }
    }

    pub fn writer(&self) -> &W {
        &self.out
    }

    /// Whether the terminal reports key releases; the keyboard uses this to
    /// pick its hold rule
    pub fn reports_key_release(&self) -> bool {
        self.keyboard_enhanced
    }

    fn size(&self) -> io::Result<(u16, u16)> {
        match self.size {
            Some(size) => Ok(size),
            None => terminal::size(),
        }
    }

    fn draw(&mut self, grid: &CellGrid) -> io::Result<()> {
        let mut fg = None;
        let mut bg = None;
        for row in 0..grid.rows() {
            queue!(self.out, cursor::MoveTo(0, row))?;
            for col in 0..grid.cols() {
                let Some(glyph) = grid.get(col, row) else {
                    continue;
                };
                let (gfg, gbg) = (to_color(glyph.fg), to_color(glyph.bg));
                if fg != Some(gfg) {
                    queue!(self.out, SetForegroundColor(gfg))?;
                    fg = Some(gfg);
                }
                if bg != Some(gbg) {
                    queue!(self.out, SetBackgroundColor(gbg))?;
                    bg = Some(gbg);
                }
                queue!(self.out, Print(glyph.ch))?;
            }
        }
        queue!(self.out, ResetColor)?;
        self.out.flush()
    }

    fn restore(&mut self) -> io::Result<()> {
        if self.keyboard_enhanced {
            execute!(self.out, PopKeyboardEnhancementFlags)?;
        }
        execute!(self.out, ResetColor, cursor::Show, terminal::LeaveAlternateScreen)?;
        terminal::disable_raw_mode()
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn present(&mut self, frame: &DrawList) -> Result<(), RenderError> {
        let (cols, rows) = self.size()?;
        let grid = CellGrid::rasterize(frame, cols, rows);
        self.draw(&grid)?;
        Ok(())
    }
}

impl<W: Write> Drop for TerminalRenderer<W> {
    fn drop(&mut self) {
        if self.owns_terminal {
            if let Err(e) = self.restore() {
                log::warn!("Failed to restore terminal: {}", e);
            }
            log::info!("Terminal restored");
        }
    }
}
