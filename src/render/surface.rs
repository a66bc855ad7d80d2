//! Drawing surfaces
//!
//! A surface is write-only: the renderer never reads a pixel back. The
//! terminal implementation turns each write into ANSI escape sequences; the
//! [`Recorder`] keeps them in memory.

use std::io::{self, Write};

use crate::config::Canvas;

/// Number of entries in the ANSI foreground palette (`ESC[30m`..`ESC[37m`)
pub const PALETTE_SIZE: u8 = 8;

/// Shading density of a terminal pixel
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Shade {
    /// `░` (weight 0)
    Light,
    /// `▒` (weight 1)
    Medium,
    /// `▓` (weight 2)
    Dark,
}

impl Shade {
    /// Shade for a weight in `0..=2`; heavier weights saturate at [`Shade::Dark`]
    pub fn from_weight(weight: u32) -> Self {
        match weight {
            0 => Shade::Light,
            1 => Shade::Medium,
            _ => Shade::Dark,
        }
    }

    /// Numeric weight (0, 1 or 2)
    pub fn weight(self) -> u8 {
        self as u8
    }

    /// Block-shading glyph
    pub fn glyph(self) -> char {
        match self {
            Shade::Light => '\u{2591}',
            Shade::Medium => '\u{2592}',
            Shade::Dark => '\u{2593}',
        }
    }
}

/// One pixel write as it reaches the surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PixelWrite {
    /// Column (0-based)
    pub x: i32,
    /// Row (0-based)
    pub y: i32,
    /// Palette index
    pub color: u8,
    /// Shading
    pub shade: Shade,
}

/// Write-only drawing target.
pub trait Surface {
    /// Blank the whole canvas
    fn clear(&mut self) -> io::Result<()>;

    /// Draw one pixel; coordinates are already clipped
    fn put(&mut self, pixel: PixelWrite) -> io::Result<()>;

    /// Print a text run starting at `(x, y)`
    fn text(&mut self, x: i32, y: i32, color: u8, text: &str) -> io::Result<()>;

    /// Push buffered output to the device
    fn flush(&mut self) -> io::Result<()>;
}

impl<S: Surface + ?Sized> Surface for &mut S {
    fn clear(&mut self) -> io::Result<()> {
        (**self).clear()
    }

    fn put(&mut self, pixel: PixelWrite) -> io::Result<()> {
        (**self).put(pixel)
    }

    fn text(&mut self, x: i32, y: i32, color: u8, text: &str) -> io::Result<()> {
        (**self).text(x, y, color, text)
    }

    fn flush(&mut self) -> io::Result<()> {
        (**self).flush()
    }
}

/// Terminal surface speaking ANSI escape sequences.
pub struct AnsiSurface<W: Write> {
    out: W,
    canvas: Canvas,
}

impl<W: Write> AnsiSurface<W> {
    /// Surface for the default 80x25 canvas
    pub fn new(out: W) -> Self {
        Self::with_canvas(out, Canvas::default())
    }

    /// Surface for a specific canvas
    pub fn with_canvas(out: W, canvas: Canvas) -> Self {
        AnsiSurface { out, canvas }
    }

    /// Hide the cursor and blank the screen
    pub fn begin(&mut self) -> io::Result<()> {
        self.out.write_all(b"\x1B[?25l")?;
        self.clear()?;
        self.out.flush()
    }

    /// Reset colors, park the cursor below the canvas and show it again
    pub fn finish(&mut self) -> io::Result<()> {
        self.out.write_all(b"\x1B[0m")?;
        self.goto(0, self.canvas.height + 1)?;
        self.out.write_all(b"\x1B[?25h\n")?;
        self.out.flush()
    }

    /// Consume the surface and return the writer
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Terminal rows and columns start at 1
    fn goto(&mut self, x: i32, y: i32) -> io::Result<()> {
        write!(self.out, "\x1B[{};{}H", y + 1, x + 1)
    }

    fn set_color(&mut self, color: u8) -> io::Result<()> {
        write!(self.out, "\x1B[{}m", 30 + (color % PALETTE_SIZE) as u32)
    }
}

impl<W: Write> Surface for AnsiSurface<W> {
    /// `ESC[1J` erases up to the cursor, so the cursor goes past the last cell first.
    fn clear(&mut self) -> io::Result<()> {
        self.goto(self.canvas.width, self.canvas.height)?;
        self.out.write_all(b"\x1B[1J")
    }

    fn put(&mut self, pixel: PixelWrite) -> io::Result<()> {
        self.goto(pixel.x, pixel.y)?;
        self.set_color(pixel.color)?;
        let mut utf8 = [0u8; 4];
        self.out
            .write_all(pixel.shade.glyph().encode_utf8(&mut utf8).as_bytes())
    }

    fn text(&mut self, x: i32, y: i32, color: u8, text: &str) -> io::Result<()> {
        self.goto(x, y)?;
        self.set_color(color)?;
        self.out.write_all(text.as_bytes())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

/// A call recorded by [`Recorder`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceOp {
    /// `clear()`
    Clear,
    /// `put()`
    Pixel(PixelWrite),
    /// `text()`
    Text {
        /// Column
        x: i32,
        /// Row
        y: i32,
        /// Palette index
        color: u8,
        /// Printed text
        text: String,
    },
}

/// In-memory surface that records every call.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    ops: Vec<SurfaceOp>,
    flushes: usize,
}

impl Recorder {
    /// Empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Every recorded call in order
    pub fn ops(&self) -> &[SurfaceOp] {
        &self.ops
    }

    /// Recorded pixel writes in order
    pub fn pixels(&self) -> Vec<PixelWrite> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                SurfaceOp::Pixel(p) => Some(*p),
                _ => None,
            })
            .collect()
    }

    /// Recorded text runs in order
    pub fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                SurfaceOp::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Number of `clear()` calls
    pub fn clears(&self) -> usize {
        self.ops.iter().filter(|op| **op == SurfaceOp::Clear).count()
    }

    /// Number of `flush()` calls
    pub fn flushes(&self) -> usize {
        self.flushes
    }

    /// Forget everything recorded so far
    pub fn reset(&mut self) {
        self.ops.clear();
        self.flushes = 0;
    }
}

impl Surface for Recorder {
    fn clear(&mut self) -> io::Result<()> {
        self.ops.push(SurfaceOp::Clear);
        Ok(())
    }

    fn put(&mut self, pixel: PixelWrite) -> io::Result<()> {
        self.ops.push(SurfaceOp::Pixel(pixel));
        Ok(())
    }

    fn text(&mut self, x: i32, y: i32, color: u8, text: &str) -> io::Result<()> {
        self.ops.push(SurfaceOp::Text {
            x,
            y,
            color,
            text: text.to_string(),
        });
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.flushes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ansi() -> AnsiSurface<Vec<u8>> {
        AnsiSurface::new(Vec::new())
    }

    #[test]
    fn test_shade_glyphs() {
        assert_eq!(Shade::from_weight(0).glyph(), '░');
        assert_eq!(Shade::from_weight(1).glyph(), '▒');
        assert_eq!(Shade::from_weight(2).glyph(), '▓');
        assert_eq!(Shade::Dark.weight(), 2);
    }

    #[test]
    fn test_pixel_escape_sequence() {
        let mut surface = ansi();
        surface
            .put(PixelWrite {
                x: 0,
                y: 4,
                color: 3,
                shade: Shade::Medium,
            })
            .unwrap();
        let out = String::from_utf8(surface.into_inner()).unwrap();
        assert_eq!(out, "\x1B[5;1H\x1B[33m▒");
    }

    #[test]
    fn test_color_wraps_palette() {
        let mut surface = ansi();
        surface.text(2, 2, 9, "hi").unwrap();
        let out = String::from_utf8(surface.into_inner()).unwrap();
        assert_eq!(out, "\x1B[3;3H\x1B[31mhi");
    }

    #[test]
    fn test_clear_parks_cursor_first() {
        let mut surface = ansi();
        surface.clear().unwrap();
        let out = String::from_utf8(surface.into_inner()).unwrap();
        assert_eq!(out, "\x1B[26;81H\x1B[1J");
    }

    #[test]
    fn test_begin_and_finish_toggle_cursor() {
        let mut surface = ansi();
        surface.begin().unwrap();
        surface.finish().unwrap();
        let out = String::from_utf8(surface.into_inner()).unwrap();
        assert!(out.starts_with("\x1B[?25l"));
        assert!(out.ends_with("\x1B[?25h\n"));
        assert!(out.contains("\x1B[0m"));
    }

    #[test]
    fn test_recorder_tracks_calls() {
        let mut rec = Recorder::new();
        rec.clear().unwrap();
        rec.text(1, 1, 7, "x").unwrap();
        rec.flush().unwrap();
        assert_eq!(rec.clears(), 1);
        assert_eq!(rec.texts(), vec!["x"]);
        assert_eq!(rec.flushes(), 1);
        rec.reset();
        assert!(rec.ops().is_empty());
    }
}
