//! Terminal pixel renderer
//!
//! Draws weighted pixels, parametric ellipses, soft (antialiased) rings and
//! filled rectangles onto a [`Surface`]. Writes outside the canvas are
//! dropped silently; a surface failure is returned as an I/O error and is
//! fatal for the demo.

pub mod surface;

pub use surface::{AnsiSurface, PixelWrite, Recorder, Shade, Surface, SurfaceOp, PALETTE_SIZE};

use crate::config::Canvas;
use std::io;

/// Angular step of the parametric ellipse (radians)
pub const ANGLE_STEP: f32 = 0.05;

/// Samples per ellipse: every `k * ANGLE_STEP` below 2π
pub const CIRCLE_SAMPLES: usize = 126;

/// Radius offsets of a soft ring, innermost first
pub const RING_OFFSETS: [i32; 5] = [-2, -1, 0, 1, 2];

/// The five `(radius_x, radius_y, shade)` ellipses making up a soft ring.
///
/// The true radius is drawn lightest; shading grows with distance from it.
pub fn smooth_rings(radius_x: i32, radius_y: i32) -> [(i32, i32, Shade); 5] {
    RING_OFFSETS.map(|offset| {
        (
            radius_x + offset,
            radius_y + offset,
            Shade::from_weight(offset.unsigned_abs()),
        )
    })
}

/// Rasterizer bound to one surface and canvas.
pub struct Renderer<S: Surface> {
    surface: S,
    canvas: Canvas,
}

impl<S: Surface> Renderer<S> {
    /// Renderer drawing onto `surface` within `canvas`
    pub fn new(surface: S, canvas: Canvas) -> Self {
        Renderer { surface, canvas }
    }

    /// Canvas bounds
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// The underlying surface
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Mutable access to the underlying surface
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Consume the renderer and return the surface
    pub fn into_surface(self) -> S {
        self.surface
    }

    /// Blank the canvas
    pub fn clear(&mut self) -> io::Result<()> {
        self.surface.clear()
    }

    /// Push the frame out
    pub fn flush(&mut self) -> io::Result<()> {
        self.surface.flush()
    }

    /// Draw one pixel; no-op outside `[0, width] x [0, height]`.
    pub fn pixel(&mut self, x: i32, y: i32, color: u8, shade: Shade) -> io::Result<()> {
        if !self.canvas.contains(x, y) {
            return Ok(());
        }
        self.surface.put(PixelWrite { x, y, color, shade })
    }

    /// Rasterize an ellipse by sampling its parametric angle.
    ///
    /// Cells are revisited when the radius is small; pixel writes are
    /// idempotent and the cost is fixed at [`CIRCLE_SAMPLES`] writes.
    pub fn circle(
        &mut self,
        cx: i32,
        cy: i32,
        radius_x: i32,
        radius_y: i32,
        color: u8,
        shade: Shade,
    ) -> io::Result<()> {
        for step in 0..CIRCLE_SAMPLES {
            let angle = step as f32 * ANGLE_STEP;
            let x = (angle.cos() * radius_x as f32).round() as i32 + cx;
            let y = (angle.sin() * radius_y as f32).round() as i32 + cy;
            self.pixel(x, y, color, shade)?;
        }
        Ok(())
    }

    /// Five concentric ellipses approximating an antialiased ring
    pub fn smooth_circle(
        &mut self,
        cx: i32,
        cy: i32,
        radius_x: i32,
        radius_y: i32,
        color: u8,
    ) -> io::Result<()> {
        for (rx, ry, shade) in smooth_rings(radius_x, radius_y) {
            self.circle(cx, cy, rx, ry, color, shade)?;
        }
        Ok(())
    }

    /// Filled `width x height` block at `(x, y)`, darkest shade
    pub fn rectangle(
        &mut self,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        color: u8,
    ) -> io::Result<()> {
        for dx in 0..width {
            for dy in 0..height {
                self.pixel(x + dx, y + dy, color, Shade::Dark)?;
            }
        }
        Ok(())
    }

    /// Print `text` starting at `(x, y)`.
    ///
    /// Dropped when the start lies outside the canvas; characters past the
    /// right edge are cut off.
    pub fn text(&mut self, x: i32, y: i32, color: u8, text: &str) -> io::Result<()> {
        if !self.canvas.contains(x, y) {
            return Ok(());
        }
        let room = (self.canvas.width - x + 1) as usize;
        let end = text
            .char_indices()
            .nth(room)
            .map_or(text.len(), |(index, _)| index);
        self.surface.text(x, y, color, &text[..end])
    }

    /// Print `text` horizontally centered on row `y`
    pub fn centered_text(&mut self, y: i32, color: u8, text: &str) -> io::Result<()> {
        let len = text.chars().count() as i32;
        let x = ((self.canvas.width - len) / 2).max(0);
        self.text(x, y, color, text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn renderer() -> Renderer<Recorder> {
        Renderer::new(Recorder::new(), Canvas::default())
    }

    #[test]
    fn test_circle_sample_count_covers_full_turn() {
        assert!((CIRCLE_SAMPLES - 1) as f32 * ANGLE_STEP < 2.0 * std::f32::consts::PI);
        assert!(CIRCLE_SAMPLES as f32 * ANGLE_STEP >= 2.0 * std::f32::consts::PI);
    }

    #[test]
    fn test_pixel_clipping() {
        let mut r = renderer();
        let coords = [-1, 0, 10, 25, 26, 80, 81];
        for &x in &coords {
            for &y in &coords {
                r.pixel(x, y, 1, Shade::Light).unwrap();
            }
        }
        let written: HashSet<(i32, i32)> =
            r.surface().pixels().iter().map(|p| (p.x, p.y)).collect();
        for &x in &coords {
            for &y in &coords {
                let inside = x >= 0 && y >= 0 && x <= 80 && y <= 25;
                assert_eq!(written.contains(&(x, y)), inside, "({x}, {y})");
            }
        }
    }

    #[test]
    fn test_circle_plots_every_sample() {
        let mut r = renderer();
        r.circle(40, 12, 10, 5, 2, Shade::Medium).unwrap();
        let pixels = r.surface().pixels();
        assert_eq!(pixels.len(), CIRCLE_SAMPLES);
        assert_eq!(pixels[0], PixelWrite { x: 50, y: 12, color: 2, shade: Shade::Medium });
        assert!(pixels.iter().all(|p| (30..=50).contains(&p.x) && (7..=17).contains(&p.y)));
    }

    #[test]
    fn test_circle_clips_off_canvas_samples() {
        let mut r = renderer();
        r.circle(0, 0, 5, 5, 1, Shade::Dark).unwrap();
        let pixels = r.surface().pixels();
        assert!(!pixels.is_empty());
        assert!(pixels.len() < CIRCLE_SAMPLES);
        assert!(pixels.iter().all(|p| p.x >= 0 && p.y >= 0));
    }

    #[test]
    fn test_smooth_rings_offsets_and_weights() {
        let rings = smooth_rings(10, 7);
        let radii: Vec<(i32, i32)> = rings.iter().map(|&(rx, ry, _)| (rx, ry)).collect();
        assert_eq!(radii, vec![(8, 5), (9, 6), (10, 7), (11, 8), (12, 9)]);
        let weights: Vec<u8> = rings.iter().map(|&(_, _, s)| s.weight()).collect();
        assert_eq!(weights, vec![2, 1, 0, 1, 2]);
    }

    #[test]
    fn test_smooth_circle_draws_five_ellipses() {
        let mut r = renderer();
        r.smooth_circle(40, 12, 6, 4, 5).unwrap();
        let pixels = r.surface().pixels();
        assert_eq!(pixels.len(), 5 * CIRCLE_SAMPLES);

        // Each ellipse is emitted contiguously, in ring order
        for (ring, chunk) in pixels.chunks(CIRCLE_SAMPLES).enumerate() {
            let (rx, _, shade) = smooth_rings(6, 4)[ring];
            assert!(chunk.iter().all(|p| p.shade == shade && p.color == 5));
            assert_eq!(chunk[0].x, 40 + rx);
        }
    }

    #[test]
    fn test_rectangle_fills_block() {
        let mut r = renderer();
        r.rectangle(10, 10, 8, 4, 3).unwrap();
        let pixels = r.surface().pixels();
        assert_eq!(pixels.len(), 32);
        assert!(pixels.iter().all(|p| p.color == 3 && p.shade == Shade::Dark));
        let cells: HashSet<(i32, i32)> = pixels.iter().map(|p| (p.x, p.y)).collect();
        assert_eq!(cells.len(), 32);
        for x in 10..=17 {
            for y in 10..=13 {
                assert!(cells.contains(&(x, y)));
            }
        }
    }

    #[test]
    fn test_rectangle_clipped_at_edge() {
        let mut r = renderer();
        r.rectangle(78, 24, 8, 4, 1).unwrap();
        // x in 78..=80, y in 24..=25
        assert_eq!(r.surface().pixels().len(), 6);
    }

    #[test]
    fn test_text_cut_at_right_edge() {
        let mut r = renderer();
        r.text(75, 0, 1, "0123456789").unwrap();
        r.text(0, 1, 1, "fits").unwrap();
        r.text(80, 2, 1, "░▒▓").unwrap();
        assert_eq!(r.surface().texts(), vec!["012345", "fits", "░"]);
    }

    #[test]
    fn test_centered_text() {
        let mut r = renderer();
        r.centered_text(3, 7, "demo").unwrap();
        match &r.surface().ops()[0] {
            SurfaceOp::Text { x, y, .. } => {
                assert_eq!((*x, *y), (38, 3));
            }
            other => panic!("unexpected op {other:?}"),
        }
    }
}
