//! Software rasterizer that turns a [`Surface`] into a character frame.
//!
//! Every glyph goes through [`FrameBuffer::set`], so draw order never
//! affects which glyph a cell ends up with; only depth does.

mod buffer;
pub mod palette;

use ratatui::{buffer::Buffer, layout::Position};

pub use buffer::{Cell, FrameBuffer};
use palette::{ColorStop, Rgb};

use crate::config::Projection;
use crate::wave::{Point3D, Surface, SurfaceKind};

/// Character-grid display the finished frame is copied onto.
pub trait Canvas {
    /// (columns, rows)
    fn size(&self) -> (u16, u16);
    fn put(&mut self, col: u16, row: u16, glyph: char, color: Rgb);
}

impl Canvas for Buffer {
    fn size(&self) -> (u16, u16) {
        (self.area.width, self.area.height)
    }

    fn put(&mut self, col: u16, row: u16, glyph: char, color: Rgb) {
        let pos = Position {
            x: self.area.x.saturating_add(col),
            y: self.area.y.saturating_add(row),
        };
        if let Some(cell) = self.cell_mut(pos) {
            cell.set_char(glyph).set_fg(color.into());
        }
    }
}

/// A point after projection onto the screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projected {
    pub x: i32,
    pub y: i32,
    /// Larger is nearer.
    pub depth: f64,
}

#[derive(Debug, Clone)]
pub struct Rasterizer {
    buffer: FrameBuffer,
    projection: Projection,
    gradient: &'static [ColorStop],
    center_x: f64,
    center_y: f64,
}

impl Rasterizer {
    pub fn new(width: u16, height: u16) -> Self {
        let mut rasterizer = Self {
            buffer: FrameBuffer::new(0, 0),
            projection: Projection::default(),
            gradient: palette::OCEAN_GRADIENT,
            center_x: 0.0,
            center_y: 0.0,
        };
        rasterizer.resize(width, height);
        rasterizer
    }

    pub fn with_projection(mut self, projection: Projection) -> Self {
        self.projection = projection;
        self
    }

    /// Swap the color ramp. An empty table is ignored.
    pub fn with_gradient(mut self, gradient: &'static [ColorStop]) -> Self {
        if !gradient.is_empty() {
            self.gradient = gradient;
        }
        self
    }

    /// Reallocate the frame buffer for a new terminal size. Old content is discarded.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.buffer = FrameBuffer::new(width as usize, height as usize);
        self.center_x = f64::from(width) / 2.0;
        self.center_y = f64::from(height) / 2.0;
        tracing::debug!(width, height, "frame buffer reallocated");
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    pub fn buffer(&self) -> &FrameBuffer {
        &self.buffer
    }

    pub fn project(&self, p: Point3D) -> Projected {
        let Projection {
            scale_x,
            scale_y,
            perspective_y,
            depth_z_factor,
        } = self.projection;
        let width = self.buffer.width() as f64;
        let height = self.buffer.height() as f64;

        let x = self.center_x + p.x * width * scale_x;
        let y = self.center_y - p.z * height * scale_y - p.y * height * scale_y * perspective_y;

        Projected {
            x: x.floor() as i32,
            y: y.floor() as i32,
            depth: p.y + p.z * depth_z_factor,
        }
    }

    pub fn render_surface(&mut self, surface: &Surface) {
        let (rows, cols) = surface.dims();
        match surface.kind() {
            SurfaceKind::Gerstner => {
                for row in 0..rows {
                    for col in 0..cols {
                        self.render_cell(surface, row, col);
                    }
                }
                self.render_particles(surface);
            }
            SurfaceKind::Ribbon => {
                for layer in 0..rows {
                    for i in 0..cols {
                        self.render_ribbon_point(surface, layer, i);
                    }
                }
            }
        }
    }

    /// Edges right and down from corner (row, col), then a fill glyph at the
    /// centroid of the quad it opens.
    fn render_cell(&mut self, surface: &Surface, row: usize, col: usize) {
        let (rows, cols) = surface.dims();
        let corner = surface.point(row, col);
        let a = self.project(corner);
        let nz = surface.normalized_z(corner.z);
        let lf = surface.layer_factor(row);

        if col + 1 < cols {
            let right = surface.point(row, col + 1);
            self.render_edge(a, right, nz, lf, surface);
        }
        if row + 1 < rows {
            let down = surface.point(row + 1, col);
            let down_lf = (lf + surface.layer_factor(row + 1)) / 2.0;
            self.render_edge(a, down, nz, down_lf, surface);
        }
        if row + 1 < rows && col + 1 < cols {
            let quad = [
                corner,
                surface.point(row, col + 1),
                surface.point(row + 1, col),
                surface.point(row + 1, col + 1),
            ];
            let centroid = Point3D {
                x: quad.iter().map(|p| p.x).sum::<f64>() / 4.0,
                y: quad.iter().map(|p| p.y).sum::<f64>() / 4.0,
                z: quad.iter().map(|p| p.z).sum::<f64>() / 4.0,
            };
            let quad_nz = quad
                .iter()
                .map(|p| surface.normalized_z(p.z))
                .sum::<f64>()
                / 4.0;
            let quad_lf = (lf + surface.layer_factor(row + 1)) / 2.0;

            let c = self.project(centroid);
            self.buffer.set(
                c.x,
                c.y,
                palette::fill_glyph(quad_nz, quad_lf),
                c.depth,
                palette::color_for(quad_nz, quad_lf, self.gradient),
            );
        }
    }

    fn render_edge(&mut self, a: Projected, to: Point3D, nz: f64, lf: f64, surface: &Surface) {
        let b = self.project(to);
        let avg_nz = (nz + surface.normalized_z(to.z)) / 2.0;
        self.draw_line(
            a,
            b,
            (a.depth + b.depth) / 2.0,
            palette::shade_glyph(avg_nz, lf),
            palette::color_for(avg_nz, lf, self.gradient),
        );
    }

    fn render_particles(&mut self, surface: &Surface) {
        for particle in surface.particles() {
            let p = self.project(particle.pos);
            self.buffer.set(
                p.x,
                p.y,
                palette::PARTICLE_GLYPH,
                p.depth,
                palette::PARTICLE_COLOR,
            );
        }
    }

    fn render_ribbon_point(&mut self, surface: &Surface, layer: usize, i: usize) {
        let (layers, points) = surface.dims();
        let p1 = surface.point(layer, i);
        let a = self.project(p1);
        let nz = surface.normalized_z(p1.z);
        let lf = surface.layer_factor(layer);
        let color = palette::color_for(nz, lf, self.gradient);

        if i + 1 < points {
            let p2 = surface.point(layer, i + 1);
            let b = self.project(p2);
            let avg_nz = (nz + surface.normalized_z(p2.z)) / 2.0;
            self.draw_line(
                a,
                b,
                (a.depth + b.depth) / 2.0,
                palette::shade_glyph(avg_nz, lf),
                color,
            );
        }

        if layer + 1 < layers {
            let c = self.project(surface.point(layer + 1, i));
            self.draw_fill(
                a,
                c,
                (a.depth + c.depth) / 2.0,
                palette::fill_glyph(nz, lf),
                color,
            );
        }

        self.buffer
            .set(a.x, a.y, palette::shade_glyph(nz, lf), a.depth, color);
    }

    /// Bresenham segment at one flat depth. Steep segments use
    /// [`palette::VERTICAL_GLYPH`] instead of `glyph`.
    ///
    /// The segment is clipped to the buffer before stepping, so the cost is
    /// bounded by the buffer size however far off screen the ends project.
    pub fn draw_line(&mut self, from: Projected, to: Projected, depth: f64, glyph: char, color: Rgb) {
        let steep = (i64::from(to.y) - i64::from(from.y)).abs()
            > (i64::from(to.x) - i64::from(from.x)).abs();
        let glyph = if steep { palette::VERTICAL_GLYPH } else { glyph };

        let Some(((mut x, mut y), (x2, y2))) = clip_segment(
            (from.x, from.y),
            (to.x, to.y),
            self.buffer.width(),
            self.buffer.height(),
        ) else {
            return;
        };

        let dx = (x2 - x).abs();
        let dy = (y2 - y).abs();
        let sx = if x > x2 { -1 } else { 1 };
        let sy = if y > y2 { -1 } else { 1 };

        let mut err = dx - dy;
        for _ in 0..=dx + dy {
            self.buffer.set(x, y, glyph, depth, color);
            if x == x2 && y == y2 {
                break;
            }
            let e2 = 2 * err;
            if e2 > -dy {
                err -= dy;
                x += sx;
            }
            if e2 < dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Column of `glyph` from `from.y` to `to.y` inclusive at `from.x`.
    /// Nothing is drawn when both ends share a row. Rows outside the buffer
    /// are skipped without being visited.
    pub fn draw_fill(&mut self, from: Projected, to: Projected, depth: f64, glyph: char, color: Rgb) {
        if from.y == to.y {
            return;
        }
        let (width, height) = (self.buffer.width(), self.buffer.height());
        if height == 0 || usize::try_from(from.x).map_or(true, |x| x >= width) {
            return;
        }
        let last_row = i32::try_from(height - 1).unwrap_or(i32::MAX);
        let top = from.y.min(to.y).max(0);
        let bottom = from.y.max(to.y).min(last_row);
        for y in top..=bottom {
            self.buffer.set(from.x, y, glyph, depth, color);
        }
    }

    /// Copy occupied cells onto `canvas`, clipped to whichever is smaller.
    pub fn flush<C: Canvas + ?Sized>(&self, canvas: &mut C) {
        let (cols, rows) = canvas.size();
        for (x, y, cell) in self.buffer.occupied() {
            if let (Ok(col), Ok(row)) = (u16::try_from(x), u16::try_from(y)) {
                if col < cols && row < rows {
                    canvas.put(col, row, cell.glyph, cell.color);
                }
            }
        }
    }
}

/// Liang-Barsky clip of the segment `a`..`b` against the cell rectangle
/// `[0, width) x [0, height)`. `None` when nothing of it is visible.
fn clip_segment(
    a: (i32, i32),
    b: (i32, i32),
    width: usize,
    height: usize,
) -> Option<((i32, i32), (i32, i32))> {
    if width == 0 || height == 0 {
        return None;
    }
    let (max_x, max_y) = ((width - 1) as f64, (height - 1) as f64);
    let (ax, ay) = (f64::from(a.0), f64::from(a.1));
    let (dx, dy) = (f64::from(b.0) - ax, f64::from(b.1) - ay);

    let (mut t0, mut t1) = (0.0_f64, 1.0_f64);
    for (p, q) in [(-dx, ax), (dx, max_x - ax), (-dy, ay), (dy, max_y - ay)] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
        } else {
            let r = q / p;
            if p < 0.0 {
                if r > t1 {
                    return None;
                }
                t0 = t0.max(r);
            } else {
                if r < t0 {
                    return None;
                }
                t1 = t1.min(r);
            }
        }
    }

    let point = |t: f64| {
        let x = (ax + t * dx).round().clamp(0.0, max_x) as i32;
        let y = (ay + t * dy).round().clamp(0.0, max_y) as i32;
        (x, y)
    };
    Some((point(t0), point(t1)))
}
