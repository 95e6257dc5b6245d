//! Depth-tested character buffer.
//!
//! Cells live in one flat `Vec` indexed by `row * width + col`. A resize
//! throws the old allocation away and starts over.

use super::palette::Rgb;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    pub glyph: char,
    pub color: Rgb,
    pub depth: f64,
    pub set: bool,
}

impl Cell {
    pub const EMPTY: Cell = Cell {
        glyph: ' ',
        color: Rgb(0, 0, 0),
        depth: f64::NEG_INFINITY,
        set: false,
    };
}

impl Default for Cell {
    fn default() -> Self {
        Self::EMPTY
    }
}

#[derive(Debug, Clone)]
pub struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::EMPTY; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Reset every cell to unoccupied at infinite distance.
    pub fn clear(&mut self) {
        self.cells.fill(Cell::EMPTY);
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        let (x, y) = (usize::try_from(x).ok()?, usize::try_from(y).ok()?);
        (x < self.width && y < self.height).then(|| y * self.width + x)
    }

    /// Write `glyph` at (x, y) if `depth` is nearer than what is there.
    ///
    /// Off-buffer coordinates are dropped. Returns whether the write landed.
    pub fn set(&mut self, x: i32, y: i32, glyph: char, depth: f64, color: Rgb) -> bool {
        let Some(idx) = self.index(x, y) else {
            return false;
        };
        let cell = &mut self.cells[idx];
        if depth > cell.depth {
            *cell = Cell {
                glyph,
                color,
                depth,
                set: true,
            };
            true
        } else {
            false
        }
    }

    pub fn get(&self, x: i32, y: i32) -> Option<&Cell> {
        self.index(x, y).map(|idx| &self.cells[idx])
    }

    /// Occupied cells as `(col, row, cell)`, row-major.
    pub fn occupied(&self) -> impl Iterator<Item = (usize, usize, &Cell)> + '_ {
        let width = self.width.max(1);
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.set)
            .map(move |(idx, cell)| (idx % width, idx / width, cell))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: Rgb = Rgb(1, 1, 1);
    const B: Rgb = Rgb(2, 2, 2);

    #[test]
    fn nearer_write_wins() {
        let mut buf = FrameBuffer::new(10, 10);
        assert!(buf.set(3, 4, '#', 1.0, A));
        assert!(!buf.set(3, 4, '.', 0.5, B));
        assert_eq!(buf.get(3, 4).map(|c| (c.glyph, c.depth)), Some(('#', 1.0)));

        let mut buf = FrameBuffer::new(10, 10);
        buf.set(3, 4, '.', 0.5, B);
        buf.set(3, 4, '#', 1.0, A);
        assert_eq!(buf.get(3, 4).map(|c| (c.glyph, c.color)), Some(('#', A)));
    }

    #[test]
    fn equal_depth_keeps_first() {
        let mut buf = FrameBuffer::new(2, 2);
        buf.set(0, 0, 'a', 0.0, A);
        assert!(!buf.set(0, 0, 'b', 0.0, B));
        assert_eq!(buf.get(0, 0).unwrap().glyph, 'a');
    }

    #[test]
    fn out_of_bounds_is_dropped() {
        let mut buf = FrameBuffer::new(4, 3);
        for (x, y) in [(-1, 0), (0, -1), (4, 0), (0, 3), (i32::MAX, i32::MIN)] {
            assert!(!buf.set(x, y, '@', 9.0, A));
            assert!(buf.get(x, y).is_none());
        }
        assert_eq!(buf.occupied().count(), 0);
    }

    #[test]
    fn clear_resets_occupancy() {
        let mut buf = FrameBuffer::new(5, 5);
        buf.set(1, 1, 'x', 0.3, A);
        buf.set(4, 2, 'y', -2.0, A);
        let hits: Vec<_> = buf.occupied().map(|(x, y, _)| (x, y)).collect();
        assert_eq!(hits, vec![(1, 1), (4, 2)]);

        buf.clear();
        assert_eq!(buf.occupied().count(), 0);
        assert_eq!(buf.get(1, 1), Some(&Cell::EMPTY));
    }

    #[test]
    fn empty_buffer_is_inert() {
        let mut buf = FrameBuffer::new(0, 0);
        assert!(!buf.set(0, 0, 'x', 1.0, A));
        assert_eq!(buf.occupied().count(), 0);
    }
}
