//! Falling block: a positioned, rotated shape. Every move yields a new value.

use crate::shape::{ColorToken, Shape};
use crate::stage::{Cell, Stage};

/// Current piece with position and rotation. `y` may be negative while the piece is
/// still above the visible top; `angle` is any integer and wraps mod 4.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    pub x: i32,
    pub y: i32,
    pub angle: i32,
    pub shape: &'static Shape,
}

impl Block {
    pub fn new(x: i32, y: i32, angle: i32, shape: &'static Shape) -> Self {
        Self { x, y, angle, shape }
    }

    #[must_use]
    pub fn left(self) -> Self {
        Self { x: self.x - 1, ..self }
    }

    #[must_use]
    pub fn right(self) -> Self {
        Self { x: self.x + 1, ..self }
    }

    #[must_use]
    pub fn fall(self) -> Self {
        Self { y: self.y + 1, ..self }
    }

    #[must_use]
    pub fn rotate(self) -> Self {
        Self {
            angle: self.angle + 1,
            ..self
        }
    }

    #[inline]
    pub fn color(&self) -> ColorToken {
        self.shape.color
    }

    /// Absolute stage coordinates of every occupied cell.
    fn cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.shape
            .rotated(self.angle)
            .cells()
            .map(move |(fx, fy)| (self.x + fx as i32, self.y + fy as i32))
    }

    /// True if the block fits: inside the side walls, above the floor and not
    /// overlapping a stone. Cells above the top row only get the wall check.
    pub fn ok(&self, stage: &Stage) -> bool {
        let (width, height) = (stage.width() as i32, stage.height() as i32);
        self.cells().all(|(x, y)| {
            if x < 0 || x >= width || y >= height {
                return false;
            }
            y < 0 || !stage.is_occupied(x as usize, y as usize)
        })
    }

    /// True if any occupied cell is above the visible top.
    pub fn overflow(&self) -> bool {
        self.cells().any(|(_, y)| y < 0)
    }

    /// Write this block's colour into the stage. Callers check `ok` and `overflow`
    /// first; cells that fall outside the grid are dropped.
    pub fn put(&self, stage: &mut Stage) {
        for (x, y) in self.cells() {
            if x >= 0 && y >= 0 {
                stage.set(x as usize, y as usize, Cell::Stone(self.color()));
            }
        }
    }

    /// Visible stones as (x, y, colour); cells left of or above the stage are skipped.
    pub fn stones(&self) -> impl Iterator<Item = (usize, usize, ColorToken)> + '_ {
        let color = self.color();
        self.cells()
            .filter(|&(x, y)| x >= 0 && y >= 0)
            .map(move |(x, y)| (x as usize, y as usize, color))
    }

    pub fn each_stone(&self, mut callback: impl FnMut(usize, usize, ColorToken)) {
        for (x, y, color) in self.stones() {
            callback(x, y, color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::by_name;

    fn block(name: &str, x: i32, y: i32) -> Block {
        Block::new(x, y, 0, by_name(name).unwrap())
    }

    #[test]
    fn test_moves_return_new_values() {
        let b = block("T", 3, 0);
        assert_eq!((b.left().x, b.right().x, b.fall().y), (2, 4, 1));
        assert_eq!(b.rotate().angle, 1);
        assert_eq!(b.left().right(), b);
        // Original untouched.
        assert_eq!((b.x, b.y, b.angle), (3, 0, 0));
    }

    #[test]
    fn test_o_falls_eighteen_rows_to_the_floor() {
        let stage = Stage::new(10, 20);
        let mut b = block("O", 4, 0);
        assert!(b.ok(&stage));
        for _ in 0..18 {
            b = b.fall();
            assert!(b.ok(&stage));
        }
        assert!(!b.fall().ok(&stage));
    }

    #[test]
    fn test_ok_rejects_walls_and_stones() {
        let mut stage = Stage::new(10, 20);
        // O occupies columns x..x+1.
        assert!(!block("O", -1, 5).ok(&stage));
        assert!(!block("O", 9, 5).ok(&stage));
        assert!(block("O", 8, 5).ok(&stage));
        stage.set(5, 7, Cell::Stone("#fff"));
        assert!(!block("O", 4, 6).ok(&stage));
        assert!(block("O", 4, 5).ok(&stage));
    }

    #[test]
    fn test_ok_above_top_still_checks_walls() {
        let mut stage = Stage::new(10, 20);
        stage.set(0, 0, Cell::Stone("#fff"));
        // Above the top: stones below are irrelevant, walls are not.
        assert!(block("O", 0, -2).ok(&stage));
        assert!(!block("O", -1, -2).ok(&stage));
        assert!(!block("O", 0, -1).ok(&stage));
    }

    #[test]
    fn test_fall_blocked_exactly_when_resting() {
        let mut stage = Stage::new(6, 8);
        stage.set(2, 5, Cell::Stone("#fff"));
        // T at angle 0 covers (x..x+2, y) and (x+1, y+1).
        let t = block("T", 1, 3);
        assert!(t.ok(&stage));
        assert!(!t.fall().ok(&stage));
        let t = block("T", 3, 3);
        assert!(t.fall().ok(&stage));
    }

    #[test]
    fn test_overflow() {
        assert!(!block("O", 4, 0).overflow());
        assert!(block("O", 4, -1).overflow());
        // I at angle 0 has its column at dx=1 over all four rows.
        assert!(block("I", 3, -1).overflow());
        // Rotated I only occupies row 1 of its form.
        assert!(!block("I", 3, -1).rotate().overflow());
    }

    #[test]
    fn test_put_writes_colour() {
        let mut stage = Stage::new(10, 20);
        let b = block("O", 4, 18);
        b.put(&mut stage);
        let stones: Vec<_> = stage.stones().collect();
        let c = b.color();
        assert_eq!(stones, vec![(4, 18, c), (5, 18, c), (4, 19, c), (5, 19, c)]);
    }

    #[test]
    fn test_stones_skip_hidden_cells_and_repeat() {
        let b = block("I", 0, -2);
        let first: Vec<_> = b.stones().collect();
        assert_eq!(first, vec![(1, 0, b.color()), (1, 1, b.color())]);
        let mut second = Vec::new();
        b.each_stone(|x, y, c| second.push((x, y, c)));
        assert_eq!(first, second);
    }

    #[test]
    fn test_fill_last_gap_clears_one_row() {
        let mut stage = Stage::new(10, 20);
        for x in 0..9 {
            stage.set(x, 19, Cell::Stone("#aaa"));
        }
        stage.set(0, 18, Cell::Stone("#aaa"));
        stage.set(3, 18, Cell::Stone("#aaa"));
        // Vertical I in column 9 drops into the only gap of the bottom row.
        let i = Block::new(8, 16, 0, by_name("I").unwrap());
        assert!(i.ok(&stage));
        assert!(!i.fall().ok(&stage));
        i.put(&mut stage);
        assert_eq!(stage.filled_lines(), vec![19]);
        assert_eq!(stage.shrink(), 1);
        // Everything above moved down one row.
        assert!(stage.is_occupied(0, 19));
        assert!(stage.is_occupied(3, 19));
        assert!(stage.is_occupied(9, 19));
        assert!(!stage.is_occupied(5, 19));
        assert!(stage.is_occupied(9, 17) && stage.is_occupied(9, 18));
        assert!(!stage.is_occupied(9, 16));
        assert_eq!(stage.stones().count(), 5);
    }
}
