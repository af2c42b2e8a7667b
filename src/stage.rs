//! Stage: the grid of settled stones and full-row clearing.

use crate::shape::ColorToken;
use std::collections::VecDeque;

/// Single cell: either empty or a settled stone carrying its piece colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Stone(ColorToken),
}

impl Cell {
    #[inline]
    pub fn is_stone(self) -> bool {
        matches!(self, Self::Stone(_))
    }
}

/// Playing field. y=0 is the top row; dimensions are fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stage {
    width: usize,
    height: usize,
    /// rows[y][x] = cell. rows[0] is top.
    rows: VecDeque<Vec<Cell>>,
}

impl Stage {
    pub fn new(width: usize, height: usize) -> Self {
        let rows = (0..height).map(|_| vec![Cell::Empty; width]).collect();
        Self {
            width,
            height,
            rows,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<Cell> {
        self.rows.get(y).and_then(|row| row.get(x)).copied()
    }

    #[inline]
    pub fn is_occupied(&self, x: usize, y: usize) -> bool {
        self.get(x, y).is_some_and(Cell::is_stone)
    }

    /// Out-of-range writes are ignored.
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if let Some(slot) = self.rows.get_mut(y).and_then(|row| row.get_mut(x)) {
            *slot = cell;
        }
    }

    fn row_full(row: &[Cell]) -> bool {
        row.iter().all(|c| c.is_stone())
    }

    /// Indices of fully occupied rows, top to bottom.
    pub fn filled_lines(&self) -> Vec<usize> {
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, row)| Self::row_full(row))
            .map(|(y, _)| y)
            .collect()
    }

    /// Remove every full row and drop the rows above into the gap; the grid is topped
    /// up with empty rows so the height never changes. Returns the number of rows removed.
    pub fn shrink(&mut self) -> usize {
        let mut removed = 0;
        // Scanning bottom-up keeps indices below the cursor stable across removals.
        for y in (0..self.rows.len()).rev() {
            if Self::row_full(&self.rows[y]) {
                self.rows.remove(y);
                removed += 1;
            }
        }
        for _ in 0..removed {
            self.rows.push_front(vec![Cell::Empty; self.width]);
        }
        removed
    }

    /// Empty every cell in place.
    pub fn reset(&mut self) {
        for row in &mut self.rows {
            row.fill(Cell::Empty);
        }
    }

    /// Settled stones as (x, y, colour), row-major.
    pub fn stones(&self) -> impl Iterator<Item = (usize, usize, ColorToken)> + '_ {
        self.rows.iter().enumerate().flat_map(|(y, row)| {
            row.iter().enumerate().filter_map(move |(x, cell)| match *cell {
                Cell::Stone(color) => Some((x, y, color)),
                Cell::Empty => None,
            })
        })
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

    const RED: ColorToken = "#ff0000";
    const BLUE: ColorToken = "#0000ff";

    fn fill_row(stage: &mut Stage, y: usize, color: ColorToken) {
        for x in 0..stage.width() {
            stage.set(x, y, Cell::Stone(color));
        }
    }

    fn occupied_rows(stage: &Stage) -> usize {
        (0..stage.height())
            .filter(|&y| (0..stage.width()).any(|x| stage.is_occupied(x, y)))
            .count()
    }

    #[test]
    fn test_new_stage_is_empty() {
        let stage = Stage::new(10, 20);
        assert_eq!((stage.width(), stage.height()), (10, 20));
        assert_eq!(stage.stones().count(), 0);
        assert!(stage.filled_lines().is_empty());
        assert_eq!(stage.get(10, 0), None);
        assert_eq!(stage.get(9, 19), Some(Cell::Empty));
    }

    #[test]
    fn test_filled_lines() {
        let mut stage = Stage::new(4, 6);
        fill_row(&mut stage, 2, RED);
        fill_row(&mut stage, 5, RED);
        stage.set(0, 4, Cell::Stone(RED));
        assert_eq!(stage.filled_lines(), vec![2, 5]);
    }

    #[test]
    fn test_shrink_without_full_rows() {
        let mut stage = Stage::new(4, 6);
        stage.set(1, 5, Cell::Stone(RED));
        let before = stage.clone();
        assert_eq!(stage.shrink(), 0);
        assert_eq!(stage, before);
    }

    #[test]
    fn test_shrink_two_non_adjacent_rows() {
        let mut stage = Stage::new(10, 20);
        // Every row partially filled except the two full ones.
        for y in 0..20 {
            stage.set(y % 10, y, Cell::Stone(BLUE));
        }
        fill_row(&mut stage, 3, RED);
        fill_row(&mut stage, 7, RED);
        let rows_before = occupied_rows(&stage);

        assert_eq!(stage.shrink(), 2);
        assert_eq!((stage.width(), stage.height()), (10, 20));
        assert_eq!(occupied_rows(&stage), rows_before - 2);
        assert!(stage.filled_lines().is_empty());
        // Two empty rows prepended.
        assert!((0..10).all(|x| !stage.is_occupied(x, 0) && !stage.is_occupied(x, 1)));
        // Rows 0..3 moved down by two, rows 4..7 by one, rows below 7 untouched.
        assert!(stage.is_occupied(0, 2));
        assert!(stage.is_occupied(2, 4));
        assert!(stage.is_occupied(4, 5));
        assert!(stage.is_occupied(6, 7));
        for y in 8..20 {
            assert!(stage.is_occupied(y % 10, y));
        }
    }

    #[test]
    fn test_shrink_adjacent_rows_keeps_order() {
        let mut stage = Stage::new(3, 5);
        stage.set(0, 0, Cell::Stone(BLUE));
        stage.set(1, 1, Cell::Stone(RED));
        fill_row(&mut stage, 2, RED);
        fill_row(&mut stage, 3, RED);
        fill_row(&mut stage, 4, RED);
        assert_eq!(stage.shrink(), 3);
        assert_eq!(stage.get(0, 3), Some(Cell::Stone(BLUE)));
        assert_eq!(stage.get(1, 4), Some(Cell::Stone(RED)));
        assert_eq!(stage.stones().count(), 2);
    }

    #[test]
    fn test_reset_keeps_dimensions() {
        let mut stage = Stage::new(5, 7);
        fill_row(&mut stage, 6, RED);
        stage.reset();
        assert_eq!((stage.width(), stage.height()), (5, 7));
        assert_eq!(stage.stones().count(), 0);
    }

    #[test]
    fn test_stones_row_major_and_repeatable() {
        let mut stage = Stage::new(3, 3);
        stage.set(2, 0, Cell::Stone(RED));
        stage.set(0, 2, Cell::Stone(BLUE));
        stage.set(1, 0, Cell::Stone(BLUE));
        let first: Vec<_> = stage.stones().collect();
        assert_eq!(first, vec![(1, 0, BLUE), (2, 0, RED), (0, 2, BLUE)]);
        let mut second = Vec::new();
        stage.each_stone(|x, y, c| second.push((x, y, c)));
        assert_eq!(first, second);
    }
}
