//! Piece geometry: named shapes with four precomputed rotation forms.

use std::sync::OnceLock;
use thiserror::Error;

/// Display token for a shape (a `#rrggbb` hex string); opaque to the engine.
pub type ColorToken = &'static str;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShapeError {
    #[error("shape {0} has an empty form")]
    Empty(&'static str),
    #[error("shape {name} form is not square: row {row} has {len} cells, expected {size}")]
    NotSquare {
        name: &'static str,
        row: usize,
        len: usize,
        size: usize,
    },
}

/// Square N×N grid of occupied/empty cells. `rows[y][x]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Form {
    rows: Vec<Vec<bool>>,
}

impl Form {
    fn from_fn(size: usize, f: impl Fn(usize, usize) -> bool) -> Self {
        let rows = (0..size)
            .map(|y| (0..size).map(|x| f(x, y)).collect())
            .collect();
        Self { rows }
    }

    #[cfg_attr(not(test), allow(dead_code))]
    #[inline]
    pub fn size(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> bool {
        self.rows.get(y).and_then(|row| row.get(x)).copied().unwrap_or(false)
    }

    /// Occupied cells as (dx, dy), row-major.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.rows.iter().enumerate().flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, on)| **on)
                .map(move |(x, _)| (x, y))
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shape {
    pub name: &'static str,
    pub color: ColorToken,
    forms: [Form; 4],
}

impl Shape {
    /// Build a shape from its base form (angle 0); the three further rotations are
    /// derived here and never recomputed.
    pub fn new(name: &'static str, color: ColorToken, base: &[&[u8]]) -> Result<Self, ShapeError> {
        let size = base.len();
        if size == 0 {
            return Err(ShapeError::Empty(name));
        }
        if let Some((row, line)) = base.iter().enumerate().find(|(_, l)| l.len() != size) {
            return Err(ShapeError::NotSquare {
                name,
                row,
                len: line.len(),
                size,
            });
        }
        let max = size - 1;
        let at = |x: usize, y: usize| base[y][x] != 0;
        let angle0 = Form::from_fn(size, |x, y| at(x, y));
        let angle1 = Form::from_fn(size, |x, y| at(y, max - x));
        let angle2 = Form::from_fn(size, |x, y| at(max - x, max - y));
        let angle3 = Form::from_fn(size, |x, y| at(max - y, x));
        Ok(Self {
            name,
            color,
            forms: [angle0, angle1, angle2, angle3],
        })
    }

    /// Form for any rotation index; negative and out-of-range indices wrap mod 4.
    #[inline]
    pub fn rotated(&self, angle: i32) -> &Form {
        &self.forms[angle.rem_euclid(4) as usize]
    }
}

const BASE_FORMS: [(&str, ColorToken, &[&[u8]]); 7] = [
    ("I", "#ff5c58", &[&[0, 1, 0, 0], &[0, 1, 0, 0], &[0, 1, 0, 0], &[0, 1, 0, 0]]),
    ("J", "#ff865e", &[&[0, 1, 0], &[0, 1, 0], &[1, 1, 0]]),
    ("L", "#fee440", &[&[0, 1, 0], &[0, 1, 0], &[0, 1, 1]]),
    ("T", "#6d8299", &[&[1, 1, 1], &[0, 1, 0], &[0, 0, 0]]),
    ("S", "#a2d2ff", &[&[0, 1, 1], &[1, 1, 0], &[0, 0, 0]]),
    ("Z", "#63b4b8", &[&[1, 1, 0], &[0, 1, 1], &[0, 0, 0]]),
    ("O", "#d5bfbf", &[&[1, 1], &[1, 1]]),
];

/// The standard seven shapes (I, J, L, T, S, Z, O).
pub fn catalog() -> &'static [Shape] {
    static CATALOG: OnceLock<Vec<Shape>> = OnceLock::new();
    CATALOG.get_or_init(|| {
        BASE_FORMS
            .iter()
            .map(|&(name, color, base)| {
                Shape::new(name, color, base).expect("built-in shape forms are square")
            })
            .collect()
    })
}

#[cfg_attr(not(test), allow(dead_code))]
pub fn by_name(name: &str) -> Option<&'static Shape> {
    catalog().iter().find(|s| s.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(form: &Form) -> Vec<String> {
        (0..form.size())
            .map(|y| {
                (0..form.size())
                    .map(|x| if form.get(x, y) { '#' } else { '.' })
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_catalog_has_seven_named_shapes() {
        let names: Vec<_> = catalog().iter().map(|s| s.name).collect();
        assert_eq!(names, ["I", "J", "L", "T", "S", "Z", "O"]);
        assert_eq!(by_name("T").map(|s| s.color), Some("#6d8299"));
        assert!(by_name("X").is_none());
    }

    #[test]
    fn test_rotation_wraps_every_four() {
        for shape in catalog() {
            for angle in -8..8 {
                assert_eq!(shape.rotated(angle), shape.rotated(angle + 4), "{}", shape.name);
            }
            assert_eq!(shape.rotated(4), shape.rotated(0));
            assert_eq!(shape.rotated(-1), shape.rotated(3));
        }
    }

    #[test]
    fn test_forms_share_dimensions_and_cell_count() {
        for shape in catalog() {
            let size = shape.rotated(0).size();
            let count = shape.rotated(0).cells().count();
            for angle in 1..4 {
                assert_eq!(shape.rotated(angle).size(), size);
                assert_eq!(shape.rotated(angle).cells().count(), count);
            }
        }
    }

    #[test]
    fn test_t_rotations() {
        let t = by_name("T").unwrap();
        assert_eq!(render(t.rotated(0)), ["###", ".#.", "..."]);
        // angle1[y][x] = base[max-x][y]
        assert_eq!(render(t.rotated(1)), ["..#", ".##", "..#"]);
        assert_eq!(render(t.rotated(2)), ["...", ".#.", "###"]);
        assert_eq!(render(t.rotated(3)), ["#..", "##.", "#.."]);
    }

    #[test]
    fn test_i_rotates_to_horizontal() {
        let i = by_name("I").unwrap();
        assert_eq!(render(i.rotated(1)), ["....", "####", "....", "...."]);
    }

    #[test]
    fn test_new_rejects_bad_forms() {
        assert_eq!(Shape::new("E", "#000", &[]), Err(ShapeError::Empty("E")));
        let err = Shape::new("R", "#000", &[&[1, 1], &[1]]).unwrap_err();
        assert_eq!(
            err,
            ShapeError::NotSquare {
                name: "R",
                row: 1,
                len: 1,
                size: 2
            }
        );
    }
}
