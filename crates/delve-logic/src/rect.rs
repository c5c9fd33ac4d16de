//! Integer rectangles and points on the tile grid.

use serde::{Deserialize, Serialize};

/// A tile coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle: origin `(x, y)`, extents `(w, h)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// One past the last column.
    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    /// One past the last row.
    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    pub fn area(&self) -> i32 {
        self.w * self.h
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.right() && p.y >= self.y && p.y < self.bottom()
    }

    /// True if `inner` fits inside `self` leaving at least `margin` tiles on every side.
    pub fn contains_with_margin(&self, inner: &Rect, margin: i32) -> bool {
        inner.x >= self.x + margin
            && inner.y >= self.y + margin
            && inner.right() <= self.right() - margin
            && inner.bottom() <= self.bottom() - margin
    }

    /// Cut into top/bottom halves; the top half is `at` rows tall.
    pub fn split_horizontal(&self, at: i32) -> (Rect, Rect) {
        (
            Rect::new(self.x, self.y, self.w, at),
            Rect::new(self.x, self.y + at, self.w, self.h - at),
        )
    }

    /// Cut into left/right halves; the left half is `at` columns wide.
    pub fn split_vertical(&self, at: i32) -> (Rect, Rect) {
        (
            Rect::new(self.x, self.y, at, self.h),
            Rect::new(self.x + at, self.y, self.w - at, self.h),
        )
    }

    /// All tile coordinates covered, row-major.
    pub fn cells(&self) -> impl Iterator<Item = Point> {
        let (x0, x1) = (self.x, self.right());
        (self.y..self.bottom()).flat_map(move |y| (x0..x1).map(move |x| Point::new(x, y)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn horizontal_split_keeps_width() {
        let r = Rect::new(2, 3, 10, 12);
        let (top, bottom) = r.split_horizontal(5);
        assert_eq!(top, Rect::new(2, 3, 10, 5));
        assert_eq!(bottom, Rect::new(2, 8, 10, 7));
        assert_eq!(top.area() + bottom.area(), r.area());
    }

    #[test]
    fn vertical_split_keeps_height() {
        let r = Rect::new(0, 0, 20, 12);
        let (left, right) = r.split_vertical(8);
        assert_eq!(left, Rect::new(0, 0, 8, 12));
        assert_eq!(right, Rect::new(8, 0, 12, 12));
    }

    #[test]
    fn margin_check() {
        let leaf = Rect::new(0, 0, 10, 10);
        assert!(leaf.contains_with_margin(&Rect::new(1, 1, 8, 8), 1));
        assert!(!leaf.contains_with_margin(&Rect::new(0, 1, 8, 8), 1));
        assert!(!leaf.contains_with_margin(&Rect::new(1, 1, 9, 8), 1));
    }

    #[test]
    fn cells_cover_area() {
        let r = Rect::new(3, 4, 3, 2);
        let cells: Vec<Point> = r.cells().collect();
        assert_eq!(cells.len(), 6);
        assert_eq!(cells[0], Point::new(3, 4));
        assert_eq!(cells[5], Point::new(5, 5));
        assert!(cells.iter().all(|p| r.contains(*p)));
    }
}
