//! Geometry primitives shared by the engine and the host seam.

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self { Self { x, y } }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self { Self { width, height } }
}

/// A frame rectangle in global screen coordinates. The origin is the top left
/// corner and `y` grows downwards.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn origin(&self) -> Point { Point::new(self.x, self.y) }

    pub fn size(&self) -> Size { Size::new(self.width, self.height) }

    pub fn min(&self) -> Point { self.origin() }

    pub fn max(&self) -> Point { Point::new(self.x + self.width, self.y + self.height) }

    pub fn aspect_ratio(&self) -> f64 {
        if self.height <= 0.0 { 0.0 } else { self.width / self.height }
    }
}

pub trait IsWithin {
    fn is_within(&self, how_much: f64, other: Self) -> bool;
}

impl IsWithin for Rect {
    fn is_within(&self, how_much: f64, other: Self) -> bool {
        self.origin().is_within(how_much, other.origin())
            && self.size().is_within(how_much, other.size())
    }
}

impl IsWithin for Point {
    fn is_within(&self, how_much: f64, other: Self) -> bool {
        self.x.is_within(how_much, other.x) && self.y.is_within(how_much, other.y)
    }
}

impl IsWithin for Size {
    fn is_within(&self, how_much: f64, other: Self) -> bool {
        self.width.is_within(how_much, other.width) && self.height.is_within(how_much, other.height)
    }
}

impl IsWithin for f64 {
    fn is_within(&self, how_much: f64, other: Self) -> bool { (self - other).abs() < how_much }
}

pub trait SameAs: IsWithin + Sized {
    fn same_as(&self, other: Self) -> bool { self.is_within(0.1, other) }
}

impl SameAs for Rect {}
impl SameAs for Point {}
impl SameAs for Size {}

/// Per-side movement between two frames of the same window.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EdgeDelta {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

pub trait RectExt {
    fn contains_rect(&self, other: Self) -> bool;
    fn edge_delta(&self, to: &Self) -> EdgeDelta;
    /// Shrinks `self` to `other`'s size where it is larger and then moves it
    /// so it lies inside `other`. When a minimum size cannot fit, the minimum
    /// wins and the rect is anchored at `other`'s origin.
    fn clamp_into(&self, other: &Self, min_size: Size) -> Self;
}

impl RectExt for Rect {
    fn contains_rect(&self, other: Self) -> bool {
        self.min().x <= other.min().x
            && self.min().y <= other.min().y
            && self.max().x >= other.max().x
            && self.max().y >= other.max().y
    }

    fn edge_delta(&self, to: &Self) -> EdgeDelta {
        EdgeDelta {
            left: to.min().x - self.min().x,
            top: to.min().y - self.min().y,
            right: to.max().x - self.max().x,
            bottom: to.max().y - self.max().y,
        }
    }

    fn clamp_into(&self, other: &Self, min_size: Size) -> Self {
        let width = limit(self.width, min_size.width, other.width);
        let height = limit(self.height, min_size.height, other.height);
        let x = limit(self.x, other.x, other.x + other.width - width);
        let y = limit(self.y, other.y, other.y + other.height - height);
        Rect::new(x, y, width, height)
    }
}

/// Like `f64::clamp`, but the lower bound wins when the bounds cross instead
/// of panicking.
pub fn limit(value: f64, lower: f64, upper: f64) -> f64 { value.min(upper).max(lower) }
