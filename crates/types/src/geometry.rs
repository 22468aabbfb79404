use serde::{Deserialize, Serialize};

/// A position on the page in points, origin at the top-left corner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn zero() -> Self {
        Self {
            width: 0.0,
            height: 0.0,
        }
    }

    /// Swaps the axes when needed so that `width <= height`.
    pub fn portrait(self) -> Self {
        if self.width > self.height {
            Self::new(self.height, self.width)
        } else {
            self
        }
    }

    /// Swaps the axes when needed so that `width >= height`.
    pub fn landscape(self) -> Self {
        if self.width < self.height {
            Self::new(self.height, self.width)
        } else {
            self
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Margins {
    pub fn all(value: f32) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }
}

impl Default for Margins {
    /// One inch on every side.
    fn default() -> Self {
        Self::all(72.0)
    }
}
