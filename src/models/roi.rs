use crate::error::QuestError;
use serde::{Deserialize, Serialize};

/// Mission slot region on a captured window image (pixel coordinates)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Roi {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Roi {
    /// Create a new ROI from coordinates
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create ROI from bounds (x1, y1, x2, y2)
    pub fn from_bounds(x1: i32, y1: i32, x2: i32, y2: i32) -> Result<Self, QuestError> {
        if x2 <= x1 {
            return Err(QuestError::Input("x2 must be greater than x1".to_string()));
        }
        if y2 <= y1 {
            return Err(QuestError::Input("y2 must be greater than y1".to_string()));
        }

        Ok(Self {
            x: x1,
            y: y1,
            width: (x2 - x1) as u32,
            height: (y2 - y1) as u32,
        })
    }

    /// Validate ROI dimensions
    pub fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    pub fn x2(&self) -> i32 {
        self.x + self.width as i32
    }

    pub fn y2(&self) -> i32 {
        self.y + self.height as i32
    }

    /// Clip the region to an image of the given size.
    ///
    /// Returns `(x, y, width, height)` in image space, or `None` when nothing
    /// of the region lies inside the image.
    pub fn clamp_to(&self, image_width: u32, image_height: u32) -> Option<(u32, u32, u32, u32)> {
        if !self.is_valid() {
            return None;
        }

        let x1 = self.x.max(0) as u32;
        let y1 = self.y.max(0) as u32;
        let x2 = (self.x2().max(0) as u32).min(image_width);
        let y2 = (self.y2().max(0) as u32).min(image_height);

        if x2 <= x1 || y2 <= y1 {
            return None;
        }

        Some((x1, y1, x2 - x1, y2 - y1))
    }
}
