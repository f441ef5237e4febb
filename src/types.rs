//! Shared geometry types used across the layout engine and its sources.
//!
//! Rectangles are edge-based (left, top, right, bottom) so that adjacency
//! between content regions can be checked by comparing edges directly.

use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle with integer edges
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self { left, top, right, bottom }
    }

    /// Build a rectangle from an origin and a size
    pub fn from_origin_size(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            left: x,
            top: y,
            right: x + width as i32,
            bottom: y + height as i32,
        }
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    /// True if the rectangle covers no area
    pub fn is_empty(&self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }

    /// Is this rectangle logically before `other` (above it, or level with it and to its left)?
    pub fn is_before(&self, other: &Rect) -> bool {
        (self.top, self.left) < (other.top, other.left)
    }

    /// Overlapping area of two rectangles, if any
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let r = Rect {
            left: self.left.max(other.left),
            top: self.top.max(other.top),
            right: self.right.min(other.right),
            bottom: self.bottom.min(other.bottom),
        };
        if r.is_empty() {
            None
        } else {
            Some(r)
        }
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.intersection(other).is_some()
    }

    /// Move the rectangle by the given deltas
    pub fn offset(&self, dx: i32, dy: i32) -> Rect {
        Rect {
            left: self.left + dx,
            top: self.top + dy,
            right: self.right + dx,
            bottom: self.bottom + dy,
        }
    }

    /// Shrink every edge inward by `margin` (negative values grow the rectangle)
    pub fn inset(&self, margin: i32) -> Rect {
        Rect {
            left: self.left + margin,
            top: self.top + margin,
            right: self.right - margin,
            bottom: self.bottom - margin,
        }
    }
}

/// How the content regions of a window are arranged relative to each other
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitKind {
    /// Zero regions, three or more, or two that are neither side by side nor stacked
    #[default]
    Unknown,
    /// Exactly one region
    None,
    /// Two regions side by side (same top and bottom)
    Vertical,
    /// Two regions stacked (same left and right)
    Horizontal,
}

impl std::fmt::Display for SplitKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SplitKind::Unknown => "unknown",
            SplitKind::None => "none",
            SplitKind::Vertical => "vertical",
            SplitKind::Horizontal => "horizontal",
        };
        f.write_str(name)
    }
}

/// Outer and client rectangles of the application window.
///
/// `window` is in root (screen) coordinates; `client` is in client
/// coordinates, so its origin is normally (0, 0).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowGeometry {
    pub window: Rect,
    pub client: Rect,
}

/// Comparable capture of the layout state, used to decide whether a redraw is needed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LayoutSnapshot {
    pub client: Rect,
    pub regions: Vec<Rect>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_size() {
        let rect = Rect::new(10, 20, 110, 220);
        assert_eq!(rect.width(), 100);
        assert_eq!(rect.height(), 200);
        assert!(!rect.is_empty());
        assert!(Rect::new(5, 5, 5, 50).is_empty());
    }

    #[test]
    fn test_rect_from_origin_size() {
        let rect = Rect::from_origin_size(1920, 0, 1280, 800);
        assert_eq!(rect, Rect::new(1920, 0, 3200, 800));
    }

    #[test]
    fn test_is_before() {
        let left = Rect::new(0, 0, 400, 480);
        let right = Rect::new(400, 0, 800, 480);
        let below = Rect::new(0, 480, 800, 960);

        assert!(left.is_before(&right));
        assert!(!right.is_before(&left));
        // Top edge wins over left edge
        assert!(right.is_before(&below));
        assert!(!left.is_before(&left));
    }

    #[test]
    fn test_intersection() {
        let a = Rect::new(0, 0, 100, 100);
        let b = Rect::new(50, 50, 150, 150);
        assert_eq!(a.intersection(&b), Some(Rect::new(50, 50, 100, 100)));

        // Touching edges do not intersect
        let c = Rect::new(100, 0, 200, 100);
        assert_eq!(a.intersection(&c), None);
        assert!(!a.intersects(&c));
    }

    #[test]
    fn test_offset_and_inset() {
        let rect = Rect::new(0, 0, 100, 50);
        assert_eq!(rect.offset(10, -5), Rect::new(10, -5, 110, 45));
        assert_eq!(rect.inset(5), Rect::new(5, 5, 95, 45));
    }

    #[test]
    fn test_split_kind_display() {
        assert_eq!(SplitKind::Vertical.to_string(), "vertical");
        assert_eq!(SplitKind::default(), SplitKind::Unknown);
    }

    #[test]
    fn test_snapshot_equality() {
        let a = LayoutSnapshot {
            client: Rect::new(0, 0, 800, 480),
            regions: vec![Rect::new(0, 0, 400, 480), Rect::new(400, 0, 800, 480)],
        };
        let mut b = a.clone();
        assert_eq!(a, b);

        b.regions.reverse();
        assert_ne!(a, b);
    }
}
