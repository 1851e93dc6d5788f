//! Screen geometry helpers.
//!
//! All frames use window coordinates: `(0, 0)` is the top-left corner of
//! the primary display and the Y axis points **down**.

use crate::model::DisplayInfo;
use serde::{Deserialize, Serialize};

/// A point on the virtual desktop.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle (origin + size).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn min_x(&self) -> f64 {
        self.x
    }

    pub fn max_x(&self) -> f64 {
        self.x + self.width
    }

    pub fn min_y(&self) -> f64 {
        self.y
    }

    pub fn max_y(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Whether either side is at most `min_side` points long.
    ///
    /// Some apps park an invisible 1×1 "main" window on the primary display;
    /// such frames say nothing about where the app actually lives.
    pub fn is_degenerate(&self, min_side: f64) -> bool {
        self.width <= min_side || self.height <= min_side
    }

    /// Whether the vertical spans of `self` and `other` overlap.
    pub fn vertical_intersect(&self, other: &Rect) -> bool {
        self.min_y() < other.max_y() && other.min_y() < self.max_y()
    }

    /// Whether the horizontal spans of `self` and `other` overlap.
    pub fn horizontal_intersect(&self, other: &Rect) -> bool {
        self.min_x() < other.max_x() && other.min_x() < self.max_x()
    }

    /// Euclidean distance between the centers of two frames.
    ///
    /// Symmetric and monotonic, so "closest" is well defined.
    pub fn distance(&self, other: &Rect) -> f64 {
        let a = self.center();
        let b = other.center();
        let dx = a.x - b.x;
        let dy = a.y - b.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Whether `point` lies inside this rect (left/top edges inclusive).
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.min_x()
            && point.x < self.max_x()
            && point.y >= self.min_y()
            && point.y < self.max_y()
    }

    /// Area of the overlap between two frames (`0.0` when disjoint).
    pub fn intersection_area(&self, other: &Rect) -> f64 {
        let w = self.max_x().min(other.max_x()) - self.min_x().max(other.min_x());
        let h = self.max_y().min(other.max_y()) - self.min_y().max(other.min_y());
        if w <= 0.0 || h <= 0.0 {
            0.0
        } else {
            w * h
        }
    }
}

/// Find the display a frame belongs to.
///
/// Picks the display sharing the largest area with `frame`. Frames that do
/// not touch any display fall back to the display containing their center,
/// and to `None` if there is none.
pub fn display_for_frame<'a>(displays: &'a [DisplayInfo], frame: &Rect) -> Option<&'a DisplayInfo> {
    let best = displays
        .iter()
        .map(|d| (d, d.frame.intersection_area(frame)))
        .filter(|(_, area)| *area > 0.0)
        .fold(None, |best: Option<(&DisplayInfo, f64)>, (d, area)| match best {
            Some((_, best_area)) if best_area >= area => best,
            _ => Some((d, area)),
        });
    best.map(|(d, _)| d)
        .or_else(|| display_at_point(displays, frame.center()))
}

/// Find the display that contains `point`.
pub fn display_at_point(displays: &[DisplayInfo], point: Point) -> Option<&DisplayInfo> {
    displays.iter().find(|d| d.frame.contains(point))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_displays() -> Vec<DisplayInfo> {
        vec![
            DisplayInfo {
                name: "Built-in".into(),
                frame: Rect::new(0.0, 0.0, 1920.0, 1080.0),
            },
            DisplayInfo {
                name: "External".into(),
                frame: Rect::new(1920.0, 0.0, 2560.0, 1440.0),
            },
        ]
    }

    #[test]
    fn edges_and_center() {
        let r = Rect::new(10.0, 20.0, 100.0, 50.0);
        assert_eq!(r.max_x(), 110.0);
        assert_eq!(r.max_y(), 70.0);
        assert_eq!(r.center(), Point::new(60.0, 45.0));
    }

    #[test]
    fn vertical_intersection_requires_overlap() {
        let a = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert!(a.vertical_intersect(&Rect::new(500.0, 50.0, 10.0, 100.0)));
        // Touching edges do not count as overlap.
        assert!(!a.vertical_intersect(&Rect::new(500.0, 100.0, 10.0, 100.0)));
    }

    #[test]
    fn horizontal_intersection_requires_overlap() {
        let a = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert!(a.horizontal_intersect(&Rect::new(99.0, 500.0, 10.0, 10.0)));
        assert!(!a.horizontal_intersect(&Rect::new(100.0, 500.0, 10.0, 10.0)));
    }

    #[test]
    fn distance_is_symmetric() {
        let a = Rect::new(0.0, 0.0, 100.0, 100.0);
        let b = Rect::new(300.0, 400.0, 100.0, 100.0);
        assert_eq!(a.distance(&b), 500.0);
        assert_eq!(a.distance(&b), b.distance(&a));
    }

    #[test]
    fn frame_maps_to_display_with_largest_overlap() {
        let displays = two_displays();
        // Mostly on the external display.
        let frame = Rect::new(1800.0, 100.0, 800.0, 600.0);
        let d = display_for_frame(&displays, &frame).unwrap();
        assert_eq!(d.name, "External");
    }

    #[test]
    fn offscreen_frame_has_no_display() {
        let displays = two_displays();
        let frame = Rect::new(-5000.0, -5000.0, 100.0, 100.0);
        assert!(display_for_frame(&displays, &frame).is_none());
    }

    #[test]
    fn point_lookup() {
        let displays = two_displays();
        let d = display_at_point(&displays, Point::new(2000.0, 10.0)).unwrap();
        assert_eq!(d.name, "External");
        assert!(display_at_point(&displays, Point::new(100.0, 1200.0)).is_none());
    }

    #[test]
    fn degenerate_frames() {
        assert!(Rect::new(0.0, 0.0, 1.0, 1.0).is_degenerate(10.0));
        assert!(!Rect::new(0.0, 0.0, 400.0, 300.0).is_degenerate(10.0));
    }
}
