//! Polygon hit-testing and bounding boxes.
//!
//! Mask polygons arrive as ordered vertex lists in image pixel space.
//! The path is implicitly closed (last vertex connects back to the
//! first), matching how the canvas builds the same outline with
//! `closePath()`.

use crate::types::Point;

/// Minimum number of vertices for a polygon to enclose an area.
pub const MIN_POLYGON_POINTS: usize = 3;

/// Whether `point` lies inside the closed polygon.
///
/// Uses the even-odd rule (crossing-number test). Points exactly on an
/// edge may fall either way. Polygons with fewer than
/// [`MIN_POLYGON_POINTS`] vertices contain nothing.
#[must_use]
pub fn contains(point: Point, polygon: &[Point]) -> bool {
    if polygon.len() < MIN_POLYGON_POINTS {
        return false;
    }

    let mut inside = false;
    let mut j = polygon.len() - 1;
    for (i, &a) in polygon.iter().enumerate() {
        let b = polygon[j];
        // Edge (b -> a) straddles the horizontal line through the point.
        if (a.y > point.y) != (b.y > point.y) {
            let x_cross = (b.x - a.x).mul_add((point.y - a.y) / (b.y - a.y), a.x);
            if point.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Smallest x over all points.
    pub min_x: f64,
    /// Smallest y over all points.
    pub min_y: f64,
    /// Largest x over all points.
    pub max_x: f64,
    /// Largest y over all points.
    pub max_y: f64,
}

impl Bounds {
    /// Bounding box of a point set, or `None` if it is empty.
    #[must_use]
    pub fn of(points: &[Point]) -> Option<Self> {
        let first = points.first()?;
        let init = Self {
            min_x: first.x,
            min_y: first.y,
            max_x: first.x,
            max_y: first.y,
        };
        Some(points.iter().skip(1).fold(init, |b, p| Self {
            min_x: b.min_x.min(p.x),
            min_y: b.min_y.min(p.y),
            max_x: b.max_x.max(p.x),
            max_y: b.max_y.max(p.y),
        }))
    }

    /// Horizontal extent.
    #[must_use]
    pub const fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Vertical extent.
    #[must_use]
    pub const fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn square(size: f64) -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(size, 0.0),
            Point::new(size, size),
            Point::new(0.0, size),
        ]
    }

    #[test]
    fn point_inside_square() {
        assert!(contains(Point::new(5.0, 5.0), &square(10.0)));
    }

    #[test]
    fn point_far_outside_square() {
        assert!(!contains(Point::new(500.0, -20.0), &square(10.0)));
        assert!(!contains(Point::new(-1.0, 5.0), &square(10.0)));
        assert!(!contains(Point::new(5.0, 11.0), &square(10.0)));
    }

    #[test]
    fn degenerate_polygons_contain_nothing() {
        assert!(!contains(Point::new(0.0, 0.0), &[]));
        assert!(!contains(Point::new(0.0, 0.0), &[Point::new(0.0, 0.0)]));
        let segment = [Point::new(0.0, 0.0), Point::new(10.0, 10.0)];
        assert!(!contains(Point::new(5.0, 5.0), &segment));
    }

    #[test]
    fn triangle_containment() {
        let tri = [
            Point::new(0.0, 0.0),
            Point::new(20.0, 0.0),
            Point::new(0.0, 20.0),
        ];
        assert!(contains(Point::new(4.0, 4.0), &tri));
        // Beyond the hypotenuse.
        assert!(!contains(Point::new(15.0, 15.0), &tri));
    }

    #[test]
    fn concave_polygon_notch_is_outside() {
        // A "U" shape: the notch between the arms is outside.
        let u = [
            Point::new(0.0, 0.0),
            Point::new(30.0, 0.0),
            Point::new(30.0, 30.0),
            Point::new(20.0, 30.0),
            Point::new(20.0, 10.0),
            Point::new(10.0, 10.0),
            Point::new(10.0, 30.0),
            Point::new(0.0, 30.0),
        ];
        assert!(contains(Point::new(5.0, 20.0), &u));
        assert!(contains(Point::new(25.0, 20.0), &u));
        assert!(contains(Point::new(15.0, 5.0), &u));
        assert!(!contains(Point::new(15.0, 20.0), &u));
    }

    #[test]
    fn winding_direction_does_not_matter() {
        let mut sq = square(10.0);
        sq.reverse();
        assert!(contains(Point::new(3.0, 7.0), &sq));
    }

    #[test]
    fn bounds_of_points() {
        let pts = [
            Point::new(4.0, 9.0),
            Point::new(-2.0, 3.0),
            Point::new(7.5, 1.0),
        ];
        let b = Bounds::of(&pts).unwrap();
        assert_eq!(
            b,
            Bounds {
                min_x: -2.0,
                min_y: 1.0,
                max_x: 7.5,
                max_y: 9.0,
            }
        );
        assert!((b.width() - 9.5).abs() < f64::EPSILON);
        assert!((b.height() - 8.0).abs() < f64::EPSILON);
    }

    #[test]
    fn bounds_of_empty_is_none() {
        assert!(Bounds::of(&[]).is_none());
    }
}
