use std::f64::consts::{PI, TAU};
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

/// Length below which a vector is treated as degenerate.
pub(crate) const EPSILON: f64 = 1e-9;

/// A 2D coordinate or displacement.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Unit vector at the given angle (radians, counterclockwise from +x).
    pub fn from_angle(angle: f64) -> Self {
        Self {
            x: angle.cos(),
            y: angle.sin(),
        }
    }

    pub fn dot(self, other: Point) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// z-component of the 3D cross product; positive when `other` is
    /// counterclockwise of `self`.
    pub fn cross(self, other: Point) -> f64 {
        self.x * other.y - self.y * other.x
    }

    pub fn norm(self) -> f64 {
        self.x.hypot(self.y)
    }

    pub fn distance(self, other: Point) -> f64 {
        (self - other).norm()
    }

    /// Angle of this vector in radians, in (-pi, pi].
    pub fn angle(self) -> f64 {
        self.y.atan2(self.x)
    }

    /// Unit vector in the same direction, or `fallback` when the vector is
    /// shorter than [`EPSILON`]. Output never contains NaN or infinity.
    pub fn normalized_or(self, fallback: Point) -> Point {
        let n = self.norm();
        if n < EPSILON {
            fallback
        } else {
            self / n
        }
    }

    /// Counterclockwise rotation about the origin.
    pub fn rotated(self, angle: f64) -> Point {
        let (sin, cos) = angle.sin_cos();
        Point {
            x: self.x * cos - self.y * sin,
            y: self.x * sin + self.y * cos,
        }
    }
}

impl Add for Point {
    type Output = Point;
    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;
    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;
    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

impl Div<f64> for Point {
    type Output = Point;
    fn div(self, rhs: f64) -> Point {
        Point::new(self.x / rhs, self.y / rhs)
    }
}

impl Neg for Point {
    type Output = Point;
    fn neg(self) -> Point {
        Point::new(-self.x, -self.y)
    }
}

impl AddAssign for Point {
    fn add_assign(&mut self, rhs: Point) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl SubAssign for Point {
    fn sub_assign(&mut self, rhs: Point) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

/// Mean of a point set; the origin for an empty set.
pub fn centroid<I: IntoIterator<Item = Point>>(points: I) -> Point {
    let mut sum = Point::ZERO;
    let mut count = 0usize;
    for p in points {
        sum += p;
        count += 1;
    }
    if count == 0 {
        Point::ZERO
    } else {
        sum / count as f64
    }
}

/// Direct similarity transform (uniform scale + rotation + translation).
///
/// Stored as the complex coefficient `a + bi` plus a translation, so that
/// `(x, y)` maps to `(a*x - b*y + tx, b*x + a*y + ty)`.
#[derive(Debug, Clone, Copy)]
pub struct Similarity {
    a: f64,
    b: f64,
    tx: f64,
    ty: f64,
}

impl Similarity {
    /// The transform mapping `la` to `wa` and `lb` to `wb`.
    ///
    /// When `la` and `lb` coincide the rotation/scale part degenerates; the
    /// identity rotation is substituted so the result stays finite.
    pub fn from_pairs(la: Point, wa: Point, lb: Point, wb: Point) -> Self {
        let dl = lb - la;
        let dw = wb - wa;
        let denom = dl.dot(dl);
        let (a, b) = if denom < EPSILON * EPSILON {
            (1.0, 0.0)
        } else {
            (
                (dw.x * dl.x + dw.y * dl.y) / denom,
                (dw.y * dl.x - dw.x * dl.y) / denom,
            )
        };
        Self {
            a,
            b,
            tx: wa.x - (a * la.x - b * la.y),
            ty: wa.y - (b * la.x + a * la.y),
        }
    }

    /// Rotation by `angle` about `center`.
    pub fn rotation_about(center: Point, angle: f64) -> Self {
        let (b, a) = angle.sin_cos();
        Self {
            a,
            b,
            tx: center.x - (a * center.x - b * center.y),
            ty: center.y - (b * center.x + a * center.y),
        }
    }

    pub fn apply(&self, p: Point) -> Point {
        Point::new(
            self.a * p.x - self.b * p.y + self.tx,
            self.b * p.x + self.a * p.y + self.ty,
        )
    }
}

/// Reflect `p` across the line through `a` and `b`.
pub fn reflect_across(p: Point, a: Point, b: Point) -> Point {
    let d = (b - a).normalized_or(Point::new(1.0, 0.0));
    let v = p - a;
    let along = d * v.dot(d);
    let perp = v - along;
    a + along - perp
}

/// Signed area test: positive when `p` lies counterclockwise of the
/// directed line `a -> b`.
pub fn line_side(p: Point, a: Point, b: Point) -> f64 {
    (b - a).cross(p - a)
}

/// Map an angle into `[0, 2*pi)`.
pub fn normalize_angle(angle: f64) -> f64 {
    let a = angle % TAU;
    if a < 0.0 {
        a + TAU
    } else {
        a
    }
}

/// Bisector of the largest angular gap between the occupied directions.
///
/// With no occupied direction the +x axis is returned; with one, the
/// opposite direction. Equal gaps resolve to the first in sorted order,
/// which keeps the choice deterministic.
pub fn largest_gap_bisector(occupied: &[f64]) -> f64 {
    match occupied.len() {
        0 => 0.0,
        1 => normalize_angle(occupied[0] + PI),
        _ => {
            let mut angles: Vec<f64> = occupied.iter().map(|&a| normalize_angle(a)).collect();
            angles.sort_by(|x, y| x.partial_cmp(y).expect("angles are finite"));
            let mut best_start = angles[0];
            let mut best_gap = 0.0;
            for (i, &start) in angles.iter().enumerate() {
                let end = if i + 1 == angles.len() {
                    angles[0] + TAU
                } else {
                    angles[i + 1]
                };
                let gap = end - start;
                if gap > best_gap {
                    best_gap = gap;
                    best_start = start;
                }
            }
            normalize_angle(best_start + best_gap / 2.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn point_arithmetic() {
        let p = Point::new(1.0, 2.0) + Point::new(3.0, -1.0);
        assert_eq!(p, Point::new(4.0, 1.0));
        assert_eq!(p * 2.0, Point::new(8.0, 2.0));
        assert_eq!(-p, Point::new(-4.0, -1.0));
    }

    #[test]
    fn rotation_quarter_turn() {
        let p = Point::new(1.0, 0.0).rotated(FRAC_PI_2);
        assert!(close(p.x, 0.0));
        assert!(close(p.y, 1.0));
    }

    #[test]
    fn normalized_degenerate_falls_back() {
        let p = Point::ZERO.normalized_or(Point::new(1.0, 0.0));
        assert_eq!(p, Point::new(1.0, 0.0));
        assert!(p.x.is_finite() && p.y.is_finite());
    }

    #[test]
    fn similarity_maps_both_anchor_points() {
        let la = Point::new(0.0, 0.0);
        let lb = Point::new(1.0, 0.0);
        let wa = Point::new(5.0, 5.0);
        let wb = Point::new(5.0, 6.0);
        let sim = Similarity::from_pairs(la, wa, lb, wb);
        assert!(close(sim.apply(la).distance(wa), 0.0));
        assert!(close(sim.apply(lb).distance(wb), 0.0));
        // 90 degree rotation: (0, 1) goes to the left of the mapped edge
        let mapped = sim.apply(Point::new(0.0, 1.0));
        assert!(close(mapped.x, 4.0));
        assert!(close(mapped.y, 5.0));
    }

    #[test]
    fn similarity_coincident_anchors_stay_finite() {
        let p = Point::new(2.0, 3.0);
        let sim = Similarity::from_pairs(p, Point::new(1.0, 1.0), p, Point::new(1.0, 1.0));
        let out = sim.apply(Point::new(10.0, -4.0));
        assert!(out.x.is_finite() && out.y.is_finite());
    }

    #[test]
    fn rotation_about_fixes_center() {
        let c = Point::new(3.0, -2.0);
        let sim = Similarity::rotation_about(c, 1.234);
        assert!(close(sim.apply(c).distance(c), 0.0));
        let moved = sim.apply(c + Point::new(1.0, 0.0));
        assert!(close(moved.distance(c), 1.0));
    }

    #[test]
    fn reflect_across_horizontal_line() {
        let r = reflect_across(Point::new(1.0, 1.0), Point::ZERO, Point::new(2.0, 0.0));
        assert!(close(r.x, 1.0));
        assert!(close(r.y, -1.0));
    }

    #[test]
    fn line_side_signs() {
        let a = Point::ZERO;
        let b = Point::new(1.0, 0.0);
        assert!(line_side(Point::new(0.5, 1.0), a, b) > 0.0);
        assert!(line_side(Point::new(0.5, -1.0), a, b) < 0.0);
    }

    #[test]
    fn gap_bisector_empty_is_x_axis() {
        assert!(close(largest_gap_bisector(&[]), 0.0));
    }

    #[test]
    fn gap_bisector_single_is_opposite() {
        assert!(close(largest_gap_bisector(&[0.0]), PI));
        assert!(close(largest_gap_bisector(&[FRAC_PI_2]), FRAC_PI_2 + PI));
    }

    #[test]
    fn gap_bisector_two_neighbors() {
        // occupied at 0 and 90 degrees; largest gap spans 90..360
        let b = largest_gap_bisector(&[0.0, FRAC_PI_2]);
        assert!(close(b, FRAC_PI_2 + 0.75 * PI));
    }

    #[test]
    fn gap_bisector_tie_takes_first_gap() {
        // perfect cross: four equal gaps, bisector of the first one
        let b = largest_gap_bisector(&[0.0, FRAC_PI_2, PI, 1.5 * PI]);
        assert!(close(b, FRAC_PI_2 / 2.0));
    }

    #[test]
    fn centroid_of_square() {
        let c = centroid([
            Point::new(0.0, 0.0),
            Point::new(2.0, 0.0),
            Point::new(2.0, 2.0),
            Point::new(0.0, 2.0),
        ]);
        assert!(close(c.x, 1.0));
        assert!(close(c.y, 1.0));
    }

    #[test]
    fn centroid_empty_is_origin() {
        assert_eq!(centroid([]), Point::ZERO);
    }
}
