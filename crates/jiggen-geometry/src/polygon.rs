//! Flat polygon math for collision checks during sheet nesting.
//!
//! Everything here works on open rings: vertex lists without the wrap-around
//! duplicate. Curved outlines are flattened before they reach these helpers.

use jiggen_core::{Aabb, Vec2};

/// Shoelace area. Positive for counter-clockwise rings in a y-up frame;
/// callers that only care about magnitude take `abs()`.
pub fn signed_area(ring: &[Vec2]) -> f64 {
    let n = ring.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let a = ring[i];
        let b = ring[(i + 1) % n];
        sum += a.x * b.y - b.x * a.y;
    }
    sum / 2.0
}

pub fn bounding_box(ring: &[Vec2]) -> Aabb {
    let mut bbox = Aabb::empty();
    for &p in ring {
        bbox.include(p);
    }
    bbox
}

/// Ray-cast point containment. Boundary points may land on either side.
pub fn point_in_polygon(point: Vec2, ring: &[Vec2]) -> bool {
    let n = ring.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let a = ring[i];
        let b = ring[j];
        if ((a.y > point.y) != (b.y > point.y))
            && (point.x < (b.x - a.x) * (point.y - a.y) / (b.y - a.y) + a.x)
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Drops consecutive duplicates and the wrap-around duplicate flattening
/// leaves on closed paths.
pub fn dedup_ring(points: Vec<Vec2>, eps: f64) -> Vec<Vec2> {
    let mut out: Vec<Vec2> = Vec::with_capacity(points.len());
    for p in points {
        if out.last().is_some_and(|last| last.distance(p) <= eps) {
            continue;
        }
        out.push(p);
    }
    if out.len() >= 2 && out[0].distance(out[out.len() - 1]) <= eps {
        out.pop();
    }
    out
}

fn perpendicular_distance(p: Vec2, a: Vec2, b: Vec2) -> f64 {
    let d = b - a;
    let len_sq = d.x * d.x + d.y * d.y;
    if len_sq == 0.0 {
        return p.distance(a);
    }
    let t = ((p.x - a.x) * d.x + (p.y - a.y) * d.y) / len_sq;
    let t = t.clamp(0.0, 1.0);
    p.distance(Vec2::new(a.x + t * d.x, a.y + t * d.y))
}

/// Douglas-Peucker simplification with fixed endpoints.
pub fn douglas_peucker(points: &[Vec2], tolerance: f64) -> Vec<Vec2> {
    if points.len() <= 2 {
        return points.to_vec();
    }
    let mut keep = vec![false; points.len()];
    keep[0] = true;
    keep[points.len() - 1] = true;

    let mut spans = vec![(0usize, points.len() - 1)];
    while let Some((lo, hi)) = spans.pop() {
        if hi <= lo + 1 {
            continue;
        }
        let mut max_dist = 0.0;
        let mut split = lo;
        for i in (lo + 1)..hi {
            let dist = perpendicular_distance(points[i], points[lo], points[hi]);
            if dist > max_dist {
                max_dist = dist;
                split = i;
            }
        }
        if max_dist > tolerance {
            keep[split] = true;
            spans.push((lo, split));
            spans.push((split, hi));
        }
    }

    points
        .iter()
        .zip(&keep)
        .filter_map(|(p, k)| k.then_some(*p))
        .collect()
}

/// Simplifies a closed ring by running Douglas-Peucker over the ring closed
/// at its first vertex.
pub fn simplify_ring(ring: &[Vec2], tolerance: f64) -> Vec<Vec2> {
    if ring.len() <= 3 {
        return ring.to_vec();
    }
    let mut closed = ring.to_vec();
    closed.push(ring[0]);
    let mut out = douglas_peucker(&closed, tolerance);
    out.pop();
    out
}

/// Smallest vertex-to-vertex distance between two rings. A cheap stand-in for
/// true segment clearance once bounding boxes already overlap within the gap.
pub fn min_point_distance(a: &[Vec2], b: &[Vec2]) -> f64 {
    let mut min = f64::INFINITY;
    for &p in a {
        for &q in b {
            let d = p.distance(q);
            if d < min {
                min = d;
            }
        }
    }
    min
}

pub fn rotated_about(ring: &[Vec2], radians: f64, pivot: Vec2) -> Vec<Vec2> {
    let (sin, cos) = radians.sin_cos();
    ring.iter()
        .map(|p| {
            let dx = p.x - pivot.x;
            let dy = p.y - pivot.y;
            Vec2::new(
                pivot.x + dx * cos - dy * sin,
                pivot.y + dx * sin + dy * cos,
            )
        })
        .collect()
}

pub fn translated(ring: &[Vec2], delta: Vec2) -> Vec<Vec2> {
    ring.iter().map(|p| *p + delta).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn unit_square() -> Vec<Vec2> {
        vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(0.0, 1.0),
        ]
    }

    #[test]
    fn shoelace_area_of_square() {
        assert_abs_diff_eq!(signed_area(&unit_square()), 1.0, epsilon = 1e-12);
        let mut cw = unit_square();
        cw.reverse();
        assert_abs_diff_eq!(signed_area(&cw), -1.0, epsilon = 1e-12);
    }

    #[test]
    fn ray_cast_classifies_inside_and_outside() {
        let square = unit_square();
        assert!(point_in_polygon(Vec2::new(0.5, 0.5), &square));
        assert!(!point_in_polygon(Vec2::new(1.5, 0.5), &square));
        assert!(!point_in_polygon(Vec2::new(-0.1, 0.99), &square));
    }

    #[test]
    fn douglas_peucker_drops_collinear_points() {
        let points = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.001),
            Vec2::new(2.0, 0.0),
            Vec2::new(3.0, 0.5),
            Vec2::new(4.0, 0.0),
        ];
        let out = douglas_peucker(&points, 0.01);
        assert_eq!(out.len(), 4);
        assert_abs_diff_eq!(out[1].x, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn douglas_peucker_keeps_endpoints() {
        let points = vec![Vec2::new(0.0, 0.0), Vec2::new(0.5, 0.0), Vec2::new(1.0, 0.0)];
        let out = douglas_peucker(&points, 0.1);
        assert_eq!(out.first().copied(), Some(Vec2::new(0.0, 0.0)));
        assert_eq!(out.last().copied(), Some(Vec2::new(1.0, 0.0)));
    }

    #[test]
    fn dedup_ring_removes_wraparound_duplicate() {
        let mut points = unit_square();
        points.push(Vec2::new(0.0, 0.0));
        points.push(Vec2::new(0.0, 0.0));
        let out = dedup_ring(points, 1e-9);
        assert_eq!(out.len(), 4);
    }

    #[test]
    fn min_point_distance_between_separated_squares() {
        let a = unit_square();
        let b = translated(&a, Vec2::new(3.0, 0.0));
        assert_abs_diff_eq!(min_point_distance(&a, &b), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn rotation_preserves_area() {
        let square = unit_square();
        let center = bounding_box(&square).center();
        let turned = rotated_about(&square, std::f64::consts::FRAC_PI_3, center);
        assert_abs_diff_eq!(signed_area(&turned).abs(), 1.0, epsilon = 1e-9);
    }
}
