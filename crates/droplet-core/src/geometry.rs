//! Points and level-set volume fractions.

use crate::plic::{line_area, normalize};

/// A point in the `(x, y)` half-plane of the axisymmetric domain.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    /// Coordinate along the symmetry axis.
    pub x: f64,
    /// Distance from the symmetry axis.
    pub y: f64,
}

impl Point {
    /// Construct a point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance to `other`.
    pub fn distance_sq(self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }
}

/// Volume fraction of the square cell centred at `(x, y)` with size `delta`
/// lying where `phi > 0`.
///
/// `phi` is sampled at the centre and the four vertices; the cell content
/// is then the area cut by the best linear fit of those samples, computed
/// exactly with [`line_area`]. Cells whose five samples share a sign are
/// reported as empty or full without reconstruction.
pub fn level_set_fraction(phi: impl Fn(f64, f64) -> f64, x: f64, y: f64, delta: f64) -> f64 {
    let h = 0.5 * delta;
    let centre = phi(x, y);
    // Vertices: (-,-), (+,-), (-,+), (+,+).
    let v = [
        phi(x - h, y - h),
        phi(x + h, y - h),
        phi(x - h, y + h),
        phi(x + h, y + h),
    ];
    if centre > 0.0 && v.iter().all(|&p| p > 0.0) {
        return 1.0;
    }
    if centre <= 0.0 && v.iter().all(|&p| p <= 0.0) {
        return 0.0;
    }

    // Linear fit in cell-local coordinates, where the cell is [-1/2, 1/2]^2.
    let gx = 0.5 * ((v[1] + v[3]) - (v[0] + v[2]));
    let gy = 0.5 * ((v[2] + v[3]) - (v[0] + v[1]));
    // Fluid where centre + gx*x + gy*y > 0, i.e. (-gx, -gy).x < centre.
    match normalize(-gx, -gy) {
        Some((nx, ny, scale)) => line_area(nx, ny, centre / scale),
        None => {
            if centre > 0.0 {
                1.0
            } else {
                0.0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn disc(r: f64) -> impl Fn(f64, f64) -> f64 {
        move |x, y| r * r - (x * x + y * y)
    }

    #[test]
    fn cells_far_inside_and_outside() {
        assert_eq!(level_set_fraction(disc(1.0), 0.0, 0.0, 0.1), 1.0);
        assert_eq!(level_set_fraction(disc(1.0), 3.0, 3.0, 0.1), 0.0);
    }

    #[test]
    fn half_plane_through_centre_is_half_full() {
        let f = level_set_fraction(|x, _| 1.0 - x, 1.0, 0.3, 0.25);
        assert!((f - 0.5).abs() < 1e-12);
    }

    #[test]
    fn half_plane_quarter_offset() {
        // Plane x < 1.0 cuts a cell spanning [0.875, 1.125] at three quarters.
        let f = level_set_fraction(|x, _| 1.0 - x, 1.0 - 0.0625, 0.0, 0.25);
        assert!((f - 0.75).abs() < 1e-12);
    }

    #[test]
    fn point_distance() {
        assert_eq!(Point::new(1.0, 2.0).distance_sq(Point::new(4.0, 6.0)), 25.0);
    }

    #[test]
    fn disc_area_converges() {
        // Quarter disc of radius 0.5 in the unit square, 64x64 cells.
        let n = 64;
        let d = 1.0 / n as f64;
        let mut area = 0.0;
        for i in 0..n {
            for j in 0..n {
                let x = (i as f64 + 0.5) * d;
                let y = (j as f64 + 0.5) * d;
                area += level_set_fraction(disc(0.5), x, y, d) * d * d;
            }
        }
        let exact = std::f64::consts::PI * 0.25 / 4.0;
        assert!((area - exact).abs() < 1e-3, "area {area} vs {exact}");
    }

    proptest! {
        #[test]
        fn fraction_is_bounded(
            x in -2.0f64..2.0,
            y in -2.0f64..2.0,
            r in 0.1f64..1.5,
            delta in 1e-3f64..0.5,
        ) {
            let f = level_set_fraction(disc(r), x, y, delta);
            prop_assert!((0.0..=1.0).contains(&f));
        }
    }
}
