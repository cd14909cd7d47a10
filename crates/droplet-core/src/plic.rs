//! Piecewise-linear interface calculation (PLIC) in a single square cell.
//!
//! All functions work in cell-local coordinates where the cell is the square
//! `[-1/2, 1/2]^2`. An interface line is `n . x = alpha` with the normal
//! scaled so that `|nx| + |ny| = 1`; the fluid occupies `n . x <= alpha`,
//! so `n` points out of the fluid.

use smallvec::SmallVec;

use crate::geometry::Point;

/// Cells with `eps < f < 1 - eps` are treated as interfacial.
pub const INTERFACE_EPS: f64 = 1e-6;

const NORMAL_EPS: f64 = 1e-10;
const PARALLEL_EPS: f64 = 1e-4;

/// Whether a volume fraction marks an interface cell.
pub fn is_interfacial(f: f64, eps: f64) -> bool {
    f > eps && f < 1.0 - eps
}

/// Scale `(a, b)` so that `|a| + |b| = 1`.
///
/// Returns the scaled pair and the scale factor, or `None` for a
/// vanishing vector.
pub fn normalize(a: f64, b: f64) -> Option<(f64, f64, f64)> {
    let scale = a.abs() + b.abs();
    if scale.is_nan() || scale <= NORMAL_EPS {
        return None;
    }
    Some((a / scale, b / scale, scale))
}

/// Youngs' interface normal from a 3x3 stencil of volume fractions.
///
/// `stencil[i][j]` is the fraction at offset `(i - 1, j - 1)` from the
/// centre cell. The result points out of the fluid and is normalized; it is
/// `None` when the stencil carries no gradient.
pub fn youngs_normal(stencil: &[[f64; 3]; 3]) -> Option<(f64, f64)> {
    let s = stencil;
    let gx = (s[2][2] + 2.0 * s[2][1] + s[2][0]) - (s[0][2] + 2.0 * s[0][1] + s[0][0]);
    let gy = (s[2][2] + 2.0 * s[1][2] + s[0][2]) - (s[2][0] + 2.0 * s[1][0] + s[0][0]);
    normalize(-gx, -gy).map(|(nx, ny, _)| (nx, ny))
}

/// Area of the cell on the fluid side of `n . x = alpha`.
pub fn line_area(nx: f64, ny: f64, alpha: f64) -> f64 {
    // Shift to the corner-based frame where the cell is [0, 1]^2.
    let mut alpha = alpha + 0.5 * (nx + ny);
    let (mut nx, mut ny) = (nx, ny);
    if nx < 0.0 {
        alpha -= nx;
        nx = -nx;
    }
    if ny < 0.0 {
        alpha -= ny;
        ny = -ny;
    }
    if alpha <= 0.0 {
        return 0.0;
    }
    if alpha >= nx + ny {
        return 1.0;
    }
    let area = if nx < NORMAL_EPS {
        alpha / ny
    } else if ny < NORMAL_EPS {
        alpha / nx
    } else {
        let mut v = alpha * alpha;
        let a = alpha - nx;
        if a > 0.0 {
            v -= a * a;
        }
        let b = alpha - ny;
        if b > 0.0 {
            v -= b * b;
        }
        v / (2.0 * nx * ny)
    };
    area.clamp(0.0, 1.0)
}

/// Line constant `alpha` such that `line_area(nx, ny, alpha) == c`.
///
/// Inverse of [`line_area`] for a normalized `(nx, ny)`.
pub fn line_alpha(c: f64, nx: f64, ny: f64) -> f64 {
    let (mut n1, mut n2) = (nx.abs(), ny.abs());
    if n1 > n2 {
        std::mem::swap(&mut n1, &mut n2);
    }
    let c = c.clamp(0.0, 1.0);
    let v1 = 0.5 * n1;
    let mut alpha = if c <= v1 / n2 {
        (2.0 * c * n1 * n2).sqrt()
    } else if c <= 1.0 - v1 / n2 {
        c * n2 + v1
    } else {
        n1 + n2 - (2.0 * n1 * n2 * (1.0 - c)).sqrt()
    };
    if nx < 0.0 {
        alpha += nx;
    }
    if ny < 0.0 {
        alpha += ny;
    }
    alpha - 0.5 * (nx + ny)
}

/// Intersections of `n . x = alpha` with the boundary of the unit cell.
///
/// Returns up to two points in cell-local coordinates; a line that only
/// touches a corner or misses the cell yields fewer.
pub fn facet_points(nx: f64, ny: f64, alpha: f64) -> SmallVec<[Point; 2]> {
    let mut points = SmallVec::new();
    for s in [-0.5, 0.5] {
        if ny.abs() > PARALLEL_EPS && points.len() < 2 {
            let a = (alpha - s * nx) / ny;
            if (-0.5..=0.5).contains(&a) {
                points.push(Point::new(s, a));
            }
        }
    }
    for s in [-0.5, 0.5] {
        if nx.abs() > PARALLEL_EPS && points.len() < 2 {
            let a = (alpha - s * ny) / nx;
            if (-0.5..=0.5).contains(&a) {
                points.push(Point::new(a, s));
            }
        }
    }
    points
}
