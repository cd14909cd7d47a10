//! Interface geometry: curvature and PLIC reconstruction.

use droplet_core::plic::{
    facet_points, is_interfacial, line_alpha, youngs_normal, INTERFACE_EPS,
};
use droplet_core::{Cell, EngineError, Facet, FieldId, Point};

use crate::quadtree::QuadGrid;

impl QuadGrid {
    /// 3x3 stencil of field `f` around the virtual cell `(level, i, j)`.
    fn stencil_around(&self, f: usize, level: u8, i: i64, j: i64) -> [[f64; 3]; 3] {
        let mut s = [[0.0; 3]; 3];
        for (a, row) in s.iter_mut().enumerate() {
            for (b, v) in row.iter_mut().enumerate() {
                *v = self.sample(f, level, i + a as i64 - 1, j + b as i64 - 1);
            }
        }
        s
    }

    /// Euclidean unit vector along `-grad f` at `(level, i, j)`, or zero
    /// where the fraction is locally flat.
    fn unit_normal(&self, f: usize, level: u8, i: i64, j: i64) -> (f64, f64) {
        let s = self.stencil_around(f, level, i, j);
        let gx = (s[2][2] + 2.0 * s[2][1] + s[2][0]) - (s[0][2] + 2.0 * s[0][1] + s[0][0]);
        let gy = (s[2][2] + 2.0 * s[1][2] + s[0][2]) - (s[2][0] + 2.0 * s[1][0] + s[0][0]);
        let norm = gx.hypot(gy);
        if norm <= f64::EPSILON {
            return (0.0, 0.0);
        }
        (-gx / norm, -gy / norm)
    }

    pub(crate) fn compute_curvature(
        &mut self,
        vof: FieldId,
        kappa: FieldId,
    ) -> Result<(), EngineError> {
        let f = self.field_index(vof)?;
        let k = self.field_index(kappa)?;
        let result: Vec<f64> = self
            .leaves
            .iter()
            .enumerate()
            .map(|(slot, &key)| {
                if !is_interfacial(self.values[f][slot], INTERFACE_EPS) {
                    return 0.0;
                }
                let (i, j) = (i64::from(key.i), i64::from(key.j));
                let delta = self.delta_at(key.level);
                let (right, _) = self.unit_normal(f, key.level, i + 1, j);
                let (left, _) = self.unit_normal(f, key.level, i - 1, j);
                let (_, up) = self.unit_normal(f, key.level, i, j + 1);
                let (_, down) = self.unit_normal(f, key.level, i, j - 1);
                let planar = (right - left + up - down) / (2.0 * delta);
                let (_, ny) = self.unit_normal(f, key.level, i, j);
                let y = self.extent.y0 + (f64::from(key.j) + 0.5) * delta;
                planar + ny / y
            })
            .collect();
        self.values[k] = result;
        Ok(())
    }

    pub(crate) fn facet(&self, vof: FieldId, cell: &Cell) -> Option<Facet> {
        let f = self.field_index(vof).ok()?;
        let key = *self.leaves.get(cell.id.0)?;
        let value = self.values[f][cell.id.0];
        if !is_interfacial(value, INTERFACE_EPS) {
            return None;
        }
        let (nx, ny) = youngs_normal(&self.stencil3(f, key))?;
        let alpha = line_alpha(value, nx, ny);
        let points = facet_points(nx, ny, alpha);
        let [p0, p1] = points.as_slice() else {
            return None;
        };
        let world = |p: &Point| Point::new(cell.x + cell.delta * p.x, cell.y + cell.delta * p.y);
        Some(Facet {
            p0: world(p0),
            p1: world(p1),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use droplet_core::{level_set_fraction, DomainSpec, Extent, FieldAccess, FlowFields};

    fn disc_grid(level: u8, radius: f64) -> QuadGrid {
        let mut g = QuadGrid::new(&DomainSpec {
            extent: Extent {
                size: 1.0,
                x0: 0.0,
                y0: 0.0,
            },
            level,
            fields: FlowFields::definitions(),
        })
        .unwrap();
        let (cx, cy) = (0.5, 0.0);
        for c in g.active_cells() {
            let frac = level_set_fraction(
                |x, y| radius * radius - (x - cx).powi(2) - (y - cy).powi(2),
                c.x,
                c.y,
                c.delta,
            );
            g.set(FlowFields::STANDARD.f, c.id, frac);
        }
        g
    }

    #[test]
    fn curvature_of_sphere_is_near_two_over_radius() {
        let radius = 0.25;
        let mut g = disc_grid(6, radius);
        let fields = FlowFields::STANDARD;
        g.compute_curvature(fields.f, fields.kappa).unwrap();
        let mut samples: Vec<f64> = g
            .active_cells()
            .iter()
            .filter(|c| c.y > 0.1 && is_interfacial(g.get(fields.f, c.id), INTERFACE_EPS))
            .map(|c| g.get(fields.kappa, c.id) * radius)
            .collect();
        assert!(!samples.is_empty());
        samples.sort_by(f64::total_cmp);
        let median = samples[samples.len() / 2];
        assert!((1.0..=3.0).contains(&median), "median kappa*R = {median}");
    }

    #[test]
    fn curvature_is_zero_away_from_interface() {
        let mut g = disc_grid(4, 0.25);
        let fields = FlowFields::STANDARD;
        for c in g.active_cells() {
            g.set(fields.kappa, c.id, 7.0);
        }
        g.compute_curvature(fields.f, fields.kappa).unwrap();
        let corner = g.locate(0.99, 0.99).unwrap();
        assert_eq!(g.get(fields.kappa, corner), 0.0);
    }

    #[test]
    fn facet_endpoints_lie_on_the_disc() {
        let radius = 0.3;
        let g = disc_grid(6, radius);
        let f = FlowFields::STANDARD.f;
        let facets: Vec<Facet> = g
            .active_cells()
            .iter()
            .filter_map(|c| g.facet(f, c))
            .collect();
        assert!(!facets.is_empty());
        let centre = Point::new(0.5, 0.0);
        for facet in facets {
            let r = facet.midpoint().distance_sq(centre).sqrt();
            assert!((r - radius).abs() < 1.0 / 64.0, "midpoint at r = {r}");
        }
    }

    #[test]
    fn full_and_empty_cells_have_no_facet() {
        let g = disc_grid(4, 0.25);
        let f = FlowFields::STANDARD.f;
        let inside = g.locate(0.5, 0.01).unwrap();
        let outside = g.locate(0.99, 0.99).unwrap();
        let cells = g.active_cells();
        assert!(g.facet(f, &cells[inside.0]).is_none());
        assert!(g.facet(f, &cells[outside.0]).is_none());
    }
}
