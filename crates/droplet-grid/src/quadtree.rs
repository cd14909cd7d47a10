//! Leaf storage, geometry and neighbour sampling of [`QuadGrid`].

use std::collections::{BTreeMap, HashMap};

use indexmap::IndexMap;
use smallvec::SmallVec;

use droplet_core::plic::{is_interfacial, line_alpha, line_area, youngs_normal, INTERFACE_EPS};
use droplet_core::{
    Cell, CellId, DomainSpec, EngineError, Extent, FieldAccess, FieldDef, FieldId, Prolongation,
    Side,
};
use droplet_snapshot::LeafKey;

/// Per-leaf values of every field, used while the mesh is being rebuilt.
pub(crate) type LeafValues = SmallVec<[f64; 4]>;

/// Mesh under construction: leaves in canonical order with their values.
pub(crate) type LeafMap = BTreeMap<LeafKey, LeafValues>;

/// An adaptive quadtree over a square domain.
///
/// Only leaf cells are stored. Each leaf is addressed by `(level, i, j)`
/// and carries one value per registered field. Leaves are kept in
/// canonical `(level, i, j)` order; a [`CellId`] is the position of a leaf
/// in that order and is renumbered by every mesh change.
///
/// The tree is not required to be 2:1 balanced. Neighbour values at a
/// given level are sampled from the leaf itself, from a coarser ancestor
/// leaf (prolongated by the field's rule) or by averaging finer leaves
/// (restriction), and
/// outside the domain from ghost values defined by each field's boundary
/// conditions.
///
/// # Examples
///
/// ```
/// use droplet_core::{DomainSpec, Domain, Extent, FieldAccess, FlowFields};
/// use droplet_grid::QuadGrid;
///
/// let spec = DomainSpec {
///     extent: Extent { size: 8.0, x0: 0.0, y0: 0.0 },
///     level: 3,
///     fields: FlowFields::definitions(),
/// };
/// let grid = QuadGrid::establish(&spec).unwrap();
/// assert_eq!(grid.active_cells().len(), 64);
/// assert_eq!(grid.field("u.x"), Some(FlowFields::STANDARD.ux));
/// ```
#[derive(Clone, Debug)]
pub struct QuadGrid {
    pub(crate) extent: Extent,
    pub(crate) fields: IndexMap<String, FieldDef>,
    pub(crate) leaves: Vec<LeafKey>,
    /// `values[field][slot]`.
    pub(crate) values: Vec<Vec<f64>>,
    pub(crate) lookup: HashMap<LeafKey, usize>,
}

impl QuadGrid {
    /// Deepest level the grid will create.
    pub const DEPTH_LIMIT: u8 = 20;

    /// Build a uniform grid at `spec.level` with every field zero.
    pub fn new(spec: &DomainSpec) -> Result<Self, EngineError> {
        let Extent { size, x0, y0 } = spec.extent;
        if !(size.is_finite() && size > 0.0 && x0.is_finite() && y0.is_finite()) {
            return Err(EngineError::InvalidDomain {
                reason: format!("extent {:?} must be finite with positive size", spec.extent),
            });
        }
        if spec.level > Self::DEPTH_LIMIT {
            return Err(EngineError::DepthLimit {
                level: spec.level,
                max: Self::DEPTH_LIMIT,
            });
        }
        if spec.fields.is_empty() {
            return Err(EngineError::InvalidDomain {
                reason: "no fields registered".into(),
            });
        }
        let mut fields = IndexMap::with_capacity(spec.fields.len());
        for def in &spec.fields {
            def.validate()
                .map_err(|reason| EngineError::InvalidDomain { reason })?;
            if fields.insert(def.name.clone(), def.clone()).is_some() {
                return Err(EngineError::InvalidDomain {
                    reason: format!("field '{}' registered twice", def.name),
                });
            }
        }

        let n = 1u32 << spec.level;
        let mut map = LeafMap::new();
        for i in 0..n {
            for j in 0..n {
                map.insert(
                    LeafKey::new(spec.level, i, j),
                    SmallVec::from_elem(0.0, fields.len()),
                );
            }
        }

        let mut grid = Self {
            extent: spec.extent,
            fields,
            leaves: Vec::new(),
            values: Vec::new(),
            lookup: HashMap::new(),
        };
        grid.install(map);
        Ok(grid)
    }

    /// Number of leaf cells.
    pub fn leaf_count(&self) -> usize {
        self.leaves.len()
    }

    /// Deepest level currently present.
    pub fn depth(&self) -> u8 {
        self.leaves.iter().map(|k| k.level).max().unwrap_or(0)
    }

    /// Leaf keys in canonical order; `leaves()[n]` is `CellId(n)`.
    pub fn leaves(&self) -> &[LeafKey] {
        &self.leaves
    }

    /// Registered field definitions in `FieldId` order.
    pub fn field_defs(&self) -> impl Iterator<Item = &FieldDef> {
        self.fields.values()
    }

    /// The leaf containing the point `(x, y)`, if it lies in the domain.
    pub fn locate(&self, x: f64, y: f64) -> Option<CellId> {
        if !self.extent.contains(x, y) {
            return None;
        }
        for level in 0..=self.depth() {
            let n = 1u64 << level;
            let delta = self.extent.size / n as f64;
            let i = (((x - self.extent.x0) / delta) as u64).min(n - 1);
            let j = (((y - self.extent.y0) / delta) as u64).min(n - 1);
            let key = LeafKey::new(level, i as u32, j as u32);
            if let Some(&slot) = self.lookup.get(&key) {
                return Some(CellId(slot));
            }
        }
        None
    }

    // ── Geometry ───────────────────────────────────────────────────

    pub(crate) fn delta_at(&self, level: u8) -> f64 {
        self.extent.size / (1u64 << level) as f64
    }

    pub(crate) fn cell_of(&self, key: LeafKey, id: CellId) -> Cell {
        let delta = self.delta_at(key.level);
        Cell {
            id,
            level: key.level,
            x: self.extent.x0 + (f64::from(key.i) + 0.5) * delta,
            y: self.extent.y0 + (f64::from(key.j) + 0.5) * delta,
            delta,
        }
    }

    pub(crate) fn field_index(&self, field: FieldId) -> Result<usize, EngineError> {
        let idx = field.0 as usize;
        if idx < self.fields.len() {
            Ok(idx)
        } else {
            Err(EngineError::UnknownField { field })
        }
    }

    // ── Sampling ───────────────────────────────────────────────────

    /// Value of field `f` on the virtual cell `(level, i, j)`, which may lie
    /// outside the domain or not be a leaf.
    pub(crate) fn sample(&self, f: usize, level: u8, i: i64, j: i64) -> f64 {
        let n = 1i64 << level;
        let def = &self.fields[f];
        if i < 0 {
            return def.boundary_on(Side::Left).ghost(self.sample(f, level, -1 - i, j));
        }
        if i >= n {
            return def
                .boundary_on(Side::Right)
                .ghost(self.sample(f, level, 2 * n - 1 - i, j));
        }
        if j < 0 {
            return def
                .boundary_on(Side::Bottom)
                .ghost(self.sample(f, level, i, -1 - j));
        }
        if j >= n {
            return def
                .boundary_on(Side::Top)
                .ghost(self.sample(f, level, i, 2 * n - 1 - j));
        }
        self.sample_inside(f, level, i as u32, j as u32)
    }

    fn sample_inside(&self, f: usize, level: u8, i: u32, j: u32) -> f64 {
        if let Some(&slot) = self.lookup.get(&LeafKey::new(level, i, j)) {
            return self.values[f][slot];
        }
        for up in 1..=level {
            let key = LeafKey::new(level - up, i >> up, j >> up);
            if let Some(&slot) = self.lookup.get(&key) {
                return self.prolongate_to(f, key, slot, up, (i, j));
            }
        }
        if level >= Self::DEPTH_LIMIT {
            // Only reachable for a tiling with holes; restore rejects those.
            return 0.0;
        }
        let mut sum = 0.0;
        for (a, b) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
            sum += self.sample_inside(f, level + 1, 2 * i + a, 2 * j + b);
        }
        0.25 * sum
    }

    /// Value of field `f` on the descendant `(i, j)` of leaf `key`, `up`
    /// levels below it, following the field's prolongation rule.
    pub(crate) fn prolongate_to(&self, f: usize, key: LeafKey, slot: usize, up: u8, (i, j): (u32, u32)) -> f64 {
        let value = self.values[f][slot];
        if self.fields[f].prolongation != Prolongation::Fraction
            || !is_interfacial(value, INTERFACE_EPS)
        {
            return value;
        }
        let Some((nx, ny)) = youngs_normal(&self.stencil3(f, key)) else {
            return value;
        };
        let alpha = line_alpha(value, nx, ny);
        let n = f64::from(1u32 << up);
        let mask = (1u32 << up) - 1;
        let cx = (f64::from(i & mask) + 0.5) / n - 0.5;
        let cy = (f64::from(j & mask) + 0.5) / n - 0.5;
        line_area(nx, ny, n * (alpha - nx * cx - ny * cy))
    }

    /// 3x3 stencil of field `f` around `key`; `s[a][b]` is offset `(a-1, b-1)`.
    pub(crate) fn stencil3(&self, f: usize, key: LeafKey) -> [[f64; 3]; 3] {
        let mut s = [[0.0; 3]; 3];
        let (i, j) = (i64::from(key.i), i64::from(key.j));
        for (a, row) in s.iter_mut().enumerate() {
            for (b, v) in row.iter_mut().enumerate() {
                *v = self.sample(f, key.level, i + a as i64 - 1, j + b as i64 - 1);
            }
        }
        s
    }

    // ── Remeshing ──────────────────────────────────────────────────

    /// Current mesh as an editable map.
    pub(crate) fn leaf_map(&self) -> LeafMap {
        self.leaves
            .iter()
            .enumerate()
            .map(|(slot, &key)| {
                let vals = self.values.iter().map(|col| col[slot]).collect();
                (key, vals)
            })
            .collect()
    }

    /// Replace the mesh with `map`, renumbering every leaf.
    pub(crate) fn install(&mut self, map: LeafMap) {
        let field_count = self.fields.len();
        let mut leaves = Vec::with_capacity(map.len());
        let mut values = vec![Vec::with_capacity(map.len()); field_count];
        for (key, vals) in map {
            leaves.push(key);
            for (column, v) in values.iter_mut().zip(vals) {
                column.push(v);
            }
        }
        self.lookup = leaves.iter().enumerate().map(|(s, &k)| (k, s)).collect();
        self.leaves = leaves;
        self.values = values;
    }
}

impl FieldAccess for QuadGrid {
    fn active_cells(&self) -> Vec<Cell> {
        self.leaves
            .iter()
            .enumerate()
            .map(|(slot, &key)| self.cell_of(key, CellId(slot)))
            .collect()
    }

    fn get(&self, field: FieldId, cell: CellId) -> f64 {
        self.values[field.0 as usize][cell.0]
    }

    fn set(&mut self, field: FieldId, cell: CellId, value: f64) {
        self.values[field.0 as usize][cell.0] = value;
    }
}

/// Children of `key` in `(a, b)` quadrant order `(0,0) (1,0) (0,1) (1,1)`.
pub(crate) fn children(key: LeafKey) -> [LeafKey; 4] {
    let (l, i, j) = (key.level + 1, 2 * key.i, 2 * key.j);
    [
        LeafKey::new(l, i, j),
        LeafKey::new(l, i + 1, j),
        LeafKey::new(l, i, j + 1),
        LeafKey::new(l, i + 1, j + 1),
    ]
}

/// Parent of a non-root key.
pub(crate) fn parent(key: LeafKey) -> Option<LeafKey> {
    key.level
        .checked_sub(1)
        .map(|l| LeafKey::new(l, key.i / 2, key.j / 2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use droplet_core::FlowFields;

    fn grid(level: u8) -> QuadGrid {
        QuadGrid::new(&DomainSpec {
            extent: Extent {
                size: 1.0,
                x0: 0.0,
                y0: 0.0,
            },
            level,
            fields: FlowFields::definitions(),
        })
        .unwrap()
    }

    #[test]
    fn uniform_geometry() {
        let g = grid(2);
        let cells = g.active_cells();
        assert_eq!(cells.len(), 16);
        assert_eq!(cells[0].delta, 0.25);
        assert_eq!((cells[0].x, cells[0].y), (0.125, 0.125));
        assert_eq!(g.depth(), 2);
    }

    #[test]
    fn rejects_bad_domains() {
        let mut spec = DomainSpec {
            extent: Extent {
                size: -1.0,
                x0: 0.0,
                y0: 0.0,
            },
            level: 2,
            fields: FlowFields::definitions(),
        };
        assert!(matches!(
            QuadGrid::new(&spec),
            Err(EngineError::InvalidDomain { .. })
        ));
        spec.extent.size = 1.0;
        spec.fields.push(FieldDef::scalar("f"));
        assert!(QuadGrid::new(&spec).is_err());
        spec.fields.clear();
        assert!(QuadGrid::new(&spec).is_err());
    }

    #[test]
    fn ghost_values_follow_boundary_conditions() {
        let mut g = grid(1);
        let f = FlowFields::STANDARD.f;
        let ux = FlowFields::STANDARD.ux;
        for c in g.active_cells() {
            g.set(f, c.id, 0.75);
            g.set(ux, c.id, 2.0);
        }
        // f: Dirichlet 0 on the left.
        assert_eq!(g.sample(0, 1, -1, 0), -0.75);
        // f: Neumann on the bottom.
        assert_eq!(g.sample(0, 1, 0, -1), 0.75);
        // u.x: Neumann everywhere.
        assert_eq!(g.sample(1, 1, 2, 1), 2.0);
    }

    #[test]
    fn sampling_across_levels() {
        let mut g = grid(1);
        let f = FlowFields::STANDARD.f;
        let mut map = g.leaf_map();
        let coarse = LeafKey::new(1, 0, 0);
        let vals = map.remove(&coarse).unwrap();
        for (n, child) in children(coarse).into_iter().enumerate() {
            let mut v = vals.clone();
            v[0] = n as f64;
            map.insert(child, v);
        }
        g.install(map);
        assert_eq!(g.leaf_count(), 7);
        // Restriction: mean of the four children.
        assert_eq!(g.sample(0, 1, 0, 0), 1.5);
        // Injection from a coarser leaf.
        let ux = FlowFields::STANDARD.ux;
        let slot = g.lookup[&LeafKey::new(1, 1, 1)];
        g.set(ux, CellId(slot), 0.25);
        assert_eq!(g.sample(1, 2, 3, 3), 0.25);
    }

    #[test]
    fn fraction_prolongation_across_levels() {
        let mut g = grid(2);
        let f = FlowFields::STANDARD.f;
        // Planar interface at x = 0.3 on a uniform level-2 mesh.
        for c in g.active_cells() {
            let lo = c.x - 0.5 * c.delta;
            g.set(f, c.id, ((0.3 - lo) / c.delta).clamp(0.0, 1.0));
        }
        // Level-4 virtual cells inside the straddling leaf [0.25, 0.5).
        assert!((g.sample(0, 4, 4, 1) - 0.8).abs() < 1e-12);
        assert_eq!(g.sample(0, 4, 5, 1), 0.0);
    }

    #[test]
    fn locate_finds_leaves() {
        let g = grid(3);
        let id = g.locate(0.99, 0.01).unwrap();
        assert_eq!(g.leaves()[id.0], LeafKey::new(3, 7, 0));
        assert!(g.locate(1.5, 0.5).is_none());
    }

    #[test]
    fn parent_and_children_are_inverse() {
        let key = LeafKey::new(3, 5, 2);
        for child in children(key) {
            assert_eq!(parent(child), Some(key));
        }
        assert_eq!(parent(LeafKey::new(0, 0, 0)), None);
    }
}
