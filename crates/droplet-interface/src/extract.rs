//! Facets and footprint height from a single snapshot.

use std::io::{self, Write};
use std::path::Path;

use droplet_core::plic::{is_interfacial, INTERFACE_EPS};
use droplet_core::{
    fmt_g, BoundaryCondition, Clock, Domain, DomainSpec, EngineError, Extent, Facet, FieldDef,
    FieldId, FlowFields, Prolongation, Side,
};

use crate::error::ExtractError;

/// A snapshot restored into its own domain.
#[derive(Debug)]
pub struct LoadedSnapshot<D> {
    /// The restored domain.
    pub domain: D,
    /// Clock stored with the snapshot.
    pub clock: Clock,
    /// The volume-fraction field.
    pub vof: FieldId,
}

/// Restore the snapshot at `path` into a fresh `D`.
///
/// The domain is created with the volume fraction only; every other field
/// in the file comes along as a plain scalar. The fraction's boundary and
/// prolongation are configured with [`configure_vof_boundary`].
pub fn load_snapshot<D: Domain>(path: &Path) -> Result<LoadedSnapshot<D>, ExtractError> {
    let load = |source| ExtractError::Load {
        path: path.to_path_buf(),
        source,
    };
    let mut domain = D::establish(&DomainSpec {
        extent: Extent {
            size: 1.0,
            x0: 0.0,
            y0: 0.0,
        },
        level: 0,
        fields: vec![FieldDef::scalar(FlowFields::VOF)],
    })
    .map_err(load)?;
    let Some(clock) = domain.restore(path).map_err(load)? else {
        return Err(ExtractError::NotFound {
            path: path.to_path_buf(),
        });
    };
    let vof = domain
        .field(FlowFields::VOF)
        .ok_or_else(|| {
            load(EngineError::MissingField {
                name: FlowFields::VOF.to_string(),
            })
        })?;
    configure_vof_boundary(&mut domain, vof).map_err(load)?;
    Ok(LoadedSnapshot { domain, clock, vof })
}

/// No fluid beyond the substrate, fraction-consistent refinement.
pub fn configure_vof_boundary<D: Domain>(domain: &mut D, vof: FieldId) -> Result<(), EngineError> {
    domain.set_boundary(vof, Side::Left, BoundaryCondition::Dirichlet(0.0))?;
    domain.set_prolongation(vof, Prolongation::Fraction)
}

/// Facets of every interface cell whose reconstruction cuts it twice.
pub fn facets<D: Domain>(domain: &D, vof: FieldId) -> Vec<Facet> {
    domain
        .active_cells()
        .iter()
        .filter(|c| is_interfacial(domain.get(vof, c.id), INTERFACE_EPS))
        .filter_map(|c| domain.reconstruct(vof, c))
        .collect()
}

/// Write `facets` as gnuplot segments: `x1 y1`, `x2 y2`, blank line.
pub fn write_facets<W: Write>(out: &mut W, facets: &[Facet]) -> io::Result<()> {
    for f in facets {
        writeln!(out, "{} {}", fmt_g(f.p0.x), fmt_g(f.p0.y))?;
        writeln!(out, "{} {}", fmt_g(f.p1.x), fmt_g(f.p1.y))?;
        writeln!(out)?;
    }
    out.flush()
}

/// Highest facet midpoint among interface cells with `x < x_cutoff`, or
/// zero when there is none.
pub fn footprint_height<D: Domain>(
    domain: &D,
    vof: FieldId,
    x_cutoff: f64,
) -> Result<f64, ExtractError> {
    if !(x_cutoff.is_finite() && x_cutoff > 0.0) {
        return Err(ExtractError::InvalidCutoff { value: x_cutoff });
    }
    Ok(domain.max(0.0, &|c| {
        if c.x >= x_cutoff || !is_interfacial(domain.get(vof, c.id), INTERFACE_EPS) {
            return None;
        }
        domain.reconstruct(vof, c).map(|f| f.midpoint().y)
    }))
}

/// Write one `t,y_max` line.
pub fn write_footprint<W: Write>(out: &mut W, time: f64, y_max: f64) -> io::Result<()> {
    writeln!(out, "{},{}", fmt_g(time), fmt_g(y_max))?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use droplet_core::Point;

    #[test]
    fn facet_lines_are_gnuplot_segments() {
        let mut out = Vec::new();
        let f = Facet {
            p0: Point::new(0.25, 0.5),
            p1: Point::new(0.25, 0.5625),
        };
        write_facets(&mut out, &[f, f]).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "0.25 0.5\n0.25 0.5625\n\n0.25 0.5\n0.25 0.5625\n\n");
    }

    #[test]
    fn footprint_line_is_csv() {
        let mut out = Vec::new();
        write_footprint(&mut out, 0.01, 1.234567).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "0.01,1.23457\n");
    }
}
