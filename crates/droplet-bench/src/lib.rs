//! Benchmark profiles for Droplet.
//!
//! - [`drop_profile`]: the reference drop, initialized on a quadtree and
//!   refined around the interface up to a chosen level

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use droplet_core::{Domain, DomainSpec, Extent, FlowFields};
use droplet_engine::{initialize_drop, DropSetup};
use droplet_grid::QuadGrid;
use droplet_params::SimulationParams;

/// Reference parameters with the finest level set to `max_level`.
pub fn profile_params(max_level: u8) -> SimulationParams {
    SimulationParams {
        max_level: i32::from(max_level),
        ..SimulationParams::default()
    }
}

/// The reference drop on a level-4 base mesh, refined to `max_level`
/// around the drop.
pub fn drop_profile(max_level: u8) -> QuadGrid {
    let p = profile_params(max_level);
    let mut grid = QuadGrid::establish(&DomainSpec {
        extent: Extent {
            size: p.ldomain,
            x0: 0.0,
            y0: 0.0,
        },
        level: 4,
        fields: FlowFields::definitions(),
    })
    .unwrap();
    let drop = DropSetup::new(&p, max_level);
    grid.refine(&|c| drop.needs_refinement(c)).unwrap();
    initialize_drop(&mut grid, FlowFields::STANDARD, &drop);
    grid
}
