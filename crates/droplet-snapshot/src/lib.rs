//! Binary snapshot format for Droplet simulations.
//!
//! A snapshot captures everything needed to resume a run: the scheduler
//! clock, the domain extent, the field layout, the adaptive mesh (as a
//! list of leaf cells) and one value per field per leaf. The canonical
//! restart file and the archival copies share this format.
//!
//! # Format
//!
//! ```text
//! [MAGIC "DROP"] [VERSION u8]
//! [time f64] [iteration u64]
//! [size f64] [x0 f64] [y0 f64]
//! [field_count u32] [name: u32 len + UTF-8] * field_count
//! [leaf_count u64] [level u8, i u32, j u32] * leaf_count
//! [f64 * leaf_count] * field_count
//! [FNV-1a checksum u64 over everything above]
//! ```
//!
//! All integers and floats are little-endian.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod codec;
pub mod error;
pub mod file;
pub mod hash;
pub mod types;

pub use codec::{decode_snapshot, encode_snapshot};
pub use error::SnapshotError;
pub use file::{read_snapshot, write_snapshot};
pub use hash::snapshot_hash;
pub use types::{LeafKey, SnapshotData};

/// Magic bytes at the start of every snapshot file.
pub const MAGIC: [u8; 4] = *b"DROP";

/// Current binary format version.
pub const FORMAT_VERSION: u8 = 1;
