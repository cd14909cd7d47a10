//! FNV-1a hashing for snapshot checksums and state comparison.
//!
//! Not cryptographically secure; used to detect truncation and bit rot in
//! snapshot files and for fast equality checks between states.

use crate::types::SnapshotData;

/// FNV-1a offset basis for 64-bit.
const FNV_OFFSET: u64 = 0xcbf29ce484222325;
/// FNV-1a prime for 64-bit.
const FNV_PRIME: u64 = 0x00000100000001B3;

#[inline]
fn fnv1a_bytes(mut hash: u64, bytes: &[u8]) -> u64 {
    for &b in bytes {
        hash = (hash ^ u64::from(b)).wrapping_mul(FNV_PRIME);
    }
    hash
}

#[inline]
fn fnv1a_u64(hash: u64, v: u64) -> u64 {
    fnv1a_bytes(hash, &v.to_le_bytes())
}

/// Checksum of an encoded payload.
pub fn checksum(payload: &[u8]) -> u64 {
    fnv1a_bytes(FNV_OFFSET, payload)
}

/// Hash of the complete state in `data`: clock, extent, field names,
/// leaves and every value's bit pattern.
///
/// Two snapshots hash equal exactly when a dump of either would produce
/// the same bytes (barring collisions).
pub fn snapshot_hash(data: &SnapshotData) -> u64 {
    let mut hash = FNV_OFFSET;
    hash = fnv1a_u64(hash, data.clock.time.to_bits());
    hash = fnv1a_u64(hash, data.clock.iteration);
    for v in [data.extent.size, data.extent.x0, data.extent.y0] {
        hash = fnv1a_u64(hash, v.to_bits());
    }
    for name in &data.fields {
        hash = fnv1a_u64(hash, name.len() as u64);
        hash = fnv1a_bytes(hash, name.as_bytes());
    }
    for leaf in &data.leaves {
        hash = fnv1a_bytes(hash, &[leaf.level]);
        hash = fnv1a_bytes(hash, &leaf.i.to_le_bytes());
        hash = fnv1a_bytes(hash, &leaf.j.to_le_bytes());
    }
    for (k, column) in data.values.iter().enumerate() {
        // Fold in the column index so that swapping columns changes the hash.
        hash = fnv1a_u64(hash, k as u64);
        for v in column {
            hash = fnv1a_u64(hash, v.to_bits());
        }
    }
    hash
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LeafKey;
    use droplet_core::{Clock, Extent};

    fn data(values: Vec<Vec<f64>>) -> SnapshotData {
        SnapshotData {
            clock: Clock::start(),
            extent: Extent {
                size: 1.0,
                x0: 0.0,
                y0: 0.0,
            },
            fields: vec!["a".into(), "b".into()],
            leaves: vec![LeafKey::new(0, 0, 0)],
            values,
        }
    }

    #[test]
    fn empty_payload_checksum_is_offset() {
        assert_eq!(checksum(&[]), FNV_OFFSET);
    }

    #[test]
    fn same_state_same_hash() {
        assert_eq!(
            snapshot_hash(&data(vec![vec![1.0], vec![2.0]])),
            snapshot_hash(&data(vec![vec![1.0], vec![2.0]]))
        );
    }

    #[test]
    fn column_order_matters() {
        assert_ne!(
            snapshot_hash(&data(vec![vec![1.0], vec![2.0]])),
            snapshot_hash(&data(vec![vec![2.0], vec![1.0]]))
        );
    }

    #[test]
    fn signed_zero_is_distinguished() {
        assert_ne!(
            snapshot_hash(&data(vec![vec![0.0], vec![0.0]])),
            snapshot_hash(&data(vec![vec![-0.0], vec![0.0]]))
        );
    }
}
