//! Binary encode/decode for the snapshot format.
//!
//! All integers and floats are little-endian. Strings are length-prefixed
//! with a `u32`. The whole payload is followed by its FNV-1a checksum.

use std::io::{Read, Write};

use droplet_core::{Clock, Extent};

use crate::error::SnapshotError;
use crate::hash::checksum;
use crate::types::{LeafKey, SnapshotData};
use crate::{FORMAT_VERSION, MAGIC};

/// Upper bound on a field name, guarding allocations against corrupt
/// length prefixes.
const MAX_NAME_LEN: usize = 1024;
/// Encoded size of one leaf key.
const LEAF_BYTES: usize = 1 + 4 + 4;
/// Bytes before the clock: magic and version.
const PREAMBLE: usize = MAGIC.len() + 1;
/// Size of the trailing checksum.
const CHECKSUM_BYTES: usize = 8;

// ── Primitive writers ───────────────────────────────────────────

fn write_u8(w: &mut dyn Write, v: u8) -> Result<(), SnapshotError> {
    w.write_all(&[v])?;
    Ok(())
}

fn write_u32_le(w: &mut dyn Write, v: u32) -> Result<(), SnapshotError> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

fn write_u64_le(w: &mut dyn Write, v: u64) -> Result<(), SnapshotError> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

fn write_f64_le(w: &mut dyn Write, v: f64) -> Result<(), SnapshotError> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

fn write_length_prefixed_str(w: &mut dyn Write, s: &str) -> Result<(), SnapshotError> {
    let len = u32::try_from(s.len())
        .map_err(|_| SnapshotError::malformed(format!("name of {} bytes", s.len())))?;
    write_u32_le(w, len)?;
    w.write_all(s.as_bytes())?;
    Ok(())
}

// ── Primitive readers ───────────────────────────────────────────

fn read_u8(r: &mut dyn Read) -> Result<u8, SnapshotError> {
    let mut buf = [0u8; 1];
    r.read_exact(&mut buf)?;
    Ok(buf[0])
}

fn read_u32_le(r: &mut dyn Read) -> Result<u32, SnapshotError> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

fn read_u64_le(r: &mut dyn Read) -> Result<u64, SnapshotError> {
    let mut buf = [0u8; 8];
    r.read_exact(&mut buf)?;
    Ok(u64::from_le_bytes(buf))
}

fn read_f64_le(r: &mut dyn Read) -> Result<f64, SnapshotError> {
    let mut buf = [0u8; 8];
    r.read_exact(&mut buf)?;
    Ok(f64::from_le_bytes(buf))
}

fn read_length_prefixed_str(r: &mut dyn Read) -> Result<String, SnapshotError> {
    let len = read_u32_le(r)? as usize;
    if len > MAX_NAME_LEN {
        return Err(SnapshotError::malformed(format!(
            "field name length {len} exceeds {MAX_NAME_LEN}"
        )));
    }
    let mut buf = vec![0u8; len];
    r.read_exact(&mut buf)?;
    String::from_utf8(buf)
        .map_err(|e| SnapshotError::malformed(format!("invalid UTF-8 field name: {e}")))
}

// ── Snapshot encode/decode ──────────────────────────────────────

/// Encode `data` into a complete snapshot file image.
///
/// Fails with [`SnapshotError::Malformed`] if `data` is structurally
/// inconsistent, so a bad state is never persisted.
pub fn encode_snapshot(data: &SnapshotData) -> Result<Vec<u8>, SnapshotError> {
    data.check()?;
    let leaf_count = data.leaves.len();
    let mut buf = Vec::with_capacity(
        PREAMBLE + 64 + leaf_count * (LEAF_BYTES + 8 * data.fields.len()) + CHECKSUM_BYTES,
    );

    buf.write_all(&MAGIC)?;
    write_u8(&mut buf, FORMAT_VERSION)?;

    write_f64_le(&mut buf, data.clock.time)?;
    write_u64_le(&mut buf, data.clock.iteration)?;
    write_f64_le(&mut buf, data.extent.size)?;
    write_f64_le(&mut buf, data.extent.x0)?;
    write_f64_le(&mut buf, data.extent.y0)?;

    let field_count = u32::try_from(data.fields.len())
        .map_err(|_| SnapshotError::malformed("too many fields"))?;
    write_u32_le(&mut buf, field_count)?;
    for name in &data.fields {
        write_length_prefixed_str(&mut buf, name)?;
    }

    write_u64_le(&mut buf, leaf_count as u64)?;
    for leaf in &data.leaves {
        write_u8(&mut buf, leaf.level)?;
        write_u32_le(&mut buf, leaf.i)?;
        write_u32_le(&mut buf, leaf.j)?;
    }

    for column in &data.values {
        for &v in column {
            write_f64_le(&mut buf, v)?;
        }
    }

    let sum = checksum(&buf);
    write_u64_le(&mut buf, sum)?;
    Ok(buf)
}

/// Decode and verify a snapshot file image.
pub fn decode_snapshot(bytes: &[u8]) -> Result<SnapshotData, SnapshotError> {
    if bytes.len() < MAGIC.len() || bytes[..MAGIC.len()] != MAGIC {
        return Err(SnapshotError::InvalidMagic);
    }
    let Some(&version) = bytes.get(MAGIC.len()) else {
        return Err(SnapshotError::malformed("missing format version"));
    };
    if version != FORMAT_VERSION {
        return Err(SnapshotError::UnsupportedVersion { found: version });
    }
    if bytes.len() < PREAMBLE + CHECKSUM_BYTES {
        return Err(SnapshotError::malformed("file shorter than header"));
    }

    let (payload, tail) = bytes.split_at(bytes.len() - CHECKSUM_BYTES);
    let mut stored = [0u8; CHECKSUM_BYTES];
    stored.copy_from_slice(tail);
    let stored = u64::from_le_bytes(stored);
    let computed = checksum(payload);
    if stored != computed {
        return Err(SnapshotError::ChecksumMismatch { stored, computed });
    }

    let mut r: &[u8] = &payload[PREAMBLE..];

    let clock = Clock {
        time: read_f64_le(&mut r)?,
        iteration: read_u64_le(&mut r)?,
    };
    let extent = Extent {
        size: read_f64_le(&mut r)?,
        x0: read_f64_le(&mut r)?,
        y0: read_f64_le(&mut r)?,
    };

    let field_count = read_u32_le(&mut r)? as usize;
    // Every name needs at least its 4-byte prefix.
    if field_count > r.len() / 4 {
        return Err(SnapshotError::malformed(format!(
            "field count {field_count} exceeds payload"
        )));
    }
    let mut fields = Vec::with_capacity(field_count);
    for _ in 0..field_count {
        fields.push(read_length_prefixed_str(&mut r)?);
    }

    let leaf_count = usize::try_from(read_u64_le(&mut r)?)
        .map_err(|_| SnapshotError::malformed("leaf count overflows usize"))?;
    let per_leaf = LEAF_BYTES + 8 * field_count;
    if leaf_count.checked_mul(per_leaf) != Some(r.len()) {
        return Err(SnapshotError::malformed(format!(
            "{} payload bytes for {leaf_count} leaves and {field_count} fields",
            r.len()
        )));
    }
    let mut leaves = Vec::with_capacity(leaf_count);
    for _ in 0..leaf_count {
        leaves.push(LeafKey {
            level: read_u8(&mut r)?,
            i: read_u32_le(&mut r)?,
            j: read_u32_le(&mut r)?,
        });
    }

    let mut values = Vec::with_capacity(field_count);
    for _ in 0..field_count {
        let mut column = Vec::with_capacity(leaf_count);
        for _ in 0..leaf_count {
            column.push(read_f64_le(&mut r)?);
        }
        values.push(column);
    }

    let data = SnapshotData {
        clock,
        extent,
        fields,
        leaves,
        values,
    };
    data.check()?;
    Ok(data)
}
