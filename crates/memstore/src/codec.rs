//! Binary snapshots of a [`Store`].
//!
//! # Frame
//!
//! ```text
//! [4 bytes: magic "MSTR"]
//! [1 byte:  format version]
//! [4 bytes: big-endian payload length]
//! [N bytes: payload (bincode-serialized entry list)]
//! ```
//!
//! The payload carries every entry's key, value and immutability flag, in
//! storage order. Values are self-describing through their variant tag, so
//! heterogeneous entries round-trip with their original dynamic types. The
//! format is internal: no compatibility across versions is promised.

use std::collections::HashSet;
use std::io::{self, Read, Write};

use memstore_value::ValueKind;
use tracing::{debug, warn};

use crate::config::CodecConfig;
use crate::entry::Entry;
use crate::error::{StoreError, StoreResult};
use crate::registry::Registry;
use crate::store::Store;

/// Leading bytes of every snapshot.
pub const SNAPSHOT_MAGIC: [u8; 4] = *b"MSTR";

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u8 = 1;

const HEADER_LEN: usize = 9;

/// Encodes and decodes store snapshots against a [`Registry`].
#[derive(Clone, Debug, Default)]
pub struct SnapshotCodec {
    registry: Registry,
    config: CodecConfig,
}

impl SnapshotCodec {
    /// Create a codec from a registry and configuration.
    pub fn new(registry: Registry, config: CodecConfig) -> Self {
        Self { registry, config }
    }

    /// The registry consulted on encode and decode.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Write a snapshot of `store` to `sink`.
    pub fn encode<W: Write>(&self, store: &Store, mut sink: W) -> StoreResult<()> {
        let bytes = self.to_bytes(store)?;
        sink.write_all(&bytes)?;
        Ok(())
    }

    /// Encode a snapshot of `store` into a new buffer.
    pub fn to_bytes(&self, store: &Store) -> StoreResult<Vec<u8>> {
        for entry in store.entries() {
            self.registry.check(entry.raw(), self.config.max_depth)?;
        }

        let payload = bincode::serialize(store.entries())
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        if payload.len() > self.config.max_snapshot_size {
            return Err(StoreError::SnapshotTooLarge {
                size: payload.len(),
                max: self.config.max_snapshot_size,
            });
        }
        let len = u32::try_from(payload.len()).map_err(|_| StoreError::SnapshotTooLarge {
            size: payload.len(),
            max: u32::MAX as usize,
        })?;

        let mut buf = Vec::with_capacity(HEADER_LEN + payload.len());
        buf.extend_from_slice(&SNAPSHOT_MAGIC);
        buf.push(SNAPSHOT_VERSION);
        buf.extend_from_slice(&len.to_be_bytes());
        buf.extend_from_slice(&payload);

        debug!(entries = store.len(), bytes = buf.len(), "snapshot encoded");
        Ok(buf)
    }

    /// Read one snapshot from `source`.
    pub fn decode<R: Read>(&self, mut source: R) -> StoreResult<Store> {
        let mut header = [0u8; HEADER_LEN];
        read_exact(&mut source, &mut header, "header")?;

        if header[0..4] != SNAPSHOT_MAGIC {
            return Err(StoreError::InvalidSnapshot("bad magic".into()));
        }
        if header[4] != SNAPSHOT_VERSION {
            return Err(StoreError::InvalidSnapshot(format!(
                "unsupported version {}",
                header[4]
            )));
        }
        let len = u32::from_be_bytes([header[5], header[6], header[7], header[8]]) as usize;
        if len > self.config.max_snapshot_size {
            return Err(StoreError::SnapshotTooLarge {
                size: len,
                max: self.config.max_snapshot_size,
            });
        }

        let mut payload = vec![0u8; len];
        read_exact(&mut source, &mut payload, "payload")?;
        DepthScan::new(&payload, self.config.max_depth).entries()?;
        let entries: Vec<Entry> = bincode::deserialize(&payload)
            .map_err(|e| StoreError::Deserialization(e.to_string()))?;

        let mut seen = HashSet::with_capacity(entries.len());
        for entry in &entries {
            if !seen.insert(entry.key()) {
                return Err(StoreError::InvalidSnapshot(format!(
                    "duplicate key {:?}",
                    entry.key()
                )));
            }
            self.registry.validate(entry.raw(), self.config.max_depth)?;
        }

        debug!(entries = entries.len(), bytes = HEADER_LEN + len, "snapshot decoded");
        Ok(Store::from_entries(entries))
    }

    /// Decode a snapshot from a byte slice.
    pub fn from_bytes(&self, data: &[u8]) -> StoreResult<Store> {
        self.decode(data)
    }
}

/// Walks a bincode-encoded entry list without building any values, so that
/// over-deep nesting is rejected before deserialization recurses into it.
///
/// Variant tags follow declaration order, which `ValueKind::ALL` mirrors.
struct DepthScan<'a> {
    data: &'a [u8],
    pos: usize,
    max_depth: usize,
}

impl<'a> DepthScan<'a> {
    fn new(data: &'a [u8], max_depth: usize) -> Self {
        Self {
            data,
            pos: 0,
            max_depth,
        }
    }

    fn take(&mut self, n: usize) -> StoreResult<&'a [u8]> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|&end| end <= self.data.len())
            .ok_or_else(|| StoreError::Deserialization("unexpected end of payload".into()))?;
        let bytes = &self.data[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    fn skip(&mut self, n: usize) -> StoreResult<()> {
        self.take(n).map(|_| ())
    }

    fn tag(&mut self) -> StoreResult<u32> {
        let b = self.take(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn len(&mut self) -> StoreResult<usize> {
        let mut buf = [0u8; 8];
        buf.copy_from_slice(self.take(8)?);
        usize::try_from(u64::from_le_bytes(buf))
            .map_err(|_| StoreError::Deserialization("length overflows usize".into()))
    }

    fn skip_bytes(&mut self) -> StoreResult<()> {
        let n = self.len()?;
        self.skip(n)
    }

    fn entries(&mut self) -> StoreResult<()> {
        let count = self.len()?;
        for _ in 0..count {
            self.skip_bytes()?;
            self.value(0)?;
            self.skip(1)?;
        }
        Ok(())
    }

    fn value(&mut self, depth: usize) -> StoreResult<()> {
        if depth > self.max_depth {
            return Err(StoreError::InvalidSnapshot(format!(
                "nesting too deep (max {})",
                self.max_depth
            )));
        }
        let tag = self.tag()?;
        let kind = ValueKind::ALL
            .get(tag as usize)
            .copied()
            .ok_or_else(|| StoreError::Deserialization(format!("unknown value tag {tag}")))?;
        match kind {
            ValueKind::String | ValueKind::Time | ValueKind::Bytes => self.skip_bytes(),
            ValueKind::Int => self.skip(4),
            ValueKind::Int64 | ValueKind::Float64 => self.skip(8),
            ValueKind::Bool => self.skip(1),
            ValueKind::List => {
                for _ in 0..self.len()? {
                    self.value(depth + 1)?;
                }
                Ok(())
            }
            ValueKind::Map => {
                for _ in 0..self.len()? {
                    self.skip_bytes()?;
                    self.value(depth + 1)?;
                }
                Ok(())
            }
            ValueKind::Shared => self.value(depth + 1),
            ValueKind::Opaque => {
                self.skip_bytes()?;
                self.skip_bytes()
            }
        }
    }
}

fn read_exact<R: Read>(source: &mut R, buf: &mut [u8], part: &str) -> StoreResult<()> {
    source.read_exact(buf).map_err(|e| match e.kind() {
        io::ErrorKind::UnexpectedEof => StoreError::InvalidSnapshot(format!("truncated {part}")),
        _ => StoreError::Io(e),
    })
}

impl Store {
    /// Write a snapshot to `sink` using the built-in registry.
    pub fn encode<W: Write>(&self, sink: W) -> StoreResult<()> {
        SnapshotCodec::default().encode(self, sink)
    }

    /// Snapshot bytes using the built-in registry.
    ///
    /// Returns an empty buffer if encoding fails; the error is logged and
    /// otherwise dropped. Use [`Store::encode`] or [`SnapshotCodec`] to
    /// observe it.
    pub fn serialize(&self) -> Vec<u8> {
        SnapshotCodec::default().to_bytes(self).unwrap_or_else(|e| {
            warn!(error = %e, "snapshot encoding failed; returning empty buffer");
            Vec::new()
        })
    }

    /// Rebuild a store from snapshot bytes using the built-in registry.
    pub fn deserialize(data: &[u8]) -> StoreResult<Store> {
        SnapshotCodec::default().from_bytes(data)
    }
}
