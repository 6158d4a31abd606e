//! Copy/insert delta encoding between two snapshots.
//!
//! A delta starts with a header describing both ends:
//!
//! | field      | encoding                  |
//! |------------|---------------------------|
//! | `from_len` | unsigned varint           |
//! | checksum   | CRC-32 of `from`, u32 LE  |
//! | `to_len`   | unsigned varint           |
//!
//! followed by ops until `to_len` bytes are produced. Each op starts with
//! the varint `length << 1 | kind`:
//!
//! * kind 0, literal: `length` raw bytes follow.
//! * kind 1, copy: a zigzag varint follows, the source offset relative to
//!   the cursor. The cursor is where the source would continue if every
//!   literal had overwritten bytes in place, so a field edited in place
//!   costs a zero offset.
//!
//! Encoding makes no assumption about where fields sit: runs of `to` are
//! found in `from` wherever they are, so variable length members that grow
//! or shrink only shift the offsets that follow them.

use std::collections::HashMap;

use log::trace;

use replica_serde::{
    zigzag_decode, zigzag_encode, ByteReader, ByteWrite, ByteWriter, Serde,
    UnsignedVariableInteger,
};

use crate::config::{DeltaConfig, ANCHOR_WIDTH};

use super::{
    error::DeltaError,
    snapshot::{Delta, Snapshot},
};

const LITERAL: u64 = 0;
const COPY: u64 = 1;

/// Computes a delta between two snapshots with the default configuration
pub fn compute_delta(from: &Snapshot, to: &Snapshot) -> Delta {
    DeltaCodec::default().compute_delta(from, to)
}

/// Rebuilds `to` from `from` and a delta computed against it
pub fn apply_patch(from: &Snapshot, delta: &Delta) -> Result<Snapshot, DeltaError> {
    DeltaCodec::default().apply_patch(from, delta)
}

/// Greedy copy/insert codec. Deterministic: the same pair of snapshots
/// always produces the same bytes.
#[derive(Clone, Debug, Default)]
pub struct DeltaCodec {
    config: DeltaConfig,
}

impl DeltaCodec {
    pub fn new(config: DeltaConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DeltaConfig {
        &self.config
    }

    pub fn compute_delta(&self, from: &Snapshot, to: &Snapshot) -> Delta {
        let mut writer = ByteWriter::with_capacity(to.len() / 2 + 16);
        write_header(&mut writer, from.as_bytes(), to.len());

        let ops = self.encode_ops(from.as_bytes(), to.as_bytes());
        let literal_len = literal_op_len(to.len());
        if ops.len() < literal_len {
            writer.write_bytes(ops.as_slice());
        } else {
            trace!(
                "Delta: copy ops ({} bytes) not smaller than one literal ({} bytes), sending literal",
                ops.len(),
                literal_len
            );
            write_literal(&mut writer, to.as_bytes());
        }

        Delta::new(writer.to_bytes())
    }

    pub fn apply_patch(&self, from: &Snapshot, delta: &Delta) -> Result<Snapshot, DeltaError> {
        let from = from.as_bytes();
        let mut reader = ByteReader::new(delta.as_bytes());

        let expected_len = UnsignedVariableInteger::read_usize(&mut reader)?;
        let expected_checksum = u32::de(&mut reader)?;
        let actual_checksum = crc32fast::hash(from);
        if expected_len != from.len() || expected_checksum != actual_checksum {
            return Err(DeltaError::BaselineMismatch {
                expected_len,
                actual_len: from.len(),
                expected_checksum,
                actual_checksum,
            });
        }
        let to_len = UnsignedVariableInteger::read_usize(&mut reader)?;

        let mut output = Vec::with_capacity(to_len.min(from.len() + reader.remaining()));
        let mut cursor: usize = 0;
        while output.len() < to_len {
            let position = reader.position();
            let op = UnsignedVariableInteger::de(&mut reader)?.get();
            let length = usize::try_from(op >> 1).unwrap_or(usize::MAX);
            if length == 0 {
                return Err(DeltaError::EmptyOp { position });
            }
            if length > to_len - output.len() {
                return Err(DeltaError::LengthMismatch {
                    expected: to_len,
                    actual: output.len().saturating_add(length),
                });
            }

            if op & 1 == LITERAL {
                output.extend_from_slice(reader.read_bytes(length)?);
                cursor = cursor.saturating_add(length);
            } else {
                let relative = zigzag_decode(UnsignedVariableInteger::de(&mut reader)?.get());
                let start = copy_start(cursor, relative, length, from.len()).ok_or(
                    DeltaError::CopyOutOfRange {
                        cursor,
                        relative,
                        length,
                        from_len: from.len(),
                    },
                )?;
                output.extend_from_slice(&from[start..start + length]);
                cursor = start + length;
            }
        }

        if !reader.is_finished() {
            return Err(DeltaError::TrailingBytes {
                remaining: reader.remaining(),
            });
        }

        Ok(Snapshot::new(output))
    }

    fn encode_ops(&self, from: &[u8], to: &[u8]) -> ByteWriter {
        let min_match = self.config.effective_min_match();
        let max_candidates = self.config.effective_max_candidates();
        let anchors = AnchorIndex::new(from);

        let mut writer = ByteWriter::new();
        let mut cursor: usize = 0;
        let mut literal_start: usize = 0;
        let mut position: usize = 0;

        while position + ANCHOR_WIDTH <= to.len() {
            let target = &to[position..];
            let mut best: Option<(usize, usize)> = None;
            let mut consider = |offset: usize| {
                let length = match_len(&from[offset..], target);
                if length >= min_match && best.map_or(true, |(_, longest)| length > longest) {
                    best = Some((offset, length));
                }
            };

            // continuing in place is cheapest, so it is tried first and wins ties
            let continuation = cursor + (position - literal_start);
            if continuation < from.len() {
                consider(continuation);
            }
            for offset in anchors.candidates(target).take(max_candidates) {
                consider(offset);
            }

            let Some((offset, length)) = best else {
                position += 1;
                continue;
            };

            if literal_start < position {
                write_literal(&mut writer, &to[literal_start..position]);
                cursor += position - literal_start;
            }
            write_copy(&mut writer, offset, length, cursor);
            cursor = offset + length;
            position += length;
            literal_start = position;
        }

        if literal_start < to.len() {
            write_literal(&mut writer, &to[literal_start..]);
        }

        writer
    }
}

// Positions of every ANCHOR_WIDTH-byte window of the baseline, ascending
struct AnchorIndex {
    positions: HashMap<[u8; ANCHOR_WIDTH], Vec<usize>>,
}

impl AnchorIndex {
    fn new(from: &[u8]) -> Self {
        let mut positions: HashMap<[u8; ANCHOR_WIDTH], Vec<usize>> = HashMap::new();
        for (offset, window) in from.windows(ANCHOR_WIDTH).enumerate() {
            let mut anchor = [0; ANCHOR_WIDTH];
            anchor.copy_from_slice(window);
            positions.entry(anchor).or_default().push(offset);
        }
        Self { positions }
    }

    fn candidates(&self, target: &[u8]) -> impl Iterator<Item = usize> + '_ {
        let mut anchor = [0; ANCHOR_WIDTH];
        anchor.copy_from_slice(&target[..ANCHOR_WIDTH]);
        self.positions
            .get(&anchor)
            .map(|offsets| offsets.as_slice())
            .unwrap_or_default()
            .iter()
            .copied()
    }
}

fn match_len(source: &[u8], target: &[u8]) -> usize {
    source
        .iter()
        .zip(target)
        .take_while(|(source_byte, target_byte)| source_byte == target_byte)
        .count()
}

fn copy_start(cursor: usize, relative: i64, length: usize, from_len: usize) -> Option<usize> {
    let start = i64::try_from(cursor).ok()?.checked_add(relative)?;
    let start = usize::try_from(start).ok()?;
    let end = start.checked_add(length)?;
    (end <= from_len).then_some(start)
}

fn write_header(writer: &mut dyn ByteWrite, from: &[u8], to_len: usize) {
    UnsignedVariableInteger::write_usize(from.len(), writer);
    crc32fast::hash(from).ser(writer);
    UnsignedVariableInteger::write_usize(to_len, writer);
}

fn write_literal(writer: &mut dyn ByteWrite, bytes: &[u8]) {
    if bytes.is_empty() {
        return;
    }
    UnsignedVariableInteger::new(((bytes.len() as u64) << 1) | LITERAL).ser(writer);
    writer.write_bytes(bytes);
}

fn write_copy(writer: &mut dyn ByteWrite, offset: usize, length: usize, cursor: usize) {
    UnsignedVariableInteger::new(((length as u64) << 1) | COPY).ser(writer);
    let relative = offset as i64 - cursor as i64;
    UnsignedVariableInteger::new(zigzag_encode(relative)).ser(writer);
}

fn literal_op_len(length: usize) -> usize {
    if length == 0 {
        return 0;
    }
    UnsignedVariableInteger::new((length as u64) << 1).byte_length() as usize + length
}
