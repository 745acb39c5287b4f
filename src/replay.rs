//! Replay codec
//!
//! Serializes the ordered drop-input list into the compact transport form
//! persisted per session. Ticks are strictly increasing, so consecutive
//! inputs are stored as base-128 varint gaps; typical sessions encode in a
//! couple of bytes per drop. Decoding is total: malformed bytes come back
//! as a typed error, never a panic or corrupted data.

use thiserror::Error;

use crate::sim::DropInput;

/// Why a replay byte stream failed to decode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The stream ended before the declared inputs were read
    #[error("unexpected end of replay data")]
    UnexpectedEof,
    /// A varint ran past 64 bits
    #[error("varint exceeds 64 bits")]
    VarintOverflow,
    /// Bytes remained after the last declared input
    #[error("{0} trailing byte(s) after the last input")]
    TrailingBytes(usize),
    /// Accumulated ticks overflowed u64
    #[error("tick overflow while accumulating deltas")]
    TickOverflow,
}

/// Encode a well-ordered input list
///
/// Layout: varint input count, the first tick as a varint, then each
/// subsequent input as `gap - 1` (gaps are at least one tick, so the
/// common rapid-fire case stays single-byte).
pub fn encode(inputs: &[DropInput]) -> Vec<u8> {
    debug_assert!(
        inputs.windows(2).all(|w| w[0].tick < w[1].tick),
        "replay inputs must be strictly increasing by tick"
    );

    let mut buf = Vec::with_capacity(inputs.len() * 2 + 2);
    write_varint(&mut buf, inputs.len() as u64);
    let mut prev: Option<u64> = None;
    for input in inputs {
        let value = match prev {
            None => input.tick,
            Some(p) => input.tick - p - 1,
        };
        write_varint(&mut buf, value);
        prev = Some(input.tick);
    }
    buf
}

/// Decode a replay byte stream
///
/// Inverse of [`encode`]: `decode(&encode(x)) == Ok(x)` for every
/// well-formed `x`. Non-monotonic tick sequences are unrepresentable by
/// construction; every other malformation maps to a [`DecodeError`].
pub fn decode(bytes: &[u8]) -> Result<Vec<DropInput>, DecodeError> {
    let mut cursor = bytes;
    let count = read_varint(&mut cursor)? as usize;

    // Each remaining input takes at least one byte; reject absurd counts
    // before allocating
    if count > cursor.len() {
        return Err(DecodeError::UnexpectedEof);
    }

    let mut inputs = Vec::with_capacity(count);
    let mut tick = 0u64;
    for i in 0..count {
        let value = read_varint(&mut cursor)?;
        tick = if i == 0 {
            value
        } else {
            tick.checked_add(value)
                .and_then(|t| t.checked_add(1))
                .ok_or(DecodeError::TickOverflow)?
        };
        inputs.push(DropInput { tick });
    }

    if !cursor.is_empty() {
        return Err(DecodeError::TrailingBytes(cursor.len()));
    }
    Ok(inputs)
}

fn write_varint(buf: &mut Vec<u8>, mut value: u64) {
    loop {
        let byte = (value & 0x7f) as u8;
        value >>= 7;
        if value == 0 {
            buf.push(byte);
            return;
        }
        buf.push(byte | 0x80);
    }
}

fn read_varint(cursor: &mut &[u8]) -> Result<u64, DecodeError> {
    let mut value = 0u64;
    let mut shift = 0u32;
    loop {
        let Some((&byte, rest)) = cursor.split_first() else {
            return Err(DecodeError::UnexpectedEof);
        };
        *cursor = rest;
        let bits = (byte & 0x7f) as u64;
        // The tenth byte may only carry the top bit of a u64
        if shift > 63 || (shift == 63 && bits > 1) {
            return Err(DecodeError::VarintOverflow);
        }
        value |= bits << shift;
        if byte & 0x80 == 0 {
            return Ok(value);
        }
        shift += 7;
    }
}
