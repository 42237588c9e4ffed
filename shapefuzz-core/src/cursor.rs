//! Byte cursor: primitive draws over a fuzz input
//!
//! Every draw either advances the position by exactly the bytes it consumed
//! and returns a value, or leaves the cursor untouched and returns an error.

use crate::constants::{DEFAULT_MAX_CONSUMABLE, ENDIAN_CONTROL_SIZE};
use crate::error::Error;
use crate::Result;
use bytes::Bytes;

/// Cursor over an immutable fuzz input
#[derive(Debug, Clone)]
pub struct ByteCursor {
    data: Bytes,
    position: usize,
    max_consumable: usize,
}

impl ByteCursor {
    /// Create a cursor with the default consumption cap
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self::with_max_consumable(data, DEFAULT_MAX_CONSUMABLE)
    }

    /// Create a cursor whose position may never pass `max_consumable`
    pub fn with_max_consumable(data: impl Into<Bytes>, max_consumable: usize) -> Self {
        Self {
            data: data.into(),
            position: 0,
            max_consumable,
        }
    }

    /// Current read offset
    pub fn position(&self) -> usize {
        self.position
    }

    /// Cap on the read offset
    pub fn max_consumable(&self) -> usize {
        self.max_consumable
    }

    /// Total input length
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the input is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Bytes that can still be drawn, honoring both the input length and the cap
    pub fn remaining(&self) -> usize {
        self.data
            .len()
            .min(self.max_consumable)
            .saturating_sub(self.position)
    }

    /// Check if no further byte can be drawn
    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }

    fn ensure(&self, requested: usize) -> Result<()> {
        let available = self.remaining();
        if requested > available {
            return Err(Error::insufficient(requested, available));
        }
        Ok(())
    }

    /// Consume `n` bytes without copying
    fn take(&mut self, n: usize) -> Result<Bytes> {
        self.ensure(n)?;
        let end = self.position.checked_add(n).ok_or(Error::Overflow)?;
        let out = self.data.slice(self.position..end);
        self.position = end;
        Ok(out)
    }

    /// Draw one byte
    pub fn byte(&mut self) -> Result<u8> {
        self.ensure(1)?;
        let b = self.data[self.position];
        self.position += 1;
        Ok(b)
    }

    /// Draw one byte widened to a signed integer
    ///
    /// This is the index and length seed used throughout generation.
    pub fn int_like(&mut self) -> Result<i64> {
        self.byte().map(i64::from)
    }

    /// Draw exactly `n` bytes as an opaque range
    pub fn n_bytes(&mut self, n: usize) -> Result<Bytes> {
        self.take(n)
    }

    /// Draw `N` raw bytes followed by the endianness control byte
    ///
    /// Returns the raw bytes and whether they are little-endian (even control byte).
    fn endian_bytes<const N: usize>(&mut self) -> Result<([u8; N], bool)> {
        self.ensure(N + ENDIAN_CONTROL_SIZE)?;
        let mut raw = [0u8; N];
        raw.copy_from_slice(&self.data[self.position..self.position + N]);
        let control = self.data[self.position + N];
        self.position += N + ENDIAN_CONTROL_SIZE;
        Ok((raw, control % 2 == 0))
    }

    /// Draw a u16: two raw bytes plus an endianness control byte
    pub fn u16(&mut self) -> Result<u16> {
        let (raw, little) = self.endian_bytes::<2>()?;
        Ok(if little {
            u16::from_le_bytes(raw)
        } else {
            u16::from_be_bytes(raw)
        })
    }

    /// Draw a u32
    ///
    /// Deliberately a single seed byte, not a four-byte read, so existing
    /// corpora keep replaying to the same values.
    pub fn u32(&mut self) -> Result<u32> {
        self.byte().map(u32::from)
    }

    /// Draw a u64: eight raw bytes plus an endianness control byte
    pub fn u64(&mut self) -> Result<u64> {
        let (raw, little) = self.endian_bytes::<8>()?;
        Ok(if little {
            u64::from_le_bytes(raw)
        } else {
            u64::from_be_bytes(raw)
        })
    }

    /// Draw an f32 from four raw bytes plus an endianness control byte
    pub fn f32(&mut self) -> Result<f32> {
        let (raw, little) = self.endian_bytes::<4>()?;
        let bits = if little {
            u32::from_le_bytes(raw)
        } else {
            u32::from_be_bytes(raw)
        };
        Ok(f32::from_bits(bits))
    }

    /// Draw an f64 from eight raw bytes plus an endianness control byte
    pub fn f64(&mut self) -> Result<f64> {
        let (raw, little) = self.endian_bytes::<8>()?;
        let bits = if little {
            u64::from_le_bytes(raw)
        } else {
            u64::from_be_bytes(raw)
        };
        Ok(f64::from_bits(bits))
    }

    /// Draw a bool: even byte is true, odd is false
    pub fn bool(&mut self) -> Result<bool> {
        self.byte().map(|b| b % 2 == 0)
    }

    /// Draw a length-prefixed byte range
    ///
    /// The prefix comes from [`ByteCursor::u32`]. A zero length yields an empty
    /// range. A length that does not fit the remaining budget fails and leaves
    /// the prefix unconsumed.
    pub fn length_framed_bytes(&mut self) -> Result<Bytes> {
        let checkpoint = self.position;
        let length = self.u32()? as usize;
        if length == 0 {
            return Ok(Bytes::new());
        }

        match self.framed_payload(length) {
            Ok(payload) => Ok(payload),
            Err(e) => {
                self.position = checkpoint;
                Err(e)
            }
        }
    }

    fn framed_payload(&mut self, length: usize) -> Result<Bytes> {
        let end = self.position.checked_add(length).ok_or(Error::Overflow)?;
        if length > self.max_consumable || end > self.max_consumable {
            return Err(Error::insufficient(length, self.remaining()));
        }
        self.take(length)
    }

    /// Draw a length-prefixed string
    ///
    /// Invalid UTF-8 sequences are replaced, so the same input always yields
    /// the same text.
    pub fn string(&mut self) -> Result<String> {
        let raw = self.length_framed_bytes()?;
        Ok(String::from_utf8_lossy(&raw).into_owned())
    }

    /// Draw a length-prefixed string as characters
    pub fn chars(&mut self) -> Result<Vec<char>> {
        Ok(self.string()?.chars().collect())
    }

    /// Draw a string of exactly `length` characters taken from `alphabet`
    ///
    /// Each character consumes one index seed. Fails before consuming anything
    /// if fewer than `length` bytes remain.
    pub fn string_from_alphabet(&mut self, alphabet: &str, length: usize) -> Result<String> {
        let symbols: Vec<char> = alphabet.chars().collect();
        if symbols.is_empty() && length > 0 {
            return Err(Error::InvalidConfig("alphabet must not be empty".into()));
        }
        let seeds = self.take(length)?;
        Ok(seeds
            .iter()
            .map(|&seed| symbols[seed as usize % symbols.len()])
            .collect())
    }

    /// Split the unread input into a per-call plan
    ///
    /// The first byte is the number of calls `n`, which must lie in
    /// `min_calls..=max_calls`. The next `n` bytes select the calls, and the
    /// rest is divided into `n` equal chunks. The cursor is not advanced.
    pub fn split_calls(&self, min_calls: usize, max_calls: usize) -> Result<CallPlan> {
        let limit = self.data.len().min(self.max_consumable);
        let unread = self.data.slice(self.position.min(limit)..limit);

        let Some(&first) = unread.first() else {
            return Err(Error::InvalidSplit("no input to split".into()));
        };
        let number_of_calls = first as usize;
        if number_of_calls == 0 || number_of_calls < min_calls || number_of_calls > max_calls {
            return Err(Error::InvalidSplit(format!(
                "call count {} outside {}..={}",
                number_of_calls, min_calls, max_calls
            )));
        }
        if unread.len() < 2 * number_of_calls + 1 {
            return Err(Error::InvalidSplit(format!(
                "{} bytes cannot carry {} calls",
                unread.len(),
                number_of_calls
            )));
        }

        let command_part = unread.slice(1..number_of_calls + 1);
        let rest = unread.slice(number_of_calls + 1..);
        if rest.len() % number_of_calls != 0 {
            return Err(Error::InvalidSplit(format!(
                "{} argument bytes do not divide into {} calls",
                rest.len(),
                number_of_calls
            )));
        }

        Ok(CallPlan {
            number_of_calls,
            command_part,
            rest,
        })
    }
}

/// An input divided into a command byte and an argument chunk per call
///
/// Only [`ByteCursor::split_calls`] builds one, so the call count is never zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallPlan {
    number_of_calls: usize,
    command_part: Bytes,
    rest: Bytes,
}

impl CallPlan {
    /// Number of calls encoded in the input
    pub fn number_of_calls(&self) -> usize {
        self.number_of_calls
    }

    /// One selector byte per call
    pub fn command_part(&self) -> &Bytes {
        &self.command_part
    }

    /// Argument bytes, `number_of_calls` equal chunks
    pub fn rest(&self) -> &Bytes {
        &self.rest
    }

    /// Size of each call's argument chunk
    pub fn chunk_len(&self) -> usize {
        self.rest.len() / self.number_of_calls
    }

    /// Iterate `(selector, arguments)` pairs in call order
    pub fn calls(&self) -> impl Iterator<Item = (u8, Bytes)> + '_ {
        let chunk = self.chunk_len();
        self.command_part
            .iter()
            .enumerate()
            .map(move |(i, &selector)| {
                (selector, self.rest.slice(i * chunk..(i + 1) * chunk))
            })
    }
}
