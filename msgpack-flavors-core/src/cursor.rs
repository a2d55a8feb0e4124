//! Streaming decoder: a `Cursor` over a byte slice that tracks container
//! nesting so callers can read maps/arrays element by element and bail out
//! of a container early with [`Cursor::break_out`] in O(1) whenever the
//! wire carries a length-prefix, flavor-pick or injection wrapper around it.

use crate::decode::{self, MAX_DEPTH};
use crate::error::{Error, Result};
use crate::formats::Format;
use crate::options::DecodeOptions;
use crate::value::Timestamp;
use alloc::vec::Vec;

struct Frame<'a> {
    /// Decode operations still owed before this container is fully consumed
    /// (a map pair counts as two: key then value).
    remaining: usize,
    /// Absolute offset to jump to once this frame closes, valid only when
    /// `force_jump` is set.
    end: usize,
    /// Whether this frame's visible framing is authoritative and must be
    /// jumped to rather than derived from walking its elements (set for
    /// length-prefix/flavor/injection wrappers).
    force_jump: bool,
    /// Set when this container's elements live in a different buffer than
    /// the one active when the frame was opened (an injection). Holds the
    /// `(buffer, offset)` to restore once the frame closes, overriding
    /// `force_jump`/`end`.
    return_to: Option<(&'a [u8], usize)>,
}

/// A streaming position within a MessagePack buffer, with container nesting
/// tracked on an explicit stack instead of the call stack.
pub struct Cursor<'a> {
    buf: &'a [u8],
    offset: usize,
    stack: Vec<Frame<'a>>,
}

impl<'a> Cursor<'a> {
    /// Start a cursor at the beginning of `buf`.
    pub fn new(buf: &'a [u8]) -> Self {
        Self {
            buf,
            offset: 0,
            stack: Vec::new(),
        }
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> &'a [u8] {
        &self.buf[self.offset..]
    }

    /// Current absolute offset into the original buffer.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Nesting depth (number of open containers).
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Peek the format of the next value without consuming it.
    pub fn peek_type(&self) -> Option<Format> {
        decode::peek_format(self.remaining())
    }

    fn consumed_one(&mut self) {
        while let Some(top) = self.stack.last_mut() {
            if top.remaining == 0 {
                break;
            }
            top.remaining -= 1;
            if top.remaining == 0 {
                let frame = self.stack.pop().expect("just checked non-empty");
                if let Some((buf, offset)) = frame.return_to {
                    self.buf = buf;
                    self.offset = offset;
                } else if frame.force_jump {
                    self.offset = frame.end;
                }
                continue;
            }
            break;
        }
    }

    /// Open a container frame. `switch`, when `Some`, is a buffer the
    /// container's elements actually live in (an injection); `consumed` is
    /// then an offset into `switch` rather than into the currently active
    /// buffer, and the cursor switches onto it until the frame closes.
    fn enter_container(
        &mut self,
        elements: usize,
        consumed: usize,
        fast_skip_end: usize,
        force_jump: bool,
        switch: Option<&'a [u8]>,
    ) {
        let abs_end = self.offset + fast_skip_end;
        let return_to = switch.map(|buf| {
            let restore = (self.buf, abs_end);
            self.buf = buf;
            self.offset = consumed;
            restore
        });
        if return_to.is_none() {
            self.offset += consumed;
        }
        if elements == 0 {
            // Nothing to iterate; treat the (empty) container as already done.
            match return_to {
                Some((buf, offset)) => {
                    self.buf = buf;
                    self.offset = offset;
                }
                None if force_jump => self.offset = abs_end,
                None => {}
            }
            self.consumed_one();
            return;
        }
        self.stack.push(Frame {
            remaining: elements,
            end: abs_end,
            force_jump,
            return_to,
        });
    }

    /// Start reading a map, returning the number of key/value pairs.
    pub fn decode_map_len(&mut self, opts: &DecodeOptions<'a>) -> Result<usize> {
        if self.stack.len() > MAX_DEPTH {
            return Err(Error::CorruptInput);
        }
        let (n, consumed, end, force_jump, switch) = decode::decode_map_len(self.remaining(), opts)?;
        self.enter_container(n.saturating_mul(2), consumed, end, force_jump, switch);
        Ok(n)
    }

    /// Start reading an array, returning its length.
    pub fn decode_array_len(&mut self, opts: &DecodeOptions<'a>) -> Result<usize> {
        if self.stack.len() > MAX_DEPTH {
            return Err(Error::CorruptInput);
        }
        let (n, consumed, end, force_jump, switch) = decode::decode_array_len(self.remaining(), opts)?;
        self.enter_container(n, consumed, end, force_jump, switch);
        Ok(n)
    }

    /// Abandon the innermost open container, skipping any unread elements.
    /// O(1) when the container was opened through a length-prefix, flavor
    /// pick, or injection wrapper; otherwise walks and discards the
    /// remaining elements one at a time.
    pub fn break_out(&mut self) -> Result<()> {
        let frame = self.stack.pop().ok_or(Error::CorruptInput)?;
        match frame.return_to {
            Some((buf, offset)) => {
                self.buf = buf;
                self.offset = offset;
            }
            None if frame.force_jump => self.offset = frame.end,
            None => {
                self.offset = decode::skip_multiple(self.buf, self.offset, frame.remaining)?;
            }
        }
        self.consumed_one();
        Ok(())
    }

    /// Skip the next value without interpreting it.
    pub fn skip(&mut self) -> Result<()> {
        let len = decode::value_length(self.remaining())?;
        self.offset += len;
        self.consumed_one();
        Ok(())
    }

    /// Return the raw bytes of the next value without interpreting it, and
    /// advance past them. Useful for callers that want to re-store a
    /// sub-document verbatim (e.g. the resolver).
    pub fn decode_raw_value(&mut self) -> Result<&'a [u8]> {
        let len = decode::value_length(self.remaining())?;
        let bytes = &self.remaining()[..len];
        self.offset += len;
        self.consumed_one();
        Ok(bytes)
    }

    /// Produce a new cursor over the next value's byte run without
    /// interpreting it, advancing this cursor past it. The returned cursor
    /// starts fresh with no open containers; drive it with the same
    /// [`DecodeOptions`] as this one.
    pub fn decode_lazy(&mut self) -> Result<Cursor<'a>> {
        let bytes = self.decode_raw_value()?;
        Ok(Cursor::new(bytes))
    }

    /// Decode a `bool`.
    pub fn decode_bool(&mut self, opts: &DecodeOptions<'a>) -> Result<bool> {
        let (v, rest) = decode::decode_bool(self.remaining(), opts)?;
        self.advance_to(rest);
        Ok(v)
    }

    /// Decode any integer or float as an `i64`, truncating floats.
    pub fn decode_int(&mut self, opts: &DecodeOptions<'a>) -> Result<i64> {
        let (v, rest) = decode::decode_int(self.remaining(), opts)?;
        self.advance_to(rest);
        Ok(v)
    }

    /// Decode any integer or float as an `f32`.
    pub fn decode_float32(&mut self, opts: &DecodeOptions<'a>) -> Result<f32> {
        let (v, rest) = decode::decode_float32(self.remaining(), opts)?;
        self.advance_to(rest);
        Ok(v)
    }

    /// Decode any integer or float as an `f64`.
    pub fn decode_float64(&mut self, opts: &DecodeOptions<'a>) -> Result<f64> {
        let (v, rest) = decode::decode_float64(self.remaining(), opts)?;
        self.advance_to(rest);
        Ok(v)
    }

    /// Decode a UTF-8 string, resolving interned strings against `opts.dict`.
    pub fn decode_string(&mut self, opts: &DecodeOptions<'a>) -> Result<&'a str> {
        let (v, rest) = decode::decode_string(self.remaining(), opts)?;
        self.advance_to(rest);
        Ok(v)
    }

    /// Decode raw bytes, accepting both `bin` and `str` framings.
    pub fn decode_raw(&mut self, opts: &DecodeOptions<'a>) -> Result<&'a [u8]> {
        let (v, rest) = decode::decode_raw(self.remaining(), opts)?;
        self.advance_to(rest);
        Ok(v)
    }

    /// Decode a standard MessagePack timestamp.
    pub fn decode_timestamp(&mut self, opts: &DecodeOptions<'a>) -> Result<Timestamp> {
        let (v, rest) = decode::decode_timestamp(self.remaining(), opts)?;
        self.advance_to(rest);
        Ok(v)
    }

    fn advance_to(&mut self, rest: &'a [u8]) {
        self.offset = self.buf.len() - rest.len();
        self.consumed_one();
    }
}
