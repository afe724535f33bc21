//! Length-prefixed binary wire format.
//!
//! Layout primitives: LEB128 varints, varint-length-prefixed UTF-8 strings,
//! and single tag bytes. The reader validates remaining length before every
//! fetch, so truncated buffers surface as [`ProtocolError::UnexpectedEof`]
//! rather than panics.

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::ProtocolError;

/// Maximum encoded width of a varint (u64, 7 payload bits per byte).
const MAX_VARINT_BYTES: usize = 10;

/// Growable writer for the wire format.
#[derive(Debug, Default)]
pub struct WireWriter {
	buf: BytesMut,
}

impl WireWriter {
	/// Creates an empty writer.
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends an LEB128 varint.
	pub fn put_varint(&mut self, mut value: u64) {
		loop {
			let byte = (value & 0x7f) as u8;
			value >>= 7;
			if value == 0 {
				self.buf.put_u8(byte);
				return;
			}
			self.buf.put_u8(byte | 0x80);
		}
	}

	/// Appends a varint length prefix followed by the UTF-8 bytes.
	pub fn put_str(&mut self, s: &str) {
		self.put_varint(s.len() as u64);
		self.buf.put_slice(s.as_bytes());
	}

	/// Appends a single tag byte.
	pub fn put_tag(&mut self, tag: u8) {
		self.buf.put_u8(tag);
	}

	/// Freezes the accumulated bytes.
	#[must_use]
	pub fn finish(self) -> Bytes {
		self.buf.freeze()
	}
}

/// Cursor over a received wire buffer.
#[derive(Debug)]
pub struct WireReader<'a> {
	buf: &'a [u8],
}

impl<'a> WireReader<'a> {
	/// Wraps a received buffer.
	pub fn new(buf: &'a [u8]) -> Self {
		Self { buf }
	}

	/// Bytes not yet consumed.
	#[must_use]
	pub fn remaining(&self) -> usize {
		self.buf.len()
	}

	/// Reads an LEB128 varint.
	pub fn get_varint(&mut self) -> Result<u64, ProtocolError> {
		let mut value = 0u64;
		for shift in 0..MAX_VARINT_BYTES {
			if !self.buf.has_remaining() {
				return Err(ProtocolError::UnexpectedEof);
			}
			let byte = self.buf.get_u8();
			value |= u64::from(byte & 0x7f) << (7 * shift);
			if byte & 0x80 == 0 {
				return Ok(value);
			}
		}
		Err(ProtocolError::VarIntTooLong)
	}

	/// Reads a varint-length-prefixed UTF-8 string.
	pub fn get_str(&mut self) -> Result<String, ProtocolError> {
		let len = self.get_varint()?;
		if len > self.buf.len() as u64 {
			return Err(ProtocolError::UnexpectedEof);
		}
		let rest = self.buf;
		let (head, tail) = rest.split_at(len as usize);
		let s = std::str::from_utf8(head)
			.map_err(|_| ProtocolError::InvalidUtf8)?
			.to_owned();
		self.buf = tail;
		Ok(s)
	}

	/// Reads a single tag byte.
	pub fn get_tag(&mut self) -> Result<u8, ProtocolError> {
		if !self.buf.has_remaining() {
			return Err(ProtocolError::UnexpectedEof);
		}
		Ok(self.buf.get_u8())
	}

	/// Fails unless the buffer is fully consumed.
	pub fn expect_end(&self) -> Result<(), ProtocolError> {
		if self.buf.is_empty() {
			Ok(())
		} else {
			Err(ProtocolError::TrailingBytes(self.buf.len()))
		}
	}
}
