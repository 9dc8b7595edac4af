use crate::error::{Error, Result};

/// A sequential big-endian reader over a byte slice.
///
/// Unlike a [`std::io::Cursor`], reading past the end is reported with the position and the number of missing
/// bytes, and the last byte read can be given back with [`ByteCursor::unread`].
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
	data: &'a [u8],
	offset: usize,
}

impl<'a> ByteCursor<'a> {
	pub fn new(data: &'a [u8]) -> ByteCursor<'a> {
		ByteCursor { data, offset: 0 }
	}

	/// The offset of the next byte to be read.
	pub fn offset(&self) -> usize {
		self.offset
	}

	pub fn remaining(&self) -> usize {
		self.data.len() - self.offset
	}

	pub fn is_empty(&self) -> bool {
		self.remaining() == 0
	}

	pub fn len(&self) -> usize {
		self.data.len()
	}

	/// Moves back by one byte. Does nothing at offset `0`.
	pub fn unread(&mut self) {
		self.offset = self.offset.saturating_sub(1);
	}

	pub fn skip(&mut self, n: usize) -> Result<()> {
		self.take(n).map(|_| ())
	}

	fn take(&mut self, n: usize) -> Result<&'a [u8]> {
		let slice = self.data.get(self.offset..)
			.and_then(|rest| rest.get(..n))
			.ok_or(Error::UnexpectedEndOfStream {
				offset: self.offset,
				needed: n,
				remaining: self.remaining(),
			})?;
		self.offset += n;
		Ok(slice)
	}

	fn read_n<const N: usize>(&mut self) -> Result<[u8; N]> {
		let mut buf = [0u8; N];
		buf.copy_from_slice(self.take(N)?);
		Ok(buf)
	}

	pub fn read_u8(&mut self) -> Result<u8> {
		Ok(u8::from_be_bytes(self.read_n()?))
	}
	pub fn read_u16(&mut self) -> Result<u16> {
		Ok(u16::from_be_bytes(self.read_n()?))
	}
	pub fn read_u32(&mut self) -> Result<u32> {
		Ok(u32::from_be_bytes(self.read_n()?))
	}
	pub fn read_i8(&mut self) -> Result<i8> {
		Ok(i8::from_be_bytes(self.read_n()?))
	}
	pub fn read_i16(&mut self) -> Result<i16> {
		Ok(i16::from_be_bytes(self.read_n()?))
	}
	pub fn read_i32(&mut self) -> Result<i32> {
		Ok(i32::from_be_bytes(self.read_n()?))
	}

	/// Reads one byte without consuming it.
	pub fn peek_u8(&mut self) -> Result<u8> {
		let byte = self.read_u8()?;
		self.unread();
		Ok(byte)
	}
}
