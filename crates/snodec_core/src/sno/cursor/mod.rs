use std::io::{self, Read, Seek, SeekFrom};

use crate::sno::{Result, SnoError};

/// Byte order for a single read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endianness {
	/// Little-endian byte order.
	Little,
	/// Big-endian byte order.
	Big,
}

/// Reference point for [`Cursor::seek`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Whence {
	/// Relative to the virtual origin.
	Start,
	/// Relative to the current position.
	Current,
	/// Relative to the end of the stream.
	End,
}

/// Seekable reader with a rebasable virtual origin.
///
/// Every position reported or accepted with [`Whence::Start`] is relative to
/// the origin. Records and catalogs store offsets relative to the end of their
/// own header, so decoders call [`Cursor::rebase`] once the header is read.
pub struct Cursor<R> {
	inner: R,
	origin: u64,
}

impl Cursor<io::Cursor<Vec<u8>>> {
	/// Create a cursor over an owned byte buffer.
	pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
		Self::new(io::Cursor::new(bytes.into()))
	}
}

impl<R: Read + Seek> Cursor<R> {
	/// Wrap a stream; the origin is absolute byte 0.
	pub fn new(inner: R) -> Self {
		Self { inner, origin: 0 }
	}

	/// Unwrap the underlying stream.
	pub fn into_inner(self) -> R {
		self.inner
	}

	/// Absolute byte offset of the virtual origin.
	pub fn origin(&self) -> u64 {
		self.origin
	}

	/// Current position relative to the virtual origin.
	pub fn position(&mut self) -> Result<u64> {
		let abs = self.inner.stream_position()?;
		abs.checked_sub(self.origin).ok_or(SnoError::SeekBeforeOrigin {
			target: abs as i64 - self.origin as i64,
			origin: self.origin,
		})
	}

	/// Current absolute position in the underlying stream.
	pub fn absolute_position(&mut self) -> Result<u64> {
		Ok(self.inner.stream_position()?)
	}

	/// Total stream length in bytes, independent of the origin.
	pub fn size(&mut self) -> Result<u64> {
		let current = self.inner.stream_position()?;
		let end = self.inner.seek(SeekFrom::End(0))?;
		self.inner.seek(SeekFrom::Start(current))?;
		Ok(end)
	}

	/// Seek and return the new position relative to the virtual origin.
	pub fn seek(&mut self, offset: i64, whence: Whence) -> Result<u64> {
		let base = match whence {
			Whence::Start => self.origin,
			Whence::Current => self.inner.stream_position()?,
			Whence::End => self.size()?,
		};
		let target = i128::from(base) + i128::from(offset);
		if target < i128::from(self.origin) {
			return Err(SnoError::SeekBeforeOrigin {
				target: (target - i128::from(self.origin)) as i64,
				origin: self.origin,
			});
		}

		let abs = target as u64;
		self.inner.seek(SeekFrom::Start(abs))?;
		Ok(abs - self.origin)
	}

	/// Advance by `n` bytes.
	pub fn skip(&mut self, n: i64) -> Result<u64> {
		self.seek(n, Whence::Current)
	}

	/// Move the origin forward by `offset` bytes (relative to the current origin) and seek to it.
	pub fn rebase(&mut self, offset: u64) -> Result<()> {
		let origin = self.origin + offset;
		self.inner.seek(SeekFrom::Start(origin))?;
		self.origin = origin;
		Ok(())
	}

	/// Seek, run `f`, and restore the previous position on every exit path.
	pub fn at_position<T>(&mut self, offset: i64, whence: Whence, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
		let saved = self.inner.stream_position()?;
		let result = match self.seek(offset, whence) {
			Ok(_) => f(self),
			Err(err) => Err(err),
		};
		let restored = self.inner.seek(SeekFrom::Start(saved));

		match (result, restored) {
			(Err(err), _) => Err(err),
			(Ok(_), Err(err)) => Err(err.into()),
			(Ok(value), Ok(_)) => Ok(value),
		}
	}

	/// Run `f` at the current position without consuming anything.
	pub fn peek<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
		self.at_position(0, Whence::Current, f)
	}

	/// Read exactly `N` bytes.
	pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
		let mut buf = [0_u8; N];
		let at = self.inner.stream_position()?;
		match self.inner.read_exact(&mut buf) {
			Ok(()) => Ok(buf),
			Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => Err(SnoError::UnexpectedEof { at, need: N }),
			Err(err) => Err(err.into()),
		}
	}

	/// Read exactly `n` bytes into a new buffer.
	pub fn read_bytes(&mut self, n: usize) -> Result<Vec<u8>> {
		let at = self.inner.stream_position()?;
		let mut buf = Vec::new();
		(&mut self.inner).take(n as u64).read_to_end(&mut buf)?;
		if buf.len() < n {
			return Err(SnoError::UnexpectedEof { at, need: n });
		}
		Ok(buf)
	}

	/// Read a `u8`.
	pub fn read_u8(&mut self) -> Result<u8> {
		Ok(self.read_array::<1>()?[0])
	}

	/// Read an `i8`.
	pub fn read_i8(&mut self) -> Result<i8> {
		Ok(self.read_u8()? as i8)
	}

	/// Read a `u16` using the selected endianness.
	pub fn read_u16(&mut self, endianness: Endianness) -> Result<u16> {
		let buf = self.read_array::<2>()?;
		Ok(match endianness {
			Endianness::Little => u16::from_le_bytes(buf),
			Endianness::Big => u16::from_be_bytes(buf),
		})
	}

	/// Read a `u32` using the selected endianness.
	pub fn read_u32(&mut self, endianness: Endianness) -> Result<u32> {
		let buf = self.read_array::<4>()?;
		Ok(match endianness {
			Endianness::Little => u32::from_le_bytes(buf),
			Endianness::Big => u32::from_be_bytes(buf),
		})
	}

	/// Read a `u64` using the selected endianness.
	pub fn read_u64(&mut self, endianness: Endianness) -> Result<u64> {
		let buf = self.read_array::<8>()?;
		Ok(match endianness {
			Endianness::Little => u64::from_le_bytes(buf),
			Endianness::Big => u64::from_be_bytes(buf),
		})
	}

	/// Read an `i16` using the selected endianness.
	pub fn read_i16(&mut self, endianness: Endianness) -> Result<i16> {
		Ok(self.read_u16(endianness)? as i16)
	}

	/// Read an `i32` using the selected endianness.
	pub fn read_i32(&mut self, endianness: Endianness) -> Result<i32> {
		Ok(self.read_u32(endianness)? as i32)
	}

	/// Read an `i64` using the selected endianness.
	pub fn read_i64(&mut self, endianness: Endianness) -> Result<i64> {
		Ok(self.read_u64(endianness)? as i64)
	}

	/// Read an `f32` using the selected endianness.
	pub fn read_f32(&mut self, endianness: Endianness) -> Result<f32> {
		Ok(f32::from_bits(self.read_u32(endianness)?))
	}

	/// Read a little-endian `u16`.
	pub fn read_u16_le(&mut self) -> Result<u16> {
		self.read_u16(Endianness::Little)
	}

	/// Read a little-endian `u32`.
	pub fn read_u32_le(&mut self) -> Result<u32> {
		self.read_u32(Endianness::Little)
	}

	/// Read a little-endian `u64`.
	pub fn read_u64_le(&mut self) -> Result<u64> {
		self.read_u64(Endianness::Little)
	}

	/// Read a little-endian `i32`.
	pub fn read_i32_le(&mut self) -> Result<i32> {
		self.read_i32(Endianness::Little)
	}

	/// Read a little-endian `i64`.
	pub fn read_i64_le(&mut self) -> Result<i64> {
		self.read_i64(Endianness::Little)
	}

	/// Read a little-endian `f32`.
	pub fn read_f32_le(&mut self) -> Result<f32> {
		self.read_f32(Endianness::Little)
	}

	/// Read bytes up to a NUL terminator (consumed, not returned) or end of stream.
	pub fn read_null_terminated_string(&mut self) -> Result<String> {
		let mut out = Vec::new();
		let mut byte = [0_u8; 1];
		loop {
			if self.inner.read(&mut byte)? == 0 || byte[0] == 0 {
				break;
			}
			out.push(byte[0]);
		}
		Ok(String::from_utf8_lossy(&out).into_owned())
	}
}

#[cfg(test)]
mod tests;
