use std::io::{Read, Seek};

use tracing::trace;

use crate::sno::{BalanceTable, Cursor, Decoder, FieldOptions, Object, Result, TypeChain, Value, WalkFlow, walk};

/// Byte size of the fixed record header; payload offsets are relative to its end.
pub const SNO_HEADER_SIZE: u64 = 16;

/// Fixed record header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnoHeader {
	/// File signature.
	pub signature: u32,
	/// Selects the payload type through the registry.
	pub format_hash: u32,
	/// Checksum of the record content as stored by the writer.
	pub content_checksum: u32,
	/// Unused trailing word.
	pub reserved: u32,
}

impl SnoHeader {
	/// Read the header at the cursor position.
	pub fn read<R: Read + Seek>(cursor: &mut Cursor<R>) -> Result<Self> {
		Ok(Self {
			signature: cursor.read_u32_le()?,
			format_hash: cursor.read_u32_le()?,
			content_checksum: cursor.read_u32_le()?,
			reserved: cursor.read_u32_le()?,
		})
	}
}

/// One decoded record: header, identifier and payload.
#[derive(Debug, Clone, PartialEq)]
pub struct SnoMeta {
	/// Fixed header.
	pub header: SnoHeader,
	/// Record id, peeked from the start of the payload.
	pub id: i32,
	/// Payload decoded as the type registered for `header.format_hash`.
	pub payload: Object,
}

impl SnoMeta {
	/// Decode a record from the start of `cursor`.
	///
	/// The cursor origin is moved to the end of the header, so every offset
	/// inside the payload resolves relative to it. An unknown format hash or
	/// any payload error fails the whole record.
	pub fn decode<R: Read + Seek>(decoder: &Decoder<'_>, cursor: &mut Cursor<R>) -> Result<Self> {
		let header = SnoHeader::read(cursor)?;
		cursor.rebase(SNO_HEADER_SIZE)?;
		let id = cursor.peek(|cursor| cursor.read_i32_le())?;

		let entry = decoder.registry().construct_by_format_hash(header.format_hash)?;
		trace!(format_hash = header.format_hash, id, payload = %entry.name, "decoding record");
		let payload = decoder.decode(cursor, TypeChain::single(entry.hash), &FieldOptions::default())?;

		Ok(Self { header, id, payload })
	}

	/// Class name of the payload.
	pub fn payload_type_name(&self) -> Option<&str> {
		self.payload.as_struct().map(|value| value.type_name.as_ref())
	}

	/// Ids of records referenced by the payload, in walk order.
	///
	/// Plain and grouped record references contribute their id. Balance ids
	/// contribute the id of their owning record when `balance` knows them.
	/// Only positive ids are kept.
	pub fn references(&self, balance: Option<&BalanceTable>) -> Vec<i32> {
		let mut refs = Vec::new();
		walk(&self.payload, |entry| {
			let id = match &entry.value.value {
				Value::Sno(id) => *id,
				Value::SnoName { id, .. } => *id,
				Value::Gbid(gbid) => balance.and_then(|table| table.get(gbid)).map_or(0, |info| info.sno_id),
				_ => 0,
			};
			if id > 0 {
				refs.push(id);
			}
			WalkFlow::Descend
		});
		refs
	}
}

#[cfg(test)]
mod tests;
