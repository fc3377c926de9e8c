//! Shared fixture builders for workspace tests.

use serde_json::{Map, Value, json};

/// Type hashes of the standard definitions emitted by [`DefinitionsBuilder::new`].
pub mod hashes {
	/// `DT_NULL`
	pub const DT_NULL: u32 = 1000;
	/// `DT_BYTE`
	pub const DT_BYTE: u32 = 1001;
	/// `DT_WORD`
	pub const DT_WORD: u32 = 1002;
	/// `DT_ENUM`
	pub const DT_ENUM: u32 = 1003;
	/// `DT_INT`
	pub const DT_INT: u32 = 1004;
	/// `DT_FLOAT`
	pub const DT_FLOAT: u32 = 1005;
	/// `DT_UINT`
	pub const DT_UINT: u32 = 1006;
	/// `DT_INT64`
	pub const DT_INT64: u32 = 1007;
	/// `DT_SNO`
	pub const DT_SNO: u32 = 1008;
	/// `DT_SNO_NAME`
	pub const DT_SNO_NAME: u32 = 1009;
	/// `DT_GBID`
	pub const DT_GBID: u32 = 1010;
	/// `DT_STARTLOC_NAME`
	pub const DT_STARTLOC_NAME: u32 = 1011;
	/// `DT_ACD_NETWORK_NAME`
	pub const DT_ACD_NETWORK_NAME: u32 = 1012;
	/// `DT_SHARED_SERVER_DATA_ID`
	pub const DT_SHARED_SERVER_DATA_ID: u32 = 1013;
	/// `DT_RGBACOLOR`
	pub const DT_RGBACOLOR: u32 = 1014;
	/// `DT_RGBACOLORVALUE`
	pub const DT_RGBACOLORVALUE: u32 = 1015;
	/// `DT_BCVEC2I`
	pub const DT_BCVEC2I: u32 = 1016;
	/// `DT_VECTOR2D`
	pub const DT_VECTOR2D: u32 = 1017;
	/// `DT_VECTOR3D`
	pub const DT_VECTOR3D: u32 = 1018;
	/// `DT_VECTOR4D`
	pub const DT_VECTOR4D: u32 = 1019;
	/// `DT_CHARARRAY`
	pub const DT_CHARARRAY: u32 = 1020;
	/// `DT_CSTRING`
	pub const DT_CSTRING: u32 = 1021;
	/// `DT_STRING_FORMULA`
	pub const DT_STRING_FORMULA: u32 = 1022;
	/// `DT_OPTIONAL`
	pub const DT_OPTIONAL: u32 = 1023;
	/// `DT_RANGE`
	pub const DT_RANGE: u32 = 1024;
	/// `DT_FIXEDARRAY`
	pub const DT_FIXEDARRAY: u32 = 1025;
	/// `DT_VARIABLEARRAY`
	pub const DT_VARIABLEARRAY: u32 = 1026;
	/// `DT_POLYMORPHIC_VARIABLEARRAY`
	pub const DT_POLYMORPHIC_VARIABLEARRAY: u32 = 1027;
	/// `DT_TAGMAP`
	pub const DT_TAGMAP: u32 = 1028;
	/// `PolymorphicBase`
	pub const POLYMORPHIC_BASE: u32 = 2000;
}

/// Type flag marking generic containers.
pub const HAS_SUBTYPE: u32 = 0x8000;

/// Byte offset of `dwType` inside `PolymorphicBase`.
pub const POLYMORPHIC_TYPE_OFFSET: u32 = 8;

/// Little-endian binary fixture writer.
#[derive(Debug, Default, Clone)]
pub struct ByteWriter {
	buf: Vec<u8>,
}

impl ByteWriter {
	/// Empty writer.
	pub fn new() -> Self {
		Self::default()
	}

	/// Bytes written so far.
	pub fn position(&self) -> usize {
		self.buf.len()
	}

	/// Append a `u8`.
	pub fn u8(&mut self, value: u8) -> &mut Self {
		self.buf.push(value);
		self
	}

	/// Append a little-endian `u16`.
	pub fn u16(&mut self, value: u16) -> &mut Self {
		self.bytes(&value.to_le_bytes())
	}

	/// Append a little-endian `i32`.
	pub fn i32(&mut self, value: i32) -> &mut Self {
		self.bytes(&value.to_le_bytes())
	}

	/// Append a little-endian `u32`.
	pub fn u32(&mut self, value: u32) -> &mut Self {
		self.bytes(&value.to_le_bytes())
	}

	/// Append a little-endian `i64`.
	pub fn i64(&mut self, value: i64) -> &mut Self {
		self.bytes(&value.to_le_bytes())
	}

	/// Append a little-endian `u64`.
	pub fn u64(&mut self, value: u64) -> &mut Self {
		self.bytes(&value.to_le_bytes())
	}

	/// Append a little-endian `f32`.
	pub fn f32(&mut self, value: f32) -> &mut Self {
		self.bytes(&value.to_le_bytes())
	}

	/// Append raw bytes.
	pub fn bytes(&mut self, bytes: &[u8]) -> &mut Self {
		self.buf.extend_from_slice(bytes);
		self
	}

	/// Append `n` zero bytes.
	pub fn zeros(&mut self, n: usize) -> &mut Self {
		self.buf.resize(self.buf.len() + n, 0);
		self
	}

	/// Zero-fill up to absolute offset `pos`.
	pub fn pad_to(&mut self, pos: usize) -> &mut Self {
		assert!(pos >= self.buf.len(), "pad_to({pos}) behind current position {}", self.buf.len());
		self.buf.resize(pos, 0);
		self
	}

	/// Overwrite a little-endian `i32` at absolute offset `at`.
	pub fn patch_i32(&mut self, at: usize, value: i32) -> &mut Self {
		self.buf[at..at + 4].copy_from_slice(&value.to_le_bytes());
		self
	}

	/// Finished buffer.
	pub fn into_inner(self) -> Vec<u8> {
		self.buf
	}

	/// Copy of the bytes written so far.
	pub fn to_vec(&self) -> Vec<u8> {
		self.buf.clone()
	}
}

/// One field of a class fixture.
#[derive(Debug, Clone)]
pub struct FieldSpec {
	name: String,
	hash: u32,
	offset: u32,
	types: [u32; 3],
	flags: u32,
	array_length: i64,
	group: i64,
	tagmap_type: i64,
}

impl FieldSpec {
	/// Field with type composition `types` (missing slots become `DT_NULL`).
	pub fn new(name: &str, hash: u32, offset: u32, types: &[u32]) -> Self {
		let mut slots = [hashes::DT_NULL; 3];
		for (slot, hash) in slots.iter_mut().zip(types) {
			*slot = *hash;
		}
		Self {
			name: name.to_owned(),
			hash,
			offset,
			types: slots,
			flags: 0,
			array_length: -1,
			group: -1,
			tagmap_type: -1,
		}
	}

	/// Set the field flags.
	pub fn flags(mut self, flags: u32) -> Self {
		self.flags = flags;
		self
	}

	/// Set the fixed array length.
	pub fn array_length(mut self, len: u32) -> Self {
		self.array_length = i64::from(len);
		self
	}

	/// Set the identifier group.
	pub fn group(mut self, group: i32) -> Self {
		self.group = i64::from(group);
		self
	}

	/// Set the declared tagged-map element type.
	pub fn tagmap_type(mut self, hash: u32) -> Self {
		self.tagmap_type = i64::from(hash);
		self
	}

	fn to_json(&self) -> Value {
		json!({
			"type": self.types,
			"hash": self.hash,
			"name": self.name,
			"flags": self.flags,
			"offset": self.offset,
			"arrayLength": self.array_length,
			"group": self.group,
			"tagMapType": self.tagmap_type,
		})
	}
}

/// Definitions document builder preloaded with every basic type.
#[derive(Debug, Clone)]
pub struct DefinitionsBuilder {
	types: Map<String, Value>,
}

impl Default for DefinitionsBuilder {
	fn default() -> Self {
		Self::new()
	}
}

impl DefinitionsBuilder {
	/// Builder holding the standard basic types and `PolymorphicBase`.
	pub fn new() -> Self {
		use hashes::*;

		let basics: [(u32, &str, u32, u32); 29] = [
			(DT_NULL, "DT_NULL", 0, 0),
			(DT_BYTE, "DT_BYTE", 1, 0),
			(DT_WORD, "DT_WORD", 2, 0),
			(DT_ENUM, "DT_ENUM", 4, 0),
			(DT_INT, "DT_INT", 4, 0),
			(DT_FLOAT, "DT_FLOAT", 4, 0),
			(DT_UINT, "DT_UINT", 4, 0),
			(DT_INT64, "DT_INT64", 8, 0),
			(DT_SNO, "DT_SNO", 4, 0),
			(DT_SNO_NAME, "DT_SNO_NAME", 8, 0),
			(DT_GBID, "DT_GBID", 4, 0),
			(DT_STARTLOC_NAME, "DT_STARTLOC_NAME", 4, 0),
			(DT_ACD_NETWORK_NAME, "DT_ACD_NETWORK_NAME", 8, 0),
			(DT_SHARED_SERVER_DATA_ID, "DT_SHARED_SERVER_DATA_ID", 8, 0),
			(DT_RGBACOLOR, "DT_RGBACOLOR", 4, 0),
			(DT_RGBACOLORVALUE, "DT_RGBACOLORVALUE", 16, 0),
			(DT_BCVEC2I, "DT_BCVEC2I", 8, 0),
			(DT_VECTOR2D, "DT_VECTOR2D", 8, 0),
			(DT_VECTOR3D, "DT_VECTOR3D", 12, 0),
			(DT_VECTOR4D, "DT_VECTOR4D", 16, 0),
			(DT_CHARARRAY, "DT_CHARARRAY", 1, 0),
			(DT_CSTRING, "DT_CSTRING", 16, HAS_SUBTYPE),
			(DT_STRING_FORMULA, "DT_STRING_FORMULA", 24, 0),
			(DT_OPTIONAL, "DT_OPTIONAL", 4, HAS_SUBTYPE),
			(DT_RANGE, "DT_RANGE", 0, HAS_SUBTYPE),
			(DT_FIXEDARRAY, "DT_FIXEDARRAY", 0, HAS_SUBTYPE),
			(DT_VARIABLEARRAY, "DT_VARIABLEARRAY", 16, HAS_SUBTYPE),
			(DT_POLYMORPHIC_VARIABLEARRAY, "DT_POLYMORPHIC_VARIABLEARRAY", 24, HAS_SUBTYPE),
			(DT_TAGMAP, "DT_TAGMAP", 16, HAS_SUBTYPE),
		];

		let mut builder = Self { types: Map::new() };
		for (hash, name, size, flags) in basics {
			builder.types.insert(
				hash.to_string(),
				json!({
					"type": "basic",
					"hash": hash,
					"name": name,
					"flags": flags,
					"size": size,
				}),
			);
		}

		builder.class(
			POLYMORPHIC_BASE,
			"PolymorphicBase",
			16,
			vec![FieldSpec::new("dwType", 0x5000_0001, POLYMORPHIC_TYPE_OFFSET, &[DT_UINT])],
		)
	}

	/// Add a class definition.
	pub fn class(self, hash: u32, name: &str, size: u32, fields: Vec<FieldSpec>) -> Self {
		self.insert(hash, name, size, 0, Some(fields))
	}

	/// Add a top-level record payload class selected by `format_hash`.
	pub fn payload(self, hash: u32, name: &str, format_hash: u32, size: u32, fields: Vec<FieldSpec>) -> Self {
		self.insert(hash, name, size, format_hash, Some(fields))
	}

	/// Add a class that carries no field information.
	pub fn opaque_class(self, hash: u32, name: &str, size: u32) -> Self {
		self.insert(hash, name, size, 0, None)
	}

	/// Add a basic type the decoder may not know.
	pub fn basic(mut self, hash: u32, name: &str, size: u32) -> Self {
		self.types.insert(
			hash.to_string(),
			json!({ "type": "basic", "hash": hash, "name": name, "flags": 0, "size": size }),
		);
		self
	}

	/// Serialized JSON document.
	pub fn to_json(&self) -> String {
		Value::Object(self.types.clone()).to_string()
	}

	fn insert(mut self, hash: u32, name: &str, size: u32, format_hash: u32, fields: Option<Vec<FieldSpec>>) -> Self {
		let fields = match fields {
			Some(fields) => Value::Array(fields.iter().map(FieldSpec::to_json).collect()),
			None => Value::Null,
		};
		self.types.insert(
			hash.to_string(),
			json!({
				"type": "class",
				"hash": hash,
				"name": name,
				"flags": 0,
				"inherits": [],
				"dwFormatHash": format_hash,
				"isPolymorphicType": false,
				"fields": fields,
				"size": size,
			}),
		);
		self
	}
}

/// Signature written by [`sno_record`].
pub const SNO_SIGNATURE: u32 = 0xdead_beef;

/// Record file bytes: 16-byte header followed by `payload`.
pub fn sno_record(format_hash: u32, payload: &[u8]) -> Vec<u8> {
	let mut w = ByteWriter::new();
	w.u32(SNO_SIGNATURE).u32(format_hash).u32(0x1234_5678).u32(0).bytes(payload);
	w.into_inner()
}

/// Catalog file bytes for `groups`, each a group id with `(id, name)` entries.
///
/// Entry tables are laid out back-to-back after the header, each followed by
/// its own name pool.
pub fn toc_file(groups: &[(i32, &[(i32, &str)])]) -> Vec<u8> {
	let mut body = ByteWriter::new();
	let mut offsets = Vec::with_capacity(groups.len());
	for (group, entries) in groups {
		offsets.push(body.position() as i32);
		let mut pool = Vec::new();
		for (id, name) in *entries {
			body.i32(*group).i32(*id).i32(pool.len() as i32);
			pool.extend_from_slice(name.as_bytes());
			pool.push(0);
		}
		body.bytes(&pool);
	}

	let mut w = ByteWriter::new();
	w.i32(groups.len() as i32);
	for (_, entries) in groups {
		w.i32(entries.len() as i32);
	}
	for offset in &offsets {
		w.i32(*offset);
	}
	for _ in groups {
		w.i32(0);
	}
	w.i32(0).bytes(&body.into_inner());
	w.into_inner()
}

/// Balance record fixtures shaped like `GameBalanceDefinition`.
pub mod balance {
	use super::hashes::*;
	use super::{ByteWriter, DefinitionsBuilder, FieldSpec};

	/// Format hash of the balance payload.
	pub const FORMAT_HASH: u32 = 0x6a11_0001;
	/// Payload type hash.
	pub const DEFINITION: u32 = 5100;
	/// Per-table class hash.
	pub const TABLE: u32 = 5101;
	/// Per-entry class hash.
	pub const ENTRY: u32 = 5102;
	/// Entry header class hash.
	pub const HEADER: u32 = 5103;
	/// Byte length of an entry name.
	pub const NAME_LEN: usize = 12;

	/// Add the balance classes to `builder`.
	pub fn definitions(builder: DefinitionsBuilder) -> DefinitionsBuilder {
		builder
			.class(HEADER, "GBIDHeader", 12, vec![FieldSpec::new("szName", 0x6a01, 0, &[DT_CHARARRAY]).array_length(NAME_LEN as u32)])
			.class(ENTRY, "GBEntry", 12, vec![FieldSpec::new("tHeader", 0x6a02, 0, &[HEADER])])
			.class(TABLE, "GBTable", 16, vec![FieldSpec::new("tEntries", 0x6a03, 0, &[DT_VARIABLEARRAY, ENTRY])])
			.payload(
				DEFINITION,
				"GameBalanceDefinition",
				FORMAT_HASH,
				32,
				vec![
					FieldSpec::new("eGameBalanceType", 0x6a04, 8, &[DT_ENUM]),
					FieldSpec::new("ptData", 0x6a05, 16, &[DT_VARIABLEARRAY, TABLE]),
				],
			)
	}

	/// Payload bytes for one table holding `names`.
	pub fn payload(id: i32, group: i32, names: &[&str]) -> Vec<u8> {
		let entries_size = (names.len() * NAME_LEN) as i32;
		let mut w = ByteWriter::new();
		w.i32(id).pad_to(8).i32(group).pad_to(16);
		w.i64(0).i32(32).i32(16);
		w.i64(0).i32(48).i32(entries_size);
		for name in names {
			let mut slot = [0_u8; NAME_LEN];
			slot[..name.len()].copy_from_slice(name.as_bytes());
			w.bytes(&slot);
		}
		w.into_inner()
	}
}
