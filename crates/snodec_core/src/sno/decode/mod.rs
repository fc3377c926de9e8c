use std::io::{Read, Seek};

use tracing::warn;

use crate::sno::value::trim_nul;
use crate::sno::{
	ArrayValue, BasicKind, CStringValue, Cursor, DecodeOptions, FieldOptions, FieldValue, FormulaValue, Gbid, Object, OptionalValue, PolymorphicArrayValue,
	RangeValue, Registry, Result, SnoError, SnoGroup, StructValue, TagMapEntry, TagMapValue, TypeChain, TypeEntry, TypeKind, Value, Whence,
};

/// Stride of the per-element table that precedes polymorphic array contents.
const POLYMORPHIC_TABLE_STRIDE: i64 = 8;

/// Registry-driven value decoder.
///
/// Every composite re-enters [`Decoder::decode`] for its children; the element
/// type of a container is the tail of its [`TypeChain`] unless a parent tagged
/// map already fixed it through [`FieldOptions::override_type`].
#[derive(Debug, Clone)]
pub struct Decoder<'r> {
	registry: &'r Registry,
	options: DecodeOptions,
}

impl<'r> Decoder<'r> {
	/// Decoder with default limits.
	pub fn new(registry: &'r Registry) -> Self {
		Self::with_options(registry, DecodeOptions::default())
	}

	/// Decoder with explicit limits.
	pub fn with_options(registry: &'r Registry, options: DecodeOptions) -> Self {
		Self { registry, options }
	}

	/// Registry used for type resolution.
	pub fn registry(&self) -> &'r Registry {
		self.registry
	}

	/// Active limits.
	pub fn options(&self) -> &DecodeOptions {
		&self.options
	}

	/// Decode one value of the composed type `chain` at the cursor position.
	pub fn decode<R: Read + Seek>(&self, cursor: &mut Cursor<R>, chain: TypeChain, opts: &FieldOptions) -> Result<Object> {
		self.decode_value(cursor, chain, opts, 0)
	}

	/// Decode one value of a single, non-composed type.
	pub fn decode_type<R: Read + Seek>(&self, cursor: &mut Cursor<R>, type_hash: u32, opts: &FieldOptions) -> Result<Object> {
		self.decode(cursor, TypeChain::single(type_hash), opts)
	}

	fn decode_value<R: Read + Seek>(&self, cursor: &mut Cursor<R>, chain: TypeChain, opts: &FieldOptions, depth: u32) -> Result<Object> {
		if depth >= self.options.max_depth {
			return Err(SnoError::DecodeDepthExceeded {
				max_depth: self.options.max_depth,
			});
		}

		let hash = chain.head().ok_or(SnoError::UnknownTypeHash { hash: 0 })?;
		let entry = self.registry.construct_by_type_hash(hash)?;
		let elements = element_chain(chain, opts);

		let value = match entry.kind {
			TypeKind::Basic(kind) => self.decode_basic(cursor, kind, elements, opts, depth)?,
			TypeKind::UnsupportedBasic => {
				return Err(SnoError::UnsupportedBasicType {
					name: entry.name.to_string(),
					hash,
				});
			}
			TypeKind::Struct => Value::Struct(self.decode_struct(cursor, entry, depth)?),
		};

		Ok(Object {
			type_hash: hash,
			sub_type_hash: elements.head(),
			size: entry.size,
			value,
		})
	}

	fn decode_struct<R: Read + Seek>(&self, cursor: &mut Cursor<R>, entry: &TypeEntry, depth: u32) -> Result<StructValue> {
		let start = cursor.position()? as i64;
		let mut fields = Vec::with_capacity(entry.field_list().len());

		for field in entry.field_list() {
			cursor.seek(start + i64::from(field.offset), Whence::Start)?;
			let value = self.decode_value(cursor, field.chain, &field.options(), depth + 1)?;
			fields.push(FieldValue {
				name: field.name.clone(),
				hash: field.hash,
				value,
			});
		}

		cursor.seek(start + i64::from(entry.size), Whence::Start)?;
		Ok(StructValue {
			type_name: entry.name.clone(),
			fields,
		})
	}

	fn decode_basic<R: Read + Seek>(&self, cursor: &mut Cursor<R>, kind: BasicKind, elements: TypeChain, opts: &FieldOptions, depth: u32) -> Result<Value> {
		Ok(match kind {
			BasicKind::Null => Value::Null,
			BasicKind::Byte => Value::Byte(cursor.read_u8()?),
			BasicKind::Word => Value::Word(cursor.read_u16_le()?),
			BasicKind::Enum => Value::Enum(cursor.read_i32_le()?),
			BasicKind::Int => Value::Int(cursor.read_i32_le()?),
			BasicKind::Float => Value::Float(cursor.read_f32_le()?),
			BasicKind::Uint => Value::Uint(cursor.read_u32_le()?),
			BasicKind::Int64 => Value::Int64(cursor.read_i64_le()?),
			BasicKind::Sno => Value::Sno(cursor.read_i32_le()?),
			BasicKind::SnoName => {
				let group = SnoGroup(cursor.read_i32_le()?);
				let id = cursor.read_i32_le()?;
				Value::SnoName { group, id }
			}
			BasicKind::Gbid => {
				let group = opts.group.ok_or(SnoError::GroupRequired)?;
				Value::Gbid(Gbid {
					group,
					value: cursor.read_u32_le()?,
				})
			}
			BasicKind::StartlocName => Value::StartlocName(cursor.read_u32_le()?),
			BasicKind::AcdNetworkName => Value::AcdNetworkName(cursor.read_u64_le()?),
			BasicKind::SharedServerDataId => Value::SharedServerDataId(cursor.read_u64_le()?),
			BasicKind::RgbaColor => Value::RgbaColor(cursor.read_array::<4>()?),
			BasicKind::RgbaColorValue => Value::RgbaColorValue(read_floats(cursor)?),
			BasicKind::BcVec2i => Value::BcVec2i(read_floats(cursor)?),
			BasicKind::Vector2d => Value::Vector2d(read_floats(cursor)?),
			BasicKind::Vector3d => Value::Vector3d(read_floats(cursor)?),
			BasicKind::Vector4d => Value::Vector4d(read_floats(cursor)?),
			BasicKind::CharArray => {
				let len = opts.array_length.ok_or(SnoError::ArrayLengthRequired { type_name: kind.name() })?;
				Value::CharArray(cursor.read_bytes(len as usize)?)
			}
			BasicKind::CString => Value::CString(decode_cstring(cursor)?),
			BasicKind::StringFormula => Value::StringFormula(decode_formula(cursor)?),
			BasicKind::Optional => {
				let exists = cursor.read_i32_le()?;
				let value = if exists > 0 {
					Some(Box::new(self.decode_value(cursor, elements, &opts.for_child(), depth + 1)?))
				} else {
					None
				};
				Value::Optional(OptionalValue { exists, value })
			}
			BasicKind::Range => {
				let child = opts.for_child();
				let lower = self.decode_value(cursor, elements, &child, depth + 1)?;
				let upper = self.decode_value(cursor, elements, &child, depth + 1)?;
				Value::Range(Box::new(RangeValue { lower, upper }))
			}
			BasicKind::FixedArray => {
				let len = opts.array_length.ok_or(SnoError::ArrayLengthRequired { type_name: kind.name() })? as usize;
				self.check_count(len)?;
				let child = opts.for_child();
				let mut items = Vec::with_capacity(len);
				for _ in 0..len {
					items.push(self.decode_value(cursor, elements, &child, depth + 1)?);
				}
				Value::FixedArray(items)
			}
			BasicKind::VariableArray => Value::VariableArray(self.decode_variable_array(cursor, elements, opts, depth)?),
			BasicKind::PolymorphicVariableArray => Value::PolymorphicArray(self.decode_polymorphic_array(cursor, opts, depth)?),
			BasicKind::TagMap => Value::TagMap(self.decode_tagmap(cursor, opts, depth)?),
		})
	}

	fn decode_variable_array<R: Read + Seek>(&self, cursor: &mut Cursor<R>, elements: TypeChain, opts: &FieldOptions, depth: u32) -> Result<ArrayValue> {
		let external = opts.flags.is_external();
		read_padding64(cursor)?;
		let data_offset = cursor.read_i32_le()?;
		let data_size = cursor.read_i32_le()?;

		let mut array = ArrayValue {
			data_offset,
			data_size,
			external,
			elements: Vec::new(),
		};
		if external || data_offset < 1 || data_size < 1 {
			return Ok(array);
		}

		let end = i64::from(data_offset) + i64::from(data_size);
		let child = opts.for_child();
		array.elements = cursor.at_position(i64::from(data_offset), Whence::Start, |cursor| {
			let mut items = Vec::new();
			let mut pos = i64::from(data_offset);
			while pos < end {
				self.check_count(items.len() + 1)?;
				items.push(self.decode_value(cursor, elements, &child, depth + 1)?);
				pos = cursor.position()? as i64;
			}
			if pos != end {
				return Err(SnoError::VariableArrayOverrun {
					expected: end as u64,
					actual: pos as u64,
				});
			}
			Ok(items)
		})?;

		Ok(array)
	}

	fn decode_polymorphic_array<R: Read + Seek>(&self, cursor: &mut Cursor<R>, opts: &FieldOptions, depth: u32) -> Result<PolymorphicArrayValue> {
		let external = opts.flags.is_external();
		read_padding64(cursor)?;
		let data_offset = cursor.read_i32_le()?;
		let data_size = cursor.read_i32_le()?;
		let count = cursor.read_i32_le()?;
		read_padding32(cursor)?;

		let mut array = PolymorphicArrayValue {
			data_offset,
			data_size,
			count,
			external,
			truncated: false,
			elements: Vec::new(),
		};
		if external || data_offset < 1 || data_size < 1 || count < 1 {
			return Ok(array);
		}

		let count = count as usize;
		self.check_count(count)?;
		let type_offset = i64::from(self.registry.polymorphic_type_offset()?);
		let region = i64::from(data_offset) + POLYMORPHIC_TABLE_STRIDE * count as i64;
		let child = opts.for_child();

		cursor.at_position(region, Whence::Start, |cursor| {
			for index in 0..count {
				let probed = cursor.at_position(type_offset, Whence::Current, |cursor| cursor.read_u32_le());
				let type_hash = match probed {
					Ok(hash) => hash,
					Err(err) if err.is_unexpected_eof() && self.options.lenient_polymorphic_eof => {
						warn!(index, count, data_offset, "stream ended while probing polymorphic element, truncating array");
						array.truncated = true;
						break;
					}
					Err(err) => return Err(err),
				};
				array.elements.push(self.decode_value(cursor, TypeChain::single(type_hash), &child, depth + 1)?);
			}
			Ok(())
		})?;

		Ok(array)
	}

	fn decode_tagmap<R: Read + Seek>(&self, cursor: &mut Cursor<R>, opts: &FieldOptions, depth: u32) -> Result<TagMapValue> {
		read_padding64(cursor)?;
		let data_offset = cursor.read_i32_le()?;
		let data_size = cursor.read_i32_le()?;

		let mut map = TagMapValue {
			data_offset,
			data_size,
			declared_type: opts.tagmap_type,
			entries: Vec::new(),
		};
		if data_offset < 1 || data_size < 1 {
			return Ok(map);
		}

		map.entries = cursor.at_position(i64::from(data_offset), Whence::Start, |cursor| {
			let at = cursor.position()?;
			let count = cursor.read_i32_le()?;
			if count < 0 {
				return Err(SnoError::NegativeLength {
					what: "tagmap count",
					at,
					len: i64::from(count),
				});
			}
			let count = count as usize;
			self.check_count(count)?;

			let mut headers = Vec::with_capacity(count);
			for _ in 0..count {
				let field_hash = cursor.read_u32_le()?;
				let type_hash = cursor.read_u32_le()?;
				let entry = self.registry.construct_by_type_hash(type_hash)?;
				let sub_type_hash = if entry.has_subtype() { Some(cursor.read_u32_le()?) } else { None };
				headers.push((field_hash, type_hash, sub_type_hash));
			}

			let mut entries = Vec::with_capacity(count);
			for (field_hash, type_hash, sub_type_hash) in headers {
				let alignment = u64::from(self.registry.tagmap_entry_alignment(type_hash, sub_type_hash)?);
				let misalignment = cursor.position()? % alignment;
				if misalignment > 0 {
					cursor.skip((alignment - misalignment) as i64)?;
				}

				let mut child = opts.for_child();
				child.override_type = sub_type_hash.map(TypeChain::single);
				let value = self.decode_value(cursor, TypeChain::single(type_hash), &child, depth + 1)?;
				entries.push(TagMapEntry {
					name: self.registry.field_name_arc(field_hash),
					field_hash,
					value,
				});
			}
			Ok(entries)
		})?;

		Ok(map)
	}

	fn check_count(&self, count: usize) -> Result<()> {
		if count > self.options.max_array_elems {
			return Err(SnoError::DecodeArrayTooLarge {
				count,
				max: self.options.max_array_elems,
			});
		}
		Ok(())
	}
}

fn element_chain(chain: TypeChain, opts: &FieldOptions) -> TypeChain {
	opts.override_type.unwrap_or_else(|| chain.sub())
}

fn read_padding64<R: Read + Seek>(cursor: &mut Cursor<R>) -> Result<()> {
	let at = cursor.position()?;
	let value = cursor.read_i64_le()?;
	if value != 0 {
		return Err(SnoError::InvalidPadding { at, value });
	}
	Ok(())
}

fn read_padding32<R: Read + Seek>(cursor: &mut Cursor<R>) -> Result<()> {
	let at = cursor.position()?;
	let value = cursor.read_i32_le()?;
	if value != 0 {
		return Err(SnoError::InvalidPadding { at, value: i64::from(value) });
	}
	Ok(())
}

fn read_floats<R: Read + Seek, const N: usize>(cursor: &mut Cursor<R>) -> Result<[f32; N]> {
	let mut out = [0.0_f32; N];
	for slot in &mut out {
		*slot = cursor.read_f32_le()?;
	}
	Ok(out)
}

fn read_sized_at<R: Read + Seek>(cursor: &mut Cursor<R>, what: &'static str, at: u64, offset: i32, size: i32) -> Result<Vec<u8>> {
	if size < 0 {
		return Err(SnoError::NegativeLength {
			what,
			at,
			len: i64::from(size),
		});
	}
	if size == 0 {
		return Ok(Vec::new());
	}
	cursor.at_position(i64::from(offset), Whence::Start, |cursor| cursor.read_bytes(size as usize))
}

fn decode_cstring<R: Read + Seek>(cursor: &mut Cursor<R>) -> Result<CStringValue> {
	cursor.skip(8)?;
	let at = cursor.position()?;
	let offset = cursor.read_i32_le()?;
	let size = cursor.read_i32_le()?;
	let bytes = read_sized_at(cursor, "cstring size", at, offset, size)?;
	Ok(CStringValue {
		offset,
		size,
		text: trim_nul(&bytes),
		bytes,
	})
}

fn decode_formula<R: Read + Seek>(cursor: &mut Cursor<R>) -> Result<FormulaValue> {
	cursor.skip(8)?;
	let at = cursor.position()?;
	let formula_offset = cursor.read_i32_le()?;
	let formula_size = cursor.read_i32_le()?;
	let compiled_offset = cursor.read_i32_le()?;
	let compiled_size = cursor.read_i32_le()?;

	let source = read_sized_at(cursor, "formula size", at, formula_offset, formula_size)?;
	let compiled = read_sized_at(cursor, "compiled formula size", at, compiled_offset, compiled_size)?;
	Ok(FormulaValue {
		formula_offset,
		formula_size,
		compiled_offset,
		compiled_size,
		text: trim_nul(&source),
		compiled,
	})
}
