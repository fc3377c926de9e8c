use std::sync::Arc;

use crate::sno::{Gbid, SnoGroup};

/// One decoded node: a value plus the type identity it was decoded as.
#[derive(Debug, Clone, PartialEq)]
pub struct Object {
	/// Type hash the value was decoded as.
	pub type_hash: u32,
	/// Element type of a container, when it has one.
	pub sub_type_hash: Option<u32>,
	/// Static byte size of the type.
	pub size: u32,
	/// Decoded payload.
	pub value: Value,
}

/// Decoded payload for every supported type.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
	/// `DT_NULL`; occupies no bytes.
	Null,
	/// `DT_BYTE`
	Byte(u8),
	/// `DT_WORD`
	Word(u16),
	/// `DT_ENUM`
	Enum(i32),
	/// `DT_INT`
	Int(i32),
	/// `DT_FLOAT`
	Float(f32),
	/// `DT_UINT`
	Uint(u32),
	/// `DT_INT64`
	Int64(i64),
	/// Plain record reference.
	Sno(i32),
	/// Record reference qualified by group.
	SnoName {
		/// Referenced record group.
		group: SnoGroup,
		/// Referenced record id.
		id: i32,
	},
	/// Group-scoped balance id.
	Gbid(Gbid),
	/// `DT_STARTLOC_NAME`
	StartlocName(u32),
	/// `DT_ACD_NETWORK_NAME`
	AcdNetworkName(u64),
	/// `DT_SHARED_SERVER_DATA_ID`
	SharedServerDataId(u64),
	/// RGBA colour with byte channels.
	RgbaColor([u8; 4]),
	/// RGBA colour with float channels.
	RgbaColorValue([f32; 4]),
	/// `DT_BCVEC2I`
	BcVec2i([f32; 2]),
	/// `DT_VECTOR2D`
	Vector2d([f32; 2]),
	/// `DT_VECTOR3D`
	Vector3d([f32; 3]),
	/// `DT_VECTOR4D`
	Vector4d([f32; 4]),
	/// Fixed-length raw bytes.
	CharArray(Vec<u8>),
	/// Offset-addressed string.
	CString(CStringValue),
	/// Formula source plus compiled form.
	StringFormula(FormulaValue),
	/// Value behind a presence flag.
	Optional(OptionalValue),
	/// Lower and upper bound.
	Range(Box<RangeValue>),
	/// Inline elements repeated a fixed number of times.
	FixedArray(Vec<Object>),
	/// Offset-addressed elements packed back-to-back.
	VariableArray(ArrayValue),
	/// Offset-addressed elements with per-element runtime types.
	PolymorphicArray(PolymorphicArrayValue),
	/// Hash-keyed heterogeneous entries.
	TagMap(TagMapValue),
	/// Class instance decoded from its field list.
	Struct(StructValue),
}

/// `DT_CSTRING` payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CStringValue {
	/// Data offset relative to the record origin.
	pub offset: i32,
	/// Stored byte size, terminator included.
	pub size: i32,
	/// Text up to the first NUL.
	pub text: String,
	/// Stored bytes, all `size` of them.
	pub bytes: Vec<u8>,
}

/// `DT_STRING_FORMULA` payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormulaValue {
	/// Source offset.
	pub formula_offset: i32,
	/// Source byte size.
	pub formula_size: i32,
	/// Compiled blob offset.
	pub compiled_offset: i32,
	/// Compiled blob byte size.
	pub compiled_size: i32,
	/// Formula source text.
	pub text: String,
	/// Compiled formula bytes.
	pub compiled: Vec<u8>,
}

/// `DT_OPTIONAL` payload.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionalValue {
	/// Raw presence flag; the value is present when positive.
	pub exists: i32,
	/// Present value.
	pub value: Option<Box<Object>>,
}

/// `DT_RANGE` payload.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeValue {
	/// Lower bound.
	pub lower: Object,
	/// Upper bound.
	pub upper: Object,
}

/// `DT_VARIABLEARRAY` payload.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayValue {
	/// Data offset relative to the record origin.
	pub data_offset: i32,
	/// Data byte size.
	pub data_size: i32,
	/// Contents live in the sibling payload file and were not decoded.
	pub external: bool,
	/// Decoded elements.
	pub elements: Vec<Object>,
}

/// `DT_POLYMORPHIC_VARIABLEARRAY` payload.
#[derive(Debug, Clone, PartialEq)]
pub struct PolymorphicArrayValue {
	/// Data offset relative to the record origin.
	pub data_offset: i32,
	/// Data byte size.
	pub data_size: i32,
	/// Declared element count.
	pub count: i32,
	/// Contents live in the sibling payload file and were not decoded.
	pub external: bool,
	/// The stream ended while probing an element and the rest were dropped.
	pub truncated: bool,
	/// Decoded elements.
	pub elements: Vec<Object>,
}

/// `DT_TAGMAP` payload.
#[derive(Debug, Clone, PartialEq)]
pub struct TagMapValue {
	/// Data offset relative to the record origin.
	pub data_offset: i32,
	/// Data byte size.
	pub data_size: i32,
	/// Declared element type from the owning field.
	pub declared_type: Option<u32>,
	/// Entries in stored order.
	pub entries: Vec<TagMapEntry>,
}

/// One tagged-map entry.
#[derive(Debug, Clone, PartialEq)]
pub struct TagMapEntry {
	/// Field name, when the field hash is known.
	pub name: Option<Arc<str>>,
	/// Field hash key.
	pub field_hash: u32,
	/// Entry value.
	pub value: Object,
}

/// Decoded class instance.
#[derive(Debug, Clone, PartialEq)]
pub struct StructValue {
	/// Class name.
	pub type_name: Arc<str>,
	/// Fields in definition order.
	pub fields: Vec<FieldValue>,
}

/// One decoded class field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldValue {
	/// Field name.
	pub name: Arc<str>,
	/// Field hash.
	pub hash: u32,
	/// Field value.
	pub value: Object,
}

impl StructValue {
	/// Look up a field value by name.
	pub fn field(&self, name: &str) -> Option<&Object> {
		self.fields.iter().find(|field| field.name.as_ref() == name).map(|field| &field.value)
	}
}

impl Object {
	/// Class payload, if this is a class instance.
	pub fn as_struct(&self) -> Option<&StructValue> {
		match &self.value {
			Value::Struct(value) => Some(value),
			_ => None,
		}
	}

	/// Class field by name.
	pub fn field(&self, name: &str) -> Option<&Object> {
		self.as_struct()?.field(name)
	}

	/// Follow a dotted field path through nested classes.
	pub fn field_path(&self, path: &str) -> Option<&Object> {
		path.split('.').try_fold(self, |current, name| current.field(name))
	}

	/// Elements of any array-like container; empty for other values.
	pub fn elements(&self) -> &[Object] {
		match &self.value {
			Value::FixedArray(items) => items,
			Value::VariableArray(array) => &array.elements,
			Value::PolymorphicArray(array) => &array.elements,
			_ => &[],
		}
	}

	/// Integer view of integral scalars.
	pub fn as_i64(&self) -> Option<i64> {
		match self.value {
			Value::Byte(v) => Some(i64::from(v)),
			Value::Word(v) => Some(i64::from(v)),
			Value::Enum(v) | Value::Int(v) | Value::Sno(v) => Some(i64::from(v)),
			Value::Uint(v) | Value::StartlocName(v) => Some(i64::from(v)),
			Value::Int64(v) => Some(v),
			Value::Gbid(gbid) => Some(i64::from(gbid.value)),
			_ => None,
		}
	}

	/// Text view of strings and char arrays (cut at the first NUL).
	pub fn as_text(&self) -> Option<String> {
		match &self.value {
			Value::CString(value) => Some(value.text.clone()),
			Value::StringFormula(value) => Some(value.text.clone()),
			Value::CharArray(bytes) => Some(trim_nul(bytes)),
			_ => None,
		}
	}

	/// Short label of the decoded value kind.
	pub fn kind_name(&self) -> &'static str {
		match &self.value {
			Value::Null => "null",
			Value::Byte(_) => "byte",
			Value::Word(_) => "word",
			Value::Enum(_) => "enum",
			Value::Int(_) => "int",
			Value::Float(_) => "float",
			Value::Uint(_) => "uint",
			Value::Int64(_) => "int64",
			Value::Sno(_) => "sno",
			Value::SnoName { .. } => "sno_name",
			Value::Gbid(_) => "gbid",
			Value::StartlocName(_) => "startloc_name",
			Value::AcdNetworkName(_) => "acd_network_name",
			Value::SharedServerDataId(_) => "shared_server_data_id",
			Value::RgbaColor(_) => "rgba_color",
			Value::RgbaColorValue(_) => "rgba_color_value",
			Value::BcVec2i(_) => "bcvec2i",
			Value::Vector2d(_) => "vector2d",
			Value::Vector3d(_) => "vector3d",
			Value::Vector4d(_) => "vector4d",
			Value::CharArray(_) => "char_array",
			Value::CString(_) => "cstring",
			Value::StringFormula(_) => "string_formula",
			Value::Optional(_) => "optional",
			Value::Range(_) => "range",
			Value::FixedArray(_) => "fixed_array",
			Value::VariableArray(_) => "variable_array",
			Value::PolymorphicArray(_) => "polymorphic_array",
			Value::TagMap(_) => "tagmap",
			Value::Struct(_) => "struct",
		}
	}
}

/// Decode bytes up to the first NUL as lossy UTF-8.
pub fn trim_nul(bytes: &[u8]) -> String {
	let end = bytes.iter().position(|byte| *byte == 0).unwrap_or(bytes.len());
	String::from_utf8_lossy(&bytes[..end]).into_owned()
}
