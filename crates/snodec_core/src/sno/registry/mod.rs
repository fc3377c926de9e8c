use std::collections::{HashMap, HashSet};
use std::sync::{Arc, OnceLock};

use tracing::{debug, warn};

use crate::sno::{Definition, Definitions, FieldDef, FieldFlags, FieldOptions, Result, SnoError, TypeChain, TypeFlags};

const POLYMORPHIC_BASE: &str = "PolymorphicBase";
const POLYMORPHIC_TYPE_FIELD: &str = "dwType";

static GLOBAL: OnceLock<Registry> = OnceLock::new();

/// Engine primitive recognized by definition name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BasicKind {
	/// `DT_NULL`
	Null,
	/// `DT_BYTE`
	Byte,
	/// `DT_WORD`
	Word,
	/// `DT_ENUM`
	Enum,
	/// `DT_INT`
	Int,
	/// `DT_FLOAT`
	Float,
	/// `DT_UINT`
	Uint,
	/// `DT_INT64`
	Int64,
	/// `DT_SNO`
	Sno,
	/// `DT_SNO_NAME`
	SnoName,
	/// `DT_GBID`
	Gbid,
	/// `DT_STARTLOC_NAME`
	StartlocName,
	/// `DT_ACD_NETWORK_NAME`
	AcdNetworkName,
	/// `DT_SHARED_SERVER_DATA_ID`
	SharedServerDataId,
	/// `DT_RGBACOLOR`
	RgbaColor,
	/// `DT_RGBACOLORVALUE`
	RgbaColorValue,
	/// `DT_BCVEC2I`
	BcVec2i,
	/// `DT_VECTOR2D`
	Vector2d,
	/// `DT_VECTOR3D`
	Vector3d,
	/// `DT_VECTOR4D`
	Vector4d,
	/// `DT_CHARARRAY`
	CharArray,
	/// `DT_CSTRING`
	CString,
	/// `DT_STRING_FORMULA`
	StringFormula,
	/// `DT_OPTIONAL`
	Optional,
	/// `DT_RANGE`
	Range,
	/// `DT_FIXEDARRAY`
	FixedArray,
	/// `DT_VARIABLEARRAY`
	VariableArray,
	/// `DT_POLYMORPHIC_VARIABLEARRAY`
	PolymorphicVariableArray,
	/// `DT_TAGMAP`
	TagMap,
}

impl BasicKind {
	const ALL: [Self; 29] = [
		Self::Null,
		Self::Byte,
		Self::Word,
		Self::Enum,
		Self::Int,
		Self::Float,
		Self::Uint,
		Self::Int64,
		Self::Sno,
		Self::SnoName,
		Self::Gbid,
		Self::StartlocName,
		Self::AcdNetworkName,
		Self::SharedServerDataId,
		Self::RgbaColor,
		Self::RgbaColorValue,
		Self::BcVec2i,
		Self::Vector2d,
		Self::Vector3d,
		Self::Vector4d,
		Self::CharArray,
		Self::CString,
		Self::StringFormula,
		Self::Optional,
		Self::Range,
		Self::FixedArray,
		Self::VariableArray,
		Self::PolymorphicVariableArray,
		Self::TagMap,
	];

	/// Definition name of this primitive.
	pub fn name(self) -> &'static str {
		match self {
			Self::Null => "DT_NULL",
			Self::Byte => "DT_BYTE",
			Self::Word => "DT_WORD",
			Self::Enum => "DT_ENUM",
			Self::Int => "DT_INT",
			Self::Float => "DT_FLOAT",
			Self::Uint => "DT_UINT",
			Self::Int64 => "DT_INT64",
			Self::Sno => "DT_SNO",
			Self::SnoName => "DT_SNO_NAME",
			Self::Gbid => "DT_GBID",
			Self::StartlocName => "DT_STARTLOC_NAME",
			Self::AcdNetworkName => "DT_ACD_NETWORK_NAME",
			Self::SharedServerDataId => "DT_SHARED_SERVER_DATA_ID",
			Self::RgbaColor => "DT_RGBACOLOR",
			Self::RgbaColorValue => "DT_RGBACOLORVALUE",
			Self::BcVec2i => "DT_BCVEC2I",
			Self::Vector2d => "DT_VECTOR2D",
			Self::Vector3d => "DT_VECTOR3D",
			Self::Vector4d => "DT_VECTOR4D",
			Self::CharArray => "DT_CHARARRAY",
			Self::CString => "DT_CSTRING",
			Self::StringFormula => "DT_STRING_FORMULA",
			Self::Optional => "DT_OPTIONAL",
			Self::Range => "DT_RANGE",
			Self::FixedArray => "DT_FIXEDARRAY",
			Self::VariableArray => "DT_VARIABLEARRAY",
			Self::PolymorphicVariableArray => "DT_POLYMORPHIC_VARIABLEARRAY",
			Self::TagMap => "DT_TAGMAP",
		}
	}

	/// Resolve a primitive from its definition name.
	pub fn from_name(name: &str) -> Option<Self> {
		Self::ALL.into_iter().find(|kind| kind.name() == name)
	}

	/// Return `true` for containers whose alignment is their element's alignment.
	pub fn aligns_to_subtype(self) -> bool {
		matches!(self, Self::FixedArray | Self::Optional | Self::Range)
	}

	fn alignment(self, size: u32, in_tagmap: bool) -> u32 {
		match self {
			Self::Null => 0,
			Self::PolymorphicVariableArray | Self::StringFormula | Self::VariableArray | Self::TagMap | Self::CString => {
				if in_tagmap {
					4
				} else {
					8
				}
			}
			Self::CharArray => 1,
			Self::SnoName => 4,
			_ => size,
		}
	}
}

/// How values of a registered type are decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
	/// Engine primitive with a built-in decoder.
	Basic(BasicKind),
	/// Primitive the decoder does not know.
	UnsupportedBasic,
	/// Class decoded from its field list.
	Struct,
}

/// Flags and alignment of one registered type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LayoutOptions {
	/// Type flags.
	pub flags: TypeFlags,
	/// Alignment as a struct member.
	pub alignment: u32,
	/// Alignment as a tagged-map value.
	pub tagmap_alignment: u32,
}

/// One resolved class field.
#[derive(Debug, Clone)]
pub struct FieldLayout {
	/// Field name.
	pub name: Arc<str>,
	/// Field hash.
	pub hash: u32,
	/// Field type composition, truncated at the first `DT_NULL`.
	pub chain: TypeChain,
	/// Byte offset from the start of the owning struct.
	pub offset: u32,
	/// Field flags.
	pub flags: FieldFlags,
	/// Fixed array length.
	pub array_length: Option<u32>,
	/// Group for group-scoped identifiers.
	pub group: Option<i32>,
	/// Declared tagged-map element type.
	pub tagmap_type: Option<u32>,
}

impl FieldLayout {
	/// Decode options carried by this field.
	pub fn options(&self) -> FieldOptions {
		FieldOptions {
			flags: self.flags,
			array_length: self.array_length,
			group: self.group,
			override_type: None,
			tagmap_type: self.tagmap_type,
		}
	}
}

/// One registered type: the factory the decoder dispatches on.
#[derive(Debug, Clone)]
pub struct TypeEntry {
	/// Type hash.
	pub hash: u32,
	/// Type name.
	pub name: Arc<str>,
	/// Decoding strategy.
	pub kind: TypeKind,
	/// Static byte size.
	pub size: u32,
	/// Format hash for top-level payload types, `0` otherwise.
	pub format_hash: u32,
	/// Flags and alignment.
	pub layout: LayoutOptions,
	/// Field list, absent when the definitions carried none.
	pub fields: Option<Arc<[FieldLayout]>>,
	/// Inherited type hashes.
	pub inherits: Vec<u32>,
	/// Whether the class participates in polymorphic dispatch.
	pub is_polymorphic: bool,
}

impl TypeEntry {
	/// Fields in definition order; empty when none were declared.
	pub fn field_list(&self) -> &[FieldLayout] {
		self.fields.as_deref().unwrap_or(&[])
	}

	/// Look up a field by name.
	pub fn field(&self, name: &str) -> Option<&FieldLayout> {
		self.field_list().iter().find(|field| field.name.as_ref() == name)
	}

	/// Return `true` when the type is a generic container with a subtype.
	pub fn has_subtype(&self) -> bool {
		self.layout.flags.contains(TypeFlags::HAS_SUBTYPE)
	}
}

/// Immutable hash-to-type tables built once from the definitions document.
#[derive(Debug)]
pub struct Registry {
	types: HashMap<u32, TypeEntry>,
	by_format: HashMap<u32, u32>,
	by_name: HashMap<Arc<str>, u32>,
	field_names: HashMap<u32, Arc<str>>,
	polymorphic_type_offset: Option<u32>,
}

impl Registry {
	/// Build all lookup tables and per-type layouts.
	pub fn build(defs: Definitions) -> Result<Self> {
		let mut by_name = HashMap::with_capacity(defs.len());
		let mut by_format = HashMap::new();
		let mut field_names = HashMap::new();

		for (&hash, def) in &defs.types {
			by_name.insert(Arc::<str>::from(def.name.as_str()), hash);
			if def.format_hash != 0 {
				by_format.insert(def.format_hash, hash);
			}
			for field in def.fields.iter().flatten() {
				field_names.entry(field.hash).or_insert_with(|| Arc::<str>::from(field.name.as_str()));
			}
		}

		let null_hash = by_name.get(BasicKind::Null.name()).copied();
		let mut solver = AlignmentSolver::new(&defs);
		let mut types = HashMap::with_capacity(defs.len());

		for (&hash, def) in &defs.types {
			let layout = LayoutOptions {
				flags: TypeFlags(def.flags),
				alignment: solver.chain(&[hash], false),
				tagmap_alignment: solver.chain(&[hash], true),
			};
			let fields = def
				.fields
				.as_ref()
				.map(|fields| fields.iter().map(|field| resolve_field(&defs, null_hash, field)).collect::<Arc<[_]>>());

			types.insert(
				hash,
				TypeEntry {
					hash,
					name: Arc::<str>::from(def.name.as_str()),
					kind: type_kind(def),
					size: def.size,
					format_hash: def.format_hash,
					layout,
					fields,
					inherits: def.inherits.clone(),
					is_polymorphic: def.is_polymorphic_type,
				},
			);
		}

		let polymorphic_type_offset = by_name
			.get(POLYMORPHIC_BASE)
			.and_then(|hash| types.get(hash))
			.and_then(|entry| entry.field(POLYMORPHIC_TYPE_FIELD))
			.map(|field| field.offset);

		debug!(
			types = types.len(),
			formats = by_format.len(),
			fields = field_names.len(),
			polymorphic_probe = polymorphic_type_offset.is_some(),
			"built type registry"
		);

		Ok(Self {
			types,
			by_format,
			by_name,
			field_names,
			polymorphic_type_offset,
		})
	}

	/// Parse a definitions document and build the registry from it.
	pub fn from_json_str(json: &str) -> Result<Self> {
		Self::build(Definitions::from_json_str(json)?)
	}

	/// Make this registry the process-wide instance.
	pub fn install(self) -> Result<&'static Registry> {
		GLOBAL.set(self).map_err(|_| SnoError::RegistryAlreadyInstalled)?;
		GLOBAL.get().ok_or(SnoError::RegistryAlreadyInstalled)
	}

	/// Process-wide registry, if one was installed.
	pub fn global() -> Option<&'static Registry> {
		GLOBAL.get()
	}

	/// Number of registered types.
	pub fn len(&self) -> usize {
		self.types.len()
	}

	/// Return `true` when no types are registered.
	pub fn is_empty(&self) -> bool {
		self.types.is_empty()
	}

	/// Resolve a type hash by type name.
	pub fn type_hash_by_name(&self, name: &str) -> Option<u32> {
		self.by_name.get(name).copied()
	}

	/// Resolve a type hash the decoder cannot work without.
	pub fn require_type_hash(&self, name: &'static str) -> Result<u32> {
		self.type_hash_by_name(name).ok_or(SnoError::UnknownTypeName { name })
	}

	/// Resolve the factory for a type hash.
	pub fn construct_by_type_hash(&self, hash: u32) -> Result<&TypeEntry> {
		self.types.get(&hash).ok_or(SnoError::UnknownTypeHash { hash })
	}

	/// Resolve the payload factory for a record format hash.
	pub fn construct_by_format_hash(&self, format_hash: u32) -> Result<&TypeEntry> {
		let hash = self.by_format.get(&format_hash).ok_or(SnoError::UnknownFormatHash { hash: format_hash })?;
		self.construct_by_type_hash(*hash)
	}

	/// Look up a field name by field hash.
	pub fn field_name_by_hash(&self, hash: u32) -> Option<&str> {
		self.field_names.get(&hash).map(AsRef::as_ref)
	}

	/// Look up a shared field name by field hash.
	pub(crate) fn field_name_arc(&self, hash: u32) -> Option<Arc<str>> {
		self.field_names.get(&hash).cloned()
	}

	/// Flags and alignment for a type hash.
	pub fn layout_options_by_type_hash(&self, hash: u32) -> Result<LayoutOptions> {
		Ok(self.construct_by_type_hash(hash)?.layout)
	}

	/// Alignment of a composed type; containers that align to their element recurse into the subtype.
	pub fn alignment_for_chain(&self, chain: &[u32], in_tagmap: bool) -> u32 {
		let Some((&head, rest)) = chain.split_first() else {
			return 0;
		};
		let Some(entry) = self.types.get(&head) else {
			warn!(hash = head, "no alignment information for unknown type, using 4");
			return 4;
		};

		match entry.kind {
			TypeKind::Basic(kind) if kind.aligns_to_subtype() => self.alignment_for_chain(rest, false),
			_ if in_tagmap => entry.layout.tagmap_alignment,
			_ => entry.layout.alignment,
		}
	}

	/// Padding boundary in front of a tagged-map value of `type_hash` with optional `sub_type_hash`.
	pub fn tagmap_entry_alignment(&self, type_hash: u32, sub_type_hash: Option<u32>) -> Result<u32> {
		let entry = self.construct_by_type_hash(type_hash)?;
		let alignment = match entry.kind {
			TypeKind::Basic(kind) if kind.aligns_to_subtype() => match sub_type_hash {
				Some(sub) => self.construct_by_type_hash(sub)?.layout.tagmap_alignment,
				None => 0,
			},
			_ => entry.layout.tagmap_alignment,
		};
		Ok(alignment.max(1))
	}

	/// Byte offset of the runtime type hash inside every polymorphic element.
	pub fn polymorphic_type_offset(&self) -> Result<u32> {
		self.polymorphic_type_offset.ok_or(SnoError::UnknownTypeName { name: POLYMORPHIC_BASE })
	}
}

fn type_kind(def: &Definition) -> TypeKind {
	if def.fields.is_some() || !def.is_basic() {
		return TypeKind::Struct;
	}
	match BasicKind::from_name(&def.name) {
		Some(kind) => TypeKind::Basic(kind),
		None => TypeKind::UnsupportedBasic,
	}
}

fn resolve_field(defs: &Definitions, null_hash: Option<u32>, field: &FieldDef) -> FieldLayout {
	let used = field
		.type_chain
		.iter()
		.position(|hash| *hash == 0 || Some(*hash) == null_hash)
		.unwrap_or(field.type_chain.len());
	let mut chain = TypeChain::new(&field.type_chain[..used]);

	// A container with no declared subtype is parameterized by DT_NULL.
	let last_has_subtype = chain
		.as_slice()
		.last()
		.and_then(|hash| defs.get(*hash))
		.is_some_and(|def| TypeFlags(def.flags).contains(TypeFlags::HAS_SUBTYPE));
	if let (true, Some(null)) = (last_has_subtype, null_hash) {
		chain = chain.push(null);
	}

	FieldLayout {
		name: Arc::<str>::from(field.name.as_str()),
		hash: field.hash,
		chain,
		offset: field.offset,
		flags: FieldFlags(field.flags),
		array_length: field.array_length,
		group: field.group,
		tagmap_type: field.tagmap_type,
	}
}

struct AlignmentSolver<'a> {
	defs: &'a Definitions,
	classes: HashMap<u32, u32>,
	visiting: HashSet<u32>,
}

impl<'a> AlignmentSolver<'a> {
	fn new(defs: &'a Definitions) -> Self {
		Self {
			defs,
			classes: HashMap::new(),
			visiting: HashSet::new(),
		}
	}

	fn chain(&mut self, chain: &[u32], in_tagmap: bool) -> u32 {
		let Some((&head, rest)) = chain.split_first() else {
			return 0;
		};
		let defs = self.defs;
		let Some(def) = defs.get(head) else {
			warn!(hash = head, "no alignment information for unknown type, using 4");
			return 4;
		};

		match &def.fields {
			None if def.is_basic() => match BasicKind::from_name(&def.name) {
				Some(kind) if kind.aligns_to_subtype() => self.chain(rest, false),
				Some(kind) => kind.alignment(def.size, in_tagmap),
				None => def.size,
			},
			None => {
				warn!(name = %def.name, hash = head, "no alignment information for type, using 4");
				4
			}
			Some(fields) if fields.is_empty() => 1,
			Some(fields) => self.class(head, &def.name, fields),
		}
	}

	fn class(&mut self, hash: u32, name: &str, fields: &[FieldDef]) -> u32 {
		if let Some(alignment) = self.classes.get(&hash) {
			return *alignment;
		}
		if !self.visiting.insert(hash) {
			warn!(name, hash, "cyclic type while computing alignment, using 4");
			return 4;
		}

		let alignment = fields.iter().map(|field| self.chain(&field.type_chain, false)).max().unwrap_or(1);

		self.visiting.remove(&hash);
		self.classes.insert(hash, alignment);
		alignment
	}
}

#[cfg(test)]
mod tests;
