use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::{Deserialize, Deserializer};

use crate::sno::{Result, SnoError};

/// One type definition from the definitions document.
#[derive(Debug, Clone, Deserialize)]
pub struct Definition {
	/// Definition category (`basic` for engine primitives, otherwise a class).
	#[serde(rename = "type", default)]
	pub category: String,
	/// Type hash.
	#[serde(deserialize_with = "hash32")]
	pub hash: u32,
	/// Type name.
	pub name: String,
	/// Raw type flags.
	#[serde(default, deserialize_with = "hash32")]
	pub flags: u32,
	/// Type hashes this definition inherits from.
	#[serde(default, deserialize_with = "hash32_list")]
	pub inherits: Vec<u32>,
	/// Format hash for top-level record payload types, `0` otherwise.
	#[serde(rename = "dwFormatHash", default, deserialize_with = "hash32")]
	pub format_hash: u32,
	/// Whether the class participates in polymorphic dispatch.
	#[serde(rename = "isPolymorphicType", default)]
	pub is_polymorphic_type: bool,
	/// Field list; `None` when the document carries no field information.
	#[serde(default)]
	pub fields: Option<Vec<FieldDef>>,
	/// Static byte size.
	#[serde(default)]
	pub size: u32,
}

impl Definition {
	/// Return `true` for engine primitive definitions.
	pub fn is_basic(&self) -> bool {
		self.category == "basic"
	}
}

/// One field of a class definition.
#[derive(Debug, Clone, Deserialize)]
pub struct FieldDef {
	/// Three-slot type composition (outer type, subtype, sub-subtype).
	#[serde(rename = "type", deserialize_with = "hash32_triple")]
	pub type_chain: [u32; 3],
	/// Field hash.
	#[serde(deserialize_with = "hash32")]
	pub hash: u32,
	/// Field name.
	pub name: String,
	/// Raw field flags.
	#[serde(default, deserialize_with = "hash32")]
	pub flags: u32,
	/// Byte offset from the start of the owning struct.
	#[serde(default)]
	pub offset: u32,
	/// Fixed array length, when the field has one.
	#[serde(rename = "arrayLength", default, deserialize_with = "non_negative")]
	pub array_length: Option<u32>,
	/// SNO group for group-scoped identifiers.
	#[serde(default, deserialize_with = "non_negative_group")]
	pub group: Option<i32>,
	/// Declared element type of a tagged map field.
	#[serde(rename = "tagMapType", default, deserialize_with = "non_negative")]
	pub tagmap_type: Option<u32>,
}

/// Parsed definitions document keyed by type hash.
#[derive(Debug, Clone, Default)]
pub struct Definitions {
	/// Type definitions by hash.
	pub types: BTreeMap<u32, Definition>,
}

impl Definitions {
	/// Parse a JSON document.
	pub fn from_json_str(json: &str) -> Result<Self> {
		let raw: HashMap<String, Definition> = serde_json::from_str(json)?;
		Self::from_raw(raw)
	}

	/// Parse a JSON document from a reader.
	pub fn from_reader(reader: impl Read) -> Result<Self> {
		let raw: HashMap<String, Definition> = serde_json::from_reader(reader)?;
		Self::from_raw(raw)
	}

	/// Load a JSON document from disk.
	pub fn load(path: impl AsRef<Path>) -> Result<Self> {
		Self::from_reader(BufReader::new(File::open(path)?))
	}

	/// Look up a definition by type hash.
	pub fn get(&self, hash: u32) -> Option<&Definition> {
		self.types.get(&hash)
	}

	/// Number of definitions.
	pub fn len(&self) -> usize {
		self.types.len()
	}

	/// Return `true` when the document held no definitions.
	pub fn is_empty(&self) -> bool {
		self.types.is_empty()
	}

	fn from_raw(raw: HashMap<String, Definition>) -> Result<Self> {
		let mut types = BTreeMap::new();
		for (key, def) in raw {
			let hash = key.trim().parse::<i64>().map_err(|_| SnoError::InvalidDefinitionKey { key: key.clone() })? as u32;
			types.insert(hash, def);
		}
		Ok(Self { types })
	}
}

fn hash32<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<u32, D::Error> {
	Ok(i64::deserialize(deserializer)? as u32)
}

fn hash32_list<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Vec<u32>, D::Error> {
	let raw = Option::<Vec<i64>>::deserialize(deserializer)?;
	Ok(raw.unwrap_or_default().into_iter().map(|value| value as u32).collect())
}

fn hash32_triple<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<[u32; 3], D::Error> {
	let raw = <[i64; 3]>::deserialize(deserializer)?;
	Ok(raw.map(|value| value as u32))
}

fn non_negative<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Option<u32>, D::Error> {
	let raw = Option::<i64>::deserialize(deserializer)?;
	Ok(raw.filter(|value| *value >= 0).map(|value| value as u32))
}

fn non_negative_group<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Option<i32>, D::Error> {
	let raw = Option::<i64>::deserialize(deserializer)?;
	Ok(raw.filter(|value| *value >= 0).map(|value| value as i32))
}
