use crate::sno::{Object, Value};

/// Byte sink fed by [`hash_object`].
pub trait DigestSink {
	/// Append bytes to the digest.
	fn update(&mut self, bytes: &[u8]);
}

impl DigestSink for blake3::Hasher {
	fn update(&mut self, bytes: &[u8]) {
		blake3::Hasher::update(self, bytes);
	}
}

impl DigestSink for crc32fast::Hasher {
	fn update(&mut self, bytes: &[u8]) {
		crc32fast::Hasher::update(self, bytes);
	}
}

impl DigestSink for Vec<u8> {
	fn update(&mut self, bytes: &[u8]) {
		self.extend_from_slice(bytes);
	}
}

/// Feed the canonical encoding of `object` into `sink`.
///
/// Leaves write their fixed-width little-endian encoding. C strings write
/// every stored byte, NULs included; formulas write source text then
/// compiled bytes. Class fields and tagged-map entries write their field
/// hash before their value. Containers write children in walk order and an absent
/// optional writes nothing. The result only depends on decoded content, so
/// two decodes of the same bytes produce the same digest.
pub fn hash_object(object: &Object, sink: &mut impl DigestSink) {
	match &object.value {
		Value::Null => {}
		Value::Byte(v) => sink.update(&[*v]),
		Value::Word(v) => sink.update(&v.to_le_bytes()),
		Value::Enum(v) | Value::Int(v) | Value::Sno(v) => sink.update(&v.to_le_bytes()),
		Value::Float(v) => sink.update(&v.to_le_bytes()),
		Value::Uint(v) | Value::StartlocName(v) => sink.update(&v.to_le_bytes()),
		Value::Int64(v) => sink.update(&v.to_le_bytes()),
		Value::SnoName { group, id } => {
			sink.update(&group.0.to_le_bytes());
			sink.update(&id.to_le_bytes());
		}
		Value::Gbid(gbid) => {
			sink.update(&gbid.group.to_le_bytes());
			sink.update(&gbid.value.to_le_bytes());
		}
		Value::AcdNetworkName(v) | Value::SharedServerDataId(v) => sink.update(&v.to_le_bytes()),
		Value::RgbaColor(channels) => sink.update(channels),
		Value::RgbaColorValue(c) | Value::Vector4d(c) => update_floats(sink, c),
		Value::BcVec2i(c) | Value::Vector2d(c) => update_floats(sink, c),
		Value::Vector3d(c) => update_floats(sink, c),
		Value::CharArray(bytes) => sink.update(bytes),
		Value::CString(value) => sink.update(&value.bytes),
		Value::StringFormula(value) => {
			sink.update(value.text.as_bytes());
			sink.update(&value.compiled);
		}
		Value::Struct(value) => {
			for field in &value.fields {
				sink.update(&field.hash.to_le_bytes());
				hash_object(&field.value, sink);
			}
		}
		Value::TagMap(map) => {
			for entry in &map.entries {
				sink.update(&entry.field_hash.to_le_bytes());
				hash_object(&entry.value, sink);
			}
		}
		Value::Optional(_) | Value::Range(_) | Value::FixedArray(_) | Value::VariableArray(_) | Value::PolymorphicArray(_) => {
			object.for_each_child(|_, child| hash_object(child, sink));
		}
	}
}

/// blake3 digest of the canonical encoding.
pub fn content_hash(object: &Object) -> blake3::Hash {
	let mut hasher = blake3::Hasher::new();
	hash_object(object, &mut hasher);
	hasher.finalize()
}

/// CRC-32 of the canonical encoding.
pub fn content_crc32(object: &Object) -> u32 {
	let mut hasher = crc32fast::Hasher::new();
	hash_object(object, &mut hasher);
	hasher.finalize()
}

fn update_floats(sink: &mut impl DigestSink, values: &[f32]) {
	for value in values {
		sink.update(&value.to_le_bytes());
	}
}

#[cfg(test)]
mod tests;
