use snodec_testkit::hashes::*;
use snodec_testkit::{ByteWriter, DefinitionsBuilder, FieldSpec};

use crate::sno::{Cursor, Decoder, FieldOptions, Object, Registry, content_crc32, content_hash, hash_object};

const RECORD: u32 = 4000;

fn registry() -> Registry {
	let defs = DefinitionsBuilder::new().class(
		RECORD,
		"Record",
		32,
		vec![
			FieldSpec::new("nLevel", 0x11, 0, &[DT_INT]),
			FieldSpec::new("flScale", 0x12, 4, &[DT_FLOAT]),
			FieldSpec::new("arIds", 0x13, 8, &[DT_VARIABLEARRAY, DT_SNO]),
			FieldSpec::new("bFlag", 0x14, 24, &[DT_BYTE]),
		],
	);
	Registry::from_json_str(&defs.to_json()).expect("registry should build")
}

fn fixture() -> Vec<u8> {
	let mut w = ByteWriter::new();
	w.i32(3).f32(1.25).i64(0).i32(32).i32(8).u8(1).pad_to(32).i32(100).i32(200);
	w.into_inner()
}

fn decode(registry: &Registry, bytes: Vec<u8>) -> Object {
	let mut cursor = Cursor::from_bytes(bytes);
	Decoder::new(registry)
		.decode_type(&mut cursor, RECORD, &FieldOptions::default())
		.expect("fixture decodes")
}

#[test]
fn canonical_encoding_prefixes_fields_with_their_hash() {
	let registry = registry();
	let object = decode(&registry, fixture());

	let mut bytes = Vec::new();
	hash_object(&object, &mut bytes);

	let mut expected = ByteWriter::new();
	expected.u32(0x11).i32(3);
	expected.u32(0x12).f32(1.25);
	expected.u32(0x13).i32(100).i32(200);
	expected.u32(0x14).u8(1);
	assert_eq!(bytes, expected.into_inner());
}

#[test]
fn hash_is_deterministic_across_decodes() {
	let registry = registry();
	let first = decode(&registry, fixture());
	let second = decode(&registry, fixture());

	assert_eq!(content_hash(&first), content_hash(&second));
	assert_eq!(content_crc32(&first), content_crc32(&second));
}

#[test]
fn single_leaf_mutation_changes_the_hash() {
	let registry = registry();
	let baseline = decode(&registry, fixture());

	let mut bytes = fixture();
	bytes[36] = 201;
	let mutated = decode(&registry, bytes);

	assert_ne!(content_hash(&baseline), content_hash(&mutated));
	assert_ne!(content_crc32(&baseline), content_crc32(&mutated));
}

#[test]
fn balance_id_group_is_part_of_the_hash() {
	let defs = DefinitionsBuilder::new()
		.class(4001, "WeaponRef", 4, vec![FieldSpec::new("gbItem", 0x21, 0, &[DT_GBID]).group(3)])
		.class(4002, "ArmorRef", 4, vec![FieldSpec::new("gbItem", 0x21, 0, &[DT_GBID]).group(9)]);
	let registry = Registry::from_json_str(&defs.to_json()).expect("registry should build");
	let decode_as = |type_hash: u32| {
		let mut cursor = Cursor::from_bytes(77_u32.to_le_bytes().to_vec());
		Decoder::new(&registry)
			.decode_type(&mut cursor, type_hash, &FieldOptions::default())
			.expect("fixture decodes")
	};

	let weapon = decode_as(4001);
	let armor = decode_as(4002);
	assert_eq!(weapon.field("gbItem").and_then(Object::as_i64), armor.field("gbItem").and_then(Object::as_i64));
	assert_ne!(content_hash(&weapon), content_hash(&armor));
}

#[test]
fn cstring_bytes_after_the_terminator_change_the_hash() {
	let defs = DefinitionsBuilder::new().class(4003, "Named", 16, vec![FieldSpec::new("szName", 0x31, 0, &[DT_CSTRING])]);
	let registry = Registry::from_json_str(&defs.to_json()).expect("registry should build");
	let decode_text = |text: &[u8]| {
		let mut w = ByteWriter::new();
		w.i64(0).i32(16).i32(text.len() as i32).bytes(text);
		let mut cursor = Cursor::from_bytes(w.into_inner());
		Decoder::new(&registry)
			.decode_type(&mut cursor, 4003, &FieldOptions::default())
			.expect("fixture decodes")
	};

	let first = decode_text(b"ab\0xyz\0\0");
	let second = decode_text(b"ab\0xyq\0\0");
	assert_eq!(first.field("szName").and_then(Object::as_text), second.field("szName").and_then(Object::as_text));
	assert_ne!(content_hash(&first), content_hash(&second));
	assert_eq!(content_hash(&first), content_hash(&decode_text(b"ab\0xyz\0\0")));
}
