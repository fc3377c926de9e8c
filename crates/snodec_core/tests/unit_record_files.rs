#![allow(missing_docs)]

use std::fs;

use snodec::sno::{Cursor, Decoder, Registry, SnoError, SnoMeta, content_hash, read_sno_meta_file, read_sno_meta_header};
use snodec_testkit::hashes::*;
use snodec_testkit::{ByteWriter, DefinitionsBuilder, FieldSpec, sno_record};

const SCENE_FORMAT: u32 = 0x5ce0;
const SCENE: u32 = 7100;
const MARKER: u32 = 7101;

fn registry() -> Registry {
	let defs = DefinitionsBuilder::new()
		.class(
			MARKER,
			"Marker",
			16,
			vec![
				FieldSpec::new("snoActor", 0x81, 0, &[DT_SNO]),
				FieldSpec::new("vPosition", 0x82, 4, &[DT_VECTOR3D]),
			],
		)
		.payload(
			SCENE,
			"SceneDefinition",
			SCENE_FORMAT,
			40,
			vec![
				FieldSpec::new("szName", 0x83, 8, &[DT_CSTRING]),
				FieldSpec::new("arMarkers", 0x84, 24, &[DT_VARIABLEARRAY, MARKER]),
			],
		);
	Registry::from_json_str(&defs.to_json()).expect("registry should build")
}

fn scene_payload(first_actor: i32) -> Vec<u8> {
	let mut w = ByteWriter::new();
	w.i32(77).pad_to(8);
	w.i64(0).i32(40).i32(6);
	w.i64(0).i32(48).i32(32);
	w.bytes(b"Crypt\0").pad_to(48);
	w.i32(first_actor).f32(1.0).f32(2.0).f32(3.0);
	w.i32(31).f32(-1.0).f32(0.0).f32(0.5);
	w.into_inner()
}

#[test]
fn record_file_round_trips_through_disk() {
	let registry = registry();
	let dir = tempfile::tempdir().expect("tempdir");
	let path = dir.path().join("crypt.scn");
	fs::write(&path, sno_record(SCENE_FORMAT, &scene_payload(30))).expect("write fixture");

	let header = read_sno_meta_header(&path).expect("header reads");
	assert_eq!(header.format_hash, SCENE_FORMAT);

	let meta = read_sno_meta_file(&registry, &path).expect("record decodes");
	assert_eq!(meta.id, 77);
	assert_eq!(meta.payload.field("szName").and_then(|v| v.as_text()).as_deref(), Some("Crypt"));
	let markers = meta.payload.field("arMarkers").expect("markers");
	assert_eq!(markers.elements().len(), 2);
	assert_eq!(meta.references(None), vec![30, 31]);

	let again = read_sno_meta_file(&registry, &path).expect("record decodes again");
	assert_eq!(content_hash(&meta.payload), content_hash(&again.payload));

	fs::write(&path, sno_record(SCENE_FORMAT, &scene_payload(32))).expect("rewrite fixture");
	let changed = read_sno_meta_file(&registry, &path).expect("changed record decodes");
	assert_ne!(content_hash(&meta.payload), content_hash(&changed.payload));
}

#[test]
fn unknown_format_hash_returns_no_record() {
	let registry = registry();
	let dir = tempfile::tempdir().expect("tempdir");
	let path = dir.path().join("unknown.scn");
	fs::write(&path, sno_record(0x0bad, &scene_payload(30))).expect("write fixture");

	let result = read_sno_meta_file(&registry, &path);
	assert!(matches!(result, Err(SnoError::UnknownFormatHash { hash: 0x0bad })));
}

#[test]
fn missing_file_is_an_io_error() {
	let registry = registry();
	let dir = tempfile::tempdir().expect("tempdir");
	let err = read_sno_meta_file(&registry, dir.path().join("absent.scn")).expect_err("missing file");
	assert!(matches!(err, SnoError::Io(_)));
}

#[test]
fn file_decode_matches_in_memory_decode() {
	let registry = registry();
	let bytes = sno_record(SCENE_FORMAT, &scene_payload(30));
	let dir = tempfile::tempdir().expect("tempdir");
	let path = dir.path().join("crypt.scn");
	fs::write(&path, &bytes).expect("write fixture");

	let from_file = read_sno_meta_file(&registry, &path).expect("file decodes");
	let in_memory = SnoMeta::decode(&Decoder::new(&registry), &mut Cursor::from_bytes(bytes)).expect("bytes decode");
	assert_eq!(from_file, in_memory);
}

#[test]
fn header_read_stops_at_the_header() {
	let dir = tempfile::tempdir().expect("tempdir");
	let path = dir.path().join("short.scn");
	fs::write(&path, &sno_record(SCENE_FORMAT, &[])[..10]).expect("write fixture");

	let err = read_sno_meta_header(&path).expect_err("short header");
	assert!(err.is_unexpected_eof());

	fs::write(&path, sno_record(SCENE_FORMAT, &scene_payload(30))).expect("rewrite fixture");
	assert_eq!(read_sno_meta_header(&path).expect("header reads").format_hash, SCENE_FORMAT);
}
