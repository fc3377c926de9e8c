use snodec_testkit::hashes::*;
use snodec_testkit::{ByteWriter, DefinitionsBuilder, FieldSpec, SNO_SIGNATURE, balance, sno_record};

use crate::sno::{BalanceTable, Cursor, Decoder, Gbid, Registry, SNO_HEADER_SIZE, SnoError, SnoGroup, SnoHeader, SnoMeta, gbid_hash};

const ACTOR_FORMAT: u32 = 0xabcd;
const ACTOR: u32 = 7000;

fn registry() -> Registry {
	let defs = DefinitionsBuilder::new().payload(
		ACTOR,
		"ActorDefinition",
		ACTOR_FORMAT,
		32,
		vec![
			FieldSpec::new("snoParent", 0x71, 8, &[DT_SNO]),
			FieldSpec::new("snoWorld", 0x72, 12, &[DT_SNO_NAME]),
			FieldSpec::new("gbItem", 0x73, 20, &[DT_GBID]).group(3),
			FieldSpec::new("snoMissing", 0x74, 24, &[DT_SNO]),
		],
	);
	Registry::from_json_str(&balance::definitions(defs).to_json()).expect("registry should build")
}

fn actor_payload(id: i32) -> Vec<u8> {
	let mut w = ByteWriter::new();
	w.i32(id).pad_to(8).i32(44).i32(SnoGroup::WORLD.0).i32(55).u32(gbid_hash("Axe")).i32(-1).pad_to(32);
	w.into_inner()
}

#[test]
fn decodes_header_id_and_payload() {
	let registry = registry();
	let bytes = sno_record(ACTOR_FORMAT, &actor_payload(900));
	let mut cursor = Cursor::from_bytes(bytes);

	let meta = SnoMeta::decode(&Decoder::new(&registry), &mut cursor).expect("record decodes");
	assert_eq!(meta.header.signature, SNO_SIGNATURE);
	assert_eq!(meta.header.format_hash, ACTOR_FORMAT);
	assert_eq!(meta.id, 900);
	assert_eq!(meta.payload_type_name(), Some("ActorDefinition"));
	assert_eq!(meta.payload.field("snoParent").and_then(|v| v.as_i64()), Some(44));
	assert_eq!(cursor.origin(), SNO_HEADER_SIZE);
	assert_eq!(cursor.position().expect("position"), 32);
}

#[test]
fn header_reads_without_registry() {
	let bytes = sno_record(ACTOR_FORMAT, &[]);
	let header = SnoHeader::read(&mut Cursor::from_bytes(bytes)).expect("header");
	assert_eq!(header.format_hash, ACTOR_FORMAT);
	assert_eq!(header.content_checksum, 0x1234_5678);
	assert_eq!(header.reserved, 0);
}

#[test]
fn unknown_format_hash_is_fatal() {
	let registry = registry();
	let bytes = sno_record(0xdead, &actor_payload(1));
	let err = SnoMeta::decode(&Decoder::new(&registry), &mut Cursor::from_bytes(bytes)).expect_err("unknown format");
	assert!(matches!(err, SnoError::UnknownFormatHash { hash: 0xdead }));
}

#[test]
fn truncated_payload_is_fatal() {
	let registry = registry();
	let mut payload = actor_payload(1);
	payload.truncate(22);
	let err = SnoMeta::decode(&Decoder::new(&registry), &mut Cursor::from_bytes(sno_record(ACTOR_FORMAT, &payload))).expect_err("short payload");
	assert!(err.is_unexpected_eof());
}

#[test]
fn references_collect_positive_ids_and_resolve_balance_ids() {
	let registry = registry();
	let decoder = Decoder::new(&registry);
	let meta = SnoMeta::decode(&decoder, &mut Cursor::from_bytes(sno_record(ACTOR_FORMAT, &actor_payload(900)))).expect("record decodes");

	assert_eq!(meta.references(None), vec![44, 55]);

	let table = BalanceTable::new();
	let balance = SnoMeta::decode(
		&decoder,
		&mut Cursor::from_bytes(sno_record(balance::FORMAT_HASH, &balance::payload(321, 3, &["Axe", "Sword"]))),
	)
	.expect("balance record decodes");
	assert_eq!(table.register(&balance), 2);
	assert_eq!(table.get(&Gbid { group: 3, value: gbid_hash("sword") }).map(|info| info.name), Some("Sword".to_owned()));

	assert_eq!(meta.references(Some(&table)), vec![44, 55, 321]);
}

#[test]
fn non_balance_records_register_nothing() {
	let registry = registry();
	let meta = SnoMeta::decode(&Decoder::new(&registry), &mut Cursor::from_bytes(sno_record(ACTOR_FORMAT, &actor_payload(5)))).expect("record decodes");
	let table = BalanceTable::new();
	assert_eq!(table.register(&meta), 0);
	assert!(table.is_empty());
}
