#![allow(missing_docs)]

use std::fs;
use std::path::PathBuf;

use snodec::sno::{BatchDecoder, Registry, SnoError};
use snodec_testkit::hashes::*;
use snodec_testkit::{ByteWriter, DefinitionsBuilder, FieldSpec, balance, sno_record};

const LOOT_FORMAT: u32 = 0x1007;
const LOOT: u32 = 7200;

fn registry() -> Registry {
	let defs = DefinitionsBuilder::new().payload(
		LOOT,
		"LootDefinition",
		LOOT_FORMAT,
		16,
		vec![FieldSpec::new("arItems", 0x91, 0, &[DT_VARIABLEARRAY, DT_GBID]).group(7)],
	);
	Registry::from_json_str(&balance::definitions(defs).to_json()).expect("registry should build")
}

fn loot_payload(names: &[&str]) -> Vec<u8> {
	let mut w = ByteWriter::new();
	w.i64(0).i32(16).i32(4 * names.len() as i32);
	for name in names {
		w.u32(snodec::sno::gbid_hash(name));
	}
	w.into_inner()
}

#[test]
fn balance_pass_feeds_references_of_the_dependent_pass() {
	let registry = registry();
	let dir = tempfile::tempdir().expect("tempdir");

	let write = |name: &str, bytes: Vec<u8>| -> PathBuf {
		let path = dir.path().join(name);
		fs::write(&path, bytes).expect("write fixture");
		path
	};
	let balance_paths = vec![
		write("weapons.gam", sno_record(balance::FORMAT_HASH, &balance::payload(401, 7, &["Axe", "Sword"]))),
		write("armor.gam", sno_record(balance::FORMAT_HASH, &balance::payload(402, 7, &["Helm"]))),
		write("other.gam", sno_record(balance::FORMAT_HASH, &balance::payload(403, 8, &["Axe"]))),
	];
	let record_paths = vec![
		write("chest.lot", sno_record(LOOT_FORMAT, &loot_payload(&["sword", "HELM", "Unknown"]))),
		write("broken.lot", sno_record(0xffff, &loot_payload(&["Axe"]))),
	];

	let batch = BatchDecoder::new(&registry);
	let balance_items = batch.decode_balance_pass(&balance_paths);
	assert!(balance_items.iter().all(|item| item.result.is_ok()));
	assert_eq!(batch.balance().len(), 4);

	let items = batch.decode_pass(&record_paths);
	assert_eq!(items[0].path, record_paths[0]);
	let chest = items[0].result.as_ref().expect("loot decodes");
	assert_eq!(batch.references(chest), vec![401, 402]);
	assert!(matches!(items[1].result, Err(SnoError::UnknownFormatHash { hash: 0xffff })));
	assert_eq!(batch.balance().len(), 4);
}
