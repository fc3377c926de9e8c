use snodec_testkit::hashes::*;
use snodec_testkit::{DefinitionsBuilder, FieldSpec};

use crate::sno::{Definitions, Registry, SnoError, TypeFlags, TypeKind};

fn registry(builder: DefinitionsBuilder) -> Registry {
	Registry::from_json_str(&builder.to_json()).expect("registry should build")
}

#[test]
fn basic_alignment_follows_the_layout_rules() {
	let registry = registry(DefinitionsBuilder::new());
	let align = |hash: u32| registry.layout_options_by_type_hash(hash).expect("known type");

	assert_eq!(align(DT_NULL).alignment, 0);
	assert_eq!(align(DT_BYTE).alignment, 1);
	assert_eq!(align(DT_WORD).alignment, 2);
	assert_eq!(align(DT_INT64).alignment, 8);
	assert_eq!(align(DT_CHARARRAY).alignment, 1);
	assert_eq!(align(DT_SNO_NAME).alignment, 4);
	assert_eq!(align(DT_VECTOR3D).alignment, 12);

	for container in [DT_VARIABLEARRAY, DT_POLYMORPHIC_VARIABLEARRAY, DT_TAGMAP, DT_CSTRING, DT_STRING_FORMULA] {
		assert_eq!(align(container).alignment, 8, "container {container}");
		assert_eq!(align(container).tagmap_alignment, 4, "container {container} in tagmap");
	}

	assert_eq!(align(DT_FIXEDARRAY).alignment, 0);
	assert!(align(DT_FIXEDARRAY).flags.contains(TypeFlags::HAS_SUBTYPE));
}

#[test]
fn container_alignment_recurses_into_the_subtype() {
	let registry = registry(DefinitionsBuilder::new());

	assert_eq!(registry.alignment_for_chain(&[DT_FIXEDARRAY, DT_WORD], false), 2);
	assert_eq!(registry.alignment_for_chain(&[DT_OPTIONAL, DT_INT64], true), 8);
	assert_eq!(registry.alignment_for_chain(&[DT_RANGE, DT_FIXEDARRAY, DT_BYTE], false), 1);
	assert_eq!(registry.alignment_for_chain(&[DT_VARIABLEARRAY, DT_BYTE], true), 4);
	assert_eq!(registry.alignment_for_chain(&[], false), 0);
	assert_eq!(registry.alignment_for_chain(&[777_777], false), 4);

	assert_eq!(registry.tagmap_entry_alignment(DT_FIXEDARRAY, Some(DT_INT64)).expect("align"), 8);
	assert_eq!(registry.tagmap_entry_alignment(DT_VARIABLEARRAY, Some(DT_INT64)).expect("align"), 4);
	assert_eq!(registry.tagmap_entry_alignment(DT_NULL, None).expect("zero becomes one"), 1);
}

#[test]
fn class_alignment_is_the_widest_field() {
	let registry = registry(
		DefinitionsBuilder::new()
			.class(
				6000,
				"Mixed",
				24,
				vec![
					FieldSpec::new("bFlag", 1, 0, &[DT_BYTE]),
					FieldSpec::new("arWords", 2, 2, &[DT_FIXEDARRAY, DT_WORD]).array_length(3),
					FieldSpec::new("arList", 3, 8, &[DT_VARIABLEARRAY, DT_BYTE]),
				],
			)
			.class(6001, "Empty", 0, Vec::new())
			.opaque_class(6002, "Opaque", 4)
			.class(6003, "Outer", 24, vec![FieldSpec::new("tInner", 4, 0, &[6000])]),
	);

	let layout = |hash: u32| registry.layout_options_by_type_hash(hash).expect("known type");
	assert_eq!(layout(6000).alignment, 8);
	assert_eq!(layout(6000).tagmap_alignment, 8);
	assert_eq!(layout(6001).alignment, 1);
	assert_eq!(layout(6002).alignment, 4);
	assert_eq!(layout(6003).alignment, 8);
}

#[test]
fn lookups_resolve_and_missing_hashes_are_errors() {
	let registry = registry(DefinitionsBuilder::new().payload(
		7000,
		"ActorDefinition",
		0xabcd,
		16,
		vec![FieldSpec::new("snoParent", 0x77, 12, &[DT_SNO])],
	));

	assert_eq!(registry.type_hash_by_name("ActorDefinition"), Some(7000));
	assert_eq!(registry.construct_by_format_hash(0xabcd).expect("payload").hash, 7000);
	assert_eq!(registry.construct_by_type_hash(DT_INT).expect("basic").kind, TypeKind::Basic(crate::sno::BasicKind::Int));
	assert_eq!(registry.field_name_by_hash(0x77), Some("snoParent"));
	assert_eq!(registry.field_name_by_hash(0x78), None);
	assert_eq!(registry.polymorphic_type_offset().expect("PolymorphicBase is defined"), 8);

	assert!(matches!(
		registry.construct_by_format_hash(0xdead),
		Err(SnoError::UnknownFormatHash { hash: 0xdead })
	));
	assert!(matches!(registry.construct_by_type_hash(42), Err(SnoError::UnknownTypeHash { hash: 42 })));
	assert!(matches!(registry.require_type_hash("Nope"), Err(SnoError::UnknownTypeName { name: "Nope" })));
}

#[test]
fn field_chains_stop_at_null_and_parameterize_bare_containers() {
	let registry = registry(DefinitionsBuilder::new().class(
		6004,
		"Chains",
		32,
		vec![
			FieldSpec::new("nPlain", 1, 0, &[DT_INT]),
			FieldSpec::new("szText", 2, 8, &[DT_CSTRING]),
			FieldSpec::new("arNested", 3, 16, &[DT_VARIABLEARRAY, DT_FIXEDARRAY, DT_INT]),
		],
	));

	let entry = registry.construct_by_type_hash(6004).expect("class");
	let chain = |name: &str| entry.field(name).expect("field").chain;
	assert_eq!(chain("nPlain").as_slice(), &[DT_INT]);
	assert_eq!(chain("szText").as_slice(), &[DT_CSTRING, DT_NULL]);
	assert_eq!(chain("arNested").as_slice(), &[DT_VARIABLEARRAY, DT_FIXEDARRAY, DT_INT]);
}

#[test]
fn definitions_normalize_signed_values_and_sentinels() {
	let json = r#"{
		"-1": {"type": "basic", "hash": -1, "name": "DT_UINT", "flags": 0, "size": 4},
		"42": {
			"type": "class", "hash": 42, "name": "Thing", "size": 4,
			"fields": [{"type": [-1, 0, 0], "hash": -2, "name": "dwValue", "offset": 0,
				"arrayLength": -1, "group": -1, "tagMapType": -1}]
		},
		"43": {"type": "class", "hash": 43, "name": "NoFields", "size": 0, "fields": null}
	}"#;
	let defs = Definitions::from_json_str(json).expect("parse");

	assert_eq!(defs.len(), 3);
	assert!(defs.get(u32::MAX).expect("negative key").is_basic());
	let field = &defs.get(42).and_then(|def| def.fields.as_ref()).expect("fields")[0];
	assert_eq!(field.hash, 0xffff_fffe);
	assert_eq!(field.type_chain, [u32::MAX, 0, 0]);
	assert_eq!((field.array_length, field.group, field.tagmap_type), (None, None, None));
	assert!(defs.get(43).expect("class").fields.is_none());

	let registry = Registry::build(defs).expect("build");
	assert_eq!(registry.construct_by_type_hash(42).expect("class").field("dwValue").expect("field").chain.as_slice(), &[u32::MAX]);
}

#[test]
fn malformed_definitions_are_rejected() {
	let err = Definitions::from_json_str(r#"{"abc": {"hash": 1, "name": "X"}}"#).expect_err("non-numeric key");
	assert!(matches!(err, SnoError::InvalidDefinitionKey { ref key } if key == "abc"));

	let err = Definitions::from_json_str("[1, 2]").expect_err("not an object");
	assert!(matches!(err, SnoError::Definitions(_)));
}

#[test]
fn registry_installs_once() {
	let first = Registry::from_json_str(&DefinitionsBuilder::new().to_json()).expect("build");
	let installed = first.install().expect("first install");
	assert!(std::ptr::eq(installed, Registry::global().expect("installed")));

	let second = Registry::from_json_str(&DefinitionsBuilder::new().to_json()).expect("build");
	assert!(matches!(second.install(), Err(SnoError::RegistryAlreadyInstalled)));
}
