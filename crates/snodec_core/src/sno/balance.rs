use std::collections::HashMap;

use dashmap::DashMap;
use tracing::warn;

use crate::sno::{Object, SnoMeta};

const BALANCE_DEFINITION: &str = "GameBalanceDefinition";

/// Group-scoped balance id: the balance table type plus the hashed entry name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Gbid {
	/// Balance table type (`eGameBalanceType`).
	pub group: i32,
	/// [`gbid_hash`] of the entry name.
	pub value: u32,
}

/// Record owning a balance id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GbInfo {
	/// Id of the balance record declaring the entry.
	pub sno_id: i32,
	/// Entry name.
	pub name: String,
}

/// Case-insensitive name hash used for balance ids.
pub fn gbid_hash(name: &str) -> u32 {
	name.bytes().fold(0_u32, |hash, byte| hash.wrapping_mul(33).wrapping_add(u32::from(byte.to_ascii_lowercase())))
}

/// Concurrent balance id to owning record table.
///
/// Filled while balance records are decoded and read by later decodes of the
/// same batch. Readers running alongside a balance pass may see a partial table;
/// callers that need a stable view take a [`BalanceTable::snapshot`].
#[derive(Debug, Default)]
pub struct BalanceTable {
	entries: DashMap<Gbid, GbInfo>,
}

impl BalanceTable {
	/// Empty table.
	pub fn new() -> Self {
		Self::default()
	}

	/// Insert or replace one entry, returning the previous owner.
	pub fn insert(&self, gbid: Gbid, info: GbInfo) -> Option<GbInfo> {
		self.entries.insert(gbid, info)
	}

	/// Owner of a balance id.
	pub fn get(&self, gbid: &Gbid) -> Option<GbInfo> {
		self.entries.get(gbid).map(|entry| entry.value().clone())
	}

	/// Number of entries.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Return `true` when no entries were registered.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Register every balance id declared by `meta`; returns how many were added.
	pub fn register(&self, meta: &SnoMeta) -> usize {
		let entries = balance_entries(meta);
		let count = entries.len();
		for (gbid, info) in entries {
			self.insert(gbid, info);
		}
		count
	}

	/// Point-in-time copy of the table.
	pub fn snapshot(&self) -> HashMap<Gbid, GbInfo> {
		self.entries.iter().map(|entry| (*entry.key(), entry.value().clone())).collect()
	}
}

/// Balance ids declared by a `GameBalanceDefinition` record; empty for any other payload.
pub fn balance_entries(meta: &SnoMeta) -> Vec<(Gbid, GbInfo)> {
	let Some(payload) = meta.payload.as_struct() else {
		return Vec::new();
	};
	if payload.type_name.as_ref() != BALANCE_DEFINITION {
		return Vec::new();
	}

	let Some(group) = meta.payload.field("eGameBalanceType").and_then(Object::as_i64) else {
		warn!(sno_id = meta.id, "balance record without eGameBalanceType");
		return Vec::new();
	};
	let Some(tables) = meta.payload.field("ptData") else {
		warn!(sno_id = meta.id, "balance record without ptData");
		return Vec::new();
	};

	tables
		.elements()
		.iter()
		.filter_map(|table| table.field("tEntries"))
		.flat_map(Object::elements)
		.filter_map(|entry| entry.field_path("tHeader.szName").and_then(Object::as_text))
		.map(|name| {
			let gbid = Gbid {
				group: group as i32,
				value: gbid_hash(&name),
			};
			(gbid, GbInfo { sno_id: meta.id, name })
		})
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn gbid_hash_is_case_insensitive_djb() {
		assert_eq!(gbid_hash(""), 0);
		assert_eq!(gbid_hash("a"), 97);
		assert_eq!(gbid_hash("ab"), 97 * 33 + 98);
		assert_eq!(gbid_hash("Sword_Legendary"), gbid_hash("sword_legendary"));
		assert_ne!(gbid_hash("sword"), gbid_hash("shield"));
	}

	#[test]
	fn table_inserts_reads_and_snapshots() {
		let table = BalanceTable::new();
		let key = Gbid { group: 3, value: gbid_hash("Axe") };
		assert!(table.is_empty());
		assert!(
			table
				.insert(
					key,
					GbInfo {
						sno_id: 10,
						name: "Axe".to_owned()
					}
				)
				.is_none()
		);

		let previous = table.insert(
			key,
			GbInfo {
				sno_id: 11,
				name: "Axe".to_owned(),
			},
		);
		assert_eq!(previous.map(|info| info.sno_id), Some(10));
		assert_eq!(table.get(&key).map(|info| info.sno_id), Some(11));
		assert_eq!(table.get(&Gbid { group: 4, value: key.value }), None);

		let snapshot = table.snapshot();
		table.insert(
			Gbid { group: 3, value: 1 },
			GbInfo {
				sno_id: 12,
				name: "Other".to_owned(),
			},
		);
		assert_eq!(snapshot.len(), 1);
		assert_eq!(table.len(), 2);
	}
}
