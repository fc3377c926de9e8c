use std::collections::BTreeMap;
use std::io::{Read, Seek};

use serde::Serialize;
use tracing::debug;

use crate::sno::{Cursor, Result, SnoError, SnoGroup, Whence};

/// Byte size of one catalog entry.
const ENTRY_SIZE: i64 = 12;

/// Catalog header: per-group table sizes and offsets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TocHeader {
	/// Number of group slots.
	pub group_count: i32,
	/// Entries in each group table.
	pub entry_counts: Vec<i32>,
	/// Offset of each group table, relative to the end of the header.
	pub entry_offsets: Vec<i32>,
	/// Per-group count with no known meaning.
	pub entry_unknown_counts: Vec<i32>,
	/// Trailing header word with no known meaning.
	pub unknown: i32,
}

impl TocHeader {
	/// Read the header at the cursor position.
	pub fn read<R: Read + Seek>(cursor: &mut Cursor<R>) -> Result<Self> {
		let group_count = cursor.read_i32_le()?;
		if group_count < 0 {
			return Err(SnoError::TocInvalidGroupCount { count: group_count });
		}

		let len = group_count as usize;
		let entry_counts = read_i32s(cursor, len)?;
		let entry_offsets = read_i32s(cursor, len)?;
		let entry_unknown_counts = read_i32s(cursor, len)?;
		let unknown = cursor.read_i32_le()?;

		Ok(Self {
			group_count,
			entry_counts,
			entry_offsets,
			entry_unknown_counts,
			unknown,
		})
	}

	/// Encoded byte size.
	pub fn byte_size(&self) -> u64 {
		4 + 12 * self.group_count as u64 + 4
	}
}

/// One raw entry of a group table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TocEntry {
	/// Record group.
	pub group: SnoGroup,
	/// Record id.
	pub id: i32,
	/// Name offset relative to the end of the owning group table.
	pub name_offset: i32,
	/// Resolved record name.
	pub name: String,
}

/// Decoded catalog: `group -> id -> name`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Toc {
	/// Names by group and id.
	pub entries: BTreeMap<SnoGroup, BTreeMap<i32, String>>,
}

/// Record whose name changed between two catalogs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TocRename {
	/// Record group.
	pub group: SnoGroup,
	/// Record id.
	pub id: i32,
	/// Name in the older catalog.
	pub old_name: String,
	/// Name in the newer catalog.
	pub new_name: String,
}

/// Changes from one catalog to another.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TocDiff {
	/// `(group, id, name)` present only in the newer catalog.
	pub added: Vec<(SnoGroup, i32, String)>,
	/// `(group, id, name)` present only in the older catalog.
	pub removed: Vec<(SnoGroup, i32, String)>,
	/// Same `(group, id)` with a different name.
	pub renamed: Vec<TocRename>,
}

impl TocDiff {
	/// Return `true` when both catalogs hold the same entries.
	pub fn is_empty(&self) -> bool {
		self.added.is_empty() && self.removed.is_empty() && self.renamed.is_empty()
	}
}

impl Toc {
	/// Decode a catalog from the start of `cursor`.
	pub fn decode<R: Read + Seek>(cursor: &mut Cursor<R>) -> Result<Self> {
		Ok(Self::from_entries(Self::decode_entries(cursor)?))
	}

	/// Decode the raw entries of every group table in stored order.
	pub fn decode_entries<R: Read + Seek>(cursor: &mut Cursor<R>) -> Result<Vec<TocEntry>> {
		let header = TocHeader::read(cursor)?;
		cursor.rebase(header.byte_size())?;

		let mut entries = Vec::new();
		for (slot, (&count, &offset)) in header.entry_counts.iter().zip(&header.entry_offsets).enumerate() {
			if count < 0 {
				return Err(SnoError::NegativeLength {
					what: "toc entry count",
					at: 4 + 4 * slot as u64,
					len: i64::from(count),
				});
			}
			if count == 0 {
				continue;
			}

			let table_end = i64::from(offset) + ENTRY_SIZE * i64::from(count);
			cursor.seek(i64::from(offset), Whence::Start)?;
			for _ in 0..count {
				let group = SnoGroup(cursor.read_i32_le()?);
				let id = cursor.read_i32_le()?;
				let name_offset = cursor.read_i32_le()?;
				let name = cursor.at_position(table_end + i64::from(name_offset), Whence::Start, |cursor| cursor.read_null_terminated_string())?;
				entries.push(TocEntry { group, id, name_offset, name });
			}
		}

		debug!(groups = header.group_count, entries = entries.len(), "decoded toc");
		Ok(entries)
	}

	/// Build the lookup from raw entries; later duplicates win.
	pub fn from_entries(entries: impl IntoIterator<Item = TocEntry>) -> Self {
		let mut toc = Self::default();
		for entry in entries {
			toc.entries.entry(entry.group).or_default().insert(entry.id, entry.name);
		}
		toc
	}

	/// Total number of `(group, id)` entries.
	pub fn len(&self) -> usize {
		self.entries.values().map(BTreeMap::len).sum()
	}

	/// Return `true` when the catalog has no entries.
	pub fn is_empty(&self) -> bool {
		self.entries.values().all(BTreeMap::is_empty)
	}

	/// Name of record `id` in `group`.
	pub fn name_in(&self, group: SnoGroup, id: i32) -> Option<&str> {
		self.entries.get(&group)?.get(&id).map(String::as_str)
	}

	/// Find record `id`, trying `group_hints` first and then every group in order.
	pub fn get_name(&self, id: i32, group_hints: &[SnoGroup]) -> Option<(SnoGroup, &str)> {
		group_hints
			.iter()
			.find_map(|group| self.name_in(*group, id).map(|name| (*group, name)))
			.or_else(|| self.entries.iter().find_map(|(group, names)| names.get(&id).map(|name| (*group, name.as_str()))))
	}

	/// Iterate `(group, id, name)` in group then id order.
	pub fn iter(&self) -> impl Iterator<Item = (SnoGroup, i32, &str)> + '_ {
		self.entries
			.iter()
			.flat_map(|(group, names)| names.iter().map(move |(id, name)| (*group, *id, name.as_str())))
	}

	/// Changes needed to turn `self` into `newer`.
	pub fn diff(&self, newer: &Toc) -> TocDiff {
		let mut diff = TocDiff::default();
		for (group, id, name) in self.iter() {
			match newer.name_in(group, id) {
				None => diff.removed.push((group, id, name.to_owned())),
				Some(new_name) if new_name != name => diff.renamed.push(TocRename {
					group,
					id,
					old_name: name.to_owned(),
					new_name: new_name.to_owned(),
				}),
				Some(_) => {}
			}
		}
		for (group, id, name) in newer.iter() {
			if self.name_in(group, id).is_none() {
				diff.added.push((group, id, name.to_owned()));
			}
		}
		diff
	}
}

fn read_i32s<R: Read + Seek>(cursor: &mut Cursor<R>, len: usize) -> Result<Vec<i32>> {
	(0..len).map(|_| cursor.read_i32_le()).collect()
}
