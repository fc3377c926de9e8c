mod balance;
mod batch;
mod cursor;
mod decode;
mod defs;
mod digest;
mod error;
mod file;
mod flags;
mod group;
mod meta;
mod options;
mod registry;
mod toc;
mod value;
mod walk;

/// Balance-id keys, table and extraction helpers.
pub use balance::{BalanceTable, GbInfo, Gbid, balance_entries, gbid_hash};
/// Parallel multi-record decoding.
pub use batch::{BatchDecoder, BatchItem};
/// Seekable byte cursor with a rebasable origin.
pub use cursor::{Cursor, Endianness, Whence};
/// Registry-driven value decoder.
pub use decode::Decoder;
/// Type-definition document model.
pub use defs::{Definition, Definitions, FieldDef};
/// Canonical structural hashing.
pub use digest::{DigestSink, content_crc32, content_hash, hash_object};
/// Error and result aliases.
pub use error::{Result, SnoError};
/// File-backed entry points.
pub use file::{read_sno_meta_file, read_sno_meta_header, read_toc_file};
/// Field and type flag bitmasks.
pub use flags::{FieldFlags, TypeFlags};
/// Record group ids, names and extensions.
pub use group::SnoGroup;
/// Record header and decoded record.
pub use meta::{SNO_HEADER_SIZE, SnoHeader, SnoMeta};
/// Decode limits, per-value options and composed type chains.
pub use options::{DecodeOptions, FieldOptions, TypeChain};
/// Type registry and per-type layout.
pub use registry::{BasicKind, FieldLayout, LayoutOptions, Registry, TypeEntry, TypeKind};
/// Catalog parsing and lookup.
pub use toc::{Toc, TocDiff, TocEntry, TocHeader, TocRename};
/// Decoded value model.
pub use value::{
	ArrayValue, CStringValue, FieldValue, FormulaValue, Object, OptionalValue, PolymorphicArrayValue, RangeValue, StructValue, TagMapEntry, TagMapValue, Value,
};
/// Depth-first traversal, reference and feature extraction.
pub use walk::{ChildKey, WalkEntry, WalkFlow, scalar_features, walk};
