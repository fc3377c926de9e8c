use std::fs::{self, File};
use std::io::{self, Read};
use std::path::Path;

use crate::sno::{Cursor, Decoder, Registry, Result, SNO_HEADER_SIZE, SnoHeader, SnoMeta, Toc};

/// Whole file loaded into memory; decoding seeks on nearly every field.
pub(crate) fn read_file(path: &Path) -> Result<Cursor<io::Cursor<Vec<u8>>>> {
	Ok(Cursor::from_bytes(fs::read(path)?))
}

/// Decode the record stored at `path`.
pub fn read_sno_meta_file(registry: &Registry, path: impl AsRef<Path>) -> Result<SnoMeta> {
	SnoMeta::decode(&Decoder::new(registry), &mut read_file(path.as_ref())?)
}

/// Read only the fixed header of the record stored at `path`.
pub fn read_sno_meta_header(path: impl AsRef<Path>) -> Result<SnoHeader> {
	let mut head = Vec::with_capacity(SNO_HEADER_SIZE as usize);
	File::open(path.as_ref())?.take(SNO_HEADER_SIZE).read_to_end(&mut head)?;
	SnoHeader::read(&mut Cursor::from_bytes(head))
}

/// Decode the catalog stored at `path`.
pub fn read_toc_file(path: impl AsRef<Path>) -> Result<Toc> {
	Toc::decode(&mut read_file(path.as_ref())?)
}
