use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::debug;

use crate::sno::file::read_file;
use crate::sno::{BalanceTable, DecodeOptions, Decoder, Registry, Result, SnoMeta};

/// Outcome of decoding one file of a batch.
#[derive(Debug)]
pub struct BatchItem {
	/// Source file.
	pub path: PathBuf,
	/// Decoded record or the error that aborted it.
	pub result: Result<SnoMeta>,
}

/// Decodes many records on the rayon pool against one registry.
///
/// Batches that resolve balance ids run [`BatchDecoder::decode_balance_pass`]
/// over the balance records first; [`BatchDecoder::decode_pass`] results then
/// see a complete [`BatchDecoder::balance`] table.
pub struct BatchDecoder<'r> {
	registry: &'r Registry,
	options: DecodeOptions,
	balance: BalanceTable,
}

impl<'r> BatchDecoder<'r> {
	/// Batch decoder with default limits and an empty balance table.
	pub fn new(registry: &'r Registry) -> Self {
		Self::with_options(registry, DecodeOptions::default())
	}

	/// Batch decoder with explicit limits.
	pub fn with_options(registry: &'r Registry, options: DecodeOptions) -> Self {
		Self {
			registry,
			options,
			balance: BalanceTable::new(),
		}
	}

	/// Balance ids registered so far.
	pub fn balance(&self) -> &BalanceTable {
		&self.balance
	}

	/// Decode balance records and register their ids. Results keep input order.
	pub fn decode_balance_pass<P: AsRef<Path> + Sync>(&self, paths: &[P]) -> Vec<BatchItem> {
		let items = self.decode_all(paths, |meta| {
			self.balance.register(meta);
		});
		debug!(files = items.len(), balance_ids = self.balance.len(), "balance pass done");
		items
	}

	/// Decode records without touching the balance table. Results keep input order.
	pub fn decode_pass<P: AsRef<Path> + Sync>(&self, paths: &[P]) -> Vec<BatchItem> {
		let items = self.decode_all(paths, |_| {});
		debug!(files = items.len(), "decode pass done");
		items
	}

	/// Ids referenced by `meta`, resolving balance ids through this batch's table.
	pub fn references(&self, meta: &SnoMeta) -> Vec<i32> {
		meta.references(Some(&self.balance))
	}

	fn decode_all<P: AsRef<Path> + Sync>(&self, paths: &[P], on_decoded: impl Fn(&SnoMeta) + Sync) -> Vec<BatchItem> {
		paths
			.par_iter()
			.map(|path| {
				let path = path.as_ref();
				let result = self.decode_one(path);
				if let Ok(meta) = &result {
					on_decoded(meta);
				}
				BatchItem {
					path: path.to_path_buf(),
					result,
				}
			})
			.collect()
	}

	fn decode_one(&self, path: &Path) -> Result<SnoMeta> {
		let decoder = Decoder::with_options(self.registry, self.options.clone());
		SnoMeta::decode(&decoder, &mut read_file(path)?)
	}
}
