use crate::sno::FieldFlags;

/// Runtime limits and behavior switches for record decoding.
#[derive(Debug, Clone)]
pub struct DecodeOptions {
	/// Maximum recursive value nesting depth.
	pub max_depth: u32,
	/// Maximum element count for any one container.
	pub max_array_elems: usize,
	/// Treat end of stream while probing a polymorphic element as the end of the array.
	pub lenient_polymorphic_eof: bool,
}

impl Default for DecodeOptions {
	fn default() -> Self {
		Self {
			max_depth: 64,
			max_array_elems: 1 << 20,
			lenient_polymorphic_eof: true,
		}
	}
}

impl DecodeOptions {
	/// Default limits with every tolerated anomaly turned into an error.
	pub fn strict() -> Self {
		Self {
			lenient_polymorphic_eof: false,
			..Self::default()
		}
	}
}

/// Up to three type hashes: outer type, subtype, sub-subtype.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct TypeChain {
	hashes: [u32; 3],
	len: u8,
}

impl TypeChain {
	/// Build a chain from the leading hashes of `hashes` (at most three are kept).
	pub fn new(hashes: &[u32]) -> Self {
		let mut chain = Self::default();
		for hash in hashes.iter().take(3) {
			chain.hashes[chain.len as usize] = *hash;
			chain.len += 1;
		}
		chain
	}

	/// Chain holding one type.
	pub fn single(hash: u32) -> Self {
		Self::new(&[hash])
	}

	/// Outer type hash.
	pub fn head(&self) -> Option<u32> {
		self.as_slice().first().copied()
	}

	/// Chain with the outer type removed.
	pub fn sub(&self) -> Self {
		Self::new(self.as_slice().get(1..).unwrap_or(&[]))
	}

	/// Chain with `hash` appended, unless already full.
	pub fn push(mut self, hash: u32) -> Self {
		if (self.len as usize) < self.hashes.len() {
			self.hashes[self.len as usize] = hash;
			self.len += 1;
		}
		self
	}

	/// Hashes in outer-to-inner order.
	pub fn as_slice(&self) -> &[u32] {
		&self.hashes[..self.len as usize]
	}

	/// Number of hashes.
	pub fn len(&self) -> usize {
		self.len as usize
	}

	/// Return `true` when the chain names no type.
	pub fn is_empty(&self) -> bool {
		self.len == 0
	}
}

/// Per-value options passed down while decoding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldOptions {
	/// Field flags of the owning field.
	pub flags: FieldFlags,
	/// Element count for fixed-size arrays and char arrays.
	pub array_length: Option<u32>,
	/// Group for group-scoped identifiers.
	pub group: Option<i32>,
	/// Element type already determined by a parent tagged map.
	pub override_type: Option<TypeChain>,
	/// Declared tagged-map element type.
	pub tagmap_type: Option<u32>,
}

impl FieldOptions {
	/// Options handed to a container's elements; only the group survives.
	pub fn for_child(&self) -> Self {
		Self {
			group: self.group,
			..Self::default()
		}
	}
}
