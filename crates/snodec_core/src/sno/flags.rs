/// Per-field flag bitmask from the definitions document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct FieldFlags(pub u32);

impl FieldFlags {
	/// Fixed-array marker.
	pub const FIXED_ARRAY: Self = Self(0x8);
	/// Field carries a value constraint (mostly booleans and enums).
	pub const HAS_VALUE_CONSTRAINT: Self = Self(0x10);
	/// Referenced SNO must exist.
	pub const REQUIRED_SNO: Self = Self(0x100);
	/// Soft link to another SNO.
	pub const SOFT_LINK: Self = Self(0x200);
	/// Bit-flag enum.
	pub const BIT_FLAGS: Self = Self(0x80000);
	/// Array contents live in the sibling payload file.
	pub const PAYLOAD: Self = Self(0x200000);
	/// Second payload marker with the same meaning.
	pub const PAYLOAD2: Self = Self(0x400000);

	/// Return `true` when any bit of `other` is set.
	pub fn contains(self, other: Self) -> bool {
		self.0 & other.0 != 0
	}

	/// Return `true` when the field's container data lives outside this file.
	pub fn is_external(self) -> bool {
		self.contains(Self::PAYLOAD) || self.contains(Self::PAYLOAD2)
	}
}

/// Per-type flag bitmask from the definitions document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct TypeFlags(pub u32);

impl TypeFlags {
	/// Type contains an SNO reference somewhere below it.
	pub const CONTAINS_SNO_SUBFIELD: Self = Self(0x8);
	/// Type contains a heap allocation somewhere below it.
	pub const CONTAINS_ALLOCATION_SUBFIELD: Self = Self(0x10);
	/// Type contains a tagged map somewhere below it.
	pub const CONTAINS_TAGMAP_SUBFIELD: Self = Self(0x40);
	/// Complex (non-scalar) type.
	pub const IS_COMPLEX: Self = Self(0x100);
	/// Top-level SNO payload definition.
	pub const SNO_TYPE_DEFINITION: Self = Self(0x4000);
	/// Generic container parameterized by a subtype.
	pub const HAS_SUBTYPE: Self = Self(0x8000);
	/// Value references another location in the same file.
	pub const REFERENCES_FILE_LOCATION: Self = Self(0x10000);
	/// Polymorphic class.
	pub const IS_POLYMORPHIC: Self = Self(0x20000);

	/// Return `true` when any bit of `other` is set.
	pub fn contains(self, other: Self) -> bool {
		self.0 & other.0 != 0
	}
}
