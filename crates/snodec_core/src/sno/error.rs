use thiserror::Error;

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, SnoError>;

/// Errors produced while loading definitions and decoding records or catalogs.
#[derive(Debug, Error)]
pub enum SnoError {
	/// Filesystem or stream IO failure.
	#[error("io: {0}")]
	Io(#[from] std::io::Error),
	/// Not enough bytes remained for a requested read.
	#[error("unexpected eof at offset {at}, need {need} bytes")]
	UnexpectedEof {
		/// Absolute byte offset where the read was attempted.
		at: u64,
		/// Requested bytes.
		need: usize,
	},
	/// Seek target resolved before the cursor's virtual origin.
	#[error("invalid seek to {target} before origin {origin}")]
	SeekBeforeOrigin {
		/// Requested target, relative to the virtual origin.
		target: i64,
		/// Absolute byte offset of the virtual origin.
		origin: u64,
	},
	/// A padding sentinel that must be zero held another value.
	#[error("invalid value in padding at {at}: {value}")]
	InvalidPadding {
		/// Offset of the padding field, relative to the virtual origin.
		at: u64,
		/// Value read from the padding field.
		value: i64,
	},
	/// Fixed-size array or char array decoded without an array length option.
	#[error("array length option required for {type_name}")]
	ArrayLengthRequired {
		/// Type that needed the option.
		type_name: &'static str,
	},
	/// Group-scoped identifier decoded without a group option.
	#[error("group option required for DT_GBID")]
	GroupRequired,
	/// A length or size field was negative.
	#[error("negative {what} at {at}: {len}")]
	NegativeLength {
		/// Which length field was invalid.
		what: &'static str,
		/// Offset of the owning preamble, relative to the virtual origin.
		at: u64,
		/// Parsed signed length.
		len: i64,
	},
	/// Variable array elements consumed more bytes than the declared range.
	#[error("variable array overran its data range: expected end {expected}, got {actual}")]
	VariableArrayOverrun {
		/// Declared `dataOffset + dataSize`.
		expected: u64,
		/// Cursor position after the last element.
		actual: u64,
	},
	/// Type hash is not present in the registry.
	#[error("could not find type for type hash: {hash}")]
	UnknownTypeHash {
		/// Missing type hash.
		hash: u32,
	},
	/// Format hash is not present in the registry.
	#[error("could not find type for format hash: {hash}")]
	UnknownFormatHash {
		/// Missing format hash.
		hash: u32,
	},
	/// A type the engine needs by name is missing from the definitions.
	#[error("definitions do not contain type {name}")]
	UnknownTypeName {
		/// Required type name.
		name: &'static str,
	},
	/// A basic type has no decoder.
	#[error("unsupported basic type {name} (hash {hash})")]
	UnsupportedBasicType {
		/// Definition name.
		name: String,
		/// Definition type hash.
		hash: u32,
	},
	/// Definitions document failed to parse.
	#[error("definitions: {0}")]
	Definitions(#[from] serde_json::Error),
	/// Definitions document key was not a numeric type hash.
	#[error("invalid definition key {key:?}")]
	InvalidDefinitionKey {
		/// Offending key.
		key: String,
	},
	/// Decoder recursion depth exceeded configured limit.
	#[error("decode depth exceeded (max={max_depth})")]
	DecodeDepthExceeded {
		/// Configured depth ceiling.
		max_depth: u32,
	},
	/// Requested element count exceeded configured limit.
	#[error("decode array too large: count={count}, max={max}")]
	DecodeArrayTooLarge {
		/// Requested element count.
		count: usize,
		/// Maximum permitted element count.
		max: usize,
	},
	/// Catalog header declared a negative group count.
	#[error("invalid toc group count {count}")]
	TocInvalidGroupCount {
		/// Parsed group count.
		count: i32,
	},
	/// A process-wide registry was already installed.
	#[error("registry already installed")]
	RegistryAlreadyInstalled,
}

impl SnoError {
	/// Return `true` for end-of-stream failures.
	pub fn is_unexpected_eof(&self) -> bool {
		match self {
			Self::UnexpectedEof { .. } => true,
			Self::Io(err) => err.kind() == std::io::ErrorKind::UnexpectedEof,
			_ => false,
		}
	}
}
