use std::collections::BTreeMap;
use std::fmt::Write as _;

use crate::sno::{Object, Value};

/// How a child hangs off its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildKey<'a> {
	/// Named class field or tagged-map entry with a known field name.
	Field(&'a str),
	/// Tagged-map entry whose field hash has no known name.
	Tag(u32),
	/// Array element.
	Index(usize),
	/// Lower bound of a range.
	Lower,
	/// Upper bound of a range.
	Upper,
	/// Present value of an optional.
	Inner,
}

/// Visitor decision after seeing one node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkFlow {
	/// Visit this node's children.
	Descend,
	/// Continue with the next sibling.
	SkipChildren,
	/// End the walk.
	Stop,
}

/// One visited node.
#[derive(Debug, Clone, Copy)]
pub struct WalkEntry<'a> {
	/// Key under the parent; `None` for the root.
	pub key: Option<ChildKey<'a>>,
	/// Dotted path from the root (`tHeader.szName`, `ptData[2]`).
	pub path: &'a str,
	/// Root is depth 0.
	pub depth: usize,
	/// Visited value.
	pub value: &'a Object,
}

impl Object {
	/// Call `f` for each direct child in stored order.
	pub fn for_each_child<'a>(&'a self, mut f: impl FnMut(ChildKey<'a>, &'a Object)) {
		match &self.value {
			Value::Struct(value) => {
				for field in &value.fields {
					f(ChildKey::Field(&field.name), &field.value);
				}
			}
			Value::TagMap(map) => {
				for entry in &map.entries {
					let key = match &entry.name {
						Some(name) => ChildKey::Field(name),
						None => ChildKey::Tag(entry.field_hash),
					};
					f(key, &entry.value);
				}
			}
			Value::Optional(optional) => {
				if let Some(inner) = &optional.value {
					f(ChildKey::Inner, inner);
				}
			}
			Value::Range(range) => {
				f(ChildKey::Lower, &range.lower);
				f(ChildKey::Upper, &range.upper);
			}
			_ => {
				for (index, item) in self.elements().iter().enumerate() {
					f(ChildKey::Index(index), item);
				}
			}
		}
	}

	/// Direct children in stored order.
	pub fn children(&self) -> Vec<(ChildKey<'_>, &Object)> {
		let mut out = Vec::new();
		self.for_each_child(|key, child| out.push((key, child)));
		out
	}
}

/// Depth-first pre-order walk from `root`.
///
/// Returns `false` when the visitor stopped the walk early.
pub fn walk(root: &Object, mut visitor: impl FnMut(&WalkEntry<'_>) -> WalkFlow) -> bool {
	let mut path = String::new();
	walk_node(root, None, 0, &mut path, &mut visitor)
}

fn walk_node(value: &Object, key: Option<ChildKey<'_>>, depth: usize, path: &mut String, visitor: &mut impl FnMut(&WalkEntry<'_>) -> WalkFlow) -> bool {
	let flow = visitor(&WalkEntry {
		key,
		path: path.as_str(),
		depth,
		value,
	});
	match flow {
		WalkFlow::Stop => return false,
		WalkFlow::SkipChildren => return true,
		WalkFlow::Descend => {}
	}

	for (child_key, child) in value.children() {
		let len = path.len();
		push_segment(path, child_key);
		let keep_going = walk_node(child, Some(child_key), depth + 1, path, visitor);
		path.truncate(len);
		if !keep_going {
			return false;
		}
	}
	true
}

fn push_segment(path: &mut String, key: ChildKey<'_>) {
	match key {
		ChildKey::Field(name) => {
			if !path.is_empty() {
				path.push('.');
			}
			path.push_str(name);
		}
		ChildKey::Tag(hash) => {
			if !path.is_empty() {
				path.push('.');
			}
			let _ = write!(path, "{hash:#010x}");
		}
		ChildKey::Index(index) => {
			let _ = write!(path, "[{index}]");
		}
		ChildKey::Lower => path.push_str("[lower]"),
		ChildKey::Upper => path.push_str("[upper]"),
		ChildKey::Inner => {}
	}
}

/// Numeric leaf features keyed by path.
///
/// Vectors and colours expand to one feature per component (`path[0]`...).
/// Text leaves are folded to a stable number from their blake3 digest.
pub fn scalar_features(root: &Object) -> BTreeMap<String, f64> {
	let mut out = BTreeMap::new();
	walk(root, |entry| {
		let path = entry.path;
		match &entry.value.value {
			Value::Byte(v) => insert(&mut out, path, f64::from(*v)),
			Value::Word(v) => insert(&mut out, path, f64::from(*v)),
			Value::Enum(v) | Value::Int(v) | Value::Sno(v) => insert(&mut out, path, f64::from(*v)),
			Value::Float(v) => insert(&mut out, path, f64::from(*v)),
			Value::Uint(v) | Value::StartlocName(v) => insert(&mut out, path, f64::from(*v)),
			Value::Int64(v) => insert(&mut out, path, *v as f64),
			Value::AcdNetworkName(v) | Value::SharedServerDataId(v) => insert(&mut out, path, *v as f64),
			Value::SnoName { id, .. } => insert(&mut out, path, f64::from(*id)),
			Value::Gbid(gbid) => insert(&mut out, path, f64::from(gbid.value)),
			Value::RgbaColor(channels) => insert_components(&mut out, path, channels.iter().map(|c| f64::from(*c))),
			Value::RgbaColorValue(c) | Value::Vector4d(c) => insert_components(&mut out, path, c.iter().map(|v| f64::from(*v))),
			Value::BcVec2i(c) | Value::Vector2d(c) => insert_components(&mut out, path, c.iter().map(|v| f64::from(*v))),
			Value::Vector3d(c) => insert_components(&mut out, path, c.iter().map(|v| f64::from(*v))),
			Value::CString(_) | Value::StringFormula(_) | Value::CharArray(_) => {
				if let Some(text) = entry.value.as_text() {
					insert(&mut out, path, fold_text(&text));
				}
			}
			_ => {}
		}
		WalkFlow::Descend
	});
	out
}

fn insert(out: &mut BTreeMap<String, f64>, path: &str, value: f64) {
	out.insert(path.to_owned(), value);
}

fn insert_components(out: &mut BTreeMap<String, f64>, path: &str, values: impl Iterator<Item = f64>) {
	for (index, value) in values.enumerate() {
		out.insert(format!("{path}[{index}]"), value);
	}
}

// Top 53 bits of the digest, so the value is exact as an f64.
fn fold_text(text: &str) -> f64 {
	let digest = blake3::hash(text.as_bytes());
	let mut head = [0_u8; 8];
	head.copy_from_slice(&digest.as_bytes()[..8]);
	(u64::from_le_bytes(head) >> 11) as f64
}
