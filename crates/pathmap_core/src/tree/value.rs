use std::fmt;

/// Recursive tree value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
	/// Absent or explicitly empty value.
	#[default]
	Null,
	/// Boolean primitive.
	Bool(bool),
	/// Integer number.
	Int(i64),
	/// Floating-point number.
	Float(f64),
	/// UTF-8 string.
	String(String),
	/// Ordered list.
	List(Vec<Value>),
	/// Insertion-ordered map.
	Map(Map),
	/// Control marker interpreted by the mapper pipeline.
	Sentinel(Sentinel),
}

impl Value {
	/// Wrap `value` in a keep marker.
	pub fn keep(value: impl Into<Value>) -> Self {
		Self::Sentinel(Sentinel::Keep(Box::new(value.into())))
	}

	/// Build a drop marker for `level`.
	pub fn drop_marker(level: DropLevel) -> Self {
		Self::Sentinel(Sentinel::Drop(level))
	}

	/// Stable kind label used in errors and CLI output.
	pub fn kind(&self) -> &'static str {
		match self {
			Self::Null => "Null",
			Self::Bool(_) => "Bool",
			Self::Int(_) => "Int",
			Self::Float(_) => "Float",
			Self::String(_) => "String",
			Self::List(_) => "List",
			Self::Map(_) => "Map",
			Self::Sentinel(Sentinel::Drop(_)) => "Drop",
			Self::Sentinel(Sentinel::Keep(_)) => "Keep",
		}
	}

	/// Return `true` for [`Value::Null`].
	pub fn is_null(&self) -> bool {
		matches!(self, Self::Null)
	}

	/// Return `true` for maps and lists.
	pub fn is_container(&self) -> bool {
		matches!(self, Self::List(_) | Self::Map(_))
	}

	/// Borrow the string payload.
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Self::String(item) => Some(item),
			_ => None,
		}
	}

	/// Borrow the list payload.
	pub fn as_list(&self) -> Option<&[Value]> {
		match self {
			Self::List(items) => Some(items),
			_ => None,
		}
	}

	/// Borrow the map payload.
	pub fn as_map(&self) -> Option<&Map> {
		match self {
			Self::Map(map) => Some(map),
			_ => None,
		}
	}

	/// Read the value at `key` when `self` is a map.
	pub fn field(&self, key: &str) -> Option<&Value> {
		self.as_map().and_then(|map| map.get(key))
	}

	/// Number payload widened to `f64`.
	pub fn as_f64(&self) -> Option<f64> {
		match self {
			Self::Int(item) => Some(*item as f64),
			Self::Float(item) => Some(*item),
			_ => None,
		}
	}
}

impl From<bool> for Value {
	fn from(value: bool) -> Self {
		Self::Bool(value)
	}
}

impl From<i64> for Value {
	fn from(value: i64) -> Self {
		Self::Int(value)
	}
}

impl From<i32> for Value {
	fn from(value: i32) -> Self {
		Self::Int(i64::from(value))
	}
}

impl From<f64> for Value {
	fn from(value: f64) -> Self {
		Self::Float(value)
	}
}

impl From<&str> for Value {
	fn from(value: &str) -> Self {
		Self::String(value.to_owned())
	}
}

impl From<String> for Value {
	fn from(value: String) -> Self {
		Self::String(value)
	}
}

impl From<Vec<Value>> for Value {
	fn from(value: Vec<Value>) -> Self {
		Self::List(value)
	}
}

impl From<Map> for Value {
	fn from(value: Map) -> Self {
		Self::Map(value)
	}
}

impl From<Sentinel> for Value {
	fn from(value: Sentinel) -> Self {
		Self::Sentinel(value)
	}
}

impl From<DropLevel> for Value {
	fn from(value: DropLevel) -> Self {
		Self::Sentinel(Sentinel::Drop(value))
	}
}

impl<T: Into<Value>> From<Option<T>> for Value {
	fn from(value: Option<T>) -> Self {
		value.map_or(Self::Null, Into::into)
	}
}

impl FromIterator<Value> for Value {
	fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
		Self::List(iter.into_iter().collect())
	}
}

/// Control marker embedded in an evaluated tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Sentinel {
	/// Excise the container `level` steps above the marked node.
	Drop(DropLevel),
	/// Keep the wrapped value through pruning, then unwrap it.
	Keep(Box<Value>),
}

/// How far above a drop marker the excised container sits.
///
/// ```text
/// {                 <- Grandparent
///     "a": {        <- Parent
///         "b": {    <- ThisObject
///             "c": <marker>
///         }
///     }
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DropLevel {
	/// The container holding the marker.
	ThisObject,
	/// One container above [`DropLevel::ThisObject`].
	Parent,
	/// Two containers above [`DropLevel::ThisObject`].
	Grandparent,
	/// Three containers above [`DropLevel::ThisObject`].
	GreatGrandparent,
}

impl DropLevel {
	/// Number of trailing keypath steps trimmed to reach the excised container.
	pub fn depth(self) -> usize {
		match self {
			Self::ThisObject => 1,
			Self::Parent => 2,
			Self::Grandparent => 3,
			Self::GreatGrandparent => 4,
		}
	}

	/// Stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::ThisObject => "this_object",
			Self::Parent => "parent",
			Self::Grandparent => "grandparent",
			Self::GreatGrandparent => "greatgrandparent",
		}
	}

	/// Parse a lowercase label produced by [`DropLevel::as_str`].
	pub fn from_label(label: &str) -> Option<Self> {
		match label {
			"this_object" => Some(Self::ThisObject),
			"parent" => Some(Self::Parent),
			"grandparent" => Some(Self::Grandparent),
			"greatgrandparent" => Some(Self::GreatGrandparent),
			_ => None,
		}
	}
}

impl fmt::Display for DropLevel {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// One key/value pair in a [`Map`].
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
	/// Map key.
	pub key: String,
	/// Value stored under `key`.
	pub value: Value,
}

/// Insertion-ordered map with unique keys.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Map {
	entries: Vec<Entry>,
}

impl Map {
	/// Create an empty map.
	pub fn new() -> Self {
		Self::default()
	}

	/// Number of entries.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Return `true` when the map has no entries.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Borrow the value stored under `key`.
	pub fn get(&self, key: &str) -> Option<&Value> {
		self.entries.iter().find(|entry| entry.key == key).map(|entry| &entry.value)
	}

	/// Mutably borrow the value stored under `key`.
	pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
		self.entries.iter_mut().find(|entry| entry.key == key).map(|entry| &mut entry.value)
	}

	/// Return `true` when `key` is present.
	pub fn contains_key(&self, key: &str) -> bool {
		self.get(key).is_some()
	}

	/// Insert or replace `key`, keeping the original position on replace.
	pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
		let key = key.into();
		let value = value.into();
		match self.get_mut(&key) {
			Some(slot) => Some(std::mem::replace(slot, value)),
			None => {
				self.entries.push(Entry { key, value });
				None
			}
		}
	}

	/// Remove `key`, shifting later entries forward.
	pub fn remove(&mut self, key: &str) -> Option<Value> {
		let position = self.entries.iter().position(|entry| entry.key == key)?;
		Some(self.entries.remove(position).value)
	}

	/// Iterate entries in insertion order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
		self.entries.iter().map(|entry| (entry.key.as_str(), &entry.value))
	}

	/// Iterate keys in insertion order.
	pub fn keys(&self) -> impl Iterator<Item = &str> {
		self.entries.iter().map(|entry| entry.key.as_str())
	}

	/// Iterate values in insertion order.
	pub fn values(&self) -> impl Iterator<Item = &Value> {
		self.entries.iter().map(|entry| &entry.value)
	}

	/// Keep only entries accepted by `keep`.
	pub fn retain(&mut self, mut keep: impl FnMut(&str, &Value) -> bool) {
		self.entries.retain(|entry| keep(&entry.key, &entry.value));
	}
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Map {
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		let mut map = Self::new();
		for (key, value) in iter {
			map.insert(key, value);
		}
		map
	}
}

impl IntoIterator for Map {
	type Item = (String, Value);
	type IntoIter = std::iter::Map<std::vec::IntoIter<Entry>, fn(Entry) -> (String, Value)>;

	fn into_iter(self) -> Self::IntoIter {
		let pair: fn(Entry) -> (String, Value) = |entry| (entry.key, entry.value);
		self.entries.into_iter().map(pair)
	}
}
