use std::fmt;
use std::sync::Arc;

use crate::tree::{DropLevel, DynError, GetOptions, Map, MapError, Path, Result, Value, get_path};

type ThunkFnDyn = dyn Fn(&Value) -> std::result::Result<Value, DynError> + Send + Sync;

/// Named deferred computation evaluated against the mapping source.
#[derive(Clone)]
pub struct Thunk {
	name: Arc<str>,
	func: Arc<ThunkFnDyn>,
}

impl Thunk {
	/// Wrap `func` under a label used in error reports.
	pub fn new<F>(name: impl Into<Arc<str>>, func: F) -> Self
	where
		F: Fn(&Value) -> std::result::Result<Value, DynError> + Send + Sync + 'static,
	{
		Self {
			name: name.into(),
			func: Arc::new(func),
		}
	}

	/// Label given at construction.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Evaluate against `source`.
	pub fn call(&self, source: &Value) -> std::result::Result<Value, DynError> {
		(self.func)(source)
	}
}

impl fmt::Debug for Thunk {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("Thunk").field(&self.name).finish()
	}
}

/// Key of a map entry in a [`Spec`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecKey {
	/// Single output key.
	Name(String),
	/// Several sibling output keys filled by destructuring one value.
	Group(Vec<String>),
}

impl From<&str> for SpecKey {
	fn from(value: &str) -> Self {
		Self::Name(value.to_owned())
	}
}

impl From<String> for SpecKey {
	fn from(value: String) -> Self {
		Self::Name(value)
	}
}

/// Declarative mapping template.
#[derive(Debug, Clone)]
pub enum Spec {
	/// Value copied as-is, sentinels included.
	Literal(Value),
	/// Computation run against the source.
	Thunk(Thunk),
	/// List of child specs.
	List(Vec<Spec>),
	/// Ordered map of child specs.
	Map(Vec<(SpecKey, Spec)>),
}

impl Spec {
	/// Literal leaf.
	pub fn lit(value: impl Into<Value>) -> Self {
		Self::Literal(value.into())
	}

	/// Path lookup with default options; the path is parsed now.
	pub fn get(path: &str) -> Result<Self> {
		Self::get_with(path, GetOptions::default())
	}

	/// Path lookup with `options`; the path is parsed now.
	pub fn get_with(path: &str, options: GetOptions) -> Result<Self> {
		let parsed = Path::parse(path)?;
		Ok(Self::thunk(path, move |source| {
			get_path(source, &parsed, &options).map_err(DynError::from)
		}))
	}

	/// Computation leaf.
	pub fn thunk<F>(name: impl Into<Arc<str>>, func: F) -> Self
	where
		F: Fn(&Value) -> std::result::Result<Value, DynError> + Send + Sync + 'static,
	{
		Self::Thunk(Thunk::new(name, func))
	}

	/// Drop marker leaf.
	pub fn drop(level: DropLevel) -> Self {
		Self::Literal(Value::drop_marker(level))
	}

	/// Keep marker leaf.
	pub fn keep(value: impl Into<Value>) -> Self {
		Self::Literal(Value::keep(value))
	}

	/// List node.
	pub fn list(items: impl IntoIterator<Item = Spec>) -> Self {
		Self::List(items.into_iter().collect())
	}

	/// Map node built from entries such as [`Spec::entry`] and [`Spec::group`].
	pub fn map(entries: impl IntoIterator<Item = (SpecKey, Spec)>) -> Self {
		Self::Map(entries.into_iter().collect())
	}

	/// Map entry writing `spec` under `key`.
	pub fn entry(key: impl Into<SpecKey>, spec: Spec) -> (SpecKey, Spec) {
		(key.into(), spec)
	}

	/// Map entry destructuring the value of `spec` into the sibling keys `names`.
	pub fn group<I, S>(names: I, spec: Spec) -> (SpecKey, Spec)
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		(SpecKey::Group(names.into_iter().map(Into::into).collect()), spec)
	}

	/// Evaluate the template against `source`.
	pub fn evaluate(&self, source: &Value) -> Result<Value> {
		match self {
			Self::Literal(value) => Ok(value.clone()),
			Self::Thunk(thunk) => thunk.call(source).map_err(|err| thunk_error(thunk.name(), err)),
			Self::List(items) => items.iter().map(|item| item.evaluate(source)).collect::<Result<Vec<_>>>().map(Value::List),
			Self::Map(entries) => {
				let mut out = Map::new();
				for (key, spec) in entries {
					let value = spec.evaluate(source)?;
					match key {
						SpecKey::Name(name) => {
							out.insert(name.as_str(), value);
						}
						SpecKey::Group(names) => destructure(names, value, &mut out)?,
					}
				}
				Ok(Value::Map(out))
			}
		}
	}
}

fn thunk_error(name: &str, err: DynError) -> MapError {
	match err.downcast::<MapError>() {
		Ok(inner) => *inner,
		Err(source) => MapError::MappingFailed {
			mapping: name.to_owned(),
			source,
		},
	}
}

fn destructure(names: &[String], value: Value, out: &mut Map) -> Result<()> {
	match value {
		Value::List(items) if items.len() == names.len() => {
			for (name, item) in names.iter().zip(items) {
				out.insert(name.as_str(), item);
			}
			Ok(())
		}
		Value::Map(map) if map.len() == names.len() => {
			for (name, (_, item)) in names.iter().zip(map) {
				out.insert(name.as_str(), item);
			}
			Ok(())
		}
		shared @ (Value::Null | Value::Sentinel(_)) => {
			for name in names {
				out.insert(name.as_str(), shared.clone());
			}
			Ok(())
		}
		other => Err(MapError::GroupArity {
			keys: names.join(", "),
			expected: names.len(),
			got: shape(&other),
		}),
	}
}

fn shape(value: &Value) -> String {
	match value {
		Value::List(items) => format!("List of {}", items.len()),
		Value::Map(map) => format!("Map of {}", map.len()),
		other => other.kind().to_owned(),
	}
}
