use std::fmt;
use std::sync::Arc;

use tracing::trace;

use crate::tree::{DropLevel, DynError, MapError, Path, Result, Segment, Value};

type ApplyFnDyn = dyn Fn(Value) -> std::result::Result<Value, DynError> + Send + Sync;
type PredicateFnDyn = dyn Fn(&Value) -> bool + Send + Sync;

/// Named transformation applied to a successfully resolved value.
#[derive(Clone)]
pub struct Apply {
	name: Arc<str>,
	func: Arc<ApplyFnDyn>,
}

impl Apply {
	/// Wrap `func` under a label used in error reports.
	pub fn new<F>(name: impl Into<Arc<str>>, func: F) -> Self
	where
		F: Fn(Value) -> std::result::Result<Value, DynError> + Send + Sync + 'static,
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

	/// Run the transformation.
	pub fn call(&self, value: Value) -> std::result::Result<Value, DynError> {
		(self.func)(value)
	}
}

impl fmt::Debug for Apply {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("Apply").field(&self.name).finish()
	}
}

/// Named condition a resolved value must satisfy.
#[derive(Clone)]
pub struct Predicate {
	name: Arc<str>,
	func: Arc<PredicateFnDyn>,
}

impl Predicate {
	/// Wrap `func` under a label.
	pub fn new<F>(name: impl Into<Arc<str>>, func: F) -> Self
	where
		F: Fn(&Value) -> bool + Send + Sync + 'static,
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

	/// Evaluate the condition.
	pub fn check(&self, value: &Value) -> bool {
		(self.func)(value)
	}
}

impl fmt::Debug for Predicate {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("Predicate").field(&self.name).finish()
	}
}

/// Per-call resolution behavior for [`get`].
#[derive(Debug, Clone, Default)]
pub struct GetOptions {
	/// Substituted once when the traversal result is `Null`.
	pub default: Value,
	/// Transformations threaded left-to-right over a non-`Null` result.
	pub apply: Vec<Apply>,
	/// Condition checked after default substitution; failure yields `Null`.
	pub only_if: Option<Predicate>,
	/// Marker returned in place of a final `Null`.
	pub drop_level: Option<DropLevel>,
	/// Flatten a list-of-lists result by one level.
	pub flatten: bool,
}

impl GetOptions {
	/// Set the default value.
	pub fn with_default(mut self, default: impl Into<Value>) -> Self {
		self.default = default.into();
		self
	}

	/// Append a transformation to the apply chain.
	pub fn with_apply(mut self, apply: Apply) -> Self {
		self.apply.push(apply);
		self
	}

	/// Set the condition.
	pub fn with_only_if(mut self, predicate: Predicate) -> Self {
		self.only_if = Some(predicate);
		self
	}

	/// Set the drop level used for a final `Null`.
	pub fn with_drop_level(mut self, level: DropLevel) -> Self {
		self.drop_level = Some(level);
		self
	}

	/// Request one-level flattening.
	pub fn flattened(mut self) -> Self {
		self.flatten = true;
		self
	}
}

/// Parse `path` and resolve it against `source`.
pub fn get(source: &Value, path: &str, options: &GetOptions) -> Result<Value> {
	let parsed = Path::parse(path)?;
	get_path(source, &parsed, options)
}

/// Resolve a pre-parsed path against `source`.
pub fn get_path(source: &Value, path: &Path, options: &GetOptions) -> Result<Value> {
	let mut result = evaluate(source, &path.segments, &options.default, options.flatten);
	if result.is_null() {
		result = options.default.clone();
	}

	if let Some(predicate) = &options.only_if
		&& !result.is_null()
		&& !predicate.check(&result)
	{
		result = Value::Null;
	}

	for apply in &options.apply {
		if result.is_null() {
			break;
		}
		result = apply.call(result).map_err(|source| MapError::Apply {
			path: path.to_string(),
			function: apply.name().to_owned(),
			source,
		})?;
	}

	if result.is_null()
		&& let Some(level) = options.drop_level
	{
		result = Value::drop_marker(level);
	}

	trace!(path = %path, kind = result.kind(), "resolved path");
	Ok(result)
}

/// Resolve `path` against `source` with no default, apply chain, or drop level.
pub fn resolve(source: &Value, path: &Path) -> Value {
	evaluate(source, &path.segments, &Value::Null, false)
}

/// Traverse `segments`, treating a trailing wildcard as a flatten request on the preceding result.
fn evaluate(node: &Value, segments: &[Segment], default: &Value, flatten: bool) -> Value {
	let (segments, trailing_wildcard) = match segments.split_last() {
		Some((Segment::Wildcard, prefix)) => (prefix, true),
		_ => (segments, false),
	};

	let result = traverse(node, segments, default);
	match result {
		Value::List(items) if trailing_wildcard || flatten => Value::List(flatten_once(items)),
		_ if trailing_wildcard => Value::Null,
		other => other,
	}
}

fn traverse(node: &Value, segments: &[Segment], default: &Value) -> Value {
	let Some((segment, rest)) = segments.split_first() else {
		return node.clone();
	};

	match (segment, node) {
		(Segment::Field(name), Value::Map(map)) => match map.get(name) {
			Some(child) => traverse(child, rest, default),
			None => Value::Null,
		},
		(Segment::Index(index), Value::List(items)) => match wrap_index(*index, items.len()) {
			Some(position) => traverse(&items[position], rest, default),
			None => Value::Null,
		},
		(Segment::Wildcard, Value::List(items)) => Value::List(items.iter().map(|item| traverse(item, rest, default)).collect()),
		(Segment::TupleGroup(members), _) => Value::List(
			members
				.iter()
				.map(|member| match evaluate(node, &member.segments, default, false) {
					Value::Null => default.clone(),
					other => other,
				})
				.collect(),
		),
		(Segment::Field(_) | Segment::Index(_) | Segment::Wildcard, _) => Value::Null,
	}
}

fn wrap_index(index: i64, len: usize) -> Option<usize> {
	let len = i64::try_from(len).ok()?;
	let position = if index < 0 { len + index } else { index };
	if (0..len).contains(&position) { usize::try_from(position).ok() } else { None }
}

fn flatten_once(items: Vec<Value>) -> Vec<Value> {
	let mut out = Vec::with_capacity(items.len());
	for item in items {
		match item {
			Value::List(inner) => out.extend(inner),
			Value::Null => {}
			other => out.push(other),
		}
	}
	out
}

#[cfg(test)]
mod tests;
