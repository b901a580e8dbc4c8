use std::fmt;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::tree::{DynError, Map, MapError, Result, Sentinel, SentinelKind, Spec, Value, drop_at, find_sentinels, prune, set_in};

/// Mapping callable: source tree plus keyword arguments to a candidate tree.
pub type MapFn = dyn Fn(&Value, &Map) -> std::result::Result<Value, DynError> + Send + Sync;

/// Post-processing switches for [`Mapper`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapperOptions {
	/// Prune empty values after drop markers are applied.
	pub remove_empty: bool,
}

impl Default for MapperOptions {
	fn default() -> Self {
		Self { remove_empty: true }
	}
}

#[derive(Clone)]
enum Template {
	Callable(Arc<MapFn>),
	Spec(Arc<Spec>),
}

/// Runs a mapping and rewrites its result according to embedded drop and keep markers.
///
/// Each call is independent; a `Mapper` holds no per-call state and can be shared across threads.
#[derive(Clone)]
pub struct Mapper {
	name: Arc<str>,
	template: Template,
	options: MapperOptions,
}

impl Mapper {
	/// Wrap a mapping callable; its type name is used as the label until [`Mapper::named`] is called.
	pub fn new<F>(map_fn: F) -> Self
	where
		F: Fn(&Value, &Map) -> std::result::Result<Value, DynError> + Send + Sync + 'static,
	{
		Self {
			name: std::any::type_name::<F>().into(),
			template: Template::Callable(Arc::new(map_fn)),
			options: MapperOptions::default(),
		}
	}

	/// Wrap a declarative spec. Keyword arguments are not visible to spec thunks.
	pub fn from_spec(spec: Spec) -> Self {
		Self {
			name: "spec".into(),
			template: Template::Spec(Arc::new(spec)),
			options: MapperOptions::default(),
		}
	}

	/// Override the label used in errors and logs.
	pub fn named(mut self, name: impl Into<Arc<str>>) -> Self {
		self.name = name.into();
		self
	}

	/// Replace the post-processing options.
	pub fn with_options(mut self, options: MapperOptions) -> Self {
		self.options = options;
		self
	}

	/// Label used in errors and logs.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Active post-processing options.
	pub fn options(&self) -> MapperOptions {
		self.options
	}

	/// Run the pipeline with no keyword arguments.
	pub fn call(&self, source: &Value) -> Result<Value> {
		self.call_with(source, &Map::new())
	}

	/// Run the pipeline: evaluate, apply drop markers, prune, then restore keep markers.
	pub fn call_with(&self, source: &Value, kwargs: &Map) -> Result<Value> {
		let candidate = self.evaluate(source, kwargs)?;
		if !candidate.is_container() {
			return Err(MapError::MappingNotContainer {
				mapping: self.name.to_string(),
				got: candidate.kind(),
			});
		}

		let drops = find_sentinels(&candidate, SentinelKind::Drop);
		debug!(mapping = %self.name, drops = drops.len(), "applying drop markers");
		let dropped = if drops.is_empty() { candidate } else { drop_at(&candidate, drops)? };

		let pruned = if self.options.remove_empty { prune(&dropped) } else { dropped };
		debug!(mapping = %self.name, remove_empty = self.options.remove_empty, "pruned empty values");

		let keeps = find_sentinels(&pruned, SentinelKind::Keep);
		debug!(mapping = %self.name, keeps = keeps.len(), "restoring keep markers");
		let mut out = pruned;
		for keypath in &keeps {
			let restored = match keypath.lookup(&out) {
				Some(Value::Sentinel(Sentinel::Keep(inner))) => unwrap_keeps(inner),
				_ => continue,
			};
			trace!(keypath = %keypath, kind = restored.kind(), "restored kept value");
			set_in(&mut out, keypath, restored);
		}
		Ok(out)
	}

	fn evaluate(&self, source: &Value, kwargs: &Map) -> Result<Value> {
		match &self.template {
			Template::Callable(map_fn) => map_fn(source, kwargs).map_err(|source| MapError::MappingFailed {
				mapping: self.name.to_string(),
				source,
			}),
			Template::Spec(spec) => spec.evaluate(source),
		}
	}
}

impl fmt::Debug for Mapper {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Mapper")
			.field("name", &self.name)
			.field("options", &self.options)
			.finish_non_exhaustive()
	}
}

fn unwrap_keeps(value: &Value) -> Value {
	match value {
		Value::Sentinel(Sentinel::Keep(inner)) => unwrap_keeps(inner),
		Value::List(items) => Value::List(items.iter().map(unwrap_keeps).collect()),
		Value::Map(map) => Value::Map(map.iter().map(|(key, item)| (key, unwrap_keeps(item))).collect()),
		other => other.clone(),
	}
}

#[cfg(test)]
mod tests;
