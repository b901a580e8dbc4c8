use crate::tree::{Map, Value};

/// Return `false` for `Null`, the empty string, and containers holding nothing with content.
///
/// Sentinels always have content; the pruner never looks inside them.
pub fn has_content(value: &Value) -> bool {
	match value {
		Value::Null => false,
		Value::String(text) => !text.is_empty(),
		Value::List(items) => items.iter().any(has_content),
		Value::Map(map) => map.values().any(has_content),
		Value::Bool(_) | Value::Int(_) | Value::Float(_) | Value::Sentinel(_) => true,
	}
}

/// Rebuild `value` keeping only entries and elements with content.
pub fn prune(value: &Value) -> Value {
	match value {
		Value::List(items) => Value::List(items.iter().filter_map(pruned_child).collect()),
		Value::Map(map) => Value::Map(
			map.iter()
				.filter_map(|(key, item)| pruned_child(item).map(|item| (key, item)))
				.collect::<Map>(),
		),
		other => other.clone(),
	}
}

fn pruned_child(value: &Value) -> Option<Value> {
	has_content(value).then(|| prune(value))
}
