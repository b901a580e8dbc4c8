use std::collections::BTreeSet;

use tracing::trace;

use crate::tree::{KeyStep, Keypath, Map, MapError, Result, Sentinel, Value};

/// Tombstone the nodes addressed by `keypaths`, resolving drop markers to their ancestors.
///
/// Every target is computed against the unmodified `tree` before anything is written, so the
/// output does not depend on the order of `keypaths`. A target equal to the document root
/// empties the whole document.
pub fn drop_at(tree: &Value, keypaths: impl IntoIterator<Item = Keypath>) -> Result<Value> {
	let keypaths: BTreeSet<Keypath> = keypaths.into_iter().collect();
	let mut targets = BTreeSet::new();
	for keypath in &keypaths {
		let target = drop_target(tree, keypath)?;
		trace!(keypath = %keypath, target = %target, "drop target");
		targets.insert(target);
	}

	if targets.contains(&Keypath::root()) {
		return Ok(Value::Map(Map::new()));
	}

	let mut out = tree.clone();
	for target in &targets {
		if let Some(slot) = target.lookup_mut(&mut out) {
			*slot = Value::Null;
		}
	}
	Ok(out)
}

fn drop_target(tree: &Value, keypath: &Keypath) -> Result<Keypath> {
	match keypath.lookup(tree) {
		Some(Value::Sentinel(Sentinel::Drop(level))) => keypath.trimmed(level.depth()).ok_or_else(|| MapError::DropOutOfBounds {
			keypath: keypath.to_string(),
			level: *level,
			depth: keypath.len(),
		}),
		_ => Ok(keypath.clone()),
	}
}

/// Return a copy of `tree` with `value` written at `keypath`.
///
/// Missing intermediates leave the copy unchanged; see [`set_in`].
pub fn set_at(tree: &Value, keypath: &Keypath, value: Value) -> Value {
	let mut out = tree.clone();
	set_in(&mut out, keypath, value);
	out
}

/// Write `value` at `keypath` in place, returning whether the write happened.
///
/// The final step may add a new map key; list indices must already exist.
pub fn set_in(tree: &mut Value, keypath: &Keypath, value: Value) -> bool {
	let Some((last, _)) = keypath.steps().split_last() else {
		*tree = value;
		return true;
	};
	let Some(parent_path) = keypath.trimmed(1) else {
		return false;
	};
	let Some(parent) = parent_path.lookup_mut(tree) else {
		return false;
	};

	match (last, parent) {
		(KeyStep::Key(key), Value::Map(map)) => {
			map.insert(key.as_str(), value);
			true
		}
		(KeyStep::Index(index), Value::List(items)) => match items.get_mut(*index) {
			Some(slot) => {
				*slot = value;
				true
			}
			None => false,
		},
		_ => false,
	}
}
