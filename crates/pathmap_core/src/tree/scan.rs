use std::collections::BTreeSet;

use crate::tree::{Keypath, Sentinel, Value};

/// Sentinel family searched for by [`find_sentinels`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentinelKind {
	/// [`Sentinel::Drop`] markers.
	Drop,
	/// [`Sentinel::Keep`] markers.
	Keep,
}

impl SentinelKind {
	fn matches(self, sentinel: &Sentinel) -> bool {
		matches!(
			(self, sentinel),
			(Self::Drop, Sentinel::Drop(_)) | (Self::Keep, Sentinel::Keep(_))
		)
	}
}

/// Collect the keypath of every sentinel of `kind` in `tree`.
///
/// Sentinel payloads are not searched.
pub fn find_sentinels(tree: &Value, kind: SentinelKind) -> BTreeSet<Keypath> {
	let mut found = BTreeSet::new();
	walk(tree, Keypath::root(), kind, &mut found);
	found
}

fn walk(node: &Value, here: Keypath, kind: SentinelKind, found: &mut BTreeSet<Keypath>) {
	match node {
		Value::Sentinel(sentinel) => {
			if kind.matches(sentinel) {
				found.insert(here);
			}
		}
		Value::Map(map) => {
			for (key, child) in map.iter() {
				walk(child, here.key(key), kind, found);
			}
		}
		Value::List(items) => {
			for (index, child) in items.iter().enumerate() {
				walk(child, here.index(index), kind, found);
			}
		}
		Value::Null | Value::Bool(_) | Value::Int(_) | Value::Float(_) | Value::String(_) => {}
	}
}
