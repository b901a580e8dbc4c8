use thiserror::Error;

use crate::tree::DropLevel;

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, MapError>;

/// Boxed error returned by user-supplied mapping callables and apply functions.
pub type DynError = Box<dyn std::error::Error + Send + Sync>;

/// Errors produced while parsing paths, resolving values, and running mappings.
#[derive(Debug, Error)]
pub enum MapError {
	/// Filesystem or stream IO failure.
	#[error("io: {0}")]
	Io(#[from] std::io::Error),
	/// Input text was not valid JSON.
	#[error("json: {0}")]
	Json(#[from] serde_json::Error),
	/// Path expression syntax is invalid.
	#[error("invalid path {path:?} at byte {at}: {reason} (near {fragment:?})")]
	InvalidPath {
		/// Original path string.
		path: String,
		/// Byte offset of the offending fragment.
		at: usize,
		/// Offending fragment of the input.
		fragment: String,
		/// Short description of the syntax problem.
		reason: &'static str,
	},
	/// Keypath text addressed more than one node or no node at all.
	#[error("invalid keypath {keypath:?}: {reason}")]
	InvalidKeypath {
		/// Original keypath string.
		keypath: String,
		/// Short description of the problem.
		reason: &'static str,
	},
	/// A chained `apply` function failed.
	#[error("apply function {function} failed for path {path:?}: {source}")]
	Apply {
		/// Path whose resolved value was being transformed.
		path: String,
		/// Label of the failing function.
		function: String,
		/// Underlying failure.
		#[source]
		source: DynError,
	},
	/// A drop marker asked to excise a container above the document root.
	#[error("drop level {level} at {keypath:?} is out of bounds (keypath depth {depth})")]
	DropOutOfBounds {
		/// Keypath where the marker was found.
		keypath: String,
		/// Requested level.
		level: DropLevel,
		/// Number of steps in the marker keypath.
		depth: usize,
	},
	/// Mapping callable or spec thunk failed.
	#[error("mapping {mapping} failed: {source}")]
	MappingFailed {
		/// Label of the failing callable.
		mapping: String,
		/// Underlying failure.
		#[source]
		source: DynError,
	},
	/// Mapping callable returned something other than a map or list.
	#[error("mapping {mapping} returned {got}, expected a map or list")]
	MappingNotContainer {
		/// Label of the mapping callable.
		mapping: String,
		/// Kind of the returned value.
		got: &'static str,
	},
	/// A group key received a value it cannot be destructured from.
	#[error("group key ({keys}) expected {expected} values, got {got}")]
	GroupArity {
		/// Comma-joined group member names.
		keys: String,
		/// Number of names in the group.
		expected: usize,
		/// Shape of the value that was supplied.
		got: String,
	},
}
