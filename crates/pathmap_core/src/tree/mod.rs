mod error;
mod json;
mod keypath;
mod mapper;
mod mutate;
pub mod ops;
mod path;
mod prune;
mod resolve;
mod scan;
mod spec;
mod value;

/// Error and result aliases.
pub use error::{DynError, MapError, Result};
/// Concrete node addresses used by the scanner and mutator.
pub use keypath::{KeyStep, Keypath};
/// Mapping pipeline and its options.
pub use mapper::{MapFn, Mapper, MapperOptions};
/// Batched tombstoning and exact-path writes.
pub use mutate::{drop_at, set_at, set_in};
/// Path mini-language types.
pub use path::{Path, Segment};
/// Deep-emptiness checks and pruning.
pub use prune::{has_content, prune};
/// Path resolution entry points and per-call options.
pub use resolve::{Apply, GetOptions, Predicate, get, get_path, resolve};
/// Sentinel discovery.
pub use scan::{SentinelKind, find_sentinels};
/// Declarative mapping specification types.
pub use spec::{Spec, SpecKey, Thunk};
/// Tree value types.
pub use value::{DropLevel, Entry, Map, Sentinel, Value};
