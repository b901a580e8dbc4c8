/// Keypath tombstoning command.
pub mod drop;
/// Path resolution command.
pub mod get;
/// Path expression inspection command.
pub mod parse;
/// Empty-value pruning command.
pub mod prune;
/// Keypath write command.
pub mod set;
#[cfg(test)]
pub(crate) mod test_support;
/// Shared input and output helpers.
pub(crate) mod util;
