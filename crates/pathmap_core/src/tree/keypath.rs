use std::fmt;
use std::str::FromStr;

use crate::tree::{MapError, Result, Value};

/// One step of a concrete keypath.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum KeyStep {
	/// Map key.
	Key(String),
	/// Zero-based list index.
	Index(usize),
}

/// Fully concrete address of exactly one node.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Keypath {
	steps: Vec<KeyStep>,
}

impl Keypath {
	/// Keypath addressing the document root.
	pub fn root() -> Self {
		Self::default()
	}

	/// Parse keypath text such as `a.b[0].c`, `[0].a`, or `a["x.y"]`; wildcards, negative indices, and groups are rejected.
	///
	/// The empty string is the root keypath.
	pub fn parse(input: &str) -> Result<Self> {
		let bytes = input.as_bytes();
		let mut steps = Vec::new();
		let mut idx = 0;

		while idx < bytes.len() {
			if bytes[idx] == b'[' {
				let (step, next) = parse_bracket(input, idx)?;
				steps.push(step);
				idx = next;
				continue;
			}
			if !steps.is_empty() {
				if bytes[idx] != b'.' {
					return Err(invalid(input, "unexpected character"));
				}
				idx += 1;
			}

			let start = idx;
			while idx < bytes.len() && !matches!(bytes[idx], b'.' | b'[') {
				idx += 1;
			}
			steps.push(KeyStep::Key(bare_key(input, &input[start..idx])?.to_owned()));
		}
		Ok(Self { steps })
	}

	/// Borrow the ordered steps.
	pub fn steps(&self) -> &[KeyStep] {
		&self.steps
	}

	/// Number of steps.
	pub fn len(&self) -> usize {
		self.steps.len()
	}

	/// Return `true` for the root keypath.
	pub fn is_empty(&self) -> bool {
		self.steps.is_empty()
	}

	/// Return a child keypath with `key` appended.
	pub fn key(&self, key: &str) -> Self {
		self.child(KeyStep::Key(key.to_owned()))
	}

	/// Return a child keypath with `index` appended.
	pub fn index(&self, index: usize) -> Self {
		self.child(KeyStep::Index(index))
	}

	/// Return this keypath with `count` trailing steps removed, or `None` when it is shorter than `count`.
	pub fn trimmed(&self, count: usize) -> Option<Self> {
		let keep = self.steps.len().checked_sub(count)?;
		Some(Self {
			steps: self.steps[..keep].to_vec(),
		})
	}

	/// Return `true` when `self` equals `other` or addresses one of its ancestors.
	pub fn is_prefix_of(&self, other: &Keypath) -> bool {
		other.steps.starts_with(&self.steps)
	}

	/// Borrow the node addressed by this keypath.
	pub fn lookup<'a>(&self, tree: &'a Value) -> Option<&'a Value> {
		let mut current = tree;
		for step in &self.steps {
			current = match (step, current) {
				(KeyStep::Key(key), Value::Map(map)) => map.get(key)?,
				(KeyStep::Index(index), Value::List(items)) => items.get(*index)?,
				_ => return None,
			};
		}
		Some(current)
	}

	/// Mutably borrow the node addressed by this keypath.
	pub fn lookup_mut<'a>(&self, tree: &'a mut Value) -> Option<&'a mut Value> {
		let mut current = tree;
		for step in &self.steps {
			current = match (step, current) {
				(KeyStep::Key(key), Value::Map(map)) => map.get_mut(key)?,
				(KeyStep::Index(index), Value::List(items)) => items.get_mut(*index)?,
				_ => return None,
			};
		}
		Some(current)
	}

	fn child(&self, step: KeyStep) -> Self {
		let mut steps = Vec::with_capacity(self.steps.len() + 1);
		steps.extend_from_slice(&self.steps);
		steps.push(step);
		Self { steps }
	}
}

impl From<Vec<KeyStep>> for Keypath {
	fn from(steps: Vec<KeyStep>) -> Self {
		Self { steps }
	}
}

impl FromStr for Keypath {
	type Err = MapError;

	fn from_str(input: &str) -> Result<Self> {
		Self::parse(input)
	}
}

/// Keys that are empty or hold a reserved character render quoted, as `["x.y"]`.
impl fmt::Display for Keypath {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for (idx, step) in self.steps.iter().enumerate() {
			match step {
				KeyStep::Key(key) if needs_quotes(key) => {
					f.write_str("[\"")?;
					for ch in key.chars() {
						if matches!(ch, '"' | '\\') {
							f.write_str("\\")?;
						}
						write!(f, "{ch}")?;
					}
					f.write_str("\"]")?;
				}
				KeyStep::Key(key) => {
					if idx > 0 {
						f.write_str(".")?;
					}
					f.write_str(key)?;
				}
				KeyStep::Index(index) => write!(f, "[{index}]")?,
			}
		}
		Ok(())
	}
}

fn is_reserved(ch: char) -> bool {
	matches!(ch, '.' | '[' | ']' | '(' | ')' | ',' | '"' | '\\')
}

fn needs_quotes(key: &str) -> bool {
	key.is_empty() || key.chars().any(is_reserved)
}

fn invalid(input: &str, reason: &'static str) -> MapError {
	MapError::InvalidKeypath {
		keypath: input.to_owned(),
		reason,
	}
}

fn bare_key<'a>(input: &str, key: &'a str) -> Result<&'a str> {
	if key.is_empty() {
		return Err(invalid(input, "empty key"));
	}
	if key.contains(['(', ')', ',']) {
		return Err(invalid(input, "tuple group"));
	}
	if key.contains(is_reserved) {
		return Err(invalid(input, "unexpected character"));
	}
	Ok(key)
}

/// Parse the bracket opening at `open`, returning the step and the offset just past `]`.
fn parse_bracket(input: &str, open: usize) -> Result<(KeyStep, usize)> {
	let body_start = open + 1;
	if input[body_start..].starts_with('"') {
		return parse_quoted_key(input, body_start + 1);
	}

	let Some(close) = input[body_start..].find(']').map(|offset| body_start + offset) else {
		return Err(invalid(input, "unterminated bracket"));
	};
	let body = &input[body_start..close];
	let step = match body {
		"*" => return Err(invalid(input, "wildcard")),
		_ if body.starts_with('-') => return Err(invalid(input, "negative index")),
		_ if !body.is_empty() && body.bytes().all(|byte| byte.is_ascii_digit()) => {
			KeyStep::Index(body.parse().map_err(|_| invalid(input, "index too large"))?)
		}
		_ => return Err(invalid(input, "malformed bracket contents")),
	};
	Ok((step, close + 1))
}

fn parse_quoted_key(input: &str, start: usize) -> Result<(KeyStep, usize)> {
	let mut key = String::new();
	let mut chars = input[start..].char_indices();
	while let Some((offset, ch)) = chars.next() {
		match ch {
			'\\' => match chars.next() {
				Some((_, escaped @ ('"' | '\\'))) => key.push(escaped),
				_ => return Err(invalid(input, "bad escape")),
			},
			'"' => {
				let close = start + offset + 1;
				if input.as_bytes().get(close) != Some(&b']') {
					return Err(invalid(input, "unterminated bracket"));
				}
				return Ok((KeyStep::Key(key), close + 1));
			}
			other => key.push(other),
		}
	}
	Err(invalid(input, "unterminated bracket"))
}
