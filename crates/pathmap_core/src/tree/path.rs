use std::fmt;
use std::str::FromStr;

use crate::tree::{MapError, Result};

/// One parsed operation in a path expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
	/// Select a named map entry.
	Field(String),
	/// Select a list element; negative values count from the end.
	Index(i64),
	/// Fan out over every list element.
	Wildcard,
	/// Resolve several subpaths against the same node.
	TupleGroup(Vec<Path>),
}

/// Parsed path expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
	/// Ordered sequence of path segments.
	pub segments: Vec<Segment>,
}

impl Path {
	/// Parse dotted field syntax with `[index]`, `[-index]`, `[*]` selectors and a trailing `(a, b.c)` group.
	pub fn parse(input: &str) -> Result<Self> {
		if input.trim().is_empty() {
			return Err(syntax_error(input, 0, input.len(), "empty path"));
		}

		let segments = parse_range(input, 0, input.len())?;
		Ok(Self { segments })
	}

	/// Return `true` when the last segment is a wildcard.
	pub fn ends_with_wildcard(&self) -> bool {
		matches!(self.segments.last(), Some(Segment::Wildcard))
	}

	/// Return `true` when the path contains a wildcard at any depth.
	pub fn has_wildcard(&self) -> bool {
		self.segments.iter().any(|segment| match segment {
			Segment::Wildcard => true,
			Segment::TupleGroup(members) => members.iter().any(Path::has_wildcard),
			Segment::Field(_) | Segment::Index(_) => false,
		})
	}
}

impl FromStr for Path {
	type Err = MapError;

	fn from_str(input: &str) -> Result<Self> {
		Self::parse(input)
	}
}

impl fmt::Display for Path {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for (idx, segment) in self.segments.iter().enumerate() {
			match segment {
				Segment::Field(name) => {
					if idx > 0 {
						f.write_str(".")?;
					}
					f.write_str(name)?;
				}
				Segment::Index(index) => write!(f, "[{index}]")?,
				Segment::Wildcard => f.write_str("[*]")?,
				Segment::TupleGroup(members) => {
					if idx > 0 {
						f.write_str(".")?;
					}
					f.write_str("(")?;
					for (member_idx, member) in members.iter().enumerate() {
						if member_idx > 0 {
							f.write_str(", ")?;
						}
						write!(f, "{member}")?;
					}
					f.write_str(")")?;
				}
			}
		}
		Ok(())
	}
}

fn is_reserved(byte: u8) -> bool {
	matches!(byte, b'.' | b'[' | b']' | b'(' | b')' | b',')
}

fn parse_range(input: &str, start: usize, end: usize) -> Result<Vec<Segment>> {
	let bytes = input.as_bytes();
	let mut idx = start;
	let mut segments = Vec::new();

	loop {
		if idx >= end {
			return Err(syntax_error(input, idx.min(end), end, "empty segment"));
		}

		if bytes[idx] == b'(' {
			let close = find_group_end(input, idx, end)?;
			segments.push(Segment::TupleGroup(parse_group_members(input, idx + 1, close)?));
			let after = close + 1;
			if after < end {
				return Err(syntax_error(input, after, end, "tuple group must be the final segment"));
			}
			return Ok(segments);
		}

		let name_start = idx;
		while idx < end && !is_reserved(bytes[idx]) {
			idx += 1;
		}
		if idx == name_start {
			let reason = if bytes[idx] == b'.' { "empty segment" } else { "unexpected character" };
			return Err(syntax_error(input, idx, idx + 1, reason));
		}
		segments.push(Segment::Field(input[name_start..idx].to_owned()));

		while idx < end && bytes[idx] == b'[' {
			let open = idx;
			let Some(close) = input[open + 1..end].find(']').map(|offset| open + 1 + offset) else {
				return Err(syntax_error(input, open, end, "unterminated bracket"));
			};
			segments.push(parse_bracket(&input[open + 1..close]).ok_or_else(|| syntax_error(input, open, close + 1, "malformed bracket contents"))?);
			idx = close + 1;
		}

		if idx >= end {
			return Ok(segments);
		}

		if bytes[idx] != b'.' {
			return Err(syntax_error(input, idx, idx + 1, "unexpected character"));
		}
		idx += 1;
	}
}

fn parse_bracket(body: &str) -> Option<Segment> {
	if body == "*" {
		return Some(Segment::Wildcard);
	}

	let digits = body.strip_prefix('-').unwrap_or(body);
	if digits.is_empty() || !digits.bytes().all(|byte| byte.is_ascii_digit()) {
		return None;
	}
	body.parse::<i64>().ok().map(Segment::Index)
}

fn find_group_end(input: &str, open: usize, end: usize) -> Result<usize> {
	let bytes = input.as_bytes();
	let mut depth = 0_usize;
	for (idx, byte) in bytes.iter().enumerate().take(end).skip(open) {
		match byte {
			b'(' => depth += 1,
			b')' => {
				depth -= 1;
				if depth == 0 {
					return Ok(idx);
				}
			}
			_ => {}
		}
	}
	Err(syntax_error(input, open, end, "unterminated tuple group"))
}

fn parse_group_members(input: &str, start: usize, end: usize) -> Result<Vec<Path>> {
	let bytes = input.as_bytes();
	let mut members = Vec::new();
	let mut depth = 0_usize;
	let mut member_start = start;

	for idx in start..=end {
		let at_boundary = idx == end || (depth == 0 && bytes[idx] == b',');
		if at_boundary {
			members.push(parse_group_member(input, member_start, idx)?);
			member_start = idx + 1;
			continue;
		}
		match bytes[idx] {
			b'(' => depth += 1,
			b')' => depth = depth.saturating_sub(1),
			_ => {}
		}
	}

	Ok(members)
}

fn parse_group_member(input: &str, mut start: usize, mut end: usize) -> Result<Path> {
	let bytes = input.as_bytes();
	while start < end && bytes[start].is_ascii_whitespace() {
		start += 1;
	}
	while end > start && bytes[end - 1].is_ascii_whitespace() {
		end -= 1;
	}
	if start == end {
		return Err(syntax_error(input, start, start, "empty tuple group member"));
	}

	Ok(Path {
		segments: parse_range(input, start, end)?,
	})
}

fn syntax_error(input: &str, at: usize, end: usize, reason: &'static str) -> MapError {
	let at = at.min(input.len());
	let end = end.clamp(at, input.len());
	MapError::InvalidPath {
		path: input.to_owned(),
		at,
		fragment: input.get(at..end).unwrap_or_default().to_owned(),
		reason,
	}
}
