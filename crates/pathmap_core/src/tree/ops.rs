//! Named [`Apply`] and [`Predicate`] constructors for common transformations and checks.

use std::cmp::Ordering;

use thiserror::Error;

use crate::tree::{Apply, DynError, Predicate, Value};

/// Failure raised by an op when handed a value it cannot process.
#[derive(Debug, Error)]
pub enum OpError {
	/// Input kind is not supported by the op.
	#[error("{op} does not accept {got}")]
	Unsupported {
		/// Op label.
		op: &'static str,
		/// Kind of the rejected input.
		got: &'static str,
	},
	/// Integer arithmetic overflowed.
	#[error("{op} overflowed")]
	Overflow {
		/// Op label.
		op: &'static str,
	},
	/// Division by zero.
	#[error("division by zero")]
	DivisionByZero,
}

fn unsupported(op: &'static str, value: &Value) -> DynError {
	OpError::Unsupported { op, got: value.kind() }.into()
}

fn arith(
	op: &'static str,
	lhs: &Value,
	rhs: &Value,
	int: fn(i64, i64) -> Option<i64>,
	float: fn(f64, f64) -> f64,
) -> Result<Value, DynError> {
	if let (Value::Int(a), Value::Int(b)) = (lhs, rhs) {
		return int(*a, *b).map(Value::Int).ok_or_else(|| overflow(op));
	}
	match (lhs.as_f64(), rhs.as_f64()) {
		(Some(a), Some(b)) => Ok(Value::Float(float(a, b))),
		(None, _) => Err(unsupported(op, lhs)),
		(_, None) => Err(unsupported(op, rhs)),
	}
}

/// Add `operand` to numbers; concatenate it onto strings and lists.
pub fn add(operand: impl Into<Value>) -> Apply {
	let operand = operand.into();
	Apply::new("add", move |value| match (value, &operand) {
		(Value::String(mut text), Value::String(tail)) => {
			text.push_str(tail);
			Ok(Value::String(text))
		}
		(Value::List(mut items), Value::List(tail)) => {
			items.extend(tail.iter().cloned());
			Ok(Value::List(items))
		}
		(value, operand) => arith("add", &value, operand, i64::checked_add, |a, b| a + b),
	})
}

/// Subtract `operand` from numbers.
pub fn subtract(operand: impl Into<Value>) -> Apply {
	let operand = operand.into();
	Apply::new("subtract", move |value| arith("subtract", &value, &operand, i64::checked_sub, |a, b| a - b))
}

/// Multiply numbers by `operand`; repeat strings and lists by an integer `operand`.
///
/// Repetitions too large to allocate fail with [`OpError::Overflow`].
pub fn multiply(operand: impl Into<Value>) -> Apply {
	let operand = operand.into();
	Apply::new("multiply", move |value| match (value, &operand) {
		(Value::String(text), Value::Int(times)) => {
			let times = repeat_count(*times)?;
			let mut out = String::new();
			out.try_reserve_exact(repeated_len(text.len(), times)?).map_err(|_| overflow("multiply"))?;
			if !text.is_empty() {
				for _ in 0..times {
					out.push_str(&text);
				}
			}
			Ok(Value::String(out))
		}
		(Value::List(items), Value::Int(times)) => {
			let times = repeat_count(*times)?;
			let mut out = Vec::new();
			out.try_reserve_exact(repeated_len(items.len(), times)?).map_err(|_| overflow("multiply"))?;
			if !items.is_empty() {
				for _ in 0..times {
					out.extend(items.iter().cloned());
				}
			}
			Ok(Value::List(out))
		}
		(value, operand) => arith("multiply", &value, operand, i64::checked_mul, |a, b| a * b),
	})
}

fn overflow(op: &'static str) -> DynError {
	OpError::Overflow { op }.into()
}

/// Negative counts repeat zero times.
fn repeat_count(times: i64) -> Result<usize, DynError> {
	if times <= 0 {
		return Ok(0);
	}
	usize::try_from(times).map_err(|_| overflow("multiply"))
}

fn repeated_len(len: usize, times: usize) -> Result<usize, DynError> {
	len.checked_mul(times).ok_or_else(|| overflow("multiply"))
}

/// Divide numbers by `operand`, always producing a float.
pub fn divide(operand: impl Into<Value>) -> Apply {
	let operand = operand.into();
	Apply::new("divide", move |value| {
		let (Some(numerator), Some(denominator)) = (value.as_f64(), operand.as_f64()) else {
			return Err(unsupported("divide", if value.as_f64().is_none() { &value } else { &operand }));
		};
		if denominator == 0.0 {
			return Err(OpError::DivisionByZero.into());
		}
		Ok(Value::Float(numerator / denominator))
	})
}

fn map_string(op: &'static str, transform: impl Fn(&str) -> String + Send + Sync + 'static) -> Apply {
	Apply::new(op, move |value| match value {
		Value::String(text) => Ok(Value::String(transform(&text))),
		other => Err(unsupported(op, &other)),
	})
}

/// Replace every occurrence of `old` with `new` in a string.
pub fn str_replace(old: impl Into<String>, new: impl Into<String>) -> Apply {
	let (old, new) = (old.into(), new.into());
	map_string("str_replace", move |text| text.replace(&old, &new))
}

/// Uppercase a string.
pub fn str_upper() -> Apply {
	map_string("str_upper", str::to_uppercase)
}

/// Lowercase a string.
pub fn str_lower() -> Apply {
	map_string("str_lower", str::to_lowercase)
}

/// Keep the first `n` list elements or string characters.
pub fn keep(n: usize) -> Apply {
	Apply::new("keep", move |value| match value {
		Value::List(mut items) => {
			items.truncate(n);
			Ok(Value::List(items))
		}
		Value::String(text) => Ok(Value::String(text.chars().take(n).collect())),
		other => Err(unsupported("keep", &other)),
	})
}

/// Select one list element or string character; negative positions count from the end.
///
/// Out-of-range positions yield `Null`.
pub fn index(position: i64) -> Apply {
	Apply::new("index", move |value| match value {
		Value::List(mut items) => Ok(wrap(position, items.len()).map_or(Value::Null, |at| items.swap_remove(at))),
		Value::String(text) => {
			let chars: Vec<char> = text.chars().collect();
			Ok(wrap(position, chars.len()).map_or(Value::Null, |at| Value::String(chars[at].to_string())))
		}
		other => Err(unsupported("index", &other)),
	})
}

fn wrap(position: i64, len: usize) -> Option<usize> {
	let len = i64::try_from(len).ok()?;
	let at = if position < 0 { len + position } else { position };
	if (0..len).contains(&at) { usize::try_from(at).ok() } else { None }
}

/// Run `apply` over every list element.
pub fn map_list(apply: Apply) -> Apply {
	Apply::new(format!("map_list({})", apply.name()), move |value| match value {
		Value::List(items) => items.into_iter().map(|item| apply.call(item)).collect::<Result<Vec<_>, _>>().map(Value::List),
		other => Err(unsupported("map_list", &other)),
	})
}

/// Keep the list elements accepted by `predicate`.
pub fn filter_list(predicate: Predicate) -> Apply {
	Apply::new(format!("filter_list({})", predicate.name()), move |value| match value {
		Value::List(items) => Ok(Value::List(items.into_iter().filter(|item| predicate.check(item)).collect())),
		other => Err(unsupported("filter_list", &other)),
	})
}

fn compare(lhs: &Value, rhs: &Value) -> Option<Ordering> {
	match (lhs, rhs) {
		(Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
		(Value::String(a), Value::String(b)) => Some(a.cmp(b)),
		_ => lhs.as_f64()?.partial_cmp(&rhs.as_f64()?),
	}
}

fn loosely_equal(lhs: &Value, rhs: &Value) -> bool {
	match (lhs.as_f64(), rhs.as_f64()) {
		(Some(_), Some(_)) => compare(lhs, rhs) == Some(Ordering::Equal),
		_ => lhs == rhs,
	}
}

/// `Some(found)` for lists, map keys, and substrings; `None` when `haystack` cannot contain anything.
fn holds(haystack: &Value, needle: &Value) -> Option<bool> {
	match haystack {
		Value::List(items) => Some(items.iter().any(|item| loosely_equal(item, needle))),
		Value::Map(map) => Some(needle.as_str().is_some_and(|key| map.contains_key(key))),
		Value::String(text) => Some(needle.as_str().is_some_and(|part| text.contains(part))),
		_ => None,
	}
}

/// Accept values equal to `expected`; integers and floats compare numerically.
pub fn equals(expected: impl Into<Value>) -> Predicate {
	let expected = expected.into();
	Predicate::new("equals", move |value| loosely_equal(value, &expected))
}

/// Accept values not equal to `expected`.
pub fn not_equal(expected: impl Into<Value>) -> Predicate {
	let expected = expected.into();
	Predicate::new("not_equal", move |value| !loosely_equal(value, &expected))
}

fn ordered(name: &'static str, bound: Value, accept: fn(Ordering) -> bool) -> Predicate {
	Predicate::new(name, move |value| compare(value, &bound).is_some_and(accept))
}

/// Accept values greater than `bound`.
pub fn gt(bound: impl Into<Value>) -> Predicate {
	ordered("gt", bound.into(), Ordering::is_gt)
}

/// Accept values less than `bound`.
pub fn lt(bound: impl Into<Value>) -> Predicate {
	ordered("lt", bound.into(), Ordering::is_lt)
}

/// Accept values greater than or equal to `bound`.
pub fn gte(bound: impl Into<Value>) -> Predicate {
	ordered("gte", bound.into(), Ordering::is_ge)
}

/// Accept values less than or equal to `bound`.
pub fn lte(bound: impl Into<Value>) -> Predicate {
	ordered("lte", bound.into(), Ordering::is_le)
}

/// Accept containers holding `needle`.
pub fn contains(needle: impl Into<Value>) -> Predicate {
	let needle = needle.into();
	Predicate::new("contains", move |value| holds(value, &needle) == Some(true))
}

/// Accept containers not holding `needle`.
pub fn not_contains(needle: impl Into<Value>) -> Predicate {
	let needle = needle.into();
	Predicate::new("not_contains", move |value| holds(value, &needle) == Some(false))
}

/// Accept values held by `container`.
pub fn contained_in(container: impl Into<Value>) -> Predicate {
	let container = container.into();
	Predicate::new("contained_in", move |value| holds(&container, value) == Some(true))
}

/// Accept values not held by `container`.
pub fn not_contained_in(container: impl Into<Value>) -> Predicate {
	let container = container.into();
	Predicate::new("not_contained_in", move |value| holds(&container, value) == Some(false))
}

/// Accept strings starting with `prefix`.
pub fn str_starts_with(prefix: impl Into<String>) -> Predicate {
	let prefix = prefix.into();
	Predicate::new("str_starts_with", move |value| value.as_str().is_some_and(|text| text.starts_with(prefix.as_str())))
}

/// Accept strings ending with `suffix`.
pub fn str_ends_with(suffix: impl Into<String>) -> Predicate {
	let suffix = suffix.into();
	Predicate::new("str_ends_with", move |value| value.as_str().is_some_and(|text| text.ends_with(suffix.as_str())))
}

/// First non-`Null` value, or `Null`.
pub fn first_of(values: &[Value]) -> Value {
	values.iter().find(|value| !value.is_null()).cloned().unwrap_or_default()
}

/// Up to `n` leading non-`Null` values as a list, or `Null` when there are none.
pub fn first_n_of(values: &[Value], n: usize) -> Value {
	let found: Vec<Value> = values.iter().filter(|value| !value.is_null()).take(n).cloned().collect();
	if found.is_empty() { Value::Null } else { Value::List(found) }
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::tree::{GetOptions, MapError, get};

	fn ints(items: &[i64]) -> Value {
		items.iter().copied().map(Value::Int).collect()
	}

	fn run(apply: &Apply, value: impl Into<Value>) -> Value {
		apply.call(value.into()).expect("op succeeds")
	}

	#[test]
	fn arithmetic_keeps_integers_when_possible() {
		assert_eq!(run(&add(1), 100), Value::Int(101));
		assert_eq!(run(&subtract(1), 100), Value::Int(99));
		assert_eq!(run(&multiply(10), 100), Value::Int(1000));
		assert_eq!(run(&divide(10), 100), Value::Float(10.0));
		assert_eq!(run(&add(0.5), 1), Value::Float(1.5));
	}

	#[test]
	fn add_and_multiply_extend_sequences() {
		assert_eq!(run(&add(ints(&[4])), ints(&[1, 2, 3])), ints(&[1, 2, 3, 4]));
		assert_eq!(run(&multiply(3), ints(&[1, 2])), ints(&[1, 2, 1, 2, 1, 2]));
		assert_eq!(run(&add("!"), "hi"), Value::from("hi!"));
	}

	#[test]
	fn arithmetic_errors() {
		let err = add(1).call(Value::Map(crate::tree::Map::new())).expect_err("add on map");
		assert_eq!(err.to_string(), "add does not accept Map");
		assert!(add(1).call(Value::Int(i64::MAX)).is_err());
		assert_eq!(divide(0).call(Value::Int(1)).expect_err("zero").to_string(), "division by zero");
	}

	#[test]
	fn multiply_refuses_unallocatable_repetitions() {
		for value in [Value::from("ab"), ints(&[1, 2])] {
			let err = multiply(i64::MAX).call(value).expect_err("repetition is too large");
			assert_eq!(err.to_string(), "multiply overflowed");
		}
		assert_eq!(run(&multiply(i64::MAX), ""), Value::from(""));
		assert_eq!(run(&multiply(i64::MAX), ints(&[])), ints(&[]));
		assert_eq!(run(&multiply(-2), "ab"), Value::from(""));
	}

	#[test]
	fn string_ops() {
		assert_eq!(run(&str_replace("S", "Z"), "Some String"), Value::from("Zome Ztring"));
		assert_eq!(run(&str_upper(), "abc"), Value::from("ABC"));
		assert_eq!(run(&str_lower(), "ABC"), Value::from("abc"));
		assert!(str_upper().call(Value::Int(1)).is_err());
	}

	#[test]
	fn keep_and_index_select_from_lists() {
		let value = ints(&[1, 2, 3, 4, 5]);
		assert_eq!(run(&keep(1), value.clone()), ints(&[1]));
		assert_eq!(run(&keep(50), value.clone()), value);
		assert_eq!(run(&index(0), value.clone()), Value::Int(1));
		assert_eq!(run(&index(-1), value.clone()), Value::Int(5));
		assert_eq!(run(&index(-3), value.clone()), Value::Int(3));
		assert_eq!(run(&index(9), value), Value::Null);
		assert_eq!(run(&index(-1), "abc"), Value::from("c"));
	}

	#[test]
	fn list_combinators() {
		let letters: Value = ["a", "b", "c"].into_iter().map(Value::from).collect();
		assert_eq!(run(&map_list(str_upper()), letters.clone()), ["A", "B", "C"].into_iter().map(Value::from).collect::<Value>());
		assert_eq!(run(&filter_list(equals("a")), letters), Value::from(vec![Value::from("a")]));
		assert_eq!(map_list(str_upper()).name(), "map_list(str_upper)");
	}

	#[test]
	fn comparisons() {
		assert!(equals(1).check(&Value::Float(1.0)));
		assert!(not_equal("a").check(&Value::from("b")));
		assert!(gt(3).check(&Value::Int(4)));
		assert!(!gt(3).check(&Value::from("4")));
		assert!(lt(2.5).check(&Value::Int(2)));
		assert!(gte("b").check(&Value::from("b")));
		assert!(lte(0).check(&Value::Int(-1)));
	}

	#[test]
	fn membership() {
		let map = Value::from_json_str(r#"{"a": "b", "c": "d"}"#).expect("json parses");
		assert!(contains("a").check(&map));
		assert!(not_contains("b").check(&map));
		assert!(contained_in(map.clone()).check(&Value::from("a")));
		assert!(not_contained_in(map).check(&Value::from("z")));
		assert!(contains(2).check(&ints(&[1, 2])));
		assert!(!not_contains(1).check(&Value::Int(5)));
		assert!(str_starts_with("So").check(&Value::from("Some")));
		assert!(str_ends_with("me").check(&Value::from("Some")));
		assert!(!str_ends_with("me").check(&Value::Int(1)));
	}

	#[test]
	fn first_of_skips_nulls() {
		let values = [Value::Null, Value::Int(1), Value::Null, Value::Int(2), Value::Int(3)];
		assert_eq!(first_of(&values), Value::Int(1));
		assert_eq!(first_n_of(&values, 2), ints(&[1, 2]));
		assert_eq!(first_of(&[Value::Null]), Value::Null);
		assert_eq!(first_n_of(&[], 3), Value::Null);
	}

	#[test]
	fn ops_plug_into_get() {
		let source = Value::from_json_str(r#"{"n": [3, 8, 1]}"#).expect("json parses");
		let options = GetOptions::default().with_apply(filter_list(gt(2))).with_apply(keep(1));
		assert_eq!(get(&source, "n", &options).expect("get succeeds"), ints(&[3]));

		let options = GetOptions::default().with_apply(str_upper());
		assert!(matches!(get(&source, "n", &options), Err(MapError::Apply { .. })));
	}
}
