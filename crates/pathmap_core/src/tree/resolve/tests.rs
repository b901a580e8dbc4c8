use pathmap_testkit::load_fixture;

use crate::tree::{Apply, DropLevel, GetOptions, MapError, Path, Predicate, Value, get, resolve};

fn simple() -> Value {
	Value::from(load_fixture("simple.json"))
}

fn nested() -> Value {
	Value::from(load_fixture("nested.json"))
}

fn ints(items: &[i64]) -> Value {
	items.iter().copied().map(Value::Int).collect()
}

fn plain(source: &Value, path: &str) -> Value {
	get(source, path, &GetOptions::default()).expect("get succeeds")
}

fn upper() -> Apply {
	Apply::new("upper", |value| match value {
		Value::String(text) => Ok(Value::String(text.to_uppercase())),
		other => Err(format!("expected string, got {}", other.kind()).into()),
	})
}

#[test]
fn resolves_fields_and_indices() {
	let source = simple();
	assert_eq!(plain(&source, "data.patient.id"), Value::from("abc123"));
	assert_eq!(plain(&source, "list_data[0].patient.id"), Value::from("def456"));
	assert_eq!(plain(&source, "list_data[-1].patient.id"), Value::from("ghi789"));
}

#[test]
fn misses_resolve_to_null() {
	let source = simple();
	assert_eq!(plain(&source, "list_data[5].patient"), Value::Null);
	assert_eq!(plain(&source, "list_data[-3].patient"), Value::Null);
	assert_eq!(plain(&source, "data.missing.id"), Value::Null);
	assert_eq!(plain(&source, "data.patient.id.deeper"), Value::Null);
	assert_eq!(plain(&source, "data[0]"), Value::Null);
}

#[test]
fn wildcard_on_non_list_is_null() {
	let source = simple();
	assert_eq!(plain(&source, "data.patient.id[*]"), Value::Null);
	assert_eq!(plain(&source, "data[*].patient"), Value::Null);
}

#[test]
fn fan_out_keeps_one_entry_per_element() {
	let source = nested();
	let result = plain(&source, "data[*].patient.ints");
	let items = result.as_list().expect("list result");
	assert_eq!(items.len(), 4);
	assert_eq!(items[0], ints(&[1, 2, 3]));
	assert_eq!(items[3], Value::Null);

	assert_eq!(
		plain(&source, "data[*].patient.dict.inner.msg"),
		Value::from(vec![Value::from("A!"), Value::from("B!"), Value::from("C!"), Value::from("D!")])
	);
}

#[test]
fn trailing_wildcard_flattens_one_level() {
	let source = nested();
	assert_eq!(plain(&source, "data[*].patient.ints[*]"), ints(&[1, 2, 3, 4, 5, 6, 7, 8, 9]));
	assert_eq!(plain(&source, "data[*].patient.dicts[*].num[*]"), ints(&[1, 2, 3, 4, 5, 6, 7]));
}

#[test]
fn explicit_flatten_matches_trailing_wildcard() {
	let source = nested();
	let flattened = get(&source, "data[*].patient.ints", &GetOptions::default().flattened()).expect("get succeeds");
	assert_eq!(flattened, plain(&source, "data[*].patient.ints[*]"));
}

#[test]
fn flatten_is_not_recursive() {
	let source = Value::from_json_str(r#"{"a": [[[1], [2]], [[3]], 4, null]}"#).expect("json parses");
	assert_eq!(plain(&source, "a[*]"), Value::from(vec![ints(&[1]), ints(&[2]), ints(&[3]), Value::Int(4)]));
}

#[test]
fn default_is_applied_once_at_the_top() {
	let source = nested();
	let options = GetOptions::default().with_default("n/a");
	let result = get(&source, "data[*].patient.ints", &options).expect("get succeeds");
	assert_eq!(result.as_list().expect("list result")[3], Value::Null);

	assert_eq!(get(&source, "data[9].patient", &options).expect("get succeeds"), Value::from("n/a"));
}

#[test]
fn default_is_substituted_before_apply() {
	let source = simple();
	let options = GetOptions::default().with_default("n/a").with_apply(upper());
	assert_eq!(get(&source, "data.patient.missing", &options).expect("get succeeds"), Value::from("N/A"));
	assert_eq!(get(&source, "data.patient.id", &options).expect("get succeeds"), Value::from("ABC123"));
}

#[test]
fn tuple_groups_collect_members_in_order() {
	let source = nested();
	let options = GetOptions::default().with_default("n/a");
	assert_eq!(
		get(&source, "data[0].patient.(id, dict.char, missing)", &options).expect("get succeeds"),
		Value::from(vec![Value::from("abc123"), Value::from("a"), Value::from("n/a")])
	);
}

#[test]
fn tuple_groups_fan_out_per_element() {
	let source = nested();
	let result = plain(&source, "data[*].patient.(id, active)");
	let rows = result.as_list().expect("list result");
	assert_eq!(rows.len(), 4);
	assert_eq!(rows[1], Value::from(vec![Value::from("def456"), Value::Bool(false)]));
}

#[test]
fn only_if_failure_yields_null() {
	let source = simple();
	let is_true = Predicate::new("is_true", |value| *value == Value::Bool(true));
	let options = GetOptions::default().with_only_if(is_true);
	assert_eq!(get(&source, "data.patient.active", &options).expect("get succeeds"), Value::Bool(true));
	assert_eq!(get(&source, "list_data[1].patient.active", &options).expect("get succeeds"), Value::Null);
}

#[test]
fn only_if_failure_is_not_re_defaulted() {
	let source = simple();
	let never = Predicate::new("never", |_| false);
	let options = GetOptions::default().with_default("fallback").with_only_if(never);
	assert_eq!(get(&source, "data.patient.id", &options).expect("get succeeds"), Value::Null);
}

#[test]
fn drop_level_replaces_final_null() {
	let source = simple();
	let options = GetOptions::default().with_drop_level(DropLevel::Parent);
	assert_eq!(
		get(&source, "data.patient.missing", &options).expect("get succeeds"),
		Value::drop_marker(DropLevel::Parent)
	);
	assert_eq!(get(&source, "data.patient.id", &options).expect("get succeeds"), Value::from("abc123"));
}

#[test]
fn apply_chain_stops_at_null() {
	let source = simple();
	let to_null = Apply::new("to_null", |_| Ok(Value::Null));
	let options = GetOptions::default().with_apply(to_null).with_apply(upper());
	assert_eq!(get(&source, "data.patient.active", &options).expect("get succeeds"), Value::Null);
}

#[test]
fn apply_errors_name_path_and_function() {
	let source = simple();
	let options = GetOptions::default().with_apply(upper());
	match get(&source, "data.patient.active", &options).expect_err("upper on bool should fail") {
		MapError::Apply { path, function, source } => {
			assert_eq!(path, "data.patient.active");
			assert_eq!(function, "upper");
			assert_eq!(source.to_string(), "expected string, got Bool");
		}
		other => panic!("unexpected error: {other:?}"),
	}
}

#[test]
fn malformed_paths_are_reported() {
	let source = simple();
	assert!(matches!(get(&source, "data..id", &GetOptions::default()), Err(MapError::InvalidPath { .. })));
}

#[test]
fn resolve_skips_options() {
	let source = simple();
	let path = Path::parse("list_data[1].patient.id").expect("path parses");
	assert_eq!(resolve(&source, &path), Value::from("ghi789"));
}
