use pathmap_testkit::load_fixture;

use crate::tree::{DropLevel, GetOptions, Map, MapError, Mapper, MapperOptions, Spec, Value, get};

fn obj<const N: usize>(entries: [(&str, Value); N]) -> Value {
	Value::Map(entries.into_iter().collect())
}

fn json(text: &str) -> Value {
	Value::from_json_str(text).expect("json parses")
}

fn simple() -> Value {
	Value::from(load_fixture("simple.json"))
}

fn constant(tree: Value) -> Mapper {
	Mapper::new(move |_, _| Ok(tree.clone()))
}

#[test]
fn drop_markers_remove_their_containers() {
	let mapper = Mapper::new(|source, _| {
		Ok(obj([
			(
				"CASE_parent_keep",
				obj([
					("CASE_curr_drop", obj([("a", DropLevel::ThisObject.into()), ("b", "someValue".into())])),
					("CASE_curr_keep", obj([("id", get(source, "data.patient.id", &GetOptions::default())?)])),
				]),
			),
			("CASE_list", vec![Value::from(DropLevel::ThisObject)].into()),
			(
				"CASE_list_of_objects",
				vec![
					obj([("a", DropLevel::Parent.into()), ("b", "someValue".into())]),
					obj([("a", "someValue".into()), ("b", "someValue".into())]),
				]
				.into(),
			),
		]))
	});
	let out = mapper.call(&simple()).expect("mapping succeeds");
	assert_eq!(out, json(r#"{"CASE_parent_keep": {"CASE_curr_keep": {"id": "abc123"}}}"#));
}

#[test]
fn drop_above_the_root_fails() {
	let mapper = constant(obj([("parent", obj([("CASE_no_grandparent", DropLevel::GreatGrandparent.into())]))]));
	assert!(matches!(mapper.call(&json("{}")), Err(MapError::DropOutOfBounds { .. })));
}

#[test]
fn drop_reaching_the_root_empties_the_result() {
	let mapper = constant(obj([
		("parent", obj([("CASE_has_parent_object", DropLevel::Parent.into())])),
		("other_data", Value::Int(123)),
	]));
	assert_eq!(mapper.call(&json("{}")).expect("mapping succeeds"), json("{}"));
}

#[test]
fn repeated_drops_in_lists() {
	let mapper = constant(obj([
		("dropped_direct", vec![Value::from(DropLevel::ThisObject), Value::from(DropLevel::ThisObject)].into()),
		(
			"also_dropped",
			vec![obj([("parent_key", DropLevel::Parent.into())]), Value::from(DropLevel::ThisObject)].into(),
		),
		(
			"partially_dropped",
			vec![
				Value::from("first_kept"),
				obj([("second_dropped", DropLevel::ThisObject.into())]),
				Value::from("third_kept"),
				obj([("fourth_dropped", DropLevel::ThisObject.into())]),
			]
			.into(),
		),
	]));
	assert_eq!(
		mapper.call(&json("{}")).expect("mapping succeeds"),
		json(r#"{"partially_dropped": ["first_kept", "third_kept"]}"#)
	);
}

#[test]
fn dropped_wrapper_takes_its_siblings() {
	let mapper = constant(obj([("wrapper", obj([("a", DropLevel::ThisObject.into()), ("b", "keep".into())]))]));
	assert_eq!(mapper.call(&json("{}")).expect("mapping succeeds"), json("{}"));
}

#[test]
fn keep_markers_survive_pruning() {
	let mapper = constant(obj([
		("kept", Value::keep(Vec::<Value>::new())),
		("dropped", Vec::<Value>::new().into()),
		("nested", Value::keep(obj([("inner", Value::keep("x")), ("empty", Value::Null)]))),
	]));
	assert_eq!(
		mapper.call(&json("{}")).expect("mapping succeeds"),
		json(r#"{"kept": [], "nested": {"inner": "x", "empty": null}}"#)
	);
}

#[test]
fn remove_empty_can_be_disabled() {
	let mapper = constant(obj([("a", obj([("b", DropLevel::ThisObject.into())])), ("c", Value::Null)]))
		.with_options(MapperOptions { remove_empty: false });
	assert_eq!(mapper.call(&json("{}")).expect("mapping succeeds"), json(r#"{"a": null, "c": null}"#));
	assert!(MapperOptions::default().remove_empty);
}

#[test]
fn list_results_are_accepted() {
	let mapper = constant(vec![obj([("a", DropLevel::ThisObject.into())]), Value::from("x")].into());
	assert_eq!(mapper.call(&json("{}")).expect("mapping succeeds"), json(r#"["x"]"#));
}

#[test]
fn non_container_results_are_rejected() {
	let mapper = constant(Value::Int(3)).named("scalar");
	match mapper.call(&json("{}")).expect_err("scalar result") {
		MapError::MappingNotContainer { mapping, got } => {
			assert_eq!(mapping, "scalar");
			assert_eq!(got, "Int");
		}
		other => panic!("unexpected error: {other:?}"),
	}
}

#[test]
fn callable_failures_are_wrapped() {
	let mapper = Mapper::new(|_, _| Err("bad input".into())).named("failing");
	match mapper.call(&json("{}")).expect_err("callable fails") {
		MapError::MappingFailed { mapping, source } => {
			assert_eq!(mapping, "failing");
			assert_eq!(source.to_string(), "bad input");
		}
		other => panic!("unexpected error: {other:?}"),
	}
}

#[test]
fn keyword_arguments_reach_the_callable() {
	let mapper = Mapper::new(|source, kwargs| {
		Ok(obj([
			("id", get(source, "data.patient.id", &GetOptions::default())?),
			("tag", kwargs.get("tag").cloned().unwrap_or_default()),
		]))
	});
	let kwargs: Map = [("tag", "urgent")].into_iter().collect();
	assert_eq!(
		mapper.call_with(&simple(), &kwargs).expect("mapping succeeds"),
		json(r#"{"id": "abc123", "tag": "urgent"}"#)
	);
	assert_eq!(mapper.call(&simple()).expect("mapping succeeds"), json(r#"{"id": "abc123"}"#));
}

#[test]
fn spec_mappers_run_the_same_pipeline() {
	let spec = Spec::map([
		Spec::entry(
			"active_patient",
			Spec::map([
				Spec::entry("id", Spec::get("list_data[1].patient.id").expect("path parses")),
				Spec::entry(
					"active",
					Spec::get_with(
						"list_data[1].patient.active",
						GetOptions::default()
							.with_only_if(crate::tree::ops::equals(true))
							.with_drop_level(DropLevel::ThisObject),
					)
					.expect("path parses"),
				),
			]),
		),
		Spec::entry("first", Spec::get("list_data[0].patient.id").expect("path parses")),
		Spec::entry("missing", Spec::get("list_data[7]").expect("path parses")),
	]);
	let mapper = Mapper::from_spec(spec);
	assert_eq!(mapper.name(), "spec");
	assert_eq!(mapper.call(&simple()).expect("mapping succeeds"), json(r#"{"first": "def456"}"#));
}

#[test]
fn spec_errors_are_not_rewrapped() {
	let spec = Spec::map([Spec::group(["a", "b"], Spec::lit(1))]);
	assert!(matches!(Mapper::from_spec(spec).call(&Value::Null), Err(MapError::GroupArity { .. })));
}

#[test]
fn source_is_untouched_and_calls_are_repeatable() {
	let source = simple();
	let before = source.clone();
	let mapper = Mapper::new(|source, _| Ok(obj([("copy", source.clone()), ("gone", DropLevel::ThisObject.into())])));
	let first = mapper.call(&source).expect("mapping succeeds");
	let second = mapper.call(&source).expect("mapping succeeds");
	assert_eq!(first, json("{}"));
	assert_eq!(first, second);
	assert_eq!(source, before);
}

#[test]
fn mappers_are_shareable() {
	fn assert_send_sync<T: Send + Sync>() {}
	assert_send_sync::<Mapper>();
}
