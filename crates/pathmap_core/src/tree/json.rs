use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::tree::{DropLevel, Map, Result, Sentinel, Value};

const DROP_TAG: &str = "$drop";
const KEEP_TAG: &str = "$keep";

impl From<serde_json::Value> for Value {
	fn from(value: serde_json::Value) -> Self {
		match value {
			serde_json::Value::Null => Self::Null,
			serde_json::Value::Bool(item) => Self::Bool(item),
			serde_json::Value::Number(number) => match number.as_i64() {
				Some(item) => Self::Int(item),
				None => number.as_f64().map_or(Self::Null, Self::Float),
			},
			serde_json::Value::String(item) => Self::String(item),
			serde_json::Value::Array(items) => Self::List(items.into_iter().map(Self::from).collect()),
			serde_json::Value::Object(object) => Self::Map(object.into_iter().map(|(key, item)| (key, Self::from(item))).collect()),
		}
	}
}

impl Value {
	/// Parse JSON text into a tree.
	pub fn from_json_str(text: &str) -> Result<Self> {
		let parsed: serde_json::Value = serde_json::from_str(text)?;
		Ok(Self::from(parsed))
	}

	/// Convert into a `serde_json` value; sentinels become tagged objects.
	pub fn to_json(&self) -> serde_json::Value {
		match self {
			Self::Null => serde_json::Value::Null,
			Self::Bool(item) => serde_json::Value::Bool(*item),
			Self::Int(item) => serde_json::Value::from(*item),
			Self::Float(item) => serde_json::Number::from_f64(*item).map_or(serde_json::Value::Null, serde_json::Value::Number),
			Self::String(item) => serde_json::Value::String(item.clone()),
			Self::List(items) => serde_json::Value::Array(items.iter().map(Self::to_json).collect()),
			Self::Map(map) => serde_json::Value::Object(map.iter().map(|(key, item)| (key.to_owned(), item.to_json())).collect()),
			Self::Sentinel(Sentinel::Drop(level)) => tagged(DROP_TAG, serde_json::Value::from(level.as_str())),
			Self::Sentinel(Sentinel::Keep(inner)) => tagged(KEEP_TAG, inner.to_json()),
		}
	}
}

fn tagged(tag: &str, inner: serde_json::Value) -> serde_json::Value {
	serde_json::Value::Object([(tag.to_owned(), inner)].into_iter().collect())
}

impl Serialize for Value {
	fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
		match self {
			Self::Null => serializer.serialize_unit(),
			Self::Bool(item) => serializer.serialize_bool(*item),
			Self::Int(item) => serializer.serialize_i64(*item),
			Self::Float(item) if item.is_finite() => serializer.serialize_f64(*item),
			Self::Float(_) => serializer.serialize_unit(),
			Self::String(item) => serializer.serialize_str(item),
			Self::List(items) => {
				let mut seq = serializer.serialize_seq(Some(items.len()))?;
				for item in items {
					seq.serialize_element(item)?;
				}
				seq.end()
			}
			Self::Map(map) => map.serialize(serializer),
			Self::Sentinel(Sentinel::Drop(level)) => {
				let mut out = serializer.serialize_map(Some(1))?;
				out.serialize_entry(DROP_TAG, level.as_str())?;
				out.end()
			}
			Self::Sentinel(Sentinel::Keep(inner)) => {
				let mut out = serializer.serialize_map(Some(1))?;
				out.serialize_entry(KEEP_TAG, inner.as_ref())?;
				out.end()
			}
		}
	}
}

impl Serialize for Map {
	fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
		let mut out = serializer.serialize_map(Some(self.len()))?;
		for (key, item) in self.iter() {
			out.serialize_entry(key, item)?;
		}
		out.end()
	}
}

impl Serialize for DropLevel {
	fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
		serializer.serialize_str(self.as_str())
	}
}
