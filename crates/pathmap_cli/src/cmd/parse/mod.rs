use pathmap::tree::{Path, Result, Segment};

use crate::cmd::util::emit_json;

#[derive(clap::Args)]
pub struct Args {
	pub path: String,
	#[arg(long)]
	pub json: bool,
}

/// Parse a path expression and print its segments.
pub fn run(args: Args) -> Result<()> {
	let path = Path::parse(&args.path)?;

	if args.json {
		return emit_json(&path_json(&path));
	}

	println!("path: {path}");
	println!("segments: {}", path.segments.len());
	println!("idx\tkind\tvalue");
	for (idx, segment) in path.segments.iter().enumerate() {
		let (kind, value) = segment_row(segment);
		println!("{idx}\t{kind}\t{value}");
	}
	Ok(())
}

fn segment_row(segment: &Segment) -> (&'static str, String) {
	match segment {
		Segment::Field(name) => ("field", name.clone()),
		Segment::Index(index) => ("index", index.to_string()),
		Segment::Wildcard => ("wildcard", "*".to_owned()),
		Segment::TupleGroup(members) => (
			"group",
			members.iter().map(ToString::to_string).collect::<Vec<_>>().join(", "),
		),
	}
}

fn path_json(path: &Path) -> PathJson {
	PathJson {
		path: path.to_string(),
		segments: path.segments.iter().map(segment_json).collect(),
	}
}

fn segment_json(segment: &Segment) -> SegmentJson {
	match segment {
		Segment::Field(name) => SegmentJson::Field { name: name.clone() },
		Segment::Index(index) => SegmentJson::Index { index: *index },
		Segment::Wildcard => SegmentJson::Wildcard,
		Segment::TupleGroup(members) => SegmentJson::Group {
			members: members.iter().map(path_json).collect(),
		},
	}
}

#[derive(serde::Serialize)]
struct PathJson {
	path: String,
	segments: Vec<SegmentJson>,
}

#[derive(serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum SegmentJson {
	Field { name: String },
	Index { index: i64 },
	Wildcard,
	Group { members: Vec<PathJson> },
}
