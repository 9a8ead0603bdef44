use leptos::prelude::*;

use crate::components::requirement_graph::{
	DiagramConfig, GraphData, GraphNode, RequirementGraphCanvas,
};

/// A linked object and the row it occupies in the hierarchy, 1 at the top.
#[derive(Clone, Copy, Debug)]
pub struct ObjectRecord {
	pub id: &'static str,
	pub name: &'static str,
	pub level: u32,
	pub links: &'static [&'static str],
}

/// Rows are chosen so most links point upward.
pub const OBJECTS: [ObjectRecord; 4] = [
	ObjectRecord {
		id: "A",
		name: "Object A",
		level: 3,
		links: &["B", "C"],
	},
	ObjectRecord {
		id: "B",
		name: "Object B",
		level: 2,
		links: &["A", "D"],
	},
	ObjectRecord {
		id: "C",
		name: "Object C",
		level: 2,
		links: &["A"],
	},
	ObjectRecord {
		id: "D",
		name: "Object D",
		level: 1,
		links: &["B"],
	},
];

const OBJECT_LEVELS: u32 = 3;
const FIRST_X: f64 = 100.0;
const X_STEP: f64 = 250.0;
const CANVAS_HEIGHT: f64 = 500.0;

/// Lays the objects out row by row, left to right in declaration order.
pub fn object_graph(objects: &[ObjectRecord]) -> GraphData {
	let mut data = GraphData::default();
	for (i, object) in objects.iter().enumerate() {
		let column = objects[..i].iter().filter(|o| o.level == object.level).count();
		data.nodes.push(GraphNode {
			id: object.id.to_string(),
			label: object.name.to_string(),
			level: object.level,
			x: FIRST_X + X_STEP * column as f64,
		});
	}
	for object in objects {
		data.link_all(object.id, object.links, None);
	}
	data
}

/// Linked objects drawn bottom-up in a fixed-height panel.
#[component]
pub fn Objects() -> impl IntoView {
	let graph_data = Signal::derive(|| object_graph(&OBJECTS));
	let config = DiagramConfig {
		level_count: OBJECT_LEVELS,
		..DiagramConfig::default()
	};

	view! {
		<div style="padding: 1rem;">
			<h1>"Linked Objects"</h1>
			<div style="height: 500px; border: 1px solid #ccc; background-color: #f0f8ff;">
				<RequirementGraphCanvas data=graph_data height=Some(CANVAS_HEIGHT) config=config />
			</div>
		</div>
	}
}
