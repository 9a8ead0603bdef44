use leptos::prelude::*;

use crate::components::requirement_graph::{GraphData, GraphNode, RequirementGraphCanvas};

/// Requirements per level as `(level, count, first x, x step)`.
const LEVELS: [(u32, usize, f64, f64); 4] = [
	(1, 2, 300.0, 300.0),
	(2, 3, 150.0, 300.0),
	(3, 8, 100.0, 150.0),
	(4, 12, 50.0, 100.0),
];

/// Each lower-level requirement and the higher-level ones it satisfies.
const SATISFIES: &[(&str, &[&str])] = &[
	("2.1", &["1.1"]),
	("2.2", &["1.1", "1.2"]),
	("2.3", &["1.2"]),
	("3.1", &["2.1"]),
	("3.2", &["2.1"]),
	("3.3", &["2.2"]),
	("3.4", &["2.2"]),
	("3.5", &["2.3"]),
	("3.6", &["2.3"]),
	("3.7", &["2.1"]),
	("3.8", &["2.3"]),
	("4.1", &["3.1"]),
	("4.2", &["3.1"]),
	("4.3", &["3.2"]),
	("4.4", &["3.2"]),
	("4.5", &["3.3"]),
	("4.6", &["3.3"]),
	("4.7", &["3.4"]),
	("4.8", &["3.4"]),
	("4.9", &["3.5"]),
	("4.10", &["3.5"]),
	("4.11", &["3.6"]),
	("4.12", &["3.6"]),
];

/// The sample requirement hierarchy shown on every page.
pub fn requirement_sample() -> GraphData {
	let nodes = LEVELS
		.iter()
		.flat_map(|&(level, count, first_x, step)| {
			(0..count).map(move |i| {
				let id = format!("{}.{}", level, i + 1);
				GraphNode {
					label: format!("Req {id}"),
					id,
					level,
					x: first_x + step * i as f64,
				}
			})
		})
		.collect();

	let mut data = GraphData {
		nodes,
		links: Vec::new(),
	};
	for (source, targets) in SATISFIES {
		data.link_all(source, targets, Some("satisfy"));
	}
	data
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let graph_data = Signal::derive(requirement_sample);

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="fullscreen-graph" style="height: 100vh; width: 100vw;">
				<RequirementGraphCanvas data=graph_data fullscreen=true />
				<div class="graph-overlay">
					<h1>"Requirement Levels"</h1>
					<p class="subtitle">
						"Click a requirement for details. Drag to move it within its level. Scroll to zoom."
					</p>
				</div>
			</div>
		</ErrorBoundary>
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;
	use std::collections::{HashMap, HashSet};

	#[test]
	fn sample_has_every_requirement_once() {
		let data = requirement_sample();
		assert_eq!(data.nodes.len(), 24);

		let ids: HashSet<&str> = data.nodes.iter().map(|n| n.id.as_str()).collect();
		assert_eq!(ids.len(), 24);
		assert!(ids.contains("4.12"));

		let third = data.nodes.iter().find(|n| n.id == "3.1").unwrap();
		assert_eq!((third.label.as_str(), third.level, third.x), ("Req 3.1", 3, 100.0));
		let last = data.nodes.iter().find(|n| n.id == "4.12").unwrap();
		assert_eq!(last.x, 1150.0);
	}

	#[test]
	fn links_satisfy_the_next_level_up() {
		let data = requirement_sample();
		let levels: HashMap<&str, u32> = data.nodes.iter().map(|n| (n.id.as_str(), n.level)).collect();

		assert_eq!(data.links.len(), 24);
		for link in &data.links {
			assert_eq!(levels[link.source.as_str()], levels[link.target.as_str()] + 1);
			assert_eq!(link.label.as_deref(), Some("satisfy"));
		}
		let ids: HashSet<&str> = data.links.iter().map(|l| l.id.as_str()).collect();
		assert_eq!(ids.len(), data.links.len());
	}
}
