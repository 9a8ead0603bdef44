use leptos::prelude::*;

use crate::components::requirement_graph::{DiagramConfig, RequirementGraphCanvas};
use crate::pages::home::requirement_sample;

/// The same hierarchy, with a force simulation spreading nodes inside their bands.
#[component]
pub fn ForceLevels() -> impl IntoView {
	let graph_data = Signal::derive(requirement_sample);

	view! {
		<div class="fullscreen-graph" style="height: 100vh; width: 100vw;">
			<RequirementGraphCanvas
				data=graph_data
				fullscreen=true
				config=DiagramConfig::default().with_auto_layout()
			/>
			<div class="graph-overlay">
				<h1>"Force-Directed Levels"</h1>
				<p class="subtitle">"Requirements repel each other but never leave their level."</p>
			</div>
		</div>
	}
}
