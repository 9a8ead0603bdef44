use std::collections::HashMap;

use force_graph::{EdgeData, ForceGraph, NodeData, SimulationParameters};
use log::debug;

use super::bands::LevelBands;
use super::config::ForceSettings;
use super::state::DiagramNode;
use super::types::GraphLink;

/// Force-directed simulation mirroring the diagram nodes.
///
/// Simulation nodes carry the index of their diagram node and are placed at
/// card centers. Pinned diagram nodes, and nodes whose level has no band,
/// become simulation anchors.
pub struct ForceLayout {
	graph: ForceGraph<usize, ()>,
	half_width: f64,
	half_height: f64,
}

impl ForceLayout {
	pub fn new(
		nodes: &[DiagramNode],
		links: &[GraphLink],
		forces: &ForceSettings,
		node_width: f64,
		node_height: f64,
	) -> Self {
		let mut graph = ForceGraph::new(SimulationParameters {
			force_charge: forces.charge,
			force_spring: forces.spring,
			force_max: forces.max_force,
			node_speed: forces.node_speed,
			damping_factor: forces.damping,
		});
		let (half_width, half_height) = (node_width / 2.0, node_height / 2.0);
		let mut id_to_idx = HashMap::new();

		for (i, node) in nodes.iter().enumerate() {
			let idx = graph.add_node(NodeData {
				x: (node.x + half_width) as f32,
				y: (node.y + half_height) as f32,
				mass: forces.mass,
				is_anchor: node.pinned,
				user_data: i,
			});
			id_to_idx.insert(node.id.as_str(), idx);
		}

		for link in links {
			match (id_to_idx.get(link.source.as_str()), id_to_idx.get(link.target.as_str())) {
				(Some(&src), Some(&tgt)) => {
					graph.add_edge(src, tgt, EdgeData::default());
				}
				_ => debug!("layout skips link {} with unknown endpoint", link.id),
			}
		}

		Self {
			graph,
			half_width,
			half_height,
		}
	}

	/// Advances the simulation by `dt` seconds and writes positions back to
	/// every node that is neither pinned nor outside the configured bands.
	pub fn step(&mut self, nodes: &mut [DiagramNode], bands: &LevelBands, dt: f32) {
		let (hw, hh) = (self.half_width, self.half_height);
		let anchored = |node: &DiagramNode| node.pinned || bands.get(node.level).is_none();

		// Nodes may have been dragged or clamped since the last step.
		self.graph.visit_nodes_mut(|sim| {
			if let Some(node) = nodes.get(sim.data.user_data) {
				sim.data.x = (node.x + hw) as f32;
				sim.data.y = (node.y + hh) as f32;
				sim.data.is_anchor = anchored(node);
			}
		});

		self.graph.update(dt);

		self.graph.visit_nodes(|sim| {
			if let Some(node) = nodes.get_mut(sim.data.user_data) {
				if !anchored(node) {
					node.x = sim.x() as f64 - hw;
					node.y = sim.y() as f64 - hh;
				}
			}
		});
	}
}
