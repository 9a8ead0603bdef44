#[derive(Clone, Debug, PartialEq)]
pub struct GraphNode {
	pub id: String,
	pub label: String,
	/// Hierarchy rank, 1 is the topmost level.
	pub level: u32,
	pub x: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GraphLink {
	/// Distinguishes parallel links between the same pair of nodes.
	pub id: String,
	pub source: String,
	pub target: String,
	pub label: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphData {
	pub nodes: Vec<GraphNode>,
	pub links: Vec<GraphLink>,
}

impl GraphData {
	/// Adds one link from `source` to each of `targets`, all carrying `label`.
	///
	/// Link ids are `{source}-{target}-{index}`, so repeating a target yields
	/// separate links rather than collapsing them.
	pub fn link_all(&mut self, source: &str, targets: &[&str], label: Option<&str>) {
		for (index, target) in targets.iter().enumerate() {
			self.links.push(GraphLink {
				id: format!("{source}-{target}-{index}"),
				source: source.to_string(),
				target: target.to_string(),
				label: label.map(str::to_string),
			});
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;

	#[test]
	fn parallel_links_get_distinct_ids() {
		let mut data = GraphData::default();
		data.link_all("A", &["B", "B", "C"], Some("satisfy"));

		let ids: Vec<&str> = data.links.iter().map(|l| l.id.as_str()).collect();
		assert_eq!(ids, vec!["A-B-0", "A-B-1", "A-C-2"]);
		assert!(data.links.iter().all(|l| l.source == "A"));
		assert_eq!(data.links[2].label.as_deref(), Some("satisfy"));
	}

	#[test]
	fn unlabelled_links() {
		let mut data = GraphData::default();
		data.link_all("D", &["B"], None);
		assert_eq!(data.links[0].id, "D-B-0");
		assert_eq!(data.links[0].label, None);
	}
}
