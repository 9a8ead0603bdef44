/// Which node, if any, the details panel is showing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Selection {
	#[default]
	Unselected,
	Selected(String),
}

impl Selection {
	/// Activating a node replaces any previous selection. Activating the
	/// node that is already selected leaves it selected.
	pub fn activate(&mut self, id: &str) {
		if self.selected() != Some(id) {
			*self = Selection::Selected(id.to_string());
		}
	}

	pub fn dismiss(&mut self) {
		*self = Selection::Unselected;
	}

	pub fn selected(&self) -> Option<&str> {
		match self {
			Selection::Unselected => None,
			Selection::Selected(id) => Some(id),
		}
	}

	pub fn is_selected(&self, id: &str) -> bool {
		self.selected() == Some(id)
	}
}

/// Attributes surfaced by the details panel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeDetails {
	pub id: String,
	pub label: String,
	pub level: u32,
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;

	#[test]
	fn starts_unselected() {
		assert_eq!(Selection::default(), Selection::Unselected);
		assert_eq!(Selection::default().selected(), None);
	}

	#[test]
	fn activating_another_node_replaces() {
		let mut selection = Selection::default();
		selection.activate("2.1");
		selection.activate("3.4");

		assert_eq!(selection, Selection::Selected("3.4".into()));
		assert!(!selection.is_selected("2.1"));
	}

	#[test]
	fn reactivating_does_not_toggle_off() {
		let mut selection = Selection::default();
		selection.activate("2.1");
		selection.activate("2.1");

		assert_eq!(selection.selected(), Some("2.1"));
	}

	#[test]
	fn dismiss_clears() {
		let mut selection = Selection::Selected("1.2".into());
		selection.dismiss();
		assert_eq!(selection, Selection::Unselected);

		selection.dismiss();
		assert_eq!(selection, Selection::Unselected);
	}
}
