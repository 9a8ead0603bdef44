/// Geometry and layout settings for a requirement diagram.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DiagramConfig {
	/// Number of horizontal bands the viewport is split into.
	pub level_count: u32,
	pub node_width: f64,
	pub node_height: f64,
	/// Inset between a band's top edge and the highest allowed node position.
	pub band_margin: f64,
	/// Used when the host cannot report a viewport height.
	pub fallback_viewport_height: f64,
	/// Run the force simulation every frame.
	pub auto_layout: bool,
	pub forces: ForceSettings,
}

impl Default for DiagramConfig {
	fn default() -> Self {
		Self {
			level_count: 4,
			node_width: 150.0,
			node_height: 60.0,
			band_margin: 10.0,
			fallback_viewport_height: 800.0,
			auto_layout: false,
			forces: ForceSettings::default(),
		}
	}
}

impl DiagramConfig {
	pub fn with_auto_layout(self) -> Self {
		Self {
			auto_layout: true,
			..self
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ForceSettings {
	pub charge: f32,
	pub spring: f32,
	pub max_force: f32,
	pub node_speed: f32,
	pub damping: f32,
	pub mass: f32,
}

impl Default for ForceSettings {
	fn default() -> Self {
		Self {
			charge: 3000.0,
			spring: 0.05,
			max_force: 100.0,
			node_speed: 3000.0,
			damping: 0.9,
			mass: 10.0,
		}
	}
}
