//! Theme-dependent colors.
//!
//! Geometry never depends on the theme; everything here is presentation.

pub const FALLBACK_MINIMAP: &str = "#888";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Theme {
	#[default]
	Light,
	Dark,
}

/// The four named requirement levels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tier {
	System,
	Subsystem,
	Component,
	Implementation,
}

impl Tier {
	pub const ALL: [Tier; 4] = [
		Tier::System,
		Tier::Subsystem,
		Tier::Component,
		Tier::Implementation,
	];

	pub fn from_level(level: u32) -> Option<Self> {
		match level {
			1 => Some(Tier::System),
			2 => Some(Tier::Subsystem),
			3 => Some(Tier::Component),
			4 => Some(Tier::Implementation),
			_ => None,
		}
	}

	pub fn level(self) -> u32 {
		match self {
			Tier::System => 1,
			Tier::Subsystem => 2,
			Tier::Component => 3,
			Tier::Implementation => 4,
		}
	}

	/// Legend caption.
	pub fn caption(self) -> &'static str {
		match self {
			Tier::System => "Level 1 (System)",
			Tier::Subsystem => "Level 2 (Sub-system)",
			Tier::Component => "Level 3 (Component)",
			Tier::Implementation => "Level 4 (Implementation)",
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette {
	pub fill: &'static str,
	pub accent: &'static str,
	pub text: &'static str,
	pub minimap: &'static str,
	pub legend_fill: &'static str,
	pub legend_border: &'static str,
}

pub fn palette(theme: Theme, tier: Tier) -> Palette {
	match (theme, tier) {
		(Theme::Light, Tier::System) => Palette {
			fill: "#dbeafe",
			accent: "#3b82f6",
			text: "#1e40af",
			minimap: "#bae6fd",
			legend_fill: "#dbeafe",
			legend_border: "#3b82f6",
		},
		(Theme::Light, Tier::Subsystem) => Palette {
			fill: "#bfdbfe",
			accent: "#3b82f6",
			text: "#1e40af",
			minimap: "#7dd3fc",
			legend_fill: "#dcfce7",
			legend_border: "#22c55e",
		},
		(Theme::Light, Tier::Component) => Palette {
			fill: "#93c5fd",
			accent: "#3b82f6",
			text: "#1e40af",
			minimap: "#38bdf8",
			legend_fill: "#dbeafe",
			legend_border: "#3b82f6",
		},
		(Theme::Light, Tier::Implementation) => Palette {
			fill: "#ffedd5",
			accent: "#f97316",
			text: "#9a3412",
			minimap: "#fdba74",
			legend_fill: "#ffedd5",
			legend_border: "#f97316",
		},
		(Theme::Dark, Tier::System) => Palette {
			fill: "#1e3a8a",
			accent: "#60a5fa",
			text: "#dbeafe",
			minimap: "#1e40af",
			legend_fill: "#1e3a8a",
			legend_border: "#60a5fa",
		},
		(Theme::Dark, Tier::Subsystem) => Palette {
			fill: "#1e40af",
			accent: "#60a5fa",
			text: "#dbeafe",
			minimap: "#1e3a8a",
			legend_fill: "#1e40af",
			legend_border: "#60a5fa",
		},
		(Theme::Dark, Tier::Component) => Palette {
			fill: "#1d4ed8",
			accent: "#60a5fa",
			text: "#dbeafe",
			minimap: "#1e293b",
			legend_fill: "#1d4ed8",
			legend_border: "#60a5fa",
		},
		(Theme::Dark, Tier::Implementation) => Palette {
			fill: "#7c2d12",
			accent: "#fb923c",
			text: "#ffedd5",
			minimap: "#7c2d12",
			legend_fill: "#7c2d12",
			legend_border: "#fb923c",
		},
	}
}

/// Palette for levels outside the named tiers.
pub fn fallback_palette(theme: Theme) -> Palette {
	match theme {
		Theme::Light => Palette {
			fill: "#f3f4f6",
			accent: "#9ca3af",
			text: "#374151",
			minimap: FALLBACK_MINIMAP,
			legend_fill: "#f3f4f6",
			legend_border: "#9ca3af",
		},
		Theme::Dark => Palette {
			fill: "#374151",
			accent: "#9ca3af",
			text: "#f3f4f6",
			minimap: FALLBACK_MINIMAP,
			legend_fill: "#374151",
			legend_border: "#9ca3af",
		},
	}
}

pub fn palette_for_level(theme: Theme, level: u32) -> Palette {
	Tier::from_level(level)
		.map(|tier| palette(theme, tier))
		.unwrap_or_else(|| fallback_palette(theme))
}

impl Theme {
	pub fn toggled(self) -> Self {
		match self {
			Theme::Light => Theme::Dark,
			Theme::Dark => Theme::Light,
		}
	}

	pub fn name(self) -> &'static str {
		match self {
			Theme::Light => "light",
			Theme::Dark => "dark",
		}
	}

	pub fn body_background(self) -> &'static str {
		match self {
			Theme::Light => "#fff",
			Theme::Dark => "#18181b",
		}
	}

	pub fn background_dots(self) -> &'static str {
		match self {
			Theme::Light => "#ccc",
			Theme::Dark => "#22223b",
		}
	}

	pub fn band_fill(self) -> &'static str {
		match self {
			Theme::Light => "#BFDBFE1A",
			Theme::Dark => "#1725540F",
		}
	}

	pub fn band_line(self) -> &'static str {
		match self {
			Theme::Light => "#93C5FD",
			Theme::Dark => "#374151",
		}
	}

	pub fn guide_line(self) -> &'static str {
		match self {
			Theme::Light => "#bae6fd",
			Theme::Dark => "#1e293b",
		}
	}

	pub fn handle(self) -> &'static str {
		match self {
			Theme::Light => "#9ca3af",
			Theme::Dark => "#e5e7eb",
		}
	}

	pub fn edge(self) -> &'static str {
		match self {
			Theme::Light => "#b1b1b7",
			Theme::Dark => "#6b7280",
		}
	}

	pub fn edge_label(self) -> &'static str {
		match self {
			Theme::Light => "#374151",
			Theme::Dark => "#d1d5db",
		}
	}

	pub fn selection_ring(self) -> &'static str {
		match self {
			Theme::Light => "#1a192b",
			Theme::Dark => "#f9fafb",
		}
	}

	pub fn minimap_background(self) -> &'static str {
		match self {
			Theme::Light => "rgba(255, 255, 255, 0.9)",
			Theme::Dark => "rgba(24, 24, 27, 0.9)",
		}
	}

	pub fn minimap_viewport(self) -> &'static str {
		match self {
			Theme::Light => "rgba(100, 116, 139, 0.6)",
			Theme::Dark => "rgba(203, 213, 225, 0.6)",
		}
	}

	/// Toggle button glyph, showing the theme a click switches to.
	pub fn toggle_glyph(self) -> &'static str {
		match self {
			Theme::Light => "🌙",
			Theme::Dark => "☀️",
		}
	}
}
