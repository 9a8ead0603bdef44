use std::collections::HashMap;

use log::{debug, warn};

use super::bands::{BandError, LevelBands, clamp_node, compute_bands, recenter};
use super::config::DiagramConfig;
use super::layout::ForceLayout;
use super::selection::{NodeDetails, Selection};
use super::theme::Theme;
use super::types::{GraphData, GraphLink};

/// Screen-space distance a press must travel before it counts as a drag.
pub const DRAG_THRESHOLD: f64 = 3.0;

/// Fraction of the viewport left empty on each side by [`Command::FitView`].
pub const FIT_PADDING: f64 = 0.1;
/// Fitting never magnifies beyond the natural scale.
pub const FIT_MAX_ZOOM: f64 = 1.0;

const MIN_ZOOM: f64 = 0.1;
const MAX_ZOOM: f64 = 10.0;

/// A requirement card as placed on the diagram. `(x, y)` is its top-left
/// corner in graph coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct DiagramNode {
	pub id: String,
	pub label: String,
	pub level: u32,
	pub x: f64,
	pub y: f64,
	/// Held by the pointer; the force layout leaves it alone.
	pub pinned: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self { x: 0.0, y: 0.0, k: 1.0 }
	}
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub node: Option<String>,
	pub moved: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f64,
	pub node_start_y: f64,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

/// Every change to the diagram goes through one of these.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
	Resize { width: f64, height: f64 },
	BeginDrag { id: String },
	MoveNode { id: String, x: f64, y: f64 },
	EndDrag,
	Select { id: String },
	Dismiss,
	Reset,
	ToggleTheme,
	Pan { x: f64, y: f64 },
	Zoom { factor: f64, anchor_x: f64, anchor_y: f64 },
	/// Scale and center the view so every card is visible.
	FitView,
	Tick { dt: f64 },
}

pub struct DiagramState {
	pub nodes: Vec<DiagramNode>,
	pub links: Vec<GraphLink>,
	pub bands: LevelBands,
	pub selection: Selection,
	pub theme: Theme,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub width: f64,
	pub height: f64,
	pub flow_time: f64,
	pub config: DiagramConfig,
	initial: Vec<DiagramNode>,
	index: HashMap<String, usize>,
	layout: Option<ForceLayout>,
}

impl DiagramState {
	pub fn new(
		data: &GraphData,
		config: DiagramConfig,
		width: f64,
		height: f64,
	) -> Result<Self, BandError> {
		let bands = compute_bands(viewport_height(height, &config), config.level_count)?;

		let mut initial = Vec::with_capacity(data.nodes.len());
		let mut index = HashMap::new();
		for node in &data.nodes {
			if index.contains_key(&node.id) {
				warn!("duplicate node id {}, keeping the first", node.id);
				continue;
			}
			index.insert(node.id.clone(), initial.len());
			initial.push(DiagramNode {
				id: node.id.clone(),
				label: node.label.clone(),
				level: node.level,
				x: node.x,
				y: 0.0,
				pinned: false,
			});
		}

		let mut state = Self {
			nodes: Vec::new(),
			links: data.links.clone(),
			bands,
			selection: Selection::default(),
			theme: Theme::default(),
			transform: ViewTransform::default(),
			drag: DragState::default(),
			pan: PanState::default(),
			width,
			height,
			flow_time: 0.0,
			config,
			initial,
			index,
			layout: None,
		};
		state.reset_nodes();
		Ok(state)
	}

	pub fn apply(&mut self, command: Command) {
		match command {
			Command::Resize { width, height } => self.resize(width, height),
			Command::BeginDrag { id } => {
				if self.drag.node.as_ref().is_some_and(|held| *held != id) {
					self.release_drag();
				}
				if let Some(node) = self.node_mut(&id) {
					node.pinned = true;
					self.drag.node = Some(id);
				}
			}
			Command::MoveNode { id, x, y } => {
				let (bands, height, margin) = (
					&self.bands,
					self.config.node_height,
					self.config.band_margin,
				);
				if let Some(&i) = self.index.get(&id) {
					let node = &mut self.nodes[i];
					node.x = x;
					node.y = y;
					clamp_node(node, bands, height, margin);
				}
			}
			// An abandoned drag must still release the node.
			Command::EndDrag => self.release_drag(),
			Command::Select { id } => {
				if self.index.contains_key(&id) {
					debug!("select {id}");
					self.selection.activate(&id);
				} else {
					debug!("ignoring selection of unknown node {id}");
				}
			}
			Command::Dismiss => self.selection.dismiss(),
			Command::Reset => {
				debug!("reset node positions");
				self.drag = DragState::default();
				self.reset_nodes();
			}
			Command::ToggleTheme => self.theme = self.theme.toggled(),
			Command::Pan { x, y } => {
				self.transform.x = x;
				self.transform.y = y;
			}
			Command::Zoom {
				factor,
				anchor_x,
				anchor_y,
			} => {
				let new_k = (self.transform.k * factor).clamp(MIN_ZOOM, MAX_ZOOM);
				let ratio = new_k / self.transform.k;
				self.transform.x = anchor_x - (anchor_x - self.transform.x) * ratio;
				self.transform.y = anchor_y - (anchor_y - self.transform.y) * ratio;
				self.transform.k = new_k;
			}
			Command::FitView => self.fit_view(),
			Command::Tick { dt } => self.tick(dt),
		}
	}

	/// Starts a node drag or a pan depending on what lies under the pointer.
	pub fn pointer_down(&mut self, sx: f64, sy: f64) {
		if let Some(i) = self.node_at_position(sx, sy) {
			let node = &self.nodes[i];
			self.drag = DragState {
				node: Some(node.id.clone()),
				moved: false,
				start_x: sx,
				start_y: sy,
				node_start_x: node.x,
				node_start_y: node.y,
			};
			let id = node.id.clone();
			self.apply(Command::BeginDrag { id });
		} else {
			self.pan = PanState {
				active: true,
				start_x: sx,
				start_y: sy,
				transform_start_x: self.transform.x,
				transform_start_y: self.transform.y,
			};
		}
	}

	pub fn pointer_move(&mut self, sx: f64, sy: f64) {
		if let Some(id) = self.drag.node.clone() {
			let (dx, dy) = (sx - self.drag.start_x, sy - self.drag.start_y);
			if !self.drag.moved && dx.hypot(dy) < DRAG_THRESHOLD {
				return;
			}
			self.drag.moved = true;
			let k = self.transform.k;
			self.apply(Command::MoveNode {
				id,
				x: self.drag.node_start_x + dx / k,
				y: self.drag.node_start_y + dy / k,
			});
		} else if self.pan.active {
			self.apply(Command::Pan {
				x: self.pan.transform_start_x + (sx - self.pan.start_x),
				y: self.pan.transform_start_y + (sy - self.pan.start_y),
			});
		}
	}

	/// Ends the gesture. A press that never became a drag is a click and
	/// selects the node.
	pub fn pointer_up(&mut self) {
		let clicked = match &self.drag.node {
			Some(id) if !self.drag.moved => Some(id.clone()),
			_ => None,
		};
		self.apply(Command::EndDrag);
		self.pan.active = false;
		if let Some(id) = clicked {
			self.apply(Command::Select { id });
		}
	}

	pub fn pointer_leave(&mut self) {
		self.apply(Command::EndDrag);
		self.pan.active = false;
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	/// Topmost node whose card contains the screen point.
	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<usize> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let (w, h) = (self.config.node_width, self.config.node_height);
		self.nodes
			.iter()
			.rposition(|n| gx >= n.x && gx <= n.x + w && gy >= n.y && gy <= n.y + h)
	}

	pub fn node(&self, id: &str) -> Option<&DiagramNode> {
		self.index.get(id).map(|&i| &self.nodes[i])
	}

	/// Links whose endpoints both exist, with the resolved nodes.
	pub fn drawable_links(
		&self,
	) -> impl Iterator<Item = (&GraphLink, &DiagramNode, &DiagramNode)> {
		self.links.iter().filter_map(|link| {
			Some((link, self.node(&link.source)?, self.node(&link.target)?))
		})
	}

	pub fn details(&self) -> Option<NodeDetails> {
		let node = self.node(self.selection.selected()?)?;
		Some(NodeDetails {
			id: node.id.clone(),
			label: node.label.clone(),
			level: node.level,
		})
	}

	/// Graph-space rectangle covering every card, as `(min_x, min_y, max_x, max_y)`.
	pub fn bounds(&self) -> Option<(f64, f64, f64, f64)> {
		let (w, h) = (self.config.node_width, self.config.node_height);
		self.nodes.iter().fold(None, |acc, n| {
			let (x0, y0, x1, y1) = acc.unwrap_or((n.x, n.y, n.x + w, n.y + h));
			Some((x0.min(n.x), y0.min(n.y), x1.max(n.x + w), y1.max(n.y + h)))
		})
	}

	fn release_drag(&mut self) {
		if let Some(id) = self.drag.node.take() {
			if let Some(node) = self.node_mut(&id) {
				node.pinned = false;
			}
		}
		self.drag.moved = false;
	}

	fn node_mut(&mut self, id: &str) -> Option<&mut DiagramNode> {
		let &i = self.index.get(id)?;
		self.nodes.get_mut(i)
	}

	/// Restores the initial definitions and centers them in the current bands.
	fn reset_nodes(&mut self) {
		self.nodes = self.initial.clone();
		recenter(&mut self.nodes, &self.bands, self.config.node_height);
		if self.config.auto_layout {
			self.layout = Some(ForceLayout::new(
				&self.nodes,
				&self.links,
				&self.config.forces,
				self.config.node_width,
				self.config.node_height,
			));
		}
	}

	fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		match compute_bands(viewport_height(height, &self.config), self.config.level_count) {
			Ok(bands) => {
				debug!("resize to {width}x{height}");
				self.bands = bands;
				recenter(&mut self.nodes, &self.bands, self.config.node_height);
			}
			Err(e) => warn!("keeping previous bands: {e}"),
		}
	}

	fn fit_view(&mut self) {
		let Some((x0, y0, x1, y1)) = self.bounds() else {
			return;
		};
		if self.width <= 0.0 || self.height <= 0.0 {
			return;
		}
		let scale = 1.0 + 2.0 * FIT_PADDING;
		let k = (self.width / ((x1 - x0) * scale))
			.min(self.height / ((y1 - y0) * scale))
			.clamp(MIN_ZOOM, FIT_MAX_ZOOM);
		self.transform = ViewTransform {
			x: self.width / 2.0 - (x0 + x1) / 2.0 * k,
			y: self.height / 2.0 - (y0 + y1) / 2.0 * k,
			k,
		};
	}

	fn tick(&mut self, dt: f64) {
		self.flow_time += dt;
		let Some(layout) = self.layout.as_mut() else {
			return;
		};
		layout.step(&mut self.nodes, &self.bands, dt as f32);
		for node in &mut self.nodes {
			clamp_node(
				node,
				&self.bands,
				self.config.node_height,
				self.config.band_margin,
			);
		}
	}
}

fn viewport_height(height: f64, config: &DiagramConfig) -> f64 {
	if height > 0.0 {
		height
	} else {
		config.fallback_viewport_height
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::requirement_graph::types::GraphNode;
	use pretty_assertions::assert_eq;

	fn sample() -> GraphData {
		let mut data = GraphData::default();
		for (id, level, x) in [
			("1.1", 1, 300.0),
			("2.1", 2, 150.0),
			("3.1", 3, 100.0),
			("4.1", 4, 50.0),
		] {
			data.nodes.push(GraphNode {
				id: id.to_string(),
				label: format!("Req {id}"),
				level,
				x,
			});
		}
		data.link_all("2.1", &["1.1"], Some("satisfy"));
		data.link_all("3.1", &["2.1"], Some("satisfy"));
		data.link_all("4.1", &["3.1", "9.9"], Some("satisfy"));
		data
	}

	fn state() -> DiagramState {
		DiagramState::new(&sample(), DiagramConfig::default(), 1200.0, 800.0).unwrap()
	}

	fn y_of(state: &DiagramState, id: &str) -> f64 {
		state.node(id).unwrap().y
	}

	#[test]
	fn mount_centers_nodes_in_bands() {
		let s = state();
		let ys: Vec<f64> = s.nodes.iter().map(|n| n.y).collect();
		assert_eq!(ys, vec![70.0, 270.0, 470.0, 670.0]);
		assert!(s.nodes.iter().all(|n| !n.pinned));
	}

	#[test]
	fn zero_levels_is_a_configuration_error() {
		let config = DiagramConfig {
			level_count: 0,
			..DiagramConfig::default()
		};
		let result = DiagramState::new(&sample(), config, 1200.0, 800.0);
		assert_eq!(result.err(), Some(BandError::NoLevels));
	}

	#[test]
	fn missing_viewport_height_uses_fallback() {
		let s = DiagramState::new(&sample(), DiagramConfig::default(), 0.0, 0.0).unwrap();
		assert_eq!(s.bands.viewport_height(), 800.0);
	}

	#[test]
	fn move_clamps_into_band() {
		let mut s = state();
		s.apply(Command::MoveNode {
			id: "2.1".into(),
			x: 480.0,
			y: 50.0,
		});
		let node = s.node("2.1").unwrap();
		assert_eq!((node.x, node.y), (480.0, 210.0));
	}

	#[test]
	fn move_of_unknown_node_is_ignored() {
		let mut s = state();
		let before = s.nodes.clone();
		s.apply(Command::MoveNode {
			id: "nope".into(),
			x: 0.0,
			y: 0.0,
		});
		assert_eq!(s.nodes, before);
	}

	#[test]
	fn reset_restores_initial_x_and_band_center() {
		let mut s = state();
		s.apply(Command::BeginDrag { id: "3.1".into() });
		s.apply(Command::MoveNode {
			id: "3.1".into(),
			x: 777.0,
			y: 555.0,
		});
		assert_eq!(s.node("3.1").unwrap().x, 777.0);

		s.apply(Command::Reset);

		let node = s.node("3.1").unwrap();
		assert_eq!((node.x, node.y, node.pinned), (100.0, 470.0, false));
	}

	#[test]
	fn resize_recomputes_bands_and_recenters() {
		let mut s = state();
		s.apply(Command::MoveNode {
			id: "1.1".into(),
			x: 320.0,
			y: 120.0,
		});
		s.apply(Command::Resize {
			width: 1000.0,
			height: 400.0,
		});

		assert_eq!(s.bands.get(2).unwrap().top, 100.0);
		let node = s.node("1.1").unwrap();
		assert_eq!((node.x, node.y), (320.0, 20.0));
	}

	#[test]
	fn invalid_resize_keeps_previous_bands() {
		let mut s = state();
		let before = s.bands.clone();
		s.apply(Command::Resize {
			width: 100.0,
			height: f64::NAN,
		});
		assert_eq!(s.bands, before);
	}

	#[test]
	fn click_selects_and_replaces() {
		let mut s = state();
		// Card of 2.1 spans x 150..300, y 270..330.
		s.pointer_down(200.0, 300.0);
		s.pointer_up();
		assert_eq!(s.selection.selected(), Some("2.1"));

		s.pointer_down(150.0, 500.0);
		s.pointer_up();
		assert_eq!(s.selection, Selection::Selected("3.1".into()));

		let details = s.details().unwrap();
		assert_eq!(
			details,
			NodeDetails {
				id: "3.1".into(),
				label: "Req 3.1".into(),
				level: 3,
			}
		);

		s.apply(Command::Dismiss);
		assert_eq!(s.details(), None);
	}

	#[test]
	fn selecting_unknown_node_keeps_selection() {
		let mut s = state();
		s.apply(Command::Select { id: "1.1".into() });
		s.apply(Command::Select { id: "ghost".into() });
		assert_eq!(s.selection.selected(), Some("1.1"));
	}

	#[test]
	fn drag_pins_then_releases_without_selecting() {
		let mut s = state();
		s.pointer_down(200.0, 300.0);
		assert!(s.node("2.1").unwrap().pinned);

		s.pointer_move(260.0, 100.0);
		assert_eq!(s.node("2.1").unwrap().x, 210.0);
		assert_eq!(y_of(&s, "2.1"), 210.0);

		s.pointer_up();
		assert!(!s.node("2.1").unwrap().pinned);
		assert_eq!(s.selection, Selection::Unselected);
	}

	#[test]
	fn abandoned_drag_clears_pin() {
		let mut s = state();
		s.pointer_down(200.0, 300.0);
		s.pointer_move(220.0, 320.0);
		s.pointer_leave();

		assert!(s.nodes.iter().all(|n| !n.pinned));
		assert!(s.drag.node.is_none());
	}

	#[test]
	fn small_jitter_is_still_a_click() {
		let mut s = state();
		s.pointer_down(200.0, 300.0);
		s.pointer_move(201.0, 301.0);
		s.pointer_up();

		assert_eq!(y_of(&s, "2.1"), 270.0);
		assert_eq!(s.selection.selected(), Some("2.1"));
	}

	#[test]
	fn background_drag_pans() {
		let mut s = state();
		s.pointer_down(1100.0, 20.0);
		s.pointer_move(1150.0, 60.0);
		s.pointer_up();

		assert_eq!(s.transform, ViewTransform { x: 50.0, y: 40.0, k: 1.0 });
		assert!(!s.pan.active);
	}

	#[test]
	fn zoom_keeps_anchor_fixed() {
		let mut s = state();
		let before = s.screen_to_graph(400.0, 300.0);
		s.apply(Command::Zoom {
			factor: 2.0,
			anchor_x: 400.0,
			anchor_y: 300.0,
		});
		let after = s.screen_to_graph(400.0, 300.0);

		assert_eq!(s.transform.k, 2.0);
		assert!((before.0 - after.0).abs() < 1e-9 && (before.1 - after.1).abs() < 1e-9);
	}

	#[test]
	fn theme_toggle() {
		let mut s = state();
		s.apply(Command::ToggleTheme);
		assert_eq!(s.theme, Theme::Dark);
		s.apply(Command::ToggleTheme);
		assert_eq!(s.theme, Theme::Light);
	}

	#[test]
	fn links_with_unknown_endpoints_are_not_drawn() {
		let s = state();
		let ids: Vec<&str> = s.drawable_links().map(|(l, _, _)| l.id.as_str()).collect();
		assert_eq!(ids, vec!["2.1-1.1-0", "3.1-2.1-0", "4.1-3.1-0"]);
	}

	#[test]
	fn bounds_cover_all_cards() {
		let s = state();
		assert_eq!(s.bounds(), Some((50.0, 70.0, 450.0, 730.0)));
	}

	#[test]
	fn auto_layout_keeps_nodes_in_bands_and_pins_fixed() {
		let config = DiagramConfig::default().with_auto_layout();
		let mut s = DiagramState::new(&sample(), config, 1200.0, 800.0).unwrap();
		s.apply(Command::BeginDrag { id: "1.1".into() });

		for _ in 0..60 {
			s.apply(Command::Tick { dt: 0.016 });
		}

		let pinned = s.node("1.1").unwrap();
		assert_eq!((pinned.x, pinned.y), (300.0, 70.0));
		for node in &s.nodes {
			let band = s.bands.get(node.level).unwrap();
			assert!(node.y >= band.top + 10.0 && node.y <= band.bottom - 60.0);
		}

		s.apply(Command::EndDrag);
		assert!(!s.node("1.1").unwrap().pinned);
	}

	#[test]
	fn end_drag_releases_node_pinned_by_command() {
		let mut s = state();
		s.apply(Command::BeginDrag { id: "2.1".into() });
		s.apply(Command::MoveNode {
			id: "2.1".into(),
			x: 400.0,
			y: 300.0,
		});
		assert!(s.node("2.1").unwrap().pinned);

		s.apply(Command::EndDrag);

		assert!(s.nodes.iter().all(|n| !n.pinned));
		assert!(s.drag.node.is_none());
	}

	#[test]
	fn second_drag_releases_the_first() {
		let mut s = state();
		s.apply(Command::BeginDrag { id: "1.1".into() });
		s.apply(Command::BeginDrag { id: "3.1".into() });

		assert!(!s.node("1.1").unwrap().pinned);
		assert!(s.node("3.1").unwrap().pinned);
		assert_eq!(s.drag.node.as_deref(), Some("3.1"));
	}

	#[test]
	fn begin_drag_of_unknown_node_holds_nothing() {
		let mut s = state();
		s.apply(Command::BeginDrag { id: "ghost".into() });
		assert!(s.drag.node.is_none());
	}

	#[test]
	fn auto_layout_leaves_levels_without_band_in_place() {
		let mut data = GraphData::default();
		for (id, level, x) in [("1.1", 1, 300.0), ("5.1", 5, 120.0)] {
			data.nodes.push(GraphNode {
				id: id.to_string(),
				label: format!("Req {id}"),
				level,
				x,
			});
		}
		data.link_all("5.1", &["1.1"], Some("satisfy"));
		let config = DiagramConfig::default().with_auto_layout();
		let mut s = DiagramState::new(&data, config, 1200.0, 800.0).unwrap();

		for _ in 0..30 {
			s.apply(Command::Tick { dt: 0.016 });
		}

		let stray = s.node("5.1").unwrap();
		assert_eq!((stray.x, stray.y), (120.0, 0.0));
	}

	#[test]
	fn fit_view_centers_all_cards() {
		let mut s = state();
		s.apply(Command::Pan { x: -900.0, y: 640.0 });
		s.apply(Command::FitView);

		// Bounds 50..450 x 70..730 fit at natural scale.
		assert_eq!(s.transform, ViewTransform { x: 350.0, y: 0.0, k: 1.0 });
	}

	#[test]
	fn fit_view_zooms_out_for_narrow_viewport() {
		let mut s = state();
		s.apply(Command::Resize {
			width: 300.0,
			height: 800.0,
		});
		s.apply(Command::FitView);

		assert_eq!(s.transform, ViewTransform { x: -6.25, y: 150.0, k: 0.625 });
		let (w, h) = (s.config.node_width, s.config.node_height);
		for n in &s.nodes {
			let (sx, sy) = (n.x * s.transform.k + s.transform.x, n.y * s.transform.k + s.transform.y);
			assert!(sx >= 0.0 && sx + w * s.transform.k <= 300.0);
			assert!(sy >= 0.0 && sy + h * s.transform.k <= 800.0);
		}
	}

	#[test]
	fn fit_view_of_empty_diagram_keeps_transform() {
		let mut s = DiagramState::new(&GraphData::default(), DiagramConfig::default(), 1200.0, 800.0)
			.unwrap();
		s.apply(Command::FitView);
		assert_eq!(s.transform, ViewTransform::default());
	}
}
