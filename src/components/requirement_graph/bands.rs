//! Horizontal level bands and the vertical constraints derived from them.
//!
//! The viewport is split into equal slices, one per hierarchy level, with
//! level 1 at the top. Node positions are the top-left corner of the node
//! card, so the lowest allowed y inside a band is `bottom - node_height`.

use thiserror::Error;

use super::state::DiagramNode;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum BandError {
	#[error("level count must be at least 1")]
	NoLevels,
	#[error("viewport height must be positive and finite, got {0}")]
	InvalidViewport(f64),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Band {
	pub top: f64,
	pub bottom: f64,
	pub center: f64,
}

impl Band {
	pub fn height(&self) -> f64 {
		self.bottom - self.top
	}
}

/// Bands for levels `1..=level_count` over a fixed viewport height.
#[derive(Clone, Debug, PartialEq)]
pub struct LevelBands {
	bands: Vec<Band>,
	viewport_height: f64,
}

impl LevelBands {
	pub fn get(&self, level: u32) -> Option<&Band> {
		let index = usize::try_from(level).ok()?.checked_sub(1)?;
		self.bands.get(index)
	}

	pub fn level_count(&self) -> u32 {
		self.bands.len() as u32
	}

	pub fn viewport_height(&self) -> f64 {
		self.viewport_height
	}

	/// Bands paired with their level, top to bottom.
	pub fn iter(&self) -> impl Iterator<Item = (u32, &Band)> {
		(1..).zip(self.bands.iter())
	}
}

pub fn compute_bands(viewport_height: f64, level_count: u32) -> Result<LevelBands, BandError> {
	if level_count == 0 {
		return Err(BandError::NoLevels);
	}
	if !viewport_height.is_finite() || viewport_height <= 0.0 {
		return Err(BandError::InvalidViewport(viewport_height));
	}

	let band_height = viewport_height / level_count as f64;
	let bands = (1..=level_count)
		.map(|i| {
			let top = (i - 1) as f64 * band_height;
			// Pin the last edge to the viewport so the slices sum exactly.
			let bottom = if i == level_count {
				viewport_height
			} else {
				i as f64 * band_height
			};
			Band {
				top,
				bottom,
				center: top + band_height / 2.0,
			}
		})
		.collect();

	Ok(LevelBands {
		bands,
		viewport_height,
	})
}

/// Constrains `y` to `[band.top + margin, band.bottom - node_height]`.
///
/// Values already in range come back untouched. A band shorter than the node,
/// or a NaN coordinate, resolves to the upper limit.
pub fn clamp_y(y: f64, band: &Band, node_height: f64, margin: f64) -> f64 {
	let (min_y, max_y) = (band.top + margin, band.bottom - node_height);
	if max_y < min_y || y.is_nan() {
		return min_y;
	}
	if (min_y..=max_y).contains(&y) {
		return y;
	}
	y.clamp(min_y, max_y)
}

/// Clamps the node into its level's band. Returns whether `y` was written.
///
/// Nodes whose level has no band keep their position.
pub fn clamp_node(
	node: &mut DiagramNode,
	bands: &LevelBands,
	node_height: f64,
	margin: f64,
) -> bool {
	let Some(band) = bands.get(node.level) else {
		return false;
	};
	let y = clamp_y(node.y, band, node_height, margin);
	if y == node.y {
		return false;
	}
	node.y = y;
	true
}

/// Snaps every node with a known level to the vertical center of its band.
pub fn recenter(nodes: &mut [DiagramNode], bands: &LevelBands, node_height: f64) {
	for node in nodes {
		if let Some(band) = bands.get(node.level) {
			node.y = band.center - node_height / 2.0;
		}
	}
}
