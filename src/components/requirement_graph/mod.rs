mod bands;
mod component;
mod config;
mod layout;
mod render;
mod selection;
mod state;
mod theme;
mod types;

pub use component::RequirementGraphCanvas;
pub use config::DiagramConfig;
pub use types::{GraphData, GraphNode};
