pub mod requirement_graph;
