//! UI components.

pub mod graph_canvas;
pub mod language_panel;
pub mod search_bar;
pub mod skeleton;
