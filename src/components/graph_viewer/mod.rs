//! Interactive knowledge-map canvas.
//!
//! The core is headless: [`GraphView`] holds the graph with its selection,
//! history and layout, [`CanvasGraphView`] adds the screen transform and pointer
//! handling, and everything draws through the [`DrawingContext`] port. Editing
//! gestures beyond selection and dragging, such as edge drawing, resize handles
//! and copy/paste, are [`CanvasBehavior`]s. The
//! [`GraphCanvas`] component binds that core to a browser canvas.
//!
//! # Example
//!
//! ```ignore
//! use knowledge_map_canvas::{Edge, Graph, GraphCanvas, Node};
//!
//! let graph = Graph {
//!     nodes: vec![
//!         Node::new("n1", "BRCA1", "gene", 0.0, 0.0),
//!         Node::new("n2", "Breast cancer", "disease", 200.0, 0.0),
//!     ],
//!     edges: vec![Edge::new("n1", "n2", Some("associated with"))],
//! };
//!
//! view! { <GraphCanvas graph=graph fullscreen=true auto_layout=true /> }
//! ```

pub mod behaviors;
pub mod canvas;
pub mod canvas_view;
pub mod clipboard;
mod component;
pub mod config;
mod error;
pub mod geometry;
pub mod history;
pub mod layout;
pub mod placed;
mod render;
pub mod resize;
pub mod scale;
pub mod styles;
pub mod terminators;
#[cfg(test)]
mod test_support;
pub mod theme;
pub mod types;
pub mod view;

pub use behaviors::{BehaviorList, BehaviorResult, CanvasBehavior, InteractiveEdgeCreation};
pub use canvas::{DrawingContext, TextMeasure, WebCanvas};
pub use canvas_view::{CanvasGraphView, Cursor, InputEvent, ViewTransform};
pub use clipboard::ClipboardShortcut;
pub use component::GraphCanvas;
pub use config::ViewerConfig;
pub use error::GraphError;
pub use theme::Theme;
pub use types::{Edge, EdgeStyle, Graph, GraphEntity, LayoutGroup, Node, NodeData, NodeIcon, NodeStyle};
pub use resize::ActiveNodeResize;
pub use view::{GraphView, NodeGeometry};
