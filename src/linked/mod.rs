//! The linked graph: storage, change notification and the listenable wrapper.

mod graph;
mod listenable;
mod listener;

pub use graph::{EdgeId, LinkedGraph, VertexId};
pub use listenable::ListenableGraph;
pub use listener::{GraphChangeListener, GraphListener};
