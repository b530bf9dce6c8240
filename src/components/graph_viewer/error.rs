//! Errors raised when a caller breaks the graph's consistency rules.

/// Contract violation detected by the graph view.
///
/// These never occur during normal operation. The operation that detects one stops
/// and returns it; there is no recovery path inside the view.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
	#[error("node '{hash}' is already in the graph")]
	DuplicateNode { hash: String },
	#[error("missing node link: '{hash}'")]
	MissingNodeLink { hash: String },
	#[error("node '{hash}' is not in the graph")]
	UnknownNode { hash: String },
	#[error("edge {from} -> {to} is not in the graph")]
	UnknownEdge { from: String, to: String },
	#[error("a behavior with key '{key}' is already installed")]
	DuplicateBehavior { key: String },
}
