use thiserror::Error;

use crate::graph::NodeId;

/// Convenient result alias for the emroute library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// The closest road node lies beyond the allowed snapping distance.
    #[error("nearest road node is {distance:.1} m away (limit {max_distance:.1} m)")]
    NodeNotFound { distance: f64, max_distance: f64 },

    /// No routable edge could be found near the query point.
    #[error("no routable edge near the requested point: {reason}")]
    EdgeNotFound { reason: String },

    /// Raised when a session operation runs before a network was loaded.
    #[error("road network has not been loaded")]
    GraphUnavailable,

    /// Raised when a route endpoint does not exist in the graph.
    #[error("node {node} does not exist in the road network")]
    UnknownNode { node: NodeId },

    /// Raised when a network file violates the graph contract.
    #[error("invalid road network: {message}")]
    InvalidNetwork { message: String },

    /// Raised when a configuration value is out of range.
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Wrapper for JSON decoding errors.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn edge_not_found(reason: impl Into<String>) -> Self {
        Error::EdgeNotFound {
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_network(message: impl Into<String>) -> Self {
        Error::InvalidNetwork {
            message: message.into(),
        }
    }

    pub(crate) fn invalid_config(message: impl Into<String>) -> Self {
        Error::InvalidConfig {
            message: message.into(),
        }
    }
}
