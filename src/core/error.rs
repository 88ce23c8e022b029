use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;

use cgmath::Point3;

/// Resource-availability failures of chunk operations.
///
/// None of these indicate a bug; the caller decides whether to retry later.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChunkError {
    /// The chunk itself is missing or still being generated.
    ChunkUnavailable(Point3<i32>),
    /// A face neighbour needed to mesh the chunk is not loaded yet.
    NeighbourUnavailable {
        position: Point3<i32>,
        neighbour: Point3<i32>,
    },
    /// A neighbour kept relighting for longer than the configured timeout.
    NeighbourRelightTimeout {
        position: Point3<i32>,
        neighbour: Point3<i32>,
    },
    /// The chunk was unloaded (or never loaded) at this position.
    ChunkNotLoaded(Point3<i32>),
}

impl ChunkError {
    /// Whether the same request may succeed later without outside action.
    pub fn is_retryable(&self) -> bool {
        match self {
            ChunkError::ChunkUnavailable(_) => true,
            ChunkError::NeighbourUnavailable { .. } => true,
            ChunkError::NeighbourRelightTimeout { .. } => true,
            ChunkError::ChunkNotLoaded(_) => false,
        }
    }

    pub fn position(&self) -> Point3<i32> {
        match self {
            ChunkError::ChunkUnavailable(position)
            | ChunkError::ChunkNotLoaded(position)
            | ChunkError::NeighbourUnavailable { position, .. }
            | ChunkError::NeighbourRelightTimeout { position, .. } => *position,
        }
    }
}

impl Display for ChunkError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ChunkError::ChunkUnavailable(p) => {
                write!(f, "Chunk ({}, {}, {}) is not available yet", p.x, p.y, p.z)
            }
            ChunkError::NeighbourUnavailable { position: p, neighbour: n } => write!(
                f,
                "Chunk ({}, {}, {}) is waiting for neighbour ({}, {}, {})",
                p.x, p.y, p.z, n.x, n.y, n.z
            ),
            ChunkError::NeighbourRelightTimeout { position: p, neighbour: n } => write!(
                f,
                "Chunk ({}, {}, {}) timed out waiting for neighbour ({}, {}, {}) to relight",
                p.x, p.y, p.z, n.x, n.y, n.z
            ),
            ChunkError::ChunkNotLoaded(p) => {
                write!(f, "Chunk ({}, {}, {}) is not loaded", p.x, p.y, p.z)
            }
        }
    }
}

impl Error for ChunkError {}

/// Failures while loading a [`WorldConfig`](super::config::WorldConfig).
#[derive(Debug)]
pub enum ConfigError {
    Io(io::Error),
    Parse(serde_json::Error),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "Could not read config: {}", e),
            ConfigError::Parse(e) => write!(f, "Could not parse config: {}", e),
            ConfigError::Invalid(reason) => write!(f, "Invalid config: {}", reason),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            ConfigError::Invalid(_) => None,
        }
    }
}

impl From<io::Error> for ConfigError {
    fn from(e: io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_missing_chunks_are_final() {
        let p = Point3::new(1, 2, 3);
        assert!(ChunkError::ChunkUnavailable(p).is_retryable());
        assert!(ChunkError::NeighbourRelightTimeout { position: p, neighbour: p }.is_retryable());
        assert!(!ChunkError::ChunkNotLoaded(p).is_retryable());
    }

    #[test]
    fn messages_name_the_chunk() {
        let error = ChunkError::NeighbourUnavailable {
            position: Point3::new(0, -1, 4),
            neighbour: Point3::new(1, -1, 4),
        };
        assert_eq!(
            error.to_string(),
            "Chunk (0, -1, 4) is waiting for neighbour (1, -1, 4)"
        );
    }
}
