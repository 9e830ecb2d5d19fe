//! Error types for replay recording and playback.

use std::fmt;
use std::io;

use isles_core::SyncError;

/// Errors that can occur while saving or loading a replay, or while
/// feeding a loaded replay back into a dispatcher.
///
/// A corrupted replay file is an expected external-input condition:
/// every structural violation is a typed load failure, never a panic,
/// and a failed load leaves the player unloaded.
#[derive(Debug)]
pub enum ReplayError {
    /// An I/O error occurred during read or write. Truncated files
    /// surface here as `UnexpectedEof`.
    Io(io::Error),
    /// The file does not start with the `b"Isles Replay"` magic bytes.
    InvalidMagic,
    /// The format version is not supported by this build.
    UnsupportedVersion {
        /// The version found in the file.
        found: u8,
    },
    /// The world file name does not fit the single-byte length prefix.
    NameTooLong {
        /// Encoded byte length of the offending name.
        len: usize,
    },
    /// The keyframe count is zero or negative. An empty replay is
    /// invalid by design.
    InvalidKeyframeCount {
        /// The count found in the file.
        found: i32,
    },
    /// A derived payload length was non-positive or ran past the end
    /// of the file. Offsets must be strictly increasing.
    InconsistentOffsets {
        /// Index of the keyframe whose payload range is inconsistent.
        index: usize,
    },
    /// The current world's content digest does not match the digest
    /// recorded in the replay header.
    WorldMismatch {
        /// The world file name the replay was recorded against.
        file_name: String,
    },
    /// The executor rejected a command during playback.
    Execution(SyncError),
}

impl fmt::Display for ReplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::InvalidMagic => write!(f, "invalid magic bytes (expected b\"Isles Replay\")"),
            Self::UnsupportedVersion { found } => {
                write!(f, "unsupported replay version {found}")
            }
            Self::NameTooLong { len } => {
                write!(f, "world file name is {len} bytes, limit is 255")
            }
            Self::InvalidKeyframeCount { found } => {
                write!(f, "invalid keyframe count {found}")
            }
            Self::InconsistentOffsets { index } => {
                write!(f, "inconsistent payload offset at keyframe {index}")
            }
            Self::WorldMismatch { file_name } => {
                write!(f, "world '{file_name}' does not match the recorded content digest")
            }
            Self::Execution(e) => write!(f, "playback execution failed: {e}"),
        }
    }
}

impl std::error::Error for ReplayError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Execution(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for ReplayError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<SyncError> for ReplayError {
    fn from(e: SyncError) -> Self {
        Self::Execution(e)
    }
}
