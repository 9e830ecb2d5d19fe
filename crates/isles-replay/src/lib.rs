//! Deterministic session recording and replay for Isles.
//!
//! Records every command a dispatcher emits (opcode, timestamp,
//! payload) and serializes the stream to a self-contained binary file
//! bound to the exact world data it was recorded against. Loading that
//! file back reproduces the session without re-running game logic or
//! input.
//!
//! # Architecture
//!
//! - [`GameRecorder`] accumulates dispatched commands and writes the
//!   replay file to any `Write` sink
//! - [`ReplayPlayer`] validates a replay file against the current world
//!   and feeds due commands back through a
//!   [`CommandExecutor`](isles_core::CommandExecutor)
//! - All I/O uses an explicit packed binary codec (no serde, no native
//!   struct marshaling)
//!
//! # Format
//!
//! ```text
//! [MAGIC "Isles Replay"] [VERSION u8] [name len u8] [world name]
//! [world digest 16B] [keyframe count i32]
//! [Keyframe 1] ... [Keyframe N]    (10 bytes each, packed)
//! [payload blob to EOF]
//! ```
//!
//! Keyframe payload offsets are absolute file positions; payload
//! lengths are never stored, only derived from consecutive offsets.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod codec;
pub mod error;
pub mod hash;
pub mod player;
pub mod recorder;
pub mod types;

pub use error::ReplayError;
pub use hash::{world_digest, WorldDigest, WORLD_DIGEST_LEN};
pub use player::{PlayerState, ReplayPlayer};
pub use recorder::GameRecorder;
pub use types::{Keyframe, ReplayHeader};

/// Magic bytes at the start of every replay file, no terminator.
pub const MAGIC: [u8; 12] = *b"Isles Replay";

/// Current binary format version.
pub const FORMAT_VERSION: u8 = 0;
