//! Data types for the replay file layout.

use crate::hash::WorldDigest;

/// On-disk metadata record for one recorded command.
///
/// One keyframe per command, in recording order. `offset` locates the
/// command's payload; in a saved file it is an absolute byte position,
/// while the recorder holds it relative to the start of the payload
/// blob until save time. Payload lengths are never stored — the length
/// of keyframe *i* is `offset[i + 1] - offset[i]`, with a synthetic
/// trailing offset equal to the file length for the last keyframe.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Keyframe {
    /// Simulation-clock timestamp the command was dispatched at.
    pub time: f32,
    /// The command's opcode: `0` create, `1` destroy, otherwise the
    /// target object's identifier.
    pub command_id: u16,
    /// Byte offset of the command's payload.
    pub offset: u32,
}

impl Keyframe {
    /// Packed on-disk size: `time:f32 | command_id:u16 | offset:u32`,
    /// little-endian, no padding.
    pub const ENCODED_LEN: usize = 10;
}

/// Decoded replay file header.
///
/// Binds the recording to exactly one world definition: the world's
/// file name plus a 128-bit content digest of its byte stream taken at
/// record time. Loading fails if the currently available world hashes
/// differently; this is the sole cross-session consistency check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReplayHeader {
    /// File name of the world the session was recorded against.
    pub world_file_name: String,
    /// Content digest of that world's byte stream at record time.
    pub world_digest: WorldDigest,
}

impl ReplayHeader {
    /// Encoded header size in bytes: magic, version, name length, name
    /// bytes, digest.
    pub fn encoded_len(&self) -> usize {
        crate::MAGIC.len() + 1 + 1 + self.world_file_name.len() + crate::WORLD_DIGEST_LEN
    }
}
