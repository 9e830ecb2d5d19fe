//! World content hashing for the replay ↔ world binding.
//!
//! A replay is only meaningful against byte-identical world data, so
//! the recorder stamps each file with a 128-bit digest of the world's
//! byte stream and the player recomputes it at load time. BLAKE3
//! truncated to 16 bytes; the digest is an identity fingerprint, not
//! an integrity or authentication mechanism.

use std::io::{self, Read};

/// Digest width stored in the replay header, in bytes.
pub const WORLD_DIGEST_LEN: usize = 16;

/// 128-bit content digest of a world byte stream.
pub type WorldDigest = [u8; WORLD_DIGEST_LEN];

/// Digest a world content stream, consuming it fully.
///
/// A read failure is fatal to the surrounding save or load; a replay
/// must never be stamped with, or checked against, a partial digest.
pub fn world_digest(reader: &mut dyn Read) -> io::Result<WorldDigest> {
    let mut hasher = blake3::Hasher::new();
    io::copy(reader, &mut hasher)?;
    let hash = hasher.finalize();

    let mut digest = [0u8; WORLD_DIGEST_LEN];
    digest.copy_from_slice(&hash.as_bytes()[..WORLD_DIGEST_LEN]);
    Ok(digest)
}
