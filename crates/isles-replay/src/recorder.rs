//! Session recording.
//!
//! [`GameRecorder`] accumulates every command a dispatcher emits into
//! an in-memory log (one [`Keyframe`] plus a slice of one contiguous
//! payload blob per command) and serializes the log to the replay
//! file format together with the world content digest.

use std::io::{Read, Write};

use crate::codec::{encode_header, encode_keyframe, write_i32_le};
use crate::error::ReplayError;
use crate::hash::world_digest;
use crate::types::{Keyframe, ReplayHeader};

/// Append-only recording of one session's dispatched command stream.
///
/// During a session the log only grows: [`record`](Self::record) is the
/// sole mutator, and [`clear`](Self::clear) is the only way to discard
/// a partial recording. Keyframe offsets are held relative to the
/// payload blob and rebased to absolute file positions at
/// [`save`](Self::save) time.
#[derive(Debug, Default)]
pub struct GameRecorder {
    keyframes: Vec<Keyframe>,
    payloads: Vec<u8>,
}

impl GameRecorder {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one dispatched command.
    ///
    /// Never fails for well-formed input; the dispatcher has already
    /// filtered empty payloads and out-of-domain opcodes.
    pub fn record(&mut self, opcode: u16, time: f32, payload: &[u8]) {
        self.keyframes.push(Keyframe {
            time,
            command_id: opcode,
            offset: self.payloads.len() as u32,
        });
        self.payloads.extend_from_slice(payload);
    }

    /// Discard all recorded data, resetting the write cursor to zero.
    pub fn clear(&mut self) {
        self.keyframes.clear();
        self.payloads.clear();
    }

    /// Number of commands recorded so far.
    pub fn keyframe_count(&self) -> usize {
        self.keyframes.len()
    }

    /// Total payload bytes recorded so far.
    pub fn payload_bytes(&self) -> usize {
        self.payloads.len()
    }

    /// Whether anything has been recorded.
    pub fn is_empty(&self) -> bool {
        self.keyframes.is_empty()
    }

    /// Recorded keyframes, in recording order with blob-relative offsets.
    pub fn keyframes(&self) -> &[Keyframe] {
        &self.keyframes
    }

    /// Serialize the recording to the replay file format.
    ///
    /// Consumes `world` fully to compute the content digest; a stream
    /// read failure aborts before any output is written, as does an
    /// oversized `world_file_name` ([`ReplayError::NameTooLong`]).
    pub fn save(
        &self,
        out: &mut dyn Write,
        world_file_name: &str,
        world: &mut dyn Read,
    ) -> Result<(), ReplayError> {
        if world_file_name.len() > u8::MAX as usize {
            return Err(ReplayError::NameTooLong {
                len: world_file_name.len(),
            });
        }
        let header = ReplayHeader {
            world_file_name: world_file_name.to_string(),
            world_digest: world_digest(world)?,
        };

        encode_header(out, &header)?;
        write_i32_le(out, self.keyframes.len() as i32)?;

        // Rebase blob-relative offsets to absolute file positions.
        let base = header.encoded_len() + 4 + self.keyframes.len() * Keyframe::ENCODED_LEN;
        for kf in &self.keyframes {
            encode_keyframe(
                out,
                &Keyframe {
                    offset: kf.offset + base as u32,
                    ..*kf
                },
            )?;
        }

        out.write_all(&self.payloads)?;
        Ok(())
    }
}
