//! Replay playback.
//!
//! [`ReplayPlayer`] loads a recorded file, validates it against the
//! currently available world, and feeds due commands back into a
//! dispatcher through the
//! [`CommandExecutor`](isles_core::CommandExecutor) trait. Playback is
//! driven by the executor's own simulation clock, never wall-clock
//! time, so variable frame rates cannot desynchronize a replay.

use isles_core::{CommandExecutor, WorldSource};

use crate::codec::{decode_header, decode_keyframe, read_i32_le};
use crate::error::ReplayError;
use crate::hash::world_digest;

/// Playback lifecycle of a [`ReplayPlayer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerState {
    /// No replay loaded, or the last load failed.
    Unloaded,
    /// A replay is loaded and the cursor is at the first keyframe.
    Loaded,
    /// Playback has started; the cursor is advancing.
    Playing,
    /// Every keyframe has been executed; further updates are no-ops.
    Exhausted,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self::Unloaded
    }
}

/// A keyframe with its payload resolved, ready for execution.
#[derive(Clone, Debug)]
struct LoadedKeyframe {
    time: f32,
    command_id: u16,
    payload: Vec<u8>,
}

/// Loads and plays back a recorded session.
///
/// The keyframe table is fixed once loaded and consumed strictly
/// forward by a monotonically advancing cursor. `load` either fully
/// validates a file or leaves the player [`PlayerState::Unloaded`];
/// there is no partial-success mode.
#[derive(Debug, Default)]
pub struct ReplayPlayer {
    keyframes: Vec<LoadedKeyframe>,
    cursor: usize,
    world_file_name: Option<String>,
    state: PlayerState,
}

impl ReplayPlayer {
    /// Create a player with nothing loaded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current playback state.
    pub fn state(&self) -> PlayerState {
        self.state
    }

    /// World file name from the loaded replay's header.
    pub fn world_file_name(&self) -> Option<&str> {
        self.world_file_name.as_deref()
    }

    /// Number of keyframes in the loaded replay.
    pub fn keyframe_count(&self) -> usize {
        self.keyframes.len()
    }

    /// Index of the next keyframe to execute.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Load a replay from `bytes`, validating it against the world
    /// obtainable through `world_source`.
    ///
    /// Rejects the file on: bad magic, unsupported version, truncated
    /// header or keyframe table, a world whose content digest differs
    /// from the recorded one, a non-positive keyframe count, or any
    /// payload range that is non-positive or runs past end-of-file.
    /// On success the keyframes are sorted by ascending timestamp
    /// (equal timestamps keep their recording order) and the cursor is
    /// reset; on failure the player is left unloaded.
    pub fn load(&mut self, bytes: &[u8], world_source: &dyn WorldSource) -> Result<(), ReplayError> {
        self.unload();

        let mut r = bytes;
        let header = decode_header(&mut r)?;

        // Hash gate: the replay binds to byte-identical world data.
        let mut world = world_source.open(&header.world_file_name)?;
        if world_digest(world.as_mut())? != header.world_digest {
            return Err(ReplayError::WorldMismatch {
                file_name: header.world_file_name,
            });
        }

        let count = read_i32_le(&mut r)?;
        if count <= 0 {
            return Err(ReplayError::InvalidKeyframeCount { found: count });
        }
        let count = count as usize;

        let mut table = Vec::with_capacity(count);
        for _ in 0..count {
            table.push(decode_keyframe(&mut r)?);
        }

        // Synthetic trailing offset: the last keyframe's payload runs
        // to end-of-file. Lengths are derived, never stored.
        let mut keyframes = Vec::with_capacity(count);
        for (i, kf) in table.iter().enumerate() {
            let start = kf.offset as usize;
            let end = match table.get(i + 1) {
                Some(next) => next.offset as usize,
                None => bytes.len(),
            };
            if end <= start || end > bytes.len() {
                return Err(ReplayError::InconsistentOffsets { index: i });
            }
            keyframes.push(LoadedKeyframe {
                time: kf.time,
                command_id: kf.command_id,
                payload: bytes[start..end].to_vec(),
            });
        }

        keyframes.sort_by(|a, b| a.time.total_cmp(&b.time));

        self.keyframes = keyframes;
        self.cursor = 0;
        self.world_file_name = Some(header.world_file_name);
        self.state = PlayerState::Loaded;
        Ok(())
    }

    /// Execute every due keyframe against `executor`.
    ///
    /// A keyframe is due when its timestamp is at or before the
    /// executor's clock. Returns the number of keyframes executed.
    /// An executor failure is surfaced without advancing past the
    /// failing keyframe, so a retry after external repair resumes
    /// exactly there. No-op while unloaded or exhausted.
    pub fn update(&mut self, executor: &mut dyn CommandExecutor) -> Result<usize, ReplayError> {
        match self.state {
            PlayerState::Unloaded | PlayerState::Exhausted => return Ok(0),
            PlayerState::Loaded => self.state = PlayerState::Playing,
            PlayerState::Playing => {}
        }

        let now = executor.clock() as f32;
        let mut executed = 0;
        while let Some(kf) = self.keyframes.get(self.cursor) {
            if kf.time > now {
                break;
            }
            executor.execute(kf.command_id, &kf.payload)?;
            self.cursor += 1;
            executed += 1;
        }

        if self.cursor == self.keyframes.len() {
            self.state = PlayerState::Exhausted;
        }
        Ok(executed)
    }

    fn unload(&mut self) {
        self.keyframes.clear();
        self.cursor = 0;
        self.world_file_name = None;
        self.state = PlayerState::Unloaded;
    }
}
