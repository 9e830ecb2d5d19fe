//! Lifecycle command opcodes and their fixed-size payload codecs.
//!
//! A dispatched command is `{opcode: u16, timestamp: f32, payload}`.
//! Opcodes `0` and `1` carry the fixed-layout lifecycle payloads defined
//! here; any opcode at or above [`ObjectId::MIN_VALID`] is itself the
//! target object's identifier and its payload is that object's opaque
//! serialized state. All integers are little-endian.

use crate::error::SyncError;
use crate::id::{ObjectId, TypeIndex};

/// Opcode of a create command.
pub const OPCODE_CREATE: u16 = 0;

/// Opcode of a destroy command.
pub const OPCODE_DESTROY: u16 = 1;

/// Exclusive upper bound on dispatchable opcodes.
///
/// The outbound framing addresses commands with single-byte-safe
/// opcodes; dispatch targets at or above this bound are rejected
/// rather than silently wrapped.
pub const DISPATCH_OPCODE_LIMIT: u16 = u8::MAX as u16;

/// Payload of a create command: which type to instantiate, under which id.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CreateCommand {
    /// Factory table index of the type to instantiate.
    pub type_index: TypeIndex,
    /// Identifier the new object is registered under.
    pub object_id: ObjectId,
}

impl CreateCommand {
    /// Encoded payload length in bytes.
    pub const ENCODED_LEN: usize = 4;

    /// Encode as `type_index:u16 | object_id:u16`, little-endian.
    pub fn encode(&self) -> [u8; Self::ENCODED_LEN] {
        let ti = self.type_index.0.to_le_bytes();
        let id = self.object_id.0.to_le_bytes();
        [ti[0], ti[1], id[0], id[1]]
    }

    /// Decode a create payload. The length must be exactly
    /// [`ENCODED_LEN`](Self::ENCODED_LEN) bytes.
    pub fn decode(payload: &[u8]) -> Result<Self, SyncError> {
        if payload.len() != Self::ENCODED_LEN {
            return Err(SyncError::MalformedCommand {
                detail: format!("create payload is {} bytes, expected 4", payload.len()),
            });
        }
        let type_index = TypeIndex(u16::from_le_bytes([payload[0], payload[1]]));
        let object_id = ObjectId(u16::from_le_bytes([payload[2], payload[3]]));
        Ok(Self {
            type_index,
            object_id,
        })
    }
}

/// Payload of a destroy command: which object to tear down.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DestroyCommand {
    /// Identifier of the object being destroyed.
    pub object_id: ObjectId,
}

impl DestroyCommand {
    /// Encoded payload length in bytes.
    pub const ENCODED_LEN: usize = 2;

    /// Encode as `object_id:u16`, little-endian.
    pub fn encode(&self) -> [u8; Self::ENCODED_LEN] {
        self.object_id.0.to_le_bytes()
    }

    /// Decode a destroy payload. The length must be exactly
    /// [`ENCODED_LEN`](Self::ENCODED_LEN) bytes.
    pub fn decode(payload: &[u8]) -> Result<Self, SyncError> {
        if payload.len() != Self::ENCODED_LEN {
            return Err(SyncError::MalformedCommand {
                detail: format!("destroy payload is {} bytes, expected 2", payload.len()),
            });
        }
        Ok(Self {
            object_id: ObjectId(u16::from_le_bytes([payload[0], payload[1]])),
        })
    }
}
