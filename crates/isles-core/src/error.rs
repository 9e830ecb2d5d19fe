//! Error types for identifier allocation and command dispatch.
//!
//! Two enums, one per concern: [`RegistryError`] for identifier-space
//! violations inside the registry, [`SyncError`] for everything the
//! dispatcher can report. Framing and not-found conditions are always
//! surfaced to the caller; silently dropping a command would break
//! determinism between record and replay.

use std::error::Error;
use std::fmt;
use std::io;

use crate::id::{ObjectId, TypeIndex};

/// Errors from the object registry's identifier bookkeeping.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegistryError {
    /// The monotonic allocator ran past the 16-bit identifier space.
    /// There is no wraparound or reuse.
    IdSpaceExhausted,
    /// The identifier is already bound to a live object.
    IdentifierInUse {
        /// The conflicting identifier.
        id: ObjectId,
    },
    /// The object handle is already registered, under this identifier.
    ObjectAlreadyRegistered {
        /// The identifier the object is currently bound to.
        id: ObjectId,
    },
    /// A system-reserved identifier (below [`ObjectId::MIN_VALID`])
    /// reached the registry.
    ReservedIdentifier {
        /// The offending identifier.
        id: ObjectId,
    },
    /// The identifier is not bound to any live object.
    NotRegistered {
        /// The identifier that was looked up.
        id: ObjectId,
    },
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IdSpaceExhausted => write!(f, "object identifier space exhausted"),
            Self::IdentifierInUse { id } => write!(f, "identifier {id} already in use"),
            Self::ObjectAlreadyRegistered { id } => {
                write!(f, "object already registered under identifier {id}")
            }
            Self::ReservedIdentifier { id } => {
                write!(f, "identifier {id} is system-reserved")
            }
            Self::NotRegistered { id } => write!(f, "identifier {id} is not registered"),
        }
    }
}

impl Error for RegistryError {}

/// Errors from dispatching, executing, or serializing commands.
#[derive(Debug)]
pub enum SyncError {
    /// The type name has no registered factory.
    UnknownType {
        /// The unrecognized type name.
        name: String,
    },
    /// A create command referenced a type index outside the factory table.
    UnknownTypeIndex {
        /// The unrecognized index.
        index: TypeIndex,
    },
    /// The target identifier is not bound to a live object.
    UnknownObject {
        /// The identifier the command addressed.
        id: ObjectId,
    },
    /// A registered object carried an identifier below
    /// [`ObjectId::MIN_VALID`] at destroy time. Indicates internal
    /// corruption rather than bad external input.
    InvalidIdentifier {
        /// The corrupt identifier.
        id: ObjectId,
    },
    /// The opcode lies outside the dispatchable domain: in the reserved
    /// band `2..=127` on execute, or at/above
    /// [`DISPATCH_OPCODE_LIMIT`](crate::command::DISPATCH_OPCODE_LIMIT)
    /// on dispatch.
    InvalidOpcode {
        /// The rejected opcode.
        opcode: u16,
    },
    /// A lifecycle payload could not be decoded (wrong length).
    MalformedCommand {
        /// Human-readable description of what went wrong.
        detail: String,
    },
    /// An identifier-space violation inside the registry.
    Registry(RegistryError),
    /// An I/O error while serializing or deserializing object state.
    Io(io::Error),
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownType { name } => write!(f, "unknown object type '{name}'"),
            Self::UnknownTypeIndex { index } => write!(f, "unknown type index {index}"),
            Self::UnknownObject { id } => write!(f, "no object registered under {id}"),
            Self::InvalidIdentifier { id } => {
                write!(f, "registered object carries reserved identifier {id}")
            }
            Self::InvalidOpcode { opcode } => write!(f, "opcode {opcode} is not dispatchable"),
            Self::MalformedCommand { detail } => write!(f, "malformed command: {detail}"),
            Self::Registry(e) => write!(f, "registry: {e}"),
            Self::Io(e) => write!(f, "object state I/O: {e}"),
        }
    }
}

impl Error for SyncError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Registry(e) => Some(e),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<RegistryError> for SyncError {
    fn from(e: RegistryError) -> Self {
        Self::Registry(e)
    }
}

impl From<io::Error> for SyncError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}
