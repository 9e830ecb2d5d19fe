//! Core types and traits for the Isles object-synchronization subsystem.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the fundamental abstractions shared by the dispatcher and replay
//! crates: object identifiers, lifecycle command framing, error types,
//! and the boundary traits through which the excluded simulation layer
//! (factory, world data, transports) plugs in.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod command;
pub mod error;
pub mod id;
pub mod traits;

pub use command::{
    CreateCommand, DestroyCommand, DISPATCH_OPCODE_LIMIT, OPCODE_CREATE, OPCODE_DESTROY,
};
pub use error::{RegistryError, SyncError};
pub use id::{ObjectId, TypeIndex};
pub use traits::{
    CommandExecutor, CommandSink, GameObject, ObjectFactory, SharedObject, WorldSource,
};
