//! Boundary traits between the synchronization core and the excluded
//! simulation, content, and transport layers.
//!
//! The dispatcher only ever calls through these traits; it never
//! implements object-specific logic, opens world files itself, or talks
//! to a concrete transport. [`CommandExecutor`] decouples replay
//! playback from the concrete dispatcher type so the replay crate does
//! not depend on the dispatcher crate.

use std::cell::RefCell;
use std::io::{Read, Write};
use std::rc::Rc;

use crate::error::SyncError;
use crate::id::TypeIndex;

/// Shared handle to a synchronized game object.
///
/// Objects opt into synchronization by being handed to the registry as
/// this handle type; there is no base-class check. The subsystem is
/// single-threaded by contract, so `Rc<RefCell<_>>` is the ownership
/// model: the registry and the simulation both hold handles, and state
/// application borrows mutably for the duration of one `execute` call.
pub type SharedObject = Rc<RefCell<dyn GameObject>>;

/// A simulation object whose state can be captured and re-applied.
///
/// The dispatcher treats the serialized form as opaque bytes; only the
/// object itself interprets them. `serialize` must write the object's
/// full current state (state-update commands are not deltas), and
/// `deserialize` must accept exactly what `serialize` produced.
pub trait GameObject {
    /// Write the object's full current state.
    fn serialize(&self, out: &mut dyn Write) -> std::io::Result<()>;

    /// Apply previously serialized state as the object's next-tick state.
    fn deserialize(&mut self, input: &mut dyn Read) -> std::io::Result<()>;
}

/// Factory boundary to the excluded simulation layer.
///
/// Owns the `type name ↔ type index` bijection that lets create
/// commands reference types by a 16-bit index instead of a string.
pub trait ObjectFactory {
    /// Instantiate an object of the named type, or `None` if the type
    /// has no registered creator.
    fn create(&mut self, type_name: &str) -> Option<SharedObject>;

    /// Tear an object down in the simulation. Called for every destroy,
    /// registered or not.
    fn destroy(&mut self, object: &SharedObject);

    /// Table index for a type name.
    fn type_index(&self, type_name: &str) -> Option<TypeIndex>;

    /// Type name for a table index.
    fn type_name(&self, index: TypeIndex) -> Option<&str>;
}

/// Source of world content streams, keyed by file name.
///
/// Replay loading re-hashes the named world through this trait to
/// verify the recording was made against byte-identical world data.
pub trait WorldSource {
    /// Open the named world file for reading.
    fn open<'a>(&'a self, file_name: &str) -> std::io::Result<Box<dyn Read + 'a>>;
}

/// Outbound transport sink for dispatched commands.
///
/// The dispatcher fans every recorded command out to each attached
/// sink. Implementations own delivery semantics entirely; the
/// subsystem guarantees only local ordering.
pub trait CommandSink {
    /// Forward one dispatched command.
    fn send(&mut self, opcode: u16, payload: &[u8]);
}

/// Inbound command execution, with the clock that makes commands due.
///
/// Implemented by the dispatcher. Replay playback drives this trait:
/// `clock` decides which recorded keyframes are due, and `execute`
/// re-applies them exactly as live play would.
pub trait CommandExecutor {
    /// Apply one command: interpret lifecycle opcodes, or deserialize
    /// the payload into the addressed object.
    fn execute(&mut self, opcode: u16, payload: &[u8]) -> Result<(), SyncError>;

    /// The simulation clock, in seconds since the session started.
    fn clock(&self) -> f64;
}
