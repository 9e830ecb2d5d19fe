//! Isles: object synchronization and deterministic session replay.
//!
//! This is the top-level facade crate re-exporting the public API from
//! the Isles sub-crates. For most users, adding `isles` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use isles::prelude::*;
//! use std::cell::RefCell;
//! use std::io::{Read, Write};
//! use std::rc::Rc;
//!
//! // A minimal synchronized object: one byte of health.
//! struct Tree {
//!     health: u8,
//! }
//! impl GameObject for Tree {
//!     fn serialize(&self, out: &mut dyn Write) -> std::io::Result<()> {
//!         out.write_all(&[self.health])
//!     }
//!     fn deserialize(&mut self, input: &mut dyn Read) -> std::io::Result<()> {
//!         let mut buf = [0u8; 1];
//!         input.read_exact(&mut buf)?;
//!         self.health = buf[0];
//!         Ok(())
//!     }
//! }
//!
//! // A factory that only knows how to grow trees.
//! struct Forest;
//! impl ObjectFactory for Forest {
//!     fn create(&mut self, type_name: &str) -> Option<SharedObject> {
//!         if type_name != "Tree" {
//!             return None;
//!         }
//!         let tree: SharedObject = Rc::new(RefCell::new(Tree { health: 100 }));
//!         Some(tree)
//!     }
//!     fn destroy(&mut self, _object: &SharedObject) {}
//!     fn type_index(&self, type_name: &str) -> Option<TypeIndex> {
//!         (type_name == "Tree").then_some(TypeIndex(0))
//!     }
//!     fn type_name(&self, index: TypeIndex) -> Option<&str> {
//!         (index == TypeIndex(0)).then_some("Tree")
//!     }
//! }
//!
//! // Record a short session.
//! let mut server = GameServer::new(Box::new(Forest));
//! server.attach_recorder(GameRecorder::new());
//! let tree = server.create("Tree").unwrap();
//! server.tick(0.1).unwrap();
//! server.destroy(&tree).unwrap();
//!
//! let recorder = server.take_recorder().unwrap();
//! // create + one state broadcast + destroy
//! assert_eq!(recorder.keyframe_count(), 3);
//!
//! let mut replay = Vec::new();
//! recorder
//!     .save(&mut replay, "demo.xml", &mut &b"world bytes"[..])
//!     .unwrap();
//! assert!(replay.starts_with(b"Isles Replay"));
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for items not in
//! the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `isles-core` | Identifiers, lifecycle commands, errors, boundary traits |
//! | [`replay`] | `isles-replay` | Replay file codec, recorder, player |
//! | [`sync`] | `isles-sync` | Object registry, dispatcher, transport sinks |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub use isles_core as types;
pub use isles_replay as replay;
pub use isles_sync as sync;

/// The most commonly used items, re-exported in one place.
pub mod prelude {
    pub use isles_core::{
        CommandExecutor, CommandSink, GameObject, ObjectFactory, ObjectId, RegistryError,
        SharedObject, SyncError, TypeIndex, WorldSource,
    };
    pub use isles_replay::{GameRecorder, PlayerState, ReplayError, ReplayPlayer};
    pub use isles_sync::{GameServer, ObjectRegistry};
}
