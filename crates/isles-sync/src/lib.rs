//! Object registry and command dispatcher for Isles.
//!
//! [`GameServer`] is the authoritative hub of the synchronization
//! subsystem: it creates and destroys simulation objects through the
//! [`ObjectRegistry`], turns lifecycle and per-tick state changes into
//! opcode-tagged binary commands, and forwards each command to an
//! optional recorder plus any number of transport sinks. Recorded or
//! received commands re-enter the simulation through
//! [`GameServer::execute`], which mutates the registry and objects
//! identically to live play.
//!
//! Single-threaded, tick-driven, cooperative: no operation suspends,
//! and the simulation clock is owned by the server and advanced only
//! by [`GameServer::tick`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod registry;
pub mod server;
pub mod transport;

pub use registry::ObjectRegistry;
pub use server::GameServer;
pub use transport::{drain_received, ChannelSink, WireCommand};
