//! Test utilities and mock collaborators for Isles development.
//!
//! Provides mock implementations of the simulation-boundary traits
//! ([`GameObject`], [`ObjectFactory`], [`WorldSource`],
//! [`CommandSink`]) so the dispatcher and replay crates can be tested
//! without any game logic. Mocks follow the set-up-then-inspect
//! pattern: configure state before the test, read the recorded calls
//! after.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::io::{Read, Write};
use std::rc::Rc;

use isles_core::{CommandSink, GameObject, ObjectFactory, SharedObject, TypeIndex, WorldSource};

// ── MockObject ──────────────────────────────────────────────────

/// Mock implementation of [`GameObject`].
///
/// `serialize` writes the current `state` bytes; `deserialize`
/// replaces `state` with the incoming payload and appends it to
/// `applied` so tests can assert on the exact sequence of state
/// updates an object received.
#[derive(Debug, Default)]
pub struct MockObject {
    pub state: Vec<u8>,
    pub applied: Vec<Vec<u8>>,
}

impl MockObject {
    pub fn new(state: Vec<u8>) -> Self {
        Self {
            state,
            applied: Vec::new(),
        }
    }

    /// Wrap a new mock in the shared-handle type the registry expects.
    pub fn shared(state: Vec<u8>) -> Rc<RefCell<MockObject>> {
        Rc::new(RefCell::new(Self::new(state)))
    }
}

impl GameObject for MockObject {
    fn serialize(&self, out: &mut dyn Write) -> std::io::Result<()> {
        out.write_all(&self.state)
    }

    fn deserialize(&mut self, input: &mut dyn Read) -> std::io::Result<()> {
        let mut buf = Vec::new();
        input.read_to_end(&mut buf)?;
        self.state = buf.clone();
        self.applied.push(buf);
        Ok(())
    }
}

// ── TestWorld ───────────────────────────────────────────────────

#[derive(Default)]
struct TestWorldLog {
    created: Vec<(String, SharedObject)>,
    destroyed: usize,
}

/// Mock implementation of [`ObjectFactory`] with a fixed type table.
///
/// Cheaply clonable: clone one handle into the server and keep another
/// for assertions. The type table is fixed at construction; only the
/// creation/destruction log sits behind shared mutability. Created
/// objects are [`MockObject`]s whose initial state is the type name's
/// bytes, so every object serializes distinctly out of the box.
#[derive(Clone, Default)]
pub struct TestWorld {
    types: Rc<Vec<String>>,
    log: Rc<RefCell<TestWorldLog>>,
}

impl TestWorld {
    /// Build a factory knowing the given type names, indexed in order.
    pub fn new(types: &[&str]) -> Self {
        Self {
            types: Rc::new(types.iter().map(|t| t.to_string()).collect()),
            log: Rc::default(),
        }
    }

    pub fn created_count(&self) -> usize {
        self.log.borrow().created.len()
    }

    pub fn destroyed_count(&self) -> usize {
        self.log.borrow().destroyed
    }

    /// Type names of every created object, in creation order.
    pub fn created_types(&self) -> Vec<String> {
        self.log
            .borrow()
            .created
            .iter()
            .map(|(name, _)| name.clone())
            .collect()
    }

    pub fn last_created(&self) -> Option<SharedObject> {
        self.log.borrow().created.last().map(|(_, obj)| obj.clone())
    }
}

impl ObjectFactory for TestWorld {
    fn create(&mut self, type_name: &str) -> Option<SharedObject> {
        if !self.types.iter().any(|t| t == type_name) {
            return None;
        }
        let object: SharedObject = MockObject::shared(type_name.as_bytes().to_vec());
        self.log
            .borrow_mut()
            .created
            .push((type_name.to_string(), object.clone()));
        Some(object)
    }

    fn destroy(&mut self, _object: &SharedObject) {
        self.log.borrow_mut().destroyed += 1;
    }

    fn type_index(&self, type_name: &str) -> Option<TypeIndex> {
        self.types
            .iter()
            .position(|t| t == type_name)
            .map(|i| TypeIndex(i as u16))
    }

    fn type_name(&self, index: TypeIndex) -> Option<&str> {
        self.types.get(index.0 as usize).map(|s| s.as_str())
    }
}

// ── MemoryWorldSource ───────────────────────────────────────────

/// Mock implementation of [`WorldSource`] over in-memory files.
#[derive(Default)]
pub struct MemoryWorldSource {
    files: HashMap<String, Vec<u8>>,
}

impl MemoryWorldSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a world file.
    pub fn insert(&mut self, name: &str, bytes: Vec<u8>) {
        self.files.insert(name.to_string(), bytes);
    }
}

impl WorldSource for MemoryWorldSource {
    fn open<'a>(&'a self, file_name: &str) -> std::io::Result<Box<dyn Read + 'a>> {
        match self.files.get(file_name) {
            Some(bytes) => Ok(Box::new(bytes.as_slice())),
            None => Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("no world file '{file_name}'"),
            )),
        }
    }
}

// ── RecordingSink ───────────────────────────────────────────────

/// Mock implementation of [`CommandSink`] that captures every command.
///
/// Cheaply clonable; clone one handle into the server and inspect the
/// other after dispatching.
#[derive(Clone, Default)]
pub struct RecordingSink {
    log: Rc<RefCell<Vec<(u16, Vec<u8>)>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every `(opcode, payload)` sent so far, in order.
    pub fn commands(&self) -> Vec<(u16, Vec<u8>)> {
        self.log.borrow().clone()
    }

    /// Opcodes only, in order.
    pub fn opcodes(&self) -> Vec<u16> {
        self.log.borrow().iter().map(|(op, _)| *op).collect()
    }

    pub fn len(&self) -> usize {
        self.log.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.borrow().is_empty()
    }
}

impl CommandSink for RecordingSink {
    fn send(&mut self, opcode: u16, payload: &[u8]) {
        self.log.borrow_mut().push((opcode, payload.to_vec()));
    }
}
