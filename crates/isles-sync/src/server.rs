//! The authoritative dispatcher.
//!
//! [`GameServer`] is the single point through which object lifecycle
//! and per-tick state reach the recorder and transports, and through
//! which recorded or received commands re-enter the simulation. One
//! server owns one [`ObjectRegistry`] and the simulation clock; there
//! is no process-wide instance. Every collaborator is handed an
//! explicit server reference, which is what makes multiple concurrent
//! sessions (one per test, say) possible.

use isles_core::{
    CommandExecutor, CommandSink, CreateCommand, DestroyCommand, ObjectFactory, ObjectId,
    SharedObject, SyncError, DISPATCH_OPCODE_LIMIT, OPCODE_CREATE, OPCODE_DESTROY,
};
use isles_replay::GameRecorder;

use crate::registry::ObjectRegistry;

/// Authoritative hub for one synchronization session.
///
/// At most one recorder is attached at a time (recording is
/// all-or-nothing for a session); transports are fan-out sinks the
/// server writes to alongside it. Playback and recording are distinct
/// modes, but nothing prevents replaying into a server that also
/// records; that is how replay validation by re-recording works.
pub struct GameServer {
    registry: ObjectRegistry,
    factory: Box<dyn ObjectFactory>,
    recorder: Option<GameRecorder>,
    sinks: Vec<Box<dyn CommandSink>>,
    time: f64,
    commands_dispatched: u64,
}

impl GameServer {
    /// Create a server around the simulation layer's object factory.
    pub fn new(factory: Box<dyn ObjectFactory>) -> Self {
        Self {
            registry: ObjectRegistry::new(),
            factory,
            recorder: None,
            sinks: Vec::new(),
            time: 0.0,
            commands_dispatched: 0,
        }
    }

    /// Simulation clock in seconds, advanced only by [`tick`](Self::tick).
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Total commands accepted by [`dispatch`](Self::dispatch).
    pub fn commands_dispatched(&self) -> u64 {
        self.commands_dispatched
    }

    /// The registry owned by this server.
    pub fn registry(&self) -> &ObjectRegistry {
        &self.registry
    }

    /// Mutable access to the registry.
    pub fn registry_mut(&mut self) -> &mut ObjectRegistry {
        &mut self.registry
    }

    /// Attach a recorder, returning the previously attached one.
    pub fn attach_recorder(&mut self, recorder: GameRecorder) -> Option<GameRecorder> {
        self.recorder.replace(recorder)
    }

    /// Detach and return the recorder.
    pub fn take_recorder(&mut self) -> Option<GameRecorder> {
        self.recorder.take()
    }

    /// The attached recorder, if any.
    pub fn recorder(&self) -> Option<&GameRecorder> {
        self.recorder.as_ref()
    }

    /// Mutable access to the attached recorder, e.g. to
    /// [`clear`](GameRecorder::clear) an aborted session.
    pub fn recorder_mut(&mut self) -> Option<&mut GameRecorder> {
        self.recorder.as_mut()
    }

    /// Add a transport sink. Every dispatched command is forwarded to
    /// every sink, in attachment order.
    pub fn add_sink(&mut self, sink: Box<dyn CommandSink>) {
        self.sinks.push(sink);
    }

    /// Create an object of the named type under a freshly allocated
    /// identifier.
    pub fn create(&mut self, type_name: &str) -> Result<SharedObject, SyncError> {
        let id = self.registry.allocate()?;
        self.create_with_id(type_name, id)
    }

    /// Create an object of the named type under the given identifier.
    ///
    /// Registers the object, then emits the create command so remote
    /// peers and the recorder observe the same id ↔ type binding.
    pub fn create_with_id(
        &mut self,
        type_name: &str,
        id: ObjectId,
    ) -> Result<SharedObject, SyncError> {
        let type_index = self
            .factory
            .type_index(type_name)
            .ok_or_else(|| SyncError::UnknownType {
                name: type_name.to_string(),
            })?;
        let object = self
            .factory
            .create(type_name)
            .ok_or_else(|| SyncError::UnknownType {
                name: type_name.to_string(),
            })?;

        if let Err(e) = self.registry.register(id, object.clone()) {
            self.factory.destroy(&object);
            return Err(e.into());
        }

        let cmd = CreateCommand {
            type_index,
            object_id: id,
        };
        self.dispatch(OPCODE_CREATE, &cmd.encode())?;
        Ok(object)
    }

    /// Destroy an object.
    ///
    /// The simulation tears the object down unconditionally; the
    /// destroy command is emitted and the registration removed only if
    /// the object was registered. A registered identifier below
    /// [`ObjectId::MIN_VALID`] indicates internal corruption and is
    /// surfaced as [`SyncError::InvalidIdentifier`].
    pub fn destroy(&mut self, object: &SharedObject) -> Result<(), SyncError> {
        self.factory.destroy(object);

        if let Some(id) = self.registry.id_of(object) {
            if !id.is_valid() {
                return Err(SyncError::InvalidIdentifier { id });
            }
            let cmd = DestroyCommand { object_id: id };
            self.dispatch(OPCODE_DESTROY, &cmd.encode())?;
            self.registry.unregister(id)?;
        }
        Ok(())
    }

    /// Forward one command to the recorder and every transport sink,
    /// stamped with the current simulation clock.
    ///
    /// A zero-length payload is dropped silently: an empty command is
    /// a no-op, not an error. Opcodes at or above
    /// [`DISPATCH_OPCODE_LIMIT`] are rejected.
    pub fn dispatch(&mut self, opcode: u16, payload: &[u8]) -> Result<(), SyncError> {
        if opcode >= DISPATCH_OPCODE_LIMIT {
            return Err(SyncError::InvalidOpcode { opcode });
        }
        if payload.is_empty() {
            return Ok(());
        }

        if let Some(recorder) = &mut self.recorder {
            recorder.record(opcode, self.time as f32, payload);
        }
        for sink in &mut self.sinks {
            sink.send(opcode, payload);
        }
        self.commands_dispatched += 1;
        Ok(())
    }

    /// Apply one received or replayed command, the inverse of
    /// [`dispatch`](Self::dispatch).
    ///
    /// Opcodes `0` and `1` run the create/destroy lifecycle, including
    /// re-emitting the command to this server's own recorder and
    /// sinks. Any opcode at or above [`ObjectId::MIN_VALID`] addresses
    /// a registered object and deserializes the payload into it as its
    /// next-tick state; an unregistered target is
    /// [`SyncError::UnknownObject`], never silently skipped. Opcodes
    /// in the reserved band `2..=127` are invalid.
    pub fn execute(&mut self, opcode: u16, payload: &[u8]) -> Result<(), SyncError> {
        match opcode {
            OPCODE_CREATE => {
                let cmd = CreateCommand::decode(payload)?;
                let name = self
                    .factory
                    .type_name(cmd.type_index)
                    .ok_or(SyncError::UnknownTypeIndex {
                        index: cmd.type_index,
                    })?
                    .to_string();
                self.create_with_id(&name, cmd.object_id)?;
                Ok(())
            }
            OPCODE_DESTROY => {
                let cmd = DestroyCommand::decode(payload)?;
                let object = self
                    .registry
                    .lookup(cmd.object_id)
                    .ok_or(SyncError::UnknownObject { id: cmd.object_id })?;
                self.destroy(&object)
            }
            op if op < ObjectId::MIN_VALID.0 => Err(SyncError::InvalidOpcode { opcode: op }),
            op => {
                let id = ObjectId(op);
                let object = self
                    .registry
                    .lookup(id)
                    .ok_or(SyncError::UnknownObject { id })?;
                object.borrow_mut().deserialize(&mut &payload[..])?;
                Ok(())
            }
        }
    }

    /// Advance the simulation clock and broadcast every registered
    /// object's full serialized state, one command per object with the
    /// object's identifier as the opcode.
    ///
    /// Full state every tick, not a delta. A live multiplayer
    /// transport would make this the first optimization target, but
    /// recording and replay depend on the broadcast being complete.
    pub fn tick(&mut self, dt: f64) -> Result<(), SyncError> {
        self.time += dt;

        let ids: Vec<ObjectId> = self.registry.iter().map(|(id, _)| id).collect();
        let mut state = Vec::new();
        for id in ids {
            debug_assert!(id.is_valid());
            let Some(object) = self.registry.lookup(id) else {
                continue;
            };
            state.clear();
            object.borrow().serialize(&mut state)?;
            self.dispatch(id.0, &state)?;
        }
        Ok(())
    }
}

impl CommandExecutor for GameServer {
    fn execute(&mut self, opcode: u16, payload: &[u8]) -> Result<(), SyncError> {
        GameServer::execute(self, opcode, payload)
    }

    fn clock(&self) -> f64 {
        self.time
    }
}
