//! Live-session dispatcher tests: lifecycle commands, per-tick state
//! broadcast, and execute as the inverse of dispatch.

use isles_core::{
    CreateCommand, ObjectId, SyncError, TypeIndex, DISPATCH_OPCODE_LIMIT, OPCODE_CREATE,
    OPCODE_DESTROY,
};
use isles_replay::GameRecorder;
use isles_sync::{drain_received, ChannelSink, GameServer};
use isles_test_utils::{MockObject, RecordingSink, TestWorld};

fn server_with(types: &[&str]) -> (GameServer, TestWorld, RecordingSink) {
    let world = TestWorld::new(types);
    let sink = RecordingSink::new();
    let mut server = GameServer::new(Box::new(world.clone()));
    server.add_sink(Box::new(sink.clone()));
    (server, world, sink)
}

// ── Lifecycle ───────────────────────────────────────────────────

#[test]
fn create_assigns_sequential_ids_and_emits_create_commands() {
    let (mut server, world, sink) = server_with(&["Tree", "Peon"]);

    let tree = server.create("Tree").unwrap();
    let peon = server.create("Peon").unwrap();

    assert_eq!(server.registry().id_of(&tree), Some(ObjectId(128)));
    assert_eq!(server.registry().id_of(&peon), Some(ObjectId(129)));
    assert_eq!(world.created_types(), vec!["Tree", "Peon"]);

    let commands = sink.commands();
    assert_eq!(commands.len(), 2);
    assert_eq!(commands[0].0, OPCODE_CREATE);
    assert_eq!(
        CreateCommand::decode(&commands[0].1).unwrap(),
        CreateCommand {
            type_index: TypeIndex(0),
            object_id: ObjectId(128),
        }
    );
    assert_eq!(
        CreateCommand::decode(&commands[1].1).unwrap(),
        CreateCommand {
            type_index: TypeIndex(1),
            object_id: ObjectId(129),
        }
    );
}

#[test]
fn create_unknown_type_fails_without_side_effects() {
    let (mut server, world, sink) = server_with(&["Tree"]);

    let result = server.create("Dragon");
    assert!(matches!(result, Err(SyncError::UnknownType { .. })));
    assert_eq!(world.created_count(), 0);
    assert!(sink.is_empty());
    assert!(server.registry().is_empty());
}

#[test]
fn create_with_conflicting_id_rolls_back_the_factory_object() {
    let (mut server, world, _sink) = server_with(&["Tree"]);

    server.create_with_id("Tree", ObjectId(200)).unwrap();
    let result = server.create_with_id("Tree", ObjectId(200));

    assert!(matches!(result, Err(SyncError::Registry(_))));
    // The second factory object was torn down again.
    assert_eq!(world.created_count(), 2);
    assert_eq!(world.destroyed_count(), 1);
    assert_eq!(server.registry().len(), 1);
}

#[test]
fn destroy_emits_command_then_unregisters() {
    let (mut server, world, sink) = server_with(&["Tree"]);

    let tree = server.create("Tree").unwrap();
    server.destroy(&tree).unwrap();

    assert!(server.registry().is_empty());
    assert_eq!(world.destroyed_count(), 1);

    let commands = sink.commands();
    assert_eq!(commands.len(), 2);
    assert_eq!(commands[1].0, OPCODE_DESTROY);
    assert_eq!(commands[1].1, vec![128, 0]);
}

#[test]
fn destroy_of_unregistered_object_is_quiet() {
    let (mut server, world, sink) = server_with(&["Tree"]);

    let stray: isles_core::SharedObject = MockObject::shared(b"stray".to_vec());
    server.destroy(&stray).unwrap();

    // The simulation still tears it down, but no command is emitted.
    assert_eq!(world.destroyed_count(), 1);
    assert!(sink.is_empty());
}

#[test]
fn destroy_with_reserved_id_reports_corruption() {
    let (mut server, _world, _sink) = server_with(&["Tree"]);

    let stray: isles_core::SharedObject = MockObject::shared(b"stray".to_vec());
    server
        .registry_mut()
        .register(ObjectId(5), stray.clone())
        .unwrap();

    let result = server.destroy(&stray);
    assert!(matches!(
        result,
        Err(SyncError::InvalidIdentifier { id: ObjectId(5) })
    ));
}

// ── Dispatch ────────────────────────────────────────────────────

#[test]
fn dispatch_drops_empty_payloads_silently() {
    let (mut server, _world, sink) = server_with(&[]);

    server.attach_recorder(GameRecorder::new());
    server.dispatch(200, &[]).unwrap();

    assert!(sink.is_empty());
    assert!(server.recorder().unwrap().is_empty());
    assert_eq!(server.commands_dispatched(), 0);
}

#[test]
fn dispatch_rejects_opcodes_beyond_the_single_byte_domain() {
    let (mut server, _world, sink) = server_with(&[]);

    let result = server.dispatch(DISPATCH_OPCODE_LIMIT, &[1]);
    assert!(matches!(
        result,
        Err(SyncError::InvalidOpcode { opcode: 255 })
    ));
    assert!(server.dispatch(300, &[1]).is_err());
    assert!(sink.is_empty());

    server.dispatch(254, &[1]).unwrap();
    assert_eq!(sink.len(), 1);
}

#[test]
fn dispatch_stamps_the_simulation_clock() {
    let (mut server, _world, _sink) = server_with(&["Tree"]);
    server.attach_recorder(GameRecorder::new());

    server.create("Tree").unwrap();
    server.tick(0.5).unwrap();
    server.tick(0.5).unwrap();

    let recorder = server.take_recorder().unwrap();
    let times: Vec<f32> = recorder.keyframes().iter().map(|k| k.time).collect();
    assert_eq!(times, vec![0.0, 0.5, 1.0]);
}

#[test]
fn clearing_the_recorder_discards_a_partial_session() {
    let (mut server, _world, _sink) = server_with(&["Tree"]);
    server.attach_recorder(GameRecorder::new());

    server.create("Tree").unwrap();
    server.tick(0.1).unwrap();
    assert!(!server.recorder().unwrap().is_empty());

    server.recorder_mut().unwrap().clear();
    assert!(server.recorder().unwrap().is_empty());

    // Recording resumes from a clean cursor.
    server.tick(0.1).unwrap();
    assert_eq!(server.recorder().unwrap().keyframe_count(), 1);
    assert_eq!(server.recorder().unwrap().keyframes()[0].offset, 0);
}

// ── Tick broadcast ──────────────────────────────────────────────

#[test]
fn tick_broadcasts_full_state_for_every_object() {
    let (mut server, _world, sink) = server_with(&["Tree", "Peon", "Tower"]);

    server.create("Tree").unwrap();
    server.create("Peon").unwrap();
    server.create("Tower").unwrap();

    let ticks = 4;
    for _ in 0..ticks {
        server.tick(0.1).unwrap();
    }

    let state_updates: Vec<(u16, Vec<u8>)> = sink
        .commands()
        .into_iter()
        .filter(|(op, _)| *op >= ObjectId::MIN_VALID.0)
        .collect();
    assert_eq!(state_updates.len(), ticks * 3);

    // Registration order, every tick, full serialized state.
    let first_tick = &state_updates[..3];
    assert_eq!(first_tick[0], (128, b"Tree".to_vec()));
    assert_eq!(first_tick[1], (129, b"Peon".to_vec()));
    assert_eq!(first_tick[2], (130, b"Tower".to_vec()));
}

#[test]
fn destroyed_objects_leave_the_broadcast() {
    let (mut server, _world, sink) = server_with(&["Tree", "Peon"]);

    let tree = server.create("Tree").unwrap();
    server.create("Peon").unwrap();
    server.tick(0.1).unwrap();
    server.destroy(&tree).unwrap();
    server.tick(0.1).unwrap();

    let broadcast_ids: Vec<u16> = sink
        .opcodes()
        .into_iter()
        .filter(|op| *op >= ObjectId::MIN_VALID.0)
        .collect();
    assert_eq!(broadcast_ids, vec![128, 129, 129]);
}

#[test]
fn clock_advances_only_through_tick() {
    let (mut server, _world, _sink) = server_with(&["Tree"]);

    assert_eq!(server.time(), 0.0);
    server.create("Tree").unwrap();
    assert_eq!(server.time(), 0.0);

    server.tick(0.25).unwrap();
    server.tick(0.25).unwrap();
    assert_eq!(server.time(), 0.5);
}

// ── Execute ─────────────────────────────────────────────────────

#[test]
fn execute_is_the_inverse_of_dispatch() {
    // Everything a live session emits can be executed on a second
    // server to reproduce the session.
    let (mut live, _world_a, sink) = server_with(&["Tree", "Peon"]);
    let tree = live.create("Tree").unwrap();
    live.create("Peon").unwrap();
    live.tick(0.2).unwrap();
    live.destroy(&tree).unwrap();

    let (mut mirror, world_b, _sink_b) = server_with(&["Tree", "Peon"]);
    for (opcode, payload) in sink.commands() {
        mirror.execute(opcode, &payload).unwrap();
    }

    assert_eq!(world_b.created_types(), vec!["Tree", "Peon"]);
    assert!(!mirror.registry().contains(ObjectId(128)));
    assert!(mirror.registry().contains(ObjectId(129)));
}

#[test]
fn execute_applies_state_to_the_addressed_object() {
    let (mut server, world, _sink) = server_with(&["Tree"]);
    server.create("Tree").unwrap();

    server.execute(128, b"burning").unwrap();

    let object = world.last_created().unwrap();
    let mut state = Vec::new();
    object.borrow().serialize(&mut state).unwrap();
    assert_eq!(state, b"burning");
}

#[test]
fn execute_after_destroy_reports_unknown_object() {
    let (mut server, _world, _sink) = server_with(&["Tree"]);

    let tree = server.create_with_id("Tree", ObjectId(200)).unwrap();
    server.destroy(&tree).unwrap();

    let result = server.execute(200, &[1, 2, 3]);
    assert!(matches!(
        result,
        Err(SyncError::UnknownObject { id: ObjectId(200) })
    ));
}

#[test]
fn execute_rejects_reserved_opcodes() {
    let (mut server, _world, _sink) = server_with(&[]);

    for opcode in [2u16, 64, 127] {
        let result = server.execute(opcode, &[1]);
        assert!(
            matches!(result, Err(SyncError::InvalidOpcode { .. })),
            "opcode {opcode} must be rejected"
        );
    }
}

#[test]
fn execute_rejects_malformed_lifecycle_payloads() {
    let (mut server, _world, _sink) = server_with(&["Tree"]);

    assert!(matches!(
        server.execute(OPCODE_CREATE, &[0, 0]),
        Err(SyncError::MalformedCommand { .. })
    ));
    assert!(matches!(
        server.execute(OPCODE_DESTROY, &[0, 0, 200, 0]),
        Err(SyncError::MalformedCommand { .. })
    ));
}

#[test]
fn execute_create_with_unknown_type_index_fails() {
    let (mut server, _world, _sink) = server_with(&["Tree"]);

    let cmd = CreateCommand {
        type_index: TypeIndex(7),
        object_id: ObjectId(200),
    };
    let result = server.execute(OPCODE_CREATE, &cmd.encode());
    assert!(matches!(
        result,
        Err(SyncError::UnknownTypeIndex {
            index: TypeIndex(7)
        })
    ));
}

// ── Transport handoff ───────────────────────────────────────────

#[test]
fn channel_transport_mirrors_a_session_across_servers() {
    let (mut live, _world_a, _sink) = server_with(&["Tree"]);
    let (channel, receiver) = ChannelSink::new();
    live.add_sink(Box::new(channel));

    live.create("Tree").unwrap();
    live.tick(0.1).unwrap();

    let (mut remote, world_b, _sink_b) = server_with(&["Tree"]);
    let executed = drain_received(&receiver, &mut remote).unwrap();

    assert_eq!(executed, 2);
    assert_eq!(world_b.created_count(), 1);
    assert!(remote.registry().contains(ObjectId(128)));
}
