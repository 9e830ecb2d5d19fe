//! Channel-backed transport boundary.
//!
//! The subsystem guarantees only local ordering; a real network
//! transport is out of scope. What ships here is the threading
//! contract made concrete: a [`ChannelSink`] carries dispatched
//! commands off the simulation thread, and [`drain_received`] hands
//! command bytes back to the owning thread's executor at a tick
//! boundary. Received commands must never touch the registry from
//! another thread.

use crossbeam_channel::{unbounded, Receiver, Sender, TryRecvError};
use isles_core::{CommandExecutor, CommandSink, SyncError};

/// One dispatched command as it crosses a channel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WireCommand {
    /// The command's opcode.
    pub opcode: u16,
    /// The command's payload bytes.
    pub payload: Vec<u8>,
}

/// Transport sink that forwards dispatched commands into a channel.
///
/// Delivery is fire-and-forget: if the receiving side is gone the
/// command is dropped, matching the no-delivery-guarantee transport
/// contract. Local recording is unaffected; the recorder sees every
/// command before any sink does.
pub struct ChannelSink {
    sender: Sender<WireCommand>,
}

impl ChannelSink {
    /// Create a sink and the receiver for its command stream.
    pub fn new() -> (Self, Receiver<WireCommand>) {
        let (sender, receiver) = unbounded();
        (Self { sender }, receiver)
    }
}

impl CommandSink for ChannelSink {
    fn send(&mut self, opcode: u16, payload: &[u8]) {
        let _ = self.sender.send(WireCommand {
            opcode,
            payload: payload.to_vec(),
        });
    }
}

/// Drain every pending received command into `executor`.
///
/// Call on the thread that owns the executor, once per tick. Stops at
/// the first execution failure, leaving later commands queued; returns
/// the number executed.
pub fn drain_received(
    receiver: &Receiver<WireCommand>,
    executor: &mut dyn CommandExecutor,
) -> Result<usize, SyncError> {
    let mut executed = 0;
    loop {
        match receiver.try_recv() {
            Ok(cmd) => {
                executor.execute(cmd.opcode, &cmd.payload)?;
                executed += 1;
            }
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => return Ok(executed),
        }
    }
}
