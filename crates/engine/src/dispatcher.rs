//! # Dispatcher
//!
//! Routes every intercepted message through the registry. The interception
//! layer calls [`Engine::on_outbound_message`] for client-to-server traffic
//! and [`Engine::on_inbound_message`] for server-to-client traffic; the
//! returned flag says whether the original bytes are forwarded.

use crate::engine::Engine;
use crate::registry::{message_type, MessageSize};
use uoinject_core::MessageDirection;
use uoinject_protocol::{unpack_big_u16, LENGTH_OFFSET};

/// Counters kept by the dispatcher
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchStats {
    /// Messages whose original bytes were passed on
    pub forwarded: u64,
    /// Messages a handler dropped
    pub suppressed: u64,
    pub unknown_opcode: u64,
    pub direction_mismatch: u64,
    /// Fixed-size messages of the wrong length, variable-size messages
    /// whose embedded length disagrees with the buffer
    pub size_mismatch: u64,
}

impl DispatchStats {
    fn record(&mut self, forward: bool) -> bool {
        if forward {
            self.forwarded += 1;
        } else {
            self.suppressed += 1;
        }
        forward
    }
}

impl Engine {
    /// A message travelling from the client to the server
    pub fn on_outbound_message(&mut self, buf: &mut [u8]) -> bool {
        self.dispatch(MessageDirection::Send, buf)
    }

    /// A message travelling from the server to the client
    pub fn on_inbound_message(&mut self, buf: &mut [u8]) -> bool {
        self.dispatch(MessageDirection::Recv, buf)
    }

    /// Run the handler registered for one message
    ///
    /// # Arguments
    /// * `direction` - Which way the message was travelling
    /// * `buf` - The complete message; handlers may rewrite it in place
    ///
    /// # Returns
    /// Whether the (possibly rewritten) original is forwarded
    pub fn dispatch(&mut self, direction: MessageDirection, buf: &mut [u8]) -> bool {
        // A message arriving means a connection exists to inject into
        self.attached = true;

        let Some(&opcode) = buf.first() else {
            tracing::warn!("Empty message {}", direction.as_str());
            return self.stats.record(true);
        };

        let Some(entry) = message_type(opcode) else {
            tracing::error!("Unknown message type {:#04x} {}, {} bytes", opcode, direction.as_str(), buf.len());
            self.stats.unknown_opcode += 1;
            return self.stats.record(true);
        };

        tracing::trace!("{} {} ({:#04x}): {:02x?}", direction.as_str(), entry.name, opcode, buf);

        if !entry.direction.allows(direction) {
            tracing::warn!(
                "Message {} ({:#04x}) travelling {} but declared {}",
                entry.name,
                opcode,
                direction.as_str(),
                entry.direction.as_str()
            );
            self.stats.direction_mismatch += 1;
        }

        match entry.size {
            MessageSize::Fixed(size) if buf.len() != size as usize => {
                tracing::warn!(
                    "Message {} ({:#04x}) is {} bytes, expected {}",
                    entry.name,
                    opcode,
                    buf.len(),
                    size
                );
                self.stats.size_mismatch += 1;
            }
            MessageSize::Variable => {
                let embedded = unpack_big_u16(buf, LENGTH_OFFSET) as usize;
                if embedded != buf.len() {
                    tracing::warn!(
                        "Message {} ({:#04x}) claims {} bytes, buffer holds {}",
                        entry.name,
                        opcode,
                        embedded,
                        buf.len()
                    );
                    self.stats.size_mismatch += 1;
                }
            }
            MessageSize::Fixed(_) => {}
        }

        let forward = match entry.handler(direction) {
            Some(handler) => handler(self, buf),
            None => true,
        };
        self.stats.record(forward)
    }

    /// Declared size of an opcode in the interception layer's convention
    ///
    /// # Returns
    /// The byte count, -1 for variable-size messages, `None` for opcodes
    /// past the end of the registry
    pub fn message_size(&self, opcode: u8) -> Option<i32> {
        message_type(opcode).map(|entry| entry.size.as_raw())
    }
}
