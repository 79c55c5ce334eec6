//! Catch-all handler for stack messages the application does not own.
//!
//! Only the GATT client event indication needs an answer: the peer
//! waits for a confirmation and the link times out without one.

use crate::error::StackError;

/// Identifier of a stack task / connection endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TaskId(pub u16);

/// Message kinds that can reach the catch-all handler.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MessageKind {
    /// GATT client received an indication on `handle`.
    GattcEventInd { handle: u16 },
    /// Any other message, identified by its raw id.
    Other(u16),
}

/// A message delivered by the stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StackMessage {
    pub kind: MessageKind,
    pub dest: TaskId,
    pub src: TaskId,
}

/// Confirmation for a GATT client event indication.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EventConfirm {
    pub dest: TaskId,
    pub src: TaskId,
    pub handle: u16,
}

/// Outgoing message path back into the stack.
pub trait MessageSink {
    fn send_confirm(&mut self, cfm: EventConfirm) -> Result<(), StackError>;
}

/// Handle a message not consumed elsewhere.
///
/// Returns `Ok(true)` if a reply was sent, `Ok(false)` if the message
/// was ignored.
pub fn dispatch<S: MessageSink>(msg: &StackMessage, sink: &mut S) -> Result<bool, StackError> {
    match msg.kind {
        MessageKind::GattcEventInd { handle } => {
            debug!("gattc event indication on handle {}", handle);
            // Reply goes back to whoever sent the indication.
            sink.send_confirm(EventConfirm {
                dest: msg.src,
                src: msg.dest,
                handle,
            })?;
            Ok(true)
        }
        MessageKind::Other(id) => {
            trace!("ignoring stack message {}", id);
            Ok(false)
        }
    }
}
