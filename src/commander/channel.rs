//! Command channel between the commander and the process manager
//!
//! An ordered, blocking, closable stream of single command characters built
//! on a bounded `crossbeam_channel`. Dropping the [`CommandSender`] closes the
//! channel; the receiver then sees [`ChannelClosed`] once the buffered
//! characters are drained.

use crossbeam_channel::{Receiver, Sender};
use std::fmt;

/// Buffered characters before `send` blocks
pub const CHANNEL_CAPACITY: usize = 16;

/// The other end of the channel has gone away
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelClosed;

impl fmt::Display for ChannelClosed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "command channel closed")
    }
}

impl std::error::Error for ChannelClosed {}

/// Writing end, held by the commander
#[derive(Debug)]
pub struct CommandSender {
    tx: Sender<char>,
}

impl CommandSender {
    /// Block until the character is accepted or the receiver is gone
    pub fn send(&self, ch: char) -> Result<(), ChannelClosed> {
        self.tx.send(ch).map_err(|_| ChannelClosed)
    }

    /// Close the channel; pending characters are still delivered
    pub fn close(self) {
        drop(self);
    }
}

/// Reading end, held by the process manager
#[derive(Debug)]
pub struct CommandReceiver {
    rx: Receiver<char>,
}

impl CommandReceiver {
    /// Block until a character arrives or the sender has closed the channel
    pub fn recv(&self) -> Result<char, ChannelClosed> {
        self.rx.recv().map_err(|_| ChannelClosed)
    }
}

pub fn command_channel() -> (CommandSender, CommandReceiver) {
    let (tx, rx) = crossbeam_channel::bounded(CHANNEL_CAPACITY);
    (CommandSender { tx }, CommandReceiver { rx })
}
