//! Commander side of the simulator
//!
//! - [`command`]: the four operator commands and line parsing
//! - [`channel`]: the ordered, closable character channel
//! - [`session`]: commander loop, process manager loop, and the session
//!   that ties them together

pub mod channel;
pub mod command;
pub mod session;

pub use channel::{command_channel, ChannelClosed, CommandReceiver, CommandSender};
pub use command::{command_char, Command};
pub use session::{run_commander, run_process_manager, run_session, EXIT_FAILURE, EXIT_OK};
