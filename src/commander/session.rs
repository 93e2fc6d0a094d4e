//! The two cooperating loops and the session that runs them
//!
//! The commander loop reads operator lines and sends one character per line.
//! The process manager loop receives characters and dispatches them, one
//! command fully processed before the next is read. They share nothing but
//! the channel. [`run_session`] puts the manager loop on its own thread, runs
//! the commander on the caller's thread, and returns the manager's exit status.

use super::channel::{command_channel, ChannelClosed, CommandReceiver, CommandSender};
use super::command::{command_char, Command};
use crate::manager::{Flow, ProcessManager};
use crate::snapshot::OutputSink;
use std::io::{self, BufRead, Write};
use std::thread;

/// Exit status of a clean shutdown
pub const EXIT_OK: i32 = 0;

/// Exit status when the manager side died unexpectedly
pub const EXIT_FAILURE: i32 = 1;

const PROMPT: &str = "Enter Q, P, U or T";

/// Receive and dispatch commands until Terminate or a closed channel.
///
/// A closed channel is handled exactly like an explicit `T`.
pub fn run_process_manager(
    manager: &mut ProcessManager,
    receiver: &CommandReceiver,
    sink: &mut dyn OutputSink,
) -> i32 {
    loop {
        let ch = match receiver.recv() {
            Ok(ch) => ch,
            Err(ChannelClosed) => {
                sink.trace("command channel closed; terminating".to_string());
                manager.dispatch(Command::Terminate, sink);
                break;
            }
        };

        if manager.dispatch_char(ch, sink) == Flow::Exit {
            break;
        }
    }

    EXIT_OK
}

/// Read operator lines and forward their command characters.
///
/// Blank lines are rejected here and never sent. Stops after sending `T`, at
/// end of input, or when the manager has gone away; the channel is closed on
/// return.
pub fn run_commander<R: BufRead, W: Write>(
    mut input: R,
    mut console: W,
    sender: CommandSender,
) -> io::Result<()> {
    let mut line = String::new();

    loop {
        // One write, so the prompt never splits around manager output
        write!(console, "{}\n$ ", PROMPT)?;
        console.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            break;
        }

        let Some(ch) = command_char(&line) else {
            writeln!(console, "error: empty command")?;
            continue;
        };

        if sender.send(ch).is_err() {
            break;
        }

        if ch == Command::Terminate.as_char() {
            break;
        }
    }

    sender.close();
    Ok(())
}

/// Run the manager on a worker thread and the commander on this one.
///
/// Waits for the manager to finish and returns its exit status.
pub fn run_session<R, W, S>(
    mut manager: ProcessManager,
    input: R,
    console: W,
    mut sink: S,
) -> i32
where
    R: BufRead,
    W: Write,
    S: OutputSink + Send + 'static,
{
    let (sender, receiver) = command_channel();

    let handle = match thread::Builder::new()
        .name("process-manager".to_string())
        .spawn(move || run_process_manager(&mut manager, &receiver, &mut sink))
    {
        Ok(handle) => handle,
        Err(err) => {
            eprintln!("Failed to start process manager: {}", err);
            return EXIT_FAILURE;
        }
    };

    if let Err(err) = run_commander(input, console, sender) {
        eprintln!("Commander stopped: {}", err);
    }

    match handle.join() {
        Ok(status) => status,
        Err(_) => {
            eprintln!("Process manager panicked");
            EXIT_FAILURE
        }
    }
}
