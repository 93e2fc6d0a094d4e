// procsim: single-CPU process scheduler simulator

use std::io;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use procsim::commander::{run_session, EXIT_FAILURE, EXIT_OK};
use procsim::config::{usage, Config, Invocation};
use procsim::manager::ProcessManager;
use procsim::program::FileLoader;
use procsim::snapshot::ConsoleSink;
use procsim::ui::App;

/// Exit status for bad command-line arguments
const EXIT_USAGE: i32 = 2;

fn main() {
    let mut args = std::env::args();
    let program_name = args.next().unwrap_or_else(|| "procsim".to_string());

    let config = match Config::from_args(args) {
        Ok(Invocation::Run(config)) => config,
        Ok(Invocation::Help) => {
            println!("{}", usage(&program_name));
            std::process::exit(EXIT_OK);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!();
            eprintln!("{}", usage(&program_name));
            std::process::exit(EXIT_USAGE);
        }
    };

    // Boot: load init as process 0 before any command is accepted
    let loader = FileLoader::new(&config.program_dir);
    let manager =
        match ProcessManager::boot_with(loader, &config.init_program, config.table_capacity) {
            Ok(manager) => manager,
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(EXIT_FAILURE);
            }
        };

    let status = if config.tui {
        match run_tui(manager) {
            Ok(()) => EXIT_OK,
            Err(e) => {
                eprintln!("Error: {}", e);
                EXIT_FAILURE
            }
        }
    } else {
        let sink = ConsoleSink::stdout(config.color, config.trace);
        run_session(manager, io::stdin().lock(), io::stdout(), sink)
    };

    std::process::exit(status);
}

fn run_tui(manager: ProcessManager) -> io::Result<()> {
    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(manager);
    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if app.manager.is_terminated() {
        println!("{}", app.manager.accounting().summary());
    }

    res
}
