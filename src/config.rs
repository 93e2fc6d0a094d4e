//! Command-line configuration

use crate::manager::constants::{DEFAULT_TABLE_CAPACITY, INIT_PROGRAM};
use std::fmt;
use std::path::PathBuf;

/// Largest PCB table the simulator accepts
pub const MAX_TABLE_CAPACITY: usize = 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory program names are resolved against
    pub program_dir: PathBuf,
    /// Program loaded as process 0
    pub init_program: String,
    pub table_capacity: usize,
    /// Run the terminal UI instead of the line commander
    pub tui: bool,
    /// Print per-instruction trace lines
    pub trace: bool,
    pub color: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            program_dir: PathBuf::from("."),
            init_program: INIT_PROGRAM.to_string(),
            table_capacity: DEFAULT_TABLE_CAPACITY,
            tui: false,
            trace: true,
            color: true,
        }
    }
}

/// What the binary should do after argument parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    Run(Config),
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    UnknownFlag(String),
    MissingValue(String),
    InvalidCapacity(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::UnknownFlag(flag) => write!(f, "Unknown option '{}'", flag),
            ConfigError::MissingValue(flag) => write!(f, "Option '{}' needs a value", flag),
            ConfigError::InvalidCapacity(value) => write!(
                f,
                "Invalid capacity '{}' (expected 1..={})",
                value, MAX_TABLE_CAPACITY
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    /// Parse arguments, excluding the program name
    pub fn from_args<I>(args: I) -> Result<Invocation, ConfigError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut config = Config::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "-h" | "--help" => return Ok(Invocation::Help),
                "-d" | "--dir" => {
                    config.program_dir = PathBuf::from(Self::value(&mut args, &arg)?);
                }
                "--init" => config.init_program = Self::value(&mut args, &arg)?,
                "--capacity" => {
                    let value = Self::value(&mut args, &arg)?;
                    config.table_capacity = match value.parse::<usize>() {
                        Ok(n) if (1..=MAX_TABLE_CAPACITY).contains(&n) => n,
                        _ => return Err(ConfigError::InvalidCapacity(value)),
                    };
                }
                "--tui" => config.tui = true,
                "-q" | "--quiet" => config.trace = false,
                "--no-color" => config.color = false,
                _ => return Err(ConfigError::UnknownFlag(arg.clone())),
            }
        }

        Ok(Invocation::Run(config))
    }

    fn value(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<String, ConfigError> {
        args.next()
            .ok_or_else(|| ConfigError::MissingValue(flag.to_string()))
    }
}

pub fn usage(program_name: &str) -> String {
    format!(
        "Usage: {} [options]\n\
         \n\
         Options:\n\
         \x20 -d, --dir <path>     directory holding program files (default .)\n\
         \x20     --init <name>    program loaded as process 0 (default init)\n\
         \x20     --capacity <n>   PCB table size (default {})\n\
         \x20     --tui            interactive terminal UI\n\
         \x20 -q, --quiet          hide per-instruction trace\n\
         \x20     --no-color       plain console output\n\
         \x20 -h, --help           show this help",
        program_name, DEFAULT_TABLE_CAPACITY
    )
}
