use clap::{Parser, error::ErrorKind};
use std::{env, process};

#[derive(Parser, Debug)]
#[command(
    name = "netns-run",
    about = "Create a new empty network namespace (plus user and mount namespaces) and run a command inside it"
)]
pub struct Config {
    #[arg(short = 'D', help = "Print debug diagnostics to stderr")]
    pub debug: bool,

    #[arg(
        value_name = "COMMAND",
        trailing_var_arg = true,
        help = "Command to run inside the namespaces, followed by its arguments"
    )]
    pub command: Vec<String>,
}

impl Config {
    /// Parses the process arguments, terminating with a usage error when no
    /// command is left over or a flag is not recognized.
    pub fn from_args() -> Self {
        let argv: Vec<String> = env::args().collect();

        let config = match Config::try_parse_from(&argv) {
            Ok(config) => config,
            Err(error) if error.kind() == ErrorKind::DisplayHelp => error.exit(),
            Err(error) => usage_error(&argv, error.to_string().trim_end()),
        };

        if config.command.is_empty() {
            usage_error(&argv, "No command specified");
        }

        config
    }
}

/// Prints the offending input, a usage synopsis, and the argument vector as
/// supplied, then terminates. Usage errors are never recoverable.
pub fn usage_error(argv: &[String], message: &str) -> ! {
    let program = argv.first().map(String::as_str).unwrap_or("netns-run");

    eprintln!("{message}");
    eprintln!();
    eprintln!("Create a new empty network namespace (plus user and mount namespaces)");
    eprintln!("Usage: {program} [-D] [--] command [args...]");

    let mut provided = String::from("  provided:");
    for arg in argv {
        provided.push(' ');
        provided.push_str(arg);
    }
    eprintln!("{provided}");

    eprintln!();
    eprintln!("Mandatory arguments:");
    eprintln!("  [--] command to run inside the namespaces, followed by arguments");
    eprintln!();
    eprintln!("Optional arguments:");
    eprintln!("  -D if set, debug info will be printed");

    process::exit(1);
}

#[macro_export]
macro_rules! debug_print {
    ($config:expr, $($arg:tt)*) => {{
        if $config.debug {
            eprintln!("netns-run: {}", format_args!($($arg)*));
        }
    }};
}
