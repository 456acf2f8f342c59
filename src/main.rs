//! `prefstore` - inspect and edit a preferences document from the shell.

use std::{error::Error, path::PathBuf, process};

use clap::Parser;
use prefstore::{
    cli::{CliService, formatting::format_error},
    config::{Config, ConfigPaths},
    shared, tracing_config,
};
use tracing::debug;

#[derive(Parser)]
#[command(
    name = "prefstore",
    version,
    about = "Persistent preferences with recompute-on-read dynamic entries"
)]
struct Cli {
    /// Configuration file (defaults to $XDG_CONFIG_HOME/prefstore/config.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Directory of the preferences document (overrides the configuration)
    #[arg(long, value_name = "DIR")]
    dir: Option<PathBuf>,

    /// Filename of the preferences document (overrides the configuration)
    #[arg(long, value_name = "NAME")]
    file: Option<String>,

    /// Also write daily-rotated log files
    #[arg(long)]
    log_file: bool,

    /// <category> <command> [args..]; `help` lists every command
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{}", format_error(&e.to_string()));
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let mut config = load_config(cli.config.as_deref())?;
    if let Some(dir) = cli.dir {
        config.store.directory = Some(dir);
    }
    if let Some(file) = cli.file {
        config.store.filename = file;
    }

    if cli.log_file || config.general.log_to_file {
        tracing_config::init_with_file(config.general.log_level, &ConfigPaths::log_dir()?)?;
    } else {
        tracing_config::init(config.general.log_level)?;
    }

    let store = shared::open_shared_with(config.store.location()?, config.store.options())?;
    let service = CliService::new(store);

    let category = cli.args.first().map_or("help", String::as_str);
    if matches!(category, "help" | "--help" | "-h") {
        println!("{}", service.help());
        return Ok(());
    }

    let command = cli.args.get(1).map_or("", String::as_str);
    let command_args = cli.args.get(2..).unwrap_or(&[]);
    debug!(category, command, args = ?command_args, "Running command");

    let output = service.execute_command(category, command, command_args)?;
    if !output.trim().is_empty() {
        println!("{output}");
    }

    Ok(())
}

fn load_config(path: Option<&std::path::Path>) -> Result<Config, Box<dyn Error>> {
    match path {
        Some(path) => Ok(Config::load(path)?),
        None => Ok(Config::load(&ConfigPaths::main_config()?)?),
    }
}
