mod categorizer;
mod cli;
mod diff;
mod editor;
mod error;
mod fmt;
mod ledger;
mod lint;
mod models;
mod parser;
mod reports;
mod select;
mod settings;
mod validators;

use std::io::IsTerminal;

use clap::{CommandFactory, Parser};
use tracing_subscriber::{prelude::*, EnvFilter};

use cli::lint::LintFlags;
use cli::{Cli, Commands};
use error::Result;
use settings::{load_settings, Settings};

fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("purse=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("purse=warn"))
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

fn dispatch(cli: Cli, settings: &Settings) -> Result<i32> {
    let profile = settings.profile_path(cli.profile.as_deref());

    match cli.command {
        Commands::Lint {
            rules,
            no_errors,
            no_warnings,
            no_unique_errors,
        } => {
            if rules {
                return cli::lint::rules();
            }
            let flags = LintFlags {
                no_errors,
                no_warnings,
                no_unique_errors,
            };
            cli::lint::run(settings, &profile, &flags)
        }
        Commands::Show(args) => cli::show::run(settings, &profile, &args),
        Commands::Edit { sort } => cli::edit::run(&profile, sort),
        Commands::Config { edit } => {
            if edit {
                cli::config::edit(settings)
            } else {
                cli::config::show(settings)
            }
        }
        Commands::Demo(args) => cli::demo::run(settings, &profile, &args),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "purse", &mut std::io::stdout());
            Ok(0)
        }
        Commands::Version => {
            println!("purse {}", env!("CARGO_PKG_VERSION"));
            Ok(0)
        }
    }
}

fn main() {
    let settings = match load_settings() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let builtins: Vec<String> = Cli::command()
        .get_subcommands()
        .map(|c| c.get_name().to_string())
        .collect();
    let builtins: Vec<&str> = builtins.iter().map(String::as_str).collect();
    let args = cli::alias::expand(std::env::args().collect(), &settings.aliases, &builtins);

    let cli = Cli::parse_from(args);
    init_tracing(cli.debug);
    if !std::io::stdout().is_terminal() {
        colored::control::set_override(false);
    }
    tracing::debug!(?cli, "starting");

    match dispatch(cli, &settings) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
