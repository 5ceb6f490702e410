mod app;
mod commands;
mod output;

use clap::Parser;

use crate::app::{Cli, Command};

fn main() -> anyhow::Result<()> {
    ctrlc::set_handler(|| {
        eprintln!("\nCancelled.");
        std::process::exit(130);
    })?;

    let cli = Cli::parse();

    // Library logs go to stderr unless --json. --verbose enables debug and RUST_LOG overrides both.
    if !cli.global.json {
        let level = if cli.global.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        };
        env_logger::Builder::new()
            .filter_module("mockrunner", level)
            .parse_default_env()
            .target(env_logger::Target::Stderr)
            .format_timestamp(None)
            .format_module_path(false)
            .format_target(false)
            .init();
    }

    match &cli.command {
        Command::Show { path } => commands::show::run(path, &cli.global),
        Command::Check { path } => commands::check::run(path, &cli.global),
        Command::Add {
            path,
            target,
            value,
            return_type,
            throw,
            exception_type,
            message,
            disabled,
        } => commands::edit::add(
            path,
            &commands::edit::AddOptions {
                target,
                value: value.as_deref(),
                return_type,
                throw: *throw,
                exception_type,
                message,
                disabled: *disabled,
            },
            &cli.global,
        ),
        Command::Remove { path, target } => commands::edit::remove(path, target, &cli.global),
        Command::Coerce { return_type, value } => {
            commands::coerce::run(return_type, value.as_deref(), &cli.global)
        }
        Command::Sample { return_type } => commands::sample::run(return_type, &cli.global),
    }
}
