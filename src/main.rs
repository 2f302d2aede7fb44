mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use tracing::Level;
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbose {
            0 => Level::WARN,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    // RUST_LOG overrides the flags
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let profiles_dir = cli.profiles_dir.as_deref();

    match cli.command {
        Commands::Profile => commands::list_profiles(profiles_dir),
        Commands::Show {
            source,
            query,
            output,
        } => commands::show(&source, profiles_dir, &query, output),
        Commands::Get { source, key, json } => {
            commands::get_value(&source, profiles_dir, &key, json)
        }
        Commands::Set {
            source,
            key,
            value,
            value_type,
            force,
        } => commands::set_value(&source, profiles_dir, &key, &value, value_type, force),
        Commands::Unset { source, key, force } => {
            commands::unset_value(&source, profiles_dir, &key, force)
        }
        Commands::Check { source } => commands::check(&source, profiles_dir),
        Commands::Fmt { source, check } => commands::format_file(&source, profiles_dir, check),
        Commands::Diff { old, new, output } => commands::diff_files(&old, &new, output),
        Commands::Scan { root, max_depth } => commands::scan(&root, max_depth),
    }
}
