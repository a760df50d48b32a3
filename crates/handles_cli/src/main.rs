//! Command-line host for the handle store.
//!
//! # Responsibility
//! - Resolve configuration from `HANDLES_*` environment variables.
//! - Validate user input, then issue one command per invocation.
//! - Print results as plain lines; the store persists on its own.

use clap::{Parser, Subcommand};
use handles_core::{
    core_version, init_logging_from_config, is_recognized_platform, open_default_store,
    validate_username_input, CoreConfig, Handle, HandlePatch, HandleStore, InputError,
    RECOGNIZED_PLATFORMS,
};
use log::warn;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "handles", about = "Track social-media handles")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Add a handle. A leading `@` on the username is dropped.
    Add { platform: String, username: String },
    /// Change the platform and/or username of a handle.
    Update {
        id: String,
        #[arg(long)]
        platform: Option<String>,
        #[arg(long)]
        username: Option<String>,
    },
    /// Delete a handle by ID.
    Remove { id: String },
    /// List handles, optionally for one platform.
    List {
        #[arg(long)]
        platform: Option<String>,
    },
    /// Show one handle by ID.
    Show { id: String },
    /// Delete every handle.
    Clear,
    /// Print the core version.
    Version,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = CoreConfig::from_env();

    if let Err(err) = init_logging_from_config(&config) {
        eprintln!("logging disabled: {err}");
    }

    match run(cli.command, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command, config: &CoreConfig) -> Result<(), InputError> {
    if let Command::Version = command {
        println!("handles_core version={}", core_version());
        return Ok(());
    }

    let mut store = open_default_store(config);
    match command {
        Command::Add { platform, username } => {
            let username = validate_username_input(&username)?;
            warn_unrecognized(&platform);
            let created = store.add(platform, &username);
            print_handle(&created);
        }
        Command::Update {
            id,
            platform,
            username,
        } => {
            let username = username
                .map(|raw| validate_username_input(&raw))
                .transpose()?;
            if let Some(platform) = platform.as_deref() {
                warn_unrecognized(platform);
            }
            if store.get_by_id(&id).is_none() {
                println!("no handle with id {id}");
            }
            store.update(id, HandlePatch { platform, username });
        }
        Command::Remove { id } => store.remove(id),
        Command::List { platform } => print_list(&store, platform.as_deref()),
        Command::Show { id } => match store.get_by_id(&id) {
            Some(handle) => print_handle(handle),
            None => println!("no handle with id {id}"),
        },
        Command::Clear => store.clear_all(),
        Command::Version => {}
    }
    Ok(())
}

fn print_list(store: &HandleStore, platform: Option<&str>) {
    let handles: Vec<&Handle> = match platform {
        Some(platform) => store.list_by_platform(platform),
        None => store.list_all().iter().collect(),
    };
    if handles.is_empty() {
        println!("No handles yet. Add one with `handles add <platform> <username>`.");
        return;
    }
    for handle in handles {
        print_handle(handle);
    }
}

fn print_handle(handle: &Handle) {
    println!(
        "{}\t{}\t{}",
        handle.id,
        handle.display_label(),
        handle.created_at
    );
}

fn warn_unrecognized(platform: &str) {
    if !is_recognized_platform(platform) {
        warn!("event=cli_input module=cli status=warn reason=unrecognized_platform");
        eprintln!(
            "note: `{platform}` is not one of {}",
            RECOGNIZED_PLATFORMS.join(", ")
        );
    }
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command};
    use clap::Parser;

    #[test]
    fn parses_update_with_optional_fields() {
        let cli = Cli::parse_from(["handles", "update", "abc", "--username", "@new"]);
        match cli.command {
            Command::Update {
                id,
                platform,
                username,
            } => {
                assert_eq!(id, "abc");
                assert_eq!(platform, None);
                assert_eq!(username.as_deref(), Some("@new"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_list_platform_filter() {
        let cli = Cli::parse_from(["handles", "list", "--platform", "twitter"]);
        assert!(matches!(
            cli.command,
            Command::List { platform: Some(ref p) } if p == "twitter"
        ));
    }
}
