use anyhow::Context;
use clap::{Arg, Command};
use fleet_import::api::ApiClient;
use fleet_import::{open_roster, run_import};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .compact()
        .with_ansi(true)
        .init();

    let cmd = Command::new("import-users")
        .about("Imports user accounts into a fleet-management database from a CSV roster")
        .after_help(
            "Roster format: username,password,organizationNodes,securityNode,firstName,lastName\n\
             Lines that are empty or start with '#' are ignored; organizationNodes may join\n\
             several names with '|'. Gzip/zstd-compressed rosters are read transparently.",
        )
        .arg(Arg::new("server").required(true).help("Server name (example: my.fleet.example.com)"))
        .arg(Arg::new("database").required(true).help("Database name"))
        .arg(Arg::new("username").required(true).help("User with user-administration access"))
        .arg(Arg::new("password").required(true).help("Password for that user"))
        .arg(
            Arg::new("file")
                .required(true)
                .value_parser(clap::value_parser!(PathBuf))
                .help("Location of the CSV roster to import"),
        );

    // usage problems exit 1, matching the rest of the fatal paths;
    // --help/--version still exit 0
    let matches = match cmd.try_get_matches() {
        Ok(matches) => matches,
        Err(err) => {
            let code = match err.kind() {
                clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => 0,
                _ => 1,
            };
            err.print()?;
            std::process::exit(code);
        }
    };

    let server = matches.get_one::<String>("server").unwrap();
    let database = matches.get_one::<String>("database").unwrap();
    let username = matches.get_one::<String>("username").unwrap();
    let password = matches.get_one::<String>("password").unwrap();
    let path = matches.get_one::<PathBuf>("file").unwrap();

    // load the roster before touching the network: an unreadable file
    // aborts the run with no remote traffic
    let candidates = open_roster(path)
        .await
        .with_context(|| format!("failed to open roster {}", path.display()))?
        .collect_candidates()
        .await
        .with_context(|| format!("failed to read roster {}", path.display()))?;
    info!(rows = candidates.len(), roster = %path.display(), "roster loaded");

    let client = ApiClient::authenticate(server, database, username, password)
        .await
        .context("authentication failed")?;
    info!("successfully authenticated");

    run_import(&client, candidates).await?;
    Ok(())
}
