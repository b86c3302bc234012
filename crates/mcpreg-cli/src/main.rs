use std::path::PathBuf;

use clap::Parser;
use cli::{Args, Commands};
use error::CliResult;
use logging::setup_logging;
use mcpreg_config::{http_file::endpoint_from_http_file, ApiShape, Config};
use mcpreg_core::Ingestor;
use tracing::{debug, info};

mod cli;
mod error;
mod logging;
mod utils;

/// Overrides taken from `mcpreg sync` flags.
#[derive(Default)]
struct SyncOverrides {
    db: Option<PathBuf>,
    endpoint: Option<String>,
    http_file: Option<PathBuf>,
    page_size: Option<u32>,
    legacy_api: bool,
}

/// Loads the config file and layers global flags on top.
fn load_config(args: &Args) -> CliResult<Config> {
    let mut config = Config::load(args.config.as_deref())?;

    if let Some(proxy) = &args.proxy {
        config.proxy = Some(proxy.clone());
    }
    if let Some(user_agent) = &args.user_agent {
        config.user_agent = Some(user_agent.clone());
    }

    Ok(config)
}

fn apply_sync_overrides(config: &mut Config, overrides: SyncOverrides) -> CliResult<()> {
    if let Some(db) = overrides.db {
        config.db_path = db;
    }
    if let Some(path) = overrides.http_file {
        config.endpoint = endpoint_from_http_file(&path)?;
        debug!("Using endpoint {} from {}", config.endpoint, path.display());
    }
    if let Some(endpoint) = overrides.endpoint {
        config.endpoint = endpoint;
    }
    if let Some(page_size) = overrides.page_size {
        config.page_size = page_size;
    }
    if overrides.legacy_api {
        config.api = ApiShape::legacy();
    }

    config.validate()?;
    Ok(())
}

fn handle_cli() -> CliResult<()> {
    let args = Args::parse();

    if args.no_color {
        utils::set_color(false);
    }
    setup_logging(&args);

    let mut config = load_config(&args)?;

    match args.command {
        Commands::Sync {
            db,
            endpoint,
            http_file,
            page_size,
            legacy_api,
        } => {
            apply_sync_overrides(
                &mut config,
                SyncOverrides {
                    db,
                    endpoint,
                    http_file,
                    page_size,
                    legacy_api,
                },
            )?;

            let report = Ingestor::from_config(config)?.run()?;
            info!("Processed {} servers", report.processed);
        }
        Commands::Config => {
            info!("{}", config.to_toml()?);
        }
        Commands::DefConfig => {
            info!("{}", Config::default().to_toml()?);
        }
    }

    Ok(())
}

fn main() {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .build(),
        )
    }))
    .ok();

    if let Err(err) = handle_cli() {
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;
    use crate::error::CliError;

    #[test]
    fn test_sync_overrides() {
        let mut config = Config::default();
        apply_sync_overrides(
            &mut config,
            SyncOverrides {
                db: Some(PathBuf::from("snapshot.db")),
                endpoint: Some("http://localhost:8080/v0/servers".into()),
                page_size: Some(10),
                legacy_api: true,
                ..SyncOverrides::default()
            },
        )
        .unwrap();

        assert_eq!(config.db_path, PathBuf::from("snapshot.db"));
        assert_eq!(config.endpoint, "http://localhost:8080/v0/servers");
        assert_eq!(config.page_size, 10);
        assert_eq!(config.api, ApiShape::legacy());
    }

    #[test]
    fn test_sync_overrides_from_http_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("get_servers.http");
        fs::write(&path, "GET http://localhost:8080/v0/servers?limit=5\n").unwrap();

        let mut config = Config::default();
        apply_sync_overrides(
            &mut config,
            SyncOverrides {
                http_file: Some(path),
                ..SyncOverrides::default()
            },
        )
        .unwrap();

        assert_eq!(config.endpoint, "http://localhost:8080/v0/servers?limit=5");
    }

    #[test]
    fn test_sync_overrides_are_validated() {
        let mut config = Config::default();
        let result = apply_sync_overrides(
            &mut config,
            SyncOverrides {
                page_size: Some(0),
                ..SyncOverrides::default()
            },
        );

        assert!(matches!(result, Err(CliError::Config(_))));
    }
}
