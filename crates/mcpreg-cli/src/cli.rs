use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

#[derive(Parser)]
#[command(
    author,
    version,
    about,
    help_template = "{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}",
    arg_required_else_help = true
)]
pub struct Args {
    /// Set output verbosity
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress outputs
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output as json
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Disable colors in output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Provide custom config file
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Set proxy
    #[arg(required = false, long, short = 'P', global = true)]
    pub proxy: Option<String>,

    /// Set user agent
    #[arg(required = false, long, short = 'A', global = true)]
    pub user_agent: Option<String>,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Replace the local snapshot with the current registry listing
    #[clap(name = "sync", visible_alias = "S", visible_alias = "fetch")]
    Sync {
        /// SQLite database to write
        #[arg(required = false, long, value_hint = ValueHint::FilePath)]
        db: Option<PathBuf>,

        /// Registry listing endpoint
        #[arg(required = false, long, conflicts_with = "http_file")]
        endpoint: Option<String>,

        /// Read the endpoint from a `.http` request file
        #[arg(required = false, long, value_hint = ValueHint::FilePath)]
        http_file: Option<PathBuf>,

        /// Entries requested per page
        #[arg(required = false, long)]
        page_size: Option<u32>,

        /// Read bare (unwrapped) listing entries
        #[arg(required = false, long)]
        legacy_api: bool,
    },

    /// Print the effective configuration
    Config,

    /// Print the default configuration
    #[clap(name = "defconfig")]
    DefConfig,
}
