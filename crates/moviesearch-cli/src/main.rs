use clap::{ArgAction, Parser, Subcommand};
use commands::{browse, clear, config, poster, recent, search};
use std::path::PathBuf;

mod commands;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "moviesearch")]
#[command(about = "MovieSearch - Search The Movie Database from your terminal")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search movies by title
    #[command(long_about = "Search movies by title and print the results. Cached pages are shown immediately and replaced by fresh results once the API answers. Use --pages to load more than the first page.")]
    Search {
        /// Text to search for
        query: String,

        /// Number of result pages to load
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        pages: u32,
    },
    /// Interactive search session
    #[command(long_about = "Start an interactive session: pick one of your recent searches or type a new one, page through the results and open a movie to see its details.")]
    Browse,
    /// Show recent searches
    #[command(long_about = "List the queries of your most recent successful searches, newest first.")]
    Recent {
        /// Maximum number of queries to show (defaults to storage.recent_queries_to_show)
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Download a movie poster
    #[command(long_about = "Download a poster image by its TMDB poster path (e.g. /abc.jpg). The width is rounded to the closest size the image service offers.")]
    Poster {
        /// Poster path as returned by a search (e.g. /abc.jpg)
        path: String,

        /// Requested width in pixels
        #[arg(long, default_value_t = 342)]
        width: u32,

        /// File to write the image to
        #[arg(long, value_name = "FILE")]
        out: PathBuf,
    },
    /// Manage configuration and the API key
    #[command(long_about = "Manage configuration and credentials for MovieSearch. Running without a subcommand shows the current configuration.")]
    Config {
        #[command(subcommand)]
        cmd: Option<ConfigCommands>,
    },
    /// Clear persisted data
    #[command(long_about = "Clear persisted data. Use --cache to clear cached search responses, --recent to clear recent searches, or --all to clear both.")]
    Clear {
        /// Clear cached responses and recent searches
        #[arg(long, action = ArgAction::SetTrue)]
        all: bool,

        /// Clear cached search responses
        #[arg(long, action = ArgAction::SetTrue)]
        cache: bool,

        /// Clear recent searches
        #[arg(long, action = ArgAction::SetTrue)]
        recent: bool,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show current configuration (masks the API key)
    #[command(long_about = "Display the current configuration and where the API key comes from. The key itself is masked unless --full is given.")]
    Show {
        /// Show the API key unmasked
        #[arg(long, action = ArgAction::SetTrue)]
        full: bool,
    },

    /// Write a configuration file with default settings
    #[command(long_about = "Create config.toml with default settings. An existing file is only replaced with --force.")]
    Init {
        /// Overwrite an existing configuration file
        #[arg(long, action = ArgAction::SetTrue)]
        force: bool,
    },

    /// Store the TMDB API key
    #[command(long_about = "Store the TMDB API key in the credentials file. If no key is given you will be prompted for it. Use --clear to remove a stored key.")]
    ApiKey {
        /// API key (if not provided, will prompt)
        key: Option<String>,

        /// Remove the stored key
        #[arg(long, action = ArgAction::SetTrue, conflicts_with = "key")]
        clear: bool,
    },
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    // The log file location lives in the config; a broken config is reported by the command itself
    let log_file = commands::configured_log_file();
    logging::init_logging_with_file(cli.verbose, cli.quiet, log_file)
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let output = output::Output::new(cli.output, cli.quiet);

    match cli.command {
        Commands::Search { query, pages } => search::run_search(&query, pages, &output).await,
        Commands::Browse => browse::run_browse(&output).await,
        Commands::Recent { limit } => recent::run_recent(limit, &output).await,
        Commands::Poster { path, width, out } => poster::run_poster(&path, width, &out, &output).await,
        Commands::Config { cmd } => {
            let cmd = cmd.unwrap_or(ConfigCommands::Show { full: false });
            config::run_config(cmd, &output).await
        }
        Commands::Clear { all, cache, recent } => clear::run_clear(all, cache, recent, &output).await,
    }
}
