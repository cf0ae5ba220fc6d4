use clap::{ArgAction, Parser, Subcommand};
use commands::{clear, config, search, show, watched, Context};
use std::path::PathBuf;

mod commands;
mod logging;
mod output;
mod progress;
mod tui;

#[derive(Parser)]
#[command(name = "popcorn")]
#[command(about = "usePopcorn - Search movies and keep a list of the ones you've watched")]
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

    /// Config file to use instead of the default location
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive terminal UI (default)
    #[command(long_about = "Open the interactive terminal UI: type to search, open a movie to see its details, rate it and add it to your watched list.")]
    Tui,
    /// Search movies by title
    Search {
        /// Title to search for
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
    /// Show full details for one movie
    Show {
        /// IMDb id, e.g. tt0133093
        imdb_id: String,
    },
    /// Rate a movie and add it to the watched list
    #[command(long_about = "Fetch the movie, rate it and add it to the watched list. Without --rating you are asked for one. A movie can only be added once.")]
    Add {
        /// IMDb id, e.g. tt0133093
        imdb_id: String,

        /// Your rating (1 to ui.max_rating)
        #[arg(long, short)]
        rating: Option<u8>,

        /// Don't ask for confirmation
        #[arg(long, short, action = ArgAction::SetTrue)]
        yes: bool,
    },
    /// Remove a movie from the watched list
    Remove {
        /// IMDb id, e.g. tt0133093
        imdb_id: String,
    },
    /// List watched movies
    List,
    /// Averages over the watched list
    Summary,
    /// Show or change configuration
    #[command(long_about = "Manage the configuration file. Running without a subcommand shows the current configuration.")]
    Config {
        #[command(subcommand)]
        cmd: Option<ConfigCommands>,
    },
    /// Remove every movie from the watched list
    Clear {
        /// Don't ask for confirmation
        #[arg(long, short, action = ArgAction::SetTrue)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show current configuration (masks the API key)
    Show {
        /// Show the API key unmasked
        #[arg(long, action = ArgAction::SetTrue)]
        full: bool,
    },

    /// Store the OMDb API key
    #[command(long_about = "Store the OMDb API key in the config file. Get a free key at https://www.omdbapi.com/apikey.aspx. The POPCORN_OMDB_API_KEY environment variable takes precedence over the stored key.")]
    SetKey {
        /// API key (if not provided, will prompt)
        key: Option<String>,
    },

    /// Write a config file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long, action = ArgAction::SetTrue)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Tui);
    let ctx = Context::new(cli.config);

    // The TUI owns the terminal, so its logs go to a file
    let log_file = matches!(command, Commands::Tui).then(|| ctx.paths.tui_log_file());
    logging::init_logging_with_file(cli.verbose, cli.quiet, log_file)
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let output = output::Output::new(cli.output, cli.quiet);

    match command {
        Commands::Tui => tui::run(&ctx).await,
        Commands::Search { query } => search::run_search(&ctx, &query.join(" "), &output).await,
        Commands::Show { imdb_id } => show::run_show(&ctx, &imdb_id, &output).await,
        Commands::Add { imdb_id, rating, yes } => watched::run_add(&ctx, &imdb_id, rating, yes, &output).await,
        Commands::Remove { imdb_id } => watched::run_remove(&ctx, &imdb_id, &output),
        Commands::List => watched::run_list(&ctx, &output),
        Commands::Summary => watched::run_summary(&ctx, &output),
        Commands::Config { cmd } => {
            let cmd = cmd.unwrap_or(ConfigCommands::Show { full: false });
            config::run_config(&ctx, cmd, &output)
        }
        Commands::Clear { yes } => clear::run_clear(&ctx, yes, &output),
    }
}
