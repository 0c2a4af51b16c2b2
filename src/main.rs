use std::sync::Arc;

use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use moodyfy::{
    cli, config, error,
    types::{GenerateParams, PendingAuth},
};
use tokio::sync::Mutex;

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Authorize with Spotify API
    Auth,

    /// Generate a playlist from a mood description
    Generate(GenerateOptions),

    /// Save a generated playlist to your Spotify account
    Save(SaveOptions),

    /// List generated playlists
    History,

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct GenerateOptions {
    /// How you feel, in your own words
    #[clap(long, short)]
    pub mood: String,

    /// Maximum number of tracks
    #[clap(long, default_value_t = 20, value_parser = clap::value_parser!(u16).range(1..=100))]
    pub length: u16,

    /// Songs per artist (1 = very diverse, 5 = very focused)
    #[clap(long, default_value_t = 2, value_parser = clap::value_parser!(u8).range(1..=5))]
    pub diversity: u8,

    /// Minimum popularity (0-100) for Spotify recommendations
    #[clap(long, default_value_t = 50, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub popularity: u8,

    /// Use your recently played tracks as context (requires auth)
    #[clap(long)]
    pub history: bool,

    /// Save the playlist to Spotify right away (requires auth)
    #[clap(long)]
    pub save: bool,

    /// Override the generated playlist name
    #[clap(long)]
    pub name: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct SaveOptions {
    /// Playlist number as shown by `history`
    #[clap(long)]
    pub index: usize,

    /// Rename the playlist before saving
    #[clap(long)]
    pub name: Option<String>,

    /// Print the result as JSON ({playlistId, playlistUrl, warning})
    #[clap(long)]
    pub json: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    match cli.command {
        Command::Auth => {
            let oauth_state: Arc<Mutex<Option<PendingAuth>>> = Arc::new(Mutex::new(None));
            cli::auth(Arc::clone(&oauth_state)).await;
        }
        Command::Generate(opt) => {
            let params = GenerateParams {
                length: usize::from(opt.length),
                diversity: usize::from(opt.diversity),
                popularity: opt.popularity,
                include_history: opt.history,
            };
            cli::generate(opt.mood, params, opt.save, opt.name).await
        }
        Command::Save(opt) => cli::save(opt.index, opt.name, opt.json).await,
        Command::History => cli::history().await,
        Command::Completions(opt) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
