use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};
use tracing_subscriber::EnvFilter;

use pumpkin::{cli, config, error};

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
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run the share HTTP server
    Serve(ServeOptions),

    /// Import a Spotify library and create a share
    Import(ImportOptions),

    /// Show tracks of a share
    Tracks(TracksOptions),

    /// Show the owner of a share
    User(UserOptions),

    /// Like tracks of a shared library
    Like(LikeOptions),

    /// Show liked tracks
    Likes(LikesOptions),

    #[clap(about = "Create a private playlist from track ids or from the likes")]
    CreatePlaylist(CreatePlaylistOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct ServeOptions {
    /// Keep the cache in memory instead of the cache directory
    #[clap(long)]
    pub in_memory: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct ImportOptions {
    /// Spotify access token
    #[clap(long)]
    pub token: String,

    /// Exchange this refresh token for a fresh access token first
    #[clap(long)]
    pub refresh_token: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct TracksOptions {
    pub share_id: String,
    #[clap(long)]
    pub limit: Option<usize>,
    #[clap(long)]
    pub offset: Option<usize>,
}

#[derive(Parser, Debug, Clone)]
pub struct UserOptions {
    pub share_id: String,
}

#[derive(Parser, Debug, Clone)]
pub struct LikeOptions {
    /// Listener who likes the tracks
    #[clap(long)]
    pub user_id: String,
    /// Owner of the shared library the tracks come from
    #[clap(long)]
    pub library_user_id: String,
    /// Track id; can be repeated
    #[clap(long = "track", num_args = 1, required = true)]
    pub track_ids: Vec<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct LikesOptions {
    pub user_id: String,
}

#[derive(Parser, Debug, Clone)]
pub struct CreatePlaylistOptions {
    #[clap(long)]
    pub token: String,
    #[clap(long)]
    pub user_id: String,
    #[clap(long)]
    pub name: String,
    /// Track id; can be repeated. Without any, the liked tracks are used
    #[clap(long = "track", num_args = 1)]
    pub track_ids: Vec<String>,
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

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pumpkin=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = match config::Config::from_env() {
        Ok(config) => config,
        Err(e) => error!("Invalid configuration. Err: {}", e),
    };

    let args = Cli::parse();

    match args.command {
        Command::Serve(opt) => cli::serve(&config, opt.in_memory).await,
        Command::Import(opt) => cli::import(&config, opt.token, opt.refresh_token).await,
        Command::Tracks(opt) => cli::tracks(&config, opt.share_id, opt.limit, opt.offset).await,
        Command::User(opt) => cli::user(&config, opt.share_id).await,
        Command::Like(opt) => {
            cli::like(&config, opt.user_id, opt.library_user_id, opt.track_ids).await
        }
        Command::Likes(opt) => cli::likes(&config, opt.user_id).await,
        Command::CreatePlaylist(opt) => {
            cli::create_playlist(&config, opt.token, opt.user_id, opt.name, opt.track_ids).await
        }
        Command::Completions(opt) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
