use std::path::PathBuf;

use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use tidl::{cli, config, download::DownloadOptions, error, types::AudioQuality, utils};

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
    /// Log in with username and password
    Login(LoginOptions),

    /// Show or remove the stored session
    Session(SessionOptions),

    /// Search the catalog
    #[command(subcommand)]
    Search(SearchCommand),

    /// Download albums, artists, playlists, tracks or favourites
    Download(DownloadCommand),

    /// Print the metadata blocks of a FLAC file
    Inspect(InspectOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct LoginOptions {
    /// Account name, defaults to TIDAL_USERNAME
    #[clap(long, short)]
    pub username: Option<String>,

    /// Account password, defaults to TIDAL_PASSWORD
    #[clap(long, short)]
    pub password: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct SessionOptions {
    /// Remove the stored session
    #[clap(long)]
    pub logout: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum SearchCommand {
    /// Search albums
    Albums(SearchOptions),
    /// Search artists
    Artists(SearchOptions),
    /// Search tracks
    Tracks(SearchOptions),
}

#[derive(Parser, Debug, Clone)]
pub struct SearchOptions {
    pub query: String,

    /// Maximum number of results
    #[clap(long)]
    pub limit: Option<u32>,
}

#[derive(Parser, Debug, Clone)]
pub struct DownloadCommand {
    /// Root directory, defaults to TIDL_DOWNLOAD_DIR or the current directory
    #[clap(long, short, global = true)]
    pub output: Option<PathBuf>,

    /// Stream quality: lossless or hi_res
    #[clap(long, short, global = true, value_parser = utils::parse_audio_quality)]
    pub quality: Option<AudioQuality>,

    /// Do not write meta.json and album.jpg next to albums
    #[clap(long, global = true)]
    pub no_sidecars: bool,

    #[command(subcommand)]
    pub command: DownloadSubcommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum DownloadSubcommand {
    /// Download albums by id
    Album {
        #[clap(required = true)]
        ids: Vec<String>,
    },
    /// Download every album of an artist
    Artist {
        id: String,
        /// Include EPs and singles
        #[clap(long)]
        eps: bool,
    },
    /// Download every track of a playlist
    Playlist { id: String },
    /// Download tracks by id
    Track {
        #[clap(required = true)]
        ids: Vec<String>,
    },
    /// Download all favourite albums
    Favorites,
}

#[derive(Parser, Debug, Clone)]
pub struct InspectOptions {
    pub path: PathBuf,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

impl DownloadCommand {
    fn options(&self) -> DownloadOptions {
        let mut options = DownloadOptions::from_config();
        if let Some(root) = &self.output {
            options.root = root.clone();
        }
        if let Some(quality) = self.quality {
            options.quality = quality;
        }
        if self.no_sidecars {
            options.sidecars = false;
        }
        options
    }
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    match cli.command {
        Command::Login(opt) => cli::login(opt.username, opt.password).await,
        Command::Session(opt) => cli::session(opt.logout).await,
        Command::Search(search) => match search {
            SearchCommand::Albums(opt) => cli::search_albums(opt.query, opt.limit).await,
            SearchCommand::Artists(opt) => cli::search_artists(opt.query, opt.limit).await,
            SearchCommand::Tracks(opt) => cli::search_tracks(opt.query, opt.limit).await,
        },
        Command::Download(download) => {
            let options = download.options();
            match download.command {
                DownloadSubcommand::Album { ids } => cli::download_albums(ids, options).await,
                DownloadSubcommand::Artist { id, eps } => {
                    cli::download_artist(id, eps, options).await
                }
                DownloadSubcommand::Playlist { id } => cli::download_playlist(id, options).await,
                DownloadSubcommand::Track { ids } => cli::download_tracks(ids, options).await,
                DownloadSubcommand::Favorites => cli::download_favorites(options).await,
            }
        }
        Command::Inspect(opt) => cli::inspect(opt.path).await,
        Command::Completions(opt) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
