use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use spotlike::{cli, config, error, types::ContentKind};

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
    /// Authorize with Spotify API
    Auth,

    /// Search artists, albums and tracks
    Search(SearchOptions),

    /// Add artists, albums or tracks to your library
    Like(LikeOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct SearchOptions {
    /// Free-text query
    #[clap(required_unless_present = "id")]
    pub query: Option<String>,

    /// Resolve a Spotify ID instead of searching
    #[clap(long, conflicts_with_all = ["query", "kind", "limit"])]
    pub id: Option<String>,

    /// Restrict the search to one kind
    #[clap(long = "type", value_enum)]
    pub kind: Option<ContentKind>,

    /// Results per kind
    #[clap(long)]
    pub limit: Option<u32>,
}

#[derive(Parser, Debug, Clone)]
pub struct LikeOptions {
    /// What to like
    #[clap(value_enum)]
    pub target: cli::LikeTarget,

    /// Spotify ID of the artist, album or track
    pub id: String,

    /// Like even when already liked
    #[clap(long)]
    pub force: bool,
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
        Command::Auth => cli::auth().await,
        Command::Search(opt) => cli::search(opt.query, opt.id, opt.kind, opt.limit).await,
        Command::Like(opt) => cli::like(opt.target, opt.id, opt.force).await,
        Command::Completions(opt) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
