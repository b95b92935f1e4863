use std::sync::Arc;

use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use plsync::{cli, config, error, service::ServiceKind, types::PkceToken, warning};
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
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
#[command(args_conflicts_with_subcommands = true)] // transfer flags or a subcommand, never both
struct Cli {
    /// Service to read playlists from
    #[clap(long, value_enum)]
    source: Option<ServiceKind>,

    /// Service to create playlists on
    #[clap(long, value_enum)]
    destination: Option<ServiceKind>,

    /// Playlist name, or --all for every playlist
    #[clap(long, allow_hyphen_values = true)]
    playlist: Option<String>,

    /// Concurrent track lookups per playlist
    #[clap(long, value_parser = clap::value_parser!(u16).range(1..))]
    workers: Option<u16>,

    #[clap(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Authorize with Spotify API and cache the token
    Auth,

    /// Get shell completions
    Completions(CompletionsOption),
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
        Some(Command::Auth) => {
            let oauth_result: Arc<Mutex<Option<PkceToken>>> = Arc::new(Mutex::new(None));
            if let Err(e) = cli::auth(Arc::clone(&oauth_result)).await {
                error!("{}", e);
            }
        }
        Some(Command::Completions(opt)) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
        None => {
            let (Some(source), Some(destination), Some(playlist)) =
                (cli.source, cli.destination, cli.playlist)
            else {
                Cli::command()
                    .error(
                        clap::error::ErrorKind::MissingRequiredArgument,
                        "--source, --destination and --playlist are required",
                    )
                    .exit();
            };

            let workers = cli.workers.map(usize::from);
            match cli::sync(source, destination, &playlist, workers).await {
                Ok(()) => {}
                Err(e) if e.is_fatal() => error!("{}", e),
                Err(e) => warning!("{}", e),
            }
        }
    }
}
