mod config;
mod constants;
mod error;
mod feed;
mod intent;
mod logging;
mod pages;
mod render;
mod settings;
mod storage;
mod youtube;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, CommandFactory, Parser, Subcommand};
use tracing::info;

use config::Config;
use intent::{Route, resolve};
use pages::{Loaded, home_document, load_home, load_search, search_document, watch_document, write_page};
use storage::FileStore;
use youtube::YouTubeClient;

// --- CLI ---

#[derive(Parser, Debug)]
#[command(author, version = env!("CARGO_PKG_VERSION"), about, long_about = None)]
struct Args {
  /// Directory rendered pages are written to (default: preferences, then the data directory)
  #[arg(long, global = true)]
  out: Option<PathBuf>,

  /// Raise log verbosity (-v debug, -vv trace)
  #[arg(short, long, action = ArgAction::Count, global = true)]
  verbose: u8,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Manage the stored API key
  Settings {
    #[command(subcommand)]
    action: SettingsAction,
  },
  /// Render the popular feed into index.html (cached for 5 minutes)
  Home {
    /// Ignore the cached feed and fetch again
    #[arg(long)]
    refresh: bool,
  },
  /// Search and render the results into search.html
  Search {
    #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
    query: Vec<String>,
  },
  /// Render the player page for a video id into watch.html
  Watch {
    #[arg(allow_hyphen_values = true)]
    id: String,
  },
  /// Open a watch URL, short link, video id, or search text
  Open {
    #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
    input: Vec<String>,
  },
  /// Print the page link an input resolves to, without opening it
  Resolve {
    #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
    input: Vec<String>,
  },
  /// Show or change saved preferences
  Config {
    /// Data API base URL
    #[arg(long)]
    api_base: Option<String>,
    /// Default output directory for rendered pages
    #[arg(long)]
    output_dir: Option<String>,
    /// Request timeout in seconds (0 removes the timeout)
    #[arg(long)]
    timeout_secs: Option<u64>,
  },
  /// Print shell completions
  Completions { shell: clap_complete::Shell },
}

#[derive(Subcommand, Debug)]
enum SettingsAction {
  /// Save the API key used for all requests
  SetKey { key: String },
  /// Show whether an API key is saved
  Show,
}

// --- Shell ---

/// Performs navigation: each route becomes a page written to `out_dir`.
struct Shell {
  config: Config,
  store: FileStore,
  out_dir: PathBuf,
}

impl Shell {
  fn open(config: Config, out: Option<PathBuf>) -> Result<Self> {
    let storage_path = config::storage_path().context("Could not determine a data directory")?;
    let store = FileStore::open(&storage_path).with_context(|| format!("Failed to open {}", storage_path.display()))?;
    let out_dir = config.output_dir(out).context("Could not determine an output directory")?;
    Ok(Self { config, store, out_dir })
  }

  fn client(&self) -> Result<YouTubeClient> {
    YouTubeClient::new(self.config.api_base(), self.config.request_timeout()).context("Failed to build HTTP client")
  }

  async fn navigate(&mut self, route: &Route) -> Result<PathBuf> {
    match route {
      Route::Home => self.home(false).await,
      Route::Search { text } => {
        let api = self.client()?;
        let loaded = load_search(&self.store, &api, text).await;
        report(&loaded);
        write_page(&self.out_dir, route, &search_document(text, &loaded.container))
      }
      Route::Watch { id } => write_page(&self.out_dir, route, &watch_document(id)),
    }
  }

  async fn home(&mut self, refresh: bool) -> Result<PathBuf> {
    let api = self.client()?;
    let loaded = load_home(&mut self.store, &api, refresh).await;
    report(&loaded);
    write_page(&self.out_dir, &Route::Home, &home_document(&loaded.container))
  }
}

fn report(loaded: &Loaded) {
  if let Some(ref problem) = loaded.problem {
    eprintln!("{}", problem);
  }
}

// --- Main ---

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
  let args = Args::parse();
  let _log_guard = logging::init(args.verbose);
  info!(command = ?args.command, "ytweb starting");

  let config = Config::load();

  match args.command {
    Command::Settings { action } => {
      let mut shell = Shell::open(config, args.out)?;
      match action {
        SettingsAction::SetKey { key } => {
          settings::save_api_key(&mut shell.store, &key)?;
          println!("API key saved!");
        }
        SettingsAction::Show => {
          match settings::load_api_key(&shell.store) {
            Some(key) => println!("API key: {}", settings::mask_api_key(&key)),
            None => println!("No API key saved!"),
          }
          println!("Storage: {}", shell.store.path().display());
        }
      }
    }
    Command::Home { refresh } => {
      let mut shell = Shell::open(config, args.out)?;
      let path = shell.home(refresh).await?;
      println!("{}", path.display());
    }
    Command::Search { query } => {
      let mut shell = Shell::open(config, args.out)?;
      let path = shell.navigate(&Route::Search { text: query.join(" ") }).await?;
      println!("{}", path.display());
    }
    Command::Watch { id } => {
      let mut shell = Shell::open(config, args.out)?;
      let path = shell.navigate(&Route::Watch { id }).await?;
      println!("{}", path.display());
    }
    Command::Open { input } => {
      let Some(intent) = resolve(&input.join(" ")) else {
        eprintln!("Nothing to open.");
        return Ok(());
      };
      let route = intent.route();
      info!(href = %route.href(), "open: resolved");
      let mut shell = Shell::open(config, args.out)?;
      let path = shell.navigate(&route).await?;
      println!("{}", path.display());
    }
    Command::Resolve { input } => match resolve(&input.join(" ")) {
      Some(intent) => println!("{}", intent.route().href()),
      None => eprintln!("Nothing to open."),
    },
    Command::Config { api_base, output_dir, timeout_secs } => {
      if api_base.is_none() && output_dir.is_none() && timeout_secs.is_none() {
        print!("{}", toml::to_string(&config).context("Failed to serialize preferences")?);
        return Ok(());
      }
      let mut config = config;
      if let Some(base) = api_base {
        config.api_base = Some(base).filter(|b| !b.trim().is_empty());
      }
      if let Some(dir) = output_dir {
        config.output_dir = Some(dir).filter(|d| !d.trim().is_empty());
      }
      if let Some(secs) = timeout_secs {
        config.request_timeout_secs = Some(secs).filter(|s| *s > 0);
      }
      let path = config.save()?;
      println!("Saved {}", path.display());
    }
    Command::Completions { shell } => {
      clap_complete::generate(shell, &mut Args::command(), "ytweb", &mut std::io::stdout());
    }
  }

  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn cli_is_well_formed() {
    Args::command().debug_assert();
  }

  #[test]
  fn search_words_are_collected() {
    let args = Args::try_parse_from(["ytweb", "search", "hello", "world"]).unwrap();
    match args.command {
      Command::Search { query } => assert_eq!(query.join(" "), "hello world"),
      other => panic!("unexpected command {other:?}"),
    }
  }

  #[test]
  fn open_joins_words() {
    let args = Args::try_parse_from(["ytweb", "open", "lofi", "beats"]).unwrap();
    assert!(matches!(args.command, Command::Open { input } if input == ["lofi", "beats"]));
  }

  #[test]
  fn global_out_flag() {
    let args = Args::try_parse_from(["ytweb", "home", "--refresh", "--out", "/tmp/site"]).unwrap();
    assert_eq!(args.out, Some(PathBuf::from("/tmp/site")));
    assert!(matches!(args.command, Command::Home { refresh: true }));
  }
}
