use anyhow::{Context, Result};
use book_search::config::{
    default_config_path, find_config_file, load_config, save_config, Config,
};
use book_search::models::Book;
use book_search::session::{detail, DetailView, SearchOutcome, SearchSession, SessionStatus};
use book_search::sources::{Catalog, GoogleBooksCatalog};
use book_search::ui;
use book_search::utils::terminal_width;
use clap::{Parser, Subcommand, ValueEnum};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Book Search - search a public book catalog and browse paginated results
#[derive(Parser, Debug)]
#[command(name = "book-search")]
#[command(version = book_search::VERSION)]
#[command(about = "Search a public book catalog and browse paginated results", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (-v, -vv, -vvv)
    #[arg(long, short, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, short, value_enum, global = true, default_value_t = OutputFormat::Auto)]
    output: OutputFormat,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Request timeout in seconds (overrides the config file)
    #[arg(long, global = true, value_parser = clap::value_parser!(u64).range(1..))]
    timeout: Option<u64>,

    /// Show all environment variables
    #[arg(long)]
    env: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Output format for results
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// Automatic based on terminal (table if TTY, JSON otherwise)
    Auto,
    /// Table format (human-readable)
    Table,
    /// JSON format (machine-readable)
    Json,
    /// Plain text format
    Plain,
}

impl OutputFormat {
    fn resolve(self) -> Self {
        match self {
            OutputFormat::Auto if std::io::stdout().is_terminal() => OutputFormat::Table,
            OutputFormat::Auto => OutputFormat::Json,
            other => other,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Search for books by query string
    #[command(alias = "s")]
    Search {
        /// Search query string
        query: String,

        /// Number of pages of 20 results to fetch
        #[arg(long, short, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        pages: u32,
    },

    /// Show the full record of one book
    Show {
        /// Catalog book ID
        id: String,
    },

    /// Interactive search: submit queries, load more pages, open details
    #[command(alias = "b")]
    Browse {
        /// Initial query
        query: Option<String>,
    },

    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Write a configuration file with default values
    Init {
        /// Destination (default: per-user config directory)
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long, short)]
        force: bool,
    },

    /// Print the effective configuration
    Show,
}

/// One line of input in the interactive browser
#[derive(Debug, Clone, PartialEq, Eq)]
enum BrowseCommand {
    Search(String),
    More,
    Show(String),
    Help,
    Quit,
    Empty,
}

fn parse_browse_command(line: &str) -> BrowseCommand {
    let line = line.trim();
    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    };

    match head {
        "" => BrowseCommand::Empty,
        "more" | "m" if rest.is_empty() => BrowseCommand::More,
        "show" | "open" if !rest.is_empty() => BrowseCommand::Show(rest.to_string()),
        "help" | "?" if rest.is_empty() => BrowseCommand::Help,
        "quit" | "exit" | "q" if rest.is_empty() => BrowseCommand::Quit,
        "/search" | "/s" => BrowseCommand::Search(rest.to_string()),
        _ => BrowseCommand::Search(line.to_string()),
    }
}

/// Turn a `show` argument into a book id: a 1-based result number, or an id as-is.
fn resolve_book_id(target: &str, results: &[Book]) -> String {
    match target.parse::<usize>() {
        Ok(n) if n >= 1 && n <= results.len() => results[n - 1].id.clone(),
        _ => target.to_string(),
    }
}

/// Print all available environment variables
fn print_env_vars() {
    println!("Book Search - Environment Variables");
    println!();
    println!("API Settings:");
    println!("  BOOK_SEARCH_API__SEARCH_BASE       Search endpoint base URL");
    println!("  BOOK_SEARCH_API__DETAIL_BASE       Detail endpoint base URL");
    println!("  BOOK_SEARCH_API__TIMEOUT_SECONDS   Request timeout in seconds (default: 30)");
    println!("  BOOK_SEARCH_API__USER_AGENT        User agent sent with each request");
    println!();
    println!("Session Settings:");
    println!("  BOOK_SEARCH_SESSION__STALE_RESPONSES  discard | apply (default: discard)");
    println!();
    println!("Logging:");
    println!("  BOOK_SEARCH_LOGGING__LEVEL         Default log level (default: warn)");
    println!("  RUST_LOG                           Full tracing filter, overrides everything");
    std::process::exit(0);
}

fn init_tracing(cli: &Cli, config: &Config) {
    let level = if cli.quiet {
        "error"
    } else {
        match cli.verbose {
            0 => config.logging.level.as_str(),
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("book_search={}", level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.env {
        print_env_vars();
    }

    let config_path = cli.config.clone().or_else(find_config_file);
    let mut config = load_config(config_path.as_deref()).with_context(|| match &config_path {
        Some(path) => format!("Failed to load config from {}", path.display()),
        None => "Failed to load config from environment".to_string(),
    })?;
    if let Some(timeout) = cli.timeout {
        config.api.timeout_seconds = timeout;
    }

    init_tracing(&cli, &config);
    if let Some(path) = &config_path {
        tracing::info!("Using config file: {}", path.display());
    }

    let output = cli.output.resolve();

    match cli.command {
        Some(Commands::Search { ref query, pages }) => {
            let mut session = new_session(&config)?;
            if !fetch_pages(&mut session, query, pages).await {
                anyhow::bail!("Search query must not be empty");
            }

            if has_listing(&session) {
                output_results(&session, output, cli.quiet)?;
            }
            if let SearchOutcome::Failed(message) = session.outcome() {
                ui::print_error(&message);
                std::process::exit(1);
            }
        }

        Some(Commands::Show { ref id }) => {
            let catalog = new_catalog(&config)?;
            let view = load_detail(catalog.as_ref(), id).await;
            match (&view, output) {
                (DetailView::Loaded(book), OutputFormat::Json) => {
                    println!("{}", serde_json::to_string_pretty(book)?);
                }
                (DetailView::Loaded(_), _) => print!("{}", ui::render_detail_view(&view)),
                _ => anyhow::bail!(ui::render_detail_view(&view)),
            }
        }

        Some(Commands::Browse { ref query }) => {
            let session = new_session(&config)?;
            browse(session, query.as_deref()).await?;
        }

        Some(Commands::Config { ref command }) => match command {
            ConfigCommands::Init { path, force } => {
                let path = path
                    .clone()
                    .or_else(default_config_path)
                    .context("Could not determine a config directory; pass a path")?;
                if path.exists() && !force {
                    anyhow::bail!(
                        "{} already exists (use --force to overwrite)",
                        path.display()
                    );
                }
                save_config(&Config::default(), &path)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                if !cli.quiet {
                    eprintln!("Wrote default configuration to {}", path.display());
                }
            }
            ConfigCommands::Show => {
                print!("{}", toml::to_string_pretty(&config)?);
            }
        },

        None => {
            println!("No command provided. Use --help for usage information.");
            println!("Common commands:");
            println!("  search <query>   - Search for books");
            println!("  show <id>        - Show one book's details");
            println!("  browse [query]   - Interactive search with paging");
        }
    }

    Ok(())
}

fn new_catalog(config: &Config) -> Result<Arc<dyn Catalog>> {
    let catalog =
        GoogleBooksCatalog::from_config(&config.api).context("Failed to create catalog client")?;
    Ok(Arc::new(catalog))
}

fn new_session(config: &Config) -> Result<SearchSession> {
    Ok(SearchSession::new(new_catalog(config)?).with_policy(config.session.stale_responses))
}

/// Submit `query`, then load more until `pages` pages are held.
///
/// Stops at the first failed page so it is never requested twice. Returns
/// false when the query was blank and nothing was sent.
async fn fetch_pages(session: &mut SearchSession, query: &str, pages: u32) -> bool {
    let spinner = ui::Spinner::for_terminal(&format!("Searching for \"{}\"...", query.trim()));
    if !session.submit_query(query).await {
        if let Some(spinner) = spinner {
            spinner.clear();
        }
        return false;
    }

    for page in 2..=pages {
        if matches!(session.status(), SessionStatus::Error(_)) {
            break;
        }
        if let Some(spinner) = &spinner {
            spinner.set_message(&format!("Loading page {}...", page));
        }
        if !session.load_more().await {
            break;
        }
    }

    finish_fetch(spinner, session);
    true
}

/// Whether a finished one-shot search has anything to list. Results that
/// loaded before a failed page are still listed.
fn has_listing(session: &SearchSession) -> bool {
    !matches!(session.outcome(), SearchOutcome::Failed(_)) || !session.results().is_empty()
}

/// Close a fetch spinner with the session's outcome.
fn finish_fetch(spinner: Option<ui::Spinner>, session: &SearchSession) {
    let Some(spinner) = spinner else {
        return;
    };
    match session.outcome() {
        SearchOutcome::Failed(_) => spinner.finish_with_error("Request failed"),
        SearchOutcome::NoResults => spinner.finish_with_success("No matches"),
        _ => spinner.finish_with_success(&format!(
            "{} books loaded",
            ui::format_number(session.results().len())
        )),
    }
}

/// Load one book's detail view behind a spinner.
async fn load_detail(catalog: &dyn Catalog, id: &str) -> DetailView {
    let spinner = ui::Spinner::for_terminal(&ui::render_detail_view(&DetailView::Loading));
    let view = detail::load(catalog, id).await;
    if let Some(spinner) = spinner {
        match &view {
            DetailView::Loaded(book) => spinner.finish_with_success(book.title()),
            DetailView::Failed(_) => spinner.finish_with_error("Request failed"),
            DetailView::Missing | DetailView::Loading => spinner.clear(),
        }
    }
    view
}

fn output_results(session: &SearchSession, format: OutputFormat, quiet: bool) -> Result<()> {
    let state = session.state();
    match format {
        OutputFormat::Json => {
            let body = serde_json::json!({
                "query": state.query(),
                "totalItems": state.total_available(),
                "offset": state.offset(),
                "items": state.results(),
            });
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        OutputFormat::Plain => print!("{}", ui::render_plain(state.results(), 1)),
        OutputFormat::Table | OutputFormat::Auto => {
            if !state.results().is_empty() {
                println!("{}", ui::render_table(state.results(), 1, terminal_width()));
            }
        }
    }
    let outcome = session.outcome();
    if !quiet && format != OutputFormat::Json && !matches!(outcome, SearchOutcome::Failed(_)) {
        ui::print_summary(state.query(), &outcome);
    }
    Ok(())
}

fn print_browse_help() {
    println!("Commands:");
    println!("  <text> | /search <text>   Start a new search");
    println!("  more                      Load the next page of results");
    println!("  show <n|id>               Open result number n, or a book id");
    println!("  help                      Show this help");
    println!("  quit                      Leave");
}

/// Print the page that starts at result index `from` and the session summary.
fn print_page(session: &SearchSession, from: usize) {
    let results = session.results();
    if from < results.len() {
        println!(
            "{}",
            ui::render_table(&results[from..], from + 1, terminal_width())
        );
    }
    ui::print_summary(session.state().query(), &session.outcome());
    ui::print_load_more_hint(session.can_load_more());
}

async fn browse(mut session: SearchSession, initial: Option<&str>) -> Result<()> {
    ui::print_section("Book Search");
    print_browse_help();

    if let Some(query) = initial {
        if fetch_pages(&mut session, query, 1).await {
            print_page(&session, 0);
        }
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        match parse_browse_command(&line) {
            BrowseCommand::Empty => {}
            BrowseCommand::Quit => break,
            BrowseCommand::Help => print_browse_help(),
            BrowseCommand::Search(text) => {
                if fetch_pages(&mut session, &text, 1).await {
                    print_page(&session, 0);
                } else {
                    ui::print_error("Please enter something to search for.");
                }
            }
            BrowseCommand::More => {
                let before = session.results().len();
                let spinner = session
                    .can_load_more()
                    .then(|| ui::Spinner::for_terminal("Loading more results..."))
                    .flatten();
                if session.load_more().await {
                    finish_fetch(spinner, &session);
                    print_page(&session, before);
                } else {
                    println!("No more results to load.");
                }
            }
            BrowseCommand::Show(target) => {
                let id = resolve_book_id(&target, session.results());
                if session.find(&id).is_none() {
                    tracing::debug!(id = %id, "Opening a book outside the current results");
                }
                let view = load_detail(session.catalog().as_ref(), &id).await;
                match view {
                    DetailView::Failed(ref message) => ui::print_error(message),
                    _ => println!("{}", ui::render_detail_view(&view)),
                }
            }
        }
    }

    Ok(())
}
