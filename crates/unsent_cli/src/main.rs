//! Command-line front end for the memory board.
//!
//! # Responsibility
//! - Load config, set up logging and open the store.
//! - Map subcommands onto the core service and card engine.
//! - Print plain text; errors go to stderr with the user-facing message.

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use log::warn;
use std::path::PathBuf;
use unsent_core::db::{open_db, open_db_in_memory};
use unsent_core::search::session::EMPTY_RESULTS_MESSAGE;
use unsent_core::{
    core_version, init_logging_from_config, CardEngine, CardMode, CardView, CoreConfig, Memory,
    MemoryService, SqliteMemoryStore, SubmissionInput,
};
use uuid::Uuid;

/// Upper bound for `card --elapsed-ms`: one week.
const MAX_CARD_ELAPSED_MS: u64 = 7 * 24 * 60 * 60 * 1_000;

#[derive(Debug, Parser)]
#[command(name = "unsent", about = "Anonymous unsent letters, moderated before they show")]
struct Cli {
    /// TOML config file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// SQLite database file; overrides `storage.db_path`.
    #[arg(long, global = true)]
    db: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Submit a memory for moderation.
    Submit(SubmitArgs),
    /// Newest approved memories.
    Recent {
        #[arg(long)]
        limit: Option<u32>,
    },
    /// All approved memories, optionally filtered by recipient.
    Search { term: Option<String> },
    /// One approved memory in detail form.
    Show { id: Uuid },
    /// Render a flip card at a point in time.
    Card {
        id: Uuid,
        /// Virtual time since mount.
        #[arg(
            long,
            default_value_t = 0,
            value_parser = clap::value_parser!(u64).range(..=MAX_CARD_ELAPSED_MS)
        )]
        elapsed_ms: u64,
        /// Tap once at mount time.
        #[arg(long)]
        flip: bool,
    },
    Version,
}

#[derive(Debug, Args)]
struct SubmitArgs {
    #[arg(long = "to")]
    recipient: String,
    #[arg(long)]
    message: String,
    #[arg(long = "from")]
    sender: Option<String>,
    #[arg(long)]
    color: Option<String>,
    #[arg(long)]
    full_bg: bool,
    #[arg(long)]
    letter_style: Option<String>,
    #[arg(long = "effect")]
    animation: Option<String>,
}

impl From<SubmitArgs> for SubmissionInput {
    fn from(args: SubmitArgs) -> Self {
        Self {
            recipient: Some(args.recipient),
            message: Some(args.message),
            sender: args.sender,
            color: args.color,
            full_background: Some(args.full_bg),
            letter_style: args.letter_style,
            animation: args.animation,
        }
    }
}

fn main() {
    if let Err(err) = run(Cli::parse()) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    if let Command::Version = cli.command {
        println!("unsent {}", core_version());
        return Ok(());
    }

    let config = match &cli.config {
        Some(path) => CoreConfig::from_file(path)?,
        None => CoreConfig::default(),
    };
    init_logging_from_config(&config.logging).map_err(anyhow::Error::msg)?;

    let conn = match cli.db.as_ref().or(config.storage.db_path.as_ref()) {
        Some(path) => {
            open_db(path).with_context(|| format!("opening database `{}`", path.display()))?
        }
        None => {
            warn!("event=cli_start module=cli status=in_memory_db");
            open_db_in_memory().context("opening in-memory database")?
        }
    };
    let service = MemoryService::new(SqliteMemoryStore::new(&conn))
        .with_recent_limit(config.feed.recent_limit);

    match cli.command {
        Command::Submit(args) => {
            let receipt = service
                .submit_input(&SubmissionInput::from(args))
                .map_err(|err| anyhow!(err.user_message()))?;
            println!("{}", receipt.message);
            println!("id: {}", receipt.memory.id);
        }
        Command::Recent { limit } => {
            let memories = match limit {
                Some(limit) => service.list_recent(limit),
                None => service.list_recent_default(),
            }
            .map_err(|err| anyhow!(err.user_message()))?;
            print_list(&memories);
        }
        Command::Search { term } => {
            let memories = service
                .list_approved(term.as_deref())
                .map_err(|err| anyhow!(err.user_message()))?;
            print_list(&memories);
        }
        Command::Show { id } => {
            let memory = service
                .get_memory(id)
                .map_err(|err| anyhow!(err.user_message()))?;
            let mut engine = CardEngine::new(&config.card, &config.display);
            let key = engine.mount(memory, CardMode::Detail);
            if let Some(view) = engine.view(key) {
                print_view(&view);
            }
        }
        Command::Card {
            id,
            elapsed_ms,
            flip,
        } => {
            let memory = service
                .get_memory(id)
                .map_err(|err| anyhow!(err.user_message()))?;
            let mut engine = CardEngine::new(&config.card, &config.display);
            let key = engine.mount(memory, CardMode::Flip);
            if flip {
                engine.tap(key);
            }
            engine.advance_by(elapsed_ms);
            if let Some(view) = engine.view(key) {
                print_view(&view);
            }
            engine.unmount(key);
        }
        Command::Version => {}
    }
    Ok(())
}

fn print_list(memories: &[Memory]) {
    if memories.is_empty() {
        println!("{EMPTY_RESULTS_MESSAGE}");
        return;
    }
    for memory in memories {
        let preview = memory.message.lines().next().unwrap_or_default();
        println!("{}  To: {}  {}", memory.id, memory.recipient, preview);
    }
}

fn print_view(view: &CardView) {
    match view {
        CardView::Front(front) => {
            let marker = front
                .special_marker
                .map(|marker| format!(" {}", marker.glyph))
                .unwrap_or_default();
            println!("{}{marker}", front.recipient_line);
            if let Some(sender) = &front.sender_line {
                println!("{sender}");
            }
            println!("> {}", front.prompt);
            println!("{}", front.footer.line());
        }
        CardView::Back(back) => {
            if let Some(class) = back.message.effect_class {
                println!("[{class}]");
            }
            println!("{}", back.message.text);
            println!("{}", back.footer.line());
        }
        CardView::Detail(panel) => {
            let marker = panel
                .special_marker
                .map(|marker| format!(" {}", marker.glyph))
                .unwrap_or_default();
            println!("{}{marker}", panel.recipient_line);
            if let Some(class) = panel.message.effect_class {
                println!("[{class}]");
            }
            println!("{}", panel.message.text);
            if let Some(attribution) = &panel.attribution {
                println!("{attribution}");
            }
            println!("{}", panel.footer.line());
        }
    }
}
