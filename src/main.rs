//! # Noteground CLI (`ng`)
//!
//! The `ng` binary is the terminal surface for Noteground. It wires the
//! retrieval loop to a generative provider and a note vault, both taken
//! from a TOML configuration file.
//!
//! ## Usage
//!
//! ```bash
//! ng --config ./config/ng.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `ng chat "<question>"` | Retrieve notes, then hold a grounded, streamed conversation |
//! | `ng ask "<question>"` | Retrieve notes and answer a single question |
//! | `ng retrieve "<question>"` | Run the retrieval loop and print the assembled context |
//! | `ng terms "<question>"` | Print the generated search terms |
//! | `ng notes` | List the notes the scanner sees |
//!
//! Diagnostics go to stderr via `tracing` (`RUST_LOG=noteground=info` or
//! `=debug` for raw model responses); answers and results go to stdout.

use anyhow::Result;
use clap::{Parser, Subcommand};
use futures::StreamExt;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use noteground::chat::ChatSession;
use noteground::config;
use noteground::llm::create_provider;
use noteground::notes::scan_notes;
use noteground::retrieval::{retrieve, NO_NOTES_SENTINEL};
use noteground::terms::generate_terms;

/// Noteground — a retrieval-grounded chat assistant over local notes.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. See `config/ng.example.toml` for a full example.
#[derive(Parser)]
#[command(
    name = "ng",
    about = "Noteground — chat with a generative model grounded in your local notes",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/ng.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Hold a grounded, multi-turn conversation.
    ///
    /// Runs the retrieval loop for the question, seeds a chat session with
    /// the assembled context, streams the first answer, then reads further
    /// questions from stdin until `exit`, `quit`, or EOF.
    Chat {
        /// The opening question; also drives note retrieval.
        question: String,
    },

    /// Answer a single question grounded in the notes.
    Ask {
        /// The question to answer.
        question: String,

        /// Print the answer in one piece instead of streaming chunks.
        #[arg(long)]
        no_stream: bool,
    },

    /// Run the retrieval loop only and print the assembled context.
    Retrieve {
        /// The question to retrieve notes for.
        question: String,
    },

    /// Print the search terms generated for a question.
    Terms {
        /// The question to derive terms from.
        question: String,
    },

    /// List the notes the vault scanner sees.
    Notes,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Notes => {
            let notes = scan_notes(&cfg.notes)?;
            for note in &notes {
                println!("{} ({} bytes)", note.path, note.body.len());
            }
            println!("{} note(s) under {}", notes.len(), cfg.notes.root.display());
        }
        Commands::Terms { question } => {
            let provider = create_provider(&cfg.provider)?;
            let terms = generate_terms(provider.as_ref(), &question, &[]).await?;
            for term in &terms {
                println!("{term}");
            }
        }
        Commands::Retrieve { question } => {
            let provider = create_provider(&cfg.provider)?;
            let context = retrieve(provider.as_ref(), &cfg, &question).await?;
            println!("{context}");
        }
        Commands::Ask {
            question,
            no_stream,
        } => {
            let provider = create_provider(&cfg.provider)?;
            let context = retrieve(provider.as_ref(), &cfg, &question).await?;
            let mut session = ChatSession::new(provider.as_ref(), &context);

            if no_stream {
                let answer = session.ask(&question).await?;
                println!("{answer}");
            } else {
                stream_answer(&mut session, &question).await?;
            }
        }
        Commands::Chat { question } => {
            let provider = create_provider(&cfg.provider)?;
            let context = retrieve(provider.as_ref(), &cfg, &question).await?;
            if context == NO_NOTES_SENTINEL {
                println!("(no matching notes — answers will not be grounded)");
            }

            let mut session = ChatSession::new(provider.as_ref(), &context);
            stream_answer(&mut session, &question).await?;

            run_chat_loop(&mut session).await?;
        }
    }

    Ok(())
}

/// Stream one answer to stdout, then record it in the session history.
async fn stream_answer(session: &mut ChatSession<'_>, question: &str) -> Result<()> {
    let mut stream = session.ask_stream(question).await?;
    let mut answer = String::new();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        print!("{chunk}");
        std::io::stdout().flush()?;
        answer.push_str(&chunk);
    }
    println!();

    session.commit_answer(&answer);
    Ok(())
}

/// Read follow-up questions from stdin until `exit`, `quit`, or EOF.
async fn run_chat_loop(session: &mut ChatSession<'_>) -> Result<()> {
    let stdin = std::io::stdin();

    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF
        }

        let question = line.trim();
        if question.is_empty() {
            continue;
        }
        if question == "exit" || question == "quit" {
            break;
        }

        stream_answer(session, question).await?;
    }

    Ok(())
}
