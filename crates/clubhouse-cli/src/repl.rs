//! Interactive chat mode.

use crate::cli::ChatArgs;
use crate::commands::query::cancel_on_ctrl_c;
use crate::commands::Engine;
use crate::config::Settings;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use clubhouse_rag::{QueryError, QueryOptions};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::PathBuf;

/// Run the interactive chat loop.
pub async fn run_chat(args: ChatArgs, engine: &Engine, settings: &Settings, formatter: &Formatter) -> Result<()> {
    println!(
        "{}",
        formatter.info("Clubhouse chat - ask about any club, 'help' for commands, 'exit' to quit")
    );
    println!();

    let config = rustyline::Config::builder()
        .max_history_size(settings.output.history_size)
        .map_err(editor_error)?
        .auto_add_history(false)
        .build();
    let mut editor = DefaultEditor::with_config(config).map_err(editor_error)?;

    let history_path = get_history_path()?;
    let _ = editor.load_history(&history_path);

    let mut options = QueryOptions {
        top_k: args.top_k,
        apply_filters: true,
    };

    loop {
        match editor.readline("clubhouse> ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                editor.add_history_entry(line).ok();

                match parse_chat_line(line) {
                    ChatLine::Exit => {
                        println!("{}", formatter.info("Goodbye!"));
                        break;
                    }
                    ChatLine::Help => print_help(formatter),
                    ChatLine::Filters(enabled) => {
                        options.apply_filters = enabled;
                        let state = if enabled { "on" } else { "off" };
                        println!("{}", formatter.info(&format!("Filter inference {}", state)));
                    }
                    ChatLine::Question(question) => {
                        ask(engine, question, options, formatter).await;
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", formatter.info("Use 'exit' to quit"));
            }
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("{}", formatter.error(&format!("Error: {}", err)));
                break;
            }
        }
    }

    editor.save_history(&history_path).ok();
    Ok(())
}

/// Answer one question; failures are printed and the loop continues.
async fn ask(engine: &Engine, question: &str, options: QueryOptions, formatter: &Formatter) {
    let cancel = cancel_on_ctrl_c();
    let result = engine.query_with_cancellation(question, options, cancel.clone()).await;
    cancel.cancel();

    match result {
        Ok(response) => match formatter.format_response(&response) {
            Ok(text) => {
                println!("{}", text);
                println!();
            }
            Err(e) => eprintln!("{}", formatter.error(&e.to_string())),
        },
        Err(QueryError::Cancelled) => println!("{}", formatter.warning("Query cancelled")),
        Err(e) => eprintln!("{}", formatter.error(&e.to_string())),
    }
}

/// One line of chat input.
#[derive(Debug, PartialEq)]
enum ChatLine<'a> {
    Exit,
    Help,
    Filters(bool),
    Question(&'a str),
}

fn parse_chat_line(line: &str) -> ChatLine<'_> {
    match line.to_lowercase().as_str() {
        "exit" | "quit" | "q" => ChatLine::Exit,
        "help" | "?" => ChatLine::Help,
        "filters on" => ChatLine::Filters(true),
        "filters off" => ChatLine::Filters(false),
        _ => ChatLine::Question(line),
    }
}

fn editor_error(e: ReadlineError) -> CliError {
    CliError::Io(std::io::Error::other(format!("Failed to initialize editor: {}", e)))
}

fn get_history_path() -> Result<PathBuf> {
    let dir = Settings::home_dir()?;
    std::fs::create_dir_all(&dir)?;
    Ok(dir.join("history.txt"))
}

fn print_help(formatter: &Formatter) {
    println!("{}", formatter.info("Available commands:"));
    println!();
    println!("  <question>           - Ask about the clubs");
    println!("  filters on|off       - Toggle filter inference (e.g. \"under $20\")");
    println!("  help, ?              - Show this help");
    println!("  exit, quit, q        - Exit chat");
    println!();
    println!("  Press Ctrl-C while a question is running to cancel it.");
    println!();
}
