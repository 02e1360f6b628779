pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "proposey",
    about = "Proposey operator CLI",
    long_about = "Inspect configuration, apply migrations, preview prompts and drafts, and read proposal history.",
    after_help = "Examples:\n  proposey config\n  proposey prompt --request request.json\n  proposey history --email jane@example.com"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Apply pending database migrations and return structured status output")]
    Migrate,
    #[command(
        about = "Inspect effective configuration values with source attribution and redaction"
    )]
    Config,
    #[command(about = "Render the drafting prompt for a request file against the default catalog")]
    Prompt {
        #[arg(long, help = "Path to a JSON proposal request")]
        request: PathBuf,
    },
    #[command(about = "Generate and sanitize a draft, printing the payload without submitting it")]
    Draft {
        #[arg(long, help = "Path to a JSON proposal request")]
        request: PathBuf,
    },
    #[command(about = "List logged proposals, newest first")]
    History {
        #[arg(long, help = "Maximum number of entries to return")]
        limit: Option<u32>,
        #[arg(long, help = "Only show proposals for this customer email")]
        email: Option<String>,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Migrate => commands::migrate::run(),
        Command::Config => commands::config::run(),
        Command::Prompt { request } => commands::prompt::run(&request),
        Command::Draft { request } => commands::draft::run(&request),
        Command::History { limit, email } => commands::history::run(limit, email.as_deref()),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
