use anyhow::Result;
use clap::{CommandFactory, Parser};
use is_terminal::IsTerminal;
use std::env;
use std::io;
use std::path::Path;
use tracing::debug;

use promptpad::cli::COMMAND_NAMES;
use promptpad::commands::{handle_copy, handle_edit, handle_ls, handle_new, handle_rm, handle_show};
use promptpad::{config, error_help, init_logging, App, Cli, Clipboard, Commands, Config, LogConfig, Storage};

fn main() {
    if let Err(e) = run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // .env is optional, system env vars are enough
    let _ = dotenvy::dotenv();

    // Parse CLI with custom error handling for better suggestions
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            if let clap::error::ErrorKind::InvalidSubcommand = e.kind() {
                if let Some(cmd) = env::args().nth(1) {
                    eprintln!("{}", error_help::format_command_typo(&cmd, COMMAND_NAMES));
                    std::process::exit(1);
                }
            }
            e.exit();
        }
    };

    let base_dir = config::base_dir()?;
    let config = Config::load(&base_dir)?;

    let launch_tui = match &cli.command {
        None => cfg!(feature = "tui") && io::stdout().is_terminal(),
        Some(Commands::Tui) => true,
        Some(_) => false,
    };

    if let Some(mut log_config) = LogConfig::resolve(&config.log) {
        if launch_tui && log_config.file_dir.is_none() {
            log_config.file_dir = Some(base_dir.clone());
        }
        init_logging(log_config)?;
    }

    let command = match cli.command {
        Some(command) => command,
        None if launch_tui => Commands::Tui,
        None => {
            Cli::command().print_help()?;
            return Ok(());
        }
    };

    let storage = Storage::open(config.data_dir(&base_dir));
    let mut app = App::new(storage, Clipboard::new()).with_sidebar(config.sidebar());
    let mut out = io::stdout().lock();

    match command {
        Commands::Ls { filter, json } => handle_ls(&mut app, filter.as_deref(), json, &mut out),
        Commands::Show { id, plain } => handle_show(&mut app, &id, plain, &mut out),
        Commands::New { title, content } => handle_new(&mut app, &title, &content, &mut out),
        Commands::Edit { id, title, content } => {
            handle_edit(&mut app, &id, title.as_deref(), content.as_deref(), &mut out)
        }
        Commands::Rm { id } => handle_rm(&mut app, &id, &mut out),
        Commands::Copy { id } => {
            let is_tty = io::stdout().is_terminal();
            handle_copy(&mut app, &id, is_tty, &mut out)
        }
        Commands::Tui => {
            drop(out);
            run_tui(app, &base_dir)
        }
    }
}

#[cfg(feature = "tui")]
fn run_tui(app: App, base_dir: &Path) -> Result<()> {
    debug!(base_dir = %base_dir.display(), "Starting terminal UI");
    promptpad::tui::PromptTui::new(app).run()
}

#[cfg(not(feature = "tui"))]
fn run_tui(_app: App, base_dir: &Path) -> Result<()> {
    debug!(base_dir = %base_dir.display(), "Terminal UI not compiled in");
    anyhow::bail!("This build has no terminal UI. Rebuild with the 'tui' feature.")
}
