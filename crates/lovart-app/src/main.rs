//! Main application entry point (native).

use clap::Parser;
use lovart_app::{
    AppError, AppResult, ShortcutRegistry, load_config, load_document, parse_script, run_script,
    save_document,
};
use lovart_core::{Editor, EditorConfig};
use std::path::PathBuf;

/// Lovart canvas editor: load a board, replay a session, write the result.
#[derive(Debug, Parser)]
#[command(name = "lovart", version, about)]
struct CliArgs {
    /// Editor config file (JSON).
    #[arg(long, env = "LOVART_CONFIG")]
    config: Option<PathBuf>,

    /// Document to load (JSON element list).
    #[arg(long)]
    document: Option<PathBuf>,

    /// Session script to replay (JSON list of steps).
    #[arg(long)]
    script: Option<PathBuf>,

    /// Where to write the resulting document. Prints to stdout if omitted.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Print keyboard shortcuts and exit.
    #[arg(long)]
    shortcuts: bool,
}

#[cfg(feature = "native")]
fn new_editor(config: EditorConfig) -> Editor {
    match lovart_app::SystemClipboard::new() {
        Ok(clipboard) => Editor::with_clipboard(config, Box::new(clipboard)),
        Err(e) => {
            log::warn!("System clipboard unavailable, using in-memory clipboard: {e}");
            Editor::new(config)
        }
    }
}

#[cfg(not(feature = "native"))]
fn new_editor(config: EditorConfig) -> Editor {
    Editor::new(config)
}

fn run(args: CliArgs) -> AppResult<()> {
    if args.shortcuts {
        ShortcutRegistry::print_all();
        return Ok(());
    }

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => EditorConfig::default(),
    };
    let mut editor = new_editor(config);

    if let Some(path) = &args.document {
        load_document(&mut editor, path)?;
    }

    if let Some(path) = &args.script {
        let content = std::fs::read_to_string(path).map_err(|source| AppError::Io {
            path: path.clone(),
            source,
        })?;
        let steps = parse_script(&content)?;
        run_script(&mut editor, &steps)?;
    }

    match &args.output {
        Some(path) => save_document(&editor, path)?,
        None => println!("{}", editor.serialize_elements()?),
    }
    Ok(())
}

fn main() {
    env_logger::init();
    log::info!("Starting Lovart");

    if let Err(e) = run(CliArgs::parse()) {
        log::error!("{e}");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
