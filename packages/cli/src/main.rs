//! SwiftNote Shell
//!
//! Line-oriented front end for the editor core. One process is one tab: it
//! opens the configured database, mounts a [`NoteEditor`] and reads commands
//! from stdin.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin swiftnote
//!
//! # Resume the note a previous run had open
//! SWIFTNOTE_TAB=1700000000000-k3j9x2abc cargo run --bin swiftnote
//! ```
//!
//! # Environment Variables
//!
//! - `SWIFTNOTE_TAB`: tab id to resume (printed at startup)
//! - `SWIFTNOTE_DB_PATH`: database file, when preferences do not set one
//! - `RUST_LOG`: logging filter (default: `swiftnote=info,swiftnote_core=info`)

use std::env;
use std::sync::Arc;

use swiftnote_core::db::{KeyValueStore, LibsqlKeyValueStore, LibsqlNoteStore};
use swiftnote_core::editor::{shortcut_help, InputSurface, Key, KeyEvent};
use swiftnote_core::models::{NoteId, SystemTimeProvider, TimeProvider};
use swiftnote_core::preferences::{default_config_dir, load_preferences};
use swiftnote_core::session::Focus;
use swiftnote_core::{
    AppConfig, DatabaseHandle, NoteEditor, NotesCatalog, NotesService, SearchDebouncer, TabSession,
    TabStorage,
};
use tokio::io::{AsyncBufReadExt, BufReader};

const COMMANDS: &str = "\
commands:
  title <text>     replace the title
  type <text>      type into the body (\\n for Enter)
  key <chord>      press a key, e.g. cmd+b, ctrl+shift+8, shift+tab, enter
  select-all       select the whole body
  show             print the note being edited
  save             save now
  list             list notes, newest first
  search <query>   filter notes by title (debounced)
  open <id>        open a note in this tab
  new              start an untitled note
  delete <id>      delete a note
  help             show commands and shortcuts
  quit";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new("swiftnote=info,swiftnote_core=info")
            }),
        )
        .with_writer(std::io::stderr)
        .init();

    let prefs = load_preferences(&default_config_dir()?).await?;
    let config = AppConfig::from_preferences(&prefs)?;
    tracing::info!("Database: {}", config.database_path.display());

    let handle = Arc::new(DatabaseHandle::new(&config.database_path));
    let notes = NotesService::new(Arc::new(LibsqlNoteStore::new(handle.clone())));
    let durable: Arc<dyn KeyValueStore> = Arc::new(LibsqlKeyValueStore::new(handle));
    let time: Arc<dyn TimeProvider> = Arc::new(SystemTimeProvider);

    let tab_storage = TabStorage::new();
    let session = match env::var("SWIFTNOTE_TAB") {
        Ok(tab_id) => TabSession::with_tab_id(tab_id, durable, time)?,
        Err(_) => TabSession::new(&tab_storage, durable, time),
    }
    .with_policy(config.tab_retention, config.cleanup_interval);
    println!("tab {}", session.tab_id());

    let mut editor = NoteEditor::new(notes.clone(), session, &config);
    editor.mount().await?;
    let mut catalog = NotesCatalog::new(notes);

    print_note(&editor);

    let (mut debouncer, mut settled) = SearchDebouncer::from_config(&config);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                let (command, arg) = line
                    .trim()
                    .split_once(' ')
                    .map(|(command, arg)| (command, arg.trim()))
                    .unwrap_or((line.trim(), ""));

                match command {
                    "" => {}
                    "title" => editor.set_title(arg),
                    "type" => {
                        if editor.focus() == Focus::Title {
                            editor
                                .handle_key(InputSurface::Title, KeyEvent::new(Key::Enter))
                                .await;
                        }
                        editor.type_text(&arg.replace("\\n", "\n")).await;
                    }
                    "key" => match parse_chord(arg) {
                        Some(event) => {
                            let surface = match editor.focus() {
                                Focus::Title => InputSurface::Title,
                                Focus::Body => InputSurface::Body,
                            };
                            let outcome = editor.handle_key(surface, event).await;
                            println!("{:?}", outcome);
                        }
                        None => println!("unknown chord: {}", arg),
                    },
                    "select-all" => {
                        if let Some(body) = editor.body_mut() {
                            body.select_all();
                        }
                    }
                    "show" => print_note(&editor),
                    "save" => match editor.save().await {
                        Ok(note) => println!("saved {}", describe(note.id)),
                        Err(e) => println!("save failed: {}", e),
                    },
                    "list" => {
                        debouncer.cancel();
                        if report(catalog.refresh().await).is_some() {
                            print_catalog(&catalog);
                        }
                    }
                    "search" => debouncer.input(arg),
                    "open" => match arg.parse::<NoteId>() {
                        Ok(id) => match report(editor.open_note(id).await) {
                            Some(true) => print_note(&editor),
                            Some(false) => println!("no note {}", id),
                            None => {}
                        },
                        Err(e) => println!("{}", e),
                    },
                    "new" => {
                        report(editor.new_note().await);
                    }
                    "delete" => match arg.parse::<NoteId>() {
                        Ok(id) => {
                            if let Some(removed) = report(catalog.delete(id).await) {
                                println!("{}", if removed { "deleted" } else { "not found" });
                            }
                        }
                        Err(e) => println!("{}", e),
                    },
                    "help" => {
                        println!("{}", COMMANDS);
                        println!("shortcuts:");
                        for row in shortcut_help(config.platform) {
                            println!("  {:<16} {}", row.keys, row.description);
                        }
                    }
                    "quit" | "exit" => break,
                    other => println!("unknown command: {} (try help)", other),
                }
            }
            Some(query) = settled.recv() => {
                if report(catalog.search(&query).await).is_some() {
                    print_catalog(&catalog);
                }
            }
        }
    }

    Ok(())
}

/// Print a failed operation and keep the shell running
fn report<T, E: std::fmt::Display>(result: Result<T, E>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            println!("error: {}", e);
            None
        }
    }
}

/// Parse `cmd+shift+8`, `ctrl+b`, `shift+tab`, `enter`, ...
fn parse_chord(chord: &str) -> Option<KeyEvent> {
    let mut parts: Vec<&str> = chord.split('+').map(str::trim).collect();
    let key = match parts.pop()?.to_ascii_lowercase().as_str() {
        "enter" | "return" => Key::Enter,
        "tab" => Key::Tab,
        "backspace" => Key::Backspace,
        "escape" | "esc" => Key::Escape,
        "left" => Key::Left,
        "right" => Key::Right,
        "up" => Key::Up,
        "down" => Key::Down,
        single => {
            let mut chars = single.chars();
            let ch = chars.next()?;
            if chars.next().is_some() {
                return None;
            }
            Key::Char(ch)
        }
    };

    let mut event = KeyEvent::new(key);
    for modifier in parts {
        event = match modifier.to_ascii_lowercase().as_str() {
            "cmd" | "meta" => event.with_meta(),
            "ctrl" => event.with_ctrl(),
            "shift" => event.with_shift(),
            "alt" | "option" => event.with_alt(),
            _ => return None,
        };
    }
    Some(event)
}

fn describe(id: Option<NoteId>) -> String {
    id.map(|id| format!("#{}", id))
        .unwrap_or_else(|| "(unsaved)".to_string())
}

fn print_note(editor: &NoteEditor) {
    println!(
        "[{}] {} ({:?})",
        describe(editor.session().bound_note()),
        editor.title(),
        editor.save_status()
    );
    println!("{}", editor.content());
}

fn print_catalog(catalog: &NotesCatalog) {
    for note in catalog.notes() {
        println!("{:>6}  {}", describe(note.id), note.title);
    }
}
