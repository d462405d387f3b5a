//! `tabla` command-line client.
//!
//! # Responsibility
//! - Map one subcommand to one note or account use-case.
//! - Print the surfaced message and exit with status 1 on failure.

use crate::cli::{AddArgs, CliConfig, Command, EditArgs};
use clap::Parser;
use log::info;
use std::process::ExitCode;
use tabla_core::db::open_db;
use tabla_core::text::{auto_capitalize, capitalize_words};
use tabla_core::{
    default_log_level, init_logging, AuthBackend, AuthMode, AuthService, ClientConfig,
    Credentials, DraftField, HttpBackend, Note, NoteBackend, NoteContent, NoteId, NoteService,
    SessionRepository, SqliteSessionRepository, Structure,
};

mod cli;

fn main() -> ExitCode {
    let cli_config = CliConfig::parse();
    match run(cli_config.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> Result<(), String> {
    let config = ClientConfig::from_env().map_err(|err| err.to_string())?;
    if let Some(log_dir) = &config.log_dir {
        let level = config
            .log_level
            .as_deref()
            .unwrap_or_else(|| default_log_level());
        init_logging(level, &log_dir.to_string_lossy())?;
    }

    let conn = open_db(&config.session_db_path).map_err(|err| err.to_string())?;
    let backend = HttpBackend::from_config(&config).map_err(|err| err.to_string())?;
    let auth = AuthService::new(&backend, SqliteSessionRepository::new(&conn));
    info!(
        "event=cli_command module=cli status=start command={}",
        command_name(&command)
    );

    match command {
        Command::Login { username, password } => sign_in(&auth, AuthMode::Login, username, password),
        Command::Register { username, password } => {
            sign_in(&auth, AuthMode::Register, username, password)
        }
        Command::Logout => {
            auth.logout().map_err(|err| err.user_message())?;
            println!("signed out");
            Ok(())
        }
        Command::Ping => with_notes(&backend, &auth, |notes| {
            println!(
                "{} version={} notes={}",
                tabla_core::ping(),
                tabla_core::core_version(),
                notes.store().notes().len()
            );
            Ok(())
        }),
        Command::List { taal } => with_notes(&backend, &auth, |notes| {
            if let Some(taal) = taal {
                notes.set_filter(&taal);
            }
            for note in notes.store().visible_notes() {
                println!("{}", summary_line(note));
            }
            Ok(())
        }),
        Command::Show { id } => with_notes(&backend, &auth, |notes| {
            let id = parse_note_id(&id);
            let note = notes
                .store()
                .get(&id)
                .ok_or_else(|| format!("Note {id} not found."))?;
            print_note(note);
            Ok(())
        }),
        Command::Add(args) => with_notes(&backend, &auth, |notes| add_note(notes, args)),
        Command::Edit { id, fields } => {
            with_notes(&backend, &auth, |notes| edit_note(notes, &parse_note_id(&id), fields))
        }
        Command::Delete { id } => with_notes(&backend, &auth, |notes| {
            let id = parse_note_id(&id);
            if notes.remove(&id).map_err(|err| err.user_message())? {
                println!("deleted {id}");
                Ok(())
            } else {
                Err(format!("Note {id} not found."))
            }
        }),
    }
}

fn command_name(command: &Command) -> &'static str {
    match command {
        Command::Ping => "ping",
        Command::List { .. } => "list",
        Command::Show { .. } => "show",
        Command::Add(_) => "add",
        Command::Edit { .. } => "edit",
        Command::Delete { .. } => "delete",
        Command::Login { .. } => "login",
        Command::Register { .. } => "register",
        Command::Logout => "logout",
    }
}

fn sign_in<A: AuthBackend, R: SessionRepository>(
    auth: &AuthService<A, R>,
    mode: AuthMode,
    username: String,
    password: String,
) -> Result<(), String> {
    let session = auth
        .authenticate(mode, Credentials::new(username, password))
        .map_err(|err| err.user_message())?;
    println!("signed in as {}", session.username);
    Ok(())
}

/// Restores the remembered session, loads notes and runs `action`.
fn with_notes<B, A, R, F>(backend: B, auth: &AuthService<A, R>, action: F) -> Result<(), String>
where
    B: NoteBackend,
    A: AuthBackend,
    R: SessionRepository,
    F: FnOnce(&mut NoteService<B>) -> Result<(), String>,
{
    let session = auth.restore().map_err(|err| err.user_message())?;
    let mut notes = NoteService::with_session(backend, session);
    notes.refresh().map_err(|err| err.user_message())?;
    action(&mut notes)
}

fn add_note<B: NoteBackend>(notes: &mut NoteService<B>, args: AddArgs) -> Result<(), String> {
    let mut fields = vec![
        DraftField::Structure(Structure::parse(args.structure.trim())),
        DraftField::Title(auto_capitalize(&args.title)),
        DraftField::Taal(args.taal),
    ];
    fields.extend(content_fields(args.content, args.main, args.tehai, args.bal, false));

    notes.cancel_edit();
    for field in fields {
        notes
            .update_draft_field(field)
            .map_err(|err| err.user_message())?;
    }
    let created = notes.commit_compose().map_err(|err| err.user_message())?;
    println!("added {}", summary_line(&created));
    Ok(())
}

fn edit_note<B: NoteBackend>(
    notes: &mut NoteService<B>,
    id: &NoteId,
    args: EditArgs,
) -> Result<(), String> {
    let mut fields = Vec::new();
    if let Some(structure) = args.structure {
        fields.push(DraftField::Structure(Structure::parse(structure.trim())));
    }
    if let Some(title) = args.title {
        fields.push(DraftField::Title(auto_capitalize(&title)));
    }
    if let Some(taal) = args.taal {
        fields.push(DraftField::Taal(taal));
    }
    fields.extend(content_fields(
        args.content,
        args.main,
        args.tehai,
        args.bal,
        args.clear_bals,
    ));
    if fields.is_empty() {
        return Err("Nothing to change.".to_string());
    }

    notes.begin_edit(id).map_err(|err| err.user_message())?;
    for field in fields {
        if let Err(err) = notes.update_draft_field(field) {
            notes.cancel_edit();
            return Err(err.user_message());
        }
    }
    let updated = notes.save_edit().map_err(|err| err.user_message())?;
    println!("updated {}", summary_line(&updated));
    Ok(())
}

fn content_fields(
    content: Option<String>,
    main: Option<String>,
    tehai: Option<String>,
    bals: Vec<String>,
    clear_bals: bool,
) -> Vec<DraftField> {
    let mut fields = Vec::new();
    if let Some(content) = content {
        fields.push(DraftField::Content(capitalize_words(&content)));
    }
    if let Some(main) = main {
        fields.push(DraftField::Main(capitalize_words(&main)));
    }
    if let Some(tehai) = tehai {
        fields.push(DraftField::Tehai(capitalize_words(&tehai)));
    }
    if clear_bals || !bals.is_empty() {
        fields.push(DraftField::Bals(
            bals.iter().map(|bal| capitalize_words(bal)).collect(),
        ));
    }
    fields
}

/// Numeric ids stay numeric on the wire; anything else is sent as text.
fn parse_note_id(raw: &str) -> NoteId {
    let raw = raw.trim();
    raw.parse::<i64>()
        .map(NoteId::from)
        .unwrap_or_else(|_| NoteId::from(raw))
}

fn summary_line(note: &Note) -> String {
    let id = note
        .id
        .as_ref()
        .map_or_else(|| "-".to_string(), ToString::to_string);
    let marker = if note.is_read_only() { " (read-only)" } else { "" };
    format!(
        "{id}\t{}\t{}\t{}{marker}",
        note.taal, note.structure, note.title
    )
}

fn print_note(note: &Note) {
    println!("{}", summary_line(note));
    if let Some(modified) = &note.date_modified {
        println!("modified: {modified}");
    }
    match &note.content {
        NoteContent::Simple(text) => println!("{text}"),
        NoteContent::Composite(composite) => {
            println!("main: {}", composite.main);
            for (index, bal) in composite.bals.iter().enumerate() {
                println!("bal {}: {bal}", index + 1);
            }
            println!("tehai: {}", composite.tehai);
        }
    }
}
