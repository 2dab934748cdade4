use super::print::{
    print_applied, print_messages, print_plan, print_problems, print_session_detail,
    print_sessions, ProgressLine,
};
use super::setup::{Cli, Commands, HistoryCommands, NamingArgs, HOME_ENV};
use clap::Parser;
use directories::ProjectDirs;
use seqren::api::{CmdResult, ConfigAction, SeqrenApi, SeqrenPaths};
use seqren::error::{Result, SeqrenError};
use seqren::fs::os::OsFileSystem;
use seqren::history::json::JsonHistoryStore;
use seqren::logging;
use seqren::plan::executable_count;
use seqren::settings::{AppSettings, KEYS};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

const EXIT_OK: i32 = 0;
const EXIT_PARTIAL: i32 = 2;

struct AppContext {
    api: SeqrenApi<JsonHistoryStore, OsFileSystem>,
    settings: AppSettings,
}

pub fn run() -> Result<i32> {
    let cli = Cli::parse();
    logging::init_logger(cli.verbose);

    let mut ctx = init_context(&cli)?;

    match cli.command {
        Commands::Preview(naming) => handle_preview(&ctx, naming),
        Commands::Rename { naming, yes } => handle_rename(&mut ctx, naming, yes),
        Commands::Undo { session } => handle_undo(&mut ctx, &session),
        Commands::History { action } => match action.unwrap_or(HistoryCommands::List) {
            HistoryCommands::List => handle_history_list(&ctx),
            HistoryCommands::Show { session } => handle_history_show(&ctx, &session),
            HistoryCommands::Clear { yes } => handle_history_clear(&mut ctx, yes),
        },
        Commands::Origin { file } => handle_origin(&ctx, &file),
        Commands::Storage { path, migrate } => handle_storage(&mut ctx, path, migrate),
        Commands::Config { key, value } => handle_config(&ctx, key, value),
    }
}

fn home_dir(cli: &Cli) -> Result<PathBuf> {
    if let Some(home) = &cli.home {
        return Ok(home.clone());
    }
    if let Some(home) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(home));
    }
    ProjectDirs::from("com", "seqren", "seqren")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| SeqrenError::Settings("Could not determine a home directory".to_string()))
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let home = home_dir(cli)?;
    let settings = AppSettings::load(&home);
    let history_file = settings.history_file(&home);
    debug!(home = %home.display(), history = %history_file.display(), "context ready");

    let api = SeqrenApi::new(
        JsonHistoryStore::new(history_file),
        OsFileSystem::new(),
        SeqrenPaths { home },
    );
    Ok(AppContext { api, settings })
}

/// Makes selected paths absolute against the working directory.
fn absolute_paths(files: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let cwd = std::env::current_dir()?;
    Ok(files
        .iter()
        .map(|p| if p.is_absolute() { p.clone() } else { cwd.join(p) })
        .collect())
}

fn exit_code(result: &CmdResult) -> i32 {
    if result.has_errors() {
        EXIT_PARTIAL
    } else {
        EXIT_OK
    }
}

fn confirm(question: &str) -> Result<bool> {
    print!("{} [y/N] ", question);
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(matches!(input.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

fn handle_preview(ctx: &AppContext, naming: NamingArgs) -> Result<i32> {
    let config = naming.config(&ctx.settings.last_config);
    let files = absolute_paths(&naming.files)?;
    let result = ctx.api.preview(&files, &config)?;
    print_plan(&result.plan);
    print_messages(&result.messages);
    Ok(exit_code(&result))
}

fn handle_rename(ctx: &mut AppContext, naming: NamingArgs, yes: bool) -> Result<i32> {
    let config = naming.config(&ctx.settings.last_config);
    if config.base_name.is_empty() {
        return Err(SeqrenError::InvalidConfig(
            "no base name given; pass --name".to_string(),
        ));
    }
    let files = absolute_paths(&naming.files)?;

    let preview = ctx.api.preview(&files, &config)?;
    print_plan(&preview.plan);
    print_messages(&preview.messages);
    if preview.has_errors() {
        return Ok(EXIT_PARTIAL);
    }

    let ready = executable_count(&preview.plan);
    if ready == 0 {
        return Ok(EXIT_OK);
    }
    if !yes && !confirm(&format!("Rename {} file(s)?", ready))? {
        println!("Operation cancelled.");
        return Ok(EXIT_OK);
    }

    let progress = ProgressLine::new();
    let result = ctx.api.apply(preview.plan, |e| progress.update(e))?;
    if result.logged.is_none() {
        print_applied(&result.results);
    }
    print_problems(&result.results);
    print_messages(&result.messages);

    ctx.api.remember_config(&config)?;
    Ok(exit_code(&result))
}

fn handle_undo(ctx: &mut AppContext, session: &str) -> Result<i32> {
    let progress = ProgressLine::new();
    let result = ctx.api.undo(session, |e| progress.update(e))?;
    print_problems(&result.results);
    print_messages(&result.messages);
    Ok(exit_code(&result))
}

fn handle_history_list(ctx: &AppContext) -> Result<i32> {
    let result = ctx.api.list_history()?;
    print_sessions(&result.sessions);
    print_messages(&result.messages);
    Ok(EXIT_OK)
}

fn handle_history_show(ctx: &AppContext, session: &str) -> Result<i32> {
    let result = ctx.api.show_session(session)?;
    for session in &result.sessions {
        print_session_detail(session);
    }
    Ok(EXIT_OK)
}

fn handle_history_clear(ctx: &mut AppContext, yes: bool) -> Result<i32> {
    if !yes && !confirm("Forget every logged session? Undo will no longer be possible.")? {
        println!("Operation cancelled.");
        return Ok(EXIT_OK);
    }
    let result = ctx.api.clear_history()?;
    print_messages(&result.messages);
    Ok(EXIT_OK)
}

fn handle_origin(ctx: &AppContext, file: &Path) -> Result<i32> {
    let file = absolute_paths(&[file.to_path_buf()])?.remove(0);
    let result = ctx.api.origin(&file)?;
    print_messages(&result.messages);
    Ok(EXIT_OK)
}

fn handle_storage(ctx: &mut AppContext, path: Option<PathBuf>, migrate: bool) -> Result<i32> {
    let Some(path) = path else {
        match ctx.api.history_location() {
            Some(location) => println!("{}", location.display()),
            None => println!("History is not stored on disk."),
        }
        return Ok(EXIT_OK);
    };
    let path = absolute_paths(&[path])?.remove(0);
    let result = ctx.api.set_storage(path, migrate)?;
    print_messages(&result.messages);
    Ok(EXIT_OK)
}

fn handle_config(ctx: &AppContext, key: Option<String>, value: Option<String>) -> Result<i32> {
    let action = match (key.clone(), value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(k), None) => ConfigAction::ShowKey(k),
        (Some(k), Some(v)) => ConfigAction::Set(k, v),
    };

    let result = ctx.api.config(action)?;
    if key.is_none() {
        if let Some(settings) = &result.settings {
            for k in KEYS {
                if let Some(v) = settings.get(k) {
                    println!("{} = {}", k, v);
                }
            }
        }
    }
    print_messages(&result.messages);
    Ok(exit_code(&result))
}
