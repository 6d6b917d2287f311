use std::path::PathBuf;
use std::time::Duration;

use auconnect::ClientError;
use auconnect::api::Backend;
use auconnect::config::{ClientConfig, ConfigError};
use auconnect::format::format_message_time_now;
use auconnect::models::{ConnectionAction, PhotoKind};
use auconnect::pages::connections::ConnectionsPage;
use auconnect::pages::edit::ProfileEditor;
use auconnect::pages::nav::NavBar;
use auconnect::routes::{self, Navigation};
use auconnect::sync::OptimisticMutator;
use auconnect::state::messages::MessagesState;
use auconnect::state::{AppContext, ViewCell};
use base64::Engine;
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::{Value, json};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error("no message with id {0} in the recent list")]
    UnknownMessage(i64),
    #[error("failed to read {path}: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("signal handler failed: {0}")]
    Signal(std::io::Error),
}

#[derive(Parser, Debug)]
#[command(name = "auconnect-cli", about = "AuConnect client shell")]
struct Cli {
    /// Overrides AUCONNECT_BASE_URL from the client config.
    #[arg(long, env = "AUCONNECT_BASE_URL")]
    base_url: Option<String>,

    #[arg(long, env = "AUCONNECT_SESSION_FILE")]
    session_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Store the session username.
    Login { username: String },
    Logout,
    Whoami,
    /// Resolve a client route against the current session.
    Route { path: String },
    /// Mount the navigation bar and log badge changes until Ctrl-C.
    Watch,
    /// List pending connection requests.
    Requests,
    Accept { username: String },
    Reject { username: String },
    /// List connections of a user, the session user by default.
    Connections { username: Option<String> },
    Disconnect { username: String },
    /// List recent message summaries.
    Messages,
    /// Mark a message summary read.
    Read { id: i64 },
    Search { term: String },
    /// Show a profile, the session user's by default.
    Profile { username: Option<String> },
    UploadPhoto {
        /// `profile` or `cover`.
        kind: PhotoKind,
        file: PathBuf,
        /// Send as a base64 data URL instead of multipart.
        #[arg(long, default_value_t = false)]
        base64: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = ClientConfig::from_env()?;
    if let Some(base_url) = &cli.base_url {
        config = config.with_base_url(base_url);
    }
    if let Some(path) = cli.session_file {
        config = config.with_session_file(path);
    }
    let ctx = AppContext::from_config(config)?;

    match cli.command {
        Command::Login { username } => {
            ctx.session.login(&username)?;
            print_json(&json!({ "username": username.trim() }))
        }
        Command::Logout => {
            ctx.session.logout()?;
            print_json(&json!({ "loggedOut": true }))
        }
        Command::Whoami => print_json(&json!({ "username": ctx.session.username() })),
        Command::Route { path } => run_route(&ctx, &path),
        Command::Watch => run_watch(&ctx).await,
        Command::Requests => {
            let page = ConnectionsPage::mount(&ctx, None).await?;
            print_json(&page.state.read(|s| s.pending.clone()))
        }
        Command::Accept { username } => respond(&ctx, &username, ConnectionAction::Accept).await,
        Command::Reject { username } => respond(&ctx, &username, ConnectionAction::Reject).await,
        Command::Connections { username } => {
            let page = ConnectionsPage::mount(&ctx, username.as_deref()).await?;
            print_json(&json!({
                "title": page.title(),
                "total": page.connection_count(),
                "pending": page.pending_count(),
                "connections": page.state.read(|s| s.connections.clone()),
            }))
        }
        Command::Disconnect { username } => {
            let page = ConnectionsPage::mount(&ctx, None).await?;
            page.remove_connection(&username).await?;
            print_json(&json!({ "disconnected": username }))
        }
        Command::Messages => run_messages(&ctx).await,
        Command::Read { id } => run_read(&ctx, id).await,
        Command::Search { term } => {
            let results = if term.trim().is_empty() { Vec::new() } else { ctx.backend.search_users(term.trim()).await? };
            print_json(&results)
        }
        Command::Profile { username } => {
            let username = match username {
                Some(u) => u,
                None => ctx.session.require()?,
            };
            print_json(&ctx.backend.fetch_profile(&username).await?)
        }
        Command::UploadPhoto { kind, file, base64 } => run_upload(&ctx, kind, file, base64).await,
    }
}

fn run_route(ctx: &AppContext, path: &str) -> Result<(), CliError> {
    let outcome = match routes::resolve(path, &ctx.session) {
        Navigation::Render(route) => json!({ "render": route.path() }),
        Navigation::Redirect(route) => json!({ "redirect": route.path() }),
        Navigation::NotFound => json!({ "notFound": path }),
    };
    print_json(&outcome)
}

async fn run_watch(ctx: &AppContext) -> Result<(), CliError> {
    let mut nav = NavBar::mount(ctx).await?;
    info!(username = nav.username(), messages = %nav.message_badge(), requests = %nav.request_badge(), "watching");

    let mut last = (nav.message_badge(), nav.request_badge());
    let mut ticker = tokio::time::interval(Duration::from_millis(500));
    loop {
        tokio::select! {
            signal = tokio::signal::ctrl_c() => {
                signal.map_err(CliError::Signal)?;
                break;
            }
            _ = ticker.tick() => {
                let now = (nav.message_badge(), nav.request_badge());
                if now != last {
                    info!(messages = %now.0, requests = %now.1, "badges changed");
                    last = now;
                }
            }
        }
    }
    nav.unmount();
    Ok(())
}

async fn respond(ctx: &AppContext, username: &str, action: ConnectionAction) -> Result<(), CliError> {
    let page = ConnectionsPage::mount(ctx, None).await?;
    page.respond_to_request(username, action).await?;
    print_json(&json!({ "username": username, "action": action.as_path(), "pending": page.pending_count() }))
}

async fn load_messages(ctx: &AppContext) -> Result<(OptimisticMutator, ViewCell<MessagesState>), CliError> {
    let username = ctx.session.require()?;
    let mutator = OptimisticMutator::new(ctx);
    let cell = ViewCell::new(MessagesState::default());
    if !mutator.refresh_messages(&cell, &username).await {
        // The refresh helper logs and swallows; surface the failure here.
        ctx.backend.fetch_recent_messages(&username).await?;
    }
    Ok((mutator, cell))
}

async fn run_messages(ctx: &AppContext) -> Result<(), CliError> {
    let (_, cell) = load_messages(ctx).await?;
    let rows: Vec<Value> = cell.read(|s| {
        s.items
            .iter()
            .map(|m| {
                json!({
                    "id": m.id,
                    "sender": m.sender,
                    "preview": m.preview,
                    "time": format_message_time_now(m.timestamp.as_deref()),
                    "unread": m.unread,
                })
            })
            .collect()
    });
    print_json(&json!({ "unread": cell.read(MessagesState::unread_count), "messages": rows }))
}

async fn run_read(ctx: &AppContext, id: i64) -> Result<(), CliError> {
    let (mutator, cell) = load_messages(ctx).await?;
    if cell.read(|s| s.get(id).is_none()) {
        return Err(CliError::UnknownMessage(id));
    }
    mutator.mark_read(&cell, id).await?;
    print_json(&json!({ "read": id, "unread": cell.read(MessagesState::unread_count) }))
}

async fn run_upload(ctx: &AppContext, kind: PhotoKind, file: PathBuf, as_data_url: bool) -> Result<(), CliError> {
    let bytes = tokio::fs::read(&file).await.map_err(|source| CliError::ReadFile { path: file.clone(), source })?;
    let editor = ProfileEditor::mount(ctx).await?;

    let url = if as_data_url {
        let encoded = base64::engine::general_purpose::STANDARD.encode(&bytes);
        let data_url = format!("data:{};base64,{encoded}", image_mime(&file));
        editor.upload_base64(&data_url, kind).await?
    } else {
        let file_name = file.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_else(|| "upload".into());
        editor.upload_photo(kind, &file_name, bytes).await?
    };
    print_json(&json!({ "type": kind.as_str(), "url": url }))
}

fn image_mime(path: &std::path::Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase).as_deref() {
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "image/jpeg",
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
