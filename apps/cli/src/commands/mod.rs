//! CLI command definitions and dispatch.

use std::num::{NonZeroU32, NonZeroUsize};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use clap::{Parser, Subcommand};

use droplink_client::{ApiClient, Session, default_session_path};
use droplink_protocol::limits;

pub mod auth;
pub mod link;
pub mod send;
pub mod storage;
pub mod transfers;

/// DropLink - private file transfers with shareable links
#[derive(Parser)]
#[command(name = "droplink")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Base URL of the DropLink server
    #[arg(
        long,
        global = true,
        env = "DROPLINK_SERVER",
        default_value = "http://localhost:8080"
    )]
    pub server: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Sign in and store the session token
    Login(LoginArgs),

    /// Create an account and sign in
    Register(LoginArgs),

    /// Discard the stored session
    Logout,

    /// Upload files as one transfer and print the shared link
    Send(SendArgs),

    /// List your transfers
    List,

    /// Show one transfer in detail
    Info(TransferIdArgs),

    /// Look up a transfer by its shared-link uuid (recipient view)
    View(ViewArgs),

    /// Delete a transfer and its files
    Delete(TransferIdArgs),

    /// Manage a transfer's shared link
    #[command(subcommand)]
    Link(LinkCommand),

    /// Show storage usage
    Storage,
}

#[derive(Parser)]
pub struct LoginArgs {
    /// Account email
    pub email: String,

    /// Password; prompted for when omitted
    #[arg(long, env = "DROPLINK_PASSWORD")]
    pub password: Option<String>,
}

#[derive(Parser)]
pub struct SendArgs {
    /// Files to upload
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Bytes per chunk
    #[arg(long, default_value_t = limits::DEFAULT_CHUNK_SIZE)]
    pub chunk_size: u64,

    /// Chunks uploaded in parallel
    #[arg(long, default_value_t = NonZeroUsize::new(limits::DEFAULT_MAX_CONCURRENT_UPLOADS).unwrap())]
    pub concurrency: NonZeroUsize,

    /// Attempts per chunk before giving up
    #[arg(long, default_value_t = NonZeroU32::new(limits::DEFAULT_CHUNK_UPLOAD_RETRIES).unwrap())]
    pub retries: NonZeroU32,
}

#[derive(Parser)]
pub struct TransferIdArgs {
    /// Transfer id
    pub id: i64,
}

#[derive(Parser)]
pub struct ViewArgs {
    /// Shared-link uuid from the download URL
    pub uuid: String,
}

#[derive(Subcommand)]
pub enum LinkCommand {
    /// Change a link's expiry or download limit
    Update(LinkUpdateArgs),

    /// Disable a link
    Delete(LinkIdArgs),
}

#[derive(Parser)]
pub struct LinkUpdateArgs {
    /// Shared link id
    pub id: i64,

    /// New expiry, e.g. 2026-09-30T18:00:00
    #[arg(long)]
    pub expires_at: Option<NaiveDateTime>,

    /// New download limit
    #[arg(long)]
    pub max_downloads: Option<u32>,
}

#[derive(Parser)]
pub struct LinkIdArgs {
    /// Shared link id
    pub id: i64,
}

pub async fn run(cli: Cli) -> Result<()> {
    let session_path = default_session_path().context("no config directory on this platform")?;
    let session = Arc::new(Session::load(session_path)?);
    let api = ApiClient::new(cli.server, session);

    match cli.command {
        Command::Login(args) => auth::login(&api, args).await,
        Command::Register(args) => auth::register(&api, args).await,
        Command::Logout => auth::logout(&api),
        Command::Send(args) => send::run(&api, args).await,
        Command::List => transfers::list(&api).await,
        Command::Info(args) => transfers::info(&api, args.id).await,
        Command::View(args) => transfers::view(&api, &args.uuid).await,
        Command::Delete(args) => transfers::delete(&api, args.id).await,
        Command::Link(cmd) => link::run(&api, cmd).await,
        Command::Storage => storage::run(&api).await,
    }
}
