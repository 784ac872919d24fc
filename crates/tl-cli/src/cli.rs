use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tl_types::StatusFilter;

#[derive(Parser)]
#[command(name = "tl", about = "todo-ledger: a list kept in sync with a remote ledger", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// TOML file with [remote], [sync] and [server] tables
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Ledger API base URL, e.g. http://localhost:58090/fluree
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    #[arg(long, global = true)]
    pub ledger: Option<String>,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show the list
    List(ListArgs),
    /// Add an item at the top of the list
    Add(AddArgs),
    /// Flip an item between active and completed
    Toggle(IdArgs),
    /// Complete every item, or reopen all if all are completed
    ToggleAll,
    /// Replace an item's text
    Edit(EditArgs),
    /// Delete an item
    Delete(IdArgs),
    /// Delete every completed item
    ClearCompleted,
    /// Run the in-memory development ledger
    Serve(ServeArgs),
}

#[derive(Args)]
pub struct ListArgs {
    /// all, active or completed
    #[arg(long, default_value = "all")]
    pub filter: StatusFilter,
}

#[derive(Args)]
pub struct AddArgs {
    #[arg(required = true)]
    pub content: Vec<String>,
}

#[derive(Args)]
pub struct IdArgs {
    /// Item id or a unique prefix of it
    pub id: String,
}

#[derive(Args)]
pub struct EditArgs {
    /// Item id or a unique prefix of it
    pub id: String,
    #[arg(required = true)]
    pub content: Vec<String>,
}

#[derive(Args)]
pub struct ServeArgs {
    #[arg(long)]
    pub bind: Option<SocketAddr>,
}
