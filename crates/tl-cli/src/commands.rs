use std::sync::Arc;

use anyhow::Context;
use colored::Colorize;
use tl_remote::{HttpLedgerClient, RemoteStore};
use tl_server::DevLedgerServer;
use tl_sync::{LoadOutcome, SyncedListStore};
use tl_types::{ItemList, ListItem, StatusFilter};

use crate::cli::*;
use crate::config::CliConfig;
use crate::output::{render_json, render_text, resolve_id};

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    let mut config = CliConfig::load(cli.config.as_deref())?;
    config.override_remote(cli.base_url, cli.ledger);
    let format = cli.format;

    match cli.command {
        Command::Serve(args) => cmd_serve(config, args).await,
        Command::List(args) => {
            let store = open_store(&config).await?;
            print_list(&store.get(), args.filter, format)
        }
        Command::Add(args) => {
            let item = ListItem::new(&args.content.join(" "))?;
            mutate(&config, format, |list| Ok(list.prepended(item)?)).await
        }
        Command::Toggle(args) => {
            mutate(&config, format, |list| Ok(list.toggled(&resolve_id(list, &args.id)?))).await
        }
        Command::ToggleAll => mutate(&config, format, |list| Ok(list.all_toggled())).await,
        Command::Edit(args) => {
            let content = args.content.join(" ");
            let content = content.trim();
            anyhow::ensure!(!content.is_empty(), "content must not be empty");
            mutate(&config, format, |list| {
                Ok(list.with_content(&resolve_id(list, &args.id)?, content))
            })
            .await
        }
        Command::Delete(args) => {
            mutate(&config, format, |list| Ok(list.without(&resolve_id(list, &args.id)?))).await
        }
        Command::ClearCompleted => {
            mutate(&config, format, |list| Ok(list.without_completed())).await
        }
    }
}

async fn cmd_serve(config: CliConfig, args: ServeArgs) -> anyhow::Result<()> {
    let mut server_config = config.server;
    if let Some(bind) = args.bind {
        server_config.bind_addr = bind;
    }
    println!(
        "{} dev ledger on {}{}",
        "✓".green().bold(),
        format!("http://{}", server_config.bind_addr).bold(),
        tl_remote::BASE_PATH
    );
    DevLedgerServer::new(server_config).serve().await?;
    Ok(())
}

async fn open_store(config: &CliConfig) -> anyhow::Result<SyncedListStore> {
    let remote: Arc<dyn RemoteStore> = Arc::new(HttpLedgerClient::new(config.remote.clone()));
    let store = SyncedListStore::open(remote, config.sync.clone(), ItemList::new())
        .await
        .context("opening list store")?;
    if let LoadOutcome::Fallback { reason, .. } = store.load_outcome() {
        eprintln!(
            "{} could not load ledger {}: {reason}",
            "warning:".yellow().bold(),
            config.remote.ledger.bold()
        );
    }
    Ok(store)
}

/// Open the store, commit one change, wait for the ledger to catch up, print.
///
/// The change is computed up front so a bad id fails before anything is written.
async fn mutate<F>(config: &CliConfig, format: OutputFormat, change: F) -> anyhow::Result<()>
where
    F: FnOnce(&ItemList) -> anyhow::Result<ItemList>,
{
    let store = open_store(config).await?;
    let next = change(&store.get())?;
    store.set(next);

    for report in store.flush().await {
        if report.bootstrapped {
            eprintln!("{} created ledger {}", "note:".cyan(), config.remote.ledger.bold());
        }
        for failure in &report.failures {
            eprintln!("{} sync failed: {failure}", "warning:".yellow().bold());
        }
    }
    print_list(&store.get(), StatusFilter::All, format)
}

fn print_list(list: &ItemList, filter: StatusFilter, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => print!("{}", render_text(list, filter)),
        OutputFormat::Json => println!("{}", render_json(list, filter)?),
    }
    Ok(())
}
