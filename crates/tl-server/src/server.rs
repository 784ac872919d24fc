use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::ledger::LedgerRegistry;
use crate::router::build_router;

/// Development ledger server. All state lives in memory.
pub struct DevLedgerServer {
    config: ServerConfig,
    registry: Arc<LedgerRegistry>,
}

impl DevLedgerServer {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            registry: Arc::new(LedgerRegistry::new()),
        }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Shared handle on the served ledgers.
    pub fn registry(&self) -> Arc<LedgerRegistry> {
        Arc::clone(&self.registry)
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        build_router(self.registry())
    }

    /// Bind the configured address and serve until the task is dropped.
    pub async fn serve(self) -> ServerResult<()> {
        let listener = TcpListener::bind(self.config.bind_addr).await?;
        self.serve_on(listener).await
    }

    /// Serve on an already bound listener.
    pub async fn serve_on(self, listener: TcpListener) -> ServerResult<()> {
        let addr: SocketAddr = listener.local_addr()?;
        tracing::info!("dev ledger listening on {addr}");
        axum::serve(listener, self.router())
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tl_remote::{CreateOutcome, HttpLedgerClient, RemoteConfig, RemoteStore, BASE_PATH};
    use tl_sync::{LoadOutcome, SyncConfig, SyncedListStore};
    use tl_types::{ItemList, ListItem};

    #[test]
    fn server_construction() {
        let server = DevLedgerServer::new(ServerConfig::default());
        assert_eq!(server.config().bind_addr.port(), 58090);
        assert!(server.registry().is_empty());
    }

    async fn spawn_server() -> (Arc<LedgerRegistry>, String) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = DevLedgerServer::new(ServerConfig { bind_addr: addr });
        let registry = server.registry();
        tokio::spawn(server.serve_on(listener));
        (registry, format!("http://{addr}{BASE_PATH}"))
    }

    #[tokio::test]
    async fn store_round_trip_over_http() {
        let (registry, base_url) = spawn_server().await;
        let remote: Arc<dyn RemoteStore> =
            Arc::new(HttpLedgerClient::new(RemoteConfig::new(&base_url, "todomvc")));

        let store = SyncedListStore::open(remote.clone(), SyncConfig::default(), ItemList::new())
            .await
            .unwrap();
        assert!(matches!(
            store.load_outcome(),
            LoadOutcome::Fallback { bootstrapped: true, .. }
        ));
        assert!(registry.contains("todomvc"));

        let milk = ListItem::new("buy milk").unwrap();
        let eggs = ListItem::new("buy eggs").unwrap();
        // Flush between writes: separate sync tasks may reach the server in any order.
        store.update(|list| list.prepended(milk.clone()).unwrap_or_else(|_| list.clone()));
        store.flush().await;
        store.update(|list| list.prepended(eggs.clone()).unwrap_or_else(|_| list.clone()));
        store.flush().await;
        store.update(|list| list.toggled(&milk.id));
        let reports = store.flush().await;
        assert!(reports.iter().all(|r| r.is_clean()));

        let reopened = SyncedListStore::open(remote.clone(), SyncConfig::default(), ItemList::new())
            .await
            .unwrap();
        assert_eq!(reopened.get(), store.get());

        store.update(|list| list.without_completed());
        store.flush().await;
        let reopened = SyncedListStore::open(remote, SyncConfig::default(), ItemList::new())
            .await
            .unwrap();
        assert_eq!(reopened.get().len(), 1);
        assert_eq!(reopened.get().as_slice()[0].content, "buy eggs");
    }

    #[tokio::test]
    async fn http_create_reports_existing_ledger() {
        let (_registry, base_url) = spawn_server().await;
        let client = HttpLedgerClient::new(RemoteConfig::new(&base_url, "twice"));
        assert_eq!(client.create_ledger(None).await.unwrap(), CreateOutcome::Created);
        assert_eq!(client.create_ledger(None).await.unwrap(), CreateOutcome::AlreadyExists);
    }

    #[tokio::test]
    async fn first_write_creates_missing_ledger() {
        let (registry, base_url) = spawn_server().await;
        let remote: Arc<dyn RemoteStore> =
            Arc::new(HttpLedgerClient::new(RemoteConfig::new(&base_url, "fresh")));
        let config = SyncConfig { bootstrap_on_load: false, ..Default::default() };

        let store = SyncedListStore::open(remote, config, ItemList::new()).await.unwrap();
        assert!(!registry.contains("fresh"));

        let item = ListItem::new("first").unwrap();
        store.set(ItemList::from_items(vec![item]).unwrap());
        let reports = store.flush().await;
        assert!(reports[0].bootstrapped);
        assert!(registry.contains("fresh"));
    }
}
