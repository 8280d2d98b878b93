use std::{future::Future, net::SocketAddr, sync::Arc};

use configs::{AppConfig, StorageBackend};
use service::{
    identity::{IdentityVerifier, JwtVerifier},
    objects::{LocalObjectStore, MemoryObjectStore, ObjectStore},
    store::{DocumentStore, FileDocumentStore, MemoryDocumentStore},
};
use tracing::info;

use crate::{errors::StartupError, routes, state::AppState};

/// Wire the configured adapters into the shared handles.
pub async fn build_state(cfg: &AppConfig) -> Result<AppState, StartupError> {
    let (documents, objects): (Arc<dyn DocumentStore>, Arc<dyn ObjectStore>) = match cfg.storage.backend {
        StorageBackend::Memory => (Arc::new(MemoryDocumentStore::new()), Arc::new(MemoryObjectStore::new())),
        StorageBackend::File => {
            let documents = FileDocumentStore::open(cfg.storage.documents_path())
                .await
                .map_err(|e| StartupError::Storage(e.to_string()))?;
            let objects = LocalObjectStore::new(cfg.storage.objects_root())
                .await
                .map_err(|e| StartupError::Storage(e.to_string()))?;
            (Arc::new(documents), Arc::new(objects))
        }
    };
    info!(backend = ?cfg.storage.backend, data_dir = %cfg.storage.data_dir.display(), bucket = %cfg.storage.bucket, "storage ready");

    let verifier: Arc<dyn IdentityVerifier> = Arc::new(JwtVerifier::new(&cfg.auth.jwt_secret));
    Ok(AppState::new(documents, objects, verifier, &cfg.storage, cfg.server.max_upload_bytes))
}

fn bind_addr(cfg: &AppConfig) -> Result<SocketAddr, StartupError> {
    format!("{}:{}", cfg.server.host, cfg.server.port)
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("server address: {e}")))
}

/// Build the app and serve until `shutdown` resolves.
pub async fn run(cfg: AppConfig, shutdown: impl Future<Output = ()> + Send + 'static) -> anyhow::Result<()> {
    let state = build_state(&cfg).await?;
    let app = routes::build_router(state);

    let addr = bind_addr(&cfg)?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "listening");
    axum::serve(listener, app).with_graceful_shutdown(shutdown).await?;
    Ok(())
}
