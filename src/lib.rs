//! Shelf application library
//!
//! Personal library catalog: books, their comment threads, and the bootstrap
//! that wires the selected storage backend into the HTTP server.

pub mod modules;

use anyhow::Context;
use shelf_kernel::{settings::Settings, InitCtx, ModuleRegistry};

pub use modules::books::store::{resolve as resolve_store, BackendKind, BookStore, SharedStore};

/// Build a registry with every module mounted on `store`.
pub fn build_registry(store: SharedStore) -> ModuleRegistry {
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, store);
    registry
}

/// Resolve the storage backend, then serve until a shutdown signal arrives.
///
/// The backend is chosen before the listener binds, so no request can observe
/// a different backend than the one logged here.
pub async fn run(settings: Settings) -> anyhow::Result<()> {
    tracing::info!(env = ?settings.environment, "shelf bootstrap starting");

    let store = resolve_store(&settings.database).await;
    let registry = build_registry(store);
    let ctx = InitCtx {
        settings: &settings,
    };

    registry.init_modules(&ctx).await?;
    registry.start_modules(&ctx).await?;
    tracing::info!("shelf bootstrap complete");

    let served = shelf_http::start_server(&registry, &settings)
        .await
        .context("server terminated with an error");

    registry.stop_modules().await?;
    served
}
