//! CLI command implementations.

pub mod fallback;
pub mod load;
pub mod stats;
pub mod upload;
pub mod validate;

use quantfolio_config::AppConfig;
use quantfolio_data::{DirectoryFetcher, HttpFetcher, SourceLoader};
use quantfolio_session::{SessionController, SessionOptions};
use std::sync::Arc;

use crate::cli::SourceArgs;

/// Static loader honoring `--dir` / `--base-url` over the configured source.
pub(crate) fn static_loader(config: &AppConfig, source: &SourceArgs) -> SourceLoader {
    match (&source.dir, &source.base_url) {
        (Some(dir), _) => config.loader_with(Arc::new(DirectoryFetcher::new(dir))),
        (None, Some(url)) => config.loader_with(Arc::new(HttpFetcher::new(url))),
        (None, None) => config.loader(),
    }
}

pub(crate) fn controller(
    config: &AppConfig,
    loader: SourceLoader,
    options: SessionOptions,
) -> SessionController {
    SessionController::new(config.universe(), loader, config.fallback_generator(), options)
}
