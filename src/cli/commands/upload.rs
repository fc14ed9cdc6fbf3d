//! Upload command.

use anyhow::{bail, Result};
use quantfolio_config::AppConfig;
use quantfolio_data::LocalFile;
use quantfolio_monitor::log_view;
use std::sync::Arc;
use tracing::info;

use super::controller;
use crate::cli::{output, UploadArgs};

pub async fn run(args: UploadArgs, config: &AppConfig) -> Result<()> {
    let mut options = config.session_options();
    options.parallel |= args.parallel;

    let mut session = controller(config, config.loader(), options);
    session.seed_fallback();

    for (symbol, path) in &args.files {
        if !path.exists() {
            bail!("Upload file '{}' does not exist", path.display());
        }
        session.handle_file_upload(symbol, Some(Arc::new(LocalFile::new(path))))?;
    }

    info!(files = session.state().uploads.len(), "processing uploads");
    session.on_uploads_changed().await;

    let view = session.state().view();
    log_view(&view);
    output::emit(&view, &args.output)
}
