//! Static load command.

use anyhow::Result;
use quantfolio_config::AppConfig;
use quantfolio_monitor::log_view;
use tracing::info;

use super::{controller, static_loader};
use crate::cli::{output, LoadArgs};

pub async fn run(args: LoadArgs, config: &AppConfig) -> Result<()> {
    let loader = static_loader(config, &args.source);
    let mut options = config.session_options();
    options.parallel |= args.source.parallel;

    info!(symbols = config.universe().len(), parallel = options.parallel, "loading static sources");
    let mut session = controller(config, loader, options);
    session.load_static().await;

    let view = session.state().view();
    log_view(&view);
    output::emit(&view, &args.output)
}
