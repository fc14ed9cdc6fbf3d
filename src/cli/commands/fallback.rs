//! Sample data command.

use anyhow::Result;
use quantfolio_config::AppConfig;

use super::controller;
use crate::cli::{output, FallbackArgs};

pub async fn run(args: FallbackArgs, config: &AppConfig) -> Result<()> {
    let mut options = config.session_options();
    if args.seed.is_some() {
        options.fallback_seed = args.seed;
    }

    let mut session = controller(config, config.loader(), options);
    session.seed_fallback();

    output::emit(&session.state().view(), &args.output)
}
