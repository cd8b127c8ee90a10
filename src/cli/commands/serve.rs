//! Serve command - run the HTTP review service

use crate::cache;
use crate::cli::args::ServeArgs;
use crate::config::Config;
use crate::error::CriticResult;
use crate::review::Reviewer;
use crate::server;
use crate::ui::{self, UiContext};

/// Execute the serve command
pub async fn execute(args: ServeArgs, config: &Config) -> CriticResult<()> {
    let ctx = UiContext::detect();
    let mut config = config.clone();
    if let Some(bind) = args.bind {
        config.server.bind = bind;
    }

    ui::intro(&ctx, "Critic Service");

    // An unreachable store is fatal before any request is accepted
    let store = cache::connect(&config).await?;
    ui::step_ok_detail(&ctx, "Cache store connected", store.backend_name());

    if config.github.token.is_none() {
        ui::step_warn_hint(
            &ctx,
            "No GitHub token configured",
            "Unauthenticated requests are heavily rate limited",
        );
    }

    let reviewer = Reviewer::from_config(&config, store)?;
    ui::step_ok(
        &ctx,
        &format!(
            "Reviewing {} repositories with {}",
            reviewer.source_name(),
            reviewer.engine_name()
        ),
    );
    ui::step_info(&ctx, &format!("Listening on http://{}", config.server.bind));
    ui::remark(&ctx, "Press Ctrl-C to stop");

    server::serve(&config, reviewer).await?;

    ui::outro_success(&ctx, "Service stopped");
    Ok(())
}
