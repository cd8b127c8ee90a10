//! Status command - check the cache store and credentials

use crate::cache;
use crate::config::{env, Config};
use crate::error::CriticResult;
use crate::ui::{self, UiContext};

/// Execute the status command
pub async fn execute(config: &Config) -> CriticResult<()> {
    let ctx = UiContext::detect();
    ui::intro(&ctx, "Critic Status");

    let mut all_ok = true;

    ui::section(&ctx, "Cache store");
    ui::key_value(&ctx, "Backend", &format!("{:?}", config.cache.backend).to_lowercase());
    ui::key_value(&ctx, "Redis", &config.redis.display_url());
    match cache::connect(config).await {
        Ok(store) => {
            match store.ping().await {
                Ok(()) => ui::step_ok_detail(&ctx, "Reachable", store.backend_name()),
                Err(e) => {
                    ui::step_error_detail(&ctx, "Ping failed", &e.to_string());
                    all_ok = false;
                }
            }
            store.close().await;
        }
        Err(e) => {
            ui::step_error_detail(&ctx, "Unreachable", &e.to_string());
            if let Some(hint) = e.hint() {
                ui::remark(&ctx, hint);
            }
            all_ok = false;
        }
    }

    ui::section(&ctx, "Credentials");
    let github = config.github.token.is_some();
    ui::key_value_status(&ctx, "GitHub token", present(github), github);
    if !github {
        ui::step_warn_hint(
            &ctx,
            "Requests to GitHub will be unauthenticated",
            &format!("Export {}", env::GITHUB_TOKEN),
        );
    }
    let openai = config.openai.api_key.is_some();
    ui::key_value_status(&ctx, "OpenAI key", present(openai), openai);
    if !openai {
        ui::step_warn(&ctx, &format!("Reviews need {} to be set", env::OPENAI_KEY));
        all_ok = false;
    }

    ui::section(&ctx, "Service");
    ui::key_value(&ctx, "Bind", &config.server.bind);
    ui::key_value(&ctx, "Model", &config.openai.model);
    ui::key_value(&ctx, "Concurrency", &config.review.concurrency.to_string());

    if all_ok {
        ui::outro_success(&ctx, "All checks passed");
    } else {
        ui::outro_warn(&ctx, "Some checks failed - see above for details");
    }

    Ok(())
}

fn present(set: bool) -> &'static str {
    if set {
        "set"
    } else {
        "missing"
    }
}
