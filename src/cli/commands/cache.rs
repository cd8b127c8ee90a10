//! Cache command - inspect cached reviews

use crate::cache::{self, CacheKey};
use crate::cli::args::{CacheAction, CacheArgs};
use crate::cli::commands::review::print_review;
use crate::config::Config;
use crate::error::{CriticError, CriticResult};
use crate::review::RepoReview;
use crate::ui::{self, UiContext};

/// Execute the cache command
pub async fn execute(args: CacheArgs, config: &Config) -> CriticResult<()> {
    match args.action {
        CacheAction::Show { repo, file, sha } => {
            let key = target_key(repo, file, sha)?;
            show_entry(config, key).await
        }
    }
}

/// Key addressed by the `show` flags; clap guarantees one complete target
fn target_key(
    repo: Option<String>,
    file: Option<String>,
    sha: Option<String>,
) -> CriticResult<CacheKey> {
    match (repo, file, sha) {
        (Some(identity), _, _) => Ok(CacheKey::repo(identity)),
        (None, Some(name), Some(fingerprint)) => Ok(CacheKey::file(name, fingerprint)),
        _ => Err(CriticError::Internal(
            "cache show needs --repo or --file with --sha".to_string(),
        )),
    }
}

async fn show_entry(config: &Config, key: CacheKey) -> CriticResult<()> {
    let ctx = UiContext::detect();
    let store = cache::connect(config).await?;
    let value = store.get(&key).await;
    store.close().await;

    let Some(value) = value? else {
        ui::step_warn_hint(&ctx, &format!("No entry under {}", key), "Run `critic review` first");
        return Ok(());
    };

    ui::step_ok_detail(&ctx, "Cached entry", &key.to_string());
    if key.is_repo() {
        let review = RepoReview::from_record(&value).map_err(|e| CriticError::CorruptRecord {
            key: key.to_string(),
            reason: e.to_string(),
        })?;
        print_review(&ctx, &review);
    } else {
        ui::note(&ctx, "Assessment", &value);
    }
    Ok(())
}
