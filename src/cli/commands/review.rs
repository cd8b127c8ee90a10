//! Review command - review one repository from the terminal

use crate::cache;
use crate::cli::args::{OutputFormat, ReviewArgs};
use crate::config::Config;
use crate::error::CriticResult;
use crate::review::{RepoReview, ReviewRequest, Reviewer};
use crate::ui::{self, TaskSpinner, UiContext};

/// Execute the review command
pub async fn execute(args: ReviewArgs, config: &Config) -> CriticResult<()> {
    let json = args.format == OutputFormat::Json;
    let ctx = UiContext::detect().with_quiet(json);

    let request = ReviewRequest {
        task_requirements: args.requirements,
        git_hub_url: args.url,
        developer_level: args.level.into(),
    };
    // Reject bad links before connecting anywhere
    let coordinate = request.coordinate()?;

    ui::intro(&ctx, "Critic Review");

    let store = cache::connect(config).await?;
    let reviewer = Reviewer::from_config(config, store)?;

    let mut spinner = TaskSpinner::new(&ctx);
    spinner.start(&format!("Reviewing {}...", coordinate));
    let run = match reviewer.review_run(&request).await {
        Ok(run) => run,
        Err(e) => {
            spinner.stop_error("Review failed");
            reviewer.store().close().await;
            return Err(e);
        }
    };

    if run.from_cache {
        spinner.stop("Served from cache");
    } else {
        spinner.stop(&format!(
            "Reviewed {} files ({} cached, {} assessed)",
            run.review.file_names.len(),
            run.hits,
            run.assessed
        ));
    }
    reviewer.store().close().await;

    if json {
        println!("{}", serde_json::to_string_pretty(&run.review)?);
        return Ok(());
    }

    print_review(&ctx, &run.review);
    ui::outro_success(&ctx, "Review complete");
    Ok(())
}

/// Render a review as text
pub(crate) fn print_review(ctx: &UiContext, review: &RepoReview) {
    ui::section(ctx, "Repository");
    ui::key_value(ctx, "Commit", &review.repository.repository_hash);
    ui::key_value(ctx, "Level", &review.level.to_string());
    match review.grade {
        Some(grade) => ui::key_value_status(ctx, "Grade", &grade.to_string(), grade.value() >= 3),
        None => ui::key_value_status(ctx, "Grade", "not given", false),
    }
    ui::key_value(ctx, "Files", &review.file_names.len().to_string());
    for name in &review.file_names {
        ui::remark(ctx, name);
    }

    ui::note(ctx, "Summary", &review.message);
}
