//! Scan command - one review pass, waiting for every PR

use crate::cli::GlobalArgs;
use crate::cli::context::CommandContext;
use crate::cli::style::{Stylize, check, cross, spinner_style};
use anstream::println;
use indicatif::ProgressBar;
use peer_review_bot::review::PrOutcome;
use std::time::Duration;

/// Run the scan command
///
/// Fails when any PR could not be processed cleanly, so the command can
/// be run from cron and alert on errors.
pub async fn run_scan(globals: &GlobalArgs) -> anyhow::Result<()> {
    let ctx = CommandContext::new(globals).await?;
    let coordinator = ctx.coordinator();

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(spinner_style());
    spinner.set_message(format!("Listing open PRs in {}...", ctx.repo_slug().emphasis()));
    spinner.enable_steady_tick(Duration::from_millis(80));

    let handle = coordinator.scan().await?;
    spinner.set_message(handle.message());

    let mut outcomes = handle.join_all().await;
    outcomes.sort_by_key(PrOutcome::pr_number);
    spinner.finish_and_clear();

    if outcomes.is_empty() {
        println!("{}", "No open PRs.".muted());
        return Ok(());
    }

    let mut failed = 0;
    for outcome in &outcomes {
        let ok = match outcome {
            PrOutcome::Skipped { .. } => true,
            PrOutcome::Reviewed { outcome, .. } => outcome.is_success(),
            PrOutcome::Failed { .. } => false,
        };
        if !ok {
            failed += 1;
        }

        let mark = if ok { check() } else { cross() };
        let header = format!("#{}", outcome.pr_number()).accent();
        println!("{mark} {header}");
        for message in outcome.messages() {
            println!("    {}", message.muted());
        }
    }

    println!();
    println!(
        "{} {}",
        "Processed".emphasis(),
        format!("{} PR(s)", outcomes.len()).accent()
    );

    if failed > 0 {
        println!("{}", format!("{failed} with errors").warn());
        anyhow::bail!("{failed} PR(s) had errors");
    }
    Ok(())
}
