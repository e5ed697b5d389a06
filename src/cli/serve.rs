//! Serve command - run the HTTP trigger endpoint

use crate::cli::GlobalArgs;
use crate::cli::context::CommandContext;
use peer_review_bot::server::{ServerState, run_server};
use std::sync::Arc;
use tracing::info;

/// Run the serve command
pub async fn run_serve(globals: &GlobalArgs, listen: Option<String>) -> anyhow::Result<()> {
    let ctx = CommandContext::new(globals).await?;
    let addr = listen.unwrap_or_else(|| ctx.config.server.listen.clone());

    info!(
        repository = %ctx.repo_slug(),
        platform = %ctx.platform_config.platform,
        merge_on_review = ctx.config.review.merge_on_review,
        "starting server"
    );

    let state = Arc::new(ServerState {
        coordinator: ctx.coordinator(),
    });
    run_server(state, &addr).await?;
    Ok(())
}
