//! Auth command - show and verify the token the bot would use

use crate::cli::AuthPlatform;
use crate::cli::style::{Stylize, check};
use anstream::println;
use peer_review_bot::auth::{get_github_auth, get_gitlab_auth, test_github_auth, test_gitlab_auth};

/// Run the auth command
pub async fn run_auth(platform: AuthPlatform) -> anyhow::Result<()> {
    match platform {
        AuthPlatform::Github { host } => {
            let auth = get_github_auth(host.as_deref()).await?;
            println!("{}", format!("Token source: {}", auth.source).muted());
            let login = test_github_auth(&auth).await?;
            println!("{} Authenticated to GitHub as {}", check(), login.accent());
        }
        AuthPlatform::Gitlab { host } => {
            let auth = get_gitlab_auth(host.as_deref()).await?;
            println!("{}", format!("Token source: {}", auth.source).muted());
            let username = test_gitlab_auth(&auth).await?;
            println!(
                "{} Authenticated to GitLab ({}) as {}",
                check(),
                auth.host.emphasis(),
                username.accent()
            );
        }
    }
    Ok(())
}
