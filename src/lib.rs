//! peer-review-bot: peer review labeling and auto-merge for pull requests
//!
//! On each trigger the bot lists open pull requests and, for every PR that is
//! not already reviewed or excluded, posts a one-time instructions comment,
//! brings the review labels in line with the approval comments, and merges
//! approved PRs when configured to.
//!
//! Layers, outermost first:
//! - [`server`]: HTTP trigger endpoint
//! - [`review`]: per-PR decision procedure (pure planning + execution)
//! - [`bot`]: [`bot::HostingClient`] seam and the [`bot::ReviewBot`] policy
//! - [`platform`]: GitHub and GitLab API services

pub mod auth;
pub mod bot;
pub mod config;
pub mod error;
pub mod platform;
pub mod review;
pub mod server;
pub mod types;
