use crate::render;
use anyhow::Context;
use clap::Parser;
use pulse_backend::{Backend, HttpBackend};
use pulse_backend::views::{
    ComposerController, DashboardController, IntegrationsController, PostDraft, Slot,
};
use pulse_core::audit::{AuditContext, AuditLogger, AuditStatus};
use pulse_core::config::{AppConfig, default_config_path};
use pulse_core::dashboard::{TokenSummary, classify_all, group_by_platform};
use pulse_core::TokenRecord;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use time::OffsetDateTime;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

mod accounts_cmd;
mod app;
mod args;
mod config_cmd;
mod dashboard_cmd;
mod post_cmd;
mod scheduler_cmd;
mod shared;
#[cfg(test)]
mod tests;
mod tokens_cmd;

use args::*;

use accounts_cmd::handle_accounts;
use config_cmd::handle_config;
use dashboard_cmd::handle_dashboard;
use post_cmd::{handle_jobs, handle_post};
use scheduler_cmd::handle_scheduler;
use shared::{audited, backend_from, load_config, parse_instant, print_json};
use tokens_cmd::handle_tokens;

pub async fn run() -> anyhow::Result<()> {
    app::run().await
}
