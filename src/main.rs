#![deny(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(
    clippy::missing_panics_doc,
    clippy::missing_errors_doc,
    clippy::module_name_repetitions,
    clippy::unreadable_literal,
    clippy::must_use_candidate
)]

mod commands;
mod config;
mod constants;
mod error_handler;
mod message_utils;
mod retry_strategies;
mod superfight;

use anyhow::Result;
use commands::Data;
use config::Config;
use poise::{
    builtins,
    serenity_prelude::{ClientBuilder, Command, CreateAllowedMentions, GatewayIntents},
    Framework, FrameworkOptions,
};
use std::sync::Arc;
use superfight::{discord::DiscordAnnouncer, GameRegistry};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let config = Config::from_env()?;
    let timings = config.timings;
    let options = FrameworkOptions {
        commands: vec![
            commands::superfight::superfight(),
            commands::help::help(),
        ],
        on_error: |err| {
            Box::pin(async move {
                if let Err(err) = error_handler::handle(err).await {
                    error!("Error while handling error: {}", err);
                }
            })
        },
        allowed_mentions: Some(
            CreateAllowedMentions::new()
                .all_roles(false)
                .all_users(true)
                .replied_user(true),
        ),
        ..Default::default()
    };
    let framework = Framework::builder()
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                info!("Logged in as {}", ready.user.name);
                Command::set_global_commands(
                    ctx,
                    builtins::create_application_commands(&framework.options().commands),
                )
                .await?;
                let announcer = DiscordAnnouncer::new(ctx.cache.clone(), ctx.http.clone());
                Ok(Data {
                    games: Arc::new(GameRegistry::new(announcer, timings)),
                })
            })
        })
        .options(options)
        .build();
    let mut client = ClientBuilder::new(config.token, GatewayIntents::non_privileged())
        .framework(framework)
        .await?;
    Ok(client.start().await?)
}
