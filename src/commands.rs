use crate::superfight::{discord::DiscordAnnouncer, GameRegistry};
use poise::serenity_prelude;
use std::sync::Arc;
use thiserror::Error;

pub mod help;
pub mod superfight;

pub struct Data {
    pub games: Arc<GameRegistry<DiscordAnnouncer>>,
}

type Context<'a> = poise::Context<'a, Data, CommandError>;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    Expected(String),
    #[error(transparent)]
    Unexpected(anyhow::Error),
}

impl From<serenity_prelude::Error> for CommandError {
    fn from(value: serenity_prelude::Error) -> Self {
        Self::Unexpected(value.into())
    }
}

type CommandResult = Result<(), CommandError>;
