use crate::{
    commands::{CommandError, Data},
    message_utils::failure_embed,
};
use anyhow::Result;
use poise::{CreateReply, FrameworkError};
use tracing::{error, warn};

type Context<'a> = poise::Context<'a, Data, CommandError>;

async fn reply_failure(ctx: Context<'_>, message: impl Into<String>) -> Result<()> {
    ctx.send(
        CreateReply::default()
            .embed(failure_embed(message))
            .ephemeral(true),
    )
    .await?;
    Ok(())
}

pub async fn handle(error: FrameworkError<'_, Data, CommandError>) -> Result<()> {
    match error {
        FrameworkError::Setup { error, .. } => {
            error!("Error in user data setup: {:?}", error);
        }
        FrameworkError::EventHandler { error, event, .. } => error!(
            "User event handler encountered an error on {} event: {}",
            event.snake_case_name(),
            error
        ),
        FrameworkError::Command { ctx, error, .. } => {
            let message = match error {
                CommandError::Expected(message) => message,
                CommandError::Unexpected(err) => {
                    error!(
                        "An unexpected error occured in command {}: {:?}",
                        ctx.command().qualified_name,
                        &err
                    );
                    format!("This command encountered an unexpected error:\n {err}")
                }
            };
            reply_failure(ctx, message).await?;
        }
        FrameworkError::SubcommandRequired { ctx } => {
            let subcommands = ctx
                .command()
                .subcommands
                .iter()
                .map(|s| &*s.name)
                .collect::<Vec<_>>();
            reply_failure(
                ctx,
                format!(
                    "You must specify one of the following subcommands: {}",
                    subcommands.join(", ")
                ),
            )
            .await?;
        }
        FrameworkError::CommandPanic { ctx, payload, .. } => {
            // the payload may contain internals, keep it in the logs
            error!(
                "Command {} panicked with payload: {:?}",
                ctx.command().qualified_name,
                payload
            );
            reply_failure(ctx, "An unexpected internal error has occurred.").await?;
        }
        FrameworkError::ArgumentParse {
            ctx, input, error, ..
        } => {
            let usage = ctx.command().help_text.as_deref().unwrap_or(
                "Please check `/help` for usage information.",
            );
            let message = input.map_or_else(
                || format!("**{error}**\n{usage}"),
                |input| format!("**Cannot parse `{input}` as argument: {error}**\n{usage}"),
            );
            reply_failure(ctx, message).await?;
        }
        FrameworkError::CommandStructureMismatch {
            ctx, description, ..
        } => {
            error!(
                "Failed to deserialize interaction arguments for `/{}`: {}",
                ctx.command.qualified_name, description,
            );
        }
        FrameworkError::MissingBotPermissions {
            missing_permissions,
            ctx,
            ..
        } => {
            reply_failure(
                ctx,
                format!("I can't run this command without these permissions: {missing_permissions}"),
            )
            .await?;
        }
        FrameworkError::MissingUserPermissions {
            missing_permissions,
            ctx,
            ..
        } => {
            let message = missing_permissions.map_or_else(
                || String::from("You may be lacking permissions for this command."),
                |missing| format!("You're lacking permissions for this command: {missing}"),
            );
            reply_failure(ctx, message).await?;
        }
        FrameworkError::GuildOnly { ctx, .. } => {
            reply_failure(ctx, "Superfight can only be played in a server channel.").await?;
        }
        FrameworkError::UnknownInteraction { interaction, .. } => {
            warn!("Received unknown interaction \"{}\"", interaction.data.name);
        }
        other => {
            if let Err(err) = poise::builtins::on_error(other).await {
                error!("Fallback error handler failed: {}", err);
            }
        }
    }
    Ok(())
}
