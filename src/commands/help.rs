use super::{CommandResult, Context};
use poise::{builtins, command, samples::HelpConfiguration};

/// An overview of the bot's commands
#[command(slash_command, ephemeral)]
pub async fn help(ctx: Context<'_>) -> CommandResult {
    builtins::help(
        ctx,
        None,
        HelpConfiguration {
            show_subcommands: true,
            extra_text_at_bottom: "Superfight: argue why your randomly dealt fighter would win, then let the channel vote.",
            ..Default::default()
        },
    )
    .await?;
    Ok(())
}
