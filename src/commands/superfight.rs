use super::{CommandResult, Context};
use crate::{
    constants::MAX_PLAYERS,
    message_utils::{lobby_embed, snapshot_embed, success_embed, success_message},
    superfight::session::Left,
};
use poise::{
    command,
    serenity_prelude::{Mention, User},
    CreateReply,
};

#[allow(clippy::unused_async)]
#[command(
    slash_command,
    subcommands("create", "join", "leave", "start", "vote", "end_vote", "cancel", "info"),
    required_bot_permissions = "VIEW_CHANNEL | SEND_MESSAGES | EMBED_LINKS",
    guild_only
)]
/// Play Superfight in this channel
pub async fn superfight(_: Context<'_>) -> CommandResult {
    Ok(())
}

#[command(
    slash_command,
    rename = "new",
    required_bot_permissions = "VIEW_CHANNEL | SEND_MESSAGES | EMBED_LINKS",
    guild_only
)]
/// Open a Superfight lobby in this channel
pub async fn create(ctx: Context<'_>) -> CommandResult {
    let (channel, host) = (ctx.channel_id(), ctx.author().id);
    ctx.data().games.create_session(channel, host)?;
    ctx.send(CreateReply::default().embed(lobby_embed(channel, host, 1)))
        .await?;
    Ok(())
}

#[command(
    slash_command,
    required_bot_permissions = "VIEW_CHANNEL | SEND_MESSAGES | EMBED_LINKS",
    guild_only
)]
/// Join the Superfight lobby in this channel
pub async fn join(ctx: Context<'_>) -> CommandResult {
    let players = ctx
        .data()
        .games
        .join_session(ctx.channel_id(), ctx.author().id)
        .await?;
    ctx.send(
        CreateReply::default().embed(
            success_embed(format!(
                "{} has joined the Superfight match!",
                Mention::User(ctx.author().id)
            ))
            .field("Players", format!("{players}/{MAX_PLAYERS}"), true),
        ),
    )
    .await?;
    Ok(())
}

#[command(
    slash_command,
    required_bot_permissions = "VIEW_CHANNEL | SEND_MESSAGES | EMBED_LINKS",
    guild_only
)]
/// Leave the Superfight lobby before the match starts
pub async fn leave(ctx: Context<'_>) -> CommandResult {
    let left = ctx
        .data()
        .games
        .leave_session(ctx.channel_id(), ctx.author().id)
        .await?;
    let mut content = format!(
        "{} has left the Superfight match.",
        Mention::User(ctx.author().id)
    );
    if left == Left::HostCancelled {
        content.push_str("\nThe host has left. The game has been cancelled.");
    }
    ctx.send(success_message(content)).await?;
    Ok(())
}

#[command(
    slash_command,
    required_bot_permissions = "VIEW_CHANNEL | SEND_MESSAGES | EMBED_LINKS",
    guild_only
)]
/// Deal the cards and begin the match (host only)
pub async fn start(ctx: Context<'_>) -> CommandResult {
    // handing out cards by DM can outlast the interaction deadline
    ctx.defer().await?;
    ctx.data()
        .games
        .start_session(ctx.channel_id(), ctx.author().id)
        .await?;
    ctx.send(success_message(
        "The match is on! Check your DMs for your fighter.",
    ))
    .await?;
    Ok(())
}

#[command(
    slash_command,
    required_bot_permissions = "VIEW_CHANNEL | SEND_MESSAGES",
    guild_only,
    ephemeral
)]
/// Vote for the fighter you think won this round
pub async fn vote(
    ctx: Context<'_>,
    #[description = "The player whose fighter won the argument"] player: User,
) -> CommandResult {
    ctx.data()
        .games
        .cast_vote(ctx.channel_id(), ctx.author().id, player.id)
        .await?;
    ctx.send(success_message(format!(
        "👍 Your vote for {} has been recorded.",
        Mention::User(player.id)
    )))
    .await?;
    Ok(())
}

#[command(
    slash_command,
    rename = "endvote",
    required_bot_permissions = "VIEW_CHANNEL | SEND_MESSAGES",
    guild_only,
    ephemeral
)]
/// End the voting phase early (host only)
pub async fn end_vote(ctx: Context<'_>) -> CommandResult {
    ctx.data()
        .games
        .end_voting_early(ctx.channel_id(), ctx.author().id)
        .await?;
    ctx.send(success_message("Voting has been closed.")).await?;
    Ok(())
}

#[command(
    slash_command,
    required_bot_permissions = "VIEW_CHANNEL | SEND_MESSAGES | EMBED_LINKS",
    guild_only
)]
/// Cancel the Superfight game in this channel (host only)
pub async fn cancel(ctx: Context<'_>) -> CommandResult {
    ctx.data()
        .games
        .cancel_session(ctx.channel_id(), ctx.author().id)
        .await?;
    ctx.send(success_message("The Superfight game has been cancelled."))
        .await?;
    Ok(())
}

#[command(
    slash_command,
    required_bot_permissions = "VIEW_CHANNEL | SEND_MESSAGES | EMBED_LINKS",
    guild_only,
    ephemeral
)]
/// Show the players and progress of this channel's game
pub async fn info(ctx: Context<'_>) -> CommandResult {
    let snapshot = ctx.data().games.snapshot(ctx.channel_id()).await?;
    ctx.send(CreateReply::default().embed(snapshot_embed(&snapshot)))
        .await?;
    Ok(())
}
