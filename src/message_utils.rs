use crate::{
    constants::{self, MAX_PLAYERS},
    superfight::{
        announcer::{Announcement, Fighter},
        cards::Card,
        session::{GameState, SessionSnapshot},
    },
};
use poise::{
    serenity_prelude::{ChannelId, CreateEmbed, CreateEmbedFooter, Mention, UserId},
    CreateReply,
};

pub fn success_embed(content: impl Into<String>) -> CreateEmbed {
    CreateEmbed::new()
        .description(content)
        .color(constants::SUCCESS_COLOR)
}

pub fn failure_embed(content: impl Into<String>) -> CreateEmbed {
    CreateEmbed::new()
        .description(content)
        .color(constants::FAILURE_COLOR)
}

pub fn info_embed(content: impl Into<String>) -> CreateEmbed {
    CreateEmbed::new()
        .description(content)
        .color(constants::INFO_COLOR)
}

fn game_embed(title: impl Into<String>) -> CreateEmbed {
    CreateEmbed::new()
        .title(title)
        .color(constants::GAME_COLOR)
}

pub fn success_message(content: impl Into<String>) -> CreateReply {
    CreateReply::default().embed(success_embed(content))
}

fn mention(user: UserId) -> String {
    Mention::User(user).to_string()
}

fn mention_list(users: &[UserId]) -> String {
    users
        .iter()
        .copied()
        .map(mention)
        .collect::<Vec<_>>()
        .join(" and ")
}

fn card_text(card: Option<&Card>) -> String {
    card.map_or_else(|| String::from("No card assigned"), ToString::to_string)
}

pub fn round_verdict(winners: &[UserId]) -> String {
    match winners {
        [] => String::from("No one received any votes!"),
        [winner] => format!("The winner is {}!", mention(*winner)),
        _ => format!("It's a tie between {}!", mention_list(winners)),
    }
}

pub fn match_verdict(winners: &[UserId], best: usize) -> String {
    match winners {
        [] => String::from("No clear winner! Everyone's a champion today!"),
        [winner] => format!(
            "The champion is {} with {best} round win(s)!",
            mention(*winner)
        ),
        _ => format!(
            "It's a tie between {}, each with {best} round win(s)!",
            mention_list(winners)
        ),
    }
}

fn fighter_fields(embed: CreateEmbed, fighters: &[Fighter; 2]) -> CreateEmbed {
    fighters.iter().fold(embed, |embed, fighter| {
        embed.field(
            format!("{}'s Fighter", fighter.name),
            card_text(fighter.card.as_ref()),
            false,
        )
    })
}

pub fn lobby_embed(channel: ChannelId, host: UserId, players: usize) -> CreateEmbed {
    game_embed("🥊 SUPERFIGHT! 🥊")
        .description(
            "A new Superfight game has started!\n\n\
            **How to play:**\n\
            1. Players join using `/superfight join`\n\
            2. Each player gets a character and 2 attributes\n\
            3. Players take turns arguing why their fighter would win\n\
            4. Everyone votes for the winner\n\n\
            The host can start the game with `/superfight start` once everyone has joined.",
        )
        .field("Host", mention(host), true)
        .field("Players", format!("{players}/{MAX_PLAYERS}"), true)
        .footer(CreateEmbedFooter::new(format!("Game ID: {channel}")))
}

pub fn card_embed(card: &Card) -> CreateEmbed {
    info_embed(format!(
        "Here is your fighter for the Superfight match:\n\n{card}"
    ))
    .title("Your Superfight Card")
    .footer(CreateEmbedFooter::new(
        "Argue why your fighter would win when it's your turn!",
    ))
}

pub fn snapshot_embed(snapshot: &SessionSnapshot) -> CreateEmbed {
    let phase = match snapshot.state {
        GameState::WaitingForPlayers => String::from("Waiting for players"),
        GameState::InProgress => format!(
            "Round {}/{} in progress",
            snapshot.current_round, snapshot.max_rounds
        ),
        GameState::Voting => format!(
            "Voting on round {}/{}",
            snapshot.current_round, snapshot.max_rounds
        ),
    };
    let players = snapshot
        .players
        .iter()
        .map(|player| {
            let wins = snapshot
                .round_winners
                .iter()
                .filter(|winner| *winner == player)
                .count();
            format!("{}: {wins} round win(s)", mention(*player))
        })
        .collect::<Vec<_>>()
        .join("\n");
    game_embed("Superfight status")
        .description(phase)
        .field("Host", mention(snapshot.host), true)
        .field(
            format!("Players ({}/{MAX_PLAYERS})", snapshot.players.len()),
            players,
            false,
        )
        .footer(CreateEmbedFooter::new(format!("Game ID: {}", snapshot.channel)))
}

pub fn announcement_embed(announcement: &Announcement) -> CreateEmbed {
    match announcement {
        Announcement::MatchBegins { players } => game_embed("🥊 SUPERFIGHT BEGINS! 🥊")
            .description(format!("The battle begins with {players} fighters!")),
        Announcement::CardUndeliverable { player } => failure_embed(format!(
            "{} I couldn't send you a DM with your card! Please check your privacy settings.",
            mention(*player)
        )),
        Announcement::RoundStarted { round, fighters } => {
            let [first, second] = fighters;
            let embed = game_embed(format!("Round {round} Fight!")).description(format!(
                "This round's matchup:\n\n{} VS {}",
                mention(first.id),
                mention(second.id)
            ));
            fighter_fields(embed, fighters).field(
                "Instructions",
                format!(
                    "1. {} has 2 minutes to argue why they would win\n\
                    2. {} then has 2 minutes to argue why they would win\n\
                    3. Everyone will vote using `/superfight vote`\n\
                    4. The host can force the vote to end with `/superfight endvote`",
                    mention(first.id),
                    mention(second.id)
                ),
                false,
            )
        }
        Announcement::VotingOpened { round, fighters } => {
            let [first, second] = fighters;
            game_embed("Time to Vote!").description(format!(
                "Arguments for round {round} are over! Who won?\n\n\
                Vote using `/superfight vote`\n\n\
                Options:\n1️⃣ {}\n2️⃣ {}",
                mention(first.id),
                mention(second.id)
            ))
        }
        Announcement::RoundResults {
            round,
            counts,
            winners,
        } => {
            let votes = counts
                .iter()
                .map(|(player, count)| format!("{}: {count} vote(s)", mention(*player)))
                .collect::<Vec<_>>()
                .join("\n");
            CreateEmbed::new()
                .title(format!("Round {round} Results"))
                .description(round_verdict(winners))
                .field("Votes", votes, false)
                .color(constants::RESULTS_COLOR)
        }
        Announcement::MatchResults {
            winners,
            best,
            scoreboard,
        } => {
            let scores = scoreboard
                .iter()
                .map(|(player, wins)| format!("{}: {wins} round win(s)", mention(*player)))
                .collect::<Vec<_>>()
                .join("\n");
            CreateEmbed::new()
                .title("🏆 SUPERFIGHT CHAMPION 🏆")
                .description(match_verdict(winners, *best))
                .field("Final Scores", scores, false)
                .footer(CreateEmbedFooter::new("Thanks for playing Superfight!"))
                .color(constants::RESULTS_COLOR)
        }
        Announcement::NotEnoughPlayers => {
            failure_embed("Not enough players to continue! The game has been cancelled.")
        }
    }
}
