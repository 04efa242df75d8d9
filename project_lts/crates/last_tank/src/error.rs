use thiserror::Error;

#[derive(Debug, Error)]
pub enum MatchError {
    #[error("server variable {0} is not set")]
    MissingVar(&'static str),
}

/// Reasons a slash command was refused. The display text is sent verbatim
/// to the player who typed the command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("There is already a countdown in progress.")]
    CountdownInProgress,

    #[error("There is already a game of Last Tank Standing in progress.")]
    MatchInProgress,

    #[error("More than 2 players are required to play a game of Last Tank Standing.")]
    NotEnoughPlayers,

    #[error("There is no active game of Last Tank Standing.")]
    NoActiveMatch,

    #[error("You do not have permission to use the /{0} command.")]
    PermissionDenied(String),
}
