//! Operator console: one line of text per arena action.

use session::{PlayerId, Team, UnknownTeam};
use thiserror::Error;

use crate::arena::Arena;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConsoleError {
    #[error("unknown console command: {0}")]
    UnknownVerb(String),

    #[error("missing argument: {0}")]
    MissingArgument(&'static str),

    #[error("not a number: {0}")]
    BadNumber(String),

    #[error(transparent)]
    UnknownTeam(#[from] UnknownTeam),

    #[error("no player called {0}")]
    UnknownPlayer(String),
}

/// A parsed console line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleInput {
    /// `join <callsign> [team] [perm,perm,...]`
    Join {
        callsign: String,
        team: Team,
        permissions: Vec<String>,
    },
    /// `part <callsign>`
    Part { callsign: String },
    /// `kick <callsign> [reason...]`
    Kick { callsign: String, reason: String },
    /// `pause <callsign>` / `resume <callsign>`
    Pause { callsign: String, paused: bool },
    /// `move <callsign>`: the player did something.
    Activity { callsign: String },
    /// `kill <killer> <victim>`
    Kill { killer: String, victim: String },
    /// `score <callsign> <wins> <losses>`
    Score {
        callsign: String,
        wins: i32,
        losses: i32,
    },
    /// `set <variable> <value>`
    SetVar { name: String, value: String },
    /// `say <callsign> <text>`; only slash commands do anything.
    Say { callsign: String, text: String },
    /// `players`
    Players,
    /// `quit`
    Quit,
}

/// Parse one console line. Blank lines and `#` comments give `Ok(None)`.
pub fn parse_line(line: &str) -> Result<Option<ConsoleInput>, ConsoleError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let (verb, rest) = split_word(line);
    let input = match verb.to_lowercase().as_str() {
        "join" => {
            let mut words = rest.split_whitespace();
            let callsign = words.next().ok_or(ConsoleError::MissingArgument("callsign"))?;
            let team = match words.next() {
                Some(t) => t.parse()?,
                None => Team::Rogue,
            };
            let permissions = words
                .next()
                .map(|p| {
                    p.split(',')
                        .filter(|s| !s.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default();
            ConsoleInput::Join {
                callsign: callsign.to_string(),
                team,
                permissions,
            }
        }
        "part" => ConsoleInput::Part {
            callsign: required(rest, "callsign")?,
        },
        "kick" => {
            let (callsign, reason) = split_word(rest);
            if callsign.is_empty() {
                return Err(ConsoleError::MissingArgument("callsign"));
            }
            ConsoleInput::Kick {
                callsign: callsign.to_string(),
                reason: reason.to_string(),
            }
        }
        "pause" | "resume" => ConsoleInput::Pause {
            callsign: required(rest, "callsign")?,
            paused: verb.eq_ignore_ascii_case("pause"),
        },
        "move" => ConsoleInput::Activity {
            callsign: required(rest, "callsign")?,
        },
        "kill" => {
            let mut words = rest.split_whitespace();
            let killer = words.next().ok_or(ConsoleError::MissingArgument("killer"))?;
            let victim = words.next().ok_or(ConsoleError::MissingArgument("victim"))?;
            ConsoleInput::Kill {
                killer: killer.to_string(),
                victim: victim.to_string(),
            }
        }
        "score" => {
            let mut words = rest.split_whitespace();
            let callsign = words.next().ok_or(ConsoleError::MissingArgument("callsign"))?;
            let wins = number(words.next().ok_or(ConsoleError::MissingArgument("wins"))?)?;
            let losses = number(words.next().ok_or(ConsoleError::MissingArgument("losses"))?)?;
            ConsoleInput::Score {
                callsign: callsign.to_string(),
                wins,
                losses,
            }
        }
        "set" => {
            let (name, value) = split_word(rest);
            if name.is_empty() {
                return Err(ConsoleError::MissingArgument("variable"));
            }
            if value.is_empty() {
                return Err(ConsoleError::MissingArgument("value"));
            }
            ConsoleInput::SetVar {
                name: name.to_string(),
                value: value.to_string(),
            }
        }
        "say" => {
            let (callsign, text) = split_word(rest);
            if callsign.is_empty() {
                return Err(ConsoleError::MissingArgument("callsign"));
            }
            ConsoleInput::Say {
                callsign: callsign.to_string(),
                text: text.to_string(),
            }
        }
        "players" => ConsoleInput::Players,
        "quit" | "exit" => ConsoleInput::Quit,
        _ => return Err(ConsoleError::UnknownVerb(verb.to_string())),
    };
    Ok(Some(input))
}

fn split_word(s: &str) -> (&str, &str) {
    let s = s.trim_start();
    match s.find(char::is_whitespace) {
        Some(i) => (&s[..i], s[i..].trim()),
        None => (s, ""),
    }
}

fn required(rest: &str, what: &'static str) -> Result<String, ConsoleError> {
    rest.split_whitespace()
        .next()
        .map(str::to_string)
        .ok_or(ConsoleError::MissingArgument(what))
}

fn number(s: &str) -> Result<i32, ConsoleError> {
    s.parse().map_err(|_| ConsoleError::BadNumber(s.to_string()))
}

impl ConsoleInput {
    /// Apply to the arena. Returns lines to show the operator.
    pub fn apply(self, arena: &mut Arena) -> Result<Vec<String>, ConsoleError> {
        match self {
            ConsoleInput::Join {
                callsign,
                team,
                permissions,
            } => {
                let id = arena.join(&callsign, team, permissions);
                Ok(vec![format!("{} joined as {}", callsign, id)])
            }
            ConsoleInput::Part { callsign } => {
                let id = resolve(arena, &callsign)?;
                arena.part(id);
                Ok(Vec::new())
            }
            ConsoleInput::Kick { callsign, reason } => {
                let id = resolve(arena, &callsign)?;
                arena.kick(id, &reason);
                Ok(Vec::new())
            }
            ConsoleInput::Pause { callsign, paused } => {
                let id = resolve(arena, &callsign)?;
                arena.pause(id, paused);
                Ok(Vec::new())
            }
            ConsoleInput::Activity { callsign } => {
                let id = resolve(arena, &callsign)?;
                arena.touch(id);
                Ok(Vec::new())
            }
            ConsoleInput::Kill { killer, victim } => {
                let killer = resolve(arena, &killer)?;
                let victim = resolve(arena, &victim)?;
                arena.kill(killer, victim);
                Ok(Vec::new())
            }
            ConsoleInput::Score {
                callsign,
                wins,
                losses,
            } => {
                let id = resolve(arena, &callsign)?;
                arena.set_score(id, wins, losses);
                Ok(Vec::new())
            }
            ConsoleInput::SetVar { name, value } => {
                arena.set_var(&name, &value);
                Ok(Vec::new())
            }
            ConsoleInput::Say { callsign, text } => {
                let id = resolve(arena, &callsign)?;
                arena.touch(id);
                if text.starts_with('/') {
                    arena.command(id, &text);
                }
                Ok(Vec::new())
            }
            ConsoleInput::Players => Ok(player_list(arena)),
            ConsoleInput::Quit => Ok(Vec::new()),
        }
    }
}

fn resolve(arena: &Arena, callsign: &str) -> Result<PlayerId, ConsoleError> {
    arena
        .find(callsign)
        .ok_or_else(|| ConsoleError::UnknownPlayer(callsign.to_string()))
}

fn player_list(arena: &Arena) -> Vec<String> {
    let roster = arena.host().roster();
    let mut lines = vec![format!("{} player(s)", roster.len())];
    for record in roster.records() {
        lines.push(format!(
            "{:>4} {:<16} {:<8} {} ({}-{})",
            record.id.to_string(),
            record.callsign,
            record.team.as_str(),
            record.score(),
            record.wins,
            record.losses
        ));
    }
    lines
}
