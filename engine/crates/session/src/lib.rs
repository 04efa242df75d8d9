use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use engine_core::Timestamp;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub u32);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Team slots available on an arena server. `Observer` is the spectator role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Team {
    #[default]
    Rogue,
    Red,
    Green,
    Blue,
    Purple,
    Observer,
}

impl Team {
    pub fn is_spectator(self) -> bool {
        self == Team::Observer
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Team::Rogue => "rogue",
            Team::Red => "red",
            Team::Green => "green",
            Team::Blue => "blue",
            Team::Purple => "purple",
            Team::Observer => "observer",
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown team: {0}")]
pub struct UnknownTeam(pub String);

impl FromStr for Team {
    type Err = UnknownTeam;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "rogue" => Ok(Team::Rogue),
            "red" => Ok(Team::Red),
            "green" => Ok(Team::Green),
            "blue" => Ok(Team::Blue),
            "purple" => Ok(Team::Purple),
            "observer" | "observers" | "spectator" => Ok(Team::Observer),
            other => Err(UnknownTeam(other.to_string())),
        }
    }
}

/// Value snapshot of a connected player. Never a live reference into the roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub id: PlayerId,
    pub callsign: String,
    pub team: Team,
    pub wins: i32,
    pub losses: i32,
}

impl PlayerRecord {
    pub fn score(&self) -> i32 {
        self.wins - self.losses
    }

    pub fn is_spectator(&self) -> bool {
        self.team.is_spectator()
    }
}

#[derive(Debug, Clone)]
pub struct PlayerSession {
    pub record: PlayerRecord,
    pub permissions: BTreeSet<String>,
    pub paused: bool,
    /// Last time the player moved, fired or otherwise acted.
    pub last_activity: Timestamp,
}

impl PlayerSession {
    pub fn new(record: PlayerRecord, now: Timestamp) -> Self {
        Self {
            record,
            permissions: BTreeSet::new(),
            paused: false,
            last_activity: now,
        }
    }
}

/// The host's store of connected players, keyed by id.
#[derive(Debug, Default)]
pub struct Roster {
    players: BTreeMap<PlayerId, PlayerSession>,
    next_id: u32,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a player, returning its ID.
    pub fn connect(
        &mut self,
        callsign: impl Into<String>,
        team: Team,
        permissions: impl IntoIterator<Item = String>,
        now: Timestamp,
    ) -> PlayerId {
        let id = PlayerId(self.next_id);
        self.next_id += 1;

        let record = PlayerRecord {
            id,
            callsign: callsign.into(),
            team,
            wins: 0,
            losses: 0,
        };
        let mut session = PlayerSession::new(record, now);
        session.permissions.extend(permissions);
        self.players.insert(id, session);
        id
    }

    /// Remove a player, returning its final snapshot.
    pub fn disconnect(&mut self, id: PlayerId) -> Option<PlayerRecord> {
        self.players.remove(&id).map(|s| s.record)
    }

    pub fn get(&self, id: PlayerId) -> Option<&PlayerSession> {
        self.players.get(&id)
    }

    pub fn get_mut(&mut self, id: PlayerId) -> Option<&mut PlayerSession> {
        self.players.get_mut(&id)
    }

    pub fn record(&self, id: PlayerId) -> Option<PlayerRecord> {
        self.players.get(&id).map(|s| s.record.clone())
    }

    /// Snapshots of every connected player (sorted by ID).
    pub fn records(&self) -> Vec<PlayerRecord> {
        self.players.values().map(|s| s.record.clone()).collect()
    }

    pub fn ids(&self) -> Vec<PlayerId> {
        self.players.keys().copied().collect()
    }

    pub fn find_by_callsign(&self, callsign: &str) -> Option<PlayerId> {
        self.players
            .values()
            .find(|s| s.record.callsign.eq_ignore_ascii_case(callsign))
            .map(|s| s.record.id)
    }

    pub fn set_team(&mut self, id: PlayerId, team: Team) -> bool {
        match self.players.get_mut(&id) {
            Some(s) => {
                s.record.team = team;
                true
            }
            None => false,
        }
    }

    pub fn set_wins(&mut self, id: PlayerId, wins: i32) -> bool {
        match self.players.get_mut(&id) {
            Some(s) => {
                s.record.wins = wins;
                true
            }
            None => false,
        }
    }

    pub fn set_losses(&mut self, id: PlayerId, losses: i32) -> bool {
        match self.players.get_mut(&id) {
            Some(s) => {
                s.record.losses = losses;
                true
            }
            None => false,
        }
    }

    /// Credit a kill to `killer` and a death to `victim`.
    pub fn record_kill(&mut self, killer: PlayerId, victim: PlayerId, now: Timestamp) {
        if let Some(s) = self.players.get_mut(&killer) {
            s.record.wins += 1;
            s.last_activity = now;
        }
        if let Some(s) = self.players.get_mut(&victim) {
            s.record.losses += 1;
        }
    }

    pub fn touch(&mut self, id: PlayerId, now: Timestamp) {
        if let Some(s) = self.players.get_mut(&id) {
            s.last_activity = now;
        }
    }

    pub fn set_paused(&mut self, id: PlayerId, paused: bool, now: Timestamp) -> bool {
        match self.players.get_mut(&id) {
            Some(s) => {
                // Unpausing counts as activity; pausing keeps the idle clock running.
                if s.paused && !paused {
                    s.last_activity = now;
                }
                s.paused = paused;
                true
            }
            None => false,
        }
    }

    /// Seconds since the player last acted.
    pub fn idle_seconds(&self, id: PlayerId, now: Timestamp) -> Option<f64> {
        self.players
            .get(&id)
            .map(|s| now.seconds_since(s.last_activity).max(0) as f64)
    }

    pub fn has_permission(&self, id: PlayerId, permission: &str) -> bool {
        self.players
            .get(&id)
            .is_some_and(|s| s.permissions.contains(permission))
    }

    /// Count of connected players not on the observer team.
    pub fn eligible_count(&self) -> usize {
        self.players
            .values()
            .filter(|s| !s.record.team.is_spectator())
            .count()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn perms(list: &[&str]) -> Vec<String> {
        list.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn connect_increments_id() {
        let mut roster = Roster::new();
        let a = roster.connect("alpha", Team::Rogue, perms(&[]), Timestamp(0));
        let b = roster.connect("bravo", Team::Rogue, perms(&[]), Timestamp(0));
        assert_eq!(a, PlayerId(0));
        assert_eq!(b, PlayerId(1));
        assert_eq!(roster.len(), 2);
    }

    #[test]
    fn disconnect_returns_final_snapshot() {
        let mut roster = Roster::new();
        let id = roster.connect("alpha", Team::Red, perms(&[]), Timestamp(0));
        roster.set_wins(id, 4);
        roster.set_losses(id, 1);

        let record = roster.disconnect(id).unwrap();
        assert_eq!(record.callsign, "alpha");
        assert_eq!(record.score(), 3);
        assert!(roster.get(id).is_none());
        assert!(roster.disconnect(id).is_none());
    }

    #[test]
    fn eligible_count_skips_observers() {
        let mut roster = Roster::new();
        roster.connect("alpha", Team::Rogue, perms(&[]), Timestamp(0));
        let b = roster.connect("bravo", Team::Rogue, perms(&[]), Timestamp(0));
        roster.connect("charlie", Team::Observer, perms(&[]), Timestamp(0));
        assert_eq!(roster.eligible_count(), 2);

        roster.set_team(b, Team::Observer);
        assert_eq!(roster.eligible_count(), 1);
    }

    #[test]
    fn idle_time_tracks_activity() {
        let mut roster = Roster::new();
        let id = roster.connect("alpha", Team::Rogue, perms(&[]), Timestamp(100));
        assert_eq!(roster.idle_seconds(id, Timestamp(130)), Some(30.0));

        roster.touch(id, Timestamp(125));
        assert_eq!(roster.idle_seconds(id, Timestamp(130)), Some(5.0));
        assert_eq!(roster.idle_seconds(PlayerId(99), Timestamp(130)), None);
    }

    #[test]
    fn unpause_resets_idle_clock() {
        let mut roster = Roster::new();
        let id = roster.connect("alpha", Team::Rogue, perms(&[]), Timestamp(0));
        roster.set_paused(id, true, Timestamp(10));
        assert_eq!(roster.idle_seconds(id, Timestamp(40)), Some(40.0));

        roster.set_paused(id, false, Timestamp(40));
        assert_eq!(roster.idle_seconds(id, Timestamp(41)), Some(1.0));
    }

    #[test]
    fn record_kill_updates_scores() {
        let mut roster = Roster::new();
        let a = roster.connect("alpha", Team::Rogue, perms(&[]), Timestamp(0));
        let b = roster.connect("bravo", Team::Rogue, perms(&[]), Timestamp(0));
        roster.record_kill(a, b, Timestamp(5));

        assert_eq!(roster.record(a).unwrap().score(), 1);
        assert_eq!(roster.record(b).unwrap().score(), -1);
        assert_eq!(roster.idle_seconds(a, Timestamp(5)), Some(0.0));
    }

    #[test]
    fn permissions_are_per_player() {
        let mut roster = Roster::new();
        let admin = roster.connect("admin", Team::Rogue, perms(&["vote", "endgame"]), Timestamp(0));
        let guest = roster.connect("guest", Team::Rogue, perms(&[]), Timestamp(0));
        assert!(roster.has_permission(admin, "endgame"));
        assert!(!roster.has_permission(guest, "vote"));
        assert!(!roster.has_permission(PlayerId(42), "vote"));
    }

    #[test]
    fn team_parsing() {
        assert_eq!("Observer".parse::<Team>(), Ok(Team::Observer));
        assert_eq!("spectator".parse::<Team>(), Ok(Team::Observer));
        assert_eq!(" red ".parse::<Team>(), Ok(Team::Red));
        assert!("hunters".parse::<Team>().is_err());
        assert!(Team::Observer.is_spectator());
        assert!(!Team::Rogue.is_spectator());
    }

    #[test]
    fn find_by_callsign_ignores_case() {
        let mut roster = Roster::new();
        let id = roster.connect("Alpha", Team::Rogue, perms(&[]), Timestamp(0));
        assert_eq!(roster.find_by_callsign("alpha"), Some(id));
        assert_eq!(roster.find_by_callsign("zulu"), None);
    }
}
