use plugin_runtime::{EventReply, HostApi, HostEvent, Recipient};
use session::{PlayerId, PlayerRecord, Team};

use crate::controller::MatchController;
use crate::ledger::EliminationReason;

const JOIN_NOTICE: &str = "There is a current a match in progress, please be respectful.";
const OBSERVER_NOTICE: &str =
    "There is a currently a match in progress, you have automatically become an observer.";

impl MatchController {
    /// Handle one host notification.
    pub fn handle_event(&mut self, host: &mut dyn HostApi, event: &HostEvent) -> EventReply {
        match event {
            HostEvent::Tick => self.tick(host),
            HostEvent::VarChanged { key, value } => self.update_setting(key, value),
            HostEvent::AutoTeam { player, team } => return self.on_auto_team(host, *player, *team),
            HostEvent::PlayerJoined { player, team } => self.on_player_joined(host, *player, *team),
            HostEvent::PlayerPaused { player, paused } => {
                if *paused {
                    self.on_player_paused(host, *player);
                }
            }
            HostEvent::PlayerParted { record } => self.on_player_parted(record),
            HostEvent::PlayerKicked { player, reason } => self.on_player_kicked(host, *player, reason),
        }
        EventReply::Continue
    }

    fn on_auto_team(&mut self, host: &mut dyn HostApi, player: PlayerId, team: Team) -> EventReply {
        if !self.phase.in_progress() || team.is_spectator() {
            return EventReply::Continue;
        }
        tracing::debug!(player = %player, proposed = %team, "new player forced to observe");
        host.send_message(Recipient::Player(player), OBSERVER_NOTICE);
        EventReply::AssignTeam(Team::Observer)
    }

    fn on_player_joined(&mut self, host: &mut dyn HostApi, player: PlayerId, team: Team) {
        if !self.phase.in_progress() {
            return;
        }
        host.send_message(Recipient::Player(player), JOIN_NOTICE);
        if !team.is_spectator() {
            host.set_team(player, Team::Observer);
            host.send_message(Recipient::Player(player), OBSERVER_NOTICE);
        }
    }

    fn on_player_paused(&mut self, host: &mut dyn HostApi, player: PlayerId) {
        if !self.phase.in_progress() {
            return;
        }
        let Some(record) = host.player(player) else {
            return;
        };
        if record.is_spectator() {
            return;
        }
        host.send_message(
            Recipient::Player(player),
            "Warning: Pausing during a match is unsportsmanlike conduct.",
        );
        host.send_message(
            Recipient::Player(player),
            &format!(
                "         You will automatically be kicked in {} seconds.",
                self.config.idle_kick_time
            ),
        );
    }

    fn on_player_parted(&mut self, record: &PlayerRecord) {
        if self.removed.remove(&record.id) {
            return;
        }
        if !self.phase.in_progress() || record.is_spectator() {
            return;
        }
        tracing::info!(player = %record.callsign, "participant left the match");
        self.record_elimination(record, EliminationReason::Forfeit, self.phase.round());
    }

    fn on_player_kicked(&mut self, host: &mut dyn HostApi, player: PlayerId, reason: &str) {
        if !self.phase.in_progress() {
            return;
        }
        let Some(record) = host.player(player) else {
            tracing::debug!(player = %player, "kicked player already gone");
            return;
        };
        if record.is_spectator() {
            return;
        }
        tracing::info!(player = %record.callsign, reason, "participant removed from the match");
        self.record_elimination(&record, EliminationReason::ForcedRemoval, self.phase.round());
        self.removed.insert(player);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::Harness;

    #[test]
    fn auto_team_during_match_forces_observer() {
        let mut h = Harness::with_players(3);
        let reply = h.event(HostEvent::AutoTeam {
            player: PlayerId(0),
            team: Team::Rogue,
        });
        assert_eq!(reply, EventReply::Continue);

        h.start(15);
        let newcomer = h.join("late");
        h.take_texts();
        let reply = h.event(HostEvent::AutoTeam {
            player: newcomer,
            team: Team::Rogue,
        });
        assert_eq!(reply, EventReply::AssignTeam(Team::Observer));
        assert_eq!(h.take_texts_for(newcomer.0), vec![OBSERVER_NOTICE]);

        let reply = h.event(HostEvent::AutoTeam {
            player: newcomer,
            team: Team::Observer,
        });
        assert_eq!(reply, EventReply::Continue);
    }

    #[test]
    fn joining_mid_match_moves_players_to_observer() {
        let mut h = Harness::active_with_players(3);
        let late = h.join("late");
        h.event(HostEvent::PlayerJoined {
            player: late,
            team: Team::Rogue,
        });
        assert_eq!(h.team_of(late.0), Team::Observer);
        assert_eq!(h.take_texts_for(late.0), vec![JOIN_NOTICE, OBSERVER_NOTICE]);

        let watcher = h.join_as("watcher", Team::Observer);
        h.event(HostEvent::PlayerJoined {
            player: watcher,
            team: Team::Observer,
        });
        assert_eq!(h.take_texts_for(watcher.0), vec![JOIN_NOTICE]);
    }

    #[test]
    fn joining_while_idle_is_quiet() {
        let mut h = Harness::with_players(2);
        let id = h.join("early");
        h.event(HostEvent::PlayerJoined {
            player: id,
            team: Team::Rogue,
        });
        assert!(h.take_texts().is_empty());
        assert_eq!(h.team_of(id.0), Team::Rogue);
    }

    #[test]
    fn pausing_participant_is_warned() {
        let mut h = Harness::active_with_players(3);
        h.event(HostEvent::PlayerPaused {
            player: PlayerId(1),
            paused: true,
        });
        assert_eq!(
            h.take_texts_for(1),
            vec![
                "Warning: Pausing during a match is unsportsmanlike conduct.",
                "         You will automatically be kicked in 30 seconds.",
            ]
        );

        h.event(HostEvent::PlayerPaused {
            player: PlayerId(1),
            paused: false,
        });
        assert!(h.take_texts().is_empty());
    }

    #[test]
    fn departure_during_match_is_a_forfeit() {
        let mut h = Harness::active_with_players(4);
        h.set_score(3, 2, 1);
        let record = h.host.roster_mut().disconnect(PlayerId(3)).unwrap();
        h.event(HostEvent::PlayerParted { record });

        let entry = &h.controller.ledger().records()[0];
        assert_eq!(entry.callsign, "p3");
        assert_eq!(entry.reason, EliminationReason::Forfeit);
        assert_eq!(entry.score, 1);
        assert_eq!(entry.round, 1);
    }

    #[test]
    fn observer_departure_is_not_recorded() {
        let mut h = Harness::active_with_players(3);
        let watcher = h.join_as("watcher", Team::Observer);
        let record = h.host.roster_mut().disconnect(watcher).unwrap();
        h.event(HostEvent::PlayerParted { record });
        assert!(h.controller.ledger().is_empty());
    }

    #[test]
    fn departure_while_idle_is_not_recorded() {
        let mut h = Harness::with_players(3);
        let record = h.host.roster_mut().disconnect(PlayerId(2)).unwrap();
        h.event(HostEvent::PlayerParted { record });
        assert!(h.controller.ledger().is_empty());
    }

    #[test]
    fn kicked_then_parted_is_recorded_once() {
        let mut h = Harness::active_with_players(4);
        h.event(HostEvent::PlayerKicked {
            player: PlayerId(2),
            reason: "spawn camping".into(),
        });
        let record = h.host.roster_mut().disconnect(PlayerId(2)).unwrap();
        h.event(HostEvent::PlayerParted { record });

        let records = h.controller.ledger().records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].reason, EliminationReason::ForcedRemoval);
    }

    #[test]
    fn kick_during_countdown_counts_as_round_one() {
        let mut h = Harness::with_players(4);
        h.start(15);
        h.event(HostEvent::PlayerKicked {
            player: PlayerId(1),
            reason: String::new(),
        });
        assert_eq!(h.controller.ledger().records()[0].round, 1);
    }

    #[test]
    fn var_change_updates_settings() {
        let mut h = Harness::with_players(0);
        h.event(HostEvent::VarChanged {
            key: "_ltsIdleKickTime".into(),
            value: "5".into(),
        });
        assert_eq!(h.controller.config().idle_kick_time, 30);
        h.event(HostEvent::VarChanged {
            key: "_ltsIdleKickTime".into(),
            value: "40".into(),
        });
        assert_eq!(h.controller.config().idle_kick_time, 40);
    }
}
