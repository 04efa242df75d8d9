//! Picking who goes next and who is left.

use session::{PlayerId, PlayerRecord};

/// Participant with the strictly lowest score, or `None` when there are no
/// participants or two or more share the lowest score. Observers are ignored.
pub fn pick_lowest_scorer<'a>(players: impl IntoIterator<Item = &'a PlayerRecord>) -> Option<PlayerId> {
    let mut lowest: Option<(i32, PlayerId)> = None;
    let mut tied = false;

    for player in players.into_iter().filter(|p| !p.is_spectator()) {
        let score = player.score();
        match lowest {
            Some((min, _)) if score > min => {}
            Some((min, _)) if score == min => tied = true,
            _ => {
                lowest = Some((score, player.id));
                tied = false;
            }
        }
    }

    if tied {
        None
    } else {
        lowest.map(|(_, id)| id)
    }
}

/// The only remaining participant, if exactly one is left.
pub fn find_sole_survivor<'a>(players: impl IntoIterator<Item = &'a PlayerRecord>) -> Option<PlayerId> {
    let mut participants = players.into_iter().filter(|p| !p.is_spectator());
    match (participants.next(), participants.next()) {
        (Some(only), None) => Some(only.id),
        _ => None,
    }
}

pub fn participant_count<'a>(players: impl IntoIterator<Item = &'a PlayerRecord>) -> usize {
    players.into_iter().filter(|p| !p.is_spectator()).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use session::Team;

    fn player(id: u32, team: Team, wins: i32, losses: i32) -> PlayerRecord {
        PlayerRecord {
            id: PlayerId(id),
            callsign: format!("p{}", id),
            team,
            wins,
            losses,
        }
    }

    #[test]
    fn lowest_score_is_picked() {
        let players = vec![
            player(0, Team::Rogue, 5, 1),
            player(1, Team::Rogue, 1, 3),
            player(2, Team::Rogue, 2, 2),
        ];
        assert_eq!(pick_lowest_scorer(&players), Some(PlayerId(1)));
    }

    #[test]
    fn tie_at_the_bottom_picks_nobody() {
        let players = vec![
            player(0, Team::Rogue, 0, 0),
            player(1, Team::Rogue, 3, 0),
            player(2, Team::Rogue, 0, 0),
        ];
        assert_eq!(pick_lowest_scorer(&players), None);
    }

    #[test]
    fn tie_above_the_bottom_does_not_matter() {
        let players = vec![
            player(0, Team::Rogue, 2, 0),
            player(1, Team::Rogue, 2, 0),
            player(2, Team::Rogue, 0, 1),
        ];
        assert_eq!(pick_lowest_scorer(&players), Some(PlayerId(2)));
    }

    #[test]
    fn observers_are_not_ranked() {
        let players = vec![
            player(0, Team::Observer, -10, 0),
            player(1, Team::Rogue, 1, 0),
            player(2, Team::Rogue, 0, 0),
        ];
        assert_eq!(pick_lowest_scorer(&players), Some(PlayerId(2)));
        assert_eq!(pick_lowest_scorer(Vec::<PlayerRecord>::new().iter()), None);
    }

    #[test]
    fn sole_survivor_needs_exactly_one() {
        let one = vec![player(0, Team::Observer, 0, 0), player(1, Team::Red, 0, 0)];
        assert_eq!(find_sole_survivor(&one), Some(PlayerId(1)));

        let two = vec![player(0, Team::Rogue, 0, 0), player(1, Team::Red, 0, 0)];
        assert_eq!(find_sole_survivor(&two), None);

        let none = vec![player(0, Team::Observer, 0, 0)];
        assert_eq!(find_sole_survivor(&none), None);
        assert_eq!(participant_count(&two), 2);
    }

    fn arb_team() -> impl Strategy<Value = Team> {
        prop_oneof![Just(Team::Rogue), Just(Team::Red), Just(Team::Observer)]
    }

    proptest! {
        #[test]
        fn pick_matches_brute_force(
            entries in prop::collection::vec((arb_team(), -5i32..5, 0i32..5), 0..12)
        ) {
            let players: Vec<PlayerRecord> = entries
                .iter()
                .enumerate()
                .map(|(i, (team, w, l))| player(i as u32, *team, *w, *l))
                .collect();

            let scores: Vec<i32> = players.iter().filter(|p| !p.is_spectator()).map(|p| p.score()).collect();
            let picked = pick_lowest_scorer(&players);

            match scores.iter().min() {
                None => prop_assert_eq!(picked, None),
                Some(min) => {
                    let at_min = scores.iter().filter(|s| *s == min).count();
                    if at_min > 1 {
                        prop_assert_eq!(picked, None);
                    } else {
                        let id = picked.unwrap();
                        let chosen = players.iter().find(|p| p.id == id).unwrap();
                        prop_assert!(!chosen.is_spectator());
                        prop_assert_eq!(chosen.score(), *min);
                    }
                }
            }
        }

        #[test]
        fn order_does_not_change_the_pick(
            mut entries in prop::collection::vec((-5i32..5, 0i32..5), 1..10)
        ) {
            let build = |entries: &[(i32, i32)]| -> Vec<PlayerRecord> {
                entries.iter().enumerate().map(|(i, (w, l))| player(i as u32, Team::Rogue, *w, *l)).collect()
            };
            let forward = build(&entries);
            let picked = pick_lowest_scorer(&forward).map(|id| forward[id.0 as usize].score());

            entries.reverse();
            let backward = build(&entries);
            let picked_back = pick_lowest_scorer(&backward).map(|id| backward[id.0 as usize].score());
            prop_assert_eq!(picked, picked_back);
        }
    }
}
