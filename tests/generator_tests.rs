//! Matchup generation over the rotation cycle.

use std::collections::HashMap;

use matchweek::application::MatchupGenerator;
use matchweek::domain::{Matchup, PairKey, SeasonFormat};
use matchweek::error::GenerationError;
use matchweek::testkit::{config, league};

fn format(season: u32) -> SeasonFormat {
    SeasonFormat {
        season,
        ..SeasonFormat::default()
    }
}

#[test]
fn every_season_of_the_cycle_is_complete() {
    let league = league::full();
    // 12 covers both rotation periods (3 and 4).
    for season in 0..12 {
        let format = format(season);
        let set = MatchupGenerator::new(&league, &format).generate().unwrap();

        assert_eq!(set.len(), 272, "season {season}");
        assert!(set.counts().values().all(|&n| n == 17), "season {season}");
        assert!(set.matchups().iter().all(|m| !m.is_self_match()));
        set.verify(&league, &format).unwrap();
    }
}

#[test]
fn only_group_rivals_meet_twice() {
    let league = league::full();
    let set = MatchupGenerator::new(&league, &format(0)).generate().unwrap();

    let mut pairs: HashMap<PairKey, usize> = HashMap::new();
    for m in set.matchups() {
        *pairs.entry(m.pair_key()).or_default() += 1;
    }
    for (pair, count) in pairs {
        if league.same_group(&pair.first, &pair.second) {
            assert_eq!(count, 2, "{pair}");
        } else {
            assert_eq!(count, 1, "{pair}");
        }
    }
}

#[test]
fn equal_ranks_across_a_category_all_meet() {
    let league = league::full();
    let set = MatchupGenerator::new(&league, &format(2)).generate().unwrap();

    for participant in league.participants() {
        let id = &participant.id;
        let rank = league.rank(id);
        let peers = league
            .participants()
            .iter()
            .filter(|p| {
                p.category == participant.category
                    && !league.same_group(&p.id, id)
                    && league.rank(&p.id) == rank
            })
            .count();
        let met = set
            .matchups()
            .iter()
            .filter(|m| m.involves(id))
            .filter(|m| {
                let other = if m.host == *id { &m.visitor } else { &m.host };
                league.category_index(other) == league.category_index(id)
                    && !league.same_group(other, id)
                    && league.rank(other) == rank
            })
            .count();
        assert_eq!(peers, 3);
        assert_eq!(met, peers, "{id}");
    }
}

#[test]
fn rotation_changes_cross_category_opponents() {
    let league = league::full();
    let opponents = |season| -> Vec<Matchup> {
        MatchupGenerator::new(&league, &format(season))
            .generate()
            .unwrap()
            .into_vec()
            .into_iter()
            .filter(|m| league.is_cross_category(&m.host, &m.visitor))
            .collect()
    };

    assert_ne!(opponents(0), opponents(1));
}

#[test]
fn four_team_double_round_robin() {
    let league = league::four();
    let set = MatchupGenerator::new(&league, &config::round_robin_format(6))
        .generate()
        .unwrap();

    assert_eq!(set.len(), 12);
    for a in ["A", "B", "C", "D"] {
        for b in ["A", "B", "C", "D"] {
            if a != b {
                assert!(set.matchups().contains(&Matchup::new(a, b)), "{a} hosts {b}");
            }
        }
    }
}

#[test]
fn impossible_target_is_a_shortfall() {
    let league = league::four();
    let err = MatchupGenerator::new(&league, &config::round_robin_format(8))
        .generate()
        .unwrap_err();

    match err {
        GenerationError::Shortfall { shortfalls } => assert_eq!(shortfalls.len(), 4),
        other => panic!("expected shortfall, got {other}"),
    }
}
