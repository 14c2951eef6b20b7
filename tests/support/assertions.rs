use std::collections::{HashMap, HashSet};
use std::ops::RangeInclusive;

use matchweek::application::FinalSchedule;
use matchweek::domain::{League, Slot};

/// No participant appears twice in one slot.
pub fn assert_no_double_booking(schedule: &FinalSchedule) {
    let mut booked = HashSet::new();
    for game in &schedule.games {
        for participant in [&game.host, &game.visitor] {
            assert!(
                booked.insert((participant.clone(), game.slot)),
                "{participant} plays twice in slot {}",
                game.slot
            );
        }
    }
}

/// Every participant plays exactly `games` games.
pub fn assert_games_each(schedule: &FinalSchedule, league: &League, games: usize) {
    let mut counts: HashMap<_, usize> = HashMap::new();
    for game in &schedule.games {
        *counts.entry(game.host.clone()).or_default() += 1;
        *counts.entry(game.visitor.clone()).or_default() += 1;
    }
    for participant in league.participants() {
        assert_eq!(
            counts.get(&participant.id).copied().unwrap_or(0),
            games,
            "{} game count",
            participant.id
        );
    }
}

/// No pair meets in consecutive slots.
pub fn assert_no_back_to_back(schedule: &FinalSchedule) {
    for a in &schedule.games {
        for b in &schedule.games {
            let same_pair = (a.host == b.host && a.visitor == b.visitor)
                || (a.host == b.visitor && a.visitor == b.host);
            assert!(
                !(same_pair && a.slot.next() == b.slot),
                "{} and {} meet in slots {} and {}",
                a.host,
                a.visitor,
                a.slot,
                b.slot
            );
        }
    }
}

/// Every slot holds at most `cap` games.
pub fn assert_slot_capacity(schedule: &FinalSchedule, cap: usize) {
    for slot in Slot::range(schedule.slots) {
        let load = schedule.games_in(slot).count();
        assert!(load <= cap, "slot {slot} holds {load} games");
    }
}

/// Participants only sit out slots inside `window`.
pub fn assert_byes_within(schedule: &FinalSchedule, league: &League, window: RangeInclusive<u32>) {
    for participant in league.participants() {
        for slot in Slot::range(schedule.slots) {
            let plays = schedule
                .games_in(slot)
                .any(|g| g.host == participant.id || g.visitor == participant.id);
            assert!(
                plays || window.contains(&slot.get()),
                "{} sits out slot {slot}",
                participant.id
            );
        }
    }
}
