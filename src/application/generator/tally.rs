//! Running per-participant counters shared by the generation phases.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use crate::domain::{League, Matchup, PairKey, ParticipantCount, ParticipantId};

pub(super) struct Tally<'a> {
    league: &'a League,
    required: u32,
    season: u32,
    matchups: Vec<Matchup>,
    games: HashMap<ParticipantId, u32>,
    home: HashMap<ParticipantId, u32>,
    met: HashSet<PairKey>,
}

impl<'a> Tally<'a> {
    pub(super) fn new(league: &'a League, required: u32, season: u32) -> Self {
        Self {
            league,
            required,
            season,
            matchups: Vec::new(),
            games: HashMap::with_capacity(league.len()),
            home: HashMap::with_capacity(league.len()),
            met: HashSet::new(),
        }
    }

    pub(super) fn len(&self) -> usize {
        self.matchups.len()
    }

    /// Record a matchup with a fixed host.
    pub(super) fn add(&mut self, host: &ParticipantId, visitor: &ParticipantId) {
        *self.games.entry(host.clone()).or_insert(0) += 1;
        *self.games.entry(visitor.clone()).or_insert(0) += 1;
        *self.home.entry(host.clone()).or_insert(0) += 1;
        self.met.insert(PairKey::new(host.clone(), visitor.clone()));
        self.matchups.push(Matchup::new(host.clone(), visitor.clone()));
    }

    /// Record a matchup, letting the home-game balance pick the host.
    ///
    /// Fewer home games hosts. On a tie the lexicographically smaller id hosts
    /// in even seasons and the larger one in odd seasons.
    pub(super) fn add_balanced(&mut self, a: &ParticipantId, b: &ParticipantId) {
        let a_hosts = match self.home_games(a).cmp(&self.home_games(b)) {
            Ordering::Less => true,
            Ordering::Greater => false,
            Ordering::Equal => (a < b) == (self.season % 2 == 0),
        };
        if a_hosts {
            self.add(a, b);
        } else {
            self.add(b, a);
        }
    }

    pub(super) fn games(&self, id: &ParticipantId) -> u32 {
        self.games.get(id).copied().unwrap_or(0)
    }

    pub(super) fn home_games(&self, id: &ParticipantId) -> u32 {
        self.home.get(id).copied().unwrap_or(0)
    }

    pub(super) fn remaining(&self, id: &ParticipantId) -> u32 {
        self.required.saturating_sub(self.games(id))
    }

    pub(super) fn has_met(&self, a: &ParticipantId, b: &ParticipantId) -> bool {
        self.met.contains(&PairKey::new(a.clone(), b.clone()))
    }

    /// Participants below the required count, in league order.
    pub(super) fn shortfalls(&self) -> Vec<ParticipantCount> {
        self.filter_counts(|realized, required| realized < required)
    }

    /// Participants above the required count, in league order.
    pub(super) fn overflows(&self) -> Vec<ParticipantCount> {
        self.filter_counts(|realized, required| realized > required)
    }

    fn filter_counts(&self, keep: impl Fn(u32, u32) -> bool) -> Vec<ParticipantCount> {
        self.league
            .participants()
            .iter()
            .filter_map(|p| {
                let realized = self.games(&p.id);
                keep(realized, self.required).then(|| ParticipantCount {
                    participant: p.id.clone(),
                    realized,
                    required: self.required,
                })
            })
            .collect()
    }

    pub(super) fn into_matchups(self) -> Vec<Matchup> {
        self.matchups
    }
}
