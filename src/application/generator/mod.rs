//! Matchup generation.
//!
//! Builds the season's multiset of host/visitor pairings from the league
//! layout. Five phases run in order, each feeding a shared tally:
//!
//! 1. Intra-group round robin, `intra_group_rounds` times
//! 2. Intra-category rotation against one other group
//! 3. Cross-category rotation against one group of the paired category
//! 4. Same-rank games against the remaining same-category groups
//! 5. Balancing until every participant reaches `games_per_participant`
//!
//! Generation is deterministic for a given league, format and season.

pub mod rotation;
mod tally;

use std::collections::{HashMap, VecDeque};

use tracing::{debug, info};

use crate::domain::{League, Matchup, PairKey, ParticipantCount, ParticipantId, SeasonFormat};
use crate::error::GenerationError;

use rotation::{cross_category_partner, intra_category_partner, paired_category};
use tally::Tally;

/// The generated matchups for one season.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchupSet {
    matchups: Vec<Matchup>,
}

impl MatchupSet {
    pub fn new(matchups: Vec<Matchup>) -> Self {
        Self { matchups }
    }

    #[must_use]
    pub fn matchups(&self) -> &[Matchup] {
        &self.matchups
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.matchups.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.matchups.is_empty()
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<Matchup> {
        self.matchups
    }

    /// Games per participant.
    #[must_use]
    pub fn counts(&self) -> HashMap<ParticipantId, u32> {
        let mut counts = HashMap::new();
        for participant in self.matchups.iter().flat_map(Matchup::participants) {
            *counts.entry(participant.clone()).or_insert(0) += 1;
        }
        counts
    }

    /// Check the set against the league and format.
    ///
    /// # Errors
    ///
    /// `Shortfall`/`Overflow` when a participant's count is off, otherwise
    /// `Inconsistent` for totals, self pairs, unknown participants and pairs
    /// that meet too often.
    pub fn verify(&self, league: &League, format: &SeasonFormat) -> Result<(), GenerationError> {
        let required = format.games_per_participant;
        let counts = self.counts();

        let mut shortfalls = Vec::new();
        let mut overflows = Vec::new();
        for participant in league.participants() {
            let realized = counts.get(&participant.id).copied().unwrap_or(0);
            let entry = ParticipantCount {
                participant: participant.id.clone(),
                realized,
                required,
            };
            if realized < required {
                shortfalls.push(entry);
            } else if realized > required {
                overflows.push(entry);
            }
        }
        if !overflows.is_empty() {
            return Err(GenerationError::Overflow { overflows });
        }
        if !shortfalls.is_empty() {
            return Err(GenerationError::Shortfall { shortfalls });
        }

        let expected = league.len() * required as usize / 2;
        if self.len() != expected {
            return Err(GenerationError::Inconsistent(format!(
                "{} matchups, expected {expected}",
                self.len()
            )));
        }

        let mut pairs: HashMap<PairKey, u32> = HashMap::new();
        let mut intra: HashMap<&ParticipantId, u32> = HashMap::new();
        for matchup in &self.matchups {
            if matchup.is_self_match() {
                return Err(GenerationError::Inconsistent(format!(
                    "{} is paired with itself",
                    matchup.host
                )));
            }
            if let Some(unknown) = matchup.participants().into_iter().find(|p| !league.contains(p)) {
                return Err(GenerationError::Inconsistent(format!(
                    "unknown participant {unknown}"
                )));
            }
            *pairs.entry(matchup.pair_key()).or_insert(0) += 1;
            if league.same_group(&matchup.host, &matchup.visitor) {
                *intra.entry(&matchup.host).or_insert(0) += 1;
                *intra.entry(&matchup.visitor).or_insert(0) += 1;
            }
        }

        for (pair, meetings) in &pairs {
            let limit = if league.same_group(&pair.first, &pair.second) {
                format.intra_group_rounds
            } else {
                1
            };
            if *meetings > limit {
                return Err(GenerationError::Inconsistent(format!(
                    "{pair} meet {meetings} times, at most {limit} allowed"
                )));
            }
        }

        for group in league.groups() {
            let expected = (group.members.len() as u32).saturating_sub(1) * format.intra_group_rounds;
            for member in &group.members {
                let realized = intra.get(member).copied().unwrap_or(0);
                if realized != expected {
                    return Err(GenerationError::Inconsistent(format!(
                        "{member} has {realized} intra-group games, expected {expected}"
                    )));
                }
            }
        }

        Ok(())
    }
}

/// Deterministic season matchup generator.
pub struct MatchupGenerator<'a> {
    league: &'a League,
    format: &'a SeasonFormat,
}

impl<'a> MatchupGenerator<'a> {
    pub fn new(league: &'a League, format: &'a SeasonFormat) -> Self {
        Self { league, format }
    }

    /// Run all phases and verify the result.
    ///
    /// # Errors
    ///
    /// Returns `InvalidLeague` when the layout cannot support the enabled
    /// phases, `Overflow` when the fixed phases already exceed the target,
    /// and `Shortfall` when balancing leaves participants short.
    pub fn generate(&self) -> Result<MatchupSet, GenerationError> {
        self.check_layout()?;

        let format = self.format;
        let mut tally = Tally::new(self.league, format.games_per_participant, format.season);

        self.intra_group(&mut tally);
        debug!(phase = "intra_group", matchups = tally.len(), "Phase complete");

        if format.intra_category_rotation {
            self.intra_category(&mut tally);
            debug!(phase = "intra_category", matchups = tally.len(), "Phase complete");
        }
        if format.cross_category_rotation {
            self.cross_category(&mut tally);
            debug!(phase = "cross_category", matchups = tally.len(), "Phase complete");
        }
        if format.same_rank_games {
            self.same_rank(&mut tally);
            debug!(phase = "same_rank", matchups = tally.len(), "Phase complete");
        }

        let overflows = tally.overflows();
        if !overflows.is_empty() {
            return Err(GenerationError::Overflow { overflows });
        }

        self.balance(&mut tally);
        debug!(phase = "balance", matchups = tally.len(), "Phase complete");

        let shortfalls = tally.shortfalls();
        if !shortfalls.is_empty() {
            return Err(GenerationError::Shortfall { shortfalls });
        }

        let set = MatchupSet::new(tally.into_matchups());
        set.verify(self.league, format)?;

        info!(
            season = format.season,
            participants = self.league.len(),
            matchups = set.len(),
            "Matchups generated"
        );
        Ok(set)
    }

    fn check_layout(&self) -> Result<(), GenerationError> {
        let total = self.league.len() as u64 * u64::from(self.format.games_per_participant);
        if total % 2 != 0 {
            return Err(GenerationError::InvalidLeague(format!(
                "{} participants cannot each play {} games",
                self.league.len(),
                self.format.games_per_participant
            )));
        }

        let rotations = self.format.intra_category_rotation
            || self.format.cross_category_rotation
            || self.format.same_rank_games;
        if !rotations {
            return Ok(());
        }

        let categories = self.league.categories();
        for category in categories {
            let sizes = self.group_sizes(&category.groups);
            if sizes.windows(2).any(|w| w[0] != w[1]) {
                return Err(GenerationError::InvalidLeague(format!(
                    "groups in category {} differ in size",
                    category.id
                )));
            }
        }

        if self.format.cross_category_rotation {
            for (idx, category) in categories.iter().enumerate() {
                let Some(other) = paired_category(idx, categories.len()) else {
                    continue;
                };
                let ours = self.group_sizes(&category.groups);
                let theirs = self.group_sizes(&categories[other].groups);
                if ours.len() != theirs.len() || ours.first() != theirs.first() {
                    return Err(GenerationError::InvalidLeague(format!(
                        "categories {} and {} differ in layout",
                        category.id, categories[other].id
                    )));
                }
            }
        }
        Ok(())
    }

    fn group_sizes(&self, groups: &[usize]) -> Vec<usize> {
        let all = self.league.groups();
        groups.iter().map(|&g| all[g].members.len()).collect()
    }

    fn members(&self, group: usize) -> &'a [ParticipantId] {
        &self.league.groups()[group].members
    }

    fn intra_group(&self, tally: &mut Tally<'_>) {
        for group in self.league.groups() {
            let members = &group.members;
            for round in 0..self.format.intra_group_rounds as usize {
                for i in 0..members.len() {
                    for j in (i + 1)..members.len() {
                        if (i + j + round) % 2 == 0 {
                            tally.add(&members[i], &members[j]);
                        } else {
                            tally.add(&members[j], &members[i]);
                        }
                    }
                }
            }
        }
    }

    /// Every member of `first` plays every member of `second` once.
    fn full_block(&self, tally: &mut Tally<'_>, first: usize, second: usize) {
        let season = self.format.season as usize;
        for (i, a) in self.members(first).iter().enumerate() {
            for (j, b) in self.members(second).iter().enumerate() {
                if (i + j + season) % 2 == 0 {
                    tally.add(a, b);
                } else {
                    tally.add(b, a);
                }
            }
        }
    }

    fn intra_category(&self, tally: &mut Tally<'_>) {
        for category in self.league.categories() {
            let groups = &category.groups;
            for pos in 0..groups.len() {
                match intra_category_partner(pos, groups.len(), self.format.season) {
                    Some(partner) if partner > pos => {
                        self.full_block(tally, groups[pos], groups[partner]);
                    }
                    _ => {}
                }
            }
        }
    }

    fn cross_category(&self, tally: &mut Tally<'_>) {
        let categories = self.league.categories();
        for (idx, category) in categories.iter().enumerate() {
            let Some(other) = paired_category(idx, categories.len()) else {
                continue;
            };
            if other < idx {
                continue;
            }
            let ours = &category.groups;
            let theirs = &categories[other].groups;
            for (pos, &group) in ours.iter().enumerate() {
                let target = cross_category_partner(pos, theirs.len(), self.format.season, true);
                if let Some(&opponent) = theirs.get(target) {
                    self.full_block(tally, group, opponent);
                }
            }
        }
    }

    fn same_rank(&self, tally: &mut Tally<'_>) {
        for category in self.league.categories() {
            let groups = &category.groups;
            let partner_of = |pos: usize| {
                if self.format.intra_category_rotation {
                    intra_category_partner(pos, groups.len(), self.format.season)
                } else {
                    None
                }
            };
            for pos in 0..groups.len() {
                for other in (pos + 1)..groups.len() {
                    if partner_of(pos) == Some(other) {
                        continue;
                    }
                    let ours = self.members(groups[pos]);
                    let theirs = self.members(groups[other]);
                    for (a, b) in ours.iter().zip(theirs) {
                        if !tally.has_met(a, b) {
                            tally.add_balanced(a, b);
                        }
                    }
                }
            }
        }
    }

    /// Top up short participants from a bounded work-set.
    fn balance(&self, tally: &mut Tally<'_>) {
        let mut work: VecDeque<ParticipantId> = self
            .league
            .participants()
            .iter()
            .filter(|p| tally.remaining(&p.id) > 0)
            .map(|p| p.id.clone())
            .collect();
        let bound = work.len() * work.len() + 1;

        for _ in 0..bound {
            let Some(current) = work.front().cloned() else {
                break;
            };
            if tally.remaining(&current) == 0 {
                work.pop_front();
                continue;
            }
            match self.balancing_opponent(tally, &current, &work) {
                Some(opponent) => {
                    tally.add_balanced(&current, &opponent);
                    work.retain(|p| tally.remaining(p) > 0);
                }
                None => {
                    debug!(participant = %current, "No eligible balancing opponent");
                    work.pop_front();
                }
            }
        }
    }

    /// Best short opponent for `current`.
    ///
    /// Equal rank in the preferred cross group ranks first, then equal rank
    /// anywhere, then anyone. Work-set order breaks ties.
    fn balancing_opponent(
        &self,
        tally: &Tally<'_>,
        current: &ParticipantId,
        work: &VecDeque<ParticipantId>,
    ) -> Option<ParticipantId> {
        let rank = self.league.rank(current);
        let preferred = self.preferred_balancing_group(current);

        work.iter()
            .filter(|candidate| {
                *candidate != current
                    && tally.remaining(candidate) > 0
                    && !tally.has_met(current, candidate)
                    && self.complementary(current, candidate)
            })
            .min_by_key(|candidate| {
                let same_rank = self.league.rank(candidate) == rank;
                let in_preferred =
                    preferred.is_some() && self.league.group_index(candidate) == preferred;
                match (same_rank, in_preferred) {
                    (true, true) => 0,
                    (true, false) => 1,
                    _ => 2,
                }
            })
            .cloned()
    }

    /// Cross-category group two rotations ahead of this season's.
    fn preferred_balancing_group(&self, id: &ParticipantId) -> Option<usize> {
        let group = self.league.group_index(id)?;
        let category = self.league.category_index(id)?;
        let categories = self.league.categories();
        let other = paired_category(category, categories.len())?;
        let pos = categories[category].groups.iter().position(|&g| g == group)?;
        let theirs = &categories[other].groups;
        let target = cross_category_partner(
            pos,
            theirs.len(),
            self.format.season.saturating_add(2),
            category < other,
        );
        theirs.get(target).copied()
    }

    fn complementary(&self, a: &ParticipantId, b: &ParticipantId) -> bool {
        if self.league.categories().len() > 1 {
            self.league.is_cross_category(a, b)
        } else {
            !self.league.same_group(a, b)
        }
    }
}
