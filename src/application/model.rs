//! Binary integer program for assigning matchups to open slots.
//!
//! One 0/1 variable per (matchup, open slot), laid out matchup-major:
//! `index = matchup * open_slots + slot_position`. Protected slots never get
//! variables; their games only enter through per-participant offsets.

use std::collections::{BTreeMap, HashMap};

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::debug;

use crate::domain::{
    Constraint, ConstraintConfig, League, Matchup, PairKey, ParticipantId, ProtectedSchedule,
    Slot, VariableBounds,
};
use crate::port::outbound::solver::{IlpProblem, LpProblem};

/// Weight of a slot's distance from the season midpoint.
const MIDPOINT_WEIGHT: Decimal = dec!(0.001);

/// Scale of the per-variable tie-break perturbation.
const PERTURBATION: Decimal = dec!(0.000001);

/// Size summary of a built model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModelStats {
    pub variables: usize,
    pub constraints: usize,
    pub matchups: usize,
    pub open_slots: usize,
    /// Variables pinned to zero (self matches, protected-reverse neighbours).
    pub fixed_zero: usize,
}

/// A built model plus what is needed to read its solution back.
#[derive(Debug, Clone)]
pub struct ScheduleModel {
    pub problem: IlpProblem,
    pub matchups: Vec<Matchup>,
    pub open_slots: Vec<Slot>,
    pub stats: ModelStats,
}

impl ScheduleModel {
    /// Variable index for a matchup and a position in `open_slots`.
    #[must_use]
    pub fn variable(&self, matchup: usize, slot_position: usize) -> usize {
        matchup * self.open_slots.len() + slot_position
    }

    #[must_use]
    pub fn num_vars(&self) -> usize {
        self.problem.lp.num_vars()
    }
}

/// Builds a [`ScheduleModel`] from matchups still to place.
pub struct ModelBuilder<'a> {
    league: &'a League,
    constraints: &'a ConstraintConfig,
    required: u32,
}

impl<'a> ModelBuilder<'a> {
    pub fn new(league: &'a League, constraints: &'a ConstraintConfig, required: u32) -> Self {
        Self {
            league,
            constraints,
            required,
        }
    }

    /// Open slots: the season minus protected slots, ascending.
    #[must_use]
    pub fn open_slots(&self, protected: &ProtectedSchedule) -> Vec<Slot> {
        Slot::range(self.constraints.slots)
            .filter(|s| !protected.is_protected(*s))
            .collect()
    }

    /// Build the model for `matchups`, which must already exclude the games
    /// held by `protected`.
    #[must_use]
    pub fn build(&self, matchups: &[Matchup], protected: &ProtectedSchedule) -> ScheduleModel {
        let open_slots = self.open_slots(protected);
        let slot_count = open_slots.len();
        let num_vars = matchups.len() * slot_count;
        let var = |m: usize, s: usize| m * slot_count + s;

        let mut lp = LpProblem::new(num_vars);
        lp.bounds = vec![VariableBounds::binary(); num_vars];
        let mut fixed_zero = 0;

        let mut by_participant: BTreeMap<&ParticipantId, Vec<usize>> = BTreeMap::new();
        for (m, matchup) in matchups.iter().enumerate() {
            by_participant.entry(&matchup.host).or_default().push(m);
            if !matchup.is_self_match() {
                by_participant.entry(&matchup.visitor).or_default().push(m);
            }
        }

        // Each matchup in exactly one open slot.
        for m in 0..matchups.len() {
            lp.constraints.push(Constraint::eq(
                Constraint::unit_terms((0..slot_count).map(|s| var(m, s))),
                Decimal::ONE,
            ));
        }

        // At most one game per participant per slot.
        for games in by_participant.values().filter(|g| g.len() > 1) {
            for s in 0..slot_count {
                lp.constraints.push(Constraint::leq(
                    Constraint::unit_terms(games.iter().map(|&m| var(m, s))),
                    Decimal::ONE,
                ));
            }
        }

        // Season totals net of protected games.
        let played = protected.realized_counts();
        for participant in self.league.participants() {
            let target = self
                .required
                .saturating_sub(played.get(&participant.id).copied().unwrap_or(0));
            let terms: Vec<usize> = by_participant
                .get(&participant.id)
                .map(|games| {
                    games
                        .iter()
                        .flat_map(|&m| (0..slot_count).map(move |s| var(m, s)))
                        .collect()
                })
                .unwrap_or_default();
            let target = Decimal::from(target);
            lp.constraints
                .push(Constraint::geq(Constraint::unit_terms(terms.iter().copied()), target));
            lp.constraints
                .push(Constraint::leq(Constraint::unit_terms(terms), target));
        }

        for (m, matchup) in matchups.iter().enumerate() {
            if !matchup.is_self_match() {
                continue;
            }
            for s in 0..slot_count {
                lp.bounds[var(m, s)] = VariableBounds::fixed(Decimal::ZERO);
                lp.constraints
                    .push(Constraint::eq(vec![(var(m, s), Decimal::ONE)], Decimal::ZERO));
                fixed_zero += 1;
            }
        }

        // Slot capacity and minimum load.
        let min_load = self.min_load();
        for s in 0..slot_count {
            let terms = || Constraint::unit_terms((0..matchups.len()).map(|m| var(m, s)));
            lp.constraints.push(Constraint::leq(
                terms(),
                Decimal::from(self.constraints.max_per_slot),
            ));
            if min_load > 0 {
                lp.constraints
                    .push(Constraint::geq(terms(), Decimal::from(min_load)));
            }
        }

        self.add_bye_rows(&mut lp, &by_participant, &open_slots, protected, &var);

        if let Some(cap) = self.constraints.max_cross_category_per_slot {
            let cross: Vec<usize> = matchups
                .iter()
                .enumerate()
                .filter(|(_, m)| self.league.is_cross_category(&m.host, &m.visitor))
                .map(|(idx, _)| idx)
                .collect();
            if !cross.is_empty() {
                for s in 0..slot_count {
                    lp.constraints.push(Constraint::leq(
                        Constraint::unit_terms(cross.iter().map(|&m| var(m, s))),
                        Decimal::from(cap),
                    ));
                }
            }
        }

        if self.constraints.enforce_adjacency_in_model {
            fixed_zero += self.add_adjacency_rows(&mut lp, matchups, &open_slots, protected, &var);
        }

        let midpoint = Decimal::from(self.constraints.slots + 1) / Decimal::TWO;
        for m in 0..matchups.len() {
            for (s, slot) in open_slots.iter().enumerate() {
                let distance = (Decimal::from(slot.get()) - midpoint).abs();
                let jitter = Decimal::from(((m * 7919 + s * 104_729) % 101) as u32);
                lp.objective[var(m, s)] = MIDPOINT_WEIGHT * distance + PERTURBATION * jitter;
            }
        }

        let stats = ModelStats {
            variables: num_vars,
            constraints: lp.constraints.len(),
            matchups: matchups.len(),
            open_slots: slot_count,
            fixed_zero,
        };
        debug!(
            variables = stats.variables,
            constraints = stats.constraints,
            open_slots = stats.open_slots,
            fixed_zero = stats.fixed_zero,
            "Model built"
        );

        ScheduleModel {
            problem: IlpProblem::all_binary(lp),
            matchups: matchups.to_vec(),
            open_slots,
            stats,
        }
    }

    /// Games every open slot must hold so that at most `max_absent` sit out.
    fn min_load(&self) -> u32 {
        self.constraints.min_load(self.league.len()) as u32
    }

    /// Everyone plays outside the bye window; inside it, byes per participant
    /// are capped, counting byes already taken in protected window slots.
    fn add_bye_rows(
        &self,
        lp: &mut LpProblem,
        by_participant: &BTreeMap<&ParticipantId, Vec<usize>>,
        open_slots: &[Slot],
        protected: &ProtectedSchedule,
        var: &impl Fn(usize, usize) -> usize,
    ) {
        let Some(window) = self.constraints.bye_window else {
            return;
        };
        let (inside, outside): (Vec<usize>, Vec<usize>) =
            (0..open_slots.len()).partition(|&s| window.contains(open_slots[s]));

        for participant in self.league.participants() {
            let games = by_participant
                .get(&participant.id)
                .map(Vec::as_slice)
                .unwrap_or(&[]);
            let terms_at = |s: usize| games.iter().map(move |&m| var(m, s));

            for &s in &outside {
                lp.constraints
                    .push(Constraint::geq(Constraint::unit_terms(terms_at(s)), Decimal::ONE));
            }

            let Some(max_byes) = self.constraints.max_byes_per_participant else {
                continue;
            };
            let protected_byes = protected
                .slots()
                .filter(|slot| window.contains(*slot))
                .filter(|slot| !protected.busy_in(*slot).contains(&participant.id))
                .count() as u32;
            let allowed = max_byes.saturating_sub(protected_byes) as usize;
            let required_games = inside.len().saturating_sub(allowed);
            if required_games > 0 {
                lp.constraints.push(Constraint::geq(
                    Constraint::unit_terms(inside.iter().flat_map(|&s| terms_at(s))),
                    Decimal::from(required_games as u64),
                ));
            }
        }
    }

    /// Forbid a pair from meeting in consecutive slots. Returns the number of
    /// variables pinned because a protected neighbour already holds the pair.
    fn add_adjacency_rows(
        &self,
        lp: &mut LpProblem,
        matchups: &[Matchup],
        open_slots: &[Slot],
        protected: &ProtectedSchedule,
        var: &impl Fn(usize, usize) -> usize,
    ) -> usize {
        let mut by_pair: HashMap<PairKey, Vec<usize>> = HashMap::new();
        for (m, matchup) in matchups.iter().enumerate() {
            by_pair.entry(matchup.pair_key()).or_default().push(m);
        }

        let consecutive: Vec<usize> = (0..open_slots.len().saturating_sub(1))
            .filter(|&s| open_slots[s].next() == open_slots[s + 1])
            .collect();

        for group in by_pair.values().filter(|g| g.len() > 1) {
            for &a in group {
                for &b in group {
                    if a == b {
                        continue;
                    }
                    for &s in &consecutive {
                        lp.constraints.push(Constraint::leq(
                            Constraint::unit_terms([var(a, s), var(b, s + 1)]),
                            Decimal::ONE,
                        ));
                    }
                }
            }
        }

        let mut pinned = 0;
        for protected_slot in protected.slots() {
            let neighbours = [protected_slot.prev(), Some(protected_slot.next())];
            for game in protected.games(protected_slot) {
                let Some(group) = by_pair.get(&game.pair_key()) else {
                    continue;
                };
                for neighbour in neighbours.iter().flatten() {
                    let Some(s) = open_slots.iter().position(|slot| slot == neighbour) else {
                        continue;
                    };
                    for &m in group {
                        let idx = var(m, s);
                        if lp.bounds[idx] != VariableBounds::fixed(Decimal::ZERO) {
                            lp.bounds[idx] = VariableBounds::fixed(Decimal::ZERO);
                            pinned += 1;
                        }
                    }
                }
            }
        }
        pinned
    }
}
