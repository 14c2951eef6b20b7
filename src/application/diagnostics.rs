//! Solver-independent feasibility pre-checks.
//!
//! Every check here is a counting argument: if one fails, no assignment can
//! satisfy the model and the solver is not worth calling.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::domain::{
    ConstraintConfig, DiagnosticCounts, DiagnosticsReport, FilteredMatchups, League, Matchup,
    ParticipantCount, ParticipantId, ProtectedSchedule, SeasonFormat, Slot,
};

/// Inputs shared by every check.
pub struct Diagnostics<'a> {
    league: &'a League,
    format: &'a SeasonFormat,
    constraints: &'a ConstraintConfig,
}

impl<'a> Diagnostics<'a> {
    pub fn new(
        league: &'a League,
        format: &'a SeasonFormat,
        constraints: &'a ConstraintConfig,
    ) -> Self {
        Self {
            league,
            format,
            constraints,
        }
    }

    /// Run every check against the generated matchups and what is left after
    /// removing protected games.
    #[must_use]
    pub fn diagnose(
        &self,
        generated: &[Matchup],
        protected: &ProtectedSchedule,
        filtered: &FilteredMatchups,
    ) -> DiagnosticsReport {
        let mut report = DiagnosticsReport::default();
        let participants = self.league.len();
        let required = self.format.games_per_participant;
        let remaining = &filtered.remaining;

        let open_slots: Vec<Slot> = Slot::range(self.constraints.slots)
            .filter(|s| !protected.is_protected(*s))
            .collect();
        let max_per_slot = self.constraints.max_per_slot as usize;

        report.counts = DiagnosticCounts {
            participants,
            required_matchups: participants * required as usize / 2,
            actual_matchups: generated.len(),
            protected_matchups: protected.len(),
            matchups_to_place: remaining.len(),
            open_slots: open_slots.len(),
            slot_capacity: open_slots.len() * max_per_slot,
            ..DiagnosticCounts::default()
        };

        self.check_totals(&mut report, generated);
        self.check_capacity(&mut report);
        self.check_participants(&mut report, protected, remaining, &open_slots);
        self.check_cross_category(&mut report, remaining, open_slots.len());

        for game in &filtered.unmatched {
            report.note(format!(
                "protected game {} in slot {} has no generated counterpart",
                game.matchup, game.slot
            ));
        }

        if report.is_blocking() {
            warn!(issues = report.issues.len(), "Diagnostics found blocking issues");
        } else {
            debug!(issues = report.issues.len(), "Diagnostics passed");
        }
        report
    }

    /// Generated totals against the format.
    fn check_totals(&self, report: &mut DiagnosticsReport, generated: &[Matchup]) {
        let required = self.format.games_per_participant;
        let counts = count_games(generated);

        if report.counts.actual_matchups != report.counts.required_matchups {
            report.block(format!(
                "generated {} matchups, format requires {}",
                report.counts.actual_matchups, report.counts.required_matchups
            ));
        }

        let mismatched: Vec<ParticipantCount> = self
            .league
            .participants()
            .iter()
            .filter_map(|p| {
                let realized = counts.get(&p.id).copied().unwrap_or(0);
                (realized != required).then(|| ParticipantCount {
                    participant: p.id.clone(),
                    realized,
                    required,
                })
            })
            .collect();
        for entry in &mismatched {
            report.block(format!("{entry} generated games"));
        }
        report.counts.mismatched_participants = mismatched;
    }

    /// Slot capacity and the minimum per-slot load.
    fn check_capacity(&self, report: &mut DiagnosticsReport) {
        let counts = &report.counts;
        let (to_place, capacity, open) = (counts.matchups_to_place, counts.slot_capacity, counts.open_slots);

        if to_place > capacity {
            report.block(format!(
                "{to_place} matchups to place but open slots hold only {capacity}"
            ));
        }

        if let Some(max_absent) = self.constraints.max_absent_per_slot {
            let min_load = self.constraints.min_load(self.league.len());
            if min_load > self.constraints.max_per_slot as usize {
                report.block(format!(
                    "at most {max_absent} may sit out, so a slot needs {min_load} games, above the cap of {}",
                    self.constraints.max_per_slot
                ));
            }
            if min_load * open > to_place {
                report.block(format!(
                    "{open} open slots need at least {} games, only {to_place} to place",
                    min_load * open
                ));
            }
        }
    }

    /// Per-participant fit and bye capacity.
    fn check_participants(
        &self,
        report: &mut DiagnosticsReport,
        protected: &ProtectedSchedule,
        remaining: &[Matchup],
        open_slots: &[Slot],
    ) {
        let required = self.format.games_per_participant;
        let played = protected.realized_counts();
        let left = count_games(remaining);
        let window = self.constraints.bye_window;
        let window_open = window.map_or(open_slots.len(), |w| {
            open_slots.iter().filter(|s| w.contains(**s)).count()
        });
        let outside_open = open_slots.len() - window_open;

        let mut byes_needed = 0usize;
        for participant in self.league.participants() {
            let id = &participant.id;
            let already = played.get(id).copied().unwrap_or(0);
            if already > required {
                report.block(format!(
                    "{id} already plays {already} protected games, more than {required}"
                ));
            }
            let games = left.get(id).copied().unwrap_or(0) as usize;
            if games > open_slots.len() {
                report.block(format!(
                    "{id} has {games} games left but only {} open slots",
                    open_slots.len()
                ));
                continue;
            }
            if games < outside_open {
                report.block(format!(
                    "{id} must play in {outside_open} slots outside the bye window but has {games} games left"
                ));
            }
            let byes = open_slots.len() - games;
            byes_needed += byes;

            if let (Some(w), Some(max_byes)) = (window, self.constraints.max_byes_per_participant) {
                let protected_byes = protected
                    .slots()
                    .filter(|slot| w.contains(*slot) && !protected.busy_in(*slot).contains(id))
                    .count() as u32;
                let allowed = max_byes.saturating_sub(protected_byes) as usize;
                if byes > allowed {
                    report.block(format!(
                        "{id} needs {byes} byes in open slots but may take {allowed}"
                    ));
                }
            }
        }

        report.counts.byes_needed = byes_needed;
        report.counts.bye_capacity = self
            .constraints
            .max_absent_per_slot
            .map(|max_absent| window_open * max_absent as usize);
        if let Some(capacity) = report.counts.bye_capacity {
            if byes_needed > capacity {
                report.block(format!(
                    "{byes_needed} byes needed but the bye slots allow {capacity}"
                ));
            }
        }
    }

    fn check_cross_category(&self, report: &mut DiagnosticsReport, remaining: &[Matchup], open: usize) {
        let cross = remaining
            .iter()
            .filter(|m| self.league.is_cross_category(&m.host, &m.visitor))
            .count();
        report.counts.cross_category_matchups = cross;
        report.counts.cross_category_capacity = self
            .constraints
            .max_cross_category_per_slot
            .map(|cap| open * cap as usize);
        if let Some(capacity) = report.counts.cross_category_capacity {
            if cross > capacity {
                report.block(format!(
                    "{cross} cross-category matchups but open slots allow {capacity}"
                ));
            }
        }
    }
}

fn count_games(matchups: &[Matchup]) -> HashMap<ParticipantId, u32> {
    let mut counts = HashMap::new();
    for participant in matchups.iter().flat_map(Matchup::participants) {
        *counts.entry(participant.clone()).or_insert(0) += 1;
    }
    counts
}
