//! Reading solver values back into assignments.

use std::collections::HashSet;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::debug;

use super::model::ScheduleModel;
use crate::domain::{Assignment, ParticipantId, ProtectedSchedule, Slot};
use crate::error::ScheduleError;
use crate::port::outbound::solver::SolverResult;

/// Values above this count as "assigned".
const ASSIGNED: Decimal = dec!(0.5);

/// Turn an accepted solver result into one assignment per matchup.
///
/// # Errors
///
/// Returns [`ScheduleError::InvalidSolution`] when the value vector has the
/// wrong length, a matchup lands in zero or several slots, or a participant
/// is booked twice in one slot once protected games are counted.
pub fn extract(
    model: &ScheduleModel,
    result: &SolverResult,
    protected: &ProtectedSchedule,
) -> Result<Vec<Assignment>, ScheduleError> {
    if result.values.len() != model.num_vars() {
        return Err(ScheduleError::InvalidSolution(format!(
            "solver returned {} values for {} variables",
            result.values.len(),
            model.num_vars()
        )));
    }

    let mut assignments = Vec::with_capacity(model.matchups.len());
    for (m, matchup) in model.matchups.iter().enumerate() {
        let chosen: Vec<Slot> = model
            .open_slots
            .iter()
            .enumerate()
            .filter(|(s, _)| result.values[model.variable(m, *s)] > ASSIGNED)
            .map(|(_, slot)| *slot)
            .collect();
        match chosen.as_slice() {
            [slot] => assignments.push(Assignment::new(matchup.clone(), *slot)),
            other => {
                return Err(ScheduleError::InvalidSolution(format!(
                    "{matchup} placed in {} slots",
                    other.len()
                )))
            }
        }
    }

    let mut booked: HashSet<(&ParticipantId, Slot)> = HashSet::new();
    let fixed = protected.assignments();
    for assignment in fixed.iter().chain(assignments.iter()) {
        for participant in assignment.matchup.participants() {
            if !booked.insert((participant, assignment.slot)) {
                return Err(ScheduleError::InvalidSolution(format!(
                    "{participant} plays twice in slot {}",
                    assignment.slot
                )));
            }
        }
    }

    debug!(assignments = assignments.len(), "Solution extracted");
    Ok(assignments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::model::ModelStats;
    use crate::domain::Matchup;
    use crate::port::outbound::solver::{IlpProblem, LpProblem, SolverStatus};

    fn slot(n: u32) -> Slot {
        Slot::try_new(n).unwrap()
    }

    fn model(matchups: Vec<Matchup>, open_slots: Vec<Slot>) -> ScheduleModel {
        let vars = matchups.len() * open_slots.len();
        ScheduleModel {
            problem: IlpProblem::all_binary(LpProblem::new(vars)),
            matchups,
            open_slots,
            stats: ModelStats::default(),
        }
    }

    fn values(bits: &[u8]) -> SolverResult {
        let values = bits.iter().map(|&b| Decimal::from(b)).collect();
        SolverResult::solved(SolverStatus::Optimal, values, Decimal::ZERO)
    }

    #[test]
    fn reads_one_slot_per_matchup() {
        let model = model(
            vec![Matchup::new("A", "B"), Matchup::new("C", "D")],
            vec![slot(1), slot(3)],
        );
        let result = values(&[0, 1, 1, 0]);

        let assignments = extract(&model, &result, &ProtectedSchedule::empty()).unwrap();
        assert_eq!(
            assignments,
            vec![
                Assignment::new(Matchup::new("A", "B"), slot(3)),
                Assignment::new(Matchup::new("C", "D"), slot(1)),
            ]
        );
    }

    #[test]
    fn rejects_unplaced_matchup() {
        let model = model(vec![Matchup::new("A", "B")], vec![slot(1), slot(2)]);
        let err = extract(&model, &values(&[0, 0]), &ProtectedSchedule::empty()).unwrap_err();
        assert!(matches!(err, ScheduleError::InvalidSolution(_)));
    }

    #[test]
    fn rejects_clash_with_protected_game() {
        let protected = ProtectedSchedule::try_new(
            [(slot(2), vec![Matchup::new("A", "C")])].into_iter().collect(),
        )
        .unwrap();
        let model = model(vec![Matchup::new("A", "B")], vec![slot(1), slot(2)]);
        let err = extract(&model, &values(&[0, 1]), &protected).unwrap_err();
        assert!(err.to_string().contains("plays twice"));
    }

    #[test]
    fn rejects_short_value_vector() {
        let model = model(vec![Matchup::new("A", "B")], vec![slot(1)]);
        let err = extract(&model, &values(&[]), &ProtectedSchedule::empty()).unwrap_err();
        assert!(matches!(err, ScheduleError::InvalidSolution(_)));
    }
}
