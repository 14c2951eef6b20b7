//! League fixtures.
//!
//! Identifiers follow `{category}{group}{member}`, so `AC12` is the third
//! member of the second `AC` group; groups are named `AC-G1` and so on.

use serde_json::json;

use crate::domain::{League, Participant};

/// Two participants in one group.
pub fn pair() -> League {
    single_group(&["A", "B"])
}

/// Four participants `A`..`D` in one group: a double round robin league.
pub fn four() -> League {
    single_group(&["A", "B", "C", "D"])
}

/// One group holding the given identifiers, ranked in order.
pub fn single_group(ids: &[&str]) -> League {
    let participants = ids
        .iter()
        .enumerate()
        .map(|(i, id)| Participant::new(*id, "G", "C").with_rank(i as u32 + 1))
        .collect();
    League::try_new(participants).unwrap_or_else(|e| panic!("invalid fixture: {e}"))
}

/// Participants of a league with `categories` categories of `groups` groups
/// of `size` members each.
pub fn participants(categories: usize, groups: usize, size: usize) -> Vec<Participant> {
    let mut out = Vec::with_capacity(categories * groups * size);
    for category in category_names(categories) {
        for g in 0..groups {
            for m in 0..size {
                out.push(
                    Participant::new(
                        format!("{category}{g}{m}"),
                        format!("{category}-G{g}"),
                        category.as_str(),
                    )
                    .with_rank(m as u32 + 1),
                );
            }
        }
    }
    out
}

/// A validated league built by [`participants`].
pub fn grouped(categories: usize, groups: usize, size: usize) -> League {
    League::try_new(participants(categories, groups, size))
        .unwrap_or_else(|e| panic!("invalid fixture: {e}"))
}

/// The default 32-participant layout: two categories of four groups of four.
pub fn full() -> League {
    grouped(2, 4, 4)
}

/// The league as a league file document.
pub fn to_json(league: &League) -> String {
    json!({ "participants": league.participants() }).to_string()
}

fn category_names(count: usize) -> Vec<String> {
    match count {
        2 => vec!["AC".to_string(), "NC".to_string()],
        n => (0..n).map(|i| format!("K{i}")).collect(),
    }
}
