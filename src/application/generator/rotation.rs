//! Season-indexed rotation tables.
//!
//! Tables are read at `season mod period`. The four-group layout is the
//! common case and uses the const tables directly; other group counts fall
//! back to the circle method (intra-category) and a cyclic shift
//! (cross-category), which follow the same rules.

/// Seasons before an intra-category rotation repeats, four-group layout.
pub const INTRA_CATEGORY_PERIOD: usize = 3;

/// `INTRA_CATEGORY_ROTATION[season % 3][group]` is the same-category group
/// played in full.
pub const INTRA_CATEGORY_ROTATION: [[usize; 4]; INTRA_CATEGORY_PERIOD] =
    [[1, 0, 3, 2], [2, 3, 0, 1], [3, 2, 1, 0]];

/// Seasons before a cross-category rotation repeats, four-group layout.
pub const CROSS_CATEGORY_PERIOD: usize = 4;

/// `CROSS_CATEGORY_ROTATION[season % 4][group]` is the group of the paired
/// category played in full, seen from the first category of the pair.
pub const CROSS_CATEGORY_ROTATION: [[usize; 4]; CROSS_CATEGORY_PERIOD] =
    [[0, 1, 2, 3], [1, 2, 3, 0], [2, 3, 0, 1], [3, 0, 1, 2]];

/// Same-category group that `group` plays in full this season.
///
/// Returns `None` when the category has a single group, or for the group
/// sitting out when the group count is odd.
pub fn intra_category_partner(group: usize, groups: usize, season: u32) -> Option<usize> {
    if group >= groups {
        return None;
    }
    match groups {
        0 | 1 => None,
        2 => Some(1 - group),
        4 => Some(INTRA_CATEGORY_ROTATION[season as usize % INTRA_CATEGORY_PERIOD][group]),
        n if n % 2 == 0 => Some(circle_partner(group, n, season)),
        n => {
            // Odd count: pair against a phantom group and sit out its partner.
            let partner = circle_partner(group, n + 1, season);
            (partner < n).then_some(partner)
        }
    }
}

/// Circle-method round-robin partner for an even `n`.
fn circle_partner(group: usize, n: usize, season: u32) -> usize {
    let rounds = n - 1;
    let round = season as usize % rounds;
    if group == n - 1 {
        round
    } else if group == round {
        n - 1
    } else {
        (2 * round + 2 * rounds - group) % rounds
    }
}

/// Group of the paired category that `group` plays in full this season.
///
/// `first` tells which side of the category pair `group` belongs to; the
/// second side reads the table inversely so both sides agree.
pub fn cross_category_partner(group: usize, groups: usize, season: u32, first: bool) -> usize {
    if groups == 0 {
        return group;
    }
    if groups == CROSS_CATEGORY_PERIOD {
        let row = &CROSS_CATEGORY_ROTATION[season as usize % CROSS_CATEGORY_PERIOD];
        if first {
            return row[group % groups];
        }
        return row.iter().position(|&g| g == group).unwrap_or(group);
    }
    let shift = season as usize % groups;
    if first {
        (group + shift) % groups
    } else {
        (group + groups - shift) % groups
    }
}

/// Category paired with `category` for cross-category play.
///
/// Categories pair up in order: 0 with 1, 2 with 3 and so on. A trailing odd
/// category has no partner.
pub fn paired_category(category: usize, categories: usize) -> Option<usize> {
    let partner = category ^ 1;
    (partner < categories).then_some(partner)
}
