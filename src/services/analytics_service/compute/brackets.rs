use crate::models::{AgeBracket, BracketStat, Record, BRACKET_WIDTH};

/// Consecutive 5-year brackets covering the records' own age range, with the
/// bounds floored to a multiple of 5. Empty input gives no brackets.
pub fn age_brackets(records: &[&Record]) -> Vec<AgeBracket> {
    let min_age = records.iter().map(|r| r.age).min();
    let max_age = records.iter().map(|r| r.age).max();

    match (min_age, max_age) {
        (Some(min_age), Some(max_age)) => {
            let first = floor_to_bracket(min_age);
            let last = floor_to_bracket(max_age);
            (first..=last)
                .step_by(BRACKET_WIDTH as usize)
                .map(AgeBracket::starting_at)
                .collect()
        }
        _ => Vec::new(),
    }
}

fn floor_to_bracket(age: u32) -> u32 {
    (age / BRACKET_WIDTH) * BRACKET_WIDTH
}

/// Pages visited (sum) and conversion rate (mean, percent) per bracket.
///
/// Bins are right-open: a record lands in `[lo, lo + 5)`. Brackets with no
/// records are kept with a zero sum and no rate.
pub fn bracket_stats(records: &[&Record]) -> Vec<BracketStat> {
    let brackets = age_brackets(records);
    let first = match brackets.first() {
        Some(bracket) => bracket.lo,
        None => return Vec::new(),
    };

    let mut counts = vec![0usize; brackets.len()];
    let mut pages = vec![0u64; brackets.len()];
    let mut conversions = vec![0u64; brackets.len()];

    for record in records {
        let slot = ((record.age - first) / BRACKET_WIDTH) as usize;
        counts[slot] += 1;
        pages[slot] += record.total_pages_visited;
        if record.converted {
            conversions[slot] += 1;
        }
    }

    brackets
        .into_iter()
        .enumerate()
        .map(|(slot, bracket)| BracketStat {
            label: bracket.label(),
            bracket,
            records: counts[slot],
            pages_visited: pages[slot],
            conversion_rate: (counts[slot] > 0)
                .then(|| conversions[slot] as f64 / counts[slot] as f64 * 100.0),
        })
        .collect()
}
