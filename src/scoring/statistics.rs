use crate::domain::{Performance, Player, PlayerStats, TOP_SLOTS, TopStats};

/// Folds one confirmed match's figures into a player's running statistics.
///
/// Not idempotent: every call counts, so callers must apply a side's
/// performance exactly once per confirmation.
pub fn apply_performance(player: &mut Player, performance: &Performance) {
    update_stats(&mut player.stats, performance);
    update_top_stats(&mut player.top_stats, performance);
}

fn update_stats(stats: &mut PlayerStats, performance: &Performance) {
    if performance.shortlegs > 0 {
        stats.shortleg_best = match stats.shortleg() {
            Some(best) => best.min(performance.shortlegs),
            None => performance.shortlegs,
        };
    }

    stats.one_eighties_total += performance.one_eighties;
    stats.high_finish_best = stats.high_finish_best.max(performance.high_finish);

    if performance.average > 0 {
        stats.average_total += u64::from(performance.average);
        stats.average_count += 1;
        stats.average_best = running_mean(stats.average_total, stats.average_count);
    }
}

fn update_top_stats(top: &mut TopStats, performance: &Performance) {
    top.top_shortlegs = merge_top(&top.top_shortlegs, performance.shortlegs, SlotOrder::Ascending);
    top.top_high_finishes = merge_top(
        &top.top_high_finishes,
        performance.high_finish,
        SlotOrder::Descending,
    );
}

/// Mean rounded to one decimal place
pub fn running_mean(total: u64, count: u32) -> f64 {
    if count == 0 {
        return 0.0;
    }
    let mean = total as f64 / f64::from(count);
    (mean * 10.0).round() / 10.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SlotOrder {
    Ascending,
    Descending,
}

fn merge_top(slots: &[u32; TOP_SLOTS], value: u32, ordering: SlotOrder) -> [u32; TOP_SLOTS] {
    // Union of slots and the new value
    let mut values: Vec<u32> = slots
        .iter()
        .copied()
        .chain(std::iter::once(value))
        .filter(|&v| v > 0)
        .collect();

    match ordering {
        SlotOrder::Ascending => values.sort_unstable(),
        SlotOrder::Descending => values.sort_unstable_by(|a, b| b.cmp(a)),
    }
    // A repeated value keeps a single slot
    values.dedup();

    let mut merged = [0; TOP_SLOTS];
    for (slot, v) in merged.iter_mut().zip(values) {
        *slot = v;
    }
    merged
}
