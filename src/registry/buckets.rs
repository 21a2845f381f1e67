//! Message length bins for the "Number of characters" histogram

/// Lower bounds of the length bins; the last bin is open-ended
pub const LENGTH_TICKS: [u32; 14] = [
    0, 1, 2, 5, 10, 20, 50, 100, 200, 500, 1000, 2000, 5000, 10000,
];

/// Lower bound of the bin holding `length`
///
/// A length equal to a boundary belongs to the bin starting there.
pub fn bucket(length: u32) -> u32 {
    let i = LENGTH_TICKS.partition_point(|&tick| tick <= length);
    LENGTH_TICKS[i.saturating_sub(1)]
}

/// `"<lo>-<hi>"` label for the bin starting at `lower`, thousands as `k`
pub fn bucket_label(lower: u32) -> String {
    let i = LENGTH_TICKS.partition_point(|&tick| tick <= lower).saturating_sub(1);
    match LENGTH_TICKS.get(i + 1) {
        Some(&upper) => format!("{}-{}", tick_str(LENGTH_TICKS[i]), tick_str(upper)),
        None => format!("{}-∞", tick_str(LENGTH_TICKS[i])),
    }
}

fn tick_str(tick: u32) -> String {
    if tick >= 1000 {
        format!("{}k", tick / 1000)
    } else {
        tick.to_string()
    }
}
