/// Compute the power of every connected point, ordered like the active
/// ordering (most recently connected first).
///
/// The power of the empty slots is lent out one `unit` at a time, newest
/// point first. Every point gets at least `unit`, and at most `2 * unit`.
pub(crate) fn redistribute(connected: usize, capacity: usize, unit: u32) -> Vec<u32> {
    let free_slots = capacity.saturating_sub(connected) as u32;
    // Power not drawn by the empty slots
    let mut remaining = free_slots * unit;

    (0..connected)
        .map(|_| {
            let bonus = if remaining > 0 { unit } else { 0 };
            remaining = remaining.saturating_sub(unit);
            unit + bonus
        })
        .collect()
}
