use crate::constants::{JERSEY_GC_LEADER, JERSEY_MOUNTAINS, JERSEY_POINTS, JERSEY_YOUNG};

/// Bonus for the classification jerseys a cyclist holds after a race or stage.
///
/// The flags are independent and additive; holding all four is worth 23.
pub fn jersey_bonus(
    is_gc_leader: bool,
    is_mountains_leader: bool,
    is_points_leader: bool,
    is_young_leader: bool,
) -> i32 {
    [
        (is_gc_leader, JERSEY_GC_LEADER),
        (is_mountains_leader, JERSEY_MOUNTAINS),
        (is_points_leader, JERSEY_POINTS),
        (is_young_leader, JERSEY_YOUNG),
    ]
    .iter()
    .filter(|(held, _)| *held)
    .map(|(_, points)| points)
    .sum()
}
