use std::cmp::Reverse;

use crate::Match;

/// Orders matches by ascending PED, then descending score. Stable, so equal
/// keys keep their input order.
pub fn rank(mut matches: Vec<Match>) -> Vec<Match> {
    matches.sort_by_key(|m| (m.ped, Reverse(m.score)));
    matches
}
