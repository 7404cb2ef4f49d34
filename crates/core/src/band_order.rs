//! Suggested band running order.
//!
//! A greedy placement that fills positions one at a time, picking the band
//! with the best score for that position. The score keeps members who play
//! in several bands from performing back to back, groups heavy keyboard
//! rigs together, and honours "early"/"late" wishes written in a band's note.
//! Jam sessions, big bands and long sets drift towards the end.

use std::collections::{HashMap, HashSet};

use crate::types::DbId;

// ---------------------------------------------------------------------------
// Scoring weights
// ---------------------------------------------------------------------------

/// Penalty when a member would play three bands in a row.
pub const TRIPLE_OVERLAP_PENALTY: f64 = 10_000.0;
/// Penalty when a member would play two bands in a row.
pub const OVERLAP_PENALTY: f64 = 20.0;
/// Bonus for placing two heavy-gear bands next to each other.
pub const HEAVY_PAIR_BONUS: f64 = 20.0;
/// Reward (or penalty, outside the late section) for late-preferred bands.
pub const LATE_WEIGHT: f64 = 50.0;
/// Extra reward for a jam session placed in the late section.
pub const JAM_LATE_BONUS: f64 = 20.0;
/// Reward (or penalty, outside the early section) for early-preferred bands.
pub const EARLY_WEIGHT: f64 = 40.0;
/// Tie-breaker favouring the input order.
pub const INPUT_ORDER_WEIGHT: f64 = 0.01;

/// Member count from which a band counts as a big band.
pub const BIG_BAND_MEMBERS: usize = 8;
/// Song count from which a band prefers a late slot.
pub const LONG_SET_SONGS: usize = 3;

const EARLY_TOKENS: [&str; 4] = ["前半", "前の方", "早め", "最初"];
const LATE_TOKENS: [&str; 4] = ["後半", "後ろ", "遅め", "最後"];
const HEAVY_GEAR_TOKENS: [&str; 2] = ["key", "syn"];

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// Band attributes that influence placement.
#[derive(Debug, Clone)]
pub struct BandProfile {
    pub id: DbId,
    pub general_note: Option<String>,
    pub is_jam_session: bool,
}

/// One setlist entry. Only non-MC entries count as songs.
#[derive(Debug, Clone)]
pub struct SetlistEntry {
    pub band_id: Option<DbId>,
    pub is_mc: bool,
}

/// One member row of a band.
#[derive(Debug, Clone)]
pub struct MemberEntry {
    pub band_id: Option<DbId>,
    pub user_id: Option<DbId>,
    pub instrument: Option<String>,
    pub carry_equipment: Option<String>,
}

/// Position wish parsed from a band's note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preference {
    Early,
    Late,
    Any,
}

/// Read an early/late wish from free text. Mentioning both sides means no wish.
pub fn parse_preference(note: Option<&str>) -> Preference {
    let text = note.unwrap_or("").trim();
    if text.is_empty() {
        return Preference::Any;
    }
    let early = EARLY_TOKENS.iter().any(|t| text.contains(t));
    let late = LATE_TOKENS.iter().any(|t| text.contains(t));
    match (early, late) {
        (true, false) => Preference::Early,
        (false, true) => Preference::Late,
        _ => Preference::Any,
    }
}

fn has_heavy_gear(value: Option<&str>) -> bool {
    let text = value.unwrap_or("").to_lowercase();
    HEAVY_GEAR_TOKENS.iter().any(|t| text.contains(t))
}

// ---------------------------------------------------------------------------
// Features
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct Features {
    id: DbId,
    input_index: usize,
    members: HashSet<DbId>,
    late_preferred: bool,
    is_jam: bool,
    preference: Preference,
    heavy: bool,
}

fn build_features(
    bands: &[BandProfile],
    setlist: &[SetlistEntry],
    members: &[MemberEntry],
) -> Vec<Features> {
    let mut song_counts: HashMap<DbId, usize> = HashMap::new();
    for entry in setlist.iter().filter(|e| !e.is_mc) {
        if let Some(band_id) = entry.band_id {
            *song_counts.entry(band_id).or_default() += 1;
        }
    }

    let mut member_sets: HashMap<DbId, HashSet<DbId>> = HashMap::new();
    let mut member_rows: HashMap<DbId, usize> = HashMap::new();
    let mut heavy: HashSet<DbId> = HashSet::new();
    for member in members {
        let Some(band_id) = member.band_id else { continue };
        let set = member_sets.entry(band_id).or_default();
        if let Some(user_id) = member.user_id {
            set.insert(user_id);
        }
        *member_rows.entry(band_id).or_default() += 1;
        if has_heavy_gear(member.instrument.as_deref())
            || has_heavy_gear(member.carry_equipment.as_deref())
        {
            heavy.insert(band_id);
        }
    }

    bands
        .iter()
        .enumerate()
        .map(|(input_index, band)| {
            let set = member_sets.remove(&band.id).unwrap_or_default();
            let member_count = set.len().max(member_rows.get(&band.id).copied().unwrap_or(0));
            let song_count = song_counts.get(&band.id).copied().unwrap_or(0);
            let preference = parse_preference(band.general_note.as_deref());
            Features {
                id: band.id,
                input_index,
                members: set,
                late_preferred: band.is_jam_session
                    || member_count >= BIG_BAND_MEMBERS
                    || song_count >= LONG_SET_SONGS
                    || preference == Preference::Late,
                is_jam: band.is_jam_session,
                preference,
                heavy: heavy.contains(&band.id),
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Ordering
// ---------------------------------------------------------------------------

/// Suggest a running order for `bands`. Returns band ids.
///
/// The input order acts as the tie-breaker, so a roster with no members,
/// songs or notes comes back unchanged.
pub fn suggest_band_order(
    bands: &[BandProfile],
    setlist: &[SetlistEntry],
    members: &[MemberEntry],
) -> Vec<DbId> {
    let total = bands.len();
    let late_start = total * 2 / 3;
    // One past the last early position; positions < early_end are early.
    let early_end = total / 3;

    let mut remaining = build_features(bands, setlist, members);
    let mut ordered: Vec<Features> = Vec::with_capacity(total);

    while !remaining.is_empty() {
        let position = ordered.len();
        let prev1 = ordered.last();
        let prev2 = position.checked_sub(2).and_then(|i| ordered.get(i));

        let mut best_index = 0;
        let mut best_score = f64::NEG_INFINITY;
        for (index, candidate) in remaining.iter().enumerate() {
            let score = score(candidate, position, prev1, prev2, late_start, early_end);
            if score > best_score {
                best_score = score;
                best_index = index;
            }
        }

        ordered.push(remaining.remove(best_index));
    }

    ordered.into_iter().map(|f| f.id).collect()
}

fn score(
    candidate: &Features,
    position: usize,
    prev1: Option<&Features>,
    prev2: Option<&Features>,
    late_start: usize,
    early_end: usize,
) -> f64 {
    let mut score = 0.0;

    if let (Some(p1), Some(p2)) = (prev1, prev2) {
        let triple = candidate
            .members
            .iter()
            .any(|m| p1.members.contains(m) && p2.members.contains(m));
        if triple {
            score -= TRIPLE_OVERLAP_PENALTY;
        }
    }

    if let Some(p1) = prev1 {
        if !candidate.members.is_disjoint(&p1.members) {
            score -= OVERLAP_PENALTY;
        }
        if candidate.heavy && p1.heavy {
            score += HEAVY_PAIR_BONUS;
        }
    }

    if candidate.late_preferred {
        let in_late_section = position >= late_start;
        score += if in_late_section { LATE_WEIGHT } else { -LATE_WEIGHT };
        if candidate.is_jam && in_late_section {
            score += JAM_LATE_BONUS;
        }
    }

    if candidate.preference == Preference::Early {
        score += if position < early_end { EARLY_WEIGHT } else { -EARLY_WEIGHT };
    }

    score - candidate.input_index as f64 * INPUT_ORDER_WEIGHT
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
