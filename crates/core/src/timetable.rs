//! Event timetable logic: slot generation, ordering and save-time cleanup.
//!
//! A timetable is the running order of an event: band performances
//! interleaved with changeovers and other non-performance intervals. The
//! show generator lays bands out back to back from the event start time,
//! using each band's summed song durations. The template generator adds the
//! rehearsal block and the fixed prep, rest and cleanup slots around it.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::clock::{seconds_to_minutes_ceil, ClockTime};
use crate::error::CoreError;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Note carried by changeover slots.
pub const CHANGEOVER_NOTE: &str = "転換";

/// Changeover length used when an event does not specify one.
pub const DEFAULT_CHANGEOVER_MIN: i32 = 15;

/// Note of the gathering and setup slot that opens a template.
pub const PREP_NOTE: &str = "集合～準備";

/// Note of the rest slot between rehearsal and show.
pub const REST_NOTE: &str = "休憩";

/// Note of the teardown slot that closes a template.
pub const CLEANUP_NOTE: &str = "終了～撤収";

pub const TEMPLATE_PREP_MIN: u32 = 60;
pub const TEMPLATE_REST_MIN: u32 = 10;
pub const TEMPLATE_CLEANUP_MIN: u32 = 60;

/// Slot length assumed for a band without song durations in a template.
pub const DEFAULT_BAND_DURATION_MIN: u32 = 10;

/// Shortest rehearsal slot a band gets.
pub const MIN_REHEARSAL_MIN: u32 = 10;

// ---------------------------------------------------------------------------
// Slot types
// ---------------------------------------------------------------------------

/// Kind of interval a slot represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotType {
    /// A band's performance. The only type allowed to reference a band.
    Band,
    /// A changeover between bands.
    Break,
    /// Anything else: setup, rest, cleanup.
    Other,
}

impl SlotType {
    /// Value stored in `event_slots.slot_type`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Band => "band",
            Self::Break => "break",
            Self::Other => "other",
        }
    }
}

impl FromStr for SlotType {
    type Err = CoreError;

    /// Parses stored and client-supplied values. The legacy `mc` type is
    /// folded into `other`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "band" => Ok(Self::Band),
            "break" => Ok(Self::Break),
            "other" | "mc" => Ok(Self::Other),
            other => Err(CoreError::Validation(format!("Unknown slot type '{other}'"))),
        }
    }
}

/// Part of the event day a slot belongs to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotPhase {
    #[default]
    Show,
    /// Regular rehearsal on the day.
    RehearsalNormal,
    /// Rehearsal held before the event day.
    RehearsalPre,
}

impl SlotPhase {
    /// Value stored in `event_slots.slot_phase`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Show => "show",
            Self::RehearsalNormal => "rehearsal_normal",
            Self::RehearsalPre => "rehearsal_pre",
        }
    }

    pub fn is_rehearsal(self) -> bool {
        matches!(self, Self::RehearsalNormal | Self::RehearsalPre)
    }
}

impl FromStr for SlotPhase {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "show" => Ok(Self::Show),
            "rehearsal_normal" => Ok(Self::RehearsalNormal),
            "rehearsal_pre" => Ok(Self::RehearsalPre),
            other => Err(CoreError::Validation(format!("Unknown slot phase '{other}'"))),
        }
    }
}

/// Band order used for rehearsals relative to the show order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RehearsalOrder {
    #[default]
    Same,
    Reverse,
}

impl RehearsalOrder {
    /// Value stored in `events.normal_rehearsal_order`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Same => "same",
            Self::Reverse => "reverse",
        }
    }

    /// `bands` (given in show order) in rehearsal order.
    pub fn apply(self, bands: &[DbId]) -> Vec<DbId> {
        match self {
            Self::Same => bands.to_vec(),
            Self::Reverse => bands.iter().rev().copied().collect(),
        }
    }
}

impl FromStr for RehearsalOrder {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "same" => Ok(Self::Same),
            "reverse" => Ok(Self::Reverse),
            other => Err(CoreError::Validation(format!("Unknown rehearsal order '{other}'"))),
        }
    }
}

// ---------------------------------------------------------------------------
// Slot shapes
// ---------------------------------------------------------------------------

/// A slot produced by [`sequence_slots`], not yet persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotPlan {
    pub band_id: Option<DbId>,
    pub slot_type: SlotType,
    pub slot_phase: SlotPhase,
    pub order_in_event: i32,
    pub start_time: Option<ClockTime>,
    pub end_time: Option<ClockTime>,
    pub changeover_min: Option<i32>,
    pub note: Option<String>,
}

/// A persisted (or client-created) slot with its identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub id: DbId,
    pub band_id: Option<DbId>,
    pub slot_type: SlotType,
    #[serde(default)]
    pub slot_phase: SlotPhase,
    pub order_in_event: Option<i32>,
    pub start_time: Option<ClockTime>,
    pub end_time: Option<ClockTime>,
    pub changeover_min: Option<i32>,
    pub note: Option<String>,
}

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

/// Sum song durations per band.
///
/// Songs without a duration contribute zero. Songs without a band are ignored.
pub fn band_song_seconds<I>(songs: I) -> HashMap<DbId, i64>
where
    I: IntoIterator<Item = (Option<DbId>, Option<i32>)>,
{
    let mut totals: HashMap<DbId, i64> = HashMap::new();
    for (band_id, duration_sec) in songs {
        let Some(band_id) = band_id else { continue };
        *totals.entry(band_id).or_default() += i64::from(duration_sec.unwrap_or(0));
    }
    totals
}

/// Reject a generation request for an event without bands.
pub fn validate_bands_present(band_count: usize) -> Result<(), CoreError> {
    if band_count == 0 {
        return Err(CoreError::Validation("no bands to schedule".to_string()));
    }
    Ok(())
}

/// Lay out a running order for `bands` in the given order.
///
/// Each band gets one `band` slot lasting its summed song time rounded up to
/// whole minutes. Between consecutive bands a changeover slot of
/// `changeover_min` minutes is inserted, unless `changeover_min` is zero.
///
/// Times are only computed while the cursor is known, so without a `start`
/// no slot has times. A band without song durations gets a start but no end,
/// and the cursor stays where it was for the slots after it.
pub fn sequence_slots(
    bands: &[DbId],
    song_seconds: &HashMap<DbId, i64>,
    changeover_min: i32,
    start: Option<ClockTime>,
) -> Vec<SlotPlan> {
    let changeover = u32::try_from(changeover_min).unwrap_or(0);
    let mut slots = Vec::with_capacity(bands.len() * 2);
    let mut cursor = start;
    let mut order: i32 = 1;

    for (index, band_id) in bands.iter().enumerate() {
        let seconds = song_seconds.get(band_id).copied().unwrap_or(0);
        let duration = seconds_to_minutes_ceil(seconds);

        let end = cursor.zip(duration).map(|(at, minutes)| at.plus(minutes));
        slots.push(SlotPlan {
            band_id: Some(*band_id),
            slot_type: SlotType::Band,
            slot_phase: SlotPhase::Show,
            order_in_event: order,
            start_time: cursor,
            end_time: end,
            changeover_min: Some(changeover_min),
            note: None,
        });
        order += 1;
        if end.is_some() {
            cursor = end;
        }

        let is_last = index + 1 == bands.len();
        if !is_last && changeover > 0 {
            let end = cursor.map(|at| at.plus(changeover));
            slots.push(SlotPlan {
                band_id: None,
                slot_type: SlotType::Other,
                slot_phase: SlotPhase::Show,
                order_in_event: order,
                start_time: cursor,
                end_time: end,
                changeover_min: Some(changeover_min),
                note: Some(CHANGEOVER_NOTE.to_string()),
            });
            order += 1;
            cursor = end;
        }
    }

    slots
}

/// A template slot before times are laid out.
struct Seed {
    band_id: Option<DbId>,
    slot_type: SlotType,
    slot_phase: SlotPhase,
    changeover_min: Option<i32>,
    note: Option<&'static str>,
    minutes: u32,
}

impl Seed {
    fn fixed(note: &'static str, phase: SlotPhase, minutes: u32) -> Self {
        Self {
            band_id: None,
            slot_type: SlotType::Other,
            slot_phase: phase,
            changeover_min: None,
            note: Some(note),
            minutes,
        }
    }
}

fn band_seeds(
    bands: &[DbId],
    song_seconds: &HashMap<DbId, i64>,
    changeover_min: i32,
    phase: SlotPhase,
) -> Vec<Seed> {
    let changeover = u32::try_from(changeover_min).unwrap_or(0);
    let mut seeds = Vec::with_capacity(bands.len() * 2);

    for (index, band_id) in bands.iter().enumerate() {
        let seconds = song_seconds.get(band_id).copied().unwrap_or(0);
        let base = seconds_to_minutes_ceil(seconds).unwrap_or(DEFAULT_BAND_DURATION_MIN);
        let minutes = if phase.is_rehearsal() {
            base.max(MIN_REHEARSAL_MIN)
        } else {
            base
        };
        seeds.push(Seed {
            band_id: Some(*band_id),
            slot_type: SlotType::Band,
            slot_phase: phase,
            changeover_min: None,
            note: None,
            minutes,
        });

        if index + 1 < bands.len() && changeover > 0 {
            seeds.push(Seed {
                band_id: None,
                slot_type: SlotType::Break,
                slot_phase: phase,
                changeover_min: Some(changeover_min),
                note: Some(CHANGEOVER_NOTE),
                minutes: changeover,
            });
        }
    }
    seeds
}

fn lay_out(seeds: Vec<Seed>, start: Option<ClockTime>, first_order: i32) -> Vec<SlotPlan> {
    let mut cursor = start;
    seeds
        .into_iter()
        .zip(first_order..)
        .map(|(seed, order)| {
            let start_time = cursor;
            let end_time = cursor.map(|at| at.plus(seed.minutes));
            cursor = end_time;
            SlotPlan {
                band_id: seed.band_id,
                slot_type: seed.slot_type,
                slot_phase: seed.slot_phase,
                order_in_event: order,
                start_time,
                end_time,
                changeover_min: seed.changeover_min,
                note: seed.note.map(str::to_string),
            }
        })
        .collect()
}

/// Lay out a full event day: prep, rehearsals, rest, show and cleanup.
///
/// Rehearsals run in `rehearsal_order` relative to `bands` and last at least
/// [`MIN_REHEARSAL_MIN`]. Bands without song durations are planned with
/// [`DEFAULT_BAND_DURATION_MIN`], so every slot has a length.
///
/// The rehearsal block starts at `open` or, failing that, early enough to
/// end at `start`. The show starts at `start` or right after the rehearsal
/// block. With neither time known no slot has times.
pub fn template_slots(
    bands: &[DbId],
    song_seconds: &HashMap<DbId, i64>,
    changeover_min: i32,
    open: Option<ClockTime>,
    start: Option<ClockTime>,
    rehearsal_order: RehearsalOrder,
) -> Vec<SlotPlan> {
    let rehearsal_bands = rehearsal_order.apply(bands);

    let mut pre_show = vec![Seed::fixed(PREP_NOTE, SlotPhase::RehearsalNormal, TEMPLATE_PREP_MIN)];
    pre_show.extend(band_seeds(
        &rehearsal_bands,
        song_seconds,
        changeover_min,
        SlotPhase::RehearsalNormal,
    ));
    pre_show.push(Seed::fixed(REST_NOTE, SlotPhase::RehearsalNormal, TEMPLATE_REST_MIN));

    let mut show = band_seeds(bands, song_seconds, changeover_min, SlotPhase::Show);
    show.push(Seed::fixed(CLEANUP_NOTE, SlotPhase::Show, TEMPLATE_CLEANUP_MIN));

    let pre_show_minutes: u32 = pre_show.iter().map(|seed| seed.minutes).sum();
    let pre_show_start = open.or_else(|| {
        start
            .and_then(|at| at.minutes().checked_sub(pre_show_minutes))
            .map(ClockTime::from_minutes)
    });
    let show_start = start.or_else(|| pre_show_start.map(|at| at.plus(pre_show_minutes)));

    let show_first_order = pre_show.len() as i32 + 1;
    let mut slots = lay_out(pre_show, pre_show_start, 1);
    slots.extend(lay_out(show, show_start, show_first_order));
    slots
}

// ---------------------------------------------------------------------------
// Ordering
// ---------------------------------------------------------------------------

/// Total order used everywhere slots are listed.
///
/// Slots sort by `order_in_event` (unnumbered slots last), then by start
/// time (untimed first), then by note.
pub fn compare_slots(a: &Slot, b: &Slot) -> Ordering {
    let order_a = a.order_in_event.unwrap_or(i32::MAX);
    let order_b = b.order_in_event.unwrap_or(i32::MAX);
    order_a
        .cmp(&order_b)
        .then_with(|| a.start_time.cmp(&b.start_time))
        .then_with(|| {
            a.note
                .as_deref()
                .unwrap_or("")
                .cmp(b.note.as_deref().unwrap_or(""))
        })
}

/// Sort slots in place with [`compare_slots`]. The sort is stable.
pub fn sort_slots(slots: &mut [Slot]) {
    slots.sort_by(compare_slots);
}

/// Rewrite `order_in_event` as `1..=n` following the current list order.
pub fn renumber(slots: &mut [Slot]) {
    for (index, slot) in slots.iter_mut().enumerate() {
        slot.order_in_event = Some(index as i32 + 1);
    }
}

/// Apply a requested running order given as slot ids.
///
/// `order` must name every slot exactly once. The result is renumbered
/// densely from 1.
pub fn reorder(slots: Vec<Slot>, order: &[DbId]) -> Result<Vec<Slot>, CoreError> {
    if order.len() != slots.len() {
        return Err(CoreError::Validation(format!(
            "Reorder lists {} slots but the event has {}",
            order.len(),
            slots.len()
        )));
    }

    let mut by_id: HashMap<DbId, Slot> = slots.into_iter().map(|s| (s.id, s)).collect();
    let mut reordered = Vec::with_capacity(order.len());
    for id in order {
        let slot = by_id.remove(id).ok_or_else(|| {
            CoreError::Validation(format!("Slot {id} is unknown or listed twice"))
        })?;
        reordered.push(slot);
    }

    renumber(&mut reordered);
    Ok(reordered)
}

/// Re-sort the band slots of one rehearsal phase to follow `bands` in
/// `order`, leaving every other slot where it is.
///
/// `slots` must be in running order. Band slots of the phase swap places
/// among themselves; a band missing from `bands` keeps its relative position
/// after the known ones. The result is renumbered densely from 1.
pub fn apply_rehearsal_order(
    slots: Vec<Slot>,
    phase: SlotPhase,
    bands: &[DbId],
    order: RehearsalOrder,
) -> Result<Vec<Slot>, CoreError> {
    if !phase.is_rehearsal() {
        return Err(CoreError::Validation(format!(
            "Rehearsal order applies to rehearsal phases, not '{}'",
            phase.as_str()
        )));
    }

    let position: HashMap<DbId, usize> = order
        .apply(bands)
        .into_iter()
        .enumerate()
        .map(|(index, id)| (id, index))
        .collect();
    let is_target =
        |s: &Slot| s.slot_phase == phase && s.slot_type == SlotType::Band && s.band_id.is_some();

    let mut targets: Vec<Slot> = slots.iter().filter(|s| is_target(*s)).cloned().collect();
    targets.sort_by_key(|s| {
        let rank = s
            .band_id
            .and_then(|id| position.get(&id).copied())
            .unwrap_or(usize::MAX);
        (rank, s.order_in_event.unwrap_or(0))
    });

    let mut replacements = targets.into_iter();
    let mut reordered: Vec<Slot> = slots
        .into_iter()
        .map(|slot| {
            if is_target(&slot) {
                replacements.next().unwrap_or(slot)
            } else {
                slot
            }
        })
        .collect();

    renumber(&mut reordered);
    Ok(reordered)
}

/// Order index for a slot appended after all existing ones.
pub fn next_order_in_event(slots: &[Slot]) -> i32 {
    slots
        .iter()
        .map(|s| s.order_in_event.unwrap_or(0))
        .max()
        .unwrap_or(0)
        + 1
}

/// A blank band slot appended at the end of the running order.
pub fn new_manual_slot(id: DbId, existing: &[Slot], default_changeover_min: i32) -> Slot {
    Slot {
        id,
        band_id: None,
        slot_type: SlotType::Band,
        slot_phase: SlotPhase::Show,
        order_in_event: Some(next_order_in_event(existing)),
        start_time: None,
        end_time: None,
        changeover_min: Some(default_changeover_min),
        note: None,
    }
}

// ---------------------------------------------------------------------------
// Save-time cleanup
// ---------------------------------------------------------------------------

/// Normalise an edited timetable before it is written back.
///
/// - `other` slots whose note mentions a changeover become `break`.
/// - `break` slots always carry [`CHANGEOVER_NOTE`].
/// - Only `band` slots keep a band reference.
/// - Blank notes become `None`.
/// - Timed rehearsal band slots shorter than [`MIN_REHEARSAL_MIN`] are
///   extended to it.
/// - Unnumbered slots take their list position, then the whole list is
///   sorted and renumbered densely.
pub fn normalize_for_save(slots: Vec<Slot>) -> Vec<Slot> {
    let mut normalized: Vec<Slot> = slots
        .into_iter()
        .enumerate()
        .map(|(index, mut slot)| {
            let note = slot.note.as_deref().map(str::trim).unwrap_or("");
            if slot.slot_type == SlotType::Other && note.contains(CHANGEOVER_NOTE) {
                slot.slot_type = SlotType::Break;
            }
            if slot.slot_type == SlotType::Break {
                slot.note = Some(CHANGEOVER_NOTE.to_string());
            } else if note.is_empty() {
                slot.note = None;
            }
            if slot.slot_type != SlotType::Band {
                slot.band_id = None;
            }
            if slot.slot_type == SlotType::Band && slot.slot_phase.is_rehearsal() {
                if let (Some(start), Some(end)) = (slot.start_time, slot.end_time) {
                    if end.minutes().saturating_sub(start.minutes()) < MIN_REHEARSAL_MIN {
                        slot.end_time = Some(start.plus(MIN_REHEARSAL_MIN));
                    }
                }
            }
            if slot.order_in_event.is_none() {
                slot.order_in_event = Some(index as i32 + 1);
            }
            slot
        })
        .collect();

    sort_slots(&mut normalized);
    renumber(&mut normalized);
    normalized
}

/// Check that every band slot points at one of the event's bands.
///
/// A band slot without a band is allowed: it is a placeholder still being
/// filled in.
pub fn validate_band_refs(slots: &[Slot], event_bands: &HashSet<DbId>) -> Result<(), CoreError> {
    for slot in slots {
        if let Some(band_id) = slot.band_id {
            if slot.slot_type == SlotType::Band && !event_bands.contains(&band_id) {
                return Err(CoreError::Validation(format!(
                    "Slot {} references band {band_id} which is not part of this event",
                    slot.id
                )));
            }
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
