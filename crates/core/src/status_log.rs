//! Daily status log rules: status values, note normalization and the
//! calendar-day normalization that keys entries per client.
//!
//! A status entry is identified by `(client_id, entry_date)` where
//! `entry_date` is a UTC calendar day. Writers in different time zones that
//! mean "the same day" in UTC therefore collide onto the same key.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Timestamp;

/// Status value of an entry or note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryStatus {
    OnTrack,
    Blocked,
    Delayed,
}

pub const STATUS_ON_TRACK: &str = "on_track";
pub const STATUS_BLOCKED: &str = "blocked";
pub const STATUS_DELAYED: &str = "delayed";

/// Canonical values, as stored in `status_entries.status`.
pub const VALID_STATUSES: &[&str] = &[STATUS_ON_TRACK, STATUS_BLOCKED, STATUS_DELAYED];

/// Maximum length of a single note's text.
pub const MAX_NOTE_LENGTH: usize = 2000;

/// Maximum number of notes attached to one entry.
pub const MAX_NOTES_PER_ENTRY: usize = 50;

impl EntryStatus {
    /// Parse a status, accepting the legacy color and hyphenated spellings.
    ///
    /// Matching is case-insensitive: `green`, `on-track` and `on_track` all
    /// map to [`EntryStatus::OnTrack`]; `red` to blocked; `yellow` to delayed.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "on_track" | "on-track" | "ontrack" | "green" => Ok(Self::OnTrack),
            "blocked" | "red" => Ok(Self::Blocked),
            "delayed" | "yellow" => Ok(Self::Delayed),
            _ => Err(CoreError::Validation(format!(
                "Invalid status '{raw}'. Must be one of: {}",
                VALID_STATUSES.join(", ")
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::OnTrack => STATUS_ON_TRACK,
            Self::Blocked => STATUS_BLOCKED,
            Self::Delayed => STATUS_DELAYED,
        }
    }

    pub fn is_blocked(self) -> bool {
        self == Self::Blocked
    }
}

impl std::fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A discrete note attached to a status entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusNote {
    pub status: EntryStatus,
    pub text: String,
}

/// Unvalidated note as received from a request body.
#[derive(Debug, Clone, Deserialize)]
pub struct NoteInput {
    pub status: String,
    pub text: String,
}

/// Validate and canonicalize request notes.
///
/// Each note's status goes through [`EntryStatus::parse`]; text is trimmed and
/// must be non-empty and at most [`MAX_NOTE_LENGTH`] characters.
pub fn normalize_notes(notes: &[NoteInput]) -> Result<Vec<StatusNote>, CoreError> {
    if notes.len() > MAX_NOTES_PER_ENTRY {
        return Err(CoreError::Validation(format!(
            "At most {MAX_NOTES_PER_ENTRY} notes are allowed per entry"
        )));
    }

    notes
        .iter()
        .enumerate()
        .map(|(idx, note)| {
            let text = note.text.trim();
            if text.is_empty() {
                return Err(CoreError::Validation(format!("Note {idx} has empty text")));
            }
            if text.chars().count() > MAX_NOTE_LENGTH {
                return Err(CoreError::Validation(format!(
                    "Note {idx} exceeds {MAX_NOTE_LENGTH} characters"
                )));
            }
            Ok(StatusNote {
                status: EntryStatus::parse(&note.status)?,
                text: text.to_string(),
            })
        })
        .collect()
}

/// Normalize a day-granularity date string to its UTC calendar day.
///
/// Accepts either a plain `YYYY-MM-DD` date (taken as that UTC day) or an
/// RFC 3339 timestamp with an offset, which is converted to UTC before the
/// time of day is dropped.
pub fn normalize_entry_date(raw: &str) -> Result<NaiveDate, CoreError> {
    let raw = raw.trim();

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }

    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc).date_naive())
        .map_err(|_| {
            CoreError::Validation(format!(
                "Invalid date '{raw}'. Expected YYYY-MM-DD or an RFC 3339 timestamp"
            ))
        })
}

/// The UTC-midnight instant that anchors a calendar day.
pub fn utc_midnight(day: NaiveDate) -> Timestamp {
    day.and_time(NaiveTime::MIN).and_utc()
}

/// Normalize optional `start`/`end` range bounds.
///
/// Both bounds are inclusive. Returns a validation error when the normalized
/// start falls after the normalized end.
pub fn normalize_date_range(
    start: Option<&str>,
    end: Option<&str>,
) -> Result<(Option<NaiveDate>, Option<NaiveDate>), CoreError> {
    let start = start.map(normalize_entry_date).transpose()?;
    let end = end.map(normalize_entry_date).transpose()?;

    if let (Some(s), Some(e)) = (start, end) {
        if s > e {
            return Err(CoreError::Validation(format!(
                "start_date {s} is after end_date {e}"
            )));
        }
    }

    Ok((start, end))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_canonical_and_legacy_spellings() {
        assert_eq!(EntryStatus::parse("on_track").unwrap(), EntryStatus::OnTrack);
        assert_eq!(EntryStatus::parse("on-track").unwrap(), EntryStatus::OnTrack);
        assert_eq!(EntryStatus::parse("GREEN").unwrap(), EntryStatus::OnTrack);
        assert_eq!(EntryStatus::parse("red").unwrap(), EntryStatus::Blocked);
        assert_eq!(EntryStatus::parse("Blocked").unwrap(), EntryStatus::Blocked);
        assert_eq!(EntryStatus::parse("YELLOW").unwrap(), EntryStatus::Delayed);
        assert_eq!(EntryStatus::parse(" delayed ").unwrap(), EntryStatus::Delayed);
    }

    #[test]
    fn rejects_unknown_status() {
        let err = EntryStatus::parse("purple").unwrap_err();
        assert_matches!(err, CoreError::Validation(msg) if msg.contains("purple"));
    }

    #[test]
    fn serializes_as_snake_case() {
        let json = serde_json::to_string(&EntryStatus::OnTrack).unwrap();
        assert_eq!(json, "\"on_track\"");
    }

    #[test]
    fn plain_date_is_taken_as_is() {
        assert_eq!(normalize_entry_date("2024-03-05").unwrap(), day(2024, 3, 5));
    }

    #[test]
    fn offset_timestamps_collapse_to_same_utc_day() {
        let eastern = normalize_entry_date("2024-03-05T23:00:00-05:00").unwrap();
        let utc = normalize_entry_date("2024-03-06T02:00:00Z").unwrap();
        assert_eq!(eastern, day(2024, 3, 6));
        assert_eq!(eastern, utc);
    }

    #[test]
    fn positive_offset_can_move_to_previous_day() {
        let date = normalize_entry_date("2024-03-06T01:00:00+02:00").unwrap();
        assert_eq!(date, day(2024, 3, 5));
    }

    #[test]
    fn malformed_dates_rejected() {
        for raw in ["", "yesterday", "2024-13-01", "2024-02-30", "03/05/2024"] {
            assert_matches!(normalize_entry_date(raw), Err(CoreError::Validation(_)), "{raw}");
        }
    }

    #[test]
    fn utc_midnight_has_zero_time() {
        let ts = utc_midnight(day(2024, 3, 6));
        assert_eq!(ts.to_rfc3339(), "2024-03-06T00:00:00+00:00");
    }

    #[test]
    fn range_rejects_inverted_bounds() {
        let result = normalize_date_range(Some("2024-03-10"), Some("2024-03-01"));
        assert_matches!(result, Err(CoreError::Validation(_)));
    }

    #[test]
    fn range_allows_open_bounds() {
        let (start, end) = normalize_date_range(Some("2024-03-01"), None).unwrap();
        assert_eq!(start, Some(day(2024, 3, 1)));
        assert_eq!(end, None);
    }

    #[test]
    fn notes_are_trimmed_and_parsed() {
        let notes = normalize_notes(&[NoteInput {
            status: "red".into(),
            text: "  waiting on assets  ".into(),
        }])
        .unwrap();
        assert_eq!(
            notes,
            vec![StatusNote {
                status: EntryStatus::Blocked,
                text: "waiting on assets".into(),
            }]
        );
    }

    #[test]
    fn empty_note_text_rejected() {
        let result = normalize_notes(&[NoteInput {
            status: "green".into(),
            text: "   ".into(),
        }]);
        assert_matches!(result, Err(CoreError::Validation(msg)) if msg.contains("empty"));
    }

    #[test]
    fn note_with_bad_status_rejected() {
        let result = normalize_notes(&[NoteInput {
            status: "maybe".into(),
            text: "hmm".into(),
        }]);
        assert_matches!(result, Err(CoreError::Validation(_)));
    }
}
