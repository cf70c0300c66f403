//! Individual field rules and the rule groups selecting them.
//!
//! Each rule returns `None` when the value passes, or the message for the
//! first failure. Callers key the message by field name.

use std::sync::LazyLock;

use regex::Regex;

use crate::types::{Date, DbId};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Minimum name length, in characters.
pub const MIN_NAME_LENGTH: usize = 3;

/// Maximum name length, in characters.
pub const MAX_NAME_LENGTH: usize = 50;

/// Maximum length of free-text fields (sport description, lift comment).
pub const MAX_TEXT_LENGTH: usize = 500;

/// Letters (accented included), ASCII digits, spaces and apostrophes.
const NAME_PATTERN: &str = r"^[\p{L}0-9 ']+$";

static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(NAME_PATTERN).expect("valid regex"));

// ---------------------------------------------------------------------------
// Rule groups
// ---------------------------------------------------------------------------

/// Which required-field subset applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationGroup {
    /// Field shape only; no identifier, collection or date presence rules.
    Default,
    /// New records: identifier forbidden, sports and date required.
    Create,
    /// Existing records: identifier required, sports and date required.
    Update,
}

impl ValidationGroup {
    fn requires_contents(self) -> bool {
        matches!(self, Self::Create | Self::Update)
    }
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

/// Identifier presence rule for the given group.
pub fn id_violation(id: Option<DbId>, group: ValidationGroup) -> Option<String> {
    match (group, id) {
        (ValidationGroup::Create, Some(_)) => Some("must be null".to_string()),
        (ValidationGroup::Update, None) => Some("must not be null".to_string()),
        (ValidationGroup::Update, Some(id)) if id <= 0 => Some("must be positive".to_string()),
        _ => None,
    }
}

/// Name rule: non-blank, then length, then character class.
///
/// Only the first failure is reported so an invalid name yields exactly one
/// error.
pub fn name_violation(name: &str) -> Option<String> {
    if name.trim().is_empty() {
        return Some("must not be blank".to_string());
    }
    let len = name.chars().count();
    if !(MIN_NAME_LENGTH..=MAX_NAME_LENGTH).contains(&len) {
        return Some(format!(
            "size must be between {MIN_NAME_LENGTH} and {MAX_NAME_LENGTH}"
        ));
    }
    if !NAME_RE.is_match(name) {
        return Some("must contain only letters, digits, spaces and apostrophes".to_string());
    }
    None
}

/// Free-text length rule.
pub fn text_violation(text: &str, max_length: usize) -> Option<String> {
    if text.chars().count() > max_length {
        Some(format!("size must be at most {max_length}"))
    } else {
        None
    }
}

/// Sport association rule: non-empty on create and update.
pub fn sports_violation(count: usize, group: ValidationGroup) -> Option<String> {
    if group.requires_contents() && count == 0 {
        Some("must not be empty".to_string())
    } else {
        None
    }
}

/// Commissioning date rule: required on create and update, never earlier
/// than `earliest`.
pub fn commissioning_date_violation(
    date: Option<Date>,
    earliest: Date,
    group: ValidationGroup,
) -> Option<String> {
    match date {
        None if group.requires_contents() => Some("must not be null".to_string()),
        None => None,
        Some(date) if date < earliest => Some(format!("must not be before {earliest}")),
        Some(_) => None,
    }
}
