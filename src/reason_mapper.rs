//! Translation from the reason tags a user can pick to the inventory service's
//! reason codes.
//!
//! The service only knows [`ReasonCode::Expired`] and [`ReasonCode::Other`], so
//! the code alone loses information. Every selected label, plus the custom
//! text, is folded into the note to keep the full intent on record.

use crate::domain::{ReasonCode, ReasonTag};

/// Note used when nothing was selected.
pub const DEFAULT_NOTE: &str = "Consuming item";

#[derive(Debug, Clone, PartialEq)]
pub struct MappedReason {
    pub backend_code: ReasonCode,
    pub note: String,
}

/// The single place where tags narrow into codes.
pub fn backend_code_for(tag: ReasonTag) -> ReasonCode {
    match tag {
        ReasonTag::ShortShelf => ReasonCode::Expired,
        ReasonTag::RecipeConsumption | ReasonTag::Duplicate | ReasonTag::BoughtTooMuch | ReasonTag::Custom => {
            ReasonCode::Other
        }
    }
}

pub fn map_reasons(selected: &[ReasonTag], custom_text: Option<&str>) -> MappedReason {
    map_reasons_or(selected, custom_text, DEFAULT_NOTE)
}

/// Like [`map_reasons`] with a caller-chosen note for the empty selection.
///
/// `expired` wins when any selected tag maps to it, so the code does not depend
/// on selection order. The note lists every label in selection order, then the
/// custom text when it is not blank.
pub fn map_reasons_or(selected: &[ReasonTag], custom_text: Option<&str>, default_note: &str) -> MappedReason {
    if selected.is_empty() {
        return MappedReason {
            backend_code: ReasonCode::Other,
            note: default_note.to_string(),
        };
    }

    let backend_code = if selected.iter().any(|t| backend_code_for(*t) == ReasonCode::Expired) {
        ReasonCode::Expired
    } else {
        ReasonCode::Other
    };

    let mut parts: Vec<&str> = selected.iter().map(|tag| tag.label()).collect();
    if let Some(text) = custom_text.filter(|t| !t.trim().is_empty()) {
        parts.push(text);
    }

    MappedReason {
        backend_code,
        note: parts.join(", "),
    }
}
