//! Series-level event payload and the per-occurrence patch applied on top.

use std::collections::BTreeMap;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// Payload shared by every occurrence of a series absent an override.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventFields {
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    /// Conference/meeting link.
    pub link: Option<String>,
    pub participants: Vec<String>,
    /// Free-form attributes (color, tags, caller extras).
    pub attributes: BTreeMap<String, String>,
}

/// Partial record applied on top of [`EventFields`]; present fields win.
///
/// A patch may also move an occurrence's start time or duration, but never
/// its calendar date — the occurrence keeps its date bucket so calendar-grid
/// placement stays stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub link: Option<String>,
    pub participants: Option<Vec<String>>,
    /// Replaces the whole attribute map when present.
    pub attributes: Option<BTreeMap<String, String>>,
    pub anchor_time: Option<NaiveTime>,
    pub duration_minutes: Option<u32>,
}

impl FieldPatch {
    /// True when the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.location.is_none()
            && self.link.is_none()
            && self.participants.is_none()
            && self.attributes.is_none()
            && self.anchor_time.is_none()
            && self.duration_minutes.is_none()
    }

    /// Merge this patch over `base`, returning the effective fields.
    ///
    /// Time and duration overrides are not part of [`EventFields`]; the
    /// materializer reads them off the patch directly.
    pub fn apply(&self, base: &EventFields) -> EventFields {
        EventFields {
            title: self.title.clone().unwrap_or_else(|| base.title.clone()),
            description: self
                .description
                .clone()
                .or_else(|| base.description.clone()),
            location: self.location.clone().or_else(|| base.location.clone()),
            link: self.link.clone().or_else(|| base.link.clone()),
            participants: self
                .participants
                .clone()
                .unwrap_or_else(|| base.participants.clone()),
            attributes: self
                .attributes
                .clone()
                .unwrap_or_else(|| base.attributes.clone()),
        }
    }
}
