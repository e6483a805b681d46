//! Attendee Roster
//!
//! Display names for attendees, used to label visible grid slots.

use std::collections::HashMap;

/// Attendee id to display name
#[derive(Debug, Clone, Default)]
pub struct Roster {
    names: HashMap<String, String>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or rename an attendee. Returns the previous name.
    pub fn set_name(&mut self, attendee_id: impl Into<String>, name: impl Into<String>) -> Option<String> {
        self.names.insert(attendee_id.into(), name.into())
    }

    /// Remove an attendee
    pub fn remove(&mut self, attendee_id: &str) -> Option<String> {
        self.names.remove(attendee_id)
    }

    pub fn name(&self, attendee_id: &str) -> Option<&str> {
        self.names.get(attendee_id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
