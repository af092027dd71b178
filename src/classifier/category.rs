// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Closed set of email categories.
//!
//! The classifier scores entailment against one hypothesis per variant and
//! the API only ever returns one of these six labels. Keeping the set as an
//! enum makes the low-confidence fallback an explicit branch instead of a
//! dictionary lookup that can silently miss.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmailCategory {
    Interested,
    MeetingBooked,
    NotInterested,
    Spam,
    OutOfOffice,
    General,
}

impl EmailCategory {
    /// All candidate categories, in the order they are scored.
    pub const ALL: [EmailCategory; 6] = [
        EmailCategory::Interested,
        EmailCategory::MeetingBooked,
        EmailCategory::NotInterested,
        EmailCategory::Spam,
        EmailCategory::OutOfOffice,
        EmailCategory::General,
    ];

    /// User-facing label returned by the API.
    pub fn label(&self) -> &'static str {
        match self {
            EmailCategory::Interested => "Interested",
            EmailCategory::MeetingBooked => "Meeting Booked",
            EmailCategory::NotInterested => "Not Interested",
            EmailCategory::Spam => "Spam",
            EmailCategory::OutOfOffice => "Out of Office",
            EmailCategory::General => "General",
        }
    }

    /// Topic phrase substituted into the hypothesis template.
    pub fn topic(&self) -> &'static str {
        match self {
            EmailCategory::Interested => "interest",
            EmailCategory::MeetingBooked => "a meeting being booked",
            EmailCategory::NotInterested => "a lack of interest",
            EmailCategory::Spam => "spam",
            EmailCategory::OutOfOffice => "an out of office reply",
            EmailCategory::General => "something general",
        }
    }

    /// The hypothesis sentence scored against the email text.
    pub fn hypothesis(&self) -> String {
        crate::config::HYPOTHESIS_TEMPLATE.replace("{}", self.topic())
    }
}

impl std::fmt::Display for EmailCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
