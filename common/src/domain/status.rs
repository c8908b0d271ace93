use std::collections::HashSet;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Workflow stage of a publication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EditorialStatus {
    Draft,
    InReview,
    Approved,
    Published,
    Rejected,
}

impl EditorialStatus {
    /// Every status, in the order the transition dialog offers them.
    pub const ALL: [EditorialStatus; 5] = [
        EditorialStatus::Draft,
        EditorialStatus::InReview,
        EditorialStatus::Approved,
        EditorialStatus::Published,
        EditorialStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EditorialStatus::Draft => "DRAFT",
            EditorialStatus::InReview => "IN_REVIEW",
            EditorialStatus::Approved => "APPROVED",
            EditorialStatus::Published => "PUBLISHED",
            EditorialStatus::Rejected => "REJECTED",
        }
    }
}

impl Display for EditorialStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown editorial status '{0}'")]
pub struct UnknownStatus(pub String);

impl FromStr for EditorialStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        EditorialStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownStatus(s.to_owned()))
    }
}

/// One allowed `from -> to` edge of a configured transition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub struct TransitionRule {
    pub from: EditorialStatus,
    pub to: EditorialStatus,
}

/// Which transitions the console lets a user request.
///
/// The remote publication service is the authority on legality; the default
/// policy forwards every request to it. A table narrows what is offered and
/// rejects other edges before any request is sent. Keeping the current status
/// is always allowed, so confirming an untouched dialog is harmless.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TransitionPolicy {
    #[default]
    ServerDecides,
    Table(HashSet<(EditorialStatus, EditorialStatus)>),
}

impl TransitionPolicy {
    /// Builds a table policy, or `ServerDecides` when no rule is given.
    pub fn from_rules(rules: impl IntoIterator<Item = TransitionRule>) -> Self {
        let table = rules
            .into_iter()
            .map(|rule| (rule.from, rule.to))
            .collect::<HashSet<_>>();

        if table.is_empty() {
            TransitionPolicy::ServerDecides
        } else {
            TransitionPolicy::Table(table)
        }
    }

    pub fn allows(&self, from: EditorialStatus, to: EditorialStatus) -> bool {
        match self {
            TransitionPolicy::ServerDecides => true,
            TransitionPolicy::Table(table) => from == to || table.contains(&(from, to)),
        }
    }

    /// Statuses selectable from `from`, in dialog order.
    pub fn targets_from(&self, from: EditorialStatus) -> Vec<EditorialStatus> {
        EditorialStatus::ALL
            .into_iter()
            .filter(|to| self.allows(from, *to))
            .collect()
    }
}
