//! Tag matching and concurrency policies for effect registrations.

use std::fmt;

use crate::core::domain_of;

/// Decides which action tags trigger a registration.
///
/// Domain-wide subscriptions must be spelled out with [`Matcher::Domain`];
/// there is no implicit wildcard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Matcher {
    /// Exactly this tag.
    Exact(&'static str),
    /// Any tag whose domain (prefix before the first `.`) equals this one.
    Domain(&'static str),
    /// Any of the listed tags.
    AnyOf(Vec<&'static str>),
}

impl Matcher {
    /// Returns true if the tag triggers this matcher.
    pub fn matches(&self, tag: &'static str) -> bool {
        match self {
            Matcher::Exact(expected) => *expected == tag,
            Matcher::Domain(domain) => domain_of(tag) == *domain,
            Matcher::AnyOf(tags) => tags.contains(&tag),
        }
    }
}

impl From<&'static str> for Matcher {
    fn from(tag: &'static str) -> Self {
        Matcher::Exact(tag)
    }
}

impl fmt::Display for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Matcher::Exact(tag) => write!(f, "{}", tag),
            Matcher::Domain(domain) => write!(f, "{}.*", domain),
            Matcher::AnyOf(tags) => write!(f, "{}", tags.join("|")),
        }
    }
}

/// How concurrent triggering actions relate to running instances.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    /// Every matching action spawns an independent instance.
    ///
    /// Instances may complete out of order. Use for idempotent fetches.
    TakeEvery,
    /// A new matching action cancels the still-running instance first.
    ///
    /// The cancelled instance never dispatches its result; its exit guards
    /// run exactly once before the new instance starts. Use for user
    /// submitted create/update intents where only the newest one wins.
    TakeLatest,
    /// One instance at a time; while it runs only the newest matching
    /// action is kept and runs afterwards, older parked actions are dropped.
    QueueLatest,
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Policy::TakeEvery => write!(f, "take-every"),
            Policy::TakeLatest => write!(f, "take-latest"),
            Policy::QueueLatest => write!(f, "queue-latest"),
        }
    }
}
