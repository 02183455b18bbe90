//! Browsing filters applied on top of a listing view.

use crate::live::{LiveEntity, LocalView};

use super::{JobOpening, JobRequest};

/// Read-only accessors the filters need from a listing.
pub trait Listing: LiveEntity {
    /// Full name of the member who posted the listing.
    fn owner_name(&self) -> &str;

    /// Text the search box matches against.
    fn searchable_text(&self) -> String;

    fn is_open(&self) -> bool;
}

impl Listing for JobRequest {
    fn owner_name(&self) -> &str {
        &self.user_full_name
    }

    fn searchable_text(&self) -> String {
        let mut parts: Vec<&str> = vec![self.title.as_str(), self.description.as_str()];
        parts.extend(self.skills.iter().map(String::as_str));
        parts.extend(self.location.as_deref());
        parts.extend(self.company.as_deref());
        parts.extend(self.experience_level.as_deref());
        parts.join(" ")
    }

    fn is_open(&self) -> bool {
        self.status.is_open()
    }
}

impl Listing for JobOpening {
    fn owner_name(&self) -> &str {
        &self.user_full_name
    }

    fn searchable_text(&self) -> String {
        let mut parts: Vec<&str> = vec![
            self.title.as_str(),
            self.company.as_str(),
            self.description.as_str(),
        ];
        parts.extend(self.skills.iter().map(String::as_str));
        parts.extend(self.location.as_deref());
        parts.extend(self.job_type.as_deref());
        parts.join(" ")
    }

    fn is_open(&self) -> bool {
        self.status.is_open()
    }
}

/// Filter over a listing view.
///
/// An empty filter matches everything. Query terms are whitespace separated
/// and all of them must appear (case-insensitive) in the listing's text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingFilter {
    owner: Option<String>,
    terms: Vec<String>,
    open_only: bool,
}

impl ListingFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only listings posted by this member ("My Posts").
    pub fn owner(mut self, full_name: impl Into<String>) -> Self {
        self.owner = Some(full_name.into());
        self
    }

    pub fn query(mut self, query: &str) -> Self {
        self.terms = query
            .split_whitespace()
            .map(str::to_lowercase)
            .collect();
        self
    }

    pub fn open_only(mut self, open_only: bool) -> Self {
        self.open_only = open_only;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.owner.is_none() && self.terms.is_empty() && !self.open_only
    }

    pub fn matches<L: Listing>(&self, listing: &L) -> bool {
        if let Some(owner) = &self.owner {
            if listing.owner_name() != owner.as_str() {
                return false;
            }
        }
        if self.open_only && !listing.is_open() {
            return false;
        }
        if self.terms.is_empty() {
            return true;
        }

        let text = listing.searchable_text().to_lowercase();
        self.terms.iter().all(|term| text.contains(term.as_str()))
    }

    /// Matching listings, in view order.
    pub fn apply<L: Listing>(&self, view: &LocalView<L>) -> Vec<L> {
        view.iter()
            .filter(|listing| self.matches(*listing))
            .cloned()
            .collect()
    }

    pub fn count<L: Listing>(&self, view: &LocalView<L>) -> usize {
        view.iter().filter(|listing| self.matches(*listing)).count()
    }
}
