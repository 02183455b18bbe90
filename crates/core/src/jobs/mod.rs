//! Jobs module - job request and job opening models plus browsing filters.

mod jobs_model;
mod listing_filter;

pub use jobs_model::{JobOpening, JobRequest, ListingStatus};
pub use listing_filter::{Listing, ListingFilter};
