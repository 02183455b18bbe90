/// Upstream collection holding the shared chat room
pub const CHAT_COLLECTION: &str = "messages";

/// Upstream collection holding job requests (members looking for referrals)
pub const JOB_REQUESTS_COLLECTION: &str = "jobRequests";

/// Upstream collection holding job openings (members offering referrals)
pub const JOB_OPENINGS_COLLECTION: &str = "jobOpenings";

/// Upstream collection holding in-app notifications
pub const NOTIFICATIONS_COLLECTION: &str = "notifications";

/// Chat keeps only the latest messages on screen
pub const DEFAULT_CHAT_WINDOW: usize = 100;

/// Job request and job opening lists
pub const DEFAULT_LISTING_WINDOW: usize = 500;

/// Notification drawer
pub const DEFAULT_NOTIFICATION_WINDOW: usize = 50;

/// Field injected into decoded documents with the upstream document id
pub const DOCUMENT_ID_FIELD: &str = "id";
