//! In-app notification models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::live::{timestamp, ChangeEvent, LiveEntity, LocalView};

/// What a notification is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationType {
    /// Admins: someone asked to join
    JoinRequest,
    /// A member posted a job request
    JobRequest,
    /// A member posted a job opening
    JobOpening,
    /// Your membership was approved
    AccountApproved,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub message: String,
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    #[serde(default)]
    pub related_id: Option<String>,
    #[serde(default)]
    pub read: bool,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub created_at: DateTime<Utc>,
}

impl LiveEntity for Notification {
    fn id(&self) -> &str {
        &self.id
    }

    fn order_key(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Number of unread notifications in a view (the navbar badge).
pub fn unread_count(view: &LocalView<Notification>) -> usize {
    view.iter().filter(|n| !n.read).count()
}

/// Notifications addressed to one member.
pub fn for_user<'a>(
    view: &'a LocalView<Notification>,
    user_id: &'a str,
) -> impl Iterator<Item = &'a Notification> + 'a {
    view.iter().filter(move |n| n.user_id == user_id)
}

/// Local `Modified` events that mark every unread notification as read.
///
/// Applying these gives immediate feedback before the upstream confirms the
/// write with its own modifications.
pub fn mark_all_read(view: &LocalView<Notification>) -> Vec<ChangeEvent<Notification>> {
    view.iter()
        .filter(|n| !n.read)
        .map(|n| {
            ChangeEvent::Modified(Notification {
                read: true,
                ..n.clone()
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::live::{CollectionKind, LiveCollectionSynchronizer, RawChange};
    use serde_json::json;

    fn raw(id: &str, user: &str, kind: &str, read: bool, minute: u32) -> RawChange {
        RawChange::added(
            id,
            json!({
                "userId": user,
                "message": format!("{} notification", kind),
                "type": kind,
                "read": read,
                "createdAt": format!("2025-01-01T10:{:02}:00Z", minute)
            }),
        )
    }

    #[test]
    fn test_unread_badge_and_mark_all_read() {
        let mut sync: LiveCollectionSynchronizer<Notification> =
            LiveCollectionSynchronizer::new(CollectionKind::Notifications.default_config()).unwrap();
        let report = sync.apply_raw_batch(vec![
            raw("n1", "u1", "JOB_OPENING", false, 1),
            raw("n2", "u1", "ACCOUNT_APPROVED", true, 2),
            raw("n3", "u2", "JOB_REQUEST", false, 3),
        ]);
        assert!(report.rejected.is_empty());
        assert_eq!(unread_count(sync.view()), 2);
        assert_eq!(for_user(sync.view(), "u1").count(), 2);

        let events = mark_all_read(sync.view());
        assert_eq!(events.len(), 2);
        sync.apply_batch(events);
        assert_eq!(unread_count(sync.view()), 0);
        assert_eq!(sync.view().ids(), vec!["n3", "n2", "n1"]);
    }

    #[test]
    fn test_unknown_type_decodes_as_other() {
        let notification: Notification = serde_json::from_value(json!({
            "id": "n1",
            "type": "REFERRAL_REQUEST",
            "createdAt": "2025-01-01T10:00:00Z"
        }))
        .unwrap();
        assert_eq!(notification.notification_type, NotificationType::Other);
        assert!(!notification.read);
    }
}
