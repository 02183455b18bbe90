//! Notifications module - in-app notification model and badge helpers.

mod notifications_model;

pub use notifications_model::{
    for_user, mark_all_read, unread_count, Notification, NotificationType,
};
