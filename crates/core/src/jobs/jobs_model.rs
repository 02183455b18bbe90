//! Job listing domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::live::{timestamp, LiveEntity};

/// Lifecycle status shared by job requests and job openings.
///
/// Requests are posted as `ACTIVE`, openings as `OPEN`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ListingStatus {
    #[default]
    Active,
    Open,
    Closed,
    #[serde(other)]
    Unknown,
}

impl ListingStatus {
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Active | Self::Open)
    }
}

/// A member asking for a referral
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JobRequest {
    pub id: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub user_full_name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, alias = "techStack", deserialize_with = "deserialize_skills")]
    pub skills: Vec<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub experience_level: Option<String>,
    /// Target company, when the member names one
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub status: ListingStatus,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub created_at: DateTime<Utc>,
}

/// A member offering a referral into their company
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JobOpening {
    pub id: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub user_full_name: String,
    #[serde(default)]
    pub user_linked_in: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub company: String,
    #[serde(default, alias = "techStack", deserialize_with = "deserialize_skills")]
    pub skills: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub job_type: Option<String>,
    #[serde(default)]
    pub experience_level: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default = "open_status")]
    pub status: ListingStatus,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub created_at: DateTime<Utc>,
}

fn open_status() -> ListingStatus {
    ListingStatus::Open
}

impl LiveEntity for JobRequest {
    fn id(&self) -> &str {
        &self.id
    }

    fn order_key(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl LiveEntity for JobOpening {
    fn id(&self) -> &str {
        &self.id
    }

    fn order_key(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Skills arrive either as a list or, in older documents, as a
/// comma-separated `techStack` string.
fn deserialize_skills<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Skills {
        List(Vec<String>),
        Text(String),
        Missing(()),
    }

    let skills = match Skills::deserialize(deserializer)? {
        Skills::List(list) => list,
        Skills::Text(text) => text.split(',').map(str::to_string).collect(),
        Skills::Missing(()) => Vec::new(),
    };

    Ok(skills
        .into_iter()
        .map(|skill| skill.trim().to_string())
        .filter(|skill| !skill.is_empty())
        .collect())
}
