use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 访客留言
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactMessage {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub subject: String,
    pub message: String,
    #[serde(default)]
    pub is_read: bool,
    #[serde(default)]
    pub is_replied: bool,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewContactMessage {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactMessagePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_read: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_replied: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactStatistics {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub unread: u64,
    #[serde(default)]
    pub replied: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkMarkAsReadRequest {
    pub ids: Vec<i64>,
}
