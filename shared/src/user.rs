use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 后台用户（管理员）记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub is_staff: bool,
    #[serde(default)]
    pub is_superuser: bool,
    pub date_joined: Option<DateTime<Utc>>,
    pub last_login: Option<DateTime<Utc>>,
}

impl User {
    /// 展示用全名，缺失时回退到邮箱
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name, self.last_name);
        let full = full.trim();
        if full.is_empty() {
            self.email.clone()
        } else {
            full.to_string()
        }
    }

    /// 是否可以进入后台
    pub fn can_access_backoffice(&self) -> bool {
        self.is_staff || self.is_superuser
    }
}

/// 邀请新管理员
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAdminRequest {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub is_superuser: bool,
}

/// 管理员资料修改（PATCH 语义，`None` 字段不发送）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateAdminRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_superuser: Option<bool>,
}

/// 一条登录会话（设备）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSession {
    pub id: String,
    #[serde(default)]
    pub ip_address: Option<String>,
    #[serde(default)]
    pub user_agent: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub last_activity: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_current: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_decodes_with_missing_optional_fields() {
        let user: User = serde_json::from_str(
            r#"{"id":3,"email":"a@b.com","is_staff":true,"date_joined":"2024-05-01T10:00:00Z","last_login":null}"#,
        )
        .unwrap();
        assert_eq!(user.id, 3);
        assert!(user.is_staff);
        assert!(!user.is_superuser);
        assert!(user.last_login.is_none());
        assert_eq!(user.display_name(), "a@b.com");
        assert!(user.can_access_backoffice());
    }

    #[test]
    fn test_update_request_skips_none() {
        let req = UpdateAdminRequest {
            first_name: Some("Jeanne".into()),
            ..Default::default()
        };
        assert_eq!(serde_json::to_string(&req).unwrap(), r#"{"first_name":"Jeanne"}"#);
    }
}
