//! 运行时配置
//!
//! 前端没有 Env 可读，配置在编译期通过环境变量注入（`option_env!`），
//! 未设置时回退到下面的默认值。

const DEFAULT_API_URL: &str = "http://localhost:8000/api";
const DEFAULT_STORAGE_PREFIX: &str = "";

const KEY_ACCESS_TOKEN: &str = "access_token";
const KEY_REFRESH_TOKEN: &str = "refresh_token";
const KEY_USER: &str = "user";

/// 应用配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// REST API 根地址（不含结尾斜杠）
    pub api_base_url: String,
    /// LocalStorage 键前缀，便于同域部署多个实例
    pub storage_prefix: String,
}

impl AppConfig {
    pub fn new(api_base_url: impl Into<String>) -> Self {
        let api_base_url = api_base_url.into().trim_end_matches('/').to_string();
        Self {
            api_base_url,
            storage_prefix: DEFAULT_STORAGE_PREFIX.to_string(),
        }
    }

    /// 读取编译期注入的 `BOOKSTORE_API_URL` / `BOOKSTORE_STORAGE_PREFIX`
    pub fn from_env() -> Self {
        let mut config = Self::new(option_env!("BOOKSTORE_API_URL").unwrap_or(DEFAULT_API_URL));
        if let Some(prefix) = option_env!("BOOKSTORE_STORAGE_PREFIX") {
            config.storage_prefix = prefix.to_string();
        }
        config
    }

    pub fn with_storage_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.storage_prefix = prefix.into();
        self
    }

    pub fn storage_keys(&self) -> StorageKeys {
        let key = |name: &str| format!("{}{}", self.storage_prefix, name);
        StorageKeys {
            access_token: key(KEY_ACCESS_TOKEN),
            refresh_token: key(KEY_REFRESH_TOKEN),
            user: key(KEY_USER),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

/// 持久化存储中使用的三个键，登出时一并清除
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    pub access_token: String,
    pub refresh_token: String,
    pub user: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_is_normalized() {
        let config = AppConfig::new("https://api.example.com/api/");
        assert_eq!(config.api_base_url, "https://api.example.com/api");
    }

    #[test]
    fn test_storage_keys_use_prefix() {
        let keys = AppConfig::default().with_storage_prefix("shop_").storage_keys();
        assert_eq!(keys.access_token, "shop_access_token");
        assert_eq!(keys.refresh_token, "shop_refresh_token");
        assert_eq!(keys.user, "shop_user");
        assert_eq!(AppConfig::default().storage_keys().user, "user");
    }
}
