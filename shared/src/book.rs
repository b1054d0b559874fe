use crate::{QueryParams, money, push_opt};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =========================================================
// 领域模型 (Domain Models)
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub isbn: Option<String>,
    #[serde(with = "money::cents")]
    pub price: i64,
    #[serde(default)]
    pub stock: i64,
    #[serde(default)]
    pub langue: Option<String>,
    #[serde(default)]
    pub editeur: Option<String>,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

fn default_true() -> bool {
    true
}

impl Book {
    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

/// 新建或整体更新（PUT）图书
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookPayload {
    pub title: String,
    pub author: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
    #[serde(with = "money::cents")]
    pub price: i64,
    pub stock: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub langue: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub editeur: Option<String>,
    pub is_featured: bool,
    pub is_active: bool,
}

/// 局部更新（PATCH）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_featured: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockUpdate {
    pub stock: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookImage {
    pub id: i64,
    #[serde(default)]
    pub book: Option<i64>,
    pub image: String,
    #[serde(default)]
    pub alt_text: Option<String>,
    #[serde(default)]
    pub is_primary: bool,
    #[serde(default)]
    pub order: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookVideo {
    pub id: i64,
    #[serde(default)]
    pub book: Option<i64>,
    pub url: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub order: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBookVideo {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// 媒体元数据修改（图片的 alt/排序，视频的标题/排序）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MediaPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_primary: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,
}

// =========================================================
// 查询条件 (Filters)
// =========================================================

/// 图书列表筛选条件，对应 `GET /books/` 的查询参数
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookFilters {
    pub is_featured: Option<bool>,
    pub langue: Option<String>,
    pub editeur: Option<String>,
    pub search: Option<String>,
    pub ordering: Option<String>,
    /// 以分为单位，发送时转换为十进制字符串
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    pub in_stock: Option<bool>,
    pub page: Option<u32>,
}

impl BookFilters {
    pub fn featured() -> Self {
        Self {
            is_featured: Some(true),
            ..Default::default()
        }
    }
}

impl QueryParams for BookFilters {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        push_opt(&mut pairs, "is_featured", &self.is_featured);
        push_opt(&mut pairs, "langue", &self.langue);
        push_opt(&mut pairs, "editeur", &self.editeur);
        push_opt(&mut pairs, "search", &self.search);
        push_opt(&mut pairs, "ordering", &self.ordering);
        push_opt(&mut pairs, "min_price", &self.min_price.map(money::format_cents));
        push_opt(&mut pairs, "max_price", &self.max_price.map(money::format_cents));
        push_opt(&mut pairs, "in_stock", &self.in_stock);
        push_opt(&mut pairs, "page", &self.page);
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_book_decodes_decimal_price() {
        let book: Book = serde_json::from_str(
            r#"{"id":1,"title":"Le Petit Prince","author":"Saint-Exupéry","price":"9.90","stock":0}"#,
        )
        .unwrap();
        assert_eq!(book.price, 990);
        assert!(!book.in_stock());
        assert!(book.is_active);
    }

    #[test]
    fn test_filters_skip_empty_fields() {
        let filters = BookFilters {
            search: Some("camus".into()),
            min_price: Some(500),
            in_stock: Some(true),
            page: Some(2),
            ..Default::default()
        };
        assert_eq!(
            filters.query_pairs(),
            vec![
                ("search", "camus".to_string()),
                ("min_price", "5.00".to_string()),
                ("in_stock", "true".to_string()),
                ("page", "2".to_string()),
            ]
        );
        assert!(BookFilters::default().query_pairs().is_empty());
    }
}
