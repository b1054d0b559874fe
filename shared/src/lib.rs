//! 书店 REST API 的共享领域模型
//!
//! 所有类型均与远端 API 的 JSON 结构一一对应，前端只负责序列化/反序列化，
//! 不在此处实现任何业务规则（总价、库存、支付校验均由服务端完成）。

pub mod auth;
pub mod book;
pub mod contact;
pub mod money;
pub mod order;
pub mod page;
pub mod payment;
pub mod user;

pub use auth::*;
pub use book::*;
pub use contact::*;
pub use order::*;
pub use page::Paginated;
pub use payment::*;
pub use user::*;

// =========================================================
// 常量定义 (Constants)
// =========================================================

pub const HEADER_AUTHORIZATION: &str = "Authorization";
pub const BEARER_PREFIX: &str = "Bearer ";

/// 统一税率（百分比），与服务端结算保持一致
pub const TAX_RATE_PERCENT: i64 = 20;

/// 列表查询参数
///
/// 各筛选结构实现此 trait，把非空字段展开为 `(key, value)` 对，
/// 由 API 客户端统一编码为查询字符串。
pub trait QueryParams {
    fn query_pairs(&self) -> Vec<(&'static str, String)>;
}

/// 把可选字段追加到查询参数列表，`None` 直接跳过
pub(crate) fn push_opt<T: ToString>(
    pairs: &mut Vec<(&'static str, String)>,
    key: &'static str,
    value: &Option<T>,
) {
    if let Some(v) = value {
        pairs.push((key, v.to_string()));
    }
}
