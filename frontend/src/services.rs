//! 领域服务
//!
//! 每个 REST 资源组一个门面（façade），方法与端点一一对应。
//! 服务不吞掉错误，`ClientError` 原样返回给调用的组件。

mod admins;
mod auth;
mod books;
mod contact;
mod countries;
mod media;
mod orders;
mod payments;

pub use admins::AdminService;
pub use auth::{AuthService, LoginOutcome};
pub use books::BookService;
pub use contact::ContactService;
pub use countries::CountryService;
pub use media::MediaService;
pub use orders::OrderService;
pub use payments::PaymentService;
