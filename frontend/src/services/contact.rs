//! 联系留言：访客提交，管理员在后台处理

use crate::api::{ApiBody, ApiClient, ClientResult, RequestOptions};
use bookstore_shared::{
    BulkMarkAsReadRequest, ContactMessage, ContactMessagePatch, ContactStatistics,
    MessageResponse, NewContactMessage, Paginated,
};

const MESSAGES: &str = "/contact/messages/";

#[derive(Clone, Debug)]
pub struct ContactService {
    client: ApiClient,
}

impl ContactService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    fn item_path(id: i64, action: &str) -> String {
        if action.is_empty() {
            format!("{}{}/", MESSAGES, id)
        } else {
            format!("{}{}/{}/", MESSAGES, id, action)
        }
    }

    /// 公开接口，无需登录
    pub async fn send(&self, msg: &NewContactMessage) -> ClientResult<ContactMessage> {
        self.client
            .post(MESSAGES, ApiBody::json(msg)?, &RequestOptions::none())
            .await
    }

    pub async fn list(
        &self,
        is_read: Option<bool>,
        page: Option<u32>,
    ) -> ClientResult<Paginated<ContactMessage>> {
        let mut opts = RequestOptions::none();
        if let Some(is_read) = is_read {
            opts = opts.param("is_read", is_read);
        }
        if let Some(page) = page {
            opts = opts.param("page", page);
        }
        self.client.get(MESSAGES, &opts).await
    }

    pub async fn get(&self, id: i64) -> ClientResult<ContactMessage> {
        self.client
            .get(&Self::item_path(id, ""), &RequestOptions::none())
            .await
    }

    pub async fn update(&self, id: i64, msg: &NewContactMessage) -> ClientResult<ContactMessage> {
        self.client
            .put(&Self::item_path(id, ""), ApiBody::json(msg)?, &RequestOptions::none())
            .await
    }

    pub async fn patch(&self, id: i64, patch: &ContactMessagePatch) -> ClientResult<ContactMessage> {
        self.client
            .patch(&Self::item_path(id, ""), ApiBody::json(patch)?, &RequestOptions::none())
            .await
    }

    pub async fn delete(&self, id: i64) -> ClientResult<()> {
        self.client
            .delete(&Self::item_path(id, ""), &RequestOptions::none())
            .await
    }

    async fn action(&self, id: i64, action: &str) -> ClientResult<ContactMessage> {
        self.client
            .post(&Self::item_path(id, action), ApiBody::Empty, &RequestOptions::none())
            .await
    }

    pub async fn mark_as_read(&self, id: i64) -> ClientResult<ContactMessage> {
        self.action(id, "mark_as_read").await
    }

    pub async fn mark_as_unread(&self, id: i64) -> ClientResult<ContactMessage> {
        self.action(id, "mark_as_unread").await
    }

    pub async fn mark_as_replied(&self, id: i64) -> ClientResult<ContactMessage> {
        self.action(id, "mark_as_replied").await
    }

    pub async fn statistics(&self) -> ClientResult<ContactStatistics> {
        self.client
            .get("/contact/messages/statistics/", &RequestOptions::none())
            .await
    }

    pub async fn bulk_mark_as_read(&self, ids: Vec<i64>) -> ClientResult<MessageResponse> {
        self.client
            .post(
                "/contact/messages/bulk_mark_as_read/",
                ApiBody::json(&BulkMarkAsReadRequest { ids })?,
                &RequestOptions::none(),
            )
            .await
    }
}
