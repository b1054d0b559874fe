//! 管理员账户（仅超级管理员可用，权限由服务端校验）

use crate::api::{ApiBody, ApiClient, ClientResult, RequestOptions};
use bookstore_shared::{CreateAdminRequest, Paginated, UpdateAdminRequest, User};

#[derive(Clone, Debug)]
pub struct AdminService {
    client: ApiClient,
}

impl AdminService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, page: Option<u32>) -> ClientResult<Paginated<User>> {
        let mut opts = RequestOptions::none();
        if let Some(page) = page {
            opts = opts.param("page", page);
        }
        self.client.get("/auth/admins/", &opts).await
    }

    pub async fn get(&self, id: i64) -> ClientResult<User> {
        self.client
            .get(&format!("/auth/admins/{}/", id), &RequestOptions::none())
            .await
    }

    /// 创建受邀管理员，对方首次登录时设置密码
    pub async fn create(&self, req: &CreateAdminRequest) -> ClientResult<User> {
        self.client
            .post("/auth/admins/", ApiBody::json(req)?, &RequestOptions::none())
            .await
    }

    pub async fn update(&self, id: i64, req: &UpdateAdminRequest) -> ClientResult<User> {
        self.client
            .patch(
                &format!("/auth/admins/{}/", id),
                ApiBody::json(req)?,
                &RequestOptions::none(),
            )
            .await
    }

    pub async fn delete(&self, id: i64) -> ClientResult<()> {
        self.client
            .delete(&format!("/auth/admins/{}/", id), &RequestOptions::none())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::tests::{MockTransport, client_with, staff_user};
    use crate::web::HttpMethod;
    use serde_json::json;

    #[tokio::test]
    async fn test_list_accepts_plain_array() {
        let transport = MockTransport::new();
        transport.mock(
            HttpMethod::Get,
            "http://api.test/auth/admins/",
            200,
            json!([staff_user()]),
        );
        let (client, _) = client_with(transport);
        let page = AdminService::new(client).list(None).await.unwrap();
        assert_eq!(page.count, 1);
        assert_eq!(page.results[0].email, "admin@librairie.fr");
    }

    #[tokio::test]
    async fn test_delete_returns_unit_on_204() {
        let transport = MockTransport::new();
        transport.mock_raw(HttpMethod::Delete, "http://api.test/auth/admins/4/", 204, Vec::new());
        let (client, _) = client_with(transport.clone());
        AdminService::new(client).delete(4).await.unwrap();
        assert_eq!(transport.request_count(), 1);
    }
}
