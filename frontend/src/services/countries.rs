//! 配送国家

use crate::api::{ApiClient, ClientResult, RequestOptions};
use bookstore_shared::{Country, Paginated};

#[derive(Clone, Debug)]
pub struct CountryService {
    client: ApiClient,
}

impl CountryService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// 分页信封与纯数组两种响应都接受
    pub async fn list(&self) -> ClientResult<Vec<Country>> {
        let page: Paginated<Country> = self
            .client
            .get("/orders/countries/", &RequestOptions::none())
            .await?;
        Ok(page.results)
    }

    pub async fn get(&self, id: i64) -> ClientResult<Country> {
        self.client
            .get(&format!("/orders/countries/{}/", id), &RequestOptions::none())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::tests::{MockTransport, client_with};
    use crate::web::HttpMethod;
    use serde_json::json;

    #[tokio::test]
    async fn test_list_unwraps_envelope() {
        let transport = MockTransport::new();
        transport.mock(
            HttpMethod::Get,
            "http://api.test/orders/countries/",
            200,
            json!({
                "count": 2,
                "next": null,
                "previous": null,
                "results": [
                    {"id": 1, "name": "France", "code": "FR", "shipping_cost": "5.90"},
                    {"id": 2, "name": "Belgique", "code": "BE", "shipping_cost": "8.90"}
                ]
            }),
        );
        let (client, _) = client_with(transport);
        let countries = CountryService::new(client).list().await.unwrap();
        assert_eq!(countries.len(), 2);
        assert_eq!(countries[0].shipping_cost, 590);
        assert_eq!(countries[1].code.as_deref(), Some("BE"));
    }
}
