//! 订单

use crate::api::{ApiBody, ApiClient, ClientResult, RequestOptions};
use bookstore_shared::{
    CreateOrderRequest, Order, OrderFilters, OrderPatch, OrderStatistics, OrderStatus, Paginated,
    UpdateStatusRequest,
};

#[derive(Clone, Debug)]
pub struct OrderService {
    client: ApiClient,
}

impl OrderService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, filters: &OrderFilters) -> ClientResult<Paginated<Order>> {
        self.client
            .get("/orders/", &RequestOptions::with_query(filters))
            .await
    }

    pub async fn get(&self, id: i64) -> ClientResult<Order> {
        self.client
            .get(&format!("/orders/{}/", id), &RequestOptions::none())
            .await
    }

    pub async fn create(&self, req: &CreateOrderRequest) -> ClientResult<Order> {
        self.client
            .post("/orders/", ApiBody::json(req)?, &RequestOptions::none())
            .await
    }

    pub async fn update(&self, id: i64, req: &CreateOrderRequest) -> ClientResult<Order> {
        self.client
            .put(&format!("/orders/{}/", id), ApiBody::json(req)?, &RequestOptions::none())
            .await
    }

    pub async fn patch(&self, id: i64, patch: &OrderPatch) -> ClientResult<Order> {
        self.client
            .patch(&format!("/orders/{}/", id), ApiBody::json(patch)?, &RequestOptions::none())
            .await
    }

    pub async fn delete(&self, id: i64) -> ClientResult<()> {
        self.client
            .delete(&format!("/orders/{}/", id), &RequestOptions::none())
            .await
    }

    pub async fn update_status(&self, id: i64, status: OrderStatus) -> ClientResult<Order> {
        self.client
            .post(
                &format!("/orders/{}/update_status/", id),
                ApiBody::json(&UpdateStatusRequest { status })?,
                &RequestOptions::none(),
            )
            .await
    }

    pub async fn statistics(&self) -> ClientResult<OrderStatistics> {
        self.client
            .get("/orders/statistics/", &RequestOptions::none())
            .await
    }

    /// 发票 PDF 原始字节
    pub async fn invoice(&self, id: i64) -> ClientResult<Vec<u8>> {
        self.client
            .get_blob(&format!("/orders/{}/invoice/", id), &RequestOptions::none())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::tests::{MockTransport, client_with};
    use crate::web::{HttpMethod, RequestBody};
    use serde_json::json;

    #[tokio::test]
    async fn test_update_status_sends_snake_case() {
        let transport = MockTransport::new();
        transport.mock(
            HttpMethod::Post,
            "http://api.test/orders/12/update_status/",
            200,
            json!({
                "id": 12,
                "customer_email": "c@d.fr",
                "status": "shipped",
                "subtotal": "20.00",
                "tax": "4.00",
                "shipping_cost": "5.90",
                "total": "29.90"
            }),
        );
        let (client, _) = client_with(transport.clone());
        let order = OrderService::new(client)
            .update_status(12, OrderStatus::Shipped)
            .await
            .unwrap();
        assert_eq!(order.status, OrderStatus::Shipped);
        assert_eq!(order.total, 2990);
        assert_eq!(
            transport.last_request().body,
            RequestBody::Json(r#"{"status":"shipped"}"#.to_string())
        );
    }

    #[tokio::test]
    async fn test_list_with_status_filter() {
        let transport = MockTransport::new();
        transport.mock(
            HttpMethod::Get,
            "http://api.test/orders/?status=pending&page=2",
            200,
            json!({"count": 0, "next": null, "previous": null, "results": []}),
        );
        let (client, _) = client_with(transport);
        let filters = OrderFilters {
            status: Some(OrderStatus::Pending),
            page: Some(2),
            ..Default::default()
        };
        let page = OrderService::new(client).list(&filters).await.unwrap();
        assert!(page.is_empty());
    }

    #[tokio::test]
    async fn test_invoice_returns_raw_bytes() {
        let transport = MockTransport::new();
        transport.mock_raw(
            HttpMethod::Get,
            "http://api.test/orders/3/invoice/",
            200,
            b"%PDF-1.4".to_vec(),
        );
        let (client, _) = client_with(transport);
        let bytes = OrderService::new(client).invoice(3).await.unwrap();
        assert_eq!(bytes, b"%PDF-1.4".to_vec());
    }
}
