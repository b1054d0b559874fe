//! 支付（Stripe Checkout 由服务端对接，这里只发起调用）

use crate::api::{ApiBody, ApiClient, ClientResult, RequestOptions};
use bookstore_shared::{
    CheckoutRequest, CheckoutSession, ConfirmPaymentRequest, Paginated, PaymentConfirmation,
    SessionStatus, StripePayment,
};

#[derive(Clone, Debug)]
pub struct PaymentService {
    client: ApiClient,
}

impl PaymentService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// 创建结算会话，返回跳转地址
    pub async fn create_checkout(&self, req: &CheckoutRequest) -> ClientResult<CheckoutSession> {
        self.client
            .post("/payments/create-checkout/", ApiBody::json(req)?, &RequestOptions::none())
            .await
    }

    pub async fn confirm(&self, session_id: &str) -> ClientResult<PaymentConfirmation> {
        let body = ApiBody::json(&ConfirmPaymentRequest {
            session_id: session_id.to_string(),
        })?;
        self.client
            .post("/payments/confirm/", body, &RequestOptions::none())
            .await
    }

    pub async fn verify(&self, session_id: &str) -> ClientResult<PaymentConfirmation> {
        let opts = RequestOptions::none().param("session_id", session_id);
        self.client.get("/payments/verify/", &opts).await
    }

    pub async fn session_status(&self, session_id: &str) -> ClientResult<SessionStatus> {
        self.client
            .get(
                &format!("/payments/session-status/{}/", session_id),
                &RequestOptions::none(),
            )
            .await
    }

    /// 后台支付记录
    pub async fn stripe_payments(&self, page: Option<u32>) -> ClientResult<Paginated<StripePayment>> {
        let mut opts = RequestOptions::none();
        if let Some(page) = page {
            opts = opts.param("page", page);
        }
        self.client.get("/payments/stripe/", &opts).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::tests::{MockTransport, client_with};
    use crate::cart::{Cart, CartItem, ShippingCountry};
    use crate::web::{HttpMethod, RequestBody};
    use serde_json::json;

    #[tokio::test]
    async fn test_checkout_from_cart() {
        let transport = MockTransport::new();
        transport.mock(
            HttpMethod::Post,
            "http://api.test/payments/create-checkout/",
            200,
            json!({"session_id": "cs_test_1", "url": "https://checkout.stripe.com/c/cs_test_1"}),
        );
        let (client, _) = client_with(transport.clone());

        let mut cart = Cart::new();
        cart.add(CartItem {
            book_id: 4,
            title: "Germinal".into(),
            author: "Émile Zola".into(),
            price_cents: 890,
            quantity: 2,
        });
        cart.set_shipping_country(Some(ShippingCountry {
            id: 1,
            name: "France".into(),
            shipping_cost_cents: 590,
        }));
        let req = cart.to_checkout_request(None).unwrap();

        let session = PaymentService::new(client).create_checkout(&req).await.unwrap();
        assert_eq!(session.session_id, "cs_test_1");
        let RequestBody::Json(body) = transport.last_request().body else {
            panic!("expected JSON body");
        };
        let sent: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(sent, json!({"items": [{"book_id": 4, "quantity": 2}], "country_id": 1}));
    }

    #[tokio::test]
    async fn test_verify_passes_session_id_as_query() {
        let transport = MockTransport::new();
        transport.mock(
            HttpMethod::Get,
            "http://api.test/payments/verify/?session_id=cs_test_1",
            200,
            json!({"success": true, "order_id": 42}),
        );
        let (client, _) = client_with(transport);
        let confirmation = PaymentService::new(client).verify("cs_test_1").await.unwrap();
        assert!(confirmation.success);
        assert_eq!(confirmation.order_id, Some(42));
    }
}
