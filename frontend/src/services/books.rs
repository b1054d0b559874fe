//! 图书目录

use crate::api::{ApiBody, ApiClient, ClientResult, RequestOptions};
use crate::web::{FilePart, MultipartForm};
use bookstore_shared::{
    Book, BookFilters, BookImage, BookPatch, BookPayload, BookVideo, NewBookVideo, Paginated,
    StockUpdate,
};

#[derive(Clone, Debug)]
pub struct BookService {
    client: ApiClient,
}

impl BookService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    fn item_path(id: i64, action: &str) -> String {
        if action.is_empty() {
            format!("/books/{}/", id)
        } else {
            format!("/books/{}/{}/", id, action)
        }
    }

    pub async fn list(&self, filters: &BookFilters) -> ClientResult<Paginated<Book>> {
        self.client
            .get("/books/", &RequestOptions::with_query(filters))
            .await
    }

    pub async fn get(&self, id: i64) -> ClientResult<Book> {
        self.client
            .get(&Self::item_path(id, ""), &RequestOptions::none())
            .await
    }

    pub async fn create(&self, payload: &BookPayload) -> ClientResult<Book> {
        self.client
            .post("/books/", ApiBody::json(payload)?, &RequestOptions::none())
            .await
    }

    pub async fn update(&self, id: i64, payload: &BookPayload) -> ClientResult<Book> {
        self.client
            .put(&Self::item_path(id, ""), ApiBody::json(payload)?, &RequestOptions::none())
            .await
    }

    pub async fn patch(&self, id: i64, patch: &BookPatch) -> ClientResult<Book> {
        self.client
            .patch(&Self::item_path(id, ""), ApiBody::json(patch)?, &RequestOptions::none())
            .await
    }

    pub async fn delete(&self, id: i64) -> ClientResult<()> {
        self.client
            .delete(&Self::item_path(id, ""), &RequestOptions::none())
            .await
    }

    pub async fn update_stock(&self, id: i64, stock: i64) -> ClientResult<Book> {
        self.client
            .post(
                &Self::item_path(id, "update_stock"),
                ApiBody::json(&StockUpdate { stock })?,
                &RequestOptions::none(),
            )
            .await
    }

    pub async fn toggle_featured(&self, id: i64) -> ClientResult<Book> {
        self.client
            .post(&Self::item_path(id, "toggle_featured"), ApiBody::Empty, &RequestOptions::none())
            .await
    }

    pub async fn toggle_active(&self, id: i64) -> ClientResult<Book> {
        self.client
            .post(&Self::item_path(id, "toggle_active"), ApiBody::Empty, &RequestOptions::none())
            .await
    }

    pub async fn images(&self, id: i64) -> ClientResult<Vec<BookImage>> {
        self.client
            .get(&Self::item_path(id, "images"), &RequestOptions::none())
            .await
    }

    /// 以 multipart 上传封面或插图
    pub async fn add_image(
        &self,
        id: i64,
        image: FilePart,
        alt_text: Option<&str>,
        is_primary: bool,
    ) -> ClientResult<BookImage> {
        let mut form = MultipartForm::new().file("image", image);
        if let Some(alt) = alt_text {
            form = form.text("alt_text", alt);
        }
        if is_primary {
            form = form.text("is_primary", "true");
        }
        self.client
            .post(
                &Self::item_path(id, "add_image"),
                ApiBody::Multipart(form),
                &RequestOptions::none(),
            )
            .await
    }

    pub async fn videos(&self, id: i64) -> ClientResult<Vec<BookVideo>> {
        self.client
            .get(&Self::item_path(id, "videos"), &RequestOptions::none())
            .await
    }

    pub async fn add_video(&self, id: i64, video: &NewBookVideo) -> ClientResult<BookVideo> {
        self.client
            .post(&Self::item_path(id, "add_video"), ApiBody::json(video)?, &RequestOptions::none())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::tests::{MockTransport, client_with};
    use crate::web::{FormValue, HttpMethod, RequestBody};
    use serde_json::json;

    fn book_json(id: i64) -> serde_json::Value {
        json!({
            "id": id,
            "title": "Les Misérables",
            "author": "Victor Hugo",
            "price": "12.50",
            "stock": 3,
            "is_featured": true
        })
    }

    #[tokio::test]
    async fn test_list_encodes_filters() {
        let transport = MockTransport::new();
        transport.mock(
            HttpMethod::Get,
            "http://api.test/books/?is_featured=true&search=victor+hugo&min_price=5.00",
            200,
            json!({"count": 1, "next": null, "previous": null, "results": [book_json(1)]}),
        );
        let (client, _) = client_with(transport);
        let filters = BookFilters {
            is_featured: Some(true),
            search: Some("victor hugo".into()),
            min_price: Some(500),
            ..Default::default()
        };
        let page = BookService::new(client).list(&filters).await.unwrap();
        assert_eq!(page.results[0].price, 1250);
        assert!(page.results[0].is_active);
    }

    #[tokio::test]
    async fn test_update_stock_body() {
        let transport = MockTransport::new();
        transport.mock(HttpMethod::Post, "http://api.test/books/1/update_stock/", 200, book_json(1));
        let (client, _) = client_with(transport.clone());
        BookService::new(client).update_stock(1, 3).await.unwrap();
        assert_eq!(
            transport.last_request().body,
            RequestBody::Json(r#"{"stock":3}"#.to_string())
        );
    }

    #[tokio::test]
    async fn test_add_image_is_multipart() {
        let transport = MockTransport::new();
        transport.mock(
            HttpMethod::Post,
            "http://api.test/books/9/add_image/",
            201,
            json!({"id": 5, "book": 9, "image": "/media/covers/a.png", "is_primary": true}),
        );
        let (client, _) = client_with(transport.clone());
        let image = FilePart {
            file_name: "a.png".into(),
            mime_type: "image/png".into(),
            bytes: vec![0x89, 0x50],
        };
        let created = BookService::new(client)
            .add_image(9, image, Some("Couverture"), true)
            .await
            .unwrap();
        assert!(created.is_primary);

        let req = transport.last_request();
        assert!(req.header("Content-Type").is_none());
        let RequestBody::Multipart(form) = req.body else {
            panic!("expected multipart body");
        };
        let names: Vec<&str> = form.parts().iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["image", "alt_text", "is_primary"]);
        assert!(matches!(form.parts()[0].1, FormValue::File(_)));
    }
}
