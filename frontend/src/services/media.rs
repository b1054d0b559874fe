//! 图书图片与视频的单项维护

use crate::api::{ApiBody, ApiClient, ClientResult, RequestOptions};
use bookstore_shared::{BookImage, BookVideo, MediaPatch};

#[derive(Clone, Debug)]
pub struct MediaService {
    client: ApiClient,
}

impl MediaService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn update_image(&self, id: i64, patch: &MediaPatch) -> ClientResult<BookImage> {
        self.client
            .patch(&format!("/books/images/{}/", id), ApiBody::json(patch)?, &RequestOptions::none())
            .await
    }

    pub async fn delete_image(&self, id: i64) -> ClientResult<()> {
        self.client
            .delete(&format!("/books/images/{}/", id), &RequestOptions::none())
            .await
    }

    pub async fn update_video(&self, id: i64, patch: &MediaPatch) -> ClientResult<BookVideo> {
        self.client
            .patch(&format!("/books/videos/{}/", id), ApiBody::json(patch)?, &RequestOptions::none())
            .await
    }

    pub async fn delete_video(&self, id: i64) -> ClientResult<()> {
        self.client
            .delete(&format!("/books/videos/{}/", id), &RequestOptions::none())
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
    async fn test_patch_only_sends_set_fields() {
        let transport = MockTransport::new();
        transport.mock(
            HttpMethod::Patch,
            "http://api.test/books/images/7/",
            200,
            json!({"id": 7, "image": "/media/a.png", "is_primary": true}),
        );
        let (client, _) = client_with(transport.clone());
        let patch = MediaPatch {
            is_primary: Some(true),
            ..Default::default()
        };
        let image = MediaService::new(client).update_image(7, &patch).await.unwrap();
        assert!(image.is_primary);
        assert_eq!(
            transport.last_request().body,
            RequestBody::Json(r#"{"is_primary":true}"#.to_string())
        );
    }

    #[tokio::test]
    async fn test_delete_video_not_found() {
        let transport = MockTransport::new();
        let (client, _) = client_with(transport);
        let err = MediaService::new(client).delete_video(99).await.unwrap_err();
        assert_eq!(err.status(), Some(404));
    }
}
