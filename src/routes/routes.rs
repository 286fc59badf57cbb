//! Defines routes for the food catalog API.
//!
//! ## Structure
//! - `POST /api/foods`            — multipart upload (`food` JSON + `file`)
//! - `GET  /api/foods`            — list every food
//! - `GET  /api/foods/{food_id}`  — fetch one food
//! - `GET  /healthz`, `GET /readyz` — probes

use crate::{
    handlers::{
        food_handlers::{add_food, get_food, read_foods},
        health_handlers::{healthz, readyz},
    },
    services::food_service::FoodService,
};
use axum::{Router, extract::DefaultBodyLimit, routing::get};

/// Build the router; `max_upload_bytes` caps request bodies on the upload route.
pub fn routes(max_upload_bytes: usize) -> Router<FoodService> {
    Router::new()
        // health endpoints (mounted at root)
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route(
            "/api/foods",
            get(read_foods)
                .post(add_food)
                .layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .route("/api/foods/{food_id}", get(get_food))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db,
        models::food::FoodResponse,
        services::{
            food_repository::{SqliteFoodRepository, testing::FailingRepository},
            food_service::StorageTarget,
            object_store::{DEFAULT_S3_DOMAIN, testing::MemoryObjectStore},
        },
    };
    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };
    use http_body_util::BodyExt;
    use serde_json::Value;
    use std::sync::Arc;
    use tower::ServiceExt;

    const BOUNDARY: &str = "foodies-test-boundary";

    fn target() -> StorageTarget {
        StorageTarget {
            bucket: "foodies-images".into(),
            domain: DEFAULT_S3_DOMAIN.into(),
        }
    }

    async fn app_with(store: Arc<MemoryObjectStore>) -> Router {
        let repo = SqliteFoodRepository::new(db::memory_pool().await.unwrap());
        let service = FoodService::new(store, Arc::new(repo), target());
        routes(1024 * 1024).with_state(service)
    }

    /// Multipart body with an optional `food` text part and an optional file part.
    fn multipart_body(food: Option<&str>, file: Option<(&str, &[u8])>) -> Vec<u8> {
        let mut body = Vec::new();
        if let Some(food) = food {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"food\"\r\n\r\n{food}\r\n"
                )
                .as_bytes(),
            );
        }
        if let Some((filename, bytes)) = file {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: image/jpeg\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(bytes);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn post_foods(body: Vec<u8>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/foods")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    const PIZZA: &str = r#"{"name":"Pizza","description":"Cheese","category":"Main","price":9.99}"#;

    #[tokio::test]
    async fn add_then_list_then_get() {
        let store = Arc::new(MemoryObjectStore::default());
        let app = app_with(store.clone()).await;

        let response = app
            .clone()
            .oneshot(post_foods(multipart_body(
                Some(PIZZA),
                Some(("pizza.jpg", &b"\xff\xd8\xff"[..])),
            )))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let created: FoodResponse = serde_json::from_value(json_body(response).await).unwrap();
        assert_eq!(created.category, "Main");
        assert_eq!(created.price, 9.99);
        assert!(
            created
                .image_url
                .starts_with("https://foodies-images.s3.amazonaws.com/")
        );
        assert!(created.image_url.ends_with(".jpg"));
        assert_eq!(store.objects()[0].body.as_ref(), b"\xff\xd8\xff");

        let response = app.clone().oneshot(get("/api/foods")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let list = json_body(response).await;
        assert_eq!(list.as_array().unwrap().len(), 1);
        assert_eq!(list[0]["imageUrl"], created.image_url.as_str());

        let response = app
            .oneshot(get(&format!("/api/foods/{}", created.id)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["id"], created.id.as_str());
    }

    #[tokio::test]
    async fn unknown_food_is_404() {
        let app = app_with(Arc::new(MemoryObjectStore::default())).await;
        let response = app.oneshot(get("/api/foods/missing")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(response).await["status"], 404);
    }

    #[tokio::test]
    async fn malformed_food_json_is_400() {
        let store = Arc::new(MemoryObjectStore::default());
        let app = app_with(store.clone()).await;
        let response = app
            .oneshot(post_foods(multipart_body(
                Some("{not json"),
                Some(("pizza.jpg", &b"abc"[..])),
            )))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(store.objects().is_empty());
    }

    #[tokio::test]
    async fn missing_parts_and_bad_filenames_are_400() {
        let store = Arc::new(MemoryObjectStore::default());
        let app = app_with(store.clone()).await;

        for body in [
            multipart_body(None, Some(("pizza.jpg", &b"abc"[..]))),
            multipart_body(Some(PIZZA), None),
            multipart_body(Some(PIZZA), Some(("pizza", &b"abc"[..]))),
        ] {
            let response = app.clone().oneshot(post_foods(body)).await.unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        }
        assert!(store.objects().is_empty());
    }

    #[tokio::test]
    async fn rejected_upload_is_500() {
        let app = app_with(Arc::new(MemoryObjectStore::rejecting())).await;
        let response = app
            .clone()
            .oneshot(post_foods(multipart_body(
                Some(PIZZA),
                Some(("pizza.png", &b"abc"[..])),
            )))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let list = json_body(app.oneshot(get("/api/foods")).await.unwrap()).await;
        assert!(list.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn file_part_cut_off_mid_stream_is_500() {
        let store = Arc::new(MemoryObjectStore::default());
        let app = app_with(store.clone()).await;

        let full = multipart_body(Some(PIZZA), Some(("pizza.jpg", &[0xab; 512][..])));
        let cut = full.len() - 300;
        let response = app
            .oneshot(post_foods(full[..cut].to_vec()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(store.objects().is_empty());
    }

    #[tokio::test]
    async fn oversized_upload_is_413() {
        let store = Arc::new(MemoryObjectStore::default());
        let repo = SqliteFoodRepository::new(db::memory_pool().await.unwrap());
        let service = FoodService::new(store.clone(), Arc::new(repo), target());
        let app = routes(64).with_state(service);

        let response = app
            .oneshot(post_foods(multipart_body(
                Some(PIZZA),
                Some(("pizza.jpg", &[0xab; 4096][..])),
            )))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert!(store.objects().is_empty());
    }

    #[tokio::test]
    async fn probes_report_repository_health() {
        let app = app_with(Arc::new(MemoryObjectStore::default())).await;
        let response = app.clone().oneshot(get("/healthz")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let response = app.oneshot(get("/readyz")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let service = FoodService::new(
            Arc::new(MemoryObjectStore::default()),
            Arc::new(FailingRepository::default()),
            target(),
        );
        let response = routes(1024)
            .with_state(service)
            .oneshot(get("/readyz"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(json_body(response).await["checks"]["database"]["ok"], false);
    }
}
