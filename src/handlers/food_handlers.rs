//! HTTP handlers for the food catalog.
//!
//! `POST /api/foods` takes a multipart body with two parts: `food` (JSON text
//! of the item fields) and `file` (the image). Everything past parsing is
//! delegated to `FoodService`.

use crate::{
    errors::AppError,
    models::food::{FoodRequest, FoodResponse},
    services::food_service::{FoodError, FoodService, ImageUpload},
};
use axum::{
    Json,
    extract::{Multipart, Path, State, multipart::MultipartError},
    http::StatusCode,
};

const FOOD_PART: &str = "food";
const FILE_PART: &str = "file";

/// `POST /api/foods` — upload the image and create the record.
pub async fn add_food(
    State(service): State<FoodService>,
    mut multipart: Multipart,
) -> Result<Json<FoodResponse>, AppError> {
    let mut food: Option<String> = None;
    let mut upload: Option<ImageUpload> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some(FOOD_PART) => {
                food = Some(field.text().await.map_err(multipart_error)?);
            }
            Some(FILE_PART) => {
                let filename = field
                    .file_name()
                    .map(str::to_string)
                    .ok_or_else(|| AppError::bad_request("file part has no filename"))?;
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await.map_err(|err| {
                    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
                        multipart_error(err)
                    } else {
                        FoodError::Upload(format!("reading file payload: {}", err.body_text()))
                            .into()
                    }
                })?;
                upload = Some(ImageUpload {
                    bytes,
                    content_type,
                    filename,
                });
            }
            other => {
                tracing::debug!(part = ?other, "ignoring unexpected multipart part");
            }
        }
    }

    let food = food.ok_or_else(|| AppError::bad_request("missing `food` part"))?;
    let upload = upload.ok_or_else(|| AppError::bad_request("missing `file` part"))?;
    let request = parse_food(&food)?;

    let created = service.add_food(request, upload).await?;
    Ok(Json(created))
}

/// `GET /api/foods` — every catalog record.
pub async fn read_foods(
    State(service): State<FoodService>,
) -> Result<Json<Vec<FoodResponse>>, AppError> {
    Ok(Json(service.read_foods().await?))
}

/// `GET /api/foods/{food_id}`
pub async fn get_food(
    State(service): State<FoodService>,
    Path(food_id): Path<String>,
) -> Result<Json<FoodResponse>, AppError> {
    Ok(Json(service.get_food_by_id(&food_id).await?))
}

fn parse_food(raw: &str) -> Result<FoodRequest, AppError> {
    serde_json::from_str(raw)
        .map_err(|err| AppError::bad_request(format!("Invalid food data: {}", err)))
}

fn multipart_error(err: MultipartError) -> AppError {
    AppError::new(err.status(), err.body_text())
}
