//! HTTP 介面：照片搜尋、領養搜尋代理、寵物與時間軸 CRUD。

pub mod error;
pub mod extract;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use extract::JsonBody;
pub use state::{build_state, AppState};

use crate::domain::model::{
    AdoptionSearchParams, Moment, NewMoment, NewPet, Pet, PetUpdate, PhotoQuery, ResolvedPhoto,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

#[derive(Debug, Default, Deserialize)]
pub struct PhotoSearchQuery {
    pub query: Option<String>,
    pub q: Option<String>,
}

impl PhotoSearchQuery {
    /// `query` 優先，其次 `q`，都沒有就用 "pet"
    pub fn text(&self) -> &str {
        [&self.query, &self.q]
            .into_iter()
            .filter_map(|v| v.as_deref())
            .find(|v| !v.is_empty())
            .unwrap_or("pet")
    }
}

// 非數字的 id 與不存在的 id 一樣回 404
fn parse_id(raw: &str) -> ApiResult<u64> {
    raw.parse().map_err(|_| ApiError::NotFound)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "ok": true }))
}

async fn search_photo(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PhotoSearchQuery>,
) -> Json<ResolvedPhoto> {
    let query = PhotoQuery::new(params.text());
    Json(state.photos.resolve(&query).await)
}

async fn search_adoptions(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AdoptionSearchParams>,
) -> ApiResult<Json<serde_json::Value>> {
    let listings = state
        .adoption
        .search(&params)
        .await
        .map_err(ApiError::petfinder)?;
    Ok(Json(listings))
}

async fn get_animal(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    let animal = state
        .adoption
        .animal(&id)
        .await
        .map_err(ApiError::petfinder)?;
    Ok(Json(animal))
}

async fn list_pets(State(state): State<Arc<AppState>>) -> Json<Vec<Pet>> {
    Json(state.pets.list().await)
}

async fn create_pet(
    State(state): State<Arc<AppState>>,
    JsonBody(pet): JsonBody<NewPet>,
) -> ApiResult<(StatusCode, Json<Pet>)> {
    let created = state.pets.create(pet).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_pet(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    JsonBody(update): JsonBody<PetUpdate>,
) -> ApiResult<Json<Pet>> {
    let id = parse_id(&id)?;
    let updated = state.pets.update(id, update).await.ok_or(ApiError::NotFound)?;
    Ok(Json(updated))
}

async fn delete_pet(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_id(&id)?;
    if state.pets.remove(id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound)
    }
}

async fn list_moments(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<Moment>>> {
    let id = parse_id(&id)?;
    let moments = state.pets.list_moments(id).await.ok_or(ApiError::NotFound)?;
    Ok(Json(moments))
}

async fn add_moment(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    JsonBody(moment): JsonBody<NewMoment>,
) -> ApiResult<(StatusCode, Json<Moment>)> {
    let id = parse_id(&id)?;
    let created = state
        .pets
        .add_moment(id, moment)
        .await
        .ok_or(ApiError::NotFound)?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub fn app_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        .route("/health", get(health))
        .route("/photos/search", get(search_photo))
        .route("/petfinder/search", get(search_adoptions))
        .route("/petfinder/animals/{id}", get(get_animal))
        .route("/pets", get(list_pets).post(create_pet))
        .route("/pets/{id}", put(update_pet).delete(delete_pet))
        .route("/pets/{id}/moments", get(list_moments).post(add_moment));

    Router::new()
        .nest("/api", api)
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
