//! Password-gated catalog administration.
//!
//! Every handler except `login`/`logout` takes a [`RequireAdmin`] extractor,
//! which accepts the `admin-password` cookie set by `login` or an
//! `x-admin-password` header.

use axum::{
    async_trait,
    extract::{FromRequestParts, Path, State},
    http::{header, request::Parts, HeaderMap, StatusCode},
    response::{AppendHeaders, IntoResponse},
    Json,
};
use serde::Deserialize;
use validator::Validate;

use crate::api::AppState;
use crate::catalog::{CategoryInput, CustomizationInput, ProductInput, SiteConfig};
use crate::domain::aggregates::{Category, Customization, Product};
use crate::error::{AppError, Result};

pub const ADMIN_COOKIE: &str = "admin-password";
pub const ADMIN_HEADER: &str = "x-admin-password";
const SESSION_MAX_AGE_SECS: u32 = 60 * 60 * 24;

pub struct RequireAdmin;

#[async_trait]
impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> std::result::Result<Self, Self::Rejection> {
        let supplied = presented_password(&parts.headers);
        match supplied {
            Some(password) if constant_time_eq(password.as_bytes(), state.admin_password.as_bytes()) => Ok(Self),
            _ => Err(AppError::Unauthorized),
        }
    }
}

fn presented_password(headers: &HeaderMap) -> Option<String> {
    if let Some(value) = headers.get(ADMIN_HEADER).and_then(|v| v.to_str().ok()) {
        return Some(value.to_string());
    }
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == ADMIN_COOKIE)
        .map(|(_, value)| value.to_string())
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct DeleteImageRequest {
    pub url: String,
}

pub async fn login(State(s): State<AppState>, Json(r): Json<LoginRequest>) -> Result<impl IntoResponse> {
    if !constant_time_eq(r.password.as_bytes(), s.admin_password.as_bytes()) {
        tracing::warn!("rejected admin login");
        return Err(AppError::Unauthorized);
    }
    let cookie = format!("{ADMIN_COOKIE}={}; HttpOnly; Path=/; Max-Age={SESSION_MAX_AGE_SECS}; SameSite=Lax", r.password);
    Ok((StatusCode::NO_CONTENT, AppendHeaders([(header::SET_COOKIE, cookie)])))
}

pub async fn logout() -> impl IntoResponse {
    let cookie = format!("{ADMIN_COOKIE}=; HttpOnly; Path=/; Max-Age=0; SameSite=Lax");
    (StatusCode::NO_CONTENT, AppendHeaders([(header::SET_COOKIE, cookie)]))
}

pub async fn create_product(_: RequireAdmin, State(s): State<AppState>, Json(r): Json<ProductInput>) -> Result<(StatusCode, Json<Product>)> {
    r.validate()?;
    Ok((StatusCode::CREATED, Json(s.catalog.create_product(r).await?)))
}

pub async fn update_product(_: RequireAdmin, State(s): State<AppState>, Path(id): Path<String>, Json(r): Json<ProductInput>) -> Result<Json<Product>> {
    r.validate()?;
    Ok(Json(s.catalog.update_product(&id, r).await?))
}

pub async fn delete_product(_: RequireAdmin, State(s): State<AppState>, Path(id): Path<String>) -> Result<StatusCode> {
    s.catalog.delete_product(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_product_image(_: RequireAdmin, State(s): State<AppState>, Path(id): Path<String>, Json(r): Json<DeleteImageRequest>) -> Result<Json<Product>> {
    Ok(Json(s.catalog.delete_product_image(&id, &r.url).await?))
}

pub async fn create_category(_: RequireAdmin, State(s): State<AppState>, Json(r): Json<CategoryInput>) -> Result<(StatusCode, Json<Category>)> {
    r.validate()?;
    Ok((StatusCode::CREATED, Json(s.catalog.create_category(r).await?)))
}

pub async fn update_category(_: RequireAdmin, State(s): State<AppState>, Path(id): Path<String>, Json(r): Json<CategoryInput>) -> Result<Json<Category>> {
    r.validate()?;
    Ok(Json(s.catalog.update_category(&id, r).await?))
}

pub async fn delete_category(_: RequireAdmin, State(s): State<AppState>, Path(id): Path<String>) -> Result<StatusCode> {
    s.catalog.delete_category(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn upsert_customization(_: RequireAdmin, State(s): State<AppState>, Path(id): Path<String>, Json(r): Json<CustomizationInput>) -> Result<Json<Customization>> {
    r.validate()?;
    Ok(Json(s.catalog.upsert_customization(&id, r).await?))
}

pub async fn delete_customization(_: RequireAdmin, State(s): State<AppState>, Path(id): Path<String>) -> Result<StatusCode> {
    s.catalog.delete_customization(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn update_site(_: RequireAdmin, State(s): State<AppState>, Json(r): Json<SiteConfig>) -> Result<Json<SiteConfig>> {
    Ok(Json(s.catalog.update_site_config(r).await?))
}
