use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use indexmap::IndexSet;
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use crate::analytics::Analytics;
use crate::db::{Database, Store, StoreError};
use crate::models::*;

// ============================================================
// Error Handling
// ============================================================

/// Log a store failure and return a sanitized response to the client.
/// The full error is logged server-side for debugging, but clients only
/// see a generic message to avoid leaking internal details.
fn store_error(e: StoreError) -> (StatusCode, String) {
    tracing::error!("Store error: {}", e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "Internal server error".to_string(),
    )
}

/// Domain validation failures are the caller's defect and safe to expose.
fn validation_error(e: ValidationError) -> (StatusCode, String) {
    tracing::warn!("Validation error: {}", e);
    (StatusCode::BAD_REQUEST, e.to_string())
}

// ============================================================
// Request payloads
// ============================================================

#[derive(Debug, Deserialize)]
pub struct RankQuery {
    pub k: i64,
}

#[derive(Debug, Deserialize)]
pub struct RevenueQuery {
    pub k: i64,
    pub year: i32,
}

#[derive(Debug, Deserialize)]
pub struct CreateProviderInput {
    pub name: String,
    pub year_founded: i32,
    pub country: String,
    pub headquarters: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateRocketInput {
    pub name: String,
    pub country: String,
    /// Provider id of the manufacturer, which must already exist.
    pub manufacturer_id: Uuid,
    pub mass_to_leo: Option<u32>,
    pub mass_to_gto: Option<u32>,
    pub mass_to_other: Option<u32>,
    pub wiki_link: Option<String>,
}

/// Partial update of a rocket's descriptive attributes. Absent fields are
/// left as they are.
#[derive(Debug, Deserialize)]
pub struct UpdateRocketInput {
    pub mass_to_leo: Option<u32>,
    pub mass_to_gto: Option<u32>,
    pub mass_to_other: Option<u32>,
    pub wiki_link: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateLaunchInput {
    pub launch_date: NaiveDate,
    /// Rocket id of the launch vehicle, which must already exist.
    pub rocket_id: Uuid,
    /// Provider id of the operator, which must already exist.
    pub provider_id: Uuid,
    pub launch_site: String,
    pub orbit: String,
    pub function: Option<String>,
    pub price: Decimal,
    pub outcome: LaunchOutcome,
}

/// Partial update of a launch's descriptive attributes. Absent fields are
/// left as they are.
#[derive(Debug, Deserialize)]
pub struct UpdateLaunchInput {
    pub function: Option<String>,
    pub price: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
pub struct CreateUserInput {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Ranking endpoints accept any signed k; below zero means zero, which
/// yields an empty result rather than an error.
fn clamp_k(k: i64) -> usize {
    k.max(0) as usize
}

// ============================================================
// Health
// ============================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ============================================================
// Analytics
// ============================================================

pub async fn most_launched_rockets(
    State(db): State<Database>,
    Query(query): Query<RankQuery>,
) -> Result<Json<Vec<Rocket>>, (StatusCode, String)> {
    Analytics::new(db)
        .most_launched_rockets(clamp_k(query.k))
        .map(Json)
        .map_err(store_error)
}

pub async fn most_reliable_providers(
    State(db): State<Database>,
    Query(query): Query<RankQuery>,
) -> Result<Json<Vec<LaunchServiceProvider>>, (StatusCode, String)> {
    Analytics::new(db)
        .most_reliable_providers(clamp_k(query.k))
        .map(Json)
        .map_err(store_error)
}

pub async fn highest_revenue_providers(
    State(db): State<Database>,
    Query(query): Query<RevenueQuery>,
) -> Result<Json<Vec<LaunchServiceProvider>>, (StatusCode, String)> {
    Analytics::new(db)
        .highest_revenue_providers(clamp_k(query.k), query.year)
        .map(Json)
        .map_err(store_error)
}

pub async fn most_recent_launches(
    State(db): State<Database>,
    Query(query): Query<RankQuery>,
) -> Result<Json<Vec<Launch>>, (StatusCode, String)> {
    Analytics::new(db)
        .most_recent_launches(clamp_k(query.k))
        .map(Json)
        .map_err(store_error)
}

pub async fn most_expensive_launches(
    State(db): State<Database>,
    Query(query): Query<RankQuery>,
) -> Result<Json<Vec<Launch>>, (StatusCode, String)> {
    Analytics::new(db)
        .most_expensive_launches(clamp_k(query.k))
        .map(Json)
        .map_err(store_error)
}

pub async fn dominant_country(
    State(db): State<Database>,
    Path(orbit): Path<String>,
) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    let country = Analytics::new(db)
        .dominant_country(&orbit)
        .map_err(store_error)?;

    match country {
        Some(country) => Ok(Json(
            serde_json::json!({ "orbit": orbit, "country": country }),
        )),
        None => Err((
            StatusCode::NOT_FOUND,
            format!("No launches recorded for orbit {orbit}"),
        )),
    }
}

// ============================================================
// Providers
// ============================================================

pub async fn list_providers(
    State(db): State<Database>,
) -> Result<Json<Vec<LaunchServiceProvider>>, (StatusCode, String)> {
    db.get_all_providers().map(Json).map_err(store_error)
}

pub async fn get_provider(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> Result<Json<LaunchServiceProvider>, (StatusCode, String)> {
    db.get_provider(id)
        .map_err(store_error)?
        .map(Json)
        .ok_or((StatusCode::NOT_FOUND, "Provider not found".to_string()))
}

pub async fn create_provider(
    State(db): State<Database>,
    Json(input): Json<CreateProviderInput>,
) -> Result<(StatusCode, Json<LaunchServiceProvider>), (StatusCode, String)> {
    let mut provider = LaunchServiceProvider::new(&input.name, input.year_founded, &input.country)
        .map_err(validation_error)?;
    if let Some(headquarters) = &input.headquarters {
        provider = provider
            .with_headquarters(headquarters)
            .map_err(validation_error)?;
    }

    db.save_provider(provider)
        .map(|p| (StatusCode::CREATED, Json(p)))
        .map_err(store_error)
}

pub async fn delete_provider(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, String)> {
    if db.delete_provider(id).map_err(store_error)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err((StatusCode::NOT_FOUND, "Provider not found".to_string()))
    }
}

// ============================================================
// Rockets
// ============================================================

pub async fn list_rockets(
    State(db): State<Database>,
) -> Result<Json<Vec<Rocket>>, (StatusCode, String)> {
    db.get_all_rockets().map(Json).map_err(store_error)
}

pub async fn get_rocket(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> Result<Json<Rocket>, (StatusCode, String)> {
    db.get_rocket(id)
        .map_err(store_error)?
        .map(Json)
        .ok_or((StatusCode::NOT_FOUND, "Rocket not found".to_string()))
}

pub async fn create_rocket(
    State(db): State<Database>,
    Json(input): Json<CreateRocketInput>,
) -> Result<(StatusCode, Json<Rocket>), (StatusCode, String)> {
    let manufacturer = db
        .get_provider(input.manufacturer_id)
        .map_err(store_error)?
        .ok_or((StatusCode::NOT_FOUND, "Manufacturer not found".to_string()))?
        .with_rockets(IndexSet::new());

    let mut rocket = Rocket::new(&input.name, &input.country, manufacturer)
        .and_then(|r| r.with_mass_to_leo(input.mass_to_leo))
        .and_then(|r| r.with_mass_to_gto(input.mass_to_gto))
        .and_then(|r| r.with_mass_to_other(input.mass_to_other))
        .map_err(validation_error)?;
    if let Some(wiki_link) = &input.wiki_link {
        rocket = rocket.with_wiki_link(wiki_link).map_err(validation_error)?;
    }

    db.save_rocket(rocket)
        .map(|r| (StatusCode::CREATED, Json(r)))
        .map_err(store_error)
}

pub async fn update_rocket(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateRocketInput>,
) -> Result<Json<Rocket>, (StatusCode, String)> {
    let Some(mut rocket) = db.get_rocket(id).map_err(store_error)? else {
        return Err((StatusCode::NOT_FOUND, "Rocket not found".to_string()));
    };

    if input.mass_to_leo.is_some() {
        rocket = rocket
            .with_mass_to_leo(input.mass_to_leo)
            .map_err(validation_error)?;
    }
    if input.mass_to_gto.is_some() {
        rocket = rocket
            .with_mass_to_gto(input.mass_to_gto)
            .map_err(validation_error)?;
    }
    if input.mass_to_other.is_some() {
        rocket = rocket
            .with_mass_to_other(input.mass_to_other)
            .map_err(validation_error)?;
    }
    if let Some(wiki_link) = &input.wiki_link {
        rocket = rocket.with_wiki_link(wiki_link).map_err(validation_error)?;
    }

    db.save_rocket(rocket).map(Json).map_err(store_error)
}

pub async fn delete_rocket(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, String)> {
    if db.delete_rocket(id).map_err(store_error)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err((StatusCode::NOT_FOUND, "Rocket not found".to_string()))
    }
}

// ============================================================
// Launches
// ============================================================

pub async fn list_launches(
    State(db): State<Database>,
) -> Result<Json<Vec<Launch>>, (StatusCode, String)> {
    db.get_all_launches().map(Json).map_err(store_error)
}

pub async fn get_launch(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> Result<Json<Launch>, (StatusCode, String)> {
    db.get_launch(id)
        .map_err(store_error)?
        .map(Json)
        .ok_or((StatusCode::NOT_FOUND, "Launch not found".to_string()))
}

pub async fn create_launch(
    State(db): State<Database>,
    Json(input): Json<CreateLaunchInput>,
) -> Result<(StatusCode, Json<Launch>), (StatusCode, String)> {
    let vehicle = db
        .get_rocket(input.rocket_id)
        .map_err(store_error)?
        .ok_or((StatusCode::NOT_FOUND, "Rocket not found".to_string()))?;
    let provider = db
        .get_provider(input.provider_id)
        .map_err(store_error)?
        .ok_or((StatusCode::NOT_FOUND, "Provider not found".to_string()))?
        .with_rockets(IndexSet::new());

    let launch = Launch::new(LaunchDetails {
        launch_date: input.launch_date,
        vehicle,
        provider,
        launch_site: input.launch_site,
        orbit: input.orbit,
        function: input.function,
        price: input.price,
        outcome: input.outcome,
    })
    .map_err(validation_error)?;

    db.save_launch(launch)
        .map(|l| (StatusCode::CREATED, Json(l)))
        .map_err(store_error)
}

pub async fn update_launch(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateLaunchInput>,
) -> Result<Json<Launch>, (StatusCode, String)> {
    let Some(mut launch) = db.get_launch(id).map_err(store_error)? else {
        return Err((StatusCode::NOT_FOUND, "Launch not found".to_string()));
    };

    if let Some(function) = &input.function {
        launch = launch.with_function(function).map_err(validation_error)?;
    }
    if let Some(price) = input.price {
        launch = launch.with_price(price).map_err(validation_error)?;
    }

    db.save_launch(launch).map(Json).map_err(store_error)
}

pub async fn delete_launch(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, String)> {
    if db.delete_launch(id).map_err(store_error)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err((StatusCode::NOT_FOUND, "Launch not found".to_string()))
    }
}

// ============================================================
// Users
// ============================================================

pub async fn list_users(State(db): State<Database>) -> Result<Json<Vec<User>>, (StatusCode, String)> {
    db.get_all_users().map(Json).map_err(store_error)
}

pub async fn get_user(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> Result<Json<User>, (StatusCode, String)> {
    db.get_user(id)
        .map_err(store_error)?
        .map(Json)
        .ok_or((StatusCode::NOT_FOUND, "User not found".to_string()))
}

pub async fn create_user(
    State(db): State<Database>,
    Json(input): Json<CreateUserInput>,
) -> Result<(StatusCode, Json<User>), (StatusCode, String)> {
    let user = User::new(
        &input.first_name,
        &input.last_name,
        &input.email,
        &input.password,
    )
    .map_err(validation_error)?;

    db.save_user(user)
        .map(|u| (StatusCode::CREATED, Json(u)))
        .map_err(store_error)
}

pub async fn login(
    State(db): State<Database>,
    Json(input): Json<LoginInput>,
) -> Result<Json<User>, (StatusCode, String)> {
    let users = db.get_all_users().map_err(store_error)?;
    users
        .into_iter()
        .find(|user| user.email() == input.email && user.matches_password(&input.password))
        .map(Json)
        .ok_or((
            StatusCode::UNAUTHORIZED,
            "Invalid email or password".to_string(),
        ))
}

pub async fn delete_user(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, String)> {
    if db.delete_user(id).map_err(store_error)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err((StatusCode::NOT_FOUND, "User not found".to_string()))
    }
}
