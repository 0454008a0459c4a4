//! Category and category group routes.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
};
use serde::{Deserialize, Deserializer};
use serde_json::{Value, json};
use tally_core::category::{
    CategoryError, CategoryKind, CategoryPatch, CategoryService, CategoryType,
    DefaultBudgetUpdate, NewCategory, SortOrderUpdate,
};
use tally_core::validation::{parse_amount, parse_optional_amount};
use tally_db::repositories::{CategoryRepoError, CategoryRepository};
use tally_shared::types::{CategoryGroupId, CategoryId};
use tracing::info;

use super::message;
use crate::{
    AppState,
    error::ApiError,
    extractors::{ApiJson, ApiPath, ApiQuery},
};

/// Creates the category and group routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/categories", get(list_categories).post(create_category))
        .route(
            "/categories/{id}",
            put(update_category).delete(delete_category),
        )
        .route("/categories/reorder", post(reorder_categories))
        .route("/categories/update-all-defaults", post(update_all_defaults))
        .route("/category-groups", get(list_groups).post(create_group))
        .route(
            "/category-groups/{id}",
            put(rename_group).delete(delete_group),
        )
        .route("/category-groups/reorder", post(reorder_groups))
}

// ============================================================================
// Request Types
// ============================================================================

/// `?type=` filter shared by both list endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct TypeQuery {
    /// `income`, `expense`, `fund` (or `deduction`, which selects income).
    #[serde(rename = "type")]
    pub category_type: Option<String>,
}

/// Body of a category create or update.
#[derive(Debug, Default, Deserialize)]
pub struct CategoryRequest {
    /// Name.
    pub name: Option<String>,
    /// Storage key or coarse type.
    #[serde(rename = "type")]
    pub category_type: Option<String>,
    /// Deduction flag for income categories.
    pub is_deduction: Option<bool>,
    /// Group name; an explicit `null` clears it on update.
    #[serde(default, deserialize_with = "present")]
    pub parent_category: Option<Option<String>>,
    /// Default monthly budget.
    #[serde(alias = "monthly_budget")]
    pub default_budget: Option<Value>,
    /// Display order.
    pub sort_order: Option<i32>,
}

/// Body of a group create or rename.
#[derive(Debug, Default, Deserialize)]
pub struct GroupRequest {
    /// Group name.
    pub name: Option<String>,
    /// Storage key or coarse type.
    #[serde(rename = "type")]
    pub group_type: Option<String>,
    /// Deduction flag for income groups.
    pub is_deduction: Option<bool>,
}

/// Body of a reorder request.
#[derive(Debug, Default, Deserialize)]
pub struct ReorderRequest {
    /// New positions.
    #[serde(default)]
    pub order: Vec<SortOrderUpdate>,
}

/// Body of a bulk default-budget update.
#[derive(Debug, Default, Deserialize)]
pub struct DefaultsRequest {
    /// New defaults.
    #[serde(default)]
    pub updates: Vec<DefaultBudgetUpdate>,
}

fn present<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

// ============================================================================
// Helper Functions
// ============================================================================

fn map_category_error(err: CategoryRepoError) -> ApiError {
    match err {
        CategoryRepoError::Category(
            e @ (CategoryError::NotFound(_) | CategoryError::GroupNotFound(_)),
        ) => ApiError::not_found(e),
        CategoryRepoError::Category(e @ (CategoryError::DuplicateName | CategoryError::DuplicateGroup)) => {
            ApiError::conflict(e)
        }
        CategoryRepoError::Category(e) => ApiError::validation(e),
        CategoryRepoError::Database(e) => e.into(),
    }
}

fn parse_type_filter(query: &TypeQuery) -> Result<Option<CategoryType>, ApiError> {
    match query.category_type.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => CategoryType::from_filter(raw)
            .map(Some)
            .ok_or_else(|| ApiError::validation(CategoryError::InvalidType(raw.to_string()))),
    }
}

fn repo(state: &AppState) -> CategoryRepository {
    CategoryRepository::new((*state.db).clone())
}

// ============================================================================
// Category Handlers
// ============================================================================

/// GET `/categories` - List categories, optionally of one type.
async fn list_categories(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<TypeQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let category_type = parse_type_filter(&query)?;
    let categories = repo(&state)
        .list_categories(category_type)
        .await
        .map_err(map_category_error)?;
    Ok(Json(categories))
}

/// POST `/categories` - Create a category.
async fn create_category(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CategoryRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let name = CategoryService::validate_name(payload.name.as_deref())
        .map_err(ApiError::validation)?;
    let kind = CategoryKind::classify(
        payload.category_type.as_deref().unwrap_or_default(),
        payload.is_deduction,
        &name,
    )
    .map_err(ApiError::validation)?;
    let default_budget =
        parse_optional_amount(payload.default_budget.as_ref()).map_err(ApiError::validation)?;

    let category = repo(&state)
        .create_category(NewCategory {
            name,
            kind,
            parent_category: payload.parent_category.flatten(),
            default_budget,
            is_custom: true,
        })
        .await
        .map_err(map_category_error)?;

    info!(category_id = %category.id, kind = %category.kind, "Category created via API");
    Ok((
        StatusCode::CREATED,
        Json(json!({ "id": category.id, "message": "Category created successfully" })),
    ))
}

/// PUT `/categories/{id}` - Update name, group, default budget or order.
async fn update_category(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(payload): ApiJson<CategoryRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let name = payload
        .name
        .as_deref()
        .map(|name| CategoryService::validate_name(Some(name)))
        .transpose()
        .map_err(ApiError::validation)?;
    let default_budget = payload
        .default_budget
        .as_ref()
        .filter(|value| !value.is_null())
        .map(parse_amount)
        .transpose()
        .map_err(ApiError::validation)?;

    repo(&state)
        .update_category(
            CategoryId::new(id),
            CategoryPatch {
                name,
                parent_category: payload.parent_category,
                default_budget,
                sort_order: payload.sort_order,
            },
        )
        .await
        .map_err(map_category_error)?;
    Ok(message("Category updated"))
}

/// DELETE `/categories/{id}` - Delete a category and everything booked to it.
async fn delete_category(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<impl IntoResponse, ApiError> {
    repo(&state)
        .delete_category(CategoryId::new(id))
        .await
        .map_err(map_category_error)?;
    Ok(message("Category and related records deleted"))
}

/// POST `/categories/reorder` - Apply new sort orders.
async fn reorder_categories(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<ReorderRequest>,
) -> Result<impl IntoResponse, ApiError> {
    repo(&state)
        .reorder_categories(&payload.order)
        .await
        .map_err(map_category_error)?;
    Ok(message("Order updated"))
}

/// POST `/categories/update-all-defaults` - Set many default budgets at once.
async fn update_all_defaults(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<DefaultsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    repo(&state)
        .update_all_defaults(&payload.updates)
        .await
        .map_err(map_category_error)?;
    Ok(message("Default budgets updated successfully"))
}

// ============================================================================
// Group Handlers
// ============================================================================

/// GET `/category-groups` - List groups, optionally of one type.
async fn list_groups(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<TypeQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let category_type = parse_type_filter(&query)?;
    let groups = repo(&state)
        .list_groups(category_type)
        .await
        .map_err(map_category_error)?;
    Ok(Json(groups))
}

/// POST `/category-groups` - Create a group.
async fn create_group(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<GroupRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let blank = |value: Option<&str>| value.is_none_or(|v| v.trim().is_empty());
    if blank(payload.name.as_deref()) || blank(payload.group_type.as_deref()) {
        return Err(ApiError::validation(CategoryError::GroupFieldsRequired));
    }
    let name = payload.name.unwrap_or_default();
    let kind = CategoryKind::classify(
        payload.group_type.as_deref().unwrap_or_default(),
        payload.is_deduction,
        &name,
    )
    .map_err(ApiError::validation)?;

    let group = repo(&state)
        .create_group(&name, kind)
        .await
        .map_err(map_category_error)?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "id": group.id, "message": "Group created" })),
    ))
}

/// PUT `/category-groups/{id}` - Rename a group and its member categories.
async fn rename_group(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(payload): ApiJson<GroupRequest>,
) -> Result<impl IntoResponse, ApiError> {
    repo(&state)
        .rename_group(CategoryGroupId::new(id), payload.name.as_deref())
        .await
        .map_err(map_category_error)?;
    Ok(message("Group updated"))
}

/// DELETE `/category-groups/{id}` - Delete a group; members fall back to "Other".
async fn delete_group(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<impl IntoResponse, ApiError> {
    repo(&state)
        .delete_group(CategoryGroupId::new(id))
        .await
        .map_err(map_category_error)?;
    Ok(message("Group deleted"))
}

/// POST `/category-groups/reorder` - Apply new group sort orders.
async fn reorder_groups(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<ReorderRequest>,
) -> Result<impl IntoResponse, ApiError> {
    repo(&state)
        .reorder_groups(&payload.order)
        .await
        .map_err(map_category_error)?;
    Ok(message("Order updated"))
}
