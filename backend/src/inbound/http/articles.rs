//! Article HTTP handlers.
//!
//! ```text
//! GET    /api/articles
//! GET    /api/articles/{id}
//! GET    /api/admin/articles
//! POST   /api/admin/articles
//! GET    /api/admin/articles/{id}
//! PUT    /api/admin/articles/{id}
//! DELETE /api/admin/articles/{id}
//! ```

use actix_web::{HttpResponse, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Article, ArticlePatch, Category, Error, NewArticle, Patch};
use crate::inbound::http::ApiResult;
use crate::inbound::http::error::method_not_allowed;
use crate::inbound::http::session::AdminSession;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::parse_id;

const NOT_FOUND: &str = "Article not found";

/// Request body for `POST /api/admin/articles`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateArticleRequest {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub excerpt: Option<String>,
    pub category: Category,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub published: bool,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub author: Option<String>,
}

impl From<CreateArticleRequest> for NewArticle {
    fn from(value: CreateArticleRequest) -> Self {
        Self {
            title: value.title,
            content: value.content,
            excerpt: value.excerpt,
            category: value.category,
            tags: value.tags,
            published: value.published,
            featured: value.featured,
            image_url: value.image_url,
            published_at: value.published_at,
            author: value.author,
        }
    }
}

/// Request body for `PUT /api/admin/articles/{id}`.
///
/// Omitted keys are left unchanged; `null` clears nullable fields and is
/// rejected for required ones. `readTime` is derived and ignored if sent.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateArticleRequest {
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    #[schema(value_type = Option<String>)]
    pub title: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    #[schema(value_type = Option<String>)]
    pub content: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    #[schema(value_type = Option<String>)]
    pub excerpt: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    #[schema(value_type = Option<Category>)]
    pub category: Patch<Category>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    #[schema(value_type = Option<Vec<String>>)]
    pub tags: Patch<Vec<String>>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    #[schema(value_type = Option<bool>)]
    pub published: Patch<bool>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    #[schema(value_type = Option<bool>)]
    pub featured: Patch<bool>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    #[schema(value_type = Option<String>)]
    pub image_url: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    #[schema(value_type = Option<DateTime<Utc>>)]
    pub published_at: Patch<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    #[schema(value_type = Option<String>)]
    pub author: Patch<String>,
}

impl From<UpdateArticleRequest> for ArticlePatch {
    fn from(value: UpdateArticleRequest) -> Self {
        Self {
            title: value.title,
            content: value.content,
            excerpt: value.excerpt,
            category: value.category,
            tags: value.tags,
            published: value.published,
            featured: value.featured,
            image_url: value.image_url,
            published_at: value.published_at,
            author: value.author,
        }
    }
}

/// Confirmation body for deletions.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// List published articles, newest first.
#[utoipa::path(
    get,
    path = "/api/articles",
    responses(
        (status = 200, description = "Published articles", body = [Article]),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["articles"],
    operation_id = "listArticles",
    security([])
)]
pub async fn list_articles(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<Article>>> {
    Ok(web::Json(state.articles.list_published().await?))
}

/// Read a published article, counting the view.
#[utoipa::path(
    get,
    path = "/api/articles/{id}",
    params(("id" = String, Path, description = "Article id")),
    responses(
        (status = 200, description = "Article with its updated view count", body = Article),
        (status = 404, description = "Unknown or unpublished article", body = Error)
    ),
    tags = ["articles"],
    operation_id = "getArticle",
    security([])
)]
pub async fn get_article(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Article>> {
    let id = parse_id(&path, NOT_FOUND)?;
    Ok(web::Json(state.articles.read_published(id).await?))
}

/// List every article, drafts included.
#[utoipa::path(
    get,
    path = "/api/admin/articles",
    responses(
        (status = 200, description = "All articles", body = [Article]),
        (status = 401, description = "Admin session required", body = Error)
    ),
    tags = ["admin"],
    operation_id = "adminListArticles"
)]
pub async fn admin_list_articles(
    state: web::Data<HttpState>,
    _admin: AdminSession,
) -> ApiResult<web::Json<Vec<Article>>> {
    Ok(web::Json(state.articles_admin.list_all().await?))
}

/// Create an article.
#[utoipa::path(
    post,
    path = "/api/admin/articles",
    request_body = CreateArticleRequest,
    responses(
        (status = 201, description = "Created article", body = Article),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Admin session required", body = Error)
    ),
    tags = ["admin"],
    operation_id = "createArticle"
)]
pub async fn create_article(
    state: web::Data<HttpState>,
    _admin: AdminSession,
    payload: web::Json<CreateArticleRequest>,
) -> ApiResult<HttpResponse> {
    let article = state
        .articles_admin
        .create(payload.into_inner().into())
        .await?;
    Ok(HttpResponse::Created().json(article))
}

/// Fetch any article without counting a view.
#[utoipa::path(
    get,
    path = "/api/admin/articles/{id}",
    params(("id" = String, Path, description = "Article id")),
    responses(
        (status = 200, description = "Article", body = Article),
        (status = 404, description = "Unknown article", body = Error)
    ),
    tags = ["admin"],
    operation_id = "adminGetArticle"
)]
pub async fn admin_get_article(
    state: web::Data<HttpState>,
    _admin: AdminSession,
    path: web::Path<String>,
) -> ApiResult<web::Json<Article>> {
    let id = parse_id(&path, NOT_FOUND)?;
    Ok(web::Json(state.articles_admin.find(id).await?))
}

/// Merge a sparse update into an article.
#[utoipa::path(
    put,
    path = "/api/admin/articles/{id}",
    params(("id" = String, Path, description = "Article id")),
    request_body = UpdateArticleRequest,
    responses(
        (status = 200, description = "Merged article", body = Article),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Unknown article", body = Error)
    ),
    tags = ["admin"],
    operation_id = "updateArticle"
)]
pub async fn update_article(
    state: web::Data<HttpState>,
    _admin: AdminSession,
    path: web::Path<String>,
    payload: web::Json<UpdateArticleRequest>,
) -> ApiResult<web::Json<Article>> {
    let id = parse_id(&path, NOT_FOUND)?;
    let article = state
        .articles_admin
        .update(id, payload.into_inner().into())
        .await?;
    Ok(web::Json(article))
}

/// Delete an article permanently.
#[utoipa::path(
    delete,
    path = "/api/admin/articles/{id}",
    params(("id" = String, Path, description = "Article id")),
    responses(
        (status = 200, description = "Article deleted", body = MessageResponse),
        (status = 404, description = "Unknown article", body = Error)
    ),
    tags = ["admin"],
    operation_id = "deleteArticle"
)]
pub async fn delete_article(
    state: web::Data<HttpState>,
    _admin: AdminSession,
    path: web::Path<String>,
) -> ApiResult<web::Json<MessageResponse>> {
    let id = parse_id(&path, NOT_FOUND)?;
    state.articles_admin.delete(id).await?;
    Ok(web::Json(MessageResponse::new("Article deleted")))
}

/// Register article routes relative to the `/api` scope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/articles")
            .route(web::get().to(list_articles))
            .default_service(web::to(method_not_allowed)),
    )
    .service(
        web::resource("/articles/{id}")
            .route(web::get().to(get_article))
            .default_service(web::to(method_not_allowed)),
    )
    .service(
        web::resource("/admin/articles")
            .route(web::get().to(admin_list_articles))
            .route(web::post().to(create_article))
            .default_service(web::to(method_not_allowed)),
    )
    .service(
        web::resource("/admin/articles/{id}")
            .route(web::get().to(admin_get_article))
            .route(web::put().to(update_article))
            .route(web::delete().to(delete_article))
            .default_service(web::to(method_not_allowed)),
    );
}
