//! Static page HTTP handlers.
//!
//! ```text
//! GET /api/pages/{slug}
//! PUT /api/pages/{slug}
//! GET /api/admin/pages
//! ```

use actix_web::web;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, Page, PagePatch, PageSlug, Patch};
use crate::inbound::http::ApiResult;
use crate::inbound::http::error::method_not_allowed;
use crate::inbound::http::session::AdminSession;
use crate::inbound::http::state::HttpState;

const NOT_FOUND: &str = "Page not found";

/// Request body for `PUT /api/pages/{slug}`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePageRequest {
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    #[schema(value_type = Option<String>)]
    pub title: Patch<String>,
    /// Opaque to the server; clients may embed structured JSON as text.
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    #[schema(value_type = Option<String>)]
    pub content: Patch<String>,
}

impl From<UpdatePageRequest> for PagePatch {
    fn from(value: UpdatePageRequest) -> Self {
        Self {
            title: value.title,
            content: value.content,
        }
    }
}

fn parse_slug(raw: &str) -> Result<PageSlug, Error> {
    PageSlug::new(raw).map_err(|_| Error::not_found(NOT_FOUND))
}

/// Fetch a page by slug.
#[utoipa::path(
    get,
    path = "/api/pages/{slug}",
    params(("slug" = String, Path, description = "Page slug, e.g. `about`")),
    responses(
        (status = 200, description = "Page", body = Page),
        (status = 404, description = "Unknown page", body = Error)
    ),
    tags = ["pages"],
    operation_id = "getPage",
    security([])
)]
pub async fn get_page(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Page>> {
    let slug = parse_slug(&path)?;
    Ok(web::Json(state.pages.find(&slug).await?))
}

/// Merge a sparse update into a page.
#[utoipa::path(
    put,
    path = "/api/pages/{slug}",
    params(("slug" = String, Path, description = "Page slug")),
    request_body = UpdatePageRequest,
    responses(
        (status = 200, description = "Merged page", body = Page),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Admin session required", body = Error),
        (status = 404, description = "Unknown page", body = Error)
    ),
    tags = ["pages"],
    operation_id = "updatePage"
)]
pub async fn update_page(
    state: web::Data<HttpState>,
    _admin: AdminSession,
    path: web::Path<String>,
    payload: web::Json<UpdatePageRequest>,
) -> ApiResult<web::Json<Page>> {
    let slug = parse_slug(&path)?;
    let page = state
        .pages_admin
        .update(&slug, payload.into_inner().into())
        .await?;
    Ok(web::Json(page))
}

/// List every page.
#[utoipa::path(
    get,
    path = "/api/admin/pages",
    responses(
        (status = 200, description = "Pages", body = [Page]),
        (status = 401, description = "Admin session required", body = Error)
    ),
    tags = ["admin"],
    operation_id = "adminListPages"
)]
pub async fn admin_list_pages(
    state: web::Data<HttpState>,
    _admin: AdminSession,
) -> ApiResult<web::Json<Vec<Page>>> {
    Ok(web::Json(state.pages.list().await?))
}

/// Register page routes relative to the `/api` scope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/pages/{slug}")
            .route(web::get().to(get_page))
            .route(web::put().to(update_page))
            .default_service(web::to(method_not_allowed)),
    )
    .service(
        web::resource("/admin/pages")
            .route(web::get().to(admin_list_pages))
            .default_service(web::to(method_not_allowed)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{MockPagesCommand, MockPagesQuery};
    use crate::inbound::http::test_utils::{TestPorts, admin_cookie, test_app};
    use actix_web::http::StatusCode;
    use actix_web::test;
    use chrono::Utc;
    use serde_json::{Value, json};

    fn about() -> Page {
        Page {
            slug: PageSlug::new("about").expect("valid slug"),
            title: "About".to_owned(),
            content: r#"{"mission":"Voices of the terraces"}"#.to_owned(),
            updated_at: Utc::now(),
        }
    }

    #[actix_web::test]
    async fn public_get_returns_page() {
        let mut query = MockPagesQuery::new();
        query
            .expect_find()
            .withf(|slug| slug.as_str() == "about")
            .returning(|_| Ok(about()));
        let app = test::init_service(test_app(TestPorts {
            pages: query,
            ..TestPorts::default()
        }))
        .await;

        let res =
            test::call_service(&app, test::TestRequest::get().uri("/api/pages/about").to_request())
                .await;

        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["title"], json!("About"));
        assert!(body.get("updatedAt").is_some());
    }

    #[actix_web::test]
    async fn invalid_slug_is_not_found() {
        let app = test::init_service(test_app(TestPorts::default())).await;

        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/api/pages/About%20Us").to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn update_forwards_only_supplied_fields() {
        let mut command = MockPagesCommand::new();
        command
            .expect_update()
            .withf(|slug, patch| {
                slug.as_str() == "about"
                    && patch.title.is_absent()
                    && patch.content == Patch::Set("new".to_owned())
            })
            .times(1)
            .returning(|_, _| Ok(about()));
        let app = test::init_service(test_app(TestPorts {
            pages_admin: command,
            ..TestPorts::default()
        }))
        .await;
        let cookie = admin_cookie(&app).await;

        let res = test::call_service(
            &app,
            test::TestRequest::put()
                .uri("/api/pages/about")
                .cookie(cookie)
                .set_json(json!({ "content": "new" }))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn update_without_session_is_unauthorised() {
        let app = test::init_service(test_app(TestPorts::default())).await;

        let res = test::call_service(
            &app,
            test::TestRequest::put()
                .uri("/api/pages/about")
                .set_json(json!({ "title": "x" }))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
}
