//! Subscriber HTTP handlers.
//!
//! ```text
//! POST   /api/subscribers
//! GET    /api/admin/subscribers
//! PUT    /api/admin/subscribers/{id}
//! DELETE /api/admin/subscribers/{id}
//! ```

use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    Error, NewSubscriber, Patch, Subscriber, SubscriberPatch, SubscriberPreferences, Subscription,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::articles::MessageResponse;
use crate::inbound::http::error::method_not_allowed;
use crate::inbound::http::session::AdminSession;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{parse_email, parse_id};

const NOT_FOUND: &str = "Subscriber not found";
const ALREADY_SUBSCRIBED: &str = "Already subscribed";

/// Request body for `POST /api/subscribers`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubscribeRequest {
    #[schema(example = "fan@example.com")]
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub preferences: SubscriberPreferences,
}

impl TryFrom<SubscribeRequest> for NewSubscriber {
    type Error = Error;

    fn try_from(value: SubscribeRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            email: parse_email(&value.email)?,
            name: value.name,
            preferences: value.preferences,
        })
    }
}

/// Request body for `PUT /api/admin/subscribers/{id}`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSubscriberRequest {
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    #[schema(value_type = Option<String>)]
    pub name: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    #[schema(value_type = Option<bool>)]
    pub active: Patch<bool>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    #[schema(value_type = Option<SubscriberPreferences>)]
    pub preferences: Patch<SubscriberPreferences>,
}

impl From<UpdateSubscriberRequest> for SubscriberPatch {
    fn from(value: UpdateSubscriberRequest) -> Self {
        Self {
            name: value.name,
            active: value.active,
            preferences: value.preferences,
        }
    }
}

/// Subscribe an email address. Repeating the request is harmless.
#[utoipa::path(
    post,
    path = "/api/subscribers",
    request_body = SubscribeRequest,
    responses(
        (status = 201, description = "Subscriber created, or `{message: \"Already subscribed\"}`", body = Subscriber),
        (status = 400, description = "Invalid email", body = Error)
    ),
    tags = ["subscribers"],
    operation_id = "subscribe",
    security([])
)]
pub async fn subscribe(
    state: web::Data<HttpState>,
    payload: web::Json<SubscribeRequest>,
) -> ApiResult<HttpResponse> {
    let subscriber = NewSubscriber::try_from(payload.into_inner())?;
    Ok(match state.subscribers.subscribe(subscriber).await? {
        Subscription::Created(subscriber) => HttpResponse::Created().json(subscriber),
        Subscription::AlreadySubscribed => {
            HttpResponse::Created().json(MessageResponse::new(ALREADY_SUBSCRIBED))
        }
    })
}

/// List subscribers, newest first.
#[utoipa::path(
    get,
    path = "/api/admin/subscribers",
    responses(
        (status = 200, description = "Subscribers", body = [Subscriber]),
        (status = 401, description = "Admin session required", body = Error)
    ),
    tags = ["admin"],
    operation_id = "adminListSubscribers"
)]
pub async fn list_subscribers(
    state: web::Data<HttpState>,
    _admin: AdminSession,
) -> ApiResult<web::Json<Vec<Subscriber>>> {
    Ok(web::Json(state.subscribers_query.list().await?))
}

/// Merge a sparse update into a subscriber.
#[utoipa::path(
    put,
    path = "/api/admin/subscribers/{id}",
    params(("id" = String, Path, description = "Subscriber id")),
    request_body = UpdateSubscriberRequest,
    responses(
        (status = 200, description = "Merged subscriber", body = Subscriber),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Unknown subscriber", body = Error)
    ),
    tags = ["admin"],
    operation_id = "updateSubscriber"
)]
pub async fn update_subscriber(
    state: web::Data<HttpState>,
    _admin: AdminSession,
    path: web::Path<String>,
    payload: web::Json<UpdateSubscriberRequest>,
) -> ApiResult<web::Json<Subscriber>> {
    let id = parse_id(&path, NOT_FOUND)?;
    let subscriber = state
        .subscribers
        .update(id, payload.into_inner().into())
        .await?;
    Ok(web::Json(subscriber))
}

/// Delete a subscriber.
#[utoipa::path(
    delete,
    path = "/api/admin/subscribers/{id}",
    params(("id" = String, Path, description = "Subscriber id")),
    responses(
        (status = 200, description = "Subscriber deleted", body = MessageResponse),
        (status = 404, description = "Unknown subscriber", body = Error)
    ),
    tags = ["admin"],
    operation_id = "deleteSubscriber"
)]
pub async fn delete_subscriber(
    state: web::Data<HttpState>,
    _admin: AdminSession,
    path: web::Path<String>,
) -> ApiResult<web::Json<MessageResponse>> {
    let id = parse_id(&path, NOT_FOUND)?;
    state.subscribers.delete(id).await?;
    Ok(web::Json(MessageResponse::new("Subscriber deleted")))
}

/// Register subscriber routes relative to the `/api` scope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/subscribers")
            .route(web::post().to(subscribe))
            .default_service(web::to(method_not_allowed)),
    )
    .service(
        web::resource("/admin/subscribers")
            .route(web::get().to(list_subscribers))
            .default_service(web::to(method_not_allowed)),
    )
    .service(
        web::resource("/admin/subscribers/{id}")
            .route(web::put().to(update_subscriber))
            .route(web::delete().to(delete_subscriber))
            .default_service(web::to(method_not_allowed)),
    );
}
