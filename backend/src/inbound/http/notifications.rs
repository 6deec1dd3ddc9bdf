//! Notification log and newsletter HTTP handlers.
//!
//! ```text
//! GET  /api/admin/notifications
//! POST /api/admin/notifications
//! POST /api/admin/newsletters
//! ```

use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{NewsletterReceipt, NewsletterRequest};
use crate::domain::{Error, NewNotification, Notification};
use crate::inbound::http::ApiResult;
use crate::inbound::http::error::method_not_allowed;
use crate::inbound::http::session::AdminSession;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::parse_email;

/// Request body for `POST /api/admin/notifications`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AppendNotificationRequest {
    pub user_email: String,
    pub message: String,
}

impl TryFrom<AppendNotificationRequest> for NewNotification {
    type Error = Error;

    fn try_from(value: AppendNotificationRequest) -> Result<Self, Self::Error> {
        Self::new(parse_email(&value.user_email)?, value.message)
    }
}

/// List sent notifications, newest first.
#[utoipa::path(
    get,
    path = "/api/admin/notifications",
    responses(
        (status = 200, description = "Notifications", body = [Notification]),
        (status = 401, description = "Admin session required", body = Error)
    ),
    tags = ["admin"],
    operation_id = "listNotifications"
)]
pub async fn list_notifications(
    state: web::Data<HttpState>,
    _admin: AdminSession,
) -> ApiResult<web::Json<Vec<Notification>>> {
    Ok(web::Json(state.notifications_query.list().await?))
}

/// Record a notification.
#[utoipa::path(
    post,
    path = "/api/admin/notifications",
    request_body = AppendNotificationRequest,
    responses(
        (status = 201, description = "Recorded notification", body = Notification),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Admin session required", body = Error)
    ),
    tags = ["admin"],
    operation_id = "appendNotification"
)]
pub async fn append_notification(
    state: web::Data<HttpState>,
    _admin: AdminSession,
    payload: web::Json<AppendNotificationRequest>,
) -> ApiResult<HttpResponse> {
    let notification = NewNotification::try_from(payload.into_inner())?;
    let stored = state.notifications.append(notification).await?;
    Ok(HttpResponse::Created().json(stored))
}

/// Mail a newsletter to every active subscriber who wants it.
#[utoipa::path(
    post,
    path = "/api/admin/newsletters",
    request_body = NewsletterRequest,
    responses(
        (status = 200, description = "Delivery summary", body = NewsletterReceipt),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Admin session required", body = Error)
    ),
    tags = ["admin"],
    operation_id = "sendNewsletter"
)]
pub async fn send_newsletter(
    state: web::Data<HttpState>,
    _admin: AdminSession,
    payload: web::Json<NewsletterRequest>,
) -> ApiResult<web::Json<NewsletterReceipt>> {
    Ok(web::Json(
        state.newsletters.send(payload.into_inner()).await?,
    ))
}

/// Register notification routes relative to the `/api` scope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/admin/notifications")
            .route(web::get().to(list_notifications))
            .route(web::post().to(append_notification))
            .default_service(web::to(method_not_allowed)),
    )
    .service(
        web::resource("/admin/newsletters")
            .route(web::post().to(send_newsletter))
            .default_service(web::to(method_not_allowed)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{MockNewsletterCommand, MockNotificationsCommand};
    use crate::domain::Category;
    use crate::inbound::http::test_utils::{TestPorts, admin_cookie, test_app};
    use actix_web::http::StatusCode;
    use actix_web::test;
    use chrono::Utc;
    use serde_json::{Value, json};
    use uuid::Uuid;

    #[actix_web::test]
    async fn append_returns_created_notification() {
        let mut command = MockNotificationsCommand::new();
        command
            .expect_append()
            .withf(|notification| notification.user_email.as_str() == "a@x.com")
            .times(1)
            .returning(|notification| Ok(notification.into_notification(Uuid::nil(), Utc::now())));
        let app = test::init_service(test_app(TestPorts {
            notifications: command,
            ..TestPorts::default()
        }))
        .await;
        let cookie = admin_cookie(&app).await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/admin/notifications")
                .cookie(cookie)
                .set_json(json!({ "userEmail": "A@x.com", "message": "Kick-off moved" }))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["userEmail"], json!("a@x.com"));
        assert!(body.get("sentAt").is_some());
    }

    #[actix_web::test]
    async fn newsletter_reports_recipient_count() {
        let mut command = MockNewsletterCommand::new();
        command
            .expect_send()
            .withf(|request| request.category == Some(Category::Predictions))
            .times(1)
            .returning(|_| {
                Ok(NewsletterReceipt {
                    recipients: 3,
                    failed: 0,
                    unlogged: 0,
                })
            });
        let app = test::init_service(test_app(TestPorts {
            newsletters: command,
            ..TestPorts::default()
        }))
        .await;
        let cookie = admin_cookie(&app).await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/admin/newsletters")
                .cookie(cookie)
                .set_json(json!({
                    "subject": "Derby preview",
                    "body": "Our picks",
                    "category": "predictions"
                }))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body, json!({ "recipients": 3, "failed": 0, "unlogged": 0 }));
    }
}
