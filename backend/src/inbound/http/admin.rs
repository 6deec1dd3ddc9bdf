//! Admin authentication, profile and dashboard handlers.
//!
//! ```text
//! POST /api/admin/login              {"email":"editor@example.com","password":"..."}
//! POST /api/admin/login-code         {"email":"editor@example.com"}
//! POST /api/admin/login-code/verify  {"email":"editor@example.com","code":"123456"}
//! POST /api/admin/logout
//! GET  /api/admin/profile
//! PUT  /api/admin/profile
//! GET  /api/admin/stats
//! ```

use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;
use zeroize::Zeroizing;

use crate::domain::ports::LoginCredentials;
use crate::domain::{AdminProfile, AdminProfilePatch, DashboardStats, Error, Patch};
use crate::inbound::http::ApiResult;
use crate::inbound::http::articles::MessageResponse;
use crate::inbound::http::error::method_not_allowed;
use crate::inbound::http::session::{AdminSession, SessionContext};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::parse_email;

/// Request body for `POST /api/admin/login`.
#[derive(Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    #[schema(format = Password)]
    pub password: String,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = Error;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            email: parse_email(&value.email)?,
            password: Zeroizing::new(value.password),
        })
    }
}

/// Request body for `POST /api/admin/login-code`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct LoginCodeRequest {
    pub email: String,
}

/// Request body for `POST /api/admin/login-code/verify`.
#[derive(Deserialize, ToSchema)]
pub struct VerifyLoginCodeRequest {
    pub email: String,
    #[schema(example = "042917")]
    pub code: String,
}

/// Request body for `PUT /api/admin/profile`.
#[derive(Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub name: Patch<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub email: Patch<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>, format = Password)]
    pub password: Patch<String>,
}

impl From<UpdateProfileRequest> for AdminProfilePatch {
    fn from(value: UpdateProfileRequest) -> Self {
        Self {
            name: value.name,
            email: value.email,
            password: value.password.map(Zeroizing::new),
        }
    }
}

fn signed_in(session: &SessionContext, profile: AdminProfile) -> ApiResult<HttpResponse> {
    session.persist_admin(profile.id)?;
    info!(admin_id = %profile.id, "admin signed in");
    Ok(HttpResponse::Ok().json(profile))
}

/// Sign in with email and password.
#[utoipa::path(
    post,
    path = "/api/admin/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", body = AdminProfile,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let credentials = LoginCredentials::try_from(payload.into_inner())?;
    let profile = state.login.login(&credentials).await?;
    signed_in(&session, profile)
}

/// Mail a one-time login code. Unknown addresses get the same answer.
#[utoipa::path(
    post,
    path = "/api/admin/login-code",
    request_body = LoginCodeRequest,
    responses(
        (status = 202, description = "Login code sent", body = MessageResponse),
        (status = 400, description = "Invalid email", body = Error)
    ),
    tags = ["auth"],
    operation_id = "requestLoginCode",
    security([])
)]
pub async fn request_login_code(
    state: web::Data<HttpState>,
    payload: web::Json<LoginCodeRequest>,
) -> ApiResult<HttpResponse> {
    let email = parse_email(&payload.email)?;
    state.login.request_login_code(&email).await?;
    Ok(HttpResponse::Accepted().json(MessageResponse::new("Login code sent")))
}

/// Exchange a mailed login code for a session.
#[utoipa::path(
    post,
    path = "/api/admin/login-code/verify",
    request_body = VerifyLoginCodeRequest,
    responses(
        (status = 200, description = "Signed in", body = AdminProfile,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 401, description = "Invalid or expired code", body = Error)
    ),
    tags = ["auth"],
    operation_id = "verifyLoginCode",
    security([])
)]
pub async fn verify_login_code(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<VerifyLoginCodeRequest>,
) -> ApiResult<HttpResponse> {
    let VerifyLoginCodeRequest { email, code } = payload.into_inner();
    let code = Zeroizing::new(code);
    let email = parse_email(&email)?;
    let profile = state.login.verify_login_code(&email, code.trim()).await?;
    signed_in(&session, profile)
}

/// End the admin session.
#[utoipa::path(
    post,
    path = "/api/admin/logout",
    responses((status = 204, description = "Signed out")),
    tags = ["auth"],
    operation_id = "logout",
    security([])
)]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.end();
    HttpResponse::NoContent().finish()
}

/// The signed-in admin's profile.
#[utoipa::path(
    get,
    path = "/api/admin/profile",
    responses(
        (status = 200, description = "Profile", body = AdminProfile),
        (status = 401, description = "Admin session required", body = Error)
    ),
    tags = ["admin"],
    operation_id = "getProfile"
)]
pub async fn get_profile(
    state: web::Data<HttpState>,
    admin: AdminSession,
) -> ApiResult<web::Json<AdminProfile>> {
    Ok(web::Json(state.profile.profile(admin.admin_id).await?))
}

/// Merge a sparse update into the signed-in admin's profile.
#[utoipa::path(
    put,
    path = "/api/admin/profile",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Merged profile", body = AdminProfile),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Admin session required", body = Error),
        (status = 409, description = "Email already in use", body = Error)
    ),
    tags = ["admin"],
    operation_id = "updateProfile"
)]
pub async fn update_profile(
    state: web::Data<HttpState>,
    admin: AdminSession,
    payload: web::Json<UpdateProfileRequest>,
) -> ApiResult<web::Json<AdminProfile>> {
    let profile = state
        .profile_admin
        .update_profile(admin.admin_id, payload.into_inner().into())
        .await?;
    Ok(web::Json(profile))
}

/// Dashboard totals.
#[utoipa::path(
    get,
    path = "/api/admin/stats",
    responses(
        (status = 200, description = "Dashboard totals", body = DashboardStats),
        (status = 401, description = "Admin session required", body = Error)
    ),
    tags = ["admin"],
    operation_id = "getStats"
)]
pub async fn get_stats(
    state: web::Data<HttpState>,
    _admin: AdminSession,
) -> ApiResult<web::Json<DashboardStats>> {
    Ok(web::Json(state.stats.stats().await?))
}

/// Register admin routes relative to the `/api` scope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/admin/login")
            .route(web::post().to(login))
            .default_service(web::to(method_not_allowed)),
    )
    .service(
        web::resource("/admin/login-code")
            .route(web::post().to(request_login_code))
            .default_service(web::to(method_not_allowed)),
    )
    .service(
        web::resource("/admin/login-code/verify")
            .route(web::post().to(verify_login_code))
            .default_service(web::to(method_not_allowed)),
    )
    .service(
        web::resource("/admin/logout")
            .route(web::post().to(logout))
            .default_service(web::to(method_not_allowed)),
    )
    .service(
        web::resource("/admin/profile")
            .route(web::get().to(get_profile))
            .route(web::put().to(update_profile))
            .default_service(web::to(method_not_allowed)),
    )
    .service(
        web::resource("/admin/stats")
            .route(web::get().to(get_stats))
            .default_service(web::to(method_not_allowed)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EmailAddress;
    use crate::domain::ports::{MockAdminProfileQuery, MockLoginService};
    use crate::inbound::http::test_utils::{TEST_ADMIN_ID, TestPorts, admin_cookie, test_app};
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use rstest::rstest;
    use serde_json::{Value, json};

    fn profile() -> AdminProfile {
        AdminProfile {
            id: TEST_ADMIN_ID,
            name: "Editor".to_owned(),
            email: EmailAddress::parse("editor@example.com").expect("valid email"),
        }
    }

    #[rstest]
    fn profile_request_wraps_password() {
        let request: UpdateProfileRequest =
            serde_json::from_value(json!({ "password": "longenough", "name": null }))
                .expect("valid body");
        let patch = AdminProfilePatch::from(request);

        assert_eq!(patch.name, Patch::Clear);
        assert!(patch.email.is_absent());
        assert!(matches!(patch.password, Patch::Set(ref secret) if secret.as_str() == "longenough"));
    }

    #[actix_web::test]
    async fn login_sets_a_session_that_unlocks_admin_routes() {
        let mut login = MockLoginService::new();
        login
            .expect_login()
            .withf(|credentials| {
                credentials.email.as_str() == "editor@example.com"
                    && credentials.password.as_str() == "correct horse"
            })
            .times(1)
            .returning(|_| Ok(profile()));
        let mut query = MockAdminProfileQuery::new();
        query
            .expect_profile()
            .withf(|id| *id == TEST_ADMIN_ID)
            .times(1)
            .returning(|_| Ok(profile()));
        let app = actix_test::init_service(test_app(TestPorts {
            login,
            profile: query,
            ..TestPorts::default()
        }))
        .await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/admin/login")
                .set_json(json!({ "email": "Editor@Example.com", "password": "correct horse" }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let cookie = res
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie")
            .into_owned();
        let body: Value = actix_test::read_body_json(res).await;
        assert!(body.get("password").is_none());

        let profile_res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/admin/profile")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(profile_res.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn rejected_login_is_unauthorised() {
        let mut login = MockLoginService::new();
        login
            .expect_login()
            .returning(|_| Err(Error::unauthorized("Invalid email or password")));
        let app = actix_test::init_service(test_app(TestPorts {
            login,
            ..TestPorts::default()
        }))
        .await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/admin/login")
                .set_json(json!({ "email": "editor@example.com", "password": "nope" }))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert!(res.response().cookies().all(|cookie| cookie.name() != "session"));
    }

    #[actix_web::test]
    async fn login_code_request_is_accepted() {
        let mut login = MockLoginService::new();
        login
            .expect_request_login_code()
            .times(1)
            .returning(|_| Ok(()));
        let app = actix_test::init_service(test_app(TestPorts {
            login,
            ..TestPorts::default()
        }))
        .await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/admin/login-code")
                .set_json(json!({ "email": "editor@example.com" }))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::ACCEPTED);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body, json!({ "message": "Login code sent" }));
    }

    #[actix_web::test]
    async fn logout_clears_the_session() {
        let app = actix_test::init_service(test_app(TestPorts::default())).await;
        let cookie = admin_cookie(&app).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/admin/logout")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::NO_CONTENT);
        let cleared = res
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("removal cookie")
            .into_owned();

        let stats = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/admin/stats")
                .cookie(cleared)
                .to_request(),
        )
        .await;
        assert_eq!(stats.status(), StatusCode::UNAUTHORIZED);
    }
}
