//! Cross-cutting HTTP behaviour: CORS, method handling, sessions, login flows.

mod support;

use actix_web::http::{Method, StatusCode, header};
use actix_web::test;
use chrono::Duration;
use rstest::rstest;
use serde_json::{Value, json};

use footballvoice::domain::MAX_LOGIN_CODE_ATTEMPTS;
use support::{
    ADMIN_EMAIL, ADMIN_NAME, CODE_TTL_SECS, Harness, send_json, session_cookie, sign_in,
};

#[rstest]
#[case("/api/articles")]
#[case("/api/admin/articles")]
#[case("/some/unrouted/path")]
#[actix_web::test]
async fn preflight_is_answered_everywhere(#[case] path: &str) {
    let harness = Harness::new().await;
    let app = test::init_service(harness.app()).await;

    let res = test::call_service(
        &app,
        test::TestRequest::default()
            .method(Method::OPTIONS)
            .uri(path)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    let headers = res.headers();
    assert_eq!(
        headers
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|value| value.to_str().ok()),
        Some("*")
    );
    assert_eq!(
        headers
            .get(header::ACCESS_CONTROL_ALLOW_METHODS)
            .and_then(|value| value.to_str().ok()),
        Some("GET,POST,PUT,DELETE,OPTIONS")
    );
    assert_eq!(
        headers
            .get(header::ACCESS_CONTROL_ALLOW_HEADERS)
            .and_then(|value| value.to_str().ok()),
        Some("Content-Type, Authorization")
    );
}

#[rstest]
#[case(Method::PATCH, "/api/articles")]
#[case(Method::DELETE, "/api/subscribers")]
#[case(Method::GET, "/api/admin/login")]
#[actix_web::test]
async fn unsupported_methods_name_the_method(#[case] method: Method, #[case] path: &str) {
    let harness = Harness::new().await;
    let app = test::init_service(harness.app()).await;

    let res = test::call_service(
        &app,
        test::TestRequest::default()
            .method(method.clone())
            .uri(path)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert!(res.headers().contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["error"], json!(format!("Method {method} Not Allowed")));
}

#[rstest]
#[case("/api/admin/articles")]
#[case("/api/admin/subscribers")]
#[case("/api/admin/notifications")]
#[case("/api/admin/profile")]
#[case("/api/admin/stats")]
#[actix_web::test]
async fn admin_routes_need_a_session(#[case] path: &str) {
    let harness = Harness::new().await;
    let app = test::init_service(harness.app()).await;

    let res = test::call_service(&app, test::TestRequest::get().uri(path).to_request()).await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let trace_id = res
        .headers()
        .get("trace-id")
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
        .expect("trace id header");
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["code"], json!("unauthorized"));
    assert_eq!(body["traceId"], json!(trace_id));
}

#[actix_web::test]
async fn password_login_opens_the_admin_area() {
    let harness = Harness::new().await;
    let app = test::init_service(harness.app()).await;
    let cookie = sign_in(&app).await;

    let (status, profile) = send_json(
        &app,
        test::TestRequest::get()
            .uri("/api/admin/profile")
            .cookie(cookie.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["name"], json!(ADMIN_NAME));
    assert_eq!(profile["email"], json!(ADMIN_EMAIL));
    assert!(profile.get("password").is_none());

    let (status, stats) = send_json(
        &app,
        test::TestRequest::get().uri("/api/admin/stats").cookie(cookie),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["totalArticles"], json!(0));
    assert_eq!(stats["activeSubscribers"], json!(0));
}

#[rstest]
#[case(json!({ "email": ADMIN_EMAIL, "password": "wrong" }))]
#[case(json!({ "email": "nobody@footballvoice.test", "password": "offside-trap-42" }))]
#[actix_web::test]
async fn bad_credentials_are_rejected(#[case] body: Value) {
    let harness = Harness::new().await;
    let app = test::init_service(harness.app()).await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/admin/login")
            .set_json(body)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert!(session_cookie(&res).is_none());
}

async fn request_code<S, B>(app: &S, harness: &Harness) -> String
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse<B>,
            Error = actix_web::Error,
        >,
    B: actix_web::body::MessageBody,
{
    let (status, body) = send_json(
        app,
        test::TestRequest::post()
            .uri("/api/admin/login-code")
            .set_json(json!({ "email": ADMIN_EMAIL })),
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body, json!({ "message": "Login code sent" }));
    harness.mailer.last_login_code().expect("login code mailed")
}

fn verify(code: &str) -> test::TestRequest {
    test::TestRequest::post()
        .uri("/api/admin/login-code/verify")
        .set_json(json!({ "email": ADMIN_EMAIL, "code": code }))
}

#[actix_web::test]
async fn login_code_signs_in_once() {
    let harness = Harness::new().await;
    let app = test::init_service(harness.app()).await;
    let code = request_code(&app, &harness).await;
    assert_eq!(code.len(), 6);

    let res = test::call_service(&app, verify(&code).to_request()).await;
    assert_eq!(res.status(), StatusCode::OK);
    let cookie = session_cookie(&res).expect("session cookie");
    let (status, _) = send_json(
        &app,
        test::TestRequest::get().uri("/api/admin/profile").cookie(cookie),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send_json(&app, verify(&code)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[rstest]
#[case::single_slip(1, StatusCode::OK)]
#[case::one_before_lockout(MAX_LOGIN_CODE_ATTEMPTS - 1, StatusCode::OK)]
#[case::locked_out(MAX_LOGIN_CODE_ATTEMPTS, StatusCode::UNAUTHORIZED)]
#[actix_web::test]
async fn wrong_codes_lock_the_pending_code(#[case] misses: u32, #[case] expected: StatusCode) {
    let harness = Harness::new().await;
    let app = test::init_service(harness.app()).await;
    let code = request_code(&app, &harness).await;
    let wrong = if code == "000000" { "111111" } else { "000000" };

    for _ in 0..misses {
        let (status, _) = send_json(&app, verify(wrong)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    let (status, _) = send_json(&app, verify(&code)).await;
    assert_eq!(status, expected);
}

#[actix_web::test]
async fn guessing_every_code_never_signs_in() {
    let harness = Harness::new().await;
    let app = test::init_service(harness.app()).await;
    let code = request_code(&app, &harness).await;

    let mut accepted = 0;
    for guess in (0..1000).map(|n| format!("{n:06}")).filter(|guess| *guess != code) {
        let (status, _) = send_json(&app, verify(&guess)).await;
        if status.is_success() {
            accepted += 1;
        }
    }
    let (status, _) = send_json(&app, verify(&code)).await;

    assert_eq!(accepted, 0);
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn expired_code_is_rejected() {
    let harness = Harness::new().await;
    let app = test::init_service(harness.app()).await;
    let code = request_code(&app, &harness).await;

    harness.clock.advance(Duration::seconds(CODE_TTL_SECS + 1));

    let (status, body) = send_json(&app, verify(&code)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], json!("unauthorized"));
}

#[actix_web::test]
async fn unknown_email_gets_no_code() {
    let harness = Harness::new().await;
    let app = test::init_service(harness.app()).await;

    let (status, _) = send_json(
        &app,
        test::TestRequest::post()
            .uri("/api/admin/login-code")
            .set_json(json!({ "email": "stranger@example.com" })),
    )
    .await;

    assert_eq!(status, StatusCode::ACCEPTED);
    assert!(harness.mailer.sent().is_empty());
}

#[actix_web::test]
async fn logout_removes_the_session_cookie() {
    let harness = Harness::new().await;
    let app = test::init_service(harness.app()).await;
    let cookie = sign_in(&app).await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/admin/logout")
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    let removal = session_cookie(&res).expect("removal cookie");
    assert!(removal.value().is_empty());
}

#[actix_web::test]
async fn profile_update_changes_the_login_password() {
    let harness = Harness::new().await;
    let app = test::init_service(harness.app()).await;
    let cookie = sign_in(&app).await;

    let (status, profile) = send_json(
        &app,
        test::TestRequest::put()
            .uri("/api/admin/profile")
            .cookie(cookie)
            .set_json(json!({ "name": "Chief Editor", "password": "false-nine-99" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["name"], json!("Chief Editor"));
    assert_eq!(profile["id"], json!(harness.admin.id));

    let (status, _) = send_json(
        &app,
        test::TestRequest::post()
            .uri("/api/admin/login")
            .set_json(json!({ "email": ADMIN_EMAIL, "password": "false-nine-99" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[actix_web::test]
async fn seeded_pages_are_public_and_editable() {
    let harness = Harness::new().await;
    let app = test::init_service(harness.app()).await;

    let (status, page) = send_json(&app, test::TestRequest::get().uri("/api/pages/about")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["slug"], json!("about"));
    assert_eq!(page["title"], json!("About"));

    let cookie = sign_in(&app).await;
    let (status, page) = send_json(
        &app,
        test::TestRequest::put()
            .uri("/api/pages/about")
            .cookie(cookie.clone())
            .set_json(json!({ "content": "{\"mission\":\"Honest football writing\"}" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["title"], json!("About"));
    assert_eq!(
        page["content"],
        json!("{\"mission\":\"Honest football writing\"}")
    );

    let (status, body) = send_json(
        &app,
        test::TestRequest::put()
            .uri("/api/pages/careers")
            .cookie(cookie)
            .set_json(json!({ "title": "Careers" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], json!("Page not found"));
}

#[actix_web::test]
async fn health_probes_sit_outside_the_api_scope() {
    let harness = Harness::new().await;
    let app = test::init_service(harness.app()).await;
    let probe = |path: &'static str| test::TestRequest::get().uri(path).to_request();

    assert_eq!(test::call_service(&app, probe("/health/ready")).await.status(), StatusCode::OK);
    assert_eq!(test::call_service(&app, probe("/health/live")).await.status(), StatusCode::OK);
    assert_eq!(
        test::call_service(&app, probe("/api/health/live")).await.status(),
        StatusCode::NOT_FOUND
    );

    harness.health.mark_unhealthy();
    assert_eq!(
        test::call_service(&app, probe("/health/live")).await.status(),
        StatusCode::SERVICE_UNAVAILABLE
    );
}
