//! Handler tests for account and session endpoints.

use std::sync::Arc;

use actix_web::cookie::time::Duration as CookieDuration;
use actix_web::http::{StatusCode, header};
use actix_web::{App, test as actix_test, web};
use mockable::DefaultClock;
use rstest::{fixture, rstest};
use serde_json::{Value, json};

use super::*;
use crate::domain::ports::{MockUserRepository, UserPersistenceError};
use crate::inbound::http::configure_api;
use crate::inbound::http::state::HttpStatePorts;
use crate::outbound::security::BcryptPasswordHasher;
use crate::test_support::{
    TEST_BCRYPT_COST, in_memory_state, session_cookie, session_cookie_for, state_with_ports,
};

#[fixture]
fn state() -> HttpState {
    in_memory_state(Arc::new(DefaultClock))
}

macro_rules! app {
    ($state:expr) => {
        actix_test::init_service(
            App::new()
                .app_data(web::Data::new($state))
                .configure(configure_api),
        )
        .await
    };
}

fn credentials(username: &str, password: &str, redirect_to: Option<&str>) -> Value {
    json!({ "username": username, "password": password, "redirectTo": redirect_to })
}

fn location<B>(res: &actix_web::dev::ServiceResponse<B>) -> Option<String> {
    res.headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
}

#[rstest]
#[actix_web::test]
async fn register_starts_a_session_and_redirects(state: HttpState) {
    let app = app!(state);
    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/register")
            .set_json(credentials("kody", "twixrox", Some("/jokes/new")))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res).as_deref(), Some("/jokes/new"));
    let cookie = session_cookie(&res).expect("session cookie");

    let me = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/users/me")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(me.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(me).await;
    assert_eq!(body["username"], "kody");
    assert!(body.get("passwordHash").is_none());
    assert!(body.get("createdAt").is_some());
}

#[rstest]
#[case(None, "/jokes")]
#[case(Some("//evil.example/phish"), "/jokes")]
#[case(Some("https://evil.example"), "/jokes")]
#[case(Some("/jokes/abc"), "/jokes/abc")]
#[actix_web::test]
async fn register_only_follows_local_redirects(
    state: HttpState,
    #[case] redirect_to: Option<&str>,
    #[case] expected: &str,
) {
    let app = app!(state);
    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/register")
            .set_json(credentials("kody", "twixrox", redirect_to))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res).as_deref(), Some(expected));
}

#[rstest]
#[actix_web::test]
async fn duplicate_registration_is_a_conflict_on_username(state: HttpState) {
    let app = app!(state);
    for expected in [StatusCode::SEE_OTHER, StatusCode::CONFLICT] {
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/register")
                .set_json(credentials("kody", "twixrox", None))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), expected);
        if expected == StatusCode::CONFLICT {
            assert!(session_cookie(&res).is_none());
            let body: Value = actix_test::read_body_json(res).await;
            assert_eq!(body["code"], "conflict");
            assert_eq!(
                body["details"]["fieldErrors"]["username"],
                "User with username kody already exists"
            );
            assert_eq!(body["details"]["fields"]["username"], "kody");
        }
    }
}

#[rstest]
#[case("   ", "twixrox", "username")]
#[case("kody", "", "password")]
#[actix_web::test]
async fn blank_credentials_are_rejected(
    state: HttpState,
    #[case] username: &str,
    #[case] password: &str,
    #[case] field: &str,
) {
    let app = app!(state);
    for uri in ["/api/v1/register", "/api/v1/login"] {
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri(uri)
                .set_json(credentials(username, password, None))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "{uri}");
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["code"], "invalid_request");
        assert!(body["details"]["fieldErrors"][field].is_string(), "{uri}");
        assert!(body["details"]["fields"].get("password").is_none());
    }
}

#[rstest]
#[actix_web::test]
async fn login_round_trip_and_wrong_password(state: HttpState) {
    let app = app!(state);
    let registered = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/register")
            .set_json(credentials("kody", "twixrox", None))
            .to_request(),
    )
    .await;
    assert_eq!(registered.status(), StatusCode::SEE_OTHER);

    let ok = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(credentials("kody", "twixrox", Some("/jokes/new")))
            .to_request(),
    )
    .await;
    assert_eq!(ok.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&ok).as_deref(), Some("/jokes/new"));
    let cookie = session_cookie(&ok).expect("session cookie");
    assert_eq!(cookie.http_only(), Some(true));
    assert_eq!(cookie.max_age(), Some(CookieDuration::days(30)));

    for (username, password) in [("kody", "wrong"), ("nobody", "twixrox")] {
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/login")
                .set_json(credentials(username, password, None))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert!(session_cookie(&res).is_none());
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["message"], "invalid credentials");
    }
}

#[rstest]
#[actix_web::test]
async fn logout_discards_the_cookie(state: HttpState) {
    let cookie = session_cookie_for(&state.session, &UserId::random());
    let app = app!(state);
    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/logout")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res).as_deref(), Some("/login"));
    let discarded = session_cookie(&res).expect("discard cookie");
    assert_eq!(discarded.value(), "");
    assert_eq!(discarded.max_age(), Some(CookieDuration::ZERO));
}

#[rstest]
#[actix_web::test]
async fn current_user_requires_a_session(state: HttpState) {
    let app = app!(state);
    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get().uri("/api/v1/users/me").to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["code"], "unauthorized");
    assert_eq!(body["message"], "authentication required");
}

#[rstest]
#[actix_web::test]
async fn session_for_a_vanished_user_forces_logout(state: HttpState) {
    let cookie = session_cookie_for(&state.session, &UserId::random());
    let app = app!(state);
    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/users/me")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res).as_deref(), Some("/login"));
    let discarded = session_cookie(&res).expect("discard cookie");
    assert_eq!(discarded.max_age(), Some(CookieDuration::ZERO));
}

#[rstest]
#[actix_web::test]
async fn unreachable_user_store_is_service_unavailable() {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_username()
        .returning(|_| Err(UserPersistenceError::connection("connection refused")));
    let clock = Arc::new(DefaultClock);
    let ports = HttpStatePorts::from_repositories(
        Arc::new(users),
        Arc::new(crate::outbound::memory::InMemoryJokeRepository::new(
            clock.clone(),
        )),
        Arc::new(BcryptPasswordHasher::new(TEST_BCRYPT_COST)),
    );
    let app = app!(state_with_ports(ports, clock));

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(credentials("kody", "twixrox", None))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["code"], "service_unavailable");
    let message = body["message"].as_str().expect("message string");
    assert!(!message.contains("connection refused"), "leaked: {message}");
}
