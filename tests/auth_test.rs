/// Integration tests for signup, login, logout and the flat pages.
mod common;

use actix_web::http::{header, StatusCode};
use actix_web::test;

use blog_service::db::user_repo;

use crate::common::*;

fn location(resp: &actix_web::dev::ServiceResponse) -> String {
    resp.headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string()
}

#[actix_web::test]
async fn signup_creates_user_and_redirects_to_login() {
    let pool = create_test_pool().await;
    let app = setup_test_app(pool.clone(), test_config("media")).await;

    let req = test::TestRequest::post()
        .uri("/auth/signup/")
        .set_form([("username", "leo"), ("password", TEST_PASSWORD)])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/auth/login/");

    let user = user_repo::find_by_username(&pool, "leo")
        .await
        .unwrap()
        .expect("user created");
    // Stored as a hash, never the raw password
    assert_ne!(user.password_hash, TEST_PASSWORD);
}

#[actix_web::test]
async fn signup_rejects_taken_username() {
    let pool = create_test_pool().await;
    create_test_user(&pool, "leo").await;
    let app = setup_test_app(pool.clone(), test_config("media")).await;

    let req = test::TestRequest::post()
        .uri("/auth/signup/")
        .set_form([("username", "leo"), ("password", TEST_PASSWORD)])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(read_html(resp).await.contains("That username is taken."));
}

#[actix_web::test]
async fn signup_rejects_bad_username_and_short_password() {
    let pool = create_test_pool().await;
    let app = setup_test_app(pool.clone(), test_config("media")).await;

    let req = test::TestRequest::post()
        .uri("/auth/signup/")
        .set_form([("username", "no spaces allowed"), ("password", TEST_PASSWORD)])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(read_html(resp)
        .await
        .contains("Usernames may contain letters, digits"));

    let req = test::TestRequest::post()
        .uri("/auth/signup/")
        .set_form([("username", "leo"), ("password", "ab")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(read_html(resp).await.contains("Password is too short."));

    assert!(user_repo::find_by_username(&pool, "leo")
        .await
        .unwrap()
        .is_none());
}

#[actix_web::test]
async fn login_sets_session_and_unlocks_new_post_page() {
    let pool = create_test_pool().await;
    create_test_user(&pool, "leo").await;
    let app = setup_test_app(pool.clone(), test_config("media")).await;

    let cookie = login(&app, "leo").await;

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/new/")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(read_html(resp).await.contains("form"));
}

#[actix_web::test]
async fn login_honours_next_parameter() {
    let pool = create_test_pool().await;
    create_test_user(&pool, "leo").await;
    let app = setup_test_app(pool.clone(), test_config("media")).await;

    let req = test::TestRequest::post()
        .uri("/auth/login/?next=/new/")
        .set_form([("username", "leo"), ("password", TEST_PASSWORD)])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/new/");

    // An absolute URL is not an open redirect target
    let req = test::TestRequest::post()
        .uri("/auth/login/?next=https://evil.example")
        .set_form([("username", "leo"), ("password", TEST_PASSWORD)])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(location(&resp), "/");

    // Neither is a protocol-relative URL
    let req = test::TestRequest::post()
        .uri("/auth/login/?next=//evil.example")
        .set_form([("username", "leo"), ("password", TEST_PASSWORD)])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(location(&resp), "/");
}

#[actix_web::test]
async fn login_rejects_wrong_password() {
    let pool = create_test_pool().await;
    create_test_user(&pool, "leo").await;
    let app = setup_test_app(pool.clone(), test_config("media")).await;

    let req = test::TestRequest::post()
        .uri("/auth/login/")
        .set_form([("username", "leo"), ("password", "not-the-password")])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(read_html(resp)
        .await
        .contains("Invalid username or password."));
}

#[actix_web::test]
async fn logout_clears_the_session() {
    let pool = create_test_pool().await;
    create_test_user(&pool, "leo").await;
    let app = setup_test_app(pool.clone(), test_config("media")).await;

    let cookie = login(&app, "leo").await;

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/auth/logout/")
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/");

    // The purged cookie from the logout response no longer authenticates
    let purged = resp
        .response()
        .cookies()
        .find(|c| c.name() == "id")
        .map(|c| c.into_owned());
    let mut req = test::TestRequest::get().uri("/new/");
    if let Some(c) = purged {
        req = req.cookie(c);
    }
    let resp = test::call_service(&app, req.to_request()).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert!(location(&resp).starts_with("/auth/login/"));
}

#[actix_web::test]
async fn flat_pages_render() {
    let pool = create_test_pool().await;
    let app = setup_test_app(pool.clone(), test_config("media")).await;

    for uri in ["/about-us/", "/terms/"] {
        let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK, "GET {uri}");
    }
}

#[actix_web::test]
async fn unknown_route_renders_not_found_page() {
    let pool = create_test_pool().await;
    let app = setup_test_app(pool.clone(), test_config("media")).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/no/such/page/")
            .to_request(),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let html = read_html(resp).await;
    assert!(html.contains("Page not found"));
    assert!(html.contains("/no/such/page/"));
}
