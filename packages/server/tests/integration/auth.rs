use serde_json::json;

use crate::common::{TestApp, routes};

#[tokio::test]
async fn register_then_login_issues_a_token() {
    let app = TestApp::spawn().await;

    let body = json!({ "username": "shopper", "password": "pass12345" });
    let reg = app.post_without_token(routes::REGISTER, &body).await;
    assert_eq!(reg.status, 201, "{}", reg.text);
    assert_eq!(reg.body["user"]["role"].as_str().unwrap(), "customer");

    let login = app.post_without_token(routes::LOGIN, &body).await;
    assert_eq!(login.status, 200, "{}", login.text);
    assert!(login.body["token"].as_str().is_some());
    assert_eq!(login.body["role"].as_str().unwrap(), "customer");
}

#[tokio::test]
async fn duplicate_username_yields_409() {
    let app = TestApp::spawn().await;

    let body = json!({ "username": "twice", "password": "pass12345" });
    let first = app.post_without_token(routes::REGISTER, &body).await;
    assert_eq!(first.status, 201, "{}", first.text);

    let second = app.post_without_token(routes::REGISTER, &body).await;
    assert_eq!(second.status, 409, "{}", second.text);
    assert_eq!(
        second.body["message"].as_str().unwrap(),
        "Username is already taken"
    );
}

#[tokio::test]
async fn wrong_password_yields_401() {
    let app = TestApp::spawn().await;

    let reg = json!({ "username": "careful", "password": "pass12345" });
    app.post_without_token(routes::REGISTER, &reg).await;

    let login = app
        .post_without_token(
            routes::LOGIN,
            &json!({ "username": "careful", "password": "wrong-pass" }),
        )
        .await;
    assert_eq!(login.status, 401, "{}", login.text);
    assert_eq!(login.body["success"], json!(false));
}

#[tokio::test]
async fn short_usernames_are_rejected() {
    let app = TestApp::spawn().await;

    let res = app
        .post_without_token(
            routes::REGISTER,
            &json!({ "username": "ab", "password": "pass12345" }),
        )
        .await;
    assert_eq!(res.status, 400, "{}", res.text);
}

#[tokio::test]
async fn me_reflects_the_token() {
    let app = TestApp::spawn().await;
    let token = app
        .create_user_with_role("whoami", "pass12345", "employee")
        .await;

    let res = app.get_with_token(routes::ME, &token).await;
    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(res.body["user"]["username"].as_str().unwrap(), "whoami");
    assert_eq!(res.body["user"]["role"].as_str().unwrap(), "employee");

    let anonymous = app.get_without_token(routes::ME).await;
    assert_eq!(anonymous.status, 401);
}
