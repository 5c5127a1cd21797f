//! End-to-end tests against a running server
//!
//! Start the server, then run with: cargo test -- --ignored

use reqwest::{redirect::Policy, Client, StatusCode};
use uuid::Uuid;

const BASE_URL: &str = "http://localhost:4000";

/// Client that keeps the session cookie and does not follow redirects
fn client() -> Client {
    Client::builder()
        .cookie_store(true)
        .redirect(Policy::none())
        .build()
        .expect("Failed to build client")
}

fn location(response: &reqwest::Response) -> String {
    response
        .headers()
        .get(reqwest::header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

fn unique(prefix: &str) -> String {
    format!("{}{}", prefix, &Uuid::new_v4().simple().to_string()[..8])
}

async fn page(client: &Client, path: &str) -> (StatusCode, String) {
    let response = client
        .get(format!("{}{}", BASE_URL, path))
        .send()
        .await
        .expect("Failed to send request");
    let status = response.status();
    (status, response.text().await.unwrap())
}

/// Fresh member, signed up and logged in
async fn signed_in_client() -> (Client, String) {
    let client = client();
    let username = unique("member");

    let response = client
        .post(format!("{}/user/signup", BASE_URL))
        .form(&[
            ("username", username.as_str()),
            ("email", "member@x.com"),
            ("password", "secret"),
        ])
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    // Consumes the signup flash
    let (status, _) = page(&client, "/user/login").await;
    assert_eq!(status, StatusCode::OK);

    let response = client
        .post(format!("{}/user/login", BASE_URL))
        .form(&[("username", username.as_str()), ("password", "secret")])
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    (client, username)
}

/// Upload a book, follow the redirect, and return its volume id with the
/// page shown after the upload
async fn upload_book(client: &Client, title: &str) -> (String, String) {
    let volume_id = unique("vol");
    let response = client
        .post(format!("{}/book/new", BASE_URL))
        .form(&[
            ("volume_id", volume_id.as_str()),
            ("title", title),
            ("authors", "Ursula K. Le Guin"),
            ("page_count", "183"),
            ("price", "7.99"),
        ])
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), format!("/book/{}", volume_id));

    let (status, html) = page(client, &location(&response)).await;
    assert_eq!(status, StatusCode::OK);

    (volume_id, html)
}

#[tokio::test]
#[ignore]
async fn test_health_check() {
    let response = client()
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_signup_login_and_request() {
    let client = client();
    let username = format!("alice{}", &Uuid::new_v4().simple().to_string()[..8]);

    // Signup
    let response = client
        .post(format!("{}/user/signup", BASE_URL))
        .form(&[
            ("username", username.as_str()),
            ("email", "a@x.com"),
            ("password", "secret"),
        ])
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/user/login");

    let page = client
        .get(format!("{}/user/login", BASE_URL))
        .send()
        .await
        .expect("Failed to send request")
        .text()
        .await
        .unwrap();
    assert!(page.contains("Your account was created successfully! Please login."));

    // Login
    let response = client
        .post(format!("{}/user/login", BASE_URL))
        .form(&[("username", username.as_str()), ("password", "secret")])
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/request/new");

    // Request
    let response = client
        .post(format!("{}/request/new", BASE_URL))
        .form(&[("title", "A Wizard of Earthsea")])
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let request_path = location(&response);
    assert!(request_path.starts_with("/request/"));

    let page = client
        .get(format!("{}{}", BASE_URL, request_path))
        .send()
        .await
        .expect("Failed to send request")
        .text()
        .await
        .unwrap();
    assert!(page.contains("Your request was saved successfully!"));
    assert!(page.contains("A Wizard of Earthsea"));
    assert!(page.contains(&format!("Requested by {}", username)));
}

#[tokio::test]
#[ignore]
async fn test_login_invalid_credentials() {
    let client = client();

    let response = client
        .post(format!("{}/user/login", BASE_URL))
        .form(&[("username", "nobody-at-all"), ("password", "wrong")])
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/user/login");

    let page = client
        .get(format!("{}/user/login", BASE_URL))
        .send()
        .await
        .expect("Failed to send request")
        .text()
        .await
        .unwrap();
    assert!(page.contains("Invalid Login"));
}

#[tokio::test]
#[ignore]
async fn test_anonymous_request_is_rejected() {
    let response = client()
        .post(format!("{}/request/new", BASE_URL))
        .form(&[("title", "Should not be stored")])
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore]
async fn test_unknown_request_is_not_found() {
    let response = client()
        .get(format!("{}/request/2147483647", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore]
async fn test_login_rotates_session_cookie() {
    let client = client();
    let username = unique("rotate");

    let response = client
        .post(format!("{}/user/signup", BASE_URL))
        .form(&[
            ("username", username.as_str()),
            ("email", "r@x.com"),
            ("password", "secret"),
        ])
        .send()
        .await
        .expect("Failed to send request");
    let before = response
        .cookies()
        .find(|c| c.name() == "session")
        .map(|c| c.value().to_string())
        .expect("session cookie after signup");

    let response = client
        .post(format!("{}/user/login", BASE_URL))
        .form(&[("username", username.as_str()), ("password", "secret")])
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/request/new");
    let after = response
        .cookies()
        .find(|c| c.name() == "session")
        .map(|c| c.value().to_string())
        .expect("session cookie after login");
    assert_ne!(before, after);

    let (status, html) = page(&client, "/request/new").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains(&format!("Logout ({})", username)));
}

#[tokio::test]
#[ignore]
async fn test_upload_and_show_book() {
    let (client, username) = signed_in_client().await;
    let (_, html) = upload_book(&client, "The Tombs of Atuan").await;

    assert!(html.contains("Your book was uploaded successfully!"));
    assert!(html.contains("The Tombs of Atuan"));
    assert!(html.contains(&format!("<dd>{}</dd>", username)));
    assert!(html.contains("<dt>Downloads</dt><dd>0</dd>"));
}

#[tokio::test]
#[ignore]
async fn test_duplicate_volume_id_is_a_field_error() {
    let (client, _) = signed_in_client().await;
    let (volume_id, _) = upload_book(&client, "Tehanu").await;

    let response = client
        .post(format!("{}/book/new", BASE_URL))
        .form(&[("volume_id", volume_id.as_str()), ("title", "Tehanu again")])
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response
        .text()
        .await
        .unwrap()
        .contains("A book with this volume ID already exists"));
}

#[tokio::test]
#[ignore]
async fn test_edit_book_uses_volume_id_from_path() {
    let (client, _) = signed_in_client().await;
    let (volume_id, _) = upload_book(&client, "The Farthest Shore").await;
    let other = unique("vol");

    let (status, html) = page(&client, &format!("/book/{}/edit", volume_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("The Farthest Shore"));

    let response = client
        .post(format!("{}/book/{}/edit", BASE_URL, volume_id))
        .form(&[
            ("volume_id", other.as_str()),
            ("title", "The Farthest Shore (revised)"),
        ])
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), format!("/book/{}", volume_id));

    let (status, html) = page(&client, &format!("/book/{}", volume_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("The book was updated successfully!"));
    assert!(html.contains("The Farthest Shore (revised)"));

    let (status, _) = page(&client, &format!("/book/{}", other)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore]
async fn test_download_redirects_and_counts() {
    let (client, _) = signed_in_client().await;
    let (volume_id, _) = upload_book(&client, "A Wizard of Earthsea").await;

    for _ in 0..2 {
        let response = client
            .post(format!("{}/book/{}/download", BASE_URL, volume_id))
            .send()
            .await
            .expect("Failed to send request");
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), format!("/book/{}", volume_id));
    }

    let (_, html) = page(&client, &format!("/book/{}", volume_id)).await;
    assert!(html.contains("Thanks for downloading!"));
    assert!(html.contains("<dt>Downloads</dt><dd>2</dd>"));
}

#[tokio::test]
#[ignore]
async fn test_unknown_volume_id_is_not_found() {
    let (client, _) = signed_in_client().await;
    let missing = unique("missing");

    let (status, _) = page(&client, &format!("/book/{}", missing)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = page(&client, &format!("/book/{}/edit", missing)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let response = client
        .post(format!("{}/book/{}/edit", BASE_URL, missing))
        .form(&[("title", "Nothing here")])
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = client
        .post(format!("{}/book/{}/download", BASE_URL, missing))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore]
async fn test_anonymous_book_edit_redirects_to_login() {
    let (client, _) = signed_in_client().await;
    let (volume_id, _) = upload_book(&client, "Tales from Earthsea").await;

    let response = self::client()
        .get(format!("{}/book/{}/edit", BASE_URL, volume_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/user/login");
}
