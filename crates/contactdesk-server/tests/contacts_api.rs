//! Contact Service HTTP API, end to end over a real listener
//!
//! Attachments go to the fake upload service from `common`.

mod common;

use std::sync::Arc;
use std::time::Duration;

use reqwest::{header, Client, StatusCode};
use serde_json::{json, Value};
use tokio::sync::oneshot;

use chrono::Utc;

use contactdesk::{ContactMessage, ContactRepository, NewContactFile};
use contactdesk_server::{
    adapters::{HttpUploadClient, InMemoryContactRepository, TtlCache},
    application::ContactService,
    auth::JwtVerifier,
    config::UploadSettings,
    contact_app,
    rate_limit::SlidingWindowLimiter,
    ContactAppState, Guards,
};

use common::{bearer_token, jwt_settings, spawn, start_upload_service, UploadLog};

struct Harness {
    base: String,
    uploads: UploadLog,
    repo: InMemoryContactRepository,
    http: Client,
    _shutdown: Vec<oneshot::Sender<()>>,
}

impl Harness {
    async fn start(contact_per_minute: u32) -> Self {
        let (upload_url, uploads, upload_shutdown) = start_upload_service().await;

        let upload_client = HttpUploadClient::new(&UploadSettings {
            base_url: upload_url,
            timeout: Duration::from_secs(5),
        })
        .expect("build upload client");

        let repo = InMemoryContactRepository::new();
        let service = ContactService::new(
            Arc::new(repo.clone()),
            Arc::new(upload_client),
            Arc::new(TtlCache::<ContactMessage>::new(100)),
            Duration::from_secs(60),
        );

        let guards = Guards {
            verifier: Some(Arc::new(JwtVerifier::new(&jwt_settings()))),
            global_limiter: Arc::new(SlidingWindowLimiter::per_minute("global", 1000)),
            contact_limiter: Arc::new(SlidingWindowLimiter::per_minute(
                "contact",
                contact_per_minute,
            )),
            cors_allowed_origins: None,
            max_request_bytes: 1024 * 1024,
        };

        let router = contact_app(
            ContactAppState {
                contact_service: Arc::new(service),
            },
            &guards,
        );
        let (base, app_shutdown) = spawn(router).await;

        Self {
            base,
            uploads,
            repo,
            http: Client::new(),
            _shutdown: vec![upload_shutdown, app_shutdown],
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    async fn submit(&self, body: Value) -> reqwest::Response {
        self.http
            .post(self.url("/v1/contacts"))
            .json(&body)
            .send()
            .await
            .expect("send")
    }

    async fn admin_get(&self, path: &str) -> reqwest::Response {
        self.http
            .get(self.url(path))
            .header(header::AUTHORIZATION, bearer_token())
            .send()
            .await
            .expect("send")
    }
}

fn submission(subject: &str) -> Value {
    json!({
        "fullName": "Jane Tester",
        "email": "jane@example.com",
        "phoneNumber": "+66 2 000 0000",
        "subject": subject,
        "message": "Please quote 200 brackets",
        "contactType": "Quotation",
        "priority": "High",
        "files": [
            { "fileName": "drawing.txt", "fileContent": "aGVsbG8=", "contentType": "text/plain" }
        ]
    })
}

#[tokio::test]
async fn create_returns_created_resource_with_location() {
    let harness = Harness::start(10).await;

    let response = harness.submit(submission("Bracket quote")).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let location = response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
        .expect("location header");
    let body: Value = response.json().await.unwrap();

    let id = body["id"].as_i64().unwrap();
    assert_eq!(location, format!("/v1/contacts/{}", id));
    assert_eq!(body["status"], "New");
    assert_eq!(body["contactType"], "Quotation");
    assert_eq!(body["files"].as_array().unwrap().len(), 1);
    assert_eq!(body["files"][0]["uploadServiceFileId"], "file-1");
    assert!(body["files"][0]["objectName"]
        .as_str()
        .unwrap()
        .starts_with(&format!("contacts/{}/", id)));
    assert_eq!(harness.uploads.uploads().len(), 1);

    let fetched = harness.admin_get(&location).await;
    assert_eq!(fetched.status(), StatusCode::OK);
    let fetched: Value = fetched.json().await.unwrap();
    assert_eq!(fetched["subject"], "Bracket quote");
}

#[tokio::test]
async fn failed_attachment_upload_does_not_fail_submission() {
    let harness = Harness::start(10).await;

    let mut body = submission("Partial upload");
    body["files"] = json!([
        { "fileName": "good.txt", "fileContent": "aGVsbG8=" },
        { "fileName": "reject.txt", "fileContent": "aGVsbG8=" }
    ]);

    let response = harness.submit(body).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let created: Value = response.json().await.unwrap();
    let files = created["files"].as_array().unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0]["fileName"], "good.txt");
}

#[tokio::test]
async fn invalid_submissions_are_bad_requests() {
    let harness = Harness::start(10).await;

    let mut missing_email = submission("No email");
    missing_email["email"] = json!("");
    let response = harness.submit(missing_email).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(response.text().await.unwrap().contains("email"));

    let mut bad_base64 = submission("Bad file");
    bad_base64["files"][0]["fileContent"] = json!("not base64!");
    let response = harness.submit(bad_base64).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = harness
        .http
        .post(harness.url("/v1/contacts"))
        .header(header::CONTENT_TYPE, "application/json")
        .body("{")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    assert!(harness.uploads.uploads().is_empty());
}

#[tokio::test]
async fn admin_routes_require_a_valid_token() {
    let harness = Harness::start(10).await;

    let anonymous = harness
        .http
        .get(harness.url("/v1/contacts"))
        .send()
        .await
        .unwrap();
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

    let forged = harness
        .http
        .get(harness.url("/v1/contacts"))
        .header(header::AUTHORIZATION, "Bearer not.a.token")
        .send()
        .await
        .unwrap();
    assert_eq!(forged.status(), StatusCode::UNAUTHORIZED);

    let authorized = harness.admin_get("/v1/contacts").await;
    assert_eq!(authorized.status(), StatusCode::OK);
    let list: Value = authorized.json().await.unwrap();
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn submissions_are_rate_limited_per_client() {
    let harness = Harness::start(2).await;

    let send = |client: &'static str| {
        harness
            .http
            .post(harness.url("/v1/contacts"))
            .header("x-forwarded-for", client)
            .json(&submission("Rate limited"))
            .send()
    };

    assert_eq!(send("203.0.113.5").await.unwrap().status(), StatusCode::CREATED);
    assert_eq!(send("203.0.113.5").await.unwrap().status(), StatusCode::CREATED);
    assert_eq!(
        send("203.0.113.5").await.unwrap().status(),
        StatusCode::TOO_MANY_REQUESTS
    );

    // Other clients have their own window
    assert_eq!(send("198.51.100.7").await.unwrap().status(), StatusCode::CREATED);
}

#[tokio::test]
async fn list_filters_by_status_and_pages() {
    let harness = Harness::start(10).await;

    for subject in ["First", "Second", "Third"] {
        assert_eq!(
            harness.submit(submission(subject)).await.status(),
            StatusCode::CREATED
        );
    }

    let resolved = harness
        .http
        .put(harness.url("/v1/contacts/2/status"))
        .header(header::AUTHORIZATION, bearer_token())
        .json(&json!({ "status": "Resolved", "priority": "Urgent" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resolved.status(), StatusCode::OK);
    let resolved: Value = resolved.json().await.unwrap();
    assert_eq!(resolved["status"], "Resolved");
    assert_eq!(resolved["priority"], "Urgent");
    assert!(!resolved["resolvedAt"].is_null());

    let only_new: Value = harness
        .admin_get("/v1/contacts?status=New")
        .await
        .json()
        .await
        .unwrap();
    let subjects: Vec<&str> = only_new
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["subject"].as_str().unwrap())
        .collect();
    assert_eq!(subjects, vec!["Third", "First"]);

    let second_page: Value = harness
        .admin_get("/v1/contacts?page=2&pageSize=2")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(second_page.as_array().unwrap().len(), 1);
    assert_eq!(second_page[0]["subject"], "First");

    let unknown = harness.admin_get("/v1/contacts?status=Archived").await;
    assert_eq!(unknown.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn files_can_be_listed_downloaded_and_deleted() {
    let harness = Harness::start(10).await;

    let created: Value = harness
        .submit(submission("With file"))
        .await
        .json()
        .await
        .unwrap();
    let id = created["id"].as_i64().unwrap();
    let file_id = created["files"][0]["id"].as_i64().unwrap();

    let files: Value = harness
        .admin_get(&format!("/v1/contacts/{}/files", id))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(files.as_array().unwrap().len(), 1);

    let download = harness
        .admin_get(&format!("/v1/contacts/{}/files/{}/download", id, file_id))
        .await;
    assert_eq!(download.status(), StatusCode::OK);
    assert_eq!(
        download.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"file-1.txt\""
    );
    assert_eq!(download.headers()[header::CONTENT_TYPE], "text/plain");
    assert_eq!(download.text().await.unwrap(), "content of file-1");

    let deleted = harness
        .http
        .delete(harness.url(&format!("/v1/contacts/{}/files/{}", id, file_id)))
        .header(header::AUTHORIZATION, bearer_token())
        .send()
        .await
        .unwrap();
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);
    assert_eq!(harness.uploads.deletes(), vec!["file-1"]);

    let refreshed: Value = harness
        .admin_get(&format!("/v1/contacts/{}", id))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(refreshed["files"], json!([]));

    let gone = harness
        .admin_get(&format!("/v1/contacts/{}/files/{}/download", id, file_id))
        .await;
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);

    let no_parent = harness.admin_get("/v1/contacts/999/files").await;
    assert_eq!(no_parent.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn download_fails_when_upload_service_errors() {
    let harness = Harness::start(10).await;

    let created: Value = harness
        .submit(submission("Lost file"))
        .await
        .json()
        .await
        .unwrap();
    let id = created["id"].as_i64().unwrap() as i32;

    // Row whose remote copy the upload service no longer has
    let mut scope = harness.repo.begin().await.unwrap();
    let orphan = scope
        .insert_file(&NewContactFile {
            contact_message_id: id,
            file_name: "lost.txt".to_string(),
            object_name: format!("contacts/{}/lost.txt", id),
            file_size: Some(4),
            content_type: Some("text/plain".to_string()),
            upload_service_file_id: Some("missing".to_string()),
            created_at: Utc::now(),
        })
        .await
        .unwrap();
    scope.commit().await.unwrap();

    let download = harness
        .admin_get(&format!("/v1/contacts/{}/files/{}/download", id, orphan.id))
        .await;
    assert_eq!(download.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn deleted_contact_is_gone() {
    let harness = Harness::start(10).await;

    let created: Value = harness
        .submit(submission("Short lived"))
        .await
        .json()
        .await
        .unwrap();
    let path = format!("/v1/contacts/{}", created["id"]);

    // Warm the cache before deleting
    assert_eq!(harness.admin_get(&path).await.status(), StatusCode::OK);

    let deleted = harness
        .http
        .delete(harness.url(&path))
        .header(header::AUTHORIZATION, bearer_token())
        .send()
        .await
        .unwrap();
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);

    assert_eq!(harness.admin_get(&path).await.status(), StatusCode::NOT_FOUND);

    let again = harness
        .http
        .delete(harness.url(&path))
        .header(header::AUTHORIZATION, bearer_token())
        .send()
        .await
        .unwrap();
    assert_eq!(again.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn health_and_docs_are_public() {
    let harness = Harness::start(10).await;

    let liveness = harness
        .http
        .get(harness.url("/contacts/liveness"))
        .send()
        .await
        .unwrap();
    assert_eq!(liveness.status(), StatusCode::OK);
    assert_eq!(liveness.text().await.unwrap(), "Healthy");

    let readiness = harness
        .http
        .get(harness.url("/contacts/readiness"))
        .send()
        .await
        .unwrap();
    assert_eq!(readiness.status(), StatusCode::OK);
    let report: Value = readiness.json().await.unwrap();
    assert_eq!(report["status"], "Healthy");
    assert_eq!(report["checks"][0]["name"], "database");

    let doc = harness
        .http
        .get(harness.url("/contacts/api-docs/v1/swagger.json"))
        .send()
        .await
        .unwrap();
    assert_eq!(doc.status(), StatusCode::OK);
    let doc: Value = doc.json().await.unwrap();
    assert!(doc["paths"]["/v1/contacts"].is_object());
}
