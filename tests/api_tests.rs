use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use job_tracker::config::Config;
use serde_json::{Value, json};
use tower::ServiceExt;

const BOUNDARY: &str = "job-tracker-test-boundary";

async fn spawn_app() -> Router {
    let mut config = Config::default();
    config.database.path = "sqlite::memory:".to_string();
    config.observability.metrics_enabled = false;

    let state = job_tracker::api::create_app_state_from_config(config, None)
        .await
        .expect("Failed to create app state");
    job_tracker::api::router(state)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, json)
}

fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, mime::APPLICATION_JSON.essence_str())
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn create_job(app: &Router, title: &str, url: &str) -> Value {
    let (status, body) = send(
        app,
        json_request(
            "POST",
            "/api/jobs",
            &json!({"job_title": title, "job_url": url}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["data"].clone()
}

fn multipart_upload(
    uri: &str,
    file_type: Option<&str>,
    file_name: &str,
    content_type: &str,
    data: &[u8],
) -> Request<Body> {
    let mut body = Vec::new();
    if let Some(kind) = file_type {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file_type\"\r\n\r\n{kind}\r\n"
            )
            .as_bytes(),
        );
    }
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn test_create_duplicate_and_get() {
    let app = spawn_app().await;

    let job = create_job(&app, "Backend Engineer", "http://a.com/job1").await;
    let id = job["id"].as_str().unwrap();
    assert!(!id.is_empty());
    assert_eq!(job["status"], "new");
    assert_eq!(job["source"], "manual");

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/jobs",
            &json!({"job_title": "Again", "job_url": "http://a.com/job1"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("already exists"));

    let (status, body) = send(&app, get(&format!("/api/jobs/{id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["job_title"], "Backend Engineer");
}

#[tokio::test]
async fn test_invalid_bodies_are_bad_requests() {
    let app = spawn_app().await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/jobs")
        .header(header::CONTENT_TYPE, mime::APPLICATION_JSON.essence_str())
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid request body");

    let (status, body) = send(
        &app,
        json_request("POST", "/api/jobs", &json!({"job_title": "No URL"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_missing_job_is_404() {
    let app = spawn_app().await;

    let (status, body) = send(&app, get("/api/jobs/does-not-exist")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Job not found");

    let (status, _) = send(&app, delete("/api/jobs/does-not-exist")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        json_request("PUT", "/api/jobs/does-not-exist", &json!({"notes": "x"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_update_status_and_filter() {
    let app = spawn_app().await;

    let first = create_job(&app, "First", "https://jobs.example/1").await;
    create_job(&app, "Second", "https://jobs.example/2").await;
    let first_id = first["id"].as_str().unwrap();

    let (status, body) = send(
        &app,
        json_request(
            "PATCH",
            &format!("/api/jobs/{first_id}/status"),
            &json!({"status": "applied"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "applied");

    let (_, body) = send(&app, get("/api/jobs")).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let (_, body) = send(&app, get("/api/jobs?status=applied")).await;
    let applied = body["data"].as_array().unwrap();
    assert_eq!(applied.len(), 1);
    assert_eq!(applied[0]["job_title"], "First");

    let (_, body) = send(&app, get("/api/jobs?status=&source=manual")).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let (status, body) = send(
        &app,
        json_request(
            "PUT",
            &format!("/api/jobs/{first_id}"),
            &json!({"notes": "Recruiter called", "company_name": ""}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["notes"], "Recruiter called");
    assert_eq!(body["data"]["job_title"], "First");
    assert_eq!(body["data"]["status"], "applied");
}

#[tokio::test]
async fn test_batch_create() {
    let app = spawn_app().await;
    create_job(&app, "Existing", "https://batch.example/1").await;

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/jobs/batch",
            &json!([
                {"job_title": "One", "job_url": "https://batch.example/1"},
                {"job_title": "Two", "job_url": "https://batch.example/2", "source": "mcp"}
            ]),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["created"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"]["created"][0]["source"], "mcp");
    assert_eq!(body["data"]["skipped"], json!(["https://batch.example/1"]));
}

#[tokio::test]
async fn test_attachment_lifecycle() {
    let app = spawn_app().await;
    let job = create_job(&app, "Engineer", "https://att.example/1").await;
    let job_id = job["id"].as_str().unwrap();
    let base = format!("/api/jobs/{job_id}/attachments");

    let pdf = b"%PDF-1.7 fake resume";
    let (status, body) = send(
        &app,
        multipart_upload(&base, None, "cv.pdf", mime::APPLICATION_PDF.essence_str(), pdf),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    let meta = body["data"].clone();
    assert_eq!(meta["file_type"], "resume");
    assert_eq!(meta["file_size"], pdf.len());
    assert!(meta.get("data").is_none());
    let attachment_id = meta["id"].as_str().unwrap();

    let (status, body) = send(&app, get(&base)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, body) = send(&app, get(&format!("{base}/{attachment_id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["file_name"], "cv.pdf");

    let response = app
        .clone()
        .oneshot(get(&format!("{base}/{attachment_id}/download")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        mime::APPLICATION_PDF.essence_str()
    );
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"cv.pdf\""
    );
    assert_eq!(
        response.headers()[header::CONTENT_LENGTH],
        pdf.len().to_string().as_str()
    );
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], pdf);

    let (status, _) = send(&app, delete(&format!("{base}/{attachment_id}"))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, get(&format!("{base}/{attachment_id}"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_attachment_validation() {
    let app = spawn_app().await;
    let job = create_job(&app, "Engineer", "https://att.example/2").await;
    let base = format!("/api/jobs/{}/attachments", job["id"].as_str().unwrap());

    let (status, body) = send(
        &app,
        multipart_upload(&base, Some("resume"), "notes.txt", "text/plain", b"hi"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("invalid MIME type"));

    let (status, body) = send(
        &app,
        multipart_upload(&base, Some("portfolio"), "cv.pdf", mime::APPLICATION_PDF.essence_str(), b"x"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("invalid file type"));

    let (status, _) = send(
        &app,
        multipart_upload(
            "/api/jobs/missing/attachments",
            Some("cover_letter"),
            "letter.pdf",
            mime::APPLICATION_PDF.essence_str(),
            b"x",
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_attachment_is_scoped_to_its_job() {
    let app = spawn_app().await;
    let owner = create_job(&app, "Owner", "https://scope.example/1").await;
    let other = create_job(&app, "Other", "https://scope.example/2").await;
    let owner_id = owner["id"].as_str().unwrap();
    let other_id = other["id"].as_str().unwrap();

    let (_, body) = send(
        &app,
        multipart_upload(
            &format!("/api/jobs/{owner_id}/attachments"),
            Some("cover_letter"),
            "letter.docx",
            "application/octet-stream",
            b"PK fake docx",
        ),
    )
    .await;
    assert_eq!(
        body["data"]["mime_type"],
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
    );
    let attachment_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, _) = send(
        &app,
        get(&format!("/api/jobs/{other_id}/attachments/{attachment_id}")),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        delete(&format!("/api/jobs/{other_id}/attachments/{attachment_id}")),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_deleting_job_removes_attachments() {
    let app = spawn_app().await;
    let job = create_job(&app, "Engineer", "https://cascade.example/1").await;
    let job_id = job["id"].as_str().unwrap();
    let base = format!("/api/jobs/{job_id}/attachments");

    let (_, body) = send(
        &app,
        multipart_upload(&base, None, "cv.pdf", mime::APPLICATION_PDF.essence_str(), b"%PDF"),
    )
    .await;
    let attachment_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(&app, delete(&format!("/api/jobs/{job_id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Job deleted successfully");

    let (status, _) = send(&app, get(&format!("/api/jobs/{job_id}"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        get(&format!("{base}/{attachment_id}/download")),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
