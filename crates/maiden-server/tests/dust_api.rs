//! End-to-end tests for the dust REST API, driven in-process through the
//! router.

use std::sync::Arc;

use axum::Router;
use axum::body::{Body, Bytes};
use axum::http::header::{CONTENT_TYPE, LOCATION};
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use maiden_kernel::{DustStore, Listing};
use maiden_server::constants::DUST_PREFIX;
use maiden_server::router;
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

const BOUNDARY: &str = "maiden-test-boundary";

struct TestServer {
    app: Router,
    dir: TempDir,
}

impl TestServer {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        for sub in ["data", "app", "doc"] {
            std::fs::create_dir(dir.path().join(sub)).unwrap();
        }
        std::fs::write(dir.path().join("app/index.html"), "<h1>maiden</h1>").unwrap();
        std::fs::write(dir.path().join("doc/index.html"), "<h1>docs</h1>").unwrap();

        let store = Arc::new(DustStore::new(dir.path().join("data"), DUST_PREFIX));
        let app = router(store, &dir.path().join("app"), &dir.path().join("doc"));
        Self { app, dir }
    }

    fn data(&self, name: &str) -> std::path::PathBuf {
        self.dir.path().join("data").join(name)
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Bytes) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, body)
    }

    async fn send_json(&self, request: Request<Body>) -> (StatusCode, Value) {
        let (status, body) = self.send(request).await;
        let value = serde_json::from_slice(&body).unwrap_or(Value::Null);
        (status, value)
    }

    async fn get(&self, uri: &str) -> (StatusCode, Bytes) {
        self.send(Request::get(uri).body(Body::empty()).unwrap()).await
    }

    async fn listing(&self, uri: &str) -> Listing {
        let (status, body) = self.get(uri).await;
        assert_eq!(status, StatusCode::OK, "{}", String::from_utf8_lossy(&body));
        serde_json::from_slice(&body).unwrap()
    }

    async fn mkdir(&self, name: &str) -> (StatusCode, Value) {
        let uri = format!("{DUST_PREFIX}/{name}?kind=directory");
        self.send_json(Request::put(uri).body(Body::empty()).unwrap())
            .await
    }

    async fn upload(&self, name: &str, content: &[u8]) -> (StatusCode, Value) {
        let uri = format!("{DUST_PREFIX}/{name}");
        self.send_json(multipart_request("PUT", &uri, "value", Some("upload.bin"), content))
            .await
    }

    async fn rename(&self, name: &str, form: &str) -> (StatusCode, Value) {
        let request = Request::patch(format!("{DUST_PREFIX}/{name}"))
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form.to_owned()))
            .unwrap();
        self.send_json(request).await
    }

    async fn delete(&self, name: &str) -> (StatusCode, Value) {
        let request = Request::delete(format!("{DUST_PREFIX}/{name}"))
            .body(Body::empty())
            .unwrap();
        self.send_json(request).await
    }
}

/// A single-part multipart body. With a `file_name` the part is a file,
/// otherwise a plain form field.
fn multipart_request(
    method: &str,
    uri: &str,
    field: &str,
    file_name: Option<&str>,
    content: &[u8],
) -> Request<Body> {
    let disposition = match file_name {
        Some(file_name) => format!("form-data; name=\"{field}\"; filename=\"{file_name}\""),
        None => format!("form-data; name=\"{field}\""),
    };
    let mut body = format!(
        "--{BOUNDARY}\r\n\
         Content-Disposition: {disposition}\r\n\
         Content-Type: application/octet-stream\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method(method)
        .uri(uri)
        .header(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn api_info() {
    let server = TestServer::new();
    let (status, body) = server
        .send_json(Request::get("/api/v1").body(Body::empty()).unwrap())
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "api": "maiden", "version": env!("CARGO_PKG_VERSION") })
    );
}

#[tokio::test]
async fn root_redirects_to_app() {
    let server = TestServer::new();
    let response = server
        .app
        .clone()
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(response.headers()[LOCATION], "/maiden");
}

#[tokio::test]
async fn serves_app_and_docs() {
    let server = TestServer::new();

    let (status, body) = server.get("/maiden/index.html").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(&body[..], b"<h1>maiden</h1>");

    let (status, body) = server.get("/doc/index.html").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(&body[..], b"<h1>docs</h1>");
}

#[tokio::test]
async fn empty_root_listing() {
    let server = TestServer::new();
    let (status, body) = server
        .send_json(Request::get(DUST_PREFIX).body(Body::empty()).unwrap())
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "path": "", "url": "/api/v1/dust", "entries": [] })
    );
}

#[tokio::test]
async fn root_listing_shape() {
    let server = TestServer::new();
    std::fs::write(server.data("a.txt"), "a").unwrap();
    std::fs::create_dir(server.data("b")).unwrap();

    let (status, body) = server
        .send_json(Request::get(DUST_PREFIX).body(Body::empty()).unwrap())
        .await;
    assert_eq!(status, StatusCode::OK);

    let entries = body["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 2);

    let a = entries.iter().find(|e| e["name"] == "a.txt").unwrap();
    assert_eq!(a, &json!({ "name": "a.txt", "url": "/api/v1/dust/a.txt" }));

    let b = entries.iter().find(|e| e["name"] == "b").unwrap();
    assert_eq!(
        b,
        &json!({ "name": "b", "url": "/api/v1/dust/b", "children": [] })
    );
}

#[tokio::test]
async fn subdirectory_listing() {
    let server = TestServer::new();
    std::fs::create_dir_all(server.data("code/lib")).unwrap();
    std::fs::write(server.data("code/lib/util.lua"), "--").unwrap();

    let listing = server.listing("/api/v1/dust/code/lib").await;
    assert_eq!(listing.path, "code/lib");
    assert_eq!(listing.url, "/api/v1/dust/code/lib");
    assert_eq!(
        listing.entry("util.lua").unwrap().url,
        "/api/v1/dust/code/lib/util.lua"
    );
}

#[tokio::test]
async fn upload_then_read_back() {
    let server = TestServer::new();
    let content = b"- buy strings\n- restring \xe2\x99\xab\n\x00\x01";

    let (status, body) = server.mkdir("notes").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "created directory notes");

    let (status, body) = server.upload("notes/todo.txt", content).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert!(body["message"].as_str().unwrap().contains("notes/todo.txt"));

    let (status, bytes) = server.get("/api/v1/dust/notes/todo.txt").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(&bytes[..], &content[..]);
}

#[tokio::test]
async fn escaped_names_round_trip() {
    let server = TestServer::new();

    let (status, _) = server.upload("my%20song%25.lua", b"engine.name").await;
    assert_eq!(status, StatusCode::OK);
    assert!(server.data("my song%.lua").is_file());

    let listing = server.listing(DUST_PREFIX).await;
    let entry = listing.entry("my song%.lua").unwrap();
    assert_eq!(entry.url, "/api/v1/dust/my%20song%25.lua");

    let (status, bytes) = server.get(&entry.url).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(&bytes[..], b"engine.name");
}

#[tokio::test]
async fn upload_overwrites() {
    let server = TestServer::new();
    server.upload("patch.lua", b"first").await;
    server.upload("patch.lua", b"second").await;

    let (_, bytes) = server.get("/api/v1/dust/patch.lua").await;
    assert_eq!(&bytes[..], b"second");
}

#[tokio::test]
async fn create_directory_twice() {
    let server = TestServer::new();

    let (first, _) = server.mkdir("audio/tape").await;
    let (second, _) = server.mkdir("audio/tape").await;
    assert_eq!(first, StatusCode::OK);
    assert_eq!(second, StatusCode::OK);
    assert!(server.data("audio/tape").is_dir());
}

#[tokio::test]
async fn create_directory_over_file_fails() {
    let server = TestServer::new();
    std::fs::write(server.data("taken"), "x").unwrap();

    let (status, body) = server.mkdir("taken").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn upload_without_value_field() {
    let server = TestServer::new();
    let request = multipart_request("PUT", "/api/v1/dust/x.txt", "other", Some("x.txt"), b"x");

    let (status, body) = server.send_json(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "missing 'value' field in form");
    assert!(!server.data("x.txt").exists());
}

#[tokio::test]
async fn upload_without_multipart_body() {
    let server = TestServer::new();
    let request = Request::put("/api/v1/dust/x.txt")
        .body(Body::from("raw"))
        .unwrap();

    let (status, body) = server.send_json(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn upload_into_missing_directory() {
    let server = TestServer::new();
    let (status, body) = server.upload("nowhere/x.txt", b"x").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn get_missing_resource() {
    let server = TestServer::new();
    let (status, body) = server
        .send_json(Request::get("/api/v1/dust/nope").body(Body::empty()).unwrap())
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn get_through_a_file() {
    let server = TestServer::new();
    std::fs::write(server.data("a.txt"), "a").unwrap();

    let (status, _) = server.get("/api/v1/dust/a.txt/b").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn rename_within_parent() {
    let server = TestServer::new();
    server.mkdir("foo").await;
    server.upload("foo/bar.txt", b"content").await;

    let (status, body) = server.rename("foo/bar.txt", "name=baz.txt").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "url": "/api/v1/dust/foo/baz.txt" }));

    let (status, bytes) = server.get("/api/v1/dust/foo/baz.txt").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(&bytes[..], b"content");

    let (status, _) = server.get("/api/v1/dust/foo/bar.txt").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn rename_with_multipart_form() {
    let server = TestServer::new();
    server.upload("old.lua", b"x").await;

    let request = multipart_request("PATCH", "/api/v1/dust/old.lua", "name", None, b"new one.lua");

    let (status, body) = server.send_json(request).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["url"], "/api/v1/dust/new%20one.lua");
    assert!(server.data("new one.lua").is_file());
}

#[tokio::test]
async fn rename_missing_source() {
    let server = TestServer::new();

    let (status, body) = server.rename("ghost.txt", "name=real.txt").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());

    // Existence is checked before the form.
    let (status, _) = server.rename("ghost.txt", "").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn rename_missing_name() {
    let server = TestServer::new();
    server.upload("here.txt", b"x").await;

    let (status, body) = server.rename("here.txt", "other=x").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "missing 'name' key in form");

    let (status, _) = server.rename("here.txt", "name=").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(server.data("here.txt").is_file());
}

#[tokio::test]
async fn rename_cannot_escape_root() {
    let server = TestServer::new();
    server.upload("here.txt", b"x").await;

    let (status, _) = server.rename("here.txt", "name=..%2F..%2Fescaped.txt").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(server.data("here.txt").is_file());
}

#[tokio::test]
async fn delete_subtree() {
    let server = TestServer::new();
    server.mkdir("keep").await;
    server.mkdir("gone/deep").await;
    server.upload("gone/deep/file.txt", b"x").await;

    let (status, body) = server.delete("gone").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "deleted gone");

    let listing = server.listing(DUST_PREFIX).await;
    assert!(listing.entry("gone").is_none());
    assert!(listing.entry("keep").is_some());
    assert!(!server.data("gone").exists());
}

#[tokio::test]
async fn delete_missing() {
    let server = TestServer::new();

    let (status, body) = server.delete("nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn delete_twice_reports_not_found() {
    let server = TestServer::new();
    server.upload("once.txt", b"x").await;

    let (first, _) = server.delete("once.txt").await;
    let (second, _) = server.delete("once.txt").await;
    assert_eq!(first, StatusCode::OK);
    assert_eq!(second, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn climbing_out_is_rejected() {
    let server = TestServer::new();
    let outside = server.dir.path().join("secret.txt");
    std::fs::write(&outside, "secret").unwrap();

    let (status, body) = server.get("/api/v1/dust/..%2Fsecret.txt").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_ne!(&body[..], b"secret");

    let (status, _) = server.upload("..%2Fplanted.txt", b"x").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(!server.dir.path().join("planted.txt").exists());

    let (status, _) = server.delete("..%2Fsecret.txt").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(outside.exists());

    let (status, _) = server.mkdir("a%2F..%2F..%2Fmade").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(!server.dir.path().join("made").exists());
}

#[tokio::test]
async fn rename_cannot_change_directory() {
    let server = TestServer::new();
    server.mkdir("foo/sub").await;
    server.mkdir("other").await;
    server.upload("foo/bar.txt", b"bar").await;

    for form in ["name=sub%2Fbar.txt", "name=..%2Fother%2Fbar.txt", "name=..", "name=."] {
        let (status, body) = server.rename("foo/bar.txt", form).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{form}: {body}");
        assert!(body["error"].is_string());
    }

    assert!(server.data("foo/bar.txt").is_file());
    assert!(!server.data("foo/sub/bar.txt").exists());
    assert!(!server.data("other/bar.txt").exists());
}

#[tokio::test]
async fn root_listing_with_trailing_slash() {
    let server = TestServer::new();
    std::fs::write(server.data("a.txt"), "a").unwrap();

    let listing = server.listing("/api/v1/dust/").await;
    assert_eq!(listing.path, "");
    assert_eq!(listing.url, "/api/v1/dust");
    assert_eq!(listing.entry("a.txt").unwrap().url, "/api/v1/dust/a.txt");
}

#[tokio::test]
async fn root_listing_without_data_directory() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(DustStore::new(dir.path().join("missing"), DUST_PREFIX));
    let app = router(store, dir.path(), dir.path());

    let response = app
        .oneshot(Request::get(DUST_PREFIX).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert!(body["error"].is_string());
}
