//! End-to-end tests against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives real `HttpClient`
//! round-trips over the default ureq transport. Validates verb resolution,
//! query merging, body encodings, multipart uploads, status interpretation,
//! and response decoding against an actual HTTP server.

use httpfluent_core::{Decoded, HttpClient, Part, ResponseFormat, DEFAULT_USER_AGENT};

/// Boot the mock server on a random port and return its base URL.
fn start_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

#[test]
fn get_with_existing_query_resolves_to_get() {
    let base = start_server();

    let mut client = HttpClient::new();
    client.set_url(format!("{base}/api/users?page=1"));
    client.execute().unwrap();

    assert_eq!(client.http_code(), Some(200));
    assert_eq!(client.parse_code().unwrap(), (false, "OK".to_string()));
    let decoded = client.response(ResponseFormat::Json).unwrap();
    let page = decoded.as_json().unwrap();
    assert_eq!(page["page"], 1);
    assert_eq!(page["data"], serde_json::json!([]));
}

#[test]
fn get_params_merge_over_the_url_query() {
    let base = start_server();

    let mut client = HttpClient::new();
    client
        .set_url(format!("{base}/api/users?page=1"))
        .set_get_params([("page", "4")]);
    client.execute().unwrap();

    let decoded = client.response(ResponseFormat::Json).unwrap();
    assert_eq!(decoded.as_json().unwrap()["page"], 4);
}

#[test]
fn user_lifecycle_over_real_http() {
    let base = start_server();

    // Step 1: create with JSON body params.
    let mut client = HttpClient::new();
    client
        .set_url(format!("{base}/api/users"))
        .set_post_params([("name", "Morpheus"), ("job", "Leader")]);
    client.execute().unwrap();
    assert_eq!(client.http_code(), Some(201));
    let created = client.response(ResponseFormat::Json).unwrap();
    let id = created.as_json().unwrap()["id"].as_str().unwrap().to_string();
    assert_eq!(created.as_json().unwrap()["name"], "Morpheus");

    // Step 2: fetch it back.
    let mut client = HttpClient::new();
    client.set_url(format!("{base}/api/users/{id}"));
    client.execute().unwrap();
    assert_eq!(client.http_code(), Some(200));

    // Step 3: update the job with a form-encoded PUT.
    let mut client = HttpClient::new();
    client
        .set_url(format!("{base}/api/users/{id}"))
        .set_put_params([("job", "Zion Resident")])
        .set_mime("form");
    client.execute().unwrap();
    assert_eq!(client.http_code(), Some(200));
    let updated = client.response(ResponseFormat::Json).unwrap();
    assert_eq!(updated.as_json().unwrap()["job"], "Zion Resident");
    assert_eq!(updated.as_json().unwrap()["name"], "Morpheus");

    // Step 4: delete, implied by delete params.
    let mut client = HttpClient::new();
    client
        .set_url(format!("{base}/api/users/{id}"))
        .set_delete_params([("confirm", "true")]);
    client.execute().unwrap();
    assert_eq!(client.http_code(), Some(204));
    assert!(client.response(ResponseFormat::Json).unwrap().is_empty());

    // Step 5: gone now.
    let mut client = HttpClient::new();
    client.set_url(format!("{base}/api/users/{id}"));
    client.execute().unwrap();
    assert_eq!(
        client.parse_code().unwrap(),
        (true, "Not Found".to_string())
    );
}

#[test]
fn charset_suffix_and_default_user_agent_reach_the_wire() {
    let base = start_server();

    let mut client = HttpClient::new();
    client
        .set_url(format!("{base}/api/echo"))
        .set_post_params([("name", "Neo")])
        .set_utf8();
    client.execute().unwrap();

    let decoded = client.response(ResponseFormat::Json).unwrap();
    let echo = decoded.as_json().unwrap();
    assert_eq!(echo["method"], "POST");
    assert_eq!(echo["content_type"], "application/json; charset=utf-8");
    assert_eq!(echo["user_agent"], DEFAULT_USER_AGENT);
    assert_eq!(echo["body"], r#"{"name":"Neo"}"#);
}

#[test]
fn custom_headers_are_sent_proper_cased() {
    let base = start_server();

    let mut client = HttpClient::new();
    client
        .set_url(format!("{base}/api/echo"))
        .set_headers([("user-agent", "httpfluent-test/1.0")])
        .set_post_raw("ping");
    client.execute().unwrap();

    let decoded = client.response(ResponseFormat::Json).unwrap();
    assert_eq!(
        decoded.as_json().unwrap()["user_agent"],
        "httpfluent-test/1.0"
    );
}

#[test]
fn multipart_upload_carries_fields_and_file() {
    let base = start_server();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.txt");
    std::fs::write(&path, "line one\nline two\n").unwrap();

    let mut client = HttpClient::new();
    client
        .set_url(format!("{base}/api/echo"))
        .set_post_params([("name", "report")])
        .set_post_files([&path])
        .add_part(Part::from_bytes("extra", "x.bin", "application/binary", vec![0x68, 0x69]));
    client.execute().unwrap();

    let decoded = client.response(ResponseFormat::Json).unwrap();
    let echo = decoded.as_json().unwrap();
    let content_type = echo["content_type"].as_str().unwrap();
    assert!(content_type.starts_with("multipart/form-data; boundary="));

    let body = echo["body"].as_str().unwrap();
    assert!(body.contains("name=\"name\"\r\n\r\nreport"));
    assert!(body.contains("filename=\"report.txt\""));
    assert!(body.contains("Content-Type: text/plain"));
    assert!(body.contains("line one\nline two"));
    assert!(body.contains("filename=\"x.bin\""));
    assert!(body.contains("Content-Type: application/binary"));
}

#[test]
fn xml_response_decodes_to_json_shape() {
    let base = start_server();

    let mut client = HttpClient::new();
    client.set_url(format!("{base}/api/xml"));
    client.execute().unwrap();

    let decoded = client.response(ResponseFormat::Xml).unwrap();
    let value = decoded.as_json().unwrap();
    assert_eq!(value["user"][0]["name"], "Neo");
    assert_eq!(value["user"][1]["job"], "Leader");

    // The same body is not valid JSON; the raw text must survive.
    match client.response(ResponseFormat::Json).unwrap() {
        Decoded::Undecodable { raw } => assert!(raw.starts_with("<users>")),
        other => panic!("expected Undecodable, got {other:?}"),
    }
}

#[test]
fn debug_mode_captures_wire_diagnostics() {
    let base = start_server();

    let mut client = HttpClient::new();
    client
        .set_url(format!("{base}/api/users"))
        .set_debug();
    client.execute().unwrap();

    let report = client.debug().unwrap();
    assert_eq!(report.code, 200);
    assert_eq!(report.errno, 0);
    let diagnostics = report.diagnostics.expect("debug mode captures diagnostics");
    assert!(diagnostics.request_headers.starts_with("GET http://"));
    assert!(diagnostics.response_header_bytes > 0);
}

#[test]
fn refused_connection_is_recorded_not_raised() {
    // Grab a port that nothing listens on.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let mut client = HttpClient::new();
    client.set_url(format!("http://{addr}/api/users"));
    client.execute().unwrap();

    assert_eq!(client.http_code(), Some(0));
    assert!(client.transport_error().is_some());
    let report = client.debug().unwrap();
    assert_ne!(report.errno, 0);
    assert!(report.error.is_some());
}
