//! Integration tests for the REST client against a local HTTP server.
//!
//! The server is a plain `std::net::TcpListener` on a background thread
//! answering a fixed list of canned responses, one connection each.
//!
//! Run with: `cargo test --test api_client_integration`

use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use sellermap::api::{
    ApiClient, ApiConfig, ApiError, LoginCredentials, SellerData, SessionApi, UserData,
};
use sellermap::entity::PresenceStatus;
use sellermap::geo::{GeoPoint, Viewport, ViewportQuery};

// ============================================================================
// Helper Functions
// ============================================================================

/// A request as seen by the test server.
#[derive(Debug)]
struct Recorded {
    request_line: String,
    headers: Vec<(String, String)>,
    body: String,
}

impl Recorded {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

struct Canned {
    status: &'static str,
    extra_headers: &'static str,
    body: &'static str,
}

fn canned(status: &'static str, body: &'static str) -> Canned {
    Canned {
        status,
        extra_headers: "",
        body,
    }
}

/// Serve `responses` in order and report each request on the returned channel.
fn serve(responses: Vec<Canned>) -> (String, mpsc::Receiver<Recorded>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        for response in responses {
            let (stream, _) = match listener.accept() {
                Ok(conn) => conn,
                Err(_) => return,
            };
            let recorded = handle(stream, &response);
            if tx.send(recorded).is_err() {
                return;
            }
        }
    });

    (format!("http://{}/api", addr), rx)
}

fn handle(mut stream: TcpStream, response: &Canned) -> Recorded {
    let mut reader = BufReader::new(stream.try_clone().unwrap());

    let mut request_line = String::new();
    reader.read_line(&mut request_line).unwrap();

    let mut headers = Vec::new();
    loop {
        let mut line = String::new();
        reader.read_line(&mut line).unwrap();
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((k, v)) = line.split_once(':') {
            headers.push((k.trim().to_string(), v.trim().to_string()));
        }
    }

    let length = headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, v)| v.parse::<usize>().ok())
        .unwrap_or(0);
    let mut body = vec![0u8; length];
    reader.read_exact(&mut body).unwrap();

    let reply = format!(
        "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n{}\r\n{}",
        response.status,
        response.body.len(),
        response.extra_headers,
        response.body
    );
    stream.write_all(reply.as_bytes()).unwrap();
    stream.flush().unwrap();

    Recorded {
        request_line: request_line.trim_end().to_string(),
        headers,
        body: String::from_utf8(body).unwrap(),
    }
}

fn client(base_url: &str) -> ApiClient {
    ApiClient::new(&ApiConfig::new(base_url).with_timeout(Duration::from_secs(5))).unwrap()
}

fn recv(rx: &mpsc::Receiver<Recorded>) -> Recorded {
    rx.recv_timeout(Duration::from_secs(5)).unwrap()
}

const SELLERS_BODY: &str = r#"{"data":[
    {"id":1,"user_id":11,"username":"ana","rating_avg":4.8,"presence_status":"online",
     "location":{"latitude":37.78,"longitude":-122.43}},
    {"id":2,"user_id":12,"username":"ben","rating_avg":3.9,"presence_status":"streaming",
     "location":null}
]}"#;

// ============================================================================
// Seller query
// ============================================================================

#[tokio::test]
async fn test_fetch_sellers_sends_center_and_radius() {
    let (base_url, rx) = serve(vec![canned("200 OK", SELLERS_BODY)]);
    let api = client(&base_url);
    let query = ViewportQuery::from_viewport(&Viewport::fallback());

    let sellers = api.fetch_sellers_in_viewport(&query).await.unwrap();

    assert_eq!(sellers.len(), 2);
    assert_eq!(sellers[0].username, "ana");
    assert!(sellers[0].is_renderable());
    assert_eq!(sellers[1].presence_status, PresenceStatus::Streaming);
    assert!(!sellers[1].is_renderable());

    let request = recv(&rx);
    assert!(
        request.request_line.starts_with("GET /api/map/sellers?"),
        "{}",
        request.request_line
    );
    assert!(request.request_line.contains("lat=37.78825"));
    assert!(request.request_line.contains("lon=-122.4324"));
    assert!(request
        .request_line
        .contains(&format!("radius={}", query.radius)));
    assert_eq!(request.header("accept"), Some("application/json"));
}

#[tokio::test]
async fn test_error_status_carries_body() {
    let (base_url, _rx) = serve(vec![canned(
        "500 Internal Server Error",
        r#"{"error":"boom"}"#,
    )]);
    let api = client(&base_url);
    let query = ViewportQuery::from_viewport(&Viewport::fallback());

    let err = api.fetch_sellers_in_viewport(&query).await.unwrap_err();

    assert_eq!(err.status(), Some(500));
    match err {
        ApiError::Status { body, .. } => assert_eq!(body.as_deref(), Some(r#"{"error":"boom"}"#)),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_malformed_body_is_decode_error() {
    let (base_url, _rx) = serve(vec![canned("200 OK", r#"{"sellers":[]}"#)]);
    let api = client(&base_url);
    let query = ViewportQuery::from_viewport(&Viewport::fallback());

    let err = api.fetch_sellers_in_viewport(&query).await.unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)), "{:?}", err);
}

#[tokio::test]
async fn test_unreachable_server_is_network_error() {
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    let api = client(&format!("http://{}/api", addr));
    let query = ViewportQuery::from_viewport(&Viewport::fallback());

    let err = api.fetch_sellers_in_viewport(&query).await.unwrap_err();
    assert!(err.is_network(), "{:?}", err);
}

// ============================================================================
// Session
// ============================================================================

#[tokio::test]
async fn test_login_cookie_is_sent_on_logout() {
    let (base_url, rx) = serve(vec![
        Canned {
            status: "200 OK",
            extra_headers: "Set-Cookie: _seller_key=abc123; Path=/; HttpOnly\r\n",
            body: r#"{"message":"Logged in","user_id":7}"#,
        },
        canned("200 OK", r#"{"message":"Logged out"}"#),
    ]);
    let api = client(&base_url);
    let credentials = LoginCredentials {
        email: "ana@example.com".to_string(),
        password: "hunter2".to_string(),
    };

    let login = SessionApi::login(&api, &credentials).await.unwrap();
    assert_eq!(login.user_id, Some(7));

    let request = recv(&rx);
    assert_eq!(request.request_line, "POST /api/sessions HTTP/1.1");
    let body: serde_json::Value = serde_json::from_str(&request.body).unwrap();
    assert_eq!(
        body,
        serde_json::json!({"session": {"email": "ana@example.com", "password": "hunter2"}})
    );

    let logout = SessionApi::logout(&api).await.unwrap();
    assert_eq!(logout.message, "Logged out");

    let request = recv(&rx);
    assert_eq!(request.request_line, "DELETE /api/sessions HTTP/1.1");
    assert_eq!(request.header("cookie"), Some("_seller_key=abc123"));
}

// ============================================================================
// Account and profile
// ============================================================================

fn json_body(request: &Recorded) -> serde_json::Value {
    serde_json::from_str(&request.body).unwrap()
}

#[tokio::test]
async fn test_register_user_wraps_user() {
    let (base_url, rx) = serve(vec![canned(
        "201 Created",
        r#"{"email":"ana@example.com","username":"ana","id":5}"#,
    )]);
    let api = client(&base_url);
    let user = UserData {
        email: "ana@example.com".to_string(),
        password: Some("hunter2".to_string()),
        username: Some("ana".to_string()),
        id: None,
    };

    let created = api.register_user(&user).await.unwrap();
    assert_eq!(created.id, Some(5));
    assert_eq!(created.password, None);

    let request = recv(&rx);
    assert_eq!(request.request_line, "POST /api/users HTTP/1.1");
    assert_eq!(
        json_body(&request),
        serde_json::json!({"user": {
            "email": "ana@example.com",
            "password": "hunter2",
            "username": "ana"
        }})
    );
}

#[tokio::test]
async fn test_update_seller_status_wraps_profile() {
    let (base_url, rx) = serve(vec![canned(
        "200 OK",
        r#"{"id":3,"is_seller":true,"description":"Fresh bread","presence_status":"online"}"#,
    )]);
    let api = client(&base_url);
    let seller = SellerData {
        is_seller: true,
        description: Some("Fresh bread".to_string()),
    };

    let profile = api.update_seller_status(&seller).await.unwrap();
    assert_eq!(profile.is_seller, Some(true));
    assert_eq!(profile.presence_status, Some(PresenceStatus::Online));
    assert_eq!(profile.location, None);

    let request = recv(&rx);
    assert_eq!(request.request_line, "PUT /api/profiles/me/seller HTTP/1.1");
    assert_eq!(
        json_body(&request),
        serde_json::json!({"profile": {"is_seller": true, "description": "Fresh bread"}})
    );
}

#[tokio::test]
async fn test_update_location_posts_coordinates() {
    let (base_url, rx) = serve(vec![canned(
        "200 OK",
        r#"{"id":3,"location":{"latitude":37.78,"longitude":-122.43}}"#,
    )]);
    let api = client(&base_url);
    let position = GeoPoint::new(37.78, -122.43).unwrap();

    let profile = api.update_location(&position).await.unwrap();
    assert_eq!(profile.location, Some(position));

    let request = recv(&rx);
    assert_eq!(request.request_line, "POST /api/location HTTP/1.1");
    assert_eq!(
        json_body(&request),
        serde_json::json!({"latitude": 37.78, "longitude": -122.43})
    );
    assert_eq!(request.header("content-type"), Some("application/json"));
}
