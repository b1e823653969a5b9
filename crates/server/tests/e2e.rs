use std::net::SocketAddr;

use axum::Router;
use reqwest::StatusCode as HttpStatusCode;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

use server::routes::{self, auth::{ServerAuthConfig, ServerState}};

fn cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

struct TestApp {
    base_url: String,
}

async fn serve(state: ServerState) -> anyhow::Result<TestApp> {
    let app: Router = routes::build_router(state, cors());
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await { eprintln!("server error: {}", e); }
    });

    Ok(TestApp { base_url })
}

fn default_auth() -> ServerAuthConfig {
    ServerAuthConfig { protect_booking_list: true, protect_booking_writes: false }
}

fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .cookie_store(true)
        .build()
        .expect("reqwest client")
}

#[tokio::test]
async fn e2e_cookie_session_lists_own_bookings() -> anyhow::Result<()> {
    let app = serve(ServerState::in_memory("e2e-secret", 3600, default_auth())).await?;
    let http = client();

    let res = http.get(format!("{}/", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.text().await?, "Car-doctor-server is running");

    let res = http
        .post(format!("{}/bookings", app.base_url))
        .json(&json!({ "email": "owner@garage.io", "date": "2026-10-20", "service": "Oil Change" }))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);

    // no cookie yet
    let res = http.get(format!("{}/bookings?email=owner@garage.io", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::UNAUTHORIZED);

    let res = http
        .post(format!("{}/token", app.base_url))
        .json(&json!({ "email": "owner@garage.io" }))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);

    let res = http.get(format!("{}/bookings?email=owner@garage.io", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let list: Vec<Value> = res.json().await?;
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["service"], "Oil Change");

    let res = http.post(format!("{}/logout", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NO_CONTENT);
    let res = http.get(format!("{}/bookings?email=owner@garage.io", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn e2e_expired_token_is_forbidden() -> anyhow::Result<()> {
    let app = serve(ServerState::in_memory("e2e-secret", 3600, default_auth())).await?;

    let now = unix_now();
    let claims = json!({ "email": "a@x.com", "iat": now - 7200, "exp": now - 3600 });
    let token = jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        &claims,
        &jsonwebtoken::EncodingKey::from_secret(b"e2e-secret"),
    )?;

    let res = reqwest::Client::new()
        .get(format!("{}/bookings?email=a@x.com", app.base_url))
        .bearer_auth(token)
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::FORBIDDEN);
    Ok(())
}

fn unix_now() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or_default()
}

/// Runs against a real MongoDB when `MONGODB_TEST_URI` is set; skipped otherwise.
#[tokio::test]
async fn e2e_mongo_backed_catalog_and_bookings() -> anyhow::Result<()> {
    let Ok(url) = std::env::var("MONGODB_TEST_URI") else {
        eprintln!("MONGODB_TEST_URI missing; skip mongo e2e test");
        return Ok(());
    };
    let mut db_cfg = configs::DatabaseConfig::default();
    db_cfg.url = url;
    db_cfg.name = format!("car-doctor-e2e-{}", std::process::id());
    let store = models::db::connect(&db_cfg).await?;

    let auth_cfg = configs::AuthConfig { jwt_secret: "e2e-secret".into(), ..Default::default() };
    let app = serve(ServerState::from_store(&store, &auth_cfg)).await?;
    let http = client();

    let ack: Value = http
        .post(format!("{}/services/", app.base_url))
        .json(&json!({ "title": "Oil Change", "price": 40, "description": "synthetic" }))
        .send()
        .await?
        .json()
        .await?;
    let id = ack["insertedId"].as_str().unwrap_or_default().to_string();

    let summary: Value = http.get(format!("{}/services/{}", app.base_url, id)).send().await?.json().await?;
    assert_eq!(summary, json!({ "title": "Oil Change", "price": 40.0 }));

    let ack: Value = http
        .post(format!("{}/bookings", app.base_url))
        .json(&json!({ "email": "a@x.com" }))
        .send()
        .await?
        .json()
        .await?;
    let booking_id = ack["insertedId"].as_str().unwrap_or_default().to_string();

    let ack: Value = http
        .put(format!("{}/bookings/{}", app.base_url, booking_id))
        .json(&json!({ "confirm": "confirm" }))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(ack["matchedCount"], 1);

    let ack: Value = http.delete(format!("{}/bookings/{}", app.base_url, booking_id)).send().await?.json().await?;
    assert_eq!(ack["deletedCount"], 1);

    store.services().drop().await?;
    store.bookings().drop().await?;
    store.shutdown().await;
    Ok(())
}
