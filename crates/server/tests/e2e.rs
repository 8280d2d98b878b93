use std::net::SocketAddr;
use std::sync::Arc;

use chrono::{Duration, Utc};
use configs::StorageConfig;
use jsonwebtoken::{encode, EncodingKey, Header};
use reqwest::StatusCode as HttpStatusCode;
use serde_json::{json, Value};
use server::{routes, AppState};
use service::{identity::JwtVerifier, objects::MemoryObjectStore, store::MemoryDocumentStore};
use tokio::net::TcpListener;

const SECRET: &str = "e2e-secret";

struct TestApp {
    base_url: String,
}

async fn start_server() -> anyhow::Result<TestApp> {
    let state = AppState::new(
        Arc::new(MemoryDocumentStore::new()),
        Arc::new(MemoryObjectStore::new()),
        Arc::new(JwtVerifier::new(SECRET)),
        &StorageConfig::default(),
        1024 * 1024,
    );
    let app = routes::build_router(state);
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            eprintln!("server error: {}", e);
        }
    });

    Ok(TestApp { base_url })
}

fn token(email_verified: bool) -> anyhow::Result<String> {
    let exp = (Utc::now() + Duration::hours(1)).timestamp();
    let claims = json!({"sub": "owner-42", "exp": exp, "email_verified": email_verified});
    Ok(encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET.as_bytes()))?)
}

#[tokio::test]
async fn e2e_public_health() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = reqwest::Client::new()
        .get(format!("{}/health", app.base_url))
        .header("Origin", "http://localhost:5173")
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.headers()["access-control-allow-origin"], "http://localhost:5173");
    let body: Value = res.json().await?;
    assert_eq!(body["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn e2e_business_with_image() -> anyhow::Result<()> {
    let app = start_server().await?;
    let client = reqwest::Client::new();
    let bearer = format!("Bearer {}", token(true)?);

    let res = client
        .post(format!("{}/businesses/", app.base_url))
        .header("Authorization", &bearer)
        .json(&json!({"name": "Barber", "category": "beauty"}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let created: Value = res.json().await?;
    assert_eq!(created["userId"], "owner-42");
    let id = created["id"].as_str().unwrap_or_default().to_string();

    let res = client
        .post(format!("{}/businesses/{}/images", app.base_url, id))
        .header("Authorization", &bearer)
        .body(vec![0xFFu8, 0xD8, 0xFF])
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);

    let got: Value = client.get(format!("{}/businesses/{}", app.base_url, id)).send().await?.json().await?;
    assert_eq!(got["images"].as_array().map(Vec::len), Some(1));

    let listed: Value = client.get(format!("{}/businesses?category=beauty", app.base_url)).send().await?.json().await?;
    assert_eq!(listed.as_array().map(Vec::len), Some(1));
    Ok(())
}

#[tokio::test]
async fn e2e_unverified_email_is_rejected() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = reqwest::Client::new()
        .post(format!("{}/clients/", app.base_url))
        .header("Authorization", token(false)?)
        .json(&json!({"firstName": "A", "lastName": "B"}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::UNAUTHORIZED);
    let body: Value = res.json().await?;
    assert_eq!(body, json!({"error": "email not verified"}));
    Ok(())
}
