//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::body::{Body, Bytes};
use axum::http::{HeaderMap, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tower::ServiceExt;
use uuid::Uuid;

use portfolio_edge::http::HttpServer;
use portfolio_edge::lifecycle::Shutdown;
use portfolio_edge::profiles::store::SeedSession;
use portfolio_edge::profiles::{InMemoryProfileStore, LoggingObjectStorage, Photo, Profile, Seed};
use portfolio_edge::session::InMemorySessionStore;
use portfolio_edge::PortfolioConfig;

pub const BASE_DOMAIN: &str = "example.com";
pub const JANE_TOKEN: &str = "jane-session";
pub const MARA_TOKEN: &str = "mara-session";

/// Two profiles:
/// - `jane`: public, three photos with sort orders [2, 0, 1] and
///   visibility [true, false, true]
/// - `mara`: private, one photo
pub struct Fixture {
    pub store: Arc<InMemoryProfileStore>,
    pub sessions: Arc<InMemorySessionStore>,
    pub jane: Profile,
    pub jane_photos: Vec<Photo>,
    pub mara: Profile,
    pub mara_photos: Vec<Photo>,
}

pub fn config(local_development: bool) -> PortfolioConfig {
    let mut config = PortfolioConfig::default();
    config.domain.base_domain = Some(BASE_DOMAIN.to_string());
    config.domain.local_development = local_development;
    config
}

pub fn fixture() -> Fixture {
    let mut jane = Profile::new(Uuid::new_v4());
    jane.username = Some("jane".into());
    jane.display_name = Some("Jane Doe".into());
    jane.is_public = true;
    jane.onboarding_completed = true;
    jane.selected_template = Some("editorial".into());

    let mut hidden = Photo::new(jane.id, "https://cdn.test/jane/1.jpg", 0);
    hidden.is_visible = false;
    let jane_photos = vec![
        Photo::new(jane.id, "https://cdn.test/jane/0.jpg", 2),
        hidden,
        Photo::new(jane.id, "https://cdn.test/jane/2.jpg", 1),
    ];

    let mut mara = Profile::new(Uuid::new_v4());
    mara.username = Some("mara".into());
    mara.display_name = Some("Mara".into());
    let mara_photos = vec![Photo::new(mara.id, "https://cdn.test/mara/0.jpg", 0)];

    let seed = Seed {
        profiles: vec![jane.clone(), mara.clone()],
        photos: jane_photos.iter().chain(&mara_photos).cloned().collect(),
        sessions: vec![
            SeedSession {
                token: JANE_TOKEN.into(),
                profile_id: jane.id,
            },
            SeedSession {
                token: MARA_TOKEN.into(),
                profile_id: mara.id,
            },
        ],
    };

    let store = InMemoryProfileStore::from_seed(&seed).unwrap();
    let sessions = InMemorySessionStore::new();
    for session in &seed.sessions {
        sessions.insert(session.token.clone(), session.profile_id);
    }

    Fixture {
        store: Arc::new(store),
        sessions: Arc::new(sessions),
        jane,
        jane_photos,
        mara,
        mara_photos,
    }
}

impl Fixture {
    pub fn server(&self, config: PortfolioConfig) -> HttpServer {
        HttpServer::new(
            config,
            self.store.clone(),
            self.sessions.clone(),
            Arc::new(LoggingObjectStorage),
        )
        .unwrap()
    }

    pub fn router(&self) -> Router {
        self.server(config(false)).router()
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).unwrap()
    }
}

pub fn get(host: &str, path: &str) -> Request<Body> {
    Request::builder()
        .uri(path)
        .header("host", host)
        .body(Body::empty())
        .unwrap()
}

pub fn get_as(host: &str, path: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(path)
        .header("host", host)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

pub fn json_request(method: &str, path: &str, token: Option<&str>, body: serde_json::Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(path)
        .header("host", format!("app.{BASE_DOMAIN}"))
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub async fn send(router: &Router, request: Request<Body>) -> TestResponse {
    let response = router.clone().oneshot(request).await.unwrap();
    let (parts, body) = response.into_parts();
    TestResponse {
        status: parts.status,
        headers: parts.headers,
        body: body.collect().await.unwrap().to_bytes(),
    }
}

/// Run `server` on an ephemeral port. It stops when the returned
/// `Shutdown` is triggered or dropped.
pub async fn spawn_server(server: HttpServer) -> (SocketAddr, Shutdown, mpsc::UnboundedSender<PortfolioConfig>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let (updates_tx, updates_rx) = mpsc::unbounded_channel();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, updates_rx, server_shutdown).await;
    });

    tokio::time::sleep(Duration::from_millis(50)).await;
    (addr, shutdown, updates_tx)
}
