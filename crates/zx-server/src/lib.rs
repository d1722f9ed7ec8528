//! Game Sharing & Marketplace Backend
//!
//! Session-authenticated REST API: accounts, profiles, game uploads,
//! a virtual goods marketplace and administrator moderation, served
//! by a single actix-web server.
//!
//! ## Submodules
//!
//! - [`profile`] — Caller's profile and avatar
//! - [`market`] — Item catalog and purchases
//! - [`games`] — Game uploads and browsing
//! - [`admin`] — Moderation routes
//! - [`intake`] — Multipart file intake
//! - [`config`] — Startup configuration
pub mod admin;
pub mod config;
pub mod games;
pub mod intake;
pub mod market;
pub mod profile;

#[cfg(test)]
mod testing;

pub use config::Config;
pub use intake::Intake;

use actix_cors::Cors;
use actix_web::App;
use actix_web::HttpResponse;
use actix_web::HttpServer;
use actix_web::Responder;
use actix_web::middleware::Logger;
use actix_web::web;
use std::sync::Arc;
use zx_auth::Crypto;
use zx_auth::Rejection;
use zx_core::UPLOADS_PREFIX;
use zx_records::Db;
use zx_records::Items;
use zx_records::Memory;
use zx_records::Stock;
use zx_records::Store;

async fn index() -> impl Responder {
    HttpResponse::Ok().body("Zentrix backend is running.")
}

async fn health(db: web::Data<Db>) -> impl Responder {
    match db.ping().await {
        Ok(_) => HttpResponse::Ok().body("ok"),
        Err(_) => HttpResponse::ServiceUnavailable().body("database unavailable"),
    }
}

/// Malformed JSON bodies are rejected in the same shape as every other error.
pub fn json() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _| Rejection::bad(err.to_string()).into())
}

async fn unrouted() -> Result<HttpResponse, Rejection> {
    Err(Rejection::NotFound("Route"))
}

/// Parses an identifier path segment; garbage resolves to nothing.
pub(crate) fn parse<T>(raw: &str) -> Option<zx_core::ID<T>> {
    zx_core::ID::try_from(raw).ok()
}

/// Every route of the API. Expects `Data<Db>`, `Data<Crypto>` and
/// `Data<Intake>` to be registered.
#[rustfmt::skip]
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/", web::get().to(index))
        .route("/health", web::get().to(health))
        .service(
            web::scope("/api")
                .route("/signup", web::post().to(zx_auth::signup))
                .route("/login", web::post().to(zx_auth::login))
                .route("/logout", web::post().to(zx_auth::logout))
                .route("/profile", web::get().to(profile::profile))
                .route("/avatar", web::post().to(profile::avatar))
                .route("/items", web::get().to(market::items))
                .route("/items/buy/{item_id}", web::post().to(market::buy))
                .route("/games", web::post().to(games::upload))
                .route("/games", web::get().to(games::listings))
                .route("/games/{id}", web::get().to(games::game))
                .service(
                    web::scope("/admin")
                        .route("/users", web::get().to(admin::users))
                        .route("/users/{id}", web::delete().to(admin::remove_user))
                        .route("/users/{id}/badges", web::post().to(admin::award))
                        .route("/games", web::get().to(admin::games))
                        .route("/games/{id}", web::delete().to(admin::remove_game)),
                ),
        )
        .default_service(web::to(unrouted));
}

/// Connects to PostgreSQL and creates the tables, or falls back to
/// an in-memory store when no connection string is configured.
pub async fn store(config: &Config) -> anyhow::Result<Db> {
    match config.db_url {
        Some(ref url) => {
            let client = zx_pg::db(url).await?;
            zx_records::migrate(&client).await?;
            Ok(client as Db)
        }
        None => Ok(Arc::new(Memory::new())),
    }
}

/// Stocks the catalog from a seed file, skipping names already on sale.
pub async fn seed(db: &Db, path: &std::path::Path) -> anyhow::Result<usize> {
    let stock: Vec<Stock> = serde_json::from_slice(&tokio::fs::read(path).await?)?;
    let existing = db.items().await?;
    let mut stocked = 0;
    for entry in stock {
        if existing.iter().any(|i| i.name() == entry.name) {
            continue;
        }
        let item = zx_records::Item::try_from(entry).map_err(anyhow::Error::msg)?;
        db.stock(&item).await?;
        stocked += 1;
    }
    log::info!("stocked {} catalog items from {}", stocked, path.display());
    Ok(stocked)
}

fn cors(origin: Option<&str>) -> Cors {
    match origin {
        Some(origin) => Cors::default()
            .allowed_origin(origin)
            .allow_any_method()
            .allow_any_header()
            .supports_credentials(),
        None => Cors::permissive(),
    }
}

pub async fn run(config: Config) -> anyhow::Result<()> {
    config.warn();
    let db = store(&config).await?;
    if let Some(ref path) = config.seed {
        seed(&db, path).await?;
    }
    let intake = Intake::new(config.uploads.clone());
    intake.prepare().await?;
    let db = web::Data::new(db);
    let crypto = web::Data::new(Crypto::new(config.session_secret.as_bytes()));
    let intake = web::Data::new(intake);
    let origin = config.client_origin.clone();
    log::info!("starting server on port {}", config.port);
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::new("%r %s %Ts"))
            .wrap(cors(origin.as_deref()))
            .app_data(db.clone())
            .app_data(crypto.clone())
            .app_data(intake.clone())
            .app_data(json())
            .service(actix_files::Files::new(UPLOADS_PREFIX, intake.root()))
            .configure(configure)
    })
    .workers(config.workers)
    .bind(config.bind())?
    .run()
    .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::testing::*;
    use actix_web::http::StatusCode;
    use actix_web::test;
    use actix_web::web;
    use zx_records::Users;

    fn credentials(path: &str, body: serde_json::Value) -> actix_web::test::TestRequest {
        test::TestRequest::post().uri(path).set_json(body)
    }

    #[actix_web::test]
    async fn index_and_health() {
        let db = memory();
        let app = service!(db);
        let req = test::TestRequest::get().uri("/").to_request();
        let body = test::call_and_read_body(&app, req).await;
        assert_eq!(body, web::Bytes::from_static(b"Zentrix backend is running."));
        let req = test::TestRequest::get().uri("/health").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn unknown_routes_answer_in_json() {
        let db = memory();
        let app = service!(db);
        for uri in ["/nowhere", "/api/nowhere", "/api/admin/nowhere"] {
            let req = test::TestRequest::get().uri(uri).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{}", uri);
            let body: serde_json::Value = test::read_body_json(resp).await;
            assert_eq!(body["error"], "Route not found");
        }
    }

    #[actix_web::test]
    async fn signup_creates_default_account() {
        let db = memory();
        let app = service!(db);
        let req = credentials("/api/signup", serde_json::json!({ "username": "alice", "password": "pw123" }));
        let resp = test::call_service(&app, req.to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let cookie = cookie(&resp);
        assert!(cookie.http_only().unwrap_or(false));
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Signup successful");
        assert_eq!(body["username"], "alice");
        assert!(body.get("password").is_none());

        let alice = db.named("alice").await.unwrap().unwrap();
        assert_eq!(body["userId"], zx_core::Unique::id(&alice).to_string());
        assert_eq!(alice.currency(), 1000);
        assert!(alice.badges().is_empty());
        assert!(alice.inventory().is_empty());
        assert!(!alice.is_admin());
        assert_ne!(alice.hashword(), "pw123");
        assert!(zx_auth::password::verify("pw123", alice.hashword()));
    }

    #[actix_web::test]
    async fn signup_twice_is_rejected() {
        let db = memory();
        let app = service!(db);
        let _ = session!(app, "/api/signup", "alice", "pw123");
        let req = credentials("/api/signup", serde_json::json!({ "username": "alice", "password": "other" }));
        let resp = test::call_service(&app, req.to_request()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Username already taken");
        assert_eq!(db.users().await.unwrap().len(), 1);
    }

    #[actix_web::test]
    async fn signup_requires_both_fields() {
        let db = memory();
        let app = service!(db);
        for body in [
            serde_json::json!({ "username": "alice" }),
            serde_json::json!({ "password": "pw123" }),
            serde_json::json!({ "username": "", "password": "pw123" }),
        ] {
            let resp = test::call_service(&app, credentials("/api/signup", body).to_request()).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
            let body: serde_json::Value = test::read_body_json(resp).await;
            assert_eq!(body["error"], "Username and password required");
        }
    }

    #[actix_web::test]
    async fn malformed_json_is_400() {
        let db = memory();
        let app = service!(db);
        let req = test::TestRequest::post()
            .uri("/api/login")
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert!(body["error"].is_string());
    }

    #[actix_web::test]
    async fn login_failures_look_alike() {
        let db = memory();
        let app = service!(db);
        let _ = session!(app, "/api/signup", "alice", "pw123");
        let mut errors = Vec::new();
        for body in [
            serde_json::json!({ "username": "alice", "password": "wrong" }),
            serde_json::json!({ "username": "nobody", "password": "pw123" }),
        ] {
            let resp = test::call_service(&app, credentials("/api/login", body).to_request()).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
            assert!(resp.response().cookies().next().is_none());
            let body: serde_json::Value = test::read_body_json(resp).await;
            errors.push(body["error"].clone());
        }
        assert_eq!(errors[0], "Invalid credentials");
        assert_eq!(errors[0], errors[1]);
    }

    #[actix_web::test]
    async fn login_then_logout() {
        let db = memory();
        let app = service!(db);
        let _ = session!(app, "/api/signup", "alice", "pw123");
        let cookie = session!(app, "/api/login", "alice", "pw123");

        let req = test::TestRequest::post().uri("/api/logout").cookie(cookie.clone()).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let cleared = resp
            .response()
            .cookies()
            .find(|c| c.name() == zx_core::SESSION_COOKIE)
            .map(|c| c.value().to_owned());
        assert_eq!(cleared.as_deref(), Some(""));
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Logged out");

        // the old token no longer opens anything
        let req = test::TestRequest::get().uri("/api/profile").cookie(cookie).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let req = test::TestRequest::post().uri("/api/logout").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn forged_cookie_is_401() {
        let db = memory();
        let app = service!(db);
        let req = test::TestRequest::get()
            .uri("/api/profile")
            .cookie(actix_web::cookie::Cookie::new(zx_core::SESSION_COOKIE, "garbage"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn seeding_skips_existing_names() {
        use zx_records::Items;
        let db = memory();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("items.json");
        let stock = serde_json::json!([
            { "name": "Red Hat", "price": 300, "image": "/img/hat.png", "type": "hat" },
            { "name": "Blue Cape", "price": 450, "image": "/img/cape.png", "type": "cape" },
        ]);
        std::fs::write(&path, stock.to_string()).unwrap();
        assert_eq!(super::seed(&db, &path).await.unwrap(), 2);
        assert_eq!(super::seed(&db, &path).await.unwrap(), 0);
        assert_eq!(db.items().await.unwrap().len(), 2);
    }
}
