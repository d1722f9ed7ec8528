use actix_web::HttpResponse;
use actix_web::web;
use serde::Deserialize;
use serde::Serialize;
use zx_auth::Auth;
use zx_auth::Message;
use zx_auth::Rejection;
use zx_core::Coins;
use zx_core::Unique;
use zx_records::Db;
use zx_records::Item;
use zx_records::Items;
use zx_records::Users;

#[derive(Debug, Serialize)]
pub struct Profile {
    pub username: String,
    pub avatar: String,
    pub badges: Vec<String>,
    pub currency: Coins,
    pub inventory: Vec<Item>,
}

#[derive(Debug, Deserialize)]
pub struct AvatarRequest {
    #[serde(default)]
    pub avatar: Option<String>,
}

/// The caller's profile with every owned item resolved.
pub async fn profile(db: web::Data<Db>, auth: Auth) -> Result<HttpResponse, Rejection> {
    let user = db
        .user(auth.user().id())
        .await?
        .ok_or(Rejection::NotFound("User"))?;
    let inventory = db.items_of(user.inventory()).await?;
    Ok(HttpResponse::Ok().json(Profile {
        username: user.username().to_owned(),
        avatar: user.avatar().to_owned(),
        badges: user.badges().to_vec(),
        currency: user.currency(),
        inventory,
    }))
}

/// Replaces the avatar verbatim. A request without `avatar`, or without
/// a body at all, changes nothing.
pub async fn avatar(
    db: web::Data<Db>,
    auth: Auth,
    req: Option<web::Json<AvatarRequest>>,
) -> Result<HttpResponse, Rejection> {
    if let Some(ref avatar) = req.and_then(|req| req.into_inner().avatar) {
        db.avatar(auth.user().id(), avatar).await?;
    }
    Ok(HttpResponse::Ok().json(Message::new("Avatar updated")))
}

#[cfg(test)]
mod tests {
    use crate::testing::*;
    use actix_web::http::StatusCode;
    use actix_web::test;

    #[actix_web::test]
    async fn requires_session() {
        let db = memory();
        let app = service!(db);
        let req = test::TestRequest::get().uri("/api/profile").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Not authenticated");
    }

    #[actix_web::test]
    async fn fresh_profile() {
        let db = memory();
        let app = service!(db);
        let cookie = session!(app, "/api/signup", "alice", "pw123");
        let req = test::TestRequest::get()
            .uri("/api/profile")
            .cookie(cookie)
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(
            body,
            serde_json::json!({
                "username": "alice",
                "avatar": "",
                "badges": [],
                "currency": 1000,
                "inventory": [],
            })
        );
    }

    #[actix_web::test]
    async fn avatar_is_replaced() {
        let db = memory();
        let app = service!(db);
        let cookie = session!(app, "/api/signup", "alice", "pw123");
        let req = test::TestRequest::post()
            .uri("/api/avatar")
            .cookie(cookie.clone())
            .set_json(serde_json::json!({ "avatar": "data:image/png;base64,AAAA" }))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["message"], "Avatar updated");
        let req = test::TestRequest::get()
            .uri("/api/profile")
            .cookie(cookie)
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["avatar"], "data:image/png;base64,AAAA");
    }

    #[actix_web::test]
    async fn avatar_without_body_is_a_no_op() {
        let db = memory();
        let app = service!(db);
        let cookie = session!(app, "/api/signup", "alice", "pw123");
        let req = test::TestRequest::post()
            .uri("/api/avatar")
            .cookie(cookie.clone())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Avatar updated");
        let req = test::TestRequest::get()
            .uri("/api/profile")
            .cookie(cookie)
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["avatar"], "");
    }

    #[actix_web::test]
    async fn stale_session_without_body_on_a_slow_store() {
        use zx_records::Users;
        let db = sluggish();
        let app = service!(db);
        let cookie = session!(app, "/api/signup", "alice", "pw123");
        let alice = db.named("alice").await.unwrap().unwrap();
        db.remove_user(zx_core::Unique::id(&alice)).await.unwrap();
        let req = test::TestRequest::post()
            .uri("/api/avatar")
            .cookie(cookie)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn deleted_user_loses_session() {
        use zx_records::Users;
        let db = memory();
        let app = service!(db);
        let cookie = session!(app, "/api/signup", "alice", "pw123");
        let alice = db.named("alice").await.unwrap().unwrap();
        db.remove_user(zx_core::Unique::id(&alice)).await.unwrap();
        let req = test::TestRequest::get()
            .uri("/api/profile")
            .cookie(cookie)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
}
