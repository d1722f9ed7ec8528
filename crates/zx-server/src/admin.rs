use super::parse;
use actix_web::HttpResponse;
use actix_web::web;
use serde::Deserialize;
use zx_auth::Admin;
use zx_auth::Message;
use zx_auth::Rejection;
use zx_records::Award;
use zx_records::Db;
use zx_records::Games;
use zx_records::Users;

#[derive(Debug, Deserialize)]
pub struct BadgeRequest {
    #[serde(default)]
    pub badge: Option<String>,
}

/// Every account. Password hashes are never serialized.
pub async fn users(db: web::Data<Db>, _: Admin) -> Result<HttpResponse, Rejection> {
    Ok(HttpResponse::Ok().json(db.users().await?))
}

pub async fn games(db: web::Data<Db>, _: Admin) -> Result<HttpResponse, Rejection> {
    Ok(HttpResponse::Ok().json(db.games().await?))
}

pub async fn remove_user(
    db: web::Data<Db>,
    admin: Admin,
    path: web::Path<String>,
) -> Result<HttpResponse, Rejection> {
    if let Some(id) = parse(&path) {
        db.remove_user(id).await?;
        log::info!("{} deleted user {}", admin.user().username(), id);
    }
    Ok(HttpResponse::Ok().json(Message::new("User deleted")))
}

pub async fn remove_game(
    db: web::Data<Db>,
    admin: Admin,
    path: web::Path<String>,
) -> Result<HttpResponse, Rejection> {
    if let Some(id) = parse(&path) {
        db.remove_game(id).await?;
        log::info!("{} deleted game {}", admin.user().username(), id);
    }
    Ok(HttpResponse::Ok().json(Message::new("Game deleted")))
}

/// Grants a badge once; awarding a held badge succeeds without change.
/// A request naming no badge only confirms the user exists.
pub async fn award(
    db: web::Data<Db>,
    _: Admin,
    path: web::Path<String>,
    req: Option<web::Json<BadgeRequest>>,
) -> Result<HttpResponse, Rejection> {
    let id = parse(&path).ok_or(Rejection::NotFound("User"))?;
    let badge = req
        .and_then(|req| req.into_inner().badge)
        .filter(|b| !b.is_empty());
    let outcome = match badge {
        Some(ref badge) => db.award(id, badge).await?,
        None => match db.user(id).await? {
            Some(_) => Award::Held,
            None => Award::Missing,
        },
    };
    match outcome {
        Award::Missing => Err(Rejection::NotFound("User")),
        Award::Granted | Award::Held => Ok(HttpResponse::Ok().json(Message::new("Badge awarded"))),
    }
}
