use super::parse;
use crate::Intake;
use actix_multipart::Multipart;
use actix_web::HttpResponse;
use actix_web::web;
use serde::Serialize;
use zx_auth::Auth;
use zx_auth::Rejection;
use zx_core::ID;
use zx_core::Unique;
use zx_records::Db;
use zx_records::Game;
use zx_records::Games;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Published {
    pub message: &'static str,
    pub game_id: ID<Game>,
}

/// Accepts `title`, `description`, `thumbnail` and `gamefile` as
/// multipart form data and records the game under the caller's name.
pub async fn upload(
    db: web::Data<Db>,
    intake: web::Data<Intake>,
    auth: Auth,
    payload: Multipart,
) -> Result<HttpResponse, Rejection> {
    let game = intake
        .receive(payload)
        .await?
        .publish(auth.user().id())
        .await?;
    db.publish(&game).await?;
    log::info!("{} uploaded {} ({})", auth.user().username(), game.title(), game.id());
    Ok(HttpResponse::Ok().json(Published {
        message: "Game uploaded",
        game_id: game.id(),
    }))
}

/// Every game, creators resolved to usernames.
pub async fn listings(db: web::Data<Db>) -> Result<HttpResponse, Rejection> {
    Ok(HttpResponse::Ok().json(db.listings().await?))
}

pub async fn game(db: web::Data<Db>, path: web::Path<String>) -> Result<HttpResponse, Rejection> {
    let id = parse(&path).ok_or(Rejection::NotFound("Game"))?;
    let game = db.game(id).await?.ok_or(Rejection::NotFound("Game"))?;
    Ok(HttpResponse::Ok().json(game))
}
