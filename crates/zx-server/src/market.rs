use super::parse;
use actix_web::HttpResponse;
use actix_web::web;
use serde::Serialize;
use zx_auth::Auth;
use zx_auth::Rejection;
use zx_core::Coins;
use zx_core::Unique;
use zx_records::Db;
use zx_records::Items;
use zx_records::Purchase;
use zx_records::Users;

#[derive(Debug, Serialize)]
pub struct Receipt {
    pub message: &'static str,
    pub currency: Coins,
}

/// The whole catalog, unfiltered.
pub async fn items(db: web::Data<Db>) -> Result<HttpResponse, Rejection> {
    Ok(HttpResponse::Ok().json(db.items().await?))
}

/// Debits the item's price and adds it to the caller's inventory.
/// The balance and ownership checks and the debit happen atomically in
/// the store, so concurrent purchases cannot overdraw or double-buy.
pub async fn buy(
    db: web::Data<Db>,
    auth: Auth,
    path: web::Path<String>,
) -> Result<HttpResponse, Rejection> {
    let id = parse(&path).ok_or(Rejection::NotFound("Item"))?;
    let item = db.item(id).await?.ok_or(Rejection::NotFound("Item"))?;
    match db.purchase(auth.user().id(), &item).await? {
        Purchase::Bought(currency) => {
            log::info!("{} bought {} for {}", auth.user().username(), item.name(), item.price());
            Ok(HttpResponse::Ok().json(Receipt {
                message: "Item purchased",
                currency,
            }))
        }
        Purchase::Broke => Err(Rejection::InsufficientFunds),
        Purchase::Owned => Err(Rejection::AlreadyOwned),
        Purchase::Missing => Err(Rejection::NotFound("User")),
    }
}
