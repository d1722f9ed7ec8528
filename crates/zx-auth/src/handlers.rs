use super::*;
use actix_web::HttpRequest;
use actix_web::HttpResponse;
use actix_web::cookie::Cookie;
use actix_web::web;
use zx_core::Unique;
use zx_records::Db;
use zx_records::Session;
use zx_records::Sessions;
use zx_records::User;
use zx_records::Users;

/// Opens a server-side session for the user and signs its cookie.
async fn establish(db: &Db, crypto: &Crypto, user: &User) -> Result<Cookie<'static>, Rejection> {
    let ref session = Session::new(user.id());
    db.open(session).await?;
    crypto
        .cookie(&Claims::new(user.id(), session.id()))
        .map_err(Rejection::internal)
}

pub async fn signup(
    db: web::Data<Db>,
    crypto: web::Data<Crypto>,
    req: web::Json<Credentials>,
) -> Result<HttpResponse, Rejection> {
    let (username, password) = req
        .pair()
        .ok_or_else(|| Rejection::bad("Username and password required"))?;
    if db.named(username).await?.is_some() {
        return Err(Rejection::UsernameTaken);
    }
    let secret = password.to_owned();
    let hashword = web::block(move || password::hash(&secret))
        .await
        .map_err(Rejection::internal)?
        .map_err(Rejection::internal)?;
    let ref user = User::new(username.to_owned(), hashword);
    db.insert(user).await?;
    let cookie = establish(&db, &crypto, user).await?;
    log::info!("signed up {} ({})", user.username(), user.id());
    Ok(HttpResponse::Ok().cookie(cookie).json(AuthResponse {
        message: "Signup successful",
        user_id: user.id(),
        username: user.username().to_owned(),
    }))
}

/// Unknown usernames and wrong passwords are indistinguishable.
pub async fn login(
    db: web::Data<Db>,
    crypto: web::Data<Crypto>,
    req: web::Json<Credentials>,
) -> Result<HttpResponse, Rejection> {
    let (username, password) = req.pair().ok_or(Rejection::InvalidCredentials)?;
    let user = db
        .named(username)
        .await?
        .ok_or(Rejection::InvalidCredentials)?;
    let secret = password.to_owned();
    let hashword = user.hashword().to_owned();
    let valid = web::block(move || password::verify(&secret, &hashword))
        .await
        .map_err(Rejection::internal)?;
    if !valid {
        return Err(Rejection::InvalidCredentials);
    }
    let cookie = establish(&db, &crypto, &user).await?;
    log::info!("logged in {} ({})", user.username(), user.id());
    Ok(HttpResponse::Ok().cookie(cookie).json(AuthResponse {
        message: "Login successful",
        user_id: user.id(),
        username: user.username().to_owned(),
    }))
}

/// Always succeeds and always clears the cookie.
pub async fn logout(
    db: web::Data<Db>,
    crypto: web::Data<Crypto>,
    req: HttpRequest,
) -> Result<HttpResponse, Rejection> {
    if let Some(claims) = token(&req).and_then(|t| crypto.decode(&t).ok()) {
        db.close(claims.session()).await?;
        log::info!("logged out session {}", claims.session());
    }
    Ok(HttpResponse::Ok()
        .cookie(Crypto::expired())
        .json(Message::new("Logged out")))
}
