use super::*;
use actix_web::FromRequest;
use actix_web::HttpRequest;
use actix_web::dev::Payload;
use actix_web::web;
use std::future::Future;
use std::pin::Pin;
use zx_core::SESSION_COOKIE;
use zx_records::Db;
use zx_records::Sessions;
use zx_records::User;
use zx_records::Users;

/// Extractor for authenticated requests.
///
/// Verifies the session cookie, checks the session record still exists,
/// and resolves its user. Any failure along the way, including a user
/// deleted since login, is a 401. One store round-trip per step; nothing
/// is cached between requests.
pub struct Auth {
    user: User,
    claims: Claims,
}

impl Auth {
    pub fn user(&self) -> &User {
        &self.user
    }
    pub fn claims(&self) -> &Claims {
        &self.claims
    }
    pub fn into_user(self) -> User {
        self.user
    }
}

/// Reads the session token from the request's cookie jar.
pub fn token(req: &HttpRequest) -> Option<String> {
    req.cookie(SESSION_COOKIE).map(|c| c.value().to_owned())
}

/// Verifies the token and resolves the session's user.
pub async fn resolve(db: &Db, crypto: &Crypto, token: Option<String>) -> Result<Auth, Rejection> {
    let claims = token
        .and_then(|t| crypto.decode(&t).ok())
        .filter(|c| !c.expired())
        .ok_or(Rejection::Unauthenticated)?;
    let session = db
        .session(claims.session())
        .await?
        .filter(|s| !s.expired())
        .filter(|s| s.user() == claims.user())
        .ok_or(Rejection::Unauthenticated)?;
    let user = db
        .user(session.user())
        .await?
        .ok_or(Rejection::Unauthenticated)?;
    Ok(Auth { user, claims })
}

impl FromRequest for Auth {
    type Error = Rejection;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;
    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let crypto = req.app_data::<web::Data<Crypto>>().cloned();
        let db = req.app_data::<web::Data<Db>>().cloned();
        let token = token(req);
        Box::pin(async move {
            let crypto = crypto.ok_or_else(|| Rejection::internal("session signing not configured"))?;
            let db = db.ok_or_else(|| Rejection::internal("store not configured"))?;
            resolve(&db, &crypto, token).await
        })
    }
}

/// Extractor for administrator-only requests: 401 without a session,
/// 403 when the session's user is not an administrator.
pub struct Admin(pub User);

impl Admin {
    pub fn user(&self) -> &User {
        &self.0
    }
}

impl FromRequest for Admin {
    type Error = Rejection;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;
    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let auth = Auth::from_request(req, payload);
        Box::pin(async move {
            let user = auth.await?.into_user();
            match user.is_admin() {
                true => Ok(Admin(user)),
                false => Err(Rejection::Forbidden),
            }
        })
    }
}
