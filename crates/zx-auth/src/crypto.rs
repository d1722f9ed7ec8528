use super::*;
use actix_web::cookie::Cookie;
use actix_web::cookie::SameSite;
use zx_core::SESSION_COOKIE;
use zx_core::SESSION_DURATION;

/// Signs and verifies session tokens with the configured secret.
pub struct Crypto {
    encoding: jsonwebtoken::EncodingKey,
    decoding: jsonwebtoken::DecodingKey,
}

impl Crypto {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding: jsonwebtoken::EncodingKey::from_secret(secret),
            decoding: jsonwebtoken::DecodingKey::from_secret(secret),
        }
    }
    pub fn encode(&self, claims: &Claims) -> Result<String, jsonwebtoken::errors::Error> {
        jsonwebtoken::encode(&jsonwebtoken::Header::default(), claims, &self.encoding)
    }
    pub fn decode(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        jsonwebtoken::decode::<Claims>(token, &self.decoding, &jsonwebtoken::Validation::default())
            .map(|data| data.claims)
    }
    /// Cookie carrying a freshly signed token, living as long as the session.
    pub fn cookie(&self, claims: &Claims) -> Result<Cookie<'static>, jsonwebtoken::errors::Error> {
        Ok(Cookie::build(SESSION_COOKIE, self.encode(claims)?)
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .max_age(actix_web::cookie::time::Duration::seconds(
                SESSION_DURATION.as_secs() as i64,
            ))
            .finish())
    }
    /// Cookie instructing the client to forget its session.
    pub fn expired() -> Cookie<'static> {
        let mut cookie = Cookie::build(SESSION_COOKIE, "")
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .finish();
        cookie.make_removal();
        cookie
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zx_core::ID;

    #[test]
    fn round_trips_claims() {
        let crypto = Crypto::new(b"secret");
        let claims = Claims::new(ID::default(), ID::default());
        let token = crypto.encode(&claims).unwrap();
        assert_eq!(crypto.decode(&token).unwrap(), claims);
    }

    #[test]
    fn foreign_secret_is_refused() {
        let ours = Crypto::new(b"secret");
        let theirs = Crypto::new(b"other");
        let token = theirs.encode(&Claims::new(ID::default(), ID::default())).unwrap();
        assert!(ours.decode(&token).is_err());
    }

    #[test]
    fn cookie_lasts_a_day() {
        let crypto = Crypto::new(b"secret");
        let cookie = crypto.cookie(&Claims::new(ID::default(), ID::default())).unwrap();
        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(
            cookie.max_age(),
            Some(actix_web::cookie::time::Duration::days(1))
        );
    }
}
