use zx_core::ID;
use zx_core::SESSION_DURATION;
use zx_records::Session;
use zx_records::User;

fn now() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or_default()
}

/// Payload of the signed session cookie.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Claims {
    pub sub: uuid::Uuid,
    pub sid: uuid::Uuid,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new(user: ID<User>, session: ID<Session>) -> Self {
        let now = now();
        Self {
            sub: user.inner(),
            sid: session.inner(),
            iat: now,
            exp: now + SESSION_DURATION.as_secs() as i64,
        }
    }
    pub fn expired(&self) -> bool {
        self.exp < now()
    }
    pub fn user(&self) -> ID<User> {
        ID::from(self.sub)
    }
    pub fn session(&self) -> ID<Session> {
        ID::from(self.sid)
    }
}
