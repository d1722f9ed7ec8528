use super::*;
use chrono::DateTime;
use chrono::Utc;
use zx_core::ID;
use zx_core::SESSION_DURATION;
use zx_core::Unique;

/// Server-side login session. Its existence is what makes a cookie valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    id: ID<Self>,
    user: ID<User>,
    expires: DateTime<Utc>,
}

impl Unique for Session {
    fn id(&self) -> ID<Self> {
        self.id
    }
}

impl Session {
    pub fn new(user: ID<User>) -> Self {
        Self {
            id: ID::default(),
            user,
            expires: Utc::now()
                + chrono::Duration::from_std(SESSION_DURATION).unwrap_or(chrono::Duration::days(1)),
        }
    }
    /// Session ending at an explicit instant.
    pub fn until(user: ID<User>, expires: DateTime<Utc>) -> Self {
        Self {
            id: ID::default(),
            user,
            expires,
        }
    }
    pub fn user(&self) -> ID<User> {
        self.user
    }
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires
    }
    pub fn expired(&self) -> bool {
        self.expires <= Utc::now()
    }
}

#[cfg(feature = "database")]
mod schema {
    use super::*;
    use zx_pg::*;

    impl Schema for Session {
        fn name() -> &'static str {
            SESSIONS
        }
        fn creates() -> &'static str {
            const_format::concatcp!(
                "CREATE TABLE IF NOT EXISTS ",
                SESSIONS,
                " (
                    id          UUID PRIMARY KEY,
                    user_id     UUID NOT NULL REFERENCES ",
                USERS,
                "(id) ON DELETE CASCADE,
                    expires_at  TIMESTAMPTZ NOT NULL
                );"
            )
        }
        fn indices() -> &'static str {
            const_format::concatcp!(
                "CREATE INDEX IF NOT EXISTS idx_sessions_user ON ",
                SESSIONS,
                " (user_id);
                 CREATE INDEX IF NOT EXISTS idx_sessions_expires ON ",
                SESSIONS,
                " (expires_at);"
            )
        }
    }

    impl TryFrom<&tokio_postgres::Row> for Session {
        type Error = PgErr;
        fn try_from(row: &tokio_postgres::Row) -> Result<Self, Self::Error> {
            Ok(Self {
                id: ID::from(row.try_get::<_, uuid::Uuid>("id")?),
                user: ID::from(row.try_get::<_, uuid::Uuid>("user_id")?),
                expires: row.try_get("expires_at")?,
            })
        }
    }
}
