use super::*;
use zx_core::Coins;
use zx_core::ID;
use zx_core::STARTING_CURRENCY;
use zx_core::Unique;

/// Registered account.
///
/// The password hash never leaves the process: it is skipped on
/// serialization, so every view of a user (including admin listings)
/// omits it.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    id: ID<Self>,
    username: String,
    #[serde(skip_serializing)]
    hashword: String,
    avatar: String,
    is_admin: bool,
    badges: Vec<String>,
    currency: Coins,
    inventory: Vec<ID<Item>>,
}

impl User {
    /// Fresh account with the default wallet and nothing owned.
    pub fn new(username: String, hashword: String) -> Self {
        Self {
            id: ID::default(),
            username,
            hashword,
            avatar: String::new(),
            is_admin: false,
            badges: Vec::new(),
            currency: STARTING_CURRENCY,
            inventory: Vec::new(),
        }
    }
    pub fn promote(self) -> Self {
        Self {
            is_admin: true,
            ..self
        }
    }
    pub fn username(&self) -> &str {
        &self.username
    }
    pub fn hashword(&self) -> &str {
        &self.hashword
    }
    pub fn avatar(&self) -> &str {
        &self.avatar
    }
    pub fn is_admin(&self) -> bool {
        self.is_admin
    }
    pub fn badges(&self) -> &[String] {
        &self.badges
    }
    pub fn currency(&self) -> Coins {
        self.currency
    }
    pub fn inventory(&self) -> &[ID<Item>] {
        &self.inventory
    }
    pub fn owns(&self, item: ID<Item>) -> bool {
        self.inventory.contains(&item)
    }
    pub fn holds(&self, badge: &str) -> bool {
        self.badges.iter().any(|b| b == badge)
    }

    /// Decides a purchase without applying it.
    /// Funds are checked before ownership.
    pub fn checkout(&self, item: &Item) -> Purchase {
        if self.currency < item.price() {
            Purchase::Broke
        } else if self.owns(item.id()) {
            Purchase::Owned
        } else {
            Purchase::Bought(self.currency - item.price())
        }
    }
    /// Applies a purchase if [`checkout`](Self::checkout) allows it.
    pub fn buy(&mut self, item: &Item) -> Purchase {
        let outcome = self.checkout(item);
        if let Purchase::Bought(balance) = outcome {
            self.currency = balance;
            self.inventory.push(item.id());
        }
        outcome
    }
    /// Appends the badge unless already held.
    pub fn award(&mut self, badge: &str) -> Award {
        if self.holds(badge) {
            Award::Held
        } else {
            self.badges.push(badge.to_string());
            Award::Granted
        }
    }
    pub fn set_avatar(&mut self, avatar: &str) {
        self.avatar = avatar.to_string();
    }
}

impl Unique for User {
    fn id(&self) -> ID<Self> {
        self.id
    }
}

#[cfg(feature = "database")]
mod schema {
    use super::*;
    use zx_pg::*;

    impl Schema for User {
        fn name() -> &'static str {
            USERS
        }
        fn creates() -> &'static str {
            const_format::concatcp!(
                "CREATE TABLE IF NOT EXISTS ",
                USERS,
                " (
                    id          UUID PRIMARY KEY,
                    username    TEXT UNIQUE NOT NULL,
                    hashword    TEXT NOT NULL,
                    avatar      TEXT NOT NULL DEFAULT '',
                    is_admin    BOOLEAN NOT NULL DEFAULT FALSE,
                    badges      TEXT[] NOT NULL DEFAULT '{}',
                    currency    BIGINT NOT NULL DEFAULT ",
                STARTING_CURRENCY,
                " CHECK (currency >= 0),
                    inventory   UUID[] NOT NULL DEFAULT '{}'
                );"
            )
        }
        fn indices() -> &'static str {
            const_format::concatcp!(
                "CREATE INDEX IF NOT EXISTS idx_users_username ON ",
                USERS,
                " (username);"
            )
        }
    }

    impl TryFrom<&tokio_postgres::Row> for User {
        type Error = PgErr;
        fn try_from(row: &tokio_postgres::Row) -> Result<Self, Self::Error> {
            Ok(Self {
                id: ID::from(row.try_get::<_, uuid::Uuid>("id")?),
                username: row.try_get("username")?,
                hashword: row.try_get("hashword")?,
                avatar: row.try_get("avatar")?,
                is_admin: row.try_get("is_admin")?,
                badges: row.try_get("badges")?,
                currency: row.try_get("currency")?,
                inventory: row
                    .try_get::<_, Vec<uuid::Uuid>>("inventory")?
                    .into_iter()
                    .map(ID::from)
                    .collect(),
            })
        }
    }
}
