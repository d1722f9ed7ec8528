use super::*;
use zx_core::Coins;
use zx_core::ID;

/// Shared handle to whichever store backs the process.
pub type Db = std::sync::Arc<dyn Store>;

/// Failure of the underlying storage engine.
#[derive(Debug, thiserror::Error)]
pub enum StoreErr {
    #[error("username already taken")]
    Taken,
    #[cfg(feature = "database")]
    #[error("database error: {0}")]
    Pg(#[from] tokio_postgres::Error),
}

/// Outcome of an attempted purchase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Purchase {
    /// Debited; carries the new balance.
    Bought(Coins),
    Broke,
    Owned,
    /// The buyer no longer exists.
    Missing,
}

/// Outcome of awarding a badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Award {
    Granted,
    Held,
    Missing,
}

#[async_trait::async_trait]
pub trait Users: Send + Sync {
    async fn user(&self, id: ID<User>) -> Result<Option<User>, StoreErr>;
    async fn named(&self, username: &str) -> Result<Option<User>, StoreErr>;
    async fn users(&self) -> Result<Vec<User>, StoreErr>;
    /// Fails with [`StoreErr::Taken`] when the username exists.
    async fn insert(&self, user: &User) -> Result<(), StoreErr>;
    async fn avatar(&self, id: ID<User>, avatar: &str) -> Result<(), StoreErr>;
    /// Appends the badge unless held, as one atomic step.
    async fn award(&self, id: ID<User>, badge: &str) -> Result<Award, StoreErr>;
    /// Checks funds and ownership and applies the debit as one atomic step.
    async fn purchase(&self, id: ID<User>, item: &Item) -> Result<Purchase, StoreErr>;
    /// Deleting an unknown id is not an error.
    async fn remove_user(&self, id: ID<User>) -> Result<(), StoreErr>;
}

#[async_trait::async_trait]
pub trait Games: Send + Sync {
    async fn game(&self, id: ID<Game>) -> Result<Option<Listing>, StoreErr>;
    async fn listings(&self) -> Result<Vec<Listing>, StoreErr>;
    async fn games(&self) -> Result<Vec<Game>, StoreErr>;
    async fn publish(&self, game: &Game) -> Result<(), StoreErr>;
    /// Deleting an unknown id is not an error.
    async fn remove_game(&self, id: ID<Game>) -> Result<(), StoreErr>;
}

#[async_trait::async_trait]
pub trait Items: Send + Sync {
    async fn item(&self, id: ID<Item>) -> Result<Option<Item>, StoreErr>;
    async fn items(&self) -> Result<Vec<Item>, StoreErr>;
    /// Resolves references in the given order, skipping dangling ones.
    async fn items_of(&self, ids: &[ID<Item>]) -> Result<Vec<Item>, StoreErr>;
    async fn stock(&self, item: &Item) -> Result<(), StoreErr>;
}

#[async_trait::async_trait]
pub trait Sessions: Send + Sync {
    async fn open(&self, session: &Session) -> Result<(), StoreErr>;
    async fn session(&self, id: ID<Session>) -> Result<Option<Session>, StoreErr>;
    /// Closing an unknown session is not an error.
    async fn close(&self, id: ID<Session>) -> Result<(), StoreErr>;
}

/// Everything a request handler may touch.
#[async_trait::async_trait]
pub trait Store: Users + Games + Items + Sessions {
    /// Round-trips to the storage engine.
    async fn ping(&self) -> Result<(), StoreErr>;
}
