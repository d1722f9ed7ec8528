use super::*;
use std::collections::HashMap;
use tokio::sync::RwLock;
use zx_core::ID;
use zx_core::Unique;

/// In-process store. Collections keep insertion order, which is also
/// the order they are listed in.
#[derive(Default)]
pub struct Memory {
    users: RwLock<Vec<User>>,
    games: RwLock<Vec<Game>>,
    items: RwLock<Vec<Item>>,
    sessions: RwLock<HashMap<ID<Session>, Session>>,
}

impl Memory {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl Users for Memory {
    async fn user(&self, id: ID<User>) -> Result<Option<User>, StoreErr> {
        Ok(self.users.read().await.iter().find(|u| u.id() == id).cloned())
    }
    async fn named(&self, username: &str) -> Result<Option<User>, StoreErr> {
        Ok(self
            .users
            .read()
            .await
            .iter()
            .find(|u| u.username() == username)
            .cloned())
    }
    async fn users(&self) -> Result<Vec<User>, StoreErr> {
        Ok(self.users.read().await.clone())
    }
    async fn insert(&self, user: &User) -> Result<(), StoreErr> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.username() == user.username()) {
            return Err(StoreErr::Taken);
        }
        users.push(user.clone());
        Ok(())
    }
    async fn avatar(&self, id: ID<User>, avatar: &str) -> Result<(), StoreErr> {
        if let Some(user) = self.users.write().await.iter_mut().find(|u| u.id() == id) {
            user.set_avatar(avatar);
        }
        Ok(())
    }
    async fn award(&self, id: ID<User>, badge: &str) -> Result<Award, StoreErr> {
        Ok(self
            .users
            .write()
            .await
            .iter_mut()
            .find(|u| u.id() == id)
            .map(|user| user.award(badge))
            .unwrap_or(Award::Missing))
    }
    async fn purchase(&self, id: ID<User>, item: &Item) -> Result<Purchase, StoreErr> {
        Ok(self
            .users
            .write()
            .await
            .iter_mut()
            .find(|u| u.id() == id)
            .map(|user| user.buy(item))
            .unwrap_or(Purchase::Missing))
    }
    async fn remove_user(&self, id: ID<User>) -> Result<(), StoreErr> {
        self.users.write().await.retain(|u| u.id() != id);
        self.sessions.write().await.retain(|_, s| s.user() != id);
        Ok(())
    }
}

#[async_trait::async_trait]
impl Games for Memory {
    async fn game(&self, id: ID<Game>) -> Result<Option<Listing>, StoreErr> {
        let game = self.games.read().await.iter().find(|g| g.id() == id).cloned();
        match game {
            None => Ok(None),
            Some(game) => Ok(Some(self.resolve(game).await)),
        }
    }
    async fn listings(&self) -> Result<Vec<Listing>, StoreErr> {
        let games = self.games.read().await.clone();
        let mut listings = Vec::with_capacity(games.len());
        for game in games {
            listings.push(self.resolve(game).await);
        }
        Ok(listings)
    }
    async fn games(&self) -> Result<Vec<Game>, StoreErr> {
        Ok(self.games.read().await.clone())
    }
    async fn publish(&self, game: &Game) -> Result<(), StoreErr> {
        self.games.write().await.push(game.clone());
        Ok(())
    }
    async fn remove_game(&self, id: ID<Game>) -> Result<(), StoreErr> {
        self.games.write().await.retain(|g| g.id() != id);
        Ok(())
    }
}

impl Memory {
    async fn resolve(&self, game: Game) -> Listing {
        let username = self
            .users
            .read()
            .await
            .iter()
            .find(|u| u.id() == game.creator())
            .map(|u| u.username().to_string());
        Listing::new(game, username)
    }
}

#[async_trait::async_trait]
impl Items for Memory {
    async fn item(&self, id: ID<Item>) -> Result<Option<Item>, StoreErr> {
        Ok(self.items.read().await.iter().find(|i| i.id() == id).cloned())
    }
    async fn items(&self) -> Result<Vec<Item>, StoreErr> {
        Ok(self.items.read().await.clone())
    }
    async fn items_of(&self, ids: &[ID<Item>]) -> Result<Vec<Item>, StoreErr> {
        let items = self.items.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| items.iter().find(|i| i.id() == *id))
            .cloned()
            .collect())
    }
    async fn stock(&self, item: &Item) -> Result<(), StoreErr> {
        self.items.write().await.push(item.clone());
        Ok(())
    }
}

#[async_trait::async_trait]
impl Sessions for Memory {
    /// Expired sessions are swept whenever a new one opens.
    async fn open(&self, session: &Session) -> Result<(), StoreErr> {
        let mut sessions = self.sessions.write().await;
        sessions.retain(|_, s| !s.expired());
        sessions.insert(session.id(), session.clone());
        Ok(())
    }
    async fn session(&self, id: ID<Session>) -> Result<Option<Session>, StoreErr> {
        Ok(self.sessions.read().await.get(&id).cloned())
    }
    async fn close(&self, id: ID<Session>) -> Result<(), StoreErr> {
        self.sessions.write().await.remove(&id);
        Ok(())
    }
}

#[async_trait::async_trait]
impl Store for Memory {
    async fn ping(&self) -> Result<(), StoreErr> {
        Ok(())
    }
}
