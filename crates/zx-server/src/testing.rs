//! Shared fixtures for HTTP tests.
use super::*;
use actix_web::cookie::Cookie;
use actix_web::dev::ServiceResponse;
use std::path::PathBuf;
use zx_core::SESSION_COOKIE;
use zx_records::User;
use zx_records::Users;

pub fn memory() -> Db {
    Arc::new(Memory::new())
}

pub fn wire(cfg: &mut web::ServiceConfig, db: Db, root: PathBuf) {
    cfg.app_data(web::Data::new(db))
        .app_data(web::Data::new(Crypto::new(b"test secret")))
        .app_data(web::Data::new(Intake::new(root)))
        .app_data(json());
    configure(cfg);
}

/// Session cookie set by a signup or login response.
pub fn cookie<B>(resp: &ServiceResponse<B>) -> Cookie<'static> {
    resp.response()
        .cookies()
        .find(|c| c.name() == SESSION_COOKIE)
        .map(|c| c.into_owned())
        .expect("session cookie")
}

/// Inserts an administrator directly, the way operators do out-of-band.
pub async fn admin(db: &Db, username: &str, password: &str) -> User {
    let hashword = zx_auth::password::hash(password).unwrap();
    let user = User::new(username.to_owned(), hashword).promote();
    db.insert(&user).await.unwrap();
    user
}

/// Builds the app around a store (and optionally an upload root).
macro_rules! service {
    ($db:expr) => {
        service!($db, std::env::temp_dir())
    };
    ($db:expr, $root:expr) => {{
        let db = $db.clone();
        let root = $root;
        actix_web::test::init_service(
            actix_web::App::new().configure(move |cfg| crate::testing::wire(cfg, db, root)),
        )
        .await
    }};
}

/// Posts credentials to `/api/signup` or `/api/login` and returns the cookie.
macro_rules! session {
    ($app:expr, $path:expr, $username:expr, $password:expr) => {{
        let req = actix_web::test::TestRequest::post()
            .uri($path)
            .set_json(serde_json::json!({ "username": $username, "password": $password }))
            .to_request();
        let resp = actix_web::test::call_service(&$app, req).await;
        assert!(resp.status().is_success(), "{} failed: {}", $path, resp.status());
        crate::testing::cookie(&resp)
    }};
}

pub(crate) use service;
pub(crate) use session;

/// Memory store that yields to the runtime before every lookup the guards
/// make, so extractors resolve in the order a networked store would.
pub struct Sluggish(Memory);

pub fn sluggish() -> Db {
    Arc::new(Sluggish(Memory::new()))
}

mod slow {
    use super::Sluggish;
    use tokio::task::yield_now;
    use zx_core::ID;
    use zx_records::*;

    #[async_trait::async_trait]
    impl Users for Sluggish {
        async fn user(&self, id: ID<User>) -> Result<Option<User>, StoreErr> {
            yield_now().await;
            self.0.user(id).await
        }
        async fn named(&self, username: &str) -> Result<Option<User>, StoreErr> {
            yield_now().await;
            self.0.named(username).await
        }
        async fn users(&self) -> Result<Vec<User>, StoreErr> {
            self.0.users().await
        }
        async fn insert(&self, user: &User) -> Result<(), StoreErr> {
            self.0.insert(user).await
        }
        async fn avatar(&self, id: ID<User>, avatar: &str) -> Result<(), StoreErr> {
            self.0.avatar(id, avatar).await
        }
        async fn award(&self, id: ID<User>, badge: &str) -> Result<Award, StoreErr> {
            self.0.award(id, badge).await
        }
        async fn purchase(&self, id: ID<User>, item: &Item) -> Result<Purchase, StoreErr> {
            self.0.purchase(id, item).await
        }
        async fn remove_user(&self, id: ID<User>) -> Result<(), StoreErr> {
            self.0.remove_user(id).await
        }
    }

    #[async_trait::async_trait]
    impl Games for Sluggish {
        async fn game(&self, id: ID<Game>) -> Result<Option<Listing>, StoreErr> {
            self.0.game(id).await
        }
        async fn listings(&self) -> Result<Vec<Listing>, StoreErr> {
            self.0.listings().await
        }
        async fn games(&self) -> Result<Vec<Game>, StoreErr> {
            self.0.games().await
        }
        async fn publish(&self, game: &Game) -> Result<(), StoreErr> {
            self.0.publish(game).await
        }
        async fn remove_game(&self, id: ID<Game>) -> Result<(), StoreErr> {
            self.0.remove_game(id).await
        }
    }

    #[async_trait::async_trait]
    impl Items for Sluggish {
        async fn item(&self, id: ID<Item>) -> Result<Option<Item>, StoreErr> {
            self.0.item(id).await
        }
        async fn items(&self) -> Result<Vec<Item>, StoreErr> {
            self.0.items().await
        }
        async fn items_of(&self, ids: &[ID<Item>]) -> Result<Vec<Item>, StoreErr> {
            self.0.items_of(ids).await
        }
        async fn stock(&self, item: &Item) -> Result<(), StoreErr> {
            self.0.stock(item).await
        }
    }

    #[async_trait::async_trait]
    impl Sessions for Sluggish {
        async fn open(&self, session: &Session) -> Result<(), StoreErr> {
            self.0.open(session).await
        }
        async fn session(&self, id: ID<Session>) -> Result<Option<Session>, StoreErr> {
            yield_now().await;
            self.0.session(id).await
        }
        async fn close(&self, id: ID<Session>) -> Result<(), StoreErr> {
            self.0.close(id).await
        }
    }

    #[async_trait::async_trait]
    impl Store for Sluggish {
        async fn ping(&self) -> Result<(), StoreErr> {
            self.0.ping().await
        }
    }
}
