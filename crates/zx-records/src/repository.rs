use super::*;
use std::collections::HashMap;
use tokio_postgres::Client;
use tokio_postgres::error::SqlState;
use zx_core::ID;
use zx_core::Unique;
use zx_pg::*;

const USER_COLUMNS: &str = "id, username, hashword, avatar, is_admin, badges, currency, inventory";
const GAME_COLUMNS: &str = "id, title, description, creator, thumbnail, file_path, created_at";
const ITEM_COLUMNS: &str = "id, name, price, image, kind";

/// Creates every table the store needs.
pub async fn migrate(client: &Client) -> Result<(), PgErr> {
    zx_pg::migrate::<User>(client).await?;
    zx_pg::migrate::<Item>(client).await?;
    zx_pg::migrate::<Game>(client).await?;
    zx_pg::migrate::<Session>(client).await?;
    Ok(())
}

fn rows<T>(rows: Vec<tokio_postgres::Row>) -> Result<Vec<T>, PgErr>
where
    T: for<'r> TryFrom<&'r tokio_postgres::Row, Error = PgErr>,
{
    rows.iter().map(T::try_from).collect()
}

#[async_trait::async_trait]
impl Users for Client {
    async fn user(&self, id: ID<User>) -> Result<Option<User>, StoreErr> {
        let sql = format!("SELECT {USER_COLUMNS} FROM {USERS} WHERE id = $1");
        Ok(self
            .query_opt(&sql, &[&id.inner()])
            .await?
            .as_ref()
            .map(User::try_from)
            .transpose()?)
    }
    async fn named(&self, username: &str) -> Result<Option<User>, StoreErr> {
        let sql = format!("SELECT {USER_COLUMNS} FROM {USERS} WHERE username = $1");
        Ok(self
            .query_opt(&sql, &[&username])
            .await?
            .as_ref()
            .map(User::try_from)
            .transpose()?)
    }
    async fn users(&self) -> Result<Vec<User>, StoreErr> {
        let sql = format!("SELECT {USER_COLUMNS} FROM {USERS} ORDER BY id");
        Ok(rows(self.query(&sql, &[]).await?)?)
    }
    async fn insert(&self, user: &User) -> Result<(), StoreErr> {
        let inventory = user
            .inventory()
            .iter()
            .map(|id| id.inner())
            .collect::<Vec<_>>();
        let badges = user.badges().to_vec();
        self.execute(
            const_format::concatcp!(
                "INSERT INTO ",
                USERS,
                " (id, username, hashword, avatar, is_admin, badges, currency, inventory)
                  VALUES ($1, $2, $3, $4, $5, $6, $7, $8)"
            ),
            &[
                &user.id().inner(),
                &user.username(),
                &user.hashword(),
                &user.avatar(),
                &user.is_admin(),
                &badges,
                &user.currency(),
                &inventory,
            ],
        )
        .await
        .map(|_| ())
        .map_err(|e| match e.code() {
            Some(code) if *code == SqlState::UNIQUE_VIOLATION => StoreErr::Taken,
            _ => StoreErr::Pg(e),
        })
    }
    async fn avatar(&self, id: ID<User>, avatar: &str) -> Result<(), StoreErr> {
        self.execute(
            const_format::concatcp!("UPDATE ", USERS, " SET avatar = $2 WHERE id = $1"),
            &[&id.inner(), &avatar],
        )
        .await?;
        Ok(())
    }
    async fn award(&self, id: ID<User>, badge: &str) -> Result<Award, StoreErr> {
        let granted = self
            .execute(
                const_format::concatcp!(
                    "UPDATE ",
                    USERS,
                    " SET badges = array_append(badges, $2)
                      WHERE id = $1 AND NOT ($2 = ANY(badges))"
                ),
                &[&id.inner(), &badge],
            )
            .await?;
        match granted {
            0 => match self.user(id).await? {
                Some(_) => Ok(Award::Held),
                None => Ok(Award::Missing),
            },
            _ => Ok(Award::Granted),
        }
    }
    async fn purchase(&self, id: ID<User>, item: &Item) -> Result<Purchase, StoreErr> {
        loop {
            let debited = self
                .query_opt(
                    const_format::concatcp!(
                        "UPDATE ",
                        USERS,
                        " SET currency  = currency - $2,
                              inventory = array_append(inventory, $3)
                          WHERE id = $1
                            AND currency >= $2
                            AND NOT ($3 = ANY(inventory))
                          RETURNING currency"
                    ),
                    &[&id.inner(), &item.price(), &item.id().inner()],
                )
                .await?;
            if let Some(row) = debited {
                return Ok(Purchase::Bought(row.try_get(0)?));
            }
            // the guarded update matched nothing; find out why
            match self.user(id).await?.map(|user| user.checkout(item)) {
                None => return Ok(Purchase::Missing),
                Some(Purchase::Bought(_)) => continue,
                Some(refusal) => return Ok(refusal),
            }
        }
    }
    async fn remove_user(&self, id: ID<User>) -> Result<(), StoreErr> {
        self.execute(
            const_format::concatcp!("DELETE FROM ", USERS, " WHERE id = $1"),
            &[&id.inner()],
        )
        .await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl Games for Client {
    async fn game(&self, id: ID<Game>) -> Result<Option<Listing>, StoreErr> {
        Ok(self
            .query_opt(
                const_format::concatcp!(
                    "SELECT g.id, g.title, g.description, g.creator, g.thumbnail,
                            g.file_path, g.created_at, u.username
                       FROM ",
                    GAMES,
                    " g LEFT JOIN ",
                    USERS,
                    " u ON u.id = g.creator WHERE g.id = $1"
                ),
                &[&id.inner()],
            )
            .await?
            .as_ref()
            .map(Listing::try_from)
            .transpose()?)
    }
    async fn listings(&self) -> Result<Vec<Listing>, StoreErr> {
        let sql = const_format::concatcp!(
            "SELECT g.id, g.title, g.description, g.creator, g.thumbnail,
                    g.file_path, g.created_at, u.username
               FROM ",
            GAMES,
            " g LEFT JOIN ",
            USERS,
            " u ON u.id = g.creator ORDER BY g.id"
        );
        Ok(rows(self.query(sql, &[]).await?)?)
    }
    async fn games(&self) -> Result<Vec<Game>, StoreErr> {
        let sql = format!("SELECT {GAME_COLUMNS} FROM {GAMES} ORDER BY id");
        Ok(rows(self.query(&sql, &[]).await?)?)
    }
    async fn publish(&self, game: &Game) -> Result<(), StoreErr> {
        self.execute(
            const_format::concatcp!(
                "INSERT INTO ",
                GAMES,
                " (id, title, description, creator, thumbnail, file_path, created_at)
                  VALUES ($1, $2, $3, $4, $5, $6, $7)"
            ),
            &[
                &game.id().inner(),
                &game.title(),
                &game.description(),
                &game.creator().inner(),
                &game.thumbnail(),
                &game.file_path(),
                &game.created_at(),
            ],
        )
        .await?;
        Ok(())
    }
    async fn remove_game(&self, id: ID<Game>) -> Result<(), StoreErr> {
        self.execute(
            const_format::concatcp!("DELETE FROM ", GAMES, " WHERE id = $1"),
            &[&id.inner()],
        )
        .await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl Items for Client {
    async fn item(&self, id: ID<Item>) -> Result<Option<Item>, StoreErr> {
        let sql = format!("SELECT {ITEM_COLUMNS} FROM {ITEMS} WHERE id = $1");
        Ok(self
            .query_opt(&sql, &[&id.inner()])
            .await?
            .as_ref()
            .map(Item::try_from)
            .transpose()?)
    }
    async fn items(&self) -> Result<Vec<Item>, StoreErr> {
        let sql = format!("SELECT {ITEM_COLUMNS} FROM {ITEMS} ORDER BY id");
        Ok(rows(self.query(&sql, &[]).await?)?)
    }
    async fn items_of(&self, ids: &[ID<Item>]) -> Result<Vec<Item>, StoreErr> {
        let sql = format!("SELECT {ITEM_COLUMNS} FROM {ITEMS} WHERE id = ANY($1)");
        let keys = ids.iter().map(|id| id.inner()).collect::<Vec<_>>();
        let mut found = rows::<Item>(self.query(&sql, &[&keys]).await?)?
            .into_iter()
            .map(|item| (item.id(), item))
            .collect::<HashMap<_, _>>();
        Ok(ids.iter().filter_map(|id| found.remove(id)).collect())
    }
    async fn stock(&self, item: &Item) -> Result<(), StoreErr> {
        self.execute(
            const_format::concatcp!(
                "INSERT INTO ",
                ITEMS,
                " (id, name, price, image, kind) VALUES ($1, $2, $3, $4, $5)"
            ),
            &[
                &item.id().inner(),
                &item.name(),
                &item.price(),
                &item.image(),
                &item.kind(),
            ],
        )
        .await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl Sessions for Client {
    /// Expired sessions are swept whenever a new one opens.
    async fn open(&self, session: &Session) -> Result<(), StoreErr> {
        let swept = self
            .execute(
                const_format::concatcp!("DELETE FROM ", SESSIONS, " WHERE expires_at <= now()"),
                &[],
            )
            .await?;
        if swept > 0 {
            log::debug!("swept {} expired sessions", swept);
        }
        self.execute(
            const_format::concatcp!(
                "INSERT INTO ",
                SESSIONS,
                " (id, user_id, expires_at) VALUES ($1, $2, $3)"
            ),
            &[
                &session.id().inner(),
                &session.user().inner(),
                &session.expires_at(),
            ],
        )
        .await?;
        Ok(())
    }
    async fn session(&self, id: ID<Session>) -> Result<Option<Session>, StoreErr> {
        Ok(self
            .query_opt(
                const_format::concatcp!(
                    "SELECT id, user_id, expires_at FROM ",
                    SESSIONS,
                    " WHERE id = $1"
                ),
                &[&id.inner()],
            )
            .await?
            .as_ref()
            .map(Session::try_from)
            .transpose()?)
    }
    async fn close(&self, id: ID<Session>) -> Result<(), StoreErr> {
        self.execute(
            const_format::concatcp!("DELETE FROM ", SESSIONS, " WHERE id = $1"),
            &[&id.inner()],
        )
        .await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl Store for Client {
    async fn ping(&self) -> Result<(), StoreErr> {
        self.execute("SELECT 1", &[])
            .await
            .inspect_err(|e| log::error!("health check failed: {}", e))?;
        Ok(())
    }
}
