use super::*;
use chrono::DateTime;
use chrono::Utc;
use zx_core::ID;
use zx_core::Unique;

/// Uploaded game. The creator is a back-reference only; deleting the
/// user leaves the game in place.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    #[serde(rename = "_id")]
    id: ID<Self>,
    title: String,
    description: String,
    creator: ID<User>,
    thumbnail: String,
    file_path: String,
    created_at: DateTime<Utc>,
}

impl Game {
    pub fn new(
        title: String,
        description: String,
        creator: ID<User>,
        thumbnail: String,
        file_path: String,
    ) -> Self {
        Self {
            id: ID::default(),
            title,
            description,
            creator,
            thumbnail,
            file_path,
            created_at: Utc::now(),
        }
    }
    pub fn title(&self) -> &str {
        &self.title
    }
    pub fn description(&self) -> &str {
        &self.description
    }
    pub fn creator(&self) -> ID<User> {
        self.creator
    }
    pub fn thumbnail(&self) -> &str {
        &self.thumbnail
    }
    pub fn file_path(&self) -> &str {
        &self.file_path
    }
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Unique for Game {
    fn id(&self) -> ID<Self> {
        self.id
    }
}

/// Public projection of a creator: identifier and username only.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Creator {
    #[serde(rename = "_id")]
    pub id: ID<User>,
    pub username: String,
}

/// Game as shown to browsers, creator resolved.
/// `creator` is null when the account no longer exists.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    #[serde(rename = "_id")]
    id: ID<Game>,
    title: String,
    description: String,
    creator: Option<Creator>,
    thumbnail: String,
    file_path: String,
    created_at: DateTime<Utc>,
}

impl Listing {
    pub fn new(game: Game, username: Option<String>) -> Self {
        Self {
            creator: username.map(|username| Creator {
                id: game.creator,
                username,
            }),
            id: game.id,
            title: game.title,
            description: game.description,
            thumbnail: game.thumbnail,
            file_path: game.file_path,
            created_at: game.created_at,
        }
    }
    pub fn id(&self) -> ID<Game> {
        self.id
    }
    pub fn title(&self) -> &str {
        &self.title
    }
    pub fn creator(&self) -> Option<&Creator> {
        self.creator.as_ref()
    }
}

#[cfg(feature = "database")]
mod schema {
    use super::*;
    use zx_pg::*;

    impl Schema for Game {
        fn name() -> &'static str {
            GAMES
        }
        fn creates() -> &'static str {
            const_format::concatcp!(
                "CREATE TABLE IF NOT EXISTS ",
                GAMES,
                " (
                    id          UUID PRIMARY KEY,
                    title       TEXT NOT NULL,
                    description TEXT NOT NULL,
                    creator     UUID NOT NULL,
                    thumbnail   TEXT NOT NULL,
                    file_path   TEXT NOT NULL,
                    created_at  TIMESTAMPTZ NOT NULL DEFAULT now()
                );"
            )
        }
        fn indices() -> &'static str {
            const_format::concatcp!(
                "CREATE INDEX IF NOT EXISTS idx_games_creator ON ",
                GAMES,
                " (creator);"
            )
        }
    }

    impl TryFrom<&tokio_postgres::Row> for Game {
        type Error = PgErr;
        fn try_from(row: &tokio_postgres::Row) -> Result<Self, Self::Error> {
            Ok(Self {
                id: ID::from(row.try_get::<_, uuid::Uuid>("id")?),
                title: row.try_get("title")?,
                description: row.try_get("description")?,
                creator: ID::from(row.try_get::<_, uuid::Uuid>("creator")?),
                thumbnail: row.try_get("thumbnail")?,
                file_path: row.try_get("file_path")?,
                created_at: row.try_get("created_at")?,
            })
        }
    }

    impl TryFrom<&tokio_postgres::Row> for Listing {
        type Error = PgErr;
        fn try_from(row: &tokio_postgres::Row) -> Result<Self, Self::Error> {
            Ok(Listing::new(
                Game::try_from(row)?,
                row.try_get::<_, Option<String>>("username")?,
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game() -> Game {
        Game::new(
            "Snake".into(),
            "eat apples".into(),
            ID::default(),
            "uploads/thumbnails/a.png".into(),
            "uploads/games/a.zip".into(),
        )
    }

    #[test]
    fn listing_exposes_only_username() {
        let json = serde_json::to_value(Listing::new(game(), Some("alice".into()))).unwrap();
        assert_eq!(json["creator"]["username"], "alice");
        assert_eq!(json["creator"].as_object().unwrap().len(), 2);
        assert_eq!(json["filePath"], "uploads/games/a.zip");
        assert!(json.get("createdAt").is_some());
    }

    #[test]
    fn orphaned_listing_has_null_creator() {
        let json = serde_json::to_value(Listing::new(game(), None)).unwrap();
        assert!(json["creator"].is_null());
    }
}
