use zx_core::Coins;
use zx_core::ID;
use zx_core::Unique;

/// Marketplace catalog entry. Only ever written by seeding.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Item {
    #[serde(rename = "_id")]
    id: ID<Self>,
    name: String,
    price: Coins,
    image: String,
    #[serde(rename = "type")]
    kind: String,
}

impl Item {
    pub fn new(name: String, price: Coins, image: String, kind: String) -> Self {
        Self {
            id: ID::default(),
            name,
            price,
            image,
            kind,
        }
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn price(&self) -> Coins {
        self.price
    }
    pub fn image(&self) -> &str {
        &self.image
    }
    pub fn kind(&self) -> &str {
        &self.kind
    }
}

impl Unique for Item {
    fn id(&self) -> ID<Self> {
        self.id
    }
}

/// Catalog entry as written in a seed file.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct Stock {
    pub name: String,
    pub price: Coins,
    pub image: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl TryFrom<Stock> for Item {
    type Error = String;
    fn try_from(stock: Stock) -> Result<Self, Self::Error> {
        if stock.price < 0 {
            return Err(format!("item {} has a negative price", stock.name));
        }
        if stock.name.is_empty() || stock.image.is_empty() || stock.kind.is_empty() {
            return Err(format!("item {:?} is missing a required field", stock.name));
        }
        Ok(Item::new(stock.name, stock.price, stock.image, stock.kind))
    }
}

#[cfg(feature = "database")]
mod schema {
    use super::*;
    use zx_pg::*;

    impl Schema for Item {
        fn name() -> &'static str {
            ITEMS
        }
        fn creates() -> &'static str {
            const_format::concatcp!(
                "CREATE TABLE IF NOT EXISTS ",
                ITEMS,
                " (
                    id          UUID PRIMARY KEY,
                    name        TEXT NOT NULL,
                    price       BIGINT NOT NULL CHECK (price >= 0),
                    image       TEXT NOT NULL,
                    kind        TEXT NOT NULL
                );"
            )
        }
        fn indices() -> &'static str {
            const_format::concatcp!(
                "CREATE INDEX IF NOT EXISTS idx_items_kind ON ",
                ITEMS,
                " (kind);"
            )
        }
    }

    impl TryFrom<&tokio_postgres::Row> for Item {
        type Error = PgErr;
        fn try_from(row: &tokio_postgres::Row) -> Result<Self, Self::Error> {
            Ok(Self {
                id: ID::from(row.try_get::<_, uuid::Uuid>("id")?),
                name: row.try_get("name")?,
                price: row.try_get("price")?,
                image: row.try_get("image")?,
                kind: row.try_get("kind")?,
            })
        }
    }
}
