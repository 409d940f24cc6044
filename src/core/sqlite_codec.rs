//! SQLite codec backed by a single `cars` table.
//!
//! Every operation opens its own connection and closes it before returning.
//! Rows carry a store-assigned `id` that never leaves this module.

use crate::domain::model::{Car, Format};
use crate::domain::ports::{Codec, Storage};
use crate::utils::error::{InventoryError, Result};
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection};
use sqlx::{ConnectOptions, Connection};

const CREATE_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS cars (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    brand TEXT NOT NULL,
    type TEXT NOT NULL,
    year INTEGER NOT NULL
)
"#;

const INSERT_CAR: &str = "INSERT INTO cars (brand, type, year) VALUES (?, ?, ?)";

const SELECT_CARS: &str = "SELECT brand, type, year FROM cars ORDER BY id ASC";

pub struct SqliteCodec<S: Storage> {
    storage: S,
}

impl<S: Storage> SqliteCodec<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    async fn connect(&self, path: &str, create_if_missing: bool) -> Result<SqliteConnection> {
        let file = self.storage.locate(path);

        if !create_if_missing && !tokio::fs::try_exists(&file).await? {
            return Err(InventoryError::NotFound {
                path: path.to_string(),
            });
        }

        if let Some(parent) = file.parent() {
            if create_if_missing && !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        tracing::debug!("Opening database {}", file.display());
        let conn = SqliteConnectOptions::new()
            .filename(&file)
            .create_if_missing(create_if_missing)
            .connect()
            .await?;
        Ok(conn)
    }

    /// Ensures the `cars` table exists. Safe to call repeatedly.
    pub async fn create(&self, path: &str) -> Result<()> {
        let mut conn = self.connect(path, true).await?;
        sqlx::query(CREATE_TABLE).execute(&mut conn).await?;
        conn.close().await?;
        Ok(())
    }

    /// Inserts all records in one transaction.
    pub async fn append(&self, path: &str, records: &[Car]) -> Result<()> {
        let mut conn = self.connect(path, false).await?;

        let mut tx = conn.begin().await?;
        for car in records {
            sqlx::query(INSERT_CAR)
                .bind(&car.brand)
                .bind(&car.car_type)
                .bind(car.year)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;

        conn.close().await?;
        tracing::debug!("Inserted {} cars into {}", records.len(), path);
        Ok(())
    }

    /// All rows in insertion order, without their ids.
    pub async fn read_all(&self, path: &str) -> Result<Vec<Car>> {
        let mut conn = self.connect(path, false).await?;

        let rows = sqlx::query_as::<_, (String, String, i64)>(SELECT_CARS)
            .fetch_all(&mut conn)
            .await?;

        conn.close().await?;
        rows.into_iter()
            .map(|(brand, car_type, year)| {
                let year = i32::try_from(year).map_err(|_| {
                    InventoryError::parse(None, format!("year {} is out of range", year))
                })?;
                Ok(Car::new(brand, car_type, year))
            })
            .collect()
    }
}

#[async_trait]
impl<S: Storage> Codec for SqliteCodec<S> {
    fn format(&self) -> Format {
        Format::Db
    }

    async fn export(&self, records: &[Car], path: &str) -> Result<()> {
        self.create(path).await?;
        self.append(path, records).await
    }

    async fn append(&self, records: &[Car], path: &str) -> Result<()> {
        self.create(path).await?;
        SqliteCodec::append(self, path, records).await
    }

    async fn import(&self, path: &str) -> Result<Vec<Car>> {
        self.read_all(path).await
    }
}
