//! Plain text codec: one `brand,type,year` line per car.
//!
//! No quoting or escaping is applied, so a comma inside a brand or type
//! cannot survive a round trip.

use crate::domain::model::{Car, Format};
use crate::domain::ports::{Codec, Storage};
use crate::utils::error::{InventoryError, Result};
use async_trait::async_trait;

const DELIMITER: char = ',';

pub fn encode(records: &[Car]) -> String {
    records
        .iter()
        .map(|car| {
            format!(
                "{}{d}{}{d}{}\n",
                car.brand,
                car.car_type,
                car.year,
                d = DELIMITER
            )
        })
        .collect()
}

pub fn decode(content: &str) -> Result<Vec<Car>> {
    let mut cars = Vec::new();

    for (idx, line) in content.lines().enumerate() {
        let line_no = idx as u64 + 1;
        let line = line.strip_suffix('\r').unwrap_or(line);
        if line.trim().is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split(DELIMITER).collect();
        let [brand, car_type, year] = fields.as_slice() else {
            return Err(InventoryError::parse(
                Some(line_no),
                format!("expected 3 fields, found {}", fields.len()),
            ));
        };

        let car =
            Car::from_fields(brand, car_type, year).map_err(|e| e.at_line(Some(line_no)))?;
        cars.push(car);
    }

    Ok(cars)
}

pub struct TextCodec<S: Storage> {
    storage: S,
}

impl<S: Storage> TextCodec<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    async fn read_text(&self, path: &str) -> Result<String> {
        let data = self.storage.read_file(path).await?;
        String::from_utf8(data)
            .map_err(|e| InventoryError::parse(None, format!("{} is not UTF-8: {}", path, e)))
    }
}

#[async_trait]
impl<S: Storage> Codec for TextCodec<S> {
    fn format(&self) -> Format {
        Format::Txt
    }

    async fn export(&self, records: &[Car], path: &str) -> Result<()> {
        let content = encode(records);
        self.storage.write_file(path, content.as_bytes()).await?;
        tracing::debug!("Wrote {} cars to {}", records.len(), path);
        Ok(())
    }

    async fn append(&self, records: &[Car], path: &str) -> Result<()> {
        let mut content = match self.read_text(path).await {
            Ok(content) => content,
            Err(e) if e.is_not_found() => String::new(),
            Err(e) => return Err(e),
        };
        if !content.is_empty() && !content.ends_with('\n') {
            content.push('\n');
        }
        content.push_str(&encode(records));

        self.storage.write_file(path, content.as_bytes()).await?;
        tracing::debug!("Appended {} cars to {}", records.len(), path);
        Ok(())
    }

    async fn import(&self, path: &str) -> Result<Vec<Car>> {
        decode(&self.read_text(path).await?)
    }
}
