use crate::domain::model::{Car, Format};
use crate::domain::ports::{Codec, Storage};
use crate::utils::error::{InventoryError, Result};
use async_trait::async_trait;
use serde::Deserialize;

pub const HEADER: [&str; 3] = ["brand", "type", "year"];

/// Header row first, then one quoted-as-needed row per car.
pub fn encode(records: &[Car]) -> Result<Vec<u8>> {
    write_rows(records, true)
}

/// Rows only, for adding to a file that already has its header.
pub fn encode_rows(records: &[Car]) -> Result<Vec<u8>> {
    write_rows(records, false)
}

fn write_rows(records: &[Car], with_header: bool) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    if with_header {
        writer.write_record(HEADER)?;
    }
    for car in records {
        writer.serialize(car)?;
    }

    writer
        .into_inner()
        .map_err(|e| InventoryError::IoError(e.into_error()))
}

/// Raw row as read from the file; the year is coerced separately.
#[derive(Debug, Deserialize)]
struct CsvRow {
    brand: String,
    #[serde(rename = "type")]
    car_type: String,
    year: String,
}

/// Columns are matched by header name, so reordered files decode too.
pub fn decode(data: &[u8]) -> Result<Vec<Car>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(data);

    let headers = reader.headers().map_err(row_error)?.clone();
    let mut record = csv::StringRecord::new();
    let mut cars = Vec::new();

    while reader.read_record(&mut record).map_err(row_error)? {
        let line = record.position().map(|pos| pos.line());
        let row: CsvRow = record
            .deserialize(Some(&headers))
            .map_err(|e| row_error(e).at_line(line))?;
        let car = Car::from_fields(&row.brand, &row.car_type, &row.year)
            .map_err(|e| e.at_line(line))?;
        cars.push(car);
    }

    Ok(cars)
}

fn has_standard_header(data: &[u8]) -> Result<bool> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(data);
    let headers = reader.headers().map_err(row_error)?;
    Ok(headers.iter().eq(HEADER))
}

fn row_error(err: csv::Error) -> InventoryError {
    let line = err.position().map(|pos| pos.line());
    if matches!(err.kind(), csv::ErrorKind::Io(_)) {
        return InventoryError::CsvError(err);
    }
    InventoryError::parse(line, err.to_string())
}

pub struct CsvCodec<S: Storage> {
    storage: S,
}

impl<S: Storage> CsvCodec<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl<S: Storage> Codec for CsvCodec<S> {
    fn format(&self) -> Format {
        Format::Csv
    }

    async fn export(&self, records: &[Car], path: &str) -> Result<()> {
        let data = encode(records)?;
        self.storage.write_file(path, &data).await?;
        tracing::debug!("Wrote {} cars to {}", records.len(), path);
        Ok(())
    }

    async fn append(&self, records: &[Car], path: &str) -> Result<()> {
        let mut data = match self.storage.read_file(path).await {
            Ok(data) => data,
            Err(e) if e.is_not_found() => Vec::new(),
            Err(e) => return Err(e),
        };

        if data.iter().all(u8::is_ascii_whitespace) {
            data = encode(records)?;
        } else if has_standard_header(&data)? {
            if !data.ends_with(b"\n") {
                data.push(b'\n');
            }
            data.extend(encode_rows(records)?);
        } else {
            // Columns in another order: rewrite everything under our header.
            let mut cars = decode(&data)?;
            cars.extend_from_slice(records);
            data = encode(&cars)?;
        }

        self.storage.write_file(path, &data).await?;
        tracing::debug!("Appended {} cars to {}", records.len(), path);
        Ok(())
    }

    async fn import(&self, path: &str) -> Result<Vec<Car>> {
        let data = self.storage.read_file(path).await?;
        decode(&data)
    }
}
