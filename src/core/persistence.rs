use crate::core::csv_codec::CsvCodec;
use crate::core::duplicates;
use crate::core::sqlite_codec::SqliteCodec;
use crate::core::text_codec::TextCodec;
use crate::domain::model::{Car, DuplicatePolicy, ExportReport, Format};
use crate::domain::ports::{Codec, Storage};
use crate::utils::error::Result;

/// Format dispatch over one storage backend.
#[derive(Debug, Clone)]
pub struct Persistence<S: Storage + Clone + 'static> {
    storage: S,
}

impl<S: Storage + Clone + 'static> Persistence<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn codec(&self, format: Format) -> Box<dyn Codec> {
        match format {
            Format::Txt => Box::new(TextCodec::new(self.storage.clone())),
            Format::Csv => Box::new(CsvCodec::new(self.storage.clone())),
            Format::Db => Box::new(SqliteCodec::new(self.storage.clone())),
        }
    }

    pub fn codec_for(&self, path: &str) -> Result<Box<dyn Codec>> {
        Ok(self.codec(Format::from_path(path)?))
    }

    pub async fn export(&self, records: &[Car], path: &str) -> Result<()> {
        self.codec_for(path)?.export(records, path).await
    }

    pub async fn import(&self, path: &str) -> Result<Vec<Car>> {
        let cars = self.codec_for(path)?.import(path).await?;
        tracing::info!("Imported {} cars from {}", cars.len(), path);
        Ok(cars)
    }

    pub async fn find_duplicates(&self, candidates: &[Car], path: &str) -> Result<Vec<Car>> {
        let codec = self.codec_for(path)?;
        duplicates::find_duplicates(codec.as_ref(), candidates, path).await
    }

    /// Checks `path` for duplicates, applies `policy`, then appends.
    ///
    /// Existing rows in `path` are never touched, so skipped duplicates stay
    /// in the target. `ask` is only consulted for [`DuplicatePolicy::Ask`]
    /// when duplicates exist; it returns `Ok(true)` to leave them out.
    pub async fn export_with_policy<F>(
        &self,
        records: &[Car],
        path: &str,
        format: Format,
        policy: DuplicatePolicy,
        ask: F,
    ) -> Result<ExportReport>
    where
        F: FnOnce(&[Car]) -> Result<bool>,
    {
        let codec = self.codec(format);

        let found = duplicates::find_duplicates(codec.as_ref(), records, path).await?;
        let skip = !found.is_empty()
            && match policy {
                DuplicatePolicy::Skip => true,
                DuplicatePolicy::Keep => false,
                DuplicatePolicy::Ask => ask(&found)?,
            };

        let (to_write, skipped) = if skip {
            let (fresh, _) = duplicates::partition(records, &found);
            tracing::warn!("Skipping {} cars already in {}", found.len(), path);
            (fresh, found)
        } else {
            (records.to_vec(), Vec::new())
        };

        codec.append(&to_write, path).await?;
        tracing::info!("Appended {} cars to {}", to_write.len(), path);

        Ok(ExportReport {
            path: path.to_string(),
            format: codec.format(),
            written: to_write.len(),
            skipped,
        })
    }

    pub async fn list_files(&self, format: Option<Format>) -> Result<Vec<String>> {
        let suffix = format.map(|f| format!(".{}", f.extension()));
        self.storage.list_files(suffix.as_deref()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::InventoryError;
    use std::collections::HashMap;
    use std::path::PathBuf;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn new() -> Self {
            Self {
                files: Arc::new(Mutex::new(HashMap::new())),
            }
        }

        async fn put(&self, path: &str, data: &str) {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.as_bytes().to_vec());
        }

        async fn get_file(&self, path: &str) -> Option<String> {
            let files = self.files.lock().await;
            files
                .get(path)
                .map(|data| String::from_utf8_lossy(data).into_owned())
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files
                .get(path)
                .cloned()
                .ok_or_else(|| InventoryError::NotFound {
                    path: path.to_string(),
                })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }

        async fn list_files(&self, extension: Option<&str>) -> Result<Vec<String>> {
            let files = self.files.lock().await;
            let mut names: Vec<String> = files
                .keys()
                .filter(|name| extension.is_none_or(|ext| name.ends_with(ext)))
                .cloned()
                .collect();
            names.sort();
            Ok(names)
        }

        fn locate(&self, path: &str) -> PathBuf {
            PathBuf::from(path)
        }
    }

    fn toyota() -> Car {
        Car::new("Toyota", "gas", 2020)
    }

    fn honda() -> Car {
        Car::new("Honda", "electric", 2022)
    }

    #[tokio::test]
    async fn test_find_duplicates_against_existing_csv() {
        let storage = MockStorage::new();
        storage.put("cars.csv", "brand,type,year\nToyota,gas,2020\n").await;
        let persistence = Persistence::new(storage);

        let duplicates = persistence
            .find_duplicates(&[toyota(), honda()], "cars.csv")
            .await
            .unwrap();

        assert_eq!(duplicates, vec![toyota()]);
    }

    #[tokio::test]
    async fn test_find_duplicates_missing_target_is_empty() {
        let persistence = Persistence::new(MockStorage::new());

        let duplicates = persistence
            .find_duplicates(&[toyota()], "missing.txt")
            .await
            .unwrap();
        assert!(duplicates.is_empty());
    }

    #[tokio::test]
    async fn test_find_duplicates_propagates_parse_errors() {
        let storage = MockStorage::new();
        storage.put("broken.txt", "Toyota,gas\n").await;
        let persistence = Persistence::new(storage);

        let err = persistence
            .find_duplicates(&[toyota()], "broken.txt")
            .await
            .unwrap_err();
        assert!(matches!(err, InventoryError::ParseError { .. }));
    }

    #[tokio::test]
    async fn test_unknown_extension_is_rejected() {
        let persistence = Persistence::new(MockStorage::new());

        let err = persistence.import("cars.json").await.unwrap_err();
        assert!(matches!(err, InventoryError::UnsupportedFormat { .. }));

        let err = persistence.export(&[toyota()], "cars.xml").await.unwrap_err();
        assert!(matches!(err, InventoryError::UnsupportedFormat { .. }));
    }

    #[tokio::test]
    async fn test_import_missing_file_is_not_found() {
        let persistence = Persistence::new(MockStorage::new());
        let err = persistence.import("cars.txt").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_export_with_skip_policy_keeps_existing_rows() {
        let storage = MockStorage::new();
        storage.put("cars.txt", "Ford,diesel,2015\nToyota,gas,2020\n").await;
        let persistence = Persistence::new(storage.clone());

        let report = persistence
            .export_with_policy(
                &[toyota(), honda()],
                "cars.txt",
                Format::Txt,
                DuplicatePolicy::Skip,
                |_| panic!("skip policy must not ask"),
            )
            .await
            .unwrap();

        assert_eq!(report.format, Format::Txt);
        assert_eq!(report.written, 1);
        assert_eq!(report.skipped, vec![toyota()]);
        assert_eq!(
            storage.get_file("cars.txt").await.unwrap(),
            "Ford,diesel,2015\nToyota,gas,2020\nHonda,electric,2022\n"
        );
    }

    #[tokio::test]
    async fn test_skipped_cars_are_still_in_the_target_after_export() {
        let storage = MockStorage::new();
        let persistence = Persistence::new(storage.clone());
        persistence.export(&[toyota()], "cars.txt").await.unwrap();

        let report = persistence
            .export_with_policy(
                &[toyota(), honda()],
                "cars.txt",
                Format::Txt,
                DuplicatePolicy::Skip,
                |_| Ok(true),
            )
            .await
            .unwrap();

        assert_eq!(report.skipped, vec![toyota()]);
        let stored = persistence.import("cars.txt").await.unwrap();
        assert_eq!(stored, vec![toyota(), honda()]);
        for car in &report.skipped {
            assert!(stored.contains(car));
        }
    }

    #[tokio::test]
    async fn test_export_with_policy_adds_csv_header_only_once() {
        let storage = MockStorage::new();
        let persistence = Persistence::new(storage.clone());

        for car in [toyota(), honda()] {
            persistence
                .export_with_policy(&[car], "cars.csv", Format::Csv, DuplicatePolicy::Skip, |_| {
                    Ok(true)
                })
                .await
                .unwrap();
        }

        assert_eq!(
            storage.get_file("cars.csv").await.unwrap(),
            "brand,type,year\nToyota,gas,2020\nHonda,electric,2022\n"
        );
    }

    #[tokio::test]
    async fn test_export_with_policy_into_empty_csv_writes_header() {
        let storage = MockStorage::new();
        storage.put("cars.csv", "").await;
        let persistence = Persistence::new(storage.clone());

        persistence
            .export_with_policy(&[honda()], "cars.csv", Format::Csv, DuplicatePolicy::Keep, |_| {
                Ok(false)
            })
            .await
            .unwrap();

        assert_eq!(
            storage.get_file("cars.csv").await.unwrap(),
            "brand,type,year\nHonda,electric,2022\n"
        );
    }

    #[tokio::test]
    async fn test_export_with_policy_into_reordered_csv_keeps_rows() {
        let storage = MockStorage::new();
        storage.put("cars.csv", "year,brand,type\n2015,Ford,diesel").await;
        let persistence = Persistence::new(storage.clone());

        persistence
            .export_with_policy(&[honda()], "cars.csv", Format::Csv, DuplicatePolicy::Keep, |_| {
                Ok(false)
            })
            .await
            .unwrap();

        assert_eq!(
            persistence.import("cars.csv").await.unwrap(),
            vec![Car::new("Ford", "diesel", 2015), honda()]
        );
    }

    #[tokio::test]
    async fn test_export_with_keep_policy_writes_everything() {
        let storage = MockStorage::new();
        storage.put("cars.csv", "brand,type,year\nToyota,gas,2020\n").await;
        let persistence = Persistence::new(storage.clone());

        let report = persistence
            .export_with_policy(
                &[toyota(), honda()],
                "cars.csv",
                Format::Csv,
                DuplicatePolicy::Keep,
                |_| panic!("keep policy must not ask"),
            )
            .await
            .unwrap();

        assert_eq!(report.format, Format::Csv);
        assert_eq!(report.written, 2);
        assert!(report.skipped.is_empty());
        assert_eq!(
            storage.get_file("cars.csv").await.unwrap(),
            "brand,type,year\nToyota,gas,2020\nToyota,gas,2020\nHonda,electric,2022\n"
        );
    }

    #[tokio::test]
    async fn test_export_with_ask_policy_consults_callback_only_on_duplicates() {
        let storage = MockStorage::new();
        let persistence = Persistence::new(storage.clone());

        let mut asked = false;
        persistence
            .export_with_policy(&[toyota()], "cars.txt", Format::Txt, DuplicatePolicy::Ask, |_| {
                asked = true;
                Ok(true)
            })
            .await
            .unwrap();
        assert!(!asked);

        let mut seen = Vec::new();
        let report = persistence
            .export_with_policy(
                &[toyota(), honda()],
                "cars.txt",
                Format::Txt,
                DuplicatePolicy::Ask,
                |dups| {
                    seen = dups.to_vec();
                    Ok(true)
                },
            )
            .await
            .unwrap();

        assert_eq!(seen, vec![toyota()]);
        assert_eq!(report.skipped, vec![toyota()]);
        assert_eq!(
            storage.get_file("cars.txt").await.unwrap(),
            "Toyota,gas,2020\nHonda,electric,2022\n"
        );
    }

    #[tokio::test]
    async fn test_list_files_by_format() {
        let storage = MockStorage::new();
        storage.put("a.txt", "").await;
        storage.put("b.csv", "").await;
        let persistence = Persistence::new(storage);

        assert_eq!(
            persistence.list_files(Some(Format::Csv)).await.unwrap(),
            vec!["b.csv"]
        );
        assert_eq!(persistence.list_files(None).await.unwrap().len(), 2);
    }
}
