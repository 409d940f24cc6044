use car_inventory::{Car, DuplicatePolicy, Format, LocalStorage, Persistence};
use tempfile::TempDir;

fn toyota() -> Car {
    Car::new("Toyota", "gas", 2020)
}

fn honda() -> Car {
    Car::new("Honda", "electric", 2022)
}

fn persistence(dir: &TempDir) -> Persistence<LocalStorage> {
    Persistence::new(LocalStorage::new(dir.path()))
}

#[tokio::test]
async fn test_existing_csv_example() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("cars.csv"), "brand,type,year\nToyota,gas,2020\n").unwrap();

    let duplicates = persistence(&dir)
        .find_duplicates(&[toyota(), honda()], "cars.csv")
        .await
        .unwrap();

    assert_eq!(duplicates, vec![toyota()]);
}

#[tokio::test]
async fn test_empty_candidates_and_missing_targets() {
    let dir = TempDir::new().unwrap();
    let persistence = persistence(&dir);
    persistence.export(&[toyota()], "cars.txt").await.unwrap();

    assert!(persistence
        .find_duplicates(&[], "cars.txt")
        .await
        .unwrap()
        .is_empty());

    for format in Format::ALL {
        let path = format.file_name("missing");
        let duplicates = persistence.find_duplicates(&[toyota()], &path).await.unwrap();
        assert!(duplicates.is_empty(), "{path}");
        assert!(!dir.path().join(&path).exists(), "{path} must not be created");
    }
}

#[tokio::test]
async fn test_target_holding_everything_reports_everything() {
    let dir = TempDir::new().unwrap();
    let persistence = persistence(&dir);
    let cars = vec![honda(), toyota(), Car::new("Ford", "diesel", 1998)];

    for format in Format::ALL {
        let path = format.file_name("all");
        persistence.export(&cars, &path).await.unwrap();

        let duplicates = persistence.find_duplicates(&cars, &path).await.unwrap();
        assert_eq!(duplicates, cars, "{path}");
    }
}

#[tokio::test]
async fn test_single_field_difference_is_not_a_duplicate() {
    let dir = TempDir::new().unwrap();
    let persistence = persistence(&dir);
    persistence.export(&[toyota()], "cars.db").await.unwrap();

    let candidates = vec![
        Car::new("Lexus", "gas", 2020),
        Car::new("Toyota", "hybrid", 2020),
        Car::new("Toyota", "gas", 2019),
    ];
    let duplicates = persistence.find_duplicates(&candidates, "cars.db").await.unwrap();
    assert!(duplicates.is_empty());
}

#[tokio::test]
async fn test_skip_policy_on_database_appends_only_new_cars() {
    let dir = TempDir::new().unwrap();
    let persistence = persistence(&dir);
    persistence.export(&[toyota()], "cars.db").await.unwrap();

    let report = persistence
        .export_with_policy(
            &[toyota(), honda()],
            "cars.db",
            Format::Db,
            DuplicatePolicy::Skip,
            |_| Ok(false),
        )
        .await
        .unwrap();

    assert_eq!(report.written, 1);
    assert_eq!(report.skipped, vec![toyota()]);
    assert_eq!(
        persistence.import("cars.db").await.unwrap(),
        vec![toyota(), honda()]
    );
}

#[tokio::test]
async fn test_keep_policy_on_database_allows_duplicate_rows() {
    let dir = TempDir::new().unwrap();
    let persistence = persistence(&dir);
    persistence.export(&[toyota()], "cars.db").await.unwrap();

    let report = persistence
        .export_with_policy(&[toyota()], "cars.db", Format::Db, DuplicatePolicy::Keep, |_| {
            Ok(true)
        })
        .await
        .unwrap();

    assert_eq!(report.written, 1);
    assert!(report.skipped.is_empty());
    assert_eq!(
        persistence.import("cars.db").await.unwrap(),
        vec![toyota(), toyota()]
    );
}

#[tokio::test]
async fn test_skip_policy_never_drops_existing_file_rows() {
    let dir = TempDir::new().unwrap();
    let persistence = persistence(&dir);

    for (path, format) in [("cars.txt", Format::Txt), ("cars.csv", Format::Csv)] {
        persistence.export(&[toyota()], path).await.unwrap();

        let report = persistence
            .export_with_policy(&[toyota(), honda()], path, format, DuplicatePolicy::Skip, |_| {
                Ok(false)
            })
            .await
            .unwrap();

        assert_eq!(report.format, format);
        assert_eq!(report.skipped, vec![toyota()]);
        assert_eq!(
            persistence.import(path).await.unwrap(),
            vec![toyota(), honda()],
            "{path}"
        );
    }
}

#[tokio::test]
async fn test_repeated_skip_exports_do_not_grow_the_file() {
    let dir = TempDir::new().unwrap();
    let persistence = persistence(&dir);

    for _ in 0..3 {
        persistence
            .export_with_policy(
                &[toyota(), honda()],
                "cars.csv",
                Format::Csv,
                DuplicatePolicy::Skip,
                |_| Ok(false),
            )
            .await
            .unwrap();
    }

    assert_eq!(
        persistence.import("cars.csv").await.unwrap(),
        vec![toyota(), honda()]
    );
}
