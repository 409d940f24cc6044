pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::LocalStorage;
pub use app::menu::Menu;
pub use config::{toml_config::TomlConfig, Settings};
pub use crate::core::{inventory::Inventory, persistence::Persistence};
pub use domain::model::{Car, DuplicatePolicy, ExportReport, Format};
pub use utils::error::{InventoryError, Result};
