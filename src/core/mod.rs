pub mod csv_codec;
pub mod duplicates;
pub mod inventory;
pub mod persistence;
pub mod sqlite_codec;
pub mod text_codec;

pub use crate::domain::model::{Car, DuplicatePolicy, ExportReport, Format};
pub use crate::domain::ports::{Codec, Storage};
pub use crate::utils::error::Result;
