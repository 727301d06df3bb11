// CSV import/export of the application store.
// Wire format: id,company,role,status,appliedOn,notes,lastUpdate with ISO dates.

pub mod decode;
pub mod encode;
pub mod scanner;

pub use decode::{decode, ImportError};
pub use encode::encode;

pub const HEADER: &str = "id,company,role,status,appliedOn,notes,lastUpdate";
pub const COLUMN_COUNT: usize = 7;
pub const DATE_FORMAT: &str = "%Y-%m-%d";
