pub mod csv_export;
pub mod csv_import;
pub mod file;
pub mod store;

pub use file::{load_board, save_board};
pub use store::KvStore;
