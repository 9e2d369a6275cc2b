pub mod config;
pub mod error;
pub mod table;

pub use config::TabchatConfig;
pub use error::{Result, TabchatError};
pub use table::{DataSource, ExternalTable, TableHandle};
