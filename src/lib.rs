// gcalsync library
// Blocker-event bookkeeping and the desync routine that removes it

pub mod calendar;
pub mod config;
pub mod database;
pub mod desync;
pub mod error;
pub mod http_config;
pub mod models;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use database::Database;
pub use desync::{account_name_for_calendar, desync_calendars, DesyncOptions, DesyncSummary, Desynchronizer};
pub use error::{AppError, AppResult};
pub use models::*;
