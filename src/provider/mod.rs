pub mod sqlite;

pub use sqlite::{SqliteProvider, DEFAULT_RANKING_LIMIT};
