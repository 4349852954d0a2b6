pub mod builtin;
pub mod catalog;
pub mod coins;
pub mod config;
pub mod notification;
pub mod progression;
pub mod question;
pub mod quiz;
pub mod reward;
pub mod storage;
pub mod timeline;

pub use builtin::{BUILTIN_LEVEL_COUNT, builtin_catalog, builtin_questions};
pub use catalog::{CatalogError, CatalogLoadError, QuestionCatalog, QuestionList};
pub use coins::{COINS_KEY, CoinGateway};
pub use config::{ConfigError, QuizConfig};
pub use notification::{NotificationInfo, NotificationState, NotificationStore};
pub use progression::{ProgressionState, ProgressionStore};
pub use question::{Question, QuestionError};
pub use quiz::{LevelRow, Quiz, QuizError, QuizEvent, QuizSnapshot};
pub use reward::RewardTable;
#[cfg(not(target_arch = "wasm32"))]
pub use storage::JsonFileStore;
pub use storage::{KeyValueStore, MemoryStore, StorageError};
pub use timeline::{Timeline, TimerId};
