pub mod committee;
pub mod config;
pub mod credentials;
pub mod db;
pub mod error;
pub mod grades;
pub mod record;
pub mod storage;
pub mod wizard;

pub use config::{default_config_path, load_config, Config};
pub use db::{Database, DatabaseError};
pub use error::{ConfigError, GradregError, Result, StorageError};
pub use grades::{Semester, SemesterAverage};
pub use record::{FullRecord, PortalView, RecordError, TranscriptSummary};
pub use storage::UploadStore;
pub use wizard::{Role, Step, StepOutcome, WizardError, WizardState};
