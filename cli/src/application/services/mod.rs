//! Application services — use-case orchestration.
//!
//! Each service module implements a single use-case by composing domain logic
//! with port trait calls. Services import only from `crate::domain` and
//! `crate::application::ports` — never from `crate::infra`, `crate::commands`,
//! or `crate::output`.

pub mod apps;
pub mod artifacts;
pub mod auth;
pub mod handlers;
pub mod jobs;
pub mod platform;
pub mod suite;

pub use apps::Registration;
pub use artifacts::DownloadedArchive;
pub use handlers::{CancelOnRunning, FinishAndCollect, StatusHandler};
pub use jobs::JobRun;
pub use platform::PlatformClient;
pub use suite::SuiteRunner;
