// Pester Core - Domain Logic & Ports
// NO infrastructure dependencies (hexagonal architecture)

pub mod application;
pub mod domain;
pub mod port;

pub use application::{NotifierStatus, RecurringNotifier};
pub use domain::{Notice, ScheduleRequest, ValidationError};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
