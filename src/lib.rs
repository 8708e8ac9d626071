// Persona Table - Core Library
// Record store and entry-form logic, independent of the terminal UI

pub mod config;
pub mod error;
pub mod form;
pub mod logging;
pub mod persona;
pub mod store;

// Re-export commonly used types
pub use config::{AppConfig, ConfigError, LoggingSettings};
pub use error::{FormError, FormErrors};
pub use form::{
    submit, submit_edit, validate, DialogState, EntryForm, Field, FormMode, SaveOutcome,
    ValidationResult,
};
pub use logging::init_logging;
pub use persona::Persona;
pub use store::PersonaStore;
