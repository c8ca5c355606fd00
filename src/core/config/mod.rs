pub mod data;
pub mod defaults;
pub mod io;
pub mod orchestrator;
pub mod printing;

pub use data::{path_display, Config};
pub use defaults::{ConfigKey, BASE_URL_ENV_VAR, DEFAULT_BASE_URL};
