pub mod env;
pub mod instantiate_run;
pub mod logging;
pub mod progress_config;
