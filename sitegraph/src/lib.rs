pub mod commands;
pub mod handlers;

// Re-export commonly used handler functions for convenience
pub use handlers::{crawl_output, init_settings, parse_url_line, settings_from_args};
