//! Config module.
//! Provides configuration types, config file discovery, XML loading, and validation.

pub mod paths;
pub mod types;
mod validate;
pub mod xml;

pub use paths::{
    CONFIG_ENV, config_search_paths, default_config_path, default_log_path, expand_home,
    path_has_symlink_ancestor,
};
pub use types::{Config, LogLevel, ScanMode};
pub use validate::validate_and_normalize;
pub use xml::{LoadResult, create_template_config, load_config_from_xml_path, load_or_init};

/// Marker file name used when the config does not set one.
pub const MARKER_NAME_DEFAULT: &str = ".filesort";
