//! Constants used throughout credder.
//!
//! Centralizes magic strings and configuration values.

/// Default variables file name.
pub const VARIABLES_FILE: &str = "gitlab_variables.json";

/// Optional per-project settings file.
pub const CONFIG_FILE: &str = ".credder.toml";

/// Directory `import` writes file-variable contents into.
pub const FILE_VARIABLES_DIR: &str = "variables";

/// Environment scope that applies to every environment.
pub const DEFAULT_SCOPE: &str = "*";

/// Default GitLab instance.
pub const DEFAULT_GITLAB_URL: &str = "https://gitlab.com";

/// Default secret resolver (1Password CLI).
pub const DEFAULT_RESOLVER: &str = "op inject";

/// Page size used when listing remote variables.
pub const PAGE_SIZE: u32 = 100;

/// HTTP timeout for remote calls, in seconds.
pub const HTTP_TIMEOUT_SECS: u64 = 30;

/// Lookup cache file name under the user cache directory.
pub const CACHE_FILE: &str = "credder/lookup-cache.json";

/// Environment variable controlling log output.
pub const LOG_ENV: &str = "CREDDER_LOG";
