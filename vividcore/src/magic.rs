/// Name of the environment variable containing the path to the engine configuration file.
/// If not set, defaults to
///  (1) on Linux and macOS: `$XDG_CONFIG_HOME/vivid/engine.toml` or `$HOME/.config/vivid/engine.toml`
///  (2) on Windows: `%APPDATA%\vivid\engine.toml`
pub const ENV_CONFIG_PATH: &str = "VIVID_CONFIG_PATH";

/// Directory holding the engine configuration, below the platform configuration directory.
pub const CONFIG_DIR_NAME: &str = "vivid";

/// File name of the engine configuration.
pub const CONFIG_FILE_NAME: &str = "engine.toml";
