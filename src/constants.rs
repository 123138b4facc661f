// src/constants.rs

/// The name of the pm home directory under `~/.config`.
pub const PM_DIR: &str = "pm";

/// The registry of named projects (inside the pm home).
pub const REGISTRY_FILENAME: &str = "registry.yml";

/// Global functions and variables (inside the pm home).
pub const GLOBAL_CONFIG_FILENAME: &str = "global.yml";

/// Default directory holding external renderers (inside the pm home).
pub const PLUGINS_DIRNAME: &str = "plugins";

/// Overrides the pm home directory.
pub const ENV_CONFIGS: &str = "PM_CONFIGS";

/// Selects the output dialect when `--dialect` is not given.
pub const ENV_DIALECT: &str = "PM_DIALECT";

/// Overrides the external renderer directory.
pub const ENV_PLUGIN_DIR: &str = "PM_PLUGIN_DIR";

/// External renderers are executables named `<prefix><dialect>`.
pub const RENDERER_PREFIX: &str = "pm-render-";

/// The single flag every external renderer is invoked with.
pub const RENDER_FLAG: &str = "--render";

/// Compose file used by `:up` when the project does not name one.
pub const DEFAULT_COMPOSE_FILE: &str = "docker-compose.yml";
