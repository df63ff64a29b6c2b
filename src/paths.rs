use std::path::PathBuf;

const APP_DIR: &str = "tbrowse";

pub fn user_log_dir() -> PathBuf {
	#[cfg(target_os = "windows")]
	{
		std::env::var_os("LOCALAPPDATA").map(PathBuf::from).unwrap_or_else(std::env::temp_dir).join(APP_DIR).join("logs")
	}

	#[cfg(target_os = "macos")]
	{
		home_dir().join("Library").join("Logs").join(APP_DIR)
	}

	#[cfg(all(unix, not(target_os = "macos")))]
	{
		if let Some(state_home) = std::env::var_os("XDG_STATE_HOME").map(PathBuf::from) {
			return state_home.join(APP_DIR).join("logs");
		}
		home_dir().join(".local").join("state").join(APP_DIR).join("logs")
	}
}

pub fn user_config_dir() -> PathBuf {
	#[cfg(target_os = "windows")]
	{
		std::env::var_os("APPDATA").map(PathBuf::from).unwrap_or_else(std::env::temp_dir).join(APP_DIR)
	}

	#[cfg(target_os = "macos")]
	{
		home_dir().join("Library").join("Application Support").join(APP_DIR)
	}

	#[cfg(all(unix, not(target_os = "macos")))]
	{
		if let Some(config_home) = std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from) {
			return config_home.join(APP_DIR);
		}
		home_dir().join(".config").join(APP_DIR)
	}
}

pub fn default_config_file() -> PathBuf { user_config_dir().join("config.toml") }

#[cfg(not(target_os = "windows"))]
fn home_dir() -> PathBuf { std::env::var_os("HOME").map(PathBuf::from).unwrap_or_else(std::env::temp_dir) }
