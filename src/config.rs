use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};

use crate::autosave::DEFAULT_INTERVAL;
use crate::ui::style::{Rgb, ThemeName};

/// Editor defaults, as read from a config file or the command line.
///
/// Config files hold the same flag tokens as the CLI, one or more per line.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigFlags {
    pub theme: Option<ThemeName>,
    pub background: Option<Rgb>,
    pub autosave_secs: Option<u64>,
    pub no_watch: bool,
    pub log_file: Option<PathBuf>,
}

impl ConfigFlags {
    /// Merge `other` over `self`: switches accumulate, options from `other` win.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            theme: other.theme.or(self.theme),
            background: other.background.or(self.background),
            autosave_secs: other.autosave_secs.or(self.autosave_secs),
            no_watch: self.no_watch || other.no_watch,
            log_file: other.log_file.clone().or_else(|| self.log_file.clone()),
        }
    }

    pub fn into_config(self) -> EditorConfig {
        EditorConfig {
            theme: self.theme.unwrap_or_default(),
            background: self.background,
            autosave_interval: self
                .autosave_secs
                .map_or(DEFAULT_INTERVAL, Duration::from_secs),
            watch: !self.no_watch,
        }
    }
}

/// Settings the running editor starts with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorConfig {
    pub theme: ThemeName,
    pub background: Option<Rgb>,
    /// Zero disables autosave.
    pub autosave_interval: Duration,
    pub watch: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        ConfigFlags::default().into_config()
    }
}

pub fn global_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("mdpad").join("config");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("mdpad")
                .join("config");
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("mdpad").join("config");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join(".config").join("mdpad").join("config");
        }
    }

    local_override_path()
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(".mdpadrc")
}

pub fn load_config_flags(path: &Path) -> Result<ConfigFlags> {
    if !path.exists() {
        return Ok(ConfigFlags::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let tokens = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .flat_map(|line| line.split_whitespace().map(ToOwned::to_owned))
        .collect::<Vec<_>>();
    Ok(parse_flag_tokens(&tokens))
}

pub fn save_config_flags(path: &Path, flags: &ConfigFlags) -> Result<()> {
    let mut lines = vec!["# mdpad defaults (saved with --save)".to_string()];
    if let Some(theme) = flags.theme {
        lines.push(format!("--theme {}", theme.as_str()));
    }
    if let Some(background) = flags.background {
        lines.push(format!("--background {background}"));
    }
    if let Some(secs) = flags.autosave_secs {
        lines.push(format!("--autosave-secs {secs}"));
    }
    if flags.no_watch {
        lines.push("--no-watch".to_string());
    }
    if let Some(path) = &flags.log_file {
        lines.push(format!("--log-file {}", path.display()));
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
    }
    fs::write(path, format!("{}\n", lines.join("\n")))
        .with_context(|| format!("Failed to write config {}", path.display()))
}

pub fn clear_config_flags(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    Ok(())
}

/// Pick known flags out of `tokens`; anything else is skipped.
pub fn parse_flag_tokens(tokens: &[String]) -> ConfigFlags {
    let mut flags = ConfigFlags::default();
    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i].as_str();
        let (name, inline_value) = match token.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (token, None),
        };
        let takes_value = matches!(
            name,
            "--theme" | "--background" | "--autosave-secs" | "--log-file"
        );
        let value = if takes_value && inline_value.is_none() {
            i += 1;
            tokens.get(i).map(String::as_str)
        } else {
            inline_value
        };

        match (name, value) {
            ("--no-watch", None) => flags.no_watch = true,
            ("--theme", Some(v)) => flags.theme = ThemeName::parse(v),
            ("--background", Some(v)) => flags.background = Rgb::parse_hex(v),
            ("--autosave-secs", Some(v)) => flags.autosave_secs = v.parse().ok(),
            ("--log-file", Some(v)) => flags.log_file = Some(PathBuf::from(v)),
            _ => {}
        }
        i += 1;
    }
    flags
}
