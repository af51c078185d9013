//! Binding profiles.
//!
//! A profile maps `(gesture, contact count)` pairs to command strings and
//! carries the recognizer thresholds:
//!
//! ```toml
//! [thresholds]
//! long_tap_ms = 500
//! drag_margin_mm = 20.0
//!
//! [bindings.swipe_up]
//! "3" = "workspace next"
//! ```

use anyhow::{Result, anyhow};
use directories::UserDirs;
use log::info;
use serde::{Deserialize, Deserializer};
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use crate::classifier::GestureKind;
use crate::hysteresis::DEFAULT_DRAG_MARGIN_MM;
use crate::session::LONG_TAP_MS;

#[derive(Debug, Clone, Deserialize)]
pub struct Meta {
    pub name: Option<String>,
    /// Gate for `exec `-prefixed commands, which spawn arbitrary processes.
    #[serde(default)]
    pub allow_commands: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Thresholds {
    #[serde(default = "default_long_tap_ms")]
    pub long_tap_ms: u32,
    #[serde(default = "default_drag_margin_mm")]
    pub drag_margin_mm: f64,
}

fn default_long_tap_ms() -> u32 {
    LONG_TAP_MS
}

fn default_drag_margin_mm() -> f64 {
    DEFAULT_DRAG_MARGIN_MM
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            long_tap_ms: LONG_TAP_MS,
            drag_margin_mm: DEFAULT_DRAG_MARGIN_MM,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Profile {
    pub meta: Meta,
    #[serde(default)]
    pub thresholds: Thresholds,

    // accept nested/dotted tables and flatten them into "swipe_up.3" -> "cmd"
    #[serde(deserialize_with = "deserialize_bindings_flat")]
    pub bindings: HashMap<String, String>,
}

fn deserialize_bindings_flat<'de, D>(
    de: D,
) -> std::result::Result<HashMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let val = toml::Value::deserialize(de)?;
    let table = match val {
        toml::Value::Table(t) => t,
        other => {
            return Err(serde::de::Error::custom(format!(
                "bindings must be a table, got {:?}",
                other.type_str()
            )));
        }
    };

    let mut out = HashMap::new();
    flatten_table("", &table, &mut out).map_err(serde::de::Error::custom)?;
    Ok(out)
}

fn flatten_table(
    prefix: &str,
    table: &toml::value::Table,
    out: &mut HashMap<String, String>,
) -> std::result::Result<(), String> {
    for (k, v) in table {
        let key = if prefix.is_empty() {
            k.clone()
        } else {
            format!("{prefix}.{k}")
        };
        match v {
            toml::Value::String(s) => {
                out.insert(key, s.clone());
            }
            toml::Value::Table(sub) => {
                flatten_table(&key, sub, out)?;
            }
            other => {
                return Err(format!(
                    "binding '{}' value must be a string, got {}",
                    key,
                    other.type_str()
                ));
            }
        }
    }
    Ok(())
}

impl Profile {
    /// Parse and validate a profile from TOML text.
    pub fn from_toml(text: &str) -> Result<Self> {
        let profile: Profile = toml::from_str(text).map_err(|e| anyhow!("parse error: {e}"))?;
        validate_profile(&profile)?;
        Ok(profile)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| anyhow!("failed to read {}: {e}", path.display()))?;
        Self::from_toml(&text).map_err(|e| anyhow!("failed to parse {}: {e}", path.display()))
    }

    /// The profile shipped with the crate.
    pub fn default_profile() -> Self {
        // the embedded profile is validated by tests; a parse failure here
        // is a packaging bug
        Self::from_toml(default_profile_text()).expect("embedded default profile is valid")
    }

    /// Load `bindings.toml` from the per-user config dir, installing the
    /// shipped default on first run.
    pub fn load_or_install_default() -> Result<Self> {
        let dir = config_dir()?;
        fs::create_dir_all(&dir)?;

        let path = dir.join("bindings.toml");
        if !path.exists() {
            fs::write(&path, default_profile_text())?;
            info!("installed default bindings at {}", path.display());
        }
        Self::load(&path)
    }
}

fn config_dir() -> Result<PathBuf> {
    let user = UserDirs::new().ok_or_else(|| anyhow!("no home directory"))?;
    Ok(user.home_dir().join(".config").join("touch-gestures"))
}

fn default_profile_text() -> &'static str {
    include_str!("../profiles/default.toml")
}

/// Split a binding key like `"swipe_up.3"` into its gesture and contact
/// count.
pub fn parse_binding_key(key: &str) -> Result<(GestureKind, u32)> {
    let (slug, count) = key
        .rsplit_once('.')
        .ok_or_else(|| anyhow!("binding key '{key}' must be '<gesture>.<contacts>'"))?;
    let gesture = GestureKind::from_slug(slug)
        .ok_or_else(|| anyhow!("unknown gesture '{slug}' in binding '{key}'"))?;
    let count: u32 = count
        .parse()
        .map_err(|_| anyhow!("contact count in binding '{key}' must be a number"))?;
    if count == 0 {
        return Err(anyhow!("binding '{key}' needs at least one contact"));
    }
    Ok((gesture, count))
}

fn validate_profile(p: &Profile) -> Result<()> {
    if p.thresholds.long_tap_ms == 0 {
        return Err(anyhow!("thresholds.long_tap_ms must be positive"));
    }
    if !p.thresholds.drag_margin_mm.is_finite() || p.thresholds.drag_margin_mm <= 0.0 {
        return Err(anyhow!("thresholds.drag_margin_mm must be positive"));
    }

    for (key, command) in &p.bindings {
        parse_binding_key(key)?;
        if command.trim().is_empty() {
            return Err(anyhow!("binding '{key}' has an empty command"));
        }
        if command.trim_start().starts_with("exec ") && !p.meta.allow_commands {
            return Err(anyhow!(
                "binding '{key}' uses exec but allow_commands=false"
            ));
        }
    }
    Ok(())
}
