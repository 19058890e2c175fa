use anyhow::{bail, Context, Result};
use chrono::format::{Item, StrftimeItems};
use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use crate::models::ConfigItem;
use crate::suggest::did_you_mean;
use crate::view::SortKey;

pub const PROJECTS_SORT: &str = "projects.sort";
pub const FEEDBACK_SORT: &str = "feedback.sort";
pub const QUESTIONS_SORT: &str = "questions.sort";
pub const DATE_FORMAT: &str = "display.date_format";

const FALLBACK_DATE_FORMAT: &str = "%Y-%m-%d";

struct KnownKey {
    name: &'static str,
    default: &'static str,
    description: &'static str,
    validate: fn(&str) -> Result<()>,
}

const KNOWN_KEYS: &[KnownKey] = &[
    KnownKey {
        name: PROJECTS_SORT,
        default: "date",
        description: "Default sort key of the projects page",
        validate: validate_sort_key,
    },
    KnownKey {
        name: FEEDBACK_SORT,
        default: "date",
        description: "Default sort key of the feedback page",
        validate: validate_sort_key,
    },
    KnownKey {
        name: QUESTIONS_SORT,
        default: "usage",
        description: "Default sort key of the questions page",
        validate: validate_sort_key,
    },
    KnownKey {
        name: DATE_FORMAT,
        default: "%b %d, %Y",
        description: "strftime pattern used to display dates",
        validate: validate_date_format,
    },
];

fn validate_sort_key(value: &str) -> Result<()> {
    if SortKey::from_name(value).is_none() {
        bail!(
            "'{}' is not a sort key{}; expected one of: {}",
            value,
            did_you_mean(value, &SortKey::names()),
            SortKey::names().join(", ")
        );
    }
    Ok(())
}

// Patterns must parse and render a plain date; time-only fields like `%H`
// parse but fail to render without a time.
fn validate_date_format(value: &str) -> Result<()> {
    if value.trim().is_empty() || StrftimeItems::new(value).any(|item| matches!(item, Item::Error)) {
        bail!("'{}' is not a valid date format", value);
    }
    let sample = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap_or_default();
    if write!(String::new(), "{}", sample.format(value)).is_err() {
        bail!("'{}' cannot render a date (time fields are not available)", value);
    }
    Ok(())
}

fn known_key(name: &str) -> Result<&'static KnownKey> {
    match KNOWN_KEYS.iter().find(|key| key.name == name) {
        Some(key) => Ok(key),
        None => {
            let names: Vec<&str> = KNOWN_KEYS.iter().map(|key| key.name).collect();
            bail!("unknown config key '{}'{}", name, did_you_mean(name, &names))
        }
    }
}

/// Renders `date` with a strftime pattern, falling back to ISO dates when
/// the pattern cannot be rendered.
pub fn format_date(date: NaiveDate, pattern: &str) -> String {
    let mut out = String::new();
    if write!(out, "{}", date.format(pattern)).is_err() {
        out.clear();
        out.push_str(&date.format(FALLBACK_DATE_FORMAT).to_string());
    }
    out
}

/// `PULSE_DB` if set, otherwise `~/.pulse.db`.
pub fn default_db_path() -> PathBuf {
    if let Ok(path) = std::env::var("PULSE_DB") {
        return PathBuf::from(path);
    }
    let home_dir = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home_dir).join(".pulse.db")
}

/// The terminal UI logs next to the preferences database.
pub fn log_path(db_path: &Path) -> PathBuf {
    db_path.with_extension("log")
}

/// Dashboard preferences, the only state kept between runs.
pub struct ConfigStore {
    conn: Connection,
}

impl ConfigStore {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("failed to open preferences database {}", path.display()))?;
        Self::with_connection(conn)
    }

    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        // Create tables if they don't exist
        conn.execute(
            "CREATE TABLE IF NOT EXISTS configs (
                key_name TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )",
            [],
        )?;
        Ok(ConfigStore { conn })
    }

    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        let known = known_key(key)?;
        let value = value.trim();
        (known.validate)(value)?;

        self.conn.execute(
            "INSERT INTO configs (key_name, value) VALUES (?1, ?2)
             ON CONFLICT(key_name) DO UPDATE SET value = excluded.value, updated_at = CURRENT_TIMESTAMP",
            [key, value],
        )?;
        log::debug!("config {} set to '{}'", key, value);
        Ok(())
    }

    fn stored(&self, key: &str) -> Result<Option<(String, String)>> {
        let row = self
            .conn
            .query_row(
                "SELECT value, updated_at FROM configs WHERE key_name = ?1",
                [key],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;
        Ok(row)
    }

    /// Stored value or the key's default.
    pub fn get(&self, key: &str) -> Result<String> {
        let known = known_key(key)?;
        Ok(self
            .stored(key)?
            .map_or_else(|| known.default.to_string(), |(value, _)| value))
    }

    /// Every known key, stored values overlaying defaults.
    pub fn list(&self) -> Result<Vec<ConfigItem>> {
        let mut items = Vec::new();
        for known in KNOWN_KEYS {
            let item = match self.stored(known.name)? {
                Some((value, updated_at)) => ConfigItem {
                    key_name: known.name.to_string(),
                    value,
                    description: known.description.to_string(),
                    is_default: false,
                    updated_at: Some(updated_at),
                },
                None => ConfigItem {
                    key_name: known.name.to_string(),
                    value: known.default.to_string(),
                    description: known.description.to_string(),
                    is_default: true,
                    updated_at: None,
                },
            };
            items.push(item);
        }
        Ok(items)
    }

    /// Restores the default. Returns whether a stored value was removed.
    pub fn delete(&self, key: &str) -> Result<bool> {
        known_key(key)?;
        let removed = self
            .conn
            .execute("DELETE FROM configs WHERE key_name = ?1", [key])?;
        Ok(removed > 0)
    }

    /// Sort key preference for a page. A value that no longer parses keeps
    /// insertion order instead of failing.
    pub fn sort_for(&self, key: &str) -> Result<SortKey> {
        Ok(SortKey::resolve(&self.get(key)?))
    }

    pub fn date_format(&self) -> Result<String> {
        let pattern = self.get(DATE_FORMAT)?;
        if validate_date_format(&pattern).is_err() {
            log::warn!("stored date format '{}' is invalid, using {}", pattern, FALLBACK_DATE_FORMAT);
            return Ok(FALLBACK_DATE_FORMAT.to_string());
        }
        Ok(pattern)
    }
}
