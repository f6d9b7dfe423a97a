//! Country display names.

use crate::error::I18nResult;
use crate::Locale;
use serde::Deserialize;

/// Looks up a human-readable country name for chart titles and reports.
///
/// Returning `None` is not an error; callers show the raw identifier instead.
pub trait CountryNameResolver: Send + Sync {
    /// Display name of `id` in `locale`, if known.
    fn resolve(&self, id: &str, locale: &Locale) -> Option<String>;
}

#[derive(Debug, Clone, Deserialize)]
struct CountryEntry {
    iso2: String,
    iso3: String,
    en: String,
    ja: String,
    #[serde(default)]
    aliases: Vec<String>,
}

impl CountryEntry {
    fn matches(&self, id: &str) -> bool {
        [&self.iso2, &self.iso3, &self.en]
            .into_iter()
            .chain(self.aliases.iter())
            .any(|key| key.eq_ignore_ascii_case(id))
    }

    fn name(&self, locale: &Locale) -> &str {
        match locale {
            Locale::English => &self.en,
            Locale::Japanese => &self.ja,
        }
    }
}

/// Static table of country names, matched case-insensitively by ISO code,
/// source spelling or alias.
#[derive(Debug, Clone, Default)]
pub struct CountryDirectory {
    entries: Vec<CountryEntry>,
}

impl CountryDirectory {
    /// Parses a YAML list of `{iso2, iso3, en, ja, aliases}` entries.
    ///
    /// # Errors
    ///
    /// Fails on malformed YAML or missing fields.
    pub fn from_yaml(source: &str) -> I18nResult<Self> {
        Ok(Self {
            entries: serde_yaml::from_str(source)?,
        })
    }

    /// The table compiled into the crate.
    ///
    /// # Errors
    ///
    /// Fails only if the bundled table is corrupt.
    pub fn bundled() -> I18nResult<Self> {
        Self::from_yaml(include_str!("../locales/countries.yaml"))
    }

    /// Number of known countries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl CountryNameResolver for CountryDirectory {
    fn resolve(&self, id: &str, locale: &Locale) -> Option<String> {
        let id = id.trim();
        self.entries
            .iter()
            .find(|entry| entry.matches(id))
            .map(|entry| entry.name(locale).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_table_parses() {
        let directory = CountryDirectory::bundled().unwrap();
        assert!(directory.len() > 40);
    }

    #[test]
    fn resolves_by_any_key() {
        let directory = CountryDirectory::bundled().unwrap();
        for key in ["Japan", "japan", "JP", "jpn"] {
            assert_eq!(
                directory.resolve(key, &Locale::Japanese).as_deref(),
                Some("日本"),
                "key {key}"
            );
        }
        assert_eq!(
            directory.resolve("south korea", &Locale::English).as_deref(),
            Some("S. Korea")
        );
        assert_eq!(
            directory.resolve("NO", &Locale::English).as_deref(),
            Some("Norway")
        );
    }

    #[test]
    fn unknown_country_is_none() {
        let directory = CountryDirectory::bundled().unwrap();
        assert!(directory.resolve("Atlantis", &Locale::English).is_none());
    }
}
