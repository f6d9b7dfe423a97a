//! Internationalization manager

use crate::bundle::BundleManager;
use crate::error::{I18nError, I18nResult};
use crate::resource::ResourceManager;
use crate::Locale;
use fluent::FluentArgs;
use std::path::Path;
use tracing::{info, warn};

/// Formats localized messages for one active locale, falling back to English
#[derive(Debug)]
pub struct I18nManager {
    /// Locale used when the caller does not name one
    default_locale: Locale,
    bundle_manager: BundleManager,
}

impl I18nManager {
    /// Create a manager with every supported locale loaded
    ///
    /// Files under `locales_dir` replace the bundled translations per locale.
    ///
    /// # Errors
    ///
    /// Fails when an override file is unreadable or does not parse.
    pub fn new<P: AsRef<Path>>(default_locale: Locale, locales_dir: Option<P>) -> I18nResult<Self> {
        let resources = ResourceManager::new(locales_dir);
        let mut bundle_manager = BundleManager::new();
        for locale in Locale::all() {
            bundle_manager.add_resource(&locale, resources.load_resource(&locale)?)?;
        }

        info!("I18nManager initialized with default locale: {}", default_locale);
        Ok(Self {
            default_locale,
            bundle_manager,
        })
    }

    /// Create a manager from bundled translations only
    ///
    /// # Errors
    ///
    /// Fails only if a bundled file is corrupt, which the build script rules out.
    pub fn bundled(default_locale: Locale) -> I18nResult<Self> {
        Self::new::<&Path>(default_locale, None)
    }

    /// Get a localized message
    ///
    /// # Errors
    ///
    /// Fails when neither `locale` nor English defines `key`.
    pub fn get_message(
        &self,
        key: &str,
        locale: &Locale,
        args: Option<&FluentArgs>,
    ) -> I18nResult<String> {
        if self.bundle_manager.has_message(locale, key) {
            return self.bundle_manager.format_message(locale, key, args);
        }

        let fallback = Locale::English;
        if locale != &fallback && self.bundle_manager.has_message(&fallback, key) {
            warn!(
                "Message '{}' not found in locale {}, falling back to {}",
                key, locale, fallback
            );
            return self.bundle_manager.format_message(&fallback, key, args);
        }

        Err(I18nError::MessageNotFound {
            key: key.to_string(),
        })
    }

    /// Get a localized message with fallback to a default message
    pub fn get_message_or_default(
        &self,
        key: &str,
        locale: &Locale,
        args: Option<&FluentArgs>,
        default: &str,
    ) -> String {
        self.get_message(key, locale, args).unwrap_or_else(|e| {
            warn!("Message '{}' unavailable ({}), using default: '{}'", key, e, default);
            default.to_string()
        })
    }

    /// Message in the default locale; the key itself when nothing resolves
    pub fn text(&self, key: &str, args: Option<&FluentArgs>) -> String {
        self.get_message_or_default(key, &self.default_locale, args, key)
    }

    /// Check if a message exists for the given locale
    #[must_use]
    pub fn has_message(&self, key: &str, locale: &Locale) -> bool {
        self.bundle_manager.has_message(locale, key)
    }

    /// Get the default locale
    #[must_use]
    pub const fn default_locale(&self) -> &Locale {
        &self.default_locale
    }

    /// Get all loaded locales
    #[must_use]
    pub fn loaded_locales(&self) -> Vec<&Locale> {
        self.bundle_manager.available_locales()
    }
}
