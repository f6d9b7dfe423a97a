//! `FluentBundle` management and message formatting

use crate::error::{I18nError, I18nResult};
use crate::Locale;
use fluent::{FluentArgs, FluentResource};
use fluent_bundle::concurrent::FluentBundle;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Holds one thread-safe bundle per loaded locale
#[derive(Default)]
pub struct BundleManager {
    bundles: HashMap<Locale, FluentBundle<FluentResource>>,
}

impl std::fmt::Debug for BundleManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BundleManager")
            .field("locales", &self.bundles.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl BundleManager {
    /// Create a new `BundleManager`
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a resource to a locale's bundle
    ///
    /// # Errors
    ///
    /// Fails when the resource redefines a message already in the bundle.
    pub fn add_resource(&mut self, locale: &Locale, resource: FluentResource) -> I18nResult<()> {
        let lang_id = locale.to_language_identifier()?;
        let bundle = self.bundles.entry(*locale).or_insert_with(|| {
            let mut bundle = FluentBundle::new_concurrent(vec![lang_id]);
            bundle.set_use_isolating(false);
            bundle
        });

        bundle.add_resource(resource).map_err(|errors| I18nError::FluentParse {
            locale: locale.code().to_string(),
            errors: errors.into_iter().map(|e| format!("{e:?}")).collect(),
        })?;

        debug!("Added resource to bundle for locale: {}", locale);
        Ok(())
    }

    /// Format a message with the given arguments
    ///
    /// # Errors
    ///
    /// Fails when the message is missing or a placeable cannot be resolved.
    pub fn format_message(
        &self,
        locale: &Locale,
        message_id: &str,
        args: Option<&FluentArgs>,
    ) -> I18nResult<String> {
        let not_found = || I18nError::MessageNotFound {
            key: message_id.to_string(),
        };
        let bundle = self.bundles.get(locale).ok_or_else(not_found)?;
        let pattern = bundle
            .get_message(message_id)
            .and_then(|message| message.value())
            .ok_or_else(not_found)?;

        let mut errors = Vec::new();
        let formatted = bundle.format_pattern(pattern, args, &mut errors);

        if !errors.is_empty() {
            let errors: Vec<String> = errors.into_iter().map(|e| format!("{e:?}")).collect();
            warn!("Formatting errors for message '{}': {:?}", message_id, errors);
            return Err(I18nError::MessageFormat {
                key: message_id.to_string(),
                errors,
            });
        }

        Ok(formatted.into_owned())
    }

    /// Check if a message exists in the bundle
    #[must_use]
    pub fn has_message(&self, locale: &Locale, message_id: &str) -> bool {
        self.bundles
            .get(locale)
            .is_some_and(|bundle| bundle.has_message(message_id))
    }

    /// Get all available locales
    #[must_use]
    pub fn available_locales(&self) -> Vec<&Locale> {
        self.bundles.keys().collect()
    }
}

/// Macro to create `Option<FluentArgs>` more easily
#[macro_export]
macro_rules! fluent_args {
    () => {
        None
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut args = $crate::FluentArgs::new();
        $(
            args.set($key, $value);
        )+
        Some(args)
    }};
}
