//! Resource management for Fluent files

use crate::error::{I18nError, I18nResult};
use crate::Locale;
use fluent::FluentResource;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

/// Loads Fluent resources, preferring an override directory over the bundled files
#[derive(Debug, Default)]
pub struct ResourceManager {
    /// Directory holding `{lang}/main.ftl` overrides
    base_dir: Option<PathBuf>,
}

impl ResourceManager {
    /// Create a new `ResourceManager`
    pub fn new<P: AsRef<Path>>(base_dir: Option<P>) -> Self {
        Self {
            base_dir: base_dir.map(|dir| dir.as_ref().to_path_buf()),
        }
    }

    /// Load the resource for the given locale
    ///
    /// # Errors
    ///
    /// Fails when an override file exists but cannot be read or parsed.
    pub fn load_resource(&self, locale: &Locale) -> I18nResult<FluentResource> {
        let source = match self.override_path(locale) {
            Some(path) => {
                debug!("Loading resource file: {:?}", path);
                let content = fs::read_to_string(&path).map_err(|source| I18nError::ResourceLoad {
                    path: path.to_string_lossy().to_string(),
                    source,
                })?;
                info!("Using locale override for {}", locale);
                content
            }
            None => locale.bundled_resource().to_string(),
        };

        FluentResource::try_new(source).map_err(|(_, errors)| {
            let errors: Vec<String> = errors.into_iter().map(|e| format!("{e:?}")).collect();
            error!("Failed to parse Fluent resource for {}: {:?}", locale, errors);
            I18nError::FluentParse {
                locale: locale.code().to_string(),
                errors,
            }
        })
    }

    fn override_path(&self, locale: &Locale) -> Option<PathBuf> {
        self.base_dir
            .as_ref()
            .map(|dir| dir.join(locale.resource_file()))
            .filter(|path| path.exists())
    }
}
