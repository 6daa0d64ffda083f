//! Picker page render context.

use serde::Serialize;

use crate::infrastructure::config::AppConfig;

/// Values handed to the picker page template.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PickerPageContext {
    /// Public server name.
    pub server_name: String,
    /// Whether the local tab is shown.
    pub has_local_files: bool,
    /// Whether a Giphy API key is configured.
    pub has_giphy_key: bool,
    /// Whether a Tenor API key is configured.
    pub has_tenor_key: bool,
    /// Bearer token the page sends to the local listing.
    pub local_api_bearer: String,
    /// Media path prefix.
    pub gif_path: String,
    /// Normalised locale, e.g. `pt_BR`.
    pub locale: String,
}

impl PickerPageContext {
    /// Builds the context from configuration and the local asset check.
    #[must_use]
    pub fn new(config: &AppConfig, has_local_files: bool) -> Self {
        Self {
            server_name: config.server_name.clone(),
            has_local_files,
            has_giphy_key: !config.giphy_api_key.is_empty(),
            has_tenor_key: !config.tenor_api_key.is_empty(),
            local_api_bearer: config.local_api_bearer.clone(),
            gif_path: config.gif_path.clone(),
            locale: config.locale.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_presence_flags() {
        let config = AppConfig {
            giphy_api_key: "abc".to_string(),
            ..AppConfig::default()
        };

        let ctx = PickerPageContext::new(&config, true);

        assert!(ctx.has_giphy_key);
        assert!(!ctx.has_tenor_key);
        assert!(ctx.has_local_files);
        assert_eq!(ctx.gif_path, "/gif/");
    }
}
