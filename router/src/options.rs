use crate::{PathOptions, RouterError};
use config::{Config, File, FileFormat};
use serde::Deserialize;
use std::path::Path;
use typed_builder::TypedBuilder;

/// Options of a [`Resolver`](crate::Resolver).
///
/// They can be built in code or read from TOML:
/// ```toml
/// base = "/app"
/// sensitive = false
/// strict = true
/// ```
#[derive(TypedBuilder, Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ResolverOptions {
    /// Stripped from incoming paths by [`Resolver::strip_base`] and
    /// prepended by [`Resolver::href`].
    ///
    /// [`Resolver::strip_base`]: crate::Resolver::strip_base
    /// [`Resolver::href`]: crate::Resolver::href
    #[builder(default, setter(into))]
    pub base: String,
    /// Matches paths case-sensitively.
    #[builder(default = true)]
    pub sensitive: bool,
    /// Requires trailing slashes to match exactly.
    #[builder(default = true)]
    pub strict: bool,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl ResolverOptions {
    /// Reads options from a TOML document. Missing keys keep their
    /// defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, RouterError> {
        let config = Config::builder()
            .add_source(File::from_str(text, FileFormat::Toml))
            .build()?;
        Ok(config.try_deserialize()?)
    }

    /// Reads options from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, RouterError> {
        let path = path.as_ref();
        tracing::debug!("loading resolver options from {}", path.display());
        let config = Config::builder()
            .add_source(File::from(path).format(FileFormat::Toml))
            .build()?;
        Ok(config.try_deserialize()?)
    }

    pub fn path_options(&self) -> PathOptions {
        PathOptions {
            sensitive: self.sensitive,
            strict: self.strict,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_strict_and_sensitive() {
        let options = ResolverOptions::default();
        assert_eq!(options.base, "");
        assert!(options.sensitive);
        assert!(options.strict);
        assert_eq!(options.path_options(), PathOptions::default());
    }

    #[test]
    fn builder_converts_base() {
        let options = ResolverOptions::builder().base("/app").strict(false).build();
        assert_eq!(options.base, "/app");
        assert!(!options.strict);
    }
}
