//! Top-level error wrapper types.

use crate::{
    ConfigError, DatabaseError, GatewayError, ImageError, LockError, PipelineError, ProviderError,
    SitemapError, SyncError,
};

/// This is the foundation error enum. Each storyloom crate contributes the
/// variant for its own concern.
///
/// # Examples
///
/// ```
/// use storyloom_error::{StoryloomError, ConfigError};
///
/// let cfg_err = ConfigError::new("missing field");
/// let err: StoryloomError = cfg_err.into();
/// assert!(format!("{}", err).contains("Configuration Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum StoryloomErrorKind {
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Trend provider error
    #[from(ProviderError)]
    Provider(ProviderError),
    /// Record store error
    #[from(DatabaseError)]
    Database(DatabaseError),
    /// Generation gateway error
    #[from(GatewayError)]
    Gateway(GatewayError),
    /// Image render error
    #[from(ImageError)]
    Image(ImageError),
    /// Sitemap error
    #[from(SitemapError)]
    Sitemap(SitemapError),
    /// Pipeline orchestration error
    #[from(PipelineError)]
    Pipeline(PipelineError),
    /// Run lock error
    #[from(LockError)]
    Lock(LockError),
    /// Git sync error
    #[from(SyncError)]
    Sync(SyncError),
}

/// Storyloom error with kind discrimination.
///
/// # Examples
///
/// ```
/// use storyloom_error::{StoryloomResult, ConfigError};
///
/// fn might_fail() -> StoryloomResult<()> {
///     Err(ConfigError::new("missing field"))?
/// }
///
/// assert!(might_fail().is_err());
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Storyloom Error: {}", _0)]
pub struct StoryloomError(Box<StoryloomErrorKind>);

impl StoryloomError {
    /// Create a new error from a kind.
    pub fn new(kind: StoryloomErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &StoryloomErrorKind {
        &self.0
    }
}

// Generic From implementation for any type that converts to StoryloomErrorKind
impl<T> From<T> for StoryloomError
where
    T: Into<StoryloomErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for storyloom operations.
pub type StoryloomResult<T> = std::result::Result<T, StoryloomError>;
