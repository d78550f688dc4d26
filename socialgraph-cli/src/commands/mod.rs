//! Command implementations for the socialgraph CLI

pub mod migrate;
pub mod serve;

pub use migrate::run_migrate;
pub use serve::run_serve;

use anyhow::{Context, Result};

/// Database URL from flag or environment, with a hint when neither is set
pub(crate) fn require_database_url(database_url: Option<String>) -> Result<String> {
    database_url
        .filter(|url| !url.trim().is_empty())
        .context("DATABASE_URL not set. Set via --database-url, DATABASE_URL env, or a .env file")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_database_url_is_rejected() {
        assert!(require_database_url(None).is_err());
        assert!(require_database_url(Some("  ".into())).is_err());
        assert_eq!(
            require_database_url(Some("postgres://db/x".into())).unwrap(),
            "postgres://db/x"
        );
    }
}
