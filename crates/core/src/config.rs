//! Runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into
//! services. Environment variables are never read during request handling,
//! which keeps behaviour consistent across multi-threaded runtimes and test
//! harnesses.

use crate::{RecordsError, RecordsResult};

/// Deployment profile selecting the authentication behaviour.
///
/// `Dev` substitutes a fixed caller identifier when the `X-User-Id` header is
/// absent; `Prod` rejects such requests with 401.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Profile {
    Dev,
    Prod,
}

impl Profile {
    pub fn is_dev(self) -> bool {
        matches!(self, Profile::Dev)
    }
}

impl std::str::FromStr for Profile {
    type Err = RecordsError;

    fn from_str(s: &str) -> RecordsResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dev" | "development" => Ok(Profile::Dev),
            "prod" | "production" => Ok(Profile::Prod),
            other => Err(RecordsError::validation(
                "MEDREC_PROFILE",
                format!("unknown profile '{other}' (expected 'dev' or 'prod')"),
            )),
        }
    }
}

/// Application configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct AppConfig {
    profile: Profile,
    bind_addr: String,
    database_url: Option<String>,
}

impl AppConfig {
    pub fn new(profile: Profile, bind_addr: String, database_url: Option<String>) -> Self {
        Self {
            profile,
            bind_addr,
            database_url,
        }
    }

    /// Resolve configuration from the process environment.
    ///
    /// # Environment Variables
    /// - `MEDREC_PROFILE`: `dev` or `prod` (default: `prod`)
    /// - `MEDREC_ADDR`: bind address (default: `0.0.0.0:8080`)
    /// - `DATABASE_URL`: Postgres connection string; optional in `dev`, where
    ///   its absence selects the in-memory store
    pub fn from_env() -> RecordsResult<Self> {
        let profile = match std::env::var("MEDREC_PROFILE") {
            Ok(value) => value.parse()?,
            Err(_) => Profile::Prod,
        };
        let bind_addr =
            std::env::var("MEDREC_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
        let database_url = std::env::var("DATABASE_URL")
            .ok()
            .filter(|v| !v.trim().is_empty());

        if database_url.is_none() && !profile.is_dev() {
            return Err(RecordsError::validation(
                "DATABASE_URL",
                "DATABASE_URL is required outside the dev profile",
            ));
        }

        Ok(Self::new(profile, bind_addr, database_url))
    }

    pub fn profile(&self) -> Profile {
        self.profile
    }

    pub fn bind_addr(&self) -> &str {
        &self.bind_addr
    }

    pub fn database_url(&self) -> Option<&str> {
        self.database_url.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_parses_aliases() {
        assert_eq!("dev".parse::<Profile>().unwrap(), Profile::Dev);
        assert_eq!("Production".parse::<Profile>().unwrap(), Profile::Prod);
        assert!("staging".parse::<Profile>().is_err());
    }
}
