//! Pre-built Test Fixtures
//!
//! Provides ready-to-use test data for users, events and tokens.
//! These fixtures are consistent and predictable for unit tests.

use chrono::{DateTime, TimeZone, Utc};
use fake::faker::internet::en::{Password, SafeEmail};
use fake::Fake;

use domain_auth::{Credentials, PasswordHasher, TokenConfig, TokenService};
use domain_events::EventFields;

/// Signing secret used by every test token service
pub const TEST_JWT_SECRET: &str = "test-signing-secret-not-for-production";

/// Fixture for credentials
pub struct UserFixtures;

impl UserFixtures {
    /// The first test user
    pub fn alice() -> Credentials {
        Credentials::new("a@x.com", "secret1")
    }

    /// A second user who owns nothing
    pub fn bob() -> Credentials {
        Credentials::new("b@x.com", "secret2")
    }

    /// Credentials with a generated email and password
    pub fn random() -> Credentials {
        let email: String = SafeEmail().fake();
        let password: String = Password(8..20).fake();
        Credentials::new(email, password)
    }
}

/// Fixture for event fields
pub struct EventFixtures;

impl EventFixtures {
    /// Scheduled time of the launch event (Jan 15, 2030 18:00 UTC)
    pub fn launch_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2030, 1, 15, 18, 0, 0).unwrap()
    }

    /// The "Launch" event
    pub fn launch() -> EventFields {
        EventFields::new("Launch", "Product launch party", "Berlin", Self::launch_time())
    }

    /// A second event for multi-event tests
    pub fn meetup() -> EventFields {
        EventFields::new(
            "Rust Meetup",
            "Monthly community meetup",
            "Amsterdam",
            Utc.with_ymd_and_hms(2030, 3, 2, 19, 30, 0).unwrap(),
        )
    }
}

/// Fixture for identity components
pub struct AuthFixtures;

impl AuthFixtures {
    /// Hasher at bcrypt's minimum cost so tests stay fast
    pub fn fast_hasher() -> PasswordHasher {
        PasswordHasher::new(4)
    }

    /// Token configuration with the test secret
    pub fn token_config() -> TokenConfig {
        TokenConfig::new(TEST_JWT_SECRET)
    }

    /// Token service signing with the test secret
    pub fn token_service() -> TokenService {
        TokenService::new(Self::token_config())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_fixture_credentials_are_valid() {
        assert!(UserFixtures::alice().validate().is_ok());
        assert!(UserFixtures::bob().validate().is_ok());
        assert!(UserFixtures::random().validate().is_ok());
    }
}
