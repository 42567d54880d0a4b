//! Property-Based Test Generators
//!
//! Provides proptest strategies for generating random test data
//! that satisfies domain validation rules.

use chrono::{DateTime, TimeZone, Utc};
use proptest::prelude::*;

use core_kernel::{EventId, UserId};
use domain_auth::Credentials;
use domain_events::EventFields;

/// Strategy for syntactically valid email addresses
pub fn email_strategy() -> impl Strategy<Value = String> {
    ("[a-z][a-z0-9]{0,11}", "[a-z]{2,10}", prop_oneof![Just("com"), Just("org"), Just("net")])
        .prop_map(|(local, domain, tld)| format!("{}@{}.{}", local, domain, tld))
}

/// Strategy for passwords that meet the minimum length
pub fn password_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z0-9!@#%^&*]{6,24}"
}

/// Strategy for valid credentials
pub fn credentials_strategy() -> impl Strategy<Value = Credentials> {
    (email_strategy(), password_strategy())
        .prop_map(|(email, password)| Credentials::new(email, password))
}

/// Strategy for store-assigned user identifiers
pub fn user_id_strategy() -> impl Strategy<Value = UserId> {
    (1i64..1_000_000_000i64).prop_map(UserId::new)
}

/// Strategy for store-assigned event identifiers
pub fn event_id_strategy() -> impl Strategy<Value = EventId> {
    (1i64..1_000_000_000i64).prop_map(EventId::new)
}

/// Strategy for scheduled times between 2025 and 2040, whole seconds
pub fn date_time_strategy() -> impl Strategy<Value = DateTime<Utc>> {
    (1_735_689_600i64..2_208_988_800i64)
        .prop_map(|secs| Utc.timestamp_opt(secs, 0).single().unwrap_or_default())
}

/// Strategy for valid event fields
pub fn event_fields_strategy() -> impl Strategy<Value = EventFields> {
    (
        "[A-Za-z][A-Za-z0-9 ]{0,39}",
        "[A-Za-z][A-Za-z0-9 .,]{0,99}",
        "[A-Za-z][A-Za-z ]{0,29}",
        date_time_strategy(),
    )
        .prop_map(|(name, description, location, date_time)| {
            EventFields::new(name.trim(), description.trim(), location.trim(), date_time)
        })
}
