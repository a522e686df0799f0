//! Mock implementations of core ports for testing.

use mockall::{mock, predicate::eq, Sequence};

use crate::config::keys;
use crate::ports::{PreferenceValue, PreferencesPort};

mock! {
    pub Preferences {}

    impl PreferencesPort for Preferences {
        fn get_string(&self, key: &str) -> anyhow::Result<String>;
        fn get_bool(&self, key: &str) -> anyhow::Result<bool>;
        fn set_string(&self, key: &str, value: &str) -> anyhow::Result<()>;
        fn set_bool(&self, key: &str, value: bool) -> anyhow::Result<()>;
    }
}

#[test]
fn default_commit_writes_keys_in_order() {
    let mut prefs = MockPreferences::new();
    let mut seq = Sequence::new();
    prefs
        .expect_set_string()
        .with(eq(keys::PASSWORD), eq("pw"))
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _| Ok(()));
    prefs
        .expect_set_bool()
        .with(eq(keys::PAYMENT_ENABLED), eq(true))
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _| Ok(()));

    prefs
        .commit(&[
            (keys::PASSWORD, PreferenceValue::String("pw".to_string())),
            (keys::PAYMENT_ENABLED, PreferenceValue::Bool(true)),
        ])
        .unwrap();
}

#[test]
fn default_commit_stops_at_first_failure() {
    let mut prefs = MockPreferences::new();
    prefs
        .expect_set_string()
        .times(1)
        .returning(|_, _| Err(anyhow::anyhow!("disk full")));
    prefs.expect_set_bool().never();

    let err = prefs
        .commit(&[
            (keys::NAT_ADDRESS, PreferenceValue::String(String::new())),
            (keys::PAYMENT_ENABLED, PreferenceValue::Bool(false)),
        ])
        .unwrap_err();
    assert!(err.to_string().contains("disk full"));
}
