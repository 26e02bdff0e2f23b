//! Property-test run profile parsing for CI and local overrides.
//!
//! Every property suite in the workspace reads its case count and fork mode
//! through this module, so one environment variable tunes them all.

use std::env;

/// Environment variable controlling proptest case counts.
pub const PROGTEST_CASES_ENV_KEY: &str = "PROGTEST_CASES";
/// Environment variable controlling proptest process forking.
pub const AGGLO_PBT_FORK_ENV_KEY: &str = "AGGLO_PBT_FORK";

/// Runtime profile for property-test execution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProptestRunProfile {
    cases: u32,
    fork: bool,
}

impl ProptestRunProfile {
    /// Load a profile from environment variables with provided defaults.
    ///
    /// Invalid overrides are logged at `warn` and replaced by the defaults.
    ///
    /// # Examples
    ///
    /// ```
    /// use agglo_test_support::ci::property_test_profile::ProptestRunProfile;
    ///
    /// let profile = ProptestRunProfile::load(64, false);
    /// assert!(profile.cases() > 0);
    /// ```
    #[must_use]
    pub fn load(default_cases: u32, default_fork: bool) -> Self {
        Self {
            cases: override_or(PROGTEST_CASES_ENV_KEY, default_cases, parse_cases),
            fork: override_or(AGGLO_PBT_FORK_ENV_KEY, default_fork, parse_bool),
        }
    }

    /// Number of cases to run per property.
    #[must_use]
    pub fn cases(&self) -> u32 {
        self.cases
    }

    /// Whether to run proptest cases in forked subprocesses.
    #[must_use]
    pub fn fork(&self) -> bool {
        self.fork
    }
}

fn override_or<T, F>(key: &'static str, default: T, parser: F) -> T
where
    F: Fn(&str) -> Result<T, String>,
{
    let Ok(raw) = env::var(key) else {
        return default;
    };
    parser(&raw).unwrap_or_else(|reason| {
        tracing::warn!(
            env = key,
            raw = %raw,
            reason = %reason,
            "invalid property-test profile override; using default",
        );
        default
    })
}

fn parse_cases(raw: &str) -> Result<u32, String> {
    match raw.trim().parse::<u32>() {
        Ok(0) => Err("cases must be > 0".to_owned()),
        Ok(cases) => Ok(cases),
        Err(error) => Err(format!("parse error: {error}")),
    }
}

fn parse_bool(raw: &str) -> Result<bool, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err("expected one of: true/false/1/0/yes/no/on/off".to_owned()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::sync::{Mutex, MutexGuard};

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    /// Holds the environment lock and restores both variables on drop.
    struct Env {
        _lock: MutexGuard<'static, ()>,
        saved: [(&'static str, Option<String>); 2],
    }

    impl Env {
        fn with(cases: Option<&str>, fork: Option<&str>) -> Self {
            let lock = ENV_LOCK.lock().expect("env lock");
            let saved = [
                (PROGTEST_CASES_ENV_KEY, env::var(PROGTEST_CASES_ENV_KEY).ok()),
                (AGGLO_PBT_FORK_ENV_KEY, env::var(AGGLO_PBT_FORK_ENV_KEY).ok()),
            ];
            for (key, value) in [(PROGTEST_CASES_ENV_KEY, cases), (AGGLO_PBT_FORK_ENV_KEY, fork)] {
                // SAFETY: tests serialise environment access with ENV_LOCK.
                unsafe {
                    match value {
                        Some(value) => env::set_var(key, value),
                        None => env::remove_var(key),
                    }
                }
            }
            Self { _lock: lock, saved }
        }
    }

    impl Drop for Env {
        fn drop(&mut self) {
            for (key, original) in &self.saved {
                // SAFETY: the lock is still held while restoring.
                unsafe {
                    match original {
                        Some(value) => env::set_var(key, value),
                        None => env::remove_var(key),
                    }
                }
            }
        }
    }

    #[test]
    fn load_defaults_when_no_overrides_exist() {
        let _env = Env::with(None, None);
        let profile = ProptestRunProfile::load(64, false);
        assert_eq!(profile, ProptestRunProfile { cases: 64, fork: false });
    }

    #[rstest]
    #[case::one("1", 64, 1)]
    #[case::padded(" 250 ", 64, 250)]
    #[case::large("25000", 64, 25_000)]
    #[case::zero("0", 64, 64)]
    #[case::negative("-1", 64, 64)]
    #[case::word("abc", 32, 32)]
    fn load_reads_case_overrides(#[case] raw: &str, #[case] default: u32, #[case] expected: u32) {
        let _env = Env::with(Some(raw), None);
        assert_eq!(ProptestRunProfile::load(default, false).cases(), expected);
    }

    #[rstest]
    #[case::true_word("true", false, true)]
    #[case::upper("TRUE", false, true)]
    #[case::digit_on("1", false, true)]
    #[case::yes("yes", false, true)]
    #[case::on("on", false, true)]
    #[case::false_word("false", true, false)]
    #[case::digit_off("0", true, false)]
    #[case::off("off", true, false)]
    #[case::empty("", true, true)]
    #[case::maybe("maybe", true, true)]
    #[case::two("2", false, false)]
    fn load_reads_fork_overrides(#[case] raw: &str, #[case] default: bool, #[case] expected: bool) {
        let _env = Env::with(None, Some(raw));
        assert_eq!(ProptestRunProfile::load(64, default).fork(), expected);
    }
}
