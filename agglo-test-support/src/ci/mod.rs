//! Environment-driven knobs shared by the CI test suites.

pub mod property_test_profile;
