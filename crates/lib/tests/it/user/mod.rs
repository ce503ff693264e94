//! User module integration tests

mod authentication_tests;
mod avatar_tests;
mod rehydration_tests;
