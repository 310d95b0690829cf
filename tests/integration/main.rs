//! Integration tests for covenant-ratchet

mod config_test;
mod e2e_test;
