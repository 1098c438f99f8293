//! Shared helpers for the bridge integration tests.

#![allow(dead_code)]

pub mod mock_upstream;
