//! Property-based tests for scope lifecycle guarantees

mod lifecycle;
