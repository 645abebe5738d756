//! Unit tests for the pairing bounded context.
