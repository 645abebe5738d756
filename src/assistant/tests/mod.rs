//! Unit tests for the assistant bounded context.

mod domain_tests;
