//! Unit tests for the engine services over the in-memory adapters.

mod marketplace_tests;
mod support;
