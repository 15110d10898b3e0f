//! Unit tests for the provider module.

mod groq_wire_tests;
