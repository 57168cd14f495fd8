//! Test fixtures shared by unit and end-to-end tests.

pub mod llm;
