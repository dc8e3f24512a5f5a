//! End-to-end tests for parley live under `tests/`
