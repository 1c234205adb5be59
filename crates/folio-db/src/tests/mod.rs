//! Database integration tests.
//!
//! These run against the PostgreSQL instance configured via `DATABASE_URL`
//! (see `test_fixtures` for the default). Each test creates and drops its
//! own schema.
