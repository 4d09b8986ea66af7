//! HTTP-level integration tests against the assembled router.

mod auth_test;
mod health_test;
mod helpers;
