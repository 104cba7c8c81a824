//! Doppel HTTP server library (router, handlers, auth) shared by the binary and tests.

pub mod gateway;
