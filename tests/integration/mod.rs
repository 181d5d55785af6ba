//! Integration tests for Orgdesk
//!
//! These tests verify the behavior of the API endpoints with a real
//! (temp-file) database and all middleware.

mod organization_tests;
