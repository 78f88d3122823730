//! Integration test modules.

mod remote_session_test;
