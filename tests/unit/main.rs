//! Unit test modules.

mod announcer_test;
mod navigation_test;
