//! CLI integration tests for artkeep.


mod clean_tests;
mod prereq_tests;
mod stage_tests;
