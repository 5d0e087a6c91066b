//! Integration tests for trickplay

mod helpers;

mod cli_test;
mod controller_test;
mod script_test;
