//! Integration tests driving the built binary

#![cfg(unix)]

mod helpers;
mod test_doctor;
mod test_plan;
mod test_verify;
