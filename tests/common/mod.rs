// Not every test crate uses every helper.
#![allow(dead_code)]

pub mod fixtures;

/// Route `log` output into the test harness; safe to call repeatedly.
pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
