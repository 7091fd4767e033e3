pub mod format;
pub mod hhmm;
pub mod test_utils;
