pub mod format;
pub mod retrieve;
pub mod schemes;
