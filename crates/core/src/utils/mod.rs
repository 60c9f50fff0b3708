pub mod money;
pub mod pagination;
pub mod time_utils;
