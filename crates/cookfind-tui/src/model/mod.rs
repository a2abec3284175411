pub mod results;
pub mod search;
