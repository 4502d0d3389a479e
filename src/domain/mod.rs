pub mod parsing;
pub mod place;
pub mod review;
pub mod selector;
