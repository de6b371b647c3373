pub mod browser;
pub mod results;
pub mod summary;
pub mod text_input;
