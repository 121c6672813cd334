pub mod exclude;
pub mod loader;
pub mod scanner;
pub mod tree;
