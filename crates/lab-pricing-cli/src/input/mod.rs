pub mod assumptions;
pub mod file;
pub mod stdin;
