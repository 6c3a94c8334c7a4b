pub mod dev;
pub mod lexer;
