pub mod rd;
