// Path Planning algorithms module

pub mod dp_poly_path;

pub use dp_poly_path::*;
