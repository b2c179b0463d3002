//! Common types, traits, and error definitions for dp_poly_path
//!
//! This module provides the geometry primitives and the collaborator
//! interfaces consumed by the trajectory cost evaluator.

pub mod types;
pub mod traits;
pub mod error;
pub mod box2d;

pub use types::*;
pub use traits::*;
pub use error::*;
pub use box2d::Box2d;
