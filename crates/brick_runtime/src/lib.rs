//! Brick Runtime
//!
//! The breakout demo built on the engine, plus the glue the `brick` binary
//! needs to run it.

pub mod breakout;
pub mod escape;

pub use breakout::{build_scene, Field};
pub use escape::EscapeQuits;
