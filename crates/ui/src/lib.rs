//! Render-ready projections of the learning client's state.
//!
//! Nothing here talks to the backend; every function maps borrowed state to plain
//! view-model values.

pub mod vm;
