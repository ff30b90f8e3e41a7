//! Iris flower classifier: load labeled measurements, train a linear
//! multi-class model with stochastic dual coordinate ascent, predict the
//! class of one sample typed at the console.

pub mod app;
pub mod color;
pub mod console;
pub mod data;
pub mod encoding;
pub mod error;
pub mod pipeline;
pub mod sdca;
