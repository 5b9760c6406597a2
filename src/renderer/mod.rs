//! WebGPU rendering module
//!
//! The simulation publishes a [`RenderFrame`] each tick; `shapes` turns it
//! into triangles and `pipeline` draws them.

pub mod frame;
pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use frame::RenderFrame;
pub use pipeline::RenderState;
