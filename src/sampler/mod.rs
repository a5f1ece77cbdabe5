pub mod controller;
pub mod loop_worker;

pub use controller::SamplerController;
pub use loop_worker::{sampler_loop, SamplerDeps};
