//! 基础设施层
//!
//! 持有稀缺资源（Page），只暴露能力

pub mod engine;

pub use engine::Engine;
