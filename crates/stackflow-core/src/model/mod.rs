//! モデル定義
//!
//! StackFlowで使用されるデータモデルを定義します。
//! 各モデルは機能ごとにモジュールに分離されています。

mod compute;
mod graph;
mod image;
mod load_balancer;
mod network;
mod output;
mod rule;
mod topology;

// Re-exports
pub use compute::*;
pub use graph::*;
pub use image::*;
pub use load_balancer::*;
pub use network::*;
pub use output::*;
pub use rule::*;
pub use topology::*;
