//! StackFlow Core
//!
//! stack.kdl の読み込みと、踏み台ホスト・ALB・固定サイズ ASG からなる
//! リソースグラフの組み立てを行います。

pub mod builder;
pub mod discovery;
pub mod error;
pub mod loader;
pub mod model;
pub mod parser;

pub use builder::{Topology, TopologyBuilder};
pub use discovery::{
    DiscoveredFiles, discover_files, discover_files_for, find_project_root,
    find_project_root_from, project_root_of,
};
pub use error::{Result, StackError};
pub use loader::{LoadedProject, load_project_from_file, load_project_from_root};
pub use model::*;
pub use parser::{parse_kdl_file, parse_kdl_string};
