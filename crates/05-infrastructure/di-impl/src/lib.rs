//! # 依赖注入具体实现
//!
//! 提供依赖关系图、注册类型到依赖图的转换、依赖校验器，
//! 以及内存中的类型描述符目录和服务注册集实现。
//!
//! ## 使用流程
//!
//! 1. 在 [`TypeCatalog`] 中登记类型描述符
//! 2. 向 [`ServiceCollectionImpl`] 添加注册记录，同时用 [`DependencyGraphBuilder`] 记录依赖边
//! 3. 使用 [`DependencyValidatorImpl`] 一次性检查所有未解析的依赖

pub mod catalog;
pub mod collection;
pub mod graph;
pub mod graph_builder;
pub mod validator;

pub use catalog::TypeCatalog;
pub use collection::ServiceCollectionImpl;
pub use graph::{format_cycles, DependencyGraph, DependencyNode, NodeId};
pub use graph_builder::DependencyGraphBuilder;
pub use validator::DependencyValidatorImpl;
