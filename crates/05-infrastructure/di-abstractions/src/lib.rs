//! # Dependency Injection Abstractions
//!
//! 依赖注入抽象层，定义注册记录、类型内省和依赖校验的核心接口。
//!
//! ## 核心接口
//!
//! - [`ServiceCollection`] - 服务注册集接口
//! - [`TypeIntrospector`] - 类型内省接口
//! - [`ComponentScanner`] - 组件扫描器接口
//! - [`DependencyValidator`] - 依赖校验器接口

pub mod container;
pub mod introspection;
pub mod registry;
pub mod scanner;

pub use container::*;
pub use introspection::*;
pub use registry::*;
pub use scanner::*;
