//! # Infrastructure Common
//!
//! 这个 crate 提供了 Lorn ADSP 平台服务注册与依赖校验所需的公共类型。
//!
//! ## 核心类型
//!
//! - [`ServiceType`] - 服务类型句柄（契约或实现）
//! - [`TypeDescriptor`] - 显式类型描述符（构造函数、契约、泛型模板标记）
//! - [`Lifetime`] - 组件生命周期
//! - [`BuiltinTypePolicy`] - 内置类型识别约定
//! - [`DependencyError`] / [`ConfigurationError`] - 错误类型
//!
//! ## 设计原则
//!
//! - 类型结构通过启动时构建的描述符表获得，不依赖运行时反射
//! - 不使用进程级全局状态，所有注册表都按实例隔离

pub mod configuration;
pub mod conventions;
pub mod errors;
pub mod lifecycle;
pub mod metadata;

pub use configuration::*;
pub use conventions::*;
pub use errors::*;
pub use lifecycle::*;
pub use metadata::*;
