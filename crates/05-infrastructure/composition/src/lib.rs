//! # 基础设施组合层
//!
//! 这个 crate 把类型描述符目录、服务注册集、依赖图和依赖校验器组合起来，
//! 提供面向应用的注册入口。
//!
//! ## 主要功能
//!
//! - **显式注册**: 按契约和实现类型注册，检查实现是否声明了契约
//! - **模块扫描**: 按模块路径批量注册目录中的类型
//! - **装饰**: 替换契约的唯一注册
//! - **配置加载**: 从 JSON 或 `config` 配置节读取注册记录
//! - **依赖校验**: 在运行时解析之前一次性报告所有未解析的依赖
//!
//! ## 基本使用
//!
//! ```rust
//! use di_impl::TypeCatalog;
//! use infrastructure_common::{ConstructorDescriptor, Lifetime, TypeDescriptor};
//! use infrastructure_composition::ServiceRegistrar;
//!
//! trait Clock: Send + Sync {}
//! struct SystemClock;
//! struct Scheduler;
//!
//! let catalog = TypeCatalog::new()
//!     .with(TypeDescriptor::of::<SystemClock>().implements::<dyn Clock>())
//!     .with(
//!         TypeDescriptor::of::<Scheduler>()
//!             .with_constructor(ConstructorDescriptor::new("new").with_parameter::<dyn Clock>()),
//!     );
//!
//! let mut registrar = ServiceRegistrar::new(&catalog).with_graph_tracking();
//! registrar.register_type::<dyn Clock, SystemClock>(Lifetime::Singleton)?;
//! registrar.register_type::<Scheduler, Scheduler>(Lifetime::Transient)?;
//! registrar.validate()?;
//! # Ok::<(), infrastructure_common::DependencyError>(())
//! ```

pub mod component_scanner;
pub mod config_sources;
pub mod options;
pub mod registrar;

// 重新导出主要类型
pub use component_scanner::ModuleScanner;
pub use config_sources::{ServiceConfigRecord, ServiceConfiguration};
pub use options::{RegistrationOptions, RegistrationStrategy};
pub use registrar::ServiceRegistrar;

// 重新导出错误类型
pub use infrastructure_common::{ConfigurationError, DependencyError};
