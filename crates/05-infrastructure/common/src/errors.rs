//! 错误类型定义

use thiserror::Error;

/// 配置错误类型
///
/// 覆盖空注册集、未解析依赖、无效配置记录、未知生命周期以及契约与实现不兼容等情况。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("服务注册集为空，无法校验依赖")]
    EmptyRegistrations,

    #[error("存在未解析的依赖类型: {}", .type_names.join(", "))]
    UnresolvedDependencies { type_names: Vec<String> },

    #[error("配置记录无效: 第 {index} 条, 字段 {field}, 值 {value}, 原因: {reason}")]
    InvalidRecord {
        index: usize,
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("未知的生命周期: {value}")]
    UnknownLifetime { value: String },

    #[error("实现类型 {implementation_type} 未声明服务契约 {service_type}")]
    IncompatibleImplementation {
        service_type: String,
        implementation_type: String,
    },

    #[error("检测到循环依赖: {}", .cycles.join("; "))]
    CircularDependency { cycles: Vec<String> },

    #[error("配置解析失败: {message}")]
    Parse { message: String },
}

impl ConfigurationError {
    /// 创建配置记录无效错误
    pub fn invalid_record(
        index: usize,
        field: &'static str,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidRecord {
            index,
            field,
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// 获取未解析的类型名称（仅对未解析依赖错误有值）
    pub fn unresolved_type_names(&self) -> &[String] {
        match self {
            Self::UnresolvedDependencies { type_names } => type_names,
            _ => &[],
        }
    }
}

impl From<serde_json::Error> for ConfigurationError {
    fn from(error: serde_json::Error) -> Self {
        Self::Parse {
            message: error.to_string(),
        }
    }
}

impl From<config::ConfigError> for ConfigurationError {
    fn from(error: config::ConfigError) -> Self {
        Self::Parse {
            message: error.to_string(),
        }
    }
}

/// 依赖注入错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DependencyError {
    #[error("参数缺失或未初始化: {argument}")]
    InvalidArgument { argument: &'static str },

    #[error("配置错误: {source}")]
    Configuration {
        #[from]
        source: ConfigurationError,
    },

    #[error("服务 {service_type} 需要恰好一个注册, 实际找到 {found} 个")]
    NotFound { service_type: String, found: usize },
}

impl DependencyError {
    /// 创建参数无效错误
    pub const fn invalid_argument(argument: &'static str) -> Self {
        Self::InvalidArgument { argument }
    }

    /// 是否为参数无效错误
    pub const fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument { .. })
    }

    /// 是否为配置错误
    pub const fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }

    /// 是否为查找失败错误
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// 获取内部的配置错误
    pub const fn as_configuration(&self) -> Option<&ConfigurationError> {
        match self {
            Self::Configuration { source } => Some(source),
            _ => None,
        }
    }
}

/// 结果类型别名
pub type ConfigurationResult<T> = Result<T, ConfigurationError>;
pub type DependencyResult<T> = Result<T, DependencyError>;
