//! 注册选项

use infrastructure_common::{bind_section, ConfigurationError, Lifetime, ValidationOptions};
use serde::{Deserialize, Serialize};

/// 批量注册时实现类型以哪些契约注册
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationStrategy {
    /// 只以自身类型注册
    AsSelf,
    /// 以声明的契约注册，没有契约时以自身注册
    #[default]
    AsImplementedInterfaces,
    /// 同时以自身和声明的契约注册
    AsSelfAndInterfaces,
}

/// 服务注册选项
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrationOptions {
    /// 批量注册策略
    pub strategy: RegistrationStrategy,
    /// 描述符和配置记录都没有指定生命周期时使用的生命周期
    pub default_lifetime: Lifetime,
    /// 批量注册时是否包含泛型模板
    pub include_generic_templates: bool,
    /// 是否在注册时构建依赖图
    pub track_dependency_graph: bool,
    /// 依赖校验选项
    pub validation: ValidationOptions,
}

impl RegistrationOptions {
    /// 从配置节加载选项
    pub fn from_config(config: &config::Config, section: &str) -> Result<Self, ConfigurationError> {
        bind_section(config, section)
    }

    /// 设置批量注册策略
    #[must_use]
    pub fn with_strategy(mut self, strategy: RegistrationStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// 设置默认生命周期
    #[must_use]
    pub fn with_default_lifetime(mut self, lifetime: Lifetime) -> Self {
        self.default_lifetime = lifetime;
        self
    }
}
