//! 配置相关的基础定义

use crate::conventions::BuiltinTypePolicy;
use crate::errors::ConfigurationError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// 依赖校验选项
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationOptions {
    /// 是否把依赖图中的循环依赖视为错误
    pub detect_cycles: bool,
    /// 是否跳过泛型模板的构造函数检查
    pub skip_generic_templates: bool,
    /// 内置类型识别约定
    pub builtin: BuiltinTypePolicy,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            detect_cycles: false,
            skip_generic_templates: true,
            builtin: BuiltinTypePolicy::default(),
        }
    }
}

impl ValidationOptions {
    /// 启用循环依赖检测
    #[must_use]
    pub fn with_cycle_detection(mut self, enabled: bool) -> Self {
        self.detect_cycles = enabled;
        self
    }

    /// 设置内置类型识别约定
    #[must_use]
    pub fn with_builtin_policy(mut self, builtin: BuiltinTypePolicy) -> Self {
        self.builtin = builtin;
        self
    }

    /// 从配置节加载选项
    pub fn from_config(config: &config::Config, section: &str) -> Result<Self, ConfigurationError> {
        bind_section(config, section)
    }
}

/// 将配置节绑定到具体类型
///
/// 配置节不存在时返回类型的默认值。
pub fn bind_section<T>(config: &config::Config, section: &str) -> Result<T, ConfigurationError>
where
    T: DeserializeOwned + Default,
{
    match config.get::<T>(section) {
        Ok(value) => Ok(value),
        Err(config::ConfigError::NotFound(_)) => {
            debug!("配置节不存在，使用默认值: {}", section);
            Ok(T::default())
        }
        Err(e) => Err(e.into()),
    }
}
