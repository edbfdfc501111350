//! 服务注册配置源
//!
//! 配置记录只包含类型名称和生命周期字符串，由注册器负责解析成类型句柄。

use infrastructure_common::{bind_section, ConfigurationError};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// 单条服务注册配置记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfigRecord {
    /// 服务契约类型名称
    #[serde(rename = "serviceType", alias = "servicetype", alias = "service_type")]
    pub service_type: String,
    /// 实现类型名称
    #[serde(
        rename = "implementationType",
        alias = "implementationtype",
        alias = "implementation_type"
    )]
    pub implementation_type: String,
    /// 生命周期名称，缺省时使用描述符或默认生命周期
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lifetime: Option<String>,
}

impl ServiceConfigRecord {
    /// 创建配置记录
    pub fn new(
        service_type: impl Into<String>,
        implementation_type: impl Into<String>,
        lifetime: Option<&str>,
    ) -> Self {
        Self {
            service_type: service_type.into(),
            implementation_type: implementation_type.into(),
            lifetime: lifetime.map(ToString::to_string),
        }
    }
}

/// 服务注册配置
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfiguration {
    /// 注册记录（按声明顺序）
    pub services: Vec<ServiceConfigRecord>,
}

impl ServiceConfiguration {
    /// 从 JSON 文本解析
    pub fn from_json_str(json: &str) -> Result<Self, ConfigurationError> {
        let configuration: Self = serde_json::from_str(json)?;
        debug!("从 JSON 解析到 {} 条服务注册配置", configuration.services.len());
        Ok(configuration)
    }

    /// 从 JSON 值解析
    pub fn from_value(value: serde_json::Value) -> Result<Self, ConfigurationError> {
        let configuration: Self = serde_json::from_value(value)?;
        debug!("从 JSON 值解析到 {} 条服务注册配置", configuration.services.len());
        Ok(configuration)
    }

    /// 从配置节解析，配置节不存在时返回空配置
    pub fn from_config(config: &config::Config, section: &str) -> Result<Self, ConfigurationError> {
        let configuration: Self = bind_section(config, section)?;
        debug!(
            "从配置节 {} 解析到 {} 条服务注册配置",
            section,
            configuration.services.len()
        );
        Ok(configuration)
    }

    /// 记录数量
    pub fn len(&self) -> usize {
        self.services.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}
