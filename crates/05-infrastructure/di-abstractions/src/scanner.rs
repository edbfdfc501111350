//! 组件扫描器抽象接口
//!
//! 扫描器只负责枚举候选实现类型，注册决策由注册器完成。

use infrastructure_common::ServiceType;

/// 组件扫描器 trait
pub trait ComponentScanner: Send + Sync {
    /// 扫描目标中的候选实现类型
    fn scan(&self, target: &ScanTarget) -> Vec<ServiceType>;

    /// 获取扫描器名称
    fn name(&self) -> &str;

    /// 检查是否支持指定的扫描目标
    fn supports(&self, target: &ScanTarget) -> bool;
}

/// 扫描目标类型
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanTarget {
    /// 扫描指定的模块路径（包含子模块）
    Module(String),
    /// 显式给出的类型列表
    Types(Vec<ServiceType>),
}

impl ScanTarget {
    /// 创建模块扫描目标
    pub fn module(path: impl Into<String>) -> Self {
        Self::Module(path.into())
    }

    /// 获取扫描目标的字符串表示
    pub fn describe(&self) -> String {
        match self {
            Self::Module(path) => path.clone(),
            Self::Types(types) => format!("{} 个显式类型", types.len()),
        }
    }
}

/// 检查类型是否位于模块路径之下
pub fn is_in_module(service_type: &ServiceType, module: &str) -> bool {
    let module_path = service_type.module_path();
    module_path == module
        || module_path
            .strip_prefix(module)
            .is_some_and(|rest| rest.starts_with("::"))
}
