//! 依赖校验抽象接口
//!
//! 校验器读取注册集和（可选的）依赖图，在运行时解析之前报告无法满足的依赖。

use crate::registry::ServiceCollection;
use infrastructure_common::{DependencyResult, ServiceType};

/// 依赖图只读视图
pub trait DependencyGraphView {
    /// 所有依赖边（依赖者, 被依赖者）
    fn edges(&self) -> Vec<(ServiceType, ServiceType)>;

    /// 所有循环依赖，每个循环按路径顺序给出
    fn cycles(&self) -> Vec<Vec<ServiceType>>;
}

/// 依赖校验器 trait
pub trait DependencyValidator {
    /// 校验注册集
    ///
    /// 注册集为空时立即失败；其余问题全部收集后一次性报告。
    fn validate(
        &self,
        collection: &dyn ServiceCollection,
        graph: Option<&dyn DependencyGraphView>,
    ) -> DependencyResult<()>;
}
