//! 类型内省抽象接口
//!
//! 以显式描述符表代替运行时反射：给定类型句柄，查询其构造函数、实现的契约以及是否为泛型模板。

use infrastructure_common::{ServiceType, TypeDescriptor};

/// 类型内省 trait
pub trait TypeIntrospector: Send + Sync {
    /// 获取类型描述符
    fn describe(&self, service_type: &ServiceType) -> Option<&TypeDescriptor>;

    /// 按名称解析类型句柄（完整名称、简短名称或别名）
    fn resolve_name(&self, name: &str) -> Option<ServiceType>;

    /// 检查类型是否有描述符
    fn is_described(&self, service_type: &ServiceType) -> bool {
        self.describe(service_type).is_some()
    }
}
