//! 服务注册集抽象接口
//!
//! 注册记录由外部容器持有，校验器只把它当作"某类型能否被解析"的只读依据。

use infrastructure_common::{DependencyResult, Lifetime, ServiceType};
use std::any::Any;
use std::sync::Arc;

/// 服务实现来源
#[derive(Clone)]
pub enum Implementation {
    /// 由容器按实现类型构造
    Type(ServiceType),
    /// 预先创建好的实例
    Instance {
        /// 实例的具体类型
        instance_type: ServiceType,
        /// 实例本身
        instance: Arc<dyn Any + Send + Sync>,
    },
}

impl Implementation {
    /// 实现类型或实例的具体类型
    pub const fn service_type(&self) -> &ServiceType {
        match self {
            Self::Type(implementation_type) => implementation_type,
            Self::Instance { instance_type, .. } => instance_type,
        }
    }

    /// 是否为预先创建的实例
    pub const fn is_instance(&self) -> bool {
        matches!(self, Self::Instance { .. })
    }
}

impl std::fmt::Debug for Implementation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Type(implementation_type) => f
                .debug_tuple("Type")
                .field(implementation_type)
                .finish(),
            Self::Instance { instance_type, .. } => f
                .debug_struct("Instance")
                .field("instance_type", instance_type)
                .field("instance", &"<instance>")
                .finish(),
        }
    }
}

/// 服务注册记录
#[derive(Debug, Clone)]
pub struct ServiceRegistration {
    /// 服务契约类型
    pub service_type: ServiceType,
    /// 实现来源
    pub implementation: Implementation,
    /// 生命周期
    pub lifetime: Lifetime,
}

impl ServiceRegistration {
    /// 创建按实现类型构造的注册记录
    pub const fn of_type(
        service_type: ServiceType,
        implementation_type: ServiceType,
        lifetime: Lifetime,
    ) -> Self {
        Self {
            service_type,
            implementation: Implementation::Type(implementation_type),
            lifetime,
        }
    }

    /// 创建实例注册记录（实例总是单例）
    pub fn of_instance<T>(service_type: ServiceType, instance: Arc<T>) -> Self
    where
        T: Any + Send + Sync,
    {
        Self {
            service_type,
            implementation: Implementation::Instance {
                instance_type: ServiceType::of::<T>(),
                instance,
            },
            lifetime: Lifetime::Singleton,
        }
    }

    /// 实现类型（实例注册时为实例的具体类型）
    pub const fn implementation_type(&self) -> &ServiceType {
        self.implementation.service_type()
    }

    /// 该记录是否能满足对指定类型的依赖
    pub fn provides(&self, service_type: &ServiceType) -> bool {
        self.service_type == *service_type || self.implementation_type() == service_type
    }
}

/// 服务注册集 trait
///
/// 提供注册记录的追加、替换和成员查询。
pub trait ServiceCollection: Send + Sync {
    /// 追加注册记录
    fn add(&mut self, registration: ServiceRegistration);

    /// 按注册顺序获取所有记录
    fn registrations(&self) -> &[ServiceRegistration];

    /// 替换指定位置的记录，返回被替换的记录
    fn replace(
        &mut self,
        index: usize,
        registration: ServiceRegistration,
    ) -> DependencyResult<ServiceRegistration>;

    /// 记录数量
    fn len(&self) -> usize {
        self.registrations().len()
    }

    /// 是否为空
    fn is_empty(&self) -> bool {
        self.registrations().is_empty()
    }

    /// 查找指定契约的所有记录及其位置
    fn registrations_for(&self, service_type: &ServiceType) -> Vec<(usize, &ServiceRegistration)> {
        self.registrations()
            .iter()
            .enumerate()
            .filter(|(_, registration)| registration.service_type == *service_type)
            .collect()
    }

    /// 检查类型是否已注册（契约类型、实现类型或实例类型）
    fn is_registered(&self, service_type: &ServiceType) -> bool {
        self.registrations()
            .iter()
            .any(|registration| registration.provides(service_type))
    }
}
