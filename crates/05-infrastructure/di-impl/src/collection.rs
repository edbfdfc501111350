//! 服务注册集实现

use dashmap::DashMap;
use di_abstractions::{ServiceCollection, ServiceRegistration};
use infrastructure_common::{DependencyError, DependencyResult, ServiceType};
use tracing::debug;

/// 服务注册集
///
/// 成员查询结果按类型缓存，任何修改都会清空缓存。
#[derive(Debug, Default)]
pub struct ServiceCollectionImpl {
    registrations: Vec<ServiceRegistration>,
    membership: DashMap<ServiceType, bool>,
}

impl ServiceCollectionImpl {
    /// 创建空注册集
    pub fn new() -> Self {
        Self::default()
    }

    /// 当前缓存的成员查询数量
    pub fn cached_lookups(&self) -> usize {
        self.membership.len()
    }
}

impl ServiceCollection for ServiceCollectionImpl {
    fn add(&mut self, registration: ServiceRegistration) {
        debug!(
            "添加服务注册: {} -> {} ({})",
            registration.service_type,
            registration.implementation_type(),
            registration.lifetime
        );
        self.registrations.push(registration);
        self.membership.clear();
    }

    fn registrations(&self) -> &[ServiceRegistration] {
        &self.registrations
    }

    fn replace(
        &mut self,
        index: usize,
        registration: ServiceRegistration,
    ) -> DependencyResult<ServiceRegistration> {
        let slot = self
            .registrations
            .get_mut(index)
            .ok_or(DependencyError::invalid_argument("index"))?;
        let previous = std::mem::replace(slot, registration);
        self.membership.clear();
        Ok(previous)
    }

    fn is_registered(&self, service_type: &ServiceType) -> bool {
        if let Some(cached) = self.membership.get(service_type).map(|entry| *entry) {
            return cached;
        }

        let registered = self
            .registrations
            .iter()
            .any(|registration| registration.provides(service_type));
        self.membership.insert(*service_type, registered);
        registered
    }
}
