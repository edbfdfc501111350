//! 服务注册器
//!
//! 把显式注册、模块扫描、装饰和配置记录统一转换成注册集中的记录，
//! 并在启用依赖图跟踪时同步构建依赖图。

use crate::component_scanner::ModuleScanner;
use crate::config_sources::ServiceConfiguration;
use crate::options::{RegistrationOptions, RegistrationStrategy};
use di_abstractions::{
    ComponentScanner, DependencyGraphView, DependencyValidator, ScanTarget, ServiceCollection,
    ServiceRegistration, TypeIntrospector,
};
use di_impl::{
    DependencyGraph, DependencyGraphBuilder, DependencyValidatorImpl, ServiceCollectionImpl,
    TypeCatalog,
};
use infrastructure_common::{
    ConfigurationError, DependencyError, DependencyResult, Lifetime, ServiceType,
};
use std::any::Any;
use std::sync::Arc;
use tracing::{debug, info};

/// 服务注册器
pub struct ServiceRegistrar<'a, C: ServiceCollection = ServiceCollectionImpl> {
    catalog: &'a TypeCatalog,
    collection: C,
    graph: Option<DependencyGraph>,
    options: RegistrationOptions,
}

impl<'a> ServiceRegistrar<'a> {
    /// 使用新的空注册集创建注册器
    pub fn new(catalog: &'a TypeCatalog) -> Self {
        Self::with_collection(catalog, ServiceCollectionImpl::new())
    }
}

impl<'a, C: ServiceCollection> ServiceRegistrar<'a, C> {
    /// 使用已有的注册集创建注册器
    pub fn with_collection(catalog: &'a TypeCatalog, collection: C) -> Self {
        Self {
            catalog,
            collection,
            graph: None,
            options: RegistrationOptions::default(),
        }
    }

    /// 设置注册选项
    ///
    /// 依赖图跟踪跟随 `track_dependency_graph`：关闭时丢弃已构建的依赖图。
    #[must_use]
    pub fn with_options(mut self, options: RegistrationOptions) -> Self {
        self.graph = if options.track_dependency_graph {
            self.graph.take().or_else(|| Some(DependencyGraph::new()))
        } else {
            None
        };
        self.options = options;
        self
    }

    /// 启用依赖图跟踪
    ///
    /// 只影响启用之后的注册。
    #[must_use]
    pub fn with_graph_tracking(mut self) -> Self {
        self.options.track_dependency_graph = true;
        if self.graph.is_none() {
            self.graph = Some(DependencyGraph::new());
        }
        self
    }

    /// 注册选项
    pub const fn options(&self) -> &RegistrationOptions {
        &self.options
    }

    /// 注册集
    pub const fn collection(&self) -> &C {
        &self.collection
    }

    /// 跟踪的依赖图
    pub const fn graph(&self) -> Option<&DependencyGraph> {
        self.graph.as_ref()
    }

    /// 拆分为注册集和依赖图
    pub fn into_parts(self) -> (C, Option<DependencyGraph>) {
        (self.collection, self.graph)
    }

    /// 注册服务契约与实现类型
    ///
    /// 实现类型必须等于契约或在描述符中声明了该契约。
    pub fn register(
        &mut self,
        service_type: ServiceType,
        implementation_type: ServiceType,
        lifetime: Lifetime,
    ) -> DependencyResult<()> {
        self.check_compatible(&service_type, &implementation_type)?;

        info!(
            "注册服务: {} -> {} ({})",
            service_type, implementation_type, lifetime
        );
        self.collection.add(ServiceRegistration::of_type(
            service_type,
            implementation_type,
            lifetime,
        ));
        self.track(&implementation_type)
    }

    /// 按泛型参数注册服务契约与实现类型
    pub fn register_type<S, I>(&mut self, lifetime: Lifetime) -> DependencyResult<()>
    where
        S: ?Sized + 'static,
        I: 'static,
    {
        self.register(ServiceType::of::<S>(), ServiceType::of::<I>(), lifetime)
    }

    /// 以自身类型注册实现
    pub fn register_as_self(
        &mut self,
        implementation_type: ServiceType,
        lifetime: Lifetime,
    ) -> DependencyResult<()> {
        self.register(implementation_type, implementation_type, lifetime)
    }

    /// 注册预先创建的实例（单例）
    pub fn register_instance<S, T>(&mut self, instance: Arc<T>)
    where
        S: ?Sized + 'static,
        T: Any + Send + Sync,
    {
        let registration = ServiceRegistration::of_instance(ServiceType::of::<S>(), instance);
        info!(
            "注册服务实例: {} -> {}",
            registration.service_type,
            registration.implementation_type()
        );
        self.collection.add(registration);
    }

    /// 扫描模块路径并批量注册
    ///
    /// 返回新增的注册记录数量。
    pub fn scan_module(&mut self, module: &str) -> DependencyResult<usize> {
        let scanner = ModuleScanner::new(self.catalog);
        let target = ScanTarget::module(module);
        if !scanner.supports(&target) {
            return Err(DependencyError::invalid_argument("module"));
        }

        let types = scanner.scan(&target);
        self.scan(&types)
    }

    /// 批量注册给定的实现类型
    ///
    /// 契约类型、没有描述符的类型以及（默认情况下）泛型模板会被跳过。
    pub fn scan(&mut self, types: &[ServiceType]) -> DependencyResult<usize> {
        let catalog = self.catalog;
        let mut added = 0;

        for implementation_type in types {
            if implementation_type.is_trait_object() {
                continue;
            }
            let Some(descriptor) = catalog.describe(implementation_type) else {
                debug!("类型没有描述符，跳过: {}", implementation_type);
                continue;
            };
            if descriptor.is_generic_template && !self.options.include_generic_templates {
                debug!("跳过泛型模板: {}", implementation_type);
                continue;
            }

            let lifetime = descriptor
                .lifetime
                .unwrap_or(self.options.default_lifetime);
            let service_types = match self.options.strategy {
                RegistrationStrategy::AsSelf => vec![*implementation_type],
                RegistrationStrategy::AsImplementedInterfaces if descriptor.interfaces.is_empty() => {
                    vec![*implementation_type]
                }
                RegistrationStrategy::AsImplementedInterfaces => descriptor.interfaces.clone(),
                RegistrationStrategy::AsSelfAndInterfaces => std::iter::once(*implementation_type)
                    .chain(descriptor.interfaces.iter().copied())
                    .collect(),
            };

            for service_type in service_types {
                debug!(
                    "扫描注册: {} -> {} ({})",
                    service_type, implementation_type, lifetime
                );
                self.collection.add(ServiceRegistration::of_type(
                    service_type,
                    *implementation_type,
                    lifetime,
                ));
                added += 1;
            }
            self.track(implementation_type)?;
        }

        info!("批量注册完成: {} 个候选类型, {} 条注册", types.len(), added);
        Ok(added)
    }

    /// 用装饰器替换契约的唯一注册，保留原生命周期
    pub fn decorate(
        &mut self,
        service_type: ServiceType,
        decorator_type: ServiceType,
    ) -> DependencyResult<()> {
        let found = self.collection.registrations_for(&service_type);
        let (index, lifetime) = match found.as_slice() {
            [(index, registration)] => (*index, registration.lifetime),
            _ => {
                return Err(DependencyError::NotFound {
                    service_type: service_type.name().to_string(),
                    found: found.len(),
                })
            }
        };
        self.check_compatible(&service_type, &decorator_type)?;

        let previous = self.collection.replace(
            index,
            ServiceRegistration::of_type(service_type, decorator_type, lifetime),
        )?;
        info!(
            "装饰服务: {} ({} -> {})",
            service_type,
            previous.implementation_type(),
            decorator_type
        );
        self.track(&decorator_type)
    }

    /// 按泛型参数装饰服务
    pub fn decorate_type<S, D>(&mut self) -> DependencyResult<()>
    where
        S: ?Sized + 'static,
        D: 'static,
    {
        self.decorate(ServiceType::of::<S>(), ServiceType::of::<D>())
    }

    /// 加载配置记录并注册
    ///
    /// 所有记录解析成功后才开始注册，任一记录无效时注册集保持不变。
    pub fn load_configuration(
        &mut self,
        configuration: &ServiceConfiguration,
    ) -> DependencyResult<usize> {
        let mut resolved = Vec::with_capacity(configuration.len());
        for (index, record) in configuration.services.iter().enumerate() {
            let service_type = self.resolve_record_type(index, "serviceType", &record.service_type)?;
            let implementation_type =
                self.resolve_record_type(index, "implementationType", &record.implementation_type)?;
            let lifetime = match record.lifetime.as_deref() {
                Some(value) => value.parse::<Lifetime>().map_err(|error| {
                    ConfigurationError::invalid_record(index, "lifetime", value, error.to_string())
                })?,
                None => self
                    .catalog
                    .describe(&implementation_type)
                    .and_then(|descriptor| descriptor.lifetime)
                    .unwrap_or(self.options.default_lifetime),
            };
            self.check_compatible(&service_type, &implementation_type)?;
            resolved.push((service_type, implementation_type, lifetime));
        }

        for (service_type, implementation_type, lifetime) in &resolved {
            self.register(*service_type, *implementation_type, *lifetime)?;
        }

        info!("从配置加载 {} 条服务注册", resolved.len());
        Ok(resolved.len())
    }

    /// 校验注册集和跟踪的依赖图
    pub fn validate(&self) -> DependencyResult<()> {
        let validator =
            DependencyValidatorImpl::new(self.catalog).with_options(self.options.validation.clone());
        let graph = self
            .graph
            .as_ref()
            .map(|graph| graph as &dyn DependencyGraphView);
        validator.validate(&self.collection, graph)
    }

    fn resolve_record_type(
        &self,
        index: usize,
        field: &'static str,
        name: &str,
    ) -> Result<ServiceType, ConfigurationError> {
        if name.trim().is_empty() {
            return Err(ConfigurationError::invalid_record(
                index,
                field,
                name,
                "类型名称为空",
            ));
        }

        self.catalog.resolve_name(name).ok_or_else(|| {
            ConfigurationError::invalid_record(index, field, name, "类型未在目录中登记或名称不唯一")
        })
    }

    fn check_compatible(
        &self,
        service_type: &ServiceType,
        implementation_type: &ServiceType,
    ) -> Result<(), ConfigurationError> {
        if service_type == implementation_type {
            return Ok(());
        }

        let declared = self
            .catalog
            .describe(implementation_type)
            .is_some_and(|descriptor| descriptor.declares(service_type));
        if declared {
            Ok(())
        } else {
            Err(ConfigurationError::IncompatibleImplementation {
                service_type: service_type.name().to_string(),
                implementation_type: implementation_type.name().to_string(),
            })
        }
    }

    fn track(&mut self, implementation_type: &ServiceType) -> DependencyResult<()> {
        DependencyGraphBuilder::new(self.catalog)
            .with_builtin_policy(self.options.validation.builtin.clone())
            .register_type(self.graph.as_mut(), implementation_type)
    }
}

impl<C: ServiceCollection + std::fmt::Debug> std::fmt::Debug for ServiceRegistrar<'_, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceRegistrar")
            .field("collection", &self.collection)
            .field("graph", &self.graph)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
