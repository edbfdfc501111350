//! 依赖校验器
//!
//! 在运行时解析之前检查注册集：构造函数参数和依赖图中的依赖边都必须能在注册集中找到。
//! 所有未解析的类型收集完毕后一次性报告。

use crate::graph::format_cycles;
use di_abstractions::{
    DependencyGraphView, DependencyValidator, Implementation, ServiceCollection, TypeIntrospector,
};
use infrastructure_common::{ConfigurationError, DependencyResult, ServiceType, ValidationOptions};
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

/// 依赖校验器实现
pub struct DependencyValidatorImpl<'a> {
    introspector: &'a dyn TypeIntrospector,
    options: ValidationOptions,
}

impl<'a> DependencyValidatorImpl<'a> {
    /// 使用默认选项创建校验器
    pub fn new(introspector: &'a dyn TypeIntrospector) -> Self {
        Self {
            introspector,
            options: ValidationOptions::default(),
        }
    }

    /// 设置校验选项
    #[must_use]
    pub fn with_options(mut self, options: ValidationOptions) -> Self {
        self.options = options;
        self
    }

    /// 当前校验选项
    pub const fn options(&self) -> &ValidationOptions {
        &self.options
    }

    /// 检查每个按类型注册的实现的构造函数参数
    fn check_constructors(
        &self,
        collection: &dyn ServiceCollection,
        unresolved: &mut BTreeSet<ServiceType>,
    ) {
        for registration in collection.registrations() {
            // 实例已经构造完成，不需要检查
            let Implementation::Type(implementation_type) = &registration.implementation else {
                continue;
            };
            if self.options.builtin.is_builtin(implementation_type) {
                continue;
            }

            let Some(descriptor) = self.introspector.describe(implementation_type) else {
                debug!("实现类型没有描述符，跳过构造函数检查: {}", implementation_type);
                continue;
            };
            if descriptor.is_generic_template && self.options.skip_generic_templates {
                debug!("跳过泛型模板: {}", implementation_type);
                continue;
            }
            let Some(constructor) = descriptor.select_constructor() else {
                continue;
            };

            for parameter in &constructor.parameters {
                if self.options.builtin.is_builtin(parameter) {
                    continue;
                }
                if !collection.is_registered(parameter) {
                    debug!("构造函数参数未注册: {} ({})", parameter, implementation_type);
                    unresolved.insert(*parameter);
                }
            }
        }
    }

    /// 检查依赖图中每条依赖边的目标类型，内置类型与构造参数一样跳过
    fn check_edges(
        &self,
        collection: &dyn ServiceCollection,
        graph: &dyn DependencyGraphView,
        unresolved: &mut BTreeSet<ServiceType>,
    ) -> usize {
        let edges = graph.edges();
        for (dependent, dependency) in &edges {
            if self.options.builtin.is_builtin(dependency) {
                continue;
            }
            if !collection.is_registered(dependency) {
                debug!("依赖边目标未注册: {} -> {}", dependent, dependency);
                unresolved.insert(*dependency);
            }
        }
        edges.len()
    }
}

impl DependencyValidator for DependencyValidatorImpl<'_> {
    fn validate(
        &self,
        collection: &dyn ServiceCollection,
        graph: Option<&dyn DependencyGraphView>,
    ) -> DependencyResult<()> {
        if collection.is_empty() {
            warn!("服务注册集为空，依赖校验失败");
            return Err(ConfigurationError::EmptyRegistrations.into());
        }

        let mut unresolved = BTreeSet::new();
        self.check_constructors(collection, &mut unresolved);
        let edge_count = graph.map_or(0, |graph| self.check_edges(collection, graph, &mut unresolved));

        if !unresolved.is_empty() {
            for service_type in &unresolved {
                warn!("未解析的依赖类型: {}", service_type);
            }
            let type_names = unresolved
                .iter()
                .map(|service_type| service_type.name().to_string())
                .collect();
            return Err(ConfigurationError::UnresolvedDependencies { type_names }.into());
        }

        if self.options.detect_cycles {
            if let Some(graph) = graph {
                let cycles = graph.cycles();
                if !cycles.is_empty() {
                    let cycles = format_cycles(&cycles);
                    for cycle in &cycles {
                        warn!("检测到循环依赖: {}", cycle);
                    }
                    return Err(ConfigurationError::CircularDependency { cycles }.into());
                }
            }
        }

        info!(
            "依赖校验通过: {} 个注册, {} 条依赖边",
            collection.len(),
            edge_count
        );
        Ok(())
    }
}

impl std::fmt::Debug for DependencyValidatorImpl<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DependencyValidatorImpl")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
