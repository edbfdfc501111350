//! 注册类型到依赖图的转换
//!
//! 每注册一个实现类型，就按其参数最多的构造函数在图中添加依赖边。
//! 内置类型不参与依赖分析。

use crate::graph::DependencyGraph;
use di_abstractions::TypeIntrospector;
use infrastructure_common::{BuiltinTypePolicy, DependencyResult, ServiceType};
use tracing::debug;

/// 依赖图构建器
pub struct DependencyGraphBuilder<'a> {
    introspector: &'a dyn TypeIntrospector,
    builtin: BuiltinTypePolicy,
}

impl<'a> DependencyGraphBuilder<'a> {
    /// 使用默认内置类型约定创建构建器
    pub fn new(introspector: &'a dyn TypeIntrospector) -> Self {
        Self {
            introspector,
            builtin: BuiltinTypePolicy::default(),
        }
    }

    /// 设置内置类型识别约定
    #[must_use]
    pub fn with_builtin_policy(mut self, builtin: BuiltinTypePolicy) -> Self {
        self.builtin = builtin;
        self
    }

    /// 当前使用的内置类型识别约定
    pub const fn builtin_policy(&self) -> &BuiltinTypePolicy {
        &self.builtin
    }

    /// 把实现类型及其构造函数依赖写入依赖图
    ///
    /// 没有提供依赖图时直接返回；类型没有描述符或没有构造函数时只创建节点。
    pub fn register_type(
        &self,
        graph: Option<&mut DependencyGraph>,
        implementation_type: &ServiceType,
    ) -> DependencyResult<()> {
        let Some(graph) = graph else {
            return Ok(());
        };

        let node = graph.add_service(implementation_type)?;

        let constructor = self
            .introspector
            .describe(implementation_type)
            .and_then(|descriptor| descriptor.select_constructor());
        let Some(constructor) = constructor else {
            debug!("类型没有可用的构造函数，仅添加节点: {}", implementation_type);
            return Ok(());
        };

        for parameter in &constructor.parameters {
            if self.builtin.is_builtin(parameter) {
                debug!("跳过内置类型参数: {} ({})", parameter, implementation_type);
                continue;
            }

            let dependency = graph.add_service(parameter)?;
            if graph.add_dependency(node, dependency)? {
                debug!("添加依赖边: {} -> {}", implementation_type, parameter);
            }
        }

        Ok(())
    }
}

impl std::fmt::Debug for DependencyGraphBuilder<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DependencyGraphBuilder")
            .field("builtin", &self.builtin)
            .finish_non_exhaustive()
    }
}
