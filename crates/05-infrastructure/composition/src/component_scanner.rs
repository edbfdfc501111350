//! 组件扫描
//!
//! 在类型描述符目录中按模块路径枚举候选实现类型。

use di_abstractions::{ComponentScanner, ScanTarget, TypeIntrospector};
use di_impl::TypeCatalog;
use infrastructure_common::ServiceType;
use tracing::debug;

/// 基于类型目录的模块扫描器
#[derive(Debug, Clone, Copy)]
pub struct ModuleScanner<'a> {
    catalog: &'a TypeCatalog,
}

impl<'a> ModuleScanner<'a> {
    /// 创建扫描器
    pub const fn new(catalog: &'a TypeCatalog) -> Self {
        Self { catalog }
    }
}

impl ComponentScanner for ModuleScanner<'_> {
    fn scan(&self, target: &ScanTarget) -> Vec<ServiceType> {
        let found: Vec<ServiceType> = match target {
            ScanTarget::Module(module) => self.catalog.types_in_module(module),
            ScanTarget::Types(types) => types
                .iter()
                .filter(|service_type| self.catalog.is_described(service_type))
                .copied()
                .collect(),
        };

        debug!("扫描 {} 发现 {} 个候选类型", target.describe(), found.len());
        found
    }

    fn name(&self) -> &str {
        "module-scanner"
    }

    fn supports(&self, target: &ScanTarget) -> bool {
        match target {
            ScanTarget::Module(module) => !module.trim().is_empty(),
            ScanTarget::Types(_) => true,
        }
    }
}
