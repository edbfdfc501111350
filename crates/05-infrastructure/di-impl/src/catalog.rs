//! 类型描述符目录
//!
//! 启动时把每个可注册类型的描述符登记到目录中，注册器和校验器通过
//! [`TypeIntrospector`] 查询类型结构。

use di_abstractions::{is_in_module, TypeIntrospector};
use infrastructure_common::{ServiceType, TypeDescriptor};
use std::collections::HashMap;
use tracing::{debug, warn};

/// 类型描述符目录
#[derive(Debug, Default, Clone)]
pub struct TypeCatalog {
    descriptors: Vec<TypeDescriptor>,
    index: HashMap<ServiceType, usize>,
}

impl TypeCatalog {
    /// 创建空目录
    pub fn new() -> Self {
        Self::default()
    }

    /// 登记类型描述符，同一类型再次登记时替换旧描述符
    pub fn register(&mut self, descriptor: TypeDescriptor) {
        let service_type = descriptor.service_type;
        if let Some(&position) = self.index.get(&service_type) {
            debug!("替换类型描述符: {}", service_type);
            self.descriptors[position] = descriptor;
        } else {
            debug!("登记类型描述符: {}", service_type);
            self.index.insert(service_type, self.descriptors.len());
            self.descriptors.push(descriptor);
        }
    }

    /// 登记类型描述符（构建器风格）
    #[must_use]
    pub fn with(mut self, descriptor: TypeDescriptor) -> Self {
        self.register(descriptor);
        self
    }

    /// 获取模块路径下的所有已登记类型（按登记顺序）
    pub fn types_in_module(&self, module: &str) -> Vec<ServiceType> {
        self.descriptors
            .iter()
            .map(|descriptor| descriptor.service_type)
            .filter(|service_type| is_in_module(service_type, module))
            .collect()
    }

    /// 按登记顺序遍历描述符
    pub fn iter(&self) -> impl Iterator<Item = &TypeDescriptor> {
        self.descriptors.iter()
    }

    /// 已登记的类型数量
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

impl TypeIntrospector for TypeCatalog {
    fn describe(&self, service_type: &ServiceType) -> Option<&TypeDescriptor> {
        self.index
            .get(service_type)
            .map(|&position| &self.descriptors[position])
    }

    /// 依次按完整名称、路径名称、别名、简短名称匹配；简短名称不唯一时不解析
    fn resolve_name(&self, name: &str) -> Option<ServiceType> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }

        let exact = self.descriptors.iter().find(|descriptor| {
            let service_type = &descriptor.service_type;
            service_type.name() == name
                || service_type.path_name() == name
                || descriptor.aliases.iter().any(|alias| alias == name)
        });
        if let Some(descriptor) = exact {
            return Some(descriptor.service_type);
        }

        let mut candidates = self
            .descriptors
            .iter()
            .map(|descriptor| descriptor.service_type)
            .filter(|service_type| service_type.short_name() == name);

        let first = candidates.next()?;
        if candidates.next().is_some() {
            warn!("类型名称不唯一，无法解析: {}", name);
            return None;
        }
        Some(first)
    }
}
