//! 元数据定义
//!
//! 提供服务类型句柄以及替代运行时反射的显式类型描述符。

use crate::lifecycle::Lifetime;
use std::any::TypeId;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// 服务类型句柄
///
/// 契约（通常是 `dyn Trait`）和实现类型共用同一种句柄。
/// 判等与哈希只看 `TypeId`，名称仅用于展示和按名称解析。
#[derive(Clone, Copy)]
pub struct ServiceType {
    id: TypeId,
    name: &'static str,
}

impl ServiceType {
    /// 从类型获取服务类型句柄
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// 类型ID
    pub const fn id(&self) -> TypeId {
        self.id
    }

    /// 完整类型名称
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// 获取简短的类型名称（不包含模块路径，保留泛型参数）
    pub fn short_name(&self) -> &'static str {
        split_path(self.name).1
    }

    /// 获取类型所在的模块路径
    pub fn module_path(&self) -> &'static str {
        split_path(self.name).0
    }

    /// 去掉 `dyn ` 前缀后的路径名称
    pub fn path_name(&self) -> &'static str {
        self.name.strip_prefix("dyn ").unwrap_or(self.name)
    }

    /// 是否为 trait object（契约）
    pub fn is_trait_object(&self) -> bool {
        self.name.starts_with("dyn ")
    }
}

/// 拆分 `模块路径::简短名称`，泛型参数内的路径不参与拆分
fn split_path(name: &'static str) -> (&'static str, &'static str) {
    let path = name.strip_prefix("dyn ").unwrap_or(name);
    if path.starts_with(&['(', '[', '&', '*'][..]) {
        return ("", path);
    }

    let outer_end = path.find('<').unwrap_or(path.len());
    match path[..outer_end].rfind("::") {
        Some(pos) => (&path[..pos], &path[pos + 2..]),
        None => ("", path),
    }
}

impl PartialEq for ServiceType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ServiceType {}

impl Hash for ServiceType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl PartialOrd for ServiceType {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ServiceType {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name
            .cmp(other.name)
            .then_with(|| self.id.cmp(&other.id))
    }
}

impl fmt::Debug for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ServiceType({})", self.name)
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// 构造函数描述符
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstructorDescriptor {
    /// 构造函数名称
    pub name: &'static str,
    /// 参数类型列表（按声明顺序）
    pub parameters: Vec<ServiceType>,
}

impl ConstructorDescriptor {
    /// 创建无参数的构造函数描述符
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            parameters: Vec::new(),
        }
    }

    /// 添加参数类型
    #[must_use]
    pub fn with_parameter<T: ?Sized + 'static>(mut self) -> Self {
        self.parameters.push(ServiceType::of::<T>());
        self
    }

    /// 添加参数类型句柄
    #[must_use]
    pub fn with_parameter_type(mut self, parameter: ServiceType) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// 参数数量
    pub fn arity(&self) -> usize {
        self.parameters.len()
    }
}

/// 类型描述符
///
/// 每个可注册类型在启动时显式声明自己的构造函数、实现的契约以及是否为泛型模板，
/// 注册和校验逻辑只通过描述符了解类型结构。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDescriptor {
    /// 被描述的类型
    pub service_type: ServiceType,
    /// 构造函数列表（按声明顺序）
    pub constructors: Vec<ConstructorDescriptor>,
    /// 实现的契约列表
    pub interfaces: Vec<ServiceType>,
    /// 是否为未绑定的泛型模板
    pub is_generic_template: bool,
    /// 声明的生命周期
    pub lifetime: Option<Lifetime>,
    /// 用于按名称解析的别名
    pub aliases: Vec<String>,
}

impl TypeDescriptor {
    /// 为指定类型创建描述符
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self::new(ServiceType::of::<T>())
    }

    /// 从类型句柄创建描述符
    pub const fn new(service_type: ServiceType) -> Self {
        Self {
            service_type,
            constructors: Vec::new(),
            interfaces: Vec::new(),
            is_generic_template: false,
            lifetime: None,
            aliases: Vec::new(),
        }
    }

    /// 添加构造函数
    #[must_use]
    pub fn with_constructor(mut self, constructor: ConstructorDescriptor) -> Self {
        self.constructors.push(constructor);
        self
    }

    /// 声明实现的契约
    #[must_use]
    pub fn implements<C: ?Sized + 'static>(mut self) -> Self {
        self.interfaces.push(ServiceType::of::<C>());
        self
    }

    /// 标记为泛型模板
    #[must_use]
    pub fn generic_template(mut self) -> Self {
        self.is_generic_template = true;
        self
    }

    /// 设置生命周期
    #[must_use]
    pub fn with_lifetime(mut self, lifetime: Lifetime) -> Self {
        self.lifetime = Some(lifetime);
        self
    }

    /// 添加别名
    #[must_use]
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// 选择参数最多的构造函数
    ///
    /// 多个构造函数参数数量相同时，取声明顺序中的第一个。
    pub fn select_constructor(&self) -> Option<&ConstructorDescriptor> {
        self.constructors
            .iter()
            .fold(None, |best: Option<&ConstructorDescriptor>, candidate| match best {
                Some(current) if current.arity() >= candidate.arity() => Some(current),
                _ => Some(candidate),
            })
    }

    /// 是否可以作为指定契约的实现
    pub fn declares(&self, service_type: &ServiceType) -> bool {
        self.service_type == *service_type || self.interfaces.contains(service_type)
    }
}
