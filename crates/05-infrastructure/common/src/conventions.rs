//! 约定规范定义
//!
//! 提供内置类型的识别约定：依赖图只跟踪应用层类型，平台提供的类型不参与依赖分析。

use crate::metadata::ServiceType;
use serde::{Deserialize, Serialize};

/// 原始类型和语言内置类型名称
const PRIMITIVE_TYPES: &[&str] = &[
    "bool", "char", "str", "()", "!", "i8", "i16", "i32", "i64", "i128", "isize", "u8", "u16",
    "u32", "u64", "u128", "usize", "f32", "f64",
];

/// 默认的内置类型路径前缀
const DEFAULT_PREFIXES: &[&str] = &["core::", "alloc::", "std::"];

/// 内置类型识别约定
///
/// 类型名称（泛型参数之外的部分）以任一前缀开头，或者是原始类型、元组、数组、
/// 切片、引用、指针、函数指针时，视为内置类型。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuiltinTypePolicy {
    /// 内置类型路径前缀
    pub prefixes: Vec<String>,
}

impl BuiltinTypePolicy {
    /// 使用默认前缀创建
    pub fn new() -> Self {
        Self {
            prefixes: DEFAULT_PREFIXES.iter().map(ToString::to_string).collect(),
        }
    }

    /// 添加额外的前缀
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefixes.push(prefix.into());
        self
    }

    /// 检查类型是否为内置类型
    pub fn is_builtin(&self, service_type: &ServiceType) -> bool {
        let name = service_type.path_name();
        if Self::is_structural(name) {
            return true;
        }

        let outer = &name[..name.find('<').unwrap_or(name.len())];
        self.prefixes
            .iter()
            .any(|prefix| outer.starts_with(prefix.as_str()))
    }

    /// 原始类型以及元组、数组、引用、指针、函数指针
    fn is_structural(name: &str) -> bool {
        PRIMITIVE_TYPES.contains(&name)
            || name.starts_with(&['(', '[', '&', '*'][..])
            || name.starts_with("fn(")
            || name.starts_with("unsafe ")
            || name.starts_with("extern ")
    }
}

impl Default for BuiltinTypePolicy {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::time::Duration;

    trait Repository {}
    struct UserService;

    #[test]
    fn test_primitives_and_std_types_are_builtin() {
        let policy = BuiltinTypePolicy::default();

        assert!(policy.is_builtin(&ServiceType::of::<u32>()));
        assert!(policy.is_builtin(&ServiceType::of::<bool>()));
        assert!(policy.is_builtin(&ServiceType::of::<str>()));
        assert!(policy.is_builtin(&ServiceType::of::<String>()));
        assert!(policy.is_builtin(&ServiceType::of::<Duration>()));
        assert!(policy.is_builtin(&ServiceType::of::<HashMap<String, u8>>()));
        assert!(policy.is_builtin(&ServiceType::of::<(u8, u16)>()));
        assert!(policy.is_builtin(&ServiceType::of::<[u8; 4]>()));
        assert!(policy.is_builtin(&ServiceType::of::<&'static str>()));
        assert!(policy.is_builtin(&ServiceType::of::<fn(u8) -> u8>()));
        assert!(policy.is_builtin(&ServiceType::of::<dyn std::any::Any>()));
    }

    #[test]
    fn test_application_types_are_not_builtin() {
        let policy = BuiltinTypePolicy::default();

        assert!(!policy.is_builtin(&ServiceType::of::<UserService>()));
        assert!(!policy.is_builtin(&ServiceType::of::<dyn Repository>()));
    }

    #[test]
    fn test_generic_arguments_do_not_affect_classification() {
        let policy = BuiltinTypePolicy::default();

        // 外层类型是 Arc，属于内置类型
        assert!(policy.is_builtin(&ServiceType::of::<Arc<UserService>>()));
    }

    #[test]
    fn test_extra_prefix() {
        let policy = BuiltinTypePolicy::default().with_prefix(module_path!());

        assert!(policy.is_builtin(&ServiceType::of::<UserService>()));
    }
}
