//! 依赖关系图
//!
//! 节点按服务类型去重，只增不删。节点之间通过图内部的 [`NodeId`] 相互引用，
//! 同一个类型无论被 `add_service` 多少次都对应同一个节点。

use di_abstractions::DependencyGraphView;
use infrastructure_common::{ConfigurationError, DependencyError, DependencyResult, ServiceType};
use std::collections::{BTreeSet, HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};

/// 图实例标识分配器
static NEXT_GRAPH_ID: AtomicU64 = AtomicU64::new(1);

/// 依赖图节点引用
///
/// 只在签发它的图中有效，其他图会把它当作未初始化的引用拒绝。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    graph: u64,
    index: usize,
}

impl NodeId {
    /// 节点在图中的插入序号
    pub const fn index(&self) -> usize {
        self.index
    }
}

/// 依赖图节点
#[derive(Debug, Clone)]
pub struct DependencyNode {
    service_type: ServiceType,
    dependencies: BTreeSet<NodeId>,
}

impl DependencyNode {
    /// 创建节点，服务类型缺失时返回参数错误
    pub fn new<'a>(service_type: impl Into<Option<&'a ServiceType>>) -> DependencyResult<Self> {
        let service_type = service_type
            .into()
            .ok_or(DependencyError::invalid_argument("service_type"))?;

        Ok(Self {
            service_type: *service_type,
            dependencies: BTreeSet::new(),
        })
    }

    /// 节点对应的服务类型
    pub const fn service_type(&self) -> &ServiceType {
        &self.service_type
    }

    /// 添加依赖节点
    ///
    /// 返回是否新增了依赖；重复添加不报错也不产生副作用。
    pub fn add_dependency(&mut self, node: impl Into<Option<NodeId>>) -> DependencyResult<bool> {
        let node = node
            .into()
            .ok_or(DependencyError::invalid_argument("node"))?;
        Ok(self.dependencies.insert(node))
    }

    /// 直接依赖的节点
    pub fn dependencies(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.dependencies.iter().copied()
    }

    /// 直接依赖数量
    pub fn dependency_count(&self) -> usize {
        self.dependencies.len()
    }

    /// 是否直接依赖指定节点
    pub fn depends_on(&self, node: NodeId) -> bool {
        self.dependencies.contains(&node)
    }
}

/// 依赖关系图
///
/// 一次注册过程独占一个图实例；图不实现 `Clone`，避免两个实例共用节点引用。
#[derive(Debug)]
pub struct DependencyGraph {
    id: u64,
    nodes: Vec<DependencyNode>,
    index: HashMap<ServiceType, NodeId>,
}

impl DependencyGraph {
    /// 创建空的依赖关系图
    pub fn new() -> Self {
        Self {
            id: NEXT_GRAPH_ID.fetch_add(1, Ordering::Relaxed),
            nodes: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// 获取或创建服务类型对应的节点
    ///
    /// 同一类型重复调用总是返回同一个节点。
    pub fn add_service<'a>(
        &mut self,
        service_type: impl Into<Option<&'a ServiceType>>,
    ) -> DependencyResult<NodeId> {
        let service_type = service_type
            .into()
            .ok_or(DependencyError::invalid_argument("service_type"))?;

        if let Some(existing) = self.index.get(service_type) {
            return Ok(*existing);
        }

        let id = NodeId {
            graph: self.id,
            index: self.nodes.len(),
        };
        self.nodes.push(DependencyNode::new(service_type)?);
        self.index.insert(*service_type, id);
        Ok(id)
    }

    /// 添加依赖边 `dependent -> dependency`
    ///
    /// 任一节点缺失或不属于本图时返回参数错误，图保持不变。
    pub fn add_dependency(
        &mut self,
        dependent: NodeId,
        dependency: impl Into<Option<NodeId>>,
    ) -> DependencyResult<bool> {
        let dependency = dependency
            .into()
            .ok_or(DependencyError::invalid_argument("dependency"))?;
        self.check_owned(dependent, "dependent")?;
        self.check_owned(dependency, "dependency")?;

        self.nodes[dependent.index].add_dependency(dependency)
    }

    fn check_owned(&self, node: NodeId, argument: &'static str) -> DependencyResult<()> {
        if node.graph == self.id && node.index < self.nodes.len() {
            Ok(())
        } else {
            Err(DependencyError::invalid_argument(argument))
        }
    }

    /// 按引用获取节点
    pub fn node(&self, id: NodeId) -> Option<&DependencyNode> {
        if id.graph == self.id {
            self.nodes.get(id.index)
        } else {
            None
        }
    }

    /// 查找服务类型对应的节点引用
    pub fn node_id(&self, service_type: &ServiceType) -> Option<NodeId> {
        self.index.get(service_type).copied()
    }

    /// 查找服务类型对应的节点
    pub fn find(&self, service_type: &ServiceType) -> Option<&DependencyNode> {
        self.node_id(service_type).and_then(|id| self.node(id))
    }

    /// 按插入顺序遍历所有节点
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &DependencyNode)> + '_ {
        self.nodes.iter().enumerate().map(move |(index, node)| {
            (
                NodeId {
                    graph: self.id,
                    index,
                },
                node,
            )
        })
    }

    /// 节点数量
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// 是否包含服务类型
    pub fn contains(&self, service_type: &ServiceType) -> bool {
        self.index.contains_key(service_type)
    }

    /// 依赖边数量
    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(DependencyNode::dependency_count).sum()
    }

    /// 获取服务类型的直接依赖
    pub fn dependencies_of(&self, service_type: &ServiceType) -> Vec<ServiceType> {
        self.find(service_type)
            .map(|node| {
                node.dependencies()
                    .map(|dependency| self.nodes[dependency.index].service_type)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// 获取直接依赖于指定服务类型的类型
    pub fn dependents_of(&self, service_type: &ServiceType) -> Vec<ServiceType> {
        let Some(target) = self.node_id(service_type) else {
            return Vec::new();
        };

        self.nodes
            .iter()
            .filter(|node| node.depends_on(target))
            .map(|node| node.service_type)
            .collect()
    }

    /// 所有依赖边（依赖者, 被依赖者）
    pub fn edge_list(&self) -> Vec<(ServiceType, ServiceType)> {
        self.nodes
            .iter()
            .flat_map(|node| {
                node.dependencies()
                    .map(move |dependency| (node.service_type, self.nodes[dependency.index].service_type))
            })
            .collect()
    }

    /// 检测循环依赖
    ///
    /// 深度优先搜索，每条回边对应一个循环；自依赖也算作循环。
    /// 使用显式栈，依赖链长度不受线程栈限制。
    pub fn find_cycles(&self) -> Vec<Vec<ServiceType>> {
        let mut visited = vec![false; self.nodes.len()];
        // 节点在当前搜索路径中的位置
        let mut path_position: Vec<Option<usize>> = vec![None; self.nodes.len()];
        let mut path: Vec<usize> = Vec::new();
        let mut stack = Vec::new();
        let mut cycles = Vec::new();

        for start in 0..self.nodes.len() {
            if visited[start] {
                continue;
            }
            visited[start] = true;
            path_position[start] = Some(path.len());
            path.push(start);
            stack.push(self.nodes[start].dependencies());

            while let Some(frame) = stack.last_mut() {
                let Some(dependency) = frame.next() else {
                    stack.pop();
                    if let Some(done) = path.pop() {
                        path_position[done] = None;
                    }
                    continue;
                };

                let next = dependency.index;
                if let Some(cycle_start) = path_position[next] {
                    cycles.push(
                        path[cycle_start..]
                            .iter()
                            .map(|&index| self.nodes[index].service_type)
                            .collect(),
                    );
                } else if !visited[next] {
                    visited[next] = true;
                    path_position[next] = Some(path.len());
                    path.push(next);
                    stack.push(self.nodes[next].dependencies());
                }
            }
        }

        cycles
    }

    /// 获取拓扑顺序（被依赖者在前）
    ///
    /// 存在循环依赖时返回配置错误。
    pub fn topological_order(&self) -> DependencyResult<Vec<ServiceType>> {
        let mut remaining: Vec<usize> = self
            .nodes
            .iter()
            .map(DependencyNode::dependency_count)
            .collect();
        let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); self.nodes.len()];
        for (index, node) in self.nodes.iter().enumerate() {
            for dependency in node.dependencies() {
                dependents[dependency.index].push(index);
            }
        }

        let mut queue: VecDeque<usize> = remaining
            .iter()
            .enumerate()
            .filter(|(_, count)| **count == 0)
            .map(|(index, _)| index)
            .collect();
        let mut order = Vec::with_capacity(self.nodes.len());

        // Kahn 算法
        while let Some(index) = queue.pop_front() {
            order.push(self.nodes[index].service_type);
            for &dependent in &dependents[index] {
                remaining[dependent] -= 1;
                if remaining[dependent] == 0 {
                    queue.push_back(dependent);
                }
            }
        }

        if order.len() == self.nodes.len() {
            Ok(order)
        } else {
            Err(ConfigurationError::CircularDependency {
                cycles: format_cycles(&self.find_cycles()),
            }
            .into())
        }
    }
}

impl Default for DependencyGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl DependencyGraphView for DependencyGraph {
    fn edges(&self) -> Vec<(ServiceType, ServiceType)> {
        self.edge_list()
    }

    fn cycles(&self) -> Vec<Vec<ServiceType>> {
        self.find_cycles()
    }
}

/// 把循环路径格式化为 `A -> B -> A`
pub fn format_cycles(cycles: &[Vec<ServiceType>]) -> Vec<String> {
    cycles
        .iter()
        .filter_map(|cycle| {
            let first = cycle.first()?;
            let mut names: Vec<&str> = cycle.iter().map(ServiceType::name).collect();
            names.push(first.name());
            Some(names.join(" -> "))
        })
        .collect()
}
