//! 场景图
//!
//! 节点用稳定的 `NodeId` 句柄标识（不依赖指针身份做相等判断）。
//! 节点可以携带一个 Surface（可渲染几何体），根节点可以充当
//! 场景管理器，向订阅者广播帧开始信号。

use std::collections::HashMap;

use crossbeam_channel::Receiver;

use crate::render::geometry::Geometry;
use crate::scene::events::{FrameEvent, SceneEvent, Signal};

/// 节点句柄
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u64);

/// 可渲染几何体挂载
#[derive(Debug)]
pub struct Surface {
    pub geometry: Geometry,
}

impl Surface {
    pub fn new(geometry: Geometry) -> Self {
        Self { geometry }
    }
}

struct Node {
    name: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    surface: Option<Surface>,
    // 场景管理器：帧信号源，仅根节点持有才有意义
    frame_begin: Option<Signal<FrameEvent>>,
}

/// 场景图
pub struct SceneGraph {
    nodes: HashMap<NodeId, Node>,
    next_id: u64,
    node_events: Signal<SceneEvent>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            next_id: 1,
            node_events: Signal::new(),
        }
    }

    /// 创建孤立节点
    pub fn create_node(&mut self, name: impl Into<String>) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;

        self.nodes.insert(
            id,
            Node {
                name: name.into(),
                parent: None,
                children: Vec::new(),
                surface: None,
                frame_begin: None,
            },
        );
        id
    }

    pub fn node_name(&self, node: NodeId) -> Option<&str> {
        self.nodes.get(&node).map(|n| n.name.as_str())
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains_key(&node)
    }

    /// 把子节点挂到父节点下，并广播 NodeAdded
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) {
        if !self.nodes.contains_key(&parent) || !self.nodes.contains_key(&child) {
            return;
        }

        if let Some(node) = self.nodes.get_mut(&child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.nodes.get_mut(&parent) {
            if !node.children.contains(&child) {
                node.children.push(child);
            }
        }

        self.node_events
            .emit(SceneEvent::NodeAdded { node: child, parent });
    }

    /// 把节点从父节点摘除，并广播 NodeRemoved；节点本身仍然存在
    pub fn remove_from_parent(&mut self, child: NodeId) {
        let parent = match self.nodes.get(&child).and_then(|n| n.parent) {
            Some(parent) => parent,
            None => return,
        };

        if let Some(node) = self.nodes.get_mut(&child) {
            node.parent = None;
        }
        if let Some(node) = self.nodes.get_mut(&parent) {
            node.children.retain(|&c| c != child);
        }

        self.node_events
            .emit(SceneEvent::NodeRemoved { node: child, parent });
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(&node).and_then(|n| n.parent)
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes
            .get(&node)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    /// 沿父链走到根
    pub fn root_of(&self, node: NodeId) -> NodeId {
        let mut current = node;
        while let Some(parent) = self.parent(current) {
            current = parent;
        }
        current
    }

    /// 节点是否位于 ancestor 的子树内（含 ancestor 本身）
    pub fn is_in_subtree(&self, node: NodeId, ancestor: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    // ------------------------------------------------------------------
    // Surface
    // ------------------------------------------------------------------

    pub fn set_surface(&mut self, node: NodeId, surface: Surface) {
        if let Some(n) = self.nodes.get_mut(&node) {
            n.surface = Some(surface);
        }
    }

    pub fn surface(&self, node: NodeId) -> Option<&Surface> {
        self.nodes.get(&node).and_then(|n| n.surface.as_ref())
    }

    pub fn surface_mut(&mut self, node: NodeId) -> Option<&mut Surface> {
        self.nodes.get_mut(&node).and_then(|n| n.surface.as_mut())
    }

    // ------------------------------------------------------------------
    // 场景管理器（帧信号）
    // ------------------------------------------------------------------

    /// 把节点标记为场景管理器（帧信号源）
    pub fn add_scene_manager(&mut self, node: NodeId) {
        if let Some(n) = self.nodes.get_mut(&node) {
            if n.frame_begin.is_none() {
                n.frame_begin = Some(Signal::new());
            }
        }
    }

    pub fn has_scene_manager(&self, node: NodeId) -> bool {
        self.nodes
            .get(&node)
            .map(|n| n.frame_begin.is_some())
            .unwrap_or(false)
    }

    /// 订阅某个管理器的帧开始信号
    pub fn connect_frame_begin(&mut self, manager: NodeId) -> Option<Receiver<FrameEvent>> {
        self.nodes
            .get_mut(&manager)
            .and_then(|n| n.frame_begin.as_mut())
            .map(|signal| signal.connect())
    }

    /// 广播一帧开始
    pub fn begin_frame(&mut self, manager: NodeId) {
        if let Some(signal) = self
            .nodes
            .get_mut(&manager)
            .and_then(|n| n.frame_begin.as_mut())
        {
            signal.emit(FrameEvent { manager });
        }
    }

    /// 订阅全局的节点增删事件
    pub fn connect_node_events(&mut self) -> Receiver<SceneEvent> {
        self.node_events.connect()
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}
