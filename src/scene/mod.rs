//! 场景模块
//!
//! 提供节点层级、几何体挂载（Surface）、场景管理器（帧信号源）
//! 以及组件订阅用的类型化事件信号。

pub mod events;
pub mod graph;

pub use events::{FrameEvent, SceneEvent, Signal};
pub use graph::{NodeId, SceneGraph, Surface};
