//! 骨骼蒙皮模块
//!
//! 提供蒙皮数据、骨骼顶点缓冲区构建与蒙皮组件。
//!
//! ## 功能特性
//!
//! - 每顶点骨骼影响数据与逐帧采样好的骨骼矩阵（[`Skin`]）
//! - 硬件蒙皮用的共享骨骼属性缓冲区（固定 16 float 跨度）
//! - 硬件 / 软件两条蒙皮路径（[`Skinning`]）
//!
//! ## 使用示例
//!
//! ```rust
//! use std::sync::Arc;
//! use skinning_engine::animation::{Skin, SkinMethod, Skinning, ATTR_POSITION};
//! use skinning_engine::core::ManualClock;
//! use skinning_engine::render::{Geometry, HeadlessContext, VertexBuffer};
//! use skinning_engine::scene::{SceneGraph, Surface};
//! use glam::Mat4;
//!
//! // 蒙皮数据：1 个骨骼、1 个顶点、1 秒、4 帧
//! let mut skin = Skin::new(1, 1, 1.0);
//! skin.set_vertex_influences(0, &[(0, 1.0)]).unwrap();
//! for _ in 0..4 {
//!     skin.add_frame_matrices(&[Mat4::IDENTITY]).unwrap();
//! }
//!
//! // 场景：管理器根 + 网格节点
//! let context = Arc::new(HeadlessContext::new());
//! let clock = Arc::new(ManualClock::new());
//! let mut scene = SceneGraph::new();
//! let root = scene.create_node("root");
//! scene.add_scene_manager(root);
//!
//! let mut buffer = VertexBuffer::new(context.as_ref(), vec![0.0, 1.0, 0.0]);
//! buffer.add_attribute(ATTR_POSITION, 3);
//! let mut geometry = Geometry::new();
//! geometry.add_buffer(buffer);
//! let mesh = scene.create_node("mesh");
//! scene.set_surface(mesh, Surface::new(geometry));
//!
//! // 组件：挂到根上，网格加入后每帧驱动
//! let mut skinning = Skinning::new(
//!     Arc::new(skin),
//!     SkinMethod::Software,
//!     context,
//!     clock.clone(),
//! ).unwrap();
//! skinning.add_target(&mut scene, root).unwrap();
//! scene.add_child(root, mesh);
//!
//! clock.set(0.1);
//! scene.begin_frame(root);
//! skinning.process(&mut scene).unwrap();
//! ```

pub mod bone_buffer;
pub mod method;
pub mod skin;
pub mod skinning;

pub use bone_buffer::{
    build_bone_vertex_buffer, pack_bone_vertex_data, ATTR_BONE_IDS_A, ATTR_BONE_IDS_B,
    ATTR_BONE_WEIGHTS_A, ATTR_BONE_WEIGHTS_B, BONE_VERTEX_SIZE, MAX_BONES_PER_VERTEX,
};
pub use method::SkinMethod;
pub use skin::{BoneInfluence, Skin};
pub use skinning::{Skinning, ATTR_NORMAL, ATTR_POSITION};
