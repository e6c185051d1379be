//! 渲染抽象模块
//!
//! 提供渲染上下文接口、顶点缓冲区与几何体抽象。
//! 真正的 GPU 设备创建与绘制提交不在本子系统范围内，
//! 上传操作通过 [`RenderContext`] 接口交给外部实现。

pub mod context;
pub mod geometry;
pub mod vertex_buffer;

pub use context::{BufferId, HeadlessContext, RenderContext};
pub use geometry::{BoneBindings, DataValue, Geometry, GeometryData};
pub use vertex_buffer::{VertexAttribute, VertexBuffer};
