//! 统一错误处理模块
//!
//! 提供蒙皮子系统范围内的统一错误类型定义。
//!
//! ## 错误分类
//!
//! - **构造错误**: 蒙皮数据本身不可用（顶点数或骨骼数为零）
//! - **数据错误**: 帧矩阵数组长度与骨骼数不匹配
//! - **场景错误**: 同一个蒙皮组件跨越了两个独立场景

use thiserror::Error;

/// 蒙皮子系统错误类型
#[derive(Error, Debug)]
pub enum SkinningError {
    #[error("Invalid skin data: {0}")]
    InvalidSkin(String),

    #[error("Bone matrix array has {actual} floats, expected {expected} (16 x numBones)")]
    FrameSize { expected: usize, actual: usize },

    #[error("Vertex index {vertex} out of range (skin has {num_vertices} vertices)")]
    VertexOutOfRange { vertex: usize, num_vertices: usize },

    #[error("Skinning component cannot be in two separate scenes")]
    MultipleScenes,
}

/// 蒙皮子系统结果类型
pub type SkinningResult<T> = Result<T, SkinningError>;
