//! 蒙皮数据
//!
//! 每个顶点的骨骼影响列表加上逐帧采样好的骨骼矩阵数组。
//! 矩阵以行主序展平存放（每骨骼 16 个 float），帧数据用
//! `Arc<[f32]>` 持有，硬件路径发布引用时无需复制。

use std::sync::Arc;

use glam::Mat4;

use crate::core::error::{SkinningError, SkinningResult};

/// 单个骨骼影响
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoneInfluence {
    pub bone_id: u32,
    pub weight: f32,
}

/// 蒙皮数据
#[derive(Debug, Clone)]
pub struct Skin {
    num_bones: usize,
    duration: f32,
    // 每顶点的影响列表
    influences: Vec<Vec<BoneInfluence>>,
    max_vertex_bones: usize,
    frames: Vec<Arc<[f32]>>,
}

impl Skin {
    pub fn new(num_bones: usize, num_vertices: usize, duration: f32) -> Self {
        Self {
            num_bones,
            duration,
            influences: vec![Vec::new(); num_vertices],
            max_vertex_bones: 0,
            frames: Vec::new(),
        }
    }

    pub fn num_bones(&self) -> usize {
        self.num_bones
    }

    pub fn num_vertices(&self) -> usize {
        self.influences.len()
    }

    pub fn num_frames(&self) -> usize {
        self.frames.len()
    }

    /// 动画时长（秒）
    pub fn duration(&self) -> f32 {
        self.duration
    }

    /// 所有顶点中最大的影响骨骼数
    pub fn max_vertex_bones(&self) -> usize {
        self.max_vertex_bones
    }

    /// 设置某个顶点的骨骼影响列表
    pub fn set_vertex_influences(
        &mut self,
        vertex_id: usize,
        influences: &[(u32, f32)],
    ) -> SkinningResult<()> {
        let num_vertices = self.influences.len();
        let slot = self.influences.get_mut(vertex_id).ok_or(
            SkinningError::VertexOutOfRange {
                vertex: vertex_id,
                num_vertices,
            },
        )?;

        *slot = influences
            .iter()
            .map(|&(bone_id, weight)| BoneInfluence { bone_id, weight })
            .collect();
        self.max_vertex_bones = self.max_vertex_bones.max(influences.len());
        Ok(())
    }

    /// 某个顶点的影响骨骼数
    pub fn num_vertex_bones(&self, vertex_id: usize) -> usize {
        self.influences
            .get(vertex_id)
            .map(|v| v.len())
            .unwrap_or(0)
    }

    pub fn vertex_bone_id(&self, vertex_id: usize, slot: usize) -> u32 {
        self.vertex_bone_data(vertex_id, slot)
            .map(|i| i.bone_id)
            .unwrap_or(0)
    }

    pub fn vertex_bone_weight(&self, vertex_id: usize, slot: usize) -> f32 {
        self.vertex_bone_data(vertex_id, slot)
            .map(|i| i.weight)
            .unwrap_or(0.0)
    }

    /// 顶点第 slot 个影响的 (骨骼 id, 权重)
    pub fn vertex_bone_data(&self, vertex_id: usize, slot: usize) -> Option<BoneInfluence> {
        self.influences
            .get(vertex_id)
            .and_then(|v| v.get(slot))
            .copied()
    }

    /// 追加一帧展平的行主序骨骼矩阵，长度必须是 16 x num_bones
    pub fn add_frame(&mut self, matrices: Vec<f32>) -> SkinningResult<()> {
        let expected = 16 * self.num_bones;
        if matrices.len() != expected {
            return Err(SkinningError::FrameSize {
                expected,
                actual: matrices.len(),
            });
        }
        self.frames.push(Arc::from(matrices));
        Ok(())
    }

    /// 用 `glam::Mat4` 追加一帧，内部展平为行主序
    pub fn add_frame_matrices(&mut self, matrices: &[Mat4]) -> SkinningResult<()> {
        let mut flat = Vec::with_capacity(matrices.len() * 16);
        for m in matrices {
            // glam 是列主序，转置后按列读出即为行主序
            flat.extend_from_slice(&m.transpose().to_cols_array());
        }
        self.add_frame(flat)
    }

    /// 指定帧的展平矩阵数组
    pub fn matrices(&self, frame_id: usize) -> Option<&Arc<[f32]>> {
        self.frames.get(frame_id)
    }

    /// 把经过的时间映射为离散帧号
    ///
    /// 映射在时长上线性均分：确定性、随时间单调不减，并且不做
    /// 回绕——超出 `num_frames - 1` 的结果由调用方决定如何处理
    /// （帧驱动器保持最后一个有效姿态）。
    pub fn frame_id(&self, elapsed: f32) -> usize {
        if self.duration <= 0.0 || self.frames.is_empty() || elapsed <= 0.0 {
            return 0;
        }
        (elapsed * self.frames.len() as f32 / self.duration).floor() as usize
    }
}
