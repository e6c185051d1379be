//! 骨骼顶点缓冲区构建
//!
//! 把每个顶点的骨骼 id 与权重打包进固定跨度的 GPU 属性缓冲区：
//! 每顶点 16 个 float，四个 4 分量属性，float 偏移 0/4/8/12。
//! 未使用的槽位填零。硬件蒙皮激活时在初始化阶段构建一次，
//! 之后按引用共享给所有绑定目标。

use crate::animation::skin::Skin;
use crate::render::context::RenderContext;
use crate::render::vertex_buffer::VertexBuffer;

/// 硬件路径支持的每顶点最大骨骼影响数
pub const MAX_BONES_PER_VERTEX: usize = 8;

/// 骨骼缓冲区的每顶点 float 数
pub const BONE_VERTEX_SIZE: usize = 16;

pub const ATTR_BONE_IDS_A: &str = "bone_ids_a";
pub const ATTR_BONE_IDS_B: &str = "bone_ids_b";
pub const ATTR_BONE_WEIGHTS_A: &str = "bone_weights_a";
pub const ATTR_BONE_WEIGHTS_B: &str = "bone_weights_b";

/// 打包骨骼 id/权重数据
///
/// 布局（每顶点）：`[id0..id3] [id4..id7] [w0..w3] [w4..w7]`
pub fn pack_bone_vertex_data(skin: &Skin) -> Vec<f32> {
    let num_vertices = skin.num_vertices();
    let mut data = vec![0.0f32; num_vertices * BONE_VERTEX_SIZE];

    let mut index = 0;
    for vertex_id in 0..num_vertices {
        let num_vertex_bones = skin.num_vertex_bones(vertex_id).min(MAX_BONES_PER_VERTEX);

        for slot in 0..num_vertex_bones {
            data[index + slot] = skin.vertex_bone_id(vertex_id, slot) as f32;
        }
        index += BONE_VERTEX_SIZE / 2;

        for slot in 0..num_vertex_bones {
            data[index + slot] = skin.vertex_bone_weight(vertex_id, slot);
        }
        index += BONE_VERTEX_SIZE / 2;
    }

    data
}

/// 构建共享的骨骼顶点缓冲区并上传一次
pub fn build_bone_vertex_buffer(skin: &Skin, context: &dyn RenderContext) -> VertexBuffer {
    debug_assert!(skin.max_vertex_bones() <= MAX_BONES_PER_VERTEX);

    let mut buffer = VertexBuffer::new(context, pack_bone_vertex_data(skin));
    buffer.add_attribute(ATTR_BONE_IDS_A, 4);
    buffer.add_attribute(ATTR_BONE_IDS_B, 4);
    buffer.add_attribute(ATTR_BONE_WEIGHTS_A, 4);
    buffer.add_attribute(ATTR_BONE_WEIGHTS_B, 4);

    buffer.upload(context);
    buffer
}
