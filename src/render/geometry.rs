//! 几何体抽象
//!
//! 一个几何体由若干自有顶点缓冲区、若干共享顶点缓冲区（例如
//! 所有蒙皮目标共用的骨骼缓冲区）和一个小型数据存储组成。
//! 数据存储把蒙皮专用的两个字段保存为显式的子结构，同时仍按
//! 字符串键向着色器绑定层暴露通用的读取视图。

use std::collections::HashMap;
use std::sync::Arc;

use crate::render::vertex_buffer::VertexBuffer;

/// 硬件蒙皮绑定数据：骨骼数量 + 当前帧骨骼矩阵数组引用
#[derive(Debug, Clone)]
pub struct BoneBindings {
    /// 骨骼数量（安装时为 0，每帧由蒙皮组件更新）
    pub num_bones: usize,
    /// 当前帧展平的行主序骨骼矩阵（16 x num_bones 个 float）
    pub matrices: Arc<[f32]>,
}

impl BoneBindings {
    /// 安装时的空绑定
    pub fn empty() -> Self {
        Self {
            num_bones: 0,
            matrices: Arc::from(Vec::new()),
        }
    }
}

/// 数据存储的标签化取值
#[derive(Debug, Clone)]
pub enum DataValue {
    Int(i64),
    Floats(Arc<[f32]>),
}

/// 几何体级别的命名数据存储
#[derive(Debug, Clone, Default)]
pub struct GeometryData {
    bone_bindings: Option<BoneBindings>,
    values: HashMap<String, DataValue>,
}

impl GeometryData {
    /// 骨骼数量字段的通用键名
    pub const KEY_NUM_BONES: &'static str = "geometry.num_bones";
    /// 骨骼矩阵字段的通用键名
    pub const KEY_BONE_MATRICES: &'static str = "geometry.bone_matrices";

    pub fn new() -> Self {
        Self::default()
    }

    /// 通用读取；两个蒙皮字段从子结构合成
    pub fn get(&self, key: &str) -> Option<DataValue> {
        match key {
            Self::KEY_NUM_BONES => self
                .bone_bindings
                .as_ref()
                .map(|b| DataValue::Int(b.num_bones as i64)),
            Self::KEY_BONE_MATRICES => self
                .bone_bindings
                .as_ref()
                .map(|b| DataValue::Floats(b.matrices.clone())),
            _ => self.values.get(key).cloned(),
        }
    }

    /// 通用写入（蒙皮字段请使用类型化接口）
    pub fn set(&mut self, key: impl Into<String>, value: DataValue) {
        self.values.insert(key.into(), value);
    }

    /// 通用删除
    pub fn unset(&mut self, key: &str) {
        self.values.remove(key);
    }

    pub fn bone_bindings(&self) -> Option<&BoneBindings> {
        self.bone_bindings.as_ref()
    }

    /// 安装空的骨骼绑定字段（硬件蒙皮绑定目标时调用）
    pub fn install_bone_bindings(&mut self) {
        self.bone_bindings = Some(BoneBindings::empty());
    }

    /// 发布当前帧的骨骼数量与矩阵引用
    pub fn set_bone_bindings(&mut self, num_bones: usize, matrices: Arc<[f32]>) {
        self.bone_bindings = Some(BoneBindings {
            num_bones,
            matrices,
        });
    }

    /// 清除骨骼绑定字段（解绑目标时调用）
    pub fn clear_bone_bindings(&mut self) {
        self.bone_bindings = None;
    }
}

/// 几何体
#[derive(Debug, Clone, Default)]
pub struct Geometry {
    buffers: Vec<VertexBuffer>,
    shared_buffers: Vec<Arc<VertexBuffer>>,
    data: GeometryData,
}

impl Geometry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加自有缓冲区（网格本身的属性数据）
    pub fn add_buffer(&mut self, buffer: VertexBuffer) {
        self.buffers.push(buffer);
    }

    /// 附加共享缓冲区（按引用共享，不复制数据）
    pub fn add_shared_buffer(&mut self, buffer: Arc<VertexBuffer>) {
        self.shared_buffers.push(buffer);
    }

    /// 按指针身份移除共享缓冲区
    pub fn remove_shared_buffer(&mut self, buffer: &Arc<VertexBuffer>) {
        self.shared_buffers.retain(|b| !Arc::ptr_eq(b, buffer));
    }

    pub fn shared_buffers(&self) -> &[Arc<VertexBuffer>] {
        &self.shared_buffers
    }

    /// 属性是否存在（自有与共享缓冲区都参与查找）
    pub fn has_attribute(&self, name: &str) -> bool {
        self.buffers.iter().any(|b| b.has_attribute(name))
            || self.shared_buffers.iter().any(|b| b.has_attribute(name))
    }

    /// 指定属性所在缓冲区的顶点数
    pub fn attribute_num_vertices(&self, name: &str) -> Option<usize> {
        self.buffer_with_attribute(name)
            .map(|b| b.num_vertices())
            .or_else(|| {
                self.shared_buffers
                    .iter()
                    .find(|b| b.has_attribute(name))
                    .map(|b| b.num_vertices())
            })
    }

    /// 持有指定属性的自有缓冲区
    pub fn buffer_with_attribute(&self, name: &str) -> Option<&VertexBuffer> {
        self.buffers.iter().find(|b| b.has_attribute(name))
    }

    /// 持有指定属性的自有缓冲区（可变，软件蒙皮写回用）
    pub fn buffer_with_attribute_mut(&mut self, name: &str) -> Option<&mut VertexBuffer> {
        self.buffers.iter_mut().find(|b| b.has_attribute(name))
    }

    pub fn data(&self) -> &GeometryData {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut GeometryData {
        &mut self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::context::HeadlessContext;

    fn make_buffer(context: &HeadlessContext, attr: &str, size: usize, verts: usize) -> VertexBuffer {
        let mut buffer = VertexBuffer::new(context, vec![0.0; size * verts]);
        buffer.add_attribute(attr, size);
        buffer
    }

    #[test]
    fn test_attribute_lookup() {
        let context = HeadlessContext::new();
        let mut geometry = Geometry::new();
        geometry.add_buffer(make_buffer(&context, "position", 3, 4));

        assert!(geometry.has_attribute("position"));
        assert!(!geometry.has_attribute("normal"));
        assert_eq!(geometry.attribute_num_vertices("position"), Some(4));
    }

    #[test]
    fn test_shared_buffer_add_remove() {
        let context = HeadlessContext::new();
        let mut geometry = Geometry::new();
        let shared = Arc::new(make_buffer(&context, "bone_ids_a", 4, 2));

        geometry.add_shared_buffer(shared.clone());
        assert!(geometry.has_attribute("bone_ids_a"));
        assert_eq!(geometry.attribute_num_vertices("bone_ids_a"), Some(2));

        geometry.remove_shared_buffer(&shared);
        assert!(!geometry.has_attribute("bone_ids_a"));
    }

    #[test]
    fn test_bone_bindings_generic_view() {
        let mut data = GeometryData::new();
        assert!(data.get(GeometryData::KEY_NUM_BONES).is_none());

        data.install_bone_bindings();
        match data.get(GeometryData::KEY_NUM_BONES) {
            Some(DataValue::Int(n)) => assert_eq!(n, 0),
            other => panic!("unexpected value: {:?}", other),
        }

        let matrices: Arc<[f32]> = Arc::from(vec![0.0; 32]);
        data.set_bone_bindings(2, matrices);
        match data.get(GeometryData::KEY_BONE_MATRICES) {
            Some(DataValue::Floats(m)) => assert_eq!(m.len(), 32),
            other => panic!("unexpected value: {:?}", other),
        }

        data.clear_bone_bindings();
        assert!(data.get(GeometryData::KEY_BONE_MATRICES).is_none());
    }

    #[test]
    fn test_generic_values() {
        let mut data = GeometryData::new();
        data.set("material.id", DataValue::Int(7));

        match data.get("material.id") {
            Some(DataValue::Int(7)) => {}
            other => panic!("unexpected value: {:?}", other),
        }

        data.unset("material.id");
        assert!(data.get("material.id").is_none());
    }
}
