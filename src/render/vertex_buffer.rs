//! 顶点缓冲区抽象
//!
//! 一个缓冲区持有交错存放的 f32 数据和若干命名属性。
//! 属性偏移以 float 为单位，顶点跨度等于所有属性大小之和。

use crate::render::context::{BufferId, RenderContext};

/// 顶点属性描述
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VertexAttribute {
    /// 属性名称
    pub name: String,
    /// 分量个数（float 数）
    pub size: usize,
    /// 在一个顶点内的 float 偏移
    pub offset: usize,
}

/// 顶点缓冲区
#[derive(Debug, Clone)]
pub struct VertexBuffer {
    id: BufferId,
    attributes: Vec<VertexAttribute>,
    vertex_size: usize,
    data: Vec<f32>,
}

impl VertexBuffer {
    /// 创建缓冲区并向上下文申请句柄
    pub fn new(context: &dyn RenderContext, data: Vec<f32>) -> Self {
        Self {
            id: context.create_buffer(),
            attributes: Vec::new(),
            vertex_size: 0,
            data,
        }
    }

    /// 追加一个属性，偏移紧跟在已有属性之后
    pub fn add_attribute(&mut self, name: impl Into<String>, size: usize) {
        let offset = self.vertex_size;
        self.attributes.push(VertexAttribute {
            name: name.into(),
            size,
            offset,
        });
        self.vertex_size += size;
    }

    pub fn id(&self) -> BufferId {
        self.id
    }

    pub fn attributes(&self) -> &[VertexAttribute] {
        &self.attributes
    }

    /// 按名称查找属性
    pub fn attribute(&self, name: &str) -> Option<&VertexAttribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }

    /// 顶点跨度（float 数）
    pub fn vertex_size(&self) -> usize {
        self.vertex_size
    }

    /// 顶点数量
    pub fn num_vertices(&self) -> usize {
        if self.vertex_size == 0 {
            0
        } else {
            self.data.len() / self.vertex_size
        }
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// 把当前 CPU 侧数据推送给渲染上下文
    pub fn upload(&self, context: &dyn RenderContext) {
        context.upload(self.id, bytemuck::cast_slice(&self.data));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::context::HeadlessContext;

    #[test]
    fn test_attribute_offsets() {
        let context = HeadlessContext::new();
        let mut buffer = VertexBuffer::new(&context, vec![0.0; 32]);

        buffer.add_attribute("position", 3);
        buffer.add_attribute("normal", 3);
        buffer.add_attribute("uv", 2);

        assert_eq!(buffer.vertex_size(), 8);
        assert_eq!(buffer.num_vertices(), 4);

        let normal = buffer.attribute("normal").unwrap();
        assert_eq!(normal.offset, 3);
        assert_eq!(normal.size, 3);

        let uv = buffer.attribute("uv").unwrap();
        assert_eq!(uv.offset, 6);
    }

    #[test]
    fn test_upload_pushes_bytes() {
        let context = HeadlessContext::new();
        let mut buffer = VertexBuffer::new(&context, vec![1.0, 2.0, 3.0]);
        buffer.add_attribute("position", 3);

        buffer.upload(&context);

        assert_eq!(context.upload_count(buffer.id()), 1);
        assert_eq!(context.last_upload_len(buffer.id()), 12);
    }

    #[test]
    fn test_missing_attribute() {
        let context = HeadlessContext::new();
        let buffer = VertexBuffer::new(&context, vec![]);
        assert!(!buffer.has_attribute("position"));
        assert_eq!(buffer.num_vertices(), 0);
    }
}
