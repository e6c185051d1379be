//! 蒙皮组件
//!
//! 订阅目标子树的节点增删事件与场景管理器的帧开始信号，维护每个
//! 绑定目标的起始时间和绑定姿态快照，并在每帧把骨骼矩阵应用到
//! 目标几何体上：硬件路径只发布骨骼数量与矩阵引用，软件路径在
//! CPU 上完成逐顶点的加权矩阵混合并重新上传顶点缓冲区。

use std::collections::HashMap;
use std::sync::Arc;

use crossbeam_channel::Receiver;

use crate::animation::bone_buffer::{build_bone_vertex_buffer, MAX_BONES_PER_VERTEX};
use crate::animation::method::SkinMethod;
use crate::animation::skin::Skin;
use crate::config::SkinningConfig;
use crate::core::error::{SkinningError, SkinningResult};
use crate::core::time::Clock;
use crate::render::context::RenderContext;
use crate::render::geometry::Geometry;
use crate::render::vertex_buffer::VertexBuffer;
use crate::scene::events::{FrameEvent, SceneEvent};
use crate::scene::graph::{NodeId, SceneGraph};

/// 位置属性名
pub const ATTR_POSITION: &str = "position";
/// 法线属性名
pub const ATTR_NORMAL: &str = "normal";

// 低于该时长的动画视为退化数据，不绑定任何目标
const MIN_ANIMATION_DURATION: f32 = 1e-6;

/// 每个绑定目标的簿记
struct TargetBinding {
    /// 绑定时刻（注入时钟的读数）
    start_time: f32,
    /// 位置缓冲区的绑定姿态快照（整个交错缓冲区的原始数据）
    input_positions: Vec<f32>,
    /// 法线缓冲区的绑定姿态快照（法线合格时才有）
    input_normals: Option<Vec<f32>>,
}

/// 蒙皮组件
pub struct Skinning {
    skin: Arc<Skin>,
    context: Arc<dyn RenderContext>,
    clock: Arc<dyn Clock>,
    method: SkinMethod,
    bind_normals: bool,
    bone_buffer: Option<Arc<VertexBuffer>>,
    targets: Vec<NodeId>,
    bindings: HashMap<NodeId, TargetBinding>,
    node_events: Option<Receiver<SceneEvent>>,
    frame_slot: Option<(NodeId, Receiver<FrameEvent>)>,
}

impl std::fmt::Debug for Skinning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Skinning")
            .field("method", &self.method)
            .field("bind_normals", &self.bind_normals)
            .field("targets", &self.targets)
            .finish_non_exhaustive()
    }
}

impl Skinning {
    /// 创建蒙皮组件
    ///
    /// 请求硬件路径但蒙皮的每顶点骨骼数超过硬件属性布局上限时，
    /// 记录警告并降级为软件蒙皮。解析后的方式不是软件蒙皮时构建
    /// 一次共享骨骼顶点缓冲区。
    pub fn new(
        skin: Arc<Skin>,
        method: SkinMethod,
        context: Arc<dyn RenderContext>,
        clock: Arc<dyn Clock>,
    ) -> SkinningResult<Self> {
        if skin.num_vertices() == 0 {
            return Err(SkinningError::InvalidSkin("skin has no vertices".into()));
        }
        if skin.num_bones() == 0 {
            return Err(SkinningError::InvalidSkin("skin has no bones".into()));
        }

        let mut method = method;
        if method.is_hardware() && skin.max_vertex_bones() > MAX_BONES_PER_VERTEX {
            tracing::warn!(
                target: "skinning",
                "skin requires {} bones per vertex, hardware path allows at most {}; \
                 falling back to software skinning",
                skin.max_vertex_bones(),
                MAX_BONES_PER_VERTEX
            );
            method = SkinMethod::Software;
        }

        let bone_buffer = if method.is_hardware() {
            Some(Arc::new(build_bone_vertex_buffer(&skin, context.as_ref())))
        } else {
            None
        };

        Ok(Self {
            skin,
            context,
            clock,
            method,
            bind_normals: true,
            bone_buffer,
            targets: Vec::new(),
            bindings: HashMap::new(),
            node_events: None,
            frame_slot: None,
        })
    }

    /// 按配置创建蒙皮组件
    pub fn from_config(
        skin: Arc<Skin>,
        config: &SkinningConfig,
        context: Arc<dyn RenderContext>,
        clock: Arc<dyn Clock>,
    ) -> SkinningResult<Self> {
        let mut skinning = Self::new(skin, config.method, context, clock)?;
        skinning.bind_normals = config.bind_normals;
        Ok(skinning)
    }

    /// 解析后的蒙皮方式（可能已被降级）
    pub fn method(&self) -> SkinMethod {
        self.method
    }

    /// 共享骨骼顶点缓冲区（软件蒙皮时为 None）
    pub fn bone_buffer(&self) -> Option<&Arc<VertexBuffer>> {
        self.bone_buffer.as_ref()
    }

    /// 节点当前是否已绑定
    pub fn is_bound(&self, node: NodeId) -> bool {
        self.bindings.contains_key(&node)
    }

    /// 节点的绑定起始时间
    pub fn start_time(&self, node: NodeId) -> Option<f32> {
        self.bindings.get(&node).map(|b| b.start_time)
    }

    /// 节点的绑定姿态位置快照
    pub fn bind_pose_positions(&self, node: NodeId) -> Option<&[f32]> {
        self.bindings.get(&node).map(|b| b.input_positions.as_slice())
    }

    // ------------------------------------------------------------------
    // 目标绑定状态机
    // ------------------------------------------------------------------

    /// 把组件挂到一个目标节点上
    ///
    /// 接通节点增删事件订阅，并重新解析生效的场景管理器。
    /// 目标可达的场景管理器根多于一个时返回
    /// [`SkinningError::MultipleScenes`]。
    pub fn add_target(&mut self, scene: &mut SceneGraph, target: NodeId) -> SkinningResult<()> {
        if !self.targets.contains(&target) {
            self.targets.push(target);
        }
        if self.node_events.is_none() {
            self.node_events = Some(scene.connect_node_events());
        }
        self.find_scene_manager(scene)
    }

    /// 把组件从一个目标节点上摘下
    pub fn remove_target(&mut self, scene: &mut SceneGraph, target: NodeId) -> SkinningResult<()> {
        self.targets.retain(|&t| t != target);
        if self.targets.is_empty() {
            self.node_events = None;
        }
        self.find_scene_manager(scene)
    }

    /// 处理积压的场景事件与帧信号
    ///
    /// 由调用方的更新线程每帧调用一次；事件按投递顺序同步处理。
    pub fn process(&mut self, scene: &mut SceneGraph) -> SkinningResult<()> {
        let mut events = Vec::new();
        if let Some(rx) = &self.node_events {
            while let Ok(event) = rx.try_recv() {
                events.push(event);
            }
        }
        for event in events {
            match event {
                SceneEvent::NodeAdded { node, .. } => self.handle_node_added(scene, node)?,
                SceneEvent::NodeRemoved { node, .. } => self.handle_node_removed(scene, node)?,
            }
        }

        let mut frames = 0;
        if let Some((_, rx)) = &self.frame_slot {
            while rx.try_recv().is_ok() {
                frames += 1;
            }
        }
        for _ in 0..frames {
            self.on_frame_begin(scene);
        }
        Ok(())
    }

    /// 重新解析生效的场景管理器
    ///
    /// 沿每个目标的父链走到根；找到多个带管理器的根是逻辑错误，
    /// 一个蒙皮组件不能横跨两个独立场景。找不到管理器时撤销帧
    /// 信号订阅，此后不再有任何更新。
    fn find_scene_manager(&mut self, scene: &mut SceneGraph) -> SkinningResult<()> {
        let mut managers: Vec<NodeId> = Vec::new();
        for &target in &self.targets {
            let root = scene.root_of(target);
            if scene.has_scene_manager(root) && !managers.contains(&root) {
                managers.push(root);
            }
        }

        if managers.len() > 1 {
            return Err(SkinningError::MultipleScenes);
        }

        match managers.first().copied() {
            Some(manager) => {
                let already = self
                    .frame_slot
                    .as_ref()
                    .map(|(m, _)| *m == manager)
                    .unwrap_or(false);
                if !already {
                    self.frame_slot = scene
                        .connect_frame_begin(manager)
                        .map(|rx| (manager, rx));
                }
            }
            None => self.frame_slot = None,
        }
        Ok(())
    }

    fn handle_node_added(&mut self, scene: &mut SceneGraph, node: NodeId) -> SkinningResult<()> {
        self.find_scene_manager(scene)?;

        // 退化动画：不绑定
        if self.skin.duration() < MIN_ANIMATION_DURATION {
            return Ok(());
        }
        if !self.targets.iter().any(|&t| scene.is_in_subtree(node, t)) {
            return Ok(());
        }

        self.bind_node(scene, node);
        Ok(())
    }

    fn handle_node_removed(&mut self, scene: &mut SceneGraph, node: NodeId) -> SkinningResult<()> {
        self.find_scene_manager(scene)?;
        self.unbind_node(scene, node);
        Ok(())
    }

    /// 绑定一个合格节点：位置属性存在且顶点数与蒙皮一致
    fn bind_node(&mut self, scene: &mut SceneGraph, node: NodeId) {
        let num_vertices = self.skin.num_vertices();

        let surface = match scene.surface_mut(node) {
            Some(surface) => surface,
            None => return,
        };
        let geometry = &mut surface.geometry;

        let input_positions = match geometry.buffer_with_attribute(ATTR_POSITION) {
            Some(buffer) if buffer.num_vertices() == num_vertices => buffer.data().to_vec(),
            _ => return,
        };

        let input_normals = if self.bind_normals {
            geometry
                .buffer_with_attribute(ATTR_NORMAL)
                .filter(|buffer| buffer.num_vertices() == num_vertices)
                .map(|buffer| buffer.data().to_vec())
        } else {
            None
        };

        if let Some(bone_buffer) = &self.bone_buffer {
            geometry.add_shared_buffer(bone_buffer.clone());
            geometry.data_mut().install_bone_bindings();
        }

        self.bindings.insert(
            node,
            TargetBinding {
                start_time: self.clock.now(),
                input_positions,
                input_normals,
            },
        );

        tracing::debug!(target: "skinning", "bound node {:?} ({} vertices)", node, num_vertices);
    }

    /// 解绑节点，无条件清掉该节点的全部簿记
    fn unbind_node(&mut self, scene: &mut SceneGraph, node: NodeId) {
        if self.bindings.remove(&node).is_none() {
            return;
        }

        if let Some(bone_buffer) = &self.bone_buffer {
            if let Some(surface) = scene.surface_mut(node) {
                surface.geometry.remove_shared_buffer(bone_buffer);
                surface.geometry.data_mut().clear_bone_bindings();
            }
        }
    }

    // ------------------------------------------------------------------
    // 帧驱动
    // ------------------------------------------------------------------

    /// 帧开始：为每个绑定目标计算帧号并派发变换
    fn on_frame_begin(&self, scene: &mut SceneGraph) {
        let now = self.clock.now();

        for (&node, binding) in &self.bindings {
            let frame_id = self.skin.frame_id(now - binding.start_time);
            // 帧号越界：保持最后一个有效姿态
            if frame_id >= self.skin.num_frames() {
                continue;
            }
            self.update_frame(scene, node, frame_id, binding);
        }
    }

    fn update_frame(
        &self,
        scene: &mut SceneGraph,
        node: NodeId,
        frame_id: usize,
        binding: &TargetBinding,
    ) {
        let matrices = match self.skin.matrices(frame_id) {
            Some(matrices) => matrices,
            None => return,
        };
        let surface = match scene.surface_mut(node) {
            Some(surface) => surface,
            None => return,
        };
        let geometry = &mut surface.geometry;

        if self.method.is_hardware() {
            // 纯元数据更新：着色器绑定层在绘制时读取这两个字段
            geometry
                .data_mut()
                .set_bone_bindings(self.skin.num_bones(), matrices.clone());
        } else {
            self.software_skin(geometry, binding, matrices);
        }
    }

    // ------------------------------------------------------------------
    // 软件蒙皮
    // ------------------------------------------------------------------

    fn software_skin(&self, geometry: &mut Geometry, binding: &TargetBinding, matrices: &[f32]) {
        if let Some(buffer) = geometry.buffer_with_attribute_mut(ATTR_POSITION) {
            self.software_skin_attribute(
                buffer,
                ATTR_POSITION,
                &binding.input_positions,
                matrices,
                false,
            );
        }

        if let Some(input_normals) = &binding.input_normals {
            if let Some(buffer) = geometry.buffer_with_attribute_mut(ATTR_NORMAL) {
                self.software_skin_attribute(buffer, ATTR_NORMAL, input_normals, matrices, true);
            }
        }
    }

    /// 对一种属性做逐顶点的加权矩阵混合
    ///
    /// 输入始终取自绑定姿态快照，保证每帧都从真实绑定姿态出发，
    /// 不会出现累积漂移。`delta_transform` 为真时只用矩阵的 3x3
    /// 线性块（法线变换不含平移，混合后也不重新归一化）。
    /// 没有任何骨骼影响的顶点累加器保持 (0,0,0)，不透传绑定姿态。
    fn software_skin_attribute(
        &self,
        buffer: &mut VertexBuffer,
        attr_name: &str,
        input: &[f32],
        matrices: &[f32],
        delta_transform: bool,
    ) {
        let offset = match buffer.attribute(attr_name) {
            Some(attr) => attr.offset,
            None => return,
        };
        let vertex_size = buffer.vertex_size();
        let num_vertices = buffer.num_vertices();

        // 快照与输出缓冲区布局一致才能按同一偏移寻址
        if input.len() != buffer.data().len() {
            return;
        }

        let output = buffer.data_mut();
        let mut index = offset;

        for vertex_id in 0..num_vertices {
            let x1 = input[index];
            let y1 = input[index + 1];
            let z1 = input[index + 2];

            let mut x2 = 0.0f32;
            let mut y2 = 0.0f32;
            let mut z2 = 0.0f32;

            for slot in 0..self.skin.num_vertex_bones(vertex_id) {
                let influence = match self.skin.vertex_bone_data(vertex_id, slot) {
                    Some(influence) => influence,
                    None => continue,
                };
                let m = &matrices[(influence.bone_id as usize) * 16..];
                let w = influence.weight;

                if delta_transform {
                    x2 += w * (m[0] * x1 + m[1] * y1 + m[2] * z1);
                    y2 += w * (m[4] * x1 + m[5] * y1 + m[6] * z1);
                    z2 += w * (m[8] * x1 + m[9] * y1 + m[10] * z1);
                } else {
                    x2 += w * (m[0] * x1 + m[1] * y1 + m[2] * z1 + m[3]);
                    y2 += w * (m[4] * x1 + m[5] * y1 + m[6] * z1 + m[7]);
                    z2 += w * (m[8] * x1 + m[9] * y1 + m[10] * z1 + m[11]);
                }
            }

            output[index] = x2;
            output[index + 1] = y2;
            output[index + 2] = z2;

            index += vertex_size;
        }

        // 每个属性缓冲区每帧一次上传
        buffer.upload(self.context.as_ref());
    }
}
