//! 蒙皮方式

use serde::{Deserialize, Serialize};

/// 蒙皮方式
///
/// 两种硬件变体共享同一条代码路径；区别只在着色器侧如何消费
/// 骨骼属性，本子系统不做区分。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkinMethod {
    /// CPU 变换顶点并重新上传网格缓冲区
    Software,
    /// GPU 蒙皮，每顶点单骨骼
    HardwareSingleBone,
    /// GPU 蒙皮，每顶点多骨骼
    HardwareMultiBone,
}

impl SkinMethod {
    /// 是否走硬件路径
    pub fn is_hardware(self) -> bool {
        !matches!(self, SkinMethod::Software)
    }
}
