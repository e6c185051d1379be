//! 核心模块
//!
//! 提供蒙皮子系统的错误类型与时钟抽象。

pub mod error;
pub mod time;

pub use error::{SkinningError, SkinningResult};
pub use time::{Clock, ManualClock, SystemClock};
