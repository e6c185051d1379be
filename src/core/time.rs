//! 时钟抽象
//!
//! 动画时间采样通过注入的时钟接口完成，测试中可以用手动时钟
//! 精确控制经过的时间。

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Instant;

/// 时间源接口（单位：秒）
pub trait Clock: Send + Sync {
    /// 当前时间（相对某个固定起点的秒数，单调不减）
    fn now(&self) -> f32;
}

/// 系统时钟 - 基于进程启动后的单调时间
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> f32 {
        self.origin.elapsed().as_secs_f32()
    }
}

/// 手动时钟 - 由调用方显式推进，用于确定性测试
pub struct ManualClock {
    // f32 以位模式存储，避免为单一浮点数引入锁
    seconds: AtomicU32,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            seconds: AtomicU32::new(0.0f32.to_bits()),
        }
    }

    /// 设置当前时间
    pub fn set(&self, seconds: f32) {
        self.seconds.store(seconds.to_bits(), Ordering::Relaxed);
    }

    /// 推进时间
    pub fn advance(&self, delta: f32) {
        let now = f32::from_bits(self.seconds.load(Ordering::Relaxed));
        self.set(now + delta);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f32 {
        f32::from_bits(self.seconds.load(Ordering::Relaxed))
    }
}
