//! 渲染上下文接口
//!
//! 蒙皮子系统只需要两个上下文能力：分配缓冲区句柄和上传缓冲区数据。
//! 真实的实现会把上传转发给 `queue.write_buffer` 之类的 GPU 调用；
//! [`HeadlessContext`] 则在无设备环境下记录上传次数，供工具与测试使用。

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// GPU 缓冲区句柄
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferId(pub u64);

/// 渲染上下文接口
pub trait RenderContext: Send + Sync {
    /// 分配一个新的缓冲区句柄
    fn create_buffer(&self) -> BufferId;

    /// 上传缓冲区数据（幂等，覆盖整个缓冲区内容）
    fn upload(&self, buffer: BufferId, bytes: &[u8]);
}

/// 无设备上下文 - 记录每个缓冲区的上传次数与最后一次上传的字节数
pub struct HeadlessContext {
    next_id: AtomicU64,
    uploads: Mutex<HashMap<BufferId, UploadRecord>>,
}

#[derive(Debug, Clone, Default)]
struct UploadRecord {
    count: usize,
    last_len: usize,
}

impl HeadlessContext {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            uploads: Mutex::new(HashMap::new()),
        }
    }

    /// 指定缓冲区的累计上传次数
    pub fn upload_count(&self, buffer: BufferId) -> usize {
        self.uploads
            .lock()
            .map(|records| records.get(&buffer).map(|r| r.count).unwrap_or(0))
            .unwrap_or(0)
    }

    /// 指定缓冲区最后一次上传的字节数
    pub fn last_upload_len(&self, buffer: BufferId) -> usize {
        self.uploads
            .lock()
            .map(|records| records.get(&buffer).map(|r| r.last_len).unwrap_or(0))
            .unwrap_or(0)
    }

    /// 所有缓冲区的累计上传次数
    pub fn total_uploads(&self) -> usize {
        self.uploads
            .lock()
            .map(|records| records.values().map(|r| r.count).sum())
            .unwrap_or(0)
    }
}

impl Default for HeadlessContext {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderContext for HeadlessContext {
    fn create_buffer(&self) -> BufferId {
        BufferId(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    fn upload(&self, buffer: BufferId, bytes: &[u8]) {
        if let Ok(mut records) = self.uploads.lock() {
            let record = records.entry(buffer).or_default();
            record.count += 1;
            record.last_len = bytes.len();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_ids_unique() {
        let context = HeadlessContext::new();
        let a = context.create_buffer();
        let b = context.create_buffer();
        assert_ne!(a, b);
    }

    #[test]
    fn test_upload_recording() {
        let context = HeadlessContext::new();
        let buffer = context.create_buffer();

        assert_eq!(context.upload_count(buffer), 0);

        context.upload(buffer, &[0u8; 12]);
        context.upload(buffer, &[0u8; 24]);

        assert_eq!(context.upload_count(buffer), 2);
        assert_eq!(context.last_upload_len(buffer), 24);
        assert_eq!(context.total_uploads(), 2);
    }
}
