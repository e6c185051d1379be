//! 类型化事件信号
//!
//! 观察者模式的最小实现：订阅方持有显式的 `Receiver` 句柄，
//! 丢弃句柄即确定性退订；发送方在广播时清理已断开的通道。
//! 事件在调用方的单线程更新流程内同步投递与消费。

use crossbeam_channel::{unbounded, Receiver, Sender};

use crate::scene::graph::NodeId;

/// 节点增删事件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneEvent {
    /// 节点被挂到某个父节点下
    NodeAdded { node: NodeId, parent: NodeId },
    /// 节点从父节点摘除
    NodeRemoved { node: NodeId, parent: NodeId },
}

/// 帧开始事件（由场景管理器所在的根节点发出）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameEvent {
    /// 发出本帧信号的场景管理器节点
    pub manager: NodeId,
}

/// 广播信号
#[derive(Debug)]
pub struct Signal<T> {
    senders: Vec<Sender<T>>,
}

impl<T: Clone> Signal<T> {
    pub fn new() -> Self {
        Self {
            senders: Vec::new(),
        }
    }

    /// 订阅信号，返回接收句柄；丢弃句柄即退订
    pub fn connect(&mut self) -> Receiver<T> {
        let (sender, receiver) = unbounded();
        self.senders.push(sender);
        receiver
    }

    /// 同步广播给所有存活的订阅者
    pub fn emit(&mut self, event: T) {
        self.senders.retain(|s| s.send(event.clone()).is_ok());
    }

    /// 当前存活的订阅者数量（广播后更新）
    pub fn num_listeners(&self) -> usize {
        self.senders.len()
    }
}

impl<T: Clone> Default for Signal<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_and_emit() {
        let mut signal = Signal::new();
        let rx = signal.connect();

        signal.emit(42u32);
        signal.emit(43u32);

        assert_eq!(rx.try_recv().unwrap(), 42);
        assert_eq!(rx.try_recv().unwrap(), 43);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_drop_unsubscribes() {
        let mut signal = Signal::new();
        let rx1 = signal.connect();
        let rx2 = signal.connect();

        drop(rx1);
        signal.emit(1u32);

        assert_eq!(signal.num_listeners(), 1);
        assert_eq!(rx2.try_recv().unwrap(), 1);
    }

    #[test]
    fn test_emit_without_listeners() {
        let mut signal: Signal<u32> = Signal::new();
        signal.emit(7);
        assert_eq!(signal.num_listeners(), 0);
    }
}
