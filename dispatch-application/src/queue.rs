use crate::registration::BoxAnySend;
use std::any::{Any, TypeId};
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// 队列中的一条待分发事件（载荷已类型擦除）
pub(crate) struct PendingEvent {
    pub(crate) event_type: TypeId,
    pub(crate) event_name: &'static str,
    pub(crate) payload: BoxAnySend,
}

impl PendingEvent {
    pub(crate) fn new<E: Any + Send>(event_name: &'static str, event: E) -> Self {
        Self {
            event_type: TypeId::of::<E>(),
            event_name,
            payload: Box::new(event),
        }
    }
}

impl fmt::Debug for PendingEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingEvent")
            .field("event_name", &self.event_name)
            .finish_non_exhaustive()
    }
}

/// 待分发事件队列
///
/// - 两次提交之间只追加；
/// - `take` 原子地换出当前序列并留下一个空序列，分发期间新入队的事件落在新序列中；
/// - 锁只在 push/换出/回填时短暂持有，绝不跨越 `.await`。
#[derive(Debug)]
pub(crate) struct PendingQueue {
    inner: Mutex<Vec<PendingEvent>>,
    capacity: usize,
}

impl PendingQueue {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(Vec::with_capacity(capacity)),
            capacity,
        }
    }

    // 队列操作不会留下中间状态，锁中毒时直接取回数据
    fn lock(&self) -> MutexGuard<'_, Vec<PendingEvent>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// 追加到队尾，返回追加后的长度
    pub(crate) fn push(&self, event: PendingEvent) -> usize {
        let mut guard = self.lock();
        guard.push(event);
        guard.len()
    }

    /// 换出当前序列；队列为空时不分配，原缓冲区保留给后续入队
    pub(crate) fn take(&self) -> Vec<PendingEvent> {
        let mut guard = self.lock();
        if guard.is_empty() {
            return Vec::new();
        }
        std::mem::replace(&mut *guard, Vec::with_capacity(self.capacity))
    }

    /// 把未分发的事件按原顺序放回队首（排在提交期间新入队的事件之前）
    pub(crate) fn restore_front(&self, events: Vec<PendingEvent>) {
        if events.is_empty() {
            return;
        }
        let mut guard = self.lock();
        guard.splice(0..0, events);
    }

    pub(crate) fn len(&self) -> usize {
        self.lock().len()
    }
}
