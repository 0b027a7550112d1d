use crate::config::FailurePolicy;
use crate::error::DispatchError;
use crate::queue::{PendingEvent, PendingQueue};
use crate::registry::HandlerRegistry;
use dispatch_domain::DispatchContext;
use std::any::{Any, TypeId};
use std::fmt;
use tracing::{debug, error, trace, warn};

/// 通道类别：领域事件与事件各自独立注册、独立排队
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChannelKind {
    DomainEvent,
    Event,
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelKind::DomainEvent => f.write_str("domain_event"),
            ChannelKind::Event => f.write_str("event"),
        }
    }
}

/// 一个通道 = 只读的处理器注册表 + 待分发队列
#[derive(Debug)]
pub(crate) struct Channel {
    registry: HandlerRegistry,
    queue: PendingQueue,
}

impl Channel {
    pub(crate) fn new(registry: HandlerRegistry, queue_capacity: usize) -> Self {
        Self {
            registry,
            queue: PendingQueue::with_capacity(queue_capacity),
        }
    }

    pub(crate) fn kind(&self) -> ChannelKind {
        self.registry.kind()
    }

    pub(crate) fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    pub(crate) fn pending(&self) -> usize {
        self.queue.len()
    }

    /// 入队：先确认存在处理器
    ///
    /// # Panics
    ///
    /// 事件类型未注册时 panic（装配错误），事件不会进入队列。
    pub(crate) fn enqueue<E: Any + Send>(&self, event_name: &'static str, event: E) {
        if !self.registry.contains(TypeId::of::<E>()) {
            self.handler_not_found(event_name);
        }

        let pending = self.queue.push(PendingEvent::new(event_name, event));
        trace!(kind = %self.kind(), event = event_name, pending, "event queued");
    }

    // 解析失败属于装配错误而非业务错误，直接崩溃，绝不静默丢弃事件
    fn handler_not_found(&self, event_name: &'static str) -> ! {
        error!(kind = %self.kind(), event = event_name, "handler not found");
        panic!(
            "handler not found: kind={}, event={}",
            self.kind(),
            event_name
        );
    }

    /// 立即分发一条事件，不触碰队列
    ///
    /// # Panics
    ///
    /// 事件类型未注册时 panic。
    pub(crate) async fn dispatch_now<E: Any + Send>(
        &self,
        ctx: &DispatchContext,
        event_name: &'static str,
        event: E,
    ) -> Result<(), DispatchError> {
        debug!(kind = %self.kind(), event = event_name, "dispatching event");
        self.dispatch(ctx, PendingEvent::new(event_name, event)).await
    }

    async fn dispatch(
        &self,
        ctx: &DispatchContext,
        pending: PendingEvent,
    ) -> Result<(), DispatchError> {
        let Some(registration) = self.registry.get(pending.event_type) else {
            self.handler_not_found(pending.event_name);
        };

        (registration.invoke)(pending.payload, ctx).await
    }

    /// 提交：换出当前队列后按入队顺序逐条分发，返回已分发的条数
    ///
    /// 分发期间新入队的事件留给下一次提交。失败处理见 [`FailurePolicy`]。
    pub(crate) async fn commit(
        &self,
        ctx: &DispatchContext,
        policy: FailurePolicy,
    ) -> Result<usize, DispatchError> {
        let taken = self.queue.take();
        if taken.is_empty() {
            return Ok(0);
        }

        let total = taken.len();
        debug!(kind = %self.kind(), total, "commit started");

        let mut dispatched = 0;
        let mut failures = Vec::new();
        let mut entries = taken.into_iter();

        while let Some(entry) = entries.next() {
            let event_name = entry.event_name;
            dispatched += 1;

            let Err(err) = self.dispatch(ctx, entry).await else {
                continue;
            };

            warn!(kind = %self.kind(), event = event_name, error = %err, "handler failed during commit");

            match policy {
                FailurePolicy::Halt => {
                    let remaining: Vec<PendingEvent> = entries.collect();
                    if !remaining.is_empty() {
                        debug!(kind = %self.kind(), requeued = remaining.len(), "commit halted");
                        self.queue.restore_front(remaining);
                    }
                    return Err(err);
                }
                FailurePolicy::Continue => failures.push(err),
            }
        }

        debug!(kind = %self.kind(), dispatched, failed = failures.len(), "commit finished");

        if failures.is_empty() {
            Ok(dispatched)
        } else {
            Err(DispatchError::Commit {
                dispatched,
                failures,
            })
        }
    }
}
