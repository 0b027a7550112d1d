use async_trait::async_trait;
use dispatch_domain::{DispatchContext, DomainEvent, Event};

/// 领域事件处理器：处理某一种领域事件
///
/// 每种领域事件在调度器中恰好绑定一个处理器；处理器由调用方构造并持有，
/// 调度器只保存其 `Arc`，从不创建或销毁处理器。
#[async_trait]
pub trait DomainEventHandler<E>: Send + Sync
where
    E: DomainEvent,
{
    /// 处理器名称（用于日志与错误信息），默认取类型名
    fn handler_name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// 处理事件；应自行响应 `ctx` 中的取消信号
    async fn handle(&self, ctx: &DispatchContext, event: E) -> anyhow::Result<()>;
}

/// 事件处理器：处理某一种事件
#[async_trait]
pub trait EventHandler<E>: Send + Sync
where
    E: Event,
{
    /// 处理器名称（用于日志与错误信息），默认取类型名
    fn handler_name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    async fn handle(&self, ctx: &DispatchContext, event: E) -> anyhow::Result<()>;
}
