use crate::channel::{Channel, ChannelKind};
use crate::config::DispatcherConfig;
use crate::error::DispatchError;
use crate::handler::{DomainEventHandler, EventHandler};
use crate::registration::{DomainEventRegistration, EventRegistration};
use crate::registry::HandlerRegistry;
use async_trait::async_trait;
use dispatch_domain::{DispatchContext, DomainEvent, Event};
use std::sync::Arc;

/// 事件调度器（Dispatcher）
///
/// - 领域事件：`add_domain_event` 入队，`commit_domain_events` 在提交点批量分发；
/// - 事件：`dispatch_event` 立即分发，或 `add_event` 入队后由 `commit_events` 批量分发；
/// - 每个事件恰好交给一个处理器，按入队顺序依次等待完成，不并发、不重试；
/// - 为未注册的事件类型入队或分发会 panic：这是装配错误，事件绝不静默丢弃；
/// - 该 trait 带有泛型方法，通常以具体实现类型注入使用。
#[async_trait]
pub trait Dispatcher: Send + Sync {
    /// 领域事件入队，不会同步触发分发
    fn add_domain_event<E>(&self, event: E)
    where
        E: DomainEvent;

    /// 分发全部待处理的领域事件并清空队列，返回已分发的条数
    async fn commit_domain_events(&self, ctx: &DispatchContext) -> Result<usize, DispatchError>;

    /// 立即分发一条事件，不影响事件队列
    async fn dispatch_event<E>(&self, ctx: &DispatchContext, event: E) -> Result<(), DispatchError>
    where
        E: Event;

    /// 事件入队，不会同步触发分发
    fn add_event<E>(&self, event: E)
    where
        E: Event;

    /// 分发全部待处理的事件并清空队列，返回已分发的条数
    async fn commit_events(&self, ctx: &DispatchContext) -> Result<usize, DispatchError>;
}

/// 进程内的 Dispatcher 实现
///
/// 由两组预先构造好的处理器注册创建，注册表此后只读；
/// 通常在启动时构造一次，以 `Arc` 共享给调用方。
#[derive(Debug)]
pub struct EventDispatcher {
    domain_events: Channel,
    events: Channel,
    config: DispatcherConfig,
}

impl EventDispatcher {
    /// 由两组注册列表构造；列表中任一重复注册都会使构造失败
    pub fn new(
        domain_event_handlers: Vec<DomainEventRegistration>,
        event_handlers: Vec<EventRegistration>,
        config: DispatcherConfig,
    ) -> Result<Self, DispatchError> {
        let builder = Self::builder()
            .config(config)
            .register_domain_event_handlers(domain_event_handlers)?
            .register_event_handlers(event_handlers)?;

        Ok(builder.build())
    }

    pub fn builder() -> EventDispatcherBuilder {
        EventDispatcherBuilder::default()
    }

    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    /// 待提交的领域事件条数
    pub fn pending_domain_events(&self) -> usize {
        self.domain_events.pending()
    }

    /// 待提交的事件条数
    pub fn pending_events(&self) -> usize {
        self.events.pending()
    }

    /// 获取已注册的领域事件名列表（按注册顺序）
    pub fn registered_domain_events(&self) -> Vec<&'static str> {
        self.domain_events.registry().event_names()
    }

    /// 获取已注册的事件名列表（按注册顺序）
    pub fn registered_events(&self) -> Vec<&'static str> {
        self.events.registry().event_names()
    }
}

#[async_trait]
impl Dispatcher for EventDispatcher {
    fn add_domain_event<E: DomainEvent>(&self, event: E) {
        self.domain_events.enqueue(E::NAME, event)
    }

    async fn commit_domain_events(&self, ctx: &DispatchContext) -> Result<usize, DispatchError> {
        self.domain_events
            .commit(ctx, self.config.failure_policy)
            .await
    }

    async fn dispatch_event<E: Event>(
        &self,
        ctx: &DispatchContext,
        event: E,
    ) -> Result<(), DispatchError> {
        self.events.dispatch_now(ctx, E::NAME, event).await
    }

    fn add_event<E: Event>(&self, event: E) {
        self.events.enqueue(E::NAME, event)
    }

    async fn commit_events(&self, ctx: &DispatchContext) -> Result<usize, DispatchError> {
        self.events.commit(ctx, self.config.failure_policy).await
    }
}

/// EventDispatcher 构造器
///
/// 每次注册都会立即校验重复类型，错误在装配阶段暴露：
///
/// ```ignore
/// let dispatcher = EventDispatcher::builder()
///     .domain_event_handler::<OrderCreated, _>(Arc::new(OrderCreatedHandler))?
///     .event_handler::<UserSignedIn, _>(Arc::new(UserSignedInHandler))?
///     .build();
/// ```
#[derive(Debug)]
pub struct EventDispatcherBuilder {
    config: DispatcherConfig,
    domain_events: HandlerRegistry,
    events: HandlerRegistry,
}

impl Default for EventDispatcherBuilder {
    fn default() -> Self {
        Self {
            config: DispatcherConfig::default(),
            domain_events: HandlerRegistry::new(ChannelKind::DomainEvent),
            events: HandlerRegistry::new(ChannelKind::Event),
        }
    }
}

impl EventDispatcherBuilder {
    pub fn config(mut self, config: DispatcherConfig) -> Self {
        self.config = config;
        self
    }

    /// 注册领域事件处理器
    pub fn domain_event_handler<E, H>(self, handler: Arc<H>) -> Result<Self, DispatchError>
    where
        E: DomainEvent,
        H: DomainEventHandler<E> + ?Sized + 'static,
    {
        self.register_domain_event_handlers([DomainEventRegistration::new::<E, H>(handler)])
    }

    /// 注册事件处理器
    pub fn event_handler<E, H>(self, handler: Arc<H>) -> Result<Self, DispatchError>
    where
        E: Event,
        H: EventHandler<E> + ?Sized + 'static,
    {
        self.register_event_handlers([EventRegistration::new::<E, H>(handler)])
    }

    /// 批量注册领域事件处理器（保持给定顺序）
    pub fn register_domain_event_handlers(
        mut self,
        registrations: impl IntoIterator<Item = DomainEventRegistration>,
    ) -> Result<Self, DispatchError> {
        for DomainEventRegistration(registration) in registrations {
            self.domain_events.insert(registration)?;
        }
        Ok(self)
    }

    /// 批量注册事件处理器（保持给定顺序）
    pub fn register_event_handlers(
        mut self,
        registrations: impl IntoIterator<Item = EventRegistration>,
    ) -> Result<Self, DispatchError> {
        for EventRegistration(registration) in registrations {
            self.events.insert(registration)?;
        }
        Ok(self)
    }

    pub fn build(self) -> EventDispatcher {
        let capacity = self.config.queue_capacity;

        EventDispatcher {
            domain_events: Channel::new(self.domain_events, capacity),
            events: Channel::new(self.events, capacity),
            config: self.config,
        }
    }
}
