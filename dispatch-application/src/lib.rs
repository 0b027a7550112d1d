//! 进程内事件调度（dispatch-application）
//!
//! 把事件的运行时类型映射到唯一的处理器并调用：
//! - 领域事件在工作单元中入队，提交时按入队顺序逐条分发后清空；
//! - 事件可立即分发，也可入队批量提交；
//! - 注册表在构造时校验并固定，解析为 O(1) 的类型查找。
//!
//! 典型用法：
//! 1. 为载荷实现 `DomainEvent` / `Event`（或使用 `dispatch-macros` 的宏）；
//! 2. 为每种载荷实现一个 `DomainEventHandler` / `EventHandler`；
//! 3. 通过 `EventDispatcher::builder()` 或 `EventDispatcher::new` 装配；
//! 4. 业务代码调用 `add_*` 入队，在提交点调用 `commit_*`。
//!
//! 为未注册的事件类型入队或分发属于装配错误，会直接 panic。
//!
pub mod channel;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod handler;
pub mod registration;

mod queue;
mod registry;

pub use channel::ChannelKind;
pub use config::{DEFAULT_QUEUE_CAPACITY, DispatcherConfig, FailurePolicy};
pub use dispatcher::{Dispatcher, EventDispatcher, EventDispatcherBuilder};
pub use error::{DispatchError, DispatchResult};
pub use handler::{DomainEventHandler, EventHandler};
pub use registration::{DomainEventRegistration, EventRegistration};
