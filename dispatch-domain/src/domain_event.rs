/// 领域事件（Domain Event）
///
/// 表达一次工作单元中已经发生的业务事实，先入队，在提交点统一分发。
/// - 载荷字段对调度器不可见，路由依据是载荷的 `TypeId`；
/// - 每种领域事件恰好对应一个处理器，在构造调度器时绑定。
///
/// 关联常量：
/// - `NAME`：事件的稳定名称，用于日志与错误信息。避免依赖 `type_name::<T>()`。
pub trait DomainEvent: Send + 'static {
    /// 事件的稳定名称（建议常量字符串，不随重构变化）
    const NAME: &'static str;
}
