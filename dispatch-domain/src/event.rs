/// 事件（Event）
///
/// 通用通知，既可以通过调度器立即分发，也可以排队等待批量提交。
/// 与 [`DomainEvent`](crate::domain_event::DomainEvent) 形状一致但类型互不相通，
/// 两类载荷分别注册、分别排队。
pub trait Event: Send + 'static {
    /// 事件的稳定名称（建议常量字符串，不随重构变化）
    const NAME: &'static str;
}
