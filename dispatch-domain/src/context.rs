use bon::Builder;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

/// 调度上下文（Dispatch Context）
///
/// 承载一次调度（入队提交或立即分发）所需的横切信息，例如：
/// - 业务语境：关联追踪 `correlation_id`、因果链 `causation_id`、执行者类型/ID；
/// - 扩展信息（`extensions`）：任意 JSON，供处理器按需读取；
/// - 取消信号（`cancellation`）：由调用方触发，处理器负责响应。
///
/// 调度器只负责把上下文原样传给处理器，既不检查也不强制取消。
///
/// 典型用法：
/// ```rust
/// use dispatch_domain::DispatchContext;
///
/// let ctx = DispatchContext::builder()
///     .correlation_id("cor-123".into())
///     .maybe_causation_id(Some("cau-abc".into()))
///     .actor_type("user".into())
///     .actor_id("u-1".into())
///     .build();
///
/// assert_eq!(ctx.correlation_id(), Some("cor-123"));
/// assert!(!ctx.is_cancelled());
/// ```
#[derive(Builder, Default, Debug, Clone, Serialize, Deserialize)]
pub struct DispatchContext {
    /// 关联ID
    correlation_id: Option<String>,
    /// 因果ID
    causation_id: Option<String>,
    /// 触发调度的主体类型（如用户、系统等）
    actor_type: Option<String>,
    /// 触发调度的主体ID
    actor_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    extensions: Option<serde_json::Value>,

    // 取消信号不参与序列化，反序列化后得到一个未取消的新令牌
    #[serde(skip)]
    #[builder(default)]
    cancellation: CancellationToken,
}

impl DispatchContext {
    pub fn correlation_id(&self) -> Option<&str> {
        self.correlation_id.as_deref()
    }

    pub fn causation_id(&self) -> Option<&str> {
        self.causation_id.as_deref()
    }

    pub fn actor_type(&self) -> Option<&str> {
        self.actor_type.as_deref()
    }

    pub fn actor_id(&self) -> Option<&str> {
        self.actor_id.as_deref()
    }

    pub fn extensions(&self) -> Option<&serde_json::Value> {
        self.extensions.as_ref()
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancellation
    }

    /// 是否已请求取消
    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    /// 请求取消：所有持有该上下文（及其子上下文）的处理器都会观察到
    pub fn cancel(&self) {
        self.cancellation.cancel();
    }

    /// 派生子上下文
    ///
    /// 保留关联ID与执行主体，`causation_id` 设为给定值；
    /// 子上下文的取消信号随父上下文取消，反之不影响父上下文。
    pub fn child(&self, causation_id: impl Into<String>) -> Self {
        Self {
            correlation_id: self.correlation_id.clone(),
            causation_id: Some(causation_id.into()),
            actor_type: self.actor_type.clone(),
            actor_id: self.actor_id.clone(),
            extensions: self.extensions.clone(),
            cancellation: self.cancellation.child_token(),
        }
    }
}
