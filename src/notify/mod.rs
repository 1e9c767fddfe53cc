//! Push notifications about workflow outcomes.
//!
//! Delivery is best effort: a failed notification is logged and never
//! fails the operation being reported on.

pub mod bark;
pub mod dingtalk;

pub use crate::core::traits::Notifier;
pub use bark::BarkNotifier;
pub use dingtalk::DingTalkNotifier;

use crate::core::types::NotifyStatus;
use tracing::warn;

/// Send through `notifier`, logging instead of returning any failure
pub async fn notify_best_effort(
    notifier: &dyn Notifier,
    title: &str,
    content: &str,
    status: NotifyStatus,
) {
    if let Err(e) = notifier.send(title, content, status).await {
        warn!(error = %e, title, status = status.as_str(), "notification not delivered");
    }
}
