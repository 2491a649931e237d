// ==========================================
// 餐饮人力排班系统 - 排班事件发布
// ==========================================
// 职责: 定义排班事件发布 trait，引擎层不依赖具体下游
// 说明: 发布失败只记录告警，不影响已产出的排班结果
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::sync::Arc;

// ==========================================
// 排班事件类型
// ==========================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScheduleEventType {
    /// 排班已完成评估（含闸门判定）
    ScheduleEvaluated,
}

impl ScheduleEventType {
    pub fn as_str(&self) -> &str {
        match self {
            ScheduleEventType::ScheduleEvaluated => "ScheduleEvaluated",
        }
    }
}

/// 排班事件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEvent {
    /// 运行 ID（uuid v4）
    pub run_id: String,
    pub event_type: ScheduleEventType,
    pub outlet_id: String,
    /// 覆盖的营业日范围
    pub date_range: Option<(NaiveDate, NaiveDate)>,
    pub publishable: bool,
    pub hard_violations: usize,
    pub staffing_gaps: usize,
}

impl ScheduleEvent {
    pub fn evaluated(
        run_id: String,
        outlet_id: String,
        date_range: Option<(NaiveDate, NaiveDate)>,
        publishable: bool,
        hard_violations: usize,
        staffing_gaps: usize,
    ) -> Self {
        Self {
            run_id,
            event_type: ScheduleEventType::ScheduleEvaluated,
            outlet_id,
            date_range,
            publishable,
            hard_violations,
            staffing_gaps,
        }
    }
}

// ==========================================
// 事件发布 Trait
// ==========================================

/// 排班事件发布者
///
/// # 返回
/// - `Ok(receipt)`: 下游回执（不支持时为空字符串）
/// - `Err`: 发布失败
pub trait ScheduleEventPublisher: Send + Sync {
    fn publish(&self, event: ScheduleEvent) -> Result<String, Box<dyn Error + Send + Sync>>;
}

/// 空操作事件发布者
#[derive(Debug, Clone, Default)]
pub struct NoOpEventPublisher;

impl ScheduleEventPublisher for NoOpEventPublisher {
    fn publish(&self, event: ScheduleEvent) -> Result<String, Box<dyn Error + Send + Sync>> {
        tracing::debug!(
            run_id = %event.run_id,
            event_type = event.event_type.as_str(),
            "NoOpEventPublisher: 跳过事件发布"
        );
        Ok(String::new())
    }
}

/// 可选的事件发布者包装
pub struct OptionalEventPublisher {
    inner: Option<Arc<dyn ScheduleEventPublisher>>,
}

impl OptionalEventPublisher {
    pub fn with_publisher(publisher: Arc<dyn ScheduleEventPublisher>) -> Self {
        Self {
            inner: Some(publisher),
        }
    }

    pub fn none() -> Self {
        Self { inner: None }
    }

    pub fn publish(&self, event: ScheduleEvent) -> Result<String, Box<dyn Error + Send + Sync>> {
        match &self.inner {
            Some(publisher) => publisher.publish(event),
            None => {
                tracing::debug!(
                    run_id = %event.run_id,
                    "OptionalEventPublisher: 未配置发布者，跳过事件"
                );
                Ok(String::new())
            }
        }
    }

    pub fn is_configured(&self) -> bool {
        self.inner.is_some()
    }
}

impl Default for OptionalEventPublisher {
    fn default() -> Self {
        Self::none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingPublisher {
        events: Mutex<Vec<ScheduleEvent>>,
    }

    impl ScheduleEventPublisher for RecordingPublisher {
        fn publish(&self, event: ScheduleEvent) -> Result<String, Box<dyn Error + Send + Sync>> {
            let receipt = event.run_id.clone();
            self.events.lock().unwrap().push(event);
            Ok(receipt)
        }
    }

    fn event() -> ScheduleEvent {
        ScheduleEvent::evaluated("RUN-1".to_string(), "OUT1".to_string(), None, false, 1, 0)
    }

    #[test]
    fn test_evaluated_event() {
        let e = event();
        assert_eq!(e.event_type, ScheduleEventType::ScheduleEvaluated);
        assert!(!e.publishable);
        assert_eq!(e.hard_violations, 1);
    }

    #[test]
    fn test_noop_publisher() {
        let result = NoOpEventPublisher.publish(event());
        assert_eq!(result.unwrap(), "");
    }

    #[test]
    fn test_optional_publisher_none() {
        let publisher = OptionalEventPublisher::none();
        assert!(!publisher.is_configured());
        assert!(publisher.publish(event()).is_ok());
    }

    #[test]
    fn test_optional_publisher_forwards() {
        let recorder = Arc::new(RecordingPublisher::default());
        let publisher = OptionalEventPublisher::with_publisher(recorder.clone());
        assert!(publisher.is_configured());

        assert_eq!(publisher.publish(event()).unwrap(), "RUN-1");
        assert_eq!(recorder.events.lock().unwrap().len(), 1);
    }
}
