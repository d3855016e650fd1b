//! 세션별 장비 상태.

use std::sync::Arc;

use crate::infrastructure::config::ResolvedConfig;

/// 한 세션이 들고 다니는 장비 상태.
/// 설정은 세션 간 공유되는 읽기 전용 핸들이다.
pub struct DeviceState {
    pub config: Arc<ResolvedConfig>,
    pub enabled: bool,
}
