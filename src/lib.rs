//! mockdev library root.
//! 중첩 REPL 엔진과 모의 장비 프로필 계층을 외부에 노출한다.

use anyhow::Result;

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod interface;

use interface::cli::AppComposition;

/// 라이브러리 직접 호출용 서비스 실행 함수.
pub async fn serve() -> Result<()> {
    let composition = AppComposition::default();
    composition.serve(None).await
}

/// 설정 점검 JSON 출력용 함수.
pub fn inspect_config_pretty_json() -> Result<String> {
    let composition = AppComposition::default();
    composition.inspect_config()
}
