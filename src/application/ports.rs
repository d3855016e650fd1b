//! 애플리케이션 계층이 의존하는 포트(추상 인터페이스) 모음.

use anyhow::Result;
use async_trait::async_trait;

use crate::infrastructure::config::ResolvedConfig;

/// 코어가 소비하는 추상 양방향 텍스트 스트림 포트.
///
/// 한 줄 또는 문자 단위 입력을 비동기로 기다릴 수 있고,
/// 에코와 라인 버퍼링 여부를 전환할 수 있다.
/// 연결이 끊기면 읽기 연산이 오류를 반환하고,
/// 그 오류는 중단된 모든 루프 레벨을 거쳐 전파된다.
#[async_trait]
pub trait LineSource: Send {
    /// 출력 스트림에 텍스트를 쓴다. 개행은 자동으로 붙이지 않는다.
    async fn write(&mut self, text: &str) -> Result<()>;

    /// 한 줄이 도착할 때까지 대기한다. 줄 끝 문자를 제거해 반환한다.
    async fn read_line(&mut self) -> Result<String>;

    /// 문자 하나가 도착할 때까지 대기한다. "press any key" 용도.
    async fn read_char(&mut self) -> Result<char>;

    /// 입력 에코 여부를 전환하고 이전 값을 반환한다.
    async fn set_echo(&mut self, echo: bool) -> Result<bool>;

    /// 라인 단위/문자 단위 입력 모드를 전환하고 이전 값을 반환한다.
    async fn set_line_mode(&mut self, line_mode: bool) -> Result<bool>;
}

/// 설정 로딩/점검을 담당하는 저장소 포트.
pub trait ConfigRepository: Send + Sync {
    fn load(&self) -> Result<ResolvedConfig>;
    fn inspect_pretty_json(&self) -> Result<String>;
}
