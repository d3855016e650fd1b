//! 매처/핸들러 쌍의 순서 있는 목록과 첫-매치 디스패치.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use crate::domain::command_line::CommandLine;
use crate::domain::matcher::Matcher;

use super::session::{LoopId, ReplSession};

/// 매칭된 입력 한 줄을 처리하는 비동기 작업 단위.
///
/// 소유 루프 인스턴스(세션 + 루프 핸들)와 파싱된 입력을 함께 받으므로
/// 프롬프트 변경, 상태 변경, 하위 루프 진입 같은 부수효과를 일으킬 수 있다.
#[async_trait]
pub trait Handler<S: Send + 'static>: Send + Sync {
    async fn handle(
        &self,
        session: &mut ReplSession<S>,
        id: LoopId,
        line: &CommandLine,
    ) -> Result<()>;
}

/// 어떤 매처에도 해당하지 않은 입력이 흘러가는 대체 경로.
///
/// 기본 구현은 진단만 남기고 절대 실패하지 않아야 한다.
/// 재정의 구현은 클라이언트에 오류 메시지를 쓸 수 있고,
/// 그때의 전송 오류는 그대로 전파된다.
#[async_trait]
pub trait Fallback<S: Send + 'static>: Send + Sync {
    async fn handle(
        &self,
        session: &mut ReplSession<S>,
        id: LoopId,
        line: &CommandLine,
    ) -> Result<()>;
}

/// 진단 로그만 남기는 기본 대체 경로. 멱등이며 오류를 내지 않는다.
pub struct LoggingFallback;

#[async_trait]
impl<S: Send + 'static> Fallback<S> for LoggingFallback {
    async fn handle(
        &self,
        _session: &mut ReplSession<S>,
        id: LoopId,
        line: &CommandLine,
    ) -> Result<()> {
        tracing::debug!(
            loop_index = id.index(),
            word = line.word(),
            args = ?line.args(),
            "unhandled command"
        );
        Ok(())
    }
}

/// 디스패치 목록의 한 엔트리.
pub struct DispatchEntry<S: Send + 'static> {
    pub matcher: Matcher,
    pub handler: Arc<dyn Handler<S>>,
}

/// 등록 순서를 그대로 보존하는 추가 전용 디스패치 목록.
/// 등록 순서가 유일한 우선순위 규칙이다.
pub struct DispatchTable<S: Send + 'static> {
    entries: Vec<DispatchEntry<S>>,
}

impl<S: Send + 'static> DispatchTable<S> {
    pub(crate) fn new(entries: Vec<DispatchEntry<S>>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[DispatchEntry<S>] {
        &self.entries
    }

    /// 등록 순서대로 평가해 첫 번째로 매칭되는 엔트리를 찾는다.
    pub fn find(&self, line: &CommandLine) -> Option<&DispatchEntry<S>> {
        self.entries
            .iter()
            .find(|entry| entry.matcher.matches(line.word(), line.args()))
    }
}
