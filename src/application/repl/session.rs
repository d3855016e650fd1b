//! 중첩 REPL 스택 상태 기계.
//!
//! 한 세션은 콘솔, 공유 상태, 루프 아레나를 소유한다.
//! 하위 메뉴 진입은 아레나에 자식 루프를 쌓고 그 `run`이 반환될 때까지
//! 부모의 `run` 호출을 중단시키는 구조적(LIFO) 중단이다.

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::application::console::Console;
use crate::domain::command_line::{CommandLine, parse_line};

use super::command::{Command, RegistryError};
use super::registry::{LoopKind, ReplRegistry};

/// 세션 아레나 안의 루프 인스턴스를 가리키는 핸들.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopId(usize);

impl LoopId {
    pub fn index(self) -> usize {
        self.0
    }
}

struct LoopState {
    kind: LoopKind,
    prompt: String,
    running: bool,
    // 비소유 상향 참조. `exit_to_kind`의 조상 탐색에만 쓰인다.
    parent: Option<LoopId>,
}

/// 한 클라이언트 세션: 콘솔과 공유 상태 `S`, 루프 아레나를 소유한다.
/// 세션끼리는 어떤 가변 상태도 공유하지 않는다.
pub struct ReplSession<S: Send + 'static> {
    console: Console,
    state: S,
    registry: Arc<ReplRegistry<S>>,
    loops: Vec<LoopState>,
}

impl<S: Send + 'static> ReplSession<S> {
    /// 최상위 루프 하나를 가진 세션을 만든다.
    /// 루프 종류는 레지스트리에 선언되어 있어야 한다.
    pub fn new(
        console: Console,
        state: S,
        registry: Arc<ReplRegistry<S>>,
        kind: LoopKind,
        prompt: impl Into<String>,
    ) -> Result<(Self, LoopId), RegistryError> {
        registry.profile(kind)?;

        let mut session = Self {
            console,
            state,
            registry,
            loops: Vec::new(),
        };
        let id = session.push_loop(None, kind, prompt.into());
        Ok((session, id))
    }

    pub fn console(&mut self) -> &mut Console {
        &mut self.console
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut S {
        &mut self.state
    }

    pub fn kind(&self, id: LoopId) -> LoopKind {
        self.loops[id.0].kind
    }

    pub fn is_running(&self, id: LoopId) -> bool {
        self.loops[id.0].running
    }

    pub fn parent(&self, id: LoopId) -> Option<LoopId> {
        self.loops[id.0].parent
    }

    /// 루프의 프롬프트 텍스트를 바꾼다. 다음 입력 요청부터 반영된다.
    pub fn set_prompt(&mut self, id: LoopId, prompt: impl Into<String>) {
        self.loops[id.0].prompt = prompt.into();
    }

    /// 루프 종류에 선언된 명령 목록. 도움말 렌더링에 쓴다.
    pub fn commands(&self, id: LoopId) -> &[Arc<dyn Command<S>>] {
        match self.registry.profile(self.loops[id.0].kind) {
            Ok(profile) => &profile.commands,
            Err(_) => &[],
        }
    }

    /// 현재 줄 처리가 끝난 뒤 이 루프가 종료되도록 요청한다. 멱등이다.
    /// 실행 중인 핸들러를 중단시키지 않으며 다음 반복 검사에서 관측된다.
    pub fn exit(&mut self, id: LoopId) {
        self.loops[id.0].running = false;
    }

    /// 지정한 종류의 조상이 나올 때까지 위로 올라가며 만나는 루프를 모두 종료한다.
    /// 시작 루프가 이미 그 종류라면 아무 효과가 없다.
    /// 체인이 소진되면(최상위 도달) 거기까지 전부 종료한다.
    pub fn exit_to_kind(&mut self, id: LoopId, target: LoopKind) {
        tracing::debug!(target_kind = target.name(), "exiting loops until target kind");

        let mut current = Some(id);
        while let Some(cur) = current {
            if self.loops[cur.0].kind == target {
                break;
            }
            tracing::debug!(kind = self.loops[cur.0].kind.name(), "exiting loop");
            self.exit(cur);
            current = self.loops[cur.0].parent;
        }
    }

    /// 현재 루프를 부모로 갖는 하위 루프를 만든다.
    /// 실행은 시작하지 않는다. 호출자가 `run`을 돌리고, 그 `run`이
    /// 반환된 뒤에야 호출한 핸들러로 제어가 돌아온다.
    pub fn enter(
        &mut self,
        parent: LoopId,
        kind: LoopKind,
        prompt: impl Into<String>,
    ) -> Result<LoopId, RegistryError> {
        self.registry.profile(kind)?;
        Ok(self.push_loop(Some(parent), kind, prompt.into()))
    }

    /// REP 루프를 실행한다.
    ///
    /// `running`이 참인 동안: 프롬프트를 쓰고 한 줄을 읽는다. 빈 줄은
    /// 디스패치 없이 다시 프롬프트한다. 자동 종료 명령이 설정돼 있고
    /// 명령 단어가 그와 같으면 디스패치를 건너뛰고 종료한다. 그 외에는
    /// 첫-매치 디스패치로 넘긴다.
    ///
    /// 사용자 입력 오류로는 실패하지 않는다. 핸들러 오류와 전송 오류만
    /// 전파되며, 중단된 모든 상위 `run`을 거쳐 스택 전체를 풀어낸다.
    pub async fn run(&mut self, id: LoopId) -> Result<()> {
        let result = self.run_loop(id).await;
        self.release(id);
        result
    }

    async fn run_loop(&mut self, id: LoopId) -> Result<()> {
        while self.loops[id.0].running {
            let prompt = self.loops[id.0].prompt.clone();
            let line = self
                .console
                .prompt(&prompt)
                .await
                .context("line source failed while prompting")?;

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            let parsed = match parse_line(trimmed) {
                Ok(parsed) => parsed,
                Err(err) => {
                    // 토큰화가 실패한 줄은 명령을 결정할 수 없는 입력으로
                    // 취급해 대체 경로로 보낸다. 세션은 계속 산다.
                    tracing::debug!(error = %err, "input line failed to parse");
                    let line_as_word = CommandLine::new(trimmed, Vec::new());
                    self.run_fallback(id, &line_as_word).await?;
                    continue;
                }
            };

            let registry = Arc::clone(&self.registry);
            let profile = registry.profile(self.loops[id.0].kind)?;

            if let Some(exit_command) = &profile.exit_command
                && parsed.word() == exit_command.as_str()
            {
                self.exit(id);
                continue;
            }

            match profile.table.find(&parsed) {
                Some(entry) => {
                    tracing::debug!(matcher = %entry.matcher, word = parsed.word(), "dispatching");
                    entry.handler.handle(self, id, &parsed).await?;
                }
                None => profile.fallback.handle(self, id, &parsed).await?,
            }
        }

        Ok(())
    }

    async fn run_fallback(&mut self, id: LoopId, line: &CommandLine) -> Result<()> {
        let registry = Arc::clone(&self.registry);
        let profile = registry.profile(self.loops[id.0].kind)?;
        profile.fallback.handle(self, id, line).await
    }

    fn push_loop(&mut self, parent: Option<LoopId>, kind: LoopKind, prompt: String) -> LoopId {
        self.loops.push(LoopState {
            kind,
            prompt,
            running: true,
            parent,
        });
        LoopId(self.loops.len() - 1)
    }

    /// 하위 루프가 제어를 반환한 뒤 아레나 슬롯을 회수한다.
    /// 최상위 슬롯은 세션과 수명을 같이한다.
    fn release(&mut self, id: LoopId) {
        if id.0 > 0 && id.0 == self.loops.len() - 1 {
            self.loops.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::LineSource;
    use crate::application::repl::registry::LoopSpec;

    use anyhow::bail;
    use async_trait::async_trait;

    const ROOT: LoopKind = LoopKind("root");
    const MENU: LoopKind = LoopKind("menu");
    const SUBMENU: LoopKind = LoopKind("submenu");

    struct NullLineSource;

    #[async_trait]
    impl LineSource for NullLineSource {
        async fn write(&mut self, _text: &str) -> Result<()> {
            Ok(())
        }

        async fn read_line(&mut self) -> Result<String> {
            bail!("no input scripted")
        }

        async fn read_char(&mut self) -> Result<char> {
            bail!("no input scripted")
        }

        async fn set_echo(&mut self, _echo: bool) -> Result<bool> {
            Ok(true)
        }

        async fn set_line_mode(&mut self, _line_mode: bool) -> Result<bool> {
            Ok(true)
        }
    }

    fn registry() -> Arc<ReplRegistry<()>> {
        let registry = ReplRegistry::build(vec![
            LoopSpec::new(ROOT),
            LoopSpec::new(MENU),
            LoopSpec::new(SUBMENU),
        ])
        .expect("valid registry");
        Arc::new(registry)
    }

    fn session() -> (ReplSession<()>, LoopId) {
        let console = Console::new(Box::new(NullLineSource));
        ReplSession::new(console, (), registry(), ROOT, "> ").expect("known kind")
    }

    #[test]
    fn new_rejects_unknown_kind() {
        let console = Console::new(Box::new(NullLineSource));
        let err = ReplSession::new(console, (), registry(), LoopKind("missing"), "> ")
            .err()
            .expect("unknown kind must fail");
        assert!(matches!(err, RegistryError::UnknownLoopKind { .. }));
    }

    #[test]
    fn enter_links_child_to_parent() {
        let (mut session, root) = session();
        let menu = session.enter(root, MENU, "menu> ").expect("known kind");

        assert_eq!(session.parent(menu), Some(root));
        assert_eq!(session.parent(root), None);
        assert_eq!(session.kind(menu), MENU);
        assert!(session.is_running(menu));
    }

    #[test]
    fn enter_rejects_unknown_kind() {
        let (mut session, root) = session();
        let err = session
            .enter(root, LoopKind("missing"), "? ")
            .err()
            .expect("unknown kind must fail");
        assert!(matches!(err, RegistryError::UnknownLoopKind { .. }));
    }

    #[test]
    fn exit_is_idempotent() {
        let (mut session, root) = session();
        session.exit(root);
        session.exit(root);
        assert!(!session.is_running(root));
    }

    #[test]
    fn exit_to_kind_unwinds_to_matching_ancestor() {
        let (mut session, root) = session();
        let menu = session.enter(root, MENU, "menu> ").expect("known kind");
        let submenu = session.enter(menu, SUBMENU, "sub> ").expect("known kind");

        session.exit_to_kind(submenu, ROOT);

        assert!(!session.is_running(submenu));
        assert!(!session.is_running(menu));
        assert!(session.is_running(root));
    }

    #[test]
    fn exit_to_kind_is_a_noop_on_matching_loop() {
        let (mut session, root) = session();
        let menu = session.enter(root, MENU, "menu> ").expect("known kind");

        session.exit_to_kind(menu, MENU);

        assert!(session.is_running(menu));
        assert!(session.is_running(root));
    }

    #[test]
    fn exit_to_kind_exhausts_chain_without_match() {
        let (mut session, root) = session();
        let menu = session.enter(root, MENU, "menu> ").expect("known kind");

        session.exit_to_kind(menu, LoopKind("elsewhere"));

        assert!(!session.is_running(menu));
        assert!(!session.is_running(root));
    }

    #[test]
    fn set_prompt_replaces_prompt_text() {
        let (mut session, root) = session();
        session.set_prompt(root, "device# ");
        assert_eq!(session.loops[root.0].prompt, "device# ");
    }
}
