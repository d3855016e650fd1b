//! 루프 종류별 명령 집합을 한 번에 확정하는 레지스트리.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::command::{Command, HandlerRegistration, RegistryError};
use super::dispatch::{DispatchTable, Fallback, LoggingFallback};

/// 루프의 런타임 종류를 나타내는 태그.
/// `exit_to_kind`가 조상 탐색을 멈출 지점을 고르는 기준이다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoopKind(pub &'static str);

impl LoopKind {
    pub const fn name(self) -> &'static str {
        self.0
    }
}

impl fmt::Display for LoopKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// 한 루프 종류의 선언: 자동 종료 명령, 명령 목록, 대체 경로.
///
/// 명령 간 상대 순서는 `command` 호출 순서가 전부이며
/// 명령을 가로지르는 재정렬은 없다.
pub struct LoopSpec<S: Send + 'static> {
    kind: LoopKind,
    exit_command: Option<String>,
    commands: Vec<Arc<dyn Command<S>>>,
    fallback: Option<Arc<dyn Fallback<S>>>,
}

impl<S: Send + 'static> LoopSpec<S> {
    /// 기본 설정의 루프 선언을 만든다. 자동 종료 명령 기본값은 `exit`다.
    pub fn new(kind: LoopKind) -> Self {
        Self {
            kind,
            exit_command: Some("exit".to_string()),
            commands: Vec::new(),
            fallback: None,
        }
    }

    /// 자동 종료 명령 리터럴을 바꾸거나 `None`으로 끈다.
    pub fn exit_command(mut self, exit_command: Option<&str>) -> Self {
        self.exit_command = exit_command.map(str::to_string);
        self
    }

    /// 명령을 선언 순서대로 추가한다.
    pub fn command(mut self, command: impl Command<S> + 'static) -> Self {
        self.commands.push(Arc::new(command));
        self
    }

    /// 알 수 없는 명령의 대체 경로를 교체한다.
    pub fn fallback(mut self, fallback: impl Fallback<S> + 'static) -> Self {
        self.fallback = Some(Arc::new(fallback));
        self
    }
}

pub(crate) struct LoopProfile<S: Send + 'static> {
    pub exit_command: Option<String>,
    pub table: DispatchTable<S>,
    pub commands: Vec<Arc<dyn Command<S>>>,
    pub fallback: Arc<dyn Fallback<S>>,
}

/// 루프 종류별 프로필을 구성 시점에 한 번 검증해 확정하는 레지스트리.
/// 이후에는 불변이며 세션 간에 공유된다.
pub struct ReplRegistry<S: Send + 'static> {
    profiles: HashMap<LoopKind, LoopProfile<S>>,
}

impl<S: Send + 'static> ReplRegistry<S> {
    /// 루프 선언 목록을 검증해 레지스트리를 만든다.
    /// 순서 불변식 위반은 여기서 즉시 실패한다. 입력 디스패치보다 항상 앞선다.
    pub fn build(specs: Vec<LoopSpec<S>>) -> Result<Self, RegistryError> {
        let mut profiles = HashMap::new();

        for spec in specs {
            let LoopSpec {
                kind,
                exit_command,
                commands,
                fallback,
            } = spec;

            tracing::debug!(kind = kind.name(), "registering loop commands");

            let mut entries = Vec::new();
            for command in &commands {
                let mut reg = HandlerRegistration::new();
                command.register_handlers(&mut reg);

                let validated = reg.into_validated_entries(command.name())?;
                for entry in &validated {
                    tracing::debug!(
                        kind = kind.name(),
                        command = command.name(),
                        matcher = %entry.matcher,
                        "registered handler"
                    );
                }
                entries.extend(validated);
            }

            profiles.insert(
                kind,
                LoopProfile {
                    exit_command,
                    table: DispatchTable::new(entries),
                    commands,
                    fallback: fallback.unwrap_or_else(|| Arc::new(LoggingFallback)),
                },
            );
        }

        Ok(Self { profiles })
    }

    pub(crate) fn profile(&self, kind: LoopKind) -> Result<&LoopProfile<S>, RegistryError> {
        self.profiles
            .get(&kind)
            .ok_or(RegistryError::UnknownLoopKind { kind: kind.name() })
    }
}
