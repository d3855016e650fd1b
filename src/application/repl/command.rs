//! 선언적 명령 계층: 이름/도움말을 가진 매처·핸들러 묶음과 순서 검증.

use std::sync::Arc;

use thiserror::Error;

use crate::domain::matcher::Matcher;

use super::dispatch::{DispatchEntry, Handler};

/// 레지스트리 구성 시점에 검출되는 설정 오류.
/// 어떤 입력도 디스패치되기 전에 반드시 드러나야 한다.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// 한 명령 안에서 일부 핸들러에만 명시적 순서를 지정한 경우.
    #[error("command '{command}' must declare an explicit order on all handlers or none")]
    MixedOrdering { command: String },

    /// 선언되지 않은 루프 종류를 참조한 경우.
    #[error("loop kind '{kind}' is not registered")]
    UnknownLoopKind { kind: &'static str },
}

/// 이름과 도움말 텍스트를 갖는 매처/핸들러 묶음.
///
/// `register_handlers`가 보고하는 쌍의 순서가 곧 선언 순서이며,
/// 명시적 순서가 없을 때 이 선언 순서가 등록 순서로 쓰인다.
pub trait Command<S: Send + 'static>: Send + Sync {
    /// 도움말에 표시되는 명령 이름. 보통 명령 단어와 같다.
    fn name(&self) -> &str;

    /// 명령의 용도를 설명하는 도움말 텍스트.
    fn help_text(&self) -> &str;

    /// 명령이 가진 매처/핸들러 쌍을 등록기에 보고한다.
    fn register_handlers(&self, reg: &mut HandlerRegistration<S>);
}

struct HandlerSpec<S: Send + 'static> {
    matcher: Matcher,
    handler: Arc<dyn Handler<S>>,
    order: Option<i32>,
}

/// `Command`가 매처/핸들러 쌍을 보고하는 수집기.
///
/// 한 명령 안에서는 전부 순서를 지정하거나 전부 생략해야 한다.
/// 혼용은 레지스트리 구성 시점의 `RegistryError`다.
pub struct HandlerRegistration<S: Send + 'static> {
    specs: Vec<HandlerSpec<S>>,
}

impl<S: Send + 'static> HandlerRegistration<S> {
    pub(crate) fn new() -> Self {
        Self { specs: Vec::new() }
    }

    /// 명시적 순서 없이 쌍을 등록한다. 선언 순서대로 디스패치 목록에 들어간다.
    pub fn register<H>(&mut self, matcher: Matcher, handler: H)
    where
        H: Handler<S> + 'static,
    {
        self.specs.push(HandlerSpec {
            matcher,
            handler: Arc::new(handler),
            order: None,
        });
    }

    /// 명시적 순서와 함께 쌍을 등록한다. 낮은 값이 먼저 평가된다.
    pub fn register_ordered<H>(&mut self, order: i32, matcher: Matcher, handler: H)
    where
        H: Handler<S> + 'static,
    {
        self.specs.push(HandlerSpec {
            matcher,
            handler: Arc::new(handler),
            order: Some(order),
        });
    }

    /// 전량-또는-전무 순서 불변식을 검증하고 확정된 순서의 엔트리를 돌려준다.
    pub(crate) fn into_validated_entries(
        self,
        command_name: &str,
    ) -> Result<Vec<DispatchEntry<S>>, RegistryError> {
        let any_ordered = self.specs.iter().any(|spec| spec.order.is_some());
        let all_ordered = self.specs.iter().all(|spec| spec.order.is_some());

        if any_ordered && !all_ordered {
            return Err(RegistryError::MixedOrdering {
                command: command_name.to_string(),
            });
        }

        let mut specs = self.specs;
        if all_ordered {
            // 안정 정렬이라 같은 순서값끼리는 선언 순서가 유지된다.
            specs.sort_by_key(|spec| spec.order);
        }

        Ok(specs
            .into_iter()
            .map(|spec| DispatchEntry {
                matcher: spec.matcher,
                handler: spec.handler,
            })
            .collect())
    }
}
