//! 모의 장비 프로필: 프롬프트, 로그인 절차, 예제 명령 집합.

mod commands;
mod login;
mod loops;
mod prompt;
mod state;

use std::sync::Arc;

use anyhow::Result;

use crate::application::console::Console;
use crate::application::ports::LineSource;
use crate::application::repl::{ReplRegistry, ReplSession};
use crate::infrastructure::config::ResolvedConfig;

pub use loops::{CONFIG_TERMINAL, TOP_LEVEL, build_registry};
pub use state::DeviceState;

use prompt::device_prompt;

/// 로그인부터 최상위 REPL 종료까지 한 세션의 전체 흐름을 실행한다.
pub async fn run_session(
    source: Box<dyn LineSource>,
    config: Arc<ResolvedConfig>,
    registry: Arc<ReplRegistry<DeviceState>>,
) -> Result<()> {
    let mut console = Console::new(source);

    if !login::authenticate(&mut console, &config).await? {
        console.write_line("% Too many failed logins").await?;
        return Ok(());
    }

    let motd = config
        .motd
        .replace("{hostname}", &config.hostname)
        .replace("{username}", &config.username);
    console.write_line(&motd).await?;

    let state = DeviceState {
        config: Arc::clone(&config),
        enabled: false,
    };
    let prompt = device_prompt(&config.hostname, false, None);
    let (mut session, top) = ReplSession::new(console, state, registry, TOP_LEVEL, prompt)?;
    session.run(top).await
}
