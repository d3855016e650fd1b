//! 접속 직후의 사용자 인증 절차.

use anyhow::Result;

use crate::application::console::Console;
use crate::infrastructure::config::ResolvedConfig;

const MAX_ATTEMPTS: usize = 3;

/// 사용자 이름/비밀번호 프롬프트를 진행한다.
/// 비밀번호 입력은 에코를 끄고 받는다. 허용 횟수를 넘기면 거짓을 반환한다.
pub(super) async fn authenticate(console: &mut Console, config: &ResolvedConfig) -> Result<bool> {
    for _attempt in 0..MAX_ATTEMPTS {
        let username = console.prompt("Username: ").await?;
        let password = console.prompt_hidden("Password: ").await?;

        if username.trim() == config.username && password.trim_end() == config.password {
            return Ok(true);
        }

        console.write_line("% Login invalid").await?;
        console.write_line("").await?;
    }

    Ok(false)
}
