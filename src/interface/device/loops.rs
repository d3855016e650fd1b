//! 장비 프로필의 루프 종류와 명령 배선.

use crate::application::repl::{LoopKind, LoopSpec, RegistryError, ReplRegistry};

use super::commands::{
    BadCommandFallback, ConfigureCommand, DisableCommand, EnableCommand, EndCommand, ExitCommand,
    HelpCommand, ShowCommand, SnmpCommand,
};
use super::state::DeviceState;

/// 접속 직후의 최상위 메뉴.
pub const TOP_LEVEL: LoopKind = LoopKind("top-level");

/// `configure terminal`로 들어가는 설정 메뉴.
pub const CONFIG_TERMINAL: LoopKind = LoopKind("config-terminal");

/// 장비 프로필 전체 레지스트리를 조립한다.
///
/// `exit`는 모든 메뉴에서 명령으로 처리하므로 자동 종료 명령은 끈다.
/// 명령 간 상대 순서는 아래 선언 순서 그대로다.
pub fn build_registry() -> Result<ReplRegistry<DeviceState>, RegistryError> {
    ReplRegistry::build(vec![
        LoopSpec::new(TOP_LEVEL)
            .exit_command(None)
            .fallback(BadCommandFallback)
            .command(ExitCommand {
                to: TOP_LEVEL,
                exit_if_already_matches: true,
            })
            .command(HelpCommand)
            .command(EnableCommand)
            .command(DisableCommand)
            .command(ConfigureCommand)
            .command(ShowCommand),
        LoopSpec::new(CONFIG_TERMINAL)
            .exit_command(None)
            .fallback(BadCommandFallback)
            .command(ExitCommand {
                to: TOP_LEVEL,
                exit_if_already_matches: true,
            })
            .command(HelpCommand)
            .command(SnmpCommand)
            .command(EndCommand),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_registry_builds() {
        build_registry().expect("device profile must satisfy ordering invariants");
    }
}
