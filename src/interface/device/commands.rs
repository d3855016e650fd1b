//! 장비 프로필의 예제 명령 집합.

use anyhow::Result;
use async_trait::async_trait;

use crate::application::repl::{
    Command, Fallback, Handler, HandlerRegistration, LoopId, LoopKind, ReplSession,
};
use crate::domain::command_line::CommandLine;
use crate::domain::matcher::{match_prefix, match_word};

use super::loops::CONFIG_TERMINAL;
use super::prompt::device_prompt;
use super::state::DeviceState;

const PRIVILEGE_REQUIRED: &str = "% Privileged mode required, run 'enable' first";

/// 루프에 등록된 명령 목록을 보여주는 `help`.
pub(super) struct HelpCommand;

impl Command<DeviceState> for HelpCommand {
    fn name(&self) -> &str {
        "help"
    }

    fn help_text(&self) -> &str {
        "shows this help text"
    }

    fn register_handlers(&self, reg: &mut HandlerRegistration<DeviceState>) {
        reg.register(match_word("help"), HelpHandler);
    }
}

struct HelpHandler;

#[async_trait]
impl Handler<DeviceState> for HelpHandler {
    async fn handle(
        &self,
        session: &mut ReplSession<DeviceState>,
        id: LoopId,
        _line: &CommandLine,
    ) -> Result<()> {
        let entries: Vec<(String, String)> = session
            .commands(id)
            .iter()
            .map(|command| (command.name().to_string(), command.help_text().to_string()))
            .collect();
        let widest = entries.iter().map(|(name, _)| name.len()).max().unwrap_or(0);

        session.console().write_line("available commands:").await?;
        for (name, help_text) in entries {
            let line = format!("  {name:<widest$} - {help_text}");
            session.console().write_line(&line).await?;
        }
        Ok(())
    }
}

/// 최상위 메뉴로 돌아가고, 이미 최상위라면 세션을 끝내는 `exit`.
pub(super) struct ExitCommand {
    pub to: LoopKind,
    pub exit_if_already_matches: bool,
}

impl Command<DeviceState> for ExitCommand {
    fn name(&self) -> &str {
        "exit"
    }

    fn help_text(&self) -> &str {
        "returns to top level menu or quits session if already at top level"
    }

    fn register_handlers(&self, reg: &mut HandlerRegistration<DeviceState>) {
        reg.register(
            match_word("exit"),
            ExitHandler {
                to: self.to,
                exit_if_already_matches: self.exit_if_already_matches,
            },
        );
    }
}

struct ExitHandler {
    to: LoopKind,
    exit_if_already_matches: bool,
}

#[async_trait]
impl Handler<DeviceState> for ExitHandler {
    async fn handle(
        &self,
        session: &mut ReplSession<DeviceState>,
        id: LoopId,
        _line: &CommandLine,
    ) -> Result<()> {
        if session.kind(id) == self.to {
            if self.exit_if_already_matches {
                session.exit(id);
            }
        } else {
            session.exit_to_kind(id, self.to);
        }
        Ok(())
    }
}

/// 현재 메뉴 하나만 빠져나가는 `end`.
pub(super) struct EndCommand;

impl Command<DeviceState> for EndCommand {
    fn name(&self) -> &str {
        "end"
    }

    fn help_text(&self) -> &str {
        "exits current menu"
    }

    fn register_handlers(&self, reg: &mut HandlerRegistration<DeviceState>) {
        reg.register(match_word("end"), EndHandler);
    }
}

struct EndHandler;

#[async_trait]
impl Handler<DeviceState> for EndHandler {
    async fn handle(
        &self,
        session: &mut ReplSession<DeviceState>,
        id: LoopId,
        _line: &CommandLine,
    ) -> Result<()> {
        session.exit(id);
        Ok(())
    }
}

/// 특권 모드로 전환하는 `enable`. 비밀번호는 에코 없이 받는다.
pub(super) struct EnableCommand;

impl Command<DeviceState> for EnableCommand {
    fn name(&self) -> &str {
        "enable"
    }

    fn help_text(&self) -> &str {
        "gain access to privileged commands"
    }

    fn register_handlers(&self, reg: &mut HandlerRegistration<DeviceState>) {
        reg.register(match_word("enable"), EnableHandler);
    }
}

struct EnableHandler;

#[async_trait]
impl Handler<DeviceState> for EnableHandler {
    async fn handle(
        &self,
        session: &mut ReplSession<DeviceState>,
        id: LoopId,
        _line: &CommandLine,
    ) -> Result<()> {
        let expected = session.state().config.enable_password.clone();
        let password = session.console().prompt_hidden("Password: ").await?;

        if password.trim_end() == expected {
            let hostname = session.state().config.hostname.clone();
            session.state_mut().enabled = true;
            session.set_prompt(id, device_prompt(&hostname, true, None));
        } else {
            session.console().write_line("% Access denied").await?;
        }
        Ok(())
    }
}

/// 특권 모드를 해제하는 `disable`.
pub(super) struct DisableCommand;

impl Command<DeviceState> for DisableCommand {
    fn name(&self) -> &str {
        "disable"
    }

    fn help_text(&self) -> &str {
        "drop access to privileged commands"
    }

    fn register_handlers(&self, reg: &mut HandlerRegistration<DeviceState>) {
        reg.register(match_word("disable"), DisableHandler);
    }
}

struct DisableHandler;

#[async_trait]
impl Handler<DeviceState> for DisableHandler {
    async fn handle(
        &self,
        session: &mut ReplSession<DeviceState>,
        id: LoopId,
        _line: &CommandLine,
    ) -> Result<()> {
        let hostname = session.state().config.hostname.clone();
        session.state_mut().enabled = false;
        session.set_prompt(id, device_prompt(&hostname, false, None));
        Ok(())
    }
}

/// 설정 메뉴로 진입하는 `configure`.
/// 명시적 순서로 `configure terminal`을 단독 `configure`보다 먼저 평가한다.
pub(super) struct ConfigureCommand;

impl Command<DeviceState> for ConfigureCommand {
    fn name(&self) -> &str {
        "configure"
    }

    fn help_text(&self) -> &str {
        "configure settings"
    }

    fn register_handlers(&self, reg: &mut HandlerRegistration<DeviceState>) {
        reg.register_ordered(
            1,
            match_prefix(["configure", "terminal"]),
            ConfigureTerminalHandler,
        );
        reg.register_ordered(2, match_word("configure"), ConfigureHintHandler);
    }
}

struct ConfigureTerminalHandler;

#[async_trait]
impl Handler<DeviceState> for ConfigureTerminalHandler {
    async fn handle(
        &self,
        session: &mut ReplSession<DeviceState>,
        id: LoopId,
        _line: &CommandLine,
    ) -> Result<()> {
        if !session.state().enabled {
            session.console().write_line(PRIVILEGE_REQUIRED).await?;
            return Ok(());
        }

        let hostname = session.state().config.hostname.clone();
        let prompt = device_prompt(&hostname, true, Some("config"));
        let child = session.enter(id, CONFIG_TERMINAL, prompt)?;
        session.run(child).await
    }
}

struct ConfigureHintHandler;

#[async_trait]
impl Handler<DeviceState> for ConfigureHintHandler {
    async fn handle(
        &self,
        session: &mut ReplSession<DeviceState>,
        _id: LoopId,
        _line: &CommandLine,
    ) -> Result<()> {
        session
            .console()
            .write_line("% Incomplete command, try 'configure terminal'")
            .await
    }
}

/// SNMP 설정을 흉내 내는 `snmp` / `no snmp`.
pub(super) struct SnmpCommand;

impl Command<DeviceState> for SnmpCommand {
    fn name(&self) -> &str {
        "snmp"
    }

    fn help_text(&self) -> &str {
        "change SNMP settings"
    }

    fn register_handlers(&self, reg: &mut HandlerRegistration<DeviceState>) {
        reg.register(match_word("snmp"), SnmpSetHandler);
        reg.register(match_prefix(["no", "snmp"]), SnmpUnsetHandler);
    }
}

struct SnmpSetHandler;

#[async_trait]
impl Handler<DeviceState> for SnmpSetHandler {
    async fn handle(
        &self,
        session: &mut ReplSession<DeviceState>,
        _id: LoopId,
        line: &CommandLine,
    ) -> Result<()> {
        let message = format!("changed snmp-server settings: {:?}", line.args());
        session.console().write_line(&message).await
    }
}

struct SnmpUnsetHandler;

#[async_trait]
impl Handler<DeviceState> for SnmpUnsetHandler {
    async fn handle(
        &self,
        session: &mut ReplSession<DeviceState>,
        _id: LoopId,
        line: &CommandLine,
    ) -> Result<()> {
        let message = format!("removed snmp-server settings: {:?}", line.args());
        session.console().write_line(&message).await
    }
}

/// 장비 정보를 보여주는 `show`.
pub(super) struct ShowCommand;

impl Command<DeviceState> for ShowCommand {
    fn name(&self) -> &str {
        "show"
    }

    fn help_text(&self) -> &str {
        "shows device information"
    }

    fn register_handlers(&self, reg: &mut HandlerRegistration<DeviceState>) {
        reg.register_ordered(1, match_prefix(["show", "version"]), ShowVersionHandler);
        reg.register_ordered(
            2,
            match_prefix(["show", "running-config"]),
            ShowRunningConfigHandler,
        );
        reg.register_ordered(3, match_word("show"), ShowHintHandler);
    }
}

struct ShowVersionHandler;

#[async_trait]
impl Handler<DeviceState> for ShowVersionHandler {
    async fn handle(
        &self,
        session: &mut ReplSession<DeviceState>,
        _id: LoopId,
        _line: &CommandLine,
    ) -> Result<()> {
        let hostname = session.state().config.hostname.clone();
        let banner = format!(
            "mockdev device emulation software, version {}",
            env!("CARGO_PKG_VERSION")
        );
        session.console().write_line(&banner).await?;
        session
            .console()
            .write_line(&format!("{hostname} uptime is irrelevant"))
            .await
    }
}

struct ShowRunningConfigHandler;

#[async_trait]
impl Handler<DeviceState> for ShowRunningConfigHandler {
    async fn handle(
        &self,
        session: &mut ReplSession<DeviceState>,
        _id: LoopId,
        _line: &CommandLine,
    ) -> Result<()> {
        if !session.state().enabled {
            session.console().write_line(PRIVILEGE_REQUIRED).await?;
            return Ok(());
        }

        let hostname = session.state().config.hostname.clone();
        let config = format!(
            "Current configuration:\n!\nhostname {hostname}\n!\nsnmp-server community public\n!\nend"
        );
        session.console().write_line(&config).await
    }
}

struct ShowHintHandler;

#[async_trait]
impl Handler<DeviceState> for ShowHintHandler {
    async fn handle(
        &self,
        session: &mut ReplSession<DeviceState>,
        _id: LoopId,
        _line: &CommandLine,
    ) -> Result<()> {
        session
            .console()
            .write_line("% Incomplete command, try 'show version'")
            .await
    }
}

/// 장비 말투의 오류 메시지를 쓰는 대체 경로.
pub(super) struct BadCommandFallback;

#[async_trait]
impl Fallback<DeviceState> for BadCommandFallback {
    async fn handle(
        &self,
        session: &mut ReplSession<DeviceState>,
        _id: LoopId,
        line: &CommandLine,
    ) -> Result<()> {
        tracing::debug!(word = line.word(), "unhandled device command");
        session.console().write_line("% Invalid input detected").await
    }
}
