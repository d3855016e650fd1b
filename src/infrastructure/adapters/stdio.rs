//! 로컬 터미널 라인 소스 어댑터.
//!
//! 에코가 켜진 일반 입력은 터미널의 기본 라인 편집에 맡기고,
//! 숨김 입력과 단일 키 입력만 crossterm 원시 모드의 키 이벤트
//! 루프로 직접 처리한다.

use std::io::Write;

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use tokio::io::{AsyncBufReadExt, BufReader, Stdin};

use crate::application::ports::LineSource;

/// `mockdev local`용 표준 입출력 라인 소스.
pub struct StdioLineSource {
    stdin: BufReader<Stdin>,
    echo: bool,
    line_mode: bool,
}

impl StdioLineSource {
    pub fn new() -> Self {
        Self {
            stdin: BufReader::new(tokio::io::stdin()),
            echo: true,
            line_mode: true,
        }
    }
}

impl Default for StdioLineSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LineSource for StdioLineSource {
    async fn write(&mut self, text: &str) -> Result<()> {
        let mut stdout = std::io::stdout();
        stdout
            .write_all(text.as_bytes())
            .context("failed to write to stdout")?;
        stdout.flush().context("failed to flush stdout")?;
        Ok(())
    }

    async fn read_line(&mut self) -> Result<String> {
        if !self.echo {
            return tokio::task::spawn_blocking(read_line_raw_hidden)
                .await
                .context("blocking input task failed")?;
        }

        let mut line = String::new();
        let read = self
            .stdin
            .read_line(&mut line)
            .await
            .context("failed to read from stdin")?;
        if read == 0 {
            bail!("stdin closed");
        }
        Ok(trim_newline(line))
    }

    async fn read_char(&mut self) -> Result<char> {
        tokio::task::spawn_blocking(read_single_key)
            .await
            .context("blocking input task failed")?
    }

    async fn set_echo(&mut self, echo: bool) -> Result<bool> {
        let previous = self.echo;
        self.echo = echo;
        Ok(previous)
    }

    async fn set_line_mode(&mut self, line_mode: bool) -> Result<bool> {
        let previous = self.line_mode;
        self.line_mode = line_mode;
        Ok(previous)
    }
}

fn trim_newline(mut line: String) -> String {
    while matches!(line.chars().last(), Some('\n' | '\r')) {
        line.pop();
    }
    line
}

/// 원시 모드에서 에코 없이 한 줄을 읽는다.
fn read_line_raw_hidden() -> Result<String> {
    let _guard = RawModeGuard::enter()?;

    let mut line = String::new();
    loop {
        if let Event::Key(key) = event::read().context("failed to read key event")? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match key.code {
                KeyCode::Enter => break,
                KeyCode::Backspace => {
                    line.pop();
                }
                KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    bail!("input interrupted")
                }
                KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                    line.push(ch);
                }
                _ => {}
            }
        }
    }
    Ok(line)
}

/// 원시 모드에서 키 하나를 읽는다.
fn read_single_key() -> Result<char> {
    let _guard = RawModeGuard::enter()?;

    loop {
        if let Event::Key(key) = event::read().context("failed to read key event")? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match key.code {
                KeyCode::Char(ch) => return Ok(ch),
                KeyCode::Enter => return Ok('\n'),
                _ => {}
            }
        }
    }
}

struct RawModeGuard;

impl RawModeGuard {
    fn enter() -> Result<Self> {
        terminal::enable_raw_mode().context("failed to enable raw mode")?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}
