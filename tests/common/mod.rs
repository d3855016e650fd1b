//! 통합 테스트용 라인 소스 테스트 더블.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use anyhow::{Result, anyhow, bail};
use async_trait::async_trait;

use mockdev::application::ports::LineSource;

/// 큐에 든 입력 줄을 차례로 돌려주고 모든 출력을 기록하는 더블.
/// 스크립트가 바닥나면 읽기가 실패해 전송 단절을 흉내 낸다.
pub struct ScriptedLineSource {
    input: VecDeque<String>,
    output: Arc<Mutex<Vec<String>>>,
    echo: bool,
    line_mode: bool,
}

impl ScriptedLineSource {
    pub fn new(lines: &[&str]) -> (Self, Arc<Mutex<Vec<String>>>) {
        let output = Arc::new(Mutex::new(Vec::new()));
        let source = Self {
            input: lines.iter().map(|line| line.to_string()).collect(),
            output: Arc::clone(&output),
            echo: true,
            line_mode: true,
        };
        (source, output)
    }
}

#[async_trait]
impl LineSource for ScriptedLineSource {
    async fn write(&mut self, text: &str) -> Result<()> {
        self.output
            .lock()
            .expect("output lock poisoned")
            .push(text.to_string());
        Ok(())
    }

    async fn read_line(&mut self) -> Result<String> {
        match self.input.pop_front() {
            Some(line) => Ok(line),
            None => bail!("script exhausted"),
        }
    }

    async fn read_char(&mut self) -> Result<char> {
        match self.input.pop_front() {
            Some(line) => line.chars().next().ok_or_else(|| anyhow!("empty key script")),
            None => bail!("script exhausted"),
        }
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

/// 기록된 출력 전체를 이어 붙인다.
pub fn output_text(output: &Arc<Mutex<Vec<String>>>) -> String {
    output.lock().expect("output lock poisoned").join("")
}

/// 기록된 쓰기 호출 중 `text`와 정확히 일치한 횟수.
pub fn count_writes(output: &Arc<Mutex<Vec<String>>>, text: &str) -> usize {
    output
        .lock()
        .expect("output lock poisoned")
        .iter()
        .filter(|written| written.as_str() == text)
        .count()
}
