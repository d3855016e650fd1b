//! TCP 스트림 위의 텔넷 계열 라인 소스 어댑터.
//!
//! 전송 프로토콜 자체는 코어 범위 밖이라 옵션 협상은 에코/라인 모드
//! 전환에 필요한 최소한(ECHO, SGA)만 다룬다. 입력에서 IAC 명령
//! 시퀀스를 걸러내고, 출력의 LF는 CRLF로 바꿔 쓴다.

use std::collections::VecDeque;

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};

use crate::application::ports::LineSource;

const IAC: u8 = 255;
const DONT: u8 = 254;
const DO: u8 = 253;
const WONT: u8 = 252;
const WILL: u8 = 251;
const SB: u8 = 250;
const SE: u8 = 240;

const OPT_ECHO: u8 = 1;
const OPT_SGA: u8 = 3;

/// 클라이언트 소켓 하나를 감싸는 텔넷 라인 소스.
pub struct TelnetLineSource {
    reader: OwnedReadHalf,
    writer: OwnedWriteHalf,
    pending: VecDeque<u8>,
    echo: bool,
    line_mode: bool,
}

impl TelnetLineSource {
    /// 스트림을 감싸고 초기 옵션을 협상한다.
    /// 에코는 기본적으로 클라이언트 로컬 처리에 맡긴다.
    pub async fn negotiate(stream: TcpStream) -> Result<Self> {
        let (reader, writer) = stream.into_split();
        let mut source = Self {
            reader,
            writer,
            pending: VecDeque::new(),
            echo: true,
            line_mode: true,
        };

        source.send_option(WILL, OPT_SGA).await?;
        Ok(source)
    }

    async fn send_option(&mut self, verb: u8, option: u8) -> Result<()> {
        self.writer
            .write_all(&[IAC, verb, option])
            .await
            .context("failed to send telnet option")?;
        self.writer
            .flush()
            .await
            .context("failed to flush telnet option")?;
        Ok(())
    }

    async fn next_raw(&mut self) -> Result<u8> {
        loop {
            if let Some(byte) = self.pending.pop_front() {
                return Ok(byte);
            }

            let mut chunk = [0u8; 512];
            let read = self
                .reader
                .read(&mut chunk)
                .await
                .context("read from client failed")?;
            if read == 0 {
                bail!("connection closed by client");
            }
            self.pending.extend(chunk[..read].iter().copied());
        }
    }

    /// 다음 데이터 바이트를 반환한다. 텔넷 명령 시퀀스는 소비하고 건너뛴다.
    async fn next_byte(&mut self) -> Result<u8> {
        loop {
            let byte = self.next_raw().await?;
            if byte != IAC {
                return Ok(byte);
            }

            let verb = self.next_raw().await?;
            match verb {
                // 이스케이프된 리터럴 0xFF
                IAC => return Ok(IAC),
                WILL | WONT | DO | DONT => {
                    let _option = self.next_raw().await?;
                }
                SB => {
                    // 서브협상은 IAC SE까지 통째로 버린다.
                    loop {
                        let byte = self.next_raw().await?;
                        if byte == IAC && self.next_raw().await? == SE {
                            break;
                        }
                    }
                }
                // NOP 등 2바이트 명령
                _ => {}
            }
        }
    }
}

#[async_trait]
impl LineSource for TelnetLineSource {
    async fn write(&mut self, text: &str) -> Result<()> {
        let payload = text.replace('\n', "\r\n");
        self.writer
            .write_all(payload.as_bytes())
            .await
            .context("write to client failed")?;
        self.writer.flush().await.context("flush to client failed")?;
        Ok(())
    }

    async fn read_line(&mut self) -> Result<String> {
        let mut line: Vec<u8> = Vec::new();
        loop {
            match self.next_byte().await? {
                // CR 단독/CR LF/LF 모두 줄 끝으로 취급한다. 짝이 따로
                // 도착해 빈 줄이 생겨도 상위 루프가 걸러낸다.
                b'\n' | b'\r' => break,
                // 문자 단위 클라이언트를 위한 최소 라인 편집
                0x08 | 0x7f => {
                    line.pop();
                }
                0 => {}
                byte => line.push(byte),
            }
        }
        Ok(String::from_utf8_lossy(&line).into_owned())
    }

    async fn read_char(&mut self) -> Result<char> {
        loop {
            match self.next_byte().await? {
                b'\r' | 0 => continue,
                byte => return Ok(char::from(byte)),
            }
        }
    }

    async fn set_echo(&mut self, echo: bool) -> Result<bool> {
        let previous = self.echo;
        if echo != self.echo {
            self.echo = echo;
            // 서버가 에코를 맡겠다고 선언하면 클라이언트는 로컬 에코를
            // 끈다. 실제로는 아무것도 되돌려 쓰지 않으므로 입력이 가려진다.
            let verb = if echo { WONT } else { WILL };
            self.send_option(verb, OPT_ECHO).await?;
        }
        Ok(previous)
    }

    async fn set_line_mode(&mut self, line_mode: bool) -> Result<bool> {
        let previous = self.line_mode;
        if line_mode != self.line_mode {
            self.line_mode = line_mode;
            // 문자 단위 입력은 에코 옵션 전환으로 클라이언트의 라인
            // 버퍼링을 푸는 고전적인 방식을 쓴다.
            let verb = if line_mode { WONT } else { WILL };
            self.send_option(verb, OPT_ECHO).await?;
        }
        Ok(previous)
    }
}
