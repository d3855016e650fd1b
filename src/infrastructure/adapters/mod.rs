//! 라인 소스 포트 구현 어댑터.

mod stdio;
mod telnet;

pub use stdio::StdioLineSource;
pub use telnet::TelnetLineSource;
