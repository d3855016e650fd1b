//! 인터페이스 계층: CLI, 장비 프로필, 리스너 부트스트랩.

pub mod cli;
pub mod device;
pub mod server;
