//! CLI 인터페이스 모듈.

mod command;
mod composition;

pub use command::{Cli, CliAction};
pub use composition::AppComposition;
