//! 매치 기반 디스패치와 중첩 루프 스택으로 이루어진 REPL 엔진.

pub mod command;
pub mod dispatch;
pub mod registry;
pub mod session;

pub use command::{Command, HandlerRegistration, RegistryError};
pub use dispatch::{DispatchEntry, DispatchTable, Fallback, Handler, LoggingFallback};
pub use registry::{LoopKind, LoopSpec, ReplRegistry};
pub use session::{LoopId, ReplSession};
