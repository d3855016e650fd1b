//! 장비 세션을 연결에 바인딩하는 리스너 부트스트랩.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;

use crate::application::repl::ReplRegistry;
use crate::infrastructure::adapters::{StdioLineSource, TelnetLineSource};
use crate::infrastructure::config::ResolvedConfig;
use crate::interface::device::{self, DeviceState};

/// 설정된 주소에 리스너를 열고 연결마다 독립 세션 태스크를 띄운다.
pub async fn serve(config: ResolvedConfig, registry: ReplRegistry<DeviceState>) -> Result<()> {
    let listener = TcpListener::bind(&config.listen)
        .await
        .with_context(|| format!("failed to bind listener on {}", config.listen))?;
    tracing::info!(addr = %config.listen, "mock device listening");

    let config = Arc::new(config);
    let registry = Arc::new(registry);

    loop {
        let (stream, peer) = listener
            .accept()
            .await
            .context("failed to accept connection")?;
        tracing::info!(peer = %peer, "connection received");

        let config = Arc::clone(&config);
        let registry = Arc::clone(&registry);

        tokio::spawn(async move {
            let source = match TelnetLineSource::negotiate(stream).await {
                Ok(source) => source,
                Err(err) => {
                    tracing::warn!(peer = %peer, error = %err, "telnet negotiation failed");
                    return;
                }
            };

            match device::run_session(Box::new(source), config, registry).await {
                Ok(()) => tracing::info!(peer = %peer, "session closed"),
                Err(err) => tracing::warn!(peer = %peer, error = %err, "session ended with error"),
            }
        });
    }
}

/// 로컬 터미널에서 세션 하나를 실행한다.
pub async fn local_session(
    config: ResolvedConfig,
    registry: ReplRegistry<DeviceState>,
) -> Result<()> {
    let source = StdioLineSource::new();
    device::run_session(Box::new(source), Arc::new(config), Arc::new(registry)).await
}
