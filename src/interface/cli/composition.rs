//! 애플리케이션 조립(composition root) 모듈.

use anyhow::Result;

use crate::application::ports::ConfigRepository;
use crate::infrastructure::config::JsonConfigRepository;
use crate::interface::device;
use crate::interface::server;

/// 실행 시점 의존성을 한 곳에서 조립하는 컨테이너.
pub struct AppComposition {
    config_repo: JsonConfigRepository,
}

impl Default for AppComposition {
    fn default() -> Self {
        Self {
            config_repo: JsonConfigRepository,
        }
    }
}

impl AppComposition {
    /// 병합된 유효 설정을 점검용 JSON으로 돌려준다.
    pub fn inspect_config(&self) -> Result<String> {
        self.config_repo.inspect_pretty_json()
    }

    /// TCP 리스너를 띄워 장비 세션을 서비스한다.
    pub async fn serve(&self, listen_override: Option<String>) -> Result<()> {
        let mut config = self.config_repo.load()?;
        if let Some(listen) = listen_override {
            config.listen = listen;
        }

        // 순서 불변식 위반은 어떤 연결을 받기 전에 여기서 실패한다.
        let registry = device::build_registry()?;
        server::serve(config, registry).await
    }

    /// 로컬 터미널에서 세션 하나를 실행한다.
    pub async fn local_session(&self) -> Result<()> {
        let config = self.config_repo.load()?;
        let registry = device::build_registry()?;
        server::local_session(config, registry).await
    }
}
