//! 설정 타입과 병합/기본값 규칙.

use std::env;

use serde::{Deserialize, Serialize};

/// 설정 파일 하나에서 읽는 부분 설정.
/// 비어 있는 필드는 낮은 우선순위 값이나 기본값으로 채워진다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    pub listen: Option<String>,
    pub hostname: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub enable_password: Option<String>,
    pub motd: Option<String>,
}

impl DeviceConfig {
    /// 높은 우선순위 설정의 값으로 채워진 필드를 덮어쓴다.
    pub fn merge_from(&mut self, higher: DeviceConfig) {
        if higher.listen.is_some() {
            self.listen = higher.listen;
        }
        if higher.hostname.is_some() {
            self.hostname = higher.hostname;
        }
        if higher.username.is_some() {
            self.username = higher.username;
        }
        if higher.password.is_some() {
            self.password = higher.password;
        }
        if higher.enable_password.is_some() {
            self.enable_password = higher.enable_password;
        }
        if higher.motd.is_some() {
            self.motd = higher.motd;
        }
    }

    /// 환경 변수를 최우선 순위로 반영한다.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(value) = env::var("MOCKDEV_LISTEN") {
            self.listen = Some(value);
        }
        if let Ok(value) = env::var("MOCK_HOSTNAME") {
            self.hostname = Some(value);
        }
        if let Ok(value) = env::var("MOCK_USERNAME") {
            self.username = Some(value);
        }
        if let Ok(value) = env::var("MOCK_PASSWORD") {
            self.password = Some(value);
        }
        if let Ok(value) = env::var("MOCK_ENABLE_PASSWORD") {
            self.enable_password = Some(value);
        }
        if let Ok(value) = env::var("MOCK_MOTD") {
            self.motd = Some(value);
        }
    }

    /// 기본값을 채워 실행 시점 설정으로 확정한다.
    pub fn resolve(self) -> ResolvedConfig {
        let password = self.password.unwrap_or_else(|| "pass".to_string());

        ResolvedConfig {
            listen: self.listen.unwrap_or_else(|| "0.0.0.0:8023".to_string()),
            hostname: self.hostname.unwrap_or_else(|| "hostname".to_string()),
            username: self.username.unwrap_or_else(|| "root".to_string()),
            // 별도 지정이 없으면 enable 비밀번호는 로그인 비밀번호를 따른다.
            enable_password: self.enable_password.unwrap_or_else(|| password.clone()),
            password,
            motd: self
                .motd
                .unwrap_or_else(|| "Welcome to {hostname}, {username}!".to_string()),
        }
    }
}

/// 기본값이 모두 채워진 실행 시점 설정. 런타임에는 읽기 전용이다.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedConfig {
    pub listen: String,
    pub hostname: String,
    pub username: String,
    pub password: String,
    pub enable_password: String,
    pub motd: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_prefers_higher_priority_values() {
        let mut base = DeviceConfig {
            hostname: Some("base".to_string()),
            username: Some("admin".to_string()),
            ..DeviceConfig::default()
        };

        base.merge_from(DeviceConfig {
            hostname: Some("override".to_string()),
            ..DeviceConfig::default()
        });

        assert_eq!(base.hostname.as_deref(), Some("override"));
        assert_eq!(base.username.as_deref(), Some("admin"));
    }

    #[test]
    fn resolve_fills_defaults() {
        let resolved = DeviceConfig::default().resolve();
        assert_eq!(resolved.listen, "0.0.0.0:8023");
        assert_eq!(resolved.hostname, "hostname");
        assert_eq!(resolved.username, "root");
        assert_eq!(resolved.password, "pass");
        assert_eq!(resolved.enable_password, "pass");
    }

    #[test]
    fn enable_password_follows_login_password() {
        let resolved = DeviceConfig {
            password: Some("secret".to_string()),
            ..DeviceConfig::default()
        }
        .resolve();
        assert_eq!(resolved.enable_password, "secret");

        let resolved = DeviceConfig {
            password: Some("secret".to_string()),
            enable_password: Some("higher".to_string()),
            ..DeviceConfig::default()
        }
        .resolve();
        assert_eq!(resolved.enable_password, "higher");
    }
}
