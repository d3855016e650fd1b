//! 설정 파일 탐색/병합 로더.

use std::collections::HashSet;
use std::env;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde_json::json;

use crate::application::ports::ConfigRepository;

use super::types::{DeviceConfig, ResolvedConfig};

/// JSON 설정 파일을 병합해 로딩하는 저장소 어댑터.
pub struct JsonConfigRepository;

impl ConfigRepository for JsonConfigRepository {
    fn load(&self) -> Result<ResolvedConfig> {
        Ok(load_merged_config()?.config.resolve())
    }

    fn inspect_pretty_json(&self) -> Result<String> {
        let loaded = load_merged_config()?;
        let resolved = loaded.config.resolve();

        let inspection = json!({
            "searched_paths": loaded
                .searched_paths
                .iter()
                .map(|path| path.display().to_string())
                .collect::<Vec<_>>(),
            "loaded_paths": loaded
                .loaded_paths
                .iter()
                .map(|path| path.display().to_string())
                .collect::<Vec<_>>(),
            "effective": {
                "listen": resolved.listen,
                "hostname": resolved.hostname,
                "username": resolved.username,
                "password": mask_secret(&resolved.password),
                "enable_password": mask_secret(&resolved.enable_password),
                "motd": resolved.motd,
            },
        });

        serde_json::to_string_pretty(&inspection).context("failed to render config inspection")
    }
}

struct LoadedConfig {
    config: DeviceConfig,
    searched_paths: Vec<PathBuf>,
    loaded_paths: Vec<PathBuf>,
}

/// 우선순위 경로를 순회해 JSON 설정을 병합하고 환경 변수를 얹는다.
fn load_merged_config() -> Result<LoadedConfig> {
    // 낮은 우선순위에서 높은 우선순위 순서로 병합한다.
    let mut merged = DeviceConfig::default();
    let mut loaded_paths = Vec::new();
    let paths = config_paths();

    for path in &paths {
        if !path.exists() {
            continue;
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config at {}", path.display()))?;
        let parsed: DeviceConfig = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse JSON in {}", path.display()))?;
        merged.merge_from(parsed);
        loaded_paths.push(path.to_path_buf());
    }

    merged.apply_env_overrides();

    Ok(LoadedConfig {
        config: merged,
        searched_paths: paths,
        loaded_paths,
    })
}

/// 기본 + 사용자 + 프로젝트 + 명시 경로 순으로 병합 경로를 구성한다.
pub fn config_paths() -> Vec<PathBuf> {
    // 낮은 우선순위 -> 높은 우선순위 순서로 병합됨.
    let mut paths = vec![PathBuf::from("/etc/mockdev/config.json")];

    if let Some(base) = dirs::config_dir() {
        paths.push(base.join("mockdev").join("config.json"));
    }

    paths.push(PathBuf::from(".mockdev/config.json"));

    if let Ok(path) = env::var("MOCKDEV_CONFIG") {
        paths.push(PathBuf::from(path));
    }

    dedup_paths(paths)
}

fn dedup_paths(paths: Vec<PathBuf>) -> Vec<PathBuf> {
    let mut seen = HashSet::new();
    paths
        .into_iter()
        .filter(|path| seen.insert(path.clone()))
        .collect()
}

fn mask_secret(_secret: &str) -> &'static str {
    "***"
}
