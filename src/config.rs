use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::projection::kpi::DashboardTargets;
use crate::projection::product_mix::{self, ProductMixEntry};
use crate::projection::{ProductMix, ProductMixError, SimulationInputs, DEFAULT_HORIZON_YEARS};

/// 기본 시나리오 파일 이름.
pub const DEFAULT_CONFIG_PATH: &str = "projection.toml";

/// 시나리오 설정(입력값, 제품 구성, 표시 옵션)을 표현한다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// 보고서 언어 코드(auto/ko/en)
    #[serde(default = "default_language")]
    pub language: String,
    /// 1년차 달력 연도
    #[serde(default = "default_start_year")]
    pub start_year: i32,
    #[serde(default = "default_horizon")]
    pub horizon_years: u32,
    #[serde(default)]
    pub inputs: SimulationInputs,
    #[serde(default = "product_mix::default_entries")]
    pub product_mix: Vec<ProductMixEntry>,
    #[serde(default)]
    pub dashboard: DashboardTargets,
}

fn default_language() -> String {
    "auto".to_string()
}

fn default_start_year() -> i32 {
    2025
}

fn default_horizon() -> u32 {
    DEFAULT_HORIZON_YEARS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: default_language(),
            start_year: default_start_year(),
            horizon_years: default_horizon(),
            inputs: SimulationInputs::default(),
            product_mix: product_mix::default_entries(),
            dashboard: DashboardTargets::default(),
        }
    }
}

/// 설정 로드/저장 시 발생 가능한 오류를 표현한다.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 파일 입출력 오류
    #[error("파일 입출력 오류: {0}")]
    Io(#[from] std::io::Error),
    /// TOML 역직렬화 오류
    #[error("설정 파싱 오류: {0}")]
    Serde(#[from] toml::de::Error),
    /// TOML 직렬화 오류
    #[error("설정 직렬화 오류: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// 설정 파일을 로드하거나 없으면 기본 설정을 생성한다.
pub fn load_or_default(path: &Path) -> Result<Config, ConfigError> {
    if path.exists() {
        let content = fs::read_to_string(path)?;
        let cfg: Config = toml::from_str(&content)?;
        log::debug!("loaded scenario from {}", path.display());
        Ok(cfg)
    } else {
        let cfg = Config::default();
        save_config(&cfg, path)?;
        log::info!("created default scenario at {}", path.display());
        Ok(cfg)
    }
}

fn save_config(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    let content = toml::to_string_pretty(cfg)?;
    fs::write(path, content)?;
    Ok(())
}

impl Config {
    /// 설정을 파일에 저장한다.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        save_config(self, path)
    }

    /// 제품 구성을 검증된 형태로 변환한다.
    pub fn product_mix(&self) -> Result<ProductMix, ProductMixError> {
        ProductMix::new(self.product_mix.clone())
    }
}
