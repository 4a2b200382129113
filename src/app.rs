use std::fs;
use std::path::PathBuf;

use log::info;
use thiserror::Error;

use crate::config::{self, Config, ConfigError};
use crate::i18n::{self, keys, Translator};
use crate::indicators::{IndicatorError, IndicatorTable};
use crate::projection::{ProductMixError, ProjectionError, ProjectionModel, SimulationResult};
use crate::report;

/// 애플리케이션 실행 중 발생 가능한 오류를 표현한다.
#[derive(Debug, Error)]
pub enum AppError {
    /// 파일 입출력 오류
    #[error("입출력 오류: {0}")]
    Io(#[from] std::io::Error),
    /// 설정 저장/로드 오류
    #[error("설정 오류: {0}")]
    Config(#[from] ConfigError),
    /// 제품 구성 오류
    #[error("제품 구성 오류: {0}")]
    ProductMix(#[from] ProductMixError),
    /// 전망 계산 오류
    #[error("전망 계산 오류: {0}")]
    Projection(#[from] ProjectionError),
    /// 지표 테이블 오류
    #[error("지표 테이블 오류: {0}")]
    Indicators(#[from] IndicatorError),
    /// JSON 직렬화 오류
    #[error("JSON 직렬화 오류: {0}")]
    Json(#[from] serde_json::Error),
    /// TOML 직렬화 오류
    #[error("TOML 직렬화 오류: {0}")]
    Toml(#[from] toml::ser::Error),
}

/// 출력 형식.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// 터미널 보고서
    #[default]
    Table,
    /// 전체 결과 JSON
    Json,
    /// 전체 결과 TOML
    Toml,
    /// 긴 형식 지표 테이블(TOML)
    Indicators,
}

/// 설정 파일 값을 덮어쓰는 명령줄 입력값.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputOverrides {
    pub daily_intake_tons: Option<f64>,
    pub base_block_price: Option<f64>,
    pub tipping_fee_per_ton: Option<f64>,
    pub recyclables_price_per_ton: Option<f64>,
    pub co2_credit_price_per_ton: Option<f64>,
    pub leachate_credit_price_per_m3: Option<f64>,
    pub capital_outlay: Option<f64>,
    pub income_tax_rate: Option<f64>,
    pub inflation_rate: Option<f64>,
    pub target_roi_years: Option<u32>,
    pub horizon_years: Option<u32>,
}

impl InputOverrides {
    /// 지정된 값만 설정에 반영한다.
    pub fn apply(&self, cfg: &mut Config) {
        let inputs = &mut cfg.inputs;
        let fields = [
            (self.daily_intake_tons, &mut inputs.daily_intake_tons),
            (self.base_block_price, &mut inputs.base_block_price),
            (self.tipping_fee_per_ton, &mut inputs.tipping_fee_per_ton),
            (
                self.recyclables_price_per_ton,
                &mut inputs.recyclables_price_per_ton,
            ),
            (
                self.co2_credit_price_per_ton,
                &mut inputs.co2_credit_price_per_ton,
            ),
            (
                self.leachate_credit_price_per_m3,
                &mut inputs.leachate_credit_price_per_m3,
            ),
            (self.capital_outlay, &mut inputs.capital_outlay),
            (self.income_tax_rate, &mut inputs.income_tax_rate),
            (self.inflation_rate, &mut inputs.inflation_rate),
        ];
        for (value, slot) in fields {
            if let Some(v) = value {
                *slot = v;
            }
        }
        if let Some(v) = self.target_roi_years {
            inputs.target_roi_years = v;
        }
        if let Some(v) = self.horizon_years {
            cfg.horizon_years = v;
        }
    }
}

/// 명령줄 실행 요청.
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub config_path: PathBuf,
    pub language: String,
    pub locales_dir: Option<PathBuf>,
    pub overrides: InputOverrides,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
    /// 덮어쓴 값을 설정 파일에 저장할지 여부
    pub save_config: bool,
}

/// 설정으로 전망을 계산한다.
pub fn simulate(cfg: &Config) -> Result<SimulationResult, AppError> {
    let mix = cfg.product_mix()?;
    let model = ProjectionModel {
        start_year: cfg.start_year,
        ..ProjectionModel::default()
    };
    Ok(model.run(&cfg.inputs, &mix, cfg.horizon_years)?)
}

/// 결과를 요청한 형식의 문자열로 만든다.
pub fn render(
    result: &SimulationResult,
    cfg: &Config,
    format: OutputFormat,
    tr: &Translator,
) -> Result<String, AppError> {
    Ok(match format {
        OutputFormat::Table => report::render(result, &cfg.dashboard, tr),
        OutputFormat::Json => serde_json::to_string_pretty(result)?,
        OutputFormat::Toml => toml::to_string_pretty(result)?,
        OutputFormat::Indicators => IndicatorTable::from_result(result).to_toml_string()?,
    })
}

/// 사용자에게 보여줄 오류 한 줄.
pub fn error_line(err: &AppError, tr: &Translator) -> String {
    format!("{}: {err}", tr.t(keys::ERROR_PREFIX))
}

/// CLI 한 번의 실행: 설정 로드 → 덮어쓰기 → 계산 → (저장) → 출력.
pub fn run(req: &RunRequest) -> Result<(), AppError> {
    let mut cfg = config::load_or_default(&req.config_path)?;
    req.overrides.apply(&mut cfg);

    let lang = i18n::resolve_language(&req.language, Some(cfg.language.as_str()));
    let tr = Translator::new_with_pack(&lang, req.locales_dir.as_deref());

    let result = simulate(&cfg)?;
    // 검증을 통과한 시나리오만 저장한다.
    if req.save_config {
        cfg.save(&req.config_path)?;
        info!("saved scenario to {}", req.config_path.display());
    }
    let text = render(&result, &cfg, req.format, &tr)?;
    match &req.output {
        Some(path) => {
            fs::write(path, text)?;
            info!("wrote {:?} output to {}", req.format, path.display());
        }
        None => print!("{text}"),
    }
    Ok(())
}
