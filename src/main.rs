use std::path::PathBuf;
use std::process::ExitCode;

use block_plant_projection::app::{self, InputOverrides, OutputFormat, RunRequest};
use block_plant_projection::i18n::{self, Translator};
use block_plant_projection::config::DEFAULT_CONFIG_PATH;
use clap::Parser;
use env_logger::Env;

/// 재생 블록 공장 10년 재무 전망 계산기.
#[derive(Parser, Debug)]
#[command(name = "block_projection", version, long_about = None)]
struct Cli {
    /// 시나리오 설정 파일(없으면 기본값으로 생성)
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
    /// 보고서 언어(auto/ko/en)
    #[arg(short = 'L', long, default_value = "auto")]
    lang: String,
    /// 언어팩 TOML 디렉터리
    #[arg(long)]
    locales: Option<PathBuf>,
    /// 출력 형식
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
    /// 출력 파일(생략 시 표준 출력)
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// 덮어쓴 값을 설정 파일에 저장
    #[arg(long)]
    save_config: bool,

    /// 일일 반입량 [t/일]
    #[arg(long)]
    tons_per_day: Option<f64>,
    /// 블록 기준 단가 [$]
    #[arg(long)]
    block_price: Option<f64>,
    /// 반입 수수료 [$/t]
    #[arg(long)]
    tipping_fee: Option<f64>,
    /// 재활용품 단가 [$/t]
    #[arg(long)]
    recyclables_price: Option<f64>,
    /// CO2 크레딧 단가 [$/t]
    #[arg(long)]
    co2_price: Option<f64>,
    /// 침출수 크레딧 단가 [$/m3]
    #[arg(long)]
    leachate_price: Option<f64>,
    /// 초기 투자비 [$]
    #[arg(long)]
    capex: Option<f64>,
    /// 법인세율 [%]
    #[arg(long)]
    tax_pct: Option<f64>,
    /// 연간 물가상승률 [%]
    #[arg(long)]
    inflation_pct: Option<f64>,
    /// 목표 투자회수 기간 [년]
    #[arg(long)]
    roi_target: Option<u32>,
    /// 전망 기간 [년]
    #[arg(long)]
    horizon: Option<u32>,
}

impl Cli {
    fn overrides(&self) -> InputOverrides {
        InputOverrides {
            daily_intake_tons: self.tons_per_day,
            base_block_price: self.block_price,
            tipping_fee_per_ton: self.tipping_fee,
            recyclables_price_per_ton: self.recyclables_price,
            co2_credit_price_per_ton: self.co2_price,
            leachate_credit_price_per_m3: self.leachate_price,
            capital_outlay: self.capex,
            income_tax_rate: self.tax_pct.map(|p| p / 100.0),
            inflation_rate: self.inflation_pct.map(|p| p / 100.0),
            target_roi_years: self.roi_target,
            horizon_years: self.horizon,
        }
    }
}

/// 프로그램의 엔트리 포인트. 설정을 로드한 뒤 전망을 계산해 출력한다.
fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let req = RunRequest {
        config_path: cli.config.clone(),
        language: cli.lang.clone(),
        locales_dir: cli.locales.clone(),
        overrides: cli.overrides(),
        format: cli.format,
        output: cli.output.clone(),
        save_config: cli.save_config,
    };
    match app::run(&req) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let lang = i18n::resolve_language(&cli.lang, None);
            let tr = Translator::new_with_pack(&lang, cli.locales.as_deref());
            eprintln!("{}", app::error_line(&err, &tr));
            ExitCode::FAILURE
        }
    }
}
