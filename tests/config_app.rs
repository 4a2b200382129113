use std::fs;
use std::path::PathBuf;

use block_plant_projection::app::{self, InputOverrides, OutputFormat, RunRequest};
use block_plant_projection::config::{self, Config};
use block_plant_projection::i18n::Translator;

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "block_projection_{}_{name}",
        std::process::id()
    ))
}

#[test]
fn missing_config_is_created_with_defaults() {
    let path = temp_path("created.toml");
    let _ = fs::remove_file(&path);
    let cfg = config::load_or_default(&path).expect("load");
    assert_eq!(cfg, Config::default());
    assert!(path.exists());
    let reloaded = config::load_or_default(&path).expect("reload");
    assert_eq!(reloaded, cfg);
    let _ = fs::remove_file(&path);
}

#[test]
fn partial_config_fills_defaults() {
    let src = r#"
language = "ko"
horizon_years = 5

[inputs]
daily_intake_tons = 450.0
base_block_price = 0.6
tipping_fee_per_ton = 12.0
recyclables_price_per_ton = 100.0
co2_credit_price_per_ton = 20.0
leachate_credit_price_per_m3 = 8.0
capital_outlay = 8000000.0
income_tax_rate = 0.25
inflation_rate = 0.02
target_roi_years = 4
"#;
    let cfg: Config = toml::from_str(src).expect("parse");
    assert_eq!(cfg.language, "ko");
    assert_eq!(cfg.horizon_years, 5);
    assert_eq!(cfg.start_year, 2025);
    assert_eq!(cfg.inputs.daily_intake_tons, 450.0);
    assert_eq!(cfg.product_mix.len(), 3);

    let res = app::simulate(&cfg).expect("simulate");
    assert_eq!(res.years.len(), 5);
}

#[test]
fn overrides_only_touch_given_fields() {
    let mut cfg = Config::default();
    let overrides = InputOverrides {
        daily_intake_tons: Some(600.0),
        income_tax_rate: Some(0.0),
        horizon_years: Some(7),
        ..InputOverrides::default()
    };
    overrides.apply(&mut cfg);
    assert_eq!(cfg.inputs.daily_intake_tons, 600.0);
    assert_eq!(cfg.inputs.income_tax_rate, 0.0);
    assert_eq!(cfg.horizon_years, 7);
    assert_eq!(cfg.inputs.base_block_price, 0.55);
}

#[test]
fn invalid_mix_in_config_is_reported() {
    let mut cfg = Config::default();
    cfg.product_mix[0].share = 0.9;
    assert!(matches!(
        app::simulate(&cfg),
        Err(app::AppError::ProductMix(_))
    ));
}

#[test]
fn every_output_format_renders() {
    let cfg = Config::default();
    let res = app::simulate(&cfg).expect("simulate");
    let tr = Translator::new("en");

    let table = app::render(&res, &cfg, OutputFormat::Table, &tr).expect("table");
    assert!(table.contains("Block Plant Financial Projection"));
    assert!(table.contains("$5,000,000"));
    assert!(table.contains("2034"));

    let json = app::render(&res, &cfg, OutputFormat::Json, &tr).expect("json");
    let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");
    assert_eq!(value["years"].as_array().map(Vec::len), Some(10));
    assert_eq!(
        value["years"][0]["investor"]["capital_return_payment"].as_f64(),
        Some(5_000_000.0)
    );

    let toml_out = app::render(&res, &cfg, OutputFormat::Toml, &tr).expect("toml");
    assert!(toml_out.contains("[[years]]"));

    let indicators = app::render(&res, &cfg, OutputFormat::Indicators, &tr).expect("indicators");
    assert!(indicators.contains("[[rows]]"));
    assert!(indicators.contains("Environmental"));
}

#[test]
fn korean_report_uses_korean_labels() {
    let cfg = Config::default();
    let res = app::simulate(&cfg).expect("simulate");
    let text = app::render(&res, &cfg, OutputFormat::Table, &Translator::new("ko")).expect("table");
    assert!(text.contains("손익계산서"));
}

#[test]
fn rejected_run_does_not_save_overrides() {
    let path = temp_path("rejected.toml");
    let out = temp_path("rejected_out.toml");
    let _ = fs::remove_file(&path);
    Config::default().save(&path).expect("seed config");

    let req = RunRequest {
        config_path: path.clone(),
        language: "en".into(),
        locales_dir: None,
        overrides: InputOverrides {
            income_tax_rate: Some(1.5),
            ..InputOverrides::default()
        },
        format: OutputFormat::Json,
        output: Some(out.clone()),
        save_config: true,
    };
    assert!(matches!(app::run(&req), Err(app::AppError::Projection(_))));
    let on_disk = config::load_or_default(&path).expect("reload");
    assert_eq!(on_disk.inputs.income_tax_rate, 0.30);
    assert!(!out.exists());

    let req = RunRequest {
        overrides: InputOverrides {
            income_tax_rate: Some(0.25),
            ..InputOverrides::default()
        },
        ..req
    };
    app::run(&req).expect("valid run");
    let on_disk = config::load_or_default(&path).expect("reload");
    assert_eq!(on_disk.inputs.income_tax_rate, 0.25);
    assert!(out.exists());

    let _ = fs::remove_file(&path);
    let _ = fs::remove_file(&out);
}

#[test]
fn error_line_uses_translated_prefix() {
    let mut cfg = Config::default();
    cfg.horizon_years = 0;
    let err = app::simulate(&cfg).unwrap_err();
    let en = app::error_line(&err, &Translator::new("en"));
    assert!(en.starts_with("Error: "), "{en}");
    assert!(en.contains("horizon_years"), "{en}");
    let ko = app::error_line(&err, &Translator::new("ko"));
    assert!(ko.starts_with("오류: "), "{ko}");
}
