use std::collections::HashMap;
use std::fs;
use std::path::Path;
use sys_locale::get_locale;

/// 문자열 키를 모아두는 네임스페이스.
pub mod keys {
    pub const ERROR_PREFIX: &str = "general.error_prefix";
    pub const REPORT_TITLE: &str = "report.title";
    pub const UNDEFINED: &str = "general.undefined";

    pub const HEADLINE_HEADING: &str = "headline.heading";
    pub const HEADLINE_NPV: &str = "headline.npv";
    pub const HEADLINE_IRR: &str = "headline.irr";
    pub const HEADLINE_IRR_NO_ROOT: &str = "headline.irr_no_root";
    pub const HEADLINE_AVG_EBITDA: &str = "headline.avg_ebitda";
    pub const HEADLINE_PRODUCTION: &str = "headline.production";
    pub const HEADLINE_CAPACITY: &str = "headline.capacity";
    pub const HEADLINE_SALES_TARGET: &str = "headline.sales_target";

    pub const WATERFALL_HEADING: &str = "waterfall.heading";
    pub const REV_BLOCKS: &str = "revenue.blocks";
    pub const REV_RECYCLABLES: &str = "revenue.recyclables";
    pub const REV_TIPPING: &str = "revenue.tipping";
    pub const REV_BONDS: &str = "revenue.bonds";
    pub const REV_TOTAL: &str = "revenue.total";
    pub const COST_OPEX: &str = "cost.opex";
    pub const COST_ENERGY: &str = "cost.energy";
    pub const COST_PAYROLL: &str = "cost.payroll";
    pub const COST_VARIABLE: &str = "cost.variable";
    pub const PL_TAXES: &str = "pl.taxes";
    pub const INV_CAPITAL_RETURN: &str = "investor.capital_return";
    pub const INV_DIVIDEND: &str = "investor.dividend";
    pub const INV_RETAINED: &str = "investor.retained";

    pub const MIX_HEADING: &str = "mix.heading";
    pub const COST_HEADING: &str = "cost.heading";
    pub const COST_OPEX_SHARE: &str = "cost.opex_share";

    pub const PL_HEADING: &str = "pl.heading";
    pub const COL_YEAR: &str = "col.year";
    pub const COL_REVENUE: &str = "col.revenue";
    pub const COL_OPEX: &str = "col.opex";
    pub const COL_EBITDA: &str = "col.ebitda";
    pub const COL_DEPRECIATION: &str = "col.depreciation";
    pub const COL_TAXES: &str = "col.taxes";
    pub const COL_NET_INCOME: &str = "col.net_income";

    pub const INVESTOR_HEADING: &str = "investor.heading";
    pub const COL_CAPITAL_RETURN: &str = "col.capital_return";
    pub const COL_DIVIDEND: &str = "col.dividend";
    pub const COL_INVESTOR_TOTAL: &str = "col.investor_total";
    pub const COL_BALANCE: &str = "col.balance";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Language {
    Ko,
    En,
}

impl Language {
    fn from_code(code: &str) -> Self {
        let c = code.to_lowercase();
        if c.starts_with("ko") {
            Language::Ko
        } else {
            Language::En
        }
    }
}

/// 런타임 언어 번들을 제공한다.
#[derive(Debug, Clone)]
pub struct Translator {
    lang: Language,
    overrides: Option<HashMap<String, String>>,
}

impl Translator {
    /// 언어 코드(ko/en)에 따라 번역기를 생성한다. 알 수 없는 코드는 en으로 폴백한다.
    pub fn new(lang_code: &str) -> Self {
        Self {
            lang: Language::from_code(lang_code),
            overrides: None,
        }
    }

    /// 언어 코드 + 언어팩 디렉터리(locales/ 등)를 받아서 번역기를 생성한다.
    /// 디렉터리가 없거나 파일이 없으면 내장 문자열만 사용한다.
    pub fn new_with_pack(lang_code: &str, pack_dir: Option<&Path>) -> Self {
        let overrides = pack_dir
            .and_then(|dir| load_overrides(dir, lang_code))
            .or_else(|| load_overrides(Path::new("locales"), lang_code));
        Self {
            lang: Language::from_code(lang_code),
            overrides,
        }
    }

    /// 번역을 가져온다. 언어팩 → 내장 문자열 순으로 찾는다.
    pub fn t<'a>(&'a self, key: &str) -> &'a str {
        if let Some(v) = self.overrides.as_ref().and_then(|m| m.get(key)) {
            return v;
        }
        match self.lang {
            Language::Ko => ko(key).or_else(|| en(key)).unwrap_or("[missing translation]"),
            Language::En => en(key).unwrap_or("[missing translation]"),
        }
    }
}

/// CLI 플래그/설정/시스템 순으로 언어 코드를 결정한다.
pub fn resolve_language(cli_arg: &str, config_lang: Option<&str>) -> String {
    normalize_lang(cli_arg)
        .or_else(|| config_lang.and_then(normalize_lang))
        .or_else(detect_system_language)
        .unwrap_or_else(|| "en".to_string())
}

fn normalize_lang(code: &str) -> Option<String> {
    let c = code.trim().to_lowercase();
    match c.as_str() {
        "auto" | "" => None,
        other if other.starts_with("ko") => Some("ko".into()),
        other if other.starts_with("en") => Some("en".into()),
        _ => None,
    }
}

fn normalize_locale_string(loc: &str) -> Option<String> {
    let lang = loc
        .split(['.', '_', '-'])
        .next()
        .unwrap_or_default()
        .to_lowercase();
    match lang.as_str() {
        "ko" => Some("ko".into()),
        "en" => Some("en".into()),
        _ => None,
    }
}

/// 시스템 로케일에서 언어를 추정한다.
pub fn detect_system_language() -> Option<String> {
    if let Some(loc) = get_locale() {
        if let Some(lang) = normalize_locale_string(&loc) {
            return Some(lang);
        }
    }
    for var in ["LANG", "LC_ALL"] {
        if let Ok(lang) = std::env::var(var) {
            if let Some(code) = normalize_locale_string(&lang) {
                return Some(code);
            }
        }
    }
    None
}

/// TOML 기반 언어팩을 로드한다. 중첩 테이블은 `a.b` 형태의 키로 평탄화한다.
fn load_overrides(dir: &Path, lang: &str) -> Option<HashMap<String, String>> {
    let path = dir.join(format!("{lang}.toml"));
    let content = fs::read_to_string(path).ok()?;
    let map = parse_toml_to_map(&content);
    if map.is_some() {
        log::debug!("loaded language pack '{lang}' from {}", dir.display());
    }
    map
}

fn parse_toml_to_map(src: &str) -> Option<HashMap<String, String>> {
    let value: toml::Value = toml::from_str(src).ok()?;
    let table = value.as_table()?;
    let mut map = HashMap::new();

    fn walk(prefix: &str, val: &toml::Value, out: &mut HashMap<String, String>) {
        match val {
            toml::Value::String(s) => {
                out.insert(prefix.to_string(), s.to_string());
            }
            toml::Value::Table(t) => {
                for (k, v) in t {
                    let key = if prefix.is_empty() {
                        k.clone()
                    } else {
                        format!("{prefix}.{k}")
                    };
                    walk(&key, v, out);
                }
            }
            _ => {}
        }
    }

    for (k, v) in table {
        walk(k, v, &mut map);
    }

    if map.is_empty() {
        None
    } else {
        Some(map)
    }
}

fn ko(key: &str) -> Option<&'static str> {
    use keys::*;
    Some(match key {
        ERROR_PREFIX => "오류",
        REPORT_TITLE => "=== 재생 블록 공장 재무 전망 ===",
        UNDEFINED => "정의되지 않음",
        HEADLINE_HEADING => "\n-- 핵심 지표 --",
        HEADLINE_NPV => "NPV(12%)",
        HEADLINE_IRR => "IRR",
        HEADLINE_IRR_NO_ROOT => "(실근 없음, 0으로 표시)",
        HEADLINE_AVG_EBITDA => "평균 EBITDA",
        HEADLINE_PRODUCTION => "연간 생산량(개)",
        HEADLINE_CAPACITY => "설비 가동률",
        HEADLINE_SALES_TARGET => "매출 목표 달성률",
        WATERFALL_HEADING => "\n-- 1년차 현금 흐름 --",
        REV_BLOCKS => "블록 매출",
        REV_RECYCLABLES => "재활용품 매출",
        REV_TIPPING => "반입 수수료",
        REV_BONDS => "환경 크레딧",
        REV_TOTAL => "총매출",
        COST_OPEX => "OPEX",
        COST_ENERGY => "에너지",
        COST_PAYROLL => "인건비",
        COST_VARIABLE => "변동비",
        PL_TAXES => "법인세",
        INV_CAPITAL_RETURN => "자본 반환",
        INV_DIVIDEND => "배당",
        INV_RETAINED => "사내 유보",
        MIX_HEADING => "\n-- 1년차 제품별 매출 --",
        COST_HEADING => "\n-- OPEX 45% 규칙 점검 --",
        COST_OPEX_SHARE => "OPEX/블록매출",
        PL_HEADING => "\n-- 손익계산서 --",
        COL_YEAR => "연도",
        COL_REVENUE => "매출",
        COL_OPEX => "OPEX",
        COL_EBITDA => "EBITDA",
        COL_DEPRECIATION => "감가상각",
        COL_TAXES => "법인세",
        COL_NET_INCOME => "순이익",
        INVESTOR_HEADING => "\n-- 투자자 지급 일정 --",
        COL_CAPITAL_RETURN => "자본반환",
        COL_DIVIDEND => "배당",
        COL_INVESTOR_TOTAL => "합계",
        COL_BALANCE => "미반환잔액",
        _ => return None,
    })
}

fn en(key: &str) -> Option<&'static str> {
    use keys::*;
    Some(match key {
        ERROR_PREFIX => "Error",
        REPORT_TITLE => "=== Block Plant Financial Projection ===",
        UNDEFINED => "undefined",
        HEADLINE_HEADING => "\n-- Headline --",
        HEADLINE_NPV => "NPV (12%)",
        HEADLINE_IRR => "IRR",
        HEADLINE_IRR_NO_ROOT => "(no real root, shown as 0)",
        HEADLINE_AVG_EBITDA => "Average EBITDA",
        HEADLINE_PRODUCTION => "Annual production (units)",
        HEADLINE_CAPACITY => "Plant utilization",
        HEADLINE_SALES_TARGET => "Sales target attainment",
        WATERFALL_HEADING => "\n-- Year 1 cash flow --",
        REV_BLOCKS => "Block sales",
        REV_RECYCLABLES => "Recyclables",
        REV_TIPPING => "Tipping fees",
        REV_BONDS => "Environmental credits",
        REV_TOTAL => "Total revenue",
        COST_OPEX => "OPEX",
        COST_ENERGY => "Energy",
        COST_PAYROLL => "Payroll",
        COST_VARIABLE => "Variable",
        PL_TAXES => "Taxes",
        INV_CAPITAL_RETURN => "Capital return",
        INV_DIVIDEND => "Dividends",
        INV_RETAINED => "Retained cash",
        MIX_HEADING => "\n-- Year 1 revenue by product --",
        COST_HEADING => "\n-- OPEX 45% rule check --",
        COST_OPEX_SHARE => "OPEX/blocks",
        PL_HEADING => "\n-- Income statement --",
        COL_YEAR => "Year",
        COL_REVENUE => "Revenue",
        COL_OPEX => "OPEX",
        COL_EBITDA => "EBITDA",
        COL_DEPRECIATION => "Deprec.",
        COL_TAXES => "Taxes",
        COL_NET_INCOME => "Net income",
        INVESTOR_HEADING => "\n-- Investor payment schedule --",
        COL_CAPITAL_RETURN => "Cap. return",
        COL_DIVIDEND => "Dividend",
        COL_INVESTOR_TOTAL => "Total",
        COL_BALANCE => "Balance",
        _ => return None,
    })
}
