//! BI 대시보드용 긴 형식(long-format) 지표 테이블.
//! 한 행 = (분류, 세부 분류, 연도, 값). 전망 결과를 평탄화하거나 TOML 파일에서 읽는다.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::finance::{ratio, Ratio};
use crate::projection::SimulationResult;

/// 지표 분류.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum IndicatorCategory {
    Financial,
    Production,
    Sales,
    Environmental,
}

pub mod sub {
    pub const TOTAL_REVENUE: &str = "Total revenue";
    pub const OPEX: &str = "OPEX";
    pub const EBITDA: &str = "EBITDA";
    pub const NET_INCOME: &str = "Net income";
    pub const INVESTOR_CASH_FLOW: &str = "Investor cash flow";
    pub const TOTAL_UNITS: &str = "Total units";
    pub const CO2_AVOIDED: &str = "CO2 avoided (t)";
    pub const LEACHATE_AVOIDED: &str = "Leachate avoided (m3)";
    pub const BOND_REVENUE: &str = "Environmental bond revenue";
}

/// 지표 한 행. 열 이름은 BI 도구 쪽 헤더(`Category`, `Sub-Category`, `Year`, `Value`)를 따른다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorRow {
    #[serde(rename = "Category", alias = "category")]
    pub category: IndicatorCategory,
    #[serde(rename = "Sub-Category", alias = "sub_category")]
    pub sub_category: String,
    #[serde(rename = "Year", alias = "year")]
    pub year: i32,
    #[serde(rename = "Value", alias = "value")]
    pub value: f64,
}

/// 지표 테이블 읽기/쓰기 오류.
#[derive(Debug, Error)]
pub enum IndicatorError {
    #[error("파일 입출력 오류: {0}")]
    Io(#[from] std::io::Error),
    #[error("지표 파일 파싱 오류: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("지표 파일 직렬화 오류: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// 지표 테이블.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorTable {
    #[serde(default)]
    pub rows: Vec<IndicatorRow>,
}

impl IndicatorTable {
    /// 전망 결과를 지표 테이블로 평탄화한다. 연도는 달력 연도를 쓴다.
    pub fn from_result(result: &SimulationResult) -> Self {
        use IndicatorCategory::*;

        let mut rows = Vec::new();
        let mut push = |category, sub_category: &str, year, value| {
            rows.push(IndicatorRow {
                category,
                sub_category: sub_category.to_string(),
                year,
                value,
            })
        };

        for r in &result.years {
            let y = r.calendar_year;
            push(Financial, sub::TOTAL_REVENUE, y, r.revenue.total);
            push(Financial, sub::OPEX, y, r.costs.total);
            push(Financial, sub::EBITDA, y, r.profit.ebitda);
            push(Financial, sub::NET_INCOME, y, r.profit.net_income);
            push(
                Financial,
                sub::INVESTOR_CASH_FLOW,
                y,
                r.investor.total_investor_cash_flow,
            );

            push(Production, sub::TOTAL_UNITS, y, r.total_units);
            for p in &r.revenue.by_product {
                push(Production, &p.name, y, p.units);
                push(Sales, &p.name, y, p.revenue);
            }

            push(Environmental, sub::CO2_AVOIDED, y, result.physical.co2_avoided_tons);
            push(
                Environmental,
                sub::LEACHATE_AVOIDED,
                y,
                result.physical.leachate_avoided_m3,
            );
            push(Environmental, sub::BOND_REVENUE, y, r.revenue.environmental_bonds);
        }
        Self { rows }
    }

    /// TOML 파일(`[[rows]]` 배열)에서 테이블을 읽는다.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, IndicatorError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, IndicatorError> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml_string(&self) -> Result<String, IndicatorError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), IndicatorError> {
        fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }

    pub fn filter(&self, category: IndicatorCategory) -> impl Iterator<Item = &IndicatorRow> {
        self.rows.iter().filter(move |r| r.category == category)
    }

    /// 테이블에 등장하는 연도(오름차순, 중복 제거).
    pub fn years(&self) -> Vec<i32> {
        let mut years: Vec<i32> = self.rows.iter().map(|r| r.year).collect();
        years.sort_unstable();
        years.dedup();
        years
    }

    /// (연도, 값) 시계열. 같은 연도가 여러 번 나오면 합산한다.
    pub fn series(&self, category: IndicatorCategory, sub_category: &str) -> Vec<(i32, f64)> {
        let mut out: Vec<(i32, f64)> = Vec::new();
        let mut matching: Vec<&IndicatorRow> = self
            .filter(category)
            .filter(|r| r.sub_category == sub_category)
            .collect();
        matching.sort_by_key(|r| r.year);
        for r in matching {
            match out.last_mut() {
                Some((y, v)) if *y == r.year => *v += r.value,
                _ => out.push((r.year, r.value)),
            }
        }
        out
    }

    pub fn total(&self, category: IndicatorCategory, sub_category: &str) -> f64 {
        self.filter(category)
            .filter(|r| r.sub_category == sub_category)
            .map(|r| r.value)
            .sum()
    }

    /// 분류 전체를 연도별로 합산한 시계열.
    pub fn category_totals_by_year(&self, category: IndicatorCategory) -> Vec<(i32, f64)> {
        self.years()
            .into_iter()
            .map(|y| {
                let v: f64 = self
                    .filter(category)
                    .filter(|r| r.year == y)
                    .map(|r| r.value)
                    .sum();
                (y, v)
            })
            .filter(|(y, _)| self.filter(category).any(|r| r.year == *y))
            .collect()
    }

    /// 누적 시계열(S-커브).
    pub fn cumulative(series: &[(i32, f64)]) -> Vec<(i32, f64)> {
        let mut acc = 0.0_f64;
        series
            .iter()
            .map(|(y, v)| {
                acc += *v;
                (*y, acc)
            })
            .collect()
    }

    /// 전년 대비 증가율. 첫 해와 전년 값이 0인 해는 `Ratio::Undefined`.
    pub fn growth(series: &[(i32, f64)]) -> Vec<(i32, Ratio)> {
        let mut out = Vec::with_capacity(series.len());
        let mut prev: Option<f64> = None;
        for (y, v) in series {
            let g = match prev {
                Some(p) => ratio(v - p, p),
                None => Ratio::Undefined,
            };
            out.push((*y, g));
            prev = Some(*v);
        }
        out
    }

    /// 같은 분류 안의 두 세부 분류 비율(예: EBITDA / 총매출).
    pub fn ratio_series(
        &self,
        category: IndicatorCategory,
        numerator: &str,
        denominator: &str,
    ) -> Vec<(i32, Ratio)> {
        let num = self.series(category, numerator);
        let den = self.series(category, denominator);
        num.iter()
            .map(|(y, n)| {
                let d = den
                    .iter()
                    .find(|(dy, _)| dy == y)
                    .map(|(_, d)| *d)
                    .unwrap_or(0.0);
                (*y, ratio(*n, d))
            })
            .collect()
    }
}
