//! 대시보드 헤드라인 지표. 결과를 읽기만 하며 모든 비율은 0 분모를 보호한다.

use serde::{Deserialize, Serialize};

use super::engine::SimulationResult;
use crate::finance::{ratio, Ratio};

/// 헤드라인 지표 계산 기준값.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardTargets {
    /// 공장 정격 생산능력 [개/년]
    pub plant_capacity_units: f64,
    /// 1년차 매출 목표 [$]
    pub sales_target: f64,
}

impl Default for DashboardTargets {
    fn default() -> Self {
        Self {
            plant_capacity_units: 35_000_000.0,
            sales_target: 10_000_000.0,
        }
    }
}

/// 연도별 파생 비율.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearRatios {
    pub year: u32,
    /// 실제 OPEX / 블록 매출
    pub opex_to_block_revenue: Ratio,
    /// EBITDA / 총매출
    pub ebitda_margin: Ratio,
}

/// 제품별 연간 생산 계획.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductionPlanRow {
    pub year: u32,
    pub product: String,
    pub units: f64,
}

/// 헤드라인 지표 묶음.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeadlineKpis {
    pub average_ebitda: f64,
    /// 최대 100%
    pub capacity_utilization: Ratio,
    /// 최대 100%
    pub sales_target_attainment: Ratio,
    pub yearly: Vec<YearRatios>,
}

/// 결과에서 헤드라인 지표를 계산한다.
pub fn headline_kpis(result: &SimulationResult, targets: &DashboardTargets) -> HeadlineKpis {
    let ebitda_sum: f64 = result.years.iter().map(|r| r.profit.ebitda).sum();
    let year1_revenue = result.years.first().map(|r| r.revenue.total).unwrap_or(0.0);

    HeadlineKpis {
        average_ebitda: ratio(ebitda_sum, result.years.len() as f64)
            .value()
            .unwrap_or(0.0),
        capacity_utilization: ratio(
            result.metrics.total_production,
            targets.plant_capacity_units,
        )
        .capped(1.0),
        sales_target_attainment: ratio(year1_revenue, targets.sales_target).capped(1.0),
        yearly: result
            .years
            .iter()
            .map(|r| YearRatios {
                year: r.year,
                opex_to_block_revenue: ratio(r.costs.total, r.revenue.blocks),
                ebitda_margin: ratio(r.profit.ebitda, r.revenue.total),
            })
            .collect(),
    }
}

/// 연도 × 제품별 생산 개수.
pub fn production_plan(result: &SimulationResult) -> Vec<ProductionPlanRow> {
    result
        .years
        .iter()
        .flat_map(|r| {
            r.revenue.by_product.iter().map(move |p| ProductionPlanRow {
                year: r.year,
                product: p.name.clone(),
                units: p.units,
            })
        })
        .collect()
}
