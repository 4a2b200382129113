use log::{debug, warn};
use serde::Serialize;

use super::physical::{PhysicalOutput, PlantYield};
use super::product_mix::ProductMix;
use super::schedule::{CapitalReturnSchedule, CostSchedule};
use super::{ProjectionError, SimulationInputs};
use crate::finance;

/// 기본 전망 기간 [년].
pub const DEFAULT_HORIZON_YEARS: u32 = 10;

/// 허용하는 최대 전망 기간 [년].
pub const MAX_HORIZON_YEARS: u32 = 100;

/// 계산 구조를 결정하는 모델 파라미터. `Default`는 기준 모델 상수와 같다.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectionModel {
    pub plant_yield: PlantYield,
    pub costs: CostSchedule,
    pub capital_return: CapitalReturnSchedule,
    /// 블록 매출 대비 목표 OPEX 비율(45% 규칙)
    pub opex_share_of_block_revenue: f64,
    /// 자본 반환 후 잔여 현금 중 배당 비율
    pub dividend_share: f64,
    /// 정액 감가상각 연수. 전망 기간과 무관하다.
    pub depreciation_years: f64,
    /// NPV 할인율
    pub discount_rate: f64,
    /// 1년차에 해당하는 달력 연도
    pub start_year: i32,
}

impl Default for ProjectionModel {
    fn default() -> Self {
        Self {
            plant_yield: PlantYield::default(),
            costs: CostSchedule::default(),
            capital_return: CapitalReturnSchedule::default(),
            opex_share_of_block_revenue: 0.45,
            dividend_share: 0.30,
            depreciation_years: 10.0,
            discount_rate: 0.12,
            start_year: 2025,
        }
    }
}

/// 제품별 매출 한 줄.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductRevenue {
    pub name: String,
    pub units: f64,
    pub revenue: f64,
}

/// 매출 구성.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RevenueBreakdown {
    pub blocks: f64,
    pub recyclables: f64,
    pub tipping: f64,
    pub environmental_bonds: f64,
    pub total: f64,
    pub by_product: Vec<ProductRevenue>,
}

/// 비용 구성. `total`은 하한 처리 후 실제 합계다.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CostBreakdown {
    /// 블록 매출 × OPEX 비율
    pub target_opex: f64,
    pub energy: f64,
    pub payroll: f64,
    pub variable: f64,
    pub total: f64,
}

/// 손익.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Profitability {
    pub ebitda: f64,
    pub depreciation: f64,
    pub ebit: f64,
    pub taxes: f64,
    pub net_income: f64,
    pub operating_cash_flow: f64,
}

/// 투자자 현금 배분(자본 반환 → 배당 → 사내 유보).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct InvestorWaterfall {
    pub capital_return_payment: f64,
    /// 영업현금흐름 - 자본 반환액. 음수 가능.
    pub residual_after_return: f64,
    pub dividend: f64,
    pub retained_cash: f64,
    /// 해당 연도 반환 후 미반환 투자 잔액
    pub capital_balance: f64,
    pub total_investor_cash_flow: f64,
}

/// 한 해의 전망 결과.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearRecord {
    /// 1부터 시작하는 연차
    pub year: u32,
    pub calendar_year: i32,
    pub inflation_index: f64,
    pub total_units: f64,
    pub revenue: RevenueBreakdown,
    pub costs: CostBreakdown,
    pub profit: Profitability,
    pub investor: InvestorWaterfall,
}

/// 전체 기간 요약 지표.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SummaryMetrics {
    /// 내부수익률. 실근이 없으면 0.0으로 보고한다(`irr_converged` 참고).
    pub irr: f64,
    pub irr_converged: bool,
    pub npv: f64,
    pub discount_rate: f64,
    /// 연간 총 생산 개수(1년차 기준, 모든 연도 동일)
    pub total_production: f64,
    pub capital_outlay: f64,
}

/// 전망 계산 결과.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationResult {
    pub physical: PhysicalOutput,
    pub years: Vec<YearRecord>,
    pub metrics: SummaryMetrics,
}

impl SimulationResult {
    /// `[-투자비, 1년차 투자자 현금흐름, ...]`.
    pub fn investor_cash_flow_series(&self) -> Vec<f64> {
        cash_flow_series(self.metrics.capital_outlay, &self.years)
    }

    pub fn year(&self, year: u32) -> Option<&YearRecord> {
        self.years.iter().find(|r| r.year == year)
    }
}

fn cash_flow_series(capital_outlay: f64, years: &[YearRecord]) -> Vec<f64> {
    std::iter::once(-capital_outlay)
        .chain(years.iter().map(|r| r.investor.total_investor_cash_flow))
        .collect()
}

/// 기본 모델로 전망을 계산한다.
pub fn run(
    inputs: &SimulationInputs,
    product_mix: &ProductMix,
    horizon_years: u32,
) -> Result<SimulationResult, ProjectionError> {
    ProjectionModel::default().run(inputs, product_mix, horizon_years)
}

impl ProjectionModel {
    fn validate(&self) -> Result<(), ProjectionError> {
        for (field, value) in [
            ("opex_share_of_block_revenue", self.opex_share_of_block_revenue),
            ("dividend_share", self.dividend_share),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(ProjectionError::InvalidInput {
                    field,
                    reason: format!("0~1 범위의 비율이어야 합니다(입력 {value})."),
                });
            }
        }
        if !self.depreciation_years.is_finite() || self.depreciation_years <= 0.0 {
            return Err(ProjectionError::InvalidInput {
                field: "depreciation_years",
                reason: format!("0보다 커야 합니다(입력 {}).", self.depreciation_years),
            });
        }
        if !self.discount_rate.is_finite() || self.discount_rate <= -1.0 {
            return Err(ProjectionError::InvalidInput {
                field: "discount_rate",
                reason: format!("-1보다 커야 합니다(입력 {}).", self.discount_rate),
            });
        }
        if self.capital_return.iter().any(|(_, f)| !f.is_finite() || f < 0.0) {
            return Err(ProjectionError::InvalidInput {
                field: "capital_return",
                reason: "반환 비율은 0 이상이어야 합니다.".into(),
            });
        }
        let y = &self.plant_yield;
        let coefficients = [
            ("plant_yield.recyclable_fraction", y.recyclable_fraction),
            ("plant_yield.transformable_fraction", y.transformable_fraction),
            ("plant_yield.expansion_factor", y.expansion_factor),
            ("plant_yield.units_per_ton", y.units_per_ton),
            ("plant_yield.co2_tons_per_intake_ton", y.co2_tons_per_intake_ton),
            (
                "plant_yield.leachate_m3_per_intake_ton",
                y.leachate_m3_per_intake_ton,
            ),
            ("costs.energy.base_amount", self.costs.energy.base_amount),
            ("costs.payroll.base_amount", self.costs.payroll.base_amount),
        ];
        for (field, value) in coefficients {
            if !value.is_finite() || value < 0.0 {
                return Err(ProjectionError::InvalidInput {
                    field,
                    reason: format!("0 이상의 유한한 값이어야 합니다(입력 {value})."),
                });
            }
        }
        Ok(())
    }

    /// 입력을 검증한 뒤 `horizon_years`년 전망을 계산한다.
    pub fn run(
        &self,
        inputs: &SimulationInputs,
        product_mix: &ProductMix,
        horizon_years: u32,
    ) -> Result<SimulationResult, ProjectionError> {
        if let Err(err) = self.check(inputs, horizon_years) {
            debug!("projection rejected: {err}");
            return Err(err);
        }
        debug!(
            "projection run: {} t/day, capex {:.0}, {} products, {} years",
            inputs.daily_intake_tons,
            inputs.capital_outlay,
            product_mix.len(),
            horizon_years
        );

        let physical = self.plant_yield.annual_output(inputs.daily_intake_tons);
        let mut capital_balance = inputs.capital_outlay;
        let mut years = Vec::with_capacity(horizon_years as usize);

        for year in 1..=horizon_years {
            let record = self.project_year(year, inputs, product_mix, &physical, capital_balance);
            capital_balance = record.investor.capital_balance;
            years.push(record);
        }

        let metrics = self.summarize(inputs.capital_outlay, &physical, &years);
        Ok(SimulationResult {
            physical,
            years,
            metrics,
        })
    }

    fn check(&self, inputs: &SimulationInputs, horizon_years: u32) -> Result<(), ProjectionError> {
        inputs.validate()?;
        self.validate()?;
        if !(1..=MAX_HORIZON_YEARS).contains(&horizon_years) {
            return Err(ProjectionError::InvalidInput {
                field: "horizon_years",
                reason: format!(
                    "전망 기간은 1~{MAX_HORIZON_YEARS}년이어야 합니다(입력 {horizon_years})."
                ),
            });
        }
        Ok(())
    }

    fn project_year(
        &self,
        year: u32,
        inputs: &SimulationInputs,
        mix: &ProductMix,
        physical: &PhysicalOutput,
        opening_balance: f64,
    ) -> YearRecord {
        let inflation_index = (1.0 + inputs.inflation_rate).powi(year as i32 - 1);
        let revenue = self.revenue(inputs, mix, physical, inflation_index);
        let costs = self.costs(revenue.blocks, inflation_index);
        let profit = self.profitability(inputs, revenue.total, costs.total);
        let investor = self.waterfall(year, inputs.capital_outlay, &profit, opening_balance);

        YearRecord {
            year,
            calendar_year: self.start_year + year as i32 - 1,
            inflation_index,
            total_units: physical.total_units,
            revenue,
            costs,
            profit,
            investor,
        }
    }

    fn revenue(
        &self,
        inputs: &SimulationInputs,
        mix: &ProductMix,
        physical: &PhysicalOutput,
        inflation_index: f64,
    ) -> RevenueBreakdown {
        let weighted_price = mix.weighted_multiplier() * inputs.base_block_price;
        let blocks = physical.total_units * weighted_price * inflation_index;

        let by_product = mix
            .entries()
            .iter()
            .map(|e| ProductRevenue {
                name: e.name.clone(),
                units: physical.total_units * e.share,
                revenue: physical.total_units
                    * e.share
                    * (inputs.base_block_price * e.price_multiplier * inflation_index),
            })
            .collect();

        let recyclables =
            physical.recyclable_tons * inputs.recyclables_price_per_ton * inflation_index;
        let tipping = physical.annual_intake_tons * inputs.tipping_fee_per_ton * inflation_index;
        let environmental_bonds = physical.co2_avoided_tons
            * inputs.co2_credit_price_per_ton
            * inflation_index
            + physical.leachate_avoided_m3 * inputs.leachate_credit_price_per_m3 * inflation_index;

        RevenueBreakdown {
            blocks,
            recyclables,
            tipping,
            environmental_bonds,
            total: blocks + recyclables + tipping + environmental_bonds,
            by_product,
        }
    }

    fn costs(&self, block_revenue: f64, inflation_index: f64) -> CostBreakdown {
        let target_opex = block_revenue * self.opex_share_of_block_revenue;
        let energy = self.costs.energy.amount_at(inflation_index);
        let payroll = self.costs.payroll.amount_at(inflation_index);
        // 고정비만으로 목표를 넘으면 변동비는 0이고 실제 OPEX는 목표보다 작아진다.
        let variable = (target_opex - energy - payroll).max(0.0);
        CostBreakdown {
            target_opex,
            energy,
            payroll,
            variable,
            total: energy + payroll + variable,
        }
    }

    fn profitability(
        &self,
        inputs: &SimulationInputs,
        total_revenue: f64,
        opex: f64,
    ) -> Profitability {
        let ebitda = total_revenue - opex;
        let depreciation = inputs.capital_outlay / self.depreciation_years;
        let ebit = ebitda - depreciation;
        // 이월결손금 없음
        let taxes = (ebit * inputs.income_tax_rate).max(0.0);
        let net_income = ebit - taxes;
        Profitability {
            ebitda,
            depreciation,
            ebit,
            taxes,
            net_income,
            operating_cash_flow: net_income + depreciation,
        }
    }

    fn waterfall(
        &self,
        year: u32,
        capital_outlay: f64,
        profit: &Profitability,
        opening_balance: f64,
    ) -> InvestorWaterfall {
        let capital_return_payment = self.capital_return.payment_for(year, capital_outlay);
        let residual_after_return = profit.operating_cash_flow - capital_return_payment;
        // 부족분은 이월하지 않는다.
        let dividend = if residual_after_return > 0.0 {
            residual_after_return * self.dividend_share
        } else {
            0.0
        };
        InvestorWaterfall {
            capital_return_payment,
            residual_after_return,
            dividend,
            retained_cash: residual_after_return - dividend,
            capital_balance: (opening_balance - capital_return_payment).max(0.0),
            total_investor_cash_flow: capital_return_payment + dividend,
        }
    }

    fn summarize(
        &self,
        capital_outlay: f64,
        physical: &PhysicalOutput,
        years: &[YearRecord],
    ) -> SummaryMetrics {
        let flows = cash_flow_series(capital_outlay, years);
        let (irr, irr_converged) = match finance::irr(&flows) {
            Some(rate) => (rate, true),
            None => {
                warn!("IRR has no real root for this cash-flow series; reporting 0.0");
                (0.0, false)
            }
        };
        SummaryMetrics {
            irr,
            irr_converged,
            npv: finance::npv(self.discount_rate, &flows),
            discount_rate: self.discount_rate,
            total_production: years
                .first()
                .map(|r| r.total_units)
                .unwrap_or(physical.total_units),
            capital_outlay,
        }
    }
}
