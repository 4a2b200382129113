use serde::{Deserialize, Serialize};

use super::ProjectionError;

/// 시뮬레이션 1회에 사용하는 운영/시장 입력값.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationInputs {
    /// 일일 폐기물 반입량 [t/일]
    pub daily_intake_tons: f64,
    /// 블록 기준 단가 [$/개]
    pub base_block_price: f64,
    /// 반입 수수료(tipping fee) [$/t]
    pub tipping_fee_per_ton: f64,
    /// 재활용품 판매가 [$/t]
    pub recyclables_price_per_ton: f64,
    /// CO2 감축 크레딧 단가 [$/t]
    pub co2_credit_price_per_ton: f64,
    /// 침출수 회피 크레딧 단가 [$/m3]
    pub leachate_credit_price_per_m3: f64,
    /// 초기 투자비 [$]
    pub capital_outlay: f64,
    /// 법인세율(0~1)
    pub income_tax_rate: f64,
    /// 연간 물가상승률(0~1)
    pub inflation_rate: f64,
    /// 목표 투자회수 기간 [년]. 계산에는 쓰이지 않는다.
    pub target_roi_years: u32,
}

impl Default for SimulationInputs {
    fn default() -> Self {
        Self {
            daily_intake_tons: 300.0,
            base_block_price: 0.55,
            tipping_fee_per_ton: 15.0,
            recyclables_price_per_ton: 120.0,
            co2_credit_price_per_ton: 15.0,
            leachate_credit_price_per_m3: 10.0,
            capital_outlay: 10_000_000.0,
            income_tax_rate: 0.30,
            inflation_rate: 0.03,
            target_roi_years: 3,
        }
    }
}

impl SimulationInputs {
    /// 계산 전에 입력값 범위를 검사한다.
    pub fn validate(&self) -> Result<(), ProjectionError> {
        let non_negative = [
            ("daily_intake_tons", self.daily_intake_tons),
            ("base_block_price", self.base_block_price),
            ("tipping_fee_per_ton", self.tipping_fee_per_ton),
            ("recyclables_price_per_ton", self.recyclables_price_per_ton),
            ("co2_credit_price_per_ton", self.co2_credit_price_per_ton),
            ("leachate_credit_price_per_m3", self.leachate_credit_price_per_m3),
            ("capital_outlay", self.capital_outlay),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ProjectionError::InvalidInput {
                    field,
                    reason: format!("0 이상의 유한한 값이어야 합니다(입력 {value})."),
                });
            }
        }
        for (field, value) in [
            ("income_tax_rate", self.income_tax_rate),
            ("inflation_rate", self.inflation_rate),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(ProjectionError::InvalidInput {
                    field,
                    reason: format!("0~1 범위의 비율이어야 합니다(입력 {value})."),
                });
            }
        }
        Ok(())
    }
}
