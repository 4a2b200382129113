use serde::{Deserialize, Serialize};

/// 연간 운전일수.
pub const OPERATING_DAYS_PER_YEAR: f64 = 365.0;

/// 공정 수율 계수. 모든 연도에 동일하게 적용된다(증산/감산 램프 없음).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlantYield {
    /// 선별로 회수되는 재활용품 비율
    pub recyclable_fraction: f64,
    /// 블록 원료로 전환되는 비율
    pub transformable_fraction: f64,
    /// 첨가제/수분 흡수에 따른 질량 팽창 계수
    pub expansion_factor: f64,
    /// 팽창 질량 1 t당 블록 생산 개수
    pub units_per_ton: f64,
    /// 반입 1 t당 CO2 회피량 [t]
    pub co2_tons_per_intake_ton: f64,
    /// 반입 1 t당 침출수 회피량 [m3]
    pub leachate_m3_per_intake_ton: f64,
}

impl Default for PlantYield {
    fn default() -> Self {
        Self {
            recyclable_fraction: 0.13,
            transformable_fraction: 0.87,
            expansion_factor: 1.4,
            units_per_ton: 380.0,
            co2_tons_per_intake_ton: 1.5,
            leachate_m3_per_intake_ton: 0.4,
        }
    }
}

/// 연간 물리량 결과.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PhysicalOutput {
    pub annual_intake_tons: f64,
    pub recyclable_tons: f64,
    pub transformable_tons: f64,
    pub expanded_mass_tons: f64,
    pub total_units: f64,
    pub co2_avoided_tons: f64,
    pub leachate_avoided_m3: f64,
}

impl PlantYield {
    /// 일일 반입량에서 연간 물리량을 계산한다. 반입량에 선형이다.
    pub fn annual_output(&self, daily_intake_tons: f64) -> PhysicalOutput {
        let annual_intake_tons = daily_intake_tons * OPERATING_DAYS_PER_YEAR;
        let transformable_tons = annual_intake_tons * self.transformable_fraction;
        let expanded_mass_tons = transformable_tons * self.expansion_factor;
        PhysicalOutput {
            annual_intake_tons,
            recyclable_tons: annual_intake_tons * self.recyclable_fraction,
            transformable_tons,
            expanded_mass_tons,
            total_units: expanded_mass_tons * self.units_per_ton,
            co2_avoided_tons: annual_intake_tons * self.co2_tons_per_intake_ton,
            leachate_avoided_m3: annual_intake_tons * self.leachate_m3_per_intake_ton,
        }
    }
}
