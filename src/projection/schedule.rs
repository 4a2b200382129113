//! 연도별 자본 반환 일정과 고정비 항목 일정.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// 연도(1부터) → 초기 투자비 대비 반환 비율.
///
/// 성과와 무관한 고정 일정이며, 일정에 없는 연도는 0을 반환한다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CapitalReturnSchedule {
    fractions: BTreeMap<u32, f64>,
}

impl CapitalReturnSchedule {
    pub fn new(fractions: BTreeMap<u32, f64>) -> Self {
        Self { fractions }
    }

    /// 해당 연도의 반환 비율.
    pub fn fraction_for(&self, year: u32) -> f64 {
        self.fractions.get(&year).copied().unwrap_or(0.0)
    }

    /// 해당 연도의 예정 반환액 [$].
    pub fn payment_for(&self, year: u32, capital_outlay: f64) -> f64 {
        capital_outlay * self.fraction_for(year)
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, f64)> + '_ {
        self.fractions.iter().map(|(y, f)| (*y, *f))
    }
}

impl Default for CapitalReturnSchedule {
    /// 1년차 50%, 2년차 50%.
    fn default() -> Self {
        Self {
            fractions: BTreeMap::from([(1, 0.5), (2, 0.5)]),
        }
    }
}

/// 고정비 항목.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostLineItem {
    pub name: String,
    /// 1년차 기준 금액 [$/년]
    pub base_amount: f64,
    /// 물가지수에 따라 증가하는지 여부
    pub escalates_with_inflation: bool,
}

impl CostLineItem {
    /// 물가지수를 반영한 해당 연도 금액.
    pub fn amount_at(&self, inflation_index: f64) -> f64 {
        if self.escalates_with_inflation {
            self.base_amount * inflation_index
        } else {
            self.base_amount
        }
    }
}

/// 에너지/인건비 등 변동비 이전에 차감되는 고정비 일정.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostSchedule {
    pub energy: CostLineItem,
    pub payroll: CostLineItem,
}

impl Default for CostSchedule {
    fn default() -> Self {
        Self {
            energy: CostLineItem {
                name: "energy".into(),
                base_amount: 500_000.0,
                escalates_with_inflation: true,
            },
            payroll: CostLineItem {
                name: "payroll".into(),
                base_amount: 1_500_000.0,
                escalates_with_inflation: true,
            },
        }
    }
}
