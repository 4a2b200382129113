//! 폐기물 재생 블록 공장의 연도별 재무/운영 전망 계산 모듈 모음.
//! 물리량 → 매출/비용 → 수익성 → 투자자 현금 배분 순으로 한 해씩 계산한다.

pub mod engine;
pub mod inputs;
pub mod kpi;
pub mod physical;
pub mod product_mix;
pub mod schedule;

pub use engine::*;
pub use inputs::SimulationInputs;
pub use physical::{PhysicalOutput, PlantYield};
pub use product_mix::{ProductMix, ProductMixEntry, ProductMixError};
pub use schedule::{CapitalReturnSchedule, CostLineItem, CostSchedule};

use thiserror::Error;

/// 전망 계산 오류. 입력 검증 단계에서만 발생한다.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ProjectionError {
    /// 입력값 범위 오류
    #[error("입력 오류({field}): {reason}")]
    InvalidInput { field: &'static str, reason: String },
    /// 제품 구성 오류
    #[error("제품 구성 오류: {0}")]
    ProductMix(#[from] ProductMixError),
}
