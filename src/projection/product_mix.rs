use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 점유율 합계 허용 오차.
pub const SHARE_SUM_TOLERANCE: f64 = 1e-9;

/// 제품 구성 검증 오류.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ProductMixError {
    /// 항목이 하나도 없음
    #[error("제품 구성이 비어 있습니다.")]
    Empty,
    /// 점유율/가격 계수가 음수이거나 유한하지 않음
    #[error("제품 '{name}'의 {field} 값이 올바르지 않습니다: {value}")]
    InvalidEntry {
        name: String,
        field: &'static str,
        value: f64,
    },
    /// 점유율 합계가 1이 아님
    #[error("제품 점유율 합계는 1.0이어야 합니다(현재 {0}).")]
    SharesDoNotSumToOne(f64),
    /// 이름 중복
    #[error("제품 이름이 중복되었습니다: {0}")]
    DuplicateName(String),
}

/// 제품 구성 항목 하나.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductMixEntry {
    pub name: String,
    /// 전체 생산 수량 중 비율(0~1)
    pub share: f64,
    /// 기준 단가 대비 가격 배수
    pub price_multiplier: f64,
}

impl ProductMixEntry {
    pub fn new(name: impl Into<String>, share: f64, price_multiplier: f64) -> Self {
        Self {
            name: name.into(),
            share,
            price_multiplier,
        }
    }
}

/// 검증을 통과한 제품 구성. 점유율 합계가 1.0임이 보장된다.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ProductMix {
    entries: Vec<ProductMixEntry>,
}

impl ProductMix {
    /// 항목 목록을 검증하여 제품 구성을 만든다.
    pub fn new(entries: Vec<ProductMixEntry>) -> Result<Self, ProductMixError> {
        if entries.is_empty() {
            return Err(ProductMixError::Empty);
        }
        for (i, e) in entries.iter().enumerate() {
            if !e.share.is_finite() || e.share < 0.0 {
                return Err(ProductMixError::InvalidEntry {
                    name: e.name.clone(),
                    field: "share",
                    value: e.share,
                });
            }
            if !e.price_multiplier.is_finite() || e.price_multiplier < 0.0 {
                return Err(ProductMixError::InvalidEntry {
                    name: e.name.clone(),
                    field: "price_multiplier",
                    value: e.price_multiplier,
                });
            }
            if entries[..i].iter().any(|other| other.name == e.name) {
                return Err(ProductMixError::DuplicateName(e.name.clone()));
            }
        }
        let total: f64 = entries.iter().map(|e| e.share).sum();
        if (total - 1.0).abs() > SHARE_SUM_TOLERANCE {
            return Err(ProductMixError::SharesDoNotSumToOne(total));
        }
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[ProductMixEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Σ(점유율 × 가격 배수). 기준 단가에 곱하면 가중 평균 단가가 된다.
    pub fn weighted_multiplier(&self) -> f64 {
        self.entries
            .iter()
            .map(|e| e.share * e.price_multiplier)
            .sum()
    }
}

impl Default for ProductMix {
    /// 기본 3종 구성: 블록 70%(×1.0), 포장용 블록 20%(×1.3), 장식 벽돌 10%(×1.6).
    fn default() -> Self {
        Self {
            entries: default_entries(),
        }
    }
}

/// 기본 제품 구성 항목을 반환한다.
pub fn default_entries() -> Vec<ProductMixEntry> {
    vec![
        ProductMixEntry::new("Block #5", 0.70, 1.0),
        ProductMixEntry::new("Heavy paver", 0.20, 1.3),
        ProductMixEntry::new("Decorative brick", 0.10, 1.6),
    ]
}
