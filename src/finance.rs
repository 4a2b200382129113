//! 현금흐름 할인(NPV), 내부수익률(IRR), 0 분모 보호 비율 계산을 모아둔다.

use serde::Serialize;

/// IRR 탐색 시 허용하는 최저 할인율. -100% 이하는 할인계수가 정의되지 않는다.
const IRR_LOWER_BOUND: f64 = -0.9999;
/// IRR 탐색 상한(10000%).
const IRR_UPPER_BOUND: f64 = 100.0;
const IRR_TOLERANCE: f64 = 1e-10;
const IRR_MAX_ITER: u32 = 200;

/// 현금흐름의 순현재가치를 계산한다.
///
/// `cash_flows[0]`은 t=0 시점 값으로 할인하지 않고, 이후 항목은 `(1+rate)^t`로 나눈다.
pub fn npv(rate: f64, cash_flows: &[f64]) -> f64 {
    cash_flows
        .iter()
        .enumerate()
        .map(|(t, cf)| cf / (1.0 + rate).powi(t as i32))
        .sum()
}

fn npv_derivative(rate: f64, cash_flows: &[f64]) -> f64 {
    cash_flows
        .iter()
        .enumerate()
        .skip(1)
        .map(|(t, cf)| -(t as f64) * cf / (1.0 + rate).powi(t as i32 + 1))
        .sum()
}

/// 내부수익률을 계산한다. 실근이 없으면 `None`.
///
/// Newton-Raphson(초기값 10%)으로 먼저 시도하고, 수렴하지 않으면 구간을 나눠
/// 부호가 바뀌는 첫 구간에서 이분법으로 근을 찾는다.
pub fn irr(cash_flows: &[f64]) -> Option<f64> {
    let has_positive = cash_flows.iter().any(|cf| *cf > 0.0);
    let has_negative = cash_flows.iter().any(|cf| *cf < 0.0);
    if !has_positive || !has_negative {
        return None;
    }
    newton_irr(cash_flows, 0.1).or_else(|| bracketed_irr(cash_flows))
}

fn newton_irr(cash_flows: &[f64], guess: f64) -> Option<f64> {
    let mut rate = guess;
    for _ in 0..IRR_MAX_ITER {
        let value = npv(rate, cash_flows);
        let slope = npv_derivative(rate, cash_flows);
        if !value.is_finite() || !slope.is_finite() || slope == 0.0 {
            return None;
        }
        let next = rate - value / slope;
        if !(IRR_LOWER_BOUND..=IRR_UPPER_BOUND).contains(&next) {
            return None;
        }
        if (next - rate).abs() < IRR_TOLERANCE {
            return Some(next);
        }
        rate = next;
    }
    None
}

fn bracketed_irr(cash_flows: &[f64]) -> Option<f64> {
    // 음수 쪽은 조밀하게, 양수 쪽은 넓게 격자를 만든다.
    let mut grid: Vec<f64> = (0..=99).map(|i| IRR_LOWER_BOUND + i as f64 * 0.01).collect();
    let mut r = 0.0;
    while r <= IRR_UPPER_BOUND {
        grid.push(r);
        r += if r < 1.0 { 0.01 } else { 0.25 };
    }

    grid.windows(2).find_map(|w| {
        let (lo, hi) = (w[0], w[1]);
        let f_lo = npv(lo, cash_flows);
        let f_hi = npv(hi, cash_flows);
        if f_lo == 0.0 {
            return Some(lo);
        }
        if f_lo.signum() == f_hi.signum() {
            return None;
        }
        Some(bisect(cash_flows, lo, hi, f_lo))
    })
}

fn bisect(cash_flows: &[f64], mut lo: f64, mut hi: f64, mut f_lo: f64) -> f64 {
    for _ in 0..IRR_MAX_ITER {
        let mid = 0.5 * (lo + hi);
        let f_mid = npv(mid, cash_flows);
        if f_mid == 0.0 || (hi - lo) < IRR_TOLERANCE {
            return mid;
        }
        if f_mid.signum() == f_lo.signum() {
            lo = mid;
            f_lo = f_mid;
        } else {
            hi = mid;
        }
    }
    0.5 * (lo + hi)
}

/// 분모가 0일 수 있는 비율. 정의되지 않는 경우를 NaN/inf 대신 명시한다.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Ratio {
    Defined(f64),
    /// 분모가 0이거나 유한하지 않음
    Undefined,
}

impl Ratio {
    pub fn value(&self) -> Option<f64> {
        match self {
            Ratio::Defined(v) => Some(*v),
            Ratio::Undefined => None,
        }
    }

    /// 값을 `max` 이하로 자른다(게이지 표시용).
    pub fn capped(self, max: f64) -> Ratio {
        match self {
            Ratio::Defined(v) => Ratio::Defined(v.min(max)),
            Ratio::Undefined => Ratio::Undefined,
        }
    }
}

impl std::fmt::Display for Ratio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Ratio::Defined(v) => write!(f, "{:.1}%", v * 100.0),
            Ratio::Undefined => write!(f, "n/a"),
        }
    }
}

/// `numerator / denominator`를 계산한다. 분모가 0이면 `Ratio::Undefined`.
pub fn ratio(numerator: f64, denominator: f64) -> Ratio {
    if denominator == 0.0 || !denominator.is_finite() || !numerator.is_finite() {
        return Ratio::Undefined;
    }
    Ratio::Defined(numerator / denominator)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derivative_matches_finite_difference() {
        let flows = [-100.0, 30.0, 40.0, 50.0];
        let h = 1e-6;
        let numeric = (npv(0.1 + h, &flows) - npv(0.1 - h, &flows)) / (2.0 * h);
        assert!((numeric - npv_derivative(0.1, &flows)).abs() < 1e-4);
    }

    #[test]
    fn bracketed_search_finds_root_newton_misses() {
        // 초기값에서 멀리 떨어진 고수익 근
        let flows = [-1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1000.0];
        let r = bracketed_irr(&flows).expect("root");
        assert!(npv(r, &flows).abs() < 1e-6, "r={r}");
    }
}
