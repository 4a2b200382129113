//! 전망 결과를 터미널용 텍스트 보고서로 만든다. 결과는 읽기만 한다.

use std::fmt::Write;

use crate::finance::Ratio;
use crate::i18n::{keys, Translator};
use crate::projection::kpi::{self, DashboardTargets};
use crate::projection::SimulationResult;

/// 천 단위 구분 기호를 넣은 통화 문자열(소수점 없음).
pub fn money(value: f64) -> String {
    let rounded = value.round();
    let negative = rounded < 0.0;
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if negative {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

fn pct(r: Ratio, tr: &Translator) -> String {
    match r {
        Ratio::Defined(v) => format!("{:.1}%", v * 100.0),
        Ratio::Undefined => tr.t(keys::UNDEFINED).to_string(),
    }
}

/// 전체 보고서를 문자열로 만든다.
pub fn render(result: &SimulationResult, targets: &DashboardTargets, tr: &Translator) -> String {
    let mut out = String::new();
    // String에 대한 write!는 실패하지 않는다.
    let _ = write_report(&mut out, result, targets, tr);
    out
}

fn write_report(
    out: &mut String,
    result: &SimulationResult,
    targets: &DashboardTargets,
    tr: &Translator,
) -> std::fmt::Result {
    let kpis = kpi::headline_kpis(result, targets);
    let m = &result.metrics;

    writeln!(out, "{}", tr.t(keys::REPORT_TITLE))?;
    writeln!(out, "{}", tr.t(keys::HEADLINE_HEADING))?;
    writeln!(out, "{:<28} {:>18}", tr.t(keys::HEADLINE_NPV), money(m.npv))?;
    if m.irr_converged {
        writeln!(out, "{:<28} {:>17.1}%", tr.t(keys::HEADLINE_IRR), m.irr * 100.0)?;
    } else {
        writeln!(
            out,
            "{:<28} {:>17.1}% {}",
            tr.t(keys::HEADLINE_IRR),
            0.0,
            tr.t(keys::HEADLINE_IRR_NO_ROOT)
        )?;
    }
    writeln!(
        out,
        "{:<28} {:>18}",
        tr.t(keys::HEADLINE_AVG_EBITDA),
        money(kpis.average_ebitda)
    )?;
    writeln!(
        out,
        "{:<28} {:>16.1} M",
        tr.t(keys::HEADLINE_PRODUCTION),
        m.total_production / 1_000_000.0
    )?;
    writeln!(
        out,
        "{:<28} {:>18}",
        tr.t(keys::HEADLINE_CAPACITY),
        pct(kpis.capacity_utilization, tr)
    )?;
    writeln!(
        out,
        "{:<28} {:>18}",
        tr.t(keys::HEADLINE_SALES_TARGET),
        pct(kpis.sales_target_attainment, tr)
    )?;

    if let Some(y1) = result.years.first() {
        writeln!(out, "{}", tr.t(keys::WATERFALL_HEADING))?;
        let lines = [
            (keys::REV_BLOCKS, y1.revenue.blocks),
            (keys::REV_RECYCLABLES, y1.revenue.recyclables),
            (keys::REV_TIPPING, y1.revenue.tipping),
            (keys::REV_BONDS, y1.revenue.environmental_bonds),
            (keys::REV_TOTAL, y1.revenue.total),
            (keys::COST_OPEX, y1.costs.total),
            (keys::PL_TAXES, y1.profit.taxes),
            (keys::INV_CAPITAL_RETURN, y1.investor.capital_return_payment),
            (keys::INV_DIVIDEND, y1.investor.dividend),
            (keys::INV_RETAINED, y1.investor.retained_cash),
        ];
        for (key, value) in lines {
            writeln!(out, "{:<28} {:>18}", tr.t(key), money(value))?;
        }

        writeln!(out, "{}", tr.t(keys::MIX_HEADING))?;
        for p in &y1.revenue.by_product {
            writeln!(out, "{:<28} {:>18}", p.name, money(p.revenue))?;
        }
    }

    writeln!(out, "{}", tr.t(keys::COST_HEADING))?;
    writeln!(
        out,
        "{:>6} {:>16} {:>14} {:>14} {:>16} {:>14}",
        tr.t(keys::COL_YEAR),
        tr.t(keys::REV_BLOCKS),
        tr.t(keys::COST_ENERGY),
        tr.t(keys::COST_PAYROLL),
        tr.t(keys::COST_VARIABLE),
        tr.t(keys::COST_OPEX_SHARE)
    )?;
    for (r, ratios) in result.years.iter().zip(&kpis.yearly) {
        writeln!(
            out,
            "{:>6} {:>16} {:>14} {:>14} {:>16} {:>14}",
            r.calendar_year,
            money(r.revenue.blocks),
            money(r.costs.energy),
            money(r.costs.payroll),
            money(r.costs.variable),
            pct(ratios.opex_to_block_revenue, tr)
        )?;
    }

    writeln!(out, "{}", tr.t(keys::PL_HEADING))?;
    writeln!(
        out,
        "{:>6} {:>16} {:>16} {:>16} {:>14} {:>14} {:>16}",
        tr.t(keys::COL_YEAR),
        tr.t(keys::COL_REVENUE),
        tr.t(keys::COL_OPEX),
        tr.t(keys::COL_EBITDA),
        tr.t(keys::COL_DEPRECIATION),
        tr.t(keys::COL_TAXES),
        tr.t(keys::COL_NET_INCOME)
    )?;
    for r in &result.years {
        writeln!(
            out,
            "{:>6} {:>16} {:>16} {:>16} {:>14} {:>14} {:>16}",
            r.calendar_year,
            money(r.revenue.total),
            money(r.costs.total),
            money(r.profit.ebitda),
            money(r.profit.depreciation),
            money(r.profit.taxes),
            money(r.profit.net_income)
        )?;
    }

    writeln!(out, "{}", tr.t(keys::INVESTOR_HEADING))?;
    writeln!(
        out,
        "{:>6} {:>16} {:>16} {:>16} {:>16}",
        tr.t(keys::COL_YEAR),
        tr.t(keys::COL_CAPITAL_RETURN),
        tr.t(keys::COL_DIVIDEND),
        tr.t(keys::COL_INVESTOR_TOTAL),
        tr.t(keys::COL_BALANCE)
    )?;
    for r in &result.years {
        writeln!(
            out,
            "{:>6} {:>16} {:>16} {:>16} {:>16}",
            r.calendar_year,
            money(r.investor.capital_return_payment),
            money(r.investor.dividend),
            money(r.investor.total_investor_cash_flow),
            money(r.investor.capital_balance)
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_groups_thousands() {
        assert_eq!(money(5_000_000.0), "$5,000,000");
        assert_eq!(money(-1234.4), "-$1,234");
        assert_eq!(money(999.0), "$999");
        assert_eq!(money(0.0), "$0");
    }
}
