use block_plant_projection::finance::Ratio;
use block_plant_projection::indicators::{sub, IndicatorCategory, IndicatorRow, IndicatorTable};
use block_plant_projection::projection::kpi::{self, DashboardTargets};
use block_plant_projection::projection::{self, ProductMix, SimulationInputs};

fn base_result() -> projection::SimulationResult {
    projection::run(&SimulationInputs::default(), &ProductMix::default(), 10).expect("projection")
}

#[test]
fn flattened_table_covers_every_year_and_category() {
    let res = base_result();
    let table = IndicatorTable::from_result(&res);
    assert_eq!(table.years(), (2025..=2034).collect::<Vec<_>>());

    let revenue = table.series(IndicatorCategory::Financial, sub::TOTAL_REVENUE);
    assert_eq!(revenue.len(), 10);
    assert_eq!(revenue[0], (2025, res.years[0].revenue.total));

    let sales_total: f64 = table
        .category_totals_by_year(IndicatorCategory::Sales)
        .iter()
        .map(|(_, v)| v)
        .sum();
    let blocks_total: f64 = res.years.iter().map(|r| r.revenue.blocks).sum();
    assert!((sales_total - blocks_total).abs() < 1e-6 * blocks_total);

    assert_eq!(
        table.filter(IndicatorCategory::Environmental).count(),
        3 * res.years.len()
    );
}

#[test]
fn ebitda_margin_series_matches_kpis() {
    let res = base_result();
    let table = IndicatorTable::from_result(&res);
    let margins = table.ratio_series(IndicatorCategory::Financial, sub::EBITDA, sub::TOTAL_REVENUE);
    let kpis = kpi::headline_kpis(&res, &DashboardTargets::default());
    for ((_, m), y) in margins.iter().zip(&kpis.yearly) {
        assert_eq!(*m, y.ebitda_margin);
    }
}

#[test]
fn growth_and_cumulative_helpers() {
    let series = vec![(2025, 0.0), (2026, 100.0), (2027, 150.0)];
    let growth = IndicatorTable::growth(&series);
    assert_eq!(growth[0].1, Ratio::Undefined);
    // 전년 값이 0이면 증가율은 정의되지 않는다.
    assert_eq!(growth[1].1, Ratio::Undefined);
    assert_eq!(growth[2].1, Ratio::Defined(0.5));
    assert_eq!(
        IndicatorTable::cumulative(&series),
        vec![(2025, 0.0), (2026, 100.0), (2027, 250.0)]
    );
}

#[test]
fn toml_round_trip_of_prebaked_table() {
    let src = r#"
[[rows]]
category = "Financial"
sub_category = "EBITDA"
year = 2025
value = 10.0

[[rows]]
category = "Financial"
sub_category = "EBITDA"
year = 2026
value = 12.5

[[rows]]
category = "Sales"
sub_category = "Block #5"
year = 2025
value = 3.0
"#;
    let table = IndicatorTable::from_toml_str(src).expect("parse");
    assert_eq!(table.rows.len(), 3);
    assert_eq!(table.total(IndicatorCategory::Financial, "EBITDA"), 22.5);
    assert_eq!(
        table.rows[2],
        IndicatorRow {
            category: IndicatorCategory::Sales,
            sub_category: "Block #5".into(),
            year: 2025,
            value: 3.0,
        }
    );
    let again = IndicatorTable::from_toml_str(&table.to_toml_string().expect("ser")).expect("parse");
    assert_eq!(again, table);
}

#[test]
fn documented_column_headers_load() {
    let src = r#"
[[rows]]
Category = "Environmental"
Sub-Category = "CO2 avoided (t)"
Year = 2025
Value = 164250.0
"#;
    let table = IndicatorTable::from_toml_str(src).expect("parse");
    assert_eq!(table.total(IndicatorCategory::Environmental, sub::CO2_AVOIDED), 164_250.0);

    let out = table.to_toml_string().expect("ser");
    assert!(out.contains("Sub-Category = "), "{out}");
    assert!(out.contains("Year = 2025"), "{out}");
    assert_eq!(IndicatorTable::from_toml_str(&out).expect("parse"), table);
}

#[test]
fn zero_revenue_yields_undefined_ratios() {
    let inputs = SimulationInputs {
        daily_intake_tons: 0.0,
        ..SimulationInputs::default()
    };
    let res = projection::run(&inputs, &ProductMix::default(), 3).expect("projection");
    let kpis = kpi::headline_kpis(&res, &DashboardTargets::default());
    for y in &kpis.yearly {
        assert_eq!(y.ebitda_margin, Ratio::Undefined);
        assert_eq!(y.opex_to_block_revenue, Ratio::Undefined);
    }
    assert_eq!(kpis.capacity_utilization, Ratio::Defined(0.0));

    let zero_targets = DashboardTargets {
        plant_capacity_units: 0.0,
        sales_target: 0.0,
    };
    let kpis = kpi::headline_kpis(&base_result(), &zero_targets);
    assert_eq!(kpis.capacity_utilization, Ratio::Undefined);
    assert_eq!(kpis.sales_target_attainment, Ratio::Undefined);
}

#[test]
fn headline_kpis_for_base_case() {
    let res = base_result();
    let kpis = kpi::headline_kpis(&res, &DashboardTargets::default());
    // 50.68M 개 > 35M 정격 → 100%로 제한
    assert_eq!(kpis.capacity_utilization, Ratio::Defined(1.0));
    assert_eq!(kpis.sales_target_attainment, Ratio::Defined(1.0));
    let avg: f64 = res.years.iter().map(|r| r.profit.ebitda).sum::<f64>() / 10.0;
    assert!((kpis.average_ebitda - avg).abs() < 1e-6);
    for y in &kpis.yearly {
        let share = y.opex_to_block_revenue.value().expect("defined");
        assert!((share - 0.45).abs() < 1e-9);
    }

    let plan = kpi::production_plan(&res);
    assert_eq!(plan.len(), 30);
    let y1_units: f64 = plan.iter().filter(|p| p.year == 1).map(|p| p.units).sum();
    assert!((y1_units - res.metrics.total_production).abs() < 1e-3);
}

#[test]
fn table_file_save_and_load() {
    let path = std::env::temp_dir().join(format!("block_indicators_{}.toml", std::process::id()));
    let table = IndicatorTable::from_result(&base_result());
    table.save(&path).expect("save");
    let loaded = IndicatorTable::load(&path).expect("load");
    assert_eq!(loaded.rows.len(), table.rows.len());
    assert_eq!(
        loaded.total(IndicatorCategory::Financial, sub::EBITDA),
        table.total(IndicatorCategory::Financial, sub::EBITDA)
    );
    let _ = std::fs::remove_file(&path);
}
