use block_plant_projection::projection::{
    self, CostLineItem, CostSchedule, PlantYield, ProductMix, ProductMixEntry, ProductMixError,
    ProjectionError, ProjectionModel, SimulationInputs, MAX_HORIZON_YEARS,
};

fn expect_invalid(inputs: SimulationInputs, expected_field: &str) {
    match projection::run(&inputs, &ProductMix::default(), 10) {
        Err(ProjectionError::InvalidInput { field, .. }) => assert_eq!(field, expected_field),
        other => panic!("expected invalid {expected_field}, got {other:?}"),
    }
}

#[test]
fn rejects_negative_tonnage() {
    expect_invalid(
        SimulationInputs {
            daily_intake_tons: -1.0,
            ..SimulationInputs::default()
        },
        "daily_intake_tons",
    );
}

#[test]
fn rejects_non_finite_price() {
    expect_invalid(
        SimulationInputs {
            base_block_price: f64::NAN,
            ..SimulationInputs::default()
        },
        "base_block_price",
    );
}

#[test]
fn rejects_tax_rate_outside_unit_interval() {
    expect_invalid(
        SimulationInputs {
            income_tax_rate: 1.5,
            ..SimulationInputs::default()
        },
        "income_tax_rate",
    );
    expect_invalid(
        SimulationInputs {
            inflation_rate: -0.01,
            ..SimulationInputs::default()
        },
        "inflation_rate",
    );
}

#[test]
fn rejects_zero_horizon() {
    let res = projection::run(&SimulationInputs::default(), &ProductMix::default(), 0);
    assert!(matches!(
        res,
        Err(ProjectionError::InvalidInput {
            field: "horizon_years",
            ..
        })
    ));
}

#[test]
fn rejects_horizon_beyond_limit() {
    for horizon in [MAX_HORIZON_YEARS + 1, u32::MAX] {
        let res = projection::run(&SimulationInputs::default(), &ProductMix::default(), horizon);
        assert!(matches!(
            res,
            Err(ProjectionError::InvalidInput {
                field: "horizon_years",
                ..
            })
        ));
    }
    let res = projection::run(
        &SimulationInputs::default(),
        &ProductMix::default(),
        MAX_HORIZON_YEARS,
    )
    .expect("longest horizon");
    assert_eq!(res.years.len(), MAX_HORIZON_YEARS as usize);
}

fn expect_model_invalid(model: ProjectionModel, expected_field: &str) {
    match model.run(&SimulationInputs::default(), &ProductMix::default(), 10) {
        Err(ProjectionError::InvalidInput { field, .. }) => assert_eq!(field, expected_field),
        other => panic!("expected invalid {expected_field}, got {other:?}"),
    }
}

#[test]
fn rejects_negative_or_non_finite_yield_coefficients() {
    expect_model_invalid(
        ProjectionModel {
            plant_yield: PlantYield {
                units_per_ton: -380.0,
                ..PlantYield::default()
            },
            ..ProjectionModel::default()
        },
        "plant_yield.units_per_ton",
    );
    expect_model_invalid(
        ProjectionModel {
            plant_yield: PlantYield {
                expansion_factor: f64::INFINITY,
                ..PlantYield::default()
            },
            ..ProjectionModel::default()
        },
        "plant_yield.expansion_factor",
    );
}

#[test]
fn rejects_non_finite_cost_line() {
    let costs = CostSchedule {
        energy: CostLineItem {
            base_amount: f64::NAN,
            ..CostSchedule::default().energy
        },
        ..CostSchedule::default()
    };
    expect_model_invalid(
        ProjectionModel {
            costs,
            ..ProjectionModel::default()
        },
        "costs.energy.base_amount",
    );

    let costs = CostSchedule {
        payroll: CostLineItem {
            base_amount: -1.0,
            ..CostSchedule::default().payroll
        },
        ..CostSchedule::default()
    };
    expect_model_invalid(
        ProjectionModel {
            costs,
            ..ProjectionModel::default()
        },
        "costs.payroll.base_amount",
    );
}

#[test]
fn rejects_bad_model_ratio() {
    let model = ProjectionModel {
        dividend_share: 1.2,
        ..ProjectionModel::default()
    };
    let res = model.run(&SimulationInputs::default(), &ProductMix::default(), 10);
    assert!(matches!(
        res,
        Err(ProjectionError::InvalidInput {
            field: "dividend_share",
            ..
        })
    ));
}

#[test]
fn mix_shares_must_sum_to_one() {
    let err = ProductMix::new(vec![
        ProductMixEntry::new("a", 0.6, 1.0),
        ProductMixEntry::new("b", 0.3, 1.2),
    ])
    .unwrap_err();
    assert!(matches!(err, ProductMixError::SharesDoNotSumToOne(_)));
}

#[test]
fn mix_rejects_empty_negative_and_duplicates() {
    assert_eq!(ProductMix::new(vec![]).unwrap_err(), ProductMixError::Empty);
    assert!(matches!(
        ProductMix::new(vec![
            ProductMixEntry::new("a", 1.2, 1.0),
            ProductMixEntry::new("b", -0.2, 1.0),
        ]),
        Err(ProductMixError::InvalidEntry { field: "share", .. })
    ));
    assert!(matches!(
        ProductMix::new(vec![ProductMixEntry::new("a", 1.0, -1.0)]),
        Err(ProductMixError::InvalidEntry {
            field: "price_multiplier",
            ..
        })
    ));
    assert_eq!(
        ProductMix::new(vec![
            ProductMixEntry::new("a", 0.5, 1.0),
            ProductMixEntry::new("a", 0.5, 1.0),
        ])
        .unwrap_err(),
        ProductMixError::DuplicateName("a".into())
    );
}

#[test]
fn default_mix_is_valid() {
    let mix = ProductMix::new(projection::product_mix::default_entries()).expect("default mix");
    assert_eq!(mix, ProductMix::default());
    assert_eq!(mix.len(), 3);
    assert!((mix.weighted_multiplier() - 1.12).abs() < 1e-12);
}
