// tests/planning_scenarios.rs

mod common;

use common::*;
use dos_repattern::io::scenario::default_plan;
use dos_repattern::{
    compare_plans, logging, max_feasible_sales, sales_repattern, validate, GoodLpBackend,
    PlanError, PlanInputs, PlanWarning, PlanningConfig, RepatternWeights, SolveStatus,
    SolverSettings, MONTHS,
};

/// Solved to proven optimality so totals compare exactly across models.
fn settings() -> SolverSettings {
    SolverSettings {
        mip_gap: 0.0,
        ..SolverSettings::default()
    }
}

fn config(sales_target: i64) -> PlanningConfig {
    PlanningConfig {
        solver: settings(),
        sales_target,
        ..PlanningConfig::default()
    }
}

fn repattern_with(
    inputs: &PlanInputs,
    target: i64,
    weights: RepatternWeights,
) -> dos_repattern::RepatternResult {
    let plan = validate(inputs).unwrap();
    sales_repattern(&plan, target, &weights, &settings(), &GoodLpBackend::new()).unwrap()
}

#[test]
fn baseline_target_keeps_the_plan() {
    logging::init_test();
    let inputs = default_plan();
    let plan = validate(&inputs).unwrap();

    let result = repattern_with(&inputs, 120_000, RepatternWeights::default());

    assert_eq!(result.status, SolveStatus::Optimal);
    assert!(approx(result.target_deviation, 0.0, TOL));
    assert!(approx(result.r_plus, 1.0, 1e-6));
    assert!(approx(result.r_minus, 1.0, 1e-6));
    for i in 0..MONTHS {
        assert!(approx(result.projection.final_sales[i], 10_000.0, TOL));
        assert!(approx(result.projection.inventory_levels[i], 7_500.0, TOL));
        assert!(approx(result.projection.days_of_supply[i].unwrap(), 18.0, 1e-6));
        assert!(approx(result.ratios[i].unwrap(), 1.0, 1e-6));
    }
    assert_inventory_recurrence(&plan, &inputs, &result.projection);
    assert!(result.warnings.is_empty());
}

#[test]
fn lower_target_scales_every_month_down_uniformly() {
    logging::init_test();
    let inputs = default_plan();
    let plan = validate(&inputs).unwrap();

    let result = repattern_with(&inputs, 108_000, RepatternWeights::default());

    assert!(approx(result.target_deviation, 0.0, TOL));
    assert!(approx(result.r_plus, 0.9, 1e-6));
    assert!(approx(result.r_minus, 0.9, 1e-6));
    for ratio in result.ratios {
        assert!(approx(ratio.unwrap(), 0.9, 1e-6));
    }
    assert!(approx(result.projection.total_sales(), 108_000.0, TOL));
    // Stock builds by 1000 a month from the 7500 opening balance.
    assert!(approx(result.projection.inventory_levels[11], 19_500.0, TOL));
    assert_inventory_recurrence(&plan, &inputs, &result.projection);
    assert_dos_band(&plan, &inputs, &result.projection);
}

#[test]
fn without_target_pressure_ratios_converge() {
    logging::init_test();
    let inputs = default_plan();

    let result = repattern_with(
        &inputs,
        150_000,
        RepatternWeights {
            alpha: 1.0,
            lambda: 0.0,
        },
    );

    assert!(result.ratio_spread() < 1e-6);
    let first = result.ratios[0].unwrap();
    assert!(result.ratios.iter().all(|r| approx(r.unwrap(), first, 1e-6)));
}

#[test]
fn stretch_target_stays_inside_the_envelope_and_band() {
    logging::init_test();
    let inputs = default_plan();
    let plan = validate(&inputs).unwrap();

    let comparison = compare_plans(&plan, &config(150_000), &GoodLpBackend::new()).unwrap();

    assert_eq!(comparison.max_sales_push, 121_249.0);
    assert_eq!(comparison.original_total, 120_000);
    assert_eq!(comparison.target, 150_000);
    assert!(comparison.max_sales_push + TOL >= comparison.final_total);
    // Target is out of reach, so the plan ends under it.
    assert!(comparison.gap_to_target > 0.0);
    assert!(approx(
        comparison.final_total + comparison.gap_to_target,
        150_000.0,
        TOL
    ));

    for projection in [&comparison.envelope.projection, &comparison.repattern.projection] {
        assert_inventory_recurrence(&plan, &inputs, projection);
        assert_dos_band(&plan, &inputs, projection);
        assert_integral_sales(projection);
    }
}

#[test]
fn envelope_ceiling_on_default_plan() {
    logging::init_test();
    let inputs = default_plan();
    let plan = validate(&inputs).unwrap();

    let result = max_feasible_sales(&plan, &settings(), &GoodLpBackend::new()).unwrap();

    // Greedy integer drawdown: sell floor(24 * available / 39) each month,
    // which leaves 6251 units at year end (7500 + 120000 - 6251).
    assert_eq!(result.status, SolveStatus::Optimal);
    assert_eq!(result.max_total_sales, 121_249.0);
    assert!(approx(result.projection.inventory_levels[MONTHS - 1], 6_251.0, TOL));
    assert_integral_sales(&result.projection);
    assert_inventory_recurrence(&plan, &inputs, &result.projection);
    assert_dos_band(&plan, &inputs, &result.projection);
    // The min-DoS floor is what caps the ceiling.
    let last = result.projection.days_of_supply[MONTHS - 1].unwrap();
    assert!(last >= 15.0 - TOL && last < 15.01, "December DoS {}", last);
    assert!(result.max_total_sales > f64::from(inputs.original_sales.iter().sum::<u32>()));
}

#[test]
fn frozen_history_is_spliced_back() {
    logging::init_test();
    let mut inputs = default_plan().with_frozen_prefix(3);
    inputs.original_sales[0] = 9_000;
    inputs.original_sales[1] = 11_000;
    inputs.dealer_stock[0] = 8_500;
    inputs.dealer_stock[1] = 7_000;
    inputs.dealer_stock[2] = 7_200;
    let plan = validate(&inputs).unwrap();
    let backend = GoodLpBackend::new();

    let envelope = max_feasible_sales(&plan, &settings(), &backend).unwrap();
    let repattern = sales_repattern(
        &plan,
        120_000,
        &RepatternWeights::default(),
        &settings(),
        &backend,
    )
    .unwrap();

    assert_eq!(repattern.adjusted_target, 120_000 - 30_000);
    for projection in [&envelope.projection, &repattern.projection] {
        assert_frozen_months_kept(&inputs, projection);
        assert_eq!(projection.inventory_levels[0], 8_500.0);
        assert_eq!(projection.inventory_levels[1], 7_000.0);
        assert_eq!(projection.inventory_levels[2], 7_200.0);
        assert_inventory_recurrence(&plan, &inputs, projection);
        assert_dos_band(&plan, &inputs, projection);
    }
    assert!(envelope.max_total_sales + TOL >= repattern.projection.total_sales());
    assert_eq!(repattern.ratios[0], Some(1.0));
}

#[test]
fn pinned_month_inside_window_is_honoured() {
    logging::init_test();
    let mut inputs = default_plan();
    inputs.frozen[4] = true;
    inputs.original_sales[4] = 8_000;
    let plan = validate(&inputs).unwrap();
    let backend = GoodLpBackend::new();

    let envelope = max_feasible_sales(&plan, &settings(), &backend).unwrap();
    let repattern =
        sales_repattern(&plan, 116_000, &RepatternWeights::default(), &settings(), &backend).unwrap();

    for projection in [&envelope.projection, &repattern.projection] {
        assert_eq!(projection.final_sales[4], 8_000.0);
        assert_inventory_recurrence(&plan, &inputs, projection);
        assert_dos_band(&plan, &inputs, projection);
    }
}

#[test]
fn fully_frozen_plan_returns_the_baseline() {
    logging::init_test();
    let inputs = default_plan().with_frozen_prefix(MONTHS);
    let plan = validate(&inputs).unwrap();

    let comparison = compare_plans(&plan, &config(150_000), &GoodLpBackend::new()).unwrap();

    assert_eq!(comparison.max_sales_push, 120_000.0);
    assert_eq!(comparison.final_total, 120_000.0);
    assert_eq!(comparison.envelope.projection.final_sales, [10_000.0; MONTHS]);
    assert_eq!(comparison.repattern.projection.final_sales, [10_000.0; MONTHS]);
    assert_eq!(comparison.repattern.projection.inventory_levels, [7_500.0; MONTHS]);
    assert_eq!(comparison.repattern.adjusted_target, 30_000);
    assert_eq!(comparison.gap_to_target, 30_000.0);
}

#[test]
fn history_above_target_warns_and_clamps() {
    logging::init_test();
    let inputs = default_plan().with_frozen_prefix(6);
    let plan = validate(&inputs).unwrap();

    let result = sales_repattern(
        &plan,
        50_000,
        &RepatternWeights::default(),
        &settings(),
        &GoodLpBackend::new(),
    )
    .unwrap();

    assert_eq!(result.adjusted_target, 0);
    assert_eq!(
        result.warnings,
        vec![PlanWarning::TargetAlreadyExceeded {
            sales_target: 50_000,
            locked_sales: 60_000
        }]
    );
    // Stock must still be sold down to stay under the DoS ceiling.
    assert!(result.target_deviation < 0.0);
    assert_dos_band(&plan, &inputs, &result.projection);
    // Selling as little as possible leaves the last month at the ceiling.
    let last = result.projection.days_of_supply[MONTHS - 1].unwrap();
    assert!(last > 59.9 && last <= 60.0 + TOL, "December DoS {}", last);
}

#[test]
fn inverted_dos_band_is_infeasible_for_both_models() {
    logging::init_test();
    let mut inputs = default_plan();
    inputs.min_dos = vec![60.0; MONTHS];
    inputs.max_dos = vec![15.0; MONTHS];
    let plan = validate(&inputs).unwrap();
    let backend = GoodLpBackend::new();

    assert_eq!(
        max_feasible_sales(&plan, &settings(), &backend).unwrap_err(),
        PlanError::Infeasible {
            formulation: "max_feasible_sales"
        }
    );
    assert_eq!(
        sales_repattern(&plan, 120_000, &RepatternWeights::default(), &settings(), &backend)
            .unwrap_err(),
        PlanError::Infeasible {
            formulation: "sales_repattern"
        }
    );
}

#[test]
fn shape_error_stops_before_solving() {
    let mut inputs = default_plan();
    inputs.selling_days.truncate(10);

    assert_eq!(
        validate(&inputs).unwrap_err(),
        PlanError::Shape {
            series: "selling_days",
            len: 10
        }
    );
}

#[test]
fn negative_weight_is_rejected() {
    let plan = validate(&default_plan()).unwrap();
    let err = sales_repattern(
        &plan,
        120_000,
        &RepatternWeights {
            alpha: 1.0,
            lambda: -3.0,
        },
        &settings(),
        &GoodLpBackend::new(),
    )
    .unwrap_err();

    assert!(matches!(err, PlanError::InvalidWeight { name: "lambda", .. }));
}

#[test]
fn comparison_serializes_with_planner_field_names() {
    logging::init_test();
    let plan = validate(&default_plan()).unwrap();
    let comparison = compare_plans(&plan, &config(120_000), &GoodLpBackend::new()).unwrap();

    let json = serde_json::to_value(&comparison).unwrap();

    assert!(json["envelope"]["max_total_sales"].is_number());
    assert!(json["repattern"]["R_plus"].is_number());
    assert!(json["repattern"]["R_minus"].is_number());
    assert_eq!(json["repattern"]["final_sales"].as_array().unwrap().len(), 12);
    assert_eq!(json["repattern"]["status"], "optimal");
}
