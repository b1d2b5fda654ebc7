extern crate gridmaze;
mod common;

use common::*;
use gridmaze::*;
use rstest::rstest;

#[test]
fn converged_on_first_repeat_of_greedy_actions() {
    let env = six_by_six();
    let mut stc = StopTrainingCondition::new(&env, 100, true, 0., false);

    assert!(!stc.report_iteration(&see_saw_v_table(6, 6, 0)));
    assert!(!stc.report_iteration(&see_saw_v_table(6, 6, 1)));
    assert!(stc.report_iteration(&see_saw_v_table(6, 6, 3)));

    assert_eq!(stc.done_cause(), Some(DoneCause::Converged));
    assert_eq!(stc.iteration_count(), 3);
    assert_eq!(
        stc.termination_str(),
        "Convergence reached after 2 sweeps (detected while doing sweep 3)"
    );
}

#[rstest]
#[case(1)]
#[case(2)]
#[case(7)]
fn iteration_count_exactly_at_max(#[case] iterations_max: usize) {
    let env = six_by_six();
    let mut stc = StopTrainingCondition::new(&env, iterations_max, true, 0., false);

    for i in 0..iterations_max - 1 {
        assert!(!stc.report_iteration(&see_saw_v_table(6, 6, i)));
    }
    assert!(stc.report_iteration(&see_saw_v_table(6, 6, iterations_max - 1)));

    assert_eq!(stc.done_cause(), Some(DoneCause::IterationCount));
    assert_eq!(stc.iteration_count(), iterations_max);
    assert_eq!(
        stc.termination_str(),
        format!("Maximum sweep count reached: {iterations_max}")
    );
}

#[test]
#[should_panic(expected = "Illegal to call this method afterwards")]
fn reporting_after_done() {
    let env = six_by_six();
    let mut stc = StopTrainingCondition::new(&env, 1, false, 0., false);

    stc.report_iteration(&see_saw_v_table(6, 6, 0));
    stc.report_iteration(&see_saw_v_table(6, 6, 1));
}

#[test]
#[should_panic(expected = "Column count mismatch")]
fn v_table_of_the_wrong_shape() {
    let env = six_by_six();
    let mut stc = StopTrainingCondition::new(&env, 10, false, 0., false);

    stc.report_iteration(&VTable::new(6, 5));
}
