use crate::common::defs::*;
use crate::envs::grid_maze::GridMazeEnvironment;
use crate::tables::{q_table::QTable, v_table::VTable};
use crate::ui::{render_maze_and_tables, RenderOptions};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoneCause {
    /// Two consecutive greedy tables kept the same actions in every cell.
    Converged,
    /// No cell changed by more than the configured relative delta.
    DeltaPercent,
    IterationCount,
}

/// Decides when iterative training over V tables should stop.
#[derive(Debug)]
pub struct StopTrainingCondition<'a> {
    env: &'a GridMazeEnvironment,
    iterations_max: usize,
    stop_on_convergence: bool,
    stop_on_percent_diff: Continous,
    debug: bool,
    iteration_count: usize,
    done_cause: Option<DoneCause>,
    prev: Option<(VTable, QTable)>,
}

impl<'a> StopTrainingCondition<'a> {
    pub fn new(
        env: &'a GridMazeEnvironment,
        iterations_max: usize,
        stop_on_convergence: bool,
        stop_on_percent_diff: Continous,
        debug: bool,
    ) -> Self {
        Self {
            env,
            iterations_max,
            stop_on_convergence,
            stop_on_percent_diff,
            debug,
            iteration_count: 0,
            done_cause: None,
            prev: None,
        }
    }

    /// Only stops after `iterations_max` reports, or when values stop changing.
    pub fn with_iterations_max(env: &'a GridMazeEnvironment, iterations_max: usize) -> Self {
        Self::new(env, iterations_max, false, 0., false)
    }

    pub fn reset(&mut self) {
        self.iteration_count = 0;
        self.done_cause = None;
        self.prev = None;
    }

    /// Record the V table produced by one more iteration. Returns true once done.
    pub fn report_iteration(&mut self, v_table: &VTable) -> bool {
        assert!(
            !self.is_done(),
            "A done condition has already been reported. Illegal to call this method afterwards"
        );

        self.iteration_count += 1;
        let q_table = self
            .env
            .create_q_table_from_v_table(v_table)
            .reduce_to_max_table(None, false);

        if let Some((v_prev, q_prev)) = &self.prev {
            if self.debug {
                self.debug_dump(v_prev, q_prev, v_table, &q_table);
            }

            if self.stop_on_convergence && q_prev.is_action_equivalent(&q_table) {
                self.done_cause = Some(DoneCause::Converged);
                return true;
            }

            if v_prev.max_relative_delta(v_table) <= self.stop_on_percent_diff {
                self.done_cause = Some(DoneCause::DeltaPercent);
                return true;
            }
        }

        if self.iteration_count == self.iterations_max {
            self.done_cause = Some(DoneCause::IterationCount);
            return true;
        }

        self.prev = Some((v_table.clone(), q_table));
        false
    }

    pub fn is_done(&self) -> bool {
        self.done_cause.is_some()
    }

    pub fn iteration_count(&self) -> usize {
        self.iteration_count
    }

    pub fn done_cause(&self) -> Option<DoneCause> {
        self.done_cause
    }

    pub fn termination_str(&self) -> String {
        let n = self.iteration_count;
        match self.done_cause {
            Some(DoneCause::Converged) => format!(
                "Convergence reached after {} sweeps (detected while doing sweep {n})",
                n - 1
            ),
            Some(DoneCause::DeltaPercent) => format!(
                "Deltapercent reached during sweep: {n} when delta was <= {:.2}",
                self.stop_on_percent_diff
            ),
            Some(DoneCause::IterationCount) => format!("Maximum sweep count reached: {n}"),
            None => panic!("Cannot describe termination, training is not done"),
        }
    }

    fn debug_dump(&self, v_prev: &VTable, q_prev: &QTable, v_curr: &VTable, q_curr: &QTable) {
        let n = self.iteration_count;
        let options = RenderOptions::default();
        debug!(
            "StopTrainingCondition: iteration {n} has been run\n{}\n{}",
            render_maze_and_tables(
                &format!("1. Prev, after iteration: {}", n - 1),
                self.env,
                Some(v_prev),
                Some(q_prev),
                &options,
            ),
            render_maze_and_tables(
                &format!("2. Current, after iteration: {n}"),
                self.env,
                Some(v_curr),
                Some(q_curr),
                &options,
            )
        );
    }
}
