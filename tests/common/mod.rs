use gridmaze::*;

/// 6x6, START (5,0), END (5,5), HOLEs (5,1..4) with 50/50 slippery cells
/// above them.
#[allow(dead_code)]
pub fn six_by_six() -> GridMazeEnvironment {
    let mut env = GridMazeEnvironment::new(6, 6, -1., -1.);
    env.set(5, 0, State::start());
    env.set(5, 5, State::end().with_reward(0.));
    for col in 1..5 {
        env.set_jump_probabilities(
            4,
            col,
            vec![
                JumpProbability::new(JumpSpecification::Relative(1, 0), 0.5),
                JumpProbability::new(JumpSpecification::Welcome, 0.5),
            ],
        );
        env.set(5, col, State::hole().with_reward(-100.));
    }
    env
}

#[allow(dead_code)]
pub fn holes() -> Vec<Position> {
    (1..5).map(|col| (5, col)).collect()
}

/// V tables alternating which of two neighbouring cells is larger.
#[allow(dead_code)]
pub fn see_saw_v_table(rows: usize, cols: usize, iteration: usize) -> VTable {
    let mut v = VTable::new(rows, cols);
    let (high, low) = if iteration % 2 == 0 {
        ((0, 0), (0, 1))
    } else {
        ((0, 1), (0, 0))
    };
    v[high] = (iteration + 1) as Continous;
    v[low] = 0.;
    v
}
