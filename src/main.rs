use gridmaze::*;
use rand::prelude::*;
use std::env;
use std::error::Error;
use tracing::info;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt::init();

    let config = match env::args().nth(1) {
        Some(path) => {
            info!("Loading configuration from {path}");
            ExperimentConfig::load(path)?
        }
        None => ExperimentConfig::default(),
    };
    let maze = config.maze.build();
    let rng = &mut StdRng::seed_from_u64(config.seed);

    print!(
        "{}",
        render_maze_and_tables("--- Maze", &maze, None, None, &RenderOptions::default())
    );

    let params = &config.q_learning;
    let policy = EpsilonGreedy::new(params.epsilon);
    let report = q_learning(&maze, &policy, params, rng);
    println!(
        "Trained for: {} episodes, average steps per episode: {:.2}",
        report.episodes,
        report.total_steps as Continous / report.episodes.max(1) as Continous
    );
    for ((row, col), n) in report.end_counts.iter() {
        println!("Ended on [{row},{col}] {n} times");
    }
    print!(
        "{}",
        render_maze_and_tables(
            "--- Q-learning result",
            &maze,
            None,
            Some(&report.q_table),
            &RenderOptions::with_policy(),
        )
    );
    println!(
        "Greedy path: {:?}",
        greedy_path(&maze, &report.q_table, maze.row_count() * maze.col_count())
    );

    let vi_config = &config.value_iteration;
    let mut stop = StopTrainingCondition::new(
        &maze,
        vi_config.iterations_max,
        vi_config.stop_on_convergence,
        vi_config.stop_on_percent_diff,
        vi_config.debug,
    );
    let mut vi = ValueIteration::new(&maze, vi_config.gamma);
    vi.exec(&mut stop);
    print!(
        "{}",
        render_maze_and_tables(
            "--- Value iteration result",
            &maze,
            Some(vi.v_table()),
            None,
            &RenderOptions::with_policy(),
        )
    );
    println!("{}", stop.termination_str());

    Ok(())
}
