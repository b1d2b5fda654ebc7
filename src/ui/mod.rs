use crate::common::defs::*;
use crate::envs::{grid_maze::GridMazeEnvironment, state::JumpSpecification};
use crate::tables::{q_table::*, v_table::VTable};
use itertools::Itertools;

type Cells = Vec<Vec<String>>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    pub maze_full_float: bool,
    pub vtable_full_float: bool,
    pub qtable_full_float: bool,
    pub print_policy: bool,
}

impl RenderOptions {
    pub fn with_policy() -> Self {
        Self {
            print_policy: true,
            ..Default::default()
        }
    }
}

/// Text dump of the maze, with optional V table, Q table and greedy policy
/// rows under each maze row.
pub fn render_maze_and_tables(
    header: &str,
    env: &GridMazeEnvironment,
    v_table: Option<&VTable>,
    q_table: Option<&QTable>,
    options: &RenderOptions,
) -> String {
    let mut lines = vec![];
    if !header.is_empty() {
        lines.push(header.to_string());
    }
    lines.extend(transition_probability_lines(env));

    let maze = maze_cells(env, options.maze_full_float);
    let v_cells = v_table.map(|v| v_table_cells(env, v, options.vtable_full_float));
    let q_cells = q_table.map(|q| q_table_cells(env, q, options.qtable_full_float));
    let policy = if options.print_policy {
        policy_cells(env, v_table, q_table)
    } else {
        None
    };

    let width = [Some(&maze), v_cells.as_ref(), q_cells.as_ref(), policy.as_ref()]
        .into_iter()
        .flatten()
        .flat_map(|grid| grid.iter().flatten())
        .map(|c| c.chars().count())
        .fold(2, usize::max);
    let row_line = |prefix: &str, cells: &[String]| {
        format!(
            "{prefix}{}",
            cells
                .iter()
                .map(|c| format!("{}  ", str_center(c, width)))
                .join("")
        )
    };

    let col_indices = (0..env.col_count())
        .map(|ci| format!("{ci:02}"))
        .collect::<Vec<_>>();
    lines.push(row_line("        ", &col_indices));
    for (ri, row) in maze.iter().enumerate() {
        lines.push(row_line(&format!("{ri:02}      "), row));
        if let Some(v) = &v_cells {
            lines.push(row_line("VTable  ", &v[ri]));
        }
        if let Some(q) = &q_cells {
            lines.push(row_line("QTable  ", &q[ri]));
        }
        if let Some(p) = &policy {
            lines.push(row_line("Policy  ", &p[ri]));
        }
        lines.push(String::new());
    }

    lines.iter().map(|l| format!("{l}\n")).join("")
}

/// Integral values print without decimals, values exact to one decimal print
/// one, everything else two.
pub fn float_to_str(value: Continous, full_float: bool) -> String {
    if full_float {
        return format!("{value:.6}");
    }
    if value.fract() == 0. {
        return format!("{}", value as i64);
    }
    if (value * 10.).fract() == 0. {
        return format!("{value:.1}");
    }

    format!("{value:.2}")
}

/// Pads `s` to `len` chars, the odd space going to the left.
pub fn str_center(s: &str, len: usize) -> String {
    let count = s.chars().count();
    assert!(
        len >= count,
        "Cannot center text if it's larger than space: '{s}' in {len}"
    );

    let space = len - count;
    let left = space / 2 + space % 2;
    format!("{}{s}{}", " ".repeat(left), " ".repeat(space / 2))
}

pub fn action_value_list_to_str(avl: &ActionValueList, full_float: bool) -> String {
    if avl.is_terminal() {
        return "*".to_string();
    }

    avl.action_values()
        .iter()
        .map(|av| format!("{}:{}", av.action, float_to_str(av.value, full_float)))
        .join(",")
}

fn transition_probability_lines(env: &GridMazeEnvironment) -> Vec<String> {
    let mut lines = vec![];
    for s in env.states() {
        let jps = s.jump_probabilities();
        if jps.is_empty() || (jps.len() == 1 && jps[0].js == JumpSpecification::Welcome) {
            continue;
        }

        if lines.is_empty() {
            lines.push(String::new());
            lines.push("Transition probabilities (non-stochastic transitions are not printed (i.e as expected based on action)".to_string());
        }
        let (row, col) = s.position();
        for (i, jp) in jps.iter().enumerate() {
            let prefix = if i == 0 {
                format!("[{row},{col}]: ")
            } else {
                "       ".to_string()
            };
            lines.push(format!("{prefix}Probability: {:.2}, Type: {}", jp.p, jp.js));
        }
    }

    if !lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

fn maze_cells(env: &GridMazeEnvironment, full_float: bool) -> Cells {
    cells(env, |row, col| {
        let s = env.state(row, col);
        let suffix = if s.is_end() {
            ":END"
        } else if s.is_start() {
            ":START"
        } else {
            ""
        };
        format!(
            "{}:{}{suffix}",
            s.kind().tag(),
            float_to_str(s.reward(), full_float)
        )
    })
}

fn v_table_cells(env: &GridMazeEnvironment, v_table: &VTable, full_float: bool) -> Cells {
    visitable_cells(env, |row, col| float_to_str(v_table[(row, col)], full_float))
}

fn q_table_cells(env: &GridMazeEnvironment, q_table: &QTable, full_float: bool) -> Cells {
    visitable_cells(env, |row, col| {
        action_value_list_to_str(&q_table[(row, col)], full_float)
    })
}

fn policy_cells(
    env: &GridMazeEnvironment,
    v_table: Option<&VTable>,
    q_table: Option<&QTable>,
) -> Option<Cells> {
    let greedy = match (q_table, v_table) {
        (Some(q), _) => q.reduce_to_max_table(None, false),
        (None, Some(v)) => env
            .create_q_table_from_v_table(v)
            .reduce_to_max_table(None, false),
        (None, None) => return None,
    };

    Some(visitable_cells(env, |row, col| {
        let avl = &greedy[(row, col)];
        if avl.is_terminal() {
            return "*".to_string();
        }
        avl.action_values().iter().map(|av| av.action).join(" ")
    }))
}

fn visitable_cells<F>(env: &GridMazeEnvironment, mut f: F) -> Cells
where
    F: FnMut(usize, usize) -> String,
{
    cells(env, |row, col| {
        if env.state(row, col).is_visitable() {
            f(row, col)
        } else {
            "*".to_string()
        }
    })
}

fn cells<F>(env: &GridMazeEnvironment, mut f: F) -> Cells
where
    F: FnMut(usize, usize) -> String,
{
    (0..env.row_count())
        .map(|row| (0..env.col_count()).map(|col| f(row, col)).collect())
        .collect()
}
