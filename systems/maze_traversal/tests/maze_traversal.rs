use std::collections::{HashSet, VecDeque};

use elemental_trials_core::{CellCoord, Direction, GridSize, HeldDirections, Maze, RunState};
use elemental_trials_system_maze_generation::MazeGenerator;
use elemental_trials_system_maze_traversal::MazeRun;
use proptest::prelude::*;

fn generated(width: u32, height: u32, seed: u64) -> Maze {
    MazeGenerator::new(GridSize::new(width, height))
        .expect("valid size")
        .generate_from_seed(seed)
}

/// Directions along the unique start-to-goal path of a perfect maze.
fn solution(maze: &Maze) -> Vec<Direction> {
    let mut came_from = vec![None; maze.size().cell_count()];
    let mut queue = VecDeque::from([maze.start()]);
    let start_index = maze.size().index_of(maze.start()).expect("start inside grid");
    came_from[start_index] = Some((maze.start(), Direction::Up));

    while let Some(cell) = queue.pop_front() {
        if cell == maze.goal() {
            break;
        }
        for direction in Direction::ALL {
            let Some(next) = cell.offset(direction, 1) else {
                continue;
            };
            let Some(index) = maze.size().index_of(next) else {
                continue;
            };
            if maze.is_passage(next) && came_from[index].is_none() {
                came_from[index] = Some((cell, direction));
                queue.push_back(next);
            }
        }
    }

    let mut path = Vec::new();
    let mut cursor = maze.goal();
    while cursor != maze.start() {
        let index = maze.size().index_of(cursor).expect("inside grid");
        let (previous, direction) = came_from[index].expect("goal reachable");
        path.push(direction);
        cursor = previous;
    }
    path.reverse();
    path
}

fn opposite(direction: Direction) -> Direction {
    match direction {
        Direction::Up => Direction::Down,
        Direction::Down => Direction::Up,
        Direction::Left => Direction::Right,
        Direction::Right => Direction::Left,
    }
}

fn replay(maze: &Maze, inputs: &[Direction]) -> MazeRun {
    let mut run = MazeRun::new(maze.clone(), 1).expect("valid speed");
    for direction in inputs {
        let _ = run.tick(HeldDirections::from_directions(&[*direction]));
    }
    run
}

#[test]
fn following_the_unique_path_wins() {
    let maze = generated(40, 40, 0x5eed);
    let path = solution(&maze);
    let run = replay(&maze, &path);

    assert_eq!(run.state(), RunState::Won);
    assert_eq!(run.position(), CellCoord::new(37, 37));
    assert_eq!(run.trail().len(), path.len());
    assert_eq!(run.ticks(), path.len() as u64);
}

#[test]
fn deterministic_replay_produces_identical_runs() {
    let maze = generated(24, 18, 42);
    let mut inputs = solution(&maze);
    inputs.truncate(inputs.len() / 2);
    inputs.push(Direction::Up);
    inputs.push(Direction::Left);

    let first = replay(&maze, &inputs);
    let second = replay(&maze, &inputs);
    assert_eq!(first, second, "replay diverged between runs");
}

#[test]
fn retreating_along_the_path_is_fatal() {
    let maze = generated(20, 20, 9);
    let mut inputs = solution(&maze);
    inputs.truncate(3);
    let last = *inputs.last().expect("path longer than three cells");
    inputs.push(opposite(last));

    let run = replay(&maze, &inputs);
    assert_eq!(run.state(), RunState::Lost);
    assert_eq!(run.ticks(), 4);
}

#[test]
fn input_after_winning_is_ignored() {
    let maze = generated(10, 10, 3);
    let mut path = solution(&maze);
    let last = *path.last().expect("goal differs from start");
    path.push(opposite(last));

    let run = replay(&maze, &path);
    assert_eq!(run.state(), RunState::Won);
    assert_eq!(run.position(), maze.goal());
}

proptest! {
    #[test]
    fn runner_never_enters_walls_or_jumps(
        half_width in 3u32..12,
        half_height in 3u32..12,
        seed: u64,
        inputs in proptest::collection::vec(0usize..4, 0..200),
    ) {
        let maze = generated(half_width * 2, half_height * 2, seed);
        let mut run = MazeRun::new(maze, 1).expect("valid speed");

        for pick in inputs {
            let before = run.clone();
            let state = run.tick(HeldDirections::from_directions(&[Direction::ALL[pick]]));

            prop_assert!(run.maze().is_passage(run.position()));
            for pair in run.trail().windows(2) {
                prop_assert_eq!(pair[0].manhattan_distance(pair[1]), 1);
            }

            match state {
                RunState::Running => {
                    let unique: HashSet<_> = run.trail().iter().collect();
                    prop_assert_eq!(unique.len(), run.trail().len());
                }
                RunState::Lost => {
                    let (last, earlier) = run.trail().split_last().expect("non-empty trail");
                    prop_assert!(earlier.contains(last));
                }
                RunState::Won => prop_assert_eq!(run.position(), run.maze().goal()),
            }

            if before.state().is_terminal() {
                prop_assert_eq!(&run, &before);
            }
        }
    }
}
