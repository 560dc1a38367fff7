use anyhow::{Context, Result};

use std::io::{stdin, stdout, Stdin, Write};

use connect4_engine::{
    board::{Board, GameState},
    lines::game_state,
    solver::Solver,
    transposition_table::TranspositionTable,
    WIDTH,
};

mod display;

/// byte budget for the per-game transposition table
const TABLE_BYTES: usize = 64 * 1024 * 1024;

const DEFAULT_DEPTH: u32 = 8;

fn main() -> Result<()> {
    env_logger::init();

    let stdin = stdin();
    let mut search_depth = DEFAULT_DEPTH;

    println!("Welcome to Connect 4\n");

    loop {
        println!("Type 1 or 2 to play as the first or second player.");
        println!(
            "     D to change difficulty (currently {}). Q to quit.",
            search_depth
        );
        print!("> ");
        stdout().flush()?;

        let mut buffer = String::new();
        stdin.read_line(&mut buffer)?;

        let human_first = match buffer.trim().to_lowercase().chars().next() {
            Some('1') => true,
            Some('2') => false,
            Some('d') => {
                print!("Enter a search depth of 1 or more (larger depths take longer): ");
                stdout().flush()?;

                let mut depth_str = String::new();
                stdin.read_line(&mut depth_str)?;
                match depth_str.trim().parse::<u32>() {
                    Ok(depth) if depth >= 1 => search_depth = depth,
                    _ => println!("Difficulty must be a number of 1 or more"),
                }
                continue;
            }
            Some('q') => break,
            _ => {
                println!("Unknown answer given");
                continue;
            }
        };

        run_game(&stdin, human_first, search_depth)?;
    }
    Ok(())
}

fn run_game(stdin: &Stdin, human_first: bool, search_depth: u32) -> Result<()> {
    let mut board = Board::new();
    // keep the transposition table out here so every move of the game re-uses it
    let mut table = TranspositionTable::with_byte_budget(TABLE_BYTES)
        .context("failed to create the transposition table")?;

    // game loop
    loop {
        let state = game_state(&board);
        display::draw(&board, state)?;

        match state {
            GameState::Playing => {
                let human_turn = (board.ply() % 2 == 0) == human_first;
                if human_turn {
                    print!("Move input (1-{}) > ", WIDTH);
                    stdout().flush()?;

                    let mut input = String::new();
                    stdin.read_line(&mut input)?;
                    let column = match input.trim().parse::<usize>() {
                        Ok(column @ 1..=WIDTH) => column - 1,
                        _ => {
                            println!("Invalid column: {}", input.trim());
                            continue;
                        }
                    };
                    if let Err(err) = board.drop_piece(column) {
                        println!("{}", err);
                        // try the move again
                        continue;
                    }
                } else {
                    println!("Computer is thinking...");
                    stdout().flush()?;

                    let mut solver = Solver::new(&mut table);
                    let column = solver.choose_move(&board, search_depth)?;
                    board.drop_piece(column)?;
                }
            }

            // end states
            GameState::PlayerOneWin => {
                println!("Player 1 wins!");
                break;
            }
            GameState::PlayerTwoWin => {
                println!("Player 2 wins!");
                break;
            }
            GameState::Draw => {
                println!("Draw!");
                break;
            }
        }
    }

    println!("Press enter to return to the menu.");
    let mut buffer = String::new();
    stdin.read_line(&mut buffer)?;
    Ok(())
}
