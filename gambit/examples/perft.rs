/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::time::Instant;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use gambit::{perft, splitperft, Game, Move};

/// Compute total number of states reachable from a position, given a depth.
#[derive(Debug, Parser)]
struct Cli {
    /// Depth to run the perft.
    depth: usize,

    /// The FEN string of the position to run the perft. Defaults to the starting position.
    #[arg(required = false)]
    fen: Option<String>,

    /// List of moves (in UCI notation) to apply to the position before running the perft.
    #[arg(required = false)]
    moves: Vec<String>,

    /// If set, perform a splitperft, displaying the number of nodes reachable after each move available from the root.
    #[arg(short, long, default_value = "false")]
    split: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Cli::parse();

    let mut game = if let Some(fen) = &args.fen {
        Game::from_fen(fen)?
    } else {
        Game::default()
    };

    for mv_str in &args.moves {
        game.apply(Move::from_uci(mv_str)?)?;
    }

    println!(
        "Computing PERFT({}) of the following position:\n{game}\n",
        args.depth
    );

    let now = Instant::now();
    let total_nodes = if args.split {
        let split = splitperft(&game, args.depth);
        for (mv, nodes) in &split {
            println!("{}: {nodes}", mv.to_string().bold());
        }
        println!();
        split.iter().map(|(_, nodes)| nodes).sum()
    } else {
        perft(&game, args.depth)
    };

    let elapsed = now.elapsed();

    // Compute nodes-per-second metrics
    let nps = total_nodes as f32 / elapsed.as_secs_f32();
    let m_nps = nps / 1_000_000.0;

    println!("  Total Nodes:\t{}", total_nodes.to_string().green());
    println!(" Elapsed Time:\t{elapsed:.1?}");
    println!("  Nodes / Sec:\t{nps:.0}");
    println!("M Nodes / Sec:\t{m_nps:.1}");

    for color in [game.turn(), game.turn().opponent()] {
        if game.is_in_checkmate(color) {
            println!("{}", format!("{color} is checkmated").red());
        } else if game.is_in_stalemate(color) {
            println!("{}", format!("{color} is stalemated").yellow());
        }
    }

    Ok(())
}
