//! Perft benchmark for profiling with cargo-flamegraph.
//!
//! Usage:
//!   cargo flamegraph --example perft_bench -p chess_core -- [depth] [fen]
//!
//! Examples:
//!   # Default: depth 3 over the built-in positions
//!   cargo flamegraph --example perft_bench -p chess_core
//!
//!   # Custom depth and position, side to move as the second FEN field
//!   cargo flamegraph --example perft_bench -p chess_core -- 4 "4k3/8/8/8/8/8/4P3/4K3 w"

use chess_core::{Board, Color, perft};
use std::env;
use std::time::Instant;

const TEST_POSITIONS: &[(&str, &str)] = &[
    ("Starting position", "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w"),
    ("Open middlegame", "r1bqk2r/pppp1ppp/2n2n2/2b1p3/2B1P3/3P1N2/PPP2PPP/RNBQK2R w"),
    ("Rook endgame", "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w"),
];

fn parse(fen: &str) -> Option<(Board, Color)> {
    let board = Board::from_fen(fen).ok()?;
    let color = match fen.split_whitespace().nth(1) {
        Some("b") => Color::Black,
        _ => Color::White,
    };
    Some((board, color))
}

fn main() {
    let args: Vec<String> = env::args().collect();

    let depth: u8 = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(3);

    if let Some(fen) = args.get(2) {
        run_single_position(fen, depth);
    } else {
        run_all_positions(depth);
    }
}

fn run_single_position(fen: &str, depth: u8) {
    let Some((board, color)) = parse(fen) else {
        eprintln!("Invalid FEN: {fen}");
        return;
    };

    println!("Position: {fen}");
    println!("Depth: {depth}");
    println!();

    let start = Instant::now();
    let nodes = perft(&board, color, depth);
    let elapsed = start.elapsed();

    let nps = if elapsed.as_secs_f64() > 0.0 {
        nodes as f64 / elapsed.as_secs_f64()
    } else {
        0.0
    };

    println!("Nodes: {nodes}");
    println!("Time: {elapsed:.3?}");
    println!("NPS: {nps:.0}");
}

fn run_all_positions(depth: u8) {
    println!("=== Perft Benchmark Suite ===");
    println!("Depth: {depth}");
    println!();

    let mut total_nodes = 0u64;
    let mut total_time = std::time::Duration::ZERO;

    for (name, fen) in TEST_POSITIONS {
        let Some((board, color)) = parse(fen) else {
            eprintln!("{name}: invalid FEN");
            continue;
        };

        print!("{name:.<30}");

        let start = Instant::now();
        let nodes = perft(&board, color, depth);
        let elapsed = start.elapsed();

        total_nodes += nodes;
        total_time += elapsed;

        let nps = if elapsed.as_secs_f64() > 0.0 {
            nodes as f64 / elapsed.as_secs_f64()
        } else {
            0.0
        };

        println!(" {nodes:>12} nodes in {elapsed:>8.3?} ({nps:>10.0} nps)");
    }

    println!();
    println!("{:=<70}", "");
    let total_nps = if total_time.as_secs_f64() > 0.0 {
        total_nodes as f64 / total_time.as_secs_f64()
    } else {
        0.0
    };
    println!("TOTAL: {total_nodes} nodes in {total_time:.3?} ({total_nps:.0} nps)");
}
