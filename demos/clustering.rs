//! Cluster a handful of entities described by token lists, then print the flagged
//! groups and a flat cut.
//!
//! Run with `RUST_LOG=termclust=trace` to see each merge.

use termclust::{build_vector, interpret, Agglomerative, SparseVector};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Each entity is described by the accounts it is related to.
    let entities: Vec<(&str, Vec<&str>)> = vec![
        ("ada", vec!["rust", "llvm", "wasm", "crates"]),
        ("bob", vec!["rust", "wasm", "crates", "cargo"]),
        ("cyd", vec!["rust", "llvm", "cargo", "crates"]),
        ("dee", vec!["rust", "wasm", "llvm", "tokio"]),
        ("eve", vec!["rust", "tokio", "crates", "cargo"]),
        ("fay", vec!["jazz", "vinyl", "bebop", "sax"]),
        ("gus", vec!["jazz", "sax", "trumpet", "bebop"]),
        ("hal", vec!["jazz", "vinyl", "trumpet", "swing"]),
        ("ivy", vec!["jazz", "swing", "bebop", "vinyl"]),
        ("jon", vec!["jazz", "sax", "swing", "trumpet"]),
        ("kim", vec!["chess", "openings", "endgame", "blitz"]),
        ("lee", vec!["chess", "blitz", "tactics", "openings"]),
        ("max", vec!["chess", "endgame", "tactics", "elo"]),
        ("ned", vec!["chess", "elo", "blitz", "openings"]),
        ("oli", vec!["chess", "tactics", "endgame", "elo"]),
        ("pam", vec!["bread", "sourdough"]),
        ("quinn", vec![]),
    ];

    let names: Vec<&str> = entities.iter().map(|(name, _)| *name).collect();
    let mut vectors: Vec<SparseVector> = entities
        .iter()
        .map(|(_, tokens)| build_vector(tokens))
        .collect();

    let dendrogram = Agglomerative::new()
        .fit(&mut vectors)
        .expect("default parameters are valid");

    println!("=== Merges ===");
    let sims = dendrogram.similarities().unwrap_or(&[]);
    for (m, sim) in dendrogram.merges().iter().zip(sims) {
        println!("  {:>5} <- {:<5} (similarity {:.3})", names[m.left], names[m.right], sim);
    }

    println!("\n=== Flagged clusters ===");
    for cluster in interpret(dendrogram.merges()) {
        let members: Vec<&str> = cluster.iter().map(|&i| names[i]).collect();
        println!("  [{}]", members.join(" "));
    }

    println!("\n=== Flat cut (k=5) ===");
    let labels = dendrogram.labels(5).expect("k is within range");
    for (name, label) in names.iter().zip(labels) {
        println!("  {name:>5} => cluster {label}");
    }
}
