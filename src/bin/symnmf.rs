//! CLI for SymNMF clustering

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{error::ErrorKind, Parser, ValueEnum};
use symnmf_rs::data::degree::degree_matrix;
use symnmf_rs::data::similarity::similarity_matrix;
use symnmf_rs::prelude::*;
use symnmf_rs::construct_normalised_similarity;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Goal {
    /// Print the similarity matrix
    Sym,
    /// Print the diagonal degree matrix
    Ddg,
    /// Print the normalised similarity matrix
    Norm,
    /// Print the optimised factor matrix H
    Symnmf,
    /// Compare SymNMF and k-means via silhouette scores
    Analysis,
}

#[derive(Parser)]
#[command(name = "symnmf")]
#[command(about = "SymNMF clustering of comma-separated points")]
struct Cli {
    /// Number of clusters (ignored by sym, ddg and norm)
    k: usize,
    /// What to compute
    #[arg(value_enum)]
    goal: Goal,
    /// Input file, one comma-separated point per line
    file: PathBuf,
    /// Seed for the initial H
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,
    /// Maximum number of multiplicative updates
    #[arg(long, default_value_t = 300)]
    max_iter: usize,
    /// Compute the rows of every update in parallel
    #[arg(long)]
    parallel: bool,
    /// Print progress to stdout
    #[arg(long)]
    verbose: bool,
}

fn run(cli: &Cli) -> Result<String> {
    let points = read_points(&cli.file)?;

    let out = match cli.goal {
        Goal::Sym => format_matrix(similarity_matrix(points.as_ref())?.as_ref()),
        Goal::Ddg => {
            let w = similarity_matrix(points.as_ref())?;
            format_matrix(degree_matrix(w.as_ref())?.as_ref())
        }
        Goal::Norm => {
            format_matrix(construct_normalised_similarity(points.as_ref(), cli.verbose)?.as_ref())
        }
        Goal::Symnmf | Goal::Analysis => {
            let optimiser = if cli.parallel { "parallel" } else { "serial" };
            let params = SymNmfParams::new(
                cli.k,
                Some(optimiser.to_string()),
                None,
                None,
                Some(FactorParams::new(Some(cli.max_iter), None, None, None)),
            );
            let res = symnmf(points.as_ref(), &params, cli.seed, cli.verbose)?;

            if let Goal::Symnmf = cli.goal {
                format_matrix(res.h.as_ref())
            } else {
                let km = kmeans(points.as_ref(), cli.k, &KmeansParams::default(), cli.verbose)?;
                let symnmf_score = silhouette_score(points.as_ref(), &res.labels)?;
                let kmeans_score = silhouette_score(points.as_ref(), &km.labels)?;
                format!("symnmf: {:.4}\nkmeans: {:.4}\n", symnmf_score, kmeans_score)
            }
        }
    };

    Ok(out)
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = e.print();
            return ExitCode::SUCCESS;
        }
        Err(_) => {
            println!("An Error Has Occurred");
            return ExitCode::FAILURE;
        }
    };

    match run(&cli) {
        Ok(out) => {
            print!("{}", out);
            ExitCode::SUCCESS
        }
        Err(e) => {
            if cli.verbose {
                eprintln!("{}", e);
            }
            println!("An Error Has Occurred");
            ExitCode::FAILURE
        }
    }
}
