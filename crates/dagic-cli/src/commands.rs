//! Subcommand handlers.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use color_eyre::eyre::{eyre, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use dagic_core::{
    compute_information_content, tsv_field, Config, Dag, Fetcher, Format, GraphFile,
    MatrixOptions, MicaFinder, SimilarityMatrix,
};

/// Opens a graph file. A recognized extension decides the format; otherwise
/// `graph.format` from the config is used.
fn graph_file(config: &Config, path: &Path) -> Result<GraphFile> {
    let format = match Format::from_path(path) {
        Some(format) => format,
        None => config.graph.format.parse::<Format>()?,
    };
    Ok(GraphFile::with_format(path, format))
}

fn load_graph(config: &Config, input: &Path) -> Result<Dag> {
    let mut dag = graph_file(config, input)?.load()?;

    if let Some(root) = &config.graph.root {
        dag.set_root(root)?;
    }
    Ok(dag)
}

/// Loads a graph and computes information content unless the file already
/// carries it.
fn load_scored_graph(config: &Config, input: &Path) -> Result<Dag> {
    let mut dag = load_graph(config, input)?;
    if !dag.has_information_content() {
        compute_information_content(&mut dag)?;
    }
    Ok(dag)
}

pub fn compute(config: &Config, input: &Path, output: Option<&Path>) -> Result<()> {
    let mut dag = load_graph(config, input)?;
    let summary = compute_information_content(&mut dag)?;

    println!("Root: {} ({} descendants)", summary.root, summary.root_ndes);
    println!("  Nodes: {}", summary.nodes);
    println!("  Edges: {}", summary.edges);
    println!("  IC range: {:.4} - {:.4}", summary.min_ic, summary.max_ic);

    if let Some(output) = output {
        graph_file(config, output)?.save(&dag)?;
        println!("Saved annotated graph to {}", output.display());
    }
    Ok(())
}

pub fn show(config: &Config, input: &Path, ids: &[String]) -> Result<()> {
    let dag = load_scored_graph(config, input)?;

    let selected: Vec<_> = if ids.is_empty() {
        (0..dag.len()).collect()
    } else {
        ids.iter()
            .map(|id| dag.require(id))
            .collect::<Result<_, _>>()?
    };

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    writeln!(out, "id\tname\tndes\tic")?;
    for idx in selected {
        let term = dag.term(idx);
        writeln!(
            out,
            "{}\t{}\t{}\t{}",
            tsv_field(&term.id),
            tsv_field(&term.name),
            term.ndes.unwrap_or(0),
            term.ic.unwrap_or(0.0)
        )?;
    }
    out.flush()?;
    Ok(())
}

pub fn mica(config: &Config, input: &Path, a: &str, b: &str, from: Option<&str>) -> Result<()> {
    let dag = load_scored_graph(config, input)?;
    let finder = MicaFinder::new(&dag)?;

    let ia = dag.require(a)?;
    let ib = dag.require(b)?;
    let result = match from {
        Some(from) => finder.find_from(ia, ib, dag.require(from)?)?,
        None => finder.find(ia, ib)?,
    };

    let term = dag.term(result.node);
    println!("{}\t{}\t{}", term.id, term.name, result.ic);
    Ok(())
}

pub fn matrix(
    config: &Config,
    input: &Path,
    output: Option<&Path>,
    options: MatrixOptions,
    quiet: bool,
) -> Result<()> {
    let dag = load_scored_graph(config, input)?;
    let matrix = SimilarityMatrix::new(&dag, options)?;

    let stats = match output {
        Some(path) => {
            let file = File::create(path).map_err(|e| eyre!("Failed to create {}: {e}", path.display()))?;
            let rows = matrix.row_nodes().len() as u64;
            let pb = if quiet {
                ProgressBar::hidden()
            } else {
                ProgressBar::new(rows)
            };
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} terms | ETA: {eta}")?
                    .progress_chars("=> "),
            );

            let stats = matrix.write_tsv_with_progress(BufWriter::new(file), |done| pb.set_position(done as u64))?;
            pb.finish_and_clear();
            info!(path = %path.display(), "Wrote similarity table");
            stats
        }
        None => matrix.write_tsv(BufWriter::new(io::stdout().lock()))?,
    };

    if stats.errors > 0 {
        eprintln!("Warning: {} pairs failed MICA lookup and were skipped", stats.errors);
    }
    Ok(())
}

pub async fn fetch(config: &Config, url: &str, output: &Path) -> Result<()> {
    let fetcher = Fetcher::new(&config.fetch)?;
    let bytes = fetcher.fetch_to_file(url, output).await?;
    println!("Downloaded {} bytes to {}", bytes, output.display());
    Ok(())
}

pub fn config_string(config: &Config) -> Result<String> {
    Ok(config.to_toml_string()?)
}
