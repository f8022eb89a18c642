use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use rkyv::AlignedVec;
use tidy_invoker::{annotate, load_model, AnnotationRequest, CommandEngine};
use tidy_protocol::{AnnotatedToken, TokenTable};
use tidy_reshaper::{ReshapeOptions, Reshaper};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod output;

use output::Format;

#[derive(Parser)]
#[command(author, version, about = "Reshapes CoNLL-U annotation output into tidy token tables")]
struct Cli {
    /// Log progress to stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reshape CoNLL-U files into a single table
    Reshape(ReshapeArgs),
    /// Annotate plain-text files with an external engine, then reshape the result
    Annotate(AnnotateArgs),
    /// Validate an rkyv table and print row counts per document
    Inspect {
        #[arg(value_name = "FILE")]
        table: PathBuf,
    },
}

#[derive(Args)]
struct OutputArgs {
    /// Destination file; stdout when omitted
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    #[arg(short, long, value_enum, default_value_t = Format::Jsonl)]
    format: Format,
}

#[derive(Args)]
struct ReshapeArgs {
    #[arg(required = true, value_name = "FILE")]
    inputs: Vec<PathBuf>,

    /// Reject token lines that come before any `# newdoc` marker
    #[arg(long)]
    strict: bool,

    /// Reshape documents independently, keeping the ones that parse
    #[arg(long)]
    per_document: bool,

    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Args)]
struct AnnotateArgs {
    /// Program implementing the JSON engine protocol
    #[arg(long, env = "CONLLU_TIDY_ENGINE", value_name = "PROGRAM")]
    engine: PathBuf,

    /// Extra argument passed to the engine program (repeatable)
    #[arg(long = "engine-arg", value_name = "ARG", allow_hyphen_values = true)]
    engine_args: Vec<String>,

    #[arg(long, env = "CONLLU_TIDY_MODEL", value_name = "FILE")]
    model: PathBuf,

    /// Text files; each file stem becomes its document id
    #[arg(required = true, value_name = "FILE")]
    inputs: Vec<PathBuf>,

    #[arg(long)]
    strict: bool,

    #[command(flatten)]
    output: OutputArgs,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Reshape(args) => {
            let rows = reshape_files(&args.inputs, options(args.strict), args.per_document)?;
            emit(&args.output, rows)
        }
        Commands::Annotate(args) => {
            let rows = annotate_files(&args)?;
            emit(&args.output, rows)
        }
        Commands::Inspect { table } => {
            let bytes = fs::read(&table).with_context(|| format!("failed to read {}", table.display()))?;
            let summary = summarize(&bytes).with_context(|| format!("invalid table {}", table.display()))?;

            println!("version {}, {} rows", summary.version, summary.rows);
            for (doc_id, rows) in &summary.documents {
                println!("{}\t{rows}", doc_id.as_deref().unwrap_or("<none>"));
            }
            Ok(())
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "info" } else { "warn" };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .with_writer(io::stderr)
        .init();
}

fn options(strict: bool) -> ReshapeOptions {
    if strict {
        ReshapeOptions::strict()
    } else {
        ReshapeOptions::default()
    }
}

fn reshape_files(inputs: &[PathBuf], options: ReshapeOptions, per_document: bool) -> Result<Vec<AnnotatedToken>> {
    let reshaper = Reshaper::new(options);
    let mut rows = Vec::new();
    let mut failed = 0;

    for path in inputs {
        info!("📖 Reading CoNLL-U from {}", path.display());
        let text = fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;

        if per_document {
            for document in reshaper.reshape_documents(&text) {
                match document.rows {
                    Ok(document_rows) => rows.extend(document_rows),
                    Err(err) => {
                        warn!(file = %path.display(), "skipping document: {err}");
                        failed += 1;
                    }
                }
            }
        } else {
            let file_rows = reshaper
                .reshape(&text)
                .with_context(|| format!("failed to reshape {}", path.display()))?;
            rows.extend(file_rows);
        }
    }

    if failed > 0 {
        bail!("{failed} document(s) could not be reshaped");
    }

    info!("⚙️  Reshaped {} rows from {} file(s)", rows.len(), inputs.len());
    Ok(rows)
}

fn annotate_files(args: &AnnotateArgs) -> Result<Vec<AnnotatedToken>> {
    let engine = CommandEngine::new(&args.engine).with_args(args.engine_args.iter().cloned());
    let handle = load_model(&engine, absolute(&args.model)?)?;

    let documents = args
        .inputs
        .iter()
        .map(|path| {
            let doc_id = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .ok_or_else(|| anyhow!("cannot derive a document id from {}", path.display()))?;
            let text = fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
            Ok((doc_id, text))
        })
        .collect::<Result<Vec<_>>>()?;

    info!("⚙️  Annotating {} document(s) with {}", documents.len(), handle.path().display());
    let result = annotate(&engine, &handle, AnnotationRequest::from_pairs(documents))?;

    let rows = Reshaper::new(options(args.strict))
        .reshape_result(&result)
        .context("engine output is not valid CoNLL-U")?;
    Ok(rows)
}

/// Relative model paths are taken from the working directory.
fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().context("failed to resolve the working directory")?;
    Ok(cwd.join(path))
}

fn emit(args: &OutputArgs, rows: Vec<AnnotatedToken>) -> Result<()> {
    let count = rows.len();

    match &args.output {
        Some(path) => {
            let file = File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
            output::write_rows(&mut BufWriter::new(file), rows, args.format)?;
            info!("✅ Success! {count} rows written to {}", path.display());
        }
        None => {
            let stdout = io::stdout();
            let mut lock = stdout.lock();
            output::write_rows(&mut lock, rows, args.format)?;
            lock.flush()?;
        }
    }

    Ok(())
}

struct TableSummary {
    version: u32,
    rows: usize,
    /// Row counts per document, in order of first appearance.
    documents: Vec<(Option<String>, usize)>,
}

fn summarize(bytes: &[u8]) -> Result<TableSummary> {
    // Archives are only valid at their original alignment.
    let mut aligned = AlignedVec::with_capacity(bytes.len());
    aligned.extend_from_slice(bytes);

    let table = rkyv::check_archived_root::<TokenTable>(&aligned).map_err(|err| anyhow!("{err}"))?;

    let mut documents: Vec<(Option<String>, usize)> = Vec::new();
    for row in table.rows.iter() {
        let doc_id = row.doc_id.as_ref().map(|id| id.as_str());
        if let Some((last, count)) = documents.last_mut() {
            if last.as_deref() == doc_id {
                *count += 1;
                continue;
            }
        }
        documents.push((doc_id.map(str::to_owned), 1));
    }

    Ok(TableSummary {
        version: table.version,
        rows: table.rows.len(),
        documents,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;
    use tempfile::NamedTempFile;

    const DOCS: &str = "# newdoc id = a\n# newpar\n# sent_id = 1\n# text = x y\n1\tx\tx\tX\t_\t_\t0\troot\t_\t_\n2\ty\ty\tX\t_\t_\t1\tdep\t_\t_\n\n\
                        # newdoc id = b\n# newpar\n# sent_id = 2\n# text = z\n1\tz\tz\tX\t_\t_\t0\troot\t_\t_\n\n";

    fn file_with(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_reshape_several_files() {
        let first = file_with(DOCS);
        let second = file_with("# newdoc id = c\n1\tw\tw\tX\t_\t_\t0\troot\t_\t_\n");

        let inputs = vec![first.path().to_path_buf(), second.path().to_path_buf()];
        let rows = reshape_files(&inputs, ReshapeOptions::default(), false).unwrap();

        let ids: Vec<_> = rows.iter().map(|r| r.doc_id.as_deref().unwrap()).collect();
        assert_eq!(ids, vec!["a", "a", "b", "c"]);
    }

    #[test]
    fn test_malformed_file_names_path_and_line() {
        let file = file_with("# newdoc id = a\n1\tx\tx\n");
        let err = reshape_files(&[file.path().to_path_buf()], ReshapeOptions::default(), false).unwrap_err();

        let message = format!("{err:#}");
        assert!(message.contains(&*file.path().to_string_lossy()));
        assert!(message.contains("line 2"));
    }

    #[test]
    fn test_per_document_reports_failures() {
        let broken = DOCS.replace("2\ty\ty\tX\t_\t_\t1\tdep\t_\t_", "2\ty");
        let file = file_with(&broken);

        let err = reshape_files(&[file.path().to_path_buf()], ReshapeOptions::default(), true).unwrap_err();
        assert_eq!(err.to_string(), "1 document(s) could not be reshaped");
    }

    #[test]
    fn test_strict_rejects_orphans() {
        let file = file_with("1\tx\tx\tX\t_\t_\t0\troot\t_\t_\n");
        assert!(reshape_files(&[file.path().to_path_buf()], ReshapeOptions::strict(), false).is_err());
        assert!(reshape_files(&[file.path().to_path_buf()], ReshapeOptions::default(), false).is_ok());
    }

    #[test]
    fn test_summarize_archive() {
        let rows = tidy_reshaper::reshape(DOCS).unwrap();
        let bytes = output::archive(&TokenTable::new(rows)).unwrap();

        let summary = summarize(&bytes).unwrap();
        assert_eq!(summary.rows, 3);
        assert_eq!(
            summary.documents,
            vec![(Some("a".to_string()), 2), (Some("b".to_string()), 1)]
        );
    }

    #[test]
    fn test_summarize_rejects_garbage() {
        assert!(summarize(b"definitely not an archive").is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_annotate_files_with_engine_program() {
        let model = NamedTempFile::new().unwrap();
        let text = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        let doc_id = text.path().file_stem().unwrap().to_string_lossy().into_owned();

        let reply = format!(r##"{{"conllu":"# newdoc id = {doc_id}\n1\tHi\thi\tINTJ\t_\t_\t0\troot\t_\t_\n"}}"##);
        let args = AnnotateArgs {
            engine: PathBuf::from("sh"),
            engine_args: vec!["-c".to_string(), format!("cat >/dev/null; printf '%s' '{reply}'")],
            model: model.path().to_path_buf(),
            inputs: vec![text.path().to_path_buf()],
            strict: true,
            output: OutputArgs {
                output: None,
                format: Format::Jsonl,
            },
        };

        let rows = annotate_files(&args).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].doc_id.as_deref(), Some(doc_id.as_str()));
        assert_eq!(rows[0].form, "Hi");
    }
}
