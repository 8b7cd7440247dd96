//! `label-mender`: file-level maintenance for YOLO annotation files.
//!
//! Everything here goes through the same codec and annotation set the editor
//! uses, so a file that passes `check` loads cleanly in the canvas.


use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use mender_canvas::annotations::{Annotation, AnnotationManager};
use mender_canvas::classes::{ClassNames, ClassNamesError};
use mender_canvas::error::EditError;
use mender_canvas::yolo::{self, YoloError};
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{}: {source}", .path.display())]
    Yolo {
        path: PathBuf,
        #[source]
        source: YoloError,
    },
    #[error("{}: {source}", .path.display())]
    Classes {
        path: PathBuf,
        #[source]
        source: ClassNamesError,
    },
    #[error("annotation set rejected: {0}")]
    Edit(#[from] EditError),
    #[error("confidence must lie in 0..=1, got {0}")]
    InvalidConfidence(f64),
    #[error("invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "label-mender", about = "Validate, sort and filter YOLO annotation files")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate a label file and list its boxes.
    Check(CheckArgs),
    /// Reorder boxes left to right and print the reading text.
    Sort(SortArgs),
    /// Drop boxes scoring below a confidence threshold.
    Filter(FilterArgs),
}

#[derive(Args, Debug)]
struct ClassesArg {
    /// Class names: dataset YAML (`.yaml`/`.yml`) or one name per line.
    #[arg(long, env = "MENDER_CLASSES")]
    classes: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct CheckArgs {
    file: PathBuf,

    #[command(flatten)]
    classes: ClassesArg,

    #[arg(long, default_value_t = false)]
    json: bool,
}

#[derive(Args, Debug)]
struct SortArgs {
    file: PathBuf,

    #[command(flatten)]
    classes: ClassesArg,

    /// Rewrite the file in sorted order.
    #[arg(long, default_value_t = false)]
    write: bool,
}

#[derive(Args, Debug)]
struct FilterArgs {
    file: PathBuf,

    #[arg(long, env = "MENDER_CONFIDENCE")]
    confidence: f64,

    /// Rewrite the file with only the kept boxes; otherwise print them.
    #[arg(long, default_value_t = false)]
    write: bool,
}

fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();
    let cli = Cli::parse();

    match cli.command {
        Command::Check(args) => run_check(&args),
        Command::Sort(args) => run_sort(&args),
        Command::Filter(args) => run_filter(&args),
    }
}

fn run_check(args: &CheckArgs) -> Result<(), CliError> {
    let boxes = read_labels(&args.file)?;
    let names = read_class_names(args.classes.classes.as_deref())?;

    if args.json {
        let rows = boxes
            .iter()
            .map(|ann| box_json(ann, &names))
            .collect::<Result<Vec<_>, _>>()?;
        println!("{}", serde_json::to_string_pretty(&Value::Array(rows))?);
    } else {
        for (index, ann) in boxes.iter().enumerate() {
            println!("{}", describe(index, ann, &names));
        }
    }
    tracing::info!(file = %args.file.display(), boxes = boxes.len(), "label file ok");
    Ok(())
}

fn run_sort(args: &SortArgs) -> Result<(), CliError> {
    let names = read_class_names(args.classes.classes.as_deref())?;
    let mut set = AnnotationManager::new();
    set.replace_all(read_labels(&args.file)?)?;
    set.sort_by_x();

    println!("{}", set.reading_text(&names, 0.0));
    if args.write {
        write_labels(&args.file, set.boxes())?;
        tracing::info!(file = %args.file.display(), boxes = set.len(), "sorted left to right");
    }
    Ok(())
}

fn run_filter(args: &FilterArgs) -> Result<(), CliError> {
    let boxes = read_labels(&args.file)?;
    let total = boxes.len();
    let kept = filter_boxes(boxes, args.confidence)?;

    if args.write {
        write_labels(&args.file, &kept)?;
    } else {
        print!("{}", yolo::format(&kept));
    }
    tracing::info!(file = %args.file.display(), kept = kept.len(), dropped = total - kept.len(), "filtered");
    Ok(())
}

fn filter_boxes(boxes: Vec<Annotation>, threshold: f64) -> Result<Vec<Annotation>, CliError> {
    if !(0.0..=1.0).contains(&threshold) {
        return Err(CliError::InvalidConfidence(threshold));
    }
    Ok(boxes.into_iter().filter(|ann| ann.is_visible(threshold)).collect())
}

fn read_labels(path: &Path) -> Result<Vec<Annotation>, CliError> {
    let text = fs::read_to_string(path).map_err(|source| CliError::Io { path: path.to_path_buf(), source })?;
    yolo::parse(&text).map_err(|source| CliError::Yolo { path: path.to_path_buf(), source })
}

fn write_labels(path: &Path, boxes: &[Annotation]) -> Result<(), CliError> {
    if boxes.iter().any(|ann| ann.confidence.is_some()) {
        tracing::warn!(file = %path.display(), "confidence scores are not written to label files");
    }
    fs::write(path, yolo::format(boxes)).map_err(|source| CliError::Io { path: path.to_path_buf(), source })
}

fn read_class_names(path: Option<&Path>) -> Result<ClassNames, CliError> {
    let Some(path) = path else {
        return Ok(ClassNames::new());
    };
    let text = fs::read_to_string(path).map_err(|source| CliError::Io { path: path.to_path_buf(), source })?;
    parse_class_names(path, &text)
}

fn parse_class_names(path: &Path, text: &str) -> Result<ClassNames, CliError> {
    let is_yaml = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));
    if !is_yaml {
        return Ok(ClassNames::from_text(text));
    }
    ClassNames::from_yaml(text).map_err(|source| CliError::Classes { path: path.to_path_buf(), source })
}

fn describe(index: usize, ann: &Annotation, names: &ClassNames) -> String {
    let b = ann.bbox;
    format!(
        "{index}\t{}\t{:.6} {:.6} {:.6} {:.6}\t{:.2}",
        names.name(ann.class_id),
        b.cx,
        b.cy,
        b.w,
        b.h,
        ann.score()
    )
}

fn box_json(ann: &Annotation, names: &ClassNames) -> Result<Value, CliError> {
    let mut value = serde_json::to_value(ann)?;
    if let Some(map) = value.as_object_mut() {
        map.insert("name".to_owned(), Value::String(names.name(ann.class_id).into_owned()));
    }
    Ok(value)
}
