use crate::assets::{list_files, load_catalog};
use clap::{Args, ValueEnum};
use spirit_match::config::AppConfig;
use spirit_match::error::AppError;
use spirit_match::linking::{
    read_records, write_records, AmbiguityPolicy, ImageLinker, LinkOutcome, LinkReport,
    ModelLinker,
};
use spirit_match::matching::{canonical_export_stem, MatchSource, NameMatcher};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Args, Debug)]
pub(crate) struct MatchArgs {
    /// Display name to resolve, e.g. "Tsukuyomi (月読命)"
    pub(crate) name: String,
    /// Directory holding the catalog files
    #[arg(long)]
    pub(crate) catalog_dir: PathBuf,
    /// Catalog file extension
    #[arg(long, default_value = "glb")]
    pub(crate) ext: String,
}

#[derive(Args, Debug)]
pub(crate) struct LinkModelsArgs {
    /// JSON record list to annotate
    #[arg(long)]
    pub(crate) records: PathBuf,
    /// Directory holding the model files
    #[arg(long)]
    pub(crate) catalog_dir: PathBuf,
    /// Model file extension
    #[arg(long, default_value = "glb")]
    pub(crate) ext: String,
    /// Where to write the annotated records
    #[arg(long)]
    pub(crate) output: PathBuf,
    /// How to handle names that match several models
    #[arg(long, value_enum, default_value_t = PolicyArg::PickFirst)]
    pub(crate) policy: PolicyArg,
    /// Optional JSON summary of every record's outcome
    #[arg(long)]
    pub(crate) report: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct LinkImagesArgs {
    /// JSON record list to annotate
    #[arg(long)]
    pub(crate) records: PathBuf,
    /// Directory holding the image files
    #[arg(long)]
    pub(crate) image_dir: PathBuf,
    /// Image file extension
    #[arg(long, default_value = "webp")]
    pub(crate) ext: String,
    /// Where to write the annotated records
    #[arg(long)]
    pub(crate) output: PathBuf,
    /// Optional JSON summary of every record's outcome
    #[arg(long)]
    pub(crate) report: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct RenameExportsArgs {
    /// Directory holding the exported files
    #[arg(long, default_value = ".")]
    pub(crate) dir: PathBuf,
    /// Export file extension
    #[arg(long, default_value = "glb")]
    pub(crate) ext: String,
    /// Print the renames without touching any file
    #[arg(long)]
    pub(crate) dry_run: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum PolicyArg {
    PickFirst,
    EmitAll,
}

impl From<PolicyArg> for AmbiguityPolicy {
    fn from(value: PolicyArg) -> Self {
        match value {
            PolicyArg::PickFirst => AmbiguityPolicy::PickFirst,
            PolicyArg::EmitAll => AmbiguityPolicy::EmitAll,
        }
    }
}

pub(crate) fn run_match(config: &AppConfig, args: MatchArgs) -> Result<(), AppError> {
    let catalog = load_catalog(&args.catalog_dir, &args.ext)?;
    let matcher = NameMatcher::with_settings(&catalog, config.matching);
    let result = matcher.find_best_matches(&args.name);

    match result.source() {
        MatchSource::None => println!("No match found for '{}'", args.name),
        MatchSource::Candidates => println!("Matches for '{}':", args.name),
        MatchSource::Similarity => println!("Closest files for '{}' (fuzzy):", args.name),
    }
    for file_name in result.file_names() {
        println!("- {file_name}");
    }
    if let (true, Some(first)) = (result.is_ambiguous(), result.first()) {
        println!("Default pick: {}", first.file_name);
    }
    Ok(())
}

pub(crate) fn run_link_models(config: &AppConfig, args: LinkModelsArgs) -> Result<(), AppError> {
    let catalog = load_catalog(&args.catalog_dir, &args.ext)?;
    info!(models = catalog.len(), dir = %args.catalog_dir.display(), "model catalog loaded");

    let records = read_records(BufReader::new(File::open(&args.records)?))?;
    let matcher = NameMatcher::with_settings(&catalog, config.matching);
    let linker = ModelLinker::new(&matcher, &config.links, args.policy.into());
    let (records, report) = linker.link(records);

    write_records(BufWriter::new(File::create(&args.output)?), &records)?;
    render_report("Model linking", &report, &args.output);
    write_summary(&report, args.report.as_deref())
}

pub(crate) fn run_link_images(config: &AppConfig, args: LinkImagesArgs) -> Result<(), AppError> {
    let catalog = load_catalog(&args.image_dir, &args.ext)?;
    info!(images = catalog.len(), dir = %args.image_dir.display(), "image catalog loaded");

    let records = read_records(BufReader::new(File::open(&args.records)?))?;
    let (records, report) = ImageLinker::new(&catalog, &config.links).link(records);

    write_records(BufWriter::new(File::create(&args.output)?), &records)?;
    render_report("Image linking", &report, &args.output);
    write_summary(&report, args.report.as_deref())
}

pub(crate) fn run_rename_exports(args: RenameExportsArgs) -> Result<(), AppError> {
    for (from, to) in plan_renames(&args.dir, &args.ext)? {
        let from_name = display_name(&from);
        let to_name = display_name(&to);
        if to.exists() {
            warn!(from = %from_name, to = %to_name, "target exists, skipping rename");
            continue;
        }
        println!("{from_name} -> {to_name}");
        if !args.dry_run {
            fs::rename(&from, &to)?;
        }
    }
    Ok(())
}

/// Source and target paths for every `Retopo_*` export in `dir`.
fn plan_renames(dir: &Path, ext: &str) -> std::io::Result<Vec<(PathBuf, PathBuf)>> {
    let mut plan = Vec::new();
    for path in list_files(dir, ext)? {
        let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) else {
            continue;
        };
        if !stem.starts_with("Retopo_") {
            continue;
        }
        let target = path.with_file_name(format!("{}.{ext}", canonical_export_stem(stem)));
        plan.push((path.clone(), target));
    }
    Ok(plan)
}

fn write_summary(report: &LinkReport, path: Option<&Path>) -> Result<(), AppError> {
    if let Some(path) = path {
        report.write_json(BufWriter::new(File::create(path)?))?;
        println!("Wrote summary {}", path.display());
    }
    Ok(())
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn render_report(title: &str, report: &LinkReport, output: &Path) {
    println!("{title}: {} of {} records matched", report.matched(), report.total());

    let ambiguous: Vec<_> = report
        .links
        .iter()
        .filter(|link| link.outcome == LinkOutcome::Ambiguous)
        .collect();
    if !ambiguous.is_empty() {
        println!("\nNeeds review (several candidates)");
        for link in ambiguous {
            println!("- {}: {}", link.name, link.candidates.join(", "));
        }
    }

    let unmatched: Vec<_> = report.unmatched().collect();
    if unmatched.is_empty() {
        println!("\nUnmatched: none");
    } else {
        println!("\nUnmatched");
        for link in unmatched {
            let name = if link.name.is_empty() { "???" } else { link.name.as_str() };
            println!("- {name}");
        }
    }

    println!("\nWrote {}", output.display());
}

#[cfg(test)]
mod tests {
    use super::*;
    use spirit_match::config::{AppEnvironment, TelemetryConfig};
    use spirit_match::linking::LinkConfig;
    use spirit_match::matching::MatchSettings;

    fn test_config() -> AppConfig {
        AppConfig {
            environment: AppEnvironment::Test,
            matching: MatchSettings::default(),
            links: LinkConfig::default(),
            telemetry: TelemetryConfig {
                log_level: "warn".to_string(),
            },
        }
    }

    fn touch(dir: &Path, names: &[&str]) {
        for name in names {
            fs::write(dir.join(name), b"").expect("file written");
        }
    }

    #[test]
    fn link_models_writes_annotated_records() {
        let dir = tempfile::tempdir().expect("temp dir");
        let models = dir.path().join("models");
        fs::create_dir(&models).expect("models dir");
        touch(&models, &["Kappa.glb", "Nurikabe.glb", "Nurikabe2.glb"]);

        let input = dir.path().join("wesen.json");
        fs::write(&input, r#"[{"Name":"Kappa"},{"Name":"Nurikabe"}]"#).expect("input written");
        let output = dir.path().join("out.json");
        let summary = dir.path().join("summary.json");

        run_link_models(
            &test_config(),
            LinkModelsArgs {
                records: input,
                catalog_dir: models,
                ext: "glb".to_string(),
                output: output.clone(),
                policy: PolicyArg::EmitAll,
                report: Some(summary.clone()),
            },
        )
        .expect("linking succeeds");

        let written = read_records(File::open(&output).expect("output exists")).expect("parse");
        let paths: Vec<&str> = written
            .iter()
            .map(|record| record["Model URL"].as_str().expect("path"))
            .collect();
        assert_eq!(
            paths,
            vec![
                "/assets/models/spirits/Kappa.glb",
                "/assets/models/spirits/Nurikabe.glb",
                "/assets/models/spirits/Nurikabe2.glb",
            ]
        );

        let summary: serde_json::Value =
            serde_json::from_reader(File::open(&summary).expect("summary exists"))
                .expect("summary parses");
        assert_eq!(summary["total"], 2);
        assert_eq!(summary["ambiguous"], 1);
        assert_eq!(summary["links"][0]["outcome"], "linked");
    }

    #[test]
    fn link_images_reports_missing_input() {
        let dir = tempfile::tempdir().expect("temp dir");
        let error = run_link_images(
            &test_config(),
            LinkImagesArgs {
                records: dir.path().join("missing.json"),
                image_dir: dir.path().to_path_buf(),
                ext: "webp".to_string(),
                output: dir.path().join("out.json"),
                report: None,
            },
        )
        .expect_err("missing records file");
        assert!(matches!(error, AppError::Io(_)));
    }

    #[test]
    fn rename_plan_only_covers_retopo_exports() {
        let dir = tempfile::tempdir().expect("temp dir");
        touch(
            dir.path(),
            &["Retopo_futakuchi-onna.002.glb", "Kappa.glb", "Retopo_oni.webp"],
        );

        let plan = plan_renames(dir.path(), "glb").expect("plan builds");
        assert_eq!(plan.len(), 1);
        assert_eq!(display_name(&plan[0].1), "Futakuchi_Onna.glb");
    }

    #[test]
    fn rename_exports_respects_dry_run_and_existing_targets() {
        let dir = tempfile::tempdir().expect("temp dir");
        touch(dir.path(), &["Retopo_yuki-onna.001.glb", "Retopo_kappa.glb", "Kappa.glb"]);

        run_rename_exports(RenameExportsArgs {
            dir: dir.path().to_path_buf(),
            ext: "glb".to_string(),
            dry_run: true,
        })
        .expect("dry run succeeds");
        assert!(dir.path().join("Retopo_yuki-onna.001.glb").exists());

        run_rename_exports(RenameExportsArgs {
            dir: dir.path().to_path_buf(),
            ext: "glb".to_string(),
            dry_run: false,
        })
        .expect("rename succeeds");
        assert!(dir.path().join("Yuki_Onna.glb").exists());
        assert!(dir.path().join("Retopo_kappa.glb").exists());
    }
}
