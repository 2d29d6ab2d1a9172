use std::collections::BTreeSet;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use polars::prelude::DataFrame;
use tracing::{debug, info, info_span};

use shiplink_aggregate::{GroupSpec, classify_crops, filter_crop, group_records};
use shiplink_common::{column_f64, column_strings, normalize_text, string_column};
use shiplink_company::{
    CompanyNameResolver, DirectoryBuilder, GlossaryTranslator, TranslationError, Translator,
    land_deals_from_frame,
};
use shiplink_ingest::{
    coerce_weights, derive_periods, lowercase_shippers, read_csv_frame, standardize_countries,
    write_csv_frame,
};
use shiplink_link::{BlockedComparator, MatchSpec, UniqueMatchSelector, suffix_columns};
use shiplink_model::{CropCategory, CropLookup, PipelineConfig, ValueLookup, columns};
use shiplink_reconcile::{CropScope, estimate_weights, with_shares};

use crate::cli::{LinkArgs, ReconcileArgs, ResolveArgs, SourceColumns};
use crate::types::{
    CompanyTotal, CropSummary, LinkResult, ReconcileResult, ReconcileRow, ResolveResult,
};

const GLOSSARY_TEXT: &str = "text";
const GLOSSARY_TRANSLATION: &str = "translation";
const SHARE_PCT: &str = "share_pct";

/// Load the pipeline configuration, or the defaults when no file is given.
pub fn load_config(path: Option<&Path>) -> Result<PipelineConfig> {
    let Some(path) = path else {
        return Ok(PipelineConfig::default());
    };
    let config = PipelineConfig::load(path)
        .with_context(|| format!("load config {}", path.display()))?;
    debug!(
        path = %path.display(),
        overrides = config.overrides.len(),
        crops = config.crops.len(),
        countries = config.countries.len(),
        "loaded config"
    );
    Ok(config)
}

pub fn run_crops(config: &PipelineConfig) -> Vec<CropSummary> {
    let lookup = config.crop_lookup();
    CropCategory::ALL
        .iter()
        .map(|crop| CropSummary {
            crop: crop.to_string(),
            labels: lookup
                .iter()
                .filter(|(label, category)| category == crop && *label != crop.as_str())
                .map(|(label, _)| label.to_string())
                .collect(),
        })
        .collect()
}

pub fn run_resolve(args: &ResolveArgs, config: &PipelineConfig) -> Result<ResolveResult> {
    let span = info_span!("resolve", shipments = %args.shipments.display());
    let _guard = span.enter();
    let start = Instant::now();

    let land = read_csv_frame(&args.land)
        .with_context(|| format!("read land deals {}", args.land.display()))?;
    let deals = land_deals_from_frame(&land).context("load land deals")?;
    let glossary = args
        .glossary
        .as_deref()
        .map(load_glossary)
        .transpose()?;
    let translator = |text: &str,
                      source_lang: &str,
                      target_lang: &str|
     -> std::result::Result<String, TranslationError> {
        match &glossary {
            Some(glossary) => glossary.translate(text, source_lang, target_lang),
            None => Ok(text.to_string()),
        }
    };
    let directory = DirectoryBuilder::new(config.directory.clone())
        .with_overrides(config.overrides.clone())
        .build(&deals, &translator)
        .context("build subsidiary directory")?;
    let parents = directory.len();
    let aliases = directory.alias_count();
    let overlaps = directory.overlaps().len();
    let resolver = CompanyNameResolver::new(directory, config.directory.resolution);

    let shipments = read_csv_frame(&args.shipments)
        .with_context(|| format!("read shipments {}", args.shipments.display()))?;
    let shipments = coerce_weights(&shipments, &args.weight_column)?;
    let shipments = lowercase_shippers(&shipments, &args.shipper_column)?;
    let standardized =
        resolver.standardize_column(&shipments, columns::SHIPPER_LOW, columns::COMPANY_STD)?;

    let spec = GroupSpec::new([columns::COMPANY_STD])
        .sum(&args.weight_column)
        .sort_by([args.weight_column.as_str()], true);
    let grouped = group_records(&standardized, &spec)?;
    let totals = column_strings(&grouped, columns::COMPANY_STD)?
        .into_iter()
        .zip(column_f64(&grouped, &args.weight_column)?)
        .map(|(company, weight)| CompanyTotal {
            company,
            weight_ton: weight.unwrap_or(0.0),
        })
        .collect();

    write_output(&standardized, args.output.as_deref())?;
    info!(
        rows = standardized.height(),
        parents,
        aliases,
        duration_ms = start.elapsed().as_millis(),
        "resolve complete"
    );
    Ok(ResolveResult {
        rows: standardized.height(),
        parents,
        aliases,
        overlaps,
        totals,
        output: args.output.clone(),
    })
}

pub fn run_link(args: &LinkArgs, config: &PipelineConfig) -> Result<LinkResult> {
    let crop: CropCategory = args.crop.parse()?;
    let span = info_span!("link", %crop);
    let _guard = span.enter();
    let start = Instant::now();

    let crops = config.crop_lookup();
    let countries = config.country_lookup();
    let left = prepare_side(&args.left, &args.columns, crop, &crops, &countries)
        .with_context(|| format!("prepare {}", args.left.display()))?;
    let right = prepare_side(&args.right, &args.columns, crop, &crops, &countries)
        .with_context(|| format!("prepare {}", args.right.display()))?;

    let comparator = BlockedComparator::new(MatchSpec::from_options(&config.matching));
    let table = comparator.compare(&left, &right)?;
    let matches = table.classify(comparator.spec().acceptance_threshold());
    let selector = UniqueMatchSelector::new(config.matching.uniqueness);
    let unique = selector.select(&matches);
    let joined = selector.join(
        &suffix_columns(&left, &args.left_suffix, &[])?,
        &suffix_columns(&right, &args.right_suffix, &[])?,
        &matches,
    )?;

    let result = LinkResult {
        crop: crop.to_string(),
        left_groups: left.height(),
        right_groups: right.height(),
        candidate_pairs: table.len(),
        matches: matches.len(),
        unique_matches: unique.len(),
        left_matched_tons: matched_tons(&left, unique.iter().map(|m| m.left))?,
        right_matched_tons: matched_tons(&right, unique.iter().map(|m| m.right))?,
        output: args.output.clone(),
    };
    write_output(&joined, args.output.as_deref())?;
    info!(
        candidate_pairs = result.candidate_pairs,
        matches = result.matches,
        unique_matches = result.unique_matches,
        duration_ms = start.elapsed().as_millis(),
        "link complete"
    );
    Ok(result)
}

pub fn run_reconcile(args: &ReconcileArgs, config: &PipelineConfig) -> Result<ReconcileResult> {
    let span = info_span!("reconcile", crop = args.crop.as_deref());
    let _guard = span.enter();
    let start = Instant::now();

    let company = read_csv_frame(&args.company)
        .with_context(|| format!("read company records {}", args.company.display()))?;
    let company = coerce_weights(&company, &args.weight_column)?;
    let reference = read_csv_frame(&args.reference)
        .with_context(|| format!("read reference records {}", args.reference.display()))?;
    let reference = coerce_weights(&reference, &args.weight_column)?;

    let (company, reference, scope) = match &args.crop {
        Some(crop) => {
            let crop: CropCategory = crop.parse()?;
            let lookup = config.crop_lookup();
            let scope = CropScope {
                crop: crop.to_string(),
                crop_column: columns::CROP.to_string(),
                entity_label: args.entity.clone(),
            };
            (
                ensure_crops(&company, &args.commodity_column, &lookup)?,
                ensure_crops(&reference, &args.commodity_column, &lookup)?,
                Some(scope),
            )
        }
        None => (company, reference, None),
    };

    let estimate = estimate_weights(
        &company,
        &args.company_column,
        &args.weight_column,
        &reference,
        &args.weight_column,
        scope.as_ref(),
    )?;
    let table = with_shares(&estimate, &args.weight_column)?;
    let rows = column_strings(&table, &args.company_column)?
        .into_iter()
        .zip(column_f64(&table, &args.weight_column)?)
        .zip(column_f64(&table, SHARE_PCT)?)
        .map(|((label, weight), share)| ReconcileRow {
            label,
            weight_ton: weight.unwrap_or(0.0),
            share_pct: share.unwrap_or(0.0),
        })
        .collect();

    write_output(&table, args.output.as_deref())?;
    info!(
        rows = table.height(),
        duration_ms = start.elapsed().as_millis(),
        "reconcile complete"
    );
    Ok(ReconcileResult {
        crop: scope.map(|scope| scope.crop),
        rows,
        output: args.output.clone(),
    })
}

/// Clean one source and sum it per period and country for a single crop.
///
/// The result always uses the standard `period`, `country` and
/// `weight_ton` names so the configured match fields apply to both sides.
fn prepare_side(
    path: &Path,
    names: &SourceColumns,
    crop: CropCategory,
    crops: &CropLookup,
    countries: &ValueLookup,
) -> Result<DataFrame> {
    let df = read_csv_frame(path)?;
    let df = derive_periods(&df, &names.date)?;
    let df = coerce_weights(&df, &names.weight)?;
    let df = if countries.is_empty() {
        fold_column(&df, &names.country)?
    } else {
        standardize_countries(&df, &names.country, countries)?
    };
    let df = classify_crops(&df, &names.commodity, crops)?;
    let df = filter_crop(&df, crop.as_str(), columns::CROP)?;

    let mut spec = GroupSpec::new([columns::PERIOD, names.country.as_str()]).sum(&names.weight);
    if names.country != columns::COUNTRY {
        spec = spec.rename(&names.country, columns::COUNTRY);
    }
    if names.weight != columns::WEIGHT_TON {
        spec = spec.rename(&names.weight, columns::WEIGHT_TON);
    }
    let grouped = group_records(&df, &spec)?;
    debug!(
        source = %path.display(),
        rows = df.height(),
        groups = grouped.height(),
        "prepared source"
    );
    Ok(grouped)
}

/// Weight of the distinct `rows` of a grouped source.
fn matched_tons(df: &DataFrame, rows: impl Iterator<Item = usize>) -> Result<f64> {
    let rows: BTreeSet<usize> = rows.collect();
    let weights = column_f64(df, columns::WEIGHT_TON)?;
    Ok(rows
        .into_iter()
        .filter_map(|row| weights.get(row).copied().flatten())
        .sum())
}

/// Lowercase and whitespace-fold a column in place.
fn fold_column(df: &DataFrame, column: &str) -> Result<DataFrame> {
    let values = column_strings(df, column)?
        .iter()
        .map(|value| normalize_text(value))
        .collect();
    let mut out = df.clone();
    out.with_column(string_column(column, values))?;
    Ok(out)
}

/// Classify commodities unless the frame already carries a crop column.
fn ensure_crops(df: &DataFrame, commodity_column: &str, lookup: &CropLookup) -> Result<DataFrame> {
    if df.column(columns::CROP).is_ok() {
        return Ok(df.clone());
    }
    Ok(classify_crops(df, commodity_column, lookup)?)
}

fn load_glossary(path: &Path) -> Result<GlossaryTranslator> {
    let frame = read_csv_frame(path)
        .with_context(|| format!("read glossary {}", path.display()))?;
    let glossary = GlossaryTranslator::from_frame(&frame, GLOSSARY_TEXT, GLOSSARY_TRANSLATION)
        .with_context(|| format!("load glossary {}", path.display()))?;
    debug!(entries = glossary.len(), "loaded glossary");
    Ok(glossary)
}

fn write_output(df: &DataFrame, path: Option<&Path>) -> Result<()> {
    if let Some(path) = path {
        write_csv_frame(df, path).with_context(|| format!("write {}", path.display()))?;
        info!(path = %path.display(), rows = df.height(), "wrote output");
    }
    Ok(())
}
