//! End-to-end runs of the subcommands on small CSV fixtures.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use tempfile::TempDir;

use shiplink_cli::cli::{Cli, Command};
use shiplink_cli::commands::{load_config, run_crops, run_link, run_reconcile, run_resolve};
use shiplink_cli::types::CompanyTotal;
use shiplink_model::PipelineConfig;

fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn parse(args: &[&str]) -> Cli {
    let mut argv = vec!["shiplink"];
    argv.extend_from_slice(args);
    Cli::try_parse_from(argv).unwrap()
}

fn arg(path: &Path) -> &str {
    path.to_str().unwrap()
}

const LAND: &str = "\
Deal ID,Target country,Top parent companies,Operating company: Name,Deal size
1,Ukraine,Kernel Holding,Enselco Agro (#1),1000
2,Ukraine,Astarta,Astarta-Kyiv,800
";

const GLOSSARY: &str = "\
text,translation
Enselco Agro,Енселко Агро
Astarta-Kyiv,Астарта-Київ
";

const SHIPMENTS: &str = "\
shipper,weight_ton
ТОВ Енселко Агро,30
тов астарта-київ,20
тов нібулон,5
ТОВ  ЕНСЕЛКО АГРО,2.5
";

#[test]
fn resolve_attributes_shippers_and_writes_company_column() {
    let dir = TempDir::new().unwrap();
    let land = write(&dir, "land.csv", LAND);
    let glossary = write(&dir, "glossary.csv", GLOSSARY);
    let shipments = write(&dir, "shipments.csv", SHIPMENTS);
    let output = dir.path().join("resolved.csv");

    let cli = parse(&[
        "resolve",
        "--shipments",
        arg(&shipments),
        "--land",
        arg(&land),
        "--glossary",
        arg(&glossary),
        "--output",
        arg(&output),
    ]);
    let Command::Resolve(args) = cli.command else {
        panic!("expected resolve");
    };
    let result = run_resolve(&args, &PipelineConfig::default()).unwrap();

    assert_eq!(result.rows, 4);
    assert_eq!(result.parents, 2);
    assert_eq!(
        result.totals,
        vec![
            CompanyTotal {
                company: "Kernel Holding".to_string(),
                weight_ton: 32.5,
            },
            CompanyTotal {
                company: "Astarta".to_string(),
                weight_ton: 20.0,
            },
            CompanyTotal {
                company: "Other".to_string(),
                weight_ton: 5.0,
            },
        ]
    );
    let written = fs::read_to_string(&output).unwrap();
    insta::assert_snapshot!(written, @r"
    shipper,weight_ton,shipper_low,company_std
    ТОВ Енселко Агро,30,тов енселко агро,Kernel Holding
    тов астарта-київ,20,тов астарта-київ,Astarta
    тов нібулон,5,тов нібулон,Other
    ТОВ  ЕНСЕЛКО АГРО,2.5,тов енселко агро,Kernel Holding
    ");
}

#[test]
fn resolve_applies_configured_overrides() {
    let dir = TempDir::new().unwrap();
    let land = write(&dir, "land.csv", LAND);
    let glossary = write(&dir, "glossary.csv", GLOSSARY);
    let shipments = write(&dir, "shipments.csv", SHIPMENTS);
    let config_path = write(
        &dir,
        "shiplink.toml",
        "[overrides]\nNibulon = [\"Нібулон\"]\n",
    );

    let cli = parse(&[
        "--config",
        arg(&config_path),
        "resolve",
        "--shipments",
        arg(&shipments),
        "--land",
        arg(&land),
        "--glossary",
        arg(&glossary),
    ]);
    let config = load_config(cli.config.as_deref()).unwrap();
    let Command::Resolve(args) = cli.command else {
        panic!("expected resolve");
    };
    let result = run_resolve(&args, &config).unwrap();
    let companies: Vec<&str> = result.totals.iter().map(|t| t.company.as_str()).collect();
    assert_eq!(companies, vec!["Kernel Holding", "Astarta", "Nibulon"]);
}

#[test]
fn resolve_without_glossary_leaves_cyrillic_shippers_unmatched() {
    let dir = TempDir::new().unwrap();
    let land = write(&dir, "land.csv", LAND);
    let shipments = write(&dir, "shipments.csv", SHIPMENTS);
    let cli = parse(&[
        "resolve",
        "--shipments",
        arg(&shipments),
        "--land",
        arg(&land),
    ]);
    let Command::Resolve(args) = cli.command else {
        panic!("expected resolve");
    };
    // Latin aliases never occur in Cyrillic shipper names.
    let result = run_resolve(&args, &PipelineConfig::default()).unwrap();
    assert_eq!(result.totals.len(), 1);
    assert_eq!(result.totals[0].company, "Other");
    assert_eq!(result.totals[0].weight_ton, 57.5);
}

const CO_OWNED_LAND: &str = "\
Deal ID,Target country,Top parent companies,Operating company: Name,Deal size
1,Ukraine,Kernel Holding,Enselco Agro (#1),1000
2,Ukraine,Astarta|MHP,Agro-Invest,800
3,Ukraine,MHP,Raftan,500
";

const CO_OWNED_GLOSSARY: &str = "\
text,translation
Enselco Agro,Енселко Агро
Agro-Invest,Агро-Інвест
Raftan,Рафтан
";

const CO_OWNED_SHIPMENTS: &str = "\
shipper,weight_ton
ТОВ Енселко Агро,30
тов агро-інвест,20
пп рафтан,5
тов нібулон,2
";

#[test]
fn resolve_accepts_multi_owner_deals() {
    let dir = TempDir::new().unwrap();
    let land = write(&dir, "land.csv", CO_OWNED_LAND);
    let glossary = write(&dir, "glossary.csv", CO_OWNED_GLOSSARY);
    let shipments = write(&dir, "shipments.csv", CO_OWNED_SHIPMENTS);

    let cli = parse(&[
        "resolve",
        "--shipments",
        arg(&shipments),
        "--land",
        arg(&land),
        "--glossary",
        arg(&glossary),
    ]);
    let Command::Resolve(args) = cli.command else {
        panic!("expected resolve");
    };
    let result = run_resolve(&args, &PipelineConfig::default()).unwrap();

    assert_eq!(result.parents, 3);
    let totals: Vec<(&str, f64)> = result
        .totals
        .iter()
        .map(|t| (t.company.as_str(), t.weight_ton))
        .collect();
    assert_eq!(
        totals,
        vec![
            ("Kernel Holding", 30.0),
            ("Astarta", 20.0),
            ("MHP", 5.0),
            ("Other", 2.0),
        ]
    );
}

const LEFT: &str = "\
date,country,commodity,weight_ton
2023-01-15,Spain,maize,10
2023-01-20,spain,corn,5
2023-02-03,China,Maize,7
2023-02-10,Spain,wheat,3
";

const RIGHT: &str = "\
date,country,commodity,weight_ton
2023-01-31,Spain ,corn,14
2023-02-28,china,maize,8
2023-03-01,Spain,maize,4
";

#[test]
fn link_joins_unique_monthly_matches() {
    let dir = TempDir::new().unwrap();
    let left = write(&dir, "left.csv", LEFT);
    let right = write(&dir, "right.csv", RIGHT);
    let output = dir.path().join("linked.csv");

    let cli = parse(&[
        "link",
        "--left",
        arg(&left),
        "--right",
        arg(&right),
        "--crop",
        "corn",
        "--output",
        arg(&output),
    ]);
    let Command::Link(args) = cli.command else {
        panic!("expected link");
    };
    let result = run_link(&args, &PipelineConfig::default()).unwrap();

    assert_eq!(result.crop, "corn");
    assert_eq!(result.left_groups, 2);
    assert_eq!(result.right_groups, 3);
    assert_eq!(result.candidate_pairs, 2);
    assert_eq!(result.matches, 2);
    assert_eq!(result.unique_matches, 2);
    assert_eq!(result.left_matched_tons, 22.0);
    assert_eq!(result.right_matched_tons, 22.0);

    let written = fs::read_to_string(&output).unwrap();
    insta::assert_snapshot!(written, @r"
    period_a,country_a,weight_ton_a,period_b,country_b,weight_ton_b
    2023-01,spain,15,2023-01,spain,14
    2023-02,china,7,2023-02,china,8
    ");
}

#[test]
fn link_counts_each_matched_group_once() {
    let dir = TempDir::new().unwrap();
    let left = write(
        &dir,
        "left.csv",
        "date,country,commodity,weight_ton\n2023-01-15,Spain,corn,10\n",
    );
    // Both right spellings pass the fuzzy country comparison.
    let right = write(
        &dir,
        "right.csv",
        "date,country,commodity,weight_ton\n2023-01-31,Spain,corn,6\n2023-01-31,Spainn,corn,4\n",
    );
    let cli = parse(&[
        "link",
        "--left",
        arg(&left),
        "--right",
        arg(&right),
        "--crop",
        "corn",
    ]);
    let Command::Link(args) = cli.command else {
        panic!("expected link");
    };
    let result = run_link(&args, &PipelineConfig::default()).unwrap();

    assert_eq!(result.unique_matches, 2);
    assert_eq!(result.left_matched_tons, 10.0);
    assert_eq!(result.right_matched_tons, 10.0);
}

#[test]
fn link_rejects_unknown_crop() {
    let dir = TempDir::new().unwrap();
    let left = write(&dir, "left.csv", LEFT);
    let cli = parse(&[
        "link",
        "--left",
        arg(&left),
        "--right",
        arg(&left),
        "--crop",
        "maize",
    ]);
    let Command::Link(args) = cli.command else {
        panic!("expected link");
    };
    let err = run_link(&args, &PipelineConfig::default()).unwrap_err();
    assert!(err.to_string().starts_with("unknown crop 'maize'"));
}

const COMPANY: &str = "\
company_std,commodity,weight_ton
Kernel,maize,20
Astarta,wheat,10
Kernel,corn,25.5
";

const REFERENCE: &str = "\
commodity,weight_ton
maize,30
wheat,40
sunflower oil,30
";

#[test]
fn reconcile_appends_other_residual() {
    let dir = TempDir::new().unwrap();
    let company = write(&dir, "company.csv", COMPANY);
    let reference = write(&dir, "reference.csv", REFERENCE);
    let output = dir.path().join("residual.csv");

    let cli = parse(&[
        "reconcile",
        "--company",
        arg(&company),
        "--reference",
        arg(&reference),
        "--output",
        arg(&output),
    ]);
    let Command::Reconcile(args) = cli.command else {
        panic!("expected reconcile");
    };
    let result = run_reconcile(&args, &PipelineConfig::default()).unwrap();
    assert_eq!(result.crop, None);

    let written = fs::read_to_string(&output).unwrap();
    insta::assert_snapshot!(written, @r"
    company_std,weight_ton,share_pct
    Kernel,45.5,45.5
    Other,44.5,44.5
    Astarta,10,10
    ");
}

#[test]
fn reconcile_for_one_crop_reports_negative_residual() {
    let dir = TempDir::new().unwrap();
    let company = write(&dir, "company.csv", COMPANY);
    let reference = write(&dir, "reference.csv", REFERENCE);

    let cli = parse(&[
        "reconcile",
        "--company",
        arg(&company),
        "--reference",
        arg(&reference),
        "--crop",
        "corn",
        "--entity",
        "Kernel",
    ]);
    let Command::Reconcile(args) = cli.command else {
        panic!("expected reconcile");
    };
    let result = run_reconcile(&args, &PipelineConfig::default()).unwrap();

    assert_eq!(result.crop.as_deref(), Some("corn"));
    let rows: Vec<(&str, f64)> = result
        .rows
        .iter()
        .map(|row| (row.label.as_str(), row.weight_ton))
        .collect();
    assert_eq!(rows, vec![("Kernel", 45.5), ("Other", -15.5)]);
}

#[test]
fn crops_list_default_labels() {
    let crops = run_crops(&PipelineConfig::default());
    assert_eq!(crops.len(), 11);
    assert_eq!(crops[0].crop, "corn");
    assert_eq!(crops[0].labels, vec!["maize".to_string()]);
    let canola = crops.iter().find(|c| c.crop == "canola").unwrap();
    assert!(canola.labels.is_empty());
}

#[test]
fn missing_config_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let err = load_config(Some(&dir.path().join("absent.toml"))).unwrap_err();
    assert!(err.to_string().starts_with("load config"));
}
