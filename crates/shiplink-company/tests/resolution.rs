use std::collections::BTreeMap;

use polars::prelude::DataFrame;
use proptest::prelude::*;

use shiplink_common::{column_strings, string_column};
use shiplink_company::{
    CompanyNameResolver, DirectoryBuilder, GlossaryTranslator, LandDeal, SubsidiaryDirectory,
    TranslationError, land_deals_from_frame,
};
use shiplink_model::{DirectoryOptions, OTHER_COMPANY, OverlapPolicy, ResolutionPolicy};

fn land_frame() -> DataFrame {
    let col = |name: &str, values: &[&str]| {
        string_column(name, values.iter().map(|v| (*v).to_string()).collect())
    };
    DataFrame::new(vec![
        col("deal_id", &["1", "2", "3", "4"]),
        col("target_country", &["Ukraine", "Ukraine", "Ukraine", "Romania"]),
        col(
            "top_parent_companies",
            &["Kernel Holding", "Kernel Holding", "Astarta", "Elsewhere"],
        ),
        col(
            "operating_company:_name",
            &["Kernel-Trade (#1)", "Enselco Agro", "Astarta-Kyiv", "Remote"],
        ),
        col("deal_size", &["1,000", "400", "800", "5000"]),
    ])
    .unwrap()
}

#[test]
fn land_deals_to_standardized_shippers() {
    let deals = land_deals_from_frame(&land_frame()).unwrap();
    assert_eq!(deals.len(), 4);
    assert_eq!(deals[0].deal_size, 1000.0);

    let glossary = GlossaryTranslator::from_pairs([
        ("Kernel-Trade", "Кернел-Трейд"),
        ("Enselco Agro", "Енселко Агро"),
        ("Astarta-Kyiv", "Астарта-Київ"),
    ]);
    let options = DirectoryOptions {
        target_country: Some("ukraine".to_string()),
        ..DirectoryOptions::default()
    };
    let directory = DirectoryBuilder::new(options)
        .build(&deals, &glossary)
        .unwrap();
    assert_eq!(directory.len(), 2);

    let shipments = DataFrame::new(vec![string_column(
        "shipper_low",
        vec![
            "тов \"кернел-трейд\"".to_string(),
            "тов астарта-київ".to_string(),
            "тов нібулон".to_string(),
            "тов енселко агро".to_string(),
        ],
    )])
    .unwrap();
    let resolver = CompanyNameResolver::new(directory, ResolutionPolicy::default());
    let out = resolver
        .standardize_column(&shipments, "shipper_low", "company_std")
        .unwrap();
    assert_eq!(
        column_strings(&out, "company_std").unwrap(),
        vec!["Kernel Holding", "Astarta", OTHER_COMPANY, "Kernel Holding"]
    );
}

#[test]
fn missing_operating_company_column_is_reported() {
    let df = land_frame().drop("operating_company:_name").unwrap();
    let err = land_deals_from_frame(&df).unwrap_err();
    assert!(err.to_string().contains("operating_company_name"));
}

fn identity(text: &str, _: &str, _: &str) -> Result<String, TranslationError> {
    Ok(text.to_string())
}

fn land_deal(parents: &str, operating: &str, size: f64) -> LandDeal {
    LandDeal {
        deal_id: String::new(),
        target_country: "Ukraine".to_string(),
        top_parent_companies: parents.to_string(),
        operating_company: operating.to_string(),
        deal_size: size,
    }
}

#[test]
fn multi_owner_deal_resolves_under_default_options() {
    let deals = vec![
        land_deal("Astarta|MHP (#7)", "Agro-Invest (#7)", 300.0),
        land_deal("MHP", "Raftan", 200.0),
        land_deal("Astarta", "Astarta-Kyiv", 100.0),
    ];
    let directory = DirectoryBuilder::new(DirectoryOptions::default())
        .build(&deals, &identity)
        .unwrap();
    let parents: Vec<&str> = directory.parents().collect();
    assert_eq!(parents, vec!["Astarta", "MHP"]);
    assert!(directory.aliases("MHP").unwrap().contains(&"agro-invest".to_string()));

    let resolver = CompanyNameResolver::new(directory, ResolutionPolicy::default());
    assert_eq!(resolver.resolve("tov astarta-kyiv"), "Astarta");
    assert_eq!(resolver.resolve("raftan llc"), "MHP");
    // Shared alias goes to the first co-owner in directory order.
    assert_eq!(resolver.resolve("tov agro-invest"), "Astarta");
}

// Aliases that never contain one another.
const WORDS: &[&str] = &["alpha", "bravo", "delta", "kilo", "oscar", "tango", "zulu"];

fn arb_case() -> impl Strategy<Value = (BTreeMap<String, Vec<String>>, String, String)> {
    (
        prop::sample::subsequence(WORDS.to_vec(), 1..=WORDS.len()),
        any::<prop::sample::Index>(),
        "[0-9 ]{0,6}",
        "[0-9 ]{0,6}",
    )
        .prop_map(|(words, pick, prefix, suffix)| {
            let mut map: BTreeMap<String, Vec<String>> = BTreeMap::new();
            for (i, word) in words.iter().enumerate() {
                map.entry(format!("P{}", i % 3))
                    .or_default()
                    .push((*word).to_string());
            }
            let alias = words[pick.index(words.len())].to_string();
            let shipper = format!("{prefix}{alias}{suffix}");
            (map, alias, shipper)
        })
}

proptest! {
    #[test]
    fn single_alias_resolves_to_its_parent((map, alias, shipper) in arb_case()) {
        let expected = map
            .iter()
            .find(|(_, aliases)| aliases.contains(&alias))
            .map(|(parent, _)| parent.clone())
            .unwrap();
        let directory = SubsidiaryDirectory::from_map(map, OverlapPolicy::Reject).unwrap();
        for policy in [ResolutionPolicy::LastMatch, ResolutionPolicy::LongestAlias] {
            let resolver = CompanyNameResolver::new(directory.clone(), policy);
            prop_assert_eq!(resolver.resolve(&shipper), expected.as_str());
        }
    }

    #[test]
    fn digits_only_resolve_to_other(shipper in "[0-9 ]{0,12}") {
        let map = BTreeMap::from([("P0".to_string(), vec!["alpha".to_string()])]);
        let directory = SubsidiaryDirectory::from_map(map, OverlapPolicy::Reject).unwrap();
        let resolver = CompanyNameResolver::new(directory, ResolutionPolicy::default());
        prop_assert_eq!(resolver.resolve(&shipper), OTHER_COMPANY);
    }
}
