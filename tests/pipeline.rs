//! End-to-end runs over small tagged exports.

use bibmetrics::burst::BurstConfig;
use bibmetrics::metrics::{PriceThreshold, PriceVariant};
use bibmetrics::normalize::Normalizer;
use bibmetrics::{
    AnalysisConfig, Analyzer, DiagnosticKind, Record, RecordParser, TextEncoding, WosParser,
};
use pretty_assertions::assert_eq;

const EXPORT: &str = "FN Clarivate Analytics Web of Science
VR 1.0
PT J
UT WOS:000000000000001
AU Smith, J
   Johnson, A
AF Smith, John
   Johnson, Alice
TI Mapping citation networks
   across disciplines
SO SCIENTOMETRICS
DE citation analysis; co-citation; science mapping
ID NETWORKS; CITATION
C1 [Smith, J] Univ Technol, Sydney, NSW, Australia. [Johnson, A] MIT, Cambridge, MA USA.
CR Small H, 1973, J AM SOC INFORM SCI, V24, P265, DOI 10.1002/asi.4630240406
   Garfield E, 1955, SCIENCE, V122, P108, DOI 10.1126/science.122.3159.108
NR 2
TC 10
Z9 11
PY 2018
DT Article
ER

PT J
UT WOS:000000000000002
AU Johnson, A
   Lee, K
   Smith, J
TI Co-citation at scale
SO SCIENTOMETRICS
DE co-citation; science mapping
C1 [Johnson, A; Lee, K] MIT, Cambridge, MA 02139 USA. [Smith, J] Univ Technol, Sydney, NSW, Australia.
CR Small H, 1973, J AM SOC INFORM SCI, V24, P265, DOI 10.1002/ASI.4630240406
   Garfield E, 1955, SCIENCE, V122, P108, DOI 10.1126/science.122.3159.108
   Price DJD, 1965, SCIENCE, V149, P510
TC 8
PY 2019
DT Article
ER

PT J
UT WOS:000000000000003
AU Lee, K
TI A note on the h-index
SO JOURNAL OF INFORMETRICS
DE h-index
C1 [Lee, K] Natl Taiwan Univ, Taipei, Taiwan.
TC five
PY 2021
DT Review
ER

EF
";

fn analyzer() -> Analyzer {
    Analyzer::new(AnalysisConfig::default()).unwrap()
}

#[test]
fn test_header_and_records() {
    let export = WosParser::new().parse(EXPORT).unwrap();

    assert_eq!(export.file_name.as_deref(), Some("Clarivate Analytics Web of Science"));
    assert_eq!(export.version.as_deref(), Some("1.0"));
    assert_eq!(export.records.len(), 3);

    let first = &export.records[0];
    assert_eq!(first.id, "WOS:000000000000001");
    assert_eq!(first.title, "Mapping citation networks across disciplines");
    assert_eq!(first.citations, 10);
    assert_eq!(first.reference_count, Some(2));
    assert_eq!(first.references.len(), 2);

    // non-numeric TC falls back to 0 with a diagnostic
    assert_eq!(export.records[2].citations, 0);
    assert_eq!(export.diagnostics.count(DiagnosticKind::NumericCoercionFailure), 1);
}

#[test]
fn test_affiliation_countries() {
    let record = Record {
        id: "r1".to_string(),
        affiliation: Some(
            "[Smith, J] Univ Technol, Sydney, NSW, Australia. [Johnson, A] MIT, Cambridge, MA USA."
                .to_string(),
        ),
        ..Default::default()
    };
    let normalized = Normalizer::new().normalize_record(&record);

    let mut countries: Vec<&str> = normalized.countries.iter().map(|c| c.as_str()).collect();
    countries.sort_unstable();
    assert_eq!(countries, vec!["Australia", "USA"]);
}

#[test]
fn test_full_report() {
    let report = analyzer().analyze_str(EXPORT).unwrap();

    assert_eq!(report.parsed_records, 3);
    assert_eq!(report.corpus.len(), 3);

    // citations 10, 8, 0
    assert_eq!(report.impact.total_citations, 18);
    assert_eq!(report.impact.h_index, 2);
    assert_eq!(report.impact.g_index, 3);
    assert_eq!(report.impact.uncited_papers, 1);

    assert_eq!(report.collaboration.single_author_papers, 1);
    assert_eq!(report.collaboration.max_authors_per_paper, 3);
    assert_eq!(report.international.multi_country_papers, 2);
    assert_eq!(report.publications_by_type["Article"], 2);
    assert_eq!(report.article_ages.ages, vec![3, 2, 0]);

    let smith = &report.aggregates.authors["Smith J"];
    assert_eq!(smith.documents, 2);
    assert_eq!(smith.citations, 18);
    assert_eq!(report.aggregates.countries["Chinese Taiwan"].documents, 1);
    assert_eq!(report.aggregates.venues["Journal of Informetrics"].documents, 1);

    // only the first record declares NR
    assert_eq!(report.references.total_cited_references, 2);
    assert!((report.references.average_per_document - 2.0 / 3.0).abs() < 1e-9);

    let scientometrics = &report.venue_authorship["Scientometrics"];
    assert_eq!(scientometrics.documents, 2);
    assert_eq!(scientometrics.unique_authors, 3);
    assert_eq!(scientometrics.author_diversity, 1.5);

    assert_eq!(report.research_trends.len(), 3);
    assert_eq!(report.research_trends[&2019].papers, 1);
    assert_eq!(report.research_trends[&2019].distinct_authors, 3);
}

#[test]
fn test_networks() {
    let report = analyzer().analyze_str(EXPORT).unwrap();
    let networks = &report.networks;

    assert_eq!(networks.coauthorship.weight("Johnson A", "Smith J"), Some(2));
    assert_eq!(networks.coauthorship.weight("Lee K", "Smith J"), Some(1));
    assert_eq!(networks.coauthorship.edge_count(), 3);

    // DOI spelling variants collapse to one cited work
    assert_eq!(
        networks
            .cocitation
            .weight("10.1002/asi.4630240406", "10.1126/science.122.3159.108"),
        Some(2)
    );
    assert_eq!(networks.cocitation.node_count(), 3);

    assert_eq!(networks.keywords.weight("co-citation", "science mapping"), Some(2));
    assert_eq!(networks.countries.weight("Australia", "USA"), Some(2));
}

#[test]
fn test_price_law_variants_reported_side_by_side() {
    let config = AnalysisConfig::default()
        .with_price_law(PriceVariant::MaxProductivity, PriceThreshold::Standard);
    let report = Analyzer::new(config).unwrap().analyze_str(EXPORT).unwrap();
    let price = &report.price_law;

    // n_max = 2: k = ceil(0.749 * sqrt(2)) = 2
    assert_eq!(price.max_productivity.core_authors.len(), 2);
    // N = 3: k = floor(sqrt(3)) = 1
    assert_eq!(price.total_authors.core_authors.len(), 1);
    assert_eq!(price.selected().variant, PriceVariant::MaxProductivity);
    assert_eq!(price.max_productivity.total_publications, 3);
    assert_eq!(price.max_productivity.threshold, PriceThreshold::Standard);
}

#[test]
fn test_windows_1252_bytes() {
    let bytes = b"PT J\nAU M\xfcller, H\nPY 2020\nTC 1\nER\nEF\n";
    let report = analyzer().analyze_bytes(bytes).unwrap();

    assert_eq!(report.encoding, Some(TextEncoding::Windows1252));
    assert_eq!(report.corpus.records[0].authors, vec!["Müller H"]);
}

#[test]
fn test_bursts_and_temporal_summary() {
    let mut export = String::new();
    for year in 2010..2016 {
        export.push_str(&format!("PT J\nAU A, B\nDE bibliometrics\nPY {}\nER\n", year));
    }
    for _ in 0..4 {
        export.push_str("PT J\nAU C, D\nDE altmetrics\nPY 2016\nER\n");
        export.push_str("PT J\nAU C, D\nDE altmetrics\nPY 2017\nER\n");
    }
    export.push_str("EF\n");

    let config = AnalysisConfig::default().with_burst(BurstConfig {
        max_results: Some(10),
        ..Default::default()
    });
    let report = Analyzer::new(config).unwrap().analyze_str(&export).unwrap();

    let terms: Vec<&str> = report.keyword_bursts.iter().map(|b| b.term.as_str()).collect();
    assert_eq!(terms, vec!["altmetrics"]);
    assert_eq!(report.keyword_bursts[0].bursting_years, vec![2015, 2016, 2017]);

    let temporal = report.temporal.unwrap();
    assert_eq!((temporal.start_year, temporal.end_year), (2010, 2017));
    assert_eq!(temporal.peak_year, 2016);
    assert_eq!(temporal.distinct_keywords, 2);
}

#[test]
fn test_missing_fields_are_diagnostics() {
    let report = analyzer()
        .analyze_str("PT J\nTI Untitled work\nER\nER\nEF")
        .unwrap();

    assert_eq!(report.corpus.len(), 1);
    assert_eq!(report.diagnostics.count(DiagnosticKind::MalformedRecord), 1);
    assert!(report.diagnostics.count(DiagnosticKind::MissingField) >= 5);
    assert_eq!(report.impact.h_index, 0);
    assert!(report.networks.coauthorship.is_empty());
}

#[cfg(feature = "csv")]
#[test]
fn test_tabular_input_matches_tagged() {
    use bibmetrics::CsvParser;

    let csv = "Authors,Article Title,Source Title,Publication Year,Times Cited\n\
               \"Smith, J; Johnson, A\",Mapping,SCIENTOMETRICS,2018,10\n\
               \"Johnson, A; Lee, K; Smith, J\",Scale,SCIENTOMETRICS,2019,8\n";
    let export = CsvParser::new().parse(csv).unwrap();
    let report = analyzer().analyze_export(export);

    assert_eq!(report.corpus.records[1].authors, vec!["Johnson A", "Lee K", "Smith J"]);
    assert_eq!(report.networks.coauthorship.weight("Johnson A", "Smith J"), Some(2));
    assert_eq!(report.impact.h_index, 2);
}
