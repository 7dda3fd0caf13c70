// tests/mention_extraction.rs
use brand_sentiment_analyzer::{BrandCatalog, MentionExtractor};

fn extractor() -> MentionExtractor {
    let cat = BrandCatalog::from_categories(vec![
        ("cpu", vec!["AMD", "Intel"]),
        ("ram", vec!["G.Skill"]),
    ]);
    MentionExtractor::new(&cat).unwrap()
}

#[test]
fn boundary_and_case_rules() {
    let ex = extractor();
    assert_eq!(ex.len(), 3);
    assert!(ex.find_brands_in("AMD Ryzen CPU").contains("amd"));
    assert!(ex.find_brands_in("amd").contains("amd"));
    assert!(ex.find_brands_in("RAMDisk").is_empty());
    assert!(ex.find_brands_in("intel's new chip").contains("intel"));
    assert!(ex.find_brands_in("G.SKILL Trident").contains("g.skill"));
}

#[test]
fn short_snippets_never_appear() {
    let ex = extractor();
    let snippets = ["AM", " a ", "", "   ", "AMD", "  AMD  "];
    let out = ex.extract_mentions(&snippets);
    let amd = &out["amd"];
    assert_eq!(amd, &vec!["AMD".to_string(), "  AMD  ".to_string()]);
    for list in out.values() {
        assert!(list.iter().all(|s| s.trim().chars().count() >= 3));
    }
}

#[test]
fn original_text_and_scan_order_are_kept() {
    let ex = extractor();
    let snippets = [
        "Intel first",
        "then AMD and INTEL",
        "nothing",
        "amd last",
    ];
    let out = ex.extract_mentions(&snippets);
    assert_eq!(out.len(), 2);
    assert_eq!(out["intel"], vec!["Intel first", "then AMD and INTEL"]);
    assert_eq!(out["amd"], vec!["then AMD and INTEL", "amd last"]);
}
