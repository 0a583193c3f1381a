//! Source-type classification by publisher domain.

/// Label for URLs that match no known publisher.
pub const GENERIC_SOURCE_TYPE: &str = "Medical Literature";

/// Known medical publishers, checked in order. More specific domains come
/// before the broader ones they contain (`pubmed.ncbi.nlm.nih.gov` before
/// `nih.gov`).
const MEDICAL_DOMAINS: &[(&str, &str)] = &[
    ("pubmed.ncbi.nlm.nih.gov", "PubMed"),
    ("nejm.org", "NEJM"),
    ("jamanetwork.com", "JAMA"),
    ("thelancet.com", "The Lancet"),
    ("bmj.com", "BMJ"),
    ("nature.com", "Nature"),
    ("science.org", "Science"),
    ("cochranelibrary.com", "Cochrane"),
    ("uptodate.com", "UpToDate"),
    ("who.int", "WHO"),
    ("cdc.gov", "CDC"),
    ("nih.gov", "NIH"),
    ("mayoclinic.org", "Mayo Clinic"),
];

/// Classify a result URL by case-insensitive domain substring match.
pub fn determine_source_type(url: &str) -> &'static str {
    let url_lower = url.to_lowercase();
    MEDICAL_DOMAINS
        .iter()
        .find(|(domain, _)| url_lower.contains(domain))
        .map(|(_, label)| *label)
        .unwrap_or(GENERIC_SOURCE_TYPE)
}
