//! Built-in registry of Ontario and federal authoritative sources

use crate::model::{ClaimType, QueryMethod, SourceCategory, SourceDescriptor, SourceRegistry};

/// Bumped whenever an entry changes; part of every lookup cache key
pub const REGISTRY_VERSION: &str = "2024.2";

#[derive(Clone, Copy)]
enum Kind {
    Api,
    SearchPage,
    Rss,
}

struct Entry {
    id: &'static str,
    name: &'static str,
    category: SourceCategory,
    url: &'static str,
    query: (Kind, &'static str),
    queryable: bool,
    subjects: &'static [&'static str],
    claim_types: &'static [ClaimType],
}

const ENTRIES: &[Entry] = &[
    Entry {
        id: "wsib-open-data",
        name: "WSIB Open Data",
        category: SourceCategory::Data,
        url: "https://www.wsib.ca/en/open-data",
        query: (Kind::Api, "https://data.ontario.ca/api/3/action/package_search"),
        queryable: true,
        subjects: &["wsib", "workplace safety and insurance board"],
        claim_types: &[],
    },
    Entry {
        id: "wsiat-decisions",
        name: "Workplace Safety and Insurance Appeals Tribunal decisions",
        category: SourceCategory::Legal,
        url: "https://www.wsiat.on.ca",
        query: (Kind::SearchPage, "https://www.wsiat.on.ca/en/search/search.html?q={query}"),
        queryable: true,
        subjects: &["wsib", "wsiat", "workplace safety"],
        claim_types: &[],
    },
    Entry {
        id: "canlii",
        name: "CanLII",
        category: SourceCategory::Legal,
        url: "https://www.canlii.org",
        query: (Kind::SearchPage, "https://www.canlii.org/en/search/?text={query}"),
        queryable: true,
        subjects: &[],
        claim_types: &[],
    },
    Entry {
        id: "social-benefits-tribunal",
        name: "Social Benefits Tribunal",
        category: SourceCategory::Legal,
        url: "https://tribunalsontario.ca/sbt/",
        query: (Kind::SearchPage, "https://tribunalsontario.ca/sbt/?s={query}"),
        queryable: true,
        subjects: &["odsp", "ontario works", "ontario disability support program"],
        claim_types: &[],
    },
    Entry {
        id: "ombudsman-ontario",
        name: "Ombudsman Ontario",
        category: SourceCategory::Oversight,
        url: "https://www.ombudsman.on.ca",
        query: (Kind::SearchPage, "https://www.ombudsman.on.ca/search?q={query}"),
        queryable: true,
        subjects: &["ministry", "odsp", "ontario works"],
        claim_types: &[
            ClaimType::Denial,
            ClaimType::Fraud,
            ClaimType::Abuse,
            ClaimType::Negligence,
            ClaimType::Pattern,
        ],
    },
    Entry {
        id: "auditor-general-ontario",
        name: "Auditor General of Ontario",
        category: SourceCategory::Oversight,
        url: "https://www.auditor.on.ca",
        query: (Kind::SearchPage, "https://www.auditor.on.ca/en/content/search.html?q={query}"),
        queryable: true,
        subjects: &["wsib", "ministry"],
        claim_types: &[ClaimType::Fraud, ClaimType::Negligence, ClaimType::Pattern],
    },
    Entry {
        id: "integrity-commissioner-ontario",
        name: "Integrity Commissioner of Ontario",
        category: SourceCategory::Oversight,
        url: "https://www.oico.on.ca",
        query: (Kind::SearchPage, "https://www.oico.on.ca/search?q={query}"),
        queryable: true,
        subjects: &[],
        claim_types: &[ClaimType::Fraud, ClaimType::Violation],
    },
    Entry {
        id: "ontario-hansard",
        name: "Legislative Assembly of Ontario Hansard",
        category: SourceCategory::Legislative,
        url: "https://www.ola.org/en/legislative-business/house-documents",
        query: (Kind::Rss, "https://www.ola.org/en/rss/hansard"),
        queryable: true,
        subjects: &["wsib", "odsp", "ontario works", "ministry"],
        claim_types: &[],
    },
    Entry {
        id: "ontario-newsroom",
        name: "Ontario Newsroom",
        category: SourceCategory::Official,
        url: "https://news.ontario.ca",
        query: (Kind::Rss, "https://news.ontario.ca/newsroom/en/rss/allnews.rss"),
        queryable: true,
        subjects: &["ministry", "government of ontario"],
        claim_types: &[],
    },
    Entry {
        id: "open-canada",
        name: "Open Government Canada",
        category: SourceCategory::Data,
        url: "https://open.canada.ca",
        query: (Kind::Api, "https://open.canada.ca/data/api/3/action/package_search"),
        queryable: true,
        subjects: &["service canada", "canada revenue agency", "government of canada"],
        claim_types: &[],
    },
    Entry {
        id: "sunshine-list",
        name: "Ontario Public Sector Salary Disclosure",
        category: SourceCategory::Data,
        url: "https://www.ontario.ca/page/public-sector-salary-disclosure",
        query: (Kind::SearchPage, "https://www.ontario.ca/search/search-results?query={query}"),
        // Annual spreadsheet only, no per-claim search
        queryable: false,
        subjects: &["wsib", "ministry"],
        claim_types: &[],
    },
];

/// The registry shipped with the service
pub fn default_registry() -> SourceRegistry {
    SourceRegistry {
        version: REGISTRY_VERSION.to_string(),
        sources: ENTRIES
            .iter()
            .map(|e| SourceDescriptor {
                id: e.id.to_string(),
                name: e.name.to_string(),
                category: e.category,
                url: e.url.to_string(),
                query: query_method(e.query),
                queryable: e.queryable,
                subjects: e.subjects.iter().map(|s| s.to_string()).collect(),
                claim_types: e.claim_types.to_vec(),
            })
            .collect(),
    }
}

fn query_method((kind, target): (Kind, &str)) -> QueryMethod {
    let target = target.to_string();
    match kind {
        Kind::Api => QueryMethod::Api { endpoint: target },
        Kind::SearchPage => QueryMethod::SearchPage {
            url_template: target,
        },
        Kind::Rss => QueryMethod::Rss { feed_url: target },
    }
}
