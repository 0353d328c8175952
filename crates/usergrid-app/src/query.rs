// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Translates grid paging, sort, and filter state into the fetch
//! endpoint's query string.
//!
//! `page` and `per_page` are always present, `sort_by` only when at least
//! one sort is active, and every filter becomes its own parameter named
//! after its field. Field names are passed through verbatim.

use anyhow::{Context, Result};
use url::Url;
use url::form_urlencoded;

use crate::{FilterSpec, PAGE_SIZE, PageRequest, SortDirection, SortSpec};

pub const PAGE_PARAM: &str = "page";
pub const PER_PAGE_PARAM: &str = "per_page";
pub const SORT_BY_PARAM: &str = "sort_by";

const RESERVED_PARAMS: [&str; 3] = [PAGE_PARAM, PER_PAGE_PARAM, SORT_BY_PARAM];

pub fn query_pairs(request: &PageRequest) -> Vec<(String, String)> {
    let mut pairs = vec![
        (PAGE_PARAM.to_owned(), request.page.to_string()),
        (PER_PAGE_PARAM.to_owned(), request.per_page.to_string()),
    ];

    if !request.sorts.is_empty() {
        let sort_by = request
            .sorts
            .iter()
            .map(|sort| format!("{}:{}", sort.field, sort.direction.as_str()))
            .collect::<Vec<_>>()
            .join(",");
        pairs.push((SORT_BY_PARAM.to_owned(), sort_by));
    }

    for filter in &request.filters {
        if filter.field.is_empty() || RESERVED_PARAMS.contains(&filter.field.as_str()) {
            continue;
        }
        match pairs.iter_mut().find(|(key, _)| *key == filter.field) {
            Some(existing) => existing.1 = filter.value.clone(),
            None => pairs.push((filter.field.clone(), filter.value.clone())),
        }
    }

    pairs
}

pub fn encode_query(request: &PageRequest) -> String {
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(query_pairs(request))
        .finish()
}

pub fn page_url(base: &str, request: &PageRequest) -> Result<Url> {
    let mut url = Url::parse(base).with_context(|| format!("parse fetch url {base:?}"))?;
    url.query_pairs_mut().extend_pairs(query_pairs(request));
    Ok(url)
}

/// Inverse of [`encode_query`]. Unparseable paging values fall back to
/// page 1 and the default page size; unknown sort directions are dropped.
pub fn decode_query(query: &str) -> PageRequest {
    let mut request = PageRequest::first(PAGE_SIZE);
    for (key, value) in form_urlencoded::parse(query.trim_start_matches('?').as_bytes()) {
        match key.as_ref() {
            PAGE_PARAM => request.page = value.parse::<u32>().unwrap_or(1).max(1),
            PER_PAGE_PARAM => {
                request.per_page = value
                    .parse::<u32>()
                    .ok()
                    .filter(|n| *n > 0)
                    .unwrap_or(PAGE_SIZE)
            }
            SORT_BY_PARAM => {
                request.sorts = value
                    .split(',')
                    .filter_map(|pair| {
                        let (field, direction) = pair.rsplit_once(':')?;
                        Some(SortSpec::new(field, SortDirection::parse(direction)?))
                    })
                    .collect();
            }
            field => request
                .filters
                .push(FilterSpec::new(field, value.into_owned())),
        }
    }
    request
}

#[cfg(test)]
mod tests {
    use super::{decode_query, encode_query, page_url, query_pairs};
    use crate::{FilterSpec, PageRequest, SortDirection, SortSpec};
    use anyhow::Result;

    #[test]
    fn first_page_emits_only_paging() -> Result<()> {
        let url = page_url("http://localhost:5001/api/users", &PageRequest::first(200))?;
        assert_eq!(
            url.as_str(),
            "http://localhost:5001/api/users?page=1&per_page=200"
        );
        Ok(())
    }

    #[test]
    fn sort_and_filter_become_parameters() {
        let request = PageRequest {
            page: 1,
            per_page: 200,
            sorts: vec![SortSpec::new("name", SortDirection::Asc)],
            filters: vec![FilterSpec::new("gender", "male")],
        };
        let pairs = query_pairs(&request);
        assert!(pairs.contains(&("sort_by".to_owned(), "name:asc".to_owned())));
        assert!(pairs.contains(&("gender".to_owned(), "male".to_owned())));
        assert_eq!(
            encode_query(&request),
            "page=1&per_page=200&sort_by=name%3Aasc&gender=male"
        );
    }

    #[test]
    fn multiple_sorts_keep_order() {
        let request = PageRequest {
            sorts: vec![
                SortSpec::new("location", SortDirection::Desc),
                SortSpec::new("name", SortDirection::Asc),
            ],
            ..PageRequest::first(50)
        };
        let decoded = decode_query(&encode_query(&request));
        assert_eq!(decoded.sorts, request.sorts);
    }

    #[test]
    fn unknown_fields_pass_through() {
        let request = PageRequest {
            filters: vec![FilterSpec::new("shoe_size", "44")],
            ..PageRequest::first(10)
        };
        assert!(encode_query(&request).ends_with("shoe_size=44"));
    }

    #[test]
    fn empty_and_reserved_filter_fields_are_skipped() {
        let request = PageRequest {
            page: 3,
            filters: vec![
                FilterSpec::new("", "ignored"),
                FilterSpec::new("page", "9"),
                FilterSpec::new("name", "ann"),
            ],
            ..PageRequest::first(25)
        };
        assert_eq!(encode_query(&request), "page=3&per_page=25&name=ann");
    }

    #[test]
    fn repeated_filter_field_keeps_last_value() {
        let request = PageRequest {
            filters: vec![
                FilterSpec::new("location", "Austin"),
                FilterSpec::new("email", "a@b.com"),
                FilterSpec::new("location", "Boise"),
            ],
            ..PageRequest::first(5)
        };
        assert_eq!(
            encode_query(&request),
            "page=1&per_page=5&location=Boise&email=a%40b.com"
        );
    }

    #[test]
    fn encoded_query_round_trips() {
        let request = PageRequest {
            page: 7,
            per_page: 120,
            sorts: vec![
                SortSpec::new("dob", SortDirection::Desc),
                SortSpec::new("email", SortDirection::Asc),
            ],
            filters: vec![
                FilterSpec::new("name", "O'Brien & Sons"),
                FilterSpec::new("dob", "1990-01-31"),
                FilterSpec::new("favourite", "sky blue"),
            ],
        };
        assert_eq!(decode_query(&encode_query(&request)), request);
    }

    #[test]
    fn page_url_appends_to_existing_query() -> Result<()> {
        let url = page_url("http://host/api/users?tenant=a", &PageRequest::first(2))?;
        assert_eq!(url.query(), Some("tenant=a&page=1&per_page=2"));
        Ok(())
    }

    #[test]
    fn page_url_rejects_relative_base() {
        assert!(page_url("/api/users", &PageRequest::default()).is_err());
    }
}
