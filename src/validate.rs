//! Row validation: resolved header values to a typed [`CandidateRecord`].
//!
//! Only a missing title or host rejects a row. Every other field has a soft
//! default, and unparseable numbers fall back instead of failing.

use std::collections::BTreeMap;

use itertools::Itertools;

use crate::{
    columns::{Field, HeaderAliases, resolve},
    config::FieldDefaults,
    error::RowError,
    record::{CandidateRecord, RawRow},
};

/// Validates one data row. `row_number` is 1-based and excludes the header.
pub fn validate_row(
    row: &RawRow,
    row_number: usize,
    aliases: &HeaderAliases,
    defaults: &FieldDefaults,
) -> Result<CandidateRecord, RowError> {
    let lookup = |field: Field| resolve(row, &aliases.candidates(field));

    let title = require(row_number, Field::Title, lookup(Field::Title), aliases)?;
    let host = require(row_number, Field::Host, lookup(Field::Host), aliases)?;

    let social_links = Field::SOCIAL
        .into_iter()
        .filter_map(|field| lookup(field).map(|url| (field.name().to_string(), url.to_string())))
        .collect::<BTreeMap<_, _>>();

    Ok(CandidateRecord {
        title: title.to_string(),
        host: host.to_string(),
        country: or_default(lookup(Field::Country), &defaults.country),
        language: or_default(lookup(Field::Language), &defaults.language),
        year: lookup(Field::Year)
            .and_then(parse_year)
            .unwrap_or_else(|| defaults.year()),
        status: or_default(lookup(Field::Status), &defaults.status),
        categories: lookup(Field::Categories)
            .map(split_categories)
            .unwrap_or_default(),
        episode_length: lookup(Field::EpisodeLength).map(str::to_string),
        episode_count: lookup(Field::EpisodeCount).and_then(|raw| raw.parse::<u32>().ok()),
        description: lookup(Field::Description).map(str::to_string),
        image_url: lookup(Field::ImageUrl).map(str::to_string),
        social_links,
    })
}

/// Splits a comma-separated category list, keeping order and duplicates.
pub fn split_categories(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_year(raw: &str) -> Option<i32> {
    raw.trim().parse::<i32>().ok()
}

fn require<'a>(
    row: usize,
    field: Field,
    value: Option<&'a str>,
    aliases: &HeaderAliases,
) -> Result<&'a str, RowError> {
    value.ok_or_else(|| RowError::MissingField {
        row,
        field,
        accepted: aliases.candidates(field).iter().join(", "),
    })
}

fn or_default(value: Option<&str>, fallback: &str) -> String {
    value.unwrap_or(fallback).to_string()
}
