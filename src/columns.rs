//! Header resolution from human-authored CSV exports onto podcast fields.
//!
//! Each [`Field`] owns an ordered synonym list (most canonical first). Lookup
//! tries exact header matches before case-insensitive ones and never falls
//! back to substring or similarity matching, so unrelated columns cannot be
//! merged by accident.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::record::RawRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Title,
    Host,
    Country,
    Language,
    Year,
    Status,
    Categories,
    EpisodeLength,
    EpisodeCount,
    Description,
    ImageUrl,
    Website,
    Instagram,
    Twitter,
    Facebook,
    Youtube,
    Tiktok,
    Linkedin,
    Spotify,
    ApplePodcasts,
}

impl Field {
    pub const ALL: [Field; 20] = [
        Field::Title,
        Field::Host,
        Field::Country,
        Field::Language,
        Field::Year,
        Field::Status,
        Field::Categories,
        Field::EpisodeLength,
        Field::EpisodeCount,
        Field::Description,
        Field::ImageUrl,
        Field::Website,
        Field::Instagram,
        Field::Twitter,
        Field::Facebook,
        Field::Youtube,
        Field::Tiktok,
        Field::Linkedin,
        Field::Spotify,
        Field::ApplePodcasts,
    ];

    pub const SOCIAL: [Field; 9] = [
        Field::Website,
        Field::Instagram,
        Field::Twitter,
        Field::Facebook,
        Field::Youtube,
        Field::Tiktok,
        Field::Linkedin,
        Field::Spotify,
        Field::ApplePodcasts,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Host => "host",
            Field::Country => "country",
            Field::Language => "language",
            Field::Year => "year",
            Field::Status => "status",
            Field::Categories => "categories",
            Field::EpisodeLength => "episodeLength",
            Field::EpisodeCount => "episodeCount",
            Field::Description => "description",
            Field::ImageUrl => "imageUrl",
            Field::Website => "website",
            Field::Instagram => "instagram",
            Field::Twitter => "twitter",
            Field::Facebook => "facebook",
            Field::Youtube => "youtube",
            Field::Tiktok => "tiktok",
            Field::Linkedin => "linkedin",
            Field::Spotify => "spotify",
            Field::ApplePodcasts => "applePodcasts",
        }
    }

    /// Built-in header spellings, most canonical first.
    pub fn synonyms(self) -> &'static [&'static str] {
        match self {
            Field::Title => &[
                "title",
                "Title",
                "Podcast Title",
                "Podcast Name",
                "Podcast",
                "Name",
                "Titolo",
                "Título",
                "Titre",
                "Titel",
            ],
            Field::Host => &[
                "host",
                "Host",
                "Host Name",
                "Hosts",
                "Host(s)",
                "Presenter",
                "Conduttore",
                "Presentador",
                "Animateur",
                "Moderator",
            ],
            Field::Country => &[
                "country",
                "Country",
                "Country of Production",
                "nation",
                "Nation",
                "Paese",
                "País",
                "Pays",
                "Land",
            ],
            Field::Language => &[
                "language",
                "Language",
                "Lang",
                "Lingua",
                "Idioma",
                "Langue",
                "Sprache",
            ],
            Field::Year => &[
                "year",
                "Year",
                "Year Started",
                "Launch Year",
                "Start Year",
                "Anno",
                "Año",
                "Année",
                "Jahr",
            ],
            Field::Status => &["status", "Status", "Stato", "Estado", "Statut"],
            Field::Categories => &[
                "categories",
                "Categories",
                "Category",
                "Genre",
                "Genres",
                "Tags",
                "Topics",
                "Categorie",
                "Categorías",
                "Catégories",
                "Kategorien",
            ],
            Field::EpisodeLength => &[
                "episodeLength",
                "Episode Length",
                "Avg Episode Length",
                "Duration",
                "Length",
                "Durata",
                "Duración",
                "Durée",
            ],
            Field::EpisodeCount => &[
                "episodeCount",
                "Episode Count",
                "Episodes",
                "Number of Episodes",
                "# Episodes",
                "Episodi",
                "Episodios",
                "Épisodes",
            ],
            Field::Description => &[
                "description",
                "Description",
                "Summary",
                "About",
                "Descrizione",
                "Descripción",
                "Beschreibung",
            ],
            Field::ImageUrl => &[
                "imageUrl",
                "Image URL",
                "Image",
                "Cover",
                "Cover Art",
                "Artwork",
                "Logo",
                "Immagine",
            ],
            Field::Website => &["website", "Website", "Web", "URL", "Homepage", "Sito"],
            Field::Instagram => &["instagram", "Instagram", "IG"],
            Field::Twitter => &["twitter", "Twitter", "X", "X (Twitter)"],
            Field::Facebook => &["facebook", "Facebook", "FB"],
            Field::Youtube => &["youtube", "YouTube"],
            Field::Tiktok => &["tiktok", "TikTok"],
            Field::Linkedin => &["linkedin", "LinkedIn"],
            Field::Spotify => &["spotify", "Spotify", "Spotify URL"],
            Field::ApplePodcasts => &["applePodcasts", "Apple Podcasts", "iTunes", "Apple"],
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Extra header spellings per field, tried after the built-in synonyms.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HeaderAliases(BTreeMap<Field, Vec<String>>);

impl HeaderAliases {
    pub fn add(&mut self, field: Field, alias: impl Into<String>) {
        self.0.entry(field).or_default().push(alias.into());
    }

    /// Built-in synonyms followed by configured aliases.
    pub fn candidates(&self, field: Field) -> Vec<&str> {
        let mut names = field.synonyms().to_vec();
        if let Some(extra) = self.0.get(&field) {
            names.extend(extra.iter().map(String::as_str));
        }
        names
    }
}

/// Returns the first non-empty value for `candidates` in `row`, trimmed.
///
/// Candidates are first matched exactly and in order. Only when no exact
/// match carries a value is each candidate, again in order, compared
/// case-insensitively against every header (ignoring surrounding whitespace).
pub fn resolve<'r>(row: &'r RawRow, candidates: &[&str]) -> Option<&'r str> {
    let non_empty = |value: &'r str| {
        let trimmed = value.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    };

    let exact = candidates.iter().find_map(|name| {
        row.cells()
            .filter(|(header, _)| header == name)
            .find_map(|(_, value)| non_empty(value))
    });
    if exact.is_some() {
        return exact;
    }

    candidates.iter().find_map(|name| {
        row.cells()
            .filter(|(header, _)| caseless_eq(header.trim(), name))
            .find_map(|(_, value)| non_empty(value))
    })
}

/// Field a single header feeds, if any, using the same precedence as [`resolve`].
pub fn field_for_header(header: &str, aliases: &HeaderAliases) -> Option<Field> {
    let exact = Field::ALL
        .into_iter()
        .find(|field| aliases.candidates(*field).contains(&header));
    exact.or_else(|| {
        let trimmed = header.trim();
        Field::ALL.into_iter().find(|field| {
            aliases
                .candidates(*field)
                .iter()
                .any(|name| caseless_eq(trimmed, name))
        })
    })
}

/// Maps every header to the field it would feed.
pub fn map_headers(headers: &[String], aliases: &HeaderAliases) -> Vec<(String, Option<Field>)> {
    headers
        .iter()
        .map(|header| (header.clone(), field_for_header(header, aliases)))
        .collect()
}

fn caseless_eq(left: &str, right: &str) -> bool {
    left.to_lowercase() == right.to_lowercase()
}
