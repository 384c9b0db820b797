//! Search and filtering over stored podcasts for the `list` command.

use crate::record::Podcast;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogQuery {
    /// Case-insensitive substring over title, host and description.
    pub search: Option<String>,
    pub country: Option<String>,
    pub language: Option<String>,
    pub status: Option<String>,
    pub category: Option<String>,
    pub limit: Option<usize>,
}

impl CatalogQuery {
    pub fn matches(&self, podcast: &Podcast) -> bool {
        let record = &podcast.record;
        if let Some(needle) = non_blank(&self.search) {
            let needle = needle.to_lowercase();
            let haystacks = [
                Some(record.title.as_str()),
                Some(record.host.as_str()),
                record.description.as_deref(),
            ];
            if !haystacks
                .into_iter()
                .flatten()
                .any(|text| text.to_lowercase().contains(&needle))
            {
                return false;
            }
        }
        let exact = |wanted: &Option<String>, actual: &str| {
            non_blank(wanted).is_none_or(|wanted| wanted.eq_ignore_ascii_case(actual.trim()))
        };
        exact(&self.country, &record.country)
            && exact(&self.language, &record.language)
            && exact(&self.status, &record.status)
            && non_blank(&self.category).is_none_or(|wanted| {
                record
                    .categories
                    .iter()
                    .any(|category| category.eq_ignore_ascii_case(wanted))
            })
    }

    /// Matching podcasts ordered by title, then host.
    pub fn apply<'a>(&self, podcasts: &'a [Podcast]) -> Vec<&'a Podcast> {
        let mut found = podcasts
            .iter()
            .filter(|podcast| self.matches(podcast))
            .collect::<Vec<_>>();
        found.sort_by(|a, b| a.identity_key.cmp(&b.identity_key));
        if let Some(limit) = self.limit {
            found.truncate(limit);
        }
        found
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
