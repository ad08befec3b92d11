//! Section name filtering.
//!
//! Users pick which library sections take part in a sync by listing their
//! names. Plain names form an allow-list, names prefixed with `-` are
//! excluded, and an empty list lets every section through.

/// Predicate over library section titles
pub trait SectionNameFilter: Send + Sync {
    fn is_valid_section_name(&self, title: &str) -> bool;
}

impl<F> SectionNameFilter for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn is_valid_section_name(&self, title: &str) -> bool {
        self(title)
    }
}

/// Name-convention filter built from the user's section list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionFilter {
    allowed: Vec<String>,
    excluded: Vec<String>,
}

impl SectionFilter {
    /// Filter that accepts every section
    pub fn allow_all() -> Self {
        Self::default()
    }

    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut filter = Self::default();

        for name in names {
            let name = normalize(name.as_ref());

            if let Some(excluded) = name.strip_prefix('-') {
                let excluded = excluded.trim();
                if !excluded.is_empty() {
                    filter.excluded.push(excluded.to_string());
                }
            } else if !name.is_empty() {
                filter.allowed.push(name);
            }
        }

        filter
    }

    /// Parse a comma separated list, e.g. `"Movies, -Home Videos"`
    pub fn parse(list: &str) -> Self {
        Self::from_names(list.split(','))
    }
}

impl SectionNameFilter for SectionFilter {
    fn is_valid_section_name(&self, title: &str) -> bool {
        let title = normalize(title);

        if self.excluded.iter().any(|name| *name == title) {
            return false;
        }

        self.allowed.is_empty() || self.allowed.iter().any(|name| *name == title)
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}
