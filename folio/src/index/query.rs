use tantivy::Index;
use tantivy::query::{BooleanQuery, Occur, Query, QueryParser, RegexQuery};
use tantivy::schema::Field;

/// Two-tier keyword parsing against the `content` field: the structured query
/// syntax first, then a substring match over the raw terms.
pub(super) struct KeywordQueryBuilder {
    parser: QueryParser,
    content: Field,
}

impl KeywordQueryBuilder {
    pub fn new(index: &Index, content: Field) -> Self {
        Self {
            parser: QueryParser::for_index(index, vec![content]),
            content,
        }
    }

    /// `None` means nothing searchable is left in `keywords`.
    pub fn build(&self, keywords: &str) -> Option<Box<dyn Query>> {
        match self.parser.parse_query(keywords) {
            Ok(query) => Some(query),
            Err(e) => {
                tracing::debug!(keywords, error = %e, "structured query rejected, using substring match");
                self.fallback(keywords)
            }
        }
    }

    /// Matches documents whose content contains any raw term as a substring (`*term*`).
    pub fn fallback(&self, raw: &str) -> Option<Box<dyn Query>> {
        let clauses: Vec<(Occur, Box<dyn Query>)> = fallback_terms(raw)
            .into_iter()
            .filter_map(|term| {
                let pattern = format!(".*{term}.*");
                match RegexQuery::from_pattern(&pattern, self.content) {
                    Ok(query) => Some((Occur::Should, Box::new(query) as Box<dyn Query>)),
                    Err(e) => {
                        tracing::warn!(term = %term, error = %e, "could not build substring query");
                        None
                    }
                }
            })
            .collect();

        if clauses.is_empty() {
            tracing::debug!(raw, "no searchable terms in keywords");
            return None;
        }
        Some(Box::new(BooleanQuery::new(clauses)))
    }
}

/// Lower-cased alphanumeric runs, in order of first appearance.
///
/// Splitting on every non-alphanumeric character is what escapes the terms:
/// no regex metacharacter survives into a term, so each one is a literal pattern.
pub(super) fn fallback_terms(raw: &str) -> Vec<String> {
    let mut terms: Vec<String> = Vec::new();
    for term in raw
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
    {
        if !terms.contains(&term) {
            terms.push(term);
        }
    }
    terms
}
