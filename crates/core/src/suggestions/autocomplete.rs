use super::dictionary::{CONDITIONS, EXTRA_DIAGNOSES, EXTRA_MEDICINES, FREQUENCIES, ROUTES};
use super::normalize::normalize;
use crate::constants::{DEFAULT_AUTOCOMPLETE_LIMIT, MAX_AUTOCOMPLETE_LIMIT};
use api_shared::dto::AutocompleteField;

/// Candidate strings for a form field, in dictionary order.
fn candidates(field: AutocompleteField) -> Vec<&'static str> {
    match field {
        AutocompleteField::Diagnosis => CONDITIONS
            .iter()
            .flat_map(|c| [c.name, c.name_en])
            .chain(EXTRA_DIAGNOSES.iter().copied())
            .collect(),
        AutocompleteField::Medicine => CONDITIONS
            .iter()
            .flat_map(|c| c.medicines.iter().map(|m| m.name))
            .chain(EXTRA_MEDICINES.iter().copied())
            .collect(),
        AutocompleteField::Symptom => CONDITIONS
            .iter()
            .flat_map(|c| c.keywords.iter().copied())
            .collect(),
        AutocompleteField::Frequency => FREQUENCIES.to_vec(),
        AutocompleteField::Route => ROUTES.to_vec(),
    }
}

/// Suggests completions for `query` in the given field.
///
/// Matching is case-insensitive and script-folded. Entries starting with the query come
/// before entries merely containing it; within each group dictionary order is kept.
/// `limit` defaults to [`DEFAULT_AUTOCOMPLETE_LIMIT`] and is capped at
/// [`MAX_AUTOCOMPLETE_LIMIT`].
pub fn autocomplete(field: AutocompleteField, query: &str, limit: Option<usize>) -> Vec<String> {
    let query = normalize(query);
    if query.is_empty() {
        return Vec::new();
    }
    let limit = limit
        .unwrap_or(DEFAULT_AUTOCOMPLETE_LIMIT)
        .clamp(1, MAX_AUTOCOMPLETE_LIMIT);

    let mut prefix: Vec<&str> = Vec::new();
    let mut contains: Vec<&str> = Vec::new();
    for candidate in candidates(field) {
        if prefix.contains(&candidate) || contains.contains(&candidate) {
            continue;
        }
        let folded = normalize(candidate);
        if folded.starts_with(&query) {
            prefix.push(candidate);
        } else if folded.contains(&query) {
            contains.push(candidate);
        }
    }

    prefix
        .into_iter()
        .chain(contains)
        .take(limit)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_matches_rank_before_substring_matches() {
        let res = autocomplete(AutocompleteField::Medicine, "cet", None);
        assert_eq!(res.first().map(String::as_str), Some("Cetirizine"));

        let res = autocomplete(AutocompleteField::Diagnosis, "fever", None);
        assert_eq!(res, vec!["Typhoid fever".to_string()]);
    }

    #[test]
    fn matching_is_case_insensitive_and_deduplicated() {
        let res = autocomplete(AutocompleteField::Medicine, "PARA", None);
        assert_eq!(res, vec!["Paracetamol".to_string()]);
    }

    #[test]
    fn persian_query_matches_persian_entries() {
        let res = autocomplete(AutocompleteField::Frequency, "روزانه", None);
        assert_eq!(res.len(), 3);
        assert!(res.iter().all(|s| s.starts_with("روزانه")));

        let res = autocomplete(AutocompleteField::Symptom, "درد", Some(50));
        assert!(res.contains(&"درد سر".to_string()));
        assert!(res.contains(&"سردرد".to_string()));
        let first_contains = res.iter().position(|s| !s.starts_with("درد"));
        let last_prefix = res.iter().rposition(|s| s.starts_with("درد"));
        if let (Some(first_contains), Some(last_prefix)) = (first_contains, last_prefix) {
            assert!(last_prefix < first_contains);
        }
    }

    #[test]
    fn limit_is_applied_and_empty_query_returns_nothing() {
        assert_eq!(autocomplete(AutocompleteField::Route, "i", Some(2)).len(), 2);
        assert!(autocomplete(AutocompleteField::Route, "   ", None).is_empty());
        assert_eq!(
            autocomplete(AutocompleteField::Diagnosis, "a", Some(0)).len(),
            1
        );
    }
}
