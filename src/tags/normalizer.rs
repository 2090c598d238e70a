use std::collections::HashSet;

/// Cleans up model output into `#tag` form.
///
/// Models sometimes drop the pound sign, use spaces, or add punctuation; the
/// normalizer fixes that without touching case (lowercase mode is a
/// separate, user-controlled step).
pub struct TagNormalizer;

impl TagNormalizer {
    /// Normalizes a single tag.
    ///
    /// # Normalization rules
    ///
    /// - Trims whitespace and leading pound signs, then adds exactly one `#`
    /// - Replaces inner whitespace with hyphens
    /// - Keeps letters, digits, `-`, `_` and `/`; drops everything else
    /// - Collapses repeated hyphens and trims hyphens at the ends
    ///
    /// Returns an empty string when nothing is left.
    ///
    /// # Examples
    ///
    /// ```
    /// use aitagger::tags::TagNormalizer;
    ///
    /// assert_eq!(TagNormalizer::normalize_tag("redis"), "#redis");
    /// assert_eq!(TagNormalizer::normalize_tag("  #Machine Learning "), "#Machine-Learning");
    /// assert_eq!(TagNormalizer::normalize_tag("##node.js"), "#nodejs");
    /// assert_eq!(TagNormalizer::normalize_tag("#dev/rust"), "#dev/rust");
    /// assert_eq!(TagNormalizer::normalize_tag("#!!"), "");
    /// ```
    #[must_use]
    pub fn normalize_tag(tag: &str) -> String {
        let body = tag
            .trim()
            .trim_start_matches('#')
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("-")
            .chars()
            .filter(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '/'))
            .collect::<String>();

        let collapsed = body
            .split('-')
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("-");

        if collapsed.is_empty() {
            String::new()
        } else {
            format!("#{collapsed}")
        }
    }

    /// Normalizes a list, dropping empties and case-insensitive duplicates
    /// (first occurrence wins, order kept).
    #[must_use]
    pub fn normalize_tags<I, S>(tags: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::normalize_tags_known(tags, &[])
    }

    /// Like [`normalize_tags`](Self::normalize_tags), but a tag that already
    /// exists in `known` is kept as written instead of being cleaned up, so
    /// tags such as `#node.js` survive a round trip through the model.
    #[must_use]
    pub fn normalize_tags_known<I, S>(tags: I, known: &[String]) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let known: HashSet<String> = known
            .iter()
            .map(|tag| format!("#{}", tag.trim().trim_start_matches('#')).to_lowercase())
            .collect();

        let mut seen = HashSet::new();
        tags.into_iter()
            .map(|tag| {
                let candidate = format!("#{}", tag.as_ref().trim().trim_start_matches('#'));
                if candidate.len() > 1 && known.contains(&candidate.to_lowercase()) {
                    candidate
                } else {
                    Self::normalize_tag(&candidate)
                }
            })
            .filter(|tag| !tag.is_empty() && seen.insert(tag.to_lowercase()))
            .collect()
    }
}
