use url::form_urlencoded;

/// Raw list query parameters, in request order.
///
/// When a key repeats, the last value wins. Values are echoed back verbatim so
/// a renderer can reproduce the filter form and build page links.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListParams {
    pairs: Vec<(String, String)>,
}

impl ListParams {
    pub fn new(pairs: Vec<(String, String)>) -> Self {
        Self { pairs }
    }

    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        Self::new(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    /// Parses an `a=1&b=2` query string.
    pub fn parse(query: &str) -> Self {
        Self::new(form_urlencoded::parse(query.as_bytes()).into_owned().collect())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// The trimmed value for `key`, or `None` when missing or blank.
    pub fn non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).map(str::trim).filter(|v| !v.is_empty())
    }

    /// The raw value for `key`, or an empty string.
    pub fn echo(&self, key: &str) -> String {
        self.get(key).unwrap_or_default().to_string()
    }

    /// Parses the value for `key`, treating blank or unparsable input as absent.
    pub fn parse_lenient<T: std::str::FromStr>(&self, key: &str) -> Option<T> {
        self.non_empty(key).and_then(|v| v.parse::<T>().ok())
    }

    /// Every non-empty parameter except `page`, form-urlencoded, for building
    /// page links that keep the current filters.
    pub fn query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (index, (key, value)) in self.pairs.iter().enumerate() {
            if key == "page" || value.is_empty() {
                continue;
            }
            let last = self.pairs.iter().rposition(|(k, _)| k == key);
            if last == Some(index) {
                serializer.append_pair(key, value);
            }
        }
        serializer.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_value_wins() {
        let params = ListParams::parse("q=a&q=b");
        assert_eq!(params.get("q"), Some("b"));
        assert_eq!(params.query_string(), "q=b");
    }

    #[test]
    fn test_non_empty_trims_and_drops_blank() {
        let params = ListParams::from_pairs(&[("q", "  calle "), ("owner", "   ")]);
        assert_eq!(params.non_empty("q"), Some("calle"));
        assert_eq!(params.non_empty("owner"), None);
        assert_eq!(params.non_empty("missing"), None);
    }

    #[test]
    fn test_parse_lenient_ignores_garbage() {
        let params = ListParams::from_pairs(&[("area_min", "70"), ("area_max", "lots")]);
        assert_eq!(params.parse_lenient::<f64>("area_min"), Some(70.0));
        assert_eq!(params.parse_lenient::<f64>("area_max"), None);
    }

    #[test]
    fn test_query_string_skips_page_and_empty() {
        let params = ListParams::parse("q=calle+mayor&page=3&category=&rented=yes");
        assert_eq!(params.query_string(), "q=calle+mayor&rented=yes");
        assert_eq!(params.echo("category"), "");
        assert_eq!(params.echo("q"), "calle mayor");
    }
}
