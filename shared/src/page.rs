use serde::{Deserialize, Serialize};

/// 分页列表信封 `{ count, next, previous, results }`
///
/// 部分端点在未分页时直接返回数组，`Deserialize` 对两种形式都兼容。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Paginated<T> {
    pub count: u64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T> Paginated<T> {
    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

impl<T> Default for Paginated<T> {
    fn default() -> Self {
        Self {
            count: 0,
            next: None,
            previous: None,
            results: Vec::new(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawPage<T> {
    Envelope {
        #[serde(default)]
        count: Option<u64>,
        #[serde(default)]
        next: Option<String>,
        #[serde(default)]
        previous: Option<String>,
        results: Vec<T>,
    },
    Plain(Vec<T>),
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Paginated<T> {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match RawPage::deserialize(deserializer)? {
            RawPage::Envelope {
                count,
                next,
                previous,
                results,
            } => Self {
                count: count.unwrap_or(results.len() as u64),
                next,
                previous,
                results,
            },
            RawPage::Plain(results) => Self {
                count: results.len() as u64,
                next: None,
                previous: None,
                results,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_and_plain_list() {
        let page: Paginated<u32> =
            serde_json::from_str(r#"{"count":42,"next":"http://x/?page=2","previous":null,"results":[1,2]}"#)
                .unwrap();
        assert_eq!(page.count, 42);
        assert!(page.has_next());
        assert_eq!(page.results, vec![1, 2]);

        let plain: Paginated<u32> = serde_json::from_str("[7,8,9]").unwrap();
        assert_eq!(plain.count, 3);
        assert!(!plain.has_next());
    }
}
