use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Request payload: form-style parameters, possibly nested.
///
/// Field names use the bracket convention server-side frameworks decode into
/// nested structures: `user[email]` becomes `{user: {email: ..}}` and
/// `tags[]` becomes a list. Keys are kept sorted so two payloads built from
/// the same fields compare (and serialize) identically.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Params(BTreeMap<String, ParamValue>);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Text(String),
    List(Vec<ParamValue>),
    Map(Params),
}

impl ParamValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ParamValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Params> {
        match self {
            ParamValue::Map(p) => Some(p),
            _ => None,
        }
    }
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Set a top-level key verbatim (no bracket decoding).
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), ParamValue::Text(value.into()));
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.0.get(key)
    }

    /// Follow a path of nested keys, e.g. `["user", "text"]`.
    pub fn get_path(&self, path: &[&str]) -> Option<&ParamValue> {
        let (first, rest) = path.split_first()?;
        let value = self.0.get(*first)?;
        if rest.is_empty() {
            return Some(value);
        }
        value.as_map()?.get_path(rest)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ParamValue)> {
        self.0.iter()
    }

    /// Add a value under a bracketed field name such as `user[roles][]`.
    pub fn insert_field(&mut self, name: &str, value: impl Into<String>) {
        let segments = split_field_name(name);
        if segments.is_empty() {
            return;
        }
        insert_path(self, &segments, value.into());
    }

    /// Merge `other` into `self`; keys from `other` win.
    pub fn merge(&mut self, other: Params) {
        for (key, value) in other.0 {
            self.0.insert(key, value);
        }
    }

    /// Flatten back into `name=value` pairs in bracket notation, ready for
    /// form encoding.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        for (key, value) in &self.0 {
            flatten_into(key, value, &mut pairs);
        }
        pairs
    }
}

impl<K, V> FromIterator<(K, V)> for Params
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (k, v) in iter {
            params.insert_field(&k.into(), v);
        }
        params
    }
}

/// `user[roles][]` -> `["user", "roles", ""]`. An empty segment means "append".
fn split_field_name(name: &str) -> Vec<String> {
    let Some(open) = name.find('[') else {
        return vec![name.to_string()];
    };

    let mut segments = vec![name[..open].to_string()];
    let mut rest = &name[open..];
    while let Some(stripped) = rest.strip_prefix('[') {
        match stripped.find(']') {
            Some(close) => {
                segments.push(stripped[..close].to_string());
                rest = &stripped[close + 1..];
            }
            None => {
                // Unbalanced bracket: keep the remainder as a literal key part
                if let Some(last) = segments.last_mut() {
                    last.push_str(rest);
                }
                rest = "";
            }
        }
    }
    if !rest.is_empty() {
        if let Some(last) = segments.last_mut() {
            last.push_str(rest);
        }
    }
    segments
}

fn insert_path(params: &mut Params, segments: &[String], value: String) {
    let key = &segments[0];

    if segments.len() == 1 {
        params.0.insert(key.clone(), ParamValue::Text(value));
        return;
    }

    if segments[1].is_empty() {
        let entry = params
            .0
            .entry(key.clone())
            .or_insert_with(|| ParamValue::List(Vec::new()));
        if !matches!(entry, ParamValue::List(_)) {
            *entry = ParamValue::List(Vec::new());
        }
        if let ParamValue::List(items) = entry {
            push_list_item(items, &segments[2..], value);
        }
        return;
    }

    let entry = params
        .0
        .entry(key.clone())
        .or_insert_with(|| ParamValue::Map(Params::new()));
    if !matches!(entry, ParamValue::Map(_)) {
        *entry = ParamValue::Map(Params::new());
    }
    if let ParamValue::Map(inner) = entry {
        insert_path(inner, &segments[1..], value);
    }
}

/// `items[][name]=a&items[][qty]=1&items[][name]=b` builds two hashes: a new
/// element starts whenever the current last one already has the key.
fn push_list_item(items: &mut Vec<ParamValue>, rest: &[String], value: String) {
    if rest.is_empty() {
        items.push(ParamValue::Text(value));
        return;
    }

    let needs_new = match items.last() {
        Some(ParamValue::Map(last)) => last.0.contains_key(&rest[0]),
        _ => true,
    };
    if needs_new {
        items.push(ParamValue::Map(Params::new()));
    }
    if let Some(ParamValue::Map(last)) = items.last_mut() {
        insert_path(last, rest, value);
    }
}

fn flatten_into(prefix: &str, value: &ParamValue, pairs: &mut Vec<(String, String)>) {
    match value {
        ParamValue::Text(s) => pairs.push((prefix.to_string(), s.clone())),
        ParamValue::List(items) => {
            let list_prefix = format!("{}[]", prefix);
            for item in items {
                flatten_into(&list_prefix, item, pairs);
            }
        }
        ParamValue::Map(inner) => {
            for (key, nested) in &inner.0 {
                flatten_into(&format!("{}[{}]", prefix, key), nested, pairs);
            }
        }
    }
}
