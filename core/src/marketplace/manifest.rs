use serde_json::{Map, Value};

const REMOTE_PREFIXES: &[&str] = &["http", "git@"];

/// Where a marketplace entry's package lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluginSource<'a> {
    /// A path relative to the repository root.
    Local(&'a str),
    /// A URL, git remote, or structured (non-string) source.
    Remote,
}

impl<'a> PluginSource<'a> {
    pub fn from_value(value: Option<&'a Value>) -> Self {
        match value.and_then(Value::as_str) {
            Some(source) if !is_remote(source) => PluginSource::Local(source),
            _ => PluginSource::Remote,
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(self, PluginSource::Local(_))
    }
}

fn is_remote(source: &str) -> bool {
    REMOTE_PREFIXES.iter().any(|p| source.starts_with(p)) || source.contains("://")
}

/// The parsed `marketplace.json` document.
///
/// Holds the raw top-level object so that unknown fields and key order are
/// written back exactly as they were read.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketplaceManifest {
    document: Map<String, Value>,
}

impl MarketplaceManifest {
    pub fn parse(content: &str) -> Result<Self, String> {
        let value: Value = serde_json::from_str(content).map_err(|e| e.to_string())?;

        let Value::Object(document) = value else {
            return Err("top-level value is not an object".to_string());
        };

        match document.get("plugins") {
            Some(Value::Array(plugins)) => {
                if let Some(index) = plugins.iter().position(|p| !p.is_object()) {
                    return Err(format!("plugins[{}] is not an object", index));
                }
            }
            Some(_) => return Err("'plugins' is not an array".to_string()),
            None => return Err("missing 'plugins' array".to_string()),
        }

        Ok(Self { document })
    }

    /// Two-space indented JSON with a trailing newline.
    pub fn to_pretty_string(&self) -> serde_json::Result<String> {
        let mut out = serde_json::to_string_pretty(&self.document)?;
        out.push('\n');
        Ok(out)
    }

    pub fn plugins(&self) -> impl Iterator<Item = &Map<String, Value>> {
        self.plugin_values().iter().filter_map(Value::as_object)
    }

    pub fn plugins_mut(&mut self) -> impl Iterator<Item = PluginEntry<'_>> {
        self.document
            .get_mut("plugins")
            .and_then(Value::as_array_mut)
            .map(|plugins| plugins.as_mut_slice())
            .unwrap_or_default()
            .iter_mut()
            .filter_map(Value::as_object_mut)
            .map(|fields| PluginEntry { fields })
    }

    pub fn len(&self) -> usize {
        self.plugin_values().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn plugin_values(&self) -> &[Value] {
        self.document
            .get("plugins")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// A mutable view over one entry of the `plugins` array.
#[derive(Debug)]
pub struct PluginEntry<'a> {
    fields: &'a mut Map<String, Value>,
}

impl PluginEntry<'_> {
    pub fn name(&self) -> &str {
        self.fields
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or("unnamed")
    }

    pub fn source(&self) -> PluginSource<'_> {
        PluginSource::from_value(self.fields.get("source"))
    }

    pub fn version(&self) -> Option<&str> {
        self.fields.get("version").and_then(Value::as_str)
    }

    /// Replaces the version in place; an entry without one gets it appended.
    pub fn set_version(&mut self, version: &str) {
        self.fields
            .insert("version".to_string(), Value::String(version.to_string()));
    }
}

/// The subset of a package's `package.json` the sync reads.
#[derive(Debug, Clone, Default)]
pub struct PackageManifest {
    version: Option<Value>,
}

impl PackageManifest {
    pub fn parse(content: &str) -> Result<Self, String> {
        match serde_json::from_str::<Value>(content).map_err(|e| e.to_string())? {
            Value::Object(fields) => Ok(Self {
                version: fields.get("version").cloned(),
            }),
            _ => Err("top-level value is not an object".to_string()),
        }
    }

    /// The declared version, if it is a non-empty string.
    pub fn version(&self) -> Option<&str> {
        self.version
            .as_ref()
            .and_then(Value::as_str)
            .filter(|v| !v.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn classifies_sources() {
        let local = json!("./plugins/x");
        let bare = json!("x");
        let https = json!("https://github.com/acme/x");
        let ssh = json!("git@github.com:acme/x.git");
        let git = json!("git://example.com/x");
        let structured = json!({ "source": "github", "repo": "acme/x" });

        assert_eq!(
            PluginSource::from_value(Some(&local)),
            PluginSource::Local("./plugins/x")
        );
        assert_eq!(PluginSource::from_value(Some(&bare)), PluginSource::Local("x"));
        assert_eq!(PluginSource::from_value(Some(&https)), PluginSource::Remote);
        assert_eq!(PluginSource::from_value(Some(&ssh)), PluginSource::Remote);
        assert_eq!(PluginSource::from_value(Some(&git)), PluginSource::Remote);
        assert_eq!(PluginSource::from_value(Some(&structured)), PluginSource::Remote);
        assert_eq!(PluginSource::from_value(None), PluginSource::Remote);
        assert!(PluginSource::from_value(Some(&local)).is_local());
        assert!(!PluginSource::from_value(Some(&https)).is_local());
    }

    #[test]
    fn rejects_malformed_documents() {
        assert!(MarketplaceManifest::parse("{ not json").is_err());
        assert!(MarketplaceManifest::parse("[]").is_err());
        assert!(MarketplaceManifest::parse(r#"{"name":"m"}"#).is_err());
        assert!(MarketplaceManifest::parse(r#"{"plugins":{}}"#).is_err());
        assert!(MarketplaceManifest::parse(r#"{"plugins":["x"]}"#).is_err());
        assert!(MarketplaceManifest::parse(r#"{"plugins":[]}"#).unwrap().is_empty());
    }

    #[test]
    fn preserves_key_order_when_reserialized() {
        let input = r#"{
  "name": "market",
  "owner": {
    "name": "acme"
  },
  "plugins": [
    {
      "source": "./x",
      "name": "x",
      "version": "1.0.0",
      "description": "first"
    }
  ]
}
"#;
        let manifest = MarketplaceManifest::parse(input).unwrap();
        assert_eq!(manifest.to_pretty_string().unwrap(), input);
    }

    #[test]
    fn set_version_only_touches_version() {
        let mut manifest = MarketplaceManifest::parse(
            r#"{"plugins":[{"name":"x","source":"./x","version":"1.0.0","tags":["a"]}]}"#,
        )
        .unwrap();

        for mut entry in manifest.plugins_mut() {
            entry.set_version("2.0.0");
        }

        let entry = manifest.plugins().next().unwrap();
        let keys: Vec<&str> = entry.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["name", "source", "version", "tags"]);
        assert_eq!(entry["version"], "2.0.0");
        assert_eq!(entry["tags"], json!(["a"]));
    }

    #[test]
    fn package_version_must_be_a_non_empty_string() {
        assert_eq!(
            PackageManifest::parse(r#"{"version":"1.2.3"}"#).unwrap().version(),
            Some("1.2.3")
        );
        assert_eq!(PackageManifest::parse(r#"{"name":"x"}"#).unwrap().version(), None);
        assert_eq!(PackageManifest::parse(r#"{"version":""}"#).unwrap().version(), None);
        assert_eq!(PackageManifest::parse(r#"{"version":3}"#).unwrap().version(), None);
        assert!(PackageManifest::parse("[1, 2]").is_err());
    }
}
