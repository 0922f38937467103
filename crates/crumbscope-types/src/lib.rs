//! Shared types for crumbscope
//!
//! This crate contains data structures used across multiple crumbscope crates.

use chrono::{DateTime, Utc};
use ratatui::style::Color;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

// ============================================================================
// Breadcrumb Types
// ============================================================================

/// Breadcrumb severity level
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum BreadcrumbLevel {
    Fatal,
    Error,
    Warning,
    Info,
    Debug,
    #[default]
    Undefined,
}

impl BreadcrumbLevel {
    pub const ALL: [BreadcrumbLevel; 6] = [
        Self::Fatal,
        Self::Error,
        Self::Warning,
        Self::Info,
        Self::Debug,
        Self::Undefined,
    ];

    /// Parse level from its wire name (and a few common aliases)
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "fatal" | "critical" => Self::Fatal,
            "error" => Self::Error,
            "warning" | "warn" => Self::Warning,
            "info" | "log" => Self::Info,
            "debug" => Self::Debug,
            _ => Self::Undefined,
        }
    }

    /// Wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fatal => "fatal",
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Undefined => "undefined",
        }
    }

    /// Human readable label; this is what searches match against
    pub fn label(&self) -> &'static str {
        match self {
            Self::Fatal => "Fatal",
            Self::Error => "Error",
            Self::Warning => "Warning",
            Self::Info => "Info",
            Self::Debug => "Debug",
            Self::Undefined => "Undefined",
        }
    }

    /// Get display color for this level
    pub fn color(&self) -> Color {
        match self {
            Self::Fatal => Color::Magenta,
            Self::Error => Color::Red,
            Self::Warning => Color::Yellow,
            Self::Info => Color::Blue,
            Self::Debug => Color::DarkGray,
            Self::Undefined => Color::Gray,
        }
    }

    /// Severity rank, higher is more severe
    pub fn severity(&self) -> u8 {
        match self {
            Self::Debug => 0,
            Self::Undefined => 1,
            Self::Info => 2,
            Self::Warning => 3,
            Self::Error => 4,
            Self::Fatal => 5,
        }
    }
}

impl Serialize for BreadcrumbLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for BreadcrumbLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.map(|s| Self::from_str(&s)).unwrap_or_default())
    }
}

/// Breadcrumb kind tag. Drives icon and color, and the type facet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum BreadcrumbType {
    #[default]
    Default,
    Http,
    Navigation,
    Debug,
    Info,
    Error,
    Warning,
    User,
    Ui,
    Query,
    System,
    Session,
    Transaction,
    Init,
}

impl BreadcrumbType {
    pub const ALL: [BreadcrumbType; 14] = [
        Self::Default,
        Self::Http,
        Self::Navigation,
        Self::Debug,
        Self::Info,
        Self::Error,
        Self::Warning,
        Self::User,
        Self::Ui,
        Self::Query,
        Self::System,
        Self::Session,
        Self::Transaction,
        Self::Init,
    ];

    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "http" => Self::Http,
            "navigation" => Self::Navigation,
            "debug" => Self::Debug,
            "info" => Self::Info,
            "error" | "exception" => Self::Error,
            "warning" => Self::Warning,
            "user" => Self::User,
            "ui" => Self::Ui,
            "query" => Self::Query,
            "system" => Self::System,
            "session" => Self::Session,
            "transaction" => Self::Transaction,
            "init" => Self::Init,
            _ => Self::Default,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Http => "http",
            Self::Navigation => "navigation",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Error => "error",
            Self::Warning => "warning",
            Self::User => "user",
            Self::Ui => "ui",
            Self::Query => "query",
            Self::System => "system",
            Self::Session => "session",
            Self::Transaction => "transaction",
            Self::Init => "init",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Default => "Default",
            Self::Http => "HTTP",
            Self::Navigation => "Navigation",
            Self::Debug => "Debug",
            Self::Info => "Info",
            Self::Error => "Error",
            Self::Warning => "Warning",
            Self::User => "User Action",
            Self::Ui => "UI",
            Self::Query => "Query",
            Self::System => "System",
            Self::Session => "Session",
            Self::Transaction => "Transaction",
            Self::Init => "Init",
        }
    }

    /// Single-cell glyph used as the row icon
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Default => "•",
            Self::Http => "⇄",
            Self::Navigation => "➜",
            Self::Debug => "⚙",
            Self::Info => "ℹ",
            Self::Error => "✖",
            Self::Warning => "⚠",
            Self::User | Self::Ui => "☝",
            Self::Query => "⌕",
            Self::System => "▣",
            Self::Session => "◷",
            Self::Transaction => "⇢",
            Self::Init => "★",
        }
    }

    pub fn color(&self) -> Color {
        match self {
            Self::Error => Color::Red,
            Self::Warning => Color::Yellow,
            Self::Http | Self::Navigation => Color::Green,
            Self::User | Self::Ui => Color::Magenta,
            Self::Debug | Self::System => Color::DarkGray,
            Self::Info | Self::Query => Color::Blue,
            Self::Session | Self::Transaction | Self::Init => Color::Cyan,
            Self::Default => Color::Gray,
        }
    }
}

impl Serialize for BreadcrumbType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for BreadcrumbType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.map(|s| Self::from_str(&s)).unwrap_or_default())
    }
}

/// A single breadcrumb
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Breadcrumb {
    #[serde(default)]
    pub message: Option<String>,

    #[serde(default)]
    pub category: Option<String>,

    #[serde(default)]
    pub level: BreadcrumbLevel,

    #[serde(rename = "type", default)]
    pub kind: BreadcrumbType,

    /// ISO-like timestamp text; numeric epoch seconds are converted on read
    #[serde(default, deserialize_with = "timestamp_text")]
    pub timestamp: Option<String>,

    /// Free-form payload attached by the producer
    #[serde(default)]
    pub data: Option<Value>,

    #[serde(default)]
    pub event_id: Option<String>,
}

impl Breadcrumb {
    /// Create a breadcrumb with a message and level
    pub fn new(message: impl Into<String>, level: BreadcrumbLevel) -> Self {
        Self {
            message: Some(message.into()),
            level,
            ..Self::default()
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_kind(mut self, kind: BreadcrumbType) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Parsed timestamp, if present and well formed
    pub fn parsed_timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamp.as_deref().and_then(parse_timestamp)
    }
}

/// Parse an ISO-like timestamp. Accepts RFC 3339 and naive `YYYY-MM-DDTHH:MM:SS[.fff]`
/// (interpreted as UTC).
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Some(ts.with_timezone(&Utc));
    }
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

fn timestamp_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => n.as_f64().and_then(|secs| {
            let millis = (secs * 1000.0).round() as i64;
            DateTime::<Utc>::from_timestamp_millis(millis).map(|ts| ts.to_rfc3339())
        }),
        _ => None,
    })
}

/// Point-in-time snapshot of the event the breadcrumbs belong to.
/// Feeds the synthetic last crumb.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EventSnapshot {
    pub event_id: Option<String>,
    pub title: Option<String>,
    pub message: Option<String>,
    pub level: BreadcrumbLevel,
    pub date_created: Option<String>,
    /// Whether the event carries an exception (vs. a plain message)
    pub is_exception: bool,
}

// ============================================================================
// Custom Repository Types
// ============================================================================

/// Repository kinds offered in the "Add Repository" menu
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RepoKind {
    Http,
    S3,
    Gcs,
    AppStoreConnect,
    /// A type this client doesn't know; kept and written back as-is
    Unsupported,
}

impl RepoKind {
    /// Kinds that can be added from the menu
    pub const ALL: [RepoKind; 4] = [Self::AppStoreConnect, Self::Http, Self::S3, Self::Gcs];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::S3 => "s3",
            Self::Gcs => "gcs",
            Self::AppStoreConnect => "appStoreConnect",
            Self::Unsupported => "unsupported",
        }
    }

    /// Kind for a wire `type` tag
    pub fn from_type(tag: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == tag)
            .unwrap_or(Self::Unsupported)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Http => "SymbolServer (HTTP)",
            Self::S3 => "Amazon S3",
            Self::Gcs => "Google Cloud Storage",
            Self::AppStoreConnect => "App Store Connect",
            Self::Unsupported => "Unsupported",
        }
    }

    /// Extra words the menu search matches on
    pub fn search_key(&self) -> &'static str {
        match self {
            Self::Http => "http symbol server ssqp symstore symsrv",
            Self::S3 => "aws amazon s3 bucket",
            Self::Gcs => "gcs google cloud storage bucket",
            Self::AppStoreConnect => "apple store connect itunes ios",
            Self::Unsupported => "",
        }
    }

    /// Repositories of this kind are synced by the backend; removing one
    /// requires a full reload.
    pub fn requires_sync(&self) -> bool {
        matches!(self, Self::AppStoreConnect)
    }

    /// Label of the field shown as the repository's locator
    pub fn locator_label(&self) -> &'static str {
        match self {
            Self::Http => "URL",
            Self::S3 | Self::Gcs => "Bucket",
            Self::AppStoreConnect => "App",
            Self::Unsupported => "Type",
        }
    }
}

/// Directory layout of a symbol server
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutType {
    #[default]
    Native,
    Symstore,
    SymstoreIndex2,
    Ssqp,
    Unified,
    Debuginfod,
}

/// Path casing of a symbol server
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Casing {
    #[default]
    Default,
    Lowercase,
    Uppercase,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Layout {
    #[serde(rename = "type", default)]
    pub layout_type: LayoutType,
    #[serde(default)]
    pub casing: Casing,
}

/// A secret field. The server never echoes secrets back; it returns a
/// `{"hidden-secret": true}` marker that must be sent back unchanged to keep
/// the stored value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Secret {
    Plain(String),
    Hidden {
        #[serde(rename = "hidden-secret")]
        hidden_secret: bool,
    },
}

impl Secret {
    pub fn hidden() -> Self {
        Self::Hidden {
            hidden_secret: true,
        }
    }
}

/// Per-kind repository configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RepoSource {
    #[serde(rename = "http")]
    Http {
        url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        username: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        password: Option<Secret>,
        #[serde(default)]
        layout: Layout,
    },
    #[serde(rename = "s3")]
    S3 {
        bucket: String,
        #[serde(default)]
        region: String,
        #[serde(default)]
        access_key: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        secret_key: Option<Secret>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        prefix: Option<String>,
        #[serde(default)]
        layout: Layout,
    },
    #[serde(rename = "gcs")]
    Gcs {
        bucket: String,
        #[serde(default)]
        client_email: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        private_key: Option<Secret>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        prefix: Option<String>,
        #[serde(default)]
        layout: Layout,
    },
    #[serde(rename = "appStoreConnect")]
    AppStoreConnect {
        #[serde(rename = "appId", default)]
        app_id: String,
        #[serde(rename = "appName", default)]
        app_name: String,
        #[serde(rename = "bundleId", default)]
        bundle_id: String,
        #[serde(rename = "appconnectIssuer", default)]
        issuer: String,
        #[serde(rename = "appconnectKey", default)]
        key_id: String,
        #[serde(
            rename = "appconnectPrivateKey",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        private_key: Option<Secret>,
    },
    /// Unknown `type`; everything but the tag lives in [`CustomRepo::extra`]
    #[serde(skip)]
    Unsupported { kind: String },
}

impl RepoSource {
    /// Empty configuration for a freshly added repository of `kind`
    pub fn empty(kind: RepoKind) -> Self {
        match kind {
            RepoKind::Http => Self::Http {
                url: String::new(),
                username: None,
                password: None,
                layout: Layout::default(),
            },
            RepoKind::S3 => Self::S3 {
                bucket: String::new(),
                region: String::new(),
                access_key: String::new(),
                secret_key: None,
                prefix: None,
                layout: Layout::default(),
            },
            RepoKind::Gcs => Self::Gcs {
                bucket: String::new(),
                client_email: String::new(),
                private_key: None,
                prefix: None,
                layout: Layout::default(),
            },
            RepoKind::AppStoreConnect => Self::AppStoreConnect {
                app_id: String::new(),
                app_name: String::new(),
                bundle_id: String::new(),
                issuer: String::new(),
                key_id: String::new(),
                private_key: None,
            },
            RepoKind::Unsupported => Self::Unsupported {
                kind: String::new(),
            },
        }
    }

    pub fn kind(&self) -> RepoKind {
        match self {
            Self::Http { .. } => RepoKind::Http,
            Self::S3 { .. } => RepoKind::S3,
            Self::Gcs { .. } => RepoKind::Gcs,
            Self::AppStoreConnect { .. } => RepoKind::AppStoreConnect,
            Self::Unsupported { .. } => RepoKind::Unsupported,
        }
    }

    /// The field that identifies where symbols come from
    pub fn locator(&self) -> &str {
        match self {
            Self::Http { url, .. } => url,
            Self::S3 { bucket, .. } | Self::Gcs { bucket, .. } => bucket,
            Self::AppStoreConnect { app_name, .. } => app_name,
            Self::Unsupported { kind } => kind,
        }
    }

    /// No-op for unsupported kinds
    pub fn set_locator(&mut self, value: String) {
        match self {
            Self::Http { url, .. } => *url = value,
            Self::S3 { bucket, .. } | Self::Gcs { bucket, .. } => *bucket = value,
            Self::AppStoreConnect { app_name, .. } => *app_name = value,
            Self::Unsupported { .. } => {}
        }
    }

    /// One-line summary for list display
    pub fn details(&self) -> String {
        match self {
            Self::Http { url, .. } => url.clone(),
            Self::S3 { bucket, prefix, .. } => {
                format!("s3://{}/{}", bucket, prefix.as_deref().unwrap_or(""))
            }
            Self::Gcs { bucket, prefix, .. } => {
                format!("gs://{}/{}", bucket, prefix.as_deref().unwrap_or(""))
            }
            Self::AppStoreConnect {
                app_name,
                bundle_id,
                ..
            } => format!("{} ({})", app_name, bundle_id),
            Self::Unsupported { kind } => format!("unsupported type `{}`", kind),
        }
    }
}

/// A custom debug-file repository configured on a project.
///
/// The whole list is replaced on every save, so fields this client doesn't
/// model are kept in `extra` and written back untouched.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct CustomRepo {
    pub id: String,
    pub name: String,
    pub source: RepoSource,
    pub extra: Map<String, Value>,
}

impl CustomRepo {
    pub fn new(id: impl Into<String>, name: impl Into<String>, source: RepoSource) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            source,
            extra: Map::new(),
        }
    }

    pub fn kind(&self) -> RepoKind {
        self.source.kind()
    }
}

fn take_string(fields: &mut Map<String, Value>, key: &str) -> Result<String, String> {
    match fields.remove(key) {
        Some(Value::String(value)) => Ok(value),
        Some(other) => Err(format!("invalid `{}`: {}", key, other)),
        None => Err(format!("missing field `{}`", key)),
    }
}

impl TryFrom<Map<String, Value>> for CustomRepo {
    type Error = String;

    fn try_from(mut fields: Map<String, Value>) -> Result<Self, Self::Error> {
        let id = take_string(&mut fields, "id")?;
        let name = take_string(&mut fields, "name").unwrap_or_default();
        let tag = take_string(&mut fields, "type")?;

        let source = match RepoKind::from_type(&tag) {
            RepoKind::Unsupported => RepoSource::Unsupported { kind: tag },
            _ => {
                let mut tagged = fields.clone();
                tagged.insert("type".to_string(), Value::String(tag));
                serde_json::from_value(Value::Object(tagged)).map_err(|e| e.to_string())?
            }
        };

        // Whatever the source writes back itself is modelled
        if let Ok(Value::Object(modelled)) = serde_json::to_value(&source) {
            fields.retain(|key, _| !modelled.contains_key(key));
        }

        Ok(Self {
            id,
            name,
            source,
            extra: fields,
        })
    }
}

impl From<CustomRepo> for Map<String, Value> {
    fn from(repo: CustomRepo) -> Self {
        let mut fields = repo.extra;
        match &repo.source {
            RepoSource::Unsupported { kind } => {
                fields.insert("type".to_string(), Value::String(kind.clone()));
            }
            source => {
                if let Ok(Value::Object(modelled)) = serde_json::to_value(source) {
                    fields.extend(modelled);
                }
            }
        }
        fields.insert("id".to_string(), Value::String(repo.id));
        fields.insert("name".to_string(), Value::String(repo.name));
        fields
    }
}
