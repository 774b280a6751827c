use serde::Deserialize;
use serde::de::{self, DeserializeOwned, Deserializer, IgnoredAny, MapAccess, Visitor};
use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Collection,
    Environment,
    Mock,
    Monitor,
    Api,
    ApiVersion,
    Workspace,
    User,
    Schema,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Collection => "collection",
            ResourceKind::Environment => "environment",
            ResourceKind::Mock => "mock",
            ResourceKind::Monitor => "monitor",
            ResourceKind::Api => "api",
            ResourceKind::ApiVersion => "api version",
            ResourceKind::Workspace => "workspace",
            ResourceKind::User => "user",
            ResourceKind::Schema => "schema",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Collections
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct Collection {
    pub info: CollectionInfo,
    #[serde(default, deserialize_with = "nullable_seq")]
    pub item: Vec<Node>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CollectionInfo {
    #[serde(rename = "_postman_id", default)]
    pub postman_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub schema: String,
}

/// A collection tree node.
///
/// Any object carrying an `item` key is a folder, whatever that key holds;
/// everything else is a request.
#[derive(Debug, Clone)]
pub enum Node {
    Folder(ItemGroup),
    Request(Item),
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(NodeVisitor)
    }
}

/// Decodes a node in one pass over its fields, classifying it once every key
/// has been seen.
struct NodeVisitor;

impl<'de> Visitor<'de> for NodeVisitor {
    type Value = Node;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a folder or request object")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Node, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut name: Option<String> = None;
        let mut items: Option<Vec<Node>> = None;
        let mut events: Option<Vec<Event>> = None;
        let mut id: Option<Option<String>> = None;
        let mut postman_id: Option<Option<String>> = None;

        while let Some(key) = map.next_key::<String>()? {
            // an `item` key seen so far makes this a folder
            let kind = if items.is_some() || key == "item" {
                "folder"
            } else {
                "request"
            };
            let wrap = |e: A::Error| invalid(kind, name.as_deref(), e);

            match key.as_str() {
                "name" => {
                    if name.is_some() {
                        return Err(de::Error::duplicate_field("name"));
                    }
                    let value: Option<String> = map.next_value().map_err(wrap)?;
                    name = Some(value.unwrap_or_default());
                }
                "item" => {
                    if items.is_some() {
                        return Err(de::Error::duplicate_field("item"));
                    }
                    let value: Option<Vec<Node>> = map.next_value().map_err(wrap)?;
                    items = Some(value.unwrap_or_default());
                }
                "event" => {
                    if events.is_some() {
                        return Err(de::Error::duplicate_field("event"));
                    }
                    let value: Option<Vec<Event>> = map.next_value().map_err(wrap)?;
                    events = Some(value.unwrap_or_default());
                }
                "id" => {
                    if id.is_some() {
                        return Err(de::Error::duplicate_field("id"));
                    }
                    id = Some(map.next_value().map_err(wrap)?);
                }
                "_postman_id" => {
                    if postman_id.is_some() {
                        return Err(de::Error::duplicate_field("_postman_id"));
                    }
                    postman_id = Some(map.next_value().map_err(wrap)?);
                }
                _ => {
                    map.next_value::<IgnoredAny>().map_err(wrap)?;
                }
            }
        }

        let name = name.unwrap_or_default();
        let event = events.unwrap_or_default();
        Ok(match items {
            Some(item) => Node::Folder(ItemGroup { name, item, event }),
            None => Node::Request(Item {
                id: id.flatten(),
                postman_id: postman_id.flatten(),
                name,
                event,
            }),
        })
    }
}

fn invalid<E: de::Error>(kind: &str, name: Option<&str>, err: E) -> E {
    match name {
        Some(name) => E::custom(format!("invalid {kind} {name:?}: {err}")),
        None => E::custom(format!("invalid {kind}: {err}")),
    }
}

/// A folder.
#[derive(Debug, Clone)]
pub struct ItemGroup {
    pub name: String,
    pub item: Vec<Node>,
    pub event: Vec<Event>,
}

/// A request.
#[derive(Debug, Clone)]
pub struct Item {
    pub id: Option<String>,
    pub postman_id: Option<String>,
    pub name: String,
    pub event: Vec<Event>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Event {
    #[serde(default)]
    pub listen: String,
    #[serde(default)]
    pub script: Script,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Script {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type", default)]
    pub script_type: String,
    #[serde(default)]
    pub exec: Option<ScriptBody>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ScriptBody {
    Lines(Vec<String>),
    Source(String),
    Unsupported(Value),
}

impl ScriptBody {
    /// Short name of the JSON shape held by an unsupported body.
    pub fn shape(value: &Value) -> &'static str {
        match value {
            Value::Null => "null",
            Value::Bool(_) => "a boolean",
            Value::Number(_) => "a number",
            Value::String(_) => "a string",
            Value::Array(_) => "an array with non-string elements",
            Value::Object(_) => "an object",
        }
    }
}

// ============================================================================
// Other resources
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct Environment {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "nullable_seq")]
    pub values: Vec<EnvironmentValue>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EnvironmentValue {
    pub key: String,
    #[serde(default)]
    pub value: Value,
    #[serde(default)]
    pub enabled: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mock {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub collection: String,
    #[serde(default)]
    pub environment: String,
    #[serde(default)]
    pub mock_url: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Monitor {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub collection_uid: String,
    #[serde(default)]
    pub environment_uid: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Api {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub summary: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiVersion {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub api: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Workspace {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub workspace_type: String,
    #[serde(default, deserialize_with = "nullable_seq")]
    pub collections: Vec<WorkspaceEntry>,
    #[serde(default, deserialize_with = "nullable_seq")]
    pub environments: Vec<WorkspaceEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WorkspaceEntry {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub uid: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: Value,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type", default)]
    pub schema_type: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub api_version: String,
}

/// Decodes a JSON document without serde_json's nesting limit.
///
/// Collections nest folders to any depth; the stack grows on demand while
/// decoding.
pub fn from_json_str<T: DeserializeOwned>(s: &str) -> serde_json::Result<T> {
    let mut deserializer = serde_json::Deserializer::from_str(s);
    deserializer.disable_recursion_limit();
    let value = T::deserialize(serde_stacker::Deserializer::new(&mut deserializer))?;
    deserializer.end()?;
    Ok(value)
}

/// `null` and a missing key both decode to an empty list.
fn nullable_seq<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<Vec<T>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

// ============================================================================
// Tests
// ============================================================================
