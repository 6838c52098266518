use serde::{Deserialize, Serialize, Serializer};

/// node id
pub type NodeId = String;

/// Parameters attached to a function-call node.
pub type Params = serde_json::Map<String, serde_json::Value>;

/// Canvas coordinates of a node. Meaningless to the backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(
        x: f64,
        y: f64,
    ) -> Self {
        Self {
            x,
            y,
        }
    }
}

/// A node as the rule-engine service stores it.
///
/// Decoding is lenient: stored graphs written by older editors carry the
/// canvas shape (`type`, `position`, `data.label`) instead of a flat
/// `function_name`, and both are accepted. Only `position` survives from the
/// canvas shape; everything else UI-only is dropped.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawNode")]
pub struct PersistedNode {
    pub id: NodeId,
    pub function_name: String,
    pub params: Params,
    /// Canvas position if the stored payload carried one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

impl PersistedNode {
    pub fn new(
        id: impl Into<NodeId>,
        function_name: impl Into<String>,
        params: Params,
    ) -> Self {
        Self {
            id: id.into(),
            function_name: function_name.into(),
            params,
            position: None,
        }
    }
}

#[derive(Serialize)]
struct WireNode<'a> {
    id: &'a str,
    function_name: &'a str,
    params: &'a Params,
    data: WireNodeData<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    position: Option<Position>,
}

#[derive(Serialize)]
struct WireNodeData<'a> {
    function_name: &'a str,
    params: &'a Params,
}

impl Serialize for PersistedNode {
    fn serialize<S: Serializer>(
        &self,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        WireNode {
            id: &self.id,
            function_name: &self.function_name,
            params: &self.params,
            data: WireNodeData {
                function_name: &self.function_name,
                params: &self.params,
            },
            position: self.position,
        }
        .serialize(serializer)
    }
}

#[derive(Deserialize)]
struct RawNode {
    id: NodeId,
    #[serde(default, alias = "functionName")]
    function_name: Option<String>,
    #[serde(default)]
    params: Option<Params>,
    #[serde(default)]
    position: Option<Position>,
    #[serde(default)]
    data: Option<RawNodeData>,
}

#[derive(Deserialize, Default)]
struct RawNodeData {
    #[serde(default, alias = "functionName")]
    function_name: Option<String>,
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    params: Option<Params>,
}

impl TryFrom<RawNode> for PersistedNode {
    type Error = String;

    fn try_from(raw: RawNode) -> std::result::Result<Self, Self::Error> {
        let data = raw.data.unwrap_or_default();
        let function_name = raw
            .function_name
            .or(data.function_name)
            .or(data.label)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| format!("node {} has no function name", raw.id))?;

        Ok(Self {
            id: raw.id,
            function_name,
            params: raw.params.or(data.params).unwrap_or_default(),
            position: raw.position,
        })
    }
}
