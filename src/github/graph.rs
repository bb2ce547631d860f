// GraphQL query for user-owned projects (v2).
// Builds the fixed query payload and walks the response tree into a typed `Project`.

use serde::Serialize;
use serde_json::Value;

use crate::error::{GatewayError, Result};

use super::types::{Project, ProjectItem};

/// Fetches a user's project by number together with its first 100 items.
pub const PROJECT_QUERY: &str = r#"
query($owner: String!, $number: Int!) {
  user(login: $owner) {
    projectV2(number: $number) {
      id
      title
      number
      shortDescription
      url
      closed
      items(first: 100) {
        nodes {
          id
          content {
            ... on Issue {
              id
              number
              title
            }
            ... on PullRequest {
              id
              number
              title
            }
          }
        }
      }
    }
  }
}
"#;

/// Variables bound into [`PROJECT_QUERY`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectVariables {
    pub owner: String,
    pub number: u64,
}

/// Request body for the GraphQL endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct GraphQlPayload<V: Serialize> {
    pub query: &'static str,
    pub variables: V,
}

/// Build the payload fetching `owner`'s project number `number`.
pub fn project_payload(owner: &str, number: u64) -> GraphQlPayload<ProjectVariables> {
    GraphQlPayload {
        query: PROJECT_QUERY,
        variables: ProjectVariables {
            owner: owner.to_string(),
            number,
        },
    }
}

/// Parse a response to [`PROJECT_QUERY`].
///
/// Any missing or mistyped field is a [`GatewayError::Protocol`] naming the JSON
/// path of the offending node. A null `projectV2` means the project does not
/// exist and is reported as [`GatewayError::NotFound`].
pub fn parse_project(body: &str) -> Result<Project> {
    let root: Value = serde_json::from_str(body)?;
    let root = Node::root(&root);

    if let Some(errors) = root.value.get("errors").and_then(Value::as_array) {
        if !errors.is_empty() {
            let messages: Vec<&str> = errors
                .iter()
                .map(|e| e.get("message").and_then(Value::as_str).unwrap_or("unknown error"))
                .collect();
            return Err(GatewayError::Protocol(format!(
                "graphql errors: {}",
                messages.join("; ")
            )));
        }
    }

    let project = root.field("data")?.field("user")?.field("projectV2")?;
    if project.value.is_null() {
        return Err(GatewayError::NotFound(project.path));
    }

    let nodes = project.field("items")?.field("nodes")?;
    let mut items = Vec::new();
    for node in nodes.array()? {
        if let Some(item) = parse_item(&node)? {
            items.push(item);
        }
    }

    Ok(Project {
        id: project.field("id")?.string()?,
        title: project.field("title")?.string()?,
        number: project.field("number")?.number()?,
        description: project.field("shortDescription")?.nullable_string()?,
        url: project.field("url")?.string()?,
        closed: project.field("closed")?.boolean()?,
        items,
    })
}

/// Items whose content is null (deleted or inaccessible) yield `None`, as do
/// draft issues and other content matching neither fragment, which arrive as `{}`.
/// A node without a `content` field at all is a protocol violation.
fn parse_item(node: &Node<'_>) -> Result<Option<ProjectItem>> {
    let content = node.field("content")?;
    match content.value {
        Value::Null => return Ok(None),
        Value::Object(fields) if fields.is_empty() => return Ok(None),
        _ => {}
    }

    Ok(Some(ProjectItem {
        id: node.field("id")?.string()?,
        content_id: content.field("id")?.string()?,
        number: content.field("number")?.number()?,
        title: content.field("title")?.string()?,
    }))
}

/// A position in the response tree, remembered for error messages.
struct Node<'a> {
    value: &'a Value,
    path: String,
}

impl<'a> Node<'a> {
    fn root(value: &'a Value) -> Self {
        Self {
            value,
            path: String::new(),
        }
    }

    fn child_path(&self, segment: &str) -> String {
        if self.path.is_empty() {
            segment.to_string()
        } else {
            format!("{}.{}", self.path, segment)
        }
    }

    fn violation(&self, expected: &str) -> GatewayError {
        GatewayError::Protocol(format!("expected {} at {}", expected, self.path))
    }

    fn field(&self, name: &str) -> Result<Node<'a>> {
        let path = self.child_path(name);
        let object = self.value.as_object().ok_or_else(|| self.violation("object"))?;
        match object.get(name) {
            Some(value) => Ok(Node { value, path }),
            None => Err(GatewayError::Protocol(format!("missing field {}", path))),
        }
    }

    fn array(&self) -> Result<Vec<Node<'a>>> {
        let items = self.value.as_array().ok_or_else(|| self.violation("array"))?;
        Ok(items
            .iter()
            .enumerate()
            .map(|(i, value)| Node {
                value,
                path: format!("{}[{}]", self.path, i),
            })
            .collect())
    }

    fn string(&self) -> Result<String> {
        self.value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| self.violation("string"))
    }

    fn nullable_string(&self) -> Result<String> {
        if self.value.is_null() {
            return Ok(String::new());
        }
        self.string()
    }

    fn number(&self) -> Result<u64> {
        self.value.as_u64().ok_or_else(|| self.violation("unsigned integer"))
    }

    fn boolean(&self) -> Result<bool> {
        self.value.as_bool().ok_or_else(|| self.violation("boolean"))
    }
}
