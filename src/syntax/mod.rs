pub mod lower;
pub mod micheline;

use lower::SyntaxError;
use micheline::Node;

/// Parse Micheline JSON text into a node tree.
pub fn parse_json(text: &str) -> Result<Node, SyntaxError> {
    serde_json::from_str(text).map_err(|e| SyntaxError::Json(e.to_string()))
}
